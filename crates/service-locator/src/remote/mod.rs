//! Typed network adapters, one per contract.

mod inventory;
mod orders;
mod payments;
mod users;

pub use inventory::RemoteInventoryService;
pub use orders::RemoteOrderService;
pub use payments::RemotePaymentService;
pub use users::RemoteUserService;
