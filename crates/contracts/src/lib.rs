//! Contract registry for cross-module communication.
//!
//! Every module publishes exactly one service trait here together with the
//! data-transfer records it accepts and returns. Callers only ever hold an
//! `Arc<dyn ...Service>`, so they cannot tell whether the implementation runs
//! in the same process or behind the network adapter.
//!
//! - [`ContractId`] names each contract for the service locator
//! - [`ContractError`] is the error taxonomy shared by every contract method
//! - [`wire`] holds the envelope records of the `POST /api/{method}` protocol
//! - [`topics`] lists the domain event topics

pub mod contract;
pub mod error;
pub mod topics;
pub mod v1;
pub mod wire;

pub use contract::ContractId;
pub use error::{ContractError, RemoteCallError, RemoteFailure, Result};
pub use v1::inventory::{InventoryService, NewProduct, ProductDto};
pub use v1::orders::{NewOrder, OrderDto, OrderService, OrderStatus};
pub use v1::payments::{NewPayment, PaymentDto, PaymentService, PaymentStatus};
pub use v1::users::{NewUser, UserDto, UserService};
