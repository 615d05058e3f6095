//! Service locator for cross-module calls.
//!
//! Each module binds its in-process implementation at startup. Callers ask
//! for a contract and receive an `Arc<dyn ...Service>` that is either that
//! local instance or a typed HTTP client for the contract, depending on the
//! configured [`LocatorMode`]. Handles are cached, so every caller in the
//! process shares one instance per contract.

pub mod client;
pub mod config;
pub mod contract;
pub mod error;
pub mod locator;
pub mod remote;

pub use client::RemoteClient;
pub use config::{Binding, CallPolicy, ContractRoute, LocatorConfig, LocatorMode};
pub use contract::{Contract, InventoryContract, OrdersContract, PaymentsContract, UsersContract};
pub use error::{LocatorError, Result};
pub use locator::{Resolution, ServiceLocator};
