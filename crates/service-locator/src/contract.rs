//! Typed contract markers.

use std::sync::Arc;

use contracts::{ContractId, InventoryService, OrderService, PaymentService, UserService};

use crate::RemoteClient;
use crate::remote::{
    RemoteInventoryService, RemoteOrderService, RemotePaymentService, RemoteUserService,
};

/// Links a contract identifier to its service trait and its network client.
pub trait Contract: 'static {
    const ID: ContractId;

    /// The trait object callers receive, e.g. `dyn InventoryService`.
    type Service: ?Sized + Send + Sync + 'static;

    /// Wraps a configured client in the contract's typed remote adapter.
    fn remote(client: RemoteClient) -> Arc<Self::Service>;
}

pub struct UsersContract;

impl Contract for UsersContract {
    const ID: ContractId = ContractId::Users;
    type Service = dyn UserService;

    fn remote(client: RemoteClient) -> Arc<Self::Service> {
        Arc::new(RemoteUserService::new(client))
    }
}

pub struct OrdersContract;

impl Contract for OrdersContract {
    const ID: ContractId = ContractId::Orders;
    type Service = dyn OrderService;

    fn remote(client: RemoteClient) -> Arc<Self::Service> {
        Arc::new(RemoteOrderService::new(client))
    }
}

pub struct PaymentsContract;

impl Contract for PaymentsContract {
    const ID: ContractId = ContractId::Payments;
    type Service = dyn PaymentService;

    fn remote(client: RemoteClient) -> Arc<Self::Service> {
        Arc::new(RemotePaymentService::new(client))
    }
}

pub struct InventoryContract;

impl Contract for InventoryContract {
    const ID: ContractId = ContractId::Inventory;
    type Service = dyn InventoryService;

    fn remote(client: RemoteClient) -> Arc<Self::Service> {
        Arc::new(RemoteInventoryService::new(client))
    }
}
