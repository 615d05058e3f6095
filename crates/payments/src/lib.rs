//! Payments module.
//!
//! A payment is created pending and completed at most once. Completion is the
//! only path that marks an order paid: it stores `completed` with `paid_at`,
//! calls `mark_as_paid` on the Orders contract and then publishes
//! `payment.completed`.

pub mod error;
pub mod gateway;
pub mod listener;
pub mod memory;
pub mod model;
pub mod postgres;
pub mod service;
pub mod store;

pub use error::{Result, StoreError};
pub use gateway::{AutoApproveGateway, GatewayError, PaymentGateway};
pub use listener::AutoChargeListener;
pub use memory::InMemoryPaymentStore;
pub use model::{Completion, Payment};
pub use postgres::PostgresPaymentStore;
pub use service::LocalPaymentService;
pub use store::PaymentStore;
