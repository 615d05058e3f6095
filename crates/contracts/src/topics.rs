//! Domain event topics.
//!
//! Payloads are the owning module's DTO, serialized as JSON.

/// Emitted by Users after a user is stored. Payload: [`crate::UserDto`].
pub const USER_CREATED: &str = "user.created";

/// Emitted by Orders after an order is stored. Payload: [`crate::OrderDto`].
pub const ORDER_CREATED: &str = "order.created";

/// Emitted by Payments after a payment completes. Payload: [`crate::PaymentDto`].
pub const PAYMENT_COMPLETED: &str = "payment.completed";

pub const ALL: [&str; 3] = [USER_CREATED, ORDER_CREATED, PAYMENT_COMPLETED];
