//! Version 1 of the module contracts.
//!
//! Method names in each `methods` module are the path segment used by the
//! network adapter, and each `*Args` record is the `arguments` body it sends.

pub mod inventory;
pub mod orders;
pub mod payments;
pub mod users;
