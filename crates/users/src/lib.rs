//! Users module.
//!
//! Registers users, hashes their credentials and publishes `user.created`
//! with a [`contracts::UserDto`]. The credential hash stays inside this crate:
//! it is stored with the user but never appears in a DTO or an event.

pub mod credentials;
pub mod error;
pub mod memory;
pub mod model;
pub mod postgres;
pub mod seed;
pub mod service;
pub mod store;

pub use credentials::{CredentialError, CredentialHasher, Pbkdf2Hasher};
pub use error::{Result, StoreError};
pub use memory::InMemoryUserStore;
pub use model::User;
pub use postgres::PostgresUserStore;
pub use seed::{AdminAccount, seed_admin};
pub use service::LocalUserService;
pub use store::UserStore;
