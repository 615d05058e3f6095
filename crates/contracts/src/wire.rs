//! Records exchanged by the network adapter.
//!
//! A contract call `method(args)` travels as `POST {base}/api/{method}` with
//! body `{"arguments": args}`. Success returns the method's return value as
//! JSON; failure returns a [`Fault`] body.

use serde::{Deserialize, Serialize};

use crate::ContractError;

/// Request body of a contract call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallEnvelope<A> {
    pub arguments: A,
}

impl<A> CallEnvelope<A> {
    pub fn new(arguments: A) -> Self {
        Self { arguments }
    }
}

/// Arguments of a method that takes none; serializes to `{}`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct NoArgs {}

/// Error body returned by a contract endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fault {
    pub error: ContractError,
}

/// Builds the path of a contract method relative to the module's base URL.
pub fn method_path(method: &str) -> String {
    format!("/api/{method}")
}
