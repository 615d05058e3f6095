//! Contract identifiers.

use serde::{Deserialize, Serialize};

/// Identifies one of the module-facing service contracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractId {
    Users,
    Orders,
    Payments,
    Inventory,
}

impl ContractId {
    /// Every contract, in a stable order.
    pub const ALL: [ContractId; 4] = [
        ContractId::Users,
        ContractId::Orders,
        ContractId::Payments,
        ContractId::Inventory,
    ];

    /// Returns the contract (interface) name, e.g. `"InventoryService"`.
    pub fn name(&self) -> &'static str {
        match self {
            ContractId::Users => "UserService",
            ContractId::Orders => "OrderService",
            ContractId::Payments => "PaymentService",
            ContractId::Inventory => "InventoryService",
        }
    }

    /// Returns the service name used in configuration keys and URL paths.
    pub fn service_name(&self) -> &'static str {
        match self {
            ContractId::Users => "users",
            ContractId::Orders => "orders",
            ContractId::Payments => "payments",
            ContractId::Inventory => "inventory",
        }
    }
}

impl std::fmt::Display for ContractId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ContractId {
    type Err = String;

    /// Accepts either the service name (`"inventory"`) or the contract name
    /// (`"InventoryService"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContractId::ALL
            .into_iter()
            .find(|id| id.service_name() == s || id.name() == s)
            .ok_or_else(|| format!("unknown contract: {s}"))
    }
}
