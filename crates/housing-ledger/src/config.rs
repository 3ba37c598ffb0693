//! # Ledger Configuration
//!
//! Product policies that the bookkeeping rules leave open.

use serde::{Deserialize, Serialize};

/// What to do with a unit-tagged deposit that would push the member's
/// balance above the unit's required deposit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverpaymentPolicy {
    /// Fail with `Overpayment`; the deposit is not taken.
    #[default]
    Reject,
    /// Take the deposit regardless of the unit's requirement.
    Accept,
}

/// Ledger policy configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Handling of unit-tagged deposits above the required deposit.
    pub overpayment: OverpaymentPolicy,
    /// Married members must supply a spouse identity reference.
    pub require_spouse_when_married: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            overpayment: OverpaymentPolicy::Reject,
            require_spouse_when_married: true,
        }
    }
}
