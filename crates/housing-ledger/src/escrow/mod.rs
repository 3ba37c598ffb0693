//! # Escrow Ledger
//!
//! Tracks what each member has deposited. Balances only grow; allocation
//! reads them but does not consume them.
//!
//! Deposits may be tagged with a unit. A tagged deposit requires the unit
//! to still be available and, under [`OverpaymentPolicy::Reject`], must not
//! push the balance above the unit's required deposit.
//!
//! [`OverpaymentPolicy::Reject`]: crate::config::OverpaymentPolicy::Reject

pub mod ledger;

pub use ledger::{DepositReceipt, EscrowLedger};
