use crate::config::OverpaymentPolicy;
use crate::domain::{Address, Amount, RefId};
use crate::errors::{AllocationConflict, LedgerError};
use crate::projects::HousingUnit;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Record of one accepted deposit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositReceipt {
    /// Ledger-wide deposit counter, starting at 1.
    pub sequence: u64,
    /// Who deposited.
    pub depositor: Address,
    /// Unit the deposit was tagged for, if any.
    pub unit_ref: Option<RefId>,
    /// Amount taken.
    pub amount: Amount,
    /// Depositor's balance after this deposit.
    pub balance_after: Amount,
}

/// Per-member escrow balances.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowLedger {
    balances: BTreeMap<Address, Amount>,
    history: BTreeMap<Address, Vec<DepositReceipt>>,
    total_held: Amount,
    deposits: u64,
}

impl EscrowLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current balance; zero for addresses that never deposited.
    #[must_use]
    pub fn balance_of(&self, depositor: Address) -> Amount {
        self.balances.get(&depositor).copied().unwrap_or(0)
    }

    /// Accepted deposits of `depositor`, oldest first.
    #[must_use]
    pub fn history_of(&self, depositor: Address) -> &[DepositReceipt] {
        self.history.get(&depositor).map_or(&[], Vec::as_slice)
    }

    /// Sum of all balances.
    #[must_use]
    pub fn total_held(&self) -> Amount {
        self.total_held
    }

    /// All balances in address order.
    pub fn balances(&self) -> impl Iterator<Item = (&Address, &Amount)> {
        self.balances.iter()
    }

    /// All receipts, grouped by depositor in address order.
    pub fn receipts(&self) -> impl Iterator<Item = &DepositReceipt> {
        self.history.values().flatten()
    }

    /// Validates a deposit and returns the resulting balance.
    ///
    /// `target` is the already-resolved unit for tagged deposits.
    pub fn check_deposit(
        &self,
        depositor: Address,
        target: Option<&HousingUnit>,
        amount: Amount,
        policy: OverpaymentPolicy,
    ) -> Result<Amount, LedgerError> {
        if amount == 0 {
            return Err(LedgerError::InvalidInput {
                reason: "deposit amount must be positive".to_string(),
            });
        }

        let balance_after = self
            .balance_of(depositor)
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow { address: depositor })?;
        self.total_held
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow { address: depositor })?;

        if let Some(unit) = target {
            if unit.housing_allocated {
                return Err(LedgerError::AlreadyAllocated(AllocationConflict::Unit {
                    unit_ref: unit.unit_ref,
                    owner: unit.owner.unwrap_or(Address::ZERO),
                }));
            }
            if policy == OverpaymentPolicy::Reject && balance_after > unit.required_deposit {
                return Err(LedgerError::Overpayment {
                    unit_ref: unit.unit_ref,
                    required: unit.required_deposit,
                    attempted: balance_after,
                });
            }
        }

        Ok(balance_after)
    }

    /// Credits `amount` to `depositor` after validation.
    pub(crate) fn deposit(
        &mut self,
        depositor: Address,
        target: Option<&HousingUnit>,
        amount: Amount,
        policy: OverpaymentPolicy,
    ) -> Result<DepositReceipt, LedgerError> {
        let balance_after = self.check_deposit(depositor, target, amount, policy)?;

        self.balances.insert(depositor, balance_after);
        self.total_held += amount;
        self.deposits += 1;

        let receipt = DepositReceipt {
            sequence: self.deposits,
            depositor,
            unit_ref: target.map(|u| u.unit_ref),
            amount,
            balance_after,
        };
        self.history.entry(depositor).or_default().push(receipt.clone());
        Ok(receipt)
    }
}
