//! Bilateral debt netting
//!
//! Applies one lending operation to a lender/borrower pair.
//!
//! # Example
//!
//! ```text
//! Before:       Adam owes Bob $15
//! Adam lends Bob $10
//! After:        Adam owes Bob $5      (reduced)
//!
//! Before:       Adam owes Bob $5
//! Adam lends Bob $10
//! After:        Bob owes Adam $5      (reversed)
//!
//! Before:       Adam owes Bob $10
//! Adam lends Bob $10
//! After:        nothing owed          (cancelled)
//! ```
//!
//! Balances always move by the full amount: +$10 for Adam, -$10 for Bob.

use crate::{
    types::{ClearMode, SettlementOutcome},
    Result,
};
use iou_ledger_core::{Error as LedgerError, LendingOperation, User};
use rust_decimal::Decimal;
use std::cmp::Ordering;

/// Netting engine
#[derive(Debug, Clone, Copy, Default)]
pub struct NettingEngine {
    /// Scope of the clear on flip / exact cancel
    clear_mode: ClearMode,
}

impl NettingEngine {
    /// Create new netting engine
    pub fn new(clear_mode: ClearMode) -> Self {
        Self { clear_mode }
    }

    /// Configured clear mode
    pub fn clear_mode(&self) -> ClearMode {
        self.clear_mode
    }

    /// Settle `amount` lent by `lender` to `borrower`
    ///
    /// Every new value is computed before the first write, so an error
    /// leaves both records untouched.
    pub fn apply(
        &self,
        lender: &mut User,
        borrower: &mut User,
        amount: Decimal,
    ) -> Result<SettlementOutcome> {
        LendingOperation::new(lender.name().clone(), borrower.name().clone(), amount).validate()?;

        let lender_balance = lender
            .balance()
            .checked_add(amount)
            .ok_or_else(|| overflow(lender, "balance"))?;
        let borrower_balance = borrower
            .balance()
            .checked_sub(amount)
            .ok_or_else(|| overflow(borrower, "balance"))?;

        let outcome = self.plan(lender, borrower, amount)?;

        tracing::debug!(
            lender = %lender.name(),
            borrower = %borrower.name(),
            %amount,
            outcome = outcome.label(),
            clear_mode = %self.clear_mode,
            "Netting decided"
        );

        // Planned amounts are positive and the parties differ, so no write fails
        self.commit(lender, borrower, &outcome)?;
        lender.set_balance(lender_balance);
        borrower.set_balance(borrower_balance);

        Ok(outcome)
    }

    /// Decide the new debt between the pair
    fn plan(&self, lender: &User, borrower: &User, amount: Decimal) -> Result<SettlementOutcome> {
        let reverse_debt = lender.owes_to(borrower.name().as_str());

        if reverse_debt > Decimal::ZERO {
            // Both operands positive: cannot overflow
            let net = reverse_debt - amount;

            return Ok(match net.cmp(&Decimal::ZERO) {
                Ordering::Greater => SettlementOutcome::DebtReduced { remaining: net },
                Ordering::Less => SettlementOutcome::DebtReversed { owed: net.abs() },
                Ordering::Equal => SettlementOutcome::DebtCancelled,
            });
        }

        let borrower_owes = borrower
            .owes_to(lender.name().as_str())
            .checked_add(amount)
            .ok_or_else(|| overflow(borrower, "owes"))?;
        let lender_owed_by = lender
            .owed_by_from(borrower.name().as_str())
            .checked_add(amount)
            .ok_or_else(|| overflow(lender, "owed_by"))?;

        Ok(SettlementOutcome::DebtIncreased {
            borrower_owes,
            lender_owed_by,
        })
    }

    /// Write the planned debts into both records
    fn commit(
        &self,
        lender: &mut User,
        borrower: &mut User,
        outcome: &SettlementOutcome,
    ) -> Result<()> {
        let lender_name = lender.name().clone();
        let borrower_name = borrower.name().clone();

        match *outcome {
            SettlementOutcome::DebtIncreased {
                borrower_owes,
                lender_owed_by,
            } => {
                borrower.set_owes(lender_name, borrower_owes)?;
                lender.set_owed_by(borrower_name, lender_owed_by)?;
            }
            SettlementOutcome::DebtReduced { remaining } => {
                lender.set_owes(borrower_name, remaining)?;
                borrower.set_owed_by(lender_name, remaining)?;
            }
            SettlementOutcome::DebtReversed { owed } => {
                match self.clear_mode {
                    ClearMode::WholeLedger => {
                        lender.clear_owes();
                        borrower.clear_owed_by();
                    }
                    ClearMode::PairScoped => {
                        lender.remove_owes(borrower_name.as_str());
                        borrower.remove_owed_by(lender_name.as_str());
                    }
                }
                lender.set_owed_by(borrower_name, owed)?;
                borrower.set_owes(lender_name, owed)?;
            }
            SettlementOutcome::DebtCancelled => match self.clear_mode {
                ClearMode::WholeLedger => {
                    lender.clear_owes();
                    lender.clear_owed_by();
                    borrower.clear_owes();
                    borrower.clear_owed_by();
                }
                ClearMode::PairScoped => {
                    lender.remove_owes(borrower_name.as_str());
                    lender.remove_owed_by(borrower_name.as_str());
                    borrower.remove_owes(lender_name.as_str());
                    borrower.remove_owed_by(lender_name.as_str());
                }
            },
        }

        Ok(())
    }
}

fn overflow(user: &User, field: &str) -> LedgerError {
    LedgerError::Validation(format!(
        "Amount overflows {} of {}",
        field,
        user.name()
    ))
}
