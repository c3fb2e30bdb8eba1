//! Request and response payloads

use iou_ledger_core::{types::DebtMap, Error as LedgerError, LendingOperation, User, UserName};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// `{"users": [...]}`: list responses and seed databases
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserList {
    /// User snapshots
    pub users: Vec<User>,
}

/// Body of `GET /users`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UsersQuery {
    /// Names to look up
    #[serde(default)]
    pub users: Vec<UserName>,
}

/// Body of `POST /add`
#[derive(Debug, Clone, Deserialize)]
pub struct AddUserRequest {
    /// New user's name
    pub user: UserName,

    /// Initial debts to others
    #[serde(default)]
    pub owes: DebtMap,

    /// Initial debts from others
    #[serde(default)]
    pub owed_by: DebtMap,

    /// Initial balance
    #[serde(default)]
    pub balance: Decimal,
}

impl AddUserRequest {
    /// Validate into a user record
    pub fn into_user(self) -> iou_ledger_core::Result<User> {
        User::with_state(self.user, self.owes, self.owed_by, self.balance)
    }
}

/// Body of `POST /iou`
#[derive(Debug, Clone, Deserialize)]
pub struct IouRequest {
    /// Who lends
    pub lender: UserName,

    /// Who borrows
    pub borrower: UserName,

    /// How much; absence is a validation failure, not a parse failure
    #[serde(default)]
    pub amount: Option<Decimal>,
}

impl IouRequest {
    /// Convert into a lending operation
    ///
    /// Only presence of the amount is checked here; the engine validates
    /// the operation itself.
    pub fn into_operation(self) -> iou_ledger_core::Result<LendingOperation> {
        let amount = self
            .amount
            .ok_or_else(|| LedgerError::Validation("Missing amount".to_string()))?;
        Ok(LendingOperation::new(self.lender, self.borrower, amount))
    }
}
