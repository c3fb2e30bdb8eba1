//! Core types for the ledger
//!
//! All types are designed for:
//! - Exact arithmetic (Decimal for money)
//! - Deterministic serialization (debt maps ordered by counterparty)
//! - Validated construction (no record can hold a zero or negative debt)

use crate::{Error, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

/// Unique participant name
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserName(String);

impl UserName {
    /// Create new user name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Empty or whitespace-only
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for UserName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UserName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for UserName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Amounts keyed by counterparty, ascending by name
pub type DebtMap = BTreeMap<UserName, Decimal>;

/// One record per named participant
///
/// Serializes as `{"name", "owes", "owed_by", "balance"}`. Deserialization
/// runs the same validation as [`User::with_state`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UserRecord")]
pub struct User {
    /// Unique name, immutable once created
    name: UserName,

    /// Counterparty -> amount this user owes them
    owes: DebtMap,

    /// Counterparty -> amount they owe this user
    owed_by: DebtMap,

    /// Lent minus borrowed, never reset by netting
    balance: Decimal,
}

/// Unvalidated wire shape of a user
#[derive(Deserialize)]
struct UserRecord {
    name: UserName,
    #[serde(default)]
    owes: DebtMap,
    #[serde(default)]
    owed_by: DebtMap,
    #[serde(default)]
    balance: Decimal,
}

impl TryFrom<UserRecord> for User {
    type Error = Error;

    fn try_from(record: UserRecord) -> Result<Self> {
        User::with_state(record.name, record.owes, record.owed_by, record.balance)
    }
}

impl User {
    /// Create user with no debts and zero balance
    pub fn new(name: impl Into<UserName>) -> Result<Self> {
        Self::with_state(name, DebtMap::new(), DebtMap::new(), Decimal::ZERO)
    }

    /// Create user with initial debts and balance
    ///
    /// Zero entries are dropped. Negative entries and entries naming the
    /// user themself are rejected.
    pub fn with_state(
        name: impl Into<UserName>,
        owes: DebtMap,
        owed_by: DebtMap,
        balance: Decimal,
    ) -> Result<Self> {
        let name = name.into();
        if name.is_blank() {
            return Err(Error::Validation("User name must not be empty".to_string()));
        }

        let owes = normalize_debts(&name, "owes", owes)?;
        let owed_by = normalize_debts(&name, "owed_by", owed_by)?;

        Ok(Self {
            name,
            owes,
            owed_by,
            balance,
        })
    }

    /// User name
    pub fn name(&self) -> &UserName {
        &self.name
    }

    /// Everyone this user owes
    pub fn owes(&self) -> &DebtMap {
        &self.owes
    }

    /// Everyone who owes this user
    pub fn owed_by(&self) -> &DebtMap {
        &self.owed_by
    }

    /// Running balance
    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// Amount this user owes `counterparty` (zero if none)
    pub fn owes_to(&self, counterparty: &str) -> Decimal {
        self.owes.get(counterparty).copied().unwrap_or(Decimal::ZERO)
    }

    /// Amount `counterparty` owes this user (zero if none)
    pub fn owed_by_from(&self, counterparty: &str) -> Decimal {
        self.owed_by.get(counterparty).copied().unwrap_or(Decimal::ZERO)
    }

    /// Set what this user owes `counterparty`; zero removes the entry
    ///
    /// Negative amounts and self-entries are rejected and leave the record
    /// unchanged.
    pub fn set_owes(&mut self, counterparty: UserName, amount: Decimal) -> Result<()> {
        check_debt(&self.name, "owes", &counterparty, amount)?;
        set_debt(&mut self.owes, counterparty, amount);
        Ok(())
    }

    /// Set what `counterparty` owes this user; zero removes the entry
    pub fn set_owed_by(&mut self, counterparty: UserName, amount: Decimal) -> Result<()> {
        check_debt(&self.name, "owed_by", &counterparty, amount)?;
        set_debt(&mut self.owed_by, counterparty, amount);
        Ok(())
    }

    /// Drop the `owes` entry for one counterparty
    pub fn remove_owes(&mut self, counterparty: &str) {
        self.owes.remove(counterparty);
    }

    /// Drop the `owed_by` entry for one counterparty
    pub fn remove_owed_by(&mut self, counterparty: &str) {
        self.owed_by.remove(counterparty);
    }

    /// Drop every `owes` entry
    pub fn clear_owes(&mut self) {
        self.owes.clear();
    }

    /// Drop every `owed_by` entry
    pub fn clear_owed_by(&mut self) {
        self.owed_by.clear();
    }

    /// Overwrite the running balance
    pub fn set_balance(&mut self, balance: Decimal) {
        self.balance = balance;
    }
}

fn set_debt(debts: &mut DebtMap, counterparty: UserName, amount: Decimal) {
    if amount > Decimal::ZERO {
        debts.insert(counterparty, amount);
    } else {
        debts.remove(counterparty.as_str());
    }
}

fn check_debt(
    owner: &UserName,
    field: &str,
    counterparty: &UserName,
    amount: Decimal,
) -> Result<()> {
    if counterparty == owner {
        return Err(Error::Validation(format!(
            "User {} cannot list themself in {}",
            owner, field
        )));
    }
    if amount < Decimal::ZERO {
        return Err(Error::Validation(format!(
            "Negative {} entry for {}: {}",
            field, counterparty, amount
        )));
    }
    Ok(())
}

fn normalize_debts(owner: &UserName, field: &str, debts: DebtMap) -> Result<DebtMap> {
    let mut normalized = DebtMap::new();
    for (counterparty, amount) in debts {
        check_debt(owner, field, &counterparty, amount)?;
        if amount > Decimal::ZERO {
            normalized.insert(counterparty, amount);
        }
    }
    Ok(normalized)
}

/// Transfer of funds from lender to borrower (transient)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LendingOperation {
    /// Who hands over the money
    pub lender: UserName,

    /// Who receives it
    pub borrower: UserName,

    /// Positive amount
    pub amount: Decimal,
}

impl LendingOperation {
    /// Create new lending operation
    pub fn new(
        lender: impl Into<UserName>,
        borrower: impl Into<UserName>,
        amount: Decimal,
    ) -> Self {
        Self {
            lender: lender.into(),
            borrower: borrower.into(),
            amount,
        }
    }

    /// Check amount and parties, without touching any store
    pub fn validate(&self) -> Result<()> {
        if self.amount <= Decimal::ZERO {
            return Err(Error::Validation(format!(
                "Amount must be positive, got {}",
                self.amount
            )));
        }

        if self.lender == self.borrower {
            return Err(Error::Validation(format!(
                "Lender and borrower must differ: {}",
                self.lender
            )));
        }

        Ok(())
    }
}
