//! Core types for settlement engine

use iou_ledger_core::User;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How much of a debt map a flip or exact cancellation clears
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClearMode {
    /// Clear the whole mapping, every counterparty included
    #[default]
    WholeLedger,
    /// Clear only the entries between the two settling users
    PairScoped,
}

impl ClearMode {
    /// Config / env spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            ClearMode::WholeLedger => "whole_ledger",
            ClearMode::PairScoped => "pair_scoped",
        }
    }

    /// Parse from string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "whole_ledger" => Some(ClearMode::WholeLedger),
            "pair_scoped" => Some(ClearMode::PairScoped),
            _ => None,
        }
    }
}

impl fmt::Display for ClearMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What a single settlement did to the pair's debt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SettlementOutcome {
    /// No reverse debt; the borrower's debt to the lender grew
    DebtIncreased {
        /// Borrower now owes lender
        borrower_owes: Decimal,
        /// Lender is now owed by borrower
        lender_owed_by: Decimal,
    },
    /// Lender still owes borrower, less than before
    DebtReduced {
        /// Lender's remaining debt to borrower
        remaining: Decimal,
    },
    /// Lender's debt was overpaid; borrower now owes lender
    DebtReversed {
        /// Borrower's new debt to lender
        owed: Decimal,
    },
    /// Lender's debt was paid off exactly
    DebtCancelled,
}

impl SettlementOutcome {
    /// Metric label
    pub fn label(&self) -> &'static str {
        match self {
            SettlementOutcome::DebtIncreased { .. } => "increased",
            SettlementOutcome::DebtReduced { .. } => "reduced",
            SettlementOutcome::DebtReversed { .. } => "reversed",
            SettlementOutcome::DebtCancelled => "cancelled",
        }
    }
}

/// Result of a settlement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settlement {
    /// What happened to the debt
    pub outcome: SettlementOutcome,

    /// Lender and borrower after the settlement, sorted by name
    pub users: Vec<User>,
}
