//! IOU Ledger Core
//!
//! In-memory record set for a shared ledger of peer-to-peer debts.
//!
//! # Architecture
//!
//! - **Users**: one record per named participant, tracking who they owe,
//!   who owes them, and a running balance
//! - **Store**: insertion-ordered records with a name index
//! - **Shared store**: per-record locks for concurrent callers
//! - **Projection**: deterministic, name-sorted snapshots for output
//!
//! # Invariants
//!
//! - Names are unique within a store
//! - `owes` / `owed_by` entries are strictly positive; zero means absent
//! - Debt maps are always ordered by counterparty name

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod types;
pub mod store;
pub mod shared;
pub mod projection;
pub mod error;

// Re-exports
pub use error::{Error, Result};
pub use types::{LendingOperation, User, UserName};
pub use store::LedgerStore;
pub use shared::SharedLedgerStore;
