//! Debt Settlement Engine
//!
//! Nets a transfer from a lender to a borrower against any debt already
//! running the other way between the two.
//!
//! # Algorithm
//!
//! 1. Look up what the lender already owes the borrower
//! 2. If nothing, the borrower's debt to the lender grows by the amount
//! 3. Otherwise net the amount against it: the debt shrinks, flips
//!    direction, or cancels out
//! 4. Move both balances by the full amount
//!
//! Flips and cancellations clear debt maps according to [`ClearMode`].
//!
//! # Example
//!
//! ```
//! use iou_ledger_core::{LendingOperation, User};
//! use iou_settlement::{Config, SettlementEngine};
//! use rust_decimal::Decimal;
//!
//! fn main() -> iou_settlement::Result<()> {
//!     let mut engine = SettlementEngine::new(Config::default())?;
//!     engine.create_user(User::new("Adam")?)?;
//!     engine.create_user(User::new("Bob")?)?;
//!
//!     let settlement = engine.settle(&LendingOperation::new("Adam", "Bob", Decimal::from(10)))?;
//!     assert_eq!(settlement.users[1].owes_to("Adam"), Decimal::from(10));
//!
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod types;
pub mod netting;
pub mod error;
pub mod config;
pub mod metrics;
pub mod engine;
pub mod shared;

// Re-exports
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use netting::NettingEngine;
pub use metrics::Metrics;
pub use engine::SettlementEngine;
pub use shared::SharedSettlementEngine;
