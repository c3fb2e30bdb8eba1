//! IOU Gateway
//!
//! Routes path + JSON payload requests onto the settlement engine and maps
//! every failure to a status code. No socket is ever opened; callers hand
//! in request strings and get response strings back.
//!
//! # Routes
//!
//! | Method | Path | Payload |
//! |---|---|---|
//! | GET | `/users` | optional `{"users": [names]}` |
//! | POST | `/add` | `{"user": name}` |
//! | POST | `/iou` | `{"lender", "borrower", "amount"}` |
//! | GET | `/metrics` | none |

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod api;
pub mod dto;
pub mod error;
pub mod config;

// Re-exports
pub use api::{Method, Request, RestApi};
pub use config::Config;
pub use error::{ApiError, Result};
