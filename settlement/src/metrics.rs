//! Metrics collection for observability
//!
//! Each engine owns its own Prometheus registry, so independent ledgers
//! never share counters.
//!
//! # Metrics
//!
//! - `iou_settlements_total{outcome}` - Settlements applied, by outcome
//! - `iou_rejections_total{reason}` - Operations refused, by error kind
//! - `iou_users_total` - Users in the store
//! - `iou_settled_amount` - Histogram of lent amounts

use crate::{error::Error, types::Settlement, Result};
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::fmt;
use std::sync::Arc;

/// Metrics collector
#[derive(Clone)]
pub struct Metrics {
    /// Settlements applied, by outcome
    pub settlements_total: IntCounterVec,

    /// Rejected operations, by error kind
    pub rejections_total: IntCounterVec,

    /// Users in the store
    pub users_total: IntGauge,

    /// Lent amount histogram
    pub settled_amount: Histogram,

    /// Prometheus registry
    pub registry: Arc<Registry>,
}

impl Metrics {
    /// Create new metrics collector
    pub fn new() -> Result<Self> {
        let registry = Arc::new(Registry::new());

        let settlements_total = IntCounterVec::new(
            Opts::new("iou_settlements_total", "Settlements applied, by outcome"),
            &["outcome"],
        )?;
        registry.register(Box::new(settlements_total.clone()))?;

        let rejections_total = IntCounterVec::new(
            Opts::new("iou_rejections_total", "Operations refused, by error kind"),
            &["reason"],
        )?;
        registry.register(Box::new(rejections_total.clone()))?;

        let users_total = IntGauge::new("iou_users_total", "Users in the store")?;
        registry.register(Box::new(users_total.clone()))?;

        let settled_amount = Histogram::with_opts(
            HistogramOpts::new("iou_settled_amount", "Histogram of lent amounts")
                .buckets(vec![1.0, 5.0, 10.0, 50.0, 100.0, 500.0, 1_000.0, 10_000.0]),
        )?;
        registry.register(Box::new(settled_amount.clone()))?;

        Ok(Self {
            settlements_total,
            rejections_total,
            users_total,
            settled_amount,
            registry,
        })
    }

    /// Record a settlement attempt and log it
    pub fn observe_settlement(
        &self,
        lender: &str,
        borrower: &str,
        amount: Decimal,
        result: &Result<Settlement>,
    ) {
        match result {
            Ok(settlement) => {
                tracing::info!(
                    lender,
                    borrower,
                    %amount,
                    outcome = settlement.outcome.label(),
                    "Settlement applied"
                );
                self.settlements_total
                    .with_label_values(&[settlement.outcome.label()])
                    .inc();
                self.settled_amount.observe(amount.to_f64().unwrap_or(0.0));
            }
            Err(err) => {
                tracing::warn!(lender, borrower, %amount, error = %err, "Settlement rejected");
                self.record_rejection(err);
            }
        }
    }

    /// Record a refused operation
    pub fn record_rejection(&self, err: &Error) {
        self.rejections_total.with_label_values(&[err.kind()]).inc();
    }

    /// Update user count
    pub fn set_users(&self, count: usize) {
        self.users_total.set(count as i64);
    }

    /// Get metrics registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Prometheus text exposition of every metric
    pub fn render(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| Error::Other(e.to_string()))
    }
}

impl fmt::Debug for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Metrics")
            .field("users_total", &self.users_total.get())
            .finish_non_exhaustive()
    }
}
