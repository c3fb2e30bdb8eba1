//! Settlement engine for concurrent callers
//!
//! Same operations as [`SettlementEngine`](crate::SettlementEngine), over a
//! [`SharedLedgerStore`]. A settlement holds both users' locks from the
//! first read to the last write; other pairs proceed in parallel.

use crate::{
    config::Config,
    metrics::Metrics,
    netting::NettingEngine,
    types::Settlement,
    Result,
};
use iou_ledger_core::{projection, LendingOperation, SharedLedgerStore, User};

/// Thread-safe settlement engine
#[derive(Debug)]
pub struct SharedSettlementEngine {
    store: SharedLedgerStore,
    netting: NettingEngine,
    metrics: Metrics,
    config: Config,
}

impl SharedSettlementEngine {
    /// Create engine over an empty store
    pub fn new(config: Config) -> Result<Self> {
        Self::with_store(config, SharedLedgerStore::new())
    }

    /// Create engine over an existing store
    pub fn with_store(config: Config, store: SharedLedgerStore) -> Result<Self> {
        let netting = NettingEngine::new(config.netting.clear_mode);
        let metrics = Metrics::new()?;
        metrics.set_users(store.len());

        Ok(Self {
            store,
            netting,
            metrics,
            config,
        })
    }

    /// Add a user, returning a snapshot
    pub fn create_user(&self, user: User) -> Result<User> {
        match self.store.create(user) {
            Ok(created) => {
                self.metrics.set_users(self.store.len());
                tracing::info!(user = %created.name(), "User created");
                Ok(created)
            }
            Err(err) => {
                let err = err.into();
                self.metrics.record_rejection(&err);
                Err(err)
            }
        }
    }

    /// Apply a lending operation under both users' locks
    pub fn settle(&self, operation: &LendingOperation) -> Result<Settlement> {
        let result = self.apply(operation);
        self.metrics.observe_settlement(
            operation.lender.as_str(),
            operation.borrower.as_str(),
            operation.amount,
            &result,
        );
        result
    }

    fn apply(&self, operation: &LendingOperation) -> Result<Settlement> {
        operation.validate()?;

        self.store.with_pair(
            operation.lender.as_str(),
            operation.borrower.as_str(),
            |lender, borrower| -> Result<Settlement> {
                let outcome = self.netting.apply(lender, borrower, operation.amount)?;

                Ok(Settlement {
                    outcome,
                    users: projection::sort_by_name(vec![lender.clone(), borrower.clone()]),
                })
            },
        )
    }

    /// Snapshots of the named users, unknown names skipped, sorted by name
    pub fn project<S: AsRef<str>>(&self, names: &[S]) -> Vec<User> {
        projection::project(names, |name| self.store.find(name))
    }

    /// Snapshots of every user in creation order
    pub fn project_all(&self) -> Vec<User> {
        self.store.all()
    }

    /// Snapshot of one user
    pub fn find(&self, name: &str) -> Option<User> {
        self.store.find(name)
    }

    /// Metrics collector
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
