//! Main settlement engine
//!
//! Ties the ledger store, the netting engine and metrics together behind
//! the three operations collaborators call: create, settle, project.

use crate::{
    config::Config,
    metrics::Metrics,
    netting::NettingEngine,
    types::Settlement,
    Result,
};
use iou_ledger_core::{projection, LedgerStore, LendingOperation, User};

/// Settlement engine over a single-threaded store
#[derive(Debug)]
pub struct SettlementEngine {
    /// Ledger store
    store: LedgerStore,

    /// Netting engine
    netting: NettingEngine,

    /// Metrics collector
    metrics: Metrics,

    /// Configuration
    config: Config,
}

impl SettlementEngine {
    /// Create engine over an empty store
    pub fn new(config: Config) -> Result<Self> {
        Self::with_store(config, LedgerStore::new())
    }

    /// Create engine over an existing store
    pub fn with_store(config: Config, store: LedgerStore) -> Result<Self> {
        let netting = NettingEngine::new(config.netting.clear_mode);
        let metrics = Metrics::new()?;
        metrics.set_users(store.len());

        tracing::info!(
            service = %config.service_name,
            clear_mode = %config.netting.clear_mode,
            users = store.len(),
            "Settlement engine ready"
        );

        Ok(Self {
            store,
            netting,
            metrics,
            config,
        })
    }

    /// Add a user, returning a snapshot
    pub fn create_user(&mut self, user: User) -> Result<User> {
        let created = match self.store.create(user) {
            Ok(created) => created.clone(),
            Err(err) => {
                tracing::warn!(error = %err, "User creation rejected");
                let err = err.into();
                self.metrics.record_rejection(&err);
                return Err(err);
            }
        };

        self.metrics.set_users(self.store.len());
        tracing::info!(user = %created.name(), "User created");

        Ok(created)
    }

    /// Apply a lending operation
    ///
    /// Fails without touching the store if the amount is not positive or
    /// either user is unknown.
    pub fn settle(&mut self, operation: &LendingOperation) -> Result<Settlement> {
        let result = self.apply(operation);
        self.metrics.observe_settlement(
            operation.lender.as_str(),
            operation.borrower.as_str(),
            operation.amount,
            &result,
        );
        result
    }

    fn apply(&mut self, operation: &LendingOperation) -> Result<Settlement> {
        operation.validate()?;

        let (lender, borrower) = self
            .store
            .pair_mut(operation.lender.as_str(), operation.borrower.as_str())?;
        let outcome = self.netting.apply(lender, borrower, operation.amount)?;

        Ok(Settlement {
            outcome,
            users: projection::sort_by_name(vec![lender.clone(), borrower.clone()]),
        })
    }

    /// Snapshots of the named users, unknown names skipped, sorted by name
    pub fn project<S: AsRef<str>>(&self, names: &[S]) -> Vec<User> {
        projection::project(names, |name| self.store.find(name).cloned())
    }

    /// Snapshots of every user in creation order
    pub fn project_all(&self) -> Vec<User> {
        projection::project_all(self.store.all())
    }

    /// Look up one user
    pub fn find(&self, name: &str) -> Option<&User> {
        self.store.find(name)
    }

    /// Underlying store
    pub fn store(&self) -> &LedgerStore {
        &self.store
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
