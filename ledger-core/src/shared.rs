//! Ledger store for concurrent callers
//!
//! Each record sits behind its own mutex. The name index and creation
//! order sit behind a read/write lock that is only held long enough to
//! resolve handles, never while a record is being mutated.
//!
//! # Lock ordering
//!
//! A two-record mutation locks both records in ascending name order, so
//! two settlements over the same pair can never deadlock regardless of
//! which side each caller names first.

use crate::{
    error::{Error, Result},
    types::{User, UserName},
};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;

type Record = Arc<Mutex<User>>;

#[derive(Debug, Default)]
struct Records {
    order: Vec<Record>,
    index: HashMap<UserName, Record>,
}

/// Thread-safe ledger store
#[derive(Debug, Default)]
pub struct SharedLedgerStore {
    records: RwLock<Records>,
}

impl SharedLedgerStore {
    /// Create empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store from existing records, keeping their order
    pub fn from_users(users: impl IntoIterator<Item = User>) -> Result<Self> {
        let store = Self::new();
        for user in users {
            store.create(user)?;
        }
        Ok(store)
    }

    /// Insert a new user, returning a snapshot
    pub fn create(&self, user: User) -> Result<User> {
        let mut records = self.records.write();
        if records.index.contains_key(user.name()) {
            return Err(Error::Conflict(user.name().to_string()));
        }

        let snapshot = user.clone();
        let record = Arc::new(Mutex::new(user));
        records.index.insert(snapshot.name().clone(), record.clone());
        records.order.push(record);

        Ok(snapshot)
    }

    /// Snapshot of one user
    pub fn find(&self, name: &str) -> Option<User> {
        let record = self.records.read().index.get(name).cloned()?;
        let user = record.lock().clone();
        Some(user)
    }

    /// Snapshots of all users in creation order
    pub fn all(&self) -> Vec<User> {
        let order: Vec<Record> = self.records.read().order.clone();
        order.iter().map(|record| record.lock().clone()).collect()
    }

    /// Number of users
    pub fn len(&self) -> usize {
        self.records.read().order.len()
    }

    /// No users yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run `f` with exclusive access to two distinct records
    ///
    /// The closure receives the records in argument order. Both locks are
    /// held for the whole call and released when it returns. Lookup
    /// failures are converted into the closure's error type.
    pub fn with_pair<T, E, F>(&self, first: &str, second: &str, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&mut User, &mut User) -> std::result::Result<T, E>,
        E: From<Error>,
    {
        if first == second {
            return Err(Error::Validation(format!(
                "Expected two distinct users, got {} twice",
                first
            ))
            .into());
        }

        let (first_record, second_record) = {
            let records = self.records.read();
            let lookup = |name: &str| -> Result<Record> {
                records
                    .index
                    .get(name)
                    .cloned()
                    .ok_or_else(|| Error::NotFound(name.to_string()))
            };
            (lookup(first)?, lookup(second)?)
        };

        if first < second {
            let mut a = first_record.lock();
            let mut b = second_record.lock();
            f(&mut *a, &mut *b)
        } else {
            let mut b = second_record.lock();
            let mut a = first_record.lock();
            f(&mut *a, &mut *b)
        }
    }
}
