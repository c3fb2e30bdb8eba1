//! In-memory record set
//!
//! Users are kept in creation order with a name index alongside. Nothing
//! is ever deleted, so indices stay stable for the life of the store.

use crate::{
    error::{Error, Result},
    types::{User, UserName},
};
use std::collections::HashMap;

/// Single-threaded ledger store
#[derive(Debug, Default, Clone)]
pub struct LedgerStore {
    /// Records in creation order
    users: Vec<User>,

    /// Name -> position in `users`
    index: HashMap<UserName, usize>,
}

impl LedgerStore {
    /// Create empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store from existing records, keeping their order
    pub fn from_users(users: impl IntoIterator<Item = User>) -> Result<Self> {
        let mut store = Self::new();
        for user in users {
            store.create(user)?;
        }
        Ok(store)
    }

    /// Insert a new user
    ///
    /// Fails with [`Error::Conflict`] if the name is taken.
    pub fn create(&mut self, user: User) -> Result<&User> {
        if self.index.contains_key(user.name()) {
            return Err(Error::Conflict(user.name().to_string()));
        }

        let position = self.users.len();
        self.index.insert(user.name().clone(), position);
        self.users.push(user);

        tracing::debug!(position, "User record inserted");

        Ok(&self.users[position])
    }

    /// Look up by name
    pub fn find(&self, name: &str) -> Option<&User> {
        self.index.get(name).map(|&position| &self.users[position])
    }

    /// All users in creation order
    pub fn all(&self) -> &[User] {
        &self.users
    }

    /// Number of users
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// No users yet
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Exclusive access to two distinct records, in argument order
    pub fn pair_mut(&mut self, first: &str, second: &str) -> Result<(&mut User, &mut User)> {
        let i = self.position(first)?;
        let j = self.position(second)?;

        if i == j {
            return Err(Error::Validation(format!(
                "Expected two distinct users, got {} twice",
                first
            )));
        }

        if i < j {
            let (head, tail) = self.users.split_at_mut(j);
            Ok((&mut head[i], &mut tail[0]))
        } else {
            let (head, tail) = self.users.split_at_mut(i);
            Ok((&mut tail[0], &mut head[j]))
        }
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }
}
