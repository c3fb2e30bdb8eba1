//! Deterministic views of user records
//!
//! Projections are read-only. Filtered queries come back sorted by name;
//! the unfiltered view keeps creation order.

use crate::types::User;

/// Resolve `names` with `lookup`, skip unknown names, sort by name
///
/// A name listed twice yields two snapshots.
pub fn project<S, F>(names: &[S], mut lookup: F) -> Vec<User>
where
    S: AsRef<str>,
    F: FnMut(&str) -> Option<User>,
{
    let users = names
        .iter()
        .filter_map(|name| lookup(name.as_ref()))
        .collect();
    sort_by_name(users)
}

/// Snapshot every record, keeping their given order
pub fn project_all<'a>(users: impl IntoIterator<Item = &'a User>) -> Vec<User> {
    users.into_iter().cloned().collect()
}

/// Stable sort by name ascending
pub fn sort_by_name(mut users: Vec<User>) -> Vec<User> {
    users.sort_by(|a, b| a.name().cmp(b.name()));
    users
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::LedgerStore;
    use proptest::prelude::*;

    fn store_with(names: &[&str]) -> LedgerStore {
        LedgerStore::from_users(names.iter().map(|name| User::new(*name).unwrap())).unwrap()
    }

    fn names(users: &[User]) -> Vec<&str> {
        users.iter().map(|u| u.name().as_str()).collect()
    }

    #[test]
    fn test_project_skips_unknown_names() {
        let store = store_with(&["Bob"]);
        let users = project(&["Bob", "Ghost"], |name| store.find(name).cloned());
        assert_eq!(names(&users), vec!["Bob"]);
    }

    #[test]
    fn test_project_sorts_by_name() {
        let store = store_with(&["Adam", "Bob", "Chuck"]);
        let users = project(&["Chuck", "Adam"], |name| store.find(name).cloned());
        assert_eq!(names(&users), vec!["Adam", "Chuck"]);
    }

    #[test]
    fn test_project_empty_filter() {
        let store = store_with(&["Adam"]);
        let users = project::<&str, _>(&[], |name| store.find(name).cloned());
        assert!(users.is_empty());
    }

    #[test]
    fn test_project_all_keeps_creation_order() {
        let store = store_with(&["Chuck", "Adam", "Bob"]);
        let users = project_all(store.all());
        assert_eq!(names(&users), vec!["Chuck", "Adam", "Bob"]);
    }

    proptest! {
        #[test]
        fn projection_is_sorted_and_filtered(
            present in prop::collection::btree_set("[A-Z][a-z]{0,5}", 0..8),
            queried in prop::collection::vec("[A-Z][a-z]{0,5}", 0..12),
        ) {
            let store = LedgerStore::from_users(
                present.iter().map(|name| User::new(name.as_str()).unwrap()),
            )
            .unwrap();

            let users = project(&queried, |name| store.find(name).cloned());

            prop_assert!(users.windows(2).all(|w| w[0].name() <= w[1].name()));
            prop_assert!(users.iter().all(|u| present.contains(u.name().as_str())));
            let expected = queried.iter().filter(|q| present.contains(q.as_str())).count();
            prop_assert_eq!(users.len(), expected);
        }
    }
}
