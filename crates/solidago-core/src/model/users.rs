//! Users and their trust scores.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub is_pretrusted: bool,
    /// Trust in `[0, 1]`, `None` until trust propagation has run.
    pub trust: Option<f64>,
}

impl User {
    pub fn new(name: impl Into<String>, is_pretrusted: bool) -> Self {
        Self {
            name: name.into(),
            is_pretrusted,
            trust: None,
        }
    }

    pub fn with_trust(mut self, trust: f64) -> Self {
        self.trust = Some(trust);
        self
    }
}

/// Users keyed by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Users {
    users: BTreeMap<String, User>,
}

impl Users {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a user.
    pub fn insert(&mut self, user: User) {
        self.users.insert(user.name.clone(), user);
    }

    /// Adds a non-pretrusted user unless one with this name already exists.
    pub fn ensure(&mut self, name: &str) {
        if !self.users.contains_key(name) {
            self.insert(User::new(name, false));
        }
    }

    pub fn get(&self, name: &str) -> Option<&User> {
        self.users.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.users.contains_key(name)
    }

    /// Trust of `name`; unknown users and users without trust count as 0.
    pub fn trust(&self, name: &str) -> f64 {
        self.users
            .get(name)
            .and_then(|u| u.trust)
            .filter(|t| t.is_finite())
            .unwrap_or(0.0)
    }

    pub fn is_pretrusted(&self, name: &str) -> bool {
        self.users.get(name).is_some_and(|u| u.is_pretrusted)
    }

    /// Returns a copy of the table with trusts replaced by `trusts`.
    /// Users missing from `trusts` get trust 0.
    pub fn with_trusts(&self, trusts: &BTreeMap<String, f64>) -> Users {
        let users = self
            .users
            .iter()
            .map(|(name, user)| {
                let trust = trusts.get(name).copied().unwrap_or(0.0);
                (name.clone(), user.clone().with_trust(trust))
            })
            .collect();
        Users { users }
    }

    /// `computed`, except that users holding a trust in `self` keep it.
    pub fn keeping_stored_trusts(&self, computed: Users) -> Users {
        let users = computed
            .users
            .into_iter()
            .map(|(name, user)| {
                let user = match self.users.get(&name).and_then(|u| u.trust) {
                    Some(stored) => user.with_trust(stored),
                    None => user,
                };
                (name, user)
            })
            .collect();
        Users { users }
    }

    pub fn trusts(&self) -> BTreeMap<String, f64> {
        self.users
            .keys()
            .map(|name| (name.clone(), self.trust(name)))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.users.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl FromIterator<User> for Users {
    fn from_iter<I: IntoIterator<Item = User>>(iter: I) -> Self {
        let mut users = Users::new();
        for user in iter {
            users.insert(user);
        }
        users
    }
}
