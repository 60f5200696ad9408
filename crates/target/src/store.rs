// In-memory user storage
// Decision: Use parking_lot for thread-safe access
// Decision: Ids are sequential from 1 and never reused; BTreeMap keeps them in insertion order

use std::collections::BTreeMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
}

struct Inner {
    users: BTreeMap<u64, User>,
    next_id: u64,
}

/// All data is stored in memory and lost on restart
pub struct UserStore {
    inner: RwLock<Inner>,
}

impl UserStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                users: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    pub fn create(&self, name: String, email: String) -> User {
        let mut inner = self.inner.write();
        let user = User {
            id: inner.next_id,
            name,
            email,
        };
        inner.next_id += 1;
        inner.users.insert(user.id, user.clone());
        user
    }

    /// Users in id order, skipping `offset` and returning at most `limit`
    pub fn list(&self, offset: usize, limit: usize) -> Vec<User> {
        self.inner
            .read()
            .users
            .values()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect()
    }

    pub fn get(&self, id: u64) -> Option<User> {
        self.inner.read().users.get(&id).cloned()
    }

    pub fn contains(&self, id: u64) -> bool {
        self.inner.read().users.contains_key(&id)
    }

    /// Apply the present fields; `None` when the user does not exist
    pub fn update(&self, id: u64, name: Option<String>, email: Option<String>) -> Option<User> {
        let mut inner = self.inner.write();
        let user = inner.users.get_mut(&id)?;
        if let Some(name) = name {
            user.name = name;
        }
        if let Some(email) = email {
            user.email = email;
        }
        Some(user.clone())
    }

    pub fn delete(&self, id: u64) -> bool {
        self.inner.write().users.remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.inner.read().users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}
