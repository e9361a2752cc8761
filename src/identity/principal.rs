//! Named security principals and their live token stores.

use std::collections::hash_map::Entry;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use super::tokens::{DelegationToken, TokenKey, TokenMap};

/// A named security principal plus its delegation-token store.
///
/// The store is shared by reference: cloning an `Identity` yields a handle
/// onto the same live credentials, so tokens added through one handle are
/// visible through all of them. This is what lets an impersonated identity
/// be handed to spawned threads and still observe the credentials seeded
/// before the work started.
#[derive(Clone)]
pub struct Identity {
    name: String,
    tokens: Arc<RwLock<TokenMap>>,
}

impl Identity {
    pub fn named(name: &str) -> Self {
        Self { name: name.to_string(), tokens: Arc::new(RwLock::new(TokenMap::new())) }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Install `token`, replacing any active token with the same
    /// (kind, service) key.
    pub fn add_token(&self, token: DelegationToken) {
        self.tokens.write().insert(token.key(), token);
    }

    pub fn token(&self, key: &TokenKey) -> Option<DelegationToken> {
        self.tokens.read().get(key).cloned()
    }

    /// Snapshot of the tokens currently held.
    pub fn tokens(&self) -> Vec<DelegationToken> {
        self.tokens.read().values().cloned().collect()
    }

    pub fn token_count(&self) -> usize {
        self.tokens.read().len()
    }

    /// Insert each incoming token unless its key is already taken. Returns
    /// how many were added.
    pub(crate) fn merge_tokens(&self, incoming: Vec<DelegationToken>) -> usize {
        let mut store = self.tokens.write();
        let mut added = 0usize;
        for token in incoming {
            if let Entry::Vacant(slot) = store.entry(token.key()) {
                slot.insert(token);
                added += 1;
            }
        }
        added
    }

    /// Whether both handles point at the same live token store.
    pub fn shares_store_with(&self, other: &Identity) -> bool {
        Arc::ptr_eq(&self.tokens, &other.tokens)
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("name", &self.name)
            .field("tokens", &self.token_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_live_store() {
        let a = Identity::named("svc");
        let b = a.clone();
        a.add_token(DelegationToken::new("K", "s1", vec![1]));
        assert_eq!(b.token_count(), 1);
        assert!(a.shares_store_with(&b));
        assert!(!a.shares_store_with(&Identity::named("svc")));
    }

    #[test]
    fn add_token_replaces_same_key() {
        let id = Identity::named("svc");
        id.add_token(DelegationToken::new("K", "s1", vec![1]));
        id.add_token(DelegationToken::new("K", "s1", vec![2]));
        assert_eq!(id.token_count(), 1);
        let key = TokenKey { kind: "K".into(), service: "s1".into() };
        assert_eq!(id.token(&key).unwrap().identifier, vec![2]);
    }
}
