//! Delegation tokens and the credential-transfer primitive.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::principal::Identity;

/// Identity of a token inside a store: one active token per (kind, service).
#[derive(Debug, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenKey {
    pub kind: String,
    pub service: String,
}

/// An opaque, time-bounded credential permitting identity-scoped access to a
/// secured resource without re-authentication. The identifier bytes are
/// minted and consumed by the storage/cluster layer; this crate only moves
/// them between identities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegationToken {
    pub kind: String,
    pub service: String,
    #[serde(with = "b64_bytes")]
    pub identifier: Vec<u8>,
    pub issued_at: DateTime<Utc>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl DelegationToken {
    pub fn new(kind: &str, service: &str, identifier: Vec<u8>) -> Self {
        Self {
            kind: kind.to_string(),
            service: service.to_string(),
            identifier,
            issued_at: Utc::now(),
            expires_at: None,
        }
    }

    pub fn with_expiry(mut self, at: DateTime<Utc>) -> Self {
        self.expires_at = Some(at);
        self
    }

    pub fn key(&self) -> TokenKey {
        TokenKey { kind: self.kind.clone(), service: self.service.clone() }
    }

    /// Tokens without an expiry never expire.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map(|at| at <= now).unwrap_or(false)
    }
}

pub(crate) type TokenMap = HashMap<TokenKey, DelegationToken>;

/// Copy every delegation token held by `source` onto `dest`.
///
/// Additive and never destructive: tokens already on `dest` are kept
/// untouched, including one whose (kind, service) collides with an incoming
/// token. `source` is never mutated. An empty source, or a `dest` sharing
/// the same live store, is a no-op.
pub fn transfer(source: &Identity, dest: &Identity) {
    if source.shares_store_with(dest) {
        return;
    }
    let tokens = source.tokens();
    if tokens.is_empty() {
        return;
    }
    let added = dest.merge_tokens(tokens);
    debug!(
        target: "gridflow::identity",
        "transferred {} token(s) from {} to {}",
        added, source.name(), dest.name()
    );
}

mod b64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let raw = String::deserialize(d)?;
        STANDARD.decode(raw.as_bytes()).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn token(kind: &str, service: &str, byte: u8) -> DelegationToken {
        DelegationToken::new(kind, service, vec![byte])
    }

    #[test]
    fn transfer_is_additive_superset() {
        let source = Identity::named("ambient");
        source.add_token(token("HDFS_DELEGATION_TOKEN", "nn-1", 1));
        source.add_token(token("HDFS_DELEGATION_TOKEN", "nn-2", 2));
        let dest = Identity::named("worker");
        dest.add_token(token("TIMELINE_TOKEN", "ats", 3));

        transfer(&source, &dest);

        assert_eq!(dest.token_count(), 3);
        assert!(dest.token(&TokenKey { kind: "TIMELINE_TOKEN".into(), service: "ats".into() }).is_some());
        assert!(dest.token(&TokenKey { kind: "HDFS_DELEGATION_TOKEN".into(), service: "nn-1".into() }).is_some());
        // Source untouched
        assert_eq!(source.token_count(), 2);
    }

    #[test]
    fn transfer_never_overwrites_existing_dest_token() {
        let source = Identity::named("ambient");
        source.add_token(token("K", "svc", 9));
        let dest = Identity::named("worker");
        dest.add_token(token("K", "svc", 7));

        transfer(&source, &dest);

        let kept = dest.token(&TokenKey { kind: "K".into(), service: "svc".into() }).unwrap();
        assert_eq!(kept.identifier, vec![7]);
        assert_eq!(dest.token_count(), 1);
    }

    #[test]
    fn transfer_from_empty_source_is_a_noop() {
        let source = Identity::named("ambient");
        let dest = Identity::named("worker");
        dest.add_token(token("K", "svc", 1));
        transfer(&source, &dest);
        assert_eq!(dest.token_count(), 1);
    }

    #[test]
    fn transfer_into_shared_store_is_a_noop() {
        let source = Identity::named("ambient");
        source.add_token(token("K", "svc", 1));
        let aliased = source.clone();
        transfer(&source, &aliased);
        assert_eq!(source.token_count(), 1);
    }

    #[test]
    fn expiry_accounting() {
        let now = Utc::now();
        let fresh = token("K", "svc", 1);
        assert!(!fresh.is_expired(now));
        let expired = token("K", "svc", 1).with_expiry(now - Duration::seconds(1));
        assert!(expired.is_expired(now));
        let live = token("K", "svc", 1).with_expiry(now + Duration::hours(1));
        assert!(!live.is_expired(now));
    }

    #[test]
    fn token_json_roundtrip_uses_base64_identifier() {
        let t = token("K", "svc", 0xAB);
        let json = serde_json::to_string(&t).unwrap();
        assert!(json.contains(&base64::Engine::encode(
            &base64::engine::general_purpose::STANDARD,
            [0xABu8]
        )));
        let back: DelegationToken = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }
}
