//! Execution of work under a resolved operating identity.

use std::env;

use anyhow::Result;
use tracing::debug;

use crate::config::{new_storage_conf, RuntimeProps, StorageConf};

use super::login::process_identity;
use super::principal::Identity;
use super::tokens::{transfer, DelegationToken};

/// Sentinel meaning "no operating identity was configured".
pub const UNKNOWN_USER: &str = "<unknown>";

/// Unit of work executed under a resolved identity.
///
/// The effective identity is passed in explicitly rather than through
/// ambient thread-local state; it is `Clone + Send + Sync`, so work that
/// spawns threads hands each one its own clone.
pub type Work<'a> = Box<dyn FnOnce(&Identity) -> Result<()> + 'a>;

/// The security layer the runtime calls into. One implementation is
/// resolved per process by [`crate::runtime::security_context`]; the
/// default methods here are the behavior outside any cluster manager.
pub trait SecurityContext: Send + Sync {
    /// Short name used in logs.
    fn context_name(&self) -> &'static str;

    /// Run `work` as the operating identity named by the `user_env`
    /// environment variable.
    ///
    /// When `user_env` is unset, empty, or holds the [`UNKNOWN_USER`]
    /// sentinel, `work` runs directly under the ambient process identity.
    /// Otherwise a fresh identity is constructed for the configured name,
    /// every token the ambient identity holds is transferred onto it, and
    /// `work` runs with that identity — credential lookups against it, from
    /// this thread or any thread the work spawns, see the inherited tokens.
    ///
    /// Any error raised by `work` propagates to the caller unchanged.
    ///
    /// Caution for long-lived processes: the storage client may cache
    /// connections per identity. Repeated impersonation does not invalidate
    /// those caches — that is the storage layer's responsibility, not this
    /// method's.
    fn run_as(&self, user_env: &str, work: Work<'_>) -> Result<()> {
        let ambient = process_identity();
        let target = env::var(user_env)
            .ok()
            .filter(|name| !name.is_empty() && name != UNKNOWN_USER);
        match target {
            None => {
                debug!(
                    target: "gridflow::identity",
                    "no operating identity in {}; running as {}", user_env, ambient.name()
                );
                work(&ambient)
            }
            Some(name) => {
                let effective = Identity::named(&name);
                transfer(&ambient, &effective);
                debug!(
                    target: "gridflow::identity",
                    "running as {} with {} inherited token(s) (ambient {})",
                    name, effective.token_count(), ambient.name()
                );
                work(&effective)
            }
        }
    }

    /// Build a storage-client configuration for this context.
    fn new_configuration(&self, props: Option<&RuntimeProps>) -> StorageConf {
        new_storage_conf(props)
    }

    /// Merge the process identity's credentials into `dest`.
    ///
    /// Intentionally a no-op outside cluster-manager mode: default mode has
    /// no credential source of record to merge from. Callers that need the
    /// merge must run under a cluster manager that provides one.
    fn add_credentials(&self, dest: &Identity) {
        let _ = dest;
    }

    /// Tokens held by the ambient identity, where the context tracks them.
    /// `None` outside cluster-manager mode.
    fn current_user_credentials(&self) -> Option<Vec<DelegationToken>> {
        None
    }
}

/// Context used when no cluster manager is in play.
pub struct DefaultSecurityContext;

impl SecurityContext for DefaultSecurityContext {
    fn context_name(&self) -> &'static str {
        "default"
    }
}
