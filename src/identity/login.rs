//! Ambient process identity and keytab login.

use std::path::Path;

use anyhow::Result;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::error::SecurityError;

use super::principal::Identity;

static PROCESS_IDENTITY: Lazy<RwLock<Identity>> =
    Lazy::new(|| RwLock::new(Identity::named(&whoami::username())));

/// Handle to the identity this process is currently logged in as.
///
/// The handle shares the live token store, so credentials obtained after
/// this call are still visible through it.
pub fn process_identity() -> Identity {
    PROCESS_IDENTITY.read().clone()
}

/// Log the process in as `principal` using a keytab file, replacing the
/// ambient identity.
///
/// This is a pass-through to the platform security layer; the invariant
/// carried here is that re-login with the same principal succeeds silently
/// and keeps the existing token store. A fresh login starts from an empty
/// store.
pub fn login_from_keytab(principal: &str, keytab: &Path) -> Result<()> {
    let meta = std::fs::metadata(keytab).map_err(|e| SecurityError::Login {
        principal: principal.to_string(),
        reason: format!("keytab {} unreadable: {}", keytab.display(), e),
    })?;
    if !meta.is_file() {
        return Err(SecurityError::Login {
            principal: principal.to_string(),
            reason: format!("keytab {} is not a regular file", keytab.display()),
        }
        .into());
    }

    let mut current = PROCESS_IDENTITY.write();
    if current.name() == principal {
        debug!(
            target: "gridflow::identity",
            "re-login as {}; keeping existing credentials", principal
        );
        return Ok(());
    }
    *current = Identity::named(principal);
    info!(
        target: "gridflow::identity",
        "process identity is now {} (keytab {})", principal, keytab.display()
    );
    Ok(())
}
