//! Thread-safety retrofit for configurations that outlive their builder.
//!
//! The storage client mutates a conf's provenance map on writes and on
//! default-served reads with no synchronization of its own, so any conf
//! retained and read by multiple worker threads goes through [`harden`]
//! first. Every known mutable hotspot of [`StorageConf`] is registered in
//! the recipe table below together with the function that swaps its backing
//! container for a synchronized one; a storage-client upgrade that adds a
//! hotspot only has to touch this table.

use anyhow::Result;
use tracing::warn;

use super::conf::StorageConf;

type HardenRecipe = fn(&mut StorageConf) -> Result<()>;

/// Known mutable hotspots and how to synchronize each.
const RECIPES: &[(&str, HardenRecipe)] = &[("provenance", sync_provenance)];

fn sync_provenance(conf: &mut StorageConf) -> Result<()> {
    conf.sync_provenance();
    Ok(())
}

/// Produce a defensive copy of `conf` whose mutable hotspots are backed by
/// synchronized containers holding the same entries.
///
/// Best-effort by contract: a hotspot with no registered recipe, or whose
/// recipe fails, is logged as a warning and left as-is in the copy — the
/// caller still gets a working conf, just not a hardened one. Applying
/// `harden` twice is safe; the second pass finds nothing left to swap and
/// the observable key/value content is unchanged.
///
/// All internal mutation completes before this function returns, so a
/// caller that publishes the result afterwards (typically in an `Arc`) is
/// guaranteed every other thread sees the synchronized containers.
pub fn harden(conf: &StorageConf) -> StorageConf {
    let mut copy = conf.clone();
    for field in copy.unsynced_fields() {
        match RECIPES.iter().find(|(name, _)| name == field) {
            Some((_, recipe)) => {
                if let Err(e) = recipe(&mut copy) {
                    warn!(
                        target: "gridflow::config",
                        "failed to synchronize conf field `{}`: {}; continuing with unsynchronized copy",
                        field, e
                    );
                }
            }
            None => {
                warn!(
                    target: "gridflow::config",
                    "no hardening recipe registered for mutable conf field `{}`; continuing with unsynchronized copy",
                    field
                );
            }
        }
    }
    copy
}
