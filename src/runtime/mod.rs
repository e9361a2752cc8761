//! Process-wide selection of the active security context.
//!
//! The mode flag is read from process configuration first and the
//! environment second, and the chosen context is constructed from a closed,
//! compile-time table of implementations. A mode whose implementation was
//! not compiled into this build is a fatal configuration error.

use std::env;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::{truthy, RuntimeProps};
use crate::error::SecurityError;
use crate::identity::{DefaultSecurityContext, SecurityContext};

#[cfg(feature = "yarn")]
pub mod yarn;

/// Which security-context specialization is active for this process.
/// Resolved at most once and immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeMode {
    Default,
    Yarn,
}

/// Props key consulted first for the mode flag.
pub const YARN_MODE_PROP: &str = "gridflow.yarn.mode";
/// Environment fallback for the mode flag.
pub const YARN_MODE_ENV: &str = "GRIDFLOW_YARN_MODE";

/// Decide the runtime mode: props flag first, environment second, default
/// mode when neither is set or the value is not truthy.
pub fn detect_mode(props: &RuntimeProps) -> RuntimeMode {
    let flagged = props
        .flag(YARN_MODE_PROP)
        .or_else(|| env::var(YARN_MODE_ENV).ok().map(|v| truthy(&v)))
        .unwrap_or(false);
    if flagged {
        RuntimeMode::Yarn
    } else {
        RuntimeMode::Default
    }
}

/// Construct a fresh context for `mode`.
///
/// Every implementation is registered here at compile time; there is no
/// construction by name. A mode compiled out of the build is a hard error
/// for the caller to abort on, never a silent fallback to default mode.
///
/// Composition points that prefer explicit injection over the process-wide
/// accessor construct through this function and thread the instance into
/// their own wiring.
pub fn build_context(mode: RuntimeMode) -> Result<Box<dyn SecurityContext>, SecurityError> {
    match mode {
        RuntimeMode::Default => Ok(Box::new(DefaultSecurityContext)),
        #[cfg(feature = "yarn")]
        RuntimeMode::Yarn => Ok(Box::new(yarn::YarnSecurityContext)),
        #[cfg(not(feature = "yarn"))]
        RuntimeMode::Yarn => Err(SecurityError::RuntimeInit {
            mode,
            reason: "the `yarn` feature was not compiled into this build".to_string(),
        }),
    }
}

static CONTEXT: OnceCell<Box<dyn SecurityContext>> = OnceCell::new();

/// Process-wide security context, resolved at most once.
///
/// The first caller decides the mode from `props` (with the environment
/// fallback) and the constructed context is cached for the process
/// lifetime; every later call returns the same instance regardless of its
/// arguments. Initialization is compute-once/publish-once even under
/// concurrent first access.
///
/// A construction failure is fatal configuration: propagate it and abort
/// startup.
pub fn security_context(props: &RuntimeProps) -> Result<&'static dyn SecurityContext, SecurityError> {
    let ctx = CONTEXT.get_or_try_init(|| {
        let mode = detect_mode(props);
        let built = build_context(mode)?;
        info!(
            target: "gridflow::runtime",
            "security context resolved: {}", built.context_name()
        );
        Ok::<_, SecurityError>(built)
    })?;
    Ok(ctx.as_ref())
}
