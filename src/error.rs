//! Typed failures raised by this crate. Operation boundaries otherwise use
//! `anyhow`, and these variants convert into it transparently.

use thiserror::Error;

use crate::runtime::RuntimeMode;

#[derive(Debug, Error)]
pub enum SecurityError {
    /// Fatal configuration: the resolved runtime mode has no security
    /// context in this build. Never downgraded to the default context —
    /// running the wrong context against a secured cluster manager would
    /// silently produce wrong security behavior.
    #[error("cannot construct the {mode:?} security context: {reason}")]
    RuntimeInit { mode: RuntimeMode, reason: String },

    /// Keytab login could not replace the process identity.
    #[error("keytab login failed for `{principal}`: {reason}")]
    Login { principal: String, reason: String },
}
