//! Identity resolution, credential transfer, and impersonated execution.
//! Keep the public surface thin and split implementation across sub-modules.

mod context;
mod login;
mod principal;
mod tokens;

pub use context::{DefaultSecurityContext, SecurityContext, Work, UNKNOWN_USER};
pub use login::{login_from_keytab, process_identity};
pub use principal::Identity;
pub use tokens::{transfer, DelegationToken, TokenKey};
