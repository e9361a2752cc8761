//! YARN specialization of the security context.
//!
//! Under YARN the cluster manager hands every worker its credentials, so
//! the ambient identity's token store is a first-class source here: the
//! credential hooks that are no-ops in default mode read from and write to
//! it.

use crate::identity::{
    process_identity, transfer, DelegationToken, Identity, SecurityContext,
};

pub struct YarnSecurityContext;

impl YarnSecurityContext {
    /// Seed an opaque secret into the process identity's credential store
    /// so later transfers carry it onto impersonated identities.
    pub fn add_secret_to_process_credentials(&self, kind: &str, service: &str, secret: Vec<u8>) {
        process_identity().add_token(DelegationToken::new(kind, service, secret));
    }
}

impl SecurityContext for YarnSecurityContext {
    fn context_name(&self) -> &'static str {
        "yarn"
    }

    fn add_credentials(&self, dest: &Identity) {
        transfer(&process_identity(), dest);
    }

    fn current_user_credentials(&self) -> Option<Vec<DelegationToken>> {
        Some(process_identity().tokens())
    }
}
