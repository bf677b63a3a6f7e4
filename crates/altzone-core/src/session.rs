// ── Session context ──
//
// The signed-in user comes from an external identity provider. Views get
// a read-only `Session` at construction; the only write they may request
// is sign-out, which is delegated back to the provider.

use std::fmt;
use std::sync::{Arc, RwLock};

use tracing::info;

use crate::error::CoreError;
use crate::model::SessionUser;

/// Capability exposed by whatever owns authentication.
pub trait IdentityProvider: Send + Sync {
    fn current_user(&self) -> Option<SessionUser>;
    fn sign_out(&self) -> Result<(), CoreError>;
}

/// An identity provider holding a fixed user until signed out.
#[derive(Debug, Default)]
pub struct StaticIdentity {
    user: RwLock<Option<SessionUser>>,
}

impl StaticIdentity {
    pub fn new(user: Option<SessionUser>) -> Self {
        Self {
            user: RwLock::new(user),
        }
    }

    pub fn signed_in(user: SessionUser) -> Self {
        Self::new(Some(user))
    }

    pub fn anonymous() -> Self {
        Self::new(None)
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user(&self) -> Option<SessionUser> {
        self.user.read().ok().and_then(|guard| guard.clone())
    }

    fn sign_out(&self) -> Result<(), CoreError> {
        let mut guard = self
            .user
            .write()
            .map_err(|_| CoreError::Internal("identity lock poisoned".into()))?;
        *guard = None;
        Ok(())
    }
}

/// Read-only view of the identity provider handed to each controller.
#[derive(Clone)]
pub struct Session {
    provider: Arc<dyn IdentityProvider>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user().map(|u| u.email))
            .finish()
    }
}

impl Session {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self { provider }
    }

    pub fn anonymous() -> Self {
        Self::new(Arc::new(StaticIdentity::anonymous()))
    }

    pub fn signed_in(user: SessionUser) -> Self {
        Self::new(Arc::new(StaticIdentity::signed_in(user)))
    }

    pub fn user(&self) -> Option<SessionUser> {
        self.provider.current_user()
    }

    pub fn is_signed_in(&self) -> bool {
        self.user().is_some()
    }

    /// The current user, or `Unauthorized` naming what was attempted.
    pub fn require_user(&self, operation: &str) -> Result<SessionUser, CoreError> {
        self.user().ok_or_else(|| CoreError::Unauthorized {
            operation: operation.to_owned(),
        })
    }

    pub fn sign_out(&self) -> Result<(), CoreError> {
        self.provider.sign_out()?;
        info!("signed out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_user_fails_without_session() {
        let session = Session::anonymous();
        let err = session.require_user("add a recommendation");
        assert!(matches!(err, Err(CoreError::Unauthorized { ref operation }) if operation == "add a recommendation"));
    }

    #[test]
    fn sign_out_clears_the_shared_provider() {
        let session = Session::signed_in(SessionUser::new("a@example.com"));
        let view_copy = session.clone();
        assert!(view_copy.is_signed_in());

        session.sign_out().ok();
        assert!(!view_copy.is_signed_in());
    }
}
