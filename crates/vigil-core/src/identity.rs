//! External identity collaborator.
//!
//! Authentication and session management are delegated to an external
//! identity provider; the core consumes only the identity id (and the
//! email at registration time).

use uuid::Uuid;

use crate::error::VigilResult;

/// An authenticated identity as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: Uuid,
    pub email: String,
}

pub trait IdentityProvider: Send + Sync {
    /// The identity of the current caller, if authenticated.
    fn current_identity(&self) -> impl Future<Output = VigilResult<Option<Identity>>> + Send;

    /// Register a new identity with the provider.
    fn sign_up(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = VigilResult<Identity>> + Send;
}
