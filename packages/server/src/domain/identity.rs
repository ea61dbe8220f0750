//! Authenticated identity of a participant.
//!
//! Identities come from an external authentication collaborator and are
//! trusted for the whole lifetime of the connection they were resolved for.

use async_trait::async_trait;

use super::{
    error::AuthError,
    value_object::{UserId, Username},
};

/// A verified participant identity
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity {
    pub username: Username,
    pub user_id: UserId,
}

impl Identity {
    pub fn new(username: Username, user_id: UserId) -> Self {
        Self { username, user_id }
    }
}

/// Resolves a handshake token into an identity.
///
/// Credentials are never checked by the room engine itself.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn authenticate(&self, token: &str) -> Result<Identity, AuthError>;
}
