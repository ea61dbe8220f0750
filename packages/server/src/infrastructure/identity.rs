//! InMemory identity provider.
//!
//! Stands in for the external authentication collaborator: a fixed table of
//! opaque tokens, each mapped to an already-verified identity.

use std::{collections::HashMap, str::FromStr};

use async_trait::async_trait;

use crate::domain::{AuthError, Identity, IdentityProvider, UserId, Username};

/// One `TOKEN:USERNAME:USER_ID` entry of the token table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentitySeed {
    pub token: String,
    pub identity: Identity,
}

impl FromStr for IdentitySeed {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (token, rest) = s
            .split_once(':')
            .ok_or_else(|| format!("expected TOKEN:USERNAME:USER_ID, got '{s}'"))?;
        let (username, user_id) = rest
            .rsplit_once(':')
            .ok_or_else(|| format!("expected TOKEN:USERNAME:USER_ID, got '{s}'"))?;
        if token.is_empty() {
            return Err("token must not be empty".to_string());
        }
        let username = Username::new(username.to_string()).map_err(|e| e.to_string())?;
        let user_id = user_id
            .parse::<i64>()
            .map_err(|e| format!("invalid user id '{user_id}': {e}"))?;

        Ok(Self {
            token: token.to_string(),
            identity: Identity::new(username, UserId::new(user_id)),
        })
    }
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryIdentityProvider {
    tokens: HashMap<String, Identity>,
}

impl InMemoryIdentityProvider {
    pub fn new(seeds: impl IntoIterator<Item = IdentitySeed>) -> Self {
        Self {
            tokens: seeds
                .into_iter()
                .map(|seed| (seed.token, seed.identity))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn authenticate(&self, token: &str) -> Result<Identity, AuthError> {
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }
        self.tokens
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}
