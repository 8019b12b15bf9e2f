// ABOUTME: Bearer token value type and the single-slot store shared by callers.
// ABOUTME: One writer (the refresher) and many concurrent readers (intercepted calls).

use std::fmt;
use std::sync::{Arc, RwLock};

use tonic::metadata::{Ascii, MetadataValue};

use crate::error::AuthError;

/// An opaque bearer token that is known to be a legal `authorization` value.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    raw: Arc<str>,
    header: MetadataValue<Ascii>,
}

impl AccessToken {
    /// Validate a token returned by the login collaborator.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, AuthError> {
        let raw = raw.as_ref();
        if raw.is_empty() {
            return Err(AuthError::InvalidToken);
        }
        let header = raw
            .parse::<MetadataValue<Ascii>>()
            .map_err(|_| AuthError::InvalidToken)?;
        Ok(Self {
            raw: Arc::from(raw),
            header,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Metadata value ready to be inserted into an outgoing request.
    pub fn header_value(&self) -> MetadataValue<Ascii> {
        self.header.clone()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("len", &self.raw.len())
            .finish_non_exhaustive()
    }
}

/// Holds the token currently in effect.
///
/// Always initialised with a token: the refresher only builds a store after
/// its first login has succeeded.
#[derive(Debug)]
pub struct TokenStore {
    current: RwLock<AccessToken>,
}

impl TokenStore {
    pub fn new(initial: AccessToken) -> Self {
        Self {
            current: RwLock::new(initial),
        }
    }

    /// Snapshot of the token in effect right now.
    pub fn get(&self) -> AccessToken {
        // A poisoned lock still holds a whole token; assignment cannot tear.
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Replace the token in effect.
    pub fn set(&self, token: AccessToken) {
        *self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = token;
    }
}
