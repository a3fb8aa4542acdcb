//! Bearer credential shared by client handles

use std::sync::Arc;

use parking_lot::RwLock;

/// Holds the current access token. Clones share the same slot, so clearing
/// it on one handle signs every handle out.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    token: Arc<RwLock<Option<String>>>,
}

impl Credentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let credentials = Self::new();
        credentials.set_token(token);
        credentials
    }

    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.write() = Some(token.into());
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().clone()
    }

    pub fn is_signed_in(&self) -> bool {
        self.token.read().is_some()
    }

    pub fn clear(&self) {
        *self.token.write() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_token() {
        let credentials = Credentials::with_token("abc");
        let other = credentials.clone();
        assert_eq!(other.token().as_deref(), Some("abc"));

        other.clear();
        assert!(!credentials.is_signed_in());
    }
}
