//! The identity on whose behalf a resolution runs.
//!
//! Cache policy branches on this, so it is an explicit tagged variant rather
//! than an optional token field, and it is passed into every resolver call
//! instead of living in ambient state.

/// Who is asking for a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Actor {
    /// No credentials. Sees exactly the public view of the host.
    Anonymous,
    /// A signed-in user with a GitHub access token. May see repositories
    /// the anonymous view cannot.
    Authenticated { uid: String, token: String },
}

impl Actor {
    /// Creates an authenticated actor from a user id and access token
    pub fn authenticated(uid: impl Into<String>, token: impl Into<String>) -> Self {
        Actor::Authenticated {
            uid: uid.into(),
            token: token.into(),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Actor::Anonymous)
    }

    /// The access token to send upstream, if any
    pub fn token(&self) -> Option<&str> {
        match self {
            Actor::Anonymous => None,
            Actor::Authenticated { token, .. } => Some(token),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_has_no_token() {
        assert!(Actor::Anonymous.is_anonymous());
        assert_eq!(Actor::Anonymous.token(), None);
    }

    #[test]
    fn authenticated_exposes_token() {
        let actor = Actor::authenticated("1", "t0ken");
        assert!(!actor.is_anonymous());
        assert_eq!(actor.token(), Some("t0ken"));
    }
}
