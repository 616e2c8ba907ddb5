//! Shared types for ghmeta

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for parsing failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("value cannot be empty")]
    Empty,
    #[error("invalid character in value: {0}")]
    InvalidCharacter(char),
    #[error("value cannot start with '{0}'")]
    InvalidStart(char),
    #[error("value cannot end with '{0}'")]
    InvalidEnd(char),
    #[error("expected <host>/<owner>/<name>, got '{0}'")]
    MalformedPath(String),
    #[error("invalid host: {0}")]
    InvalidHost(String),
    #[error("invalid owner: {0}")]
    InvalidOwner(#[source] Box<ParseError>),
    #[error("invalid repo: {0}")]
    InvalidRepo(#[source] Box<ParseError>),
}

/// A GitHub owner (user or organization)
///
/// Validation rules:
/// - Non-empty
/// - Alphanumeric characters and hyphens only
/// - Cannot start or end with a hyphen
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Owner(String);

impl Owner {
    /// Returns the owner name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Owner {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseError::Empty);
        }

        if s.starts_with('-') {
            return Err(ParseError::InvalidStart('-'));
        }

        if s.ends_with('-') {
            return Err(ParseError::InvalidEnd('-'));
        }

        for c in s.chars() {
            if !c.is_ascii_alphanumeric() && c != '-' {
                return Err(ParseError::InvalidCharacter(c));
            }
        }

        Ok(Owner(s.to_string()))
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A GitHub repository name
///
/// Validation rules:
/// - Non-empty
/// - Alphanumeric characters, hyphens, underscores, and dots only
/// - Cannot start with a dot
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Repo(String);

impl Repo {
    /// Returns the repository name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Repo {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseError::Empty);
        }

        if s.starts_with('.') {
            return Err(ParseError::InvalidStart('.'));
        }

        for c in s.chars() {
            if !c.is_ascii_alphanumeric() && c != '-' && c != '_' && c != '.' {
                return Err(ParseError::InvalidCharacter(c));
            }
        }

        Ok(Repo(s.to_string()))
    }
}

impl fmt::Display for Repo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A repository path in `<host>/<owner>/<name>` form, e.g.
/// `github.com/gorilla/mux`. This is the logical cache key for a resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoPath {
    pub host: String,
    pub owner: Owner,
    pub repo: Repo,
}

impl RepoPath {
    /// Creates a new RepoPath from host, owner, and repo
    pub fn new(host: impl Into<String>, owner: Owner, repo: Repo) -> Self {
        Self {
            host: host.into(),
            owner,
            repo,
        }
    }

    /// The canonical URI form, identical to `Display`
    pub fn uri(&self) -> String {
        self.to_string()
    }
}

impl FromStr for RepoPath {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, '/');
        let (host, owner_str, repo_str) = match (parts.next(), parts.next(), parts.next()) {
            (Some(h), Some(o), Some(r)) => (h, o, r),
            _ => return Err(ParseError::MalformedPath(s.to_string())),
        };

        if host.is_empty() || !host.contains('.') {
            return Err(ParseError::InvalidHost(host.to_string()));
        }

        let owner = owner_str
            .parse::<Owner>()
            .map_err(|e| ParseError::InvalidOwner(Box::new(e)))?;
        let repo = repo_str
            .parse::<Repo>()
            .map_err(|e| ParseError::InvalidRepo(Box::new(e)))?;

        Ok(RepoPath {
            host: host.to_string(),
            owner,
            repo,
        })
    }
}

impl fmt::Display for RepoPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.host, self.owner, self.repo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod owner_tests {
        use super::*;

        #[test]
        fn valid_owner_simple() {
            let owner: Owner = "gorilla".parse().unwrap();
            assert_eq!(owner.as_str(), "gorilla");
        }

        #[test]
        fn valid_owner_with_hyphen() {
            let owner: Owner = "my-org".parse().unwrap();
            assert_eq!(owner.as_str(), "my-org");
        }

        #[test]
        fn invalid_owner_empty() {
            let result = "".parse::<Owner>();
            assert_eq!(result, Err(ParseError::Empty));
        }

        #[test]
        fn invalid_owner_leading_hyphen() {
            let result = "-user".parse::<Owner>();
            assert_eq!(result, Err(ParseError::InvalidStart('-')));
        }

        #[test]
        fn invalid_owner_trailing_hyphen() {
            let result = "user-".parse::<Owner>();
            assert_eq!(result, Err(ParseError::InvalidEnd('-')));
        }

        #[test]
        fn invalid_owner_underscore() {
            let result = "my_org".parse::<Owner>();
            assert_eq!(result, Err(ParseError::InvalidCharacter('_')));
        }

        #[test]
        fn invalid_owner_slash() {
            let result = "my/org".parse::<Owner>();
            assert_eq!(result, Err(ParseError::InvalidCharacter('/')));
        }
    }

    mod repo_tests {
        use super::*;

        #[test]
        fn valid_repo_simple() {
            let repo: Repo = "mux".parse().unwrap();
            assert_eq!(repo.as_str(), "mux");
        }

        #[test]
        fn valid_repo_complex() {
            let repo: Repo = "my-repo_v2.0".parse().unwrap();
            assert_eq!(repo.as_str(), "my-repo_v2.0");
        }

        #[test]
        fn invalid_repo_empty() {
            let result = "".parse::<Repo>();
            assert_eq!(result, Err(ParseError::Empty));
        }

        #[test]
        fn invalid_repo_leading_dot() {
            let result = ".hidden".parse::<Repo>();
            assert_eq!(result, Err(ParseError::InvalidStart('.')));
        }

        #[test]
        fn invalid_repo_space() {
            let result = "my repo".parse::<Repo>();
            assert_eq!(result, Err(ParseError::InvalidCharacter(' ')));
        }
    }

    mod repo_path_tests {
        use super::*;

        #[test]
        fn valid_repo_path() {
            let path: RepoPath = "github.com/gorilla/mux".parse().unwrap();
            assert_eq!(path.host, "github.com");
            assert_eq!(path.owner.as_str(), "gorilla");
            assert_eq!(path.repo.as_str(), "mux");
        }

        #[test]
        fn repo_path_display_roundtrip() {
            let path: RepoPath = "github.com/apache/log4j".parse().unwrap();
            assert_eq!(path.to_string(), "github.com/apache/log4j");
            assert_eq!(path.uri(), "github.com/apache/log4j");
        }

        #[test]
        fn invalid_repo_path_missing_segments() {
            let result = "gorilla/mux".parse::<RepoPath>();
            assert!(matches!(result, Err(ParseError::MalformedPath(_))));

            let result = "mux".parse::<RepoPath>();
            assert!(matches!(result, Err(ParseError::MalformedPath(_))));
        }

        #[test]
        fn invalid_repo_path_bad_host() {
            let result = "localhost/gorilla/mux".parse::<RepoPath>();
            assert!(matches!(result, Err(ParseError::InvalidHost(_))));

            let result = "/gorilla/mux".parse::<RepoPath>();
            assert!(matches!(result, Err(ParseError::InvalidHost(_))));
        }

        #[test]
        fn invalid_repo_path_bad_owner() {
            let result = "github.com/-bad/mux".parse::<RepoPath>();
            assert!(matches!(result, Err(ParseError::InvalidOwner(_))));
        }

        #[test]
        fn invalid_repo_path_bad_repo() {
            // The third segment keeps any remaining slashes, which the repo
            // name validation then rejects.
            let result = "github.com/owner/repo/extra".parse::<RepoPath>();
            assert!(matches!(result, Err(ParseError::InvalidRepo(_))));
        }

        #[test]
        fn repo_path_new() {
            let owner: Owner = "gorilla".parse().unwrap();
            let repo: Repo = "mux".parse().unwrap();
            let path = RepoPath::new("github.com", owner, repo);
            assert_eq!(path.to_string(), "github.com/gorilla/mux");
        }
    }
}
