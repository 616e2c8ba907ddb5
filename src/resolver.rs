//! Visibility-aware repository resolution.
//!
//! The resolver answers "what repository lives at this path" from a shared
//! TTL cache when it safely can, and from the GitHub API otherwise. The same
//! path can legitimately resolve differently per actor (found-public,
//! found-private, not-found), so the cache holds only actor-invariant
//! outcomes: public repositories, and not-found results observed without
//! credentials. The read side is asymmetric to match: an authenticated
//! caller never trusts a cached not-found, because the marker may only mean
//! the *anonymous* view couldn't see the repo.

use crate::actor::Actor;
use crate::cache::TtlCache;
use crate::github::{
    AdvertisedHead, ApiError, GithubApi, ProbeError, RefProber, RepoHost, RepoPayload,
    SmartHttpProber,
};
use crate::types::{ParseError, RepoPath};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// The only host this resolver knows how to talk to.
pub const GITHUB_HOST: &str = "github.com";

/// Errors returned by [`Resolver::get_repo`].
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The repository is absent, or invisible to the requesting actor.
    #[error("repository not found: {0}")]
    NotFound(String),
    /// The path named a host other than github.com.
    #[error("unsupported host: {0}")]
    UnsupportedHost(String),
    /// The path did not parse as `<host>/<owner>/<name>`.
    #[error(transparent)]
    Path(#[from] ParseError),
    /// The API was unreachable, rate limited, or answered with a server
    /// error. Retryable; never cached.
    #[error("github api error: {0}")]
    Upstream(#[source] ApiError),
    /// The probe fallback failed for a reason other than not-found.
    #[error("probe failed: {0}")]
    Probe(#[source] ProbeError),
    /// The upstream payload had an unexpected shape. Fatal; never cached.
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl ResolveError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ResolveError::NotFound(_))
    }

    /// Whether a caller may retry the identical request.
    pub fn is_transient(&self) -> bool {
        matches!(self, ResolveError::Upstream(_) | ResolveError::Probe(_))
    }
}

/// A resolved repository. Constructed fresh on every resolution and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoRecord {
    pub uri: String,
    pub owner: String,
    pub name: String,
    pub default_branch: String,
    pub private: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_github_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clone_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub fork: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// What a resolution learned about a path. This is the cache value: positive
/// entries carry the record, negative entries just the fact of absence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Found(RepoRecord),
    NotFound,
}

/// Resolves repository paths against GitHub through the shared cache.
pub struct Resolver {
    cache: TtlCache<Lookup>,
    host: Box<dyn RepoHost>,
    prober: Box<dyn RefProber>,
}

impl Resolver {
    /// Wire a resolver from explicit collaborators. Tests inject mocks here;
    /// production wiring goes through [`Resolver::github`].
    pub fn new(cache: TtlCache<Lookup>, host: Box<dyn RepoHost>, prober: Box<dyn RefProber>) -> Self {
        Self {
            cache,
            host,
            prober,
        }
    }

    /// Production resolver: REST API plus smart-HTTP prober, cache entries
    /// namespaced under `namespace` and expiring after `ttl`.
    pub fn github(namespace: &str, ttl: Duration) -> Self {
        Self::new(
            TtlCache::new(namespace, ttl),
            Box::new(GithubApi::new()),
            Box::new(SmartHttpProber::new()),
        )
    }

    /// Resolve `path` (`github.com/<owner>/<name>`) on behalf of `actor`.
    ///
    /// Exactly one of three things comes back: a fresh record, a not-found
    /// error, or a propagated upstream error. Whether the outcome was
    /// cache-eligible is decided here and is independent of whether it is
    /// retry-eligible.
    pub fn get_repo(&self, actor: &Actor, path: &str) -> Result<RepoRecord, ResolveError> {
        let path: RepoPath = path.parse()?;
        if path.host != GITHUB_HOST {
            return Err(ResolveError::UnsupportedHost(path.host));
        }
        let key = path.uri();

        match self.cache.get(&key) {
            Some(Lookup::Found(record)) => {
                log::debug!("cache hit for {}", key);
                return Ok(record);
            }
            Some(Lookup::NotFound) => {
                if actor.is_anonymous() {
                    log::debug!("cached not-found for {}", key);
                    return Err(ResolveError::NotFound(key));
                }
                // The marker only proves the anonymous view saw nothing; this
                // actor's credentials may reveal the repo. Revalidate.
            }
            None => {}
        }

        let outcome = self.fetch(actor, &path)?;

        match &outcome {
            Lookup::Found(record) => {
                if !record.private {
                    // A public repository looks identical to every caller.
                    self.cache.set(&key, outcome.clone());
                }
                // A private hit is visibility-dependent; revalidated always.
            }
            Lookup::NotFound => {
                // Shareable only as the least-privileged observation: no
                // anonymous caller can ever see more than another one.
                if actor.is_anonymous() {
                    self.cache.set(&key, Lookup::NotFound);
                }
            }
        }

        match outcome {
            Lookup::Found(record) => Ok(record),
            Lookup::NotFound => Err(ResolveError::NotFound(key)),
        }
    }

    fn fetch(&self, actor: &Actor, path: &RepoPath) -> Result<Lookup, ResolveError> {
        match self.host.describe(&path.owner, &path.repo, actor.token()) {
            Ok(payload) => Ok(Lookup::Found(record_from_payload(payload)?)),
            Err(ApiError::NotFound) => Ok(Lookup::NotFound),
            Err(ApiError::RateLimited) if actor.is_anonymous() => {
                // The anonymous REST budget is shared across every caller;
                // the ref advertisement is free and authoritative for public
                // repos, so resolve through it instead. Credentialed calls
                // never take this path: the probe cannot see private repos.
                log::info!("rate limited on {}, probing ref advertisement", path);
                match self.prober.advertised_head(&path.owner, &path.repo) {
                    Ok(head) => Ok(Lookup::Found(record_from_probe(path, head))),
                    Err(ProbeError::NotFound) => Ok(Lookup::NotFound),
                    Err(e) => Err(ResolveError::Probe(e)),
                }
            }
            Err(ApiError::Decode(msg)) => Err(ResolveError::Malformed(msg)),
            Err(e) => Err(ResolveError::Upstream(e)),
        }
    }
}

/// Normalize an API description into a record. The host's `full_name` is
/// canonical (it reflects renames the requested path may predate).
fn record_from_payload(payload: RepoPayload) -> Result<RepoRecord, ResolveError> {
    let (owner, name) = payload.full_name.split_once('/').ok_or_else(|| {
        ResolveError::Malformed(format!("full_name '{}' has no owner", payload.full_name))
    })?;

    Ok(RepoRecord {
        uri: format!("{}/{}", GITHUB_HOST, payload.full_name),
        owner: owner.to_string(),
        name: name.to_string(),
        default_branch: payload.default_branch.unwrap_or_default(),
        private: payload.private,
        github_id: Some(payload.id),
        owner_github_id: Some(payload.owner.id),
        clone_url: Some(payload.clone_url),
        description: payload.description,
        fork: payload.fork,
        language: payload.language,
    })
}

/// Minimal record for a repository confirmed public by the prober. The probe
/// endpoint is unauthenticated, so anything it can see is public by
/// construction.
fn record_from_probe(path: &RepoPath, head: AdvertisedHead) -> RepoRecord {
    RepoRecord {
        uri: path.uri(),
        owner: path.owner.to_string(),
        name: path.repo.to_string(),
        default_branch: head.branch,
        private: false,
        github_id: None,
        owner_github_id: None,
        clone_url: None,
        description: None,
        fork: false,
        language: None,
    }
}
