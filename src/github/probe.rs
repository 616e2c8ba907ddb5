//! Default-branch prober.
//!
//! Resolves a repository's default branch (and confirms existence) from the
//! smart HTTP ref advertisement at
//! `https://github.com/{owner}/{repo}.git/info/refs?service=git-upload-pack`.
//! The fetch is always unauthenticated and is not accounted against the REST
//! rate budget, so it is the cheap path for public repositories. A private
//! or absent repository is indistinguishable here: both report not-found.
//!
//! # Packet-line format
//!
//! Each line of the advertisement is prefixed with a 4-hex-digit length that
//! includes the prefix itself; `0000` is a flush packet. The first ref line
//! carries a NUL-separated capability list, and the default branch is the
//! target of the `symref=HEAD:refs/heads/<branch>` capability.

use crate::types::{Owner, Repo};
use std::io::Read;
use std::time::Duration;
use thiserror::Error;

const PROBE_BASE: &str = "https://github.com";
const USER_AGENT: &str = "ghmeta";

// Advertisements for huge repos run to a few MB of refs; cap reads well
// above that.
const MAX_ADVERTISEMENT_BYTES: u64 = 64 * 1024 * 1024;

/// Errors from the ref-advertisement probe.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProbeError {
    /// The repository does not exist, or is private. The unauthenticated
    /// probe cannot tell the two apart.
    #[error("repository not found or not public")]
    NotFound,
    /// Any other non-2xx answer from the probe endpoint.
    #[error("probe endpoint returned status {0}")]
    Status(u16),
    /// The endpoint could not be reached.
    #[error("transport error: {0}")]
    Transport(String),
    /// The advertisement did not parse, or carried no HEAD symref.
    #[error("malformed ref advertisement: {0}")]
    Malformed(String),
}

/// The HEAD the remote advertises: its symbolic target branch and the
/// commit it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvertisedHead {
    pub branch: String,
    pub commit: String,
}

/// The prober collaborator, seam for tests.
pub trait RefProber: Send + Sync {
    fn advertised_head(&self, owner: &Owner, repo: &Repo) -> Result<AdvertisedHead, ProbeError>;
}

/// Production [`RefProber`] over smart HTTP.
pub struct SmartHttpProber {
    agent: ureq::Agent,
    base_url: String,
}

impl Default for SmartHttpProber {
    fn default() -> Self {
        Self::new()
    }
}

impl SmartHttpProber {
    pub fn new() -> Self {
        Self {
            agent: ureq::builder().timeout(Duration::from_secs(10)).build(),
            base_url: PROBE_BASE.to_string(),
        }
    }
}

impl RefProber for SmartHttpProber {
    fn advertised_head(&self, owner: &Owner, repo: &Repo) -> Result<AdvertisedHead, ProbeError> {
        let url = format!(
            "{}/{}/{}.git/info/refs?service=git-upload-pack",
            self.base_url, owner, repo
        );

        let response = match self.agent.get(&url).set("User-Agent", USER_AGENT).call() {
            Ok(response) => response,
            // 401 and 403 mean the repo needs credentials the probe never
            // sends, which to this caller is the same as absent.
            Err(ureq::Error::Status(401 | 403 | 404, _)) => return Err(ProbeError::NotFound),
            Err(ureq::Error::Status(code, _)) => return Err(ProbeError::Status(code)),
            Err(ureq::Error::Transport(e)) => return Err(ProbeError::Transport(e.to_string())),
        };

        let mut body = Vec::new();
        response
            .into_reader()
            .take(MAX_ADVERTISEMENT_BYTES)
            .read_to_end(&mut body)
            .map_err(|e| ProbeError::Transport(e.to_string()))?;

        let head = parse_advertised_head(&body)?;
        log::debug!("{}/{} advertises HEAD -> {}", owner, repo, head.branch);
        Ok(head)
    }
}

/// Split a raw advertisement into packet payloads, dropping flush and
/// delimiter packets.
fn pkt_payloads(data: &[u8]) -> Result<Vec<&[u8]>, ProbeError> {
    let mut payloads = Vec::new();
    let mut pos = 0;

    while pos < data.len() {
        if pos + 4 > data.len() {
            return Err(ProbeError::Malformed(format!(
                "trailing {} bytes are not a packet",
                data.len() - pos
            )));
        }
        let len_hex = std::str::from_utf8(&data[pos..pos + 4])
            .map_err(|_| ProbeError::Malformed("non-UTF-8 length prefix".to_string()))?;
        let pkt_len = usize::from_str_radix(len_hex, 16)
            .map_err(|_| ProbeError::Malformed(format!("invalid length prefix '{}'", len_hex)))?;

        match pkt_len {
            // Flush (0000) and the v2 delimiter/response-end specials carry
            // no payload.
            0..=2 => pos += 4,
            3 => {
                return Err(ProbeError::Malformed("invalid length 0003".to_string()));
            }
            n => {
                if pos + n > data.len() {
                    return Err(ProbeError::Malformed(format!(
                        "packet declares {} bytes but only {} remain",
                        n,
                        data.len() - pos
                    )));
                }
                payloads.push(&data[pos + 4..pos + n]);
                pos += n;
            }
        }
    }

    Ok(payloads)
}

/// Extract the advertised HEAD from an upload-pack ref advertisement.
///
/// The branch is reported exactly as the remote names it; legacy
/// repositories advertise defaults like "trunk" and this function makes no
/// assumption about the conventional name.
fn parse_advertised_head(data: &[u8]) -> Result<AdvertisedHead, ProbeError> {
    for payload in pkt_payloads(data)? {
        // The service-announcement comment precedes the first ref.
        if payload.first() == Some(&b'#') {
            continue;
        }

        let line = std::str::from_utf8(payload)
            .map_err(|_| ProbeError::Malformed("non-UTF-8 ref line".to_string()))?;
        let line = line.trim_end_matches('\n');

        let (refline, caps) = match line.split_once('\0') {
            Some(parts) => parts,
            // Only the first ref line carries capabilities; if we got past
            // it without a symref there is nothing more to find.
            None => break,
        };

        let (commit, name) = refline
            .split_once(' ')
            .ok_or_else(|| ProbeError::Malformed(format!("unparseable ref line '{}'", refline)))?;
        if name != "HEAD" && name != "capabilities^{}" {
            break;
        }

        for cap in caps.split(' ') {
            if let Some(target) = cap.strip_prefix("symref=HEAD:refs/heads/") {
                if target.is_empty() {
                    return Err(ProbeError::Malformed("empty symref target".to_string()));
                }
                return Ok(AdvertisedHead {
                    branch: target.to_string(),
                    commit: commit.to_string(),
                });
            }
        }
        break;
    }

    Err(ProbeError::Malformed(
        "no symref=HEAD capability advertised".to_string(),
    ))
}
