//! GitHub collaborators: the REST description endpoint and the
//! unauthenticated ref-advertisement prober.

mod api;
mod probe;

pub use api::{ApiError, GithubApi, OwnerPayload, RepoHost, RepoPayload};
pub use probe::{AdvertisedHead, ProbeError, RefProber, SmartHttpProber};
