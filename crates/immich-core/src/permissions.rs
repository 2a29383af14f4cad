//! Capability discovery for an API key.
//!
//! The server's own description of the key (`/api-keys/me`) is trusted when
//! it carries a permission list. Otherwise a fixed table of read-only probes
//! is run and each successful probe contributes one tag. A failed probe
//! withholds its tag and never aborts the others; an empty result means "no
//! detectable capabilities", which includes a library that is simply empty.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::api::ImmichApi;
use crate::error::{ImmichError, ImmichResult};

pub const TAG_USER_READ: &str = "user.read";
pub const TAG_ASSET_READ: &str = "asset.read";
pub const TAG_ALBUM_READ: &str = "album.read";
pub const TAG_SERVER_ABOUT: &str = "server.about";

/// Page size for list probes. One item is enough to prove read access.
pub const PROBE_PAGE_SIZE: u32 = 1;

/// A set of opaque capability tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilitySet(BTreeSet<String>);

impl CapabilitySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(tag)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    fn insert(&mut self, tag: impl Into<String>) {
        self.0.insert(tag.into());
    }
}

impl<S: Into<String>> FromIterator<S> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tags: Vec<&str> = self.iter().collect();
        write!(f, "{{{}}}", tags.join(", "))
    }
}

/// One entry of the fallback probe table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Probe {
    CurrentUser,
    Assets,
    Albums,
    ServerAbout,
}

impl Probe {
    pub fn tag(self) -> &'static str {
        match self {
            Probe::CurrentUser => TAG_USER_READ,
            Probe::Assets => TAG_ASSET_READ,
            Probe::Albums => TAG_ALBUM_READ,
            Probe::ServerAbout => TAG_SERVER_ABOUT,
        }
    }

    /// Issue the probe call. `Ok(true)` means the call returned something.
    async fn run(self, api: &dyn ImmichApi) -> ImmichResult<bool> {
        match self {
            Probe::CurrentUser => api.fetch_current_user().await.map(|_| true),
            Probe::Assets => api
                .list_assets(PROBE_PAGE_SIZE)
                .await
                .map(|assets| !assets.is_empty()),
            Probe::Albums => api
                .list_albums(PROBE_PAGE_SIZE)
                .await
                .map(|albums| !albums.is_empty()),
            Probe::ServerAbout => api.fetch_server_about().await.map(|_| true),
        }
    }
}

/// Where a [`CapabilitySet`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilitySource {
    /// Reported by the server for this key.
    Authoritative,
    /// Inferred from probe calls.
    Empirical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeReport {
    pub source: CapabilitySource,
    pub capabilities: CapabilitySet,
}

/// Probing was cancelled before it finished; no partial set is returned.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Permission probing cancelled")]
pub struct ProbeCancelled;

/// Infers the capabilities of the credential behind an [`ImmichApi`].
#[derive(Debug, Clone)]
pub struct PermissionProber {
    probes: Vec<Probe>,
}

impl Default for PermissionProber {
    fn default() -> Self {
        Self {
            probes: Self::DEFAULT_PROBES.to_vec(),
        }
    }
}

impl PermissionProber {
    pub const DEFAULT_PROBES: [Probe; 4] = [
        Probe::CurrentUser,
        Probe::Assets,
        Probe::Albums,
        Probe::ServerAbout,
    ];

    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom probe table. Execution follows the given order.
    pub fn with_probes(probes: Vec<Probe>) -> Self {
        Self { probes }
    }

    pub fn probes(&self) -> &[Probe] {
        &self.probes
    }

    pub async fn probe_permissions(
        &self,
        api: &dyn ImmichApi,
        cancel: &CancellationToken,
    ) -> Result<CapabilitySet, ProbeCancelled> {
        self.probe_report(api, cancel)
            .await
            .map(|report| report.capabilities)
    }

    /// Like [`Self::probe_permissions`], also reporting which path answered.
    pub async fn probe_report(
        &self,
        api: &dyn ImmichApi,
        cancel: &CancellationToken,
    ) -> Result<ProbeReport, ProbeCancelled> {
        let described = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ProbeCancelled),
            result = api.describe_credential() => result,
        };

        match described {
            Ok(record) => match record.permissions {
                Some(permissions) => {
                    let capabilities: CapabilitySet = permissions.into_iter().collect();
                    tracing::debug!(%capabilities, "Using permissions reported by /api-keys/me");
                    return Ok(ProbeReport {
                        source: CapabilitySource::Authoritative,
                        capabilities,
                    });
                }
                None => {
                    let err = ImmichError::MalformedResponse {
                        endpoint: "/api-keys/me".to_string(),
                        reason: "no permissions list".to_string(),
                    };
                    tracing::info!("{err}; falling back to probing");
                }
            },
            Err(e) => {
                tracing::info!(kind = e.kind(), "Credential description unavailable ({e}); falling back to probing");
            }
        }

        let mut capabilities = CapabilitySet::new();
        for probe in &self.probes {
            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ProbeCancelled),
                outcome = probe.run(api) => outcome,
            };

            match outcome {
                Ok(true) => {
                    tracing::debug!(probe = ?probe, tag = probe.tag(), "Probe succeeded");
                    capabilities.insert(probe.tag());
                }
                Ok(false) => {
                    tracing::debug!(probe = ?probe, tag = probe.tag(), "Probe returned nothing");
                }
                Err(e) => {
                    tracing::debug!(probe = ?probe, tag = probe.tag(), kind = e.kind(), "Probe failed: {e}");
                }
            }
        }

        tracing::info!(%capabilities, "Inferred capabilities from probes");
        Ok(ProbeReport {
            source: CapabilitySource::Empirical,
            capabilities,
        })
    }
}

/// Probe with the default table.
pub async fn probe_permissions(
    api: &dyn ImmichApi,
    cancel: &CancellationToken,
) -> Result<CapabilitySet, ProbeCancelled> {
    PermissionProber::default()
        .probe_permissions(api, cancel)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capability_set_has_membership_semantics() {
        let set: CapabilitySet = ["album.read", "asset.read", "album.read"]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 2);
        assert!(set.contains("asset.read"));
        assert!(!set.contains("user.read"));
        assert_eq!(set.to_string(), "{album.read, asset.read}");
    }

    #[test]
    fn capability_set_serializes_as_list() {
        let set: CapabilitySet = ["server.about", "user.read"].into_iter().collect();
        assert_eq!(
            serde_json::to_value(&set).unwrap(),
            serde_json::json!(["server.about", "user.read"])
        );
    }

    #[test]
    fn default_table_covers_every_tag_once() {
        let tags: BTreeSet<&str> = PermissionProber::DEFAULT_PROBES
            .iter()
            .map(|p| p.tag())
            .collect();
        assert_eq!(tags.len(), PermissionProber::DEFAULT_PROBES.len());
        assert!(tags.contains(TAG_USER_READ));
        assert!(tags.contains(TAG_SERVER_ABOUT));
    }
}
