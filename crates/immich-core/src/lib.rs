//! Typed Immich API client and credential permission probing.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod permissions;
pub mod types;

pub use api::{validate_id, ImmichApi};
pub use client::ImmichClient;
pub use config::ImmichConfig;
pub use error::{ImmichError, ImmichResult};
pub use permissions::{
    probe_permissions, CapabilitySet, CapabilitySource, PermissionProber, Probe, ProbeCancelled,
    ProbeReport,
};
pub use types::*;
