use kube::core::gvk::ParseGroupVersionError;
use thiserror::Error;

/// Fatal errors from discovery.
///
/// Per-kind list failures during aggregation are deliberately not here;
/// they are collected on [`crate::lister::Aggregation::skipped`] instead.
#[derive(Error, Debug)]
pub enum Error {
    /// A discovery round trip against the apiserver failed.
    #[error("discovery request failed: {0}")]
    Discovery(#[source] kube::Error),

    /// The apiserver reported a groupVersion string we could not parse.
    #[error("invalid group/version in discovery response: {0}")]
    InvalidGroupVersion(#[from] ParseGroupVersionError),
}
