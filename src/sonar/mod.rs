use crate::core::model::{MetricBundle, Project};
use crate::error::MetricsResult;
use std::future::Future;

pub mod client;
pub mod snapshot;

pub use client::SonarCloudClient;
pub use snapshot::SnapshotSource;

/// Where project lists and per-project measures come from.
pub trait MetricsSource {
    fn name(&self) -> &'static str;

    fn list_projects(&self) -> impl Future<Output = MetricsResult<Vec<Project>>> + Send;

    /// `None` means the source has no measures at all for `key`.
    fn fetch_measures(
        &self,
        key: &str,
    ) -> impl Future<Output = MetricsResult<Option<MetricBundle>>> + Send;
}
