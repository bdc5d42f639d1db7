use crate::core::model::{MetricBundle, Project};
use crate::error::MetricsResult;
use crate::sonar::MetricsSource;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Projects (and optionally their measures) read from a JSON array, in the
/// same shape the service returns components.
#[derive(Debug, Clone, Default)]
pub struct SnapshotSource {
    projects: Vec<Project>,
    measures: HashMap<String, MetricBundle>,
}

impl SnapshotSource {
    pub fn from_path(path: &Path) -> MetricsResult<Self> {
        let raw = fs::read_to_string(path)?;
        debug!(path = %path.display(), bytes = raw.len(), "read snapshot");
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> MetricsResult<Self> {
        let projects: Vec<Project> = serde_json::from_str(raw)?;
        Ok(Self::from_projects(projects))
    }

    pub fn from_projects(projects: Vec<Project>) -> Self {
        let mut measures = HashMap::new();
        let projects = projects
            .into_iter()
            .map(|mut project| {
                if let Some(bundle) = project.measures.take() {
                    measures.insert(project.key.clone(), bundle);
                }
                project.score = None;
                project
            })
            .collect();

        Self { projects, measures }
    }
}

impl MetricsSource for SnapshotSource {
    fn name(&self) -> &'static str {
        "snapshot"
    }

    async fn list_projects(&self) -> MetricsResult<Vec<Project>> {
        Ok(self.projects.clone())
    }

    async fn fetch_measures(&self, key: &str) -> MetricsResult<Option<MetricBundle>> {
        Ok(self.measures.get(key).cloned())
    }
}
