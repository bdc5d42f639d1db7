pub mod model;
pub mod rank;
pub mod report;
pub mod rules;
pub mod score;

use crate::core::model::Project;
use crate::error::{MetricsError, MetricsResult};
use crate::sonar::MetricsSource;
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info, warn};

pub const DEFAULT_CONCURRENCY: usize = 8;

/// Lists every project, fetches each one's measures concurrently and scores
/// them. Output keeps the order the source listed projects in. The first
/// failure aborts the whole run; there are no partial results.
pub async fn collect_leaderboard<S>(source: &S, concurrency: usize) -> MetricsResult<Vec<Project>>
where
    S: MetricsSource + Sync,
{
    let projects = source.list_projects().await.inspect_err(|err| {
        warn!(
            source = source.name(),
            reason = err.reason(),
            "project list unavailable"
        );
    })?;
    info!(
        source = source.name(),
        count = projects.len(),
        "fetching measures"
    );

    let scored: Vec<Project> = stream::iter(projects)
        .map(move |project| async move {
            let measures = source
                .fetch_measures(&project.key)
                .await
                .inspect_err(|err| {
                    warn!(
                        project = %project.key,
                        reason = err.reason(),
                        "measures unavailable"
                    );
                })?;
            if measures.is_none() {
                debug!(project = %project.key, "no measures, leaving unscored");
            }

            Ok::<_, MetricsError>(score::score_project(Project {
                measures,
                ..project
            }))
        })
        .buffered(concurrency.max(1))
        .try_collect()
        .await?;

    info!(
        scored = scored.iter().filter(|p| p.score.is_some()).count(),
        total = scored.len(),
        "leaderboard ready"
    );
    Ok(scored)
}
