use crate::core::model::Project;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

pub const PODIUM_SIZE: usize = 3;
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Descending by total. Ties keep fetch order; unscored projects go last.
pub fn rank_by_total(projects: &[Project]) -> Vec<&Project> {
    let mut ranked: Vec<&Project> = projects.iter().collect();
    ranked.sort_by(|a, b| compare_missing_last(a.total(), b.total(), true));
    ranked
}

#[derive(Debug, Clone, Serialize)]
pub struct PodiumEntry<'a> {
    pub place: usize,
    pub project: &'a Project,
}

pub fn podium(projects: &[Project]) -> Vec<PodiumEntry<'_>> {
    rank_by_total(projects)
        .into_iter()
        .filter(|project| project.score.is_some())
        .take(PODIUM_SIZE)
        .enumerate()
        .map(|(idx, project)| PodiumEntry {
            place: idx + 1,
            project,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum SortColumn {
    Name,
    #[default]
    Score,
    Coverage,
    Bugs,
    Vulnerabilities,
    CodeSmells,
}

impl SortColumn {
    pub fn default_descending(self) -> bool {
        !matches!(self, Self::Name)
    }

    fn numeric_value(self, project: &Project) -> Option<f64> {
        let measures = project.measures.as_ref();
        match self {
            Self::Name => None,
            Self::Score => project.total().map(f64::from),
            Self::Coverage => measures.and_then(|m| m.coverage),
            Self::Bugs => measures.and_then(|m| m.bugs),
            Self::Vulnerabilities => measures.and_then(|m| m.vulnerabilities),
            Self::CodeSmells => measures.and_then(|m| m.code_smells),
        }
    }

    fn compare(self, a: &Project, b: &Project, descending: bool) -> Ordering {
        match self {
            Self::Name => {
                let ordering = a.name.to_lowercase().cmp(&b.name.to_lowercase());
                if descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            }
            _ => compare_missing_last(
                self.numeric_value(a),
                self.numeric_value(b),
                descending,
            ),
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => write!(f, "Project Name"),
            Self::Score => write!(f, "Total Score"),
            Self::Coverage => write!(f, "Coverage"),
            Self::Bugs => write!(f, "Bugs"),
            Self::Vulnerabilities => write!(f, "Vulnerabilities"),
            Self::CodeSmells => write!(f, "Code Smells"),
        }
    }
}

fn compare_missing_last<T: PartialOrd>(a: Option<T>, b: Option<T>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => {
            let ordering = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
            if descending {
                ordering.reverse()
            } else {
                ordering
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableQuery {
    pub search: Option<String>,
    pub sort: SortColumn,
    pub descending: bool,
    /// Zero-based.
    pub page: usize,
    pub page_size: usize,
}

impl Default for TableQuery {
    fn default() -> Self {
        Self {
            search: None,
            sort: SortColumn::Score,
            descending: true,
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl TableQuery {
    /// Case-insensitive substring match on name or key.
    pub fn matches(&self, project: &Project) -> bool {
        let Some(needle) = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|needle| !needle.is_empty())
        else {
            return true;
        };

        let needle = needle.to_lowercase();
        project.name.to_lowercase().contains(&needle)
            || project.key.to_lowercase().contains(&needle)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TablePage<'a> {
    pub rows: Vec<&'a Project>,
    pub page_index: usize,
    pub page_count: usize,
    pub page_size: usize,
    pub total_rows: usize,
    pub sort: SortColumn,
    pub descending: bool,
}

pub fn query_table<'a>(projects: &'a [Project], query: &TableQuery) -> TablePage<'a> {
    let mut rows: Vec<&Project> = projects
        .iter()
        .filter(|project| query.matches(project))
        .collect();
    rows.sort_by(|a, b| query.sort.compare(a, b, query.descending));

    let page_size = query.page_size.max(1);
    let total_rows = rows.len();
    let page_count = total_rows.div_ceil(page_size).max(1);
    let page_index = query.page.min(page_count - 1);

    let rows = rows
        .into_iter()
        .skip(page_index * page_size)
        .take(page_size)
        .collect();

    TablePage {
        rows,
        page_index,
        page_count,
        page_size,
        total_rows,
        sort: query.sort,
        descending: query.descending,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{CompositeScore, MetricBundle};
    use pretty_assertions::assert_eq;

    fn scored(key: &str, name: &str, total: u32) -> Project {
        Project {
            score: Some(CompositeScore {
                total,
                ..CompositeScore::default()
            }),
            ..Project::new(key, name)
        }
    }

    fn with_coverage(mut project: Project, coverage: Option<f64>) -> Project {
        project.measures = Some(MetricBundle {
            coverage,
            ..MetricBundle::default()
        });
        project
    }

    fn keys(rows: &[&Project]) -> Vec<String> {
        rows.iter().map(|project| project.key.clone()).collect()
    }

    #[test]
    fn ties_keep_fetch_order() {
        let projects = vec![
            scored("a", "A", 90),
            scored("b", "B", 95),
            scored("c", "C", 95),
        ];

        let places: Vec<(usize, &str)> = podium(&projects)
            .iter()
            .map(|entry| (entry.place, entry.project.key.as_str()))
            .collect();

        assert_eq!(places, vec![(1, "b"), (2, "c"), (3, "a")]);
    }

    #[test]
    fn unscored_projects_rank_last_and_miss_the_podium() {
        let projects = vec![
            Project::new("none", "Unscored"),
            scored("low", "Low", 10),
            scored("high", "High", 70),
        ];

        assert_eq!(
            keys(&rank_by_total(&projects)),
            vec!["high", "low", "none"]
        );

        let podium = podium(&projects);
        assert_eq!(podium.len(), 2);
        assert!(podium.iter().all(|entry| entry.project.key != "none"));
    }

    #[test]
    fn podium_holds_at_most_three() {
        let projects: Vec<Project> = (0..6)
            .map(|idx| scored(&format!("p{idx}"), "P", idx * 10))
            .collect();
        let podium = podium(&projects);
        assert_eq!(podium.len(), PODIUM_SIZE);
        assert_eq!(podium[0].project.key, "p5");
    }

    #[test]
    fn default_query_sorts_by_total_descending_with_missing_last() {
        let projects = vec![
            Project::new("none", "Unscored"),
            scored("mid", "Mid", 60),
            scored("top", "Top", 99),
        ];

        let page = query_table(&projects, &TableQuery::default());
        assert_eq!(keys(&page.rows), vec!["top", "mid", "none"]);
        assert_eq!(page.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn missing_values_stay_last_when_ascending() {
        let projects = vec![
            with_coverage(scored("none", "N", 0), None),
            with_coverage(scored("high", "H", 0), Some(90.0)),
            with_coverage(scored("low", "L", 0), Some(10.0)),
        ];

        let query = TableQuery {
            sort: SortColumn::Coverage,
            descending: false,
            ..TableQuery::default()
        };
        assert_eq!(
            keys(&query_table(&projects, &query).rows),
            vec!["low", "high", "none"]
        );
    }

    #[test]
    fn name_sort_ignores_case() {
        let projects = vec![
            scored("1", "beta", 0),
            scored("2", "Alpha", 0),
            scored("3", "gamma", 0),
        ];

        let query = TableQuery {
            sort: SortColumn::Name,
            descending: SortColumn::Name.default_descending(),
            ..TableQuery::default()
        };
        assert_eq!(
            keys(&query_table(&projects, &query).rows),
            vec!["2", "1", "3"]
        );
    }

    #[test]
    fn search_matches_name_or_key_case_insensitively() {
        let projects = vec![
            scored("org_payments", "Payments API", 50),
            scored("org_web", "Storefront", 50),
            scored("org_cli", "Tooling", 50),
        ];

        let search = |needle: &str| {
            let query = TableQuery {
                search: Some(needle.to_string()),
                ..TableQuery::default()
            };
            keys(&query_table(&projects, &query).rows)
        };

        assert_eq!(search("payments"), vec!["org_payments"]);
        assert_eq!(search("FRONT"), vec!["org_web"]);
        assert_eq!(search("_cli"), vec!["org_cli"]);
        assert_eq!(search("   ").len(), 3);
        assert!(search("missing").is_empty());
    }

    #[test]
    fn pages_split_rows_and_clamp_index() {
        let projects: Vec<Project> = (0..23)
            .map(|idx| scored(&format!("p{idx:02}"), "P", 100 - idx))
            .collect();

        let first = query_table(&projects, &TableQuery::default());
        assert_eq!(first.rows.len(), 10);
        assert_eq!(first.page_count, 3);
        assert_eq!(first.total_rows, 23);

        let last = query_table(
            &projects,
            &TableQuery {
                page: 2,
                ..TableQuery::default()
            },
        );
        assert_eq!(keys(&last.rows), vec!["p20", "p21", "p22"]);

        let beyond = query_table(
            &projects,
            &TableQuery {
                page: 40,
                ..TableQuery::default()
            },
        );
        assert_eq!(beyond.page_index, 2);
    }

    #[test]
    fn empty_result_still_has_one_page() {
        let page = query_table(&[], &TableQuery::default());
        assert!(page.rows.is_empty());
        assert_eq!(page.page_count, 1);
        assert_eq!(page.page_index, 0);
    }
}
