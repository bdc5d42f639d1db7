use crate::core::model::{METRIC_KEYS, MetricBundle, Project};
use crate::error::MetricsResult;
use crate::sonar::MetricsSource;
use serde::Deserialize;
use tracing::{debug, info};

pub const DEFAULT_BASE_URL: &str = "https://sonarcloud.io";
const SEARCH_PROJECTS_PATH: &str = "/api/components/search_projects";
const MEASURES_PATH: &str = "/api/measures/component";

#[derive(Debug, Clone)]
pub struct SonarCloudClient {
    http: reqwest::Client,
    base_url: String,
    organization: String,
    page_size: usize,
}

impl SonarCloudClient {
    pub fn new(
        base_url: impl Into<String>,
        organization: impl Into<String>,
        page_size: usize,
    ) -> MetricsResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("sonarboard/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            organization: organization.into(),
            page_size: page_size.clamp(1, 500),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_text(&self, path: &str, query: &[(&str, String)]) -> MetricsResult<String> {
        let url = self.url(path);
        debug!(%url, ?query, "GET");

        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.text().await?)
    }
}

impl MetricsSource for SonarCloudClient {
    fn name(&self) -> &'static str {
        "sonarcloud"
    }

    async fn list_projects(&self) -> MetricsResult<Vec<Project>> {
        let mut projects = Vec::new();
        let mut page = 1_usize;

        loop {
            let body = self
                .get_text(
                    SEARCH_PROJECTS_PATH,
                    &[
                        ("organization", self.organization.clone()),
                        ("ps", self.page_size.to_string()),
                        ("p", page.to_string()),
                    ],
                )
                .await?;
            let search = parse_search_page(&body)?;
            let fetched = search.components.len();
            projects.extend(search.components);

            if is_last_page(fetched, projects.len(), search.paging.as_ref()) {
                break;
            }
            page += 1;
        }

        info!(
            organization = %self.organization,
            count = projects.len(),
            "listed projects"
        );
        Ok(projects)
    }

    async fn fetch_measures(&self, key: &str) -> MetricsResult<Option<MetricBundle>> {
        let body = self
            .get_text(
                MEASURES_PATH,
                &[
                    ("component", key.to_string()),
                    ("metricKeys", METRIC_KEYS.join(",")),
                ],
            )
            .await?;
        parse_measures(&body).map(Some)
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub paging: Option<Paging>,
    pub components: Vec<Project>,
}

#[derive(Debug, Deserialize)]
pub struct Paging {
    pub total: usize,
}

/// An empty page, a page without paging info, or reaching `total` ends
/// the listing.
pub fn is_last_page(fetched: usize, collected: usize, paging: Option<&Paging>) -> bool {
    match paging {
        Some(paging) => fetched == 0 || collected >= paging.total,
        None => true,
    }
}

#[derive(Debug, Deserialize)]
struct MeasuresResponse {
    component: MeasuredComponent,
}

#[derive(Debug, Deserialize)]
struct MeasuredComponent {
    measures: Vec<Measure>,
}

#[derive(Debug, Deserialize)]
struct Measure {
    metric: String,
    #[serde(default)]
    value: Option<String>,
}

pub fn parse_search_page(body: &str) -> MetricsResult<SearchPage> {
    Ok(serde_json::from_str(body)?)
}

pub fn parse_measures(body: &str) -> MetricsResult<MetricBundle> {
    let response: MeasuresResponse = serde_json::from_str(body)?;
    Ok(MetricBundle::from_measures(
        response
            .component
            .measures
            .into_iter()
            .filter_map(|measure| measure.value.map(|value| (measure.metric, value))),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MetricsError;
    use pretty_assertions::assert_eq;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const SEARCH_BODY: &str = r#"{
        "paging": { "pageIndex": 1, "pageSize": 100, "total": 2 },
        "organizations": [{ "key": "studio", "name": "Studio" }],
        "components": [
            { "organization": "studio", "key": "studio_api", "name": "API",
              "isFavorite": false, "tags": [], "visibility": "public" },
            { "organization": "studio", "key": "studio_web", "name": "Web",
              "visibility": "public", "lastAnalysisDate": "2024-06-01T08:00:00+0000" }
        ]
    }"#;

    const MEASURES_BODY: &str = r#"{
        "component": {
            "key": "studio_api",
            "name": "API",
            "qualifier": "TRK",
            "measures": [
                { "metric": "bugs", "value": "2", "bestValue": false },
                { "metric": "coverage", "value": "84.7" },
                { "metric": "sqale_index", "value": "420" },
                { "metric": "security_rating", "value": "1.0", "bestValue": true },
                { "metric": "new_bugs", "periods": [{ "index": 1, "value": "0" }] }
            ]
        }
    }"#;

    #[test]
    fn search_page_yields_projects_and_paging() {
        let page = parse_search_page(SEARCH_BODY).unwrap();
        assert_eq!(page.paging.map(|p| p.total), Some(2));

        let keys: Vec<&str> = page.components.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["studio_api", "studio_web"]);
        assert_eq!(
            page.components[1].last_analysis_date.as_deref(),
            Some("2024-06-01T08:00:00+0000")
        );
    }

    #[test]
    fn measures_become_a_bundle() {
        let bundle = parse_measures(MEASURES_BODY).unwrap();
        assert_eq!(bundle.bugs, Some(2.0));
        assert_eq!(bundle.coverage, Some(84.7));
        assert_eq!(bundle.sqale_index, Some(420.0));
        assert_eq!(bundle.security_rating.as_deref(), Some("1.0"));
        assert_eq!(bundle.code_smells, None);
    }

    #[test]
    fn unexpected_shapes_are_unavailable() {
        assert!(parse_search_page(r#"{ "errors": [{ "msg": "nope" }] }"#).is_err());
        assert!(parse_measures(r#"{ "component": {} }"#).is_err());
        assert!(parse_measures("<html>").is_err());
    }

    #[test]
    fn base_url_is_normalised() {
        let client = SonarCloudClient::new("https://sonar.example.com/", "org", 100).unwrap();
        assert_eq!(
            client.url(MEASURES_PATH),
            "https://sonar.example.com/api/measures/component"
        );
    }

    #[test]
    fn listing_stops_at_total_or_empty_page() {
        let paging = Paging { total: 3 };
        assert!(!is_last_page(2, 2, Some(&paging)));
        assert!(is_last_page(1, 3, Some(&paging)));
        assert!(is_last_page(0, 2, Some(&paging)));
        assert!(is_last_page(5, 5, None));
    }

    /// Serves canned responses keyed by request path and query, one request
    /// per connection.
    async fn serve(routes: Vec<(&'static str, u16, &'static str)>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    return;
                };
                let mut request = Vec::new();
                let mut buf = [0_u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    let n = stream.read(&mut buf).await.unwrap_or(0);
                    if n == 0 {
                        break;
                    }
                    request.extend_from_slice(&buf[..n]);
                }

                let request = String::from_utf8_lossy(&request);
                let target = request.split_whitespace().nth(1).unwrap_or("");
                let (status, body) = routes
                    .iter()
                    .find(|(needle, _, _)| target.contains(needle))
                    .map_or((404, "{}"), |(_, status, body)| (*status, *body));

                let response = format!(
                    "HTTP/1.1 {status} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });

        format!("http://{addr}")
    }

    #[tokio::test]
    async fn list_projects_follows_every_page() {
        let base = serve(vec![
            (
                "p=1",
                200,
                r#"{ "paging": { "total": 3 }, "components": [
                    { "key": "a", "name": "A" }, { "key": "b", "name": "B" } ] }"#,
            ),
            (
                "p=2",
                200,
                r#"{ "paging": { "total": 3 }, "components": [ { "key": "c", "name": "C" } ] }"#,
            ),
        ])
        .await;

        let client = SonarCloudClient::new(base, "studio", 2).unwrap();
        let keys: Vec<String> = client
            .list_projects()
            .await
            .unwrap()
            .into_iter()
            .map(|project| project.key)
            .collect();

        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn server_errors_are_unavailable() {
        let base = serve(vec![("search_projects", 500, r#"{ "errors": [] }"#)]).await;

        let client = SonarCloudClient::new(base, "studio", 100).unwrap();
        let err = client.list_projects().await.unwrap_err();
        assert!(matches!(err, MetricsError::Unavailable { .. }));
    }

    #[tokio::test]
    async fn measures_are_fetched_per_component() {
        let base = serve(vec![("component=studio_api", 200, MEASURES_BODY)]).await;

        let client = SonarCloudClient::new(base, "studio", 100).unwrap();
        let bundle = client.fetch_measures("studio_api").await.unwrap().unwrap();
        assert_eq!(bundle.coverage, Some(84.7));
    }
}
