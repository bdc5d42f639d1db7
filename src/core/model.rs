use crate::core::rules::Category;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Metric keys requested from the analysis service, in request order.
pub const METRIC_KEYS: [&str; 11] = [
    "bugs",
    "vulnerabilities",
    "code_smells",
    "coverage",
    "duplicated_lines_density",
    "ncloc",
    "reliability_rating",
    "security_rating",
    "sqale_rating",
    "sqale_index",
    "complexity",
];

/// Raw measurements for one project. The service reports every value as a
/// string; anything that does not parse is treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricBundle {
    #[serde(
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub bugs: Option<f64>,
    #[serde(
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub vulnerabilities: Option<f64>,
    #[serde(
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub code_smells: Option<f64>,
    #[serde(
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub coverage: Option<f64>,
    #[serde(
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub duplicated_lines_density: Option<f64>,
    #[serde(
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub ncloc: Option<f64>,
    #[serde(
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub reliability_rating: Option<String>,
    #[serde(
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub security_rating: Option<String>,
    #[serde(
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub sqale_rating: Option<String>,
    /// Technical debt in minutes.
    #[serde(
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub sqale_index: Option<f64>,
    #[serde(
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub complexity: Option<f64>,
}

impl MetricBundle {
    pub fn from_measures<I, K, V>(measures: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map: Map<String, Value> = measures
            .into_iter()
            .map(|(metric, value)| (metric.into(), Value::String(value.into())))
            .collect();

        // Every field is lenient, so an object of strings always fits.
        serde_json::from_value(Value::Object(map)).unwrap_or_default()
    }
}

fn parse_number(value: Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(parse_number(Value::deserialize(deserializer)?))
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    })
}

/// SonarCloud ratings arrive as "1.0" through "5.0"; 1 is best.
pub fn rating_letter(raw: &str) -> Option<char> {
    let value = raw.trim().parse::<f64>().ok()?;
    match value.round() as i64 {
        1 => Some('A'),
        2 => Some('B'),
        3 => Some('C'),
        4 => Some('D'),
        5 => Some('E'),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeScore {
    pub coverage: u32,
    pub bugs: u32,
    pub vulnerabilities: u32,
    pub code_smells: u32,
    pub technical_debt: u32,
    pub complexity: u32,
    pub total: u32,
}

impl CompositeScore {
    pub fn get(&self, category: Category) -> u32 {
        match category {
            Category::Coverage => self.coverage,
            Category::Bugs => self.bugs,
            Category::Vulnerabilities => self.vulnerabilities,
            Category::CodeSmells => self.code_smells,
            Category::TechnicalDebt => self.technical_debt,
            Category::Complexity => self.complexity,
        }
    }

    /// `(category, points, max points)` in display order.
    pub fn breakdown(&self) -> [(Category, u32, u32); 6] {
        Category::ALL.map(|category| (category, self.get(category), category.max_points()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub qualifier: String,
    #[serde(default)]
    pub visibility: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_analysis_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measures: Option<MetricBundle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<CompositeScore>,
}

impl Project {
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_measures(mut self, measures: MetricBundle) -> Self {
        self.measures = Some(measures);
        self
    }

    pub fn total(&self) -> Option<u32> {
        self.score.map(|score| score.total)
    }
}
