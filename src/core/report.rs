use crate::core::model::{CompositeScore, MetricBundle, Project, rating_letter};
use crate::core::rank::{self, PodiumEntry, TablePage, TableQuery};
use crate::core::rules::{Category, Rule, max_total};
use crate::core::score::{label_for_total, technical_debt_hours};
use colored::Colorize;
use serde::Serialize;

const BAR_WIDTH: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    pub fn for_place(place: usize) -> Option<Self> {
        match place {
            1 => Some(Self::Gold),
            2 => Some(Self::Silver),
            3 => Some(Self::Bronze),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gold => "GOLD",
            Self::Silver => "SILVER",
            Self::Bronze => "BRONZE",
        }
    }

    fn colored(self) -> String {
        match self {
            Self::Gold => self.as_str().yellow().bold().to_string(),
            Self::Silver => self.as_str().white().bold().to_string(),
            Self::Bronze => self.as_str().truecolor(205, 127, 50).bold().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Leaderboard<'a> {
    pub organization: String,
    pub generated_at: String,
    pub podium: Vec<PodiumEntry<'a>>,
    pub table: TablePage<'a>,
}

impl<'a> Leaderboard<'a> {
    pub fn build(
        organization: impl Into<String>,
        generated_at: impl Into<String>,
        projects: &'a [Project],
        query: &TableQuery,
    ) -> Self {
        Self {
            organization: organization.into(),
            generated_at: generated_at.into(),
            podium: rank::podium(projects),
            table: rank::query_table(projects, query),
        }
    }
}

/// `points / max` as a bar of `BAR_WIDTH` cells.
pub fn proportion_bar(points: u32, max: u32) -> String {
    let filled = if max == 0 {
        0
    } else {
        ((points.min(max) as usize * BAR_WIDTH) + max as usize / 2) / max as usize
    };
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

pub fn total_cell(project: &Project) -> String {
    format!("{}/{}", project.total().unwrap_or(0), max_total())
}

pub fn coverage_cell(measures: Option<&MetricBundle>) -> String {
    match measures.and_then(|m| m.coverage) {
        Some(coverage) => format!("{:.2}%", coverage),
        None => "0%".to_string(),
    }
}

pub fn count_cell(value: Option<f64>) -> String {
    format!("{}", value.unwrap_or(0.0))
}

pub fn print_leaderboard(board: &Leaderboard<'_>) {
    println!("{}", format!("{} Leaderboard", board.organization).bold());
    println!("Project Quality Metrics & Rankings");
    println!("Last updated: {}", board.generated_at);

    if board.podium.is_empty() {
        println!();
        println!("no scored projects yet");
    }

    for entry in &board.podium {
        print_podium_entry(entry);
    }

    println!();
    print_table(&board.table);
}

fn print_podium_entry(entry: &PodiumEntry<'_>) {
    let Some(score) = entry.project.score else {
        return;
    };
    let medal = Medal::for_place(entry.place)
        .map(Medal::colored)
        .unwrap_or_default();

    println!();
    println!(
        "{} #{} {}  {}/{} points ({})",
        medal,
        entry.place,
        entry.project.name.bold(),
        score.total,
        max_total(),
        label_for_total(score.total)
    );
    print_breakdown(&score);
}

pub fn print_breakdown(score: &CompositeScore) {
    for (category, points, max) in score.breakdown() {
        println!(
            "  {:<16}{} {:>2}/{}",
            category.label(),
            proportion_bar(points, max).blue(),
            points,
            max
        );
    }
}

fn print_table(page: &TablePage<'_>) {
    let header = format!(
        "{:<32} {:>12} {:>10} {:>6} {:>16} {:>12}",
        "PROJECT NAME", "TOTAL SCORE", "COVERAGE", "BUGS", "VULNERABILITIES", "CODE SMELLS"
    );
    println!("{}", header.bold());

    if page.rows.is_empty() {
        println!("{}", "no matching projects".dimmed());
    }

    for project in &page.rows {
        let measures = project.measures.as_ref();
        println!(
            "{:<32} {:>12} {:>10} {:>6} {:>16} {:>12}",
            truncate(&project.name, 32),
            total_cell(project),
            coverage_cell(measures),
            count_cell(measures.and_then(|m| m.bugs)),
            count_cell(measures.and_then(|m| m.vulnerabilities)),
            count_cell(measures.and_then(|m| m.code_smells))
        );
    }

    println!();
    println!(
        "Page {} of {} ({} projects, sorted by {} {})",
        page.page_index + 1,
        page.page_count,
        page.total_rows,
        page.sort,
        if page.descending { "desc" } else { "asc" }
    );
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreReport {
    pub measures: MetricBundle,
    pub technical_debt_hours: f64,
    pub score: CompositeScore,
    pub label: &'static str,
}

impl ScoreReport {
    pub fn new(measures: MetricBundle, score: CompositeScore) -> Self {
        Self {
            technical_debt_hours: technical_debt_hours(&measures),
            label: label_for_total(score.total),
            measures,
            score,
        }
    }
}

pub fn print_score(report: &ScoreReport) {
    println!(
        "Score: {}/{} ({})",
        report.score.total,
        max_total(),
        report.label
    );
    println!();
    print_breakdown(&report.score);

    let measures = &report.measures;
    println!();
    println!("measured:");
    for (label, value) in [
        ("coverage", measures.coverage.map(|v| format!("{v:.2}%"))),
        ("bugs", measures.bugs.map(|v| v.to_string())),
        (
            "vulnerabilities",
            measures.vulnerabilities.map(|v| v.to_string()),
        ),
        ("code smells", measures.code_smells.map(|v| v.to_string())),
        (
            "technical debt",
            Some(format!("{:.2}h", report.technical_debt_hours)),
        ),
        ("complexity", measures.complexity.map(|v| v.to_string())),
        (
            "duplication",
            measures.duplicated_lines_density.map(|v| format!("{v:.2}%")),
        ),
        ("lines of code", measures.ncloc.map(|v| v.to_string())),
    ] {
        println!(
            "  {:<16}{}",
            label,
            value.unwrap_or_else(|| "-".to_string())
        );
    }

    for (label, rating) in [
        ("reliability", &measures.reliability_rating),
        ("security", &measures.security_rating),
        ("maintainability", &measures.sqale_rating),
    ] {
        if let Some(letter) = rating.as_deref().and_then(rating_letter) {
            println!("  {:<16}{}", label, letter);
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleTableReport {
    pub category: Category,
    pub label: &'static str,
    pub max_points: u32,
    pub rules: Vec<RuleRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RuleRow {
    pub low: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<f64>,
    pub points: u32,
}

impl From<&Rule> for RuleRow {
    fn from(rule: &Rule) -> Self {
        Self {
            low: rule.low,
            high: (!rule.is_unbounded()).then_some(rule.high),
            points: rule.points,
        }
    }
}

pub fn rule_tables() -> Vec<RuleTableReport> {
    Category::ALL
        .iter()
        .map(|&category| RuleTableReport {
            category,
            label: category.label(),
            max_points: category.max_points(),
            rules: category.rules().iter().map(RuleRow::from).collect(),
        })
        .collect()
}

pub fn print_rules(tables: &[RuleTableReport]) {
    for (idx, table) in tables.iter().enumerate() {
        if idx > 0 {
            println!();
        }
        println!("{} (max {})", table.label.bold(), table.max_points);

        let unit = table.category.unit();
        for row in &table.rules {
            let range = match row.high {
                Some(high) if high == row.low => format!("{}{}", row.low, unit),
                Some(high) => format!("{}{} - {}{}", row.low, unit, high, unit),
                None => format!("{}{} and above", row.low, unit),
            };
            println!("  {:<24}{:>3} pts", range, row.points);
        }
    }
}
