use crate::core::model::{CompositeScore, MetricBundle, Project};
use crate::core::rules::{Category, classify};

/// Technical debt is reported in minutes; its rule table is in hours.
/// A missing index counts as zero debt.
pub fn technical_debt_hours(bundle: &MetricBundle) -> f64 {
    bundle.sqale_index.unwrap_or(0.0) / 60.0
}

pub fn evaluate(bundle: &MetricBundle) -> CompositeScore {
    let points = |category: Category, value: Option<f64>| {
        classify(value.unwrap_or(0.0), category.rules())
    };

    let coverage = points(Category::Coverage, bundle.coverage);
    let bugs = points(Category::Bugs, bundle.bugs);
    let vulnerabilities = points(Category::Vulnerabilities, bundle.vulnerabilities);
    let code_smells = points(Category::CodeSmells, bundle.code_smells);
    let technical_debt = points(Category::TechnicalDebt, Some(technical_debt_hours(bundle)));
    let complexity = points(Category::Complexity, bundle.complexity);

    CompositeScore {
        coverage,
        bugs,
        vulnerabilities,
        code_smells,
        technical_debt,
        complexity,
        total: coverage + bugs + vulnerabilities + code_smells + technical_debt + complexity,
    }
}

/// Projects without measures come back untouched and stay unranked.
pub fn score_project(mut project: Project) -> Project {
    if let Some(measures) = &project.measures {
        project.score = Some(evaluate(measures));
    }
    project
}

pub fn label_for_total(total: u32) -> &'static str {
    match total {
        90.. => "Excellent",
        75..=89 => "Good",
        50..=74 => "Fair",
        _ => "At Risk",
    }
}
