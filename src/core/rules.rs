//! Fixed rule tables and the range classifier.
//!
//! Every table lists its best band first. Neighbouring bands share their
//! boundary value so the tables leave no gaps over the reals; the shared
//! value goes to whichever band comes first, which is the better one.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rule {
    pub low: f64,
    pub high: f64,
    pub points: u32,
}

impl Rule {
    pub const fn new(low: f64, high: f64, points: u32) -> Self {
        Self { low, high, points }
    }

    pub const fn at_least(low: f64, points: u32) -> Self {
        Self::new(low, f64::INFINITY, points)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }

    pub fn is_unbounded(&self) -> bool {
        self.high == f64::INFINITY
    }
}

pub const COVERAGE_RULES: &[Rule] = &[
    Rule::new(90.0, 100.0, 20),
    Rule::new(80.0, 90.0, 17),
    Rule::new(70.0, 80.0, 14),
    Rule::new(60.0, 70.0, 10),
    Rule::new(0.0, 60.0, 5),
];

pub const BUG_RULES: &[Rule] = &[
    Rule::new(0.0, 1.0, 15),
    Rule::new(1.0, 3.0, 12),
    Rule::new(3.0, 6.0, 9),
    Rule::new(6.0, 10.0, 5),
    Rule::at_least(10.0, 2),
];

pub const VULNERABILITY_RULES: &[Rule] = &[
    Rule::new(0.0, 0.0, 15),
    Rule::new(0.0, 1.0, 12),
    Rule::new(1.0, 3.0, 9),
    Rule::new(3.0, 5.0, 5),
    Rule::at_least(5.0, 2),
];

pub const CODE_SMELL_RULES: &[Rule] = &[
    Rule::new(0.0, 10.0, 20),
    Rule::new(10.0, 25.0, 15),
    Rule::new(25.0, 50.0, 10),
    Rule::new(50.0, 100.0, 5),
    Rule::at_least(100.0, 2),
];

/// Bounds are hours.
pub const TECHNICAL_DEBT_RULES: &[Rule] = &[
    Rule::new(0.0, 5.0, 20),
    Rule::new(5.0, 15.0, 15),
    Rule::new(15.0, 30.0, 10),
    Rule::new(30.0, 50.0, 5),
    Rule::at_least(50.0, 2),
];

pub const COMPLEXITY_RULES: &[Rule] = &[
    Rule::new(0.0, 50.0, 10),
    Rule::new(50.0, 100.0, 8),
    Rule::new(100.0, 200.0, 6),
    Rule::new(200.0, 300.0, 4),
    Rule::at_least(300.0, 2),
];

/// Points of the first rule containing `value`, or 0 when none does.
pub fn classify(value: f64, rules: &[Rule]) -> u32 {
    rules
        .iter()
        .find(|rule| rule.contains(value))
        .map_or(0, |rule| rule.points)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Coverage,
    Bugs,
    Vulnerabilities,
    CodeSmells,
    TechnicalDebt,
    Complexity,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Self::Coverage,
        Self::Bugs,
        Self::Vulnerabilities,
        Self::CodeSmells,
        Self::TechnicalDebt,
        Self::Complexity,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Coverage => "Coverage",
            Self::Bugs => "Bugs",
            Self::Vulnerabilities => "Vulnerabilities",
            Self::CodeSmells => "Code Smells",
            Self::TechnicalDebt => "Technical Debt",
            Self::Complexity => "Complexity",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Self::Coverage => "%",
            Self::TechnicalDebt => "h",
            Self::Bugs | Self::Vulnerabilities | Self::CodeSmells | Self::Complexity => "",
        }
    }

    pub fn rules(self) -> &'static [Rule] {
        match self {
            Self::Coverage => COVERAGE_RULES,
            Self::Bugs => BUG_RULES,
            Self::Vulnerabilities => VULNERABILITY_RULES,
            Self::CodeSmells => CODE_SMELL_RULES,
            Self::TechnicalDebt => TECHNICAL_DEBT_RULES,
            Self::Complexity => COMPLEXITY_RULES,
        }
    }

    pub fn max_points(self) -> u32 {
        self.rules().iter().map(|rule| rule.points).max().unwrap_or(0)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

pub fn max_total() -> u32 {
    Category::ALL
        .iter()
        .map(|category| category.max_points())
        .sum()
}
