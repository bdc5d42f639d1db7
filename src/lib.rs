//! Scores SonarCloud projects from their quality metrics and ranks them.
//!
//! [`crate::core::score::evaluate`] is the pure part: six raw measurements in, six
//! category points and their total out. [`crate::core::collect_leaderboard`] wires
//! it to a [`crate::sonar::MetricsSource`].

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod sonar;
