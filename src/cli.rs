use crate::core::rank::SortColumn;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "sonarboard",
    version,
    about = "Code-quality leaderboard for SonarCloud projects"
)]
pub struct Cli {
    /// Log fetch progress to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Fetch, score and rank every project of an organization.
    Board(BoardArgs),
    /// Score a single metric bundle read from a JSON file (`-` for stdin).
    Score(ScoreArgs),
    /// Print the scoring rule tables.
    Rules(OutputArgs),
    /// Write a default sonarboard.toml into the current directory.
    Init(InitArgs),
}

#[derive(Debug, Args, Clone)]
pub struct OutputArgs {
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args, Clone)]
pub struct BoardArgs {
    #[command(flatten)]
    pub output: OutputArgs,
    #[arg(long, env = "SONAR_ORGANIZATION")]
    pub organization: Option<String>,
    /// Read projects and measures from a JSON snapshot instead of the API.
    #[arg(long, value_name = "FILE")]
    pub from: Option<PathBuf>,
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long, value_enum, default_value_t = SortColumn::Score)]
    pub sort: SortColumn,
    #[arg(long, conflicts_with = "desc")]
    pub asc: bool,
    #[arg(long)]
    pub desc: bool,
    /// One-based page number.
    #[arg(long, default_value_t = 1)]
    pub page: usize,
    #[arg(long)]
    pub page_size: Option<usize>,
}

impl BoardArgs {
    pub fn descending(&self) -> bool {
        if self.asc {
            false
        } else if self.desc {
            true
        } else {
            self.sort.default_descending()
        }
    }
}

#[derive(Debug, Args, Clone)]
pub struct ScoreArgs {
    #[command(flatten)]
    pub output: OutputArgs,
    pub input: PathBuf,
}

#[derive(Debug, Args)]
pub struct InitArgs {
    #[arg(long)]
    pub config: Option<PathBuf>,
}
