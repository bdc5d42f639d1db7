use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;
use sonarboard::cli::{BoardArgs, Cli, Commands, OutputArgs, ScoreArgs};
use sonarboard::config::{self, CONFIG_FILE_NAME, Config};
use sonarboard::core::model::{MetricBundle, Project};
use sonarboard::core::rank::TableQuery;
use sonarboard::core::report::{self, Leaderboard, ScoreReport};
use sonarboard::core::{collect_leaderboard, score};
use sonarboard::error::MetricsResult;
use sonarboard::logging;
use sonarboard::sonar::{SnapshotSource, SonarCloudClient};
use std::io::{self, Read};
use std::path::Path;
use tracing::error;

const FETCH_FAILED: &str = "Failed to fetch projects";

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    match cli.command {
        Commands::Board(args) => run_board(args).await,
        Commands::Score(args) => run_score(args),
        Commands::Rules(args) => run_rules(args),
        Commands::Init(args) => {
            if args.config.is_some() {
                eprintln!(
                    "warning: --config is ignored by `sonarboard init`; writing ./{}",
                    CONFIG_FILE_NAME
                );
            }

            let path = std::env::current_dir()?.join(CONFIG_FILE_NAME);
            config::write_default_config(&path)?;
            println!("created {}", path.display());
            Ok(0)
        }
    }
}

fn load(output: &OutputArgs) -> Result<Config> {
    let cwd = std::env::current_dir()?;
    config::load_config(output.config.as_deref(), &cwd)
}

async fn run_board(args: BoardArgs) -> Result<i32> {
    let cfg = load(&args.output)?;
    let organization = args
        .organization
        .clone()
        .unwrap_or_else(|| cfg.sonar.organization.clone());

    if args.from.is_none() && organization.trim().is_empty() {
        bail!(
            "no organization configured (use --organization, SONAR_ORGANIZATION or [sonar].organization in {})",
            CONFIG_FILE_NAME
        );
    }

    let projects = match fetch_projects(&args, &cfg, &organization).await {
        Ok(projects) => projects,
        Err(err) => {
            error!(reason = err.reason(), "leaderboard aborted");
            eprintln!("{}", FETCH_FAILED.red().bold());
            return Ok(2);
        }
    };

    let query = TableQuery {
        search: args.search.clone(),
        sort: args.sort,
        descending: args.descending(),
        page: args.page.saturating_sub(1),
        page_size: args.page_size.unwrap_or(cfg.table.page_size),
    };
    let title = if organization.trim().is_empty() {
        "Project".to_string()
    } else {
        organization
    };
    let generated_at = chrono::Local::now().format("%Y-%m-%d").to_string();
    let board = Leaderboard::build(title, generated_at, &projects, &query);

    if args.output.json || cfg.general.json {
        println!("{}", serde_json::to_string_pretty(&board)?);
    } else {
        report::print_leaderboard(&board);
    }

    Ok(0)
}

async fn fetch_projects(
    args: &BoardArgs,
    cfg: &Config,
    organization: &str,
) -> MetricsResult<Vec<Project>> {
    let concurrency = cfg.sonar.concurrency;
    match &args.from {
        Some(path) => {
            let source = SnapshotSource::from_path(path)?;
            collect_leaderboard(&source, concurrency).await
        }
        None => {
            let client =
                SonarCloudClient::new(&cfg.sonar.base_url, organization, cfg.sonar.page_size)?;
            collect_leaderboard(&client, concurrency).await
        }
    }
}

fn run_score(args: ScoreArgs) -> Result<i32> {
    let cfg = load(&args.output)?;
    let raw = read_input(&args.input)?;
    let measures: MetricBundle = serde_json::from_str(&raw)
        .with_context(|| format!("failed parsing metric bundle {}", args.input.display()))?;

    let report = ScoreReport::new(measures.clone(), score::evaluate(&measures));
    if args.output.json || cfg.general.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        report::print_score(&report);
    }

    Ok(0)
}

fn run_rules(args: OutputArgs) -> Result<i32> {
    let cfg = load(&args)?;
    let tables = report::rule_tables();
    if args.json || cfg.general.json {
        println!("{}", serde_json::to_string_pretty(&tables)?);
    } else {
        report::print_rules(&tables);
    }

    Ok(0)
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut raw = String::new();
        io::stdin()
            .read_to_string(&mut raw)
            .context("failed reading metric bundle from stdin")?;
        return Ok(raw);
    }

    std::fs::read_to_string(path).with_context(|| format!("failed reading {}", path.display()))
}
