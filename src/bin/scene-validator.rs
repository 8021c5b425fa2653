use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const EXIT_FAILED: u8 = 1;
const EXIT_COULD_NOT_RUN: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "scene-validator", version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate scene files against a rule configuration.
    Validate(ValidateArgs),
    /// Parse a scene file and print the graph and parse warnings as JSON.
    Parse(ParseArgs),
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Input scene file(s).
    #[arg(long = "in", short = 'i', required = true, num_args = 1..)]
    in_paths: Vec<PathBuf>,

    /// Rule configuration JSON.
    #[arg(long, short = 'c')]
    config: PathBuf,

    /// Report format.
    #[arg(long, short = 'f', value_enum, default_value_t = FormatChoice::Text)]
    format: FormatChoice,

    /// Write the report here instead of stdout.
    #[arg(long, short = 'o')]
    out: Option<PathBuf>,

    /// Validate files concurrently.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Parser, Debug)]
struct ParseArgs {
    /// Input scene file.
    #[arg(long = "in", short = 'i')]
    in_path: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatChoice {
    Text,
    Json,
    Html,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.cmd {
        Command::Validate(args) => cmd_validate(args),
        Command::Parse(args) => cmd_parse(args),
    };
    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(EXIT_COULD_NOT_RUN)
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<ExitCode> {
    let validator = scene_validator::SceneValidator::from_config_path(&args.config)
        .with_context(|| format!("load rule config '{}'", args.config.display()))?;

    let threading = scene_validator::BatchThreading {
        parallel: args.parallel,
        threads: args.threads,
    };
    let results = validator.validate_batch(&args.in_paths, threading)?;

    let mut reports = Vec::with_capacity(results.len());
    let mut could_not_run = false;
    for (path, result) in args.in_paths.iter().zip(results) {
        match result {
            Ok(report) => reports.push(report),
            Err(e) => {
                eprintln!("error: validate '{}': {e}", path.display());
                could_not_run = true;
            }
        }
    }

    let format = match args.format {
        FormatChoice::Text => scene_validator::ReportFormat::Text,
        FormatChoice::Json => scene_validator::ReportFormat::Json,
        FormatChoice::Html => scene_validator::ReportFormat::Html,
    };
    if !reports.is_empty() {
        let rendered = scene_validator::render_reports(&reports, format)?;
        write_output(args.out.as_deref(), &rendered)?;
    }

    if could_not_run {
        return Ok(ExitCode::from(EXIT_COULD_NOT_RUN));
    }
    if reports.iter().all(|r| r.passed()) {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(EXIT_FAILED))
    }
}

fn cmd_parse(args: ParseArgs) -> anyhow::Result<ExitCode> {
    let text = std::fs::read_to_string(&args.in_path)
        .with_context(|| format!("read scene '{}'", args.in_path.display()))?;
    let parsed = scene_validator::parse_scene(&text)
        .with_context(|| format!("parse scene '{}'", args.in_path.display()))?;
    let json = serde_json::to_string_pretty(&parsed).context("serialize parsed scene")?;
    println!("{json}");
    Ok(ExitCode::SUCCESS)
}

fn write_output(out: Option<&Path>, rendered: &str) -> anyhow::Result<()> {
    let Some(path) = out else {
        print!("{rendered}");
        return Ok(());
    };
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, rendered)
        .with_context(|| format!("write report '{}'", path.display()))?;
    eprintln!("wrote {}", path.display());
    Ok(())
}
