use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use codequill::cli::{Output, TaskInput, run_task};
use codequill::config::ConfigLoader;
use codequill::tasks::TaskKind;
use codequill::types::{QuillError, Result};

#[derive(Parser)]
#[command(name = "codequill")]
#[command(version, about = "AI code assistant: completion, tests, translation, review")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, short, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Args)]
struct CommonArgs {
    /// Input file with the code payload (reads stdin when omitted)
    #[arg(long, short)]
    file: Option<PathBuf>,

    /// Source language of the code
    #[arg(long, short)]
    language: String,

    /// Stream the response fragment by fragment
    #[arg(long)]
    stream: bool,

    /// Override the configured model
    #[arg(long)]
    model: Option<String>,

    /// Override the configured max output tokens
    #[arg(long)]
    max_tokens: Option<u32>,
}

#[derive(Subcommand)]
enum Commands {
    /// Complete a partial code snippet
    Complete(CommonArgs),

    /// Generate unit tests for the code
    GenTests(CommonArgs),

    /// Translate the code to another language
    Translate {
        #[command(flatten)]
        common: CommonArgs,

        /// Target language
        #[arg(long)]
        to: String,
    },

    /// Optimize the code for performance and readability
    Optimize(CommonArgs),

    /// Review the code for security vulnerabilities
    Review(CommonArgs),

    /// Generate documentation for the code
    Doc(CommonArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run_cli(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            Output::new().report_error(&e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli(cli: Cli) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;

    let (kind, common, target) = match cli.command {
        Commands::Complete(common) => (TaskKind::Complete, common, None),
        Commands::GenTests(common) => (TaskKind::GenerateTests, common, None),
        Commands::Translate { common, to } => (TaskKind::Translate, common, Some(to)),
        Commands::Optimize(common) => (TaskKind::Optimize, common, None),
        Commands::Review(common) => (TaskKind::SecurityReview, common, None),
        Commands::Doc(common) => (TaskKind::Document, common, None),
    };

    let mut config = ConfigLoader::load()?;
    if let Some(model) = &common.model {
        config.api.model = model.clone();
    }
    if let Some(max_tokens) = common.max_tokens {
        config.api.max_tokens = max_tokens;
    }

    let code = read_code(&common.file)?;

    let input = TaskInput {
        code,
        language: common.language.clone(),
        target_language: target,
        max_tokens: config.api.max_tokens,
        stream: common.stream,
    };

    runtime.block_on(run_task(&config, kind, input))
}

/// Read the code payload from a file, or stdin when no file is given
fn read_code(file: &Option<PathBuf>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path).map_err(|e| {
            QuillError::Config(format!("Cannot read {}: {}", path.display(), e))
        }),
        None => {
            let mut code = String::new();
            std::io::stdin().read_to_string(&mut code)?;
            Ok(code)
        }
    }
}
