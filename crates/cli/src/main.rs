mod logging;
mod render;

use clap::{Parser, Subcommand};
use color_eyre::eyre::WrapErr;
use std::path::PathBuf;
use std::time::Duration;
use tf_core::archive::folder_name;
use tf_core::config::load_config;
use tf_core::stages::default_team_with_pacing;
use tf_core::Orchestrator;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "teamforge", version, about = "Run a project through the engineering team pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit a project and follow it until it completes or fails.
    Run {
        /// What the project should build.
        #[arg(long)]
        description: String,

        /// Target language, e.g. "Python" or "TypeScript".
        #[arg(long)]
        language: String,

        /// Directory containing `.teamforge/config.toml`.
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Overrides the configured output directory.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Print only the final summary.
        #[arg(long)]
        quiet: bool,

        /// Print every event as one JSON line.
        #[arg(long, conflicts_with = "quiet")]
        json: bool,

        /// Delay between stage steps, in milliseconds.
        #[arg(long, default_value_t = 0)]
        pace_ms: u64,
    },

    /// Print the output folder name for a description and project id.
    FolderName {
        #[arg(long)]
        description: String,

        #[arg(long)]
        id: Uuid,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    match cli.command {
        Command::Run {
            description,
            language,
            root,
            output_dir,
            quiet,
            json,
            pace_ms,
        } => {
            logging::init_tracing(quiet || json);
            let mode = if json {
                render::Mode::Json
            } else if quiet {
                render::Mode::Quiet
            } else {
                render::Mode::Pretty
            };
            run(RunArgs {
                description,
                language,
                root,
                output_dir,
                mode,
                pace: Duration::from_millis(pace_ms),
            })
            .await
        }
        Command::FolderName { description, id } => {
            println!("{}", folder_name(&description, id));
            Ok(())
        }
    }
}

struct RunArgs {
    description: String,
    language: String,
    root: PathBuf,
    output_dir: Option<PathBuf>,
    mode: render::Mode,
    pace: Duration,
}

async fn run(args: RunArgs) -> color_eyre::Result<()> {
    let mut config = load_config(&args.root)
        .await
        .wrap_err("Failed to load configuration")?;
    if let Some(dir) = args.output_dir {
        config.output_dir = dir;
    }

    let orchestrator = Orchestrator::new(config, default_team_with_pacing(args.pace));
    let id = orchestrator.create(&args.description, &args.language).await?;
    let mut subscription = orchestrator.subscribe(id).await?;
    let task = orchestrator.start(id).await?;

    while let Some(event) = subscription.recv().await {
        render::event(&event, args.mode)?;
    }

    let outcome = task.await.wrap_err("Pipeline task panicked")?;
    if let Err(err) = outcome {
        render::failure(&err.to_string(), args.mode);
        return Err(err.into());
    }

    let output = orchestrator.get_output(id).await?;
    let bundle = orchestrator.download(id).await?;
    render::summary(&output, &bundle, args.mode)?;
    Ok(())
}
