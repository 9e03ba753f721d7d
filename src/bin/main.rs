use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use ghost_edit::config::{SettingsEventKind, load_settings};
use ghost_edit::diff::{DiffText, apply_operation, extract_operation};
use ghost_edit::error::PredictionResult;
use ghost_edit::prediction::{EditorState, HttpPredictor, Predictor};
use ghost_edit::text::{Selection, strip_cursor_marker};
use tokio_util::sync::CancellationToken;

const LOG_TARGET: &str = "ghost_edit::settings";

/// Next-edit prediction: diff extraction and a reference model backend
#[derive(Parser)]
#[command(name = "ghost-edit")]
#[command(version)]
#[command(about = "Next-edit prediction: minimal edit extraction and a reference model backend")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the single edit operation turning OLD into NEW as JSON
    ///
    /// Both files may contain the cursor marker <|user_cursor_is_here|>.
    Diff {
        old: PathBuf,
        new: PathBuf,

        /// Also print OLD with the operation applied
        #[arg(long)]
        apply: bool,
    },
    /// Ask the configured backend for the next edit in FILE
    Predict {
        file: PathBuf,

        /// Caret position as a character offset
        #[arg(long)]
        cursor: usize,

        /// Project directory searched for ghost-edit.toml (default: current directory)
        #[arg(long)]
        root: Option<PathBuf>,

        /// Config file overriding every other layer
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Diff { old, new, apply } => run_diff(&old, &new, apply),
        Commands::Predict {
            file,
            cursor,
            root,
            config,
        } => run_predict(&file, cursor, root.as_deref(), config.as_deref()).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_diff(old: &Path, new: &Path, apply: bool) -> PredictionResult<()> {
    let diff = DiffText::new(fs::read_to_string(old)?, fs::read_to_string(new)?);
    let operation = extract_operation(&diff);
    println!("{}", serde_json::to_string_pretty(&operation)?);

    if apply {
        let (document, _) = strip_cursor_marker(&diff.old_text);
        print!("{}", apply_operation(&document, &operation));
    }
    Ok(())
}

async fn run_predict(
    file: &Path,
    cursor: usize,
    root: Option<&Path>,
    config: Option<&Path>,
) -> PredictionResult<()> {
    let cwd = std::env::current_dir()?;
    let outcome = load_settings(Some(root.unwrap_or(&cwd)), config);
    for event in &outcome.events {
        match event.kind {
            SettingsEventKind::Info => log::info!(target: LOG_TARGET, "{}", event.message),
            SettingsEventKind::Warning => log::warn!(target: LOG_TARGET, "{}", event.message),
        }
    }
    let settings = outcome.resolve()?;

    let predictor = HttpPredictor::new(settings.backend)?;
    let state = EditorState::new(fs::read_to_string(file)?, Selection::cursor(cursor), 0);
    let prediction = predictor.predict(&state, &CancellationToken::new()).await?;

    let output = serde_json::json!({
        "intent": prediction.intent,
        "from": prediction.from,
        "to": prediction.to,
        "operation": prediction.document_operation(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
