use anyhow::Context;
use clap::{Parser, Subcommand};
use log::info;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use sentimen::{
    classify, ClassifierError, LabelSet, ModelKind, ModelLayout, PredictionReport, RuntimeConfig,
    REGISTRY,
};

/// Exit code for user-correctable problems (empty input).
const EXIT_USER: u8 = 2;

#[derive(Parser)]
#[command(author, version, about = "Sentiment classification for Indonesian-language product reviews", long_about = None)]
struct Cli {
    /// Directory holding the model artifacts (default: ./models, or
    /// $SENTIMEN_MODELS_DIR)
    #[arg(long, global = true)]
    models_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify a review and print the predicted sentiment
    Predict {
        /// Review text; read from stdin when omitted
        #[arg(short, long)]
        text: Option<String>,

        /// Model to use
        #[arg(short, long, default_value = "indobert")]
        model: ModelKind,

        /// Skip text normalization before inference
        #[arg(long)]
        raw: bool,

        /// Hide the per-class probability breakdown
        #[arg(long)]
        no_probs: bool,

        /// Emit the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the models whose artifacts are present
    Models,
    /// Show resolved artifact paths and whether they exist
    Diag {
        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let layout = match cli.models_dir {
        Some(dir) => ModelLayout::new(dir),
        None => ModelLayout::from_env(),
    };

    match cli.command {
        Command::Predict {
            text,
            model,
            raw,
            no_probs,
            json,
        } => cmd_predict(&layout, text, model, raw, no_probs, json),
        Command::Models => cmd_models(&layout),
        Command::Diag { json } => cmd_diag(&layout, json),
    }
}

/// Review text from the flag, or stdin when the flag is absent.
fn read_review(text: Option<String>) -> anyhow::Result<String> {
    match text {
        Some(text) => Ok(text),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read review from stdin")?;
            Ok(buffer)
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{}", out);
    Ok(())
}

fn cmd_predict(
    layout: &ModelLayout,
    text: Option<String>,
    model: ModelKind,
    raw: bool,
    no_probs: bool,
    json: bool,
) -> ExitCode {
    if let Err(e) = layout.ensure_usable() {
        eprintln!("error: {}", e);
        return ExitCode::FAILURE;
    }
    if let Some(notice) = layout.backend_notice() {
        info!("{}", notice);
    }

    let text = match read_review(text) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("Classifying with {} (clean={})", model.display_name(), !raw);
    match classify(
        &REGISTRY,
        layout,
        &RuntimeConfig::default(),
        model,
        &text,
        !raw,
    ) {
        Ok(prediction) => {
            let labels = LabelSet::load(&layout.labels_file());
            let report = PredictionReport::new(&prediction, &labels);
            if let Err(e) = render_report(&report, !no_probs, json) {
                eprintln!("error: {:#}", e);
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Err(ClassifierError::EmptyInput) => {
            eprintln!("warning: review text is empty, nothing to classify");
            ExitCode::from(EXIT_USER)
        }
        Err(e @ ClassifierError::ArtifactMissing(_)) => {
            eprintln!("error: {}", e);
            eprintln!("Pick another model; `sentimen models` lists the available ones.");
            ExitCode::FAILURE
        }
        Err(e @ ClassifierError::BackendMissing) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("error: prediction failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn render_report(report: &PredictionReport, show_probs: bool, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(report);
    }

    println!("Sentiment: {}", report.label.to_uppercase());
    if show_probs {
        println!("Per-class probabilities:");
        for score in &report.scores {
            println!("  {:<12} {:.4}", score.label, score.probability);
        }
    }
    println!(
        "Confidence: {} {:.1}%",
        confidence_bar(report.confidence),
        report.confidence * 100.0
    );
    Ok(())
}

fn confidence_bar(confidence: f32) -> String {
    const WIDTH: usize = 20;
    let filled = ((confidence.clamp(0.0, 1.0) * WIDTH as f32).round()) as usize;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(WIDTH - filled))
}

fn cmd_models(layout: &ModelLayout) -> ExitCode {
    if let Err(e) = layout.ensure_usable() {
        eprintln!("error: {}", e);
        return ExitCode::FAILURE;
    }

    println!("Available models:");
    for kind in layout.available() {
        println!("  {:<12} ({})", kind, kind.display_name());
    }
    if let Some(notice) = layout.backend_notice() {
        println!("note: {}", notice);
    }
    ExitCode::SUCCESS
}

fn cmd_diag(layout: &ModelLayout, json: bool) -> ExitCode {
    let diag = layout.diagnostics();
    if json {
        if let Err(e) = print_json(&diag) {
            eprintln!("error: {:#}", e);
            return ExitCode::FAILURE;
        }
        return ExitCode::SUCCESS;
    }

    println!("models_dir: {}", diag.models_dir.display());
    println!(
        "recurrent backend compiled in: {}",
        diag.recurrent_backend
    );
    for entry in &diag.entries {
        println!(
            "  {:<16} {:<7} {}",
            entry.name,
            if entry.exists { "ok" } else { "missing" },
            entry.path.display()
        );
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_text_flag_bypasses_stdin() {
        let text = read_review(Some("mantap sekali".to_string())).unwrap();
        assert_eq!(text, "mantap sekali");
    }

    #[test]
    fn confidence_bar_spans_full_range() {
        assert_eq!(confidence_bar(0.0), format!("[{}]", ".".repeat(20)));
        assert_eq!(confidence_bar(1.0), format!("[{}]", "#".repeat(20)));
        // Out-of-range values clamp instead of panicking.
        assert_eq!(confidence_bar(2.0), confidence_bar(1.0));
        assert_eq!(confidence_bar(0.5).matches('#').count(), 10);
    }
}
