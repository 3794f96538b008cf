use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use synopsis_core::{Pipeline, Settings};
use synopsis_ingest::ExtractorRegistry;

mod output;

use output::ColorMode;

/// Summarize text or documents and extract their keywords
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarize a .txt/.pdf file or inline text
    Summarize {
        #[command(flatten)]
        input: Input,

        /// Model to load (t5-small, t5-base, bart-large-cnn)
        #[arg(long)]
        model: Option<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Print keywords only (no model is loaded)
    Keywords {
        #[command(flatten)]
        input: Input,

        /// Number of keywords to print (at most 5)
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct Input {
    /// Path to a .txt or .pdf file
    file_path: Option<PathBuf>,

    /// Text to process instead of a file
    #[arg(long)]
    text: Option<String>,
}

impl Input {
    fn label(&self) -> String {
        match &self.file_path {
            Some(path) => path.display().to_string(),
            None => "input text".to_string(),
        }
    }

    fn read(&self) -> anyhow::Result<String> {
        if let Some(text) = &self.text {
            return Ok(text.clone());
        }
        let path = self
            .file_path
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("No input given"))?;
        if !path.exists() {
            anyhow::bail!("File not found: {}", path.display());
        }
        Ok(ExtractorRegistry::with_defaults().extract(path)?)
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut settings = synopsis_core::load_config().resolve().apply_env();
    let mut stdout = std::io::stdout();

    match cli.command {
        Command::Summarize {
            input,
            model,
            json,
            no_color,
        } => {
            if let Some(model) = model {
                settings.model_name = model;
            }
            let text = input.read()?;
            let pipeline = load_pipeline(&settings);
            let analysis = pipeline.analyze(&text)?;

            if json {
                writeln!(
                    stdout,
                    "{}",
                    serde_json::to_string_pretty(&output::analysis_json(&analysis))?
                )?;
            } else {
                output::print_analysis(&mut stdout, &input.label(), &analysis, ColorMode(!no_color))?;
            }
        }
        Command::Keywords {
            input,
            count,
            no_color,
        } => {
            if let Some(count) = count {
                settings.pipeline.keyword_count =
                    synopsis_core::config_file::clamp_keyword_count(count);
            }
            let text = input.read()?;
            let pipeline = Pipeline::unavailable("not needed for keywords", settings.pipeline);
            output::print_keywords(&mut stdout, &pipeline.keywords(&text), ColorMode(!no_color))?;
        }
    }

    Ok(())
}

#[cfg(feature = "rust-bert")]
fn load_pipeline(settings: &Settings) -> Pipeline {
    let loaded = synopsis_rust_bert::RustBertSummarizer::load_named(
        &settings.model_name,
        settings.generation,
    );
    Pipeline::from_load(loaded, settings.pipeline)
}

#[cfg(not(feature = "rust-bert"))]
fn load_pipeline(settings: &Settings) -> Pipeline {
    Pipeline::unavailable("no summarization backend compiled in", settings.pipeline)
}
