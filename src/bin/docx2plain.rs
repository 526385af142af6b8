//! docx2plain server binary.
//!
//! Launches the single-page web UI: upload a DOCX with LaTeX and code,
//! download the rewritten document (and, with `--speech`, a WAV narration).

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use docx2plain::{web, CompletionApi, ConversionConfig, OutputMode};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "docx2plain",
    version,
    about = "Serve the DOCX → plain-English converter web UI",
    after_help = "EXAMPLES:\n    \
        docx2plain                                # defaults, chat endpoint\n    \
        docx2plain --bind 0.0.0.0:8080 --speech   # with WAV narration\n    \
        docx2plain --api legacy --model gpt-3.5-turbo-instruct\n\n\
        The API key is read from --api-key or the OPENAI_API_KEY environment variable."
)]
struct Cli {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8080")]
    bind: String,

    /// Model identifier (also selects the tokenizer for usage reporting)
    #[arg(long, default_value = "gpt-3.5-turbo")]
    model: String,

    /// Completion endpoint style
    #[arg(long, value_enum, default_value_t = ApiKind::Chat)]
    api: ApiKind,

    /// Base URL of the completion service
    #[arg(long, default_value = "https://api.openai.com/v1")]
    base_url: String,

    /// API credential (falls back to the environment)
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Also synthesize a WAV narration of the rewritten text
    #[arg(long)]
    speech: bool,

    /// espeak-ng voice for narration
    #[arg(long, default_value = "en")]
    voice: String,

    /// espeak-ng speaking rate in words per minute
    #[arg(long, default_value_t = 160)]
    speech_wpm: u32,

    /// Directory holding the uploads/ and output/ scratch directories
    #[arg(long, default_value = ".")]
    workspace: std::path::PathBuf,

    /// Per-request timeout for the completion call, in seconds
    #[arg(long, default_value_t = 120)]
    timeout: u64,

    /// Increase log verbosity (-v: debug, -vv: trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ApiKind {
    /// POST {base}/chat/completions
    Chat,
    /// POST {base}/completions
    Legacy,
}

impl From<ApiKind> for CompletionApi {
    fn from(kind: ApiKind) -> Self {
        match kind {
            ApiKind::Chat => CompletionApi::Chat,
            ApiKind::Legacy => CompletionApi::Legacy,
        }
    }
}

fn init_logging(cli: &Cli) {
    let default_level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("docx2plain={default_level},tower_http=warn")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let mut builder = ConversionConfig::builder()
        .model(&cli.model)
        .api(cli.api.into())
        .base_url(&cli.base_url)
        .api_timeout_secs(cli.timeout)
        .workspace_root(&cli.workspace)
        .voice(&cli.voice)
        .speech_wpm(cli.speech_wpm)
        .output_mode(if cli.speech {
            OutputMode::DocumentAndSpeech
        } else {
            OutputMode::Document
        });
    if let Some(key) = &cli.api_key {
        builder = builder.api_key(key);
    }
    let config = builder.build().context("invalid configuration")?;

    info!(
        model = %cli.model,
        api = ?cli.api,
        speech = cli.speech,
        workspace = %cli.workspace.display(),
        "starting docx2plain"
    );

    web::serve(&cli.bind, config)
        .await
        .context("server exited with an error")
}
