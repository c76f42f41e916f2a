//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use blogsquad_core::export::write_markdown;
use blogsquad_core::{
    PipelineOutput, PipelineRequest, ProgressReporter, Stage, VerdictMatcher, run_pipeline,
};
use blogsquad_llm::{GroqClient, GroqOptions};
use blogsquad_search::{TavilyOptions, TavilySearch};
use blogsquad_shared::{AppConfig, BlogSquadError, init_config, load_config, validate_api_keys};
use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// BlogSquad: research, draft, and polish a blog post from a single topic.
#[derive(Parser)]
#[command(
    name = "blogsquad",
    version,
    about = "Research a topic on the web and turn it into a reviewed blog post.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// How the quality check reply is read.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum VerdictArg {
    /// Any occurrence of "fail" in the reply, in any case.
    Substring,
    /// "fail" as a standalone word only.
    Token,
}

impl From<VerdictArg> for VerdictMatcher {
    fn from(arg: VerdictArg) -> Self {
        match arg {
            VerdictArg::Substring => VerdictMatcher::Substring,
            VerdictArg::Token => VerdictMatcher::Token,
        }
    }
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Generate a blog post for a topic.
    Generate {
        /// Blog topic, e.g. "Agentic AI vs AI Agents".
        topic: String,

        /// Groq model id (defaults to the configured model).
        #[arg(short, long, env = "BLOGSQUAD_MODEL")]
        model: Option<String>,

        /// Number of web search results to research from.
        #[arg(long)]
        max_results: Option<usize>,

        /// Directory to save the final blog in (defaults to the configured output dir).
        #[arg(short, long)]
        out: Option<String>,

        /// Do not save the final blog to disk.
        #[arg(long)]
        no_save: bool,

        /// Print the full run as JSON instead of readable sections.
        #[arg(long)]
        json: bool,

        /// Verdict matching strategy for the quality check.
        #[arg(long, value_enum, default_value = "substring")]
        verdict: VerdictArg,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Environment
// ---------------------------------------------------------------------------

/// Accept the outcome of loading a `.env` file. A missing file is fine since
/// keys may come from the real environment; a malformed one is an error.
pub(crate) fn load_dotenv<T>(result: dotenvy::Result<T>) -> Result<()> {
    match result {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e.into()),
    }
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr so stdout
/// carries only the blog output.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "blogsquad=info",
        1 => "blogsquad=debug",
        _ => "blogsquad=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Generate {
            topic,
            model,
            max_results,
            out,
            no_save,
            json,
            verdict,
        } => {
            let opts = GenerateOptions {
                topic,
                model,
                max_results,
                out,
                no_save,
                json,
                verdict,
            };
            cmd_generate(opts).await
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

// ---------------------------------------------------------------------------
// generate
// ---------------------------------------------------------------------------

struct GenerateOptions {
    topic: String,
    model: Option<String>,
    max_results: Option<usize>,
    out: Option<String>,
    no_save: bool,
    json: bool,
    verdict: VerdictArg,
}

/// Build the run request: CLI flags override config, which overrides defaults.
fn build_request(opts: &GenerateOptions, config: &AppConfig) -> PipelineRequest {
    let model_id = opts
        .model
        .clone()
        .unwrap_or_else(|| config.defaults.model.clone());

    let mut request = PipelineRequest::new(opts.topic.clone(), model_id);
    request.max_results = opts.max_results.unwrap_or(config.defaults.max_results);
    request.matcher = opts.verdict.into();
    request
}

/// Resolve config and build a validated request.
///
/// A blank topic is rejected before the config is read, so a broken config
/// file never masks it. The model id is checked once config defaults apply.
fn prepare_request(
    opts: &GenerateOptions,
    load: impl FnOnce() -> blogsquad_shared::Result<AppConfig>,
) -> Result<(AppConfig, PipelineRequest)> {
    if opts.topic.trim().is_empty() {
        return Err(BlogSquadError::empty_input("topic").into());
    }

    let config = load()?;
    let request = build_request(opts, &config);
    request.validate()?;
    Ok((config, request))
}

async fn cmd_generate(opts: GenerateOptions) -> Result<()> {
    // Blank topic/model must fail before any key lookup or network call
    let (config, request) = prepare_request(&opts, load_config)?;
    validate_api_keys(&config)?;

    let search = TavilySearch::new(
        std::env::var(&config.tavily.api_key_env)?,
        &TavilyOptions::from(&config.tavily),
    )?;
    let model = GroqClient::new(
        std::env::var(&config.groq.api_key_env)?,
        &GroqOptions::from(&config.groq),
    )?;

    info!(
        topic = %request.topic,
        model = %request.model_id,
        max_results = request.max_results,
        "generating blog"
    );

    let reporter = CliProgress::new()?;
    let output = match run_pipeline(&request, &search, &model, &reporter).await {
        Ok(output) => output,
        Err(e) => {
            reporter.abandon();
            return Err(e.into());
        }
    };

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print!("{}", render_report(&output));
    }

    if !opts.no_save {
        let dir = PathBuf::from(
            opts.out
                .as_deref()
                .unwrap_or(config.defaults.output_dir.as_str()),
        );
        let path = write_markdown(&dir, &output.topic, &output.final_draft)?;
        if opts.json {
            info!(path = %path.display(), "saved final blog");
        } else {
            println!("  Saved:  {}", path.display());
            println!();
        }
    }

    Ok(())
}

/// Human-readable run report, one section per stage artifact.
fn render_report(output: &PipelineOutput) -> String {
    let mut report = String::new();

    section(&mut report, "Research Summary", &output.research);
    section(&mut report, "Initial Draft", &output.initial_draft);
    section(
        &mut report,
        "Quality Check",
        &format!("Result: {}", output.evaluation.trim()),
    );
    if let Some(improved) = &output.improved_draft {
        section(&mut report, "Edited Version", improved);
    }

    report.push_str("  Blog generation complete!\n");
    report.push_str(&format!("  Run:    {}\n", output.run_id));
    report.push_str(&format!("  Model:  {}\n", output.model));
    report.push_str(&format!(
        "  Edited: {}\n",
        if output.was_improved() { "yes" } else { "no" }
    ));
    report.push_str(&format!(
        "  Calls:  {} ({} tokens in, {} out)\n",
        output.model_calls, output.tokens_in, output.tokens_out
    ));
    report.push_str(&format!(
        "  Time:   {:.1}s\n",
        output.elapsed_ms as f64 / 1000.0
    ));
    report
}

fn section(report: &mut String, title: &str, body: &str) {
    report.push_str(&format!("== {title} ==\n\n"));
    let body = body.trim();
    if body.is_empty() {
        report.push_str("_Nothing generated._\n\n");
    } else {
        report.push_str(body);
        report.push_str("\n\n");
    }
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Result<Self> {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")?
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Ok(Self { spinner })
    }

    fn abandon(&self) {
        self.spinner.abandon_with_message("Blog generation failed");
    }
}

impl ProgressReporter for CliProgress {
    fn stage(&self, stage: Stage) {
        self.spinner.set_message(stage.label());
    }

    fn done(&self, _output: &PipelineOutput) {
        self.spinner.finish_and_clear();
    }
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
