use anyhow::{bail, Context, Result};
use arxiv_daily::config::{default_config_path, find_config_file, get_config, load_config, Config};
use arxiv_daily::feed::{ArxivTransport, FeedPipeline};
use arxiv_daily::models::{Category, CATEGORIES};
use arxiv_daily::translate::{TargetLanguage, Translation, TranslationMethod, Translator};
use arxiv_daily::ui::{self, Spinner, Status};
use arxiv_daily::utils::{is_terminal, terminal_width};
use arxiv_daily::view::PaperListView;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// arXiv Daily - Browse the newest arXiv submissions from the terminal
#[derive(Parser, Debug)]
#[command(name = "arxiv-daily")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Browse the newest arXiv submissions by category", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (-v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, short, value_enum, global = true, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Request timeout in seconds (overrides the config file)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Automatic based on terminal (table if TTY, JSON otherwise)
    Auto,
    /// Table format (human-readable)
    Table,
    /// JSON format (machine-readable)
    Json,
    /// Plain text format
    Plain,
}

impl OutputFormat {
    fn resolve(self) -> Self {
        match self {
            OutputFormat::Auto if is_terminal() => OutputFormat::Table,
            OutputFormat::Auto => OutputFormat::Json,
            other => other,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch the newest papers in a category
    #[command(alias = "f")]
    Fetch {
        /// Category code, e.g. cs.CV (see `categories`)
        #[arg(long, short)]
        category: Option<String>,

        /// Number of papers to fetch (1-100)
        #[arg(long = "count", short = 'n')]
        count: Option<usize>,

        /// Pagination offset
        #[arg(long, default_value_t = 0)]
        start: usize,

        /// Show the detail view for this 1-based position
        #[arg(long, short)]
        select: Option<usize>,

        /// Translate the selected abstract (Chinese, Traditional Chinese, Japanese)
        #[arg(long, short, num_args = 0..=1, requires = "select")]
        translate: Option<Option<String>>,

        /// Translation backend: siliconflow or youdao (no API key)
        #[arg(long, requires = "translate")]
        method: Option<TranslationMethod>,
    },

    /// List the built-in categories
    Categories,

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration from file if specified or found in default locations
    let config_path = cli.config.clone().or_else(find_config_file);
    let mut config = match &config_path {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config file {}", path.display()))?,
        None => get_config()?,
    };
    if let Some(timeout) = cli.timeout {
        config.feed.timeout_secs = timeout;
    }

    init_tracing(&cli, &config);
    if let Some(path) = &config_path {
        tracing::debug!("Using config file: {}", path.display());
    }

    let format = cli.output.resolve();

    match cli.command {
        Commands::Fetch {
            category,
            count,
            start,
            select,
            translate,
            method,
        } => {
            if let Some(method) = method {
                config.translation.method = method;
            }
            let request = FetchRequest {
                category: category.unwrap_or_else(|| config.feed.default_category.clone()),
                count: count.unwrap_or(config.feed.default_count),
                start,
                select,
                translate,
            };
            run_fetch(&config, request, format, cli.quiet).await
        }
        Commands::Categories => {
            print_categories(format)?;
            Ok(())
        }
        Commands::Config { action } => match action {
            ConfigAction::Init { force } => config_init(cli.config, force),
            ConfigAction::Show => config_show(&config, config_path.as_deref()),
        },
    }
}

/// Install the tracing subscriber.
///
/// `RUST_LOG` wins; otherwise `-v`/`-q` pick the level, then the config file.
fn init_tracing(cli: &Cli, config: &Config) {
    let level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => config.logging.level.as_str(),
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| format!("arxiv_daily={}", level)),
    );
    let json = config.logging.is_json();

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
        }))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();
}

#[derive(Debug)]
struct FetchRequest {
    category: String,
    count: usize,
    start: usize,
    select: Option<usize>,
    translate: Option<Option<String>>,
}

async fn run_fetch(
    config: &Config,
    request: FetchRequest,
    format: OutputFormat,
    quiet: bool,
) -> Result<()> {
    let mut view = PaperListView::new();
    if !view.set_category(&request.category) {
        tracing::warn!(
            "{} is not a built-in category, querying it as given",
            request.category
        );
    }
    view.set_result_count(request.count);

    // Out-of-range counts go through to validation instead of being clamped
    let mut query = view.query().max_results(request.count).start(request.start);
    if Category::find(&request.category).is_none() {
        query.category = request.category.clone();
    }

    let pipeline = FeedPipeline::new(ArxivTransport::from_config(&config.feed)?);

    let spinner = if format == OutputFormat::Table && !quiet && is_terminal() {
        Spinner::new(&format!("Fetching latest {} papers...", query.category))
    } else {
        Spinner::hidden()
    };

    match pipeline.fetch(&query).await {
        Ok(records) => {
            spinner.clear();
            view.replace(records);
        }
        Err(e) => {
            spinner.clear();
            ui::eprint_status(Status::Error, &format!("Failed to fetch papers: {}", e));
            view.clear();
            print_listing(&view, format)?;
            std::process::exit(1);
        }
    }

    let Some(position) = request.select else {
        return print_listing(&view, format);
    };

    let Some(detail) = position.checked_sub(1).and_then(|i| view.detail(i)) else {
        bail!(
            "No paper at position {} ({} fetched)",
            position,
            view.len()
        );
    };

    let translation = match request.translate {
        Some(language) => {
            let label = language.unwrap_or_else(|| config.translation.target_language.clone());
            translate_abstract(config, &detail.abstract_text, &label, format, quiet).await
        }
        None => None,
    };

    match format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "paper": detail,
                "translation": translation,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Plain => println!("{}", ui::plain_detail(&detail, translation.as_ref())),
        _ => ui::print_detail(&detail, translation.as_ref()),
    }
    Ok(())
}

/// Translation failures are reported but never fail the command
async fn translate_abstract(
    config: &Config,
    text: &str,
    label: &str,
    format: OutputFormat,
    quiet: bool,
) -> Option<Translation> {
    let target = TargetLanguage::from_label(label);
    let translator = match Translator::from_config(&config.translation) {
        Ok(t) => t,
        Err(e) => {
            ui::eprint_status(Status::Warning, &format!("Translation unavailable: {}", e));
            return None;
        }
    };

    let spinner = if format == OutputFormat::Table && !quiet && is_terminal() {
        Spinner::new(&format!(
            "Translating into {} with {}...",
            target.prompt_name(),
            translator.model()
        ))
    } else {
        Spinner::hidden()
    };

    match translator.translate(text, target).await {
        Ok(translation) => {
            spinner.clear();
            Some(translation)
        }
        Err(e) => {
            spinner.clear();
            tracing::warn!("Translation failed: {}", e);
            ui::eprint_status(Status::Warning, &format!("Translation failed: {}", e));
            None
        }
    }
}

fn print_listing(view: &PaperListView, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(view.records())?),
        OutputFormat::Plain => println!("{}", ui::plain_listing(view)),
        _ => ui::print_listing(view, terminal_width()),
    }
    Ok(())
}

fn print_categories(format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(CATEGORIES)?),
        OutputFormat::Plain => {
            for category in CATEGORIES {
                println!("{}\t{}", category.code, category.name);
            }
        }
        _ => println!("{}", ui::categories_table()),
    }
    Ok(())
}

fn config_init(path: Option<PathBuf>, force: bool) -> Result<()> {
    let path = match path.or_else(default_config_path) {
        Some(path) => path,
        None => bail!("Could not determine a configuration directory; pass --config"),
    };
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    let mut config = Config::default();
    // Keys from the environment stay in the environment
    config.translation.api_key = None;
    config.save(&path)?;

    ui::print_status(
        Status::Success,
        &format!("Wrote default configuration to {}", path.display()),
    );
    Ok(())
}

fn config_show(config: &Config, path: Option<&std::path::Path>) -> Result<()> {
    let mut shown = config.clone();
    shown.translation.api_key = Some(config.translation.masked_api_key());

    match path {
        Some(path) => println!("# {}", path.display()),
        None => println!("# defaults and environment only"),
    }
    println!("{}", toml::to_string_pretty(&shown)?);
    Ok(())
}
