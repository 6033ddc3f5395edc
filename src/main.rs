use clap::{Parser, Subcommand};
use std::io::{stderr, stdin, stdout};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::level_filters::LevelFilter;
use tracing::{debug, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use koperasi_ledger::config::{config_dir, init_config_dir, resolve_config, Config};
use koperasi_ledger::controller::ViewState;
use koperasi_ledger::error::{LedgerError, Result};
use koperasi_ledger::export::export_successful_records;
use koperasi_ledger::ledger::{FilterState, SavingsTypeFilter, StatusFilter};
use koperasi_ledger::session::{load_once, load_savings_types, Session};
use koperasi_ledger::view::{LedgerView, Theme};
use koperasi_ledger::{HttpReportingClient, ReportingApi};

#[derive(Parser)]
#[command(name = "koperasi")]
#[command(version, about = "Koperasi payment history viewer and exporter", long_about = None)]
struct Cli {
    /// Path to config directory (default: XDG config or ~/.koperasi)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    /// Reporting API base URL, overrides [api].base_url
    #[arg(long, global = true, env = "KOPERASI_API_URL")]
    base_url: Option<String>,

    /// Display theme, overrides [display].theme
    #[arg(long, global = true, value_enum)]
    theme: Option<Theme>,

    /// Log level written to stderr (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "KOPERASI_LOG", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with a template config.toml
    Init,

    /// Show the active configuration
    Status,

    /// List savings types (jenis simpanan)
    Types,

    /// Show payment history once, optionally exporting successful payments
    History {
        /// Search by member name
        #[arg(short, long, default_value = "")]
        search: String,

        /// Payment status filter (all, sukses, pending, failed)
        #[arg(long, default_value = "all")]
        status: String,

        /// Savings type id, or "all"
        #[arg(short, long, default_value = "all")]
        jenis: String,

        /// Export successful payments to .xlsx (requires --status sukses)
        #[arg(long)]
        export: bool,

        /// Export file path (default: [export].output_dir/[export].file_name)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Interactive session: change filters and export from a prompt
    Watch,
}

fn main() {
    let cli = Cli::parse();
    setup_logging(parse_log_level(&cli.log_level));

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        "off" => LevelFilter::OFF,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to 'warn'", level);
            LevelFilter::WARN
        }
    }
}

fn setup_logging(level: LevelFilter) {
    // stdout carries the rendered view, so logs go to stderr
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry().with(terminal_log).init();
}

fn run(cli: Cli) -> Result<()> {
    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };
    let base_url = cli.base_url.as_deref();

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::Status => cmd_status(&cfg_dir, base_url, cli.theme),
        Commands::Types => cmd_types(&cfg_dir, base_url, cli.theme),
        Commands::History {
            search,
            status,
            jenis,
            export,
            output,
        } => {
            let filter = FilterState {
                search_term: search,
                status: status.parse()?,
                savings_type: SavingsTypeFilter::parse(&jenis),
            };
            cmd_history(&cfg_dir, base_url, cli.theme, filter, export, output)
        }
        Commands::Watch => cmd_watch(&cfg_dir, base_url, cli.theme),
    }
}

fn build_client(config: &Config) -> Result<HttpReportingClient> {
    let base_url = config
        .api
        .base_url
        .as_deref()
        .filter(|url| !url.trim().is_empty())
        .ok_or(LedgerError::MissingBaseUrl)?;

    debug!(base_url, timeout_secs = config.api.timeout_secs, "building reporting client");
    Ok(HttpReportingClient::new(base_url, config.api.timeout()))
}

/// Initialize config directory with template files
fn cmd_init(cfg_dir: &Path) -> Result<()> {
    let path = init_config_dir(cfg_dir)?;

    println!("Initialized koperasi config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!("  1. Set the reporting API address:  $EDITOR {}", path.display());
    println!("  2. Show payment history:           koperasi history");
    println!("  3. Export successful payments:     koperasi history --status sukses --export");

    Ok(())
}

/// Show the active configuration
fn cmd_status(cfg_dir: &Path, base_url: Option<&str>, theme: Option<Theme>) -> Result<()> {
    let config = resolve_config(cfg_dir, base_url)?;
    let theme = theme.unwrap_or(config.display.theme);

    println!("Koperasi Status");
    println!("{}", "-".repeat(50));
    println!("Config directory: {}", cfg_dir.display());
    println!(
        "API base URL:     {}",
        config.api.base_url.as_deref().unwrap_or("(not set)")
    );
    println!("Timeout:          {}s", config.api.timeout_secs);
    println!("Export file:      {}", config.export.default_path().display());
    println!("Theme:            {:?}", theme);

    Ok(())
}

/// List savings types from the API
fn cmd_types(cfg_dir: &Path, base_url: Option<&str>, theme: Option<Theme>) -> Result<()> {
    let config = resolve_config(cfg_dir, base_url)?;
    let client = build_client(&config)?;
    let theme = theme.unwrap_or(config.display.theme);

    let types = client.list_savings_types()?;
    if types.is_empty() {
        println!("No savings types available.");
        return Ok(());
    }

    let view = LedgerView::new(&config.display, theme);
    println!("{}", view.savings_types_table(&types));

    Ok(())
}

/// Fetch, render and optionally export one filtered view
fn cmd_history(
    cfg_dir: &Path,
    base_url: Option<&str>,
    theme: Option<Theme>,
    filter: FilterState,
    export: bool,
    output: Option<PathBuf>,
) -> Result<()> {
    if export && filter.status != StatusFilter::Success {
        return Err(LedgerError::ExportRequiresSuccessFilter);
    }

    let config = resolve_config(cfg_dir, base_url)?;
    let client = build_client(&config)?;
    let theme = theme.unwrap_or(config.display.theme);

    let savings_types = load_savings_types(&client);
    let controller = load_once(&client, filter);

    let view = LedgerView::new(&config.display, theme);
    println!("{}", view.render(&controller, &savings_types));

    if !matches!(controller.state(), ViewState::Success(_)) {
        return Err(LedgerError::HistoryUnavailable);
    }

    if export {
        let path = output.unwrap_or_else(|| config.export.default_path());
        let count = export_successful_records(
            controller.records(),
            &path,
            &config.display.date_format,
        )?;
        info!(count, "export finished");
        println!();
        println!("Exported {} transaction(s) to {}", count, path.display());
    }

    Ok(())
}

/// Interactive session over stdin/stdout
fn cmd_watch(cfg_dir: &Path, base_url: Option<&str>, theme: Option<Theme>) -> Result<()> {
    let config = resolve_config(cfg_dir, base_url)?;
    let client = build_client(&config)?;
    let theme = theme.unwrap_or(config.display.theme);

    let mut session = Session::new(Arc::new(client), config, theme);
    let mut out = stdout().lock();
    session.run(stdin().lock(), &mut out)
}
