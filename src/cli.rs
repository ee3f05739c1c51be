//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;

use crate::adapters::cache::{CachedFundamentals, CachedPrices};
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::lexicon_sentiment::LexiconSentiment;
use crate::adapters::text_report::format_dashboard;
use crate::domain::config_validation::validate_config;
use crate::domain::dashboard::{
    render, DashboardConfig, DashboardPorts, DashboardRequest, Section, DEFAULT_END, DEFAULT_START,
};
use crate::domain::error::DashError;
use crate::domain::indicator::IndicatorConfig;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::{FundamentalsPort, PricePort};

pub const DEFAULT_LISTEN: &str = "127.0.0.1:3000";

#[derive(Parser, Debug)]
#[command(
    name = "stockdash",
    about = "Stock analysis dashboard: indicators, fundamentals and headline sentiment"
)]
pub struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze one ticker and print the dashboard
    Analyze {
        #[arg(short, long)]
        ticker: String,
        /// First date included (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,
        /// First date excluded (YYYY-MM-DD)
        #[arg(long)]
        end: Option<NaiveDate>,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long, value_enum)]
        source: Option<SourceKind>,
        /// Directory holding {TICKER}.csv files, implies --source csv
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Start the web dashboard
    Serve {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Check a configuration file
    ValidateConfig {
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    Yahoo,
    Csv,
}

impl SourceKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "yahoo" => Some(SourceKind::Yahoo),
            "csv" => Some(SourceKind::Csv),
            _ => None,
        }
    }
}

/// Data ports shared by the CLI and the web server.
pub struct Sources {
    pub prices: Arc<dyn PricePort + Send + Sync>,
    pub fundamentals: Arc<dyn FundamentalsPort + Send + Sync>,
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Analyze {
            ticker,
            start,
            end,
            config,
            source,
            data_dir,
        } => run_analyze(
            &ticker,
            start,
            end,
            config.as_deref(),
            source,
            data_dir.as_deref(),
        ),
        Command::Serve { config } => run_serve(config.as_deref()),
        Command::ValidateConfig { config } => run_validate_config(&config),
    };

    result.unwrap_or_else(|e| {
        eprintln!("error: {e}");
        (&e).into()
    })
}

/// Missing path means built-in defaults throughout.
pub fn load_config(path: Option<&Path>) -> Result<FileConfigAdapter, DashError> {
    match path {
        Some(p) => {
            info!(path = %p.display(), "loading config");
            FileConfigAdapter::from_file(p)
        }
        None => Ok(FileConfigAdapter::empty()),
    }
}

fn window(config: &dyn ConfigPort, key: &str, default: usize) -> Result<usize, DashError> {
    let value = config.get_int("indicators", key, default as i64);
    usize::try_from(value)
        .ok()
        .filter(|v| *v > 0)
        .ok_or_else(|| DashError::ConfigInvalid {
            section: "indicators".to_string(),
            key: key.to_string(),
            reason: format!("{key} must be positive, got {value}"),
        })
}

pub fn build_dashboard_config(config: &dyn ConfigPort) -> Result<DashboardConfig, DashError> {
    let defaults = IndicatorConfig::default();
    let indicators = IndicatorConfig {
        short_window: window(config, "short_window", defaults.short_window)?,
        long_window: window(config, "long_window", defaults.long_window)?,
        rsi_window: window(config, "rsi_window", defaults.rsi_window)?,
        stop_loss_window: window(config, "stop_loss_window", defaults.stop_loss_window)?,
    };

    let preview = config.get_int("dashboard", "preview_rows", 5);
    let preview_rows = usize::try_from(preview)
        .ok()
        .filter(|v| *v > 0)
        .ok_or_else(|| DashError::ConfigInvalid {
            section: "dashboard".to_string(),
            key: "preview_rows".to_string(),
            reason: format!("preview_rows must be positive, got {preview}"),
        })?;

    Ok(DashboardConfig {
        indicators,
        preview_rows,
    })
}

pub fn default_range(config: &dyn ConfigPort) -> (NaiveDate, NaiveDate) {
    (
        config
            .get_date("dashboard", "default_start")
            .unwrap_or(DEFAULT_START),
        config
            .get_date("dashboard", "default_end")
            .unwrap_or(DEFAULT_END),
    )
}

/// Resolve the data source, flags first. A data directory alone selects
/// the CSV source.
pub fn build_sources(
    config: &dyn ConfigPort,
    source: Option<SourceKind>,
    data_dir: Option<&Path>,
) -> Result<Sources, DashError> {
    let kind = match source {
        Some(kind) => kind,
        None if data_dir.is_some() => SourceKind::Csv,
        None => match config.get_string("data", "source") {
            Some(s) => SourceKind::parse(&s).ok_or_else(|| DashError::ConfigInvalid {
                section: "data".to_string(),
                key: "source".to_string(),
                reason: format!("unknown source '{s}'"),
            })?,
            None => SourceKind::Yahoo,
        },
    };

    let sources = match kind {
        SourceKind::Csv => {
            let dir = data_dir
                .map(Path::to_path_buf)
                .or_else(|| config.get_string("data", "csv_dir").map(PathBuf::from))
                .ok_or_else(|| DashError::ConfigMissing {
                    section: "data".to_string(),
                    key: "csv_dir".to_string(),
                })?;
            info!(dir = %dir.display(), "using csv data source");
            let adapter = Arc::new(CsvAdapter::new(dir));
            Sources {
                prices: adapter.clone(),
                fundamentals: adapter,
            }
        }
        SourceKind::Yahoo => yahoo_sources(config)?,
    };

    if !config.get_bool("data", "cache", true) {
        return Ok(sources);
    }
    Ok(Sources {
        prices: Arc::new(CachedPrices::new(sources.prices)),
        fundamentals: Arc::new(CachedFundamentals::new(sources.fundamentals)),
    })
}

#[cfg(feature = "yahoo")]
fn yahoo_sources(config: &dyn ConfigPort) -> Result<Sources, DashError> {
    use crate::adapters::yahoo_adapter::YahooAdapter;
    use std::time::Duration;

    const DEFAULT_TIMEOUT_SECS: i64 = 30;
    let secs = config.get_int("data", "timeout_secs", DEFAULT_TIMEOUT_SECS);
    let timeout = Duration::from_secs(u64::try_from(secs).unwrap_or(DEFAULT_TIMEOUT_SECS as u64));
    info!(timeout_secs = timeout.as_secs(), "using yahoo data source");
    let adapter = Arc::new(YahooAdapter::new(timeout)?);
    Ok(Sources {
        prices: adapter.clone(),
        fundamentals: adapter,
    })
}

#[cfg(not(feature = "yahoo"))]
fn yahoo_sources(_config: &dyn ConfigPort) -> Result<Sources, DashError> {
    Err(DashError::ConfigInvalid {
        section: "data".to_string(),
        key: "source".to_string(),
        reason: "yahoo support is not compiled in; use source = csv".to_string(),
    })
}

fn run_analyze(
    ticker: &str,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    config_path: Option<&Path>,
    source: Option<SourceKind>,
    data_dir: Option<&Path>,
) -> Result<ExitCode, DashError> {
    let config = load_config(config_path)?;
    validate_config(&config)?;
    let dashboard_config = build_dashboard_config(&config)?;
    let sources = build_sources(&config, source, data_dir)?;

    let (default_start, default_end) = default_range(&config);
    let request = DashboardRequest::new(
        ticker,
        start.unwrap_or(default_start),
        end.unwrap_or(default_end),
    );

    let sentiment = LexiconSentiment::new();
    let ports = DashboardPorts {
        prices: sources.prices.as_ref(),
        fundamentals: sources.fundamentals.as_ref(),
        sentiment: &sentiment,
    };
    let dashboard = render(&ports, &request, &dashboard_config);
    print!("{}", format_dashboard(&dashboard, dashboard_config.preview_rows));

    let code = if dashboard.validation_error.is_some() {
        ExitCode::from(2)
    } else if matches!(dashboard.prices, Section::Failed(_)) {
        ExitCode::from(5)
    } else {
        ExitCode::SUCCESS
    };
    Ok(code)
}

fn run_validate_config(config_path: &Path) -> Result<ExitCode, DashError> {
    let config = load_config(Some(config_path))?;
    validate_config(&config)?;
    build_dashboard_config(&config)?;
    println!("Config OK: {}", config_path.display());
    Ok(ExitCode::SUCCESS)
}

#[cfg(feature = "web")]
fn run_serve(config_path: Option<&Path>) -> Result<ExitCode, DashError> {
    use crate::adapters::web::{build_router, AppState};
    use std::net::SocketAddr;

    let config = load_config(config_path)?;
    validate_config(&config)?;
    let dashboard = build_dashboard_config(&config)?;
    let sources = build_sources(&config, None, None)?;
    let (default_start, default_end) = default_range(&config);

    let listen = config
        .get_string("web", "listen")
        .unwrap_or_else(|| DEFAULT_LISTEN.to_string());
    let addr: SocketAddr = listen.trim().parse().map_err(|e| DashError::ConfigInvalid {
        section: "web".to_string(),
        key: "listen".to_string(),
        reason: format!("{e}"),
    })?;

    let state = AppState {
        prices: sources.prices,
        fundamentals: sources.fundamentals,
        sentiment: Arc::new(LexiconSentiment::new()),
        dashboard,
        default_start,
        default_end,
    };
    let router = build_router(state);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!(%addr, "dashboard listening");
        axum::serve(listener, router).await?;
        Ok::<_, std::io::Error>(())
    })?;

    Ok(ExitCode::SUCCESS)
}

#[cfg(not(feature = "web"))]
fn run_serve(_config_path: Option<&Path>) -> Result<ExitCode, DashError> {
    eprintln!("error: web feature is required for serve");
    Ok(ExitCode::from(1))
}
