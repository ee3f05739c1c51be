//! CLI integration tests.
//!
//! Tests cover:
//! - Config loading from INI files on disk
//! - Dashboard config and data source resolution
//! - `analyze` against a CSV data directory, exit codes included
//! - `validate-config` on good and bad files

mod common;

use clap::Parser;
use common::*;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;
use stockdash::cli::{self, Cli};
use stockdash::domain::dashboard::{DEFAULT_END, DEFAULT_START};
use stockdash::domain::error::DashError;
use tempfile::{NamedTempFile, TempDir};

fn write_temp_ini(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn exit_code_str(code: ExitCode) -> String {
    format!("{code:?}")
}

fn run_args(args: &[&str]) -> ExitCode {
    cli::run(Cli::try_parse_from(args).unwrap())
}

const VALID_INI: &str = r#"
[data]
source = csv
csv_dir = /tmp/stockdash-does-not-exist
timeout_secs = 20
cache = false

[indicators]
short_window = 10
long_window = 30
rsi_window = 14
stop_loss_window = 7

[dashboard]
preview_rows = 3
default_start = 2023-01-01
default_end = 2024-01-01

[web]
listen = 127.0.0.1:8088
"#;

mod config_loading {
    use super::*;

    #[test]
    fn load_config_reads_file() {
        let file = write_temp_ini(VALID_INI);
        let config = cli::load_config(Some(file.path())).unwrap();
        let dashboard = cli::build_dashboard_config(&config).unwrap();

        assert_eq!(dashboard.indicators.short_window, 10);
        assert_eq!(dashboard.indicators.long_window, 30);
        assert_eq!(dashboard.indicators.stop_loss_window, 7);
        assert_eq!(dashboard.preview_rows, 3);
        assert_eq!(
            cli::default_range(&config),
            (date("2023-01-01"), date("2024-01-01"))
        );
    }

    #[test]
    fn load_config_without_path_uses_defaults() {
        let config = cli::load_config(None).unwrap();
        assert_eq!(cli::default_range(&config), (DEFAULT_START, DEFAULT_END));
        assert_eq!(DEFAULT_START, date("2020-01-01"));
        assert_eq!(DEFAULT_END, date("2025-01-01"));
    }

    #[test]
    fn load_config_missing_file_is_parse_error() {
        let result = cli::load_config(Some(Path::new("/nonexistent/stockdash.ini")));
        assert!(matches!(result, Err(DashError::ConfigParse { .. })));
    }

    #[test]
    fn csv_dir_flag_overrides_config() {
        let file = write_temp_ini(VALID_INI);
        let config = cli::load_config(Some(file.path())).unwrap();
        let dir = TempDir::new().unwrap();
        write_price_csv(dir.path(), "ACME", "2023-01-01", &[1.0, 2.0, 3.0]);

        let sources = cli::build_sources(&config, None, Some(dir.path())).unwrap();
        let series = sources
            .prices
            .fetch_prices("ACME", date("2023-01-01"), date("2023-02-01"))
            .unwrap();
        assert_eq!(series.len(), 3);
    }
}

mod analyze_command {
    use super::*;

    #[test]
    fn analyze_csv_ticker_succeeds() {
        let dir = TempDir::new().unwrap();
        write_price_csv(dir.path(), "ACME", "2023-01-01", &trending_closes(250, 20.0, 0.2));
        std::fs::write(
            dir.path().join("ACME_fundamentals.csv"),
            "metric,value\nCompany Name,Acme Corp\n",
        )
        .unwrap();

        let code = run_args(&[
            "stockdash",
            "analyze",
            "--ticker",
            "acme",
            "--start",
            "2023-01-01",
            "--end",
            "2024-01-01",
            "--data-dir",
            dir.path().to_str().unwrap(),
        ]);
        assert_eq!(exit_code_str(code), exit_code_str(ExitCode::SUCCESS));
    }

    #[test]
    fn analyze_missing_ticker_file_exits_with_no_data_code() {
        let dir = TempDir::new().unwrap();
        let code = run_args(&[
            "stockdash",
            "analyze",
            "-t",
            "ZZZZ",
            "--data-dir",
            dir.path().to_str().unwrap(),
        ]);
        assert_eq!(exit_code_str(code), exit_code_str(ExitCode::from(5)));
    }

    #[test]
    fn analyze_inverted_range_exits_with_validation_code() {
        let dir = TempDir::new().unwrap();
        write_price_csv(dir.path(), "ACME", "2023-01-01", &[1.0, 2.0]);
        let code = run_args(&[
            "stockdash",
            "analyze",
            "-t",
            "ACME",
            "--start",
            "2024-01-01",
            "--end",
            "2023-01-01",
            "--data-dir",
            dir.path().to_str().unwrap(),
        ]);
        assert_eq!(exit_code_str(code), exit_code_str(ExitCode::from(2)));
    }

    #[test]
    fn analyze_invalid_config_exits_with_config_code() {
        let file = write_temp_ini("[indicators]\nshort_window = 300\nlong_window = 200\n");
        let code = run_args(&[
            "stockdash",
            "analyze",
            "-t",
            "ACME",
            "--config",
            file.path().to_str().unwrap(),
            "--source",
            "csv",
            "--data-dir",
            "/tmp",
        ]);
        assert_eq!(exit_code_str(code), exit_code_str(ExitCode::from(2)));
    }
}

mod validate_config_command {
    use super::*;

    #[test]
    fn valid_file_passes() {
        let file = write_temp_ini(VALID_INI);
        let code = run_args(&["stockdash", "validate-config", "-c", file.path().to_str().unwrap()]);
        assert_eq!(exit_code_str(code), exit_code_str(ExitCode::SUCCESS));
    }

    #[test]
    fn bad_listen_address_fails() {
        let file = write_temp_ini("[web]\nlisten = not-an-address\n");
        let code = run_args(&["stockdash", "validate-config", "-c", file.path().to_str().unwrap()]);
        assert_eq!(exit_code_str(code), exit_code_str(ExitCode::from(2)));
    }

    #[test]
    fn missing_file_fails() {
        let code = run_args(&["stockdash", "validate-config", "-c", "/nonexistent/stockdash.ini"]);
        assert_eq!(exit_code_str(code), exit_code_str(ExitCode::from(2)));
    }
}
