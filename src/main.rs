use clap::Parser;
use stockdash::cli::{run, Cli};
use stockdash::logging::init_logging;

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_json);
    run(cli)
}
