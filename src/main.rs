use clap::Parser;

use bar_ingestor::cli::{self, Cli};

fn main() {
    let cli = Cli::parse();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(cli.log_level.clone()),
    )
    .init();

    if let Err(err) = cli::run(cli) {
        eprintln!("ERROR: {err}");
        std::process::exit(1);
    }
}
