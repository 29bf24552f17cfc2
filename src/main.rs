use clap::Parser;
use subreport::cli::{self, Config};

#[tokio::main]
async fn main() {
    let config = Config::parse();

    env_logger::Builder::new()
        .filter_level(config.log_level_filter())
        .parse_default_env()
        .init();

    if let Err(err) = cli::run(config).await {
        cli::die(1, &err.to_string());
    }
}
