use clap::Parser;
use mysql_grader::{Config, Reporter};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let config = Config::parse();
    let debug = config.debug;

    // Initialize logging
    config.init_logging()?;

    info!("Starting mysql-grader v{}", env!("CARGO_PKG_VERSION"));

    let mut reporter = Reporter::console(debug);
    let result = match config.into_settings() {
        Ok(settings) => mysql_grader::run(&settings, &mut reporter).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        reporter.report_setup_error(&e)?;
        std::process::exit(1);
    }

    Ok(())
}
