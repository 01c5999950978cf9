use std::process::ExitCode;

use tracing::info;
use tracing_subscriber::EnvFilter;

use markup_validator::{
    Cli, ConfigLoader, ContainerBuilder, Error, ErrorReporter, MarkupValidatorExtension, Output,
    ProcessorCatalog, VerbosityLevel, WiringSummary,
};

fn init_logging(verbosity: VerbosityLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.log_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: &Cli) -> Result<WiringSummary, Error> {
    let fragments = ConfigLoader::load_fragments(cli).await?;
    info!(fragments = fragments.len(), "configuration loaded");

    let catalog = ProcessorCatalog::external(cli.processors.iter().cloned())?;
    let extension = MarkupValidatorExtension::new(cli.namespace.clone());
    let mut container = ContainerBuilder::new();
    let registry = extension.load(&fragments, &catalog, &mut container)?;

    Ok(WiringSummary::new(extension.alias(), &registry, &container))
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse_args();
    init_logging(cli.verbosity());

    if let Err(message) = cli.validate() {
        eprintln!("Error: {}", message);
        return Ok(ExitCode::FAILURE);
    }

    match run(&cli).await {
        Ok(summary) => {
            let rendered = Output::new(cli.verbosity(), cli.format).format_wiring(&summary)?;
            if !rendered.is_empty() {
                println!("{}", rendered.trim_end());
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            ErrorReporter::new(cli.verbosity()).report(&error);
            Ok(ExitCode::FAILURE)
        }
    }
}
