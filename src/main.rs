use anyhow::Result;
use clap::{CommandFactory, Parser};
use ipatriage::cli;
use ipatriage::output::{self, TerminalReporter};
use ipatriage::tool::SystemInvoker;
use ipatriage::Pipeline;
use std::path::Path;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = cli::Args::parse();

    // Use RUST_LOG env var if set, otherwise the verbose flag
    let env_filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if args.verbose {
        EnvFilter::new("ipatriage=debug")
    } else {
        EnvFilter::new("ipatriage=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    debug!("Logging initialized (verbose={})", args.verbose);

    output::print_banner();

    let Some(archive) = args.archive else {
        cli::Args::command().print_help()?;
        return Ok(());
    };

    let invoker = SystemInvoker;
    let pipeline = Pipeline::new(&invoker);
    pipeline.run(Path::new(&archive), &mut TerminalReporter)?;

    Ok(())
}
