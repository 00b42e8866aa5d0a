//! `legis` command-line entry point

use legis_cli::{command, init_logging, invocation, log_format, run};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = command().get_matches();
    init_logging(log_format(&matches));

    let invocation = invocation(&matches)?;
    tracing::debug!(?invocation, "running command");

    let output = run(&invocation).await?;
    print!("{output}");
    Ok(())
}
