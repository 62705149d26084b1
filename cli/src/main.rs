use anyhow::{Result, anyhow};
use clap::Parser;
use tierhue::commands::{self, Cli};
use tierhue::{config, logger};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = config::load_config(cli.config.as_deref())
        .into_result()
        .map_err(|e| anyhow!(e))?
        .with_overrides(cli.store, cli.user);

    if let Err(errors) = config.validate() {
        let messages: Vec<String> = errors.iter().map(|e| e.user_message()).collect();
        return Err(anyhow!(
            "Configuration validation failed:\n{}",
            messages.join("\n\n")
        ));
    }

    logger::setup_logger(config.logging())?;

    let output = commands::run(cli.command, &config).await?;
    println!("{output}");
    Ok(())
}
