//! The `validate` command: parse and validate a configuration file.

use anyhow::Result;
use config_loader::ConfigLoader;

use crate::cli::ValidateArgs;
use crate::error::CliError;

/// Validate a configuration file without running the pipeline.
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    let config = ConfigLoader::load_from_path(&args.config)
        .map_err(|e| CliError::config_validation(e.to_string()))?;

    if args.json {
        println!("{}", ConfigLoader::to_json(&config)?);
    } else {
        println!("Configuration OK: {}", args.config.display());
    }
    Ok(())
}
