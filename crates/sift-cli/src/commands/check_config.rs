//! Check-config command implementation.

use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;

/// Execute the check-config command.
pub fn execute_check_config(config: &Config, formatter: &Formatter) -> Result<()> {
    println!("{}", formatter.format_config(config)?);
    config.validate()?;
    println!("{}", formatter.success("Configuration is valid"));
    Ok(())
}
