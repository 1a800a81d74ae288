//! `siteforge config`

use anyhow::Result;

use crate::Config;

pub fn execute_config_command(config: &Config) -> Result<()> {
    match &config.config_path {
        Some(path) => println!("Config file: {}", path.display()),
        None => println!("Config file: (none, using defaults)"),
    }
    println!();
    let effective = config.effective_config();
    let width = effective.keys().map(String::len).max().unwrap_or(0);
    for (key, (value, source)) in &effective {
        println!("  {key:<width$} = {value}  [{source}]");
    }
    Ok(())
}
