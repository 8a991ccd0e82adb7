use anyhow::Result;
use owo_colors::OwoColorize;
use shiftcal_core::config::ShiftcalConfig;

pub fn run(config: &ShiftcalConfig) -> Result<()> {
    let config_path = ShiftcalConfig::config_path()?;

    println!("{}", "Paths".bold());
    println!("  Config:     {}", config_path.display());
    println!("  Data:       {}", config.data_path().display());
    println!();
    println!("{}", "Settings".bold());
    println!("  Overwrite:  {:?}", config.overwrite_policy);
    println!("  Timezone:   {}", config.timezone);
    println!("  Export:     {}", config.export_scope().label());

    Ok(())
}

pub fn set(key: &str, value: &str) -> Result<()> {
    let config_path = ShiftcalConfig::config_path()?;
    if !config_path.exists() {
        ShiftcalConfig::create_default_config(&config_path)?;
    }

    ShiftcalConfig::set_in_file(&config_path, key, value)?;
    println!(
        "{} {key} = {value} {}",
        "Saved:".green(),
        format!("({})", config_path.display()).dimmed()
    );
    Ok(())
}
