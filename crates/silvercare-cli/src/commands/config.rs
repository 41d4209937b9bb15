use anyhow::{Context, Result};

use silvercare_infrastructure::ConfigService;

use crate::ConfigAction;

pub fn run(service: &ConfigService, action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Path => println!("{}", service.path().display()),
        ConfigAction::Show => {
            let mut config = service.load().context("Failed to load config")?;
            if config.proxy.api_key.is_some() {
                config.proxy.api_key = Some("<redacted>".to_string());
            }
            let rendered =
                toml::to_string_pretty(&config).context("Failed to render config as TOML")?;
            print!("{}", rendered);
        }
        ConfigAction::Init => {
            if service.path().exists() {
                println!("Config already exists at {}", service.path().display());
                return Ok(());
            }
            let config = service.load_file().context("Failed to load config")?;
            service.save(&config).context("Failed to write config")?;
            println!("Wrote {}", service.path().display());
        }
    }
    Ok(())
}
