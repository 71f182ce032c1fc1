use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use kotrans::cli::Args;
use kotrans::config::{ConfigManager, resolve_config};
use kotrans::logging;
use kotrans::shell;
use kotrans::translation::TranslationService;
use kotrans::ui::{self, Spinner, Style};

fn main() -> Result<()> {
    let _args = Args::parse();
    logging::init();

    let manager = ConfigManager::new()?;
    let config = resolve_config(&manager.load_optional()?)?;
    ui::print_banner(&config);

    let spinner = Spinner::new(format!(
        "Loading {} (the first run downloads it, which can take a few minutes)...",
        config.model_id
    ));
    let service = match TranslationService::load(config) {
        Ok(service) => service,
        Err(e) => {
            spinner.stop();
            return Err(anyhow::Error::new(e).context("Failed to load translation model"));
        }
    };
    spinner.finish(&Style::ready(service.device()));

    shell::run(Arc::new(service))
}
