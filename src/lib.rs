pub mod config;
pub mod dispatch;
pub mod error;
pub mod loader;
pub mod sender;
pub mod shutdown;
pub mod template;

use anyhow::{Context, Result};

pub use crate::config::{Config, TemplateSource};
pub use crate::dispatch::{Dispatcher, Summary};
pub use crate::sender::{Client, Sender};
pub use crate::shutdown::Shutdown;
pub use crate::template::Template;

/// Load the templates named by `config` and build the dispatch loop for them.
///
/// Fails before any request is sent if the templates cannot be loaded.
pub fn app(config: &Config) -> Result<Dispatcher> {
    let templates =
        loader::load_all(&config.templates).context("failed to load request templates")?;

    tracing::info!(
        "loaded {} request templates, replaying with {} threads every {}s",
        templates.len(),
        config.threads,
        config.interval
    );

    let sender = Sender::new(Client::new(), config.preview_len);

    Ok(Dispatcher::from_config(templates, sender, config))
}
