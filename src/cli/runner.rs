//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::cli::server;
use crate::config::ServiceConfig;
use crate::error::Result;
use crate::query::translate;
use crate::types::StringMap;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = ServiceConfig::from_settings(self.cli.settings())?;

        match &self.cli.command {
            None | Some(Commands::Serve) => {
                config.log_summary();
                server::serve(config).await
            }
            Some(Commands::Translate { path, query }) => self.translate(&config, path, query),
        }
    }

    /// Print the translation of one request
    fn translate(
        &self,
        config: &ServiceConfig,
        path: &str,
        query: &[(String, String)],
    ) -> Result<()> {
        let mut params = StringMap::new();
        for (key, value) in query {
            if !value.is_empty() {
                params.entry(key.clone()).or_insert_with(|| value.clone());
            }
        }

        let translated = translate(path, &params, &config.templates, &config.defaults);
        println!("{}", serde_json::to_string_pretty(&translated)?);
        Ok(())
    }
}
