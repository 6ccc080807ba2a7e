//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context as _, Result};

use quantum_commerce::{CommerceError, Storefront};
use quantum_data::{TabularClient, TabularStore};

use crate::config::{AdminConfig, CONFIG_NAMES};
use crate::output::Output;

/// The storefront every remote command runs against.
pub type RemoteStorefront = Storefront<TabularStore>;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: AdminConfig,
    /// Where `config` was read from, if anywhere.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = if let Some(path) = config_path {
            (AdminConfig::load(path)?, Some(PathBuf::from(path)))
        } else {
            match Self::find_config(&cwd)? {
                Some((config, path)) => (config, Some(path)),
                None => (AdminConfig::default(), None),
            }
        };

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Find config file in directory tree.
    ///
    /// A file that exists but does not parse is an error, not a miss.
    fn find_config(start: &Path) -> Result<Option<(AdminConfig, PathBuf)>> {
        let mut current = start.to_path_buf();
        loop {
            for name in CONFIG_NAMES {
                let path = current.join(name);
                if path.exists() {
                    let config = AdminConfig::load(&path.to_string_lossy())?;
                    return Ok(Some((config, path)));
                }
            }

            if !current.pop() {
                return Ok(None);
            }
        }
    }

    /// Run `f` against a storefront backed by the tabular API.
    ///
    /// The HTTP client is blocking, so the whole unit of work runs on the
    /// blocking pool behind a spinner.
    pub async fn with_storefront<R, F>(&self, message: &str, f: F) -> Result<R>
    where
        F: FnOnce(&mut RemoteStorefront) -> Result<R, CommerceError> + Send + 'static,
        R: Send + 'static,
    {
        self.config.api.validate().map_err(|e| {
            anyhow!(e).context("API is not configured; run `quantum config init --tenant <id>`")
        })?;

        let api = self.config.api.clone();
        let pricing = self.config.pricing.clone();
        let transitions = self.config.orders.status_transitions;

        self.output.debug(&format!(
            "tenant {} database {} at {}",
            api.tenant_id, api.database, api.base_url
        ));

        let spinner = self.output.spinner(message);
        let result = tokio::task::spawn_blocking(move || -> Result<R> {
            let client = TabularClient::connect(&api)?;
            let store = TabularStore::new(client).with_currency(pricing.currency()?);
            let mut shop = Storefront::from_config(store, &pricing, transitions)?;
            Ok(f(&mut shop)?)
        })
        .await
        .context("Storefront task panicked")?;
        spinner.finish_and_clear();

        result
    }
}
