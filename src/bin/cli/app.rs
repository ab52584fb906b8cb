use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::Utc;

use wordgarden_lib::gateway::ContentGateway;
use wordgarden_lib::storage::JsonFileStore;
use wordgarden_lib::vocab::{Catalog, VocabularyEntry};
use wordgarden_lib::{AppConfig, Session};

/// Shared application state for CLI commands
pub struct App {
    pub config: AppConfig,
    pub catalog: Catalog,
    pub session: Session,
    pub data_dir: PathBuf,
}

impl App {
    /// Load config, catalog and saved state
    pub fn new(config_path: Option<&Path>) -> Result<Self> {
        let config = AppConfig::load_or_default(config_path).context("Failed to load config")?;

        let data_dir = config.data_dir().context("Failed to get data directory")?;

        let catalog = match &config.catalog_path {
            Some(path) => Catalog::load(path)
                .with_context(|| format!("Failed to load word packs from {}", path.display()))?,
            None => Catalog::builtin(),
        };

        let store = JsonFileStore::new(data_dir.clone());
        let mut session = Session::open(Box::new(store), config.scheduler(), Utc::now());

        if let Some(goal) = config.daily_goal {
            session.set_daily_goal(goal);
        }

        // Saved category may come from a different set of packs
        if catalog.pack(&session.state().current_category).is_none() {
            let fallback = catalog.default_category().to_string();
            session.set_category(&fallback);
        }

        Ok(Self {
            config,
            catalog,
            session,
            data_dir,
        })
    }

    /// Find a word by id, or by English spelling (case-insensitive)
    pub fn find_word(&self, key: &str) -> Result<VocabularyEntry> {
        if let Some(word) = self.catalog.find_word(key) {
            return Ok(word.clone());
        }

        let key_lower = key.to_lowercase();
        let matches: Vec<&VocabularyEntry> = self
            .catalog
            .all_words()
            .filter(|w| w.en.to_lowercase() == key_lower)
            .collect();

        match matches.len() {
            0 => bail!("No word matching '{}'. Run `packs` to see word ids.", key),
            1 => Ok(matches[0].clone()),
            _ => bail!(
                "Ambiguous word '{}'. Matches:\n{}",
                key,
                matches
                    .iter()
                    .map(|w| format!("  - {} ({})", w.id, w.category))
                    .collect::<Vec<_>>()
                    .join("\n")
            ),
        }
    }

    /// Build the content gateway. Must be called inside a tokio runtime.
    pub fn gateway(&self) -> Result<ContentGateway> {
        ContentGateway::from_config(&self.config.gateway, self.data_dir.join("artifacts.db"))
            .context("Failed to set up content gateway")
    }
}
