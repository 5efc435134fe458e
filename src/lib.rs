//! Flow block configuration
//!
//! Configuration panels for workflow-graph blocks whose free-text fields can
//! embed inline references:
//! - `#tag` and `$variable` references in conditions, queries and cache keys
//! - Variable or tag references in function arguments, with a domain toggle
//! - Return variables registered as global variables on save

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use tracing::info;

use domain::{ConfigPanel, DomainError, FlowNode, InteractionBus, PanelSettings};
use infrastructure::reference::{load_stores, ReferenceStores};

/// Everything a host needs to open configuration panels
#[derive(Debug, Clone)]
pub struct AppContext {
    pub settings: PanelSettings,
    pub stores: ReferenceStores,
    pub bus: InteractionBus,
}

impl AppContext {
    /// Build the context from configuration, seeding the reference stores
    pub async fn from_config(config: &AppConfig) -> Result<Self, DomainError> {
        let settings = config.editor.panel_settings()?;
        let stores = load_stores(&config.references).await?;

        info!(
            max_suggestions = ?settings.max_suggestions,
            seed_file = ?config.references.seed_file,
            "Application context ready"
        );

        Ok(Self {
            settings,
            stores,
            bus: InteractionBus::default(),
        })
    }

    /// Mount a panel for a node against a fresh reference snapshot
    pub async fn open_panel(&self, node: &FlowNode) -> Result<ConfigPanel, DomainError> {
        let snapshot = self.stores.snapshot().await?;
        ConfigPanel::mount(node, snapshot, self.settings.clone(), &self.bus)
    }
}
