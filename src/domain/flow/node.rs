//! Flow nodes a configuration panel can be opened for

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::block::{BlockConfig, BlockKind};
use crate::domain::DomainError;

/// Role of a node on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", content = "kind", rename_all = "snake_case")]
pub enum NodeKind {
    /// Flow entry point
    Input,

    /// Flow exit point
    Output,

    Block(BlockKind),
}

/// A node with its saved configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowNode {
    id: String,
    kind: NodeKind,
    label: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<BlockConfig>,

    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl FlowNode {
    /// Create a block node with an id derived from its kind
    pub fn block(kind: BlockKind) -> Self {
        let now = Utc::now();
        Self {
            id: format!("{}-{}", kind.as_str(), Uuid::new_v4()),
            kind: NodeKind::Block(kind),
            label: format!("{} Block", kind.label()),
            config: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create the flow's start node
    pub fn start() -> Self {
        let now = Utc::now();
        Self {
            id: "start".to_string(),
            kind: NodeKind::Input,
            label: "Start".to_string(),
            config: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_config(mut self, config: BlockConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn config(&self) -> Option<&BlockConfig> {
        self.config.as_ref()
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Block kind when the node can be configured
    pub fn block_kind(&self) -> Option<BlockKind> {
        match self.kind {
            NodeKind::Block(kind) => Some(kind),
            NodeKind::Input | NodeKind::Output => None,
        }
    }

    pub fn is_configurable(&self) -> bool {
        self.block_kind().is_some()
    }

    /// Configuration the panel starts from: the saved one, or an empty one
    pub fn initial_config(&self) -> Result<BlockConfig, DomainError> {
        let kind = self.block_kind().ok_or_else(|| {
            DomainError::validation(format!("Node '{}' has no configuration", self.id))
        })?;

        Ok(self
            .config
            .clone()
            .unwrap_or_else(|| BlockConfig::for_kind(kind)))
    }

    /// Store a committed configuration on the node
    pub fn apply_config(&mut self, config: BlockConfig) -> Result<(), DomainError> {
        match self.block_kind() {
            Some(kind) if kind == config.kind() => {
                self.config = Some(config);
                self.updated_at = Utc::now();
                Ok(())
            }
            Some(kind) => Err(DomainError::validation(format!(
                "Node '{}' is a {} block, got {} configuration",
                self.id,
                kind,
                config.kind()
            ))),
            None => Err(DomainError::validation(format!(
                "Node '{}' has no configuration",
                self.id
            ))),
        }
    }
}
