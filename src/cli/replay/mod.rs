//! Replay command - drives a configuration panel from a JSON script
//!
//! ```json
//! {
//!   "block": "conditional",
//!   "steps": [
//!     { "action": "type", "field": "condition", "text": "Hello #" },
//!     { "action": "accept", "name": "environment" },
//!     { "action": "save" }
//!   ]
//! }
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Args;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::domain::panel::{FieldGeometry, PanelEvent, PanelView, PointerTarget};
use crate::domain::{BlockKind, FieldKey, FlowNode};
use crate::AppContext;

#[derive(Debug, Args)]
pub struct ReplayArgs {
    /// Path to the session script
    pub script: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReplayScript {
    pub block: String,

    /// Node id; generated from the block kind when omitted
    #[serde(default)]
    pub node_id: Option<String>,

    pub steps: Vec<Step>,
}

/// One host interaction
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Step {
    /// Keystroke; the cursor defaults to the end of the text
    Type {
        field: String,
        text: String,
        #[serde(default)]
        cursor: Option<usize>,
    },
    Cursor {
        field: String,
        position: usize,
    },
    Geometry {
        field: String,
        top: f32,
        left: f32,
        height: f32,
    },
    Accept {
        #[serde(default)]
        index: Option<usize>,
        #[serde(default)]
        name: Option<String>,
    },
    Escape,
    Toggle,
    /// Pointer press on `outside`, `popup`, `function_picker` or a field key
    Click {
        target: String,
    },
    Choose {
        field: String,
        value: String,
    },
    OpenFunctionPicker,
    SelectFunction {
        name: String,
    },
    Save,
}

#[derive(Debug, Serialize)]
pub struct ReplayReport {
    pub node: FlowNode,
    pub events: Vec<PanelEvent>,
    pub view: PanelView,
}

fn parse_target(target: &str) -> anyhow::Result<PointerTarget> {
    Ok(match target {
        "outside" => PointerTarget::Outside,
        "popup" => PointerTarget::Popup,
        "function_picker" => PointerTarget::FunctionPicker,
        field => PointerTarget::Field(field.parse::<FieldKey>()?),
    })
}

/// Run a script against the context's reference stores
pub async fn execute(context: &AppContext, script: &ReplayScript) -> anyhow::Result<ReplayReport> {
    let kind: BlockKind = script.block.parse()?;
    let mut node = FlowNode::block(kind);
    if let Some(id) = &script.node_id {
        node = node.with_id(id.clone());
    }

    let mut panel = context.open_panel(&node).await?;
    let mut events = Vec::new();

    for (number, step) in script.steps.iter().enumerate() {
        debug!(step = number, ?step, "Replaying step");

        match step {
            Step::Type { field, text, cursor } => {
                let key = field.parse::<FieldKey>()?;
                panel.input(&key, text, cursor.unwrap_or(text.len()));
            }
            Step::Cursor { field, position } => {
                panel.move_cursor(&field.parse::<FieldKey>()?, *position);
            }
            Step::Geometry {
                field,
                top,
                left,
                height,
            } => {
                panel.set_geometry(field.parse::<FieldKey>()?, FieldGeometry::new(*top, *left, *height));
            }
            Step::Accept { index, name } => {
                let accepted = match (index, name) {
                    (_, Some(name)) => panel.accept_named(name),
                    (Some(index), None) => panel.accept(*index),
                    (None, None) => bail!("Step {}: accept needs an index or a name", number),
                };
                if accepted.is_none() {
                    debug!(step = number, "Nothing to accept");
                }
            }
            Step::Escape => {
                panel.escape();
            }
            Step::Toggle => {
                panel.toggle_domain();
            }
            Step::Click { target } => {
                context.bus.publish(parse_target(target)?);
                panel.pump_pointer_events();
            }
            Step::Choose { field, value } => {
                panel.select_choice(&field.parse::<FieldKey>()?, value);
            }
            Step::OpenFunctionPicker => {
                panel.open_function_picker();
            }
            Step::SelectFunction { name } => {
                panel.select_function(name);
            }
            Step::Save => {
                let saved = panel.save(context.stores.variables.as_ref()).await?;
                node.apply_config(saved.config)?;
            }
        }

        panel.render();
        panel.after_render();
        events.extend(panel.take_events());
    }

    let view = panel.render();
    panel.unmount();

    info!(node_id = %node.id(), steps = script.steps.len(), events = events.len(), "Replay finished");

    Ok(ReplayReport { node, events, view })
}

pub async fn run(config: &AppConfig, args: ReplayArgs) -> anyhow::Result<()> {
    let content = tokio::fs::read_to_string(&args.script)
        .await
        .with_context(|| format!("Failed to read script '{}'", args.script.display()))?;
    let script: ReplayScript = serde_json::from_str(&content)
        .with_context(|| format!("Invalid script '{}'", args.script.display()))?;

    let context = AppContext::from_config(config).await?;
    let report = execute(&context, &script).await?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
