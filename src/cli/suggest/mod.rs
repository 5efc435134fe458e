//! Suggest command - runs the reference editor on a single text value

use clap::{Args, ValueEnum};
use serde::Serialize;

use crate::config::AppConfig;
use crate::domain::editor::{FieldReferenceState, TokenMatch, TriggerMap, TriggerProfiles};
use crate::domain::reference::{Candidate, ReferenceDomain, ReferenceSnapshot};
use crate::AppContext;

/// Field family whose trigger bindings apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FieldFamily {
    /// Conditions, queries and cache keys
    Condition,

    /// Function arguments
    Argument,

    /// Function return variable
    Return,
}

impl FieldFamily {
    fn triggers(self, profiles: &TriggerProfiles) -> &TriggerMap {
        match self {
            Self::Condition => &profiles.condition,
            Self::Argument => &profiles.argument,
            Self::Return => &profiles.return_variable,
        }
    }
}

#[derive(Debug, Args)]
pub struct SuggestArgs {
    /// Field family the text belongs to
    #[arg(long, value_enum, default_value_t = FieldFamily::Condition)]
    pub field: FieldFamily,

    /// Field text
    #[arg(long)]
    pub text: String,

    /// Cursor byte offset; defaults to the end of the text
    #[arg(long)]
    pub cursor: Option<usize>,

    /// Cycle the domain this many times on a toggle-capable trigger
    #[arg(long, default_value_t = 0)]
    pub toggle: usize,
}

#[derive(Debug, Serialize)]
pub struct SuggestOutput {
    #[serde(rename = "match")]
    pub token: Option<TokenMatch>,
    pub domain: Option<ReferenceDomain>,
    pub candidates: Vec<Candidate>,
}

/// Compute the suggestion for one text value
pub fn suggest(
    args: &SuggestArgs,
    profiles: &TriggerProfiles,
    snapshot: &ReferenceSnapshot,
    limit: Option<usize>,
) -> SuggestOutput {
    let triggers = args.field.triggers(profiles);
    let cursor = args.cursor.unwrap_or(args.text.len());

    let mut state = FieldReferenceState::new();
    state.recompute(&args.text, cursor, triggers, snapshot, false, limit);

    for _ in 0..args.toggle {
        if state.toggle_domain(triggers, snapshot, limit).is_none() {
            break;
        }
    }

    SuggestOutput {
        token: state.active().cloned(),
        domain: state.domain(),
        candidates: state.candidates().to_vec(),
    }
}

pub async fn run(config: &AppConfig, args: SuggestArgs) -> anyhow::Result<()> {
    let context = AppContext::from_config(config).await?;
    let snapshot = context.stores.snapshot().await?;

    let output = suggest(
        &args,
        &context.settings.triggers,
        &snapshot,
        context.settings.max_suggestions,
    );
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
