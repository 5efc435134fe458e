//! Configuration panel of a single flow node
//!
//! Binds the rendered fields of a block to the reference editor: every
//! keystroke or caret move recomputes the field's reference state, and one
//! shared [`SuggestionSession`] decides which field, if any, shows a popup.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use super::caret::DeferredCarets;
use super::events::{PanelEvent, SavedConfig};
use super::interaction::{InteractionBus, PointerSubscription, PointerTarget};
use super::registration::register_return_variable;
use super::view::{
    FieldGeometry, FieldView, FunctionOption, NO_OPTIONS_MESSAGE, PanelView, PopupItem, PopupView,
};
use crate::domain::block::{BlockConfig, FieldKey, FieldSpec, SchemaContext, Widget};
use crate::domain::editor::{
    clamp_cursor, insert, locate, CloseReason, FieldReferenceState, Insertion, OpenPopup,
    SuggestionSession, TriggerMap, TriggerProfiles,
};
use crate::domain::flow::FlowNode;
use crate::domain::reference::{ReferenceDomain, ReferenceSnapshot, VariableRepository};
use crate::domain::DomainError;

/// Editor behaviour shared by every panel
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelSettings {
    pub triggers: TriggerProfiles,

    /// Cap on listed suggestions; `None` lists every match
    pub max_suggestions: Option<usize>,
}

/// Host-side state of one input element
#[derive(Debug, Clone, Default)]
struct InputState {
    cursor: usize,
    geometry: Option<FieldGeometry>,

    /// Text the caret position was last synced with
    rendered: Option<String>,
}

/// Bindings that belong to the selected function
fn is_function_binding(key: &FieldKey) -> bool {
    matches!(key, FieldKey::Argument(_) | FieldKey::ReturnVariable)
}

pub struct ConfigPanel {
    node_id: String,
    title: String,
    config: BlockConfig,
    snapshot: ReferenceSnapshot,
    settings: PanelSettings,
    inputs: BTreeMap<FieldKey, InputState>,
    fields: BTreeMap<FieldKey, FieldReferenceState>,
    session: SuggestionSession<FieldKey>,
    focused: Option<FieldKey>,
    function_picker_open: bool,
    carets: DeferredCarets,
    events: Vec<PanelEvent>,
    pointer: PointerSubscription,
}

impl ConfigPanel {
    /// Open a panel for a node and start listening for pointer events
    pub fn mount(
        node: &FlowNode,
        snapshot: ReferenceSnapshot,
        settings: PanelSettings,
        bus: &InteractionBus,
    ) -> Result<Self, DomainError> {
        let config = node.initial_config()?;

        debug!(node_id = %node.id(), kind = %config.kind(), "Configuration panel mounted");

        Ok(Self {
            node_id: node.id().to_string(),
            title: format!("Configure {}", node.label()),
            config,
            snapshot,
            settings,
            inputs: BTreeMap::new(),
            fields: BTreeMap::new(),
            session: SuggestionSession::new(),
            focused: None,
            function_picker_open: false,
            carets: DeferredCarets::new(),
            events: Vec::new(),
            pointer: bus.subscribe(),
        })
    }

    /// Fields the current configuration renders, in display order
    pub fn field_specs(&self) -> Vec<FieldSpec> {
        self.config.fields(&SchemaContext {
            snapshot: &self.snapshot,
            triggers: &self.settings.triggers,
        })
    }

    fn spec(&self, key: &FieldKey) -> Option<FieldSpec> {
        self.field_specs().into_iter().find(|s| &s.key == key)
    }

    /// Record where the host laid out a field
    pub fn set_geometry(&mut self, key: FieldKey, geometry: FieldGeometry) {
        self.inputs.entry(key).or_default().geometry = Some(geometry);
    }

    /// Keystroke in a text field: new text and caret position
    pub fn input(&mut self, key: &FieldKey, text: &str, cursor: usize) -> bool {
        let Some(spec) = self.spec(key).filter(FieldSpec::is_editable_text) else {
            debug!(field = %key, "Ignoring input for a field this block does not render");
            return false;
        };

        if !self.config.set_value(key, text) {
            debug!(field = %key, "Ignoring input the block configuration rejected");
            return false;
        }

        let input = self.inputs.entry(key.clone()).or_default();
        input.cursor = clamp_cursor(text, cursor);
        input.rendered = Some(text.to_string());
        self.carets.retain(|k| k != key);

        self.focused = Some(key.clone());
        self.events.push(PanelEvent::FieldChanged {
            field: key.clone(),
            text: text.to_string(),
        });

        if let Some(triggers) = spec.triggers {
            self.refresh(key, &triggers);
        }

        true
    }

    /// Caret moved without a text change
    pub fn move_cursor(&mut self, key: &FieldKey, cursor: usize) -> bool {
        let Some(spec) = self.spec(key).filter(FieldSpec::is_editable_text) else {
            debug!(field = %key, "Ignoring caret move for a field this block does not render");
            return false;
        };

        let text = self.config.value(key).unwrap_or_default();
        let input = self.inputs.entry(key.clone()).or_default();
        input.cursor = clamp_cursor(&text, cursor);
        input.rendered = Some(text);
        self.carets.retain(|k| k != key);
        self.focused = Some(key.clone());

        if let Some(triggers) = spec.triggers {
            self.refresh(key, &triggers);
        }

        true
    }

    /// Rebuild a field's reference state and open, update or close the popup
    fn refresh(&mut self, key: &FieldKey, triggers: &TriggerMap) {
        let text = self.config.value(key).unwrap_or_default();
        let (cursor, anchor) = self
            .inputs
            .get(key)
            .map(|i| (i.cursor, i.geometry.map(|g| g.anchor()).unwrap_or_default()))
            .unwrap_or_default();

        let state = self.fields.entry(key.clone()).or_default();
        state.recompute(
            &text,
            cursor,
            triggers,
            &self.snapshot,
            true,
            self.settings.max_suggestions,
        );

        let (Some(token), Some(domain)) = (state.active().cloned(), state.domain()) else {
            self.session.close_if_owner(key, CloseReason::TriggerLost);
            return;
        };

        if !state.wants_popup() {
            self.session.close_if_owner(key, CloseReason::NoMatches);
            return;
        }

        let popup = OpenPopup {
            owner: key.clone(),
            trigger: token.trigger,
            trigger_index: token.trigger_index,
            domain,
            can_toggle: triggers
                .binding(token.trigger)
                .is_some_and(|b| b.has_toggle()),
            candidates: state.candidates().to_vec(),
            anchor,
        };
        state.mark_suggesting();

        if let Some(evicted) = self.session.open(popup) {
            if let Some(previous) = self.fields.get_mut(&evicted) {
                previous.dismiss();
            }
        }
    }

    /// Close the popup and reset the field that owned it
    fn close_popup(&mut self, reason: CloseReason) -> bool {
        match self.session.close(reason) {
            Some(owner) => {
                if let Some(state) = self.fields.get_mut(&owner) {
                    state.dismiss();
                }
                true
            }
            None => false,
        }
    }

    /// Escape key: close the popup and the function picker
    pub fn escape(&mut self) -> bool {
        let picker_was_open = std::mem::take(&mut self.function_picker_open);
        self.close_popup(CloseReason::Escape) || picker_was_open
    }

    /// Accept the popup entry at `index`
    pub fn accept(&mut self, index: usize) -> Option<Insertion> {
        let (owner, trigger, trigger_index, name) = {
            let popup = self.session.popup()?;
            let candidate = popup.candidates.get(index)?;
            (
                popup.owner.clone(),
                popup.trigger,
                popup.trigger_index,
                candidate.name.clone(),
            )
        };

        let text = self.config.value(&owner)?;
        let cursor = self
            .inputs
            .get(&owner)
            .map(|i| i.cursor)
            .unwrap_or(text.len());

        let still_active = self
            .spec(&owner)
            .and_then(|spec| spec.triggers)
            .and_then(|triggers| locate(&text, cursor, &triggers.triggers()))
            .is_some_and(|token| token.trigger == trigger && token.trigger_index == trigger_index);

        let Some(insertion) = still_active
            .then(|| insert(&text, trigger_index, cursor, trigger, &name))
            .flatten()
        else {
            warn!(field = %owner, "Popup no longer matches the reference at the caret");
            self.close_popup(CloseReason::TriggerLost);
            return None;
        };

        if !self.config.set_value(&owner, &insertion.new_text) {
            return None;
        }

        self.session.close(CloseReason::Accepted);
        self.fields
            .entry(owner.clone())
            .or_default()
            .settle(&insertion.new_text, insertion.new_cursor);
        self.carets.schedule(owner.clone(), insertion.new_cursor);
        self.focused = Some(owner.clone());

        debug!(field = %owner, reference = %name, "Suggestion accepted");

        self.events.push(PanelEvent::FieldChanged {
            field: owner,
            text: insertion.new_text.clone(),
        });

        Some(insertion)
    }

    /// Accept the popup entry with the given name
    pub fn accept_named(&mut self, name: &str) -> Option<Insertion> {
        let index = self
            .session
            .popup()?
            .candidates
            .iter()
            .position(|c| c.name == name)?;

        self.accept(index)
    }

    /// Cycle the popup to the next domain of its trigger
    pub fn toggle_domain(&mut self) -> Option<ReferenceDomain> {
        let owner = self.session.owner()?.clone();
        let triggers = self.spec(&owner)?.triggers?;

        let state = self.fields.get_mut(&owner)?;
        let next = state.toggle_domain(&triggers, &self.snapshot, self.settings.max_suggestions)?;
        let candidates = state.candidates().to_vec();

        self.session.update_candidates(next, candidates);

        debug!(field = %owner, domain = %next, "Suggestion domain toggled");
        Some(next)
    }

    /// Pick an option of a select field
    pub fn select_choice(&mut self, key: &FieldKey, value: &str) -> bool {
        let allowed = match self.spec(key).map(|s| s.widget) {
            Some(Widget::Select { options }) => options.iter().any(|o| o.value == value),
            _ => {
                debug!(field = %key, "Ignoring choice for a field that is not a rendered select");
                return false;
            }
        };

        if !allowed || !self.config.set_value(key, value) {
            debug!(field = %key, value = %value, "Ignoring unknown option");
            return false;
        }

        self.focused = Some(key.clone());
        self.events.push(PanelEvent::FieldChanged {
            field: key.clone(),
            text: value.to_string(),
        });
        self.prune_unrendered();

        true
    }

    /// Forget state of fields the configuration no longer renders
    fn prune_unrendered(&mut self) {
        let rendered: Vec<FieldKey> = self.field_specs().into_iter().map(|s| s.key).collect();

        if self
            .session
            .owner()
            .is_some_and(|owner| !rendered.contains(owner))
        {
            self.session.close(CloseReason::Replaced);
        }

        self.fields.retain(|k, _| rendered.contains(k));
        self.carets.retain(|k| rendered.contains(k));
        if self.focused.as_ref().is_some_and(|k| !rendered.contains(k)) {
            self.focused = None;
        }
    }

    pub fn open_function_picker(&mut self) -> bool {
        if self.config.as_function().is_none() {
            debug!(node_id = %self.node_id, "Block has no function to pick");
            return false;
        }

        self.close_popup(CloseReason::Replaced);
        self.function_picker_open = true;
        true
    }

    /// Select the function a function block calls.
    ///
    /// Argument and return bindings are reset even when the same function
    /// is picked again.
    pub fn select_function(&mut self, name: &str) -> bool {
        let Some(function_config) = self.config.as_function_mut() else {
            debug!(node_id = %self.node_id, "Ignoring function selection on a non-function block");
            return false;
        };

        if self.snapshot.function(name).is_none() {
            warn!(function = %name, "Ignoring selection of unknown function");
            return false;
        }

        function_config.select_function(name);
        self.function_picker_open = false;

        if self.session.owner().is_some_and(is_function_binding) {
            self.session.close(CloseReason::Replaced);
        }
        self.fields.retain(|k, _| !is_function_binding(k));
        self.inputs.retain(|k, _| !is_function_binding(k));
        self.carets.retain(|k| !is_function_binding(k));
        self.focused = Some(FieldKey::Function);

        info!(node_id = %self.node_id, function = %name, "Function selected");

        self.events.push(PanelEvent::FieldChanged {
            field: FieldKey::Function,
            text: name.to_string(),
        });

        true
    }

    /// Build the view for the host.
    ///
    /// Fields whose text changed programmatically since the last sync get
    /// their caret put at the end, the way a re-rendered input does.
    pub fn render(&mut self) -> PanelView {
        let specs = self.field_specs();
        let mut fields = Vec::with_capacity(specs.len());

        for spec in specs {
            let value = self.config.value(&spec.key).unwrap_or_default();

            let input = self.inputs.entry(spec.key.clone()).or_default();
            if input.rendered.as_deref() != Some(value.as_str()) {
                input.cursor = value.len();
                input.rendered = Some(value.clone());
            }
            let cursor = input.cursor;

            let focused = self.focused.as_ref() == Some(&spec.key);
            let reference_bearing = spec.is_reference_bearing();
            let phase = self
                .fields
                .get(&spec.key)
                .map(|s| s.phase())
                .unwrap_or_default();

            fields.push(FieldView {
                key: spec.key,
                label: spec.label,
                placeholder: spec.placeholder,
                widget: spec.widget,
                value,
                cursor,
                focused,
                reference_bearing,
                phase,
            });
        }

        let popup = self.session.popup().map(|p| PopupView {
            owner: p.owner.clone(),
            heading: p.domain.label(),
            domain: p.domain,
            can_toggle: p.can_toggle,
            anchor: p.anchor,
            items: p.candidates.iter().map(PopupItem::from).collect(),
        });

        let function_picker: Option<Vec<FunctionOption>> = self
            .function_picker_open
            .then(|| self.snapshot.functions().iter().map(FunctionOption::from).collect());

        let message = fields.is_empty().then_some(NO_OPTIONS_MESSAGE);

        PanelView {
            node_id: self.node_id.clone(),
            kind: self.config.kind(),
            title: self.title.clone(),
            fields,
            popup,
            function_picker,
            message,
        }
    }

    /// Apply caret restorations queued before the last render.
    ///
    /// A field that owns the popup again is left alone. Returns how many
    /// were applied.
    pub fn after_render(&mut self) -> usize {
        let mut applied = 0;

        for restore in self.carets.drain() {
            if self.session.is_owned_by(&restore.field) {
                continue;
            }
            let Some(text) = self.config.value(&restore.field) else {
                continue;
            };
            let position = clamp_cursor(&text, restore.position);

            let input = self.inputs.entry(restore.field.clone()).or_default();
            input.cursor = position;
            input.rendered = Some(text.clone());

            self.fields
                .entry(restore.field.clone())
                .or_default()
                .settle(&text, position);
            self.focused = Some(restore.field);
            applied += 1;
        }

        applied
    }

    /// Drop the popup, the picker and every field state
    fn close_all(&mut self) {
        self.session.close(CloseReason::OutsidePointer);
        self.fields.clear();
        self.function_picker_open = false;
    }

    /// Handle pointer presses received since the last call.
    ///
    /// Focusing another reference-bearing field leaves an open popup with
    /// its owner until that field's next change or an outside press.
    pub fn pump_pointer_events(&mut self) -> usize {
        let targets = self.pointer.drain();

        for target in &targets {
            match target {
                PointerTarget::Outside => self.close_all(),
                PointerTarget::Field(key) => match self.spec(key) {
                    Some(spec) if spec.is_reference_bearing() => {
                        self.focused = Some(key.clone());
                    }
                    Some(spec) if matches!(spec.widget, Widget::Picker) => {
                        self.session.close(CloseReason::OutsidePointer);
                        self.fields.clear();
                        self.focused = Some(key.clone());
                    }
                    _ => self.close_all(),
                },
                PointerTarget::Popup | PointerTarget::FunctionPicker => {}
            }
        }

        targets.len()
    }

    /// Commit the configuration, registering a bare return variable
    pub async fn save(
        &mut self,
        variables: &dyn VariableRepository,
    ) -> Result<SavedConfig, DomainError> {
        if let Some(function_config) = self.config.as_function_mut() {
            if function_config.normalize_return_variable() {
                debug!(node_id = %self.node_id, "Trimmed whitespace around return variable");
            }
        }

        let registered = match self.config.as_function() {
            Some(function_config) => {
                let function = function_config
                    .function_name
                    .as_deref()
                    .and_then(|name| self.snapshot.function(name));

                register_return_variable(
                    function_config,
                    function,
                    &self.settings.triggers.all_triggers(),
                    variables,
                )
                .await?
            }
            None => None,
        };

        if let Some(variable) = &registered {
            self.snapshot.push_variable(variable.clone());
        }

        let saved = SavedConfig {
            node_id: self.node_id.clone(),
            config: self.config.clone(),
            registered,
        };

        info!(
            node_id = %self.node_id,
            kind = %self.config.kind(),
            registered = saved.registered.is_some(),
            "Block configuration saved"
        );

        self.events.push(PanelEvent::ConfigSaved(saved.clone()));
        Ok(saved)
    }

    /// Drain queued events, oldest first
    pub fn take_events(&mut self) -> Vec<PanelEvent> {
        std::mem::take(&mut self.events)
    }

    /// Tear the panel down and stop listening for pointer events
    pub fn unmount(mut self) {
        self.session.close(CloseReason::Unmounted);
        debug!(node_id = %self.node_id, "Configuration panel unmounted");
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    pub fn config(&self) -> &BlockConfig {
        &self.config
    }

    pub fn snapshot(&self) -> &ReferenceSnapshot {
        &self.snapshot
    }

    pub fn settings(&self) -> &PanelSettings {
        &self.settings
    }

    pub fn session(&self) -> &SuggestionSession<FieldKey> {
        &self.session
    }

    pub fn field_state(&self, key: &FieldKey) -> Option<&FieldReferenceState> {
        self.fields.get(key)
    }

    pub fn focused(&self) -> Option<&FieldKey> {
        self.focused.as_ref()
    }

    pub fn cursor(&self, key: &FieldKey) -> Option<usize> {
        self.inputs.get(key).map(|i| i.cursor)
    }

    pub fn is_function_picker_open(&self) -> bool {
        self.function_picker_open
    }

    pub fn pending_carets(&self) -> usize {
        self.carets.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::block::BlockKind;
    use crate::domain::editor::FieldPhase;
    use crate::domain::reference::repository::MockVariableRepository;
    use crate::domain::reference::{FunctionDescriptor, Tag, Variable, VariableType};

    fn snapshot() -> ReferenceSnapshot {
        ReferenceSnapshot::new(
            vec![
                Tag::new("1", "environment", "production", "String"),
                Tag::new("2", "version", "1.2.3", "String"),
                Tag::new("3", "region", "us-east-1", "String"),
            ],
            vec![
                Variable::new("MAX_RETRIES", "3", VariableType::Number),
                Variable::new("TIMEOUT", "5000", VariableType::Number),
            ],
            vec![
                FunctionDescriptor::new("1", "validateEmail", "boolean")
                    .with_argument("email", "string"),
                FunctionDescriptor::new("2", "formatCurrency", "string")
                    .with_argument("amount", "number")
                    .with_argument("currency", "string"),
                FunctionDescriptor::new("3", "calculateTotal", "number")
                    .with_argument("price", "number")
                    .with_argument("quantity", "number"),
                FunctionDescriptor::new("4", "logMessage", "void").with_argument("message", "string"),
            ],
        )
    }

    fn mount(kind: BlockKind) -> (InteractionBus, ConfigPanel) {
        let bus = InteractionBus::default();
        let panel = ConfigPanel::mount(
            &FlowNode::block(kind),
            snapshot(),
            PanelSettings::default(),
            &bus,
        )
        .unwrap();
        (bus, panel)
    }

    fn popup_names(panel: &ConfigPanel) -> Vec<String> {
        panel
            .session()
            .popup()
            .map(|p| p.candidates.iter().map(|c| c.name.clone()).collect())
            .unwrap_or_default()
    }

    fn phase(panel: &ConfigPanel, key: &FieldKey) -> FieldPhase {
        panel
            .field_state(key)
            .map(|s| s.phase())
            .unwrap_or_default()
    }

    #[test]
    fn test_accept_completes_reference_at_end() {
        let (_bus, mut panel) = mount(BlockKind::Conditional);

        assert!(panel.input(&FieldKey::Condition, "Hello #", 7));
        assert!(panel.session().is_owned_by(&FieldKey::Condition));
        assert!(popup_names(&panel).contains(&"environment".to_string()));

        let insertion = panel.accept_named("environment").unwrap();
        assert_eq!(insertion.new_text, "Hello #environment");
        assert_eq!(insertion.new_cursor, 18);

        assert!(!panel.session().is_open());
        assert_eq!(phase(&panel, &FieldKey::Condition), FieldPhase::Idle);
        assert_eq!(
            panel.config().value(&FieldKey::Condition).as_deref(),
            Some("Hello #environment")
        );

        panel.render();
        assert_eq!(panel.after_render(), 1);
        assert_eq!(panel.cursor(&FieldKey::Condition), Some(18));
        assert_eq!(panel.focused(), Some(&FieldKey::Condition));

        let events = panel.take_events();
        assert_eq!(
            events.last(),
            Some(&PanelEvent::FieldChanged {
                field: FieldKey::Condition,
                text: "Hello #environment".to_string(),
            })
        );
    }

    #[test]
    fn test_caret_restored_after_render_mid_text() {
        let (_bus, mut panel) = mount(BlockKind::Conditional);

        panel.input(&FieldKey::Condition, "#en == true", 3);
        let insertion = panel.accept(0).unwrap();
        assert_eq!(insertion.new_text, "#environment == true");
        assert_eq!(insertion.new_cursor, 12);
        assert_eq!(panel.pending_carets(), 1);

        let view = panel.render();
        assert_eq!(view.field(&FieldKey::Condition).unwrap().cursor, 20);

        panel.after_render();
        assert_eq!(panel.cursor(&FieldKey::Condition), Some(12));
        assert_eq!(panel.pending_carets(), 0);

        // a synced caret survives the next render
        let view = panel.render();
        assert_eq!(view.field(&FieldKey::Condition).unwrap().cursor, 12);
        assert!(view.popup.is_none());
    }

    #[test]
    fn test_typing_before_render_cancels_caret_restore() {
        let (_bus, mut panel) = mount(BlockKind::Conditional);

        panel.input(&FieldKey::Condition, "Hello #", 7);
        panel.accept_named("environment").unwrap();
        assert_eq!(panel.pending_carets(), 1);

        // user keeps typing before the host re-rendered
        panel.input(&FieldKey::Condition, "Hello #environment #", 20);
        assert_eq!(panel.pending_carets(), 0);
        assert!(panel.session().is_owned_by(&FieldKey::Condition));

        panel.render();
        assert_eq!(panel.after_render(), 0);
        assert_eq!(panel.cursor(&FieldKey::Condition), Some(20));
        assert_eq!(phase(&panel, &FieldKey::Condition), FieldPhase::Suggesting);

        let insertion = panel.accept_named("environment").unwrap();
        assert_eq!(insertion.new_text, "Hello #environment #environment");
    }

    #[test]
    fn test_caret_move_cancels_caret_restore() {
        let (_bus, mut panel) = mount(BlockKind::Conditional);

        panel.input(&FieldKey::Condition, "#en == true", 3);
        panel.accept(0).unwrap();
        assert!(panel.move_cursor(&FieldKey::Condition, 0));
        assert_eq!(panel.pending_carets(), 0);

        panel.render();
        assert_eq!(panel.after_render(), 0);
        assert_eq!(panel.cursor(&FieldKey::Condition), Some(0));
    }

    #[test]
    fn test_restore_skips_field_owning_popup() {
        let (_bus, mut panel) = mount(BlockKind::Conditional);

        panel.input(&FieldKey::Condition, "Hello #", 7);
        panel.accept_named("environment").unwrap();

        // a restore left behind for a field that suggests again
        panel.input(&FieldKey::Condition, "Hello #environment #", 20);
        panel.carets.schedule(FieldKey::Condition, 18);

        assert_eq!(panel.after_render(), 0);
        assert_eq!(panel.cursor(&FieldKey::Condition), Some(20));
        assert_eq!(phase(&panel, &FieldKey::Condition), FieldPhase::Suggesting);
    }

    #[test]
    fn test_stale_popup_refuses_accept() {
        let (_bus, mut panel) = mount(BlockKind::Conditional);

        panel.input(&FieldKey::Condition, "Hello #", 7);
        assert!(panel.session().is_open());

        // text changed behind the panel's back
        panel.config.set_value(&FieldKey::Condition, "Hello");

        assert!(panel.accept(0).is_none());
        assert!(!panel.session().is_open());
        assert_eq!(phase(&panel, &FieldKey::Condition), FieldPhase::Idle);
        assert_eq!(panel.config().value(&FieldKey::Condition).as_deref(), Some("Hello"));
    }

    #[test]
    fn test_variable_trigger_filters_by_fragment() {
        let (_bus, mut panel) = mount(BlockKind::Conditional);

        panel.input(&FieldKey::Condition, "retry count: $ma", 16);

        let popup = panel.session().popup().unwrap();
        assert_eq!(popup.domain, ReferenceDomain::Variable);
        assert!(!popup.can_toggle);
        assert_eq!(popup_names(&panel), vec!["MAX_RETRIES"]);
    }

    #[test]
    fn test_selecting_function_resets_bindings() {
        let (_bus, mut panel) = mount(BlockKind::Function);

        assert!(panel.open_function_picker());
        assert!(panel.select_function("formatCurrency"));
        assert!(!panel.is_function_picker_open());

        panel.input(&FieldKey::argument("amount"), "#MAX", 4);
        panel.input(&FieldKey::argument("currency"), "USD", 3);
        panel.input(&FieldKey::ReturnVariable, "#", 1);
        assert!(panel.session().is_owned_by(&FieldKey::ReturnVariable));

        assert!(panel.select_function("validateEmail"));

        let function = panel.config().as_function().unwrap();
        assert_eq!(function.function_name.as_deref(), Some("validateEmail"));
        assert!(function.arguments.is_empty());
        assert_eq!(function.return_variable, "");
        assert!(!panel.session().is_open());
        assert!(panel.field_state(&FieldKey::argument("amount")).is_none());
        assert!(panel.field_state(&FieldKey::ReturnVariable).is_none());

        let view = panel.render();
        let keys: Vec<&FieldKey> = view.fields.iter().map(|f| &f.key).collect();
        assert_eq!(
            keys,
            vec![&FieldKey::Function, &FieldKey::argument("email"), &FieldKey::ReturnVariable]
        );
    }

    #[test]
    fn test_reselecting_same_function_resets() {
        let (_bus, mut panel) = mount(BlockKind::Function);

        panel.select_function("validateEmail");
        panel.input(&FieldKey::argument("email"), "a@b.c", 5);
        panel.select_function("validateEmail");

        assert!(panel.config().as_function().unwrap().arguments.is_empty());
    }

    #[test]
    fn test_unknown_function_ignored() {
        let (_bus, mut panel) = mount(BlockKind::Function);

        panel.select_function("validateEmail");
        panel.input(&FieldKey::argument("email"), "a@b.c", 5);
        panel.take_events();

        assert!(!panel.select_function("doesNotExist"));
        let function = panel.config().as_function().unwrap();
        assert_eq!(function.function_name.as_deref(), Some("validateEmail"));
        assert_eq!(function.argument("email"), "a@b.c");
        assert!(panel.take_events().is_empty());
    }

    #[tokio::test]
    async fn test_save_registers_return_variable_once() {
        let (_bus, mut panel) = mount(BlockKind::Function);
        panel.select_function("calculateTotal");
        panel.input(&FieldKey::argument("price"), "#MAX_RETRIES", 12);
        panel.input(&FieldKey::ReturnVariable, "totalPrice", 10);

        let mut repo = MockVariableRepository::new();
        repo.expect_find_by_name().times(1).returning(|_| Ok(None));
        repo.expect_add()
            .withf(|v| v.name == "totalPrice" && v.value.is_empty() && v.var_type == VariableType::Number)
            .times(1)
            .returning(Ok);

        let saved = panel.save(&repo).await.unwrap();
        assert_eq!(saved.node_id, panel.node_id());
        assert_eq!(saved.registered.as_ref().map(|v| v.name.as_str()), Some("totalPrice"));
        assert_eq!(
            saved.config.as_function().unwrap().argument("price"),
            "#MAX_RETRIES"
        );
        assert!(panel.snapshot().has_variable("totalPrice"));
        assert!(matches!(panel.take_events().last(), Some(PanelEvent::ConfigSaved(_))));

        // registered name is suggestible right away
        panel.input(&FieldKey::argument("quantity"), "#total", 6);
        assert_eq!(popup_names(&panel), vec!["totalPrice"]);
    }

    #[tokio::test]
    async fn test_save_trims_return_variable() {
        let (_bus, mut panel) = mount(BlockKind::Function);
        panel.select_function("calculateTotal");
        panel.input(&FieldKey::ReturnVariable, "  total ", 8);

        let mut repo = MockVariableRepository::new();
        repo.expect_find_by_name()
            .withf(|name| name == "total")
            .returning(|_| Ok(None));
        repo.expect_add().withf(|v| v.name == "total").times(1).returning(Ok);

        let saved = panel.save(&repo).await.unwrap();
        let function = saved.config.as_function().unwrap();
        assert_eq!(function.return_variable, "total");
        assert_eq!(saved.registered.map(|v| v.name), Some(function.return_variable.clone()));
        assert_eq!(
            panel.config().value(&FieldKey::ReturnVariable).as_deref(),
            Some("total")
        );
    }

    #[tokio::test]
    async fn test_save_keeps_existing_variable() {
        let (_bus, mut panel) = mount(BlockKind::Function);
        panel.select_function("calculateTotal");
        panel.input(&FieldKey::ReturnVariable, "TIMEOUT", 7);

        let mut repo = MockVariableRepository::new();
        repo.expect_find_by_name()
            .returning(|name| Ok(Some(Variable::new(name, "5000", VariableType::Number))));
        repo.expect_add().never();

        let saved = panel.save(&repo).await.unwrap();
        assert!(saved.registered.is_none());
    }

    #[tokio::test]
    async fn test_save_non_function_block_touches_no_variables() {
        let (_bus, mut panel) = mount(BlockKind::Database);
        panel.input(&FieldKey::Query, "SELECT * FROM users WHERE env = '#environment'", 10);

        let mut repo = MockVariableRepository::new();
        repo.expect_find_by_name().never();
        repo.expect_add().never();

        let saved = panel.save(&repo).await.unwrap();
        assert_eq!(saved.config.kind(), BlockKind::Database);
        assert!(saved.registered.is_none());
    }

    #[test]
    fn test_single_popup_across_fields() {
        let (_bus, mut panel) = mount(BlockKind::Cache);
        assert!(panel.select_choice(&FieldKey::Operation, "set"));

        panel.input(&FieldKey::Key, "#", 1);
        assert!(panel.session().is_owned_by(&FieldKey::Key));
        assert_eq!(phase(&panel, &FieldKey::Key), FieldPhase::Suggesting);

        panel.input(&FieldKey::Value, "$", 1);
        assert!(panel.session().is_owned_by(&FieldKey::Value));
        assert_eq!(phase(&panel, &FieldKey::Value), FieldPhase::Suggesting);
        assert_eq!(phase(&panel, &FieldKey::Key), FieldPhase::Idle);
    }

    #[test]
    fn test_whitespace_after_trigger_goes_idle() {
        let (_bus, mut panel) = mount(BlockKind::Conditional);

        panel.input(&FieldKey::Condition, "tag #", 5);
        assert!(panel.session().is_open());

        panel.input(&FieldKey::Condition, "tag # ", 6);
        assert!(!panel.session().is_open());
        assert_eq!(phase(&panel, &FieldKey::Condition), FieldPhase::Idle);
    }

    #[test]
    fn test_no_matches_keeps_popup_closed() {
        let (_bus, mut panel) = mount(BlockKind::Conditional);

        panel.input(&FieldKey::Condition, "#e", 2);
        assert!(panel.session().is_open());

        panel.input(&FieldKey::Condition, "#ezz", 4);
        assert!(!panel.session().is_open());
        assert_eq!(phase(&panel, &FieldKey::Condition), FieldPhase::Armed);
    }

    #[test]
    fn test_escape_until_next_change() {
        let (_bus, mut panel) = mount(BlockKind::Conditional);

        panel.input(&FieldKey::Condition, "#", 1);
        assert!(panel.escape());
        assert!(!panel.session().is_open());
        assert_eq!(phase(&panel, &FieldKey::Condition), FieldPhase::Idle);

        panel.input(&FieldKey::Condition, "#ve", 3);
        assert_eq!(popup_names(&panel), vec!["version"]);
    }

    #[test]
    fn test_caret_move_out_of_reference_closes_popup() {
        let (_bus, mut panel) = mount(BlockKind::Conditional);

        panel.input(&FieldKey::Condition, "a == #re", 8);
        assert!(panel.session().is_open());

        assert!(panel.move_cursor(&FieldKey::Condition, 1));
        assert!(!panel.session().is_open());

        panel.move_cursor(&FieldKey::Condition, 100);
        assert_eq!(panel.cursor(&FieldKey::Condition), Some(8));
        assert_eq!(popup_names(&panel), vec!["region"]);
    }

    #[test]
    fn test_argument_field_toggles_domain() {
        let (_bus, mut panel) = mount(BlockKind::Function);
        panel.select_function("formatCurrency");
        panel.set_geometry(FieldKey::argument("amount"), FieldGeometry::new(100.0, 10.0, 30.0));

        panel.input(&FieldKey::argument("amount"), "#", 1);
        let popup = panel.session().popup().unwrap();
        assert_eq!(popup.domain, ReferenceDomain::Variable);
        assert!(popup.can_toggle);

        assert_eq!(panel.toggle_domain(), Some(ReferenceDomain::Tag));
        assert_eq!(popup_names(&panel), vec!["environment", "version", "region"]);

        let view = panel.render();
        let popup = view.popup.unwrap();
        assert_eq!(popup.heading, "Tags");
        assert_eq!(popup.anchor.top, 130.0);
        assert_eq!(popup.items[0].detail, "String: production");

        panel.accept_named("region").unwrap();
        assert_eq!(panel.config().as_function().unwrap().argument("amount"), "#region");
    }

    #[test]
    fn test_toggle_with_empty_result_keeps_popup() {
        let (_bus, mut panel) = mount(BlockKind::Function);
        panel.select_function("formatCurrency");

        panel.input(&FieldKey::argument("amount"), "#TIME", 5);
        assert_eq!(popup_names(&panel), vec!["TIMEOUT"]);

        assert_eq!(panel.toggle_domain(), Some(ReferenceDomain::Tag));
        assert!(panel.session().is_open());
        assert!(popup_names(&panel).is_empty());

        assert_eq!(panel.toggle_domain(), Some(ReferenceDomain::Variable));
        assert_eq!(popup_names(&panel), vec!["TIMEOUT"]);
    }

    #[test]
    fn test_return_variable_offers_variables_only() {
        let (_bus, mut panel) = mount(BlockKind::Function);
        panel.select_function("calculateTotal");

        panel.input(&FieldKey::ReturnVariable, "#", 1);
        let popup = panel.session().popup().unwrap();
        assert_eq!(popup.domain, ReferenceDomain::Variable);
        assert!(!popup.can_toggle);
        assert_eq!(panel.toggle_domain(), None);

        panel.input(&FieldKey::ReturnVariable, "$", 1);
        assert!(!panel.session().is_open());
    }

    #[test]
    fn test_void_function_has_no_return_field() {
        let (_bus, mut panel) = mount(BlockKind::Function);
        panel.select_function("logMessage");

        assert!(!panel.input(&FieldKey::ReturnVariable, "x", 1));
        assert!(panel.render().field(&FieldKey::ReturnVariable).is_none());
    }

    #[test]
    fn test_unrendered_field_key_ignored() {
        let (_bus, mut panel) = mount(BlockKind::Conditional);

        assert!(!panel.input(&FieldKey::Query, "#", 1));
        assert!(!panel.input(&FieldKey::argument("email"), "#", 1));
        assert!(!panel.move_cursor(&FieldKey::Key, 0));
        assert!(!panel.session().is_open());
        assert!(panel.take_events().is_empty());
    }

    #[test]
    fn test_plain_field_has_no_suggestions() {
        let (_bus, mut panel) = mount(BlockKind::Database);

        assert!(panel.input(&FieldKey::Connection, "postgres://#", 12));
        assert!(!panel.session().is_open());
        assert!(panel.field_state(&FieldKey::Connection).is_none());
    }

    #[test]
    fn test_select_choice_hides_value_field() {
        let (_bus, mut panel) = mount(BlockKind::Cache);
        panel.select_choice(&FieldKey::Operation, "set");
        panel.input(&FieldKey::Value, "$", 1);
        assert!(panel.session().is_owned_by(&FieldKey::Value));

        assert!(panel.select_choice(&FieldKey::Operation, "get"));
        assert!(!panel.session().is_open());
        assert!(panel.field_state(&FieldKey::Value).is_none());
        assert!(panel.render().field(&FieldKey::Value).is_none());

        assert!(!panel.select_choice(&FieldKey::Operation, "flush"));
        assert!(!panel.select_choice(&FieldKey::Key, "get"));
    }

    #[test]
    fn test_pointer_outside_discards_field_states() {
        let (bus, mut panel) = mount(BlockKind::Conditional);
        panel.input(&FieldKey::Condition, "#", 1);

        bus.publish(PointerTarget::Popup);
        assert_eq!(panel.pump_pointer_events(), 1);
        assert!(panel.session().is_open());

        bus.publish(PointerTarget::Outside);
        panel.pump_pointer_events();
        assert!(!panel.session().is_open());
        assert!(panel.field_state(&FieldKey::Condition).is_none());
    }

    #[test]
    fn test_pointer_on_fields() {
        let (bus, mut panel) = mount(BlockKind::Database);
        panel.input(&FieldKey::Query, "SELECT #", 8);

        bus.publish(PointerTarget::Field(FieldKey::Query));
        panel.pump_pointer_events();
        assert!(panel.session().is_owned_by(&FieldKey::Query));

        bus.publish(PointerTarget::Field(FieldKey::Connection));
        panel.pump_pointer_events();
        assert!(!panel.session().is_open());
    }

    #[test]
    fn test_focus_change_leaves_popup_with_owner() {
        let (bus, mut panel) = mount(BlockKind::Cache);
        panel.select_choice(&FieldKey::Operation, "set");
        panel.input(&FieldKey::Key, "#", 1);

        bus.publish(PointerTarget::Field(FieldKey::Value));
        panel.pump_pointer_events();
        assert_eq!(panel.focused(), Some(&FieldKey::Value));
        assert!(panel.session().is_owned_by(&FieldKey::Key));

        panel.input(&FieldKey::Value, "#reg", 4);
        assert!(panel.session().is_owned_by(&FieldKey::Value));
        assert_eq!(phase(&panel, &FieldKey::Key), FieldPhase::Idle);
    }

    #[test]
    fn test_picker_click_keeps_picker() {
        let (bus, mut panel) = mount(BlockKind::Function);
        panel.open_function_picker();

        bus.publish(PointerTarget::Field(FieldKey::Function));
        bus.publish(PointerTarget::FunctionPicker);
        panel.pump_pointer_events();
        assert!(panel.is_function_picker_open());

        let view = panel.render();
        assert_eq!(view.function_picker.map(|f| f.len()), Some(4));

        bus.publish(PointerTarget::Outside);
        panel.pump_pointer_events();
        assert!(!panel.is_function_picker_open());
    }

    #[test]
    fn test_unmount_deregisters_listener() {
        let (bus, panel) = mount(BlockKind::Conditional);
        assert_eq!(bus.listener_count(), 1);

        panel.unmount();
        assert_eq!(bus.listener_count(), 0);
        assert_eq!(bus.publish(PointerTarget::Outside), 0);
    }

    #[test]
    fn test_switch_renders_no_options() {
        let (_bus, mut panel) = mount(BlockKind::Switch);
        let view = panel.render();
        assert!(view.fields.is_empty());
        assert_eq!(view.message, Some(NO_OPTIONS_MESSAGE));
        assert_eq!(view.title, "Configure Switch Block");
    }

    #[test]
    fn test_max_suggestions() {
        let bus = InteractionBus::default();
        let settings = PanelSettings {
            max_suggestions: Some(1),
            ..PanelSettings::default()
        };
        let mut panel =
            ConfigPanel::mount(&FlowNode::block(BlockKind::Loop), snapshot(), settings, &bus).unwrap();

        panel.input(&FieldKey::Condition, "i < $", 5);
        assert_eq!(popup_names(&panel), vec!["MAX_RETRIES"]);
    }

    #[test]
    fn test_start_node_cannot_mount() {
        let bus = InteractionBus::default();
        let result = ConfigPanel::mount(&FlowNode::start(), snapshot(), PanelSettings::default(), &bus);
        assert!(result.is_err());
        assert_eq!(bus.listener_count(), 0);
    }

    #[test]
    fn test_accept_out_of_range() {
        let (_bus, mut panel) = mount(BlockKind::Conditional);
        assert!(panel.accept(0).is_none());

        panel.input(&FieldKey::Condition, "#", 1);
        assert!(panel.accept(10).is_none());
        assert!(panel.session().is_open());
    }
}
