use crate::effects::{EffectOutcome, FocusEffects};
use crate::labels::Labels;
use crate::{
    BUTTON_CLASS, EDIT_BUTTON, INFO_CLASS, LABEL_CLASS, PANEL_CLASS, PanelProps, SAVE_BUTTON,
    TITLE_CLASS, TITLE_FIELD,
};
use core_render::{ButtonType, Element, FocusHost, RenderError, RootKind, View};
use core_state::{EditFlags, InstanceId, InstanceIdCounter, Previous};
use core_text::grapheme;
use tracing::debug;

static INSTANCE_IDS: InstanceIdCounter = InstanceIdCounter::new();

/// Panel for enabling the editing and saving of a reusable block.
#[derive(Debug)]
pub struct ReusableBlockEditPanel {
    instance_id: InstanceId,
    labels: Labels,
    was_editing: Previous<bool>,
    was_saving: Previous<bool>,
    pending: Option<FocusEffects>,
}

impl Default for ReusableBlockEditPanel {
    fn default() -> Self {
        Self::new(Labels::default())
    }
}

impl ReusableBlockEditPanel {
    pub fn new(labels: Labels) -> Self {
        let instance_id = INSTANCE_IDS.allocate();
        debug!(target: "panel.render", instance = instance_id.0, "mount");
        Self {
            instance_id,
            labels,
            was_editing: Previous::new(),
            was_saving: Previous::new(),
            pending: None,
        }
    }

    pub fn instance_id(&self) -> InstanceId {
        self.instance_id
    }

    /// Id shared by the title input and its label's `for`.
    pub fn title_field_id(&self) -> String {
        InstanceIdCounter::element_id(TITLE_CLASS, self.instance_id)
    }

    /// Render for `props` and queue this render's focus effects. The `was`
    /// snapshot comes from the last flushed render, so a render that is
    /// replaced before its flush never consumes a transition.
    pub fn render(&mut self, props: &PanelProps<'_>) -> View {
        let is = EditFlags::new(props.is_editing, props.is_saving);
        let was = EditFlags::new(self.was_editing.was(), self.was_saving.was());
        let view = self.view(props);
        if self.pending.is_some() {
            debug!(target: "panel.render", instance = self.instance_id.0, "unflushed_render_replaced");
        }
        self.pending = Some(FocusEffects { was, is });
        debug!(
            target: "panel.render",
            instance = self.instance_id.0,
            mode = is.mode().as_str(),
            edit_disabled = props.is_edit_disabled,
            title_graphemes = grapheme::count(props.title),
            "render"
        );
        view
    }

    /// Focus effects queued by the last render and not yet flushed.
    pub fn pending_effects(&self) -> Option<FocusEffects> {
        self.pending
    }

    /// Run the queued focus effects against the committed tree, then record
    /// the flushed flags as the previous render's. Calling this again before
    /// the next render does nothing.
    pub fn flush_effects<H: FocusHost + ?Sized>(
        &mut self,
        host: &mut H,
    ) -> Result<EffectOutcome, RenderError> {
        let Some(effects) = self.pending.take() else {
            return Ok(EffectOutcome::default());
        };
        self.was_editing.advance(effects.is.is_editing);
        self.was_saving.advance(effects.is.is_saving);
        effects.run(host)
    }

    /// The tree for `props`, without touching previous-render memory.
    pub fn view(&self, props: &PanelProps<'_>) -> View {
        let mode = EditFlags::new(props.is_editing, props.is_saving).mode();
        if !mode.shows_form() {
            return View::new(RootKind::Div, PANEL_CLASS)
                .child(Element::info(INFO_CLASS, props.title))
                .child(
                    Element::button(BUTTON_CLASS, self.labels.edit.as_str(), ButtonType::Button)
                        .with_slot(EDIT_BUTTON)
                        .disabled(props.is_edit_disabled),
                );
        }

        let field_id = self.title_field_id();
        View::new(RootKind::Form, PANEL_CLASS)
            .child(Element::label(
                LABEL_CLASS,
                self.labels.name.as_str(),
                field_id.as_str(),
            ))
            .child(
                Element::text_input(TITLE_CLASS, field_id, props.title)
                    .with_slot(TITLE_FIELD)
                    .disabled(mode.is_locked()),
            )
            .child(
                Element::button(BUTTON_CLASS, self.labels.save.as_str(), ButtonType::Submit)
                    .with_slot(SAVE_BUTTON)
                    .busy(mode.is_locked())
                    .disabled(props.title.is_empty() || mode.is_locked()),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_render::ElementKind;
    use pretty_assertions::assert_eq;

    fn props(is_editing: bool, is_saving: bool, title: &str) -> PanelProps<'_> {
        PanelProps {
            is_edit_disabled: false,
            is_editing,
            is_saving,
            title,
        }
    }

    #[test]
    fn display_branch_shows_title_and_edit() {
        let panel = ReusableBlockEditPanel::default();
        let view = panel.view(&props(false, false, "My Block"));
        assert_eq!(view.root, RootKind::Div);
        assert_eq!(view.class, PANEL_CLASS);
        let info: Vec<_> = view.by_class(INFO_CLASS).map(|el| el.text.as_str()).collect();
        assert_eq!(info, vec!["My Block"]);
        let edit = view.find(EDIT_BUTTON).expect("edit button");
        assert_eq!(edit.text, "Edit");
        assert!(!edit.disabled);
        assert!(view.find(TITLE_FIELD).is_none());
    }

    #[test]
    fn edit_disabled_flag_disables_edit_button() {
        let panel = ReusableBlockEditPanel::default();
        let view = panel.view(&PanelProps {
            is_edit_disabled: true,
            ..props(false, false, "My Block")
        });
        assert!(view.find(EDIT_BUTTON).unwrap().disabled);
    }

    #[test]
    fn label_is_associated_with_input() {
        let panel = ReusableBlockEditPanel::default();
        let view = panel.view(&props(true, false, "My Block"));
        let label = view.by_kind(ElementKind::Label).next().expect("label");
        let input = view.find(TITLE_FIELD).expect("input");
        assert_eq!(label.class, LABEL_CLASS);
        assert_eq!(label.text, "Name:");
        assert_eq!(label.html_for.as_deref(), input.id.as_deref());
        assert_eq!(
            input.id.as_deref(),
            Some(format!("{TITLE_CLASS}-{}", panel.instance_id()).as_str())
        );
    }

    #[test]
    fn save_disabled_for_empty_title_or_saving() {
        let panel = ReusableBlockEditPanel::default();
        let cases = [
            (false, "", true),
            (true, "", true),
            (false, "x", false),
            (true, "x", true),
        ];
        for (saving, title, disabled) in cases {
            let view = panel.view(&props(true, saving, title));
            let save = view.find(SAVE_BUTTON).unwrap();
            assert_eq!(save.disabled, disabled, "saving={saving} title={title:?}");
            assert_eq!(save.busy, saving);
            assert_eq!(view.find(TITLE_FIELD).unwrap().disabled, saving);
        }
    }

    #[test]
    fn labels_come_from_the_caller() {
        let panel = ReusableBlockEditPanel::new(Labels {
            edit: "Modifier".into(),
            save: "Enregistrer".into(),
            name: "Nom :".into(),
        });
        let view = panel.view(&props(false, false, "Bloc"));
        assert_eq!(view.find(EDIT_BUTTON).unwrap().text, "Modifier");
        let view = panel.view(&props(true, false, "Bloc"));
        assert_eq!(view.find(SAVE_BUTTON).unwrap().text, "Enregistrer");
    }

    #[test]
    fn instances_get_distinct_ids() {
        let a = ReusableBlockEditPanel::default();
        let b = ReusableBlockEditPanel::default();
        assert_ne!(a.instance_id(), b.instance_id());
        assert_ne!(a.title_field_id(), b.title_field_id());
    }

    #[derive(Default)]
    struct AcceptAll {
        calls: usize,
    }

    impl FocusHost for AcceptAll {
        fn focus(&mut self, _slot: core_render::Slot) -> Result<(), RenderError> {
            self.calls += 1;
            Ok(())
        }

        fn select_all(&mut self, _slot: core_render::Slot) -> Result<(), RenderError> {
            self.calls += 1;
            Ok(())
        }
    }

    #[test]
    fn render_snapshot_uses_previous_flags() {
        let mut panel = ReusableBlockEditPanel::default();
        let mut host = AcceptAll::default();
        panel.render(&props(false, false, "t"));
        panel.flush_effects(&mut host).unwrap();
        panel.render(&props(true, false, "t"));
        let fx = panel.pending_effects().unwrap();
        assert_eq!(fx.was, EditFlags::new(false, false));
        assert_eq!(fx.is, EditFlags::new(true, false));
        assert!(fx.selects_title());
    }

    #[test]
    fn unflushed_render_does_not_advance_history() {
        let mut panel = ReusableBlockEditPanel::default();
        let mut host = AcceptAll::default();
        panel.render(&props(false, false, "t"));
        panel.flush_effects(&mut host).unwrap();
        panel.render(&props(true, false, "t"));
        panel.render(&props(true, false, "t"));
        let fx = panel.pending_effects().unwrap();
        assert_eq!(fx.was, EditFlags::new(false, false));
        assert!(panel.flush_effects(&mut host).unwrap().selected_title);

        panel.render(&props(true, false, "t"));
        assert_eq!(panel.pending_effects().unwrap().was, EditFlags::new(true, false));
    }
}
