//! Three-way value synchronization for one picker.
//!
//! A picker holds three views of its value:
//! - `committed`: what the host application sees,
//! - `draft`: what the open overlay highlights,
//! - `live_text`: what the text field shows while the user types.
//!
//! Whenever the picker is neither focused nor open, `live_text` and `draft` are
//! derived from `committed`. Everything else in this module is about when each
//! copy is allowed to lead.

use tracing::{debug, trace};

use crate::{
    config::{DismissPolicy, MaskConfig},
    mask,
    value::PickerValue,
};

/// Coarse interaction state, derived from the open/focus flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncPhase {
    ClosedSynced,
    ClosedFocusedEditing,
    OpenEditing,
}

/// Where the draft comes from when nothing is committed.
#[derive(Debug, Clone, PartialEq)]
pub enum Fallback<V> {
    /// Wall-clock "now" at the time the fallback is needed.
    Now,
    Fixed(V),
}

impl<V: PickerValue> Fallback<V> {
    #[must_use]
    pub fn resolve(&self, mask: &MaskConfig) -> V {
        match self {
            Self::Now => V::now(mask),
            Self::Fixed(value) => value.clone(),
        }
    }
}

/// Result of feeding typed text through the mask.
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome<V> {
    /// The text formed a complete value and it is now committed.
    Committed(V),
    /// The field is empty; the committed value was cleared.
    Cleared,
    /// Partial or invalid text; nothing was committed.
    Incomplete,
}

/// Per-picker synchronization state machine.
#[derive(Debug, Clone)]
pub struct Synchronizer<V: PickerValue> {
    mask: MaskConfig,
    fallback: Fallback<V>,
    committed: Option<V>,
    draft: V,
    live_text: String,
    is_open: bool,
    is_focused: bool,
    /// Draft was changed by a selection since the overlay opened.
    draft_touched: bool,
    queued_external: Option<Option<V>>,
    committed_change: Option<Option<V>>,
}

impl<V: PickerValue> Synchronizer<V> {
    #[must_use]
    pub fn new(mask: MaskConfig, fallback: Fallback<V>, committed: Option<V>) -> Self {
        let committed = committed.map(|value| value.conform(&mask));
        let draft = match &committed {
            Some(value) => value.clone(),
            None => fallback.resolve(&mask),
        };
        let live_text = committed
            .as_ref()
            .map(|value| value.format_masked(&mask))
            .unwrap_or_default();

        Self {
            mask,
            fallback,
            committed,
            draft,
            live_text,
            is_open: false,
            is_focused: false,
            draft_touched: false,
            queued_external: None,
            committed_change: None,
        }
    }

    #[must_use]
    pub fn mask(&self) -> &MaskConfig {
        &self.mask
    }

    #[must_use]
    pub fn committed(&self) -> Option<&V> {
        self.committed.as_ref()
    }

    #[must_use]
    pub fn draft(&self) -> &V {
        &self.draft
    }

    #[must_use]
    pub fn live_text(&self) -> &str {
        &self.live_text
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    #[must_use]
    pub fn is_focused(&self) -> bool {
        self.is_focused
    }

    #[must_use]
    pub fn phase(&self) -> SyncPhase {
        match (self.is_open, self.is_focused) {
            (true, _) => SyncPhase::OpenEditing,
            (false, true) => SyncPhase::ClosedFocusedEditing,
            (false, false) => SyncPhase::ClosedSynced,
        }
    }

    #[must_use]
    pub fn has_queued_external(&self) -> bool {
        self.queued_external.is_some()
    }

    /// Canonical text for the committed value, empty when nothing is committed.
    #[must_use]
    pub fn committed_text(&self) -> String {
        self.committed
            .as_ref()
            .map(|value| value.format_masked(&self.mask))
            .unwrap_or_default()
    }

    /// Take the committed value if it changed since the last call.
    pub fn take_committed_change(&mut self) -> Option<Option<V>> {
        self.committed_change.take()
    }

    pub fn focus(&mut self) {
        self.is_focused = true;
    }

    /// Leave the text field. Unfinished text is replaced by the committed value.
    pub fn blur(&mut self) {
        self.is_focused = false;
        if self.is_open {
            return;
        }
        if V::parse_masked(&self.live_text, &self.mask).is_none() && !self.live_text.is_empty() {
            debug!(
                discarded = %self.live_text,
                "reverting incomplete text on blur"
            );
        }
        self.settle();
    }

    /// Reformat typed text and commit it as soon as it forms a whole value.
    pub fn edit_text(&mut self, raw: &str) -> EditOutcome<V> {
        if !self.is_open {
            self.is_focused = true;
        }

        self.live_text = mask::format_edit(&self.live_text, raw, &self.mask);
        trace!(raw, formatted = %self.live_text, "text edited");

        if self.live_text.is_empty() {
            self.set_committed(None);
            return EditOutcome::Cleared;
        }

        match V::parse_masked(&self.live_text, &self.mask) {
            Some(value) => {
                self.draft = value.clone();
                self.set_committed(Some(value.clone()));
                EditOutcome::Committed(value)
            }
            None => EditOutcome::Incomplete,
        }
    }

    /// Open the overlay on the committed value (or the fallback).
    pub fn open(&mut self) -> bool {
        if self.is_open {
            return false;
        }
        self.draft = self.restored_draft();
        self.draft_touched = false;
        self.is_open = true;
        true
    }

    /// Replace the draft from a grid/wheel selection. Ignored while closed.
    pub fn select(&mut self, value: V) -> bool {
        if !self.is_open {
            debug!(value = ?value, "selection ignored, overlay is closed");
            return false;
        }
        self.draft = value;
        self.draft_touched = true;
        true
    }

    /// Commit the draft and close.
    pub fn confirm(&mut self) -> bool {
        if !self.is_open {
            return false;
        }
        let draft = self.draft.clone();
        self.set_committed(Some(draft));
        self.close();
        true
    }

    /// Close without an explicit confirm, following `policy`.
    pub fn dismiss(&mut self, policy: DismissPolicy) -> bool {
        if !self.is_open {
            return false;
        }
        if policy == DismissPolicy::ImplicitConfirm && self.draft_touched {
            let draft = self.draft.clone();
            self.set_committed(Some(draft));
        }
        self.close();
        true
    }

    /// Forget the committed value. Open/focus state is left alone.
    pub fn clear(&mut self) {
        self.set_committed(None);
        self.live_text.clear();
        self.draft = self.fallback.resolve(&self.mask);
        self.draft_touched = false;
    }

    /// Set the committed value from the host. Deferred while the user is busy.
    pub fn external_set(&mut self, value: Option<V>) -> bool {
        let value = value.map(|value| value.conform(&self.mask));
        if self.phase() != SyncPhase::ClosedSynced {
            debug!(phase = ?self.phase(), "external value queued until picker settles");
            self.queued_external = Some(value);
            return false;
        }
        self.set_committed(value);
        self.settle();
        true
    }

    fn close(&mut self) {
        self.is_open = false;
        self.is_focused = false;
        self.draft_touched = false;
        self.settle();
    }

    fn restored_draft(&self) -> V {
        match &self.committed {
            Some(value) => value.clone(),
            None => self.fallback.resolve(&self.mask),
        }
    }

    /// Enter `ClosedSynced`: apply a queued host value, then derive text and draft.
    fn settle(&mut self) {
        if self.phase() != SyncPhase::ClosedSynced {
            return;
        }
        if let Some(value) = self.queued_external.take() {
            debug!(value = ?value, "applying queued external value");
            self.set_committed(value);
        }
        self.live_text = self.committed_text();
        self.draft = self.restored_draft();
    }

    fn set_committed(&mut self, value: Option<V>) {
        if self.committed == value {
            return;
        }
        debug!(value = ?value, "committed value changed");
        self.committed = value.clone();
        self.committed_change = Some(value);
    }
}
