//! Show/hide visibility controller
//!
//! Translates two persisted boolean preferences (hide resolved, hide
//! dismissed) into status-exclusion filter mutations on the shared
//! [`QueryBuilder`] and notifies registered observers of every change.

use crate::filter::Filter;
use crate::prefs::PreferenceStore;
use crate::query::QueryBuilder;
use crate::AlertStatus;
use parking_lot::RwLock;
use std::sync::Arc;

/// Storage keys for the persisted flags. The stored true sentinel is the
/// literal string `"true"`.
pub const HIDE_RESOLVED_KEY: &str = "hideResolvedAlertItems";
pub const HIDE_DISMISSED_KEY: &str = "hideDismissAlertItems";

/// Exclusion field carrying the status visibility filters.
const STATUS_FIELD: &str = "-alert_status";

/// Change notification emitted on every visibility transition, including
/// the two fired while restoring persisted state at initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShowHideChanged {
    pub value: AlertStatus,
    pub is_hide: bool,
}

type ChangeListener = Box<dyn Fn(&ShowHideChanged) + Send + Sync>;

pub struct ShowHideController {
    builder: Arc<RwLock<QueryBuilder>>,
    prefs: Arc<dyn PreferenceStore>,
    hide_resolved: bool,
    hide_dismissed: bool,
    listeners: Vec<ChangeListener>,
}

impl ShowHideController {
    pub fn new(builder: Arc<RwLock<QueryBuilder>>, prefs: Arc<dyn PreferenceStore>) -> Self {
        Self {
            builder,
            prefs,
            hide_resolved: false,
            hide_dismissed: false,
            listeners: Vec::new(),
        }
    }

    /// Registers a change observer. Register before [`init`](Self::init) to
    /// observe the two restore emissions as well.
    pub fn on_changed(&mut self, listener: impl Fn(&ShowHideChanged) + Send + Sync + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Restores both persisted flags, replaying each through the normal
    /// visibility path so the builder ends up consistent with stored state.
    /// Observers see one emission per flag, hide or show alike.
    pub fn init(&mut self) {
        let hide_resolved = self.prefs.get_bool(HIDE_RESOLVED_KEY);
        self.set_visibility(AlertStatus::Resolve, hide_resolved);

        let hide_dismissed = self.prefs.get_bool(HIDE_DISMISSED_KEY);
        self.set_visibility(AlertStatus::Dismiss, hide_dismissed);
    }

    pub fn hide_resolved(&self) -> bool {
        self.hide_resolved
    }

    pub fn hide_dismissed(&self) -> bool {
        self.hide_dismissed
    }

    /// Applies one visibility transition: hiding adds the status exclusion
    /// filter, showing removes it; the flag is persisted and the change
    /// emitted. Statuses without a visibility filter (NEW/OPEN/ESCALATE)
    /// are ignored without mutation, persistence or emission.
    pub fn set_visibility(&mut self, status: AlertStatus, is_hide: bool) {
        let (filter, storage_key) = match status {
            AlertStatus::Resolve => (
                Filter::inactive(STATUS_FIELD, AlertStatus::Resolve.as_str()),
                HIDE_RESOLVED_KEY,
            ),
            AlertStatus::Dismiss => (
                Filter::inactive(STATUS_FIELD, AlertStatus::Dismiss.as_str()),
                HIDE_DISMISSED_KEY,
            ),
            _ => return,
        };

        {
            let mut builder = self.builder.write();
            if is_hide {
                builder.add_or_update_filter(Filter {
                    is_active: true,
                    ..filter
                });
            } else {
                builder.remove_filter(&filter);
            }
        }

        match status {
            AlertStatus::Resolve => self.hide_resolved = is_hide,
            AlertStatus::Dismiss => self.hide_dismissed = is_hide,
            _ => unreachable!(),
        }
        self.prefs.set_bool(storage_key, is_hide);
        tracing::debug!(status = %status, is_hide, "alert visibility changed");

        let change = ShowHideChanged {
            value: status,
            is_hide,
        };
        for listener in &self.listeners {
            listener(&change);
        }
    }

    /// String-boundary variant for callers holding the status as text.
    /// Unknown names are ignored silently.
    pub fn set_visibility_by_name(&mut self, status: &str, is_hide: bool) {
        match status {
            "RESOLVE" => self.set_visibility(AlertStatus::Resolve, is_hide),
            "DISMISS" => self.set_visibility(AlertStatus::Dismiss, is_hide),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::MemoryPreferences;
    use parking_lot::Mutex;

    fn controller_with(
        prefs: Arc<MemoryPreferences>,
    ) -> (ShowHideController, Arc<RwLock<QueryBuilder>>) {
        let builder = Arc::new(RwLock::new(QueryBuilder::new()));
        let controller = ShowHideController::new(builder.clone(), prefs);
        (controller, builder)
    }

    fn capture(controller: &mut ShowHideController) -> Arc<Mutex<Vec<ShowHideChanged>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        controller.on_changed(move |change| sink.lock().push(*change));
        seen
    }

    #[test]
    fn init_restores_persisted_hide_resolved() {
        let prefs = Arc::new(MemoryPreferences::new());
        prefs.set(HIDE_RESOLVED_KEY, "true");

        let (mut controller, builder) = controller_with(prefs);
        let seen = capture(&mut controller);
        controller.init();

        assert!(controller.hide_resolved());
        assert_eq!(builder.read().query(), "-alert_status:RESOLVE");
        assert_eq!(
            seen.lock().as_slice(),
            &[
                ShowHideChanged { value: AlertStatus::Resolve, is_hide: true },
                ShowHideChanged { value: AlertStatus::Dismiss, is_hide: false },
            ]
        );
    }

    #[test]
    fn init_with_empty_storage_emits_two_show_events() {
        let (mut controller, builder) = controller_with(Arc::new(MemoryPreferences::new()));
        let seen = capture(&mut controller);
        controller.init();

        assert_eq!(builder.read().query(), "*");
        assert_eq!(seen.lock().len(), 2);
        assert!(seen.lock().iter().all(|c| !c.is_hide));
    }

    #[test]
    fn toggle_persists_and_mutates_builder() {
        let prefs = Arc::new(MemoryPreferences::new());
        let (mut controller, builder) = controller_with(prefs.clone());

        controller.set_visibility(AlertStatus::Dismiss, true);
        assert_eq!(prefs.get(HIDE_DISMISSED_KEY).as_deref(), Some("true"));
        assert_eq!(builder.read().query(), "-alert_status:DISMISS");

        controller.set_visibility(AlertStatus::Dismiss, false);
        assert_eq!(prefs.get(HIDE_DISMISSED_KEY).as_deref(), Some("false"));
        assert_eq!(builder.read().query(), "*");
    }

    #[test]
    fn both_statuses_hide_independently() {
        let (mut controller, builder) = controller_with(Arc::new(MemoryPreferences::new()));

        controller.set_visibility(AlertStatus::Resolve, true);
        assert_eq!(builder.read().filters().len(), 1);

        controller.set_visibility(AlertStatus::Dismiss, true);
        assert_eq!(builder.read().filters().len(), 2);

        controller.set_visibility(AlertStatus::Resolve, false);
        let builder = builder.read();
        assert_eq!(builder.filters().len(), 1);
        assert_eq!(builder.query(), "-alert_status:DISMISS");
    }

    #[test]
    fn unknown_status_name_is_ignored_silently() {
        let prefs = Arc::new(MemoryPreferences::new());
        let (mut controller, builder) = controller_with(prefs.clone());
        let seen = capture(&mut controller);

        controller.set_visibility_by_name("ESCALATE", true);
        controller.set_visibility_by_name("bogus", true);

        assert!(builder.read().filters().is_empty());
        assert!(seen.lock().is_empty());
        assert!(prefs.get(HIDE_RESOLVED_KEY).is_none());
        assert!(prefs.get(HIDE_DISMISSED_KEY).is_none());
    }
}
