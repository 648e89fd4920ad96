use thiserror::Error;

/// Contract breaches by the UI layer. The production caller escalates these
/// as fatal; the system never supports overlapping edit sessions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditingError {
    /// A second editor opened while another config was still under edit
    #[error("Cannot start editing '{requested}', still editing '{active}'")]
    Overlap { active: String, requested: String },

    /// An editor screen reported no active config
    #[error("Editor screen reported no active config")]
    MissingActiveConfig,
}

/// What the tracker wants done in response to a screen change. The caller
/// invokes the config's matching hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditingEvent {
    Started { file_name: String },
    Stopped { file_name: String, changed: bool },
}

/// What the UI reported its current screen to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen<'a> {
    /// Any screen that is not a config editor.
    Other,
    /// A config editor, with the file name of the config it claims to be
    /// editing. `None` here is a contract breach.
    Editor(Option<&'a str>),
}

/// Tracks the single config allowed to be under edit at a time, plus whether
/// the session saved any change. Single-writer from the UI thread, so it
/// carries no synchronization.
#[derive(Debug, Default)]
pub struct EditingTracker {
    active: Option<String>,
    changed: bool,
}

impl EditingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Called by any UI mutation that saves an update during the session.
    /// Consumed by the `Stopped` event when editing ends.
    pub fn mark_changed(&mut self) {
        self.changed = true;
    }

    /// Feeds one screen-navigation event through the state machine. Returns
    /// the hook the caller must fire, if any.
    pub fn screen_changed(
        &mut self,
        screen: Screen<'_>,
    ) -> Result<Option<EditingEvent>, EditingError> {
        match (screen, self.active.take()) {
            (Screen::Other, None) => Ok(None),
            (Screen::Other, Some(file_name)) => {
                let changed = std::mem::take(&mut self.changed);
                Ok(Some(EditingEvent::Stopped { file_name, changed }))
            }
            (Screen::Editor(None), active) => {
                self.active = active;
                Err(EditingError::MissingActiveConfig)
            }
            (Screen::Editor(Some(file_name)), None) => {
                self.active = Some(file_name.to_string());
                self.changed = false;
                Ok(Some(EditingEvent::Started {
                    file_name: file_name.to_string(),
                }))
            }
            (Screen::Editor(Some(file_name)), Some(active)) => {
                if active == file_name {
                    // Repeated navigation events within the same editor.
                    self.active = Some(active);
                    return Ok(None);
                }
                let error = EditingError::Overlap {
                    active: active.clone(),
                    requested: file_name.to_string(),
                };
                self.active = Some(active);
                Err(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_session_lifecycle() {
        let mut tracker = EditingTracker::new();
        let event = tracker.screen_changed(Screen::Editor(Some("x.toml"))).unwrap();
        assert_eq!(
            event,
            Some(EditingEvent::Started {
                file_name: "x.toml".to_string()
            })
        );
        assert_eq!(tracker.active(), Some("x.toml"));

        tracker.mark_changed();
        let event = tracker.screen_changed(Screen::Other).unwrap();
        assert_eq!(
            event,
            Some(EditingEvent::Stopped {
                file_name: "x.toml".to_string(),
                changed: true,
            })
        );
        assert_eq!(tracker.active(), None);
    }

    #[test]
    fn test_repeated_events_in_same_editor_are_no_ops() {
        let mut tracker = EditingTracker::new();
        tracker.screen_changed(Screen::Editor(Some("x.toml"))).unwrap();
        let event = tracker.screen_changed(Screen::Editor(Some("x.toml"))).unwrap();
        assert_eq!(event, None);
        assert_eq!(tracker.active(), Some("x.toml"));
    }

    #[test]
    fn test_changed_flag_resets_between_sessions() {
        let mut tracker = EditingTracker::new();
        tracker.screen_changed(Screen::Editor(Some("x.toml"))).unwrap();
        tracker.mark_changed();
        tracker.screen_changed(Screen::Other).unwrap();

        tracker.screen_changed(Screen::Editor(Some("y.toml"))).unwrap();
        let event = tracker.screen_changed(Screen::Other).unwrap();
        assert_eq!(
            event,
            Some(EditingEvent::Stopped {
                file_name: "y.toml".to_string(),
                changed: false,
            })
        );
    }

    #[test]
    fn test_overlapping_edit_sessions_are_a_contract_breach() {
        let mut tracker = EditingTracker::new();
        tracker.screen_changed(Screen::Editor(Some("x.toml"))).unwrap();
        let error = tracker
            .screen_changed(Screen::Editor(Some("y.toml")))
            .unwrap_err();
        assert_eq!(
            error,
            EditingError::Overlap {
                active: "x.toml".to_string(),
                requested: "y.toml".to_string(),
            }
        );
        // The original session is untouched.
        assert_eq!(tracker.active(), Some("x.toml"));
    }

    #[test]
    fn test_sequential_sessions_succeed() {
        let mut tracker = EditingTracker::new();
        tracker.screen_changed(Screen::Editor(Some("x.toml"))).unwrap();
        tracker.screen_changed(Screen::Other).unwrap();
        let event = tracker.screen_changed(Screen::Editor(Some("y.toml"))).unwrap();
        assert_eq!(
            event,
            Some(EditingEvent::Started {
                file_name: "y.toml".to_string()
            })
        );
    }

    #[test]
    fn test_editor_with_no_active_config_is_a_contract_breach() {
        let mut tracker = EditingTracker::new();
        tracker.screen_changed(Screen::Editor(Some("x.toml"))).unwrap();
        let error = tracker.screen_changed(Screen::Editor(None)).unwrap_err();
        assert_eq!(error, EditingError::MissingActiveConfig);
    }
}
