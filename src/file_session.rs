//! The single view/edit/save session over one unit's backing file.
//!
//! Transitions are synchronous; network work is described by the returned
//! [`FetchRequest`]/[`SaveRequest`] and its outcome is fed back through
//! [`FileEditSession::apply_fetch`]/[`FileEditSession::apply_save`]. Those
//! outcomes are tagged with the unit they were issued for and are dropped
//! when the session has moved on.

use crate::gateway::{ActionReply, FileReply, GatewayError};

pub const EDIT_WARNING: &str =
    "You are editing a live unit file. A wrong change can break this service or the system.";

pub const ERROR_PATH: &str = "Error";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EditMode {
    #[default]
    Closed,
    Loading,
    Viewing,
    Editing,
    Saving,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("unsaved edits: save or cancel before closing")]
    UnsavedEdits,
    #[error("save in progress")]
    SaveInFlight,
    #[error("cannot {action} while {mode:?}")]
    InvalidTransition {
        action: &'static str,
        mode: EditMode,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchRequest {
    pub unit: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SaveRequest {
    pub unit: String,
    pub content: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveApplied {
    /// Response no longer matches the session; nothing changed.
    Ignored,
    Closed,
    BackToEditing,
}

pub fn save_prompt(unit: &str) -> String {
    format!(
        "ARE YOU SURE?\n\nSaving changes to '{}' can break your system if incorrect.\n\nProceed with saving?",
        unit
    )
}

#[derive(Debug, Default)]
pub struct FileEditSession {
    mode: EditMode,
    target: Option<String>,
    content: String,
    path: Option<String>,
    confirm: Option<String>,
}

impl FileEditSession {
    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.mode != EditMode::Closed
    }

    pub fn pending_confirmation(&self) -> Option<&str> {
        self.confirm.as_deref()
    }

    pub fn shows_edit_warning(&self) -> bool {
        self.mode == EditMode::Editing
    }

    /// Mutable buffer, only while editing and not waiting on the save gate.
    pub fn buffer_mut(&mut self) -> Option<&mut String> {
        if self.mode == EditMode::Editing && self.confirm.is_none() {
            Some(&mut self.content)
        } else {
            None
        }
    }

    /// Starts over for `unit`, dropping whatever the previous session held.
    pub fn open(&mut self, unit: &str) -> FetchRequest {
        if self.mode == EditMode::Editing || self.mode == EditMode::Saving {
            tracing::info!(
                previous = self.target.as_deref().unwrap_or(""),
                %unit,
                "discarding active edit session"
            );
        }
        self.reset();
        self.mode = EditMode::Loading;
        self.target = Some(unit.to_string());
        FetchRequest {
            unit: unit.to_string(),
        }
    }

    /// Returns whether the response was applied.
    pub fn apply_fetch(&mut self, unit: &str, result: Result<FileReply, GatewayError>) -> bool {
        if self.mode != EditMode::Loading || self.target.as_deref() != Some(unit) {
            tracing::debug!(%unit, mode = ?self.mode, "stale file fetch discarded");
            return false;
        }
        match result {
            Ok(reply) => {
                self.content = reply.content().to_string();
                self.path = Some(reply.path().to_string());
                self.mode = EditMode::Viewing;
            }
            Err(err) => {
                self.content = format!("Error loading file: {}", err);
                self.path = Some(ERROR_PATH.to_string());
                self.mode = EditMode::Error;
            }
        }
        true
    }

    pub fn request_edit(&mut self) -> Result<(), SessionError> {
        self.expect(EditMode::Viewing, "edit")?;
        self.mode = EditMode::Editing;
        Ok(())
    }

    /// Throws local changes away and re-reads the file from the server.
    pub fn cancel(&mut self) -> Result<FetchRequest, SessionError> {
        if self.mode == EditMode::Saving {
            return Err(SessionError::SaveInFlight);
        }
        self.expect(EditMode::Editing, "cancel")?;
        let unit = self.target.clone().unwrap_or_default();
        Ok(self.open(&unit))
    }

    /// Arms the confirmation gate and returns the prompt to show.
    pub fn request_save(&mut self) -> Result<String, SessionError> {
        self.expect(EditMode::Editing, "save")?;
        let prompt = save_prompt(self.target.as_deref().unwrap_or(""));
        self.confirm = Some(prompt.clone());
        Ok(prompt)
    }

    /// Answers the gate. Declining leaves the session editing, untouched.
    pub fn confirm_save(&mut self, accepted: bool) -> Result<Option<SaveRequest>, SessionError> {
        if self.mode != EditMode::Editing || self.confirm.is_none() {
            return Err(SessionError::InvalidTransition {
                action: "confirm save",
                mode: self.mode,
            });
        }
        self.confirm = None;
        if !accepted {
            return Ok(None);
        }
        self.mode = EditMode::Saving;
        Ok(Some(SaveRequest {
            unit: self.target.clone().unwrap_or_default(),
            content: self.content.clone(),
        }))
    }

    /// Save with a blocking yes/no gate.
    #[cfg(test)]
    pub(crate) fn request_save_with(
        &mut self,
        confirm: impl FnOnce(&str) -> bool,
    ) -> Result<Option<SaveRequest>, SessionError> {
        let prompt = self.request_save()?;
        self.confirm_save(confirm(&prompt))
    }

    pub fn apply_save(
        &mut self,
        unit: &str,
        result: &Result<ActionReply, GatewayError>,
    ) -> SaveApplied {
        if self.mode != EditMode::Saving || self.target.as_deref() != Some(unit) {
            tracing::debug!(%unit, mode = ?self.mode, "stale save response discarded");
            return SaveApplied::Ignored;
        }
        match result {
            Ok(_) => {
                self.reset();
                SaveApplied::Closed
            }
            Err(_) => {
                // Buffer is left exactly as typed.
                self.mode = EditMode::Editing;
                SaveApplied::BackToEditing
            }
        }
    }

    pub fn close(&mut self) -> Result<(), SessionError> {
        match self.mode {
            EditMode::Editing => Err(SessionError::UnsavedEdits),
            EditMode::Saving => Err(SessionError::SaveInFlight),
            _ => {
                self.reset();
                Ok(())
            }
        }
    }

    fn expect(&self, mode: EditMode, action: &'static str) -> Result<(), SessionError> {
        if self.mode == mode {
            Ok(())
        } else {
            Err(SessionError::InvalidTransition {
                action,
                mode: self.mode,
            })
        }
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
#[path = "tests/file_session_tests.rs"]
mod tests;
