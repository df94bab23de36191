//! Transient on-screen messages.
//!
//! A popup is shown to one recipient, anchored over an entity. The world
//! only records them; delivering them to a client is the host's business.

use engine_component::Entity;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Popup {
    pub message: String,
    pub anchor: Entity,
    pub recipient: Entity,
}

/// Popups raised since the last drain.
#[derive(Debug, Default)]
pub struct PopupOutbox {
    pending: Vec<Popup>,
}

impl PopupOutbox {
    pub fn push(&mut self, popup: Popup) {
        self.pending.push(popup);
    }

    #[must_use]
    pub fn pending(&self) -> &[Popup] {
        &self.pending
    }

    pub fn drain(&mut self) -> Vec<Popup> {
        std::mem::take(&mut self.pending)
    }
}
