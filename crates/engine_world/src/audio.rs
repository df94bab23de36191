//! Sound playback requests.
//!
//! Sounds played through the world are "PVS" sounds: heard by every observer
//! that can see the source. The world records each request with the source's
//! resolved position; an audio backend drains the outbox.

use engine_component::Entity;
use engine_math::Vec3;
use serde::{Deserialize, Serialize};

/// Where a sound comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundSpecifier {
    /// A single audio file.
    Path(String),
}

/// Playback parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioParams {
    /// Volume adjustment in decibels.
    pub volume: f32,
    pub pitch: f32,
}

impl AudioParams {
    #[must_use]
    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume;
        self
    }
}

impl Default for AudioParams {
    fn default() -> Self {
        Self {
            volume: 0.0,
            pitch: 1.0,
        }
    }
}

/// A recorded playback request.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayedSound {
    pub sound: SoundSpecifier,
    pub source: Entity,
    pub position: Vec3,
    pub params: AudioParams,
}

/// Sounds requested since the last drain.
#[derive(Debug, Default)]
pub struct AudioOutbox {
    pending: Vec<PlayedSound>,
}

impl AudioOutbox {
    pub fn push(&mut self, sound: PlayedSound) {
        self.pending.push(sound);
    }

    #[must_use]
    pub fn pending(&self) -> &[PlayedSound] {
        &self.pending
    }

    pub fn drain(&mut self) -> Vec<PlayedSound> {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_volume_keeps_pitch() {
        let params = AudioParams::default().with_volume(4.0);
        assert_eq!(params.volume, 4.0);
        assert_eq!(params.pitch, 1.0);
    }

    #[test]
    fn test_sound_specifier_json_shape() {
        let spec: SoundSpecifier =
            serde_json::from_value(serde_json::json!({"path": "/Audio/beep.ogg"})).unwrap();
        assert_eq!(spec, SoundSpecifier::Path("/Audio/beep.ogg".into()));
    }
}
