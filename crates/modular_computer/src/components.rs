//! Components for modular computers and their program disks.

use engine_component::{Component, Entity};
use engine_world::SoundSpecifier;
use serde::{Deserialize, Serialize};

/// Prototype id carried by blank disks. Such disks never produce a program.
pub const UNBURNED_DISK_PROTOTYPE: &str = "UnburnedDiskProtototype";

const DEFAULT_DISK_SLOT: &str = "disk_slot";
const DEFAULT_INSERT_SOUND: &str = "/Audio/Machines/terminal_insert_disc.ogg";

/// A computer that runs whatever program the disk in its slot carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModularComputer {
    /// Id of the item slot that holds the program disk.
    #[serde(default = "default_disk_slot")]
    pub disk_slot: String,
    /// Played when a disk with a program is inserted.
    #[serde(default = "default_insert_sound")]
    pub disk_insert_sound: SoundSpecifier,
}

impl Default for ModularComputer {
    fn default() -> Self {
        Self {
            disk_slot: default_disk_slot(),
            disk_insert_sound: default_insert_sound(),
        }
    }
}

impl Component for ModularComputer {
    fn type_name() -> &'static str {
        "ModularComputer"
    }
}

/// A disk holding a program.
///
/// `program_entity` is the program currently materialized from
/// `program_prototype`. It is parented to the disk while the disk sits in a
/// computer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputerDisk {
    #[serde(default = "default_program_prototype")]
    pub program_prototype: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program_entity: Option<Entity>,
    /// Keep the same program entity across insertions instead of
    /// respawning it every time.
    #[serde(default)]
    pub persist_state: bool,
}

impl ComputerDisk {
    #[must_use]
    pub fn new(program_prototype: impl Into<String>) -> Self {
        Self {
            program_prototype: program_prototype.into(),
            program_entity: None,
            persist_state: false,
        }
    }

    #[must_use]
    pub fn persistent(mut self) -> Self {
        self.persist_state = true;
        self
    }

    /// `true` for blank disks.
    #[must_use]
    pub fn is_unburned(&self) -> bool {
        self.program_prototype == UNBURNED_DISK_PROTOTYPE
    }
}

impl Default for ComputerDisk {
    fn default() -> Self {
        Self::new(UNBURNED_DISK_PROTOTYPE)
    }
}

impl Component for ComputerDisk {
    fn type_name() -> &'static str {
        "ComputerDisk"
    }
}

fn default_disk_slot() -> String {
    DEFAULT_DISK_SLOT.to_string()
}

fn default_insert_sound() -> SoundSpecifier {
    SoundSpecifier::Path(DEFAULT_INSERT_SOUND.to_string())
}

fn default_program_prototype() -> String {
    UNBURNED_DISK_PROTOTYPE.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_computer_defaults_from_empty_json() {
        let computer: ModularComputer = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(computer, ModularComputer::default());
        assert_eq!(computer.disk_slot, "disk_slot");
    }

    #[test]
    fn test_blank_disk_by_default() {
        let disk: ComputerDisk = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(disk.is_unburned());
        assert!(!disk.persist_state);
        assert_eq!(disk.program_entity, None);
    }

    #[test]
    fn test_disk_from_prototype_data() {
        let disk: ComputerDisk = serde_json::from_value(serde_json::json!({
            "program_prototype": "ArcadeProgram",
            "persist_state": true
        }))
        .unwrap();
        assert_eq!(disk, ComputerDisk::new("ArcadeProgram").persistent());
        assert!(!disk.is_unburned());
    }
}
