//! Scenario files.
//!
//! A scenario is a JSON document describing one simulation run: the config,
//! the prototypes, the entities present at start (each with a label steps
//! can refer to) and the interactions to play back, one per tick.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result, bail};
use engine_component::Entity;
use engine_math::Vec3;
use engine_system::{SimulationConfig, SystemRunner};
use engine_world::EntityPrototype;
use serde::{Deserialize, Serialize};
use tracing::info;

/// An entity present when the scenario starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnSpec {
    pub label: String,
    /// Prototype to spawn from; a bare entity named after the label if absent.
    #[serde(default)]
    pub prototype: Option<String>,
    #[serde(default)]
    pub position: Vec3,
}

/// One interaction, applied on its own tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Insert { owner: String, slot: String, item: String },
    Eject { owner: String, slot: String },
    Activate { user: String, target: String },
    Examine { examiner: String, target: String },
    Delete { target: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub config: SimulationConfig,
    #[serde(default)]
    pub prototypes: Vec<EntityPrototype>,
    #[serde(default)]
    pub spawn: Vec<SpawnSpec>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn from_json_str(source: &str) -> Result<Self> {
        serde_json::from_str(source).context("failed to parse scenario")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        Self::from_json_str(&source)
    }

    /// Register the prototypes and spawn the starting entities into the
    /// runner's world. Returns the label table.
    pub fn populate(&self, runner: &mut SystemRunner) -> Result<Labels> {
        let world = runner.world_mut();
        for prototype in &self.prototypes {
            world.prototypes_mut().register(prototype.clone())?;
        }

        let map = world.spawn("map");
        let mut labels = Labels::default();
        for spec in &self.spawn {
            let entity = match &spec.prototype {
                Some(prototype) => {
                    let coords = world.coordinates(map).offset(spec.position);
                    world
                        .spawn_at(prototype, coords)
                        .with_context(|| format!("failed to spawn '{}'", spec.label))?
                }
                None => world.spawn(spec.label.clone()),
            };
            labels.insert(&spec.label, entity)?;
        }

        info!(
            prototypes = self.prototypes.len(),
            entities = labels.len(),
            steps = self.steps.len(),
            "scenario populated"
        );
        Ok(labels)
    }
}

/// Scenario labels to entities.
#[derive(Debug, Default)]
pub struct Labels {
    by_label: HashMap<String, Entity>,
}

impl Labels {
    fn insert(&mut self, label: &str, entity: Entity) -> Result<()> {
        if self.by_label.insert(label.to_string(), entity).is_some() {
            bail!("duplicate label '{label}'");
        }
        Ok(())
    }

    pub fn get(&self, label: &str) -> Result<Entity> {
        self.by_label
            .get(label)
            .copied()
            .with_context(|| format!("unknown label '{label}'"))
    }

    /// The label of `entity`, for log output.
    #[must_use]
    pub fn label_of(&self, entity: Entity) -> Option<&str> {
        self.by_label
            .iter()
            .find(|(_, e)| **e == entity)
            .map(|(label, _)| label.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_label.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_label.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_steps() {
        let scenario = Scenario::from_json_str(
            r#"{
                "steps": [
                    {"action": "insert", "owner": "pc", "slot": "disk_slot", "item": "disk"},
                    {"action": "activate", "user": "me", "target": "pc"},
                    {"action": "delete", "target": "disk"}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(scenario.steps.len(), 3);
        assert_eq!(
            scenario.steps[1],
            Step::Activate {
                user: "me".into(),
                target: "pc".into()
            }
        );
        assert!(scenario.spawn.is_empty());
    }

    #[test]
    fn test_unknown_action_rejected() {
        assert!(Scenario::from_json_str(r#"{"steps": [{"action": "hack"}]}"#).is_err());
    }

    #[test]
    fn test_populate_spawns_labels() {
        let scenario = Scenario::from_json_str(
            r#"{
                "prototypes": [{"id": "Desk", "name": "desk"}],
                "spawn": [
                    {"label": "desk", "prototype": "Desk", "position": [1.0, 0.0, 0.0]},
                    {"label": "alice"}
                ]
            }"#,
        )
        .unwrap();
        let mut runner = SystemRunner::new(scenario.config.clone()).unwrap();
        let labels = scenario.populate(&mut runner).unwrap();

        let desk = labels.get("desk").unwrap();
        assert_eq!(runner.world().name(desk), Some("desk"));
        assert_eq!(runner.world().world_position(desk), Some(Vec3::X));
        assert_eq!(runner.world().name(labels.get("alice").unwrap()), Some("alice"));
        assert_eq!(labels.label_of(desk), Some("desk"));
        assert!(labels.get("bob").is_err());
    }

    #[test]
    fn test_duplicate_label_rejected() {
        let scenario = Scenario::from_json_str(r#"{"spawn": [{"label": "a"}, {"label": "a"}]}"#).unwrap();
        let mut runner = SystemRunner::new(scenario.config.clone()).unwrap();
        assert!(scenario.populate(&mut runner).is_err());
    }
}
