//! Scenario tick loop.
//!
//! Each tick:
//!
//! 1. Apply the next scenario step (an interaction with the world).
//! 2. Report sounds and popups the step produced.
//! 3. Flush deferred deletions.
//! 4. Advance the tick counter.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use engine_system::SystemRunner;
use tracing::{debug, info, warn};

use crate::scenario::{Labels, Step};

/// Configuration for the tick loop.
#[derive(Debug, Clone)]
pub struct TickConfig {
    /// Target ticks per second.
    pub tick_rate: f64,
    /// Maximum number of ticks to run (0 = until the steps run out).
    pub max_ticks: u64,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            tick_rate: 30.0,
            max_ticks: 0,
        }
    }
}

/// Drives a [`SystemRunner`] through a list of steps.
#[derive(Debug)]
pub struct TickLoop {
    tick_id: u64,
    config: TickConfig,
    runner: SystemRunner,
    labels: Labels,
    steps: VecDeque<Step>,
    /// Everything observable that happened, in order.
    transcript: Vec<String>,
}

impl TickLoop {
    #[must_use]
    pub fn new(config: TickConfig, runner: SystemRunner, labels: Labels, steps: Vec<Step>) -> Self {
        Self {
            tick_id: 0,
            config,
            runner,
            labels,
            steps: steps.into(),
            transcript: Vec::new(),
        }
    }

    #[must_use]
    pub fn tick_id(&self) -> u64 {
        self.tick_id
    }

    #[must_use]
    pub fn runner(&self) -> &SystemRunner {
        &self.runner
    }

    #[must_use]
    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    #[must_use]
    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run one tick.
    ///
    /// # Errors
    ///
    /// Returns an error if the step names an unknown label. Refused
    /// interactions are logged and recorded, not returned.
    pub fn tick(&mut self) -> Result<()> {
        self.tick_id += 1;

        if let Some(step) = self.steps.pop_front() {
            debug!(tick_id = self.tick_id, ?step, "applying step");
            self.apply(&step)?;
        }

        for sound in self.runner.world_mut().drain_sounds() {
            let line = format!(
                "sound {:?} at {} (volume {:+})",
                sound.sound,
                self.describe(sound.source),
                sound.params.volume
            );
            info!(tick_id = self.tick_id, "{line}");
            self.transcript.push(line);
        }
        for popup in self.runner.world_mut().drain_popups() {
            let line = format!(
                "popup to {} over {}: {}",
                self.describe(popup.recipient),
                self.describe(popup.anchor),
                popup.message
            );
            info!(tick_id = self.tick_id, "{line}");
            self.transcript.push(line);
        }

        let removed = self.runner.flush();
        if !removed.is_empty() {
            let names: Vec<_> = removed.iter().map(|e| self.describe(*e)).collect();
            let line = format!("deleted {}", names.join(", "));
            info!(tick_id = self.tick_id, "{line}");
            self.transcript.push(line);
        }
        Ok(())
    }

    /// Tick until the steps run out or `max_ticks` is reached, pacing ticks
    /// to the configured rate.
    ///
    /// # Errors
    ///
    /// Fails before the first tick if the tick rate does not give a
    /// representable tick period. Stops at the first failing tick.
    pub fn run(&mut self) -> Result<()> {
        let tick_duration = Duration::try_from_secs_f64(1.0 / self.config.tick_rate)
            .with_context(|| format!("invalid tick rate {}", self.config.tick_rate))?;

        info!(
            tick_rate = self.config.tick_rate,
            max_ticks = self.config.max_ticks,
            steps = self.steps.len(),
            role = %self.runner.role(),
            "starting tick loop"
        );

        while !self.is_finished() {
            let start = Instant::now();
            self.tick()?;

            if self.config.max_ticks > 0 && self.tick_id >= self.config.max_ticks {
                break;
            }

            let elapsed = start.elapsed();
            if elapsed < tick_duration {
                std::thread::sleep(tick_duration - elapsed);
            } else {
                warn!(
                    tick_id = self.tick_id,
                    elapsed_ms = elapsed.as_millis() as u64,
                    budget_ms = tick_duration.as_millis() as u64,
                    "tick exceeded time budget"
                );
            }
        }

        info!(
            ticks = self.tick_id,
            entities = self.runner.world().entity_count(),
            "tick loop complete"
        );
        Ok(())
    }

    fn apply(&mut self, step: &Step) -> Result<()> {
        match step {
            Step::Insert { owner, slot, item } => {
                let (owner, item) = (self.labels.get(owner)?, self.labels.get(item)?);
                if let Err(err) = self.runner.insert_into_slot(owner, slot, item) {
                    self.refused(&err);
                }
            }
            Step::Eject { owner, slot } => {
                let owner = self.labels.get(owner)?;
                if let Err(err) = self.runner.eject_from_slot(owner, slot) {
                    self.refused(&err);
                }
            }
            Step::Activate { user, target } => {
                let (user, target) = (self.labels.get(user)?, self.labels.get(target)?);
                self.runner.activate(user, target);
            }
            Step::Examine { examiner, target } => {
                let (examiner, target) = (self.labels.get(examiner)?, self.labels.get(target)?);
                let examined = self.runner.examine(examiner, target);
                for line in examined.lines() {
                    let line = format!("{} sees: {line}", self.describe(examiner));
                    info!(tick_id = self.tick_id, "{line}");
                    self.transcript.push(line);
                }
            }
            Step::Delete { target } => {
                let target = self.labels.get(target)?;
                self.runner.world_mut().queue_delete(target);
            }
        }
        Ok(())
    }

    fn refused(&mut self, err: &dyn std::error::Error) {
        warn!(tick_id = self.tick_id, %err, "interaction refused");
        self.transcript.push(format!("refused: {err}"));
    }

    fn describe(&self, entity: engine_component::Entity) -> String {
        match self.labels.label_of(entity) {
            Some(label) => label.to_string(),
            None => match self.runner.world().name(entity) {
                Some(name) => format!("{name} ({entity})"),
                None => entity.to_string(),
            },
        }
    }
}
