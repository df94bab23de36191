//! The modular computer system.
//!
//! A computer holds a disk in one of its item slots. Inserting a disk
//! materializes the disk's program as its own entity, parented to the disk.
//! Using the computer forwards the activation to that program entity, and
//! examining the computer reports which program is loaded.
//!
//! Everything that changes the world (spawning and deleting programs,
//! sounds, popups, forwarded activations) happens only on the authoritative
//! instance. Observers run the same lookups and otherwise stay silent.

use engine_component::Entity;
use engine_system::{
    ActivateInWorldEvent, EntInsertedIntoContainer, EntitySystem, EventRegistry, ExaminedEvent, ItemSlotsSystem,
    SystemContext, SystemError,
};
use engine_world::{AudioParams, World};
use tracing::{debug, info, warn};

use crate::components::{ComputerDisk, ModularComputer};

/// Volume boost, in dB, of the disk insert sound.
pub const DISK_INSERT_VOLUME: f32 = 4.0;

pub const POPUP_NO_PROGRAM_LOADED: &str = "ERROR: No program loaded!";
pub const POPUP_NO_PROGRAM_ON_DISK: &str = "ERROR: No program on disk!";

pub const EXAMINE_NO_PROGRAM: &str = "This computer doesn't have a program loaded.";
pub const EXAMINE_DISK_ERROR: &str = "This computer doesn't have a program loaded. \
     An error on the display reports that the loaded disk has no program.";

/// What sits in a computer's disk slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadedDisk {
    /// Nothing, or an item that is not a program disk.
    Missing,
    Present { disk: Entity, program: Option<Entity> },
}

/// Look into the computer's disk slot. `None` if the slot itself cannot be
/// resolved.
fn loaded_disk(world: &World, computer: Entity, component: &ModularComputer) -> Option<LoadedDisk> {
    let slot = ItemSlotsSystem::try_get_slot(world, computer, &component.disk_slot)?;
    let Some(disk) = slot.item_in(world) else {
        return Some(LoadedDisk::Missing);
    };
    let Some(disk_component) = world.get::<ComputerDisk>(disk) else {
        return Some(LoadedDisk::Missing);
    };
    Some(LoadedDisk::Present {
        disk,
        program: disk_component.program_entity.filter(|p| world.exists(*p)),
    })
}

/// Runs the program on the disk inserted into a [`ModularComputer`].
#[derive(Debug, Default)]
pub struct ModularComputerSystem;

impl ModularComputerSystem {
    pub const NAME: &'static str = "modular_computer";

    fn on_disk_inserted(
        ctx: &mut SystemContext<'_>,
        uid: Entity,
        computer: &ModularComputer,
        args: &mut EntInsertedIntoContainer,
    ) {
        if args.container_id != computer.disk_slot {
            return;
        }

        Self::synchronize_program(ctx, uid, computer);

        let Some(LoadedDisk::Present { program: Some(_), .. }) = loaded_disk(ctx.world(), uid, computer) else {
            return;
        };
        if !ctx.is_authoritative() {
            return;
        }

        let params = AudioParams::default().with_volume(DISK_INSERT_VOLUME);
        if let Err(err) = ctx
            .world_mut()
            .play_pvs(computer.disk_insert_sound.clone(), uid, params)
        {
            warn!(computer = %uid, %err, "failed to play disk insert sound");
        }
    }

    fn on_activated(
        ctx: &mut SystemContext<'_>,
        uid: Entity,
        computer: &ModularComputer,
        args: &mut ActivateInWorldEvent,
    ) {
        let Some(loaded) = loaded_disk(ctx.world(), uid, computer) else {
            return;
        };

        let program = match loaded {
            LoadedDisk::Missing => {
                if ctx.is_authoritative() {
                    ctx.world_mut()
                        .popup_entity(POPUP_NO_PROGRAM_LOADED, uid, args.user);
                }
                return;
            }
            LoadedDisk::Present { program, .. } => program,
        };

        if !ctx.is_authoritative() {
            return;
        }

        let Some(program) = program else {
            ctx.world_mut()
                .popup_entity(POPUP_NO_PROGRAM_ON_DISK, uid, args.user);
            return;
        };

        let mut forwarded = ActivateInWorldEvent::new(args.user, program, true);
        let handlers = ctx.raise_local_event(program, &mut forwarded);
        debug!(computer = %uid, %program, user = %args.user, handlers, "forwarded activation");
    }

    fn on_examined(ctx: &mut SystemContext<'_>, uid: Entity, computer: &ModularComputer, args: &mut ExaminedEvent) {
        let Some(loaded) = loaded_disk(ctx.world(), uid, computer) else {
            return;
        };

        match loaded {
            LoadedDisk::Missing => args.push_markup(EXAMINE_NO_PROGRAM),
            LoadedDisk::Present { program: None, .. } => args.push_markup(EXAMINE_DISK_ERROR),
            LoadedDisk::Present {
                program: Some(program),
                ..
            } => {
                let name = ctx.world().name(program).unwrap_or("unknown");
                args.push_markup(format!("This computer has the {name} program loaded."));
            }
        }
    }

    /// Bring the program entity of the disk in `uid`'s slot in line with the
    /// disk: spawn (or respawn, unless the disk persists state) and parent it
    /// to the disk.
    fn synchronize_program(ctx: &mut SystemContext<'_>, uid: Entity, computer: &ModularComputer) {
        if !ctx.is_authoritative() {
            return;
        }
        let Some(LoadedDisk::Present { disk, .. }) = loaded_disk(ctx.world(), uid, computer) else {
            return;
        };
        let Some(disk_component) = ctx.world().get::<ComputerDisk>(disk).cloned() else {
            return;
        };
        if disk_component.is_unburned() {
            return;
        }

        let world = ctx.world();
        let reusable = disk_component
            .program_entity
            .filter(|p| disk_component.persist_state && world.exists(*p) && !world.is_queued_for_deletion(*p));

        let program = match reusable {
            Some(program) => program,
            None => {
                let world = ctx.world_mut();
                if let Some(previous) = disk_component.program_entity {
                    world.queue_delete(previous);
                }

                let coords = world.coordinates(uid);
                let spawned = world.spawn_at(&disk_component.program_prototype, coords);
                let spawned = match spawned {
                    Ok(program) => Some(program),
                    Err(err) => {
                        warn!(
                            computer = %uid,
                            %disk,
                            prototype = %disk_component.program_prototype,
                            %err,
                            "failed to spawn program"
                        );
                        None
                    }
                };
                if let Some(state) = world.get_mut::<ComputerDisk>(disk) {
                    state.program_entity = spawned;
                }
                let Some(program) = spawned else {
                    return;
                };
                info!(computer = %uid, %disk, %program, "spawned program");
                program
            }
        };

        if let Err(err) = ctx.world_mut().set_parent(program, disk) {
            warn!(%program, %disk, %err, "failed to attach program to disk");
        }
    }
}

impl EntitySystem for ModularComputerSystem {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn initialize(&self, world: &mut World, registry: &mut EventRegistry) -> Result<(), SystemError> {
        world.register_component::<ModularComputer>();
        world.register_component::<ComputerDisk>();

        registry.subscribe_local::<ModularComputer, EntInsertedIntoContainer>(Self::NAME, Self::on_disk_inserted)?;
        registry.subscribe_local::<ModularComputer, ActivateInWorldEvent>(Self::NAME, Self::on_activated)?;
        registry.subscribe_local::<ModularComputer, ExaminedEvent>(Self::NAME, Self::on_examined)?;
        Ok(())
    }
}
