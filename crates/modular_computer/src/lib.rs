//! # modular_computer
//!
//! Computers that run a program loaded from a removable disk.
//!
//! - [`ModularComputer`] marks the computer and names its disk slot.
//! - [`ComputerDisk`] marks a program disk and tracks the program entity
//!   spawned from it.
//! - [`ModularComputerSystem`] reacts to disk insertion, activation and
//!   examination of computers.

pub mod components;
pub mod system;

pub use components::{ComputerDisk, ModularComputer, UNBURNED_DISK_PROTOTYPE};
pub use system::{
    DISK_INSERT_VOLUME, EXAMINE_DISK_ERROR, EXAMINE_NO_PROGRAM, ModularComputerSystem, POPUP_NO_PROGRAM_LOADED,
    POPUP_NO_PROGRAM_ON_DISK,
};
