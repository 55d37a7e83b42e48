//! The secondary SH-2 ("SHM") of the 32X add-on.
//!
//! The SHM is a 23 MHz 32-bit RISC core that boots from a private 2 KiB ROM and otherwise talks
//! to the rest of the console through the 16-bit internal bus it shares with the main SH-2 and
//! the 68000. This crate models its lifecycle and its thread of control:
//!
//! * [`Shm::load`] / [`Shm::unload`] manage the boot ROM and debug registration.
//! * [`Shm::power`] creates the execution context and seeds PC/SP from the boot ROM.
//! * [`Shm::main`] is the per-instruction body run by the [`m32x_sched::Scheduler`].
//!
//! Instruction decoding is not part of this crate: it is supplied as an [`ExecutionUnit`] and
//! reaches memory only through the [`m32x_bus::BusWidthAdapter`].

#![forbid(unsafe_code)]

mod boot;
mod config;
mod cpu;
mod debugger;
mod error;
mod shm;

pub use boot::{BootImage, BootImageError, DirectoryPak, FilePak, MemoryPak};
pub use config::{ConfigError, ShmConfig};
pub use cpu::{ExecutionUnit, InspectionHook, Sh2Interface, Sh2Registers, STACK_POINTER};
pub use debugger::Debugger;
pub use error::ShmError;
pub use shm::{RunState, Shm};
