/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 * Copyright (c) Berkus Decker <berkus+vesper@metta.systems>
 */

//! First-level interrupt controller for the BCM2835 family.
//!
//! The controller owns a vector table of 72 handler entries, a software mirror of
//! enabled lines and the dispatcher called from the IRQ exception vector.
//! See `platform::raspberrypi::device_driver::bcm::interrupt_controller`.

#![cfg_attr(not(test), no_std)]
#![allow(clippy::upper_case_acronyms)]

pub mod macros;

/// Architecture-specific code.
pub mod arch;

pub mod console;
pub mod exception;
pub mod platform;
mod sync;
