/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 * Copyright (c) Berkus Decker <berkus+vesper@metta.systems>
 */

//! Interrupt handling
//!
//! Taking an IRQ exception sets `CPSR.I`, so the dispatcher runs with
//! further IRQs masked until the trap entry returns.

pub mod asynchronous;
