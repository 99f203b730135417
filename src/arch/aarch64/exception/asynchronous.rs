// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2018-2022 Andre Richter <andre.o.richter@gmail.com>

//! Architectural asynchronous exception handling.

use {
    crate::exception::asynchronous::interface,
    cortex_a::{asm::barrier, registers::DAIF},
    tock_registers::interfaces::{ReadWriteable, Readable},
};

//--------------------------------------------------------------------------------------------------
// Public Definitions
//--------------------------------------------------------------------------------------------------

/// IRQ mask of the executing core, driven through the `DAIF.I` bit.
pub struct LocalIRQMask;

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

/// Returns whether IRQs are masked on the executing core.
pub fn is_local_irq_masked() -> bool {
    DAIF.is_set(DAIF::I)
}

/// Unmask IRQs on the executing core.
///
/// It is not needed to place an explicit instruction synchronization barrier after the `msr`.
/// Quoting the Architecture Reference Manual for ARMv8-A, section C5.1.3:
///
/// "Writes to PSTATE.{PAN, D, A, I, F} occur in program order without the need for additional
/// synchronization."
#[inline(always)]
pub fn local_irq_unmask() {
    DAIF.modify(DAIF::I::Unmasked);
}

/// Mask IRQs on the executing core.
#[inline(always)]
pub fn local_irq_mask() {
    DAIF.modify(DAIF::I::Masked);
    barrier::isb(barrier::SY);
}

impl interface::IRQMask for LocalIRQMask {
    fn mask_all(&self) {
        local_irq_mask();
    }

    fn unmask_all(&self) {
        local_irq_unmask();
    }

    fn is_masked(&self) -> bool {
        is_local_irq_masked()
    }
}
