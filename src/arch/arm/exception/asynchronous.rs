/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 * Copyright (c) Berkus Decker <berkus+vesper@metta.systems>
 */

//! Architectural asynchronous exception handling.

use {crate::exception::asynchronous::interface, core::arch::asm};

//--------------------------------------------------------------------------------------------------
// Private Definitions
//--------------------------------------------------------------------------------------------------

mod cpsr_bits {
    pub const IRQ: u32 = 1 << 7;
}

//--------------------------------------------------------------------------------------------------
// Public Definitions
//--------------------------------------------------------------------------------------------------

/// IRQ mask of the executing core, driven through the `CPSR.I` bit.
pub struct LocalIRQMask;

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

/// Returns whether IRQs are masked on the executing core.
pub fn is_local_irq_masked() -> bool {
    let cpsr: u32;
    unsafe {
        asm!("mrs {}, cpsr", out(reg) cpsr, options(nomem, nostack, preserves_flags));
    }
    cpsr & cpsr_bits::IRQ != 0
}

/// Unmask IRQs on the executing core.
///
/// Both mask primitives are compiler memory barriers.
#[inline(always)]
pub fn local_irq_unmask() {
    unsafe {
        asm!("cpsie i", options(nostack, preserves_flags));
    }
}

/// Mask IRQs on the executing core.
#[inline(always)]
pub fn local_irq_mask() {
    unsafe {
        asm!("cpsid i", options(nostack, preserves_flags));
    }
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
