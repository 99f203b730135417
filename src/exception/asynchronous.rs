// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2020-2022 Andre Richter <andre.o.richter@gmail.com>

//! Asynchronous exception handling.

use {core::marker::PhantomData, snafu::Snafu};

//--------------------------------------------------------------------------------------------------
// Platform Public Reexports
//--------------------------------------------------------------------------------------------------
pub use crate::platform::exception::asynchronous::{IRQNumber, NUM_IRQS};

#[cfg(any(target_arch = "aarch64", target_arch = "arm"))]
pub use crate::platform::exception::asynchronous::irq_manager;

//--------------------------------------------------------------------------------------------------
// Public Definitions
//--------------------------------------------------------------------------------------------------

/// Interrupt handler callback.
///
/// Receives the line that fired and the context it was registered with. The handler must
/// clear the device condition that raised the line, the controller does not acknowledge
/// anything on its behalf.
pub type IRQHandler = fn(IRQNumber, HandlerContext);

/// Opaque context pointer handed back to an [`IRQHandler`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct HandlerContext(*mut ());

/// Semantic error for the control API.
#[derive(Debug, Snafu, PartialEq, Eq)]
pub enum Error {
    #[snafu(display(
        "IRQ line {} is out of range, the controller has {} lines",
        line,
        NUM_IRQS
    ))]
    OutOfRange { line: usize },
}

pub type Result<T> = ::core::result::Result<T, Error>;

/// Interrupt context token.
///
/// An instance of this type indicates that the local core is currently executing in interrupt
/// context, aka executing an interrupt vector or subcalls of it.
///
/// Concept and implementation derived from the `CriticalSection` introduced in
/// <https://github.com/rust-embedded/bare-metal>
#[derive(Clone, Copy)]
pub struct IRQContext<'irq_context> {
    _0: PhantomData<&'irq_context ()>,
}

/// Iterator over the lines set in a masked pending word, highest bit first.
///
/// Pure function of its inputs: no hardware access, no side effects.
pub struct PendingIRQs {
    bitmask: u32,
    base: usize,
}

/// Asynchronous exception handling interfaces.
pub mod interface {
    use super::{HandlerContext, IRQContext, IRQHandler, Result};

    /// Mask and unmask IRQ delivery on the executing core.
    ///
    /// Implementations must make each call take effect before the next instruction that
    /// relies on it, the vector table depends on this for its update bracket.
    pub trait IRQMask {
        /// Stop IRQs from reaching the dispatcher.
        fn mask_all(&self);

        /// Let IRQs reach the dispatcher again.
        fn unmask_all(&self);

        /// Whether IRQs are currently kept from the dispatcher.
        fn is_masked(&self) -> bool;
    }

    /// IRQ management functions.
    ///
    /// The `BSP` is supposed to supply one global instance. Typically implemented by the
    /// platform's interrupt controller.
    pub trait IRQManager {
        /// Reset every vector to the stub handler.
        fn init(&self) -> Result<()>;

        /// Install `handler` with `context` for `line`, replacing any previous entry.
        fn register_handler(
            &self,
            line: usize,
            handler: IRQHandler,
            context: HandlerContext,
        ) -> Result<()>;

        /// Enable `line` in the controller.
        fn enable(&self, line: usize) -> Result<()>;

        /// Disable `line` in the controller.
        fn disable(&self, line: usize) -> Result<()>;

        /// Unmask IRQ delivery on the executing core.
        fn enable_all(&self);

        /// Mask IRQ delivery on the executing core.
        fn disable_all(&self);

        /// Handle pending interrupts.
        ///
        /// This function is called directly from the CPU's IRQ exception vector. On AArch64,
        /// this means that the respective CPU core has disabled exception handling.
        /// This function can therefore not be preempted and runs start to finish.
        ///
        /// Takes an IRQContext token to ensure it can only be called from IRQ context.
        #[allow(clippy::trivially_copy_pass_by_ref)]
        fn handle_pending_irqs<'irq_context>(&'irq_context self, ic: &IRQContext<'irq_context>);

        /// Print list of registered handlers.
        fn print_handler(&self) {}
    }
}

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

// The context is only ever dereferenced by the handler that registered it,
// on the single core that owns the controller.
unsafe impl Send for HandlerContext {}

impl HandlerContext {
    /// The context installed together with the stub handler.
    pub const NULL: Self = Self(core::ptr::null_mut());

    /// Wrap a raw context pointer.
    pub const fn from_ptr(ptr: *mut ()) -> Self {
        Self(ptr)
    }

    /// Return the wrapped pointer.
    pub const fn as_ptr(self) -> *mut () {
        self.0
    }

    pub fn is_null(self) -> bool {
        self.0.is_null()
    }
}

impl Default for HandlerContext {
    fn default() -> Self {
        Self::NULL
    }
}

/// Executes the provided closure while IRQs are masked on the executing core.
///
/// The previous mask state is restored afterwards, so this nests and is safe to call with
/// IRQs already masked.
#[inline(always)]
pub fn exec_with_irq_masked<M, T>(irq_mask: &M, f: impl FnOnce() -> T) -> T
where
    M: interface::IRQMask + ?Sized,
{
    let was_masked = irq_mask.is_masked();
    irq_mask.mask_all();

    let ret = f();

    if !was_masked {
        irq_mask.unmask_all();
    }

    ret
}

impl<'irq_context> IRQContext<'irq_context> {
    /// Creates an IRQContext token.
    ///
    /// # Safety
    ///
    /// - This must only be called when the current core is in an interrupt context and will not
    ///   live beyond the end of it. That is, creation is allowed in interrupt vector functions. For
    ///   example, in the ARMv8-A case, in `extern "C" fn current_elx_irq()`.
    /// - Note that the lifetime `'irq_context` of the returned instance is unconstrained. User code
    ///   must not be able to influence the lifetime picked for this type, since that might cause it
    ///   to be inferred to `'static`.
    #[inline(always)]
    pub unsafe fn new() -> Self {
        IRQContext { _0: PhantomData }
    }
}

impl PendingIRQs {
    /// Scan `bitmask`, reporting bit `n` as line `base + n`.
    pub const fn new(bitmask: u32, base: usize) -> Self {
        Self { bitmask, base }
    }
}

impl Iterator for PendingIRQs {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        if self.bitmask == 0 {
            return None;
        }

        let bit = (31 - self.bitmask.leading_zeros()) as usize;
        self.bitmask &= !(1 << bit);

        Some(self.base + bit)
    }
}

//--------------------------------------------------------------------------------------------------
// Testing
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use super::interface::IRQMask;

    #[test]
    fn pending_irqs_scan_highest_bit_first() {
        let pending = (1 << 3) | (1 << 7) | (1 << 15);
        let lines: Vec<usize> = PendingIRQs::new(pending, 0).collect();
        assert_eq!(lines, [15, 7, 3]);
    }

    #[test]
    fn pending_irqs_apply_bank_base() {
        let lines: Vec<usize> = PendingIRQs::new(0x8000_0001, 32).collect();
        assert_eq!(lines, [63, 32]);
    }

    #[test]
    fn pending_irqs_empty_word_yields_nothing() {
        assert_eq!(PendingIRQs::new(0, 64).next(), None);
    }

    #[test]
    fn handler_context_defaults_to_null() {
        assert!(HandlerContext::default().is_null());
        let mut slot = 0u32;
        let ctx = HandlerContext::from_ptr(&mut slot as *mut u32 as *mut ());
        assert!(!ctx.is_null());
        assert_eq!(ctx.as_ptr() as *mut u32, &mut slot as *mut u32);
    }

    /// Core mask that only remembers its state and how often it was flipped.
    struct CountingMask {
        masked: core::cell::Cell<bool>,
        flips: core::cell::Cell<usize>,
    }

    impl interface::IRQMask for CountingMask {
        fn mask_all(&self) {
            self.masked.set(true);
            self.flips.set(self.flips.get() + 1);
        }

        fn unmask_all(&self) {
            self.masked.set(false);
            self.flips.set(self.flips.get() + 1);
        }

        fn is_masked(&self) -> bool {
            self.masked.get()
        }
    }

    #[test]
    fn exec_with_irq_masked_masks_only_for_the_closure() {
        let mask = CountingMask {
            masked: core::cell::Cell::new(false),
            flips: core::cell::Cell::new(0),
        };
        let seen = exec_with_irq_masked(&mask, || mask.is_masked());
        assert!(seen);
        assert!(!mask.is_masked());
        assert_eq!(mask.flips.get(), 2);
    }

    #[test]
    fn exec_with_irq_masked_keeps_outer_mask() {
        let mask = CountingMask {
            masked: core::cell::Cell::new(true),
            flips: core::cell::Cell::new(0),
        };
        let value = exec_with_irq_masked(&mask, || 7);
        assert_eq!(value, 7);
        assert!(mask.is_masked());
    }

    #[test]
    fn out_of_range_error_names_the_line() {
        let err = Error::OutOfRange { line: 72 };
        assert_eq!(
            err.to_string(),
            "IRQ line 72 is out of range, the controller has 72 lines"
        );
    }
}
