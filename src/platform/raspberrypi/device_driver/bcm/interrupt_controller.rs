/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 * Copyright (c) Berkus Decker <berkus+vesper@metta.systems>
 */

//! BCM2835 ARM interrupt controller.
//!
//! 72 lines in three banks:
//!
//! | Lines    | Bank          | Pending source                      |
//! |----------|---------------|-------------------------------------|
//! | 0..32    | `Peripheral1` | IRQ pending 1                       |
//! | 32..64   | `Peripheral2` | IRQ pending 2                       |
//! | 64..72   | `Basic`       | bits 0..8 of IRQ basic pending      |
//!
//! The controller keeps a software mirror of the enabled lines and only dispatches lines that
//! are both pending and enabled in the mirror. The basic pending word mixes the summary bits
//! for pending 1/2 and GPU shortcut bits with the eight ARM lines, so the mirror is what keeps
//! those from being dispatched as lines.
//!
//! There is no acknowledgment step. Every handler must clear its own device condition.
//! A line that is enabled while still mapped to the stub handler will re-enter the dispatcher
//! as soon as it is raised and livelock the core. Register first, enable second.

use {
    crate::{
        exception::asynchronous::{
            exec_with_irq_masked,
            interface::{IRQManager, IRQMask},
            Error, HandlerContext, IRQContext, IRQHandler, PendingIRQs, Result,
        },
        info,
        sync::{interface::Mutex, NullLock},
        warn,
    },
    bit_field::BitField,
    core::{
        fmt,
        sync::atomic::{AtomicU32, Ordering},
    },
    static_assertions::const_assert_eq,
    tock_registers::{interfaces::Readable, register_bitfields, registers::InMemoryRegister},
};

mod peripheral_ic;

pub use peripheral_ic::PeripheralIC;

//--------------------------------------------------------------------------------------------------
// Private Definitions
//--------------------------------------------------------------------------------------------------

// Descriptions taken from
// https://www.raspberrypi.org/app/uploads/2012/02/BCM2835-ARM-Peripherals.pdf, section 7.5
register_bitfields! {
    u32,

    /// IRQ basic pending
    BASIC_PENDING [
        /// ARM timer, ARM mailbox, ARM doorbell 0/1, GPU0/GPU1 halted,
        /// illegal access type 1/0. Lines 64..72.
        ARM_IRQS OFFSET(0) NUMBITS(8) [],

        /// One or more bits set in pending register 1.
        PENDING_1 OFFSET(8) NUMBITS(1) [],

        /// One or more bits set in pending register 2.
        PENDING_2 OFFSET(9) NUMBITS(1) [],

        /// GPU IRQ 7, 9, 10, 18, 19, 53, 54, 55, 56, 57, 62 shortcuts. Never dispatched from here,
        /// the same lines show up in pending 1/2.
        GPU_SHORTCUTS OFFSET(10) NUMBITS(11) []
    ]
}

/// Lines per full bank.
const BANK_WIDTH: usize = 32;

#[derive(Copy, Clone)]
struct HandlerEntry {
    handler: IRQHandler,
    context: HandlerContext,
    registered: bool,
}

type VectorTable = [HandlerEntry; NUM_IRQS];

/// Software copy of the enable registers, one word per bank.
///
/// Single writer (enable/disable, thread context), single reader (dispatcher, IRQ context).
struct EnabledSet {
    words: [AtomicU32; 3],
}

//--------------------------------------------------------------------------------------------------
// Public Definitions
//--------------------------------------------------------------------------------------------------

/// Number of interrupt lines handled by the controller.
pub const NUM_IRQS: usize = 72;

const_assert_eq!(NUM_IRQS, 2 * BANK_WIDTH + 8);

/// Hardware bank a line belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Bank {
    /// Lines 0..32.
    Peripheral1,
    /// Lines 32..64.
    Peripheral2,
    /// Lines 64..72, the ARM-specific lines of the basic registers.
    Basic,
}

/// A validated interrupt line number in `0..NUM_IRQS`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct IRQNumber(usize);

/// Register view interfaces.
pub mod interface {
    use super::Bank;

    /// Access to the controller's pending, enable and disable registers.
    ///
    /// Pending registers are only ever read. Enable registers are write-1-to-set, disable
    /// registers are write-1-to-clear: writing zero bits leaves those lines untouched.
    pub trait Registers {
        /// Read IRQ basic pending: ARM lines in bits 0..8, summary bits above.
        fn basic_pending(&self) -> u32;

        /// Read IRQ pending 1, bit `n` being line `n`.
        fn pending_1(&self) -> u32;

        /// Read IRQ pending 2, bit `n` being line `32 + n`.
        fn pending_2(&self) -> u32;

        /// Enable the lines of `bank` set in `mask`.
        fn enable(&self, bank: Bank, mask: u32);

        /// Disable the lines of `bank` set in `mask`.
        fn disable(&self, bank: Bank, mask: u32);
    }
}

/// First-level interrupt controller: vector table, enabled-set mirror and dispatcher.
///
/// Generic over the register view and the core IRQ mask so it can be driven by the MMIO
/// block on hardware and by a simulated backend in tests.
pub struct InterruptController<R, M> {
    registers: R,
    irq_mask: M,
    vectors: NullLock<VectorTable>,
    enabled: EnabledSet,
}

//--------------------------------------------------------------------------------------------------
// Private Code
//--------------------------------------------------------------------------------------------------

/// Default vector for every line.
///
/// Does not acknowledge anything. If a line reaching it stays pending the core
/// re-enters the dispatcher immediately.
fn stub_handler(_irq: IRQNumber, _context: HandlerContext) {}

impl HandlerEntry {
    const STUB: Self = Self {
        handler: stub_handler,
        context: HandlerContext::NULL,
        registered: false,
    };
}

impl EnabledSet {
    const fn new() -> Self {
        Self {
            words: [AtomicU32::new(0), AtomicU32::new(0), AtomicU32::new(0)],
        }
    }

    fn get(&self, bank: Bank) -> u32 {
        self.words[bank.index()].load(Ordering::Relaxed)
    }

    fn contains(&self, irq: IRQNumber) -> bool {
        self.get(irq.bank()).get_bit(irq.bit())
    }

    // Plain load/store, there is only one writer.
    fn insert(&self, irq: IRQNumber) {
        let word = &self.words[irq.bank().index()];
        word.store(word.load(Ordering::Relaxed) | irq.mask(), Ordering::Relaxed);
    }

    fn remove(&self, irq: IRQNumber) {
        let word = &self.words[irq.bank().index()];
        word.store(word.load(Ordering::Relaxed) & !irq.mask(), Ordering::Relaxed);
    }
}

impl<R, M> InterruptController<R, M>
where
    R: interface::Registers,
    M: IRQMask,
{
    /// Call the vectors of `pending` lines of `bank` that are enabled in the mirror.
    ///
    /// `pending` is a snapshot, lines raised by the handlers are left for the next trap.
    fn dispatch_bank(&self, bank: Bank, pending: u32) {
        for line in PendingIRQs::new(pending & self.enabled.get(bank), bank.base()) {
            // Copy the entry out so the handler may call back into the controller.
            let entry = self.vectors.lock(|table| table[line]);

            (entry.handler)(IRQNumber(line), entry.context);
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

impl Bank {
    /// All banks, in dispatch order.
    pub const ALL: [Bank; 3] = [Bank::Peripheral1, Bank::Peripheral2, Bank::Basic];

    /// First line number of the bank.
    pub const fn base(self) -> usize {
        match self {
            Bank::Peripheral1 => 0,
            Bank::Peripheral2 => BANK_WIDTH,
            Bank::Basic => 2 * BANK_WIDTH,
        }
    }

    /// Number of lines in the bank.
    pub const fn width(self) -> usize {
        match self {
            Bank::Peripheral1 | Bank::Peripheral2 => BANK_WIDTH,
            Bank::Basic => NUM_IRQS - 2 * BANK_WIDTH,
        }
    }

    const fn index(self) -> usize {
        self.base() / BANK_WIDTH
    }
}

impl IRQNumber {
    /// Validate a raw line number.
    pub const fn new(line: usize) -> Result<Self> {
        if line < NUM_IRQS {
            Ok(Self(line))
        } else {
            Err(Error::OutOfRange { line })
        }
    }

    /// Constructor for compile-time constants, fails the build on a bad number.
    pub(crate) const fn from_const(line: usize) -> Self {
        assert!(line < NUM_IRQS);

        Self(line)
    }

    /// Return the wrapped number.
    pub const fn get(self) -> usize {
        self.0
    }

    pub const fn bank(self) -> Bank {
        match self.0 / BANK_WIDTH {
            0 => Bank::Peripheral1,
            1 => Bank::Peripheral2,
            _ => Bank::Basic,
        }
    }

    /// Bit position inside the bank's registers.
    pub const fn bit(self) -> usize {
        self.0 % BANK_WIDTH
    }

    /// Single-bit mask for the bank's enable and disable registers.
    pub const fn mask(self) -> u32 {
        1 << self.bit()
    }
}

impl TryFrom<usize> for IRQNumber {
    type Error = Error;

    fn try_from(line: usize) -> Result<Self> {
        Self::new(line)
    }
}

impl fmt::Display for IRQNumber {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<R, M> InterruptController<R, M> {
    /// Create an instance.
    ///
    /// Every vector starts out as the stub, every line as disabled in the mirror.
    pub const fn new(registers: R, irq_mask: M) -> Self {
        Self {
            registers,
            irq_mask,
            vectors: NullLock::new([HandlerEntry::STUB; NUM_IRQS]),
            enabled: EnabledSet::new(),
        }
    }
}

impl<R, M> InterruptController<R, M>
where
    R: interface::Registers,
    M: IRQMask,
{
    /// Whether `line` is enabled in the mirror.
    pub fn is_enabled(&self, line: usize) -> Result<bool> {
        let irq = IRQNumber::new(line)?;

        Ok(self.enabled.contains(irq))
    }

    /// Mirror word of `bank`.
    pub fn enabled_mask(&self, bank: Bank) -> u32 {
        self.enabled.get(bank)
    }

    /// Whether a real handler is installed for `line`.
    pub fn is_registered(&self, line: usize) -> Result<bool> {
        let irq = IRQNumber::new(line)?;

        Ok(self.entry_is_registered(irq))
    }

    // The dispatcher may run between the lock and the read unless IRQs are masked.
    // Masking here restores the caller's state, unlike registration.
    fn entry_is_registered(&self, irq: IRQNumber) -> bool {
        exec_with_irq_masked(&self.irq_mask, || {
            self.vectors.lock(|table| table[irq.get()].registered)
        })
    }
}

//------------------------------------------------------------------------------
// OS Interface Code
//------------------------------------------------------------------------------

impl<R, M> IRQManager for InterruptController<R, M>
where
    R: interface::Registers,
    M: IRQMask,
{
    fn init(&self) -> Result<()> {
        exec_with_irq_masked(&self.irq_mask, || {
            self.vectors
                .lock(|table| table.iter_mut().for_each(|entry| *entry = HandlerEntry::STUB))
        });

        info!("Interrupt controller: {} vectors set to stub", NUM_IRQS);
        Ok(())
    }

    fn register_handler(
        &self,
        line: usize,
        handler: IRQHandler,
        context: HandlerContext,
    ) -> Result<()> {
        let irq = IRQNumber::new(line)?;

        // The dispatcher must never see a handler paired with another line's context.
        self.irq_mask.mask_all();
        self.vectors.lock(|table| {
            table[irq.get()] = HandlerEntry {
                handler,
                context,
                registered: true,
            }
        });
        self.irq_mask.unmask_all();

        info!("IRQ {} handler registered", irq);
        Ok(())
    }

    fn enable(&self, line: usize) -> Result<()> {
        let irq = IRQNumber::new(line)?;

        self.registers.enable(irq.bank(), irq.mask());
        self.enabled.insert(irq);

        if !self.entry_is_registered(irq) {
            warn!(
                "IRQ {} enabled without a handler, it will livelock once raised",
                irq
            );
        }
        Ok(())
    }

    fn disable(&self, line: usize) -> Result<()> {
        let irq = IRQNumber::new(line)?;

        self.registers.disable(irq.bank(), irq.mask());
        self.enabled.remove(irq);

        Ok(())
    }

    fn enable_all(&self) {
        self.irq_mask.unmask_all();
    }

    fn disable_all(&self) {
        self.irq_mask.mask_all();
    }

    fn handle_pending_irqs<'irq_context>(&'irq_context self, _ic: &IRQContext<'irq_context>) {
        // Single read, later decisions must not see a different hardware state.
        let basic: InMemoryRegister<u32, BASIC_PENDING::Register> =
            InMemoryRegister::new(self.registers.basic_pending());

        if basic.is_set(BASIC_PENDING::PENDING_1) {
            let pending = self.registers.pending_1();
            self.dispatch_bank(Bank::Peripheral1, pending);
        }

        if basic.is_set(BASIC_PENDING::PENDING_2) {
            let pending = self.registers.pending_2();
            self.dispatch_bank(Bank::Peripheral2, pending);
        }

        let arm_irqs = basic.read(BASIC_PENDING::ARM_IRQS);
        if arm_irqs != 0 {
            self.dispatch_bank(Bank::Basic, arm_irqs);
        }
    }

    fn print_handler(&self) {
        info!("      Peripheral handler:");

        // Log from a copy, the console must not run with IRQs masked.
        let table = exec_with_irq_masked(&self.irq_mask, || self.vectors.lock(|table| *table));

        for (line, entry) in table.iter().enumerate() {
            let enabled = self.enabled.contains(IRQNumber(line));

            if entry.registered {
                info!(
                    "            {: >3}. {}",
                    line,
                    if enabled { "enabled" } else { "disabled" }
                );
            } else if enabled {
                warn!("            {: >3}. enabled, no handler (stub)", line);
            }
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Testing
//--------------------------------------------------------------------------------------------------
