/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 * Copyright (c) Berkus Decker <berkus+vesper@metta.systems>
 */

//! MMIO register view of the ARM interrupt controller.

use {
    super::{interface, Bank, BASIC_PENDING},
    crate::platform::device_driver::common::MMIODerefWrapper,
    static_assertions::const_assert_eq,
    tock_registers::{
        interfaces::{Readable, Writeable},
        register_structs,
        registers::{ReadOnly, WriteOnly},
    },
};

//--------------------------------------------------------------------------------------------------
// Private Definitions
//--------------------------------------------------------------------------------------------------

register_structs! {
    #[allow(non_snake_case)]
    RegisterBlock {
        (0x00 => BasicPending: ReadOnly<u32, BASIC_PENDING::Register>),
        (0x04 => Pending1: ReadOnly<u32>),
        (0x08 => Pending2: ReadOnly<u32>),
        (0x0c => __reserved_fiq_control), // FIQ control, unused
        (0x10 => Enable1: WriteOnly<u32>),
        (0x14 => Enable2: WriteOnly<u32>),
        (0x18 => EnableBasic: WriteOnly<u32>),
        (0x1c => Disable1: WriteOnly<u32>),
        (0x20 => Disable2: WriteOnly<u32>),
        (0x24 => DisableBasic: WriteOnly<u32>),
        (0x28 => @END),
    }
}

const_assert_eq!(core::mem::size_of::<RegisterBlock>(), 0x28);

// Hide RegisterBlock from public api.
type Registers = MMIODerefWrapper<RegisterBlock>;

//--------------------------------------------------------------------------------------------------
// Public Definitions
//--------------------------------------------------------------------------------------------------

/// Register view backed by the memory-mapped controller.
pub struct PeripheralIC {
    registers: Registers,
}

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

impl PeripheralIC {
    /// Create an instance.
    ///
    /// # Safety
    ///
    /// - The user must ensure to provide a correct MMIO start address.
    pub const unsafe fn new(mmio_start_addr: usize) -> Self {
        Self {
            registers: Registers::new(mmio_start_addr),
        }
    }
}

//------------------------------------------------------------------------------
// OS Interface Code
//------------------------------------------------------------------------------

impl interface::Registers for PeripheralIC {
    fn basic_pending(&self) -> u32 {
        self.registers.BasicPending.get()
    }

    fn pending_1(&self) -> u32 {
        self.registers.Pending1.get()
    }

    fn pending_2(&self) -> u32 {
        self.registers.Pending2.get()
    }

    fn enable(&self, bank: Bank, mask: u32) {
        match bank {
            Bank::Peripheral1 => self.registers.Enable1.set(mask),
            Bank::Peripheral2 => self.registers.Enable2.set(mask),
            Bank::Basic => self.registers.EnableBasic.set(mask),
        }
    }

    fn disable(&self, bank: Bank, mask: u32) {
        match bank {
            Bank::Peripheral1 => self.registers.Disable1.set(mask),
            Bank::Peripheral2 => self.registers.Disable2.set(mask),
            Bank::Basic => self.registers.DisableBasic.set(mask),
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Testing
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use {super::*, crate::platform::device_driver::interface::Registers as _};

    /// Ten words standing in for the MMIO window, in register order.
    ///
    /// The allocation is only ever reached through `base`, so the view and the test
    /// accessors share one pointer like a device window would.
    struct Window {
        base: *mut u32,
    }

    impl Window {
        fn new() -> Self {
            Self {
                base: Box::into_raw(Box::new([0u32; 10])) as *mut u32,
            }
        }

        fn ic(&self) -> PeripheralIC {
            unsafe { PeripheralIC::new(self.base as usize) }
        }

        fn word(&self, index: usize) -> u32 {
            assert!(index < 10);
            unsafe { self.base.add(index).read_volatile() }
        }

        fn set_word(&self, index: usize, value: u32) {
            assert!(index < 10);
            unsafe { self.base.add(index).write_volatile(value) }
        }
    }

    impl Drop for Window {
        fn drop(&mut self) {
            unsafe { drop(Box::from_raw(self.base as *mut [u32; 10])) }
        }
    }

    #[test]
    fn enable_writes_land_in_bank_registers() {
        let window = Window::new();
        let ic = window.ic();
        ic.enable(Bank::Peripheral1, 1 << 29);
        ic.enable(Bank::Peripheral2, 1 << 25);
        ic.enable(Bank::Basic, 1 << 1);

        assert_eq!(window.word(4), 1 << 29);
        assert_eq!(window.word(5), 1 << 25);
        assert_eq!(window.word(6), 1 << 1);
        assert_eq!(window.word(7), 0);
    }

    #[test]
    fn disable_writes_land_in_bank_registers() {
        let window = Window::new();
        let ic = window.ic();
        ic.disable(Bank::Peripheral1, 1 << 3);
        ic.disable(Bank::Peripheral2, 1 << 4);
        ic.disable(Bank::Basic, 1 << 5);

        assert_eq!(window.word(7), 1 << 3);
        assert_eq!(window.word(8), 1 << 4);
        assert_eq!(window.word(9), 1 << 5);
        assert_eq!(window.word(4), 0);
    }

    #[test]
    fn pending_reads_come_from_status_registers() {
        let window = Window::new();
        window.set_word(0, (1 << 9) | (1 << 8) | 0b1000_0001);
        window.set_word(1, 0xdead_beef);
        window.set_word(2, 0x0000_0400);
        let ic = window.ic();

        assert_eq!(ic.basic_pending(), 0x381);
        assert_eq!(ic.pending_1(), 0xdead_beef);
        assert_eq!(ic.pending_2(), 0x0000_0400);
    }

    #[test]
    fn window_writes_after_creating_view_are_seen() {
        let window = Window::new();
        let ic = window.ic();
        window.set_word(1, 1 << 7);
        assert_eq!(ic.pending_1(), 1 << 7);

        ic.enable(Bank::Basic, 1 << 2);
        window.set_word(2, 1 << 30);
        assert_eq!(window.word(6), 1 << 2);
        assert_eq!(ic.pending_2(), 1 << 30);
    }
}
