// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2020-2022 Andre Richter <andre.o.richter@gmail.com>

//! Platform asynchronous exception handling.

//--------------------------------------------------------------------------------------------------
// Public Definitions
//--------------------------------------------------------------------------------------------------

/// Export for reuse in generic asynchronous.rs.
pub use crate::platform::device_driver::{IRQNumber, NUM_IRQS};

/// Well-known BCM2835 lines.
pub mod irq_map {
    use crate::platform::device_driver::IRQNumber;

    pub const SYSTEM_TIMER_1: IRQNumber = IRQNumber::from_const(1);
    pub const SYSTEM_TIMER_3: IRQNumber = IRQNumber::from_const(3);
    pub const USB: IRQNumber = IRQNumber::from_const(9);
    pub const AUX: IRQNumber = IRQNumber::from_const(29);
    pub const GPIO_0: IRQNumber = IRQNumber::from_const(49);
    pub const GPIO_1: IRQNumber = IRQNumber::from_const(50);
    pub const GPIO_2: IRQNumber = IRQNumber::from_const(51);
    pub const GPIO_3: IRQNumber = IRQNumber::from_const(52);
    pub const I2C: IRQNumber = IRQNumber::from_const(53);
    pub const SPI: IRQNumber = IRQNumber::from_const(54);
    pub const PCM: IRQNumber = IRQNumber::from_const(55);
    pub const PL011_UART: IRQNumber = IRQNumber::from_const(57);
    pub const ARM_TIMER: IRQNumber = IRQNumber::from_const(64);
    pub const ARM_MAILBOX: IRQNumber = IRQNumber::from_const(65);
}

#[cfg(any(target_arch = "aarch64", target_arch = "arm"))]
mod global {
    use crate::{
        arch::exception::asynchronous::LocalIRQMask,
        exception::asynchronous::{interface::IRQManager, IRQContext},
        platform::{
            device_driver::{InterruptController, PeripheralIC},
            BcmHost,
        },
    };

    type BcmInterruptController = InterruptController<PeripheralIC, LocalIRQMask>;

    static INTERRUPT_CONTROLLER: BcmInterruptController = InterruptController::new(
        unsafe { PeripheralIC::new(BcmHost::interrupt_controller_address()) },
        LocalIRQMask,
    );

    /// Return a reference to the IRQ manager.
    pub fn irq_manager() -> &'static impl IRQManager {
        &INTERRUPT_CONTROLLER
    }

    /// IRQ trap entry, called by the exception vector once the interrupted context is saved.
    #[no_mangle]
    extern "C" fn irq_handler() {
        let token = unsafe { &IRQContext::new() };
        irq_manager().handle_pending_irqs(token);
    }
}

#[cfg(any(target_arch = "aarch64", target_arch = "arm"))]
pub use global::irq_manager;

//--------------------------------------------------------------------------------------------------
// Testing
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use {super::irq_map, crate::platform::device_driver::Bank};

    #[test]
    fn uart_and_gpio_lines_live_in_second_bank() {
        for irq in [
            irq_map::GPIO_0,
            irq_map::GPIO_3,
            irq_map::I2C,
            irq_map::PL011_UART,
        ] {
            assert_eq!(irq.bank(), Bank::Peripheral2);
        }
        assert_eq!(irq_map::PL011_UART.bit(), 25);
    }

    #[test]
    fn timers_split_between_first_and_basic_bank() {
        assert_eq!(irq_map::SYSTEM_TIMER_1.bank(), Bank::Peripheral1);
        assert_eq!(irq_map::SYSTEM_TIMER_3.mask(), 1 << 3);
        assert_eq!(irq_map::ARM_TIMER.bank(), Bank::Basic);
        assert_eq!(irq_map::ARM_TIMER.bit(), 0);
        assert_eq!(irq_map::ARM_MAILBOX.get(), 65);
    }
}
