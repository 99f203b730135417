/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 * Copyright (c) Berkus Decker <berkus+vesper@metta.systems>
 */

use cfg_if::cfg_if;

pub mod device_driver;
pub mod exception;

/// See BCM2835-ARM-Peripherals.pdf
/// See <https://www.raspberrypi.org/forums/viewtopic.php?t=186090> for more details.

pub struct BcmHost;

// Per <https://www.raspberrypi.com/documentation/computers/raspberry-pi.html#peripheral-addresses>:
//
// SoC     Peripheral Address	Peripheral Size	SDRAM Address	Source
// BCM2835 0x20000000           0x01000000      0x40000000      <https://github.com/raspberrypi/linux/blob/7f465f823c2ecbade5877b8bbcb2093a8060cb0e/arch/arm/boot/dts/bcm2835.dtsi#L21>
// BCM2836 0x3f000000           0x01000000      0xc0000000      <https://github.com/raspberrypi/linux/blob/7f465f823c2ecbade5877b8bbcb2093a8060cb0e/arch/arm/boot/dts/bcm2836.dtsi#L10>
// BCM2837 0x3f000000           0x01000000      0xc0000000      <https://github.com/raspberrypi/linux/blob/7f465f823c2ecbade5877b8bbcb2093a8060cb0e/arch/arm/boot/dts/bcm2837.dtsi#L9>
//
// BCM2711 (RasPi4) routes peripherals through a GIC-400 and has no use for this controller.

impl BcmHost {
    /// Offset of the ARM interrupt controller from the peripheral base.
    /// Register block starts with "IRQ basic pending" at 0x7e00b200 bus address.
    pub const INTERRUPT_CONTROLLER_OFFSET: usize = 0xb200;

    /// Address of the ARM interrupt controller register block.
    pub const fn interrupt_controller_address() -> usize {
        Self::get_peripheral_address() + Self::INTERRUPT_CONTROLLER_OFFSET
    }

    /// This returns the size of the peripherals' space.
    pub const fn get_peripheral_size() -> usize {
        0x0100_0000
    }
}

cfg_if! {
    if #[cfg(any(feature = "rpi2", feature = "rpi3"))] {
        impl BcmHost {
            /// Name of the hardware device this BcmHost is compiled for.
            pub const fn board_name() -> &'static str {
                "Raspberry Pi 2/3"
            }

            /// This returns the ARM-side physical address where peripherals are mapped.
            pub const fn get_peripheral_address() -> usize {
                0x3f00_0000
            }
        }
    } else {
        impl BcmHost {
            /// Name of the hardware device this BcmHost is compiled for.
            pub const fn board_name() -> &'static str {
                "Raspberry Pi 1"
            }

            /// This returns the ARM-side physical address where peripherals are mapped.
            pub const fn get_peripheral_address() -> usize {
                0x2000_0000
            }
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Testing
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interrupt_controller_sits_inside_peripheral_window() {
        let base = BcmHost::get_peripheral_address();
        let intc = BcmHost::interrupt_controller_address();
        assert_eq!(intc - base, 0xb200);
        assert!(intc < base + BcmHost::get_peripheral_size());
    }

    #[cfg(not(any(feature = "rpi2", feature = "rpi3")))]
    #[test]
    fn rpi1_controller_address() {
        assert_eq!(BcmHost::interrupt_controller_address(), 0x2000_b200);
        assert_eq!(BcmHost::board_name(), "Raspberry Pi 1");
    }
}
