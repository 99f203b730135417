/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 */

use crate::console::interface;

//--------------------------------------------------------------------------------------------------
// Public Definitions
//--------------------------------------------------------------------------------------------------

/// A dummy console that just ignores all output.
pub struct NullConsole;

//--------------------------------------------------------------------------------------------------
// Global instances
//--------------------------------------------------------------------------------------------------

pub static NULL_CONSOLE: NullConsole = NullConsole {};

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

impl interface::Write for NullConsole {
    fn write_fmt(&self, _args: core::fmt::Arguments) -> core::fmt::Result {
        Ok(())
    }
}

//--------------------------------------------------------------------------------------------------
// Testing
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::interface::Write;

    #[test]
    fn null_console_swallows_output() {
        assert!(NULL_CONSOLE.write_fmt(format_args!("line {}", 64)).is_ok());
    }

    #[test]
    fn logging_macros_reach_default_console() {
        let out = crate::macros::capture::captured_output(|| {
            crate::info!("controller ready");
            crate::warn!("IRQ {} still mapped to stub", 70);
        });
        assert_eq!(out, "[I] controller ready\n[W] IRQ 70 still mapped to stub\n");
    }
}
