/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 */

pub mod null_console;

//--------------------------------------------------------------------------------------------------
// Public Definitions
//--------------------------------------------------------------------------------------------------

/// Console interfaces.
pub mod interface {
    use core::fmt;

    /// Console write functions.
    pub trait Write {
        /// Write a Rust format string.
        fn write_fmt(&self, args: fmt::Arguments) -> fmt::Result;
    }
}

//--------------------------------------------------------------------------------------------------
// Global instances
//--------------------------------------------------------------------------------------------------

static CONSOLE: InitStateLock<&'static (dyn interface::Write + Sync)> =
    InitStateLock::new(&null_console::NULL_CONSOLE);

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

use crate::sync::{interface::ReadWriteEx, InitStateLock};

/// Register a new console.
///
/// Must be called during the single-threaded init phase, before IRQs are unmasked.
pub fn register_console(new_console: &'static (dyn interface::Write + Sync)) {
    CONSOLE.write(|con| *con = new_console);
}

/// Return a reference to the currently registered console.
///
/// This is the global console used by all printing macros.
pub fn console() -> &'static dyn interface::Write {
    CONSOLE.read(|con| *con)
}
