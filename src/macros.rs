/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 * Copyright (c) Berkus Decker <berkus+vesper@metta.systems>
 */

#[doc(hidden)]
pub fn _print(args: core::fmt::Arguments) {
    use crate::console::console;
    #[cfg(test)]
    capture::record(args);
    // Nothing sensible to do if the console itself fails.
    let _ = console().write_fmt(args);
}

/// Per-thread copy of everything printed, so host tests can inspect log lines without
/// swapping the global console under other tests running in parallel.
#[cfg(test)]
pub(crate) mod capture {
    use std::{cell::RefCell, fmt::Write, string::String};

    std::thread_local! {
        static BUFFER: RefCell<Option<String>> = RefCell::new(None);
    }

    pub(super) fn record(args: core::fmt::Arguments) {
        BUFFER.with(|buffer| {
            if let Some(text) = buffer.borrow_mut().as_mut() {
                let _ = text.write_fmt(args);
            }
        });
    }

    /// Run `f` and return what it printed on this thread.
    pub(crate) fn captured_output(f: impl FnOnce()) -> String {
        BUFFER.with(|buffer| *buffer.borrow_mut() = Some(String::new()));
        f();
        BUFFER.with(|buffer| buffer.borrow_mut().take().unwrap_or_default())
    }
}

//--------------------------------------------------------------------------------------------------
//--------------------------------------------------------------------------------------------------

/// Prints info text, with a newline.
#[macro_export]
macro_rules! info {
    ($string:expr) => ({
        $crate::macros::_print(format_args!(concat!("[I] ", $string, "\n")));
    });
    ($format_string:expr, $($arg:tt)*) => ({
        $crate::macros::_print(format_args!(
            concat!("[I] ", $format_string, "\n"),
            $($arg)*
        ));
    })
}

/// Prints warning text, with a newline.
#[macro_export]
macro_rules! warn {
    ($string:expr) => ({
        $crate::macros::_print(format_args!(concat!("[W] ", $string, "\n")));
    });
    ($format_string:expr, $($arg:tt)*) => ({
        $crate::macros::_print(format_args!(
            concat!("[W] ", $format_string, "\n"),
            $($arg)*
        ));
    })
}

#[cfg(test)]
mod tests {
    use super::capture::captured_output;

    #[test]
    fn info_and_warn_prefix_and_terminate_lines() {
        let out = captured_output(|| {
            crate::info!("controller ready");
            crate::warn!("IRQ {} is odd", 5);
        });
        assert_eq!(out, "[I] controller ready\n[W] IRQ 5 is odd\n");
    }

    #[test]
    fn output_outside_capture_is_not_kept() {
        crate::info!("not captured");
        assert_eq!(captured_output(|| {}), "");
    }
}
