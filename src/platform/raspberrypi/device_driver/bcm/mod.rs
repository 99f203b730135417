// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2018-2022 Andre Richter <andre.o.richter@gmail.com>

//! BCM driver top level.

pub mod interrupt_controller;

pub use interrupt_controller::*;
