/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 * Copyright (c) Berkus Decker <berkus+vesper@metta.systems>
 */

//! Implementation of 32-bit ARM (ARM1176JZF-S) kernel functions.

pub mod exception;
