// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Capture directory scanning — find the screenshots a session left behind and
// put them in page order.

pub mod inventory;

pub use inventory::{CaptureSet, ImageAsset, scan_directory};
