// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! Pluggable hardware control.
//!
//! This module provides traits for plugging in the privileged operations
//! the diagnostics need but cannot perform themselves. Today that is just
//! the reset line, which belongs to the system daemon rather than to any
//! app on the core.

use crate::client;

/// Control over the secure core's reset line.
///
/// Implementations front the privileged service that owns the line; this
/// crate never toggles hardware directly.
pub trait ResetControl {
    /// Requests a hard reset of the core, blocking until the service
    /// reports an outcome.
    ///
    /// `Err` means the service could not be reached at all. `Ok(false)`
    /// means it was reached but would not, or could not, reset the core.
    fn reset(&mut self) -> Result<bool, client::Error>;
}
impl dyn ResetControl {} // Ensure object-safety.
