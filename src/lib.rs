// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! `wyvern` is a diagnostic library for exercising and health-checking a
//! secure co-processor over a privileged IPC channel.
//!
//! The library does not speak to hardware itself. Everything it does is a
//! sequence of blocking request/response calls through two pre-existing
//! seams, which integrators plug in:
//!
//! - [`client::Client`], the IPC client used to issue calls against the
//!   core's apps (in particular, the debug register interface).
//! - [`hardware::ResetControl`], the privileged service that owns the core's
//!   reset line.
//!
//! On top of those seams, the [`diag` module] implements the three
//! diagnostic operations: a scratch-register stress test of the transport
//! link, a fixed suite of register health checks, and a reset with a
//! post-reset bring-up timing check.
//!
//! The register addresses and intervals baked into this crate are tied to a
//! specific hardware revision; see the [`registers` module] for the caveats.
//!
//! [`diag` module]: diag/index.html
//! [`registers` module]: registers/index.html

#![cfg_attr(not(test), no_std)]
#![deny(missing_docs)]
#![deny(warnings)]
#![deny(unused)]
#![deny(unsafe_code)]

#[macro_use]
mod debug;

#[macro_use]
pub mod wire;

pub mod check;
pub mod client;
pub mod csrng;
pub mod diag;
pub mod hardware;
pub mod registers;
