// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! Register-level access to the secure core.
//!
//! The core's system app exposes a debug interface for peeking and poking
//! 32-bit hardware registers by bus address. This module provides the two
//! primitives over that interface, plus the cycle counter query, each a
//! single request/response round trip through a [`Client`].
//!
//! The addresses below are magic numbers out of the core's register map.
//! They are correct for the hardware revision this crate targets and are
//! not assumed portable to any other revision.

use byteorder::ByteOrder as _;
use zerocopy::AsBytes;
use zerocopy::FromBytes;

use crate::client;
use crate::client::Client;

/// Reset-source register; records what caused the last reset.
pub const PMU_RSTSRC: u32 = 0x4000_0000;

/// Power-management scratch register 16. Retains writes, has no hardware
/// side effects, which makes it safe to hammer from the stress test.
pub const PMU_PWRDN_SCRATCH16: u32 = 0x4000_00d4;

/// Alert interrupt status, bank 0. Any set bit is a tripped alert.
pub const GLOBALSEC_ALERT_INTR_STS0: u32 = 0x4010_4004;

/// Alert interrupt status, bank 1.
pub const GLOBALSEC_ALERT_INTR_STS1: u32 = 0x4010_4008;

/// TRNG state-machine state; `0x1` is the stuck/error state.
pub const TRNG_FSM_STATE: u32 = 0x4041_002c;

/// Smallest sample the TRNG has produced since its stats were cleared.
pub const TRNG_MIN_VALUE: u32 = 0x4041_0044;

/// Running count of one bits in the TRNG's current sample window.
pub const TRNG_CUR_NUM_ONES: u32 = 0x4041_008c;

/// The wire layout of a [`PARAM_READ32`] request.
///
/// Fields are stored in wire (little-endian) order; use [`Read32::new`] to
/// build one from host-order values.
///
/// [`PARAM_READ32`]: ../client/constant.PARAM_READ32.html
#[derive(Copy, Clone, Debug, PartialEq, Eq, AsBytes, FromBytes)]
#[repr(transparent)]
pub struct Read32 {
    /// The register address to read.
    pub address: u32,
}

impl Read32 {
    /// Builds a read request for `address`.
    pub fn new(address: u32) -> Self {
        Self {
            address: address.to_le(),
        }
    }
}

/// The wire layout of a [`PARAM_WRITE32`] request.
///
/// Fields are stored in wire (little-endian) order; use [`Write32::new`] to
/// build one from host-order values.
///
/// [`PARAM_WRITE32`]: ../client/constant.PARAM_WRITE32.html
#[derive(Copy, Clone, Debug, PartialEq, Eq, AsBytes, FromBytes)]
#[repr(C)]
pub struct Write32 {
    /// The register address to write.
    pub address: u32,
    /// The value to write.
    pub value: u32,
}

impl Write32 {
    /// Builds a write request setting `address` to `value`.
    pub fn new(address: u32, value: u32) -> Self {
        Self {
            address: address.to_le(),
            value: value.to_le(),
        }
    }
}

/// A register-access error.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The IPC call itself failed.
    Client(client::Error),
    /// The core's reply was not the expected four bytes.
    BadResponseLen(usize),
}

impl From<client::Error> for Error {
    fn from(e: client::Error) -> Self {
        Self::Client(e)
    }
}

/// Reads the 32-bit register at `address`.
pub fn read32<C: Client>(client: &mut C, address: u32) -> Result<u32, Error> {
    let req = Read32::new(address);
    let mut resp = [0; 4];
    let n = client.call_app(
        client::APP_ID_SYSTEM,
        client::PARAM_READ32,
        req.as_bytes(),
        &mut resp,
    )?;
    if n != resp.len() {
        error!("core sent {} bytes for a register read instead of 4", n);
        return Err(Error::BadResponseLen(n));
    }

    let value = byteorder::LE::read_u32(&resp);
    trace!("read32 {:#010x} -> {:#010x}", address, value);
    Ok(value)
}

/// Writes `value` to the 32-bit register at `address`.
pub fn write32<C: Client>(
    client: &mut C,
    address: u32,
    value: u32,
) -> Result<(), Error> {
    let req = Write32::new(address, value);
    client.call_app(
        client::APP_ID_SYSTEM,
        client::PARAM_WRITE32,
        req.as_bytes(),
        &mut [],
    )?;
    trace!("write32 {:#010x} <- {:#010x}", address, value);
    Ok(())
}

/// Reads the number of cycles the core has been running since it last left
/// reset.
pub fn cycles_since_boot<C: Client>(client: &mut C) -> Result<u32, Error> {
    let mut resp = [0; 4];
    let n = client.call_app(
        client::APP_ID_SYSTEM,
        client::PARAM_CYCLES_SINCE_BOOT,
        &[],
        &mut resp,
    )?;
    if n != resp.len() {
        error!("unexpected size of cycle count: {} bytes", n);
        return Err(Error::BadResponseLen(n));
    }

    Ok(byteorder::LE::read_u32(&resp))
}
