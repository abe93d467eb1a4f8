// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! The IPC client interface to the secure core.
//!
//! The transport to the core, and the privileged daemon that owns it, are
//! pre-existing components well outside this crate. This module only pins
//! down the seam they are reached through: [`Client`], a single blocking
//! request/response call against one of the core's apps.

use core::fmt;

use crate::wire::WireEnum;

/// The app id of the core's system app, which hosts the debug register
/// interface used by this crate.
pub const APP_ID_SYSTEM: u32 = 0;

/// Parameter id for a 32-bit register read.
///
/// The request is a [`registers::Read32`]; the response is the four-byte
/// little-endian register value.
///
/// [`registers::Read32`]: ../registers/struct.Read32.html
pub const PARAM_READ32: u16 = 0xf004;

/// Parameter id for a 32-bit register write.
///
/// The request is a [`registers::Write32`]; the response is empty.
///
/// [`registers::Write32`]: ../registers/struct.Write32.html
pub const PARAM_WRITE32: u16 = 0xf005;

/// Parameter id for querying the core's free-running cycle counter.
///
/// The request is empty; the response is a four-byte little-endian count of
/// cycles since the core last left reset.
pub const PARAM_CYCLES_SINCE_BOOT: u16 = 0x0200;

wire_enum! {
    /// An app-level status code, reported by the core for every call.
    ///
    /// Any value other than `Success` means the call had no effect.
    pub enum Status: u32 {
        /// The call succeeded.
        Success = 0,
        /// The core rejected the call's arguments.
        BogusArgs = 1,
        /// The app encountered an internal error.
        InternalError = 2,
        /// The request payload was too large for the app.
        TooMuch = 3,
        /// The app failed to reach the hardware it fronts.
        IoError = 4,
        /// The call could not be routed to the app.
        RpcError = 5,
        /// The request arrived corrupted.
        ChecksumError = 6,
        /// The app is servicing another caller.
        Busy = 7,
        /// The app did not respond in time.
        Timeout = 8,
    }
}

/// An IPC client error.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The core completed the exchange but reported a non-success status
    /// code.
    ///
    /// The raw code is preserved, since the core may report codes this
    /// library does not know about; [`Status`] names the ones it does.
    App(u32),
    /// The transport to the core failed mid-call.
    Io,
    /// The connection to the daemon (or the core behind it) is gone.
    Disconnected,
    /// The core's response did not fit the caller's buffer.
    ResponseTooLong,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::App(code) => match Status::from_wire_value(*code) {
                Some(status) => write!(f, "app status {} ({})", status, code),
                None => write!(f, "unknown app status ({})", code),
            },
            Self::Io => write!(f, "transport failure"),
            Self::Disconnected => write!(f, "connection lost"),
            Self::ResponseTooLong => write!(f, "response overran buffer"),
        }
    }
}

/// The pre-existing IPC client used to issue calls to the secure core.
///
/// Every call is a single blocking round trip: implementations must not
/// return until the core has responded or the transport has failed. There
/// are no retries at this layer.
pub trait Client {
    /// Issues a call to `param` of app `app_id`, sending `request` and
    /// writing the core's reply into the front of `response`.
    ///
    /// Returns the number of reply bytes written. Callers that expect no
    /// reply may pass an empty buffer.
    fn call_app(
        &mut self,
        app_id: u32,
        param: u16,
        request: &[u8],
        response: &mut [u8],
    ) -> Result<usize, Error>;
}
impl dyn Client {} // Ensure object-safety.


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn status_round_trip() {
        assert_eq!(Status::from_wire_value(0), Some(Status::Success));
        assert_eq!(Status::Busy.to_wire_value(), 7);
        assert_eq!(Status::from_wire_value(0xdead_beef), None);
    }

    #[test]
    fn error_display_names_known_statuses() {
        let message = format!("{}", Error::App(4));
        assert!(message.contains("IoError"), "got: {}", message);

        let message = format!("{}", Error::App(0x99));
        assert!(message.contains("unknown"), "got: {}", message);
    }
}
