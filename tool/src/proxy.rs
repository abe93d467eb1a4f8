// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! The connection to the privileged daemon that owns the secure-core link.
//!
//! The daemon multiplexes the physical transport among its clients and is
//! the only process allowed to touch the reset line. Its control socket
//! speaks a fixed little-endian frame format, which this module implements
//! but does not define:
//!
//! - A call request is an op byte `0`, the app id (`u32`), the parameter id
//!   (`u16`), and a length-prefixed (`u16`) payload. The response is a
//!   status code (`u32`); on success, a length-prefixed (`u16`) payload
//!   follows.
//! - A reset request is a lone op byte `1`. The response is a status code
//!   (`u32`); on success, a success byte follows.

use std::io::Read as _;
use std::io::Write as _;
use std::os::unix::net::UnixStream;
use std::path::Path;

use wyvern::client;
use wyvern::client::Client;
use wyvern::hardware::ResetControl;
use wyvern::wire::WireEnum as _;

const OP_CALL: u8 = 0;
const OP_RESET: u8 = 1;

/// A client for the daemon's control socket.
///
/// This is the tool's one concrete implementation of the library's seams:
/// it is both the [`Client`] the register diagnostics go through and the
/// [`ResetControl`] for the reset command.
pub struct DaemonClient {
    stream: UnixStream,
}

impl DaemonClient {
    /// Connects to the daemon's control socket at `path`.
    pub fn connect(path: &Path) -> std::io::Result<Self> {
        let stream = UnixStream::connect(path)?;
        log::info!("connected to {}", path.display());
        Ok(Self { stream })
    }

    fn send(&mut self, frame: &[u8]) -> Result<(), client::Error> {
        self.stream.write_all(frame).map_err(|e| {
            log::error!("{}", e);
            client::Error::Io
        })
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<(), client::Error> {
        self.stream.read_exact(buf).map_err(|e| {
            log::error!("{}", e);
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                client::Error::Disconnected
            } else {
                client::Error::Io
            }
        })
    }

    fn receive_status(&mut self) -> Result<(), client::Error> {
        let mut status = [0; 4];
        self.receive(&mut status)?;
        let status = u32::from_le_bytes(status);
        if status != client::Status::Success.to_wire_value() {
            return Err(client::Error::App(status));
        }
        Ok(())
    }
}

impl Client for DaemonClient {
    fn call_app(
        &mut self,
        app_id: u32,
        param: u16,
        request: &[u8],
        response: &mut [u8],
    ) -> Result<usize, client::Error> {
        let mut frame = Vec::with_capacity(9 + request.len());
        frame.push(OP_CALL);
        frame.extend_from_slice(&app_id.to_le_bytes());
        frame.extend_from_slice(&param.to_le_bytes());
        frame.extend_from_slice(&(request.len() as u16).to_le_bytes());
        frame.extend_from_slice(request);
        self.send(&frame)?;

        self.receive_status()?;
        let mut len = [0; 2];
        self.receive(&mut len)?;
        let len = u16::from_le_bytes(len) as usize;
        if len > response.len() {
            log::error!(
                "daemon sent {} bytes but the caller expected at most {}",
                len,
                response.len()
            );
            return Err(client::Error::ResponseTooLong);
        }
        self.receive(&mut response[..len])?;
        Ok(len)
    }
}

impl ResetControl for DaemonClient {
    fn reset(&mut self) -> Result<bool, client::Error> {
        self.send(&[OP_RESET])?;
        self.receive_status()?;
        let mut success = [0; 1];
        self.receive(&mut success)?;
        Ok(success[0] != 0)
    }
}
