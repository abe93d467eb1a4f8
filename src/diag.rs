// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! The diagnostic operations.
//!
//! Each operation here is a straight-line sequence of blocking calls
//! through the [`client`] and [`hardware`] seams; there are no retries and
//! no recovery. This crate is itself a diagnostic, so it reports failures
//! rather than healing them.
//!
//! [`client`]: ../client/index.html
//! [`hardware`]: ../hardware/index.html

use core::time::Duration;

use byteorder::ByteOrder as _;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::check;
use crate::check::CheckOutcome;
use crate::client;
use crate::client::Client;
use crate::csrng;
use crate::csrng::Csrng;
use crate::hardware::ResetControl;
use crate::registers;

/// How long the core is given to come back up after its reset line is
/// released.
pub const BRINGUP_BUDGET: Duration = Duration::from_millis(100);

/// A diagnostic failure.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The stress test was asked for an odd number of transactions; each
    /// round trip takes two.
    OddCount(u32),
    /// The random source for stress values failed.
    Csrng(csrng::Error),
    /// A register access failed.
    Register(registers::Error),
    /// A scratch-register read-back did not match the value just written.
    Corrupted {
        /// The value written.
        wrote: u32,
        /// The value read back.
        read: u32,
    },
    /// The reset service could not be reached.
    ResetTransport(client::Error),
    /// The reset service was reached, but reported that the reset failed.
    ResetFailed,
    /// The core reset, but took longer than the bring-up budget to come
    /// back.
    SlowBringup {
        /// Observed uptime, in microseconds.
        uptime_us: u32,
        /// The budget (plus margin), in microseconds.
        limit_us: u32,
    },
}

impl From<registers::Error> for Error {
    fn from(e: registers::Error) -> Self {
        Self::Register(e)
    }
}

impl From<csrng::Error> for Error {
    fn from(e: csrng::Error) -> Self {
        Self::Csrng(e)
    }
}

/// Exercises the transport link by bouncing random values off a scratch
/// register.
///
/// `count` is the total number of transactions to issue and must be even:
/// every iteration writes a random 16-bit value to the scratch register and
/// reads it back, checking for exact equality. The first transport failure
/// or corrupted read-back aborts the test. Odd counts are rejected before
/// any I/O; a count of zero trivially passes.
pub fn stress<C: Client, R: Csrng>(
    client: &mut C,
    csrng: &mut R,
    count: u32,
) -> Result<(), Error> {
    if count % 2 != 0 {
        error!("transaction count must be even, got {}", count);
        return Err(Error::OddCount(count));
    }

    // Each iteration is two transactions: the write and the read-back.
    for _ in 0..count / 2 {
        let mut raw = [0; 2];
        csrng.fill(&mut raw)?;
        let value = byteorder::LE::read_u16(&raw) as u32;

        registers::write32(client, registers::PMU_PWRDN_SCRATCH16, value)?;
        let read = registers::read32(client, registers::PMU_PWRDN_SCRATCH16)?;
        if read != value {
            error!(
                "wrote {:#010x} to scratch but read back {:#010x}",
                value, read
            );
            return Err(Error::Corrupted { wrote: value, read });
        }
    }

    info!("scratch register survived {} transactions", count);
    Ok(())
}

/// The aggregated result of the fixed health-check suite.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct HealthReport {
    /// Per-check outcomes, in suite order.
    pub checks: [CheckOutcome; 6],
}

impl HealthReport {
    /// Whether every check in the suite passed.
    pub fn is_healthy(&self) -> bool {
        self.checks.iter().all(|c| c.healthy)
    }
}

/// Samples the core's vital signs.
///
/// Runs every check in [`check::HEALTH_CHECKS`], never short-circuiting: a
/// failure early in the suite does not stop the later reads, so one pass
/// surfaces everything that is wrong at once.
///
/// [`check::HEALTH_CHECKS`]: ../check/constant.HEALTH_CHECKS.html
pub fn health_check<C: Client>(client: &mut C) -> HealthReport {
    let mut checks = [CheckOutcome::EMPTY; 6];
    for (slot, check) in checks.iter_mut().zip(check::HEALTH_CHECKS.iter()) {
        *slot = check.outcome(client);
        if !slot.healthy {
            error!("{} is not healthy", check.name);
        }
    }

    HealthReport { checks }
}

/// Power-cycles the core and validates its bring-up timing.
///
/// On a successful reset, reads the core's cycles-since-boot counter
/// (which restarts from zero at reset release, and counts microseconds)
/// and fails if the implied uptime exceeds [`BRINGUP_BUDGET`] plus a 5%
/// margin. A failed reset is reported without touching the counter.
///
/// [`BRINGUP_BUDGET`]: constant.BRINGUP_BUDGET.html
pub fn reset<D: ResetControl + Client>(device: &mut D) -> Result<(), Error> {
    match device.reset() {
        Err(e) => {
            error!("failed to reach the reset service: {:?}", e);
            return Err(Error::ResetTransport(e));
        }
        Ok(false) => {
            error!("the service failed to reset the core");
            return Err(Error::ResetFailed);
        }
        Ok(true) => {}
    }

    let cycles = registers::cycles_since_boot(device)?;
    let uptime = Duration::from_micros(cycles as u64);
    let limit = BRINGUP_BUDGET * 105 / 100;
    if uptime > limit {
        error!(
            "uptime is {}us but is expected to be less than {}us",
            uptime.as_micros(),
            limit.as_micros()
        );
        return Err(Error::SlowBringup {
            uptime_us: cycles,
            limit_us: limit.as_micros() as u32,
        });
    }

    info!("core back up {}us after reset", cycles);
    Ok(())
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::client::fake;
    use crate::csrng::fake as fake_csrng;

    /// A fake device: the register-file client plus a scripted reset line.
    struct Device {
        client: fake::Client,
        reset_outcome: Result<bool, client::Error>,
        resets: u32,
    }

    impl Device {
        fn new(reset_outcome: Result<bool, client::Error>) -> Self {
            Self {
                client: fake::Client::new(),
                reset_outcome,
                resets: 0,
            }
        }
    }

    impl Client for Device {
        fn call_app(
            &mut self,
            app_id: u32,
            param: u16,
            request: &[u8],
            response: &mut [u8],
        ) -> Result<usize, client::Error> {
            self.client.call_app(app_id, param, request, response)
        }
    }

    impl ResetControl for Device {
        fn reset(&mut self) -> Result<bool, client::Error> {
            self.resets += 1;
            self.reset_outcome
        }
    }

    #[test]
    fn stress_issues_exactly_count_transactions() {
        let mut client = fake::Client::new();
        let mut csrng = fake_csrng::Csrng::new(7);
        assert_eq!(stress(&mut client, &mut csrng, 4), Ok(()));
        assert_eq!(client.writes, 2);
        assert_eq!(client.reads, 2);
        assert_eq!(client.calls, 4);
    }

    #[test]
    fn stress_of_zero_is_trivially_healthy() {
        let mut client = fake::Client::new();
        let mut csrng = fake_csrng::Csrng::new(0);
        assert_eq!(stress(&mut client, &mut csrng, 0), Ok(()));
        assert_eq!(client.calls, 0);
    }

    #[test]
    fn stress_rejects_odd_counts_before_any_io() {
        let mut client = fake::Client::new();
        let mut csrng = fake_csrng::Csrng::new(0);
        assert_eq!(
            stress(&mut client, &mut csrng, 3),
            Err(Error::OddCount(3)),
        );
        assert_eq!(client.calls, 0);
    }

    #[test]
    fn stress_stops_at_the_first_corrupted_read_back() {
        let mut client = fake::Client::new();
        client.corrupt_reads_from(2);
        let mut csrng = fake_csrng::Csrng::new(0x10);

        let result = stress(&mut client, &mut csrng, 6);
        assert!(matches!(result, Err(Error::Corrupted { .. })));
        // The second pair fails; the third is never issued.
        assert_eq!(client.calls, 4);
    }

    #[test]
    fn stress_stops_at_the_first_transport_failure() {
        let mut client = fake::Client::new();
        client.fail_call(1, client::Status::Busy);
        let mut csrng = fake_csrng::Csrng::new(0);

        let result = stress(&mut client, &mut csrng, 4);
        assert!(matches!(
            result,
            Err(Error::Register(registers::Error::Client(_))),
        ));
        assert_eq!(client.calls, 1);
    }

    fn healthy_client() -> fake::Client {
        let mut client = fake::Client::new();
        client
            .insert(registers::TRNG_FSM_STATE, 0x0)
            .insert(registers::TRNG_MIN_VALUE, 0x100)
            .insert(registers::TRNG_CUR_NUM_ONES, 0x400)
            .insert(registers::PMU_RSTSRC, 0x0)
            .insert(registers::GLOBALSEC_ALERT_INTR_STS0, 0x0)
            .insert(registers::GLOBALSEC_ALERT_INTR_STS1, 0x0);
        client
    }

    #[test]
    fn health_check_passes_on_a_healthy_core() {
        let mut client = healthy_client();
        let report = health_check(&mut client);
        assert!(report.is_healthy());
        assert_eq!(client.reads, 6);
    }

    #[test]
    fn health_check_flags_the_trng_stuck_state() {
        let mut client = healthy_client();
        client.insert(registers::TRNG_FSM_STATE, 0x1);

        let report = health_check(&mut client);
        assert!(!report.is_healthy());
        assert_eq!(report.checks[0].name, "TRNG_FSM_STATE");
        assert!(!report.checks[0].healthy);
        assert_eq!(report.checks[0].value, Some(0x1));
        assert!(report.checks[1..].iter().all(|c| c.healthy));
    }

    #[test]
    fn health_check_reads_every_register_despite_failures() {
        let mut client = fake::Client::new();
        let report = health_check(&mut client);
        assert!(!report.is_healthy());
        assert_eq!(client.reads, 6);
        assert!(report.checks.iter().all(|c| c.value.is_none()));
    }

    #[test]
    fn reset_passes_when_the_core_comes_back_in_budget() {
        let mut device = Device::new(Ok(true));
        device.client.set_cycles(100_000);
        assert_eq!(reset(&mut device), Ok(()));
        assert_eq!(device.resets, 1);
    }

    #[test]
    fn reset_budget_margin_is_inclusive() {
        let mut device = Device::new(Ok(true));
        device.client.set_cycles(105_000);
        assert_eq!(reset(&mut device), Ok(()));

        let mut device = Device::new(Ok(true));
        device.client.set_cycles(105_001);
        assert_eq!(
            reset(&mut device),
            Err(Error::SlowBringup {
                uptime_us: 105_001,
                limit_us: 105_000,
            }),
        );
    }

    #[test]
    fn failed_reset_skips_the_uptime_check() {
        let mut device = Device::new(Ok(false));
        assert_eq!(reset(&mut device), Err(Error::ResetFailed));
        assert_eq!(device.client.calls, 0);
    }

    #[test]
    fn unreachable_reset_service_skips_the_uptime_check() {
        let mut device = Device::new(Err(client::Error::Disconnected));
        assert_eq!(
            reset(&mut device),
            Err(Error::ResetTransport(client::Error::Disconnected)),
        );
        assert_eq!(device.client.calls, 0);
    }
}
