// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! Range checks against individual hardware registers.
//!
//! A [`RegisterCheck`] names a register and the interval its value must
//! fall inside (or, for registers where a particular range means trouble,
//! outside). Bounds are inclusive in both directions.
//!
//! [`HEALTH_CHECKS`] is the fixed suite of checks the `health-check`
//! diagnostic runs. The intervals are as undocumented as the addresses they
//! go with: they encode what a healthy core of this hardware revision looks
//! like, and nothing more.

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::client::Client;
use crate::registers;

/// Whether a check passes when the value is inside or outside its bounds.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Polarity {
    /// The value must fall within `[min, max]`.
    Inside,
    /// The value must fall outside `[min, max]`.
    Outside,
}

/// A named range check against a single 32-bit register.
#[derive(Copy, Clone, Debug)]
pub struct RegisterCheck {
    /// The register's name, as it appears in the register map.
    pub name: &'static str,
    /// The register's bus address.
    pub address: u32,
    /// The lower bound, inclusive.
    pub min: u32,
    /// The upper bound, inclusive.
    pub max: u32,
    /// Which side of the bounds is healthy.
    pub polarity: Polarity,
}

/// A failed check.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The register could not be read at all.
    Read(registers::Error),
    /// The value fell outside the legal range.
    OutOfRange(u32),
    /// The value fell inside an illegal range.
    InIllegalRange(u32),
}

impl RegisterCheck {
    /// A check that passes while the register stays within `[min, max]`.
    pub const fn in_range(
        name: &'static str,
        address: u32,
        min: u32,
        max: u32,
    ) -> Self {
        Self {
            name,
            address,
            min,
            max,
            polarity: Polarity::Inside,
        }
    }

    /// A check that passes while the register stays outside `[min, max]`.
    pub const fn not_in_range(
        name: &'static str,
        address: u32,
        min: u32,
        max: u32,
    ) -> Self {
        Self {
            name,
            address,
            min,
            max,
            polarity: Polarity::Outside,
        }
    }

    /// Reads the register and applies the bounds, returning the value read
    /// on success.
    pub fn run<C: Client>(&self, client: &mut C) -> Result<u32, Error> {
        let value = registers::read32(client, self.address).map_err(|e| {
            error!("failed to read {} ({:#010x}): {:?}", self.name, self.address, e);
            Error::Read(e)
        })?;

        let inside = value >= self.min && value <= self.max;
        match self.polarity {
            Polarity::Inside if !inside => {
                error!("{} out of range: {:#010x}", self.name, value);
                Err(Error::OutOfRange(value))
            }
            Polarity::Outside if inside => {
                error!("{} in illegal range: {:#010x}", self.name, value);
                Err(Error::InIllegalRange(value))
            }
            _ => Ok(value),
        }
    }
}

/// The recorded outcome of one check, for aggregation into a report.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct CheckOutcome {
    /// The checked register's name.
    pub name: &'static str,
    /// The checked register's bus address.
    pub address: u32,
    /// The value read, if the read succeeded.
    pub value: Option<u32>,
    /// Whether the check passed.
    pub healthy: bool,
}

impl CheckOutcome {
    /// A placeholder outcome, for pre-filling report buffers.
    pub const EMPTY: Self = Self {
        name: "",
        address: 0,
        value: None,
        healthy: false,
    };
}

impl RegisterCheck {
    /// Runs the check, recording the outcome instead of propagating it.
    pub fn outcome<C: Client>(&self, client: &mut C) -> CheckOutcome {
        let (value, healthy) = match self.run(client) {
            Ok(value) => (Some(value), true),
            Err(Error::Read(_)) => (None, false),
            Err(Error::OutOfRange(value))
            | Err(Error::InIllegalRange(value)) => (Some(value), false),
        };
        CheckOutcome {
            name: self.name,
            address: self.address,
            value,
            healthy,
        }
    }
}

/// The core's vital signs: the fixed suite run by the `health-check`
/// diagnostic, in execution order.
pub const HEALTH_CHECKS: [RegisterCheck; 6] = [
    RegisterCheck::not_in_range(
        "TRNG_FSM_STATE",
        registers::TRNG_FSM_STATE,
        0x1,
        0x1,
    ),
    RegisterCheck::in_range(
        "TRNG_MIN_VALUE",
        registers::TRNG_MIN_VALUE,
        0x10,
        0x200,
    ),
    RegisterCheck::in_range(
        "TRNG_CUR_NUM_ONES",
        registers::TRNG_CUR_NUM_ONES,
        0x334,
        0x4cc,
    ),
    RegisterCheck::in_range("PMU_RSTSRC", registers::PMU_RSTSRC, 0x0, 0x3),
    RegisterCheck::in_range(
        "GLOBALSEC_ALERT_INTR_STS0",
        registers::GLOBALSEC_ALERT_INTR_STS0,
        0x0,
        0x0,
    ),
    RegisterCheck::in_range(
        "GLOBALSEC_ALERT_INTR_STS1",
        registers::GLOBALSEC_ALERT_INTR_STS1,
        0x0,
        0x0,
    ),
];

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::client::fake;

    const ADDR: u32 = 0x4000_1000;

    #[test]
    fn in_range_bounds_are_inclusive() {
        let check = RegisterCheck::in_range("X", ADDR, 10, 20);
        for (value, expected) in [
            (9, Err(Error::OutOfRange(9))),
            (10, Ok(10)),
            (20, Ok(20)),
            (21, Err(Error::OutOfRange(21))),
        ] {
            let mut client = fake::Client::new();
            client.insert(ADDR, value);
            assert_eq!(check.run(&mut client), expected);
        }
    }

    #[test]
    fn not_in_range_bounds_are_inclusive() {
        let check = RegisterCheck::not_in_range("X", ADDR, 1, 1);
        for (value, expected) in [
            (0, Ok(0)),
            (1, Err(Error::InIllegalRange(1))),
            (2, Ok(2)),
        ] {
            let mut client = fake::Client::new();
            client.insert(ADDR, value);
            assert_eq!(check.run(&mut client), expected);
        }
    }

    #[test]
    fn unreadable_register_fails_the_check() {
        let check = RegisterCheck::in_range("X", ADDR, 0, 0);
        let mut client = fake::Client::new();
        assert!(matches!(check.run(&mut client), Err(Error::Read(_))));
    }

    #[test]
    fn suite_covers_six_distinct_registers() {
        let mut addresses: Vec<_> =
            HEALTH_CHECKS.iter().map(|c| c.address).collect();
        addresses.sort_unstable();
        addresses.dedup();
        assert_eq!(addresses.len(), 6);
    }
}
