// Copyright lowRISC contributors.
// Licensed under the Apache License, Version 2.0, see LICENSE for details.
// SPDX-License-Identifier: Apache-2.0

//! Cryptographic random numbers.
//!
//! The stress test needs values the transport cannot predict, so that a
//! link that drops or duplicates bits cannot pass by accident. This module
//! provides the seam those values come through, and a `ring`-backed
//! implementation behind the `ring` feature flag.

/// An error returned by a CSRNG.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Error {
    /// Indicates an unspecified, internal error.
    Unspecified,
}

/// A cryptographically-secure random number generator.
///
/// The sole purpose of this type is to fill buffers with random bytes.
/// `Csrng`s must already be seeded with sufficient entropy; creating new
/// random number generators is beyond the scope of this trait.
pub trait Csrng {
    /// Fills `buf` with random bytes.
    fn fill(&mut self, buf: &mut [u8]) -> Result<(), Error>;
}
impl dyn Csrng {} // Ensure object-safe.

#[cfg(feature = "ring")]
pub mod ring {
    //! A [`Csrng`] implementation based on Brian Smith's `ring` crate.
    //!
    //! [`Csrng`]: ../trait.Csrng.html

    use ring::rand::SecureRandom as _;
    use ring::rand::SystemRandom;

    use super::Error;

    /// A CSRNG backed by OS-supplied entropy.
    pub struct Csrng {
        inner: SystemRandom,
    }

    impl Csrng {
        /// Creates a new entropy source.
        pub fn new() -> Self {
            Self {
                inner: SystemRandom::new(),
            }
        }
    }

    impl Default for Csrng {
        fn default() -> Self {
            Self::new()
        }
    }

    impl super::Csrng for Csrng {
        fn fill(&mut self, buf: &mut [u8]) -> Result<(), Error> {
            self.inner.fill(buf).map_err(|_| {
                error!("system CSRNG failed");
                Error::Unspecified
            })
        }
    }
}

#[cfg(test)]
pub(crate) mod fake {
    //! A deterministic [`Csrng`] for tests.
    //!
    //! [`Csrng`]: ../trait.Csrng.html

    use super::Error;

    /// A fake `Csrng` that counts up from a seed, one step per byte.
    pub struct Csrng {
        next: u8,
    }

    impl Csrng {
        /// Creates a new fake, starting at `seed`.
        pub fn new(seed: u8) -> Self {
            Self { next: seed }
        }
    }

    impl super::Csrng for Csrng {
        fn fill(&mut self, buf: &mut [u8]) -> Result<(), Error> {
            for byte in buf {
                *byte = self.next;
                self.next = self.next.wrapping_add(1);
            }
            Ok(())
        }
    }
}
