// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for registration, tick reporting, and configuration.
//!
//! All errors here are programming errors on the caller's side. They are
//! reported synchronously and never retried; the operation that produced one
//! leaves the coordinator unchanged.

use core::fmt;

use crate::registry::RegistrationId;

/// Why an argument passed to a public call was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InvalidArgument {
    /// The null handle ([`RegistrationId::INVALID`]) was passed.
    NullHandle,
    /// An empty owner tag was passed to
    /// [`register_dyn`](crate::coordinator::HybridCoordinator::register_dyn).
    EmptyOwnerTag,
    /// An elapsed time below zero was reported.
    NegativeElapsed,
    /// An elapsed time that is NaN or infinite was reported.
    NonFiniteElapsed,
}

impl InvalidArgument {
    /// Validates an elapsed time reported by the host.
    ///
    /// Accepts any finite value `>= 0`. Negative zero is accepted.
    pub fn check_elapsed(elapsed: f64) -> Result<(), Self> {
        if !elapsed.is_finite() {
            Err(Self::NonFiniteElapsed)
        } else if elapsed < 0.0 {
            Err(Self::NegativeElapsed)
        } else {
            Ok(())
        }
    }
}

impl fmt::Display for InvalidArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NullHandle => f.write_str("registration handle is null"),
            Self::EmptyOwnerTag => f.write_str("owner tag is empty"),
            Self::NegativeElapsed => f.write_str("elapsed time is negative"),
            Self::NonFiniteElapsed => f.write_str("elapsed time is not finite"),
        }
    }
}

/// Errors from [`HybridCoordinator`](crate::coordinator::HybridCoordinator)
/// and [`FixedStepDriver`](crate::driver::FixedStepDriver) operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CoordinatorError {
    /// A null handle, empty tag, or out-of-range elapsed time was passed.
    InvalidArgument(InvalidArgument),
    /// The receiver is already registered under `existing`.
    DuplicateRegistration {
        /// Handle of the live registration holding the same receiver.
        existing: RegistrationId,
    },
}

impl From<InvalidArgument> for CoordinatorError {
    fn from(value: InvalidArgument) -> Self {
        Self::InvalidArgument(value)
    }
}

impl fmt::Display for CoordinatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument(reason) => write!(f, "invalid argument: {reason}"),
            Self::DuplicateRegistration { existing } => {
                write!(f, "receiver is already registered as {existing:?}")
            }
        }
    }
}

impl core::error::Error for CoordinatorError {}

/// Errors from validating a [`CoordinatorConfig`](crate::config::CoordinatorConfig)
/// or [`DriverConfig`](crate::config::DriverConfig).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConfigError {
    /// The fixed interval is zero or negative.
    NonPositiveInterval,
    /// The fixed interval is NaN or infinite.
    NonFiniteInterval,
    /// The maximum frame delta is zero, negative, or NaN.
    NonPositiveMaxFrameDelta,
    /// The driver may not issue any fixed tick per frame.
    ZeroFixedTicksPerFrame,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveInterval => f.write_str("fixed interval must be positive"),
            Self::NonFiniteInterval => f.write_str("fixed interval must be finite"),
            Self::NonPositiveMaxFrameDelta => f.write_str("maximum frame delta must be positive"),
            Self::ZeroFixedTicksPerFrame => {
                f.write_str("at least one fixed tick per frame must be allowed")
            }
        }
    }
}

impl core::error::Error for ConfigError {}
