// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration for the coordinator and the host driver.
//!
//! Both configs are plain `Copy` structs with `const` presets. Construct a
//! custom one with struct syntax and call `validate()`, or use
//! [`CoordinatorConfig::new`].

use crate::error::ConfigError;

/// Configuration for the [`HybridCoordinator`](crate::coordinator::HybridCoordinator).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinatorConfig {
    /// Length of one fixed simulation step, in seconds.
    ///
    /// This is the hybrid delta handed to receivers on every fixed tick and
    /// the upper bound on accumulated stolen time.
    pub fixed_interval: f64,
}

impl CoordinatorConfig {
    /// 50 Hz fixed step (0.02 s), the common physics default.
    pub const HZ_50: Self = Self {
        fixed_interval: 0.02,
    };

    /// 60 Hz fixed step.
    pub const HZ_60: Self = Self {
        fixed_interval: 1.0 / 60.0,
    };

    /// Creates a config with the given fixed interval in seconds.
    pub fn new(fixed_interval: f64) -> Result<Self, ConfigError> {
        let config = Self { fixed_interval };
        config.validate()?;
        Ok(config)
    }

    /// Creates a config that ticks `rate` times per second.
    pub fn from_rate(rate: f64) -> Result<Self, ConfigError> {
        Self::new(1.0 / rate)
    }

    /// Checks that the fixed interval is finite and positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.fixed_interval.is_finite() {
            return Err(ConfigError::NonFiniteInterval);
        }
        if self.fixed_interval <= 0.0 {
            return Err(ConfigError::NonPositiveInterval);
        }
        Ok(())
    }
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self::HZ_50
    }
}

/// Configuration for the [`FixedStepDriver`](crate::driver::FixedStepDriver).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DriverConfig {
    /// Frame deltas longer than this (in seconds) are clamped before they
    /// reach the accumulator. Bounds catch-up after a stall.
    pub max_frame_delta: f64,
    /// Upper bound on fixed ticks issued for a single frame. Backlog beyond
    /// this is dropped.
    pub max_fixed_ticks_per_frame: u32,
}

impl DriverConfig {
    /// Clamp frames at 250 ms and run at most 5 fixed steps per frame.
    pub const DEFAULT: Self = Self {
        max_frame_delta: 0.25,
        max_fixed_ticks_per_frame: 5,
    };

    /// Checks that both limits are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_frame_delta.is_nan() || self.max_frame_delta <= 0.0 {
            return Err(ConfigError::NonPositiveMaxFrameDelta);
        }
        if self.max_fixed_ticks_per_frame == 0 {
            return Err(ConfigError::ZeroFixedTicksPerFrame);
        }
        Ok(())
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        assert_eq!(CoordinatorConfig::HZ_50.validate(), Ok(()));
        assert_eq!(CoordinatorConfig::HZ_60.validate(), Ok(()));
        assert_eq!(DriverConfig::DEFAULT.validate(), Ok(()));
    }

    #[test]
    fn rejects_bad_interval() {
        assert_eq!(
            CoordinatorConfig::new(0.0),
            Err(ConfigError::NonPositiveInterval)
        );
        assert_eq!(
            CoordinatorConfig::new(-0.02),
            Err(ConfigError::NonPositiveInterval)
        );
        assert_eq!(
            CoordinatorConfig::new(f64::NAN),
            Err(ConfigError::NonFiniteInterval)
        );
        assert_eq!(
            CoordinatorConfig::from_rate(0.0),
            Err(ConfigError::NonFiniteInterval)
        );
    }

    #[test]
    fn from_rate_inverts() {
        let config = CoordinatorConfig::from_rate(50.0).unwrap();
        assert!((config.fixed_interval - 0.02).abs() < 1e-12);
    }

    #[test]
    fn rejects_bad_driver_limits() {
        let mut config = DriverConfig::DEFAULT;
        config.max_frame_delta = f64::NAN;
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonPositiveMaxFrameDelta)
        );

        let mut config = DriverConfig::DEFAULT;
        config.max_fixed_ticks_per_frame = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroFixedTicksPerFrame));
    }
}
