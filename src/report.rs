// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device fault reporting.

use crate::error::Error;

/// Level at which device faults are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FaultLevel {
    /// Faults only show up in debug output.
    #[default]
    Debug,
    /// Faults are reported as errors.
    Error,
}

/// Reports device faults for one bulb.
///
/// Every fault a bulb swallows behind a fallback, and every write failure
/// it surfaces, goes through here. The level is fixed at construction from
/// the `logErrors` setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FaultLog {
    level: FaultLevel,
}

impl FaultLog {
    /// Creates a reporter at the given level.
    #[must_use]
    pub const fn new(level: FaultLevel) -> Self {
        Self { level }
    }

    /// Error level when `log_errors` is set, debug level otherwise.
    #[must_use]
    pub const fn from_flag(log_errors: bool) -> Self {
        if log_errors {
            Self::new(FaultLevel::Error)
        } else {
            Self::new(FaultLevel::Debug)
        }
    }

    /// Returns the reporting level.
    #[must_use]
    pub const fn level(&self) -> FaultLevel {
        self.level
    }

    /// Reports a fault that occurred while `action` ran on `device`.
    pub fn report(&self, device: &str, action: &str, error: &Error) {
        match self.level {
            FaultLevel::Error => tracing::error!(device, action, error = %error, "Device fault"),
            FaultLevel::Debug => tracing::debug!(device, action, error = %error, "Device fault"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CommunicationError;

    #[test]
    fn flag_selects_level() {
        assert_eq!(FaultLog::from_flag(true).level(), FaultLevel::Error);
        assert_eq!(FaultLog::from_flag(false).level(), FaultLevel::Debug);
        assert_eq!(FaultLog::default().level(), FaultLevel::Debug);
    }

    #[test]
    fn report_without_subscriber_is_silent() {
        let err = Error::from(CommunicationError::Timeout(5000));
        FaultLog::from_flag(true).report("Desk Lamp", "getting brightness", &err);
    }
}
