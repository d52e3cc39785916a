// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `TuyaLight` library.
//!
//! [`Error`] is what every bulb operation reports. It is `Clone` because a
//! single coalesced device write is reported to every caller that joined
//! the write window. [`ConfigError`] is only produced while loading the
//! configuration and deriving the capability profile.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The bulb's profile does not support the requested operation.
    ///
    /// Raised before any device I/O and never retried.
    #[error("bulb does not support {capability}")]
    CapabilityUnsupported {
        /// Short description of the refused operation.
        capability: &'static str,
    },

    /// Talking to the device failed.
    #[error("device communication error: {0}")]
    Communication(#[from] CommunicationError),

    /// The device reported a value that cannot be interpreted.
    #[error("value error: {0}")]
    Value(#[from] ValueError),
}

impl Error {
    pub(crate) const fn unsupported(capability: &'static str) -> Self {
        Self::CapabilityUnsupported { capability }
    }

    /// Returns true if the error came from device I/O.
    #[must_use]
    pub const fn is_communication(&self) -> bool {
        matches!(self, Self::Communication(_))
    }
}

/// Failures of the underlying property client.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommunicationError {
    /// The device could not be reached.
    #[error("device {0} is unreachable")]
    Unreachable(String),

    /// The request timed out.
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// The device refused the request.
    #[error("request rejected: {0}")]
    Rejected(String),

    /// Transport-level failure reported by the client.
    #[error("transport error: {0}")]
    Transport(String),

    /// A property held a value of the wrong type.
    #[error("property {index} holds unexpected value {value}")]
    UnexpectedValue {
        /// Property index that was read.
        index: u8,
        /// Rendered value that was received.
        value: String,
    },

    /// The caller executing a coalesced write was dropped before the
    /// write completed.
    #[error("coalesced write was abandoned before completion")]
    Abandoned,
}

/// Errors decoding vendor values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A color property string could not be decoded.
    #[error("invalid color string: {0:?}")]
    InvalidColorString(String),

    /// A mode string is not one of the known modes.
    #[error("invalid mode: {0:?}")]
    InvalidMode(String),

    /// A characteristic was written with a value it cannot hold.
    #[error("invalid value {value} for {characteristic}")]
    InvalidCharacteristicValue {
        /// Characteristic that was written.
        characteristic: &'static str,
        /// Rendered value that was rejected.
        value: String,
    },
}

/// Errors loading the bulb configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration is not valid JSON for [`BulbConfig`](crate::BulbConfig).
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The device id is empty.
    #[error("missing device id")]
    MissingDeviceId,

    /// A range has the same minimum and maximum, so it cannot be rescaled.
    #[error("{name} range [{min}, {max}] is empty")]
    EmptyRange {
        /// Which range was rejected.
        name: &'static str,
        /// Configured minimum.
        min: i64,
        /// Configured maximum.
        max: i64,
    },
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_display() {
        let err = Error::unsupported("set brightness");
        assert_eq!(err.to_string(), "bulb does not support set brightness");
    }

    #[test]
    fn error_from_communication_error() {
        let err: Error = CommunicationError::Timeout(5000).into();
        assert!(err.is_communication());
        assert_eq!(
            err.to_string(),
            "device communication error: request timed out after 5000 ms"
        );
    }

    #[test]
    fn empty_range_display() {
        let err = ConfigError::EmptyRange {
            name: "brightness",
            min: 10,
            max: 10,
        };
        assert_eq!(err.to_string(), "brightness range [10, 10] is empty");
    }

    #[test]
    fn errors_are_cloneable_for_fan_out() {
        let err = Error::from(ValueError::InvalidColorString("zz".to_string()));
        assert_eq!(err.clone(), err);
    }
}
