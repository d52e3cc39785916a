// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory property client.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;

use crate::client::{PropertyClient, PropertyValue};
use crate::error::CommunicationError;

/// One write observed by a [`SimulatedDevice`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRecord {
    /// Property index that was written.
    pub index: u8,
    /// Value that was written.
    pub value: PropertyValue,
    /// When the write arrived.
    pub at: Instant,
}

#[derive(Debug, Default)]
struct SimState {
    properties: HashMap<u8, PropertyValue>,
    failing_reads: HashSet<u8>,
    failing_writes: HashSet<u8>,
    unreachable: bool,
    ignore_writes_while_off: bool,
    journal: Vec<WriteRecord>,
    reads: Vec<u8>,
}

/// A vendor device held in memory.
///
/// Reads and writes complete immediately. Faults can be injected per
/// property, and every write is journaled with a timestamp taken from the
/// tokio clock, so tests running with paused time can inspect debounce
/// timing.
///
/// # Examples
///
/// ```
/// use tuyalight_lib::client::{PropertyClient, PropertyValue, SimulatedDevice};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let device = SimulatedDevice::new("bf0123").with_property(1, true);
///
/// let on = device.get_property("bf0123", 1).await.unwrap();
/// assert_eq!(on, Some(PropertyValue::Bool(true)));
///
/// device.fail_reads(1, true);
/// assert!(device.get_property("bf0123", 1).await.is_err());
/// # }
/// ```
#[derive(Debug)]
pub struct SimulatedDevice {
    device_id: String,
    write_interval: Duration,
    state: Mutex<SimState>,
}

impl SimulatedDevice {
    /// On/off property index, used by the powered-off write quirk.
    const ON_OFF: u8 = 1;

    /// Creates an empty device.
    #[must_use]
    pub fn new(device_id: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            write_interval: Duration::ZERO,
            state: Mutex::new(SimState::default()),
        }
    }

    /// Seeds a property value.
    #[must_use]
    pub fn with_property(self, index: u8, value: impl Into<PropertyValue>) -> Self {
        self.state.lock().properties.insert(index, value.into());
        self
    }

    /// Sets the minimum interval between writes reported to the bulb.
    #[must_use]
    pub fn with_write_interval(mut self, interval: Duration) -> Self {
        self.write_interval = interval;
        self
    }

    /// Returns the device id.
    #[must_use]
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Overwrites a property without journaling it, as if the device
    /// changed on its own.
    pub fn set(&self, index: u8, value: impl Into<PropertyValue>) {
        self.state.lock().properties.insert(index, value.into());
    }

    /// Returns the current value of a property.
    #[must_use]
    pub fn property(&self, index: u8) -> Option<PropertyValue> {
        self.state.lock().properties.get(&index).cloned()
    }

    /// Makes reads of `index` fail (or succeed again).
    pub fn fail_reads(&self, index: u8, failing: bool) {
        toggle(&mut self.state.lock().failing_reads, index, failing);
    }

    /// Makes writes to `index` fail (or succeed again).
    pub fn fail_writes(&self, index: u8, failing: bool) {
        toggle(&mut self.state.lock().failing_writes, index, failing);
    }

    /// Makes every request fail as unreachable.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.state.lock().unreachable = unreachable;
    }

    /// Accepts but discards value writes while the device is switched off.
    pub fn ignore_writes_while_off(&self, ignore: bool) {
        self.state.lock().ignore_writes_while_off = ignore;
    }

    /// Returns every write received so far, in arrival order.
    #[must_use]
    pub fn writes(&self) -> Vec<WriteRecord> {
        self.state.lock().journal.clone()
    }

    /// Returns the values written to one property, in arrival order.
    #[must_use]
    pub fn writes_to(&self, index: u8) -> Vec<PropertyValue> {
        self.state
            .lock()
            .journal
            .iter()
            .filter(|w| w.index == index)
            .map(|w| w.value.clone())
            .collect()
    }

    /// Returns the property indices read so far, in order.
    #[must_use]
    pub fn reads(&self) -> Vec<u8> {
        self.state.lock().reads.clone()
    }

    /// Forgets the recorded reads and writes.
    pub fn clear_history(&self) {
        let mut state = self.state.lock();
        state.journal.clear();
        state.reads.clear();
    }

    fn check_reachable(&self, state: &SimState, device_id: &str) -> Result<(), CommunicationError> {
        if state.unreachable || device_id != self.device_id {
            return Err(CommunicationError::Unreachable(device_id.to_string()));
        }
        Ok(())
    }
}

fn toggle(set: &mut HashSet<u8>, index: u8, enabled: bool) {
    if enabled {
        set.insert(index);
    } else {
        set.remove(&index);
    }
}

impl PropertyClient for SimulatedDevice {
    async fn get_property(
        &self,
        device_id: &str,
        index: u8,
    ) -> Result<Option<PropertyValue>, CommunicationError> {
        let mut state = self.state.lock();
        self.check_reachable(&state, device_id)?;
        state.reads.push(index);
        if state.failing_reads.contains(&index) {
            return Err(CommunicationError::Timeout(5000));
        }
        Ok(state.properties.get(&index).cloned())
    }

    async fn set_property(
        &self,
        device_id: &str,
        index: u8,
        value: PropertyValue,
    ) -> Result<bool, CommunicationError> {
        let mut state = self.state.lock();
        self.check_reachable(&state, device_id)?;
        if state.failing_writes.contains(&index) {
            return Err(CommunicationError::Rejected(format!("write to {index}")));
        }
        state.journal.push(WriteRecord {
            index,
            value: value.clone(),
            at: Instant::now(),
        });

        let powered_off = state.properties.get(&Self::ON_OFF) == Some(&PropertyValue::Bool(false));
        if state.ignore_writes_while_off && index != Self::ON_OFF && powered_off {
            tracing::trace!(index, %value, "Simulated device ignored write while off");
            return Ok(true);
        }
        state.properties.insert(index, value);
        Ok(true)
    }

    fn write_interval(&self, _device_id: &str) -> Duration {
        self.write_interval
    }
}
