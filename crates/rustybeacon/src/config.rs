//! Beacon configuration
//!
//! Everything the advertising sequencer needs to know, with defaults that
//! advertise an iBeacon every 160 ms and re-arm it on a 5 second tick.

use crate::advertising::{AdvertisingParams, AdvertisingPayload, IBeacon};
use crate::error::AdvertisingError;
use std::time::Duration;

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(5);
pub const DEFAULT_IDLE_TICKS: u8 = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeaconConfig {
    /// Delay before each sequencer step
    pub tick_interval: Duration,
    /// Ticks spent idle after advertising is enabled, before the next reset
    pub idle_ticks: u8,
    pub params: AdvertisingParams,
    pub beacon: IBeacon,
}

impl Default for BeaconConfig {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            idle_ticks: DEFAULT_IDLE_TICKS,
            params: AdvertisingParams::default(),
            beacon: IBeacon::default(),
        }
    }
}

impl BeaconConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }

    pub fn with_idle_ticks(mut self, idle_ticks: u8) -> Self {
        self.idle_ticks = idle_ticks;
        self
    }

    pub fn with_params(mut self, params: AdvertisingParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_beacon(mut self, beacon: IBeacon) -> Self {
        self.beacon = beacon;
        self
    }

    /// The payload carried by LE Set Advertising Data
    pub fn advertising_payload(&self) -> Result<AdvertisingPayload, AdvertisingError> {
        self.beacon.to_payload()
    }
}
