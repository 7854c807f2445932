//! BLE advertising configuration
//!
//! Parameters for LE Set Advertising Parameters and the advertising payload
//! (AD structures, iBeacon) for LE Set Advertising Data.

pub mod beacon;
pub mod data;
pub mod types;

pub use beacon::{IBeacon, ProximityUuid};
pub use data::{parse_ad_structures, AdFlags, AdvertisingPayload};
pub use types::*;
