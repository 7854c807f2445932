//! RustyBeacon - BLE iBeacon advertising over a raw HCI transport
//!
//! This library encodes the HCI commands needed to advertise (reset,
//! advertising parameters, advertising data and advertising enable) into
//! their exact H4 wire form, and provides a sequencer that feeds them to a
//! controller one per tick, respecting the transport's flow control.

pub mod advertising;
pub mod config;
pub mod error;
pub mod hci;
pub mod sequencer;

// Re-export common types for convenience
pub use advertising::{AdvertisingParams, AdvertisingPayload, BdAddr, IBeacon, ProximityUuid};
pub use config::BeaconConfig;
pub use error::{AdvertisingError, Error, HciError};
pub use hci::{HciCommand, HciSocket, HostCallbacks, PacketCapture, TransportGateway};
pub use sequencer::{AdvertisingSequencer, SequencerState, TickOutcome};
