//! Bluetooth HCI (Host Controller Interface) implementation
//!
//! This module provides the advertising command encoder and the transport
//! the encoded commands are handed to.

pub mod constants;
pub mod packet;
pub mod socket;
pub mod transport;

#[cfg(test)]
mod tests;

pub use packet::{
    encode_reset, encode_set_advertising_data, encode_set_advertising_enable,
    encode_set_advertising_params, HciCommand, HciCommandHeader,
};
pub use socket::HciSocket;
pub use transport::{HostCallbacks, PacketCapture, TransportGateway};
