//! HCI protocol constants
//!
//! This module contains the constants used to frame the advertising commands
//! on an H4 transport.

// H4 packet type indicators
pub const HCI_COMMAND_PKT: u8 = 0x01;
pub const HCI_EVENT_PKT: u8 = 0x04;

/// Packet type + opcode + parameter length
pub const HCI_COMMAND_HEADER_SIZE: usize = 4;

/// Size of the command staging buffer owned by the sequencer
pub const HCI_COMMAND_BUFFER_SIZE: usize = 128;

// OGF (Opcode Group Field) values
pub const OGF_HOST_CTL: u8 = 0x03;
pub const OGF_LE: u8 = 0x08;

// Host Controller Commands (OGF: 0x03)
pub const OCF_RESET: u16 = 0x0003;

// LE Command OCF values (OGF: 0x08)
pub const OCF_LE_SET_ADVERTISING_PARAMETERS: u16 = 0x0006;
pub const OCF_LE_SET_ADVERTISING_DATA: u16 = 0x0008;
pub const OCF_LE_SET_ADVERTISING_ENABLE: u16 = 0x000A;

/// Packs an OGF/OCF pair into the 16-bit opcode carried on the wire
pub const fn opcode(ogf: u8, ocf: u16) -> u16 {
    ((ogf as u16) << 10) | (ocf & 0x03ff)
}

// Packed opcodes
pub const OPCODE_RESET: u16 = opcode(OGF_HOST_CTL, OCF_RESET);
pub const OPCODE_LE_SET_ADVERTISING_PARAMETERS: u16 =
    opcode(OGF_LE, OCF_LE_SET_ADVERTISING_PARAMETERS);
pub const OPCODE_LE_SET_ADVERTISING_DATA: u16 = opcode(OGF_LE, OCF_LE_SET_ADVERTISING_DATA);
pub const OPCODE_LE_SET_ADVERTISING_ENABLE: u16 = opcode(OGF_LE, OCF_LE_SET_ADVERTISING_ENABLE);

// Parameter block sizes
pub const PARAM_SIZE_LE_SET_ADVERTISING_ENABLE: usize = 1;
pub const PARAM_SIZE_LE_SET_ADVERTISING_PARAMETERS: usize = 15;

/// Size of the advertising data field carried by LE Set Advertising Data
pub const ADVERTISING_DATA_MAX_LEN: usize = 31;

/// The advertising data parameter block is always the full data field plus
/// its length prefix, whatever the actual data length.
pub const PARAM_SIZE_LE_SET_ADVERTISING_DATA: usize = ADVERTISING_DATA_MAX_LEN + 1;

/// Device address length
pub const BD_ADDR_LEN: usize = 6;
