//! HCI command encoding
//!
//! This module turns the advertising commands into their H4 wire form:
//! `[packet type][opcode, little-endian][parameter length][parameters...]`.

use crate::advertising::AdvertisingParams;
use crate::error::HciError;
use crate::hci::constants::*;
use byteorder::{ByteOrder, LittleEndian};

/// HCI command header structure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HciCommandHeader {
    pub opcode: u16,
    pub param_len: u8,
}

impl HciCommandHeader {
    /// Writes the H4 packet type and the command header into `buf`
    fn write_to(&self, buf: &mut [u8]) {
        buf[0] = HCI_COMMAND_PKT;
        LittleEndian::write_u16(&mut buf[1..3], self.opcode);
        buf[3] = self.param_len;
    }
}

/// The commands needed to bring up advertising
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HciCommand {
    // Host Controller Commands (OGF: 0x03)
    Reset,

    // LE Commands (OGF: 0x08)
    LeSetAdvertisingParameters(AdvertisingParams),
    /// `len` is the value of the length prefix, `data` the full data field
    LeSetAdvertisingData {
        len: u8,
        data: [u8; ADVERTISING_DATA_MAX_LEN],
    },
    LeSetAdvertisingEnable { enable: bool },
}

impl HciCommand {
    /// Builds an LE Set Advertising Data command
    ///
    /// A `declared_len` above 31 is truncated to 31. Only bytes that exist in
    /// `payload` are copied; the rest of the data field stays zero.
    pub fn le_set_advertising_data(payload: &[u8], declared_len: u8) -> Self {
        let mut data = [0u8; ADVERTISING_DATA_MAX_LEN];

        if payload.is_empty() || declared_len == 0 {
            return Self::LeSetAdvertisingData { len: 0, data };
        }

        let len = (declared_len as usize).min(ADVERTISING_DATA_MAX_LEN);
        let copied = len.min(payload.len());
        data[..copied].copy_from_slice(&payload[..copied]);

        Self::LeSetAdvertisingData {
            len: len as u8,
            data,
        }
    }

    /// Get the OGF and OCF for this command
    pub fn opcode_parts(&self) -> (u8, u16) {
        match self {
            Self::Reset => (OGF_HOST_CTL, OCF_RESET),
            Self::LeSetAdvertisingParameters(_) => (OGF_LE, OCF_LE_SET_ADVERTISING_PARAMETERS),
            Self::LeSetAdvertisingData { .. } => (OGF_LE, OCF_LE_SET_ADVERTISING_DATA),
            Self::LeSetAdvertisingEnable { .. } => (OGF_LE, OCF_LE_SET_ADVERTISING_ENABLE),
        }
    }

    /// Get the packed 16-bit opcode
    pub fn opcode(&self) -> u16 {
        let (ogf, ocf) = self.opcode_parts();
        opcode(ogf, ocf)
    }

    /// Number of parameter bytes carried after the header
    pub fn param_len(&self) -> usize {
        match self {
            Self::Reset => 0,
            Self::LeSetAdvertisingParameters(_) => PARAM_SIZE_LE_SET_ADVERTISING_PARAMETERS,
            Self::LeSetAdvertisingData { .. } => PARAM_SIZE_LE_SET_ADVERTISING_DATA,
            Self::LeSetAdvertisingEnable { .. } => PARAM_SIZE_LE_SET_ADVERTISING_ENABLE,
        }
    }

    /// Total encoded length including the H4 packet type
    pub fn packet_len(&self) -> usize {
        HCI_COMMAND_HEADER_SIZE + self.param_len()
    }

    fn write_parameters(&self, params: &mut [u8]) {
        match self {
            Self::Reset => {}

            Self::LeSetAdvertisingParameters(p) => {
                LittleEndian::write_u16(&mut params[0..2], p.interval_min);
                LittleEndian::write_u16(&mut params[2..4], p.interval_max);
                params[4] = p.adv_type;
                params[5] = p.own_addr_type;
                params[6] = p.peer_addr_type;
                params[7..13].copy_from_slice(&p.peer_address.to_wire());
                params[13] = p.channel_map;
                params[14] = p.filter_policy;
            }

            Self::LeSetAdvertisingData { len, data } => {
                params[0] = *len;
                params[1..].copy_from_slice(data);
            }

            Self::LeSetAdvertisingEnable { enable } => {
                params[0] = *enable as u8;
            }
        }
    }

    /// `packet` must be exactly `packet_len()` bytes
    fn encode(&self, packet: &mut [u8]) {
        let header = HciCommandHeader {
            opcode: self.opcode(),
            param_len: self.param_len() as u8,
        };
        header.write_to(&mut packet[..HCI_COMMAND_HEADER_SIZE]);
        self.write_parameters(&mut packet[HCI_COMMAND_HEADER_SIZE..]);
    }

    /// Encode the command into a caller supplied buffer
    ///
    /// Returns the number of bytes written.
    pub fn write_packet(&self, buf: &mut [u8]) -> Result<usize, HciError> {
        let len = self.packet_len();
        if buf.len() < len {
            return Err(HciError::BufferTooSmall {
                needed: len,
                available: buf.len(),
            });
        }

        self.encode(&mut buf[..len]);
        Ok(len)
    }

    /// Convert the command to a raw HCI packet
    pub fn to_packet(&self) -> Vec<u8> {
        let mut packet = vec![0u8; self.packet_len()];
        self.encode(&mut packet);
        packet
    }
}

/// `01 03 0C 00`
pub fn encode_reset() -> Vec<u8> {
    HciCommand::Reset.to_packet()
}

pub fn encode_set_advertising_enable(enable: bool) -> Vec<u8> {
    HciCommand::LeSetAdvertisingEnable { enable }.to_packet()
}

pub fn encode_set_advertising_params(params: &AdvertisingParams) -> Vec<u8> {
    HciCommand::LeSetAdvertisingParameters(*params).to_packet()
}

/// Encodes LE Set Advertising Data
///
/// The parameter length octet is always 32 and the 31-byte data field is
/// always sent in full, zero padded, regardless of `declared_len`.
pub fn encode_set_advertising_data(payload: &[u8], declared_len: u8) -> Vec<u8> {
    HciCommand::le_set_advertising_data(payload, declared_len).to_packet()
}
