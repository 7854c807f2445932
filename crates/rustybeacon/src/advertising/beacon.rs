//! iBeacon advertising payload

use crate::advertising::data::{AdFlags, AdvertisingPayload};
use crate::error::AdvertisingError;
use byteorder::{BigEndian, ByteOrder};
use rand::RngCore;
use std::fmt;
use std::str::FromStr;

/// Apple, Inc.
pub const IBEACON_COMPANY_ID: u16 = 0x004C;
pub const IBEACON_TYPE: u8 = 0x02;
/// Length of the beacon data following the type/length pair
pub const IBEACON_DATA_LEN: u8 = 21;

/// 128-bit proximity UUID, stored and transmitted in big-endian order
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProximityUuid {
    bytes: [u8; 16],
}

impl ProximityUuid {
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self { bytes }
    }

    /// Generates a random (Version 4) UUID
    pub fn new_random_v4() -> Self {
        let mut bytes = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut bytes);

        bytes[6] = (bytes[6] & 0x0F) | 0x40; // version 4
        bytes[8] = (bytes[8] & 0x3F) | 0x80; // variant 1 (RFC 4122)

        Self { bytes }
    }

    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.bytes
    }
}

impl fmt::Display for ProximityUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.bytes;
        write!(
            f,
            "{}-{}-{}-{}-{}",
            hex::encode(&b[0..4]),
            hex::encode(&b[4..6]),
            hex::encode(&b[6..8]),
            hex::encode(&b[8..10]),
            hex::encode(&b[10..16])
        )
    }
}

impl fmt::Debug for ProximityUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProximityUuid({})", self)
    }
}

impl FromStr for ProximityUuid {
    type Err = AdvertisingError;

    /// Accepts 32 hex digits, with or without hyphens
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned: String = s.chars().filter(|c| *c != '-').collect();
        if cleaned.len() != 32 {
            return Err(AdvertisingError::InvalidUuid(s.to_string()));
        }

        let mut bytes = [0u8; 16];
        hex::decode_to_slice(&cleaned, &mut bytes)
            .map_err(|_| AdvertisingError::InvalidUuid(s.to_string()))?;

        Ok(Self { bytes })
    }
}

/// iBeacon identity broadcast in the manufacturer specific AD structure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IBeacon {
    pub uuid: ProximityUuid,
    pub major: u16,
    pub minor: u16,
    /// Calibrated RSSI at 1 m, in dBm
    pub tx_power: i8,
    pub flags: AdFlags,
}

impl Default for IBeacon {
    fn default() -> Self {
        Self {
            uuid: ProximityUuid::from_bytes([
                0x11, 0x22, 0x33, 0x53, 0x32, 0x6C, 0x44, 0x23, 0xBB, 0x89, 0x65, 0x87, 0xAA, 0xEE,
                0xEE, 0x07,
            ]),
            major: 0x0020,
            minor: 0x2122,
            tx_power: -96,
            flags: AdFlags::BR_EDR_NOT_SUPPORTED,
        }
    }
}

impl IBeacon {
    /// Beacon type, length, UUID, major, minor and TX power (23 bytes)
    fn beacon_data(&self) -> [u8; 23] {
        let mut data = [0u8; 23];
        data[0] = IBEACON_TYPE;
        data[1] = IBEACON_DATA_LEN;
        data[2..18].copy_from_slice(self.uuid.as_bytes());
        BigEndian::write_u16(&mut data[18..20], self.major);
        BigEndian::write_u16(&mut data[20..22], self.minor);
        data[22] = self.tx_power as u8;
        data
    }

    /// Flags followed by the manufacturer specific iBeacon structure
    pub fn to_payload(&self) -> Result<AdvertisingPayload, AdvertisingError> {
        let mut payload = AdvertisingPayload::new();
        payload.push_flags(self.flags)?;
        payload.push_manufacturer_specific(IBEACON_COMPANY_ID, &self.beacon_data())?;
        Ok(payload)
    }
}
