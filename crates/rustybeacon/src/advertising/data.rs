//! Advertising data (AD structures)

use crate::error::AdvertisingError;
use crate::hci::constants::ADVERTISING_DATA_MAX_LEN;
use bitflags::bitflags;

// Advertising Data Types
pub const AD_TYPE_FLAGS: u8 = 0x01;
pub const AD_TYPE_COMPLETE_LOCAL_NAME: u8 = 0x09;
pub const AD_TYPE_MANUFACTURER_SPECIFIC: u8 = 0xFF;

bitflags! {
    /// Contents of the Flags AD structure
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct AdFlags: u8 {
        const LE_LIMITED_DISCOVERABLE = 0x01;
        const LE_GENERAL_DISCOVERABLE = 0x02;
        const BR_EDR_NOT_SUPPORTED = 0x04;
        const SIMULTANEOUS_LE_BR_EDR_CONTROLLER = 0x08;
        const SIMULTANEOUS_LE_BR_EDR_HOST = 0x10;
    }
}

/// An advertising payload of at most 31 bytes
///
/// Each pushed AD structure is written as `[length][type][data...]` where
/// `length` counts the type byte and the data.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AdvertisingPayload {
    bytes: Vec<u8>,
}

impl AdvertisingPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one AD structure
    ///
    /// # Errors
    ///
    /// `DataTooLarge` if the structure does not fit in the remaining space.
    /// The payload is left unchanged in that case.
    pub fn push(&mut self, ad_type: u8, data: &[u8]) -> Result<&mut Self, AdvertisingError> {
        let needed = data.len() + 2;
        let remaining = self.remaining_space();
        if needed > remaining {
            return Err(AdvertisingError::DataTooLarge { needed, remaining });
        }

        self.bytes.push((data.len() + 1) as u8);
        self.bytes.push(ad_type);
        self.bytes.extend_from_slice(data);
        Ok(self)
    }

    pub fn push_flags(&mut self, flags: AdFlags) -> Result<&mut Self, AdvertisingError> {
        self.push(AD_TYPE_FLAGS, &[flags.bits()])
    }

    /// Manufacturer specific data, prefixed by the little-endian company id
    pub fn push_manufacturer_specific(
        &mut self,
        company_id: u16,
        data: &[u8],
    ) -> Result<&mut Self, AdvertisingError> {
        let mut content = Vec::with_capacity(data.len() + 2);
        content.extend_from_slice(&company_id.to_le_bytes());
        content.extend_from_slice(data);
        self.push(AD_TYPE_MANUFACTURER_SPECIFIC, &content)
    }

    pub fn remaining_space(&self) -> usize {
        ADVERTISING_DATA_MAX_LEN - self.bytes.len()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Splits advertising data into `(type, data)` pairs
///
/// Parsing stops at a zero length byte or a structure running past the end.
pub fn parse_ad_structures(data: &[u8]) -> Vec<(u8, Vec<u8>)> {
    let mut result = Vec::new();
    let mut i = 0;

    while i < data.len() {
        let length = data[i] as usize;
        if length == 0 || i + 1 + length > data.len() {
            break;
        }

        let ad_type = data[i + 1];
        let ad_data = data[i + 2..i + 1 + length].to_vec();

        result.push((ad_type, ad_data));

        i += 1 + length;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_flags() {
        let mut payload = AdvertisingPayload::new();
        payload.push_flags(AdFlags::BR_EDR_NOT_SUPPORTED).unwrap();

        assert_eq!(payload.as_bytes(), &[0x02, 0x01, 0x04]);
        assert_eq!(payload.remaining_space(), 28);
    }

    #[test]
    fn test_manufacturer_specific_company_id_is_little_endian() {
        let mut payload = AdvertisingPayload::new();
        payload
            .push_manufacturer_specific(0x004C, &[0x02, 0x15])
            .unwrap();

        assert_eq!(payload.as_bytes(), &[0x05, 0xFF, 0x4C, 0x00, 0x02, 0x15]);
    }

    #[test]
    fn test_push_rejects_oversize_structure() {
        let mut payload = AdvertisingPayload::new();
        payload.push_flags(AdFlags::BR_EDR_NOT_SUPPORTED).unwrap();

        let result = payload.push(AD_TYPE_COMPLETE_LOCAL_NAME, &[b'x'; 27]);
        assert_eq!(
            result.unwrap_err(),
            AdvertisingError::DataTooLarge {
                needed: 29,
                remaining: 28
            }
        );
        // Nothing was written
        assert_eq!(payload.len(), 3);

        // Exactly filling the payload is fine
        payload.push(AD_TYPE_COMPLETE_LOCAL_NAME, &[b'x'; 26]).unwrap();
        assert_eq!(payload.len(), ADVERTISING_DATA_MAX_LEN);
        assert_eq!(payload.remaining_space(), 0);
    }

    #[test]
    fn test_parse_ad_structures() {
        let data = [0x02, 0x01, 0x06, 0x03, 0x09, b'h', b'i'];
        let parsed = parse_ad_structures(&data);

        assert_eq!(
            parsed,
            vec![(AD_TYPE_FLAGS, vec![0x06]), (AD_TYPE_COMPLETE_LOCAL_NAME, b"hi".to_vec())]
        );

        // Zero padding terminates parsing
        let mut padded = data.to_vec();
        padded.resize(ADVERTISING_DATA_MAX_LEN, 0);
        assert_eq!(parse_ad_structures(&padded).len(), 2);

        // Truncated structure is dropped
        assert!(parse_ad_structures(&[0x05, 0xFF, 0x4C]).is_empty());
    }
}
