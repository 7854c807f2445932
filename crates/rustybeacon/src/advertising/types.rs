use crate::error::AdvertisingError;
use crate::hci::constants::BD_ADDR_LEN;
use bitflags::bitflags;
use std::fmt;
use std::str::FromStr;

// Address types
pub const PUBLIC_DEVICE_ADDRESS: u8 = 0x00;
pub const RANDOM_DEVICE_ADDRESS: u8 = 0x01;

// Advertising types
pub const ADV_IND: u8 = 0x00;
pub const ADV_DIRECT_IND_HIGH_DUTY: u8 = 0x01;
pub const ADV_SCAN_IND: u8 = 0x02;
pub const ADV_NONCONN_IND: u8 = 0x03;
pub const ADV_DIRECT_IND_LOW_DUTY: u8 = 0x04;

/// Advertising interval unit in microseconds (0.625 ms)
pub const ADV_INTERVAL_UNIT_US: u32 = 625;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressType {
    Public,
    Random,
}

impl From<u8> for AddressType {
    fn from(value: u8) -> Self {
        match value {
            RANDOM_DEVICE_ADDRESS => AddressType::Random,
            _ => AddressType::Public,
        }
    }
}

impl From<AddressType> for u8 {
    fn from(value: AddressType) -> Self {
        match value {
            AddressType::Public => PUBLIC_DEVICE_ADDRESS,
            AddressType::Random => RANDOM_DEVICE_ADDRESS,
        }
    }
}

/// Kind of advertising PDU the controller sends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvertisingType {
    /// Connectable undirected
    ConnectableUndirected,
    ConnectableDirectedHighDuty,
    ScannableUndirected,
    NonConnectableUndirected,
    ConnectableDirectedLowDuty,
}

impl From<AdvertisingType> for u8 {
    fn from(value: AdvertisingType) -> Self {
        match value {
            AdvertisingType::ConnectableUndirected => ADV_IND,
            AdvertisingType::ConnectableDirectedHighDuty => ADV_DIRECT_IND_HIGH_DUTY,
            AdvertisingType::ScannableUndirected => ADV_SCAN_IND,
            AdvertisingType::NonConnectableUndirected => ADV_NONCONN_IND,
            AdvertisingType::ConnectableDirectedLowDuty => ADV_DIRECT_IND_LOW_DUTY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterPolicy {
    /// Process scan and connection requests from all devices
    AllowAll,
    FilterScan,
    FilterConnect,
    FilterBoth,
}

impl From<FilterPolicy> for u8 {
    fn from(value: FilterPolicy) -> Self {
        match value {
            FilterPolicy::AllowAll => 0x00,
            FilterPolicy::FilterScan => 0x01,
            FilterPolicy::FilterConnect => 0x02,
            FilterPolicy::FilterBoth => 0x03,
        }
    }
}

bitflags! {
    /// Primary advertising channels the controller may use
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ChannelMap: u8 {
        const CHANNEL_37 = 0x01;
        const CHANNEL_38 = 0x02;
        const CHANNEL_39 = 0x04;
    }
}

impl Default for ChannelMap {
    fn default() -> Self {
        ChannelMap::all()
    }
}

/// Bluetooth device address
///
/// Bytes are kept in the order they are written (`bytes[0]` is the most
/// significant byte). The controller expects the reverse order on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BdAddr {
    pub bytes: [u8; BD_ADDR_LEN],
}

impl BdAddr {
    pub const fn new(bytes: [u8; BD_ADDR_LEN]) -> Self {
        Self { bytes }
    }

    /// Address bytes in controller (little-endian) order
    pub fn to_wire(&self) -> [u8; BD_ADDR_LEN] {
        let mut wire = self.bytes;
        wire.reverse();
        wire
    }
}

impl fmt::Display for BdAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            self.bytes[0],
            self.bytes[1],
            self.bytes[2],
            self.bytes[3],
            self.bytes[4],
            self.bytes[5]
        )
    }
}

impl FromStr for BdAddr {
    type Err = AdvertisingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned: String = s.chars().filter(|c| *c != ':' && *c != '-').collect();

        let mut bytes = [0u8; BD_ADDR_LEN];
        hex::decode_to_slice(&cleaned, &mut bytes)
            .map_err(|_| AdvertisingError::InvalidAddress(s.to_string()))?;

        Ok(BdAddr { bytes })
    }
}

/// Parameters of the LE Set Advertising Parameters command
///
/// Fields hold the raw values sent to the controller. The `with_*` helpers
/// take the typed forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvertisingParams {
    /// Minimum advertising interval in 0.625 ms units
    pub interval_min: u16,
    /// Maximum advertising interval in 0.625 ms units
    pub interval_max: u16,
    pub adv_type: u8,
    pub own_addr_type: u8,
    pub peer_addr_type: u8,
    pub peer_address: BdAddr,
    pub channel_map: u8,
    pub filter_policy: u8,
}

impl Default for AdvertisingParams {
    /// 160 ms connectable undirected advertising on all three channels
    fn default() -> Self {
        Self {
            interval_min: 256,
            interval_max: 256,
            adv_type: ADV_IND,
            own_addr_type: PUBLIC_DEVICE_ADDRESS,
            peer_addr_type: PUBLIC_DEVICE_ADDRESS,
            peer_address: BdAddr::new([0x80, 0x81, 0x82, 0x83, 0x84, 0x85]),
            channel_map: ChannelMap::all().bits(),
            filter_policy: FilterPolicy::AllowAll.into(),
        }
    }
}

impl AdvertisingParams {
    /// Sets both interval bounds to the same value
    pub fn with_interval(mut self, interval: u16) -> Self {
        self.interval_min = interval;
        self.interval_max = interval;
        self
    }

    pub fn with_interval_range(mut self, interval_min: u16, interval_max: u16) -> Self {
        self.interval_min = interval_min;
        self.interval_max = interval_max;
        self
    }

    pub fn with_advertising_type(mut self, adv_type: AdvertisingType) -> Self {
        self.adv_type = adv_type.into();
        self
    }

    pub fn with_own_address_type(mut self, address_type: AddressType) -> Self {
        self.own_addr_type = address_type.into();
        self
    }

    pub fn with_peer(mut self, address_type: AddressType, address: BdAddr) -> Self {
        self.peer_addr_type = address_type.into();
        self.peer_address = address;
        self
    }

    pub fn with_channel_map(mut self, channel_map: ChannelMap) -> Self {
        self.channel_map = channel_map.bits();
        self
    }

    pub fn with_filter_policy(mut self, filter_policy: FilterPolicy) -> Self {
        self.filter_policy = filter_policy.into();
        self
    }

    /// Minimum advertising interval in milliseconds
    pub fn interval_min_ms(&self) -> f32 {
        (self.interval_min as u32 * ADV_INTERVAL_UNIT_US) as f32 / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bd_addr_parse_and_display() {
        let addr: BdAddr = "80:81:82:83:84:85".parse().unwrap();
        assert_eq!(addr.bytes, [0x80, 0x81, 0x82, 0x83, 0x84, 0x85]);
        assert_eq!(addr.to_string(), "80:81:82:83:84:85");
        assert_eq!(addr.to_wire(), [0x85, 0x84, 0x83, 0x82, 0x81, 0x80]);

        assert!("80:81:82".parse::<BdAddr>().is_err());
        assert!("GG:81:82:83:84:85".parse::<BdAddr>().is_err());
    }

    #[test]
    fn test_default_params() {
        let params = AdvertisingParams::default();

        assert_eq!(params.interval_min_ms(), 160.0);
        assert_eq!(params.adv_type, ADV_IND);
        assert_eq!(
            ChannelMap::from_bits_truncate(params.channel_map),
            ChannelMap::CHANNEL_37 | ChannelMap::CHANNEL_38 | ChannelMap::CHANNEL_39
        );
        assert_eq!(AddressType::from(params.own_addr_type), AddressType::Public);
    }
}
