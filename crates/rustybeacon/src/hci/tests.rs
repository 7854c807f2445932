//! Unit tests for HCI command encoding

use super::constants::*;
use super::packet::*;
use crate::advertising::{AdvertisingParams, AdvertisingType, BdAddr, ChannelMap, FilterPolicy};
use crate::error::HciError;
use rand::Rng;

#[test]
fn test_reset_encoding() {
    assert_eq!(encode_reset(), vec![0x01, 0x03, 0x0C, 0x00]);

    let command = HciCommand::Reset;
    assert_eq!(command.opcode(), 0x0C03); // OGF_HOST_CTL << 10 | OCF_RESET
    assert_eq!(command.opcode_parts(), (OGF_HOST_CTL, OCF_RESET));
    assert_eq!(command.packet_len(), 4);
}

#[test]
fn test_advertising_enable_encoding() {
    let enable = encode_set_advertising_enable(true);
    assert_eq!(enable, vec![0x01, 0x0A, 0x20, 0x01, 0x01]);

    let disable = encode_set_advertising_enable(false);
    assert_eq!(disable.len(), 5);
    assert_eq!(disable[..4], enable[..4]);
    assert_eq!(disable[4], 0x00);
}

#[test]
fn test_advertising_params_encoding() {
    let params = AdvertisingParams::default();
    let packet = encode_set_advertising_params(&params);

    assert_eq!(packet.len(), 19);
    assert_eq!(packet[0], HCI_COMMAND_PKT);

    // Opcode: LE Set Advertising Parameters (0x0006)
    let opcode = u16::from_le_bytes([packet[1], packet[2]]);
    assert_eq!(opcode, 0x2006); // OGF_LE << 10 | OCF_LE_SET_ADVERTISING_PARAMETERS

    // Param length: 15
    assert_eq!(packet[3], 15);

    // Parameters
    assert_eq!(u16::from_le_bytes([packet[4], packet[5]]), 256); // interval_min
    assert_eq!(u16::from_le_bytes([packet[6], packet[7]]), 256); // interval_max
    assert_eq!(packet[8], 0x00); // adv_type
    assert_eq!(packet[9], 0x00); // own_addr_type
    assert_eq!(packet[10], 0x00); // peer_addr_type
    assert_eq!(&packet[11..17], &[0x85, 0x84, 0x83, 0x82, 0x81, 0x80]); // peer_address
    assert_eq!(packet[17], 0x07); // channel_map
    assert_eq!(packet[18], 0x00); // filter_policy
}

#[test]
fn test_advertising_params_typed_fields() {
    let params = AdvertisingParams::default()
        .with_interval_range(0x00A0, 0x00F0)
        .with_advertising_type(AdvertisingType::NonConnectableUndirected)
        .with_channel_map(ChannelMap::CHANNEL_37 | ChannelMap::CHANNEL_39)
        .with_filter_policy(FilterPolicy::FilterBoth);
    let packet = encode_set_advertising_params(&params);

    assert_eq!(&packet[4..8], &[0xA0, 0x00, 0xF0, 0x00]);
    assert_eq!(packet[8], 0x03);
    assert_eq!(packet[17], 0x05);
    assert_eq!(packet[18], 0x03);
}

#[test]
fn test_advertising_params_address_reversed_for_random_params() {
    let mut rng = rand::thread_rng();

    for _ in 0..64 {
        let address: [u8; 6] = rng.gen();
        let params = AdvertisingParams {
            interval_min: rng.gen(),
            interval_max: rng.gen(),
            adv_type: rng.gen(),
            own_addr_type: rng.gen(),
            peer_addr_type: rng.gen(),
            peer_address: BdAddr::new(address),
            channel_map: rng.gen(),
            filter_policy: rng.gen(),
        };
        let packet = encode_set_advertising_params(&params);

        assert_eq!(packet.len(), 19);
        assert_eq!(u16::from_le_bytes([packet[1], packet[2]]), 0x2006);

        // The 6 address bytes sit at 11..17, after the 4 byte header and
        // 7 bytes of interval/type parameters
        let mut reversed = address;
        reversed.reverse();
        assert_eq!(&packet[11..17], &reversed);
        assert_eq!(u16::from_le_bytes([packet[4], packet[5]]), params.interval_min);
        assert_eq!(packet[17], params.channel_map);
    }
}

#[test]
fn test_advertising_data_encoding() {
    let payload: Vec<u8> = (1..=30).collect();
    let packet = encode_set_advertising_data(&payload, 30);

    assert_eq!(packet.len(), 36);
    assert_eq!(&packet[..3], &[0x01, 0x08, 0x20]);
    // Parameter length is always the full field plus its length byte
    assert_eq!(packet[3], 0x20);
    assert_eq!(packet[4], 30);
    assert_eq!(&packet[5..35], payload.as_slice());
    assert_eq!(packet[35], 0);
}

#[test]
fn test_advertising_data_short_payload_is_zero_padded() {
    let packet = encode_set_advertising_data(&[0x02, 0x01, 0x06], 3);

    assert_eq!(packet.len(), 36);
    assert_eq!(packet[3], 0x20);
    assert_eq!(packet[4], 3);
    assert_eq!(&packet[5..8], &[0x02, 0x01, 0x06]);
    assert!(packet[8..].iter().all(|b| *b == 0));
}

#[test]
fn test_advertising_data_oversize_is_truncated() {
    let payload: Vec<u8> = (0..40).map(|i| i as u8 + 0x10).collect();
    let packet = encode_set_advertising_data(&payload, 40);

    assert_eq!(packet.len(), 36);
    assert_eq!(packet[3], 0x20);
    assert_eq!(packet[4], 31);
    assert_eq!(&packet[5..36], &payload[..31]);
}

#[test]
fn test_advertising_data_empty() {
    let expected_header = [0x01, 0x08, 0x20, 0x20];

    for packet in [
        encode_set_advertising_data(&[], 0),
        encode_set_advertising_data(&[], 10),
        encode_set_advertising_data(&[0xAA, 0xBB], 0),
    ] {
        assert_eq!(packet.len(), 36);
        assert_eq!(&packet[..4], &expected_header);
        assert!(packet[4..].iter().all(|b| *b == 0));
    }
}

#[test]
fn test_advertising_data_declared_longer_than_payload() {
    // Only bytes that exist are copied, the length byte keeps the declared value
    let packet = encode_set_advertising_data(&[0x02, 0x01, 0x06], 5);

    assert_eq!(packet[4], 5);
    assert_eq!(&packet[5..8], &[0x02, 0x01, 0x06]);
    assert!(packet[8..].iter().all(|b| *b == 0));
}

#[test]
fn test_write_packet_into_caller_buffer() {
    let mut buf = [0xEEu8; HCI_COMMAND_BUFFER_SIZE];

    let command = HciCommand::LeSetAdvertisingEnable { enable: true };
    let len = command.write_packet(&mut buf).unwrap();
    assert_eq!(len, 5);
    assert_eq!(&buf[..len], &[0x01, 0x0A, 0x20, 0x01, 0x01]);
    // Bytes past the packet are untouched
    assert_eq!(buf[len], 0xEE);

    let command = HciCommand::le_set_advertising_data(&[0x02, 0x01, 0x06], 3);
    let len = command.write_packet(&mut buf).unwrap();
    assert_eq!(len, 36);
    assert_eq!(buf[..len].to_vec(), command.to_packet());
}

#[test]
fn test_write_packet_buffer_too_small() {
    let mut buf = [0u8; 18];
    let command = HciCommand::LeSetAdvertisingParameters(AdvertisingParams::default());

    match command.write_packet(&mut buf) {
        Err(HciError::BufferTooSmall { needed, available }) => {
            assert_eq!(needed, 19);
            assert_eq!(available, 18);
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_opcode_constants() {
    assert_eq!(OPCODE_RESET, 0x0C03);
    assert_eq!(OPCODE_LE_SET_ADVERTISING_PARAMETERS, 0x2006);
    assert_eq!(OPCODE_LE_SET_ADVERTISING_DATA, 0x2008);
    assert_eq!(OPCODE_LE_SET_ADVERTISING_ENABLE, 0x200A);
}
