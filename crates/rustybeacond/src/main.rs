//! iBeacon advertising daemon
//!
//! Opens a raw HCI socket and runs the advertising sequencer on it forever.

use clap::Parser;
use log::{error, info};
use rustybeacon::{
    AdvertisingParams, AdvertisingSequencer, BeaconConfig, HciSocket, IBeacon, PacketCapture,
    ProximityUuid,
};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::process;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "rustybeacond")]
#[command(about = "Advertise an iBeacon through a Bluetooth HCI controller")]
struct Cli {
    /// HCI device index (0 for hci0)
    #[arg(short, long, default_value = "0")]
    device: u16,

    /// Delay between sequencer steps in milliseconds
    #[arg(long, default_value = "5000")]
    tick_ms: u64,

    /// Idle ticks after advertising is enabled, before the next reset
    #[arg(long, default_value = "4")]
    idle_ticks: u8,

    /// Advertising interval in 0.625 ms units
    #[arg(long, default_value = "256")]
    interval: u16,

    /// Proximity UUID
    #[arg(long, conflicts_with = "random_uuid")]
    uuid: Option<ProximityUuid>,

    /// Generate a random proximity UUID
    #[arg(long)]
    random_uuid: bool,

    #[arg(long)]
    major: Option<u16>,

    #[arg(long)]
    minor: Option<u16>,

    /// Calibrated RSSI at 1 m, in dBm
    #[arg(long, allow_hyphen_values = true)]
    tx_power: Option<i8>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

impl Cli {
    fn beacon_config(&self) -> BeaconConfig {
        let defaults = IBeacon::default();
        let uuid = match (self.uuid, self.random_uuid) {
            (Some(uuid), _) => uuid,
            (None, true) => ProximityUuid::new_random_v4(),
            (None, false) => defaults.uuid,
        };

        let beacon = IBeacon {
            uuid,
            major: self.major.unwrap_or(defaults.major),
            minor: self.minor.unwrap_or(defaults.minor),
            tx_power: self.tx_power.unwrap_or(defaults.tx_power),
            ..defaults
        };

        BeaconConfig::new()
            .with_tick_interval(Duration::from_millis(self.tick_ms))
            .with_idle_ticks(self.idle_ticks)
            .with_params(AdvertisingParams::default().with_interval(self.interval))
            .with_beacon(beacon)
    }
}

/// Opens hci`device`, logging the failure and its likely causes
fn open_socket(device: u16) -> Option<HciSocket> {
    match HciSocket::open(device) {
        Ok(socket) => Some(socket),
        Err(e) => {
            error!(
                "failed to open HCI socket for hci{}: {}. Check that a Bluetooth adapter \
                 is present and powered on, and that the process has CAP_NET_RAW",
                device, e
            );
            None
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    TermLogger::init(
        cli.log_level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    let config = cli.beacon_config();
    info!(
        "advertising iBeacon {} major {:#06x} minor {:#06x} every {} ms",
        config.beacon.uuid,
        config.beacon.major,
        config.beacon.minor,
        config.params.interval_min_ms()
    );

    let socket = match open_socket(cli.device) {
        Some(socket) => socket,
        None => process::exit(1),
    };

    let mut sequencer = AdvertisingSequencer::new(socket, config)?;
    sequencer.register_callbacks(Arc::new(PacketCapture::default()));
    sequencer.run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_build_beacon_config() {
        let cli = Cli::parse_from([
            "rustybeacond",
            "--tick-ms",
            "100",
            "--idle-ticks",
            "2",
            "--uuid",
            "e2c56db5-dffb-48d2-b060-d0f5a71096e0",
            "--major",
            "7",
            "--tx-power",
            "-59",
        ]);
        let config = cli.beacon_config();

        assert_eq!(config.tick_interval, Duration::from_millis(100));
        assert_eq!(config.idle_ticks, 2);
        assert_eq!(
            config.beacon.uuid.to_string(),
            "e2c56db5-dffb-48d2-b060-d0f5a71096e0"
        );
        assert_eq!(config.beacon.major, 7);
        assert_eq!(config.beacon.minor, IBeacon::default().minor);
        assert_eq!(config.beacon.tx_power, -59);
    }

    #[test]
    fn test_missing_adapter_is_reported_not_returned() {
        // hci65535 never exists, and raw Bluetooth sockets are absent in most sandboxes
        assert!(open_socket(u16::MAX).is_none());
    }
}
