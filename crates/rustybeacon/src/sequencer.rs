//! Advertising sequencer
//!
//! Brings up advertising one command per tick:
//! reset, advertising parameters, advertising data, enable. The sequencer then
//! idles for a configured number of ticks and starts over, so advertising is
//! re-armed periodically. A tick on which the transport cannot accept a packet
//! sends nothing and the same step is retried on the next tick.

use crate::advertising::AdvertisingPayload;
use crate::config::BeaconConfig;
use crate::error::Error;
use crate::hci::constants::HCI_COMMAND_BUFFER_SIZE;
use crate::hci::packet::HciCommand;
use crate::hci::transport::{HostCallbacks, TransportGateway};
use log::{debug, info, trace, warn};
use std::sync::Arc;
use std::thread;

/// Position in the advertising cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerState {
    Reset,
    SetParams,
    SetData,
    EnableAdv,
    /// Idle tick `n`, counting from zero
    Idle(u8),
}

impl SequencerState {
    /// The state following this one in a cycle with `idle_ticks` idle steps
    pub fn next(self, idle_ticks: u8) -> Self {
        match self {
            Self::Reset => Self::SetParams,
            Self::SetParams => Self::SetData,
            Self::SetData => Self::EnableAdv,
            Self::EnableAdv if idle_ticks == 0 => Self::Reset,
            Self::EnableAdv => Self::Idle(0),
            Self::Idle(n) if n.saturating_add(1) < idle_ticks => Self::Idle(n + 1),
            Self::Idle(_) => Self::Reset,
        }
    }
}

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A command with this opcode was handed to the transport
    Sent(u16),
    /// Idle step, nothing to send
    Idle,
    /// The transport could not accept a packet; the state did not advance
    Deferred,
}

pub struct AdvertisingSequencer<T: TransportGateway> {
    transport: T,
    config: BeaconConfig,
    payload: AdvertisingPayload,
    state: SequencerState,
    buffer: [u8; HCI_COMMAND_BUFFER_SIZE],
}

impl<T: TransportGateway> AdvertisingSequencer<T> {
    /// Creates a sequencer in the `Reset` state
    ///
    /// Fails if the configured beacon does not fit in the advertising data.
    pub fn new(transport: T, config: BeaconConfig) -> Result<Self, Error> {
        let payload = config.advertising_payload()?;
        debug!(
            "iBeacon adv_data [{}]={}",
            payload.len(),
            hex::encode(payload.as_bytes())
        );

        Ok(Self {
            transport,
            config,
            payload,
            state: SequencerState::Reset,
            buffer: [0u8; HCI_COMMAND_BUFFER_SIZE],
        })
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub fn config(&self) -> &BeaconConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Registers the host callbacks with the transport
    pub fn register_callbacks(&mut self, callbacks: Arc<dyn HostCallbacks>) {
        self.transport.register_callbacks(callbacks);
    }

    /// The command sent in `state`, if any
    fn command_for(&self, state: SequencerState) -> Option<HciCommand> {
        match state {
            SequencerState::Reset => Some(HciCommand::Reset),
            SequencerState::SetParams => {
                Some(HciCommand::LeSetAdvertisingParameters(self.config.params))
            }
            SequencerState::SetData => Some(HciCommand::le_set_advertising_data(
                self.payload.as_bytes(),
                self.payload.len() as u8,
            )),
            SequencerState::EnableAdv => Some(HciCommand::LeSetAdvertisingEnable { enable: true }),
            SequencerState::Idle(_) => None,
        }
    }

    fn send(&mut self, command: &HciCommand) {
        match command.write_packet(&mut self.buffer) {
            Ok(len) => {
                let packet = &self.buffer[..len];
                trace!("sending {:#06x}: {}", command.opcode(), hex::encode(packet));
                self.transport.send(packet);
            }
            Err(e) => warn!("dropping command {:#06x}: {}", command.opcode(), e),
        }
    }

    /// Performs one step of the cycle without sleeping
    pub fn tick_once(&mut self) -> TickOutcome {
        let send_avail = self.transport.can_send();

        let outcome = if send_avail {
            let outcome = match self.command_for(self.state) {
                Some(command) => {
                    self.send(&command);
                    if let HciCommand::LeSetAdvertisingEnable { enable: true } = command {
                        info!("advertising enabled");
                    }
                    TickOutcome::Sent(command.opcode())
                }
                None => TickOutcome::Idle,
            };
            self.state = self.state.next(self.config.idle_ticks);
            outcome
        } else {
            TickOutcome::Deferred
        };

        debug!(
            "BLE advertise, send available: {}, next state: {:?}",
            send_avail, self.state
        );
        outcome
    }

    /// Runs the cycle forever, sleeping the tick interval before every step
    pub fn run(&mut self) -> ! {
        info!(
            "BLE advertising sequencer started, tick {:?}",
            self.config.tick_interval
        );
        loop {
            thread::sleep(self.config.tick_interval);
            self.tick_once();
        }
    }
}
