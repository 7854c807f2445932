//! Transport gateway interface
//!
//! The sequencer only talks to the controller through [`TransportGateway`].
//! Inbound traffic comes back through [`HostCallbacks`], which the gateway may
//! invoke from its own thread.

use log::{info, trace, warn};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Status returned to the transport when an inbound packet was taken
pub const RECEIVE_ACCEPTED: i32 = 0;

/// Default number of inbound packets kept by [`PacketCapture`]
pub const DEFAULT_CAPTURE_CAPACITY: usize = 32;

/// Host side notifications delivered by the transport
pub trait HostCallbacks: Send + Sync {
    /// The controller can accept commands
    fn controller_ready(&self);

    /// Raw bytes arrived from the controller. Returns a status code,
    /// [`RECEIVE_ACCEPTED`] when the packet was taken.
    fn packet_received(&self, data: &[u8]) -> i32;
}

/// Byte pipe to the controller
pub trait TransportGateway {
    /// Called once at startup
    fn register_callbacks(&mut self, callbacks: Arc<dyn HostCallbacks>);

    /// Non-blocking check that a send would currently succeed
    fn can_send(&self) -> bool;

    /// Hands a fully encoded command to the transport
    fn send(&mut self, packet: &[u8]);
}

/// Records controller readiness and keeps the most recent inbound packets
#[derive(Debug)]
pub struct PacketCapture {
    ready: AtomicBool,
    capacity: usize,
    packets: Mutex<VecDeque<Vec<u8>>>,
}

impl Default for PacketCapture {
    fn default() -> Self {
        Self::new(DEFAULT_CAPTURE_CAPACITY)
    }
}

impl PacketCapture {
    pub fn new(capacity: usize) -> Self {
        Self {
            ready: AtomicBool::new(false),
            capacity: capacity.max(1),
            packets: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    fn packets(&self) -> MutexGuard<'_, VecDeque<Vec<u8>>> {
        self.packets.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether the controller has signalled it can accept commands
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Removes and returns every captured packet, oldest first
    pub fn drain(&self) -> Vec<Vec<u8>> {
        self.packets().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.packets().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl HostCallbacks for PacketCapture {
    fn controller_ready(&self) {
        info!("controller ready to receive commands");
        self.ready.store(true, Ordering::Release);
    }

    fn packet_received(&self, data: &[u8]) -> i32 {
        trace!("host received packet: {}", hex::encode(data));

        let mut packets = self.packets();
        if packets.len() == self.capacity {
            warn!("inbound capture full, dropping oldest packet");
            packets.pop_front();
        }
        packets.push_back(data.to_vec());

        RECEIVE_ACCEPTED
    }
}
