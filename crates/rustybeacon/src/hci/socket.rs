//! HCI Socket transport for Linux
//!
//! This module wraps the raw HCI socket interface and exposes it as a
//! [`TransportGateway`], so the sequencer can drive a real controller.

use crate::error::HciError;
use crate::hci::constants::HCI_EVENT_PKT;
use crate::hci::transport::{HostCallbacks, TransportGateway, RECEIVE_ACCEPTED};
use log::{debug, trace, warn};
use std::io::ErrorKind;
use std::os::unix::io::{AsRawFd, RawFd};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

// Bluetooth socket constants
const AF_BLUETOOTH: i32 = 31;
const BTPROTO_HCI: i32 = 1;
const HCI_CHANNEL_RAW: i32 = 0;
const SOL_HCI: i32 = 0;
const HCI_FILTER: i32 = 2;

/// Largest H4 packet the reader accepts (event header + 255 parameters)
const MAX_INBOUND_PACKET: usize = 258;

/// How often the reader thread checks whether it should stop
const READER_POLL_INTERVAL: Duration = Duration::from_millis(500);

// Define the sockaddr_hci structure
#[repr(C)]
struct SockaddrHci {
    hci_family: libc::sa_family_t,
    hci_dev: u16,
    hci_channel: u16,
}

// Define the hci_filter structure
#[repr(C)]
struct HciFilter {
    type_mask: u32,
    event_mask: [u32; 2],
    opcode: u16,
}

/// Owned file descriptor closed on drop
#[derive(Debug)]
struct Fd(RawFd);

impl Drop for Fd {
    fn drop(&mut self) {
        unsafe {
            libc::close(self.0);
        }
    }
}

/// Represents an HCI socket
#[derive(Debug)]
pub struct HciSocket {
    fd: Fd,
    stop: Arc<AtomicBool>,
    reader: Option<JoinHandle<()>>,
}

impl HciSocket {
    /// Opens a new HCI socket
    ///
    /// # Arguments
    ///
    /// * `dev_id` - The device ID to open (0 for the first device)
    ///
    /// # Returns
    ///
    /// A new `HciSocket` instance or an error if the socket could not be opened
    pub fn open(dev_id: u16) -> Result<Self, HciError> {
        // Open a raw HCI socket
        let fd = unsafe { libc::socket(AF_BLUETOOTH, libc::SOCK_RAW, BTPROTO_HCI) };

        if fd < 0 {
            return Err(HciError::SocketError(std::io::Error::last_os_error()));
        }
        let fd = Fd(fd);

        // Bind to the specified device
        let addr = SockaddrHci {
            hci_family: AF_BLUETOOTH as libc::sa_family_t,
            hci_dev: dev_id,
            hci_channel: HCI_CHANNEL_RAW as u16,
        };

        let result = unsafe {
            libc::bind(
                fd.0,
                &addr as *const _ as *const libc::sockaddr,
                std::mem::size_of::<SockaddrHci>() as libc::socklen_t,
            )
        };

        if result < 0 {
            return Err(HciError::BindError(std::io::Error::last_os_error()));
        }

        // Let every event through to the receive path
        let filter = HciFilter {
            type_mask: 1 << HCI_EVENT_PKT,
            event_mask: [u32::MAX, u32::MAX],
            opcode: 0,
        };

        let result = unsafe {
            libc::setsockopt(
                fd.0,
                SOL_HCI,
                HCI_FILTER,
                &filter as *const _ as *const libc::c_void,
                std::mem::size_of::<HciFilter>() as libc::socklen_t,
            )
        };

        if result < 0 {
            return Err(HciError::SocketError(std::io::Error::last_os_error()));
        }

        debug!("opened HCI socket for hci{}", dev_id);

        Ok(HciSocket {
            fd,
            stop: Arc::new(AtomicBool::new(false)),
            reader: None,
        })
    }

    /// Sends an encoded command to the controller
    pub fn send_packet(&self, packet: &[u8]) -> Result<(), HciError> {
        match unsafe {
            libc::write(
                self.fd.0,
                packet.as_ptr() as *const libc::c_void,
                packet.len(),
            )
        } {
            -1 => Err(HciError::SendError(std::io::Error::last_os_error())),
            _ => Ok(()),
        }
    }

    /// Waits until the socket is ready for `events`, zero timeout polls
    fn poll(fd: RawFd, events: libc::c_short, timeout: Duration) -> Result<bool, HciError> {
        let mut pfd = libc::pollfd {
            fd,
            events,
            revents: 0,
        };

        let result = unsafe { libc::poll(&mut pfd, 1, timeout.as_millis() as libc::c_int) };

        if result < 0 {
            let err = std::io::Error::last_os_error();
            if err.kind() == ErrorKind::Interrupted {
                return Ok(false);
            }
            return Err(HciError::ReceiveError(err));
        }

        Ok(result > 0 && pfd.revents & events != 0)
    }

    /// Read one raw packet, `None` when nothing arrived within `timeout`
    fn read_packet_timeout(fd: RawFd, timeout: Duration) -> Result<Option<Vec<u8>>, HciError> {
        if !Self::poll(fd, libc::POLLIN, timeout)? {
            return Ok(None);
        }

        let mut buffer = [0u8; MAX_INBOUND_PACKET];
        let bytes_read = unsafe {
            libc::read(
                fd,
                buffer.as_mut_ptr() as *mut libc::c_void,
                buffer.len(),
            )
        };

        if bytes_read < 0 {
            let err = std::io::Error::last_os_error();
            if err.kind() == ErrorKind::Interrupted {
                return Ok(None);
            }
            return Err(HciError::ReceiveError(err));
        }

        Ok(Some(buffer[..bytes_read as usize].to_vec()))
    }

    fn spawn_reader(&mut self, callbacks: Arc<dyn HostCallbacks>) -> Result<(), HciError> {
        let fd = unsafe { libc::dup(self.fd.0) };
        if fd < 0 {
            return Err(HciError::SocketError(std::io::Error::last_os_error()));
        }
        let fd = Fd(fd);
        let stop = Arc::clone(&self.stop);

        let handle = thread::Builder::new()
            .name("hci-reader".into())
            .spawn(move || reader_loop(fd, stop, callbacks))?;

        self.reader = Some(handle);
        Ok(())
    }
}

/// Forwards inbound packets on `fd` to `callbacks` until `stop` is set
fn reader_loop(fd: Fd, stop: Arc<AtomicBool>, callbacks: Arc<dyn HostCallbacks>) {
    while !stop.load(Ordering::Acquire) {
        match HciSocket::read_packet_timeout(fd.0, READER_POLL_INTERVAL) {
            Ok(Some(packet)) if packet.is_empty() => {
                debug!("HCI transport closed");
                break;
            }
            Ok(Some(packet)) => {
                let status = callbacks.packet_received(&packet);
                if status != RECEIVE_ACCEPTED {
                    trace!("host rejected inbound packet, status {}", status);
                }
            }
            Ok(None) => {}
            Err(e) => {
                warn!("HCI reader stopped: {}", e);
                break;
            }
        }
    }
}

impl TransportGateway for HciSocket {
    fn register_callbacks(&mut self, callbacks: Arc<dyn HostCallbacks>) {
        if self.reader.is_some() {
            warn!("HCI callbacks already registered");
            return;
        }

        if let Err(e) = self.spawn_reader(Arc::clone(&callbacks)) {
            warn!("failed to start HCI reader: {}", e);
        }

        if self.can_send() {
            callbacks.controller_ready();
        }
    }

    fn can_send(&self) -> bool {
        match Self::poll(self.fd.0, libc::POLLOUT, Duration::ZERO) {
            Ok(ready) => ready,
            Err(e) => {
                debug!("HCI socket poll failed: {}", e);
                false
            }
        }
    }

    fn send(&mut self, packet: &[u8]) {
        if let Err(e) = self.send_packet(packet) {
            warn!("{}", e);
        }
    }
}

impl AsRawFd for HciSocket {
    fn as_raw_fd(&self) -> RawFd {
        self.fd.0
    }
}

impl Drop for HciSocket {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(reader) = self.reader.take() {
            let _ = reader.join();
        }
    }
}
