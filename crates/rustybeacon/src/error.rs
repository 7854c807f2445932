//! Error types for the rustybeacon library
//!
//! This module defines the error types used throughout the library.

use thiserror::Error;

/// Errors that can occur when working with the HCI transport
#[derive(Error, Debug)]
pub enum HciError {
    #[error("Failed to open HCI socket: {0}")]
    SocketError(#[from] std::io::Error),

    #[error("Failed to bind to HCI device: {0}")]
    BindError(std::io::Error),

    #[error("Failed to send HCI command: {0}")]
    SendError(std::io::Error),

    #[error("Failed to receive HCI packet: {0}")]
    ReceiveError(std::io::Error),

    #[error("Command buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall { needed: usize, available: usize },
}

/// Errors that can occur when building advertising configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdvertisingError {
    #[error("Advertising data too large: need {needed} bytes, {remaining} remaining")]
    DataTooLarge { needed: usize, remaining: usize },

    #[error("Invalid proximity UUID: {0}")]
    InvalidUuid(String),

    #[error("Invalid device address: {0}")]
    InvalidAddress(String),
}

/// Crate level error
#[derive(Error, Debug)]
pub enum Error {
    #[error("HCI error: {0}")]
    Hci(#[from] HciError),

    #[error("Advertising error: {0}")]
    Advertising(#[from] AdvertisingError),
}
