//! # rt-framelog
//!
//! ISR-safe, allocation-free framed logging.
//!
//! ## Architecture
//!
//! ```text
//! producer ─▶ Filter ─▶ OutputGate.lock ─▶ build frame ─▶ AsyncRelay ─▶ unlock
//!                                           (line buffer)   │
//!                                                           ├─ sync:  Port::output
//!                                                           └─ async: FrameRing
//! consumer ─▶ Logger::drain ─▶ peek_header + pop ─▶ one whole frame
//! ```
//!
//! - No heap, no blocking in ISR context, no error from the emit path
//! - Under pressure the newest message is dropped; the sequence number
//!   it consumed leaves a gap consumers can count
//! - All platform effects go through the [`Port`] trait

#![cfg_attr(not(test), no_std)]

pub mod builder;
pub mod config;
pub mod consumer;
pub mod error;
pub mod filter;
pub mod frame;
pub mod gate;
pub mod level;
pub mod logger;
pub mod logging;
pub mod port;
pub mod relay;
pub mod ring;
pub mod uart_logger;

#[cfg(feature = "esp")]
pub mod log_globals;

pub use config::LoggerConfig;
pub use consumer::{FrameConsumer, SequenceTracker};
pub use error::{FrameError, LogError, PortError, RingError};
pub use filter::Filter;
pub use frame::{Frame, FrameHeader, Timestamp, HEADER_SIZE};
pub use gate::OutputGate;
pub use level::{LogLevel, LEVEL_ALL, LEVEL_SILENT};
pub use logger::Logger;
pub use logging::Location;
pub use port::Port;
pub use relay::AsyncRelay;
pub use ring::FrameRing;
