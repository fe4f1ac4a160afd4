//! Global logger instance for the ESP-IDF build.
//!
//! Tasks and interrupt handlers share this one logger; the UART drain task
//! is its single consumer.

use esp_idf_svc::sys;

use crate::config::LoggerConfig;
use crate::logger::Logger;
use crate::port::EspPort;

/// UART used for log output.
pub const LOG_UART: sys::uart_port_t = 1;

/// System logger.
pub static LOGGER: Logger<EspPort> = Logger::new(EspPort::new(LOG_UART), LoggerConfig::DEFAULT);
