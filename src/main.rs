//! rt-framelog demo for ESP-IDF targets.
//!
//! 1. Install the UART TX driver on GPIO6
//! 2. Initialize and start the global logger (async mode)
//! 3. Log from task context
//! 4. Become the drain task

#![no_std]
#![no_main]

use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::sys as esp_idf_sys;

use rt_framelog::log_globals::LOGGER;
use rt_framelog::uart_logger::{init_uart_logger, uart_logger_task, UartLoggerConfig};
use rt_framelog::{log_info, log_warn};

#[no_mangle]
fn main() {
    // Initialize ESP-IDF
    esp_idf_sys::link_patches();

    let Ok(peripherals) = Peripherals::take() else {
        return;
    };

    let config = UartLoggerConfig::default();
    let Ok(mut uart) = init_uart_logger(peripherals.uart1, peripherals.pins.gpio6, &config) else {
        return;
    };

    if LOGGER.init().is_err() {
        return;
    }
    LOGGER.start();

    log_info!(LOGGER, "main", "UART log on GPIO{} @ {} baud", config.tx_pin, config.baud_rate);
    if LOGGER.set_tag_level("wifi", rt_framelog::LogLevel::Warn).is_err() {
        log_warn!(LOGGER, "main", "tag level table full");
    }

    uart_logger_task(&LOGGER, &mut uart)
}
