//! UART log output.
//!
//! Renders binary frames as text lines and, with the `esp` feature, drives
//! a TX-only UART from a drain task.
//!
//! # Hardware Setup
//!
//! ```text
//! ESP32 GPIO6 (TX) ──────▶ USB-UART RX
//!                           └─▶ PC Serial Monitor
//! ```

use core::fmt::Write;

use crate::frame::Frame;
use crate::logging::TruncatingWriter;

#[cfg(feature = "esp")]
use crate::consumer::FrameConsumer;
#[cfg(feature = "esp")]
use crate::logger::Logger;
#[cfg(feature = "esp")]
use crate::port::Port;

#[cfg(feature = "esp")]
use esp_idf_svc::hal::gpio;
#[cfg(feature = "esp")]
use esp_idf_svc::hal::peripheral::Peripheral;
#[cfg(feature = "esp")]
use esp_idf_svc::hal::uart::{self, UartTxDriver};

/// Longest text prefix: `[` + u64 + `] #` + u32 + ` ` + `[Verbose]` + ` `.
pub const PREFIX_BUF_SIZE: usize = 48;

/// Scratch size for a lost-message report.
pub const REPORT_BUF_SIZE: usize = 64;

/// UART configuration for logging.
pub struct UartLoggerConfig {
    pub baud_rate: u32,
    pub tx_pin: u8,
}

impl Default for UartLoggerConfig {
    fn default() -> Self {
        Self {
            baud_rate: 115200,
            tx_pin: 6,
        }
    }
}

/// Render the text prefix of a frame: `[timestamp] #seq [Level] `.
///
/// Truncated to `buf`; a [`PREFIX_BUF_SIZE`] buffer always fits.
pub fn format_prefix(frame: &Frame<'_>, buf: &mut [u8]) -> usize {
    let mut writer = TruncatingWriter::new(buf);
    let label = frame.level().map_or("[?]", |level| level.label());

    let _ = write!(
        writer,
        "[{:10}] #{} {} ",
        frame.timestamp().as_u64(),
        frame.sequence(),
        label
    );
    writer.written()
}

/// Render a frame as text, handing `sink` the prefix and then the message.
///
/// The message (with its own newline) is passed through untouched, so
/// nothing past the line buffer limit is ever cut here.
pub fn render_frame(frame: &Frame<'_>, mut sink: impl FnMut(&[u8])) {
    let mut prefix = [0u8; PREFIX_BUF_SIZE];
    let len = format_prefix(frame, &mut prefix);
    sink(&prefix[..len]);
    sink(frame.message());
}

/// Render a lost-message report line.
pub fn format_dropped(count: u32, buf: &mut [u8]) -> usize {
    let mut writer = TruncatingWriter::new(buf);
    let _ = writeln!(writer, "[Warn] Dropped: {} log message(s)", count);
    writer.written()
}

/// Initialize a TX-only UART for logging output.
#[cfg(feature = "esp")]
pub fn init_uart_logger<'d>(
    uart: impl Peripheral<P = impl uart::Uart> + 'd,
    tx_pin: impl Peripheral<P = impl gpio::OutputPin> + 'd,
    config: &UartLoggerConfig,
) -> Result<UartTxDriver<'d>, esp_idf_svc::sys::EspError> {
    let uart_config = uart::config::Config::default()
        .baudrate(esp_idf_svc::hal::units::Hertz(config.baud_rate));

    UartTxDriver::new(
        uart,
        tx_pin,
        Option::<gpio::AnyIOPin>::None, // CTS
        Option::<gpio::AnyIOPin>::None, // RTS
        &uart_config,
    )
}

/// UART log consumer task.
///
/// Drains the logger's ring buffer, writes rendered frames to the UART and
/// reports sequence gaps every 10 seconds.
#[cfg(feature = "esp")]
pub fn uart_logger_task<P: Port, const LINE: usize, const RING: usize>(
    logger: &Logger<P, LINE, RING>,
    uart: &mut UartTxDriver<'_>,
) -> ! {
    let mut consumer = FrameConsumer::new(logger);
    let mut report_buf = [0u8; REPORT_BUF_SIZE];
    let mut last_dropped_report = 0i64;

    loop {
        let mut work_done = false;

        while let Ok(frame) = consumer.poll() {
            render_frame(&frame, |bytes| {
                let _ = uart.write(bytes);
            });
            work_done = true;
        }

        // SAFETY: esp_timer_get_time is always safe to call
        let now = unsafe { esp_idf_svc::sys::esp_timer_get_time() };
        if now - last_dropped_report > 10_000_000 {
            let dropped = consumer.take_dropped();
            if dropped > 0 {
                let len = format_dropped(dropped, &mut report_buf);
                let _ = uart.write(&report_buf[..len]);
            }
            last_dropped_report = now;
        }

        // If no work, wait before checking again
        if !work_done {
            unsafe {
                esp_idf_svc::sys::vTaskDelay(10);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LINE_BUF_SIZE;
    use crate::frame::{FrameHeader, Timestamp, HEADER_SIZE};
    use crate::level::LogLevel;

    fn encode(seq: u32, level: LogLevel, ts: u64, msg: &[u8], out: &mut [u8]) -> usize {
        FrameHeader::new(seq, level, Timestamp::from_u64(ts), msg.len() as u32).encode(out);
        out[HEADER_SIZE..HEADER_SIZE + msg.len()].copy_from_slice(msg);
        HEADER_SIZE + msg.len()
    }

    fn render(frame: &Frame<'_>) -> Vec<u8> {
        let mut out = Vec::new();
        render_frame(frame, |bytes| out.extend_from_slice(bytes));
        out
    }

    #[test]
    fn test_render_frame() {
        let mut raw = [0u8; 64];
        let len = encode(12, LogLevel::Info, 1234567, b"Hello world\n", &mut raw);
        let frame = Frame::parse(&raw[..len]).unwrap();

        let out = render(&frame);
        let formatted = core::str::from_utf8(&out).unwrap();
        assert_eq!(formatted, "[   1234567] #12 [Info] Hello world\n");
    }

    #[test]
    fn test_longest_prefix_fits() {
        let mut raw = [0u8; 64];
        let len = encode(u32::MAX, LogLevel::Verbose, u64::MAX, b"m\n", &mut raw);
        let frame = Frame::parse(&raw[..len]).unwrap();

        let mut buf = [0u8; PREFIX_BUF_SIZE];
        let len = format_prefix(&frame, &mut buf);
        let prefix = core::str::from_utf8(&buf[..len]).unwrap();
        assert!(len < PREFIX_BUF_SIZE);
        assert!(prefix.ends_with("#4294967295 [Verbose] "));
    }

    #[test]
    fn test_render_keeps_full_line_buffer_message() {
        let message: Vec<u8> = (0..LINE_BUF_SIZE - HEADER_SIZE - 1)
            .map(|i| b'a' + (i % 26) as u8)
            .chain(core::iter::once(b'\n'))
            .collect();
        let mut raw = vec![0u8; LINE_BUF_SIZE];
        let len = encode(3, LogLevel::Warn, 5, &message, &mut raw);
        let frame = Frame::parse(&raw[..len]).unwrap();

        let out = render(&frame);
        assert!(out.ends_with(&message));
        assert_eq!(out.last(), Some(&b'\n'));
    }

    #[test]
    fn test_prefix_truncated_to_buffer() {
        let mut raw = [0u8; 64];
        let len = encode(1, LogLevel::Error, 999, b"TEST\n", &mut raw);
        let frame = Frame::parse(&raw[..len]).unwrap();

        let mut buf = [0u8; 14];
        let len = format_prefix(&frame, &mut buf);
        assert_eq!(&buf[..len], b"[       999] #");
    }

    #[test]
    fn test_format_unknown_level() {
        let mut raw = [0u8; 64];
        let len = encode(1, LogLevel::Info, 0, b"m\n", &mut raw);
        raw[4] = 9; // level byte
        let frame = Frame::parse(&raw[..len]).unwrap();

        assert_eq!(frame.raw_level(), 9);
        let out = render(&frame);
        assert!(core::str::from_utf8(&out).unwrap().contains("[?]"));
    }

    #[test]
    fn test_format_dropped() {
        let mut buf = [0u8; 64];
        let len = format_dropped(3, &mut buf);
        assert_eq!(&buf[..len], b"[Warn] Dropped: 3 log message(s)\n");
    }
}
