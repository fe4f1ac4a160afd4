//! ESP-IDF port.
//!
//! - Lock: FreeRTOS binary semaphore. Task context blocks on take; ISR
//!   context uses the `FromISR` variants, which never block.
//! - Clock: `esp_timer_get_time()` (µs since boot).
//! - Output: UART driver installed by
//!   [`init_uart_logger`](crate::uart_logger::init_uart_logger); sync-mode
//!   frames are rendered to text before hitting the wire, raw output is
//!   written as is.

use core::ptr;
use core::sync::atomic::{AtomicPtr, Ordering};

use esp_idf_svc::sys;

use crate::error::PortError;
use crate::frame::{Frame, Timestamp};
use crate::port::Port;
use crate::uart_logger::render_frame;

const QUEUE_TYPE_BINARY_SEMAPHORE: u8 = 3;
const QUEUE_SEND_TO_BACK: sys::BaseType_t = 0;
const PORT_MAX_DELAY: sys::TickType_t = sys::TickType_t::MAX;
const PD_TRUE: sys::BaseType_t = 1;

/// Port backed by FreeRTOS and a UART.
pub struct EspPort {
    uart_num: sys::uart_port_t,
    sem: AtomicPtr<sys::QueueDefinition>,
}

impl EspPort {
    pub const fn new(uart_num: sys::uart_port_t) -> Self {
        Self {
            uart_num,
            sem: AtomicPtr::new(ptr::null_mut()),
        }
    }

    #[inline]
    fn handle(&self) -> sys::QueueHandle_t {
        self.sem.load(Ordering::Acquire)
    }

    fn write(&self, bytes: &[u8]) {
        // SAFETY: the UART driver is installed before the logger is started.
        unsafe {
            sys::uart_write_bytes(self.uart_num, bytes.as_ptr().cast(), bytes.len());
        }
    }
}

impl Port for EspPort {
    fn init(&self) -> Result<(), PortError> {
        if !self.handle().is_null() {
            return Ok(());
        }

        // SAFETY: plain FreeRTOS object creation.
        let sem = unsafe { sys::xQueueGenericCreate(1, 0, QUEUE_TYPE_BINARY_SEMAPHORE) };
        if sem.is_null() {
            return Err(PortError("semaphore allocation failed"));
        }
        // Binary semaphores are created empty; give once so it starts unlocked.
        // SAFETY: `sem` is a valid handle.
        unsafe {
            sys::xQueueGenericSend(sem, ptr::null(), 0, QUEUE_SEND_TO_BACK);
        }
        self.sem.store(sem, Ordering::Release);
        Ok(())
    }

    fn deinit(&self) {
        let sem = self.sem.swap(ptr::null_mut(), Ordering::AcqRel);
        if !sem.is_null() {
            // SAFETY: handle came from xQueueGenericCreate and is no longer shared.
            unsafe { sys::vQueueDelete(sem) };
        }
    }

    fn output(&self, frame: &[u8]) {
        if let Ok(frame) = Frame::parse(frame) {
            render_frame(&frame, |bytes| self.write(bytes));
        }
    }

    fn output_raw(&self, text: &[u8]) {
        self.write(text);
    }

    fn lock(&self) -> bool {
        let sem = self.handle();
        // SAFETY: non-null handle from init.
        !sem.is_null() && unsafe { sys::xQueueSemaphoreTake(sem, PORT_MAX_DELAY) } == PD_TRUE
    }

    fn unlock(&self) -> bool {
        let sem = self.handle();
        // SAFETY: non-null handle from init.
        !sem.is_null() && unsafe { sys::xQueueGenericSend(sem, ptr::null(), 0, QUEUE_SEND_TO_BACK) } == PD_TRUE
    }

    fn lock_isr(&self) -> bool {
        let sem = self.handle();
        let mut woken: sys::BaseType_t = 0;
        // SAFETY: non-null handle from init; FromISR variant never blocks.
        !sem.is_null() && unsafe { sys::xQueueReceiveFromISR(sem, ptr::null_mut(), &mut woken) } == PD_TRUE
    }

    fn unlock_isr(&self) -> bool {
        let sem = self.handle();
        let mut woken: sys::BaseType_t = 0;
        // SAFETY: non-null handle from init.
        !sem.is_null() && unsafe { sys::xQueueGiveFromISR(sem, &mut woken) } == PD_TRUE
    }

    fn now(&self) -> Timestamp {
        // SAFETY: esp_timer_get_time is always safe to call
        let us = unsafe { sys::esp_timer_get_time() };
        Timestamp::from_u64(us as u64)
    }
}
