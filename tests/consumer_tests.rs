//! Consumer side: gap accounting and concurrent producers.

mod common;

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use common::{async_logger, drain_all, TestLogger};
use rt_framelog::{log_info, log_isr, FrameConsumer, LogError, LogLevel, LoggerConfig};

const PRODUCERS: u32 = 4;
const PER_PRODUCER: u32 = 200;

#[test]
fn test_consumer_reports_empty_ring() {
    let logger = async_logger(LoggerConfig::DEFAULT);
    let mut consumer = FrameConsumer::new(&logger);

    assert!(matches!(consumer.poll(), Err(LogError::NoLogAvailable)));
    assert_eq!(consumer.tracker().received(), 0);
}

#[test]
fn test_consumer_counts_lock_failure_gap() {
    let logger = async_logger(LoggerConfig::DEFAULT);
    let mut consumer = FrameConsumer::new(&logger);

    log_info!(logger, "sys", "a");
    logger.port().fail_next_locks(2);
    log_info!(logger, "sys", "lost");
    log_isr!(logger, LogLevel::Warn, "irq", "lost too");
    log_info!(logger, "sys", "b");

    let first = consumer.poll().map(|f| f.message().to_vec()).unwrap();
    let second = consumer.poll().map(|f| f.message().to_vec()).unwrap();
    assert_eq!(first, b"a\n");
    assert_eq!(second, b"b\n");

    assert_eq!(consumer.dropped(), 2);
    assert_eq!(consumer.take_dropped(), 2);
    assert_eq!(consumer.dropped(), 0);
    assert_eq!(consumer.tracker().received(), 2);
}

#[test]
fn test_concurrent_producers_no_loss_with_room() {
    let logger: TestLogger = async_logger(LoggerConfig::DEFAULT);
    let done = AtomicBool::new(false);

    let received = thread::scope(|s| {
        let consumer = s.spawn(|| {
            let mut consumer = FrameConsumer::new(&logger);
            let mut seqs = Vec::new();
            loop {
                let finished = done.load(Ordering::Acquire);
                while let Ok(frame) = consumer.poll() {
                    seqs.push(frame.sequence());
                }
                if finished {
                    break;
                }
                thread::yield_now();
            }
            (seqs, consumer.dropped())
        });

        let producers: Vec<_> = (0..PRODUCERS)
            .map(|id| {
                let logger = &logger;
                s.spawn(move || {
                    for i in 0..PER_PRODUCER {
                        log_info!(logger, "load", "p{} #{}", id, i);
                        // Keep the small ring from overflowing
                        while logger.buffered() > 256 {
                            thread::yield_now();
                        }
                    }
                })
            })
            .collect();

        for producer in producers {
            producer.join().unwrap();
        }
        done.store(true, Ordering::Release);
        consumer.join().unwrap()
    });

    let (seqs, dropped) = received;
    assert!(seqs.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(logger.next_sequence(), PRODUCERS * PER_PRODUCER);
    // Any message shed by a full ring shows up as a gap
    assert_eq!(seqs.len() as u32 + dropped, PRODUCERS * PER_PRODUCER);
    assert!(!logger.port().is_held());
}

#[test]
fn test_concurrent_producers_gaps_match_drops() {
    let logger: TestLogger = async_logger(LoggerConfig::DEFAULT);

    thread::scope(|s| {
        for id in 0..PRODUCERS {
            let logger = &logger;
            s.spawn(move || {
                for i in 0..PER_PRODUCER {
                    if i % 17 == 0 {
                        logger.port().fail_next_locks(1);
                    }
                    log_info!(logger, "load", "p{} #{}", id, i);
                }
            });
        }
    });

    // Ring overflowed long ago; whatever survived is strictly ordered and
    // every missing number between survivors is accounted for.
    let frames = drain_all(&logger);
    assert!(!frames.is_empty());
    assert!(frames.windows(2).all(|w| w[0].sequence < w[1].sequence));

    let mut tracker = rt_framelog::SequenceTracker::new();
    for frame in &frames {
        tracker.observe(frame.sequence);
    }
    let first = frames[0].sequence;
    let last = frames[frames.len() - 1].sequence;
    assert_eq!(tracker.dropped(), last - first + 1 - frames.len() as u32);
    assert_eq!(logger.next_sequence(), PRODUCERS * PER_PRODUCER);
}
