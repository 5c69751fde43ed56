//! End-to-end executor tests: parallel producers feeding one drain thread.

use anyhow::Result as AnyResult;
use command_core::{CommandListExecutor, CoreConfig, SubmitBackend};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

/// A closed command list for tests: which producer recorded it, and its
/// per-producer sequence number.
#[derive(Debug, Clone, Copy)]
struct RecordedList {
    producer: usize,
    sequence: usize,
}

/// Backend that remembers every submission in arrival order.
#[derive(Default)]
struct RecordingBackend {
    submissions: Arc<Mutex<Vec<Vec<RecordedList>>>>,
}

impl RecordingBackend {
    fn submissions(&self) -> Arc<Mutex<Vec<Vec<RecordedList>>>> {
        Arc::clone(&self.submissions)
    }
}

impl SubmitBackend for RecordingBackend {
    type CommandList = RecordedList;

    fn submit_batch(&self, lists: Vec<RecordedList>) -> AnyResult<()> {
        self.submissions
            .lock()
            .expect("submission log poisoned")
            .push(lists);
        Ok(())
    }
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

const WAIT: Duration = Duration::from_secs(5);

#[test]
fn three_producers_times_five_lists_all_reach_the_queue() {
    init_logging();
    let backend = RecordingBackend::default();
    let submissions = backend.submissions();
    let executor =
        CommandListExecutor::spawn(backend, &CoreConfig::default()).expect("spawn executor");

    executor.reset_executed_count();
    thread::scope(|scope| {
        for producer in 0..3 {
            let queue = executor.queue();
            scope.spawn(move || {
                for sequence in 0..5 {
                    queue.push(RecordedList { producer, sequence });
                }
            });
        }
    });

    assert!(executor.wait_for_executed(15, WAIT));
    assert_eq!(executor.executed_count(), 15);

    let total: usize = submissions
        .lock()
        .expect("submission log poisoned")
        .iter()
        .map(Vec::len)
        .sum();
    assert_eq!(total, 15);
    executor.terminate();
}

#[test]
fn submission_preserves_per_producer_fifo_order() {
    init_logging();
    let backend = RecordingBackend::default();
    let submissions = backend.submissions();
    let executor =
        CommandListExecutor::spawn(backend, &CoreConfig::default()).expect("spawn executor");

    executor.reset_executed_count();
    thread::scope(|scope| {
        for producer in 0..4 {
            let queue = executor.queue();
            scope.spawn(move || {
                for sequence in 0..25 {
                    queue.push(RecordedList { producer, sequence });
                }
            });
        }
    });
    assert!(executor.wait_for_executed(100, WAIT));

    // Flatten batches back into arrival order; within each producer the
    // sequence numbers must be strictly increasing.
    let log = submissions.lock().expect("submission log poisoned");
    let mut last_seen = [None::<usize>; 4];
    for list in log.iter().flatten() {
        if let Some(previous) = last_seen[list.producer] {
            assert!(
                list.sequence > previous,
                "producer {} submitted {} after {}",
                list.producer,
                list.sequence,
                previous
            );
        }
        last_seen[list.producer] = Some(list.sequence);
    }
    executor.terminate();
}

#[test]
fn batches_never_exceed_the_configured_maximum() {
    init_logging();
    let backend = RecordingBackend::default();
    let submissions = backend.submissions();
    let config = CoreConfig {
        max_batch_size: 4,
        ..CoreConfig::default()
    };
    let executor = CommandListExecutor::spawn(backend, &config).expect("spawn executor");

    executor.reset_executed_count();
    let queue = executor.queue();
    for sequence in 0..40 {
        queue.push(RecordedList {
            producer: 0,
            sequence,
        });
    }
    assert!(executor.wait_for_executed(40, WAIT));

    let log = submissions.lock().expect("submission log poisoned");
    assert!(log.iter().all(|batch| batch.len() <= 4));
    assert_eq!(log.iter().map(Vec::len).sum::<usize>(), 40);
    executor.terminate();
}

#[test]
fn bounded_polling_observes_progress() {
    init_logging();
    let executor = CommandListExecutor::spawn(RecordingBackend::default(), &CoreConfig::default())
        .expect("spawn executor");

    executor.reset_executed_count();
    let queue = executor.queue();
    for sequence in 0..6 {
        queue.push(RecordedList {
            producer: 0,
            sequence,
        });
    }

    // The polling contract: a bounded spin loop eventually observes the
    // full count while the executor is running.
    let deadline = Instant::now() + WAIT;
    while executor.executed_count() < 6 {
        assert!(Instant::now() < deadline, "executor made no progress");
        thread::yield_now();
    }
    executor.terminate();
}

#[test]
fn reset_starts_a_fresh_orchestrated_unit() {
    init_logging();
    let executor = CommandListExecutor::spawn(RecordingBackend::default(), &CoreConfig::default())
        .expect("spawn executor");
    let queue = executor.queue();

    executor.reset_executed_count();
    for sequence in 0..3 {
        queue.push(RecordedList {
            producer: 0,
            sequence,
        });
    }
    assert!(executor.wait_for_executed(3, WAIT));

    executor.reset_executed_count();
    assert_eq!(executor.executed_count(), 0);
    for sequence in 0..2 {
        queue.push(RecordedList {
            producer: 1,
            sequence,
        });
    }
    assert!(executor.wait_for_executed(2, WAIT));
    executor.terminate();
}

#[test]
fn wait_times_out_when_no_work_arrives() {
    init_logging();
    let executor = CommandListExecutor::spawn(RecordingBackend::default(), &CoreConfig::default())
        .expect("spawn executor");
    executor.reset_executed_count();
    assert!(!executor.wait_for_executed(1, Duration::from_millis(50)));
    executor.terminate();
}

#[test]
fn push_after_terminate_is_dropped_silently() {
    init_logging();
    let executor = CommandListExecutor::spawn(RecordingBackend::default(), &CoreConfig::default())
        .expect("spawn executor");
    let queue = executor.queue();
    executor.terminate();
    queue.push(RecordedList {
        producer: 0,
        sequence: 0,
    });
}
