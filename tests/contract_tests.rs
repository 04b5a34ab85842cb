//! Contract violations and diagnostics
//!
//! Every failed call must report the right error and leave the queue
//! untouched; trace dumps must reach an installed subscriber.

use monotone_heaps::fib_radix::FibRadixHeap;
use monotone_heaps::kary_radix::KaryRadixHeap;
use monotone_heaps::radix::RadixHeap;
use monotone_heaps::{KeyOverflow, MonotoneQueue, QueueError, QueueParams};
use std::io;
use std::sync::{Arc, Mutex};

fn violations<Q: MonotoneQueue>(params: QueueParams) {
    let mut queue = Q::with_params(params).unwrap();
    assert_eq!(queue.delete_min(), Err(QueueError::Empty));

    queue.insert(0, 10).unwrap();
    queue.insert(1, 12).unwrap();
    let before = queue.dump();

    let errors = [
        queue.insert(0, 11).unwrap_err(),
        queue.insert(7, 1).unwrap_err(),
        queue.decrease(2, 1).unwrap_err(),
        queue.decrease(0, 10).unwrap_err(),
        queue.decrease(0, 15).unwrap_err(),
    ];
    assert_eq!(errors[0], QueueError::DuplicateLabel(0));
    assert_eq!(
        errors[1],
        QueueError::LabelOutOfRange {
            label: 7,
            capacity: 4
        }
    );
    assert_eq!(errors[2], QueueError::NotQueued(2));
    assert!(matches!(errors[3], QueueError::NotDecreased { .. }));
    assert!(matches!(errors[4], QueueError::NotDecreased { .. }));
    assert!(errors.iter().all(QueueError::is_contract_violation));
    assert_eq!(queue.dump(), before);
    assert_eq!(queue.len(), 2);

    assert_eq!(queue.delete_min(), Ok((0, 10)));
    assert_eq!(
        queue.insert(2, 9),
        Err(QueueError::BelowFence { key: 9, fence: 10 })
    );
    assert_eq!(
        queue.decrease(1, 9),
        Err(QueueError::BelowFence { key: 9, fence: 10 })
    );

    let limit = queue.params().max_key();
    let overflow = queue.insert(2, limit + 1).unwrap_err();
    assert_eq!(
        overflow,
        QueueError::OutOfRange {
            key: limit + 1,
            limit
        }
    );
    assert!(!overflow.is_contract_violation());
    assert_eq!(queue.key_of(2), None);
}

fn clamping<Q: MonotoneQueue>(params: QueueParams) {
    let params = params.with_overflow(KeyOverflow::Clamp);
    let limit = params.max_key();
    let mut queue = Q::with_params(params).unwrap();
    queue.insert(0, limit + 100).unwrap();
    queue.insert(1, 3).unwrap();
    assert_eq!(queue.key_of(0), Some(limit));
    assert_eq!(queue.delete_min(), Ok((1, 3)));
    assert_eq!(queue.delete_min(), Ok((0, limit)));
}

#[test]
fn test_radix_violations() {
    violations::<RadixHeap>(QueueParams::new(4, 20));
    clamping::<RadixHeap>(QueueParams::new(4, 20));
}

#[test]
fn test_kary_violations() {
    violations::<KaryRadixHeap>(QueueParams::new(4, 20).with_branching(3));
    clamping::<KaryRadixHeap>(QueueParams::new(4, 20).with_branching(3));
}

#[test]
fn test_fib_violations() {
    violations::<FibRadixHeap>(QueueParams::new(4, 20).with_branching(2));
    clamping::<FibRadixHeap>(QueueParams::new(4, 20).with_branching(2));
}

#[test]
fn test_redistribute_wrong_segment() {
    let mut queue = KaryRadixHeap::with_params(QueueParams::new(4, 100).with_branching(2)).unwrap();
    queue.insert(0, 70).unwrap();
    queue.insert(1, 120).unwrap();
    let (bucket, segment) = queue.address(queue.class_of(1).unwrap());
    assert_ne!(queue.class_of(0), queue.class_of(1));
    assert_eq!(
        queue.redistribute_segment(bucket, segment).unwrap_err(),
        QueueError::SegmentNotLowest { bucket, segment }
    );
    assert!(queue.redistribute_segment(0, 0).is_err());
    assert_eq!(queue.len(), 2);
}

// ============================================================================
// Trace dumps
// ============================================================================

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_trace_dumps_reach_subscriber() {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let params = QueueParams::new(3, 10).with_trace_dumps(true);
        let mut queue = RadixHeap::with_params(params).unwrap();
        queue.insert(0, 5).unwrap();
        queue.delete_min().unwrap();

        let quiet = QueueParams::new(3, 10);
        let mut silent = FibRadixHeap::with_params(quiet).unwrap();
        silent.insert(2, 9).unwrap();
    });

    let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
    assert!(output.contains("insert"));
    assert!(output.contains("delete_min"));
    assert!(output.contains("bucket 0"));
    assert!(!output.contains("roots:"));
}
