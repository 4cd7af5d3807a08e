//! SPSC ring stress: one producer, one consumer, a million integers.

use std::sync::Arc;
use std::thread;

use fen_core::transport::SpscRing;

const COUNT: u64 = 1_000_000;

#[test]
fn million_integers_arrive_in_order() {
    let ring = Arc::new(SpscRing::new(8_192));

    let producer = {
        let ring = Arc::clone(&ring);
        thread::spawn(move || {
            for i in 0..COUNT {
                let mut value = i;
                loop {
                    match ring.push(value) {
                        Ok(()) => break,
                        Err(rejected) => {
                            value = rejected;
                            thread::yield_now();
                        }
                    }
                }
            }
        })
    };

    let mut expected = 0u64;
    while expected < COUNT {
        match ring.pop() {
            Some(value) => {
                assert_eq!(value, expected, "out-of-order delivery");
                expected += 1;
            }
            None => thread::yield_now(),
        }
    }

    producer.join().unwrap();
    assert!(ring.is_empty());
    assert_eq!(expected, COUNT);
}

#[test]
fn accepted_pushes_are_never_lost() {
    // Single-threaded: fill, drain, repeat across the wrap boundary.
    let ring = SpscRing::new(1_024);
    let mut pushed = 0u64;
    let mut popped = 0u64;

    for round in 0..100 {
        for i in 0..700 {
            if ring.push(round * 1_000 + i).is_ok() {
                pushed += 1;
            }
        }
        while ring.pop().is_some() {
            popped += 1;
        }
    }

    assert_eq!(pushed, popped);
    assert!(ring.is_empty());
}
