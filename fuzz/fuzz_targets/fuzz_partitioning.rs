#![no_main]

use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

use picalc_core::calculator::{Calculator, ChudnovskyCalculator};
use picalc_core::config::PiConfig;
use picalc_core::observers::NoOpObserver;
use picalc_core::progress::CancellationToken;

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }
    let digits = 1 + u16::from_le_bytes([data[0], data[1]]) as u64 % 2_000;
    let min_pool_range = 1 + data[2] as u64 % 32;
    let workers = 1 + (data[3] % 8) as isize;

    let sequential = ChudnovskyCalculator::new(PiConfig {
        min_pool_range: u64::MAX,
        workers: 1,
        ..PiConfig::default()
    });
    let pooled = ChudnovskyCalculator::new(PiConfig {
        min_pool_range,
        workers,
        ..PiConfig::default()
    });

    let cancel = CancellationToken::new();
    let observer = Arc::new(NoOpObserver::new());
    let expected = sequential.compute_pi(&cancel, observer.clone(), digits);
    let actual = pooled.compute_pi(&cancel, observer, digits);
    assert_eq!(expected, actual, "digits={digits} range={min_pool_range} workers={workers}");
});
