use std::sync::Barrier;

use pfsim::{SimConfig, SimPlatform};
use picoframe::multicore::core_num;
use picoframe::Mutex;

const ROUNDS: u64 = 200_000;

static SHARED: Mutex<u64> = Mutex::new(0);

#[test]
fn plain_host_threads_contend_like_separate_cores() {
    SimPlatform::install(SimConfig::immediate());
    assert_eq!(core_num(), 0);

    let start = Barrier::new(2);
    let cores = std::thread::scope(|s| {
        let workers: Vec<_> = (0..2)
            .map(|_| {
                s.spawn(|| {
                    start.wait();
                    for _ in 0..ROUNDS {
                        *SHARED.lock() += 1;
                    }
                    core_num()
                })
            })
            .collect();
        workers
            .into_iter()
            .map(|w| w.join().expect("worker panicked"))
            .collect::<Vec<u8>>()
    });

    assert_eq!(*SHARED.lock(), 2 * ROUNDS);
    assert_ne!(cores[0], cores[1]);
    assert!(cores.iter().all(|&c| c > 1));
    assert_eq!(core_num(), 0);
}
