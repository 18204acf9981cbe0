use std::time::{Duration, Instant};

use pfsim::{SimConfig, SimPlatform};
use picoframe::launch_core1;

#[test]
fn core1_panic_is_kept_for_the_host() {
    let sim = SimPlatform::install(SimConfig::immediate());
    assert_eq!(sim.core1_fault(), None);

    launch_core1(|| panic!("core 1 blew up"));

    let deadline = Instant::now() + Duration::from_secs(10);
    while sim.core1_fault().is_none() && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(1));
    }
    assert_eq!(sim.core1_fault().as_deref(), Some("core 1 blew up"));
}
