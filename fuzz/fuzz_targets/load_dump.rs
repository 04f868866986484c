#![no_main]

use libfuzzer_sys::fuzz_target;

// Anything that loads must dump to text that loads again.
fuzz_target!(|data: &[u8]| {
    if data.len() > 16 * 1024 {
        return;
    }
    let text = String::from_utf8_lossy(data);
    let Ok(first) = mince_yaml::load(&text) else {
        return;
    };
    let dumped = mince_yaml::dump(&first);
    if let Err(e) = mince_yaml::load(&dumped) {
        panic!("dump output failed to load: {e}\n{dumped}");
    }
});
