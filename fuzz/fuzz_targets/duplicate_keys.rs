#![no_main]

use libfuzzer_sys::fuzz_target;
use mince_yaml::options::DuplicateKeyPolicy;

// Repeats the input as sibling and nested keys and loads it under every policy.
fuzz_target!(|data: &[u8]| {
    if data.len() > 16 * 1024 {
        return;
    }
    let s = String::from_utf8_lossy(data);
    let doc = format!("k: {s}\nk:\n  k: {s}\n  k: 1\nk: 2\n");
    for policy in [
        DuplicateKeyPolicy::LastWins,
        DuplicateKeyPolicy::FirstWins,
        DuplicateKeyPolicy::Error,
    ] {
        let options = mince_yaml::options! { duplicate_keys: policy };
        let _ = mince_yaml::load_with_options(&doc, options);
        let options = mince_yaml::options! { duplicate_keys: policy };
        let _ = mince_yaml::load_with_options(&s, options);
    }
});
