#![no_main]

use libfuzzer_sys::fuzz_target;

// Wraps the input in flow sequences and mappings, on one line and split across lines.
fuzz_target!(|data: &[u8]| {
    if data.len() > 8 * 1024 {
        return;
    }
    let s = String::from_utf8_lossy(data);
    for doc in [
        format!("list: [{s}]\n"),
        format!("map: {{{s}}}\n"),
        format!("- [{s},\n  {s}]\n"),
        format!("[{s}]\n"),
    ] {
        if let Ok(v) = mince_yaml::load(&doc) {
            let _ = mince_yaml::dump(&v);
        }
    }
});
