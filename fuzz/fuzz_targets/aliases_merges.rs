#![no_main]

use libfuzzer_sys::fuzz_target;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct MergeDoc {
    base: Option<BaseMap>,
    merged: Option<BaseMap>,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct BaseMap {
    k: Option<i64>,
    v: Option<String>,
}

// Biases inputs toward anchors, aliases and merge keys, under a tight budget.
fuzz_target!(|data: &[u8]| {
    if data.len() > 16 * 1024 {
        return;
    }
    let s = String::from_utf8_lossy(data);
    let budget = mince_yaml::budget! {
        max_aliases: 64,
        max_alias_nodes: 4096,
        max_merge_keys: 64,
    };

    let aliases = format!("a: &A {s}\nb: *A\nseq: &S [1, 2]\nagain: *S\n");
    let _ = mince_yaml::check_budget(&aliases, &budget);

    let merges = format!("base: &B\n  k: 1\n  v: {s}\nmerged:\n  <<: *B\n  k: 2\n");
    let options = mince_yaml::options! { budget: Some(budget.clone()) };
    if let Ok(v) = mince_yaml::load_with_options(&merges, options) {
        let _ = mince_yaml::from_value::<MergeDoc>(v);
    }

    let options = mince_yaml::options! { budget: Some(budget) };
    let _ = mince_yaml::load_with_options(&s, options);
});
