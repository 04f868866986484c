use indoc::indoc;
use mince_yaml::options::UnresolvedAliasPolicy;
use mince_yaml::{Error, Key, Value, load, load_with_options};

fn s(text: &str) -> Value {
    Value::String(text.to_owned())
}

fn keys(v: &Value) -> Vec<String> {
    v.as_mapping()
        .expect("mapping")
        .keys()
        .map(|k| k.to_string())
        .collect()
}

#[test]
fn alias_copies_scalar() {
    let v = load("a: &x 1\nb: *x\n").unwrap();
    assert_eq!(v["b"], Value::Int(1));
}

#[test]
fn alias_copies_subtree_completed_after_anchor() {
    let yaml = indoc! {"
        base: &B
          host: localhost
          port: 80
        copy: *B
    "};
    let v = load(yaml).unwrap();
    assert_eq!(v["copy"], v["base"]);
    assert_eq!(v["copy"]["port"], Value::Int(80));
}

#[test]
fn anchor_on_sequence_item() {
    let v = load("- &first a.js\n- b.js\n- *first\n").unwrap();
    assert_eq!(v, Value::Sequence(vec![s("a.js"), s("b.js"), s("a.js")]));
}

#[test]
fn anchor_on_flow_value() {
    let v = load("list: &L [1, 2]\nagain: *L\n").unwrap();
    assert_eq!(v["again"], Value::Sequence(vec![Value::Int(1), Value::Int(2)]));
}

#[test]
fn alias_is_a_copy() {
    let yaml = indoc! {"
        base: &B
          k: 1
        copy: *B
        base2:
          k: 2
    "};
    let mut v = load(yaml).unwrap();
    if let Some(Value::Mapping(m)) = v.as_mapping_mut().and_then(|m| m.get_mut(&Key::from("base"))) {
        m.insert(Key::from("k"), Value::Int(99));
    }
    assert_eq!(v["copy"]["k"], Value::Int(1));
}

#[test]
fn redefined_anchor_uses_latest_binding() {
    let v = load("a: &x 1\nb: &x 2\nc: *x\n").unwrap();
    assert_eq!(v["c"], Value::Int(2));
}

#[test]
fn merge_key_adds_missing_entries() {
    let yaml = indoc! {"
        defaults: &D
          level: 2
          mangle: yes
        job:
          <<: *D
          level: 5
          out: app.min.js
    "};
    let v = load(yaml).unwrap();
    assert_eq!(keys(&v["job"]), vec!["level", "mangle", "out"]);
    assert_eq!(v["job"]["level"], Value::Int(5));
    assert_eq!(v["job"]["mangle"], Value::Bool(true));
    assert!(v["job"].as_mapping().unwrap().get(&Key::from("<<")).is_none());
}

#[test]
fn merge_never_overrides_existing_keys() {
    let yaml = indoc! {"
        base: &B
          a: 1
          b: 2
        item:
          a: 9
          <<: *B
    "};
    let v = load(yaml).unwrap();
    assert_eq!(v["item"]["a"], Value::Int(9));
    assert_eq!(v["item"]["b"], Value::Int(2));
}

#[test]
fn merge_from_inline_mapping() {
    let v = load("item:\n  <<: {a: 1, b: 2}\n  b: 3\n").unwrap();
    assert_eq!(v["item"]["a"], Value::Int(1));
    assert_eq!(v["item"]["b"], Value::Int(3));
}

#[test]
fn merge_at_root() {
    let yaml = indoc! {"
        base: &B
          x: 1
        <<: *B
    "};
    let v = load(yaml).unwrap();
    assert_eq!(keys(&v), vec!["base", "x"]);
}

#[test]
fn quoted_merge_key_is_ordinary() {
    let v = load("'<<': 1\n").unwrap();
    assert_eq!(v.as_mapping().unwrap().get(&Key::from("<<")), Some(&Value::Int(1)));
}

#[test]
fn alias_before_anchor_is_an_error() {
    let err = load("a: *later\nb: &later 1\n").unwrap_err();
    match err {
        Error::UnresolvedAlias { ref name, .. } => assert_eq!(name, "later"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn lenient_policy_stores_null() {
    let options = mince_yaml::options! {
        unresolved_aliases: UnresolvedAliasPolicy::Null,
    };
    let v = load_with_options("a: *missing\nb: 1\n", options).unwrap();
    assert_eq!(v["a"], Value::Null);
    assert_eq!(v["b"], Value::Int(1));
}

#[test]
fn star_globs_are_not_aliases() {
    let v = load("files: src/*.js\nall: '*'\n").unwrap();
    assert_eq!(v["files"], s("src/*.js"));
    assert_eq!(v["all"], s("*"));
}

#[test]
fn written_keys_override_merged_defaults_under_strict_policies() {
    use mince_yaml::options::DuplicateKeyPolicy;

    let yaml = indoc! {"
        base: &B
          a: 1
          b: 2
        d:
          <<: *B
          a: 9
    "};
    for policy in [DuplicateKeyPolicy::Error, DuplicateKeyPolicy::FirstWins] {
        let options = mince_yaml::options! { duplicate_keys: policy };
        let v = load_with_options(yaml, options).unwrap();
        assert_eq!(v["d"]["a"], Value::Int(9), "{policy:?}");
        assert_eq!(v["d"]["b"], Value::Int(2), "{policy:?}");
        assert_eq!(v["base"]["a"], Value::Int(1), "{policy:?}");
    }
}

#[test]
fn repeated_written_key_after_merge_is_still_a_duplicate() {
    use mince_yaml::options::DuplicateKeyPolicy;

    let yaml = "base: &B\n  a: 1\nd:\n  <<: *B\n  a: 9\n  a: 10\n";
    let options = mince_yaml::options! { duplicate_keys: DuplicateKeyPolicy::Error };
    let err = load_with_options(yaml, options).unwrap_err();
    assert!(matches!(err, Error::DuplicateKey { ref key, .. } if key == "a"), "{err}");
    assert_eq!(err.location().map(|l| l.line()), Some(6));
}
