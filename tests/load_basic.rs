use indoc::indoc;
use mince_yaml::{Key, Mapping, Value, load};

fn s(text: &str) -> Value {
    Value::String(text.to_owned())
}

fn map(entries: Vec<(&str, Value)>) -> Value {
    Value::Mapping(entries.into_iter().map(|(k, v)| (Key::from(k), v)).collect())
}

#[test]
fn flat_mapping() {
    let v = load("a: 1\nb: 2\n").unwrap();
    assert_eq!(v, map(vec![("a", Value::Int(1)), ("b", Value::Int(2))]));
}

#[test]
fn flat_sequence() {
    let v = load("- 1\n- 2\n- 3\n").unwrap();
    assert_eq!(
        v,
        Value::Sequence(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
    );
}

#[test]
fn inline_sequence_value() {
    let v = load("key: [1, 2, 3]\n").unwrap();
    assert_eq!(
        v,
        map(vec![(
            "key",
            Value::Sequence(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
        )])
    );
}

#[test]
fn null_sequence_item() {
    let v = load("minify:\n  -\n").unwrap();
    assert_eq!(v, map(vec![("minify", Value::Sequence(vec![Value::Null]))]));
}

#[test]
fn trailing_comment_is_dropped() {
    let v = load("a: 1 # comment\n").unwrap();
    assert_eq!(v, map(vec![("a", Value::Int(1))]));
}

#[test]
fn combine_manifest_shape() {
    let v = load("combine:\n  out.css:\n    - a.css\n    - b.css\n").unwrap();
    assert_eq!(
        v,
        map(vec![(
            "combine",
            map(vec![("out.css", Value::Sequence(vec![s("a.css"), s("b.css")]))])
        )])
    );
}

#[test]
fn empty_and_comment_only_documents() {
    assert_eq!(load("").unwrap(), Value::Mapping(Mapping::new()));
    assert_eq!(
        load("# nothing\n---\n\n   \n").unwrap(),
        Value::Mapping(Mapping::new())
    );
}

#[test]
fn nested_mappings_with_irregular_indentation() {
    let yaml = indoc! {"
        server:
           host: example.com
           ports:
                - 80
                - 443
        debug: off
    "};
    let v = load(yaml).unwrap();
    assert_eq!(v["server"]["host"], s("example.com"));
    assert_eq!(v["server"]["ports"][1], Value::Int(443));
    assert_eq!(v["debug"], Value::Bool(false));
}

#[test]
fn compact_sequence_under_key() {
    let yaml = indoc! {"
        list:
        - a
        - b
        other: 1
    "};
    let v = load(yaml).unwrap();
    assert_eq!(v["list"], Value::Sequence(vec![s("a"), s("b")]));
    assert_eq!(v["other"], Value::Int(1));
}

#[test]
fn mapped_sequence_items() {
    let yaml = indoc! {"
        - files:
          - a.js
          - b.js
        - files:
          - c.js
    "};
    let v = load(yaml).unwrap();
    assert_eq!(v[0]["files"], Value::Sequence(vec![s("a.js"), s("b.js")]));
    assert_eq!(v[1]["files"], Value::Sequence(vec![s("c.js")]));
}

#[test]
fn inline_pairs_in_sequence_items_collect_siblings() {
    let yaml = indoc! {"
        - name: a
          size: 1
        - name: b
    "};
    let v = load(yaml).unwrap();
    assert_eq!(v[0], map(vec![("name", s("a")), ("size", Value::Int(1))]));
    assert_eq!(v[1], map(vec![("name", s("b"))]));
}

#[test]
fn sequences_of_sequences() {
    let yaml = indoc! {"
        -
          - 1
          - 2
        -
          - 3
    "};
    let v = load(yaml).unwrap();
    assert_eq!(
        v,
        Value::Sequence(vec![
            Value::Sequence(vec![Value::Int(1), Value::Int(2)]),
            Value::Sequence(vec![Value::Int(3)]),
        ])
    );
}

#[test]
fn integer_keys_stay_a_mapping() {
    let v = load("0: a\n1: b\n").unwrap();
    let m = v.as_mapping().unwrap();
    assert_eq!(m.get(&Key::Int(0)), Some(&s("a")));
    assert_eq!(m.get(&Key::Int(1)), Some(&s("b")));
}

#[test]
fn quoted_keys_are_text() {
    let v = load("'0': a\n\"x: y\": b\n").unwrap();
    let m = v.as_mapping().unwrap();
    assert_eq!(m.get(&Key::from("0")), Some(&s("a")));
    assert_eq!(m.get(&Key::from("x: y")), Some(&s("b")));
}

#[test]
fn later_key_replaces_value_in_place() {
    let v = load("a: 1\nb: 2\na: 3\n").unwrap();
    let keys: Vec<String> = v.as_mapping().unwrap().keys().map(|k| k.to_string()).collect();
    assert_eq!(keys, vec!["a", "b"]);
    assert_eq!(v["a"], Value::Int(3));
}

#[test]
fn line_endings_and_bom() {
    let expected = map(vec![("a", Value::Int(1)), ("b", Value::Int(2))]);
    assert_eq!(load("a: 1\r\nb: 2\r\n").unwrap(), expected);
    assert_eq!(load("a: 1\rb: 2\r").unwrap(), expected);
    assert_eq!(load("\u{FEFF}a: 1\nb: 2\n").unwrap(), expected);
}

#[test]
fn quoted_hash_is_not_a_comment() {
    let v = load("a: 'x # y'\nb: \"#1\"\nc: issue#7\n").unwrap();
    assert_eq!(v["a"], s("x # y"));
    assert_eq!(v["b"], s("#1"));
    assert_eq!(v["c"], s("issue#7"));
}

#[test]
fn key_with_comment_opens_a_nested_mapping() {
    let v = load("outer: # note\n  inner: 1\n").unwrap();
    assert_eq!(v["outer"]["inner"], Value::Int(1));
}

#[test]
fn root_scalar_lines_form_a_sequence() {
    let v = load("just text\n").unwrap();
    assert_eq!(v, Value::Sequence(vec![s("just text")]));
}

#[test]
fn loads_are_independent() {
    let first = load("a: &x 1\n").unwrap();
    assert_eq!(first["a"], Value::Int(1));
    // The anchor from the previous call is gone.
    assert!(load("b: *x\n").is_err());
}

#[test]
fn literal_block_and_boolean_words() {
    let v = load("text: |\n  line one\n  line two\nflag: yes\noff_flag: Off\n").unwrap();
    assert_eq!(v["text"], s("line one\nline two"));
    assert_eq!(v["flag"], Value::Bool(true));
    assert_eq!(v["off_flag"], Value::Bool(false));
}
