use indoc::indoc;
use mince_yaml::{Key, Value, load};

fn s(text: &str) -> Value {
    Value::String(text.to_owned())
}

#[test]
fn flow_sequence_value() {
    let v = load("files: [a.js, b.js, 3]\n").unwrap();
    assert_eq!(
        v["files"],
        Value::Sequence(vec![s("a.js"), s("b.js"), Value::Int(3)])
    );
}

#[test]
fn empty_flow_sequences() {
    let v = load("a: []\nb: [ ]\n").unwrap();
    assert_eq!(v["a"], Value::Sequence(vec![]));
    assert_eq!(v["b"], Value::Sequence(vec![]));
}

#[test]
fn trailing_empty_element_is_dropped() {
    let v = load("a: [x, y,]\n").unwrap();
    assert_eq!(v["a"], Value::Sequence(vec![s("x"), s("y")]));
}

#[test]
fn quoted_elements_keep_commas() {
    let v = load("a: ['x, y', \"z\"]\n").unwrap();
    assert_eq!(v["a"], Value::Sequence(vec![s("x, y"), s("z")]));
}

#[test]
fn nested_flow_sequences() {
    let v = load("grid: [[1, 2], [3]]\n").unwrap();
    assert_eq!(
        v["grid"],
        Value::Sequence(vec![
            Value::Sequence(vec![Value::Int(1), Value::Int(2)]),
            Value::Sequence(vec![Value::Int(3)]),
        ])
    );
}

#[test]
fn flow_sequence_spanning_lines() {
    let yaml = indoc! {"
        files: [a.js,
          b.js,
          c.js]
        after: 1
    "};
    let v = load(yaml).unwrap();
    assert_eq!(
        v["files"],
        Value::Sequence(vec![s("a.js"), s("b.js"), s("c.js")])
    );
    assert_eq!(v["after"], Value::Int(1));
}

#[test]
fn flow_mapping_value() {
    let v = load("point: {x: 1, y: two}\n").unwrap();
    let point = v["point"].as_mapping().unwrap();
    assert_eq!(point.get(&Key::from("x")), Some(&Value::Int(1)));
    assert_eq!(point.get(&Key::from("y")), Some(&s("two")));
    assert_eq!(point.len(), 2);
}

#[test]
fn flow_mapping_with_bare_entries() {
    let v = load("m: {a: 1, plain, ~}\n").unwrap();
    let m = v["m"].as_mapping().unwrap();
    assert_eq!(m.get(&Key::from("a")), Some(&Value::Int(1)));
    assert_eq!(m.get(&Key::Int(0)), Some(&s("plain")));
    assert_eq!(m.len(), 2);
}

#[test]
fn flow_inside_sequence_items() {
    let v = load("- [1, 2]\n- {k: v}\n").unwrap();
    assert_eq!(v[0], Value::Sequence(vec![Value::Int(1), Value::Int(2)]));
    assert_eq!(v[1]["k"], s("v"));
}

#[test]
fn line_level_flow_sequence_adds_each_element() {
    let yaml = indoc! {"
        list:
          [a, b]
          - c
    "};
    let v = load(yaml).unwrap();
    assert_eq!(v["list"], Value::Sequence(vec![s("a"), s("b"), s("c")]));
}

#[test]
fn comment_after_closed_flow_sequence() {
    let v = load("a: [1, 2] # note\nb: 3\n").unwrap();
    assert_eq!(v["a"], Value::Sequence(vec![Value::Int(1), Value::Int(2)]));
    assert_eq!(v["b"], Value::Int(3));
}

#[test]
fn comments_inside_multi_line_flow_sequence() {
    let yaml = indoc! {"
        files: [a.js, # first
          b.js] # last
        next: 1
    "};
    let v = load(yaml).unwrap();
    assert_eq!(v["files"], Value::Sequence(vec![s("a.js"), s("b.js")]));
    assert_eq!(v["next"], Value::Int(1));
}
