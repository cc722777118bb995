//! End-to-end query tests, checked against serde_json as the reference
//! parser.

use semidex::error::Error;
use semidex::jq;
use serde_json::{json, Value};

/// Run a filter and parse every rendered result with the reference parser.
fn run(src: &Value, filter: &str) -> Result<Vec<Value>, Error> {
    let text = serde_json::to_string(src).unwrap();
    let results = jq::query(&text, filter)?;
    Ok(results
        .iter()
        .map(|r| serde_json::from_str(r).expect("rendered results are valid JSON"))
        .collect())
}

fn check(filter: &str, src: Value, want: Vec<Value>) {
    assert_eq!(run(&src, filter).unwrap(), want, "filter {:?} on {}", filter, src);
}

fn check_type_error(filter: &str, src: Value) {
    match run(&src, filter) {
        Err(Error::TypeMismatch(_)) => {}
        other => panic!("expected type mismatch for {:?}, got {:?}", filter, other),
    }
}

#[test]
fn test_comment() {
    check(". # ignore this", json!([]), vec![json!([])]);
}

#[test]
fn test_identity() {
    check(".", json!([0, 1, 2]), vec![json!([0, 1, 2])]);
    check(
        ".",
        json!({"foo": 0, "bar": 1}),
        vec![json!({"foo": 0, "bar": 1})],
    );
    check(
        ".",
        json!([{"0": false, "1": [2, 3]}]),
        vec![json!([{"0": false, "1": [2, 3]}])],
    );
}

#[test]
fn test_properties() {
    check(".foo", json!({}), vec![json!(null)]);
    check(".foo", json!({"foo": "val"}), vec![json!("val")]);
    check(".bar", json!({"foo": "val"}), vec![json!(null)]);
    check(
        ".foo.bar",
        json!({"foo": {"bar": [0, 1, 2]}}),
        vec![json!([0, 1, 2])],
    );
    check_type_error(".foo", json!([0, 1, 2]));
    check(".foo?", json!([0, 1, 2]), vec![]);
    check(
        ".bar, .foo",
        json!({"foo": true, "bar": false}),
        vec![json!(false), json!(true)],
    );
}

#[test]
fn test_generic_object_index() {
    check(".", json!({}), vec![json!({})]);
    check(r#".["foo"]"#, json!({"foo": "val"}), vec![json!("val")]);
    check(r#".["bar"]"#, json!({"foo": "val"}), vec![json!(null)]);
    check(
        r#".["foo"] | .["bar"]"#,
        json!({"foo": {"bar": [0, 1, 2]}}),
        vec![json!([0, 1, 2])],
    );
    check_type_error(r#".["foo"]"#, json!([0, 1, 2]));
    check(r#".["foo"]?"#, json!([0, 1, 2]), vec![]);
    check(
        r#".["bar", "foo"]"#,
        json!({"foo": true, "bar": false}),
        vec![json!(false), json!(true)],
    );
    check(
        r#".["bar"], .["foo"]"#,
        json!({"foo": true, "bar": false}),
        vec![json!(false), json!(true)],
    );
}

#[test]
fn test_array_index() {
    check(".", json!([]), vec![json!([])]);
    check(".[0]", json!([true, false, 10]), vec![json!(true)]);
    check(".[-1]", json!([true, false, 10]), vec![json!(10)]);
    check(".[5]", json!([true, false, 10]), vec![json!(null)]);
    check(".[-5]", json!([true, false, 10]), vec![json!(null)]);
    check_type_error(".[0]", json!({"foo": true}));
    check(".[0]?", json!({"foo": true}), vec![]);
    check(".[1,0]", json!([0, 1, 2]), vec![json!(1), json!(0)]);
    check(".[1], .[0]", json!([0, 1, 2]), vec![json!(1), json!(0)]);
}

#[test]
fn test_slices() {
    let src = json!([true, false, 10]);
    check(".[:]", src.clone(), vec![json!([true, false, 10])]);
    check(".[1:]", src.clone(), vec![json!([false, 10])]);
    check(".[:2]", src.clone(), vec![json!([true, false])]);
    check(".[1:-1]", src.clone(), vec![json!([false])]);
    check(".[5:9]", src.clone(), vec![json!([])]);
    check(".[-2:]", src, vec![json!([false, 10])]);
}

#[test]
fn test_iterator() {
    check(".[]", json!([0, 1, 2]), vec![json!(0), json!(1), json!(2)]);
    check(
        ".[]",
        json!([[0, 1, 2], [3, 4, 5]]),
        vec![json!([0, 1, 2]), json!([3, 4, 5])],
    );
    check(
        ".[]",
        json!({"foo": true, "bar": false}),
        vec![json!(true), json!(false)],
    );
    check_type_error(".foo | .[]", json!({"foo": true}));
    check(".foo | .[]?", json!({"foo": true}), vec![]);
    check(".[]", json!([]), vec![]);
    check(".[]", json!({}), vec![]);
}

#[test]
fn test_pipe() {
    check(". | .foo", json!({"foo": true}), vec![json!(true)]);
    check(".foo | .", json!({"foo": true}), vec![json!(true)]);
    check(
        ".[] | .foo",
        json!([{"foo": 1}, {"foo": 2}]),
        vec![json!(1), json!(2)],
    );
    check(".foo | .[0]", json!({"foo": [0, 1, 2]}), vec![json!(0)]);
    check(
        ".foo, .bar | .[-1]",
        json!({"foo": [0, 1, 2], "bar": [3, 4, 5]}),
        vec![json!(2), json!(5)],
    );
    check(
        ".[] | .foo, .bar",
        json!([{"foo": true}, {"bar": false}]),
        vec![json!(true), json!(null), json!(null), json!(false)],
    );
    check(
        ".[.bar, .foo]",
        json!({"foo": "bar", "bar": "foo"}),
        vec![json!("bar"), json!("foo")],
    );
}

#[test]
fn test_spec_scenarios() {
    check(
        ".bar | .[:-1]",
        json!({"foo": [0, 1, 2], "bar": [3, 4, 5]}),
        vec![json!([3, 4])],
    );
    check(
        ".[] | .[]",
        json!([{"foo": true}, {"bar": false}]),
        vec![json!(true), json!(false)],
    );
}

#[test]
fn test_nested_structures_roundtrip() {
    let docs = [
        json!({"a": {"b": {"c": [1, 2, {"d": null}]}}}),
        json!([[], {}, [[[1]]], {"x": []}]),
        json!({"strings": ["with, comma", "with ] bracket", "with \" quote", "with \\ backslash"]}),
        json!({"unicode": "héllo wörld", "nums": [0.5, -2, 1e3]}),
    ];
    for doc in docs {
        check(".", doc.clone(), vec![doc]);
    }
}

#[test]
fn test_parse_errors() {
    assert!(matches!(
        jq::query("[1]", "foo"),
        Err(Error::Parse { .. })
    ));
    assert!(matches!(
        jq::query("not json", "."),
        Err(Error::Parse { .. })
    ));
    assert!(matches!(jq::query("[1, 2", "."), Err(Error::Parse { .. })));
}

#[test]
fn test_results_reference_source_text() {
    // rendered results are verbatim source slices, not re-serializations
    let src = r#"{ "pretty" : [ 1 , 2 ] }"#;
    let results = jq::query(src, ".pretty").unwrap();
    assert_eq!(results, vec!["[ 1 , 2 ]"]);
}
