//! Expression evaluator for jq-like queries.
//!
//! Evaluation is stage-by-stage: each pipeline stage consumes the previous
//! stage's full (finite) stream of values and produces the next. Forking
//! combinators - concatenation and computed bracket indexes - re-evaluate
//! against their own copy of the input stream, which is cheap because
//! stream values are non-owning handles into the document.
//!
//! The first error terminates evaluation; the `?` markers in the query
//! suppress shape mismatches by dropping the offending value instead.

use crate::error::{Error, Result};
use crate::json::{Document, List, Object, Value};

use super::expr::{Expr, IndexKey, Literal, Property, Query};

/// A value produced by query evaluation: a document node, a literal, or a
/// materialized slice.
#[derive(Debug, Clone)]
pub enum QueryValue<'d> {
    /// A rendered node of the document.
    Node(Value<'d>),
    /// The null produced by missing keys and out-of-range indexes.
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// A slice result: rendered elements gathered into one value.
    Array(Vec<QueryValue<'d>>),
}

impl<'d> QueryValue<'d> {
    /// A short name for the value's shape, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            QueryValue::Node(v) => v.kind(),
            QueryValue::Null => "null",
            QueryValue::Bool(_) => "boolean",
            QueryValue::Int(_) | QueryValue::Float(_) => "number",
            QueryValue::Str(_) => "string",
            QueryValue::Array(_) => "array",
        }
    }

    /// Render this value as JSON text.
    pub fn to_json_text(&self) -> String {
        match self {
            QueryValue::Node(v) => v.text().to_string(),
            QueryValue::Null => "null".to_string(),
            QueryValue::Bool(b) => b.to_string(),
            QueryValue::Int(n) => n.to_string(),
            QueryValue::Float(f) => f.to_string(),
            QueryValue::Str(s) => format!("\"{}\"", s),
            QueryValue::Array(items) => {
                let rendered: Vec<String> = items.iter().map(|v| v.to_json_text()).collect();
                format!("[{}]", rendered.join(","))
            }
        }
    }
}

impl Query {
    /// Parse a query string.
    pub fn parse(input: &str) -> Result<Query> {
        super::parser::parse(input)
    }

    /// Evaluate the query over a document, yielding the result stream.
    pub fn execute<'d>(&self, doc: &'d Document) -> Result<Vec<QueryValue<'d>>> {
        let mut stream = vec![QueryValue::Node(doc.root())];
        for stage in &self.stages {
            stream = eval(stage, stream)?;
        }
        Ok(stream)
    }
}

/// Evaluate one expression over a stream.
fn eval<'d>(expr: &Expr, input: Vec<QueryValue<'d>>) -> Result<Vec<QueryValue<'d>>> {
    match expr {
        Expr::Identity => Ok(input),
        Expr::Literal(lit) => Ok(vec![literal_value(lit)]),
        Expr::Properties(steps) => eval_properties(steps, input),
        Expr::Iterator { optional } => eval_iterator(*optional, input),
        Expr::Indexer { key, optional } => eval_indexer(key, *optional, input),
        Expr::Concat(exprs) => {
            let mut out = Vec::new();
            for expr in exprs {
                out.extend(eval(expr, input.clone())?);
            }
            Ok(out)
        }
    }
}

fn literal_value<'d>(lit: &Literal) -> QueryValue<'d> {
    match lit {
        Literal::Null => QueryValue::Null,
        Literal::Bool(b) => QueryValue::Bool(*b),
        Literal::Int(n) => QueryValue::Int(*n),
        Literal::Float(f) => QueryValue::Float(*f),
        Literal::Str(s) => QueryValue::Str(s.clone()),
    }
}

/// Property chains: each step maps objects to member values, missing keys
/// to null.
fn eval_properties<'d>(
    steps: &[Property],
    mut stream: Vec<QueryValue<'d>>,
) -> Result<Vec<QueryValue<'d>>> {
    for step in steps {
        let mut out = Vec::with_capacity(stream.len());
        for value in stream {
            match value {
                QueryValue::Node(Value::Object(obj)) => {
                    out.push(member_or_null(&obj, &step.name));
                }
                other => {
                    if !step.optional {
                        return Err(Error::type_mismatch(format!(
                            "cannot index {} with string",
                            other.kind()
                        )));
                    }
                }
            }
        }
        stream = out;
    }
    Ok(stream)
}

fn member_or_null<'d>(obj: &Object<'d>, key: &str) -> QueryValue<'d> {
    match obj.get(key) {
        Some(v) => QueryValue::Node(v),
        None => QueryValue::Null,
    }
}

/// `.[]`: lists yield their elements, objects their member values.
fn eval_iterator<'d>(
    optional: bool,
    input: Vec<QueryValue<'d>>,
) -> Result<Vec<QueryValue<'d>>> {
    let mut out = Vec::new();
    for value in input {
        match value {
            QueryValue::Node(Value::List(list)) => {
                out.extend(list.iter().map(QueryValue::Node));
            }
            QueryValue::Node(Value::Object(obj)) => {
                out.extend(obj.values().map(QueryValue::Node));
            }
            other => {
                if !optional {
                    return Err(Error::type_mismatch(format!(
                        "cannot iterate over {}",
                        other.kind()
                    )));
                }
            }
        }
    }
    Ok(out)
}

/// One resolved bracket index.
enum Item<'d> {
    Str(String),
    Int(i64),
    Slice(Option<i64>, Option<i64>),
    Value(QueryValue<'d>),
}

/// `.[K]`: resolve the key into items, then apply each item across the
/// whole input stream in turn.
fn eval_indexer<'d>(
    key: &IndexKey,
    optional: bool,
    input: Vec<QueryValue<'d>>,
) -> Result<Vec<QueryValue<'d>>> {
    let items: Vec<Item<'d>> = match key {
        IndexKey::Str(s) => vec![Item::Str(s.clone())],
        IndexKey::Int(n) => vec![Item::Int(*n)],
        IndexKey::Slice { start, end } => vec![Item::Slice(*start, *end)],
        IndexKey::Expr(expr) => eval(expr, input.clone())?
            .into_iter()
            .map(Item::Value)
            .collect(),
    };

    let mut out = Vec::new();
    for item in &items {
        for value in &input {
            if let Some(v) = apply_item(item, value, optional)? {
                out.push(v);
            }
        }
    }
    Ok(out)
}

/// Apply one index item to one value; `None` drops the value (optional
/// mismatch).
fn apply_item<'d>(
    item: &Item<'d>,
    value: &QueryValue<'d>,
    optional: bool,
) -> Result<Option<QueryValue<'d>>> {
    if let QueryValue::Node(Value::Object(obj)) = value {
        match item {
            Item::Str(key) => return Ok(Some(member_or_null(obj, key))),
            Item::Value(QueryValue::Str(key)) => return Ok(Some(member_or_null(obj, key))),
            Item::Value(QueryValue::Node(Value::Primitive(p))) => {
                return Ok(Some(member_or_null(obj, p.content())));
            }
            _ => {}
        }
    }

    if let QueryValue::Node(Value::List(list)) = value {
        match item {
            Item::Int(n) => return Ok(Some(element_or_null(list, *n))),
            Item::Value(QueryValue::Int(n)) => return Ok(Some(element_or_null(list, *n))),
            Item::Value(QueryValue::Node(Value::Primitive(p))) => {
                if let Ok(n) = p.text().parse::<i64>() {
                    return Ok(Some(element_or_null(list, n)));
                }
            }
            Item::Slice(start, end) => {
                return Ok(Some(QueryValue::Array(
                    list.slice(*start, *end)
                        .into_iter()
                        .map(QueryValue::Node)
                        .collect(),
                )));
            }
            _ => {}
        }
    }

    if optional {
        return Ok(None);
    }
    Err(Error::type_mismatch(format!(
        "cannot index {} with {}",
        value.kind(),
        item_kind(item)
    )))
}

fn element_or_null<'d>(list: &List<'d>, index: i64) -> QueryValue<'d> {
    match list.get(index) {
        Some(v) => QueryValue::Node(v),
        None => QueryValue::Null,
    }
}

fn item_kind(item: &Item<'_>) -> &'static str {
    match item {
        Item::Str(_) => "string",
        Item::Int(_) => "number",
        Item::Slice(..) => "slice",
        Item::Value(v) => v.kind(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(src: &str, filter: &str) -> Result<Vec<String>> {
        let doc = Document::new(src)?;
        let query = Query::parse(filter)?;
        Ok(query
            .execute(&doc)?
            .iter()
            .map(|v| v.to_json_text())
            .collect())
    }

    #[test]
    fn test_identity() {
        assert_eq!(run("[0, 1, 2]", ".").unwrap(), vec!["[0, 1, 2]"]);
        assert_eq!(run("{}", ".").unwrap(), vec!["{}"]);
    }

    #[test]
    fn test_properties() {
        assert_eq!(run(r#"{"foo": "val"}"#, ".foo").unwrap(), vec!["\"val\""]);
        assert_eq!(run(r#"{"foo": "val"}"#, ".bar").unwrap(), vec!["null"]);
        assert_eq!(run("{}", ".foo").unwrap(), vec!["null"]);
        assert_eq!(
            run(r#"{"foo": {"bar": [0, 1, 2]}}"#, ".foo.bar").unwrap(),
            vec!["[0, 1, 2]"]
        );
        assert!(matches!(
            run("[0, 1, 2]", ".foo"),
            Err(Error::TypeMismatch(_))
        ));
        assert_eq!(run("[0, 1, 2]", ".foo?").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_iterator() {
        assert_eq!(run("[0, 1, 2]", ".[]").unwrap(), vec!["0", "1", "2"]);
        assert_eq!(
            run(r#"{"foo": true, "bar": false}"#, ".[]").unwrap(),
            vec!["true", "false"]
        );
        assert!(matches!(
            run(r#"{"foo": true}"#, ".foo | .[]"),
            Err(Error::TypeMismatch(_))
        ));
        assert_eq!(
            run(r#"{"foo": true}"#, ".foo | .[]?").unwrap(),
            Vec::<String>::new()
        );
    }

    #[test]
    fn test_indexing() {
        assert_eq!(run("[true, false, 10]", ".[0]").unwrap(), vec!["true"]);
        assert_eq!(run("[true, false, 10]", ".[-1]").unwrap(), vec!["10"]);
        assert_eq!(run("[true, false, 10]", ".[5]").unwrap(), vec!["null"]);
        assert_eq!(
            run(r#"{"foo": "val"}"#, r#".["foo"]"#).unwrap(),
            vec!["\"val\""]
        );
        assert!(matches!(
            run(r#"{"foo": true}"#, ".[0]"),
            Err(Error::TypeMismatch(_))
        ));
        assert_eq!(
            run(r#"{"foo": true}"#, ".[0]?").unwrap(),
            Vec::<String>::new()
        );
    }

    #[test]
    fn test_slices() {
        assert_eq!(
            run("[true, false, 10]", ".[:]").unwrap(),
            vec!["[true,false,10]"]
        );
        assert_eq!(run("[true, false, 10]", ".[1:]").unwrap(), vec!["[false,10]"]);
        assert_eq!(
            run("[true, false, 10]", ".[1:-1]").unwrap(),
            vec!["[false]"]
        );
    }

    #[test]
    fn test_concat_and_computed_index() {
        assert_eq!(
            run(r#"{"foo": true, "bar": false}"#, ".bar, .foo").unwrap(),
            vec!["false", "true"]
        );
        assert_eq!(run("[0, 1, 2]", ".[1,0]").unwrap(), vec!["1", "0"]);
        assert_eq!(
            run(r#"{"foo": "bar", "bar": "foo"}"#, ".[.bar, .foo]").unwrap(),
            vec!["\"bar\"", "\"foo\""]
        );
    }

    #[test]
    fn test_literal_stage() {
        assert_eq!(run("[1]", "42").unwrap(), vec!["42"]);
        assert_eq!(run("[1]", "null").unwrap(), vec!["null"]);
    }
}
