//! jq-style query language over semi-indexed JSON documents.
//!
//! Supports the basic jq filters: identity, property access (`.foo`,
//! `."foo"`, with `?`), bracket indexing (`.["foo"]`, `.[0]`, slices),
//! value iteration (`.[]`), comma concatenation, pipelines, primitive
//! literals, and `#` comments.
//!
//! ```
//! use semidex::jq::query;
//!
//! let results = query(r#"{"foo": [0, 1, 2], "bar": [3, 4, 5]}"#, ".bar | .[:-1]").unwrap();
//! assert_eq!(results, vec!["[3,4]"]);
//! ```

mod eval;
mod expr;
mod parser;

pub use eval::QueryValue;
pub use expr::{Expr, IndexKey, Literal, Property, Query};
pub use parser::parse;

use crate::error::Result;
use crate::json::Document;

/// Evaluate a query over a JSON text, rendering each result as JSON.
pub fn query(src: &str, filter: &str) -> Result<Vec<String>> {
    let query = Query::parse(filter)?;
    let doc = Document::new(src)?;
    let results = query.execute(&doc)?;
    Ok(results.iter().map(|v| v.to_json_text()).collect())
}

#[cfg(test)]
mod tests {
    use super::query;

    #[test]
    fn test_query_end_to_end() {
        assert_eq!(
            query(r#"{"foo":[0,1,2],"bar":[3,4,5]}"#, ".bar | .[:-1]").unwrap(),
            vec!["[3,4]"]
        );
        assert_eq!(
            query(r#"[{"foo":true},{"bar":false}]"#, ".[] | .[]").unwrap(),
            vec!["true", "false"]
        );
    }
}
