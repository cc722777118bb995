//! Succinct JSON documents via semi-indexing.
//!
//! A [`Document`] stores only the *structural skeleton* of a JSON text:
//! one balanced-parenthesis pair per structural token plus an Elias-Fano
//! map from token index back to source byte offset. Sub-values are
//! deserialized lazily, on access, by slicing the original source - the
//! document itself never materializes a parse tree.
//!
//! The skeleton bit layout is exact: `[` and `{` emit `((`, `]` and `}`
//! emit `))`, and `:` and `,` emit `)(`. Strings and primitive literals
//! emit nothing; they are addressed through the token that precedes them.
//! For a skeleton position `pos`, the source offset is
//! `offsets[pos / 2] + pos % 2`, so the odd position of a token pair names
//! the byte right after the token - exactly where a value begins.
//!
//! See "Semi-indexing semi-structured data in tiny space" (Ottaviano &
//! Grossi, CIKM 2012) for the underlying idea.

mod node;

pub use node::{Entries, Items, List, Object, Primitive, Value};

use crate::bits::BitBuf;
use crate::error::{Error, Result};
use crate::intseq::EliasFano;
use crate::trees::{BalancedParens, Navigator, Node};

/// Tokenizer output: skeleton bits plus the source offset of each
/// structural token.
struct Skeleton {
    bv: BitBuf,
    positions: Vec<usize>,
}

/// Scan `src`, emitting two bits per structural token and recording token
/// start offsets. Strings are skipped with backslash-escape handling.
fn tokenize(src: &[u8]) -> Result<Skeleton> {
    let mut bv = BitBuf::new();
    let mut positions = Vec::new();
    let mut i = 0;
    while i < src.len() {
        match src[i] {
            b'[' | b'{' => {
                positions.push(i);
                bv.push(true);
                bv.push(true);
            }
            b']' | b'}' => {
                positions.push(i);
                bv.push(false);
                bv.push(false);
            }
            b':' | b',' => {
                positions.push(i);
                bv.push(false);
                bv.push(true);
            }
            b'"' => {
                i += 1;
                loop {
                    match src.get(i) {
                        None => return Err(Error::parse("unterminated string", i)),
                        Some(b'\\') => i += 2,
                        Some(b'"') => break,
                        Some(_) => i += 1,
                    }
                }
            }
            _ => {}
        }
        i += 1;
    }
    Ok(Skeleton { bv, positions })
}

/// A read-only map from skeleton positions to source byte offsets.
#[derive(Debug, Clone)]
pub struct SourceMap {
    ef: EliasFano,
}

impl SourceMap {
    /// Source byte offset of the skeleton position `pos`.
    ///
    /// Even positions name the first byte of their token; odd positions the
    /// byte just after it.
    pub fn lookup(&self, pos: usize) -> usize {
        let token = self.ef.get(pos / 2).expect("pos within skeleton");
        token + pos % 2
    }

    /// Number of skeleton positions.
    pub fn len(&self) -> usize {
        self.ef.len() * 2
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.ef.is_empty()
    }
}

/// A lazily-deserialized JSON document.
///
/// Owns the source text, the structural navigator, and the source map;
/// rendered values borrow from it.
#[derive(Debug, Clone)]
pub struct Document {
    src: String,
    nav: Navigator,
    map: SourceMap,
}

impl Document {
    /// Index a JSON text.
    ///
    /// The document must be a container (an array or an object); malformed
    /// input is rejected here rather than at query time.
    pub fn new(src: impl Into<String>) -> Result<Self> {
        let src = src.into();
        let skeleton = tokenize(src.as_bytes())?;
        let len = skeleton.bv.len();
        if len < 2 {
            return Err(Error::parse("malformed json", 0));
        }
        let bv = skeleton.bv.freeze();
        if bv.get(len - 1) != Some(false) || bv.get(len - 2) != Some(false) {
            return Err(Error::parse("malformed json", 0));
        }
        let enc =
            BalancedParens::new(bv).map_err(|_| Error::parse("malformed json", 0))?;
        let ef = EliasFano::new(&skeleton.positions).expect("token offsets are increasing");
        Ok(Self {
            src,
            nav: Navigator::new(enc),
            map: SourceMap { ef },
        })
    }

    /// The original source text.
    pub fn source(&self) -> &str {
        &self.src
    }

    /// The structural navigator.
    pub fn navigator(&self) -> &Navigator {
        &self.nav
    }

    /// The skeleton-to-source map.
    pub fn source_map(&self) -> &SourceMap {
        &self.map
    }

    /// The root value of the document.
    pub fn root(&self) -> Value<'_> {
        self.render(self.nav.root())
    }

    /// Render the value addressed by a skeleton node.
    pub(crate) fn render(&self, node: Node<'_>) -> Value<'_> {
        let bytes = self.src.as_bytes();
        let mut at = self.map.lookup(node.pos());
        while at < bytes.len() && bytes[at].is_ascii_whitespace() {
            at += 1;
        }
        match bytes.get(at) {
            Some(b'[') => Value::List(List::enter(self, node.pos())),
            Some(b'{') => Value::Object(Object::enter(self, node.pos())),
            _ => Value::Primitive(Primitive::new(self, node.pos())),
        }
    }

    /// The trimmed source slice covered by the skeleton node at `pos`.
    pub(crate) fn text_of(&self, pos: usize) -> &str {
        let close = self
            .nav
            .encoding()
            .close(pos)
            .expect("value positions are opens");
        let start = self.map.lookup(pos);
        let end = self.map.lookup(close);
        self.src[start..end].trim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_layout() {
        // per token: [ { -> "((", ] } -> "))", : , -> ")("
        let skel = tokenize(br#"{"a":[1,2]}"#).unwrap();
        let positions = skel.positions.clone();
        let bv = skel.bv.freeze();
        let rendered: String = (0..bv.len())
            .map(|i| if bv.get(i).unwrap() { '(' } else { ')' })
            .collect();
        assert_eq!(rendered, "(()((()())))");
        assert_eq!(positions, vec![0, 4, 5, 7, 9, 10]);
    }

    #[test]
    fn test_strings_emit_nothing() {
        let skel = tokenize(br#"["a[b]", "c{d}"]"#).unwrap();
        // only [ , ] are structural
        assert_eq!(skel.positions, vec![0, 7, 15]);
        assert_eq!(skel.bv.len(), 6);
    }

    #[test]
    fn test_escape_handling() {
        // escaped quote and escaped backslash do not end the string
        let skel = tokenize(br#"["a\"b", "c\\", "d"]"#).unwrap();
        assert_eq!(skel.positions, vec![0, 7, 14, 19]);
        assert!(tokenize(br#"["unterminated"#).is_err());
        assert!(tokenize(br#"["tail\"#).is_err());
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(Document::new("").is_err());
        assert!(Document::new("42").is_err());
        assert!(Document::new(r#""bare string""#).is_err());
        assert!(Document::new("[1, 2").is_err());
        assert!(Document::new("1, 2]").is_err());
        assert!(Document::new("[{]").is_err());
    }

    #[test]
    fn test_lookup() {
        let doc = Document::new(r#"{"a": 1}"#).unwrap();
        // tokens: '{' at 0, ':' at 4, '}' at 7
        assert_eq!(doc.source_map().lookup(0), 0);
        assert_eq!(doc.source_map().lookup(1), 1);
        assert_eq!(doc.source_map().lookup(2), 4);
        assert_eq!(doc.source_map().lookup(3), 5);
        assert_eq!(doc.source_map().lookup(4), 7);
        assert_eq!(doc.source_map().len(), 6);
    }
}
