//! Rendered JSON values: non-owning views into a [`Document`].

use crate::trees::Node;

use super::Document;

/// A value in a JSON document, rendered from a skeleton node.
#[derive(Debug, Clone, Copy)]
pub enum Value<'d> {
    List(List<'d>),
    Object(Object<'d>),
    Primitive(Primitive<'d>),
}

impl<'d> Value<'d> {
    /// The trimmed source text of this value.
    pub fn text(&self) -> &'d str {
        match self {
            Value::List(v) => v.text(),
            Value::Object(v) => v.text(),
            Value::Primitive(v) => v.text(),
        }
    }

    /// A short name for the value's shape, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::List(_) => "list",
            Value::Object(_) => "object",
            Value::Primitive(_) => "primitive",
        }
    }
}

/// A JSON array.
#[derive(Debug, Clone, Copy)]
pub struct List<'d> {
    doc: &'d Document,
    pos: usize,
}

impl<'d> List<'d> {
    /// Enter a container node. Odd skeleton positions address the token
    /// before the container; advance to the container's own pair.
    pub(crate) fn enter(doc: &'d Document, pos: usize) -> Self {
        Self {
            doc,
            pos: pos + pos % 2,
        }
    }

    fn node(&self) -> Node<'d> {
        self.doc.navigator().node_at(self.pos)
    }

    /// True for `[]`: the skeleton gives every container one child slot,
    /// and in an empty container that slot points at the closing bracket.
    fn phantom(&self) -> bool {
        let bytes = self.doc.source().as_bytes();
        let mut at = self.doc.source_map().lookup(self.pos + 1);
        while at < bytes.len() && bytes[at].is_ascii_whitespace() {
            at += 1;
        }
        matches!(bytes.get(at), Some(b']' | b'}'))
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        if self.phantom() {
            0
        } else {
            self.node().degree()
        }
    }

    /// Whether the list has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The element at `index`; negative indices count from the end.
    /// `None` when out of range.
    pub fn get(&self, index: i64) -> Option<Value<'d>> {
        let len = self.len() as i64;
        let index = if index < 0 { index + len } else { index };
        if index < 0 || index >= len {
            return None;
        }
        let child = self.node().child(index as usize)?;
        Some(self.doc.render(child))
    }

    /// The elements selected by a python-style slice; out-of-range bounds
    /// are clamped.
    pub fn slice(&self, start: Option<i64>, end: Option<i64>) -> Vec<Value<'d>> {
        let len = self.len() as i64;
        let clamp = |bound: Option<i64>, default: i64| -> i64 {
            match bound {
                None => default,
                Some(v) if v < 0 => (v + len).clamp(0, len),
                Some(v) => v.clamp(0, len),
            }
        };
        let s = clamp(start, 0);
        let e = clamp(end, len);
        (s..e).filter_map(|k| self.get(k)).collect()
    }

    /// Iterate the elements in order.
    pub fn iter(&self) -> Items<'d> {
        Items {
            doc: self.doc,
            children: (!self.phantom()).then(|| self.node().children()),
        }
    }

    /// The trimmed source text of the whole list.
    pub fn text(&self) -> &'d str {
        self.doc.text_of(self.pos)
    }
}

impl<'a, 'd> IntoIterator for &'a List<'d> {
    type Item = Value<'d>;
    type IntoIter = Items<'d>;

    fn into_iter(self) -> Items<'d> {
        self.iter()
    }
}

/// Iterator over list elements (or object values).
pub struct Items<'d> {
    doc: &'d Document,
    children: Option<crate::trees::Children<'d>>,
}

impl<'d> Iterator for Items<'d> {
    type Item = Value<'d>;

    fn next(&mut self) -> Option<Value<'d>> {
        let child = self.children.as_mut()?.next()?;
        Some(self.doc.render(child))
    }
}

/// A JSON object.
#[derive(Debug, Clone, Copy)]
pub struct Object<'d> {
    doc: &'d Document,
    pos: usize,
}

impl<'d> Object<'d> {
    pub(crate) fn enter(doc: &'d Document, pos: usize) -> Self {
        Self {
            doc,
            pos: pos + pos % 2,
        }
    }

    fn node(&self) -> Node<'d> {
        self.doc.navigator().node_at(self.pos)
    }

    /// Number of key/value entries.
    pub fn len(&self) -> usize {
        self.node().degree() / 2
    }

    /// Whether the object has no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate `(key, value)` entries in document order.
    ///
    /// Keys are the raw source content of the key strings: surrounding
    /// quotes stripped, escape sequences untouched.
    pub fn entries(&self) -> Entries<'d> {
        Entries {
            doc: self.doc,
            children: self.node().children(),
        }
    }

    /// Iterate the entry values in document order.
    pub fn values(&self) -> impl Iterator<Item = Value<'d>> {
        self.entries().map(|(_, v)| v)
    }

    /// The value at `key`, or `None` when absent (linear scan).
    pub fn get(&self, key: &str) -> Option<Value<'d>> {
        self.entries().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// The trimmed source text of the whole object.
    pub fn text(&self) -> &'d str {
        self.doc.text_of(self.pos)
    }
}

/// Iterator over object entries.
pub struct Entries<'d> {
    doc: &'d Document,
    children: crate::trees::Children<'d>,
}

impl<'d> Iterator for Entries<'d> {
    type Item = (&'d str, Value<'d>);

    fn next(&mut self) -> Option<(&'d str, Value<'d>)> {
        let key = self.children.next()?;
        let value = self.children.next()?;
        let text = self.doc.text_of(key.pos());
        let key = text
            .strip_prefix('"')
            .and_then(|t| t.strip_suffix('"'))
            .unwrap_or(text);
        Some((key, self.doc.render(value)))
    }
}

/// A JSON primitive: string, number, boolean, or null.
#[derive(Debug, Clone, Copy)]
pub struct Primitive<'d> {
    doc: &'d Document,
    pos: usize,
}

impl<'d> Primitive<'d> {
    pub(crate) fn new(doc: &'d Document, pos: usize) -> Self {
        Self { doc, pos }
    }

    /// The trimmed source text of the primitive.
    pub fn text(&self) -> &'d str {
        self.doc.text_of(self.pos)
    }

    /// The content of a string primitive (quotes stripped, escapes
    /// untouched), or the raw text for other primitives.
    pub fn content(&self) -> &'d str {
        let text = self.text();
        text.strip_prefix('"')
            .and_then(|t| t.strip_suffix('"'))
            .unwrap_or(text)
    }
}
