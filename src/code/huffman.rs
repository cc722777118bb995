//! Huffman codes.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::error::Result;

use super::{frequencies, Code, CodeTable, Codec, TreeNode};

/// A frequency-optimal prefix code trained on a text.
///
/// Built by repeatedly merging the two lightest subtrees; ties break on
/// insertion order, so construction is deterministic.
#[derive(Debug, Clone, Default)]
pub struct HuffmanCodec {
    table: CodeTable,
}

impl HuffmanCodec {
    /// Train a codec on `text`. An empty text yields an empty codec whose
    /// every encode fails.
    pub fn from_text(text: &str) -> Self {
        let freqs = frequencies(text);
        if freqs.is_empty() {
            return Self::default();
        }

        let mut arena: Vec<TreeNode> = Vec::with_capacity(2 * freqs.len());
        let mut heap = BinaryHeap::new();
        for (&sym, &weight) in &freqs {
            let id = arena.len();
            arena.push(TreeNode {
                weight,
                sym: Some(sym),
                kids: None,
            });
            heap.push(Reverse((weight, id)));
        }

        while heap.len() > 1 {
            let Reverse((lw, left)) = heap.pop().expect("heap has two entries");
            let Reverse((rw, right)) = heap.pop().expect("heap has two entries");
            let id = arena.len();
            arena.push(TreeNode {
                weight: lw + rw,
                sym: None,
                kids: Some((left, right)),
            });
            heap.push(Reverse((lw + rw, id)));
        }

        let Reverse((_, root)) = heap.pop().expect("heap has a root");
        Self {
            table: CodeTable::from_tree(&arena, root),
        }
    }
}

impl Codec for HuffmanCodec {
    fn encode(&self, sym: char) -> Result<Code> {
        self.table.encode(sym)
    }

    fn decode(&self, code: &Code) -> Result<char> {
        self.table.decode(code)
    }
}
