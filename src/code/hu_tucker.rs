//! Hu-Tucker codes: optimal prefix codes preserving alphabet order.
//!
//! Construction follows the Garsia-Wachs algorithm in two phases. The first
//! phase repeatedly merges the leftmost adjacent pair `(i - 1, i)` whose
//! left outer neighbor is no heavier than its right outer neighbor, keeping
//! the working list sorted by re-inserting each merged node below the
//! nearest heavier-or-equal element. The shape of this intermediate tree is
//! discarded; only the depth it assigns to each symbol survives. The second
//! phase rebuilds a tree that places the symbols at those depths in
//! alphabet order, which yields codewords whose lexicographic order agrees
//! with the symbol order.

use std::collections::HashMap;

use crate::error::Result;

use super::{frequencies, Code, CodeTable, Codec, TreeNode};

/// An alphabet-ordered optimal prefix code trained on a text.
#[derive(Debug, Clone, Default)]
pub struct HuTuckerCodec {
    table: CodeTable,
}

impl HuTuckerCodec {
    /// Train a codec on `text`. An empty text yields an empty codec whose
    /// every encode fails.
    pub fn from_text(text: &str) -> Self {
        let freqs = frequencies(text);
        if freqs.is_empty() {
            return Self::default();
        }

        let mut alphabet: Vec<char> = freqs.keys().copied().collect();
        alphabet.sort_unstable();

        let mut arena: Vec<TreeNode> = alphabet
            .iter()
            .map(|&sym| TreeNode {
                weight: freqs[&sym],
                sym: Some(sym),
                kids: None,
            })
            .collect();
        let mut order: Vec<usize> = (0..arena.len()).collect();

        // phase one: merge pairs, recording only the resulting leaf depths
        while order.len() > 1 {
            let mut tgt = order.len() - 1;
            for idx in 1..order.len() - 1 {
                if arena[order[idx - 1]].weight <= arena[order[idx + 1]].weight {
                    tgt = idx;
                    break;
                }
            }
            let left = order[tgt - 1];
            let right = order[tgt];
            let merged = arena.len();
            arena.push(TreeNode {
                weight: arena[left].weight + arena[right].weight,
                sym: None,
                kids: Some((left, right)),
            });

            let mut inserted = false;
            for ins in (1..tgt).rev() {
                if arena[order[ins - 1]].weight >= arena[merged].weight {
                    order.insert(ins, merged);
                    inserted = true;
                    break;
                }
            }
            if !inserted {
                order.insert(0, merged);
            }
            order.retain(|&id| id != left && id != right);
        }

        let mut depths: HashMap<char, usize> = HashMap::new();
        let mut stack = vec![(order[0], 0usize)];
        while let Some((id, depth)) = stack.pop() {
            match (arena[id].sym, arena[id].kids) {
                (Some(sym), _) => {
                    depths.insert(sym, depth);
                }
                (None, Some((left, right))) => {
                    stack.push((right, depth + 1));
                    stack.push((left, depth + 1));
                }
                (None, None) => unreachable!("internal node has children"),
            }
        }

        // phase two: rebuild with the leaves at their recorded depths, in
        // alphabet order
        let mut rebuilt: Vec<TreeNode> = vec![TreeNode::default()];
        let mut paths = vec![(0usize, 0usize)];
        for &sym in &alphabet {
            let want = depths[&sym];
            loop {
                let (node, depth) = paths.pop().expect("depths admit an ordered tree");
                if want == depth {
                    rebuilt[node].sym = Some(sym);
                    break;
                }
                if want > depth {
                    let left = rebuilt.len();
                    rebuilt.push(TreeNode::default());
                    let right = rebuilt.len();
                    rebuilt.push(TreeNode::default());
                    rebuilt[node].kids = Some((left, right));
                    paths.push((right, depth + 1));
                    paths.push((left, depth + 1));
                }
                // want < depth: this slot stays an internal stub; keep popping
            }
        }

        Self {
            table: CodeTable::from_tree(&rebuilt, 0),
        }
    }
}

impl Codec for HuTuckerCodec {
    fn encode(&self, sym: char) -> Result<Code> {
        self.table.encode(sym)
    }

    fn decode(&self, code: &Code) -> Result<char> {
        self.table.decode(code)
    }
}
