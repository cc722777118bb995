//! Property tests for the universal invariants of the structures.

use proptest::prelude::*;

use semidex::code::{AsciiCodec, Code, Codec, HuTuckerCodec, HuffmanCodec};
use semidex::text::{CompressedSuffixArray, SuffixArray};
use semidex::trees::{BalancedParens, Navigator};
use semidex::wavelet::WaveletTree;
use semidex::{jq, BitVec, RankSelect};

fn bits_strategy() -> impl Strategy<Value = Vec<bool>> {
    prop::collection::vec(any::<bool>(), 1..220)
}

/// Random balanced parenthesis strings built from random tree shapes.
fn tree_strategy() -> impl Strategy<Value = String> {
    let leaf = Just("()".to_string());
    leaf.prop_recursive(5, 48, 6, |inner| {
        prop::collection::vec(inner, 0..6).prop_map(|kids| format!("({})", kids.concat()))
    })
}

fn text_strategy() -> impl Strategy<Value = String> {
    "[ab c]{0,40}"
}

proptest! {
    #[test]
    fn prop_rank_sum(bits in bits_strategy()) {
        let bv = BitVec::from_bits(bits.iter().copied());
        for i in 0..bv.len() {
            prop_assert_eq!(
                bv.rank("0", i).unwrap() + bv.rank("1", i).unwrap(),
                i + 1
            );
        }
    }

    #[test]
    fn prop_rank_select_inverse(bits in bits_strategy()) {
        let bv = BitVec::from_bits(bits.iter().copied());
        for p in ["0", "1", "10", "01"] {
            let total = bv.rank(p, bv.len() - 1).unwrap();
            for k in 1..=total {
                let j = bv.select(p, k).unwrap();
                prop_assert_eq!(bv.rank(p, j).unwrap(), k);
            }
            for i in (0..bv.len()).step_by(7) {
                let r = bv.rank(p, i).unwrap();
                if r >= 1 {
                    prop_assert!(bv.select(p, r).unwrap() <= i);
                }
            }
        }
    }

    #[test]
    fn prop_excess_laws(parens in tree_strategy()) {
        let enc = BalancedParens::from_parens(&parens).unwrap();
        let n = enc.len();
        prop_assert_eq!(enc.excess(n - 1), 0);
        let mut prev = 0isize;
        for i in 0..n {
            let e = enc.excess(i);
            prop_assert!(e >= 0);
            prop_assert_eq!((e - prev).abs(), 1);
            prev = e;
        }
    }

    #[test]
    fn prop_open_close_inverse(parens in tree_strategy()) {
        let enc = BalancedParens::from_parens(&parens).unwrap();
        for (i, c) in parens.chars().enumerate() {
            if c == '(' {
                let close = enc.close(i).unwrap();
                prop_assert_eq!(enc.open(close).unwrap(), i);
            } else {
                let open = enc.open(i).unwrap();
                prop_assert_eq!(enc.close(open).unwrap(), i);
            }
        }
    }

    #[test]
    fn prop_tree_invariants(parens in tree_strategy()) {
        let nav = Navigator::new(BalancedParens::from_parens(&parens).unwrap());

        let degree_sum: usize = nav.iter().map(|n| n.degree()).sum();
        prop_assert_eq!(degree_sum, nav.len() - 1);

        for node in nav.iter() {
            for (k, child) in node.children().enumerate() {
                prop_assert_eq!(node.child(k), Some(child));
                prop_assert_eq!(child.parent(), Some(node));
                prop_assert!(node.rank() < child.rank());
                prop_assert_eq!(child.childrank(), k + 1);
            }
            prop_assert!(node.child(node.degree()).is_none());
        }
    }

    #[test]
    fn prop_order_bijections(parens in tree_strategy()) {
        let nav = Navigator::new(BalancedParens::from_parens(&parens).unwrap());
        for k in 0..nav.len() {
            let pre = nav.get(k).unwrap();
            prop_assert_eq!(pre.rank(), k);
            let post = nav.postselect(k).unwrap();
            prop_assert_eq!(nav.node(post).unwrap().postrank(), k);
        }
    }

    #[test]
    fn prop_lca(parens in tree_strategy()) {
        let nav = Navigator::new(BalancedParens::from_parens(&parens).unwrap());
        let nodes: Vec<_> = nav.iter().collect();
        for (i, &a) in nodes.iter().enumerate().step_by(3) {
            for &b in nodes.iter().skip(i).step_by(4) {
                let lca = a.lca(b);
                prop_assert_eq!(a.lca(b), b.lca(a));
                prop_assert!(lca.is_ancestor(a));
                prop_assert!(lca.is_ancestor(b));
                // no child of the lca is an ancestor of both
                for child in lca.children() {
                    prop_assert!(!(child.is_ancestor(a) && child.is_ancestor(b)));
                }
            }
        }
    }

    #[test]
    fn prop_codec_roundtrip(text in "[a-z A-Z]{0,60}") {
        let huffman = HuffmanCodec::from_text(&text);
        let hu_tucker = HuTuckerCodec::from_text(&text);
        let ascii = AsciiCodec;
        for sym in text.chars() {
            prop_assert_eq!(huffman.decode(&huffman.encode(sym).unwrap()).unwrap(), sym);
            prop_assert_eq!(
                hu_tucker.decode(&hu_tucker.encode(sym).unwrap()).unwrap(),
                sym
            );
            prop_assert_eq!(ascii.decode(&ascii.encode(sym).unwrap()).unwrap(), sym);
        }
    }

    #[test]
    fn prop_hu_tucker_preserves_order(text in "[a-z]{1,60}") {
        let codec = HuTuckerCodec::from_text(&text);
        let mut syms: Vec<char> = text.chars().collect();
        syms.sort_unstable();
        syms.dedup();
        let codes: Vec<Code> = syms
            .iter()
            .map(|&s| codec.encode(s).unwrap())
            .collect();
        for pair in codes.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn prop_wavelet_matches_naive(text in "[a-h]{1,50}") {
        let tree = WaveletTree::new(&text, HuffmanCodec::from_text(&text)).unwrap();
        let chars: Vec<char> = text.chars().collect();
        for (i, &sym) in chars.iter().enumerate() {
            prop_assert_eq!(tree.get(i).unwrap(), sym);
            let naive = chars[..=i].iter().filter(|&&x| x == sym).count();
            prop_assert_eq!(tree.rank(sym, i).unwrap(), naive);
            prop_assert_eq!(tree.select(sym, naive).unwrap(), i);
        }
    }

    #[test]
    fn prop_text_counts(text in text_strategy(), pattern in "[ab c]{0,4}") {
        let sa = SuffixArray::build(text.clone());
        let csa = CompressedSuffixArray::build(&text);
        let naive = if pattern.is_empty() {
            text.len() + 1
        } else {
            (0..text.len()).filter(|&i| text[i..].starts_with(&pattern)).count()
        };
        prop_assert_eq!(sa.count(&pattern), naive);
        prop_assert_eq!(csa.count(&pattern), naive);
        if !pattern.is_empty() {
            let mut idx = sa.indexes(&pattern);
            idx.sort_unstable();
            let naive_idx: Vec<usize> =
                (0..text.len()).filter(|&i| text[i..].starts_with(&pattern)).collect();
            prop_assert_eq!(idx, naive_idx);
        }
    }
}

/// Random JSON documents with container roots.
fn json_strategy() -> impl Strategy<Value = serde_json::Value> {
    let leaf = prop_oneof![
        Just(serde_json::Value::Null),
        any::<bool>().prop_map(serde_json::Value::from),
        any::<i32>().prop_map(serde_json::Value::from),
        "[a-z ]{0,8}".prop_map(serde_json::Value::from),
    ];
    let value = leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(serde_json::Value::Array),
            prop::collection::btree_map("[a-z]{1,4}", inner, 0..4)
                .prop_map(|m| m.into_iter().collect::<serde_json::Value>()),
        ]
    });
    prop::collection::vec(value, 0..4).prop_map(serde_json::Value::Array)
}

proptest! {
    #[test]
    fn prop_json_identity_roundtrip(doc in json_strategy()) {
        let src = serde_json::to_string(&doc).unwrap();
        let results = jq::query(&src, ".").unwrap();
        prop_assert_eq!(results.len(), 1);
        let parsed: serde_json::Value = serde_json::from_str(&results[0]).unwrap();
        prop_assert_eq!(parsed, doc);
    }

    #[test]
    fn prop_json_iterate_matches_elements(doc in json_strategy()) {
        let src = serde_json::to_string(&doc).unwrap();
        let results = jq::query(&src, ".[]").unwrap();
        let elements = doc.as_array().unwrap();
        prop_assert_eq!(results.len(), elements.len());
        for (result, element) in results.iter().zip(elements) {
            let parsed: serde_json::Value = serde_json::from_str(result).unwrap();
            prop_assert_eq!(&parsed, element);
        }
    }
}
