//! Ordered word-frequency tree, plain or red-black balanced.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use super::{Dictionary, DictionaryError};

/// Balancing mode, fixed for the lifetime of a tree.
///
/// Stored on the instance rather than in any shared state, so multiple
/// independently configured trees can coexist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TreeMode {
    /// Plain binary search tree; insertion order dictates the shape.
    Bst,
    /// Red-black balanced tree with height bounded to O(log n).
    RedBlack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Colour {
    Red,
    Black,
}

#[derive(Debug)]
pub(crate) struct Node {
    pub(crate) key: SmolStr,
    pub(crate) frequency: u32,
    pub(crate) colour: Colour,
    pub(crate) left: Option<Box<Node>>,
    pub(crate) right: Option<Box<Node>>,
}

impl Node {
    fn new(key: &str) -> Box<Node> {
        Box::new(Node {
            key: SmolStr::new(key),
            frequency: 1,
            // meaningful only in red-black mode; plain BSTs ignore it
            colour: Colour::Red,
            left: None,
            right: None,
        })
    }
}

/// Ordered word-frequency dictionary.
///
/// Keys follow strict binary-search-tree ordering under byte-wise string
/// comparison. In [`TreeMode::RedBlack`] the classic insertion fixup runs
/// as the recursion unwinds and the root is forced black afterwards,
/// maintaining the red-black invariants after every insert.
#[derive(Debug)]
pub struct TreeDictionary {
    mode: TreeMode,
    root: Option<Box<Node>>,
    len: usize,
}

fn is_red(node: Option<&Node>) -> bool {
    node.map_or(false, |n| n.colour == Colour::Red)
}

fn left_of(node: Option<&Node>) -> Option<&Node> {
    node.and_then(|n| n.left.as_deref())
}

fn right_of(node: Option<&Node>) -> Option<&Node> {
    node.and_then(|n| n.right.as_deref())
}

fn paint(node: Option<&mut Node>, colour: Colour) {
    if let Some(node) = node {
        node.colour = colour;
    }
}

fn rotate_left(mut root: Box<Node>) -> Box<Node> {
    match root.right.take() {
        None => root,
        Some(mut pivot) => {
            log::trace!("left rotation at {}", root.key);
            root.right = pivot.left.take();
            pivot.left = Some(root);
            pivot
        }
    }
}

fn rotate_right(mut root: Box<Node>) -> Box<Node> {
    match root.left.take() {
        None => root,
        Some(mut pivot) => {
            log::trace!("right rotation at {}", root.key);
            root.left = pivot.right.take();
            pivot.right = Some(root);
            pivot
        }
    }
}

/// Repairs a red-red violation between `node`'s child and grandchild.
///
/// Four local shapes (left-left, left-right, right-left, right-right),
/// each split on the colour of the opposite child: red sibling means
/// recolour and let the violation propagate upward, black sibling means
/// rotate (inner rotation first for the zig-zag shapes) and stop.
fn fix_up(mut node: Box<Node>) -> Box<Node> {
    if is_red(node.left.as_deref()) && is_red(left_of(node.left.as_deref())) {
        if is_red(node.right.as_deref()) {
            node.colour = Colour::Red;
            paint(node.left.as_deref_mut(), Colour::Black);
            paint(node.right.as_deref_mut(), Colour::Black);
        } else {
            node = rotate_right(node);
            node.colour = Colour::Black;
            paint(node.right.as_deref_mut(), Colour::Red);
        }
    } else if is_red(node.left.as_deref()) && is_red(right_of(node.left.as_deref())) {
        if is_red(node.right.as_deref()) {
            node.colour = Colour::Red;
            paint(node.left.as_deref_mut(), Colour::Black);
            paint(node.right.as_deref_mut(), Colour::Black);
        } else {
            if let Some(left) = node.left.take() {
                node.left = Some(rotate_left(left));
            }
            node = rotate_right(node);
            node.colour = Colour::Black;
            paint(node.right.as_deref_mut(), Colour::Red);
        }
    } else if is_red(node.right.as_deref()) && is_red(left_of(node.right.as_deref())) {
        if is_red(node.left.as_deref()) {
            node.colour = Colour::Red;
            paint(node.left.as_deref_mut(), Colour::Black);
            paint(node.right.as_deref_mut(), Colour::Black);
        } else {
            if let Some(right) = node.right.take() {
                node.right = Some(rotate_right(right));
            }
            node = rotate_left(node);
            node.colour = Colour::Black;
            paint(node.left.as_deref_mut(), Colour::Red);
        }
    } else if is_red(node.right.as_deref()) && is_red(right_of(node.right.as_deref())) {
        if is_red(node.left.as_deref()) {
            node.colour = Colour::Red;
            paint(node.left.as_deref_mut(), Colour::Black);
            paint(node.right.as_deref_mut(), Colour::Black);
        } else {
            node = rotate_left(node);
            node.colour = Colour::Black;
            paint(node.left.as_deref_mut(), Colour::Red);
        }
    }
    node
}

fn insert_node(node: Option<Box<Node>>, word: &str, mode: TreeMode) -> (Box<Node>, bool) {
    let (mut node, inserted) = match node {
        None => (Node::new(word), true),
        Some(mut node) => {
            let inserted = match word.cmp(node.key.as_str()) {
                Ordering::Less => {
                    let (child, inserted) = insert_node(node.left.take(), word, mode);
                    node.left = Some(child);
                    inserted
                }
                Ordering::Greater => {
                    let (child, inserted) = insert_node(node.right.take(), word, mode);
                    node.right = Some(child);
                    inserted
                }
                Ordering::Equal => {
                    node.frequency += 1;
                    false
                }
            };
            (node, inserted)
        }
    };
    if mode == TreeMode::RedBlack {
        node = fix_up(node);
    }
    (node, inserted)
}

fn search_node(node: Option<&Node>, word: &str) -> u32 {
    match node {
        None => 0,
        Some(node) => match word.cmp(node.key.as_str()) {
            Ordering::Less => search_node(node.left.as_deref(), word),
            Ordering::Greater => search_node(node.right.as_deref(), word),
            Ordering::Equal => node.frequency,
        },
    }
}

fn inorder_node<F>(node: Option<&Node>, visit: &mut F)
where
    F: FnMut(&str, u32),
{
    if let Some(node) = node {
        inorder_node(node.left.as_deref(), visit);
        visit(&node.key, node.frequency);
        inorder_node(node.right.as_deref(), visit);
    }
}

fn preorder_node<F>(node: Option<&Node>, visit: &mut F)
where
    F: FnMut(&str, u32),
{
    if let Some(node) = node {
        visit(&node.key, node.frequency);
        preorder_node(node.left.as_deref(), visit);
        preorder_node(node.right.as_deref(), visit);
    }
}

impl TreeDictionary {
    /// Creates an empty tree in the given mode.
    pub fn new(mode: TreeMode) -> TreeDictionary {
        TreeDictionary {
            mode,
            root: None,
            len: 0,
        }
    }

    /// The balancing mode this tree was built with.
    pub fn mode(&self) -> TreeMode {
        self.mode
    }

    /// Records one occurrence of `word`. Never fails; the tree grows as
    /// needed.
    pub fn insert(&mut self, word: &str) {
        let (mut root, inserted) = insert_node(self.root.take(), word, self.mode);
        if self.mode == TreeMode::RedBlack {
            root.colour = Colour::Black;
        }
        self.root = Some(root);
        if inserted {
            self.len += 1;
        }
    }

    /// Returns the stored frequency of `word`, `0` when absent.
    pub fn search(&self, word: &str) -> u32 {
        search_node(self.root.as_deref(), word)
    }

    /// Visits every `(key, frequency)` pair in sorted key order.
    pub fn inorder<F>(&self, mut visit: F)
    where
        F: FnMut(&str, u32),
    {
        inorder_node(self.root.as_deref(), &mut visit);
    }

    /// Visits every `(key, frequency)` pair root-first.
    pub fn preorder<F>(&self, mut visit: F)
    where
        F: FnMut(&str, u32),
    {
        preorder_node(self.root.as_deref(), &mut visit);
    }

    /// Number of distinct words stored.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no word has been inserted yet.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        fn depth(node: Option<&Node>) -> usize {
            match node {
                None => 0,
                Some(node) => 1 + depth(node.left.as_deref()).max(depth(node.right.as_deref())),
            }
        }
        depth(self.root.as_deref())
    }

    pub(crate) fn root(&self) -> Option<&Node> {
        self.root.as_deref()
    }
}

impl Drop for TreeDictionary {
    fn drop(&mut self) {
        // Sorted input builds an O(n)-deep chain; tear it down with an
        // explicit stack instead of recursing through nested Box drops.
        let mut pending = Vec::new();
        pending.extend(self.root.take());
        while let Some(mut node) = pending.pop() {
            pending.extend(node.left.take());
            pending.extend(node.right.take());
        }
    }
}

impl Dictionary for TreeDictionary {
    fn insert(&mut self, word: &str) -> Result<(), DictionaryError> {
        TreeDictionary::insert(self, word);
        Ok(())
    }

    fn search(&self, word: &str) -> u32 {
        TreeDictionary::search(self, word)
    }

    fn len(&self) -> usize {
        TreeDictionary::len(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODES: [TreeMode; 2] = [TreeMode::Bst, TreeMode::RedBlack];

    fn collect_inorder(tree: &TreeDictionary) -> Vec<(String, u32)> {
        let mut pairs = Vec::new();
        tree.inorder(|key, frequency| pairs.push((key.to_string(), frequency)));
        pairs
    }

    /// Checks the red-black invariants below `node` and returns the
    /// black-height of the subtree.
    fn black_height(node: Option<&Node>) -> usize {
        match node {
            None => 1,
            Some(n) => {
                if n.colour == Colour::Red {
                    assert!(
                        !is_red(n.left.as_deref()) && !is_red(n.right.as_deref()),
                        "red node {:?} has a red child",
                        n.key
                    );
                }
                let left = black_height(n.left.as_deref());
                let right = black_height(n.right.as_deref());
                assert_eq!(left, right, "black-height mismatch under {:?}", n.key);
                left + usize::from(n.colour == Colour::Black)
            }
        }
    }

    fn assert_red_black_invariants(tree: &TreeDictionary) {
        assert!(!is_red(tree.root()), "root must be black");
        black_height(tree.root());
    }

    #[test]
    fn inorder_is_sorted_for_every_insertion_order() {
        let orders: [&[&str]; 4] = [
            &["delta", "alpha", "echo", "bravo", "charlie"],
            &["alpha", "bravo", "charlie", "delta", "echo"],
            &["echo", "delta", "charlie", "bravo", "alpha"],
            &["charlie", "echo", "alpha", "delta", "bravo"],
        ];

        for mode in MODES {
            for order in orders {
                let mut tree = TreeDictionary::new(mode);
                for word in order {
                    tree.insert(word);

                    let keys: Vec<String> =
                        collect_inorder(&tree).into_iter().map(|(k, _)| k).collect();
                    let mut sorted = keys.clone();
                    sorted.sort();
                    sorted.dedup();
                    assert_eq!(keys, sorted, "mode {:?}, order {:?}", mode, order);
                }
            }
        }
    }

    #[test]
    fn repeated_words_only_bump_frequency() {
        let mut tree = TreeDictionary::new(TreeMode::RedBlack);
        for word in ["pear", "apple", "pear"] {
            tree.insert(word);
        }

        assert_eq!(
            collect_inorder(&tree),
            vec![("apple".to_string(), 1), ("pear".to_string(), 2)]
        );
        assert_eq!(tree.len(), 2);
        assert!(!is_red(tree.root()));
    }

    #[test]
    fn search_finds_true_occurrence_counts() {
        for mode in MODES {
            let mut tree = TreeDictionary::new(mode);
            let words = ["fig", "date", "fig", "apple", "fig", "date"];
            for word in words {
                tree.insert(word);
            }

            assert_eq!(tree.search("fig"), 3);
            assert_eq!(tree.search("date"), 2);
            assert_eq!(tree.search("apple"), 1);
            assert_eq!(tree.search("grape"), 0);
        }
    }

    #[test]
    fn preorder_visits_root_first() {
        let mut tree = TreeDictionary::new(TreeMode::Bst);
        for word in ["m", "d", "s"] {
            tree.insert(word);
        }

        let mut keys = Vec::new();
        tree.preorder(|key, _| keys.push(key.to_string()));
        assert_eq!(keys, vec!["m", "d", "s"]);
    }

    #[test]
    fn red_black_invariants_hold_after_every_insertion() {
        let words = [
            "november", "alpha", "zulu", "kilo", "echo", "tango", "bravo", "yankee", "golf",
            "mike", "sierra", "charlie", "whiskey", "delta", "hotel", "romeo", "india",
            "quebec", "juliett", "papa", "foxtrot", "oscar", "lima", "uniform", "victor",
            "xray",
        ];

        let mut tree = TreeDictionary::new(TreeMode::RedBlack);
        for word in words {
            tree.insert(word);
            assert_red_black_invariants(&tree);
        }
        assert_eq!(tree.len(), words.len());
    }

    #[test]
    fn red_black_invariants_hold_under_sorted_insertion() {
        let mut tree = TreeDictionary::new(TreeMode::RedBlack);
        for i in 0..100 {
            tree.insert(&format!("w{:03}", i));
            assert_red_black_invariants(&tree);
        }
    }

    #[test]
    fn balancing_bounds_the_height_of_sorted_input() {
        let mut bst = TreeDictionary::new(TreeMode::Bst);
        let mut rbt = TreeDictionary::new(TreeMode::RedBlack);
        for i in 0..100 {
            let word = format!("w{:03}", i);
            bst.insert(&word);
            rbt.insert(&word);
        }

        // a plain BST degenerates to a chain on sorted input
        assert_eq!(bst.height(), 100);
        // red-black height is at most 2 * log2(n + 1)
        assert!(rbt.height() <= 14, "height {}", rbt.height());
    }

    #[test]
    fn empty_tree_behaves() {
        let tree = TreeDictionary::new(TreeMode::RedBlack);
        assert!(tree.is_empty());
        assert_eq!(tree.search("anything"), 0);
        assert_eq!(tree.height(), 0);
        let mut visited = 0;
        tree.inorder(|_, _| visited += 1);
        assert_eq!(visited, 0);
    }

    #[test]
    fn degenerate_chains_drop_cleanly() {
        let mut tree = TreeDictionary::new(TreeMode::Bst);
        for i in 0..2_000 {
            tree.insert(&format!("w{:06}", i));
        }
        assert_eq!(tree.height(), 2_000);
        drop(tree);
    }
}
