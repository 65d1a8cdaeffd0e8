//! Graphviz DOT export of tree dictionaries.
//!
//! The output is a directed graph with one record-shaped node per key
//! showing `key:frequency` and two anonymous ports for the child edges.
//! Render it with e.g. `dot -Tpdf < graph.dot > graph.pdf`.

use std::io::{self, Write};

use super::tree::{Colour, Node, TreeDictionary, TreeMode};

/// Writes a DOT description of `tree` to `out`.
///
/// Nodes are coloured `red`/`black` in [`TreeMode::RedBlack`], all
/// `black` otherwise. Keys are tokenizer-normalized alphanumeric runs,
/// so they never need DOT escaping.
pub fn write_dot<W: Write>(tree: &TreeDictionary, out: &mut W) -> io::Result<()> {
    writeln!(out, "digraph tree {{")?;
    writeln!(out, "node [shape = Mrecord, penwidth = 2];")?;
    if let Some(root) = tree.root() {
        write_node(root, tree.mode(), out)?;
    }
    writeln!(out, "}}")
}

fn write_node<W: Write>(node: &Node, mode: TreeMode, out: &mut W) -> io::Result<()> {
    let colour = match (mode, node.colour) {
        (TreeMode::RedBlack, Colour::Red) => "red",
        _ => "black",
    };
    writeln!(
        out,
        "\"{}\"[label=\"{{<f0>{}:{}|{{<f1>|<f2>}}}}\"color={}];",
        node.key, node.key, node.frequency, colour
    )?;
    if let Some(left) = node.left.as_deref() {
        write_node(left, mode, out)?;
        writeln!(out, "\"{}\":f1 -> \"{}\":f0;", node.key, left.key)?;
    }
    if let Some(right) = node.right.as_deref() {
        write_node(right, mode, out)?;
        writeln!(out, "\"{}\":f2 -> \"{}\":f0;", node.key, right.key)?;
    }
    Ok(())
}
