//! Level-order dump of a tree, for debugging.

use std::collections::VecDeque;
use std::fmt;

use super::node::Node;
use super::tree::BPlusTree;

/// Prints every node breadth first, one block per node:
///
/// ```text
/// ---- Elements in Node 1: ----
/// 30
/// ---- Elements in Node 2: ----
/// 10	20
/// ---- Elements in Node 3: ----
/// 30	40
/// ```
impl<K: fmt::Display> fmt::Display for BPlusTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(root) = self.root else {
            return writeln!(f, "<empty>");
        };

        let mut queue = VecDeque::from([root]);
        let mut number = 1;
        while let Some(id) = queue.pop_front() {
            let node = self.arena.get(id);
            writeln!(f, "---- Elements in Node {number}: ----")?;

            let mut keys = node.keys().iter();
            if let Some(first) = keys.next() {
                write!(f, "{first}")?;
                for key in keys {
                    write!(f, "\t{key}")?;
                }
            }
            writeln!(f)?;

            if let Node::Internal(internal) = node {
                queue.extend(internal.children.iter().copied());
            }
            number += 1;
        }
        Ok(())
    }
}

impl<K: Ord + Clone + fmt::Debug + fmt::Display> BPlusTree<K> {
    /// Write the level-order dump to stdout.
    pub fn print_tree(&self) {
        print!("{self}");
    }
}
