//! Arena-based prefix trie over single-byte [`Code`] sequences.
//!
//! Nodes are stored in a contiguous arena (`Vec<TrieNode>`) and referenced by
//! opaque [`NodeRef`] handles, which are plain indices. The root sits at index
//! 0, has no incoming edge and no code of its own. Every other node is owned by
//! exactly one parent and keyed in that parent's child list by its code.
//!
//! Children of each node are kept sorted by [`Code`] for O(log n) binary
//! search. The structure is append-only: there is no removal.
//!
//! Each node also carries a `terminal` flag set on the last node of every
//! inserted word. Paths alone cannot tell a complete word from a shared
//! prefix of longer words; the flag backs [`PrefixTrie::contains`] and does
//! not affect [`PrefixTrie::lookup`].

use code_core::{Code, UNKNOWN_CODE};
use serde::{Deserialize, Serialize};

/// A node arena that breaks the trie's structural invariants, typically
/// from a hand-edited or truncated snapshot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrieError {
    #[error("trie has no root node")]
    MissingRoot,

    #[error("node {parent} points at child {child}, past the end of {len} nodes")]
    DanglingChild {
        parent: usize,
        child: usize,
        len: usize,
    },

    #[error("node {child} has more than one parent")]
    SharedChild { child: usize },

    #[error("node {child} is not reachable from the root")]
    Orphan { child: usize },

    #[error("children of node {parent} are not strictly sorted by code")]
    UnsortedChildren { parent: usize },
}

/// Opaque handle into the trie's node arena.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct NodeRef(u32);

impl NodeRef {
    /// Convert to usize for indexing into the arena.
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }

    #[inline]
    fn from_usize(index: usize) -> Self {
        NodeRef(index as u32)
    }
}

/// A single node in the prefix trie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrieNode {
    /// Code of the edge that leads to this node. [`UNKNOWN_CODE`] for the root.
    pub code: Code,
    /// Whether some inserted word ends exactly at this node.
    pub terminal: bool,
    /// Child node references, kept sorted by code.
    children: Vec<NodeRef>,
}

impl TrieNode {
    fn new(code: Code) -> Self {
        TrieNode {
            code,
            terminal: false,
            children: Vec::new(),
        }
    }
}

/// Prefix trie of code sequences.
///
/// # Example
///
/// ```
/// use code_core::{Code, UNKNOWN_CODE};
/// use prefix_trie::PrefixTrie;
///
/// let mut trie = PrefixTrie::new();
/// trie.insert(&[Code(2), Code(1), Code(4), Code(1)]); // "casa"
///
/// // A present word comes back unchanged.
/// assert_eq!(trie.lookup(&[Code(2), Code(1), Code(4), Code(1)]).len(), 4);
///
/// // The first missing edge is replaced by the sentinel and descent stops.
/// assert_eq!(
///     trie.lookup(&[Code(2), Code(1), Code(4), Code(3)]),
///     vec![Code(2), Code(1), Code(4), UNKNOWN_CODE],
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixTrie {
    nodes: Vec<TrieNode>,
}

impl PrefixTrie {
    /// Create a trie holding only the root.
    pub fn new() -> Self {
        PrefixTrie {
            nodes: vec![TrieNode::new(UNKNOWN_CODE)],
        }
    }

    #[inline]
    pub fn root(&self) -> NodeRef {
        NodeRef(0)
    }

    /// Access a node by reference.
    #[inline]
    pub fn node(&self, r: NodeRef) -> &TrieNode {
        &self.nodes[r.as_usize()]
    }

    /// Find the child of `parent` reached by `code`.
    pub fn find_child(&self, parent: NodeRef, code: Code) -> Option<NodeRef> {
        let children = &self.nodes[parent.as_usize()].children;
        children
            .binary_search_by(|child| self.nodes[child.as_usize()].code.cmp(&code))
            .ok()
            .map(|idx| children[idx])
    }

    /// Find or create the child of `parent` reached by `code`.
    fn child_or_insert(&mut self, parent: NodeRef, code: Code) -> NodeRef {
        let search = self.nodes[parent.as_usize()]
            .children
            .binary_search_by(|child| self.nodes[child.as_usize()].code.cmp(&code));

        match search {
            Ok(idx) => self.nodes[parent.as_usize()].children[idx],
            Err(idx) => {
                let child = NodeRef::from_usize(self.nodes.len());
                self.nodes.push(TrieNode::new(code));
                self.nodes[parent.as_usize()].children.insert(idx, child);
                child
            }
        }
    }

    /// Insert a code sequence, creating nodes only past the longest existing
    /// prefix. The last node of a non-empty sequence is marked terminal.
    /// Empty input is a no-op.
    pub fn insert(&mut self, codes: &[Code]) {
        if codes.is_empty() {
            return;
        }

        let mut current = self.root();
        for &code in codes {
            current = self.child_or_insert(current, code);
        }
        self.nodes[current.as_usize()].terminal = true;
    }

    /// Best-effort retrieval: walk the path one code per level.
    ///
    /// Each matched edge contributes the stored node's code. At the first
    /// missing edge the sentinel [`UNKNOWN_CODE`] is appended and descent
    /// stops, so the result is as long as the input when the whole path
    /// exists and one past the matched prefix otherwise.
    pub fn lookup(&self, codes: &[Code]) -> Vec<Code> {
        let mut result = Vec::with_capacity(codes.len());
        let mut current = self.root();

        for &code in codes {
            match self.find_child(current, code) {
                Some(child) => {
                    result.push(self.nodes[child.as_usize()].code);
                    current = child;
                }
                None => {
                    result.push(UNKNOWN_CODE);
                    break;
                }
            }
        }

        result
    }

    /// Node at the end of the full path for `codes`, if it exists.
    pub fn walk(&self, codes: &[Code]) -> Option<NodeRef> {
        codes
            .iter()
            .try_fold(self.root(), |node, &code| self.find_child(node, code))
    }

    /// Whether `codes` was inserted as a complete word.
    ///
    /// Unlike [`lookup`](Self::lookup), a path that exists only as the prefix
    /// of longer words is not a match. The empty sequence is never a member.
    pub fn contains(&self, codes: &[Code]) -> bool {
        !codes.is_empty()
            && self
                .walk(codes)
                .is_some_and(|node| self.nodes[node.as_usize()].terminal)
    }

    /// Child references of a node, sorted by code.
    #[inline]
    pub fn children(&self, parent: NodeRef) -> &[NodeRef] {
        &self.nodes[parent.as_usize()].children
    }

    /// Number of children of a node.
    #[inline]
    pub fn branch_count(&self, parent: NodeRef) -> usize {
        self.nodes[parent.as_usize()].children.len()
    }

    /// Number of nodes, not counting the root.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    /// Whether nothing has been inserted.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Number of distinct words inserted.
    pub fn word_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.terminal).count()
    }

    /// Check the arena invariants every query relies on.
    ///
    /// A trie built through [`insert`](Self::insert) always passes. A
    /// deserialized one must be checked before use: the root must exist,
    /// every other node must have exactly one parent, and each child list
    /// must be strictly sorted by code.
    pub fn validate(&self) -> Result<(), TrieError> {
        let len = self.nodes.len();
        if len == 0 {
            return Err(TrieError::MissingRoot);
        }

        let mut owned = vec![false; len];
        // The root has no parent.
        owned[0] = true;

        for (parent, node) in self.nodes.iter().enumerate() {
            for &child in &node.children {
                let child = child.as_usize();
                if child >= len {
                    return Err(TrieError::DanglingChild { parent, child, len });
                }
                if std::mem::replace(&mut owned[child], true) {
                    return Err(TrieError::SharedChild { child });
                }
            }

            let sorted = node.children.windows(2).all(|pair| {
                self.nodes[pair[0].as_usize()].code < self.nodes[pair[1].as_usize()].code
            });
            if !sorted {
                return Err(TrieError::UnsortedChildren { parent });
            }
        }

        // Single parents alone still allow a detached cycle, so walk down
        // from the root as well.
        let mut reached = vec![false; len];
        let mut stack = vec![self.root()];
        while let Some(node) = stack.pop() {
            reached[node.as_usize()] = true;
            stack.extend_from_slice(&self.nodes[node.as_usize()].children);
        }

        match reached.iter().position(|&seen| !seen) {
            Some(child) => Err(TrieError::Orphan { child }),
            None => Ok(()),
        }
    }
}

impl Default for PrefixTrie {
    fn default() -> Self {
        Self::new()
    }
}
