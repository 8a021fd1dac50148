//! Splay tree memoization store
//!
//! Unbounded ordered map where every access, hit or miss, splays the
//! accessed path so recently used keys migrate toward the root. Nodes own
//! their children outright, so each rotation is a pair of `Box` moves.
//!
//! Splaying is bottom-up: the access path is detached onto an explicit
//! stack and zig, zig-zig and zig-zag steps are applied while it unwinds,
//! so path-shaped trees cost heap, never call stack.

use std::cmp::Ordering;
use tracing::trace;

type Link<K, V> = Option<Box<Node<K, V>>>;

struct Node<K, V> {
    key: K,
    value: V,
    left: Link<K, V>,
    right: Link<K, V>,
}

impl<K, V> Node<K, V> {
    fn new(key: K, value: V) -> Box<Self> {
        Box::new(Self {
            key,
            value,
            left: None,
            right: None,
        })
    }
}

/// Self-adjusting binary search tree with no eviction
pub struct SplayTree<K, V> {
    root: Link<K, V>,
    len: usize,
    rotations: u64,
}

impl<K: Ord, V> SplayTree<K, V> {
    /// Create an empty tree
    pub fn new() -> Self {
        Self {
            root: None,
            len: 0,
            rotations: 0,
        }
    }

    /// Splay toward `key` and return its value if it is now the root
    ///
    /// A miss still restructures the tree around the last node on the
    /// search path.
    pub fn search(&mut self, key: &K) -> Option<&V> {
        let root = self.root.take()?;
        self.root = Some(self.splay_root(root, key));

        match &self.root {
            Some(node) if node.key == *key => Some(&node.value),
            _ => None,
        }
    }

    /// Insert `key` as the new root unless it is already present
    ///
    /// An existing value is never overwritten. Returns true if a node was added.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        let mut root = match self.root.take() {
            Some(root) => self.splay_root(root, &key),
            None => {
                self.root = Some(Node::new(key, value));
                self.len = 1;
                return true;
            }
        };

        let mut node = Node::new(key, value);
        match node.key.cmp(&root.key) {
            Ordering::Equal => {
                self.root = Some(root);
                return false;
            }
            Ordering::Less => {
                node.left = root.left.take();
                node.right = Some(root);
            }
            Ordering::Greater => {
                node.right = root.right.take();
                node.left = Some(root);
            }
        }

        self.root = Some(node);
        self.len += 1;
        true
    }

    /// Key currently at the root
    pub fn root_key(&self) -> Option<&K> {
        self.root.as_ref().map(|node| &node.key)
    }

    /// Keys in ascending (in-order) order
    pub fn keys_in_order(&self) -> Vec<&K> {
        let mut keys = Vec::with_capacity(self.len);
        let mut stack: Vec<&Node<K, V>> = Vec::new();
        let mut cursor = self.root.as_deref();

        loop {
            while let Some(node) = cursor {
                stack.push(node);
                cursor = node.left.as_deref();
            }
            match stack.pop() {
                Some(node) => {
                    keys.push(&node.key);
                    cursor = node.right.as_deref();
                }
                None => break,
            }
        }

        keys
    }

    /// Number of nodes on the longest root-to-leaf path
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack: Vec<(&Node<K, V>, usize)> = Vec::new();
        if let Some(root) = self.root.as_deref() {
            stack.push((root, 1));
        }

        while let Some((node, depth)) = stack.pop() {
            height = height.max(depth);
            if let Some(left) = node.left.as_deref() {
                stack.push((left, depth + 1));
            }
            if let Some(right) = node.right.as_deref() {
                stack.push((right, depth + 1));
            }
        }

        height
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the tree is empty
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Total rotations performed since creation
    pub fn rotations(&self) -> u64 {
        self.rotations
    }

    fn splay_root(&mut self, root: Box<Node<K, V>>, key: &K) -> Box<Node<K, V>> {
        let before = self.rotations;
        let root = splay(root, key, &mut self.rotations);
        trace!(rotations = self.rotations - before, "splayed");
        root
    }
}

impl<K: Ord, V> Default for SplayTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Drop for SplayTree<K, V> {
    // Recursive Box drops would overflow on path-shaped trees.
    fn drop(&mut self) {
        let mut stack: Vec<Box<Node<K, V>>> = self.root.take().into_iter().collect();
        while let Some(mut node) = stack.pop() {
            if let Some(left) = node.left.take() {
                stack.push(left);
            }
            if let Some(right) = node.right.take() {
                stack.push(right);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

impl<K, V> Node<K, V> {
    fn child_mut(&mut self, side: Side) -> &mut Link<K, V> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

fn side_of<K: Ord>(key: &K, node_key: &K) -> Option<Side> {
    match key.cmp(node_key) {
        Ordering::Less => Some(Side::Left),
        Ordering::Greater => Some(Side::Right),
        Ordering::Equal => None,
    }
}

/// One detached step of the access path: `parent` with its `child` on `side`
///
/// `inner` is the side of `child` the path continues on, `None` when the
/// child holds the key. The grandchild on `inner` is detached too and
/// splayed one frame further down.
struct Frame<K, V> {
    parent: Box<Node<K, V>>,
    side: Side,
    child: Box<Node<K, V>>,
    inner: Option<Side>,
}

impl<K, V> Frame<K, V> {
    /// Reattach the splayed grandchild and rotate it up through this frame
    fn rebuild(self, splayed: Link<K, V>, rotations: &mut u64) -> Box<Node<K, V>> {
        let Frame {
            mut parent,
            side,
            mut child,
            inner,
        } = self;

        match inner {
            // zig: the child holds the key
            None => {
                *parent.child_mut(side) = Some(child);
                lift(parent, side, rotations)
            }
            // zig-zig: rotate the grandparent first, then the parent
            Some(inner) if inner == side => {
                *child.child_mut(inner) = splayed;
                *parent.child_mut(side) = Some(child);
                let mut node = lift(parent, side, rotations);
                if node.child_mut(side).is_some() {
                    node = lift(node, side, rotations);
                }
                node
            }
            // zig-zag: lift the grandchild over the child, then over the parent
            Some(inner) => {
                if let Some(grandchild) = splayed {
                    *child.child_mut(inner) = Some(grandchild);
                    child = lift(child, inner, rotations);
                }
                *parent.child_mut(side) = Some(child);
                lift(parent, side, rotations)
            }
        }
    }
}

/// Splay `key` toward `root`, returning the new subtree root
///
/// The access path is detached two levels at a time onto an explicit stack
/// and rebuilt bottom-up, so depth is bounded by heap, not by the call stack.
/// Rotations are grouped in pairs from the top of the path; when the key is
/// absent the last node visited becomes the root.
fn splay<K: Ord, V>(root: Box<Node<K, V>>, key: &K, rotations: &mut u64) -> Box<Node<K, V>> {
    let mut path: Vec<Frame<K, V>> = Vec::new();
    let mut current = root;

    let mut node = loop {
        let side = match side_of(key, &current.key) {
            Some(side) => side,
            None => break current,
        };
        let mut child = match current.child_mut(side).take() {
            Some(child) => child,
            None => break current,
        };

        let inner = side_of(key, &child.key);
        let grandchild = inner.and_then(|inner| child.child_mut(inner).take());
        let frame = Frame {
            parent: current,
            side,
            child,
            inner,
        };

        match grandchild {
            Some(grandchild) => {
                path.push(frame);
                current = grandchild;
            }
            None => break frame.rebuild(None, rotations),
        }
    };

    while let Some(frame) = path.pop() {
        node = frame.rebuild(Some(node), rotations);
    }

    node
}

/// Bring the child on `side` up into `node`'s place
fn lift<K, V>(node: Box<Node<K, V>>, side: Side, rotations: &mut u64) -> Box<Node<K, V>> {
    match side {
        Side::Left => rotate_right(node, rotations),
        Side::Right => rotate_left(node, rotations),
    }
}

/// Lift `x.left` into `x`'s place; `x` takes the child's right subtree as its left
fn rotate_right<K, V>(mut x: Box<Node<K, V>>, rotations: &mut u64) -> Box<Node<K, V>> {
    match x.left.take() {
        Some(mut y) => {
            x.left = y.right.take();
            y.right = Some(x);
            *rotations += 1;
            y
        }
        None => x,
    }
}

/// Lift `x.right` into `x`'s place; `x` takes the child's left subtree as its right
fn rotate_left<K, V>(mut x: Box<Node<K, V>>, rotations: &mut u64) -> Box<Node<K, V>> {
    match x.right.take() {
        Some(mut y) => {
            x.right = y.left.take();
            y.left = Some(x);
            *rotations += 1;
            y
        }
        None => x,
    }
}
