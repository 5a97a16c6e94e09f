//! Prefix tree of type vectors, used to reject non-minimal solutions.
//!
//! A stored vector `e` is *dominated* by a query `v` when every non-zero
//! entry of `e` equals the matching entry of `v` (trailing zeros are
//! implicit on both sides). Vertex enumeration stores the type vector of
//! each solution it emits and skips any later leaf whose type vector
//! dominates a stored one.

/// Set of type vectors over the alphabet `0..N`.
#[derive(Clone, Debug)]
pub struct TypeTrie<const N: usize> {
    nodes: Vec<Node<N>>,
    len: usize,
}

#[derive(Clone, Debug)]
struct Node<const N: usize> {
    children: [Option<usize>; N],
    element: bool,
}

impl<const N: usize> Node<N> {
    fn new() -> Self {
        Self {
            children: [None; N],
            element: false,
        }
    }
}

impl<const N: usize> Default for TypeTrie<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Strips trailing zeros.
fn trimmed(v: &[u8]) -> &[u8] {
    let end = v.iter().rposition(|&t| t != 0).map_or(0, |i| i + 1);
    &v[..end]
}

impl<const N: usize> TypeTrie<N> {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new()],
            len: 0,
        }
    }

    /// Number of distinct vectors stored.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.nodes.truncate(1);
        self.nodes[0] = Node::new();
        self.len = 0;
    }

    /// Adds `entry`. Every entry must be below `N`.
    pub fn insert(&mut self, entry: &[u8]) {
        let mut node = 0;
        for &t in trimmed(entry) {
            let t = t as usize;
            debug_assert!(t < N, "type {t} out of range");
            node = match self.nodes[node].children[t] {
                Some(child) => child,
                None => {
                    self.nodes.push(Node::new());
                    let child = self.nodes.len() - 1;
                    self.nodes[node].children[t] = Some(child);
                    child
                }
            };
        }
        if !self.nodes[node].element {
            self.nodes[node].element = true;
            self.len += 1;
        }
    }

    /// Whether `v` dominates some stored vector.
    pub fn dominates(&self, v: &[u8]) -> bool {
        let v = trimmed(v);
        // (node, depth): the node reached after matching v[..depth].
        let mut stack = vec![(0usize, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            let here = &self.nodes[node];
            if here.element {
                return true;
            }
            // Past the end of v; stored vectors end in a non-zero type.
            if depth >= v.len() {
                continue;
            }
            let t = v[depth] as usize;
            if t != 0 {
                if let Some(child) = here.children.get(t).copied().flatten() {
                    stack.push((child, depth + 1));
                }
            }
            if let Some(child) = here.children[0] {
                stack.push((child, depth + 1));
            }
        }
        false
    }

    fn same_shape(&self, a: usize, other: &Self, b: usize) -> bool {
        let mut stack = vec![(a, b)];
        while let Some((x, y)) = stack.pop() {
            let (nx, ny) = (&self.nodes[x], &other.nodes[y]);
            if nx.element != ny.element {
                return false;
            }
            for (cx, cy) in nx.children.iter().zip(&ny.children) {
                match (cx, cy) {
                    (None, None) => {}
                    (Some(cx), Some(cy)) => stack.push((*cx, *cy)),
                    _ => return false,
                }
            }
        }
        true
    }
}

impl<const N: usize> PartialEq for TypeTrie<N> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.same_shape(0, other, 0)
    }
}

impl<const N: usize> Eq for TypeTrie<N> {}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn brute_dominates(stored: &[Vec<u8>], v: &[u8]) -> bool {
        stored.iter().any(|e| {
            e.iter()
                .enumerate()
                .all(|(i, &t)| t == 0 || v.get(i).copied() == Some(t))
        })
    }

    #[test]
    fn empty_trie_dominates_nothing() {
        let t = TypeTrie::<4>::new();
        assert!(t.is_empty());
        assert!(!t.dominates(&[]));
        assert!(!t.dominates(&[1, 2, 3]));
    }

    #[test]
    fn zero_vector_is_dominated_by_everything() {
        let mut t = TypeTrie::<4>::new();
        t.insert(&[0, 0, 0]);
        assert_eq!(t.len(), 1);
        assert!(t.dominates(&[]));
        assert!(t.dominates(&[3, 1]));
    }

    #[test]
    fn domination_follows_nonzero_entries() {
        let mut t = TypeTrie::<4>::new();
        t.insert(&[1, 0, 2, 0]);
        assert!(t.dominates(&[1, 3, 2]));
        assert!(t.dominates(&[1, 0, 2, 0, 0]));
        assert!(!t.dominates(&[1, 0, 3]));
        assert!(!t.dominates(&[0, 0, 2]));
        assert!(!t.dominates(&[1]));
    }

    #[test]
    fn duplicates_and_trailing_zeros_count_once() {
        let mut t = TypeTrie::<3>::new();
        t.insert(&[2, 1]);
        t.insert(&[2, 1, 0, 0]);
        assert_eq!(t.len(), 1);
        t.clear();
        assert!(t.is_empty());
        assert!(!t.dominates(&[2, 1]));
    }

    #[test]
    fn equality_ignores_insertion_order() {
        let mut a = TypeTrie::<3>::new();
        let mut b = TypeTrie::<3>::new();
        a.insert(&[1, 2]);
        a.insert(&[0, 1]);
        b.insert(&[0, 1]);
        b.insert(&[1, 2]);
        assert_eq!(a, b);
        b.insert(&[2]);
        assert_ne!(a, b);
    }

    proptest! {
        #[test]
        fn dominates_matches_brute_force(
            stored in prop::collection::vec(prop::collection::vec(0u8..4, 0..6), 0..8),
            query in prop::collection::vec(0u8..4, 0..6),
        ) {
            let mut t = TypeTrie::<4>::new();
            for e in &stored {
                t.insert(e);
            }
            prop_assert_eq!(t.dominates(&query), brute_dominates(&stored, &query));
        }
    }
}
