use std::sync::{LazyLock, Mutex, PoisonError};

use ahash::AHashMap;

use super::node::{Children, Node};

/// Entry count above which [`Node::next_gen`] throws the whole cache away
/// before stepping.
pub(super) const CACHE_LIMIT: usize = 13_000_000;

/// Live nodes above this level are returned without being interned. Dead
/// nodes are always interned so the blank-tree ladder stays canonical.
const INTERN_LEVEL_CAP: u32 = 16;

/// Process-wide interning table mapping a four-child tuple to its
/// canonical node.
pub(super) struct NodeCache {
    nodes: AHashMap<Children, Node>,
    hits: u64,
    misses: u64,
}

impl NodeCache {
    fn new() -> Self {
        Self {
            nodes: AHashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// Returns the canonical node with the given children, creating it on
    /// a miss.
    ///
    /// Panics if the children's levels differ.
    pub(super) fn make_node(&mut self, nw: Node, ne: Node, sw: Node, se: Node) -> Node {
        let level = nw.level();
        assert!(
            ne.level() == level && sw.level() == level && se.level() == level,
            "make_node: child levels differ: nw={}, ne={}, sw={}, se={}",
            level,
            ne.level(),
            sw.level(),
            se.level(),
        );

        let children = Children { nw, ne, sw, se };
        if let Some(node) = self.nodes.get(&children) {
            self.hits += 1;
            return node.clone();
        }
        self.misses += 1;

        let population = children.nw.population()
            + children.ne.population()
            + children.sw.population()
            + children.se.population();
        let node = Node::compose(children.clone(), population);
        if population == 0 || node.level() <= INTERN_LEVEL_CAP {
            self.nodes.insert(children, node.clone());
        }
        node
    }

    pub(super) fn len(&self) -> usize {
        self.nodes.len()
    }

    /// (hits, misses) since the last discard.
    pub(super) fn counters(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }

    /// Throws away every interned node. Handles held by callers keep their
    /// subtrees alive through the child links; later operations simply
    /// re-intern.
    pub(super) fn discard(&mut self) {
        self.nodes = AHashMap::new();
        self.hits = 0;
        self.misses = 0;
    }

    pub(super) fn iter_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }
}

static CACHE: LazyLock<Mutex<NodeCache>> = LazyLock::new(|| Mutex::new(NodeCache::new()));

/// Runs `f` with the process-wide cache locked. A caller that panics
/// mid-operation leaves the map itself intact, so lock poisoning is
/// stripped instead of propagated.
pub(super) fn with_cache<R>(f: impl FnOnce(&mut NodeCache) -> R) -> R {
    let mut cache = CACHE.lock().unwrap_or_else(PoisonError::into_inner);
    f(&mut cache)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn make_node_is_canonical() {
        let (a, b) = with_cache(|cache| {
            let a = cache.make_node(Node::dead(), Node::live(), Node::dead(), Node::dead());
            let b = cache.make_node(Node::dead(), Node::live(), Node::dead(), Node::dead());
            (a, b)
        });
        assert_eq!(a, b);
        assert_eq!(a.level(), 1);
        assert_eq!(a.population(), 1);
    }

    #[test]
    #[should_panic(expected = "child levels differ")]
    fn make_node_rejects_mixed_levels() {
        with_cache(|cache| {
            let composed = cache.make_node(Node::dead(), Node::dead(), Node::dead(), Node::dead());
            cache.make_node(composed, Node::dead(), Node::dead(), Node::dead())
        });
    }

    #[test]
    #[serial]
    fn duplicate_lookups_count_as_hits() {
        let (hits_before, _) = with_cache(|cache| cache.counters());
        with_cache(|cache| {
            let a = cache.make_node(Node::live(), Node::live(), Node::dead(), Node::dead());
            let b = cache.make_node(Node::live(), Node::live(), Node::dead(), Node::dead());
            assert_eq!(a, b);
        });
        let (hits_after, _) = with_cache(|cache| cache.counters());
        assert!(hits_after > hits_before);
    }

    #[test]
    fn live_nodes_above_cap_are_not_shared() {
        let base = Node::empty(INTERN_LEVEL_CAP + 1);
        let a = base.set_cell(0, 0, true);
        let b = base.set_cell(0, 0, true);

        // equal regions, but the top node was too big and alive to intern
        assert_ne!(a, b);
        assert_eq!(a.population(), 1);
        assert_eq!(b.population(), 1);
        assert!(a.cell(0, 0));
        assert!(b.cell(0, 0));
    }

    #[test]
    fn dead_nodes_are_always_shared() {
        let a = Node::empty(INTERN_LEVEL_CAP + 4);
        let b = Node::empty(INTERN_LEVEL_CAP + 4);
        assert_eq!(a, b);
    }
}
