use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, LazyLock, OnceLock};

/// Cell coordinate. A tree of level `l` spans `[-2^(l-1), 2^(l-1) - 1]` on
/// both axes.
pub type Coord = i64;

/// The four quadrants of a composed node, each exactly one level below it.
///
/// North is decreasing y, south increasing y, west decreasing x, east
/// increasing x. Equality and hashing go through [`Node`], i.e. by
/// identity, which makes this the interning key.
#[derive(Clone, PartialEq, Eq, Hash)]
pub(super) struct Children {
    pub(super) nw: Node,
    pub(super) ne: Node,
    pub(super) sw: Node,
    pub(super) se: Node,
}

pub(super) struct NodeData {
    level: u32,
    population: u64,
    children: Option<Children>,
    /// Centered one-generation successor, one level smaller. Transitions
    /// at most once from unset to a fixed handle.
    next: OnceLock<Node>,
}

/// Handle to an interned quadtree node.
///
/// Handles are cheap to clone and compare by identity: because nodes are
/// hash-consed, two handles are equal exactly when the regions they cover
/// are pointwise equal.
#[derive(Clone)]
pub struct Node(Arc<NodeData>);

static DEAD: LazyLock<Node> = LazyLock::new(|| Node::leaf(0));
static LIVE: LazyLock<Node> = LazyLock::new(|| Node::leaf(1));

impl Node {
    fn leaf(population: u64) -> Self {
        Node(Arc::new(NodeData {
            level: 0,
            population,
            children: None,
            next: OnceLock::new(),
        }))
    }

    /// The canonical dead single cell.
    pub fn dead() -> Self {
        DEAD.clone()
    }

    /// The canonical live single cell.
    pub fn live() -> Self {
        LIVE.clone()
    }

    /// Allocates a fresh composed node. Only the intern cache may call
    /// this; everything else must go through `make_node` so that equal
    /// regions share one handle.
    pub(super) fn compose(children: Children, population: u64) -> Self {
        let level = children.nw.level() + 1;
        Node(Arc::new(NodeData {
            level,
            population,
            children: Some(children),
            next: OnceLock::new(),
        }))
    }

    /// Distance from the leaf layer; the node covers a `2^level` square.
    pub fn level(&self) -> u32 {
        self.0.level
    }

    /// Number of live cells in the region.
    pub fn population(&self) -> u64 {
        self.0.population
    }

    pub fn is_leaf(&self) -> bool {
        self.0.children.is_none()
    }

    pub(super) fn children(&self) -> &Children {
        self.0
            .children
            .as_ref()
            .expect("leaf nodes have no children")
    }

    pub(super) fn nw(&self) -> &Node {
        &self.children().nw
    }

    pub(super) fn ne(&self) -> &Node {
        &self.children().ne
    }

    pub(super) fn sw(&self) -> &Node {
        &self.children().sw
    }

    pub(super) fn se(&self) -> &Node {
        &self.children().se
    }

    pub(super) fn next_memo(&self) -> &OnceLock<Node> {
        &self.0.next
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Arc::as_ptr(&self.0), state);
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Node({:p}, level {}, population {})",
            Arc::as_ptr(&self.0),
            self.0.level,
            self.0.population
        )
    }
}
