use super::cache::{with_cache, NodeCache};
use super::node::{Coord, Node};
use super::MAX_LEVEL;

impl Node {
    /// Canonical all-dead tree of the given level.
    ///
    /// Level 0, or a level that wrapped below it, collapses to the dead
    /// leaf. Any other level beyond the 63-level maximum is a programmer
    /// error.
    pub fn empty(level: u32) -> Node {
        with_cache(|cache| Self::empty_in(cache, level))
    }

    pub(super) fn empty_in(cache: &mut NodeCache, level: u32) -> Node {
        // callers occasionally ask for `level - 1` of a leaf; such wrapped
        // requests collapse to the dead leaf like level 0 does
        if level == 0 || level >= u32::MAX - 1 {
            return Node::dead();
        }
        assert!(
            level <= MAX_LEVEL,
            "empty: level {level} is beyond the maximum level {MAX_LEVEL}"
        );
        let child = Self::empty_in(cache, level - 1);
        cache.make_node(child.clone(), child.clone(), child.clone(), child)
    }

    /// Returns a tree one level up with `self` centered in it and dead
    /// space around.
    pub fn grow(&self) -> Node {
        with_cache(|cache| self.grow_in(cache))
    }

    pub(super) fn grow_in(&self, cache: &mut NodeCache) -> Node {
        assert!(
            self.level() >= 1,
            "grow: cannot grow a level-{} tree, build one with empty(level) instead",
            self.level()
        );
        assert!(
            self.level() < MAX_LEVEL,
            "grow: cannot grow beyond level {MAX_LEVEL}"
        );

        let e = Self::empty_in(cache, self.level() - 1);
        let ch = self.children().clone();
        let nw = cache.make_node(e.clone(), e.clone(), e.clone(), ch.nw);
        let ne = cache.make_node(e.clone(), e.clone(), ch.ne, e.clone());
        let sw = cache.make_node(e.clone(), ch.sw, e.clone(), e.clone());
        let se = cache.make_node(ch.se, e.clone(), e.clone(), e);
        cache.make_node(nw, ne, sw, se)
    }

    /// Smallest enclosing supertree of `self` whose coordinate box
    /// contains `(x, y)`.
    pub fn grow_to_fit(&self, x: Coord, y: Coord) -> Node {
        with_cache(|cache| {
            let mut tree = self.clone();
            while !tree.contains(x, y) {
                tree = tree.grow_in(cache);
            }
            tree
        })
    }

    fn contains(&self, x: Coord, y: Coord) -> bool {
        if self.level() == 0 {
            return x == 0 && y == 0;
        }
        let half = 1i64 << (self.level() - 1);
        (-half..half).contains(&x) && (-half..half).contains(&y)
    }

    /// New tree identical to `self` except that the cell at `(x, y)` is
    /// set to `alive`.
    ///
    /// The coordinates must lie inside the tree's box; callers are
    /// responsible for [`Node::grow_to_fit`]ing first.
    pub fn set_cell(&self, x: Coord, y: Coord, alive: bool) -> Node {
        with_cache(|cache| self.set_cell_in(cache, x, y, alive))
    }

    fn set_cell_in(&self, cache: &mut NodeCache, x: Coord, y: Coord, alive: bool) -> Node {
        if self.level() == 0 {
            assert!(
                (-1..=0).contains(&x) && (-1..=0).contains(&y),
                "set_cell: reached a leaf with coordinates ({x}, {y}) left over, \
                 the tree was not grown to fit"
            );
            return if alive { Node::live() } else { Node::dead() };
        }

        let offset = self.descent_offset();
        let ch = self.children().clone();
        match (x >= 0, y >= 0) {
            (false, false) => {
                let nw = ch.nw.set_cell_in(cache, x + offset, y + offset, alive);
                cache.make_node(nw, ch.ne, ch.sw, ch.se)
            }
            (true, false) => {
                let ne = ch.ne.set_cell_in(cache, x - offset, y + offset, alive);
                cache.make_node(ch.nw, ne, ch.sw, ch.se)
            }
            (false, true) => {
                let sw = ch.sw.set_cell_in(cache, x + offset, y - offset, alive);
                cache.make_node(ch.nw, ch.ne, sw, ch.se)
            }
            (true, true) => {
                let se = ch.se.set_cell_in(cache, x - offset, y - offset, alive);
                cache.make_node(ch.nw, ch.ne, ch.sw, se)
            }
        }
    }

    /// Reads the cell at `(x, y)`, which must lie inside the tree's box.
    pub fn cell(&self, x: Coord, y: Coord) -> bool {
        self.find_leaf(x, y).population() != 0
    }

    fn find_leaf(&self, x: Coord, y: Coord) -> &Node {
        if self.level() == 0 {
            assert!(
                (-1..=0).contains(&x) && (-1..=0).contains(&y),
                "cell: reached a leaf with coordinates ({x}, {y}) left over, \
                 the tree was not grown to fit"
            );
            return self;
        }

        let offset = self.descent_offset();
        let ch = self.children();
        match (x >= 0, y >= 0) {
            (false, false) => ch.nw.find_leaf(x + offset, y + offset),
            (true, false) => ch.ne.find_leaf(x - offset, y + offset),
            (false, true) => ch.sw.find_leaf(x + offset, y - offset),
            (true, true) => ch.se.find_leaf(x - offset, y - offset),
        }
    }

    // Distance from a quadrant's local origin to this node's origin: 1 at
    // level 2, 0 at level 1 where descent lands directly in a leaf.
    fn descent_offset(&self) -> Coord {
        if self.level() >= 2 {
            1i64 << (self.level() - 2)
        } else {
            0
        }
    }

    /// Visits every live cell, passing its coordinates in the global
    /// frame, given that the tree's NW corner lies at `(x0, y0)`.
    ///
    /// Pass `(-2^(l-1), -2^(l-1))` to get the tree's own coordinates back.
    /// Subtrees without live cells are skipped.
    pub fn for_each_live<F: FnMut(Coord, Coord)>(&self, x0: Coord, y0: Coord, emit: &mut F) {
        if self.population() == 0 {
            return;
        }
        if self.level() == 0 {
            emit(x0, y0);
            return;
        }

        let half = 1i64 << (self.level() - 1);
        let ch = self.children();
        ch.nw.for_each_live(x0, y0, emit);
        ch.ne.for_each_live(x0 + half, y0, emit);
        ch.sw.for_each_live(x0, y0 + half, emit);
        ch.se.for_each_live(x0 + half, y0 + half, emit);
    }
}
