use super::cache::{with_cache, NodeCache, CACHE_LIMIT};
use super::node::Node;

/// Next state of the cell in the middle of a 12-bit neighborhood window:
/// bits 0..=2 are the south row, bits 4..=6 the current row with bit 5 the
/// cell itself, bits 8..=10 the north row (row stride 4).
fn one_gen(bitmask: u16) -> Node {
    if bitmask == 0 {
        return Node::dead();
    }
    let alive = (bitmask >> 5) & 1 != 0;
    // 0b0111_0101_0111: the 3x3 window minus the cell itself
    let neighbors = (bitmask & 0x0757).count_ones();
    if neighbors == 3 || (neighbors == 2 && alive) {
        Node::live()
    } else {
        Node::dead()
    }
}

impl Node {
    /// Center quarter of `self`, one level down.
    fn centered_subnode(&self, cache: &mut NodeCache) -> Node {
        debug_assert!(self.level() >= 2);
        cache.make_node(
            self.nw().se().clone(),
            self.ne().sw().clone(),
            self.sw().ne().clone(),
            self.se().nw().clone(),
        )
    }

    /// Quarter spanning the vertical seam between a west and an east node
    /// of the same level, one level down.
    fn centered_horizontal(cache: &mut NodeCache, w: &Node, e: &Node) -> Node {
        debug_assert!(w.level() >= 2 && w.level() == e.level());
        cache.make_node(
            w.ne().se().clone(),
            e.nw().sw().clone(),
            w.se().ne().clone(),
            e.sw().nw().clone(),
        )
    }

    /// Quarter spanning the horizontal seam between a north and a south
    /// node of the same level, one level down.
    fn centered_vertical(cache: &mut NodeCache, n: &Node, s: &Node) -> Node {
        debug_assert!(n.level() >= 2 && n.level() == s.level());
        cache.make_node(
            n.sw().se().clone(),
            n.se().sw().clone(),
            s.nw().ne().clone(),
            s.ne().nw().clone(),
        )
    }

    /// Center quarter two levels down, in one hop.
    fn centered_sub_subnode(&self, cache: &mut NodeCache) -> Node {
        debug_assert!(self.level() >= 3);
        cache.make_node(
            self.nw().se().se().clone(),
            self.ne().sw().sw().clone(),
            self.sw().ne().ne().clone(),
            self.se().nw().nw().clone(),
        )
    }

    /// Direct Life evaluation of a level-2 region.
    ///
    /// The sixteen cells are packed row-major into a 16-bit mask (y outer,
    /// x inner, both scanning -2..2), and each of the four center cells
    /// reads its neighborhood window straight out of the mask: shifts 5,
    /// 4, 1 and 0 line up the window on the NW, NE, SW and SE cell of the
    /// centered level-1 result.
    fn slow_simulation(&self, cache: &mut NodeCache) -> Node {
        assert_eq!(
            self.level(),
            2,
            "slow_simulation: needs a level-2 tree, got level {}",
            self.level()
        );

        let mut bits: u16 = 0;
        for y in -2..2 {
            for x in -2..2 {
                bits = (bits << 1) | self.cell(x, y) as u16;
            }
        }
        cache.make_node(
            one_gen(bits >> 5),
            one_gen(bits >> 4),
            one_gen(bits >> 1),
            one_gen(bits),
        )
    }

    /// Centered successor of `self`: one level smaller, one generation
    /// ahead. Memoized per node.
    ///
    /// Nine quarter-size subnodes tile the region; overlapping groups of
    /// four form the four sub-results, which recurse and reassemble. See
    /// [`Node::next_gen`] for the wrapper that keeps coverage constant.
    fn next_generation(&self, cache: &mut NodeCache) -> Node {
        if let Some(next) = self.next_memo().get() {
            return next.clone();
        }

        if self.level() == 2 {
            return self.slow_simulation(cache);
        }

        let ch = self.children().clone();
        let n00 = ch.nw.centered_subnode(cache);
        let n01 = Self::centered_horizontal(cache, &ch.nw, &ch.ne);
        let n02 = ch.ne.centered_subnode(cache);
        let n10 = Self::centered_vertical(cache, &ch.nw, &ch.sw);
        let n11 = self.centered_sub_subnode(cache);
        let n12 = Self::centered_vertical(cache, &ch.ne, &ch.se);
        let n20 = ch.sw.centered_subnode(cache);
        let n21 = Self::centered_horizontal(cache, &ch.sw, &ch.se);
        let n22 = ch.se.centered_subnode(cache);

        let nw = cache
            .make_node(n00, n01.clone(), n10.clone(), n11.clone())
            .next_generation(cache);
        let ne = cache
            .make_node(n01, n02, n11.clone(), n12.clone())
            .next_generation(cache);
        let sw = cache
            .make_node(n10, n11.clone(), n20, n21.clone())
            .next_generation(cache);
        let se = cache.make_node(n11, n12, n21, n22).next_generation(cache);
        let next = cache.make_node(nw, ne, sw, se);

        self.next_memo().get_or_init(|| next).clone()
    }

    /// Advances the whole tree by one Life generation.
    ///
    /// The tree is grown one level before stepping, so the centered result
    /// covers the same box as the input. When the intern cache has grown
    /// past its limit it is discarded first; handles already held stay
    /// valid.
    pub fn next_gen(&self) -> Node {
        with_cache(|cache| {
            if cache.len() > CACHE_LIMIT {
                tracing::info!(
                    entries = cache.len(),
                    "node cache over its limit, discarding it to free memory"
                );
                cache.discard();
            }
            self.grow_in(cache).next_generation(cache)
        })
    }
}
