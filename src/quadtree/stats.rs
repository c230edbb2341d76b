use std::collections::BTreeMap;
use std::fmt;

use super::cache::with_cache;
use super::node::Node;

impl Node {
    /// Diagnostic summary: the tree's level and population, then the
    /// intern cache's size, hit/miss counters and a per-level histogram of
    /// its nodes.
    pub fn stats(&self) -> String {
        with_cache(|cache| {
            let (hits, misses) = cache.counters();
            let mut s = String::new();
            s += &format!("Level: {}\n", self.level());
            s += &format!("Population: {}\n", self.population());
            s += &format!("Cache size: {}\n", cache.len());
            s += &format!("Cache hits: {hits}\n");
            s += &format!("Cache misses: {misses}\n");

            let mut buckets = BTreeMap::new();
            for node in cache.iter_nodes() {
                *buckets.entry(node.level()).or_insert(0usize) += 1;
            }
            for (level, count) in buckets {
                s += &format!("{level:>2}: {count}\n");
            }
            s
        })
    }

    /// Dumps the full grid to stdout; only suitable for small trees.
    pub fn print(&self) {
        print!("{self}");
    }
}

impl fmt::Display for Node {
    /// Renders the grid row by row, one `0`/`1` per cell, rows labeled
    /// with their y coordinate.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.level() == 0 {
            return writeln!(f, "Leaf {}", self.population());
        }
        let half = 1i64 << (self.level() - 1);
        for y in -half..half {
            write!(f, "{y:3}: ")?;
            for x in -half..half {
                write!(f, "{} ", self.cell(x, y) as u8)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_reports_the_tree() {
        let tree = Node::empty(3).set_cell(0, 0, true).set_cell(1, 2, true);
        let stats = tree.stats();
        assert!(stats.contains("Level: 3"));
        assert!(stats.contains("Population: 2"));
        assert!(stats.contains("Cache size: "));
        assert!(stats.contains("Cache hits: "));
        assert!(stats.contains("Cache misses: "));
    }

    #[test]
    fn display_renders_the_grid() {
        let tree = Node::empty(1).set_cell(0, 0, true);
        assert_eq!(format!("{tree}"), " -1: 0 0 \n  0: 0 1 \n");
    }

    #[test]
    fn display_renders_leaves() {
        assert_eq!(format!("{}", Node::live()), "Leaf 1\n");
    }
}
