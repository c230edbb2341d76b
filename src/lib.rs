//! Conway's Game of Life on a hash-consed quadtree.
//!
//! A [`Node`] of level `l` covers a square of side `2^l` cells; level 0 is a
//! single cell. Space is divided into four quadrants:
//!
//! ```text
//! NW|NE
//! -----
//! SW|SE
//! ```
//!
//! with north being decreasing y and west decreasing x. Permitted
//! coordinates at level `l` are `x, y ∈ [-2^(l-1), 2^(l-1) - 1]`:
//!
//! ```text
//! level  x & y range   side length
//! -----------------------------------
//! 0      [0, 0]              1
//! 1      [-1, 0]             2
//! 2      [-2, 1]             4
//! 3      [-4, 3]             8
//! 4      [-8, 7]            16
//! 5      [-16, 15]          32
//! ```
//!
//! Trees are immutable: every change returns a new handle. All composed
//! nodes are interned in a process-wide cache keyed by their four children,
//! and only two leaf nodes ever exist (one live, one dead), so structurally
//! equal regions always share one canonical node and handles compare by
//! identity.
//!
//! The generation step is Gosper's hashlife restricted to space
//! compression: each [`Node::next_gen`] advances the whole tree by exactly
//! one generation, memoizing the one-step result per node. No time
//! compression (multi-step jumps) is performed.

#![warn(clippy::all, clippy::cargo)]

mod quadtree;

pub use quadtree::{Coord, Node};
