mod algebra;
mod cache;
mod hashlife;
mod node;
mod stats;

/// Levels beyond this cannot be addressed by the signed 64-bit coordinate
/// type.
const MAX_LEVEL: u32 = 63;

pub use node::{Coord, Node};
