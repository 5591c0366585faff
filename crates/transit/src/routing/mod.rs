//! Cross-line graph assembly and shortest-path search.

pub mod graph;
pub mod path_finder;

pub use graph::{Edge, NetworkGraph};
pub use path_finder::{DijkstraPathFinder, PathFindStrategy};
