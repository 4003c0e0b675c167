//! Selection tree
//!
//! Folder/leaf hierarchy built from `/`-separated candidate paths, with
//! selection rules and optional persistence of folder expand flags.

mod expand_store;
mod node;
mod selection;
mod tree;

pub use expand_store::{ExpandStore, JsonExpandStore, MemoryExpandStore, StoreError};
pub use node::{NodeId, SelectionNode};
pub use selection::{SelectionChangeKind, SelectionState, SelectorEvent};
pub use tree::{Ancestors, DepthFirst, SelectionTree, PATH_SEPARATOR};
