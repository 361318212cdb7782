//! Course graph payload: decoding, loading and node details.

mod details;
mod loader;
mod payload;

pub use details::NodeDetails;
pub use loader::{GraphStore, load_graph};
pub use payload::{GraphPayload, NodeGroup};
