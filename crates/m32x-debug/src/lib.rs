//! Debug registration tree and instruction tracing.
//!
//! Components register named nodes in a [`DebugTree`] that is handed to them explicitly at load
//! time; external tooling walks the tree to find memories and tracers. Nothing here feeds back
//! into emulated state.

#![forbid(unsafe_code)]

mod trace;
mod tree;

pub use trace::{TraceEvent, TraceKinds, Tracer};
pub use tree::{DebugTree, Node, NodeId, NodeKind};
