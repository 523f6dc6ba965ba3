//! Single-context views over a quad backend

mod adapter;
mod view;

pub use adapter::ContextBackend;
pub use view::{Context, TripleSink};
