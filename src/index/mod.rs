//! Indexing of bake directories

mod indexer;

pub use indexer::Indexer;
