//! Concrete service adapters built on top of the invocation engine

pub mod wfs;
