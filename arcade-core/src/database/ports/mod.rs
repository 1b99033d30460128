//! Repository ports (interfaces) for the catalog.

pub mod games;
