//! Rule configuration, predicates, and the engine that applies them.

pub(crate) mod assets;
pub(crate) mod config;
pub(crate) mod engine;
pub(crate) mod predicates;
