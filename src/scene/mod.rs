//! Scene files: statement lexing, parsing, and the resulting graph.

pub(crate) mod graph;
pub(crate) mod lexer;
pub(crate) mod parser;
