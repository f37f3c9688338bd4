//! Parser module for Decaf

#[allow(clippy::module_inception)]
mod parser;

pub use parser::{parse_program, Parser};
