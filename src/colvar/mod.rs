//! COLVAR trajectory input.
//!
//! Reads PLUMED-style collective-variable tables into order parameters.

mod reader;

pub use reader::{parse_colvar, read_colvar, ColvarTable};
