//! # Formats
//!
//! Readers for the combination table's on-disk encodings.
//!
//! Only the CSV encoding (`child,parent1,parent2`) is supported.

mod csv_table;

pub use csv_table::*;
