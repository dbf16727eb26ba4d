// src/output/mod.rs

//! Local output: where downloaded files land and how they are written.

mod path;
mod writer;

pub use path::destination_path;
pub use writer::FileWriter;
