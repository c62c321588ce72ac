//! Public re-exports of internal row routines, for benchmarks only.

pub use crate::row::{pack_row_word, unpack_row_word};
