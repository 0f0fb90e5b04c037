//! Teaching-oriented image enhancement toolkit.
//!
//! An image file is decoded into an [`IntensityMatrix`], a 2-D grid of
//! integer intensity samples, and mutated in place by point and
//! neighborhood operators: negative, contrast stretch/contract,
//! gray-level and bit-plane slicing, histogram equalization, image
//! subtraction and 3×3 box averaging. [`ImageEnhancement`] owns the
//! matrix, tracks the applied filters and derives output file names from
//! that history; [`ImageStatistics`] provides aggregate reads over the
//! samples.
//!
//! Everything is single-threaded and synchronous: operators are pure,
//! bounded-time computations over a fixed-size grid, and the only I/O is
//! the initial decode and the final encode.

pub mod enhance;
pub mod error;
pub mod histogram;
pub mod matrix;
pub mod spatial;
pub mod stats;
pub mod transform;

pub use crate::enhance::ImageEnhancement;
pub use crate::error::{EnhanceError, Result};
pub use crate::histogram::{HistogramTable, TableEntry};
pub use crate::matrix::{ChannelMode, IntensityMatrix, OpenMode};
pub use crate::stats::ImageStatistics;
pub use crate::transform::{BoostType, ContrastMode};
