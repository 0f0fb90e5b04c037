//! Two-pass histogram equalization.
//!
//! Pass one scans every pixel and builds the cumulative-distribution
//! table; pass two remaps through it. The table must be complete before
//! the first remap read: a streaming remap-while-counting pass would
//! hand early pixels a cumulative value that is still moving.

use std::collections::HashMap;

use itertools::Itertools;

use crate::error::{EnhanceError, Result};
use crate::matrix::{ChannelMode, IntensityMatrix};

/// Aggregates for one observed intensity level.
#[derive(Clone, Copy, Debug)]
pub struct TableEntry {
    pub count: u64,
    /// Share of *all* samples, in-range or not.
    pub probability: f64,
    /// Running probability sum over ascending intensity.
    pub cumulative: f64,
    pub new_level: u32,
}

/// Cumulative-distribution table over the intensities observed inside the
/// requested range. Built fresh per equalization call and discarded after
/// the remap pass.
pub struct HistogramTable {
    entries: HashMap<u32, TableEntry>,
}

impl HistogramTable {
    /// Count pass plus the ascending-order derivation of cumulative
    /// probabilities and output levels.
    ///
    /// Pixels outside the inclusive `range` are neither counted here nor
    /// remapped later.
    pub fn build(img: &IntensityMatrix, range: (u32, u32)) -> Result<Self> {
        if img.mode() != ChannelMode::Grayscale {
            return Err(EnhanceError::UnsupportedMode);
        }
        let (lo, hi) = range;
        let levels = img.levels();
        let full_range = range == (0, levels - 1);
        let total = img.sample_count() as f64;

        let mut counts: HashMap<u32, u64> = HashMap::new();
        for &v in img.samples().iter() {
            if !full_range && (v < lo || v > hi) {
                continue;
            }
            *counts.entry(v).or_insert(0) += 1;
        }

        let top = f64::from(levels - 1);
        let delta = f64::from(hi) - f64::from(lo);
        let mut entries = HashMap::with_capacity(counts.len());
        let mut cumulative = 0.0;
        for level in counts.keys().copied().sorted() {
            let count = counts[&level];
            let probability = count as f64 / total;
            cumulative += probability;
            let new_level = if full_range {
                (top * cumulative).round()
            } else {
                (f64::from(lo) + cumulative * delta).round()
            };
            entries.insert(
                level,
                TableEntry {
                    count,
                    probability,
                    cumulative,
                    new_level: (new_level as u32).min(levels - 1),
                },
            );
        }
        Ok(Self { entries })
    }

    pub fn entry(&self, level: u32) -> Option<&TableEntry> {
        self.entries.get(&level)
    }

    /// Remap pass. A level missing from the table (every out-of-range
    /// pixel) leaves its pixel as it was.
    pub fn remap(&self, img: &mut IntensityMatrix) {
        img.samples_mut().mapv_inplace(|v| match self.entries.get(&v) {
            Some(entry) => entry.new_level,
            None => v,
        });
    }
}

/// Equalize over the full level range.
pub fn equalize(img: &mut IntensityMatrix) -> Result<()> {
    let top = img.levels() - 1;
    equalize_in_range(img, (0, top))
}

/// Equalize over an inclusive intensity range, leaving out-of-range
/// pixels untouched.
pub fn equalize_in_range(img: &mut IntensityMatrix, range: (u32, u32)) -> Result<()> {
    let table = HistogramTable::build(img, range)?;
    table.remap(img);
    Ok(())
}
