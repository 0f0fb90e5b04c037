//! Aggregate statistics over an intensity matrix. Pure reads, no side
//! effects; a matrix is never empty, so none of the numeric operations
//! can fail.

use ndarray::{Array1, Array2};
use num_traits::{AsPrimitive, PrimInt};

use crate::error::{EnhanceError, Result};
use crate::matrix::{ChannelMode, IntensityMatrix};

pub struct ImageStatistics<'a> {
    img: &'a IntensityMatrix,
    length: usize,
}

impl<'a> ImageStatistics<'a> {
    pub fn new(img: &'a IntensityMatrix) -> Self {
        Self {
            img,
            length: img.sample_count(),
        }
    }

    /// Total number of samples the statistics run over.
    pub fn length(&self) -> usize {
        self.length
    }

    pub fn sum(&self) -> u64 {
        self.img.samples().iter().map(|&v| u64::from(v)).sum()
    }

    pub fn mean(&self) -> f64 {
        sum_of(self.img.samples()) / self.length as f64
    }

    /// Mean of squared deviations from the mean.
    pub fn variance(&self) -> f64 {
        let mean = self.mean();
        let squared: f64 = self
            .img
            .samples()
            .iter()
            .map(|&v| {
                let d = f64::from(v) - mean;
                d * d
            })
            .sum();
        squared / self.length as f64
    }

    pub fn std(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Smallest sample, folded from the first one rather than a sentinel.
    pub fn minimum(&self) -> u32 {
        fold_extremum(self.img.samples(), std::cmp::min)
    }

    /// Largest sample, folded from the first one rather than a sentinel.
    pub fn maximum(&self) -> u32 {
        fold_extremum(self.img.samples(), std::cmp::max)
    }

    /// Per-level sample counts of a grayscale matrix.
    pub fn histogram(&self) -> Result<Array1<u64>> {
        if self.img.mode() != ChannelMode::Grayscale {
            return Err(EnhanceError::UnsupportedMode);
        }
        let mut hist = Array1::zeros(self.img.levels() as usize);
        for &v in self.img.samples().iter() {
            hist[v as usize] += 1;
        }
        Ok(hist)
    }
}

fn sum_of<I>(samples: &Array2<I>) -> f64
where
    I: PrimInt + AsPrimitive<f64>,
{
    samples.iter().fold(0.0, |acc, &v| acc + v.as_())
}

fn fold_extremum<I: PrimInt>(samples: &Array2<I>, pick: fn(I, I) -> I) -> I {
    let mut it = samples.iter().copied();
    let first = it.next().expect("matrix is never empty");
    it.fold(first, pick)
}
