//! Point operators: stateless per-pixel remaps of an intensity matrix.
//! Each runs in `O(rows * cols)` and mutates the matrix in place; the
//! fallible ones validate before touching any sample.

use ndarray::Zip;
use ndarray_stats::QuantileExt;
use num_traits::clamp;

use crate::error::{EnhanceError, Result};
use crate::matrix::IntensityMatrix;

/// Direction of the piecewise-linear contrast remap.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ContrastMode {
    /// Offset the target break-points below the observed extrema,
    /// widening the output range.
    Stretch,
    /// Offset them above, narrowing it.
    Contract,
}

/// What gray-level slicing does with pixels inside the interval.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BoostType {
    /// Force to `levels - 1` (highlight).
    Up,
    /// Force to `0` (darken).
    Down,
}

/// `out = (levels - 1) - in`. Applying it twice reproduces the input
/// exactly.
pub fn negative(img: &mut IntensityMatrix) {
    let top = img.levels() - 1;
    img.samples_mut().mapv_inplace(|v| top - v);
}

/// Derive the `(r1, r2, s1, s2)` contrast break-points.
///
/// `s1`/`s2` offset the observed extrema by `percent`, taken modulo the
/// level count, which makes the map discontinuous for some percents. The
/// floors keep the piecewise divisors away from zero.
fn break_points(
    img: &IntensityMatrix,
    percent: u32,
    mode: ContrastMode,
) -> (f64, f64, f64, f64) {
    let levels = f64::from(img.levels());
    let r1 = f64::from(*img.samples().min().expect("matrix is never empty"));
    let r2 = f64::from(*img.samples().max().expect("matrix is never empty"));
    let percent = f64::from(percent);

    let off1 = (r1 * percent / 100.0) % levels;
    let off2 = (r2 * percent / 100.0) % levels;
    let (s1, s2) = match mode {
        ContrastMode::Stretch => (r1 - off1, r2 - off2),
        ContrastMode::Contract => (r1 + off1, r2 + off2),
    };

    (r1.max(0.1), r2.max(0.2), s1.max(0.1), s2.max(0.1))
}

/// Piecewise-linear contrast remap between the observed extrema and the
/// derived break-points. `percent = 0` leaves every sample unchanged.
pub fn contrast(img: &mut IntensityMatrix, percent: u32, mode: ContrastMode) {
    let levels = f64::from(img.levels());
    let top = levels - 1.0;
    let (r1, r2, s1, s2) = break_points(img, percent, mode);

    img.samples_mut().mapv_inplace(|v| {
        let x = f64::from(v);
        let y = if x <= r1 {
            x * s1 / r1
        } else if x <= r2 {
            let m = (s2 - s1) / (r2 - r1);
            x * m + s1 - r1 * m
        } else {
            let m = (top - s2) / (top - r2);
            x * m + top - top * (levels - s2) / (levels - r2)
        };
        clamp(y, 0.0, top) as u32
    });
}

/// Force every pixel strictly inside `(lo, hi)` to the boost color;
/// everything else is left untouched.
pub fn gray_level_slicing(img: &mut IntensityMatrix, range: (u32, u32), boost: BoostType) {
    let color = match boost {
        BoostType::Up => img.levels() - 1,
        BoostType::Down => 0,
    };
    let (lo, hi) = range;
    img.samples_mut()
        .mapv_inplace(|v| if lo < v && v < hi { color } else { v });
}

/// Retain bit-planes `plane - 1` through 7, clearing each lower bit by
/// masking with its complement in turn.
pub fn bit_plane_slicing(img: &mut IntensityMatrix, plane: u32) -> Result<()> {
    if !(1..=8).contains(&plane) {
        return Err(EnhanceError::BitPlaneOutOfRange(plane));
    }
    img.samples_mut().mapv_inplace(|mut v| {
        for bit in 0..plane - 1 {
            v &= !(1u32 << bit);
        }
        v
    });
    Ok(())
}

/// Saturating per-pixel difference: `clamp(a - b, 0, levels - 1)`. The
/// operand must match in resolution.
pub fn subtract(img: &mut IntensityMatrix, other: &IntensityMatrix) -> Result<()> {
    if img.resolution() != other.resolution() {
        return Err(EnhanceError::ResolutionMismatch {
            lhs: img.resolution(),
            rhs: other.resolution(),
        });
    }
    let top = i64::from(img.levels()) - 1;
    Zip::from(img.samples_mut())
        .and(other.samples())
        .for_each(|a, &b| {
            let diff = i64::from(*a) - i64::from(b);
            *a = clamp(diff, 0, top) as u32;
        });
    Ok(())
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;
    use crate::matrix::ChannelMode;

    fn gray(samples: ndarray::Array2<u32>) -> IntensityMatrix {
        IntensityMatrix::from_samples(samples, ChannelMode::Grayscale).unwrap()
    }

    #[test]
    fn negative_inverts_against_the_top_level() {
        let mut img = gray(array![[0u32, 100], [200, 255]]);
        negative(&mut img);
        assert_eq!(img.samples(), &array![[255u32, 155], [55, 0]]);
    }

    #[test]
    fn negative_applied_twice_is_the_identity() {
        let original = gray(array![[0u32, 1, 17], [99, 128, 255]]);
        let mut img = original.clone();
        negative(&mut img);
        negative(&mut img);
        assert_eq!(img, original);
    }

    #[test]
    fn contrast_stretch_at_zero_percent_is_the_identity() {
        // Includes 0 and 255 so both floored break-point paths are hit.
        let original = gray(array![[0u32, 1, 100], [254, 255, 42]]);
        let mut img = original.clone();
        contrast(&mut img, 0, ContrastMode::Stretch);
        assert_eq!(img, original);
    }

    #[test]
    fn contrast_contract_at_zero_percent_is_the_identity() {
        let original = gray(array![[3u32, 77], [128, 250]]);
        let mut img = original.clone();
        contrast(&mut img, 0, ContrastMode::Contract);
        assert_eq!(img, original);
    }

    #[test]
    fn contrast_output_stays_inside_the_level_range() {
        for percent in [10, 35, 60, 99] {
            for mode in [ContrastMode::Stretch, ContrastMode::Contract] {
                let mut img = gray(array![[0u32, 13, 100], [180, 230, 255]]);
                contrast(&mut img, percent, mode);
                assert!(img.samples().iter().all(|&v| v <= 255));
            }
        }
    }

    #[test]
    fn gray_level_slicing_boosts_the_strict_interior_only() {
        let mut img = gray(array![[50u32, 100, 150]]);
        gray_level_slicing(&mut img, (50, 150), BoostType::Up);
        assert_eq!(img.samples(), &array![[50u32, 255, 150]]);

        let mut img = gray(array![[50u32, 100, 150]]);
        gray_level_slicing(&mut img, (50, 150), BoostType::Down);
        assert_eq!(img.samples(), &array![[50u32, 0, 150]]);
    }

    #[test]
    fn bit_plane_slicing_clears_the_low_planes() {
        let mut img = gray(array![[255u32]]);
        bit_plane_slicing(&mut img, 4).unwrap();
        assert_eq!(img.samples()[[0, 0]], 0b1111_1000);
    }

    #[test]
    fn bit_plane_one_retains_every_bit() {
        let original = gray(array![[0u32, 1, 170, 255]]);
        let mut img = original.clone();
        bit_plane_slicing(&mut img, 1).unwrap();
        assert_eq!(img, original);
    }

    #[test]
    fn bit_plane_outside_range_fails_without_mutation() {
        let original = gray(array![[9u32, 31]]);
        for plane in [0, 9] {
            let mut img = original.clone();
            let err = bit_plane_slicing(&mut img, plane).unwrap_err();
            assert!(matches!(err, EnhanceError::BitPlaneOutOfRange(p) if p == plane));
            assert_eq!(img, original);
        }
    }

    #[test]
    fn subtraction_saturates_at_zero() {
        let mut a = gray(array![[100u32, 5], [255, 0]]);
        let b = gray(array![[30u32, 10], [255, 200]]);
        subtract(&mut a, &b).unwrap();
        assert_eq!(a.samples(), &array![[70u32, 0], [0, 0]]);
    }

    #[test]
    fn subtraction_of_mismatched_resolutions_fails_without_mutation() {
        let original = gray(array![[1u32, 2], [3, 4]]);
        let mut a = original.clone();
        let b = gray(array![[1u32, 2, 3]]);
        let err = subtract(&mut a, &b).unwrap_err();
        assert!(matches!(err, EnhanceError::ResolutionMismatch { .. }));
        assert_eq!(a, original);
    }
}
