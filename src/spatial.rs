//! Neighborhood filtering: 3×3 box averaging over interior pixels.

use crate::matrix::IntensityMatrix;

/// Replace each interior pixel with the rounded mean of its 3×3
/// neighborhood, reading every sample from a snapshot of the pre-pass
/// state so a window never sees an already-averaged neighbor.
///
/// A pixel is skipped when its row or column index is any of `0`, `1`,
/// `rows - 1` or `cols - 1`; both coordinates are checked against both
/// axis limits, which is wider than a 3×3 window strictly needs.
pub fn averaging(img: &mut IntensityMatrix) {
    let (rows, cols) = img.resolution();
    let snapshot = img.samples().clone();
    let limits = [0, 1, rows - 1, cols - 1];

    for r in 0..rows {
        for c in 0..cols {
            if limits.contains(&r) || limits.contains(&c) {
                continue;
            }
            let mut sum = 0u32;
            for dr in 0..3 {
                for dc in 0..3 {
                    sum += snapshot[[r + dr - 1, c + dc - 1]];
                }
            }
            img.samples_mut()[[r, c]] = (f64::from(sum) / 9.0).round() as u32;
        }
    }
}
