//! The enhancement pipeline: owns the working matrix, applies operators
//! in sequence, and tracks which filters are currently reflected in it.

use std::fs;
use std::path::{Path, PathBuf};

use itertools::Itertools;
use log::{debug, info};

use crate::error::{EnhanceError, Result};
use crate::histogram;
use crate::matrix::{IntensityMatrix, OpenMode};
use crate::spatial;
use crate::transform::{self, BoostType, ContrastMode};

const NEGATIVE: &str = "negative";

pub struct ImageEnhancement {
    img: IntensityMatrix,
    original: IntensityMatrix,
    source: PathBuf,
    filters: Vec<&'static str>,
}

impl ImageEnhancement {
    /// Decode an image file and wrap it in a fresh pipeline. The decoded
    /// matrix is retained so [`reset`](Self::reset) never re-reads the
    /// file.
    pub fn open(path: impl AsRef<Path>, mode: OpenMode) -> Result<Self> {
        let path = path.as_ref();
        let img = IntensityMatrix::decode(path, mode)?;
        debug!("decoded {} at {:?}", path.display(), img.resolution());
        Ok(Self {
            original: img.clone(),
            img,
            source: path.to_path_buf(),
            filters: Vec::new(),
        })
    }

    /// Wrap an already-built matrix; `name` stands in for the source file
    /// name when deriving output names.
    pub fn from_matrix(img: IntensityMatrix, name: impl Into<PathBuf>) -> Self {
        Self {
            original: img.clone(),
            img,
            source: name.into(),
            filters: Vec::new(),
        }
    }

    pub fn matrix(&self) -> &IntensityMatrix {
        &self.img
    }

    /// Filters currently reflected in the matrix, oldest first.
    pub fn history(&self) -> &[&'static str] {
        &self.filters
    }

    pub fn filters_applied(&self) -> usize {
        self.filters.len()
    }

    /// Two negatives in a row cancel exactly, so instead of recording the
    /// pair the previous entry is dropped. Only this operator gets the
    /// shortcut; everything else always appends.
    pub fn negative(&mut self) -> &mut Self {
        transform::negative(&mut self.img);
        if self.filters.last() == Some(&NEGATIVE) {
            self.filters.pop();
        } else {
            self.filters.push(NEGATIVE);
        }
        self
    }

    pub fn stretch_contrast(&mut self, percent: u32) -> &mut Self {
        transform::contrast(&mut self.img, percent, ContrastMode::Stretch);
        self.filters.push("contrast_stretch");
        self
    }

    pub fn contract_contrast(&mut self, percent: u32) -> &mut Self {
        transform::contrast(&mut self.img, percent, ContrastMode::Contract);
        self.filters.push("contrast_contracted");
        self
    }

    pub fn gray_level_slicing(&mut self, range: (u32, u32), boost: BoostType) -> &mut Self {
        transform::gray_level_slicing(&mut self.img, range, boost);
        self.filters.push("gray_level_slicing");
        self
    }

    pub fn bit_plane_slicing(&mut self, plane: u32) -> Result<&mut Self> {
        transform::bit_plane_slicing(&mut self.img, plane)?;
        self.filters.push("bit_plane_slicing");
        Ok(self)
    }

    pub fn subtract(&mut self, other: &IntensityMatrix) -> Result<&mut Self> {
        transform::subtract(&mut self.img, other)?;
        self.filters.push("subtracted");
        Ok(self)
    }

    pub fn histogram_equalization(&mut self) -> Result<&mut Self> {
        histogram::equalize(&mut self.img)?;
        self.filters.push("histogram_equalized");
        Ok(self)
    }

    pub fn histogram_equalization_in_range(&mut self, range: (u32, u32)) -> Result<&mut Self> {
        histogram::equalize_in_range(&mut self.img, range)?;
        self.filters.push("histogram_equalized");
        Ok(self)
    }

    pub fn averaging(&mut self) -> &mut Self {
        spatial::averaging(&mut self.img);
        self.filters.push("averaged");
        self
    }

    /// Restore the original decoded matrix and clear the history.
    pub fn reset(&mut self) -> &mut Self {
        self.img = self.original.clone();
        self.filters.clear();
        self
    }

    /// Output file name: the source base name followed by every applied
    /// filter, underscore-separated, keeping the source extension.
    pub fn output_name(&self) -> String {
        let stem = self
            .source
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("image");
        let mut name = std::iter::once(stem)
            .chain(self.filters.iter().copied())
            .join("_");
        if let Some(ext) = self.source.extension().and_then(|s| s.to_str()) {
            name.push('.');
            name.push_str(ext);
        }
        name
    }

    /// Encode the current matrix into `out_dir` under the derived name,
    /// creating the directory when missing.
    pub fn save(&self, out_dir: impl AsRef<Path>) -> Result<PathBuf> {
        let out_dir = out_dir.as_ref();
        if out_dir.exists() {
            debug!("directory {} already exists", out_dir.display());
        } else {
            info!("creating directory {} ...", out_dir.display());
            fs::create_dir_all(out_dir).map_err(|source| EnhanceError::Io {
                path: out_dir.to_path_buf(),
                source,
            })?;
        }
        let path = out_dir.join(self.output_name());
        info!("saving image to {} ...", path.display());
        self.img.encode(&path)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use ndarray::{array, Array2};

    use super::*;
    use crate::matrix::ChannelMode;

    fn pipeline(samples: Array2<u32>) -> ImageEnhancement {
        let img = IntensityMatrix::from_samples(samples, ChannelMode::Grayscale).unwrap();
        ImageEnhancement::from_matrix(img, "parrot.png")
    }

    #[test]
    fn adjacent_negatives_cancel_out_of_the_history() {
        let mut ie = pipeline(array![[0u32, 100], [200, 255]]);
        let original = ie.matrix().clone();
        ie.negative();
        assert_eq!(ie.history(), ["negative"]);
        ie.negative();
        assert_eq!(ie.filters_applied(), 0);
        assert_eq!(ie.matrix(), &original);
    }

    #[test]
    fn non_adjacent_negatives_do_not_cancel() {
        let mut ie = pipeline(array![[5u32, 80], [160, 250]]);
        ie.negative();
        ie.stretch_contrast(10);
        ie.negative();
        assert_eq!(
            ie.history(),
            ["negative", "contrast_stretch", "negative"]
        );
    }

    #[test]
    fn every_other_operator_appends_its_canonical_name() {
        let mut ie = pipeline(array![[10u32, 60], [120, 240]]);
        let operand =
            IntensityMatrix::from_samples(array![[1u32, 1], [1, 1]], ChannelMode::Grayscale)
                .unwrap();
        ie.contract_contrast(0);
        ie.gray_level_slicing((20, 200), BoostType::Up);
        ie.bit_plane_slicing(8).unwrap();
        ie.histogram_equalization().unwrap();
        ie.averaging();
        ie.subtract(&operand).unwrap();
        assert_eq!(
            ie.history(),
            [
                "contrast_contracted",
                "gray_level_slicing",
                "bit_plane_slicing",
                "histogram_equalized",
                "averaged",
                "subtracted",
            ]
        );
    }

    #[test]
    fn reset_restores_the_original_and_clears_the_history() {
        let mut ie = pipeline(array![[0u32, 100], [200, 255]]);
        let original = ie.matrix().clone();
        ie.negative().stretch_contrast(25);
        assert_ne!(ie.matrix(), &original);
        ie.reset();
        assert_eq!(ie.matrix(), &original);
        assert_eq!(ie.filters_applied(), 0);
    }

    #[test]
    fn output_name_concatenates_the_history() {
        let mut ie = pipeline(array![[0u32, 100], [200, 255]]);
        assert_eq!(ie.output_name(), "parrot.png");
        ie.negative();
        ie.histogram_equalization().unwrap();
        assert_eq!(ie.output_name(), "parrot_negative_histogram_equalized.png");
    }

    #[test]
    fn failed_validation_leaves_the_history_alone() {
        let mut ie = pipeline(array![[1u32, 2], [3, 4]]);
        assert!(ie.bit_plane_slicing(9).is_err());
        let wrong = IntensityMatrix::from_samples(array![[0u32]], ChannelMode::Grayscale).unwrap();
        assert!(ie.subtract(&wrong).is_err());
        assert_eq!(ie.filters_applied(), 0);
    }
}
