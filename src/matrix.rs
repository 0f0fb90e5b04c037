//! The pixel data model: a 2-D grid of integer intensity samples plus the
//! decode/encode glue around the `image` crate.

use std::path::Path;

use image::{GrayImage, RgbImage};
use ndarray::Array2;

use crate::error::{EnhanceError, Result};

/// How to open an image file, mirroring the usual imread modes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OpenMode {
    Grayscale,
    Color,
    /// Keep whatever the file holds; resolved to a [`ChannelMode`] at
    /// decode time.
    Unchanged,
}

/// The channel interpretation a decoded matrix actually carries.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChannelMode {
    Grayscale,
    Color,
}

/// Distinct intensities of a single 8-bit channel.
pub const GRAY_LEVELS: u32 = 256;
/// Distinct intensities of packed 24-bit color.
pub const COLOR_LEVELS: u32 = 256 * 256 * 256;

/// A 2-D grid of integer intensity samples.
///
/// Grayscale samples are `0..=255`; color samples pack the three channels
/// into one integer (`r<<16 | g<<8 | b`) so the `[0, levels-1]` invariant
/// is representable under a single sample type. Every sample stays inside
/// `[0, levels-1]` at all times, and mutation goes through the transform
/// operators, never ad hoc.
#[derive(Clone, Debug)]
pub struct IntensityMatrix {
    samples: Array2<u32>,
    mode: ChannelMode,
}

impl IntensityMatrix {
    /// Decode an image file into a matrix.
    pub fn decode(path: impl AsRef<Path>, mode: OpenMode) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(EnhanceError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let img = image::open(path).map_err(|source| EnhanceError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

        let mode = match mode {
            OpenMode::Grayscale => ChannelMode::Grayscale,
            OpenMode::Color => ChannelMode::Color,
            OpenMode::Unchanged => {
                if img.color().has_color() {
                    ChannelMode::Color
                } else {
                    ChannelMode::Grayscale
                }
            }
        };

        let samples = match mode {
            ChannelMode::Grayscale => {
                let gray = img.to_luma8();
                let (w, h) = (gray.width() as usize, gray.height() as usize);
                let buffer = gray.into_raw().into_iter().map(u32::from).collect();
                Array2::from_shape_vec((h, w), buffer)
                    .expect("decoded buffer matches its dimensions")
            }
            ChannelMode::Color => {
                let rgb = img.to_rgb8();
                let (w, h) = (rgb.width() as usize, rgb.height() as usize);
                let buffer = rgb.pixels().map(|p| pack_rgb(p.0)).collect();
                Array2::from_shape_vec((h, w), buffer)
                    .expect("decoded buffer matches its dimensions")
            }
        };
        Self::from_samples(samples, mode)
    }

    /// Wrap an already-built sample grid, checking the invariants.
    pub fn from_samples(samples: Array2<u32>, mode: ChannelMode) -> Result<Self> {
        if samples.is_empty() {
            return Err(EnhanceError::EmptyMatrix);
        }
        let levels = levels_of(mode);
        if let Some(&value) = samples.iter().find(|&&v| v >= levels) {
            return Err(EnhanceError::SampleOutOfRange { value, levels });
        }
        Ok(Self { samples, mode })
    }

    /// Write the matrix back out through the `image` crate.
    pub fn encode(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let (rows, cols) = self.resolution();
        let (w, h) = (cols as u32, rows as u32);
        let saved = match self.mode {
            ChannelMode::Grayscale => {
                let buffer: Vec<u8> = self.samples.iter().map(|&v| v as u8).collect();
                GrayImage::from_raw(w, h, buffer)
                    .expect("sample count matches the resolution")
                    .save(path)
            }
            ChannelMode::Color => {
                let mut buffer = Vec::with_capacity(rows * cols * 3);
                for &v in self.samples.iter() {
                    buffer.extend_from_slice(&unpack_rgb(v));
                }
                RgbImage::from_raw(w, h, buffer)
                    .expect("sample count matches the resolution")
                    .save(path)
            }
        };
        saved.map_err(|source| EnhanceError::Encode {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn mode(&self) -> ChannelMode {
        self.mode
    }

    /// Number of distinct representable intensities for this matrix.
    pub fn levels(&self) -> u32 {
        levels_of(self.mode)
    }

    /// `(rows, cols)`.
    pub fn resolution(&self) -> (usize, usize) {
        self.samples.dim()
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    pub fn samples(&self) -> &Array2<u32> {
        &self.samples
    }

    pub(crate) fn samples_mut(&mut self) -> &mut Array2<u32> {
        &mut self.samples
    }
}

impl PartialEq for IntensityMatrix {
    fn eq(&self, other: &Self) -> bool {
        self.samples == other.samples
    }
}

fn levels_of(mode: ChannelMode) -> u32 {
    match mode {
        ChannelMode::Grayscale => GRAY_LEVELS,
        ChannelMode::Color => COLOR_LEVELS,
    }
}

fn pack_rgb([r, g, b]: [u8; 3]) -> u32 {
    u32::from(r) << 16 | u32::from(g) << 8 | u32::from(b)
}

fn unpack_rgb(v: u32) -> [u8; 3] {
    [(v >> 16) as u8, (v >> 8) as u8, v as u8]
}
