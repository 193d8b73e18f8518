use std::str::FromStr;

use image::GrayImage;

use crate::imghash::hamming::{Container, Fingerprint};
use crate::imghash::transform;
use crate::imghash::ConfigError;

pub const DEFAULT_ALGORITHM: HashAlgorithm = HashAlgorithm::Difference;

/// The closed set of fingerprint extractors. All of them consume a grayscale
/// grid of the size given by [`HashAlgorithm::grid_size`] and produce a bit
/// vector of [`HashAlgorithm::bit_len`] bits.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    serde::Serialize,
    serde::Deserialize,
)]
pub enum HashAlgorithm {
    /// aHash: each pixel against the mean luminance of the grid. The fastest
    /// and least discriminating.
    Average,
    /// dHash: the sign of each horizontal gradient. Good speed/accuracy
    /// balance, hence the default.
    Difference,
    /// pHash: low-frequency DCT coefficients against their median. Holds up
    /// best against recompression, costs the most.
    Perceptual,
    /// wHash: the Haar approximation band against its median. Comparable to
    /// pHash, handles noise better and rescaling worse.
    Wavelet,
}

impl HashAlgorithm {
    pub const ALL: [HashAlgorithm; 4] = [
        HashAlgorithm::Average,
        HashAlgorithm::Difference,
        HashAlgorithm::Perceptual,
        HashAlgorithm::Wavelet,
    ];

    /// Width and height of the normalized grid the algorithm consumes.
    pub fn grid_size(self) -> (u32, u32) {
        match self {
            Self::Average => (8, 8),
            // one extra column, gradients eat one
            Self::Difference => (9, 8),
            Self::Perceptual => (32, 32),
            Self::Wavelet => (64, 64),
        }
    }

    /// Number of significant fingerprint bits.
    pub fn bit_len(self) -> u32 {
        match self {
            Self::Average | Self::Difference | Self::Wavelet => 64,
            // the DC term is dropped from the retained 8x8 block
            Self::Perceptual => 63,
        }
    }

    /// Extract the fingerprint from a grid of exactly [`Self::grid_size`]
    /// dimensions. Pure and deterministic.
    pub fn hash_grid(self, grid: &GrayImage) -> Fingerprint {
        debug_assert_eq!(self.grid_size(), grid.dimensions());
        let bits = match self {
            Self::Average => average_bits(grid),
            Self::Difference => difference_bits(grid),
            Self::Perceptual => perceptual_bits(grid),
            Self::Wavelet => wavelet_bits(grid),
        };
        Fingerprint::from_bits(self, bits)
    }
}

impl FromStr for HashAlgorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            a if a.eq_ignore_ascii_case("ahash") => Ok(Self::Average),
            a if a.eq_ignore_ascii_case("dhash") => Ok(Self::Difference),
            a if a.eq_ignore_ascii_case("phash") => Ok(Self::Perceptual),
            a if a.eq_ignore_ascii_case("whash") => Ok(Self::Wavelet),
            other => Err(ConfigError::UnknownAlgorithm(other.to_string())),
        }
    }
}

impl std::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Average => "aHash",
            Self::Difference => "dHash",
            Self::Perceptual => "pHash",
            Self::Wavelet => "wHash",
        };
        name.fmt(f)
    }
}

/// Row-major, first pixel in the most significant bit.
fn average_bits(grid: &GrayImage) -> Container {
    let total: u64 = grid.pixels().map(|p| u64::from(p[0])).sum();
    let count = u64::from(grid.width()) * u64::from(grid.height());
    let mean = total as f64 / count as f64;

    grid.pixels()
        .fold(0, |bits, p| (bits << 1) | Container::from(f64::from(p[0]) >= mean))
}

fn difference_bits(grid: &GrayImage) -> Container {
    let mut bits = 0;
    for y in 0..grid.height() {
        for x in 0..grid.width() - 1 {
            let left = grid.get_pixel(x, y)[0];
            let right = grid.get_pixel(x + 1, y)[0];
            bits = (bits << 1) | Container::from(left > right);
        }
    }
    bits
}

fn perceptual_bits(grid: &GrayImage) -> Container {
    const KEEP: usize = 8;
    let size = grid.width() as usize;
    let samples: Vec<f64> = grid.pixels().map(|p| f64::from(p[0])).collect();
    let freq = transform::dct_2d(&samples, size);

    // The top-left KEEP x KEEP block holds the lowest frequencies. The DC
    // term only measures overall brightness and would skew the median.
    let mut coeffs = Vec::with_capacity(KEEP * KEEP - 1);
    for y in 0..KEEP {
        for x in 0..KEEP {
            if x == 0 && y == 0 {
                continue;
            }
            coeffs.push(freq[y * size + x]);
        }
    }

    threshold_bits(&coeffs, median(&coeffs))
}

fn wavelet_bits(grid: &GrayImage) -> Container {
    const LEVELS: u32 = 3;
    let size = grid.width() as usize;
    let mut samples: Vec<f64> = grid.pixels().map(|p| f64::from(p[0])).collect();
    let approx = transform::haar_2d(&mut samples, size, LEVELS);

    threshold_bits(&approx, median(&approx))
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).expect("coefficients are finite"));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

fn threshold_bits(coeffs: &[f64], threshold: f64) -> Container {
    debug_assert!(coeffs.len() <= Container::BITS as usize);
    coeffs
        .iter()
        .fold(0, |bits, &c| (bits << 1) | Container::from(c > threshold))
}
