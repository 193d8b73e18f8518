use std::str::FromStr;

use image::{imageops, imageops::FilterType, DynamicImage, GrayImage};

use crate::imghash::ConfigError;

pub const DEFAULT_FILTER: ResampleFilter = ResampleFilter::Triangle;

/// The resampling kernels available for shrinking an image down to a hash
/// grid. The kernel affects hash stability, not correctness.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
pub enum ResampleFilter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl ResampleFilter {
    pub const ALL: [ResampleFilter; 5] = [
        ResampleFilter::Nearest,
        ResampleFilter::Triangle,
        ResampleFilter::CatmullRom,
        ResampleFilter::Gaussian,
        ResampleFilter::Lanczos3,
    ];

    fn as_image_filter(self) -> FilterType {
        match self {
            Self::Nearest => FilterType::Nearest,
            Self::Triangle => FilterType::Triangle,
            Self::CatmullRom => FilterType::CatmullRom,
            Self::Gaussian => FilterType::Gaussian,
            Self::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

impl FromStr for ResampleFilter {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            f if f.eq_ignore_ascii_case("nearest") => Ok(Self::Nearest),
            f if f.eq_ignore_ascii_case("triangle") => Ok(Self::Triangle),
            f if f.eq_ignore_ascii_case("catmullrom") => Ok(Self::CatmullRom),
            f if f.eq_ignore_ascii_case("gaussian") => Ok(Self::Gaussian),
            f if f.eq_ignore_ascii_case("lanczos3") => Ok(Self::Lanczos3),
            other => Err(ConfigError::UnknownFilter(other.to_string())),
        }
    }
}

impl std::fmt::Display for ResampleFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Nearest => "nearest",
            Self::Triangle => "triangle",
            Self::CatmullRom => "catmullrom",
            Self::Gaussian => "gaussian",
            Self::Lanczos3 => "lanczos3",
        };
        name.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    #[error("cannot resize to a degenerate {width}x{height} grid")]
    UnsupportedDimensions { width: u32, height: u32 },
}

/// Convert to grayscale and resize to exactly `width` x `height`.
///
/// Grayscale comes first so every algorithm sees the same luma weighting of
/// the color channels, and the kernel only runs over a single channel.
pub fn normalize(
    image: &DynamicImage,
    width: u32,
    height: u32,
    filter: ResampleFilter,
) -> Result<GrayImage, NormalizeError> {
    if width == 0 || height == 0 {
        return Err(NormalizeError::UnsupportedDimensions { width, height });
    }

    let gray = image.to_luma8();
    Ok(imageops::resize(
        &gray,
        width,
        height,
        filter.as_image_filter(),
    ))
}
