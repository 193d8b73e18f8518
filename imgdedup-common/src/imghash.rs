use image::DynamicImage;

pub mod algorithm;
pub mod hamming;
pub mod normalize;
pub mod transform;

pub use self::algorithm::HashAlgorithm;
pub use self::hamming::{Distance, Fingerprint};
pub use self::normalize::ResampleFilter;

use self::normalize::NormalizeError;

/// Unusable configuration names given by a caller. Fatal to the whole call,
/// unlike per-file trouble.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unsupported hashing algorithm: {0}")]
    UnknownAlgorithm(String),
    #[error("unsupported filter type: {0}")]
    UnknownFilter(String),
}

/// Fingerprint an already decoded image: shrink it to the algorithm's grid
/// with the given filter and extract the bits.
pub fn hash_image(
    img: &DynamicImage,
    algo: HashAlgorithm,
    filter: ResampleFilter,
) -> Result<Fingerprint, NormalizeError> {
    let (width, height) = algo.grid_size();
    let grid = normalize::normalize(img, width, height, filter)?;
    Ok(algo.hash_grid(&grid))
}

#[cfg(test)]
mod test {
    use crate::utils::imgutils::filled;

    use super::*;

    #[test]
    fn same_image_same_fingerprint() {
        let img = DynamicImage::ImageRgb8(filled(300, 200, 128, 64, 32));
        for algo in HashAlgorithm::ALL {
            let a = hash_image(&img, algo, ResampleFilter::Triangle).unwrap();
            let b = hash_image(&img, algo, ResampleFilter::Triangle).unwrap();
            assert_eq!(a, b);
            assert_eq!(algo, a.algo());
        }
    }
}
