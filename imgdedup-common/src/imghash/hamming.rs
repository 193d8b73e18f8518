use crate::imghash::algorithm::HashAlgorithm;

pub type Distance = u32;
pub type Container = u64;

/// A fixed-length bit vector summarizing the visual content of one image,
/// tagged with the algorithm that produced it. Fingerprints of different
/// algorithms never compare against each other.
#[derive(
    Clone,
    Copy,
    serde::Serialize,
    serde::Deserialize,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Ord,
    PartialOrd,
)]
pub struct Fingerprint {
    algo: HashAlgorithm,
    bits: Container,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cannot compare a {left} fingerprint with a {right} fingerprint")]
pub struct AlgorithmMismatch {
    pub left: HashAlgorithm,
    pub right: HashAlgorithm,
}

impl Fingerprint {
    pub const MIN_DIST: Distance = 0;

    pub fn from_bits(algo: HashAlgorithm, bits: Container) -> Self {
        Self { algo, bits }
    }

    pub fn algo(self) -> HashAlgorithm {
        self.algo
    }

    pub fn bits(self) -> Container {
        self.bits
    }

    /// Number of significant bits, constant per algorithm.
    pub fn len(self) -> u32 {
        self.algo.bit_len()
    }

    pub fn max_distance(self) -> Distance {
        self.algo.bit_len()
    }

    /// Hamming distance, i.e. the number of differing bits.
    pub fn distance_to(self, other: Self) -> Result<Distance, AlgorithmMismatch> {
        if self.algo != other.algo {
            return Err(AlgorithmMismatch {
                left: self.algo,
                right: other.algo,
            });
        }
        Ok(Self::bit_distance(self.bits, other.bits))
    }

    pub(crate) fn bit_distance(a: Container, b: Container) -> Distance {
        (a ^ b).count_ones()
    }

    pub fn to_base64(self) -> String {
        base64::Engine::encode(
            &base64::prelude::BASE64_STANDARD_NO_PAD,
            self.bits.to_ne_bytes(),
        )
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.to_base64().fmt(f)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn dhash(bits: Container) -> Fingerprint {
        Fingerprint::from_bits(HashAlgorithm::Difference, bits)
    }

    #[test]
    fn hamming_distances() {
        assert_eq!(Ok(0), dhash(0).distance_to(dhash(0)));
        assert_eq!(
            Ok(0),
            dhash(Container::MAX).distance_to(dhash(Container::MAX))
        );
        assert_eq!(Ok(3), dhash(0b101).distance_to(dhash(0b010)));
        assert_eq!(
            dhash(0b101).distance_to(dhash(0b010)),
            dhash(0b010).distance_to(dhash(0b101))
        );
    }

    #[test]
    fn mismatched_algorithms_do_not_compare() {
        let a = Fingerprint::from_bits(HashAlgorithm::Average, 0);
        let d = dhash(0);
        assert_eq!(
            Err(AlgorithmMismatch {
                left: HashAlgorithm::Average,
                right: HashAlgorithm::Difference,
            }),
            a.distance_to(d)
        );
    }

    #[test]
    fn base64_is_stable() {
        let fp = dhash(0x0123_4567_89ab_cdef);
        assert_eq!(fp.to_base64(), fp.to_base64());
        // 8 bytes, unpadded
        assert_eq!(11, fp.to_base64().len());
        assert_eq!(fp.to_base64(), fp.to_string());
    }
}
