use clap::Args;

use crate::imghash::hamming::Distance;

pub const DEFAULT_SIMILARITY_THRESHOLD: Distance = 0;

#[derive(Args, Debug)]
pub struct SimiCli {
    /// Maximum distance for two images to be considered equal; zero keeps
    /// only exact fingerprint matches
    #[arg(long, default_value_t = DEFAULT_SIMILARITY_THRESHOLD)]
    similarity_threshold: Distance,
}

impl SimiCli {
    pub fn threshold(&self) -> Distance {
        self.similarity_threshold
    }
}
