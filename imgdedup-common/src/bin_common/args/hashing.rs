use clap::Args;

/// Hashing configuration shared by every binary. The names are resolved
/// eagerly at call entry so a typo fails before any file is touched.
#[derive(Args, Debug)]
pub struct HashingCli {
    /// Hashing algorithm: aHash, dHash, pHash or wHash
    #[arg(long, default_value = "dHash")]
    algo: String,

    /// Resampling filter: nearest, triangle, catmullrom, gaussian or lanczos3
    #[arg(long, default_value = "triangle")]
    filter: String,
}

impl HashingCli {
    pub fn algo(&self) -> &str {
        &self.algo
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }
}
