use crate::blend::algorithms::Algorithm;
use crate::codec::png::{CompressionHint, EncodeHints, FilterHint};
use crate::foundation::error::{BlendError, BlendResult};
use crate::meta::DEFAULT_THREAD_POOL_SIZE;

/// Options accepted by every blend entry point.
///
/// Unknown keys are rejected both by the JSON form and by [`BlendOptions::from_pairs`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlendOptions {
    /// Strips per composite; `1` runs inline on the caller, `> 1` uses the shared pool.
    pub num_threads: usize,
    /// Algorithm for a pair, and the default for every batch step.
    pub algorithm: Algorithm,
    /// PNG filter hint for the encoded output.
    pub filter: FilterHint,
    /// PNG compression hint for the encoded output.
    pub compression: CompressionHint,
}

impl Default for BlendOptions {
    fn default() -> Self {
        Self {
            num_threads: DEFAULT_THREAD_POOL_SIZE,
            algorithm: Algorithm::SourceOver,
            filter: FilterHint::default(),
            compression: CompressionHint::default(),
        }
    }
}

impl BlendOptions {
    pub const KEYS: [&'static str; 4] = ["num_threads", "algorithm", "filter", "compression"];

    pub fn with_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = num_threads;
        self
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_hints(mut self, hints: EncodeHints) -> Self {
        self.filter = hints.filter;
        self.compression = hints.compression;
        self
    }

    pub fn hints(&self) -> EncodeHints {
        EncodeHints {
            filter: self.filter,
            compression: self.compression,
        }
    }

    pub fn validate(&self) -> BlendResult<()> {
        if self.num_threads == 0 {
            return Err(BlendError::config("num_threads must be >= 1"));
        }
        Ok(())
    }

    /// Parse and validate options from a JSON object. Missing keys take their defaults.
    pub fn from_json(json: &str) -> BlendResult<Self> {
        let opts: Self = serde_json::from_str(json)
            .map_err(|e| BlendError::config(format!("options json: {e}")))?;
        opts.validate()?;
        Ok(opts)
    }

    /// Build options from a string key/value bag, the shape a binding layer passes through.
    pub fn from_pairs<I, K, V>(pairs: I) -> BlendResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut opts = Self::default();
        for (key, value) in pairs {
            let (key, value) = (key.as_ref(), value.as_ref());
            match key {
                "num_threads" => {
                    opts.num_threads = value.trim().parse().map_err(|_| {
                        BlendError::config(format!(
                            "num_threads must be a positive integer, got '{value}'"
                        ))
                    })?;
                }
                "algorithm" => opts.algorithm = value.parse()?,
                "filter" => opts.filter = value.parse()?,
                "compression" => opts.compression = value.parse()?,
                other => {
                    return Err(BlendError::config(format!(
                        "unknown option '{other}' (expected one of: {})",
                        Self::KEYS.join(", ")
                    )));
                }
            }
        }
        opts.validate()?;
        Ok(opts)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/dispatch/options.rs"]
mod tests;
