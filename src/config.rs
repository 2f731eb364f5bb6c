// Copyright (c) Sienna Satterwhite, Skiplayer Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

use getset::CopyGetters;

use crate::errs::SkipListError;

/// A fair coin.
pub const DEFAULT_PROBABILITY: f64 = 0.5;

/// Upper bound on the number of layers a list may grow to. With a fair coin
/// this is far beyond what ~4 billion keys would reach.
pub const DEFAULT_MAX_LAYERS: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct Config {
    /// Chance that a freshly placed node is promoted one layer up.
    probability: f64,
    /// Promotion stops once a tower touches the top of this ceiling.
    max_layers: usize,
    /// Seeds the promotion rng for reproducible layouts.
    seed: Option<u64>,
}

impl Config {
    pub fn new() -> Self {
        Config {
            probability: DEFAULT_PROBABILITY,
            max_layers: DEFAULT_MAX_LAYERS,
            seed: None,
        }
    }

    pub fn with_probability(mut self, probability: f64) -> Self {
        self.probability = probability;
        self
    }

    pub fn with_max_layers(mut self, max_layers: usize) -> Self {
        self.max_layers = max_layers;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), SkipListError> {
        validate_probability(self.probability)?;
        if self.max_layers == 0 {
            return Err(SkipListError::InvalidMaxLayers(self.max_layers));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn validate_probability(probability: f64) -> Result<(), SkipListError> {
    // NaN fails the range check too
    if !(0.0..=1.0).contains(&probability) {
        return Err(SkipListError::InvalidProbability(probability));
    }
    Ok(())
}
