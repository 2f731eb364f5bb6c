// Copyright (c) Sienna Satterwhite, Skiplayer Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SkipListError {
    #[error("promotion probability {0} is outside of [0.0, 1.0]")]
    InvalidProbability(f64),
    #[error("layer ceiling must be at least 1, got {0}")]
    InvalidMaxLayers(usize),
    #[error("invariant violated on layer {layer}: {reason}")]
    InvariantViolation { layer: usize, reason: String },
}

impl SkipListError {
    pub(crate) fn violation(layer: usize, reason: impl Into<String>) -> Self {
        SkipListError::InvariantViolation {
            layer,
            reason: reason.into(),
        }
    }
}
