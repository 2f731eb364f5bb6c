// Copyright (c) Sienna Satterwhite, Skiplayer Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

use rand::prelude::*;
use tracing::trace;

use crate::{
    config::{
        validate_probability,
        Config,
        DEFAULT_PROBABILITY,
    },
    errs::SkipListError,
};

/// After a node is placed on a layer, the list asks its `PromotionPolicy`
/// whether that node should also appear one layer higher. The list keeps
/// asking until the policy says no, so a policy that always answers `true`
/// only stops at the configured layer ceiling.
pub trait PromotionPolicy {
    fn promote(&mut self) -> bool;

    /// Called once the list stops asking for the current insertion, whether
    /// the policy said no or the ceiling was reached.
    fn finish(&mut self) {}
}

impl<P: PromotionPolicy + ?Sized> PromotionPolicy for &mut P {
    #[inline]
    fn promote(&mut self) -> bool {
        (**self).promote()
    }

    #[inline]
    fn finish(&mut self) {
        (**self).finish()
    }
}

impl<P: PromotionPolicy + ?Sized> PromotionPolicy for Box<P> {
    #[inline]
    fn promote(&mut self) -> bool {
        (**self).promote()
    }

    #[inline]
    fn finish(&mut self) {
        (**self).finish()
    }
}

/// Independent biased coin flips, with a one-shot override.
///
/// [`RandomPromotionPolicy::force`] makes the next `n` decisions `true` and
/// the one after them `false`, which ends the insertion that consumed them.
/// The policy then goes back to flipping coins.
#[derive(Debug, Clone)]
pub struct RandomPromotionPolicy {
    probability: f64,
    forced: Option<usize>,
    rng: SmallRng, // Fast generator
}

impl RandomPromotionPolicy {
    /// Create a policy that promotes with chance `probability`.
    ///
    /// # Errors
    ///
    /// `probability` must be within `[0, 1]`.
    pub fn new(probability: f64) -> Result<Self, SkipListError> {
        validate_probability(probability)?;
        Ok(RandomPromotionPolicy {
            probability,
            forced: None,
            rng: SmallRng::from_entropy(),
        })
    }

    pub fn seeded(probability: f64, seed: u64) -> Result<Self, SkipListError> {
        validate_probability(probability)?;
        Ok(RandomPromotionPolicy {
            probability,
            forced: None,
            rng: SmallRng::seed_from_u64(seed),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, SkipListError> {
        config.validate()?;
        match config.seed() {
            | Some(seed) => Self::seeded(config.probability(), seed),
            | None => Self::new(config.probability()),
        }
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    pub fn set_probability(&mut self, probability: f64) -> Result<(), SkipListError> {
        validate_probability(probability)?;
        self.probability = probability;
        Ok(())
    }

    /// Promote exactly `times` more layers on the next insertion. Zero
    /// cancels a pending override.
    pub fn force(&mut self, times: usize) {
        self.forced = if times == 0 { None } else { Some(times) };
    }

    /// Remaining forced promotions, if an override is pending.
    pub fn pending(&self) -> Option<usize> {
        self.forced
    }
}

impl Default for RandomPromotionPolicy {
    fn default() -> Self {
        RandomPromotionPolicy {
            probability: DEFAULT_PROBABILITY,
            forced: None,
            rng: SmallRng::from_entropy(),
        }
    }
}

impl PromotionPolicy for RandomPromotionPolicy {
    fn promote(&mut self) -> bool {
        match self.forced {
            | Some(0) => {
                trace!("forced promotions exhausted");
                self.forced = None;
                false
            },
            | Some(n) => {
                self.forced = Some(n - 1);
                true
            },
            | None => self.rng.gen_bool(self.probability),
        }
    }

    fn finish(&mut self) {
        if self.forced.take().is_some() {
            trace!("dropping forced promotions cut short by the ceiling");
        }
    }
}

/// Replays a fixed script of decisions, then never promotes again.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPolicy {
    script: Vec<bool>,
    cursor: usize,
}

impl ScriptedPolicy {
    pub fn new(script: impl Into<Vec<bool>>) -> Self {
        ScriptedPolicy {
            script: script.into(),
            cursor: 0,
        }
    }

    /// A policy that keeps every key on the bottom layer.
    pub fn never() -> Self {
        Self::default()
    }

    /// Append more decisions to the end of the script.
    pub fn push(&mut self, decisions: impl IntoIterator<Item = bool>) {
        self.script.extend(decisions);
    }

    pub fn remaining(&self) -> usize {
        self.script.len() - self.cursor
    }
}

impl PromotionPolicy for ScriptedPolicy {
    fn promote(&mut self) -> bool {
        match self.script.get(self.cursor) {
            | Some(&decision) => {
                self.cursor += 1;
                decision
            },
            | None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        PromotionPolicy,
        RandomPromotionPolicy,
        ScriptedPolicy,
    };
    use crate::{
        config::Config,
        errs::SkipListError,
    };

    #[test]
    fn test_invalid_probability() {
        assert_eq!(
            RandomPromotionPolicy::new(1.5).err(),
            Some(SkipListError::InvalidProbability(1.5))
        );
        assert!(RandomPromotionPolicy::new(-0.5).is_err());
        let mut policy = RandomPromotionPolicy::default();
        assert!(policy.set_probability(2.0).is_err());
        assert_eq!(policy.probability(), 0.5);
    }

    #[test]
    fn test_extreme_probabilities() {
        let mut never = RandomPromotionPolicy::seeded(0.0, 7).unwrap();
        let mut always = RandomPromotionPolicy::seeded(1.0, 7).unwrap();
        for _ in 0..1_000 {
            assert!(!never.promote());
            assert!(always.promote());
        }
    }

    #[test]
    fn test_forced_then_stop_then_revert() {
        let mut policy = RandomPromotionPolicy::seeded(0.0, 1).unwrap();
        policy.force(3);
        assert_eq!(policy.pending(), Some(3));
        assert!(policy.promote());
        assert!(policy.promote());
        assert!(policy.promote());
        assert!(!policy.promote(), "the decision after the forced run must stop");
        assert_eq!(policy.pending(), None);
        // back to coin flips, which never promote at p = 0
        assert!(!policy.promote());
    }

    #[test]
    fn test_force_zero_cancels() {
        let mut policy = RandomPromotionPolicy::seeded(0.0, 1).unwrap();
        policy.force(2);
        policy.force(0);
        assert_eq!(policy.pending(), None);
        assert!(!policy.promote());
    }

    #[test]
    fn test_finish_drops_leftover_override() {
        let mut policy = RandomPromotionPolicy::seeded(0.0, 1).unwrap();
        policy.force(5);
        assert!(policy.promote());
        assert!(policy.promote());
        policy.finish();
        assert_eq!(policy.pending(), None);
        assert!(!policy.promote());

        // finishing without an override leaves the coin alone
        let mut always = RandomPromotionPolicy::seeded(1.0, 1).unwrap();
        always.finish();
        assert!(always.promote());
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let config = Config::new().with_seed(42);
        let mut a = RandomPromotionPolicy::from_config(&config).unwrap();
        let mut b = RandomPromotionPolicy::from_config(&config).unwrap();
        let xs: Vec<bool> = (0..64).map(|_| a.promote()).collect();
        let ys: Vec<bool> = (0..64).map(|_| b.promote()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_fair_coin_is_roughly_fair() {
        let mut policy = RandomPromotionPolicy::seeded(0.5, 1234).unwrap();
        let heads = (0..10_000).filter(|_| policy.promote()).count();
        assert!((4_000..6_000).contains(&heads), "got {} heads", heads);
    }

    #[test]
    fn test_scripted() {
        let mut policy = ScriptedPolicy::new(vec![true, false, true]);
        assert_eq!(policy.remaining(), 3);
        assert!(policy.promote());
        assert!(!policy.promote());
        assert!(policy.promote());
        assert!(!policy.promote());
        assert!(!policy.promote());

        policy.push([true]);
        assert!(policy.promote());
        assert!(!ScriptedPolicy::never().promote());
    }

    #[test]
    fn test_boxed_policy() {
        let mut boxed: Box<dyn PromotionPolicy> = Box::new(ScriptedPolicy::new([true]));
        assert!(boxed.promote());
        assert!(!boxed.promote());
    }
}
