//! Rest duration between sets.
//!
//! Without an explicit value the duration comes from the target rep string
//! of the exercise about to be performed. The buckets are a rough
//! heavy/moderate/light split, not a physiological model: any target
//! containing "RM", "4" or "5" is heavy, "8" or "10" moderate, the rest light.

use crate::config::RestConfig;
use crate::TargetSet;

#[derive(Clone, Debug)]
pub struct RestPolicy {
    prefer_explicit: bool,
    heavy_seconds: u32,
    moderate_seconds: u32,
    light_seconds: u32,
}

impl Default for RestPolicy {
    fn default() -> Self {
        Self::from_config(&RestConfig::default())
    }
}

impl RestPolicy {
    pub fn from_config(config: &RestConfig) -> Self {
        Self {
            prefer_explicit: config.prefer_explicit,
            heavy_seconds: config.heavy_seconds,
            moderate_seconds: config.moderate_seconds,
            light_seconds: config.light_seconds,
        }
    }

    /// Rest before performing `target_set`, whose exercise opens with `first_set`
    pub fn rest_before(&self, first_set: &TargetSet, target_set: &TargetSet) -> u32 {
        if self.prefer_explicit {
            if let Some(seconds) = target_set.rest_seconds {
                return seconds;
            }
        }
        self.from_target_reps(&first_set.target_reps)
    }

    /// Bucket a rep string
    pub fn from_target_reps(&self, target_reps: &str) -> u32 {
        if target_reps.contains("RM") || target_reps.contains('4') || target_reps.contains('5') {
            self.heavy_seconds
        } else if target_reps.contains('8') || target_reps.contains("10") {
            self.moderate_seconds
        } else {
            self.light_seconds
        }
    }
}
