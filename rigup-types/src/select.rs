//! Step selection policy.
//!
//! Applied per step, in catalog order:
//! 1. named in `exclude` -> excluded
//! 2. `include` non-empty and not named in it -> excluded
//! 3. otherwise -> included
//!
//! Exclude wins when a step appears in both sets. That tie-break is part of
//! the documented CLI contract; callers should surface `overlapping_steps`
//! as a warning since it usually indicates operator error.

use crate::config::RunConfig;
use crate::step::StepId;

/// Whether the selection policy includes `step` for this run.
pub fn is_selected(config: &RunConfig, step: StepId) -> bool {
    if config.exclude.contains(&step) {
        return false;
    }
    if !config.include.is_empty() && !config.include.contains(&step) {
        return false;
    }
    true
}

/// Steps named in both the include and exclude sets, in catalog order.
pub fn overlapping_steps(config: &RunConfig) -> Vec<StepId> {
    StepId::ALL
        .iter()
        .copied()
        .filter(|s| config.include.contains(s) && config.exclude.contains(s))
        .collect()
}
