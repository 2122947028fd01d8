use serde::{Deserialize, Serialize};

pub const ACTOR0: u32 = 1 << 0;
pub const ACTOR1: u32 = 1 << 1;
pub const ACTOR2: u32 = 1 << 2;
pub const ACTOR3: u32 = 1 << 3;

/// Collision group an actor belongs to and the groups it wants to hear about
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterTag {
    pub group: u32,
    pub mask: u32,
}

impl FilterTag {
    pub const fn new(group: u32, mask: u32) -> Self {
        Self { group, mask }
    }
}

/// Per-shape input to the pair filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterState {
    pub tag: FilterTag,
    pub trigger: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PairOutcome {
    /// Overlap reported, no contact response
    TriggerNotify,
    /// Contact resolved and reported
    ContactNotify,
    /// Contact resolved silently
    ContactSolveOnly,
}

impl PairOutcome {
    pub fn notifies(self) -> bool {
        !matches!(self, PairOutcome::ContactSolveOnly)
    }
}

/// Decides how a candidate pair is treated. Triggers win over groups, and
/// contacts are only reported when each side's group is in the other's mask.
pub fn classify(a: &FilterState, b: &FilterState) -> PairOutcome {
    if a.trigger || b.trigger {
        return PairOutcome::TriggerNotify;
    }

    if (a.tag.group & b.tag.mask) != 0 && (b.tag.group & a.tag.mask) != 0 {
        PairOutcome::ContactNotify
    } else {
        PairOutcome::ContactSolveOnly
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(group: u32, mask: u32) -> FilterState {
        FilterState {
            tag: FilterTag::new(group, mask),
            trigger: false,
        }
    }

    fn all_states() -> Vec<FilterState> {
        let mut states = Vec::new();
        for group in 0..16 {
            for mask in 0..16 {
                for trigger in [false, true] {
                    states.push(FilterState {
                        tag: FilterTag::new(group, mask),
                        trigger,
                    });
                }
            }
        }
        states
    }

    #[test]
    fn test_trigger_dominates() {
        let states = all_states();
        for a in states.iter().filter(|s| s.trigger) {
            for b in &states {
                assert_eq!(classify(a, b), PairOutcome::TriggerNotify);
                assert_eq!(classify(b, a), PairOutcome::TriggerNotify);
            }
        }
    }

    #[test]
    fn test_outcome_is_symmetric() {
        let states = all_states();
        for a in &states {
            for b in &states {
                assert_eq!(classify(a, b), classify(b, a), "{a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn test_solid_pairs_follow_masks() {
        let states = all_states();
        for a in states.iter().filter(|s| !s.trigger) {
            for b in states.iter().filter(|s| !s.trigger) {
                let expected = (a.tag.group & b.tag.mask) != 0 && (b.tag.group & a.tag.mask) != 0;
                assert_eq!(classify(a, b).notifies(), expected, "{a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn test_ball_and_wall_notify() {
        let ball = solid(ACTOR1, ACTOR0);
        let wall = solid(ACTOR0, ACTOR1);
        assert_eq!(classify(&ball, &wall), PairOutcome::ContactNotify);
    }

    #[test]
    fn test_one_sided_interest_is_silent() {
        // Ball listens for ACTOR0 but the crate on ACTOR2 does not listen back
        let ball = solid(ACTOR1, ACTOR0);
        let crate_box = solid(ACTOR0, ACTOR2);
        assert_eq!(classify(&ball, &crate_box), PairOutcome::ContactSolveOnly);
    }

    #[test]
    fn test_default_tags_solve_only() {
        let a = FilterState::default();
        assert_eq!(classify(&a, &a), PairOutcome::ContactSolveOnly);
        assert!(!PairOutcome::ContactSolveOnly.notifies());
    }
}
