//! Proximity transition rules.
//!
//! Two global overrides run first: at or below `approach_epsilon` the pair is
//! always in `Contact`, beyond `detection_radius` it is always `Idle`. In
//! between, the current state decides. Leaving `Approaching` or `Recovered`
//! needs measured movement (more than [`MOVEMENT_THRESHOLD`] per sample), so
//! an agent holding still never flips state on noise.

use super::ProximityState;
use crate::config::ApproachParameters;

/// Minimum per-sample distance change (1mm) counted as movement.
pub const MOVEMENT_THRESHOLD: f32 = 0.001;

/// Movement direction between two samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Approaching,
    Retreating,
    Holding,
}

impl Movement {
    /// Classify the change from `previous` to `distance`. No previous sample
    /// counts as holding.
    pub fn classify(distance: f32, previous: Option<f32>) -> Self {
        match previous {
            Some(prev) => {
                let delta = prev - distance;
                if delta > MOVEMENT_THRESHOLD {
                    Movement::Approaching
                } else if delta < -MOVEMENT_THRESHOLD {
                    Movement::Retreating
                } else {
                    Movement::Holding
                }
            }
            None => Movement::Holding,
        }
    }
}

/// Next state for a distance sample. Returns `(next, changed)`.
///
/// Total over all inputs; every produced `(current, next)` pair satisfies
/// [`ProximityState::can_transition_to`].
pub fn determine_next_state(
    current: ProximityState,
    distance: f32,
    previous_distance: Option<f32>,
    params: &ApproachParameters,
) -> (ProximityState, bool) {
    let movement = Movement::classify(distance, previous_distance);
    let next = next_state(current, distance, movement, params);
    (next, next != current)
}

fn next_state(
    current: ProximityState,
    distance: f32,
    movement: Movement,
    params: &ApproachParameters,
) -> ProximityState {
    if distance <= params.approach_epsilon {
        return ProximityState::Contact;
    }
    if distance > params.detection_radius {
        return ProximityState::Idle;
    }

    match current {
        ProximityState::Idle => ProximityState::Approaching,
        ProximityState::Approaching => {
            // Holding steady keeps Approaching, even past warning_distance
            if movement == Movement::Retreating && distance > params.approach_minimum {
                ProximityState::Recovered
            } else {
                ProximityState::Approaching
            }
        }
        // distance > epsilon here
        ProximityState::Contact => ProximityState::Retreating,
        ProximityState::Retreating => {
            if distance > params.approach_minimum {
                ProximityState::Recovered
            } else {
                ProximityState::Retreating
            }
        }
        ProximityState::Recovered => {
            if movement == Movement::Approaching && distance <= params.warning_distance {
                ProximityState::Approaching
            } else {
                ProximityState::Recovered
            }
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn any_state() -> impl Strategy<Value = ProximityState> {
        prop::sample::select(ProximityState::ALL.to_vec())
    }

    proptest! {
        /// No orphan transitions: every produced edge is in the table.
        #[test]
        fn transitions_stay_in_table(
            from in any_state(),
            distance in -0.5f32..2.0,
            previous in prop::option::of(-0.5f32..2.0),
        ) {
            let p = ApproachParameters::default();
            let (to, changed) = determine_next_state(from, distance, previous, &p);
            prop_assert!(from.can_transition_to(to), "{} -> {}", from, to);
            prop_assert_eq!(changed, from != to);
        }

        #[test]
        fn zones_are_monotonic(a in -0.5f32..2.0, b in -0.5f32..2.0) {
            let p = ApproachParameters::default();
            let (near, far) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(p.zone_for(near) <= p.zone_for(far));
        }
    }
}
