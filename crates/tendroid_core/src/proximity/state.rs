//! Proximity states and the legal transition graph.
//!
//! ```text
//!   Idle ──► Approaching ──► Contact ──► Retreating ──► Recovered
//!                 ▲                                        │
//!                 └────────────────────────────────────────┘
//! ```
//!
//! The table lists every edge [`determine_next_state`](super::determine_next_state)
//! can produce, including the two global overrides (anything → `Contact` at
//! the surface, anything → `Idle` past detection range).

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::Zone;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProximityState {
    /// Beyond detection radius
    #[default]
    Idle,
    /// Inside detection range
    Approaching,
    /// At or below approach epsilon
    Contact,
    /// Leaving the surface after contact
    Retreating,
    /// Beyond approach minimum after a retreat
    Recovered,
}

impl ProximityState {
    pub const ALL: [ProximityState; 5] = [
        ProximityState::Idle,
        ProximityState::Approaching,
        ProximityState::Contact,
        ProximityState::Retreating,
        ProximityState::Recovered,
    ];

    /// Targets reachable from `self` in one step (self excluded).
    pub fn successors(self) -> &'static [ProximityState] {
        use ProximityState::*;
        match self {
            Idle => &[Approaching, Contact],
            Approaching => &[Contact, Recovered, Idle],
            Contact => &[Retreating, Idle],
            Retreating => &[Contact, Recovered, Idle],
            Recovered => &[Approaching, Idle, Contact],
        }
    }

    /// Self transitions are always legal.
    pub fn can_transition_to(self, to: ProximityState) -> bool {
        self == to || self.successors().contains(&to)
    }

    /// Higher is more urgent.
    pub fn priority(self) -> u8 {
        match self {
            ProximityState::Idle => 0,
            ProximityState::Recovered => 1,
            ProximityState::Approaching => 2,
            ProximityState::Retreating => 3,
            ProximityState::Contact => 4,
        }
    }

    /// Approximate zone for a state.
    pub fn zone(self) -> Zone {
        match self {
            ProximityState::Idle => Zone::Idle,
            ProximityState::Approaching => Zone::Detected,
            ProximityState::Contact => Zone::Contact,
            ProximityState::Retreating => Zone::Recovering,
            ProximityState::Recovered => Zone::Approaching,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ProximityState::Idle => "IDLE",
            ProximityState::Approaching => "APPROACHING",
            ProximityState::Contact => "CONTACT",
            ProximityState::Retreating => "RETREATING",
            ProximityState::Recovered => "RECOVERED",
        }
    }
}

impl fmt::Display for ProximityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Human-readable description of a transition.
pub fn transition_description(from: ProximityState, to: ProximityState) -> &'static str {
    use ProximityState::*;
    match (from, to) {
        (Idle, Approaching) => "Agent entered detection range",
        (Idle, Contact) => "Agent made instant contact",
        (Approaching, Contact) => "Agent made contact",
        (Approaching, Recovered) => "Agent turned away",
        (Contact, Retreating) => "Agent retreating from contact",
        (Retreating, Recovered) => "Agent reached safe distance",
        (Retreating, Contact) => "Agent re-entered contact",
        (Recovered, Approaching) => "Agent approaching again",
        (Recovered, Contact) => "Agent made instant re-contact",
        (_, Idle) => "Agent left detection range",
        _ => "State changed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_transitions_legal() {
        for s in ProximityState::ALL {
            assert!(s.can_transition_to(s));
        }
    }

    #[test]
    fn test_illegal_edges() {
        assert!(!ProximityState::Idle.can_transition_to(ProximityState::Recovered));
        assert!(!ProximityState::Idle.can_transition_to(ProximityState::Retreating));
        assert!(!ProximityState::Contact.can_transition_to(ProximityState::Recovered));
        assert!(!ProximityState::Approaching.can_transition_to(ProximityState::Retreating));
    }

    #[test]
    fn test_override_edges_present() {
        for s in ProximityState::ALL {
            assert!(s.can_transition_to(ProximityState::Contact), "{s} -> CONTACT");
            assert!(s.can_transition_to(ProximityState::Idle), "{s} -> IDLE");
        }
    }

    #[test]
    fn test_priority_order() {
        assert!(ProximityState::Contact.priority() > ProximityState::Retreating.priority());
        assert!(ProximityState::Retreating.priority() > ProximityState::Approaching.priority());
        assert!(ProximityState::Recovered.priority() > ProximityState::Idle.priority());
    }

    #[test]
    fn test_descriptions() {
        assert_eq!(
            transition_description(ProximityState::Idle, ProximityState::Approaching),
            "Agent entered detection range"
        );
        assert_eq!(
            transition_description(ProximityState::Contact, ProximityState::Idle),
            "Agent left detection range"
        );
        assert_eq!(
            transition_description(ProximityState::Contact, ProximityState::Contact),
            "State changed"
        );
    }
}
