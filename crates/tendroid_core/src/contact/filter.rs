//! Contact filtering.
//!
//! Physics reports contacts between arbitrary actor pairs. Only agent/obstacle
//! pairs matter here; actors are recognised by their scene path.

use serde::{Deserialize, Serialize};

use crate::math::{normalize_or, Vec3, FALLBACK_DIRECTION};

/// Distance along the normal from contact point to the estimated agent center.
pub const DEFAULT_AGENT_OFFSET: f32 = 0.1;

/// Path patterns identifying agents and obstacles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorPatterns {
    /// Matched as path prefixes
    pub agent_prefixes: Vec<String>,
    /// Matched anywhere in the path
    pub obstacle_substrings: Vec<String>,
}

impl Default for ActorPatterns {
    fn default() -> Self {
        Self {
            agent_prefixes: vec!["/World/Creature".to_string()],
            obstacle_substrings: vec!["/World/Tendroids/".to_string(), "/World/Tendroid_".to_string()],
        }
    }
}

impl ActorPatterns {
    pub fn is_agent(&self, path: &str) -> bool {
        self.agent_prefixes.iter().any(|p| path.starts_with(p.as_str()))
    }

    pub fn is_obstacle(&self, path: &str) -> bool {
        self.obstacle_substrings.iter().any(|p| path.contains(p.as_str()))
    }
}

/// One contact point as reported by the physics layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawContact<'a> {
    pub actor0: &'a str,
    pub actor1: &'a str,
    pub point: Vec3,
    /// Points from actor1 toward actor0
    pub normal: Vec3,
    pub impulse: f32,
    /// Negative when the actors overlap
    pub separation: f32,
}

/// An agent/obstacle contact with the normal pointing away from the obstacle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub agent_path: String,
    pub obstacle_path: String,
    pub contact_point: Vec3,
    pub contact_normal: Vec3,
    pub impulse: f32,
    pub separation: f32,
}

impl ContactInfo {
    pub fn event(&self) -> ContactEvent {
        ContactEvent {
            contact_point: self.contact_point,
            surface_normal: self.contact_normal,
            impulse: self.impulse,
            separation: self.separation,
        }
    }
}

/// Returns `None` unless exactly one side is an agent and the other an
/// obstacle. The normal is flipped when the agent is `actor1`.
pub fn extract_contact_info(contact: &RawContact<'_>, patterns: &ActorPatterns) -> Option<ContactInfo> {
    let info = |agent: &str, obstacle: &str, normal: Vec3| ContactInfo {
        agent_path: agent.to_string(),
        obstacle_path: obstacle.to_string(),
        contact_point: contact.point,
        contact_normal: normal,
        impulse: contact.impulse,
        separation: contact.separation,
    };
    if patterns.is_agent(contact.actor0) && patterns.is_obstacle(contact.actor1) {
        Some(info(contact.actor0, contact.actor1, contact.normal))
    } else if patterns.is_agent(contact.actor1) && patterns.is_obstacle(contact.actor0) {
        Some(info(contact.actor1, contact.actor0, -contact.normal))
    } else {
        None
    }
}

/// Keep agent/obstacle contacts, in input order.
pub fn filter_contacts(contacts: &[RawContact<'_>], patterns: &ActorPatterns) -> Vec<ContactInfo> {
    contacts.iter().filter_map(|c| extract_contact_info(c, patterns)).collect()
}

/// A new agent/obstacle collision, the input that starts a recovery.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContactEvent {
    pub contact_point: Vec3,
    /// Points away from the obstacle
    pub surface_normal: Vec3,
    pub impulse: f32,
    pub separation: f32,
}

impl ContactEvent {
    pub fn new(contact_point: Vec3, surface_normal: Vec3, impulse: f32, separation: f32) -> Self {
        Self { contact_point, surface_normal, impulse, separation }
    }

    /// Repulsion force `normal * impulse`.
    pub fn force_from_impulse(&self) -> Vec3 {
        self.surface_normal * self.impulse
    }

    /// Agent center guessed `offset` out along the normal.
    pub fn estimate_agent_position(&self, offset: f32) -> Vec3 {
        self.contact_point + normalize_or(&self.surface_normal, FALLBACK_DIRECTION) * offset
    }

    /// How far the obstacle surface is pushed in.
    pub fn deflection(&self) -> f32 {
        self.separation.abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::vec3;

    fn raw<'a>(a0: &'a str, a1: &'a str) -> RawContact<'a> {
        RawContact {
            actor0: a0,
            actor1: a1,
            point: vec3(1.0, 0.5, 0.0),
            normal: vec3(1.0, 0.0, 0.0),
            impulse: 4.0,
            separation: -0.02,
        }
    }

    #[test]
    fn test_patterns() {
        let p = ActorPatterns::default();
        assert!(p.is_agent("/World/Creature/body"));
        assert!(!p.is_agent("/Scene/World/Creature"));
        assert!(p.is_obstacle("/Root/World/Tendroids/t3/mesh"));
        assert!(p.is_obstacle("/World/Tendroid_07"));
        assert!(!p.is_obstacle("/World/Rock"));
    }

    #[test]
    fn test_normal_flipped_for_reversed_order() {
        let p = ActorPatterns::default();
        let forward = extract_contact_info(&raw("/World/Creature", "/World/Tendroid_1"), &p).unwrap();
        assert_eq!(forward.contact_normal, vec3(1.0, 0.0, 0.0));
        assert_eq!(forward.agent_path, "/World/Creature");

        let reversed = extract_contact_info(&raw("/World/Tendroid_1", "/World/Creature"), &p).unwrap();
        assert_eq!(reversed.contact_normal, vec3(-1.0, 0.0, 0.0));
        assert_eq!(reversed.agent_path, "/World/Creature");
        assert_eq!(reversed.obstacle_path, "/World/Tendroid_1");
    }

    #[test]
    fn test_filter_drops_unrelated_pairs() {
        let p = ActorPatterns::default();
        let contacts = [
            raw("/World/Creature", "/World/Rock"),
            raw("/World/Tendroid_1", "/World/Tendroid_2"),
            raw("/World/Creature", "/World/Tendroids/a"),
        ];
        let kept = filter_contacts(&contacts, &p);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].obstacle_path, "/World/Tendroids/a");
    }

    #[test]
    fn test_event_helpers() {
        let e = ContactEvent::new(vec3(1.0, 0.5, 0.0), vec3(0.0, 0.0, 1.0), 10.0, -0.03);
        assert_eq!(e.force_from_impulse(), vec3(0.0, 0.0, 10.0));
        let pos = e.estimate_agent_position(DEFAULT_AGENT_OFFSET);
        assert!((pos.z - 0.1).abs() < 1e-6);
        assert!((e.deflection() - 0.03).abs() < 1e-6);
    }
}
