//! Track roles and the playback profile each one gets.
//!
//! | role          | tracks          | pitch       | duration | gain |
//! | ------------- | --------------- | ----------- | -------- | ---- |
//! | lead          | 0               | tone + 72   | × 0.5    | 0.5  |
//! | accompaniment | everything else | tone + 48   | × 0.5    | 0.3  |
//!
//! The lead line sits an octave above the accompaniment and plays louder.
//! Further roles can be added by name and bound to specific tracks; any
//! track without an explicit binding keeps the lead/accompaniment split.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const LEAD: &str = "lead";
pub const ACCOMPANIMENT: &str = "accompaniment";

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoleProfile {
    /// Pitch of tone 0 (72 = C5, 48 = C3).
    pub octave_base: i32,
    /// Factor applied to the requested duration.
    pub duration_scale: f32,
    /// Linear output level.
    pub gain: f32,
}

impl RoleProfile {
    pub const LEAD: Self = Self {
        octave_base: 72,
        duration_scale: 0.5,
        gain: 0.5,
    };

    pub const ACCOMPANIMENT: Self = Self {
        octave_base: 48,
        duration_scale: 0.5,
        gain: 0.3,
    };

    #[inline]
    pub fn pitch(&self, tone: i32) -> i32 {
        self.octave_base.saturating_add(tone)
    }

    #[inline]
    pub fn duration(&self, requested: f32) -> f32 {
        requested * self.duration_scale
    }
}

/// Role lookup by track id.
#[derive(Debug, Clone)]
pub struct RoleTable {
    profiles: BTreeMap<String, RoleProfile>,
    assignments: BTreeMap<u32, String>,
}

impl RoleTable {
    pub fn new() -> Self {
        let profiles = BTreeMap::from([
            (LEAD.to_owned(), RoleProfile::LEAD),
            (ACCOMPANIMENT.to_owned(), RoleProfile::ACCOMPANIMENT),
        ]);

        Self {
            profiles,
            assignments: BTreeMap::new(),
        }
    }

    /// Add a role or replace an existing role's profile.
    pub fn with_profile(mut self, role: impl Into<String>, profile: RoleProfile) -> Self {
        self.profiles.insert(role.into(), profile);
        self
    }

    /// Bind `track` to `role`, overriding the default split.
    pub fn assign(&mut self, track: u32, role: &str) -> Result<()> {
        if !self.profiles.contains_key(role) {
            return Err(Error::UnknownRole {
                track,
                role: role.to_owned(),
            });
        }
        self.assignments.insert(track, role.to_owned());
        Ok(())
    }

    /// Role name for `track`: explicit binding first, then track 0 is the
    /// lead and every other track accompanies.
    pub fn role_for(&self, track: u32) -> &str {
        match self.assignments.get(&track) {
            Some(role) => role.as_str(),
            None if track == 0 => LEAD,
            None => ACCOMPANIMENT,
        }
    }

    pub fn profile_for(&self, track: u32) -> (&str, &RoleProfile) {
        let role = self.role_for(track);
        // Bindings are validated in `assign` and the two defaults are
        // always present.
        let profile = self.profiles.get(role).unwrap_or(&RoleProfile::ACCOMPANIMENT);
        (role, profile)
    }

    pub fn profile(&self, role: &str) -> Option<&RoleProfile> {
        self.profiles.get(role)
    }

    pub fn roles(&self) -> impl Iterator<Item = (&str, &RoleProfile)> {
        self.profiles.iter().map(|(name, profile)| (name.as_str(), profile))
    }
}

impl Default for RoleTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_zero_leads() {
        let table = RoleTable::new();
        let (role, profile) = table.profile_for(0);

        assert_eq!(role, LEAD);
        assert_eq!(profile.pitch(0), 72);
        assert_eq!(profile.gain, 0.5);
    }

    #[test]
    fn other_tracks_accompany() {
        let table = RoleTable::new();

        for track in [1, 2, 7, u32::MAX] {
            let (role, profile) = table.profile_for(track);
            assert_eq!(role, ACCOMPANIMENT);
            assert_eq!(profile.pitch(3), 51);
            assert_eq!(profile.gain, 0.3);
        }
    }

    #[test]
    fn pitch_offsets_hold_for_any_tone() {
        let table = RoleTable::new();

        for tone in -24..=24 {
            assert_eq!(table.profile_for(0).1.pitch(tone), tone + 72);
            assert_eq!(table.profile_for(5).1.pitch(tone), tone + 48);
        }
    }

    #[test]
    fn duration_is_halved_for_both_roles() {
        let table = RoleTable::new();

        for duration in [0.25_f32, 1.0, 2.0, 3.5] {
            assert_eq!(table.profile_for(0).1.duration(duration), duration * 0.5);
            assert_eq!(table.profile_for(1).1.duration(duration), duration * 0.5);
        }
    }

    #[test]
    fn extra_roles_bind_to_tracks() {
        let bass = RoleProfile {
            octave_base: 36,
            duration_scale: 1.0,
            gain: 0.4,
        };
        let mut table = RoleTable::new().with_profile("bass", bass);
        table.assign(3, "bass").expect("known role");

        assert_eq!(table.profile_for(3), ("bass", &bass));
        assert_eq!(table.role_for(2), ACCOMPANIMENT);
    }

    #[test]
    fn unknown_role_binding_is_rejected() {
        let mut table = RoleTable::new();

        let err = table.assign(1, "drums").unwrap_err();
        assert!(matches!(err, Error::UnknownRole { track: 1, .. }));
        assert_eq!(table.role_for(1), ACCOMPANIMENT);
    }

    #[test]
    fn track_zero_can_be_rebound() {
        let mut table = RoleTable::new();
        table.assign(0, ACCOMPANIMENT).expect("known role");

        assert_eq!(table.role_for(0), ACCOMPANIMENT);
    }
}
