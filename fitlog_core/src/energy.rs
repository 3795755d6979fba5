//! Energy-need calculator (Mifflin-St Jeor).
//!
//! BMR is computed from the body profile; TDEE scales the *unrounded* BMR by
//! the activity multiplier. Both are rounded to whole kilocalories
//! independently.

use crate::{parse, Gender, Profile, ProfileSnapshot};
use serde::{Deserialize, Serialize};

/// Deficit applied to TDEE for the recommended weight-loss intake
pub const WEIGHT_LOSS_DEFICIT: i64 = 500;

/// Rounded daily energy requirements
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergyNeeds {
    pub bmr: i64,
    pub tdee: i64,
}

impl EnergyNeeds {
    /// Recommended intake for weight loss: `TDEE - 500`.
    ///
    /// Not clamped: a very small TDEE yields a negative target, which is
    /// returned as-is.
    pub fn weight_loss_target(&self) -> i64 {
        self.tdee - WEIGHT_LOSS_DEFICIT
    }
}

impl Profile {
    /// Validate raw form text into a profile
    ///
    /// Returns `None` when age, height or weight is missing or not positive.
    pub fn from_snapshot(snapshot: &ProfileSnapshot) -> Option<Self> {
        let age = parse::parse_positive_int(&snapshot.age)?;
        let height = parse::parse_positive_real(&snapshot.height)?;
        let weight = parse::parse_positive_real(&snapshot.weight)?;

        Some(Self {
            age,
            gender: Gender::from_key(&snapshot.gender),
            height,
            weight,
            activity_level: crate::ActivityLevel::from_key_or_default(&snapshot.activity_level),
        })
    }
}

/// Unrounded basal metabolic rate
pub fn basal_metabolic_rate(profile: &Profile) -> f64 {
    let age = f64::from(profile.age);
    match profile.gender {
        Gender::Male => 88.362 + 13.397 * profile.weight + 4.799 * profile.height - 5.677 * age,
        Gender::Female => {
            447.593 + 9.247 * profile.weight + 3.098 * profile.height - 4.330 * age
        }
    }
}

/// Compute BMR and TDEE for a validated profile
pub fn energy_needs(profile: &Profile) -> EnergyNeeds {
    let bmr = basal_metabolic_rate(profile);
    let tdee = bmr * profile.activity_level.multiplier();

    EnergyNeeds {
        bmr: bmr.round() as i64,
        tdee: tdee.round() as i64,
    }
}

/// Compute energy needs straight from the form snapshot
///
/// Returns `None` ("unavailable") if the snapshot does not validate; the
/// caller must not display a result in that case.
pub fn calculate(snapshot: &ProfileSnapshot) -> Option<EnergyNeeds> {
    let profile = Profile::from_snapshot(snapshot)?;
    let needs = energy_needs(&profile);
    tracing::debug!(
        "Energy needs for {:?}/{:?}: BMR {} TDEE {}",
        profile.gender,
        profile.activity_level,
        needs.bmr,
        needs.tdee
    );
    Some(needs)
}
