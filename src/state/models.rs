//! Entities held by the client state container.
//!
//! Every persisted type tolerates missing fields on load (`#[serde(default)]`)
//! so a blob written by an older client still restores.

use crate::{auth::PublicUser, store::Division};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_SCHOLARSHIP_CAP: f64 = 12.0;
pub const DEFAULT_NIL_POOL: f64 = 50_000.0;
pub const DEFAULT_SEASON_YEAR: &str = "2024-25";

/// Player figures may arrive as numbers or as numeric text (`"61200"`);
/// blanks and unparsable text read as zero.
fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(value)) => value,
        Some(Raw::Text(text)) => text.trim().parse().unwrap_or(0.0),
        None => 0.0,
    })
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CoachProfile {
    pub name: String,
    pub email: String,
    pub team: String,
    pub division: Division,
    pub offense: String,
    pub defense: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl From<&PublicUser> for CoachProfile {
    fn from(user: &PublicUser) -> Self {
        Self {
            name: user.full_name.clone(),
            email: user.email.clone(),
            team: user.team_name.clone(),
            division: user.division.clone(),
            offense: user.offensive_system.clone(),
            defense: user.defensive_system.clone(),
            avatar: None,
        }
    }
}

/// Relative emphasis per position group, in percent.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct PositionWeights {
    #[serde(rename = "PG")]
    pub point_guard: f64,
    #[serde(rename = "CG")]
    pub combo_guard: f64,
    #[serde(rename = "Wing")]
    pub wing: f64,
    #[serde(rename = "Forward")]
    pub forward: f64,
    #[serde(rename = "Big")]
    pub big: f64,
}

impl Default for PositionWeights {
    fn default() -> Self {
        Self {
            point_guard: 20.0,
            combo_guard: 20.0,
            wing: 20.0,
            forward: 20.0,
            big: 20.0,
        }
    }
}

/// Program and financial context configured by the coach.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CoachingBias {
    pub program_name: String,
    pub program_level: String,
    pub division: String,
    pub season_year: String,
    pub offensive_system: String,
    pub defensive_system: String,
    pub position_weights: PositionWeights,
    pub scholarship_cap: f64,
    pub nil_pool: f64,
}

impl Default for CoachingBias {
    fn default() -> Self {
        Self {
            program_name: String::new(),
            program_level: String::new(),
            division: String::new(),
            season_year: DEFAULT_SEASON_YEAR.to_string(),
            offensive_system: String::new(),
            defensive_system: String::new(),
            position_weights: PositionWeights::default(),
            scholarship_cap: DEFAULT_SCHOLARSHIP_CAP,
            nil_pool: DEFAULT_NIL_POOL,
        }
    }
}

impl CoachingBias {
    /// Defaults prefilled from the coach's program.
    #[must_use]
    pub fn for_coach(coach: &CoachProfile) -> Self {
        Self {
            program_name: coach.team.clone(),
            program_level: coach.division.to_string(),
            offensive_system: coach.offense.clone(),
            defensive_system: coach.defense.clone(),
            ..Self::default()
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct RosterPlayer {
    pub id: String,
    pub name: String,
    pub position: String,
    #[serde(deserialize_with = "lenient_number")]
    pub kpi: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub fit: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub confidence: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub scholarship: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub nil: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct TeamState {
    pub roster: Vec<RosterPlayer>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayerProfile {
    pub id: String,
    pub name: String,
    pub position: String,
    #[serde(deserialize_with = "lenient_number")]
    pub kpi: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub fit: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub confidence: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub scholarship: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub nil: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_year: Option<String>,
}

impl From<&PlayerProfile> for RosterPlayer {
    fn from(profile: &PlayerProfile) -> Self {
        Self {
            id: profile.id.clone(),
            name: profile.name.clone(),
            position: profile.position.clone(),
            kpi: profile.kpi,
            fit: profile.fit,
            confidence: profile.confidence,
            scholarship: profile.scholarship,
            nil: profile.nil,
        }
    }
}

/// Partial update merged into an existing player profile.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerUpdate {
    pub name: Option<String>,
    pub position: Option<String>,
    pub kpi: Option<f64>,
    pub fit: Option<f64>,
    pub confidence: Option<f64>,
    pub scholarship: Option<f64>,
    pub nil: Option<f64>,
    pub school: Option<String>,
    pub class_year: Option<String>,
}

impl PlayerUpdate {
    pub(crate) fn apply(self, profile: &mut PlayerProfile) {
        if let Some(name) = self.name {
            profile.name = name;
        }
        if let Some(position) = self.position {
            profile.position = position;
        }
        if let Some(kpi) = self.kpi {
            profile.kpi = kpi;
        }
        if let Some(fit) = self.fit {
            profile.fit = fit;
        }
        if let Some(confidence) = self.confidence {
            profile.confidence = confidence;
        }
        if let Some(scholarship) = self.scholarship {
            profile.scholarship = scholarship;
        }
        if let Some(nil) = self.nil {
            profile.nil = nil;
        }
        if self.school.is_some() {
            profile.school = self.school;
        }
        if self.class_year.is_some() {
            profile.class_year = self.class_year;
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RecruitStatus {
    #[default]
    Active,
    Committed,
}

/// A prospect from the recruiting feed, before it lands on the board.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Prospect {
    pub id: String,
    pub name: String,
    pub position: String,
    pub division: Division,
    pub school: String,
    pub class_year: String,
    pub kpi: f64,
    pub nil_readiness: f64,
    pub confidence: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Recruit {
    pub id: String,
    pub name: String,
    pub position: String,
    pub division: Division,
    pub school: String,
    pub class_year: String,
    pub kpi: f64,
    pub nil_readiness: f64,
    pub confidence: f64,
    pub status: RecruitStatus,
    pub is_priority: bool,
    pub scholarship_offer: f64,
    pub nil_offer: f64,
    pub date_added: DateTime<Utc>,
}

impl Default for Recruit {
    fn default() -> Self {
        Self::from_prospect(Prospect::default(), DateTime::<Utc>::default())
    }
}

impl Recruit {
    /// Put a prospect on the board: active, not prioritized, no offers.
    #[must_use]
    pub fn from_prospect(prospect: Prospect, date_added: DateTime<Utc>) -> Self {
        Self {
            id: prospect.id,
            name: prospect.name,
            position: prospect.position,
            division: prospect.division,
            school: prospect.school,
            class_year: prospect.class_year,
            kpi: prospect.kpi,
            nil_readiness: prospect.nil_readiness,
            confidence: prospect.confidence,
            status: RecruitStatus::Active,
            is_priority: false,
            scholarship_offer: 0.0,
            nil_offer: 0.0,
            date_added,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct RecruitingState {
    pub active_recruits: Vec<Recruit>,
}

impl RecruitingState {
    #[must_use]
    pub fn priority_count(&self) -> usize {
        self.active_recruits
            .iter()
            .filter(|recruit| recruit.is_priority)
            .count()
    }

    #[must_use]
    pub fn committed_count(&self) -> usize {
        self.active_recruits
            .iter()
            .filter(|recruit| recruit.status == RecruitStatus::Committed)
            .count()
    }

    pub(crate) fn find_mut(&mut self, id: &str) -> Option<&mut Recruit> {
        self.active_recruits.iter_mut().find(|recruit| recruit.id == id)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    Info,
    Success,
    Warning,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AssistantMessage {
    pub speaker: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    /// Milliseconds since the unix epoch.
    pub timestamp: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AssistantStage {
    #[default]
    #[serde(rename = "welcome")]
    Welcome,
    #[serde(rename = "stage1")]
    Onboarding,
}

/// Assistant dialogue. Lives only in memory.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AssistantState {
    pub is_open: bool,
    pub is_minimized: bool,
    pub stage: AssistantStage,
    pub messages: Vec<AssistantMessage>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use serde_json::json;

    #[test]
    fn coach_profile_from_public_user() {
        let user = PublicUser {
            id: "01J0000000000000000000000".to_string(),
            email: "a@x.com".to_string(),
            full_name: "Coach A".to_string(),
            team_name: "Tigers".to_string(),
            division: Division::Naia,
            offensive_system: "Five-Out".to_string(),
            defensive_system: "Pack Line".to_string(),
        };

        let coach = CoachProfile::from(&user);

        assert_eq!(coach.name, "Coach A");
        assert_eq!(coach.team, "Tigers");
        assert_eq!(coach.division, Division::Naia);
        assert_eq!(coach.offense, "Five-Out");
        assert_eq!(coach.avatar, None);
    }

    #[test]
    fn coach_profile_tolerates_partial_blobs() -> Result<()> {
        let coach: CoachProfile = serde_json::from_value(json!({
            "name": "Coach User",
            "email": "coach@x.com",
            "team": "Sample Team",
            "division": "USCAA"
        }))?;

        assert_eq!(coach.division, Division::Uscaa);
        assert_eq!(coach.offense, "");
        Ok(())
    }

    #[test]
    fn coaching_bias_defaults() -> Result<()> {
        let bias = CoachingBias::default();
        assert!((bias.scholarship_cap - 12.0).abs() < f64::EPSILON);
        assert!((bias.nil_pool - 50_000.0).abs() < f64::EPSILON);
        assert_eq!(bias.season_year, "2024-25");

        let value = serde_json::to_value(&bias)?;
        assert_eq!(value["positionWeights"]["PG"], 20.0);
        assert_eq!(value["positionWeights"]["Big"], 20.0);
        assert_eq!(value["nilPool"], 50_000.0);
        Ok(())
    }

    #[test]
    fn coaching_bias_prefills_from_coach() {
        let coach = CoachProfile {
            team: "Tigers".to_string(),
            division: Division::Juco,
            offense: "Motion".to_string(),
            defense: "Havoc".to_string(),
            ..CoachProfile::default()
        };

        let bias = CoachingBias::for_coach(&coach);

        assert_eq!(bias.program_name, "Tigers");
        assert_eq!(bias.program_level, "JUCO");
        assert_eq!(bias.offensive_system, "Motion");
        assert_eq!(bias.defensive_system, "Havoc");
        assert!((bias.scholarship_cap - 12.0).abs() < f64::EPSILON);
    }

    #[test]
    fn player_figures_accept_numeric_text() -> Result<()> {
        let player: RosterPlayer = serde_json::from_value(json!({
            "id": "1712345678901",
            "name": "Tyler Brown",
            "position": "Wing",
            "kpi": 81.4,
            "fit": "77",
            "confidence": 70,
            "scholarship": "7",
            "nil": "61200"
        }))?;

        assert!((player.scholarship - 7.0).abs() < f64::EPSILON);
        assert!((player.nil - 61_200.0).abs() < f64::EPSILON);
        assert!((player.fit - 77.0).abs() < f64::EPSILON);

        let profile: PlayerProfile = serde_json::from_value(json!({
            "id": "p1",
            "scholarship": "",
            "nil": null,
            "kpi": "n/a"
        }))?;
        assert!(profile.scholarship.abs() < f64::EPSILON);
        assert!(profile.nil.abs() < f64::EPSILON);
        assert!(profile.kpi.abs() < f64::EPSILON);

        let value = serde_json::to_value(&player)?;
        assert_eq!(value["nil"], 61_200.0);
        Ok(())
    }

    #[test]
    fn recruit_tolerates_missing_fields() -> Result<()> {
        let recruit: Recruit = serde_json::from_value(json!({
            "id": "r1",
            "name": "Marcus Johnson",
            "isPriority": true
        }))?;

        assert!(recruit.is_priority);
        assert_eq!(recruit.status, RecruitStatus::Active);
        assert_eq!(recruit.date_added, DateTime::<Utc>::default());
        Ok(())
    }

    #[test]
    fn player_update_merges_only_given_fields() {
        let mut profile = PlayerProfile {
            id: "p1".to_string(),
            name: "Tyler Brown".to_string(),
            kpi: 80.0,
            school: Some("Ranger College".to_string()),
            ..PlayerProfile::default()
        };

        PlayerUpdate {
            kpi: Some(84.5),
            class_year: Some("SO".to_string()),
            ..PlayerUpdate::default()
        }
        .apply(&mut profile);

        assert_eq!(profile.name, "Tyler Brown");
        assert!((profile.kpi - 84.5).abs() < f64::EPSILON);
        assert_eq!(profile.school.as_deref(), Some("Ranger College"));
        assert_eq!(profile.class_year.as_deref(), Some("SO"));
    }

    #[test]
    fn assistant_message_wire_shape() -> Result<()> {
        let message = AssistantMessage {
            speaker: "Coach K".to_string(),
            message: "Opening Team IQ workspace...".to_string(),
            kind: MessageKind::Info,
            timestamp: 1_700_000_000_000,
        };

        let value = serde_json::to_value(&message)?;
        assert_eq!(value["type"], "info");
        assert_eq!(value["timestamp"], 1_700_000_000_000_i64);

        let stage = serde_json::to_value(AssistantStage::Onboarding)?;
        assert_eq!(stage, "stage1");
        Ok(())
    }
}
