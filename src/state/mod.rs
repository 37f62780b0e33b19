//! Client state container.
//!
//! Holds the coach's working set in five persisted slots plus the
//! assistant dialogue. Every mutation of a persisted slot serializes the
//! whole slot and writes it to [`SlotStorage`] before returning; there is no
//! batching and no atomicity across slots. The in-memory value is updated
//! first, so it stays changed even when the write fails.

pub mod metrics;
pub mod models;
pub mod storage;

pub use metrics::TeamMetrics;
pub use models::{
    AssistantMessage, AssistantStage, AssistantState, CoachProfile, CoachingBias, MessageKind,
    PlayerProfile, PlayerUpdate, PositionWeights, Prospect, Recruit, RecruitStatus,
    RecruitingState, RosterPlayer, TeamState,
};
pub use storage::{DirStorage, MemoryStorage, SlotStorage};

use crate::auth::{Clock, PublicUser, SystemClock};
use serde::{de::DeserializeOwned, Serialize};
use std::{fmt, sync::Arc};
use thiserror::Error;
use tracing::{debug, warn};
use ulid::Ulid;

#[derive(Debug, Error)]
pub enum Error {
    #[error("state storage error: {0}")]
    Storage(#[from] std::io::Error),
    #[error("state encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Storage keys of the persisted slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    CoachProfile,
    CoachingBias,
    TeamState,
    PlayerProfiles,
    RecruitingState,
}

impl Slot {
    pub const ALL: [Self; 5] = [
        Self::CoachProfile,
        Self::CoachingBias,
        Self::TeamState,
        Self::PlayerProfiles,
        Self::RecruitingState,
    ];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::CoachProfile => "coachProfile",
            Self::CoachingBias => "coachingBias",
            Self::TeamState => "teamState",
            Self::PlayerProfiles => "playerProfiles",
            Self::RecruitingState => "recruitingState",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

pub struct ClientState<S: SlotStorage> {
    storage: S,
    clock: Arc<dyn Clock>,
    coach_profile: Option<CoachProfile>,
    coaching_bias: Option<CoachingBias>,
    team: TeamState,
    player_profiles: Vec<PlayerProfile>,
    recruiting: RecruitingState,
    assistant: AssistantState,
}

impl<S: SlotStorage> fmt::Debug for ClientState<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientState")
            .field("coach_profile", &self.coach_profile)
            .field("coaching_bias", &self.coaching_bias)
            .field("team", &self.team)
            .field("player_profiles", &self.player_profiles)
            .field("recruiting", &self.recruiting)
            .field("assistant", &self.assistant)
            .finish_non_exhaustive()
    }
}

impl<S: SlotStorage> ClientState<S> {
    /// Restore every slot from `storage`. A slot whose blob is missing,
    /// unreadable or unparsable starts from its default.
    pub fn load(storage: S) -> Self {
        Self::load_with_clock(storage, Arc::new(SystemClock))
    }

    pub fn load_with_clock(storage: S, clock: Arc<dyn Clock>) -> Self {
        Self {
            coach_profile: restore(&storage, Slot::CoachProfile),
            coaching_bias: restore(&storage, Slot::CoachingBias),
            team: restore(&storage, Slot::TeamState).unwrap_or_default(),
            player_profiles: restore(&storage, Slot::PlayerProfiles).unwrap_or_default(),
            recruiting: restore(&storage, Slot::RecruitingState).unwrap_or_default(),
            assistant: AssistantState::default(),
            storage,
            clock,
        }
    }

    pub const fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    pub const fn coach_profile(&self) -> Option<&CoachProfile> {
        self.coach_profile.as_ref()
    }

    pub const fn coaching_bias(&self) -> Option<&CoachingBias> {
        self.coaching_bias.as_ref()
    }

    pub const fn team(&self) -> &TeamState {
        &self.team
    }

    pub fn player_profiles(&self) -> &[PlayerProfile] {
        &self.player_profiles
    }

    pub const fn recruiting(&self) -> &RecruitingState {
        &self.recruiting
    }

    pub const fn assistant(&self) -> &AssistantState {
        &self.assistant
    }

    // coach profile

    /// # Errors
    /// Return error if the slot cannot be written.
    pub fn set_coach_profile(&mut self, profile: CoachProfile) -> Result<(), Error> {
        let profile = self.coach_profile.insert(profile);
        persist(&mut self.storage, Slot::CoachProfile, profile)
    }

    /// Seed the coach profile from an authenticated user.
    ///
    /// # Errors
    /// Return error if the slot cannot be written.
    pub fn sign_in(&mut self, user: &PublicUser) -> Result<(), Error> {
        self.set_coach_profile(CoachProfile::from(user))
    }

    // coaching bias

    /// # Errors
    /// Return error if the slot cannot be written.
    pub fn set_coaching_bias(&mut self, bias: CoachingBias) -> Result<(), Error> {
        let bias = self.coaching_bias.insert(bias);
        persist(&mut self.storage, Slot::CoachingBias, bias)
    }

    // team

    /// # Errors
    /// Return error if the slot cannot be written.
    pub fn add_to_roster(&mut self, player: RosterPlayer) -> Result<(), Error> {
        self.update_team(|team| team.roster.push(player))
    }

    /// Returns whether a player was removed. Nothing is written when the id
    /// is not on the roster.
    ///
    /// # Errors
    /// Return error if the slot cannot be written.
    pub fn remove_from_roster(&mut self, player_id: &str) -> Result<bool, Error> {
        let before = self.team.roster.len();
        self.team.roster.retain(|player| player.id != player_id);
        if self.team.roster.len() == before {
            return Ok(false);
        }

        persist(&mut self.storage, Slot::TeamState, &self.team)?;
        Ok(true)
    }

    /// Apply `update` to the team and write the result.
    ///
    /// # Errors
    /// Return error if the slot cannot be written.
    pub fn update_team<F>(&mut self, update: F) -> Result<(), Error>
    where
        F: FnOnce(&mut TeamState),
    {
        update(&mut self.team);
        persist(&mut self.storage, Slot::TeamState, &self.team)
    }

    #[must_use]
    pub fn team_metrics(&self) -> TeamMetrics {
        TeamMetrics::compute(
            &self.team.roster,
            self.coaching_bias.as_ref().map(|bias| bias.nil_pool),
        )
    }

    // player profiles

    /// Store a profile under a freshly generated id, which is returned.
    ///
    /// # Errors
    /// Return error if the slot cannot be written.
    pub fn add_player_profile(&mut self, mut player: PlayerProfile) -> Result<String, Error> {
        player.id = Ulid::new().to_string();
        let id = player.id.clone();

        self.player_profiles.push(player);
        persist(&mut self.storage, Slot::PlayerProfiles, &self.player_profiles)?;

        Ok(id)
    }

    /// Merge `update` into the profile with `id`. Returns whether it exists.
    ///
    /// # Errors
    /// Return error if the slot cannot be written.
    pub fn update_player_profile(&mut self, id: &str, update: PlayerUpdate) -> Result<bool, Error> {
        let Some(profile) = self.player_profiles.iter_mut().find(|player| player.id == id) else {
            return Ok(false);
        };

        update.apply(profile);
        persist(&mut self.storage, Slot::PlayerProfiles, &self.player_profiles)?;

        Ok(true)
    }

    /// Add an evaluated player to the profiles and to the roster. These are
    /// two independent writes; if the roster write fails the profile stays.
    ///
    /// # Errors
    /// Return error if either slot cannot be written.
    pub fn sync_player(&mut self, player: PlayerProfile) -> Result<String, Error> {
        let id = self.add_player_profile(player)?;

        let roster_player = self
            .player_profiles
            .iter()
            .find(|profile| profile.id == id)
            .map(RosterPlayer::from)
            .unwrap_or_default();
        self.add_to_roster(roster_player)?;

        Ok(id)
    }

    // recruiting board

    /// Put a prospect on the board. Returns `false` without writing when a
    /// recruit with the same id is already there.
    ///
    /// # Errors
    /// Return error if the slot cannot be written.
    pub fn add_recruit(&mut self, prospect: Prospect) -> Result<bool, Error> {
        if self
            .recruiting
            .active_recruits
            .iter()
            .any(|recruit| recruit.id == prospect.id)
        {
            debug!("Recruit {} already on the board", prospect.id);
            return Ok(false);
        }

        let recruit = Recruit::from_prospect(prospect, self.clock.now());
        self.recruiting.active_recruits.push(recruit);
        persist(&mut self.storage, Slot::RecruitingState, &self.recruiting)?;

        Ok(true)
    }

    /// # Errors
    /// Return error if the slot cannot be written.
    pub fn set_priority(&mut self, recruit_id: &str, is_priority: bool) -> Result<bool, Error> {
        self.update_recruit(recruit_id, |recruit| recruit.is_priority = is_priority)
    }

    /// # Errors
    /// Return error if the slot cannot be written.
    pub fn commit_recruit(&mut self, recruit_id: &str) -> Result<bool, Error> {
        self.update_recruit(recruit_id, |recruit| {
            recruit.status = RecruitStatus::Committed;
        })
    }

    /// # Errors
    /// Return error if the slot cannot be written.
    pub fn remove_recruit(&mut self, recruit_id: &str) -> Result<bool, Error> {
        let before = self.recruiting.active_recruits.len();
        self.recruiting
            .active_recruits
            .retain(|recruit| recruit.id != recruit_id);
        if self.recruiting.active_recruits.len() == before {
            return Ok(false);
        }

        persist(&mut self.storage, Slot::RecruitingState, &self.recruiting)?;
        Ok(true)
    }

    fn update_recruit<F>(&mut self, recruit_id: &str, update: F) -> Result<bool, Error>
    where
        F: FnOnce(&mut Recruit),
    {
        let Some(recruit) = self.recruiting.find_mut(recruit_id) else {
            return Ok(false);
        };

        update(recruit);
        persist(&mut self.storage, Slot::RecruitingState, &self.recruiting)?;

        Ok(true)
    }

    // assistant

    pub fn add_assistant_message(
        &mut self,
        speaker: impl Into<String>,
        message: impl Into<String>,
        kind: MessageKind,
    ) {
        self.assistant.messages.push(AssistantMessage {
            speaker: speaker.into(),
            message: message.into(),
            kind,
            timestamp: self.clock.now().timestamp_millis(),
        });
    }

    pub fn toggle_assistant(&mut self) {
        self.assistant.is_open = !self.assistant.is_open;
        self.assistant.is_minimized = false;
    }

    pub fn minimize_assistant(&mut self) {
        self.assistant.is_minimized = true;
        self.assistant.is_open = false;
    }

    /// Open the assistant with the setup prompts, once, for a coach who has
    /// not configured a coaching bias yet. Returns whether it started.
    pub fn start_onboarding(&mut self) -> bool {
        if self.coaching_bias.is_some() || self.assistant.stage != AssistantStage::Welcome {
            return false;
        }

        let timestamp = self.clock.now().timestamp_millis();
        let prompts = [
            "Welcome! Let's get you set up.",
            "First, configure your system preferences using the brain icon in the header.",
        ];

        self.assistant.is_open = true;
        self.assistant.stage = AssistantStage::Onboarding;
        self.assistant.messages = prompts
            .into_iter()
            .map(|message| AssistantMessage {
                speaker: "AI Assistant".to_string(),
                message: message.to_string(),
                kind: MessageKind::Info,
                timestamp,
            })
            .collect();

        true
    }

    // session

    /// Drop every persisted slot and reset all state, assistant included.
    ///
    /// # Errors
    /// Return error if a slot cannot be removed; slots are still reset.
    pub fn logout(&mut self) -> Result<(), Error> {
        self.coach_profile = None;
        self.coaching_bias = None;
        self.team = TeamState::default();
        self.player_profiles = Vec::new();
        self.recruiting = RecruitingState::default();
        self.assistant = AssistantState::default();

        for slot in Slot::ALL {
            self.storage.remove(slot.key())?;
        }

        Ok(())
    }
}

fn restore<S, T>(storage: &S, slot: Slot) -> Option<T>
where
    S: SlotStorage,
    T: DeserializeOwned,
{
    let blob = match storage.get(slot.key()) {
        Ok(blob) => blob?,
        Err(err) => {
            warn!("Failed to read slot {}: {}", slot, err);
            return None;
        }
    };

    match serde_json::from_str(&blob) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!("Discarding unparsable slot {}: {}", slot, err);
            None
        }
    }
}

fn persist<S, T>(storage: &mut S, slot: Slot, value: &T) -> Result<(), Error>
where
    S: SlotStorage,
    T: Serialize + ?Sized,
{
    let blob = serde_json::to_string(value)?;
    storage.set(slot.key(), &blob)?;
    Ok(())
}
