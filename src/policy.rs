// Pluggable reward and clan-decision policies.
//
// The random implementations are placeholders for the real game computation
// and clan authority; the lifecycle code only sees the traits.

use rand::Rng;

use crate::db::{ClanRequest, ClanRequestStatus};

/// Identity a running bot acts as.
#[derive(Debug, Clone)]
pub struct BotSession {
    pub account_id: String,
    pub credential: String,
}

/// Computes the glory earned by one tick of a running bot.
pub trait RewardPolicy: Send + Sync {
    /// Amount earned this tick. Zero means nothing was earned.
    fn next_reward(&self, session: &BotSession) -> u32;
}

/// Decides the outcome of a clan membership request.
pub trait DecisionPolicy: Send + Sync {
    fn decide(&self, request: &ClanRequest) -> ClanRequestStatus;
}

/// Uniform random reward in an inclusive range.
#[derive(Debug, Clone)]
pub struct RandomReward {
    min: u32,
    max: u32,
}

impl RandomReward {
    pub const DEFAULT_MIN: u32 = 50;
    pub const DEFAULT_MAX: u32 = 200;

    /// Bounds are reordered if given backwards.
    pub fn new(min: u32, max: u32) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }
}

impl Default for RandomReward {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MIN, Self::DEFAULT_MAX)
    }
}

impl RewardPolicy for RandomReward {
    fn next_reward(&self, _session: &BotSession) -> u32 {
        rand::thread_rng().gen_range(self.min..=self.max)
    }
}

/// Same reward every tick.
#[derive(Debug, Clone, Copy)]
pub struct FixedReward(pub u32);

impl RewardPolicy for FixedReward {
    fn next_reward(&self, _session: &BotSession) -> u32 {
        self.0
    }
}

/// Coin flip between accepted and rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomDecision;

impl DecisionPolicy for RandomDecision {
    fn decide(&self, _request: &ClanRequest) -> ClanRequestStatus {
        if rand::random::<bool>() {
            ClanRequestStatus::Accepted
        } else {
            ClanRequestStatus::Rejected
        }
    }
}

/// Always returns the same outcome.
#[derive(Debug, Clone, Copy)]
pub struct FixedDecision(pub ClanRequestStatus);

impl DecisionPolicy for FixedDecision {
    fn decide(&self, _request: &ClanRequest) -> ClanRequestStatus {
        self.0
    }
}
