use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::de::{lenient_f64, lenient_opt_f64, lenient_string, null_as_default};
use crate::error::EngineError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Global finance settings: labor rate, bonus pool tiers, agent commissions.
///
/// The same shape is frozen into a paid job as its historical snapshot, so
/// every field also accepts the camelCase key it was originally stored under.
///
/// Tier fields for 1-, 2- and 3-person teams are optional. When a tier is
/// absent the 4+ percentages apply, which is also how snapshots taken before
/// tiers existed replay.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinanceConfig {
    #[serde(default, alias = "costPerHour", deserialize_with = "lenient_f64")]
    pub cost_per_hour: f64,

    #[serde(default, alias = "leaderPoolPercent", deserialize_with = "lenient_f64")]
    pub leader_pool_percent: f64,
    #[serde(default, alias = "workerPoolPercent", deserialize_with = "lenient_f64")]
    pub worker_pool_percent: f64,

    #[serde(default, alias = "leaderPoolPercent_3", deserialize_with = "lenient_opt_f64")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leader_pool_percent_3: Option<f64>,
    #[serde(default, alias = "workerPoolPercent_3", deserialize_with = "lenient_opt_f64")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worker_pool_percent_3: Option<f64>,

    #[serde(default, alias = "leaderPoolPercent_2", deserialize_with = "lenient_opt_f64")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leader_pool_percent_2: Option<f64>,
    #[serde(default, alias = "workerPoolPercent_2", deserialize_with = "lenient_opt_f64")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worker_pool_percent_2: Option<f64>,

    /// Total bonus percentage for a lone person, leader or worker.
    #[serde(default, alias = "workerPoolPercent_1", deserialize_with = "lenient_opt_f64")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worker_pool_percent_1: Option<f64>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub agents: Vec<AgentRate>,
}

// ---------------------------------------------------------------------------
// Agents
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentRate {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, alias = "comm", alias = "commissionPercent")]
    #[serde(deserialize_with = "lenient_f64")]
    pub commission_percent: f64,
}

impl AgentRate {
    pub fn new(name: impl Into<String>, commission_percent: f64) -> Self {
        Self {
            name: name.into(),
            commission_percent,
        }
    }
}

// ---------------------------------------------------------------------------
// Tiers
// ---------------------------------------------------------------------------

/// Team-size policy tier used by `standard_percent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamTier {
    Solo,
    Pair,
    Trio,
    Standard,
}

impl TeamTier {
    /// Team size 1, 2, 3 select their own tier; 4+ (and an empty team)
    /// use the standard percentages.
    pub fn for_team_size(team_size: usize) -> Self {
        match team_size {
            1 => Self::Solo,
            2 => Self::Pair,
            3 => Self::Trio,
            _ => Self::Standard,
        }
    }
}

impl std::fmt::Display for TeamTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Solo => write!(f, "solo"),
            Self::Pair => write!(f, "pair"),
            Self::Trio => write!(f, "trio"),
            Self::Standard => write!(f, "standard"),
        }
    }
}

/// Leader/worker percentage pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TierPercents {
    pub leader: f64,
    pub worker: f64,
}

/// What a tier's config fields say, before the lone-person rule is applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TierPolicy {
    /// Separate leader and worker percentages.
    Split(TierPercents),
    /// A single total percentage for whoever the lone person is.
    Total(f64),
}

impl FinanceConfig {
    pub fn standard_percents(&self) -> TierPercents {
        TierPercents {
            leader: self.leader_pool_percent,
            worker: self.worker_pool_percent,
        }
    }

    /// Percentages configured for `tier`, falling back to standard when the
    /// tier's fields are absent.
    pub fn tier_policy(&self, tier: TeamTier) -> TierPolicy {
        let split = |leader: Option<f64>, worker: Option<f64>| match (leader, worker) {
            (None, None) => TierPolicy::Split(self.standard_percents()),
            (l, w) => TierPolicy::Split(TierPercents {
                leader: l.unwrap_or(0.0),
                worker: w.unwrap_or(0.0),
            }),
        };

        match tier {
            TeamTier::Solo => match self.worker_pool_percent_1 {
                Some(total) => TierPolicy::Total(total),
                None => TierPolicy::Split(self.standard_percents()),
            },
            TeamTier::Pair => split(self.leader_pool_percent_2, self.worker_pool_percent_2),
            TeamTier::Trio => split(self.leader_pool_percent_3, self.worker_pool_percent_3),
            TeamTier::Standard => TierPolicy::Split(self.standard_percents()),
        }
    }

    /// Commission percentage for an agent, matched by exact name.
    pub fn agent_rate(&self, name: &str) -> Option<f64> {
        self.agents
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.commission_percent)
    }

    /// Frozen copy to store on a job at payout. Holds every field the
    /// allocation reads, so later rate changes cannot move a paid figure.
    pub fn snapshot(&self) -> FinanceConfig {
        self.clone()
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl FinanceConfig {
    pub fn from_toml(input: &str) -> Result<Self, EngineError> {
        let config: FinanceConfig =
            toml::from_str(input).map_err(|e| EngineError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(input: &str) -> Result<Self, EngineError> {
        let config: FinanceConfig =
            serde_json::from_str(input).map_err(|e| EngineError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.cost_per_hour < 0.0 {
            return Err(EngineError::ConfigValidation(format!(
                "cost_per_hour must not be negative, got {}",
                self.cost_per_hour
            )));
        }

        let percents = [
            ("leader_pool_percent", Some(self.leader_pool_percent)),
            ("worker_pool_percent", Some(self.worker_pool_percent)),
            ("leader_pool_percent_3", self.leader_pool_percent_3),
            ("worker_pool_percent_3", self.worker_pool_percent_3),
            ("leader_pool_percent_2", self.leader_pool_percent_2),
            ("worker_pool_percent_2", self.worker_pool_percent_2),
            ("worker_pool_percent_1", self.worker_pool_percent_1),
        ];
        for (field, value) in percents {
            if let Some(v) = value {
                check_percent(field, v)?;
            }
        }

        let mut seen = HashSet::new();
        for agent in &self.agents {
            if agent.name.trim().is_empty() {
                return Err(EngineError::ConfigValidation("agent name must not be empty".into()));
            }
            if !seen.insert(agent.name.as_str()) {
                return Err(EngineError::ConfigValidation(format!(
                    "duplicate agent '{}'",
                    agent.name
                )));
            }
            check_percent(&format!("agent '{}' commission_percent", agent.name), agent.commission_percent)?;
        }

        Ok(())
    }
}

fn check_percent(field: &str, value: f64) -> Result<(), EngineError> {
    if !(0.0..=100.0).contains(&value) {
        return Err(EngineError::ConfigValidation(format!(
            "{field} must be between 0 and 100, got {value}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
