use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::config::FinanceConfig;
use crate::de::{
    flag_default_false, flag_default_true, lenient_amount_map, lenient_date, lenient_f64,
    lenient_opt_f64, lenient_opt_string, lenient_string, lenient_timestamp, map_or_none,
    null_as_default,
};
use crate::error::EngineError;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One logged work session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkerEntry {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub minutes: f64,
}

impl WorkerEntry {
    pub fn new(name: impl Into<String>, minutes: f64) -> Self {
        Self {
            name: name.into(),
            minutes,
        }
    }
}

/// One completed production job, as handed over by the finance workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub project: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub company: String,
    #[serde(default, alias = "plNumber", deserialize_with = "lenient_string")]
    pub pl_number: String,

    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub leader: Option<String>,
    #[serde(default, alias = "workerLog", deserialize_with = "null_as_default")]
    pub worker_log: Vec<WorkerEntry>,

    #[serde(default, alias = "invoiceAmount", deserialize_with = "lenient_f64")]
    pub invoice_amount: f64,
    #[serde(default, alias = "commissionExcluded", deserialize_with = "lenient_f64")]
    pub commission_excluded: f64,
    #[serde(default, alias = "agentName", deserialize_with = "lenient_opt_string")]
    pub agent_name: Option<String>,

    /// Scanned clock seconds; labor time when no worker log exists.
    #[serde(default, alias = "originalSeconds", deserialize_with = "lenient_f64")]
    pub original_seconds: f64,
    #[serde(default, alias = "finalSeconds", deserialize_with = "lenient_f64")]
    pub final_seconds: f64,

    #[serde(default, alias = "bonusCalcMethod", deserialize_with = "map_or_none")]
    pub bonus_calc_method: Option<BonusCalcMethod>,
    /// Manual per-person overrides keyed by (sanitized) name.
    #[serde(default, alias = "customBonuses", deserialize_with = "lenient_amount_map")]
    pub custom_bonuses: BTreeMap<String, f64>,
    #[serde(default, alias = "customBonusReasons", deserialize_with = "null_as_default")]
    pub custom_bonus_reasons: BTreeMap<String, String>,

    #[serde(default = "default_true", alias = "bonusEligible")]
    #[serde(deserialize_with = "flag_default_true")]
    pub bonus_eligible: bool,
    #[serde(default, alias = "bonusIneligibleReason", deserialize_with = "lenient_string")]
    pub bonus_ineligible_reason: String,

    #[serde(default, alias = "bonusPaid", deserialize_with = "flag_default_false")]
    pub bonus_paid: bool,
    #[serde(default, alias = "bonusPaidAt", deserialize_with = "lenient_timestamp")]
    pub bonus_paid_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "finalBonusPaid", deserialize_with = "lenient_opt_f64")]
    pub final_bonus_paid: Option<f64>,
    #[serde(default, alias = "payDate", deserialize_with = "lenient_date")]
    pub pay_date: Option<NaiveDate>,
    /// Config frozen at payout; replaces the live config for this job.
    #[serde(default, alias = "historicalConfig")]
    pub historical_config: Option<FinanceConfig>,

    #[serde(default, alias = "completedAt", deserialize_with = "lenient_timestamp")]
    pub completed_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

impl Default for JobRecord {
    fn default() -> Self {
        Self {
            id: String::new(),
            project: String::new(),
            company: String::new(),
            pl_number: String::new(),
            leader: None,
            worker_log: Vec::new(),
            invoice_amount: 0.0,
            commission_excluded: 0.0,
            agent_name: None,
            original_seconds: 0.0,
            final_seconds: 0.0,
            bonus_calc_method: None,
            custom_bonuses: BTreeMap::new(),
            custom_bonus_reasons: BTreeMap::new(),
            bonus_eligible: true,
            bonus_ineligible_reason: String::new(),
            bonus_paid: false,
            bonus_paid_at: None,
            final_bonus_paid: None,
            pay_date: None,
            historical_config: None,
            completed_at: None,
        }
    }
}

/// Which config a job was computed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigSource {
    Live,
    Historical,
}

impl JobRecord {
    /// Leader name when one is set and not blank.
    pub fn leader_name(&self) -> Option<&str> {
        self.leader.as_deref().filter(|l| !l.trim().is_empty())
    }

    /// Marked ineligible and not yet paid. Paying a job settles eligibility.
    pub fn is_ineligible(&self) -> bool {
        !self.bonus_eligible && !self.bonus_paid
    }

    /// The job's own snapshot when present, the live config otherwise.
    pub fn effective_config<'a>(
        &'a self,
        live: &'a FinanceConfig,
    ) -> (&'a FinanceConfig, ConfigSource) {
        match &self.historical_config {
            Some(frozen) => (frozen, ConfigSource::Historical),
            None => (live, ConfigSource::Live),
        }
    }

    pub fn method(&self) -> BonusCalcMethod {
        self.bonus_calc_method.clone().unwrap_or_default()
    }

    pub fn completed_on(&self) -> Option<NaiveDate> {
        self.completed_at.map(|t| t.date_naive())
    }
}

/// Parse a JSON array of job records.
pub fn load_jobs_json(input: &str) -> Result<Vec<JobRecord>, EngineError> {
    serde_json::from_str(input).map_err(|e| EngineError::JobParse(e.to_string()))
}

// ---------------------------------------------------------------------------
// Pool methods
// ---------------------------------------------------------------------------

/// How worker shares are split out of the worker pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Distribution {
    #[default]
    Hours,
    Even,
}

/// How a job's profit becomes a leader pool and a worker pool.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum PoolMethod {
    /// Team-size tier percentages from the finance config.
    #[default]
    StandardPercent,
    /// Leader-only percentage; no worker pool.
    LeaderPercent { leader_pct: f64 },
    /// Independent leader and worker percentages.
    CustomPercent { leader_pct: f64, worker_pct: f64 },
    /// Flat dollar pools, independent of profit.
    FixedAmount { leader_amount: f64, worker_amount: f64 },
    /// `step` dollars per full `threshold` of profit; the worker step is
    /// paid once per worker.
    LegacyInterval {
        leader_step: f64,
        leader_threshold: f64,
        worker_step: f64,
        worker_threshold: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolMethodKind {
    StandardPercent,
    LeaderPercent,
    CustomPercent,
    FixedAmount,
    LegacyInterval,
}

impl PoolMethod {
    pub fn kind(&self) -> PoolMethodKind {
        match self {
            Self::StandardPercent => PoolMethodKind::StandardPercent,
            Self::LeaderPercent { .. } => PoolMethodKind::LeaderPercent,
            Self::CustomPercent { .. } => PoolMethodKind::CustomPercent,
            Self::FixedAmount { .. } => PoolMethodKind::FixedAmount,
            Self::LegacyInterval { .. } => PoolMethodKind::LegacyInterval,
        }
    }
}

impl std::fmt::Display for PoolMethodKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StandardPercent => write!(f, "standard_percent"),
            Self::LeaderPercent => write!(f, "leader_percent"),
            Self::CustomPercent => write!(f, "custom_percent"),
            Self::FixedAmount => write!(f, "fixed_amount"),
            Self::LegacyInterval => write!(f, "legacy_interval"),
        }
    }
}

/// Default dollar threshold for `legacy_interval` steps.
pub const DEFAULT_INTERVAL_THRESHOLD: f64 = 1000.0;

/// Per-job allocation method plus worker distribution mode.
///
/// Stored flat (`{"type": "custom_percent", "l_pct": 5, ...}`); see
/// [`RawBonusCalcMethod`] for the wire shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawBonusCalcMethod", into = "RawBonusCalcMethod")]
pub struct BonusCalcMethod {
    pub pool: PoolMethod,
    pub distribution: Distribution,
}

impl BonusCalcMethod {
    pub fn new(pool: PoolMethod, distribution: Distribution) -> Self {
        Self { pool, distribution }
    }
}

/// Wire shape of [`BonusCalcMethod`]. Missing parameters read as zero,
/// missing thresholds as [`DEFAULT_INTERVAL_THRESHOLD`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawBonusCalcMethod {
    #[serde(rename = "type", default, deserialize_with = "lenient_opt_string")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_f64", skip_serializing_if = "Option::is_none")]
    pub l_pct: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_f64", skip_serializing_if = "Option::is_none")]
    pub w_pct: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_f64", skip_serializing_if = "Option::is_none")]
    pub l_fix: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_f64", skip_serializing_if = "Option::is_none")]
    pub w_fix: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_f64", skip_serializing_if = "Option::is_none")]
    pub l_amt: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_f64", skip_serializing_if = "Option::is_none")]
    pub l_thr: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_f64", skip_serializing_if = "Option::is_none")]
    pub w_amt: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_f64", skip_serializing_if = "Option::is_none")]
    pub w_thr: Option<f64>,
}

fn threshold(value: Option<f64>) -> f64 {
    // A zero threshold is treated as unset
    match value {
        Some(v) if v != 0.0 => v,
        _ => DEFAULT_INTERVAL_THRESHOLD,
    }
}

impl From<RawBonusCalcMethod> for BonusCalcMethod {
    fn from(raw: RawBonusCalcMethod) -> Self {
        let num = |v: Option<f64>| v.unwrap_or(0.0);

        let pool = match raw.kind.as_deref() {
            None | Some("standard_percent") => PoolMethod::StandardPercent,
            Some("leader_percent") => PoolMethod::LeaderPercent {
                leader_pct: num(raw.l_pct),
            },
            Some("custom_percent") => PoolMethod::CustomPercent {
                leader_pct: num(raw.l_pct),
                worker_pct: num(raw.w_pct),
            },
            Some("fixed_amount") => PoolMethod::FixedAmount {
                leader_amount: num(raw.l_fix),
                worker_amount: num(raw.w_fix),
            },
            Some("legacy_interval") => PoolMethod::LegacyInterval {
                leader_step: num(raw.l_amt),
                leader_threshold: threshold(raw.l_thr),
                worker_step: num(raw.w_amt),
                worker_threshold: threshold(raw.w_thr),
            },
            Some(other) => {
                log::warn!("unknown bonus method type '{other}', using standard_percent");
                PoolMethod::StandardPercent
            }
        };

        let distribution = match raw.distribution.as_deref() {
            Some("even") => Distribution::Even,
            _ => Distribution::Hours,
        };

        Self { pool, distribution }
    }
}

impl From<BonusCalcMethod> for RawBonusCalcMethod {
    fn from(method: BonusCalcMethod) -> Self {
        let mut raw = RawBonusCalcMethod {
            kind: Some(method.pool.kind().to_string()),
            distribution: Some(
                match method.distribution {
                    Distribution::Hours => "hours",
                    Distribution::Even => "even",
                }
                .to_string(),
            ),
            ..RawBonusCalcMethod::default()
        };
        match method.pool {
            PoolMethod::StandardPercent => {}
            PoolMethod::LeaderPercent { leader_pct } => raw.l_pct = Some(leader_pct),
            PoolMethod::CustomPercent { leader_pct, worker_pct } => {
                raw.l_pct = Some(leader_pct);
                raw.w_pct = Some(worker_pct);
            }
            PoolMethod::FixedAmount { leader_amount, worker_amount } => {
                raw.l_fix = Some(leader_amount);
                raw.w_fix = Some(worker_amount);
            }
            PoolMethod::LegacyInterval {
                leader_step,
                leader_threshold,
                worker_step,
                worker_threshold,
            } => {
                raw.l_amt = Some(leader_step);
                raw.l_thr = Some(leader_threshold);
                raw.w_amt = Some(worker_step);
                raw.w_thr = Some(worker_threshold);
            }
        }
        raw
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Role {
    Leader,
    Worker,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Leader => write!(f, "Leader"),
            Self::Worker => write!(f, "Worker"),
        }
    }
}

/// One person's bonus on one job, with the job metadata a payout slip needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationLine {
    pub name: String,
    pub role: Role,
    pub minutes: f64,
    pub hours: f64,
    pub amount: f64,
    /// Pool the computed share was drawn from, after the fairness rule.
    pub pool_basis: f64,
    pub method: PoolMethodKind,
    pub is_custom: bool,
    pub is_ineligible: bool,
    pub reason: String,

    pub job_id: String,
    pub project: String,
    pub company: String,
    pub pl_number: String,
    pub agent: String,
    pub pay_date: Option<NaiveDate>,
    pub completed_on: Option<NaiveDate>,
    pub invoice: f64,
    pub profit: f64,
}

/// Per-employee totals across a job set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeSummary {
    pub name: String,
    pub total: f64,
    pub items: Vec<AllocationLine>,
}
