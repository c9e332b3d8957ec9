//! Pool allocation: profit (or a flat amount) into leader and worker pools.

use serde::Serialize;

use crate::config::TierPercents;
use crate::model::PoolMethod;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Pools {
    pub leader: f64,
    pub worker: f64,
}

impl Pools {
    pub fn total(&self) -> f64 {
        self.leader + self.worker
    }
}

/// Percent of profit, floored at zero.
fn percent_of(profit: f64, pct: f64) -> f64 {
    (profit * pct / 100.0).max(0.0)
}

/// Whole steps of `threshold` in a positive profit, times `step`.
fn interval(profit: f64, threshold: f64, step: f64) -> f64 {
    if threshold > 0.0 && profit > 0.0 {
        (profit / threshold).floor() * step
    } else {
        0.0
    }
}

/// Compute both pools for one job. `tier` is only read by
/// `standard_percent`; `worker_count` only by `legacy_interval`.
///
/// Profit-based pools never go below zero. Fixed and interval pools are
/// not profit-clamped.
pub fn allocate_pools(
    profit: f64,
    method: &PoolMethod,
    tier: TierPercents,
    worker_count: usize,
) -> Pools {
    match *method {
        PoolMethod::StandardPercent => Pools {
            leader: percent_of(profit, tier.leader),
            worker: percent_of(profit, tier.worker),
        },
        PoolMethod::LeaderPercent { leader_pct } => Pools {
            leader: percent_of(profit, leader_pct),
            worker: 0.0,
        },
        PoolMethod::CustomPercent { leader_pct, worker_pct } => Pools {
            leader: percent_of(profit, leader_pct),
            worker: percent_of(profit, worker_pct),
        },
        PoolMethod::FixedAmount { leader_amount, worker_amount } => Pools {
            leader: leader_amount,
            worker: worker_amount,
        },
        PoolMethod::LegacyInterval {
            leader_step,
            leader_threshold,
            worker_step,
            worker_threshold,
        } => Pools {
            leader: interval(profit, leader_threshold, leader_step),
            worker: interval(profit, worker_threshold, worker_step) * worker_count as f64,
        },
    }
}
