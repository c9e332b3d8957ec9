//! Time-fairness adjustment (the 30-minute rule).
//!
//! A leader who clocked materially less time than the busiest worker keeps
//! only the share of the leader pool matching their time ratio; the rest
//! moves to the worker pool. Value only moves, the pool total is unchanged.

use serde::Serialize;

use crate::model::PoolMethod;
use crate::pool::Pools;

/// Gap, in minutes, the busiest worker must exceed the leader by.
pub const FAIRNESS_GAP_MINUTES: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FairnessAdjustment {
    /// `leader_minutes / max_worker_minutes`
    pub ratio: f64,
    /// Amount moved from the leader pool to the worker pool.
    pub moved: f64,
}

/// Apply the rule. Returns the adjusted pools and, when it fired, what moved.
/// Never applies to `leader_percent`.
pub fn apply_fairness(
    pools: Pools,
    method: &PoolMethod,
    leader_minutes: f64,
    max_worker_minutes: f64,
) -> (Pools, Option<FairnessAdjustment>) {
    if matches!(method, PoolMethod::LeaderPercent { .. }) {
        return (pools, None);
    }
    if leader_minutes <= 0.0 || max_worker_minutes <= 0.0 {
        return (pools, None);
    }
    if max_worker_minutes - leader_minutes <= FAIRNESS_GAP_MINUTES {
        return (pools, None);
    }

    let ratio = leader_minutes / max_worker_minutes;
    let moved = pools.leader * (1.0 - ratio);
    let adjusted = Pools {
        leader: pools.leader - moved,
        worker: pools.worker + moved,
    };
    (adjusted, Some(FairnessAdjustment { ratio, moved }))
}
