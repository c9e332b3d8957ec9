//! Team composition: splits a job's roster into leader and workers and
//! picks the policy tier for `standard_percent`.

use serde::Serialize;

use crate::config::{FinanceConfig, TeamTier, TierPercents, TierPolicy};
use crate::identity::EmployeeKey;
use crate::model::{JobRecord, WorkerEntry};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TeamComposition {
    pub leader: Option<String>,
    pub leader_minutes: f64,
    /// Leader minutes were filled from the whole job's labor time.
    pub leader_fallback: bool,
    /// Non-leader log entries, one per session.
    pub workers: Vec<WorkerEntry>,
    pub max_worker_minutes: f64,
    pub total_worker_minutes: f64,
    pub team_size: usize,
}

impl TeamComposition {
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// True when the only person on the job is the leader.
    pub fn lone_leader(&self) -> bool {
        self.team_size == 1 && self.leader_minutes > 0.0
    }
}

/// Partition the worker log around the job's leader.
///
/// A named leader with no logged time is credited with the whole job's
/// labor time when there is any.
pub fn resolve_team(job: &JobRecord, labor_hours: f64) -> TeamComposition {
    let leader = job.leader_name().map(str::to_string);
    let leader_key = leader
        .as_deref()
        .map(EmployeeKey::new)
        .filter(|k| !k.is_empty());

    let mut leader_minutes = 0.0;
    let mut workers = Vec::new();
    for entry in &job.worker_log {
        let is_leader = leader_key
            .as_ref()
            .is_some_and(|k| EmployeeKey::new(&entry.name) == *k);
        if is_leader {
            leader_minutes += entry.minutes;
        } else {
            workers.push(entry.clone());
        }
    }

    let mut leader_fallback = false;
    if leader.is_some() && leader_minutes <= 0.0 && labor_hours > 0.0 {
        log::debug!(
            "job '{}': leader has no logged time, crediting {labor_hours:.2}h",
            job.id
        );
        leader_minutes = labor_hours * 60.0;
        leader_fallback = true;
    }

    let max_worker_minutes = workers.iter().map(|w| w.minutes).fold(0.0, f64::max);
    let total_worker_minutes = workers.iter().map(|w| w.minutes).sum();
    let team_size = usize::from(leader_minutes > 0.0) + workers.len();

    TeamComposition {
        leader,
        leader_minutes,
        leader_fallback,
        workers,
        max_worker_minutes,
        total_worker_minutes,
        team_size,
    }
}

/// Tier and leader/worker percentages for a team. A lone person's total
/// percentage goes to the leader pool if they lead, else the worker pool.
pub fn select_tier(config: &FinanceConfig, team: &TeamComposition) -> (TeamTier, TierPercents) {
    let tier = TeamTier::for_team_size(team.team_size);
    let percents = match config.tier_policy(tier) {
        TierPolicy::Split(p) => p,
        TierPolicy::Total(total) if team.lone_leader() => TierPercents {
            leader: total,
            worker: 0.0,
        },
        TierPolicy::Total(total) => TierPercents {
            leader: 0.0,
            worker: total,
        },
    };
    (tier, percents)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(leader: Option<&str>, log: &[(&str, f64)]) -> JobRecord {
        JobRecord {
            leader: leader.map(Into::into),
            worker_log: log.iter().map(|(n, m)| WorkerEntry::new(*n, *m)).collect(),
            ..JobRecord::default()
        }
    }

    fn tiered() -> FinanceConfig {
        FinanceConfig {
            leader_pool_percent: 5.0,
            worker_pool_percent: 10.0,
            leader_pool_percent_3: Some(6.0),
            worker_pool_percent_3: Some(9.0),
            leader_pool_percent_2: Some(7.0),
            worker_pool_percent_2: Some(8.0),
            worker_pool_percent_1: Some(12.0),
            ..FinanceConfig::default()
        }
    }

    #[test]
    fn leader_matched_by_sanitized_name() {
        let j = job(Some("Ana Lopez"), &[("ana-lopez", 300.0), ("Ben", 480.0), ("Cy", 240.0)]);
        let team = resolve_team(&j, 17.0);
        assert_eq!(team.leader_minutes, 300.0);
        assert!(!team.leader_fallback);
        assert_eq!(team.worker_count(), 2);
        assert_eq!(team.max_worker_minutes, 480.0);
        assert_eq!(team.total_worker_minutes, 720.0);
        assert_eq!(team.team_size, 3);
    }

    #[test]
    fn repeated_leader_sessions_are_summed() {
        let j = job(Some("Ana"), &[("Ana", 120.0), ("Ben", 480.0), ("ANA", 90.0)]);
        let team = resolve_team(&j, 11.5);
        assert_eq!(team.leader_minutes, 210.0);
        assert_eq!(team.worker_count(), 1);
        assert_eq!(team.team_size, 2);
    }

    #[test]
    fn leader_without_log_gets_full_job_time() {
        let j = job(Some("Ana"), &[("Ben", 120.0)]);
        let team = resolve_team(&j, 2.0);
        assert!(team.leader_fallback);
        assert_eq!(team.leader_minutes, 120.0);
        assert_eq!(team.team_size, 2);
    }

    #[test]
    fn no_fallback_without_labor() {
        let j = job(Some("Ana"), &[]);
        let team = resolve_team(&j, 0.0);
        assert_eq!(team.leader_minutes, 0.0);
        assert_eq!(team.team_size, 0);
    }

    #[test]
    fn unnamed_leader_leaves_everyone_a_worker() {
        let j = job(None, &[("Ben", 60.0), ("", 30.0)]);
        let team = resolve_team(&j, 1.5);
        assert_eq!(team.leader_minutes, 0.0);
        assert_eq!(team.worker_count(), 2);
    }

    #[test]
    fn tier_by_team_size() {
        let config = tiered();
        let pair = resolve_team(&job(Some("L"), &[("L", 60.0), ("A", 60.0)]), 2.0);
        assert_eq!(select_tier(&config, &pair), (TeamTier::Pair, TierPercents { leader: 7.0, worker: 8.0 }));

        let trio = resolve_team(&job(None, &[("A", 60.0), ("B", 60.0), ("C", 60.0)]), 3.0);
        assert_eq!(select_tier(&config, &trio).0, TeamTier::Trio);

        let five = resolve_team(
            &job(Some("L"), &[("L", 60.0), ("A", 1.0), ("B", 1.0), ("C", 1.0), ("D", 1.0)]),
            1.0,
        );
        assert_eq!(select_tier(&config, &five), (TeamTier::Standard, TierPercents { leader: 5.0, worker: 10.0 }));
    }

    #[test]
    fn lone_leader_takes_total_into_leader_pool() {
        let team = resolve_team(&job(Some("L"), &[("L", 60.0)]), 1.0);
        assert_eq!(
            select_tier(&tiered(), &team),
            (TeamTier::Solo, TierPercents { leader: 12.0, worker: 0.0 })
        );
    }

    #[test]
    fn lone_worker_takes_total_into_worker_pool() {
        let team = resolve_team(&job(None, &[("W", 60.0)]), 1.0);
        assert_eq!(
            select_tier(&tiered(), &team),
            (TeamTier::Solo, TierPercents { leader: 0.0, worker: 12.0 })
        );
    }
}
