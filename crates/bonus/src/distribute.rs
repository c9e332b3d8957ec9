//! Distribution and overrides: pools into per-person lines for one job.

use std::collections::HashMap;

use crate::identity::EmployeeKey;
use crate::model::{AllocationLine, BonusCalcMethod, Distribution, JobRecord, Role};
use crate::paydate::pay_date_for;
use crate::pool::Pools;
use crate::team::TeamComposition;

/// Worker share of `pool` for one log entry.
pub fn worker_share(
    pool: f64,
    distribution: Distribution,
    minutes: f64,
    team: &TeamComposition,
) -> f64 {
    match distribution {
        Distribution::Even if team.worker_count() > 0 => pool / team.worker_count() as f64,
        Distribution::Even => 0.0,
        Distribution::Hours if team.total_worker_minutes != 0.0 => {
            pool * (minutes / team.total_worker_minutes)
        }
        Distribution::Hours => 0.0,
    }
}

/// Manual overrides keyed by identity. When two raw keys sanitize alike the
/// first in key order wins.
fn overrides(job: &JobRecord) -> HashMap<EmployeeKey, (f64, Option<&str>)> {
    let mut map = HashMap::new();
    for (raw, amount) in &job.custom_bonuses {
        let key = EmployeeKey::new(raw);
        if key.is_empty() {
            continue;
        }
        let reason = job
            .custom_bonus_reasons
            .iter()
            .find(|(k, _)| EmployeeKey::new(k) == key)
            .map(|(_, r)| r.as_str());
        map.entry(key).or_insert((*amount, reason));
    }
    map
}

/// Build every emitted line for one job, in roster order (leader first).
///
/// A custom override replaces the computed amount. An ineligible job zeroes
/// non-custom lines but still emits them with the reason. Any other line
/// that comes out at zero or less is dropped.
pub fn distribute_job(
    job: &JobRecord,
    team: &TeamComposition,
    pools: Pools,
    method: &BonusCalcMethod,
    profit: f64,
) -> Vec<AllocationLine> {
    let overrides = overrides(job);
    let ineligible = job.is_ineligible();
    let pay_date = pay_date_for(job);
    let kind = method.pool.kind();

    let build = |name: &str, role: Role, minutes: f64, computed: f64, pool_basis: f64| {
        let (amount, is_custom, custom_reason) = match overrides.get(&EmployeeKey::new(name)) {
            Some((amount, reason)) => (*amount, true, *reason),
            None => (computed, false, None),
        };
        let amount = if ineligible && !is_custom { 0.0 } else { amount };

        if amount <= 0.0 && !is_custom && !ineligible {
            return None;
        }

        let reason = if ineligible {
            job.bonus_ineligible_reason.clone()
        } else {
            custom_reason.unwrap_or_default().to_string()
        };

        Some(AllocationLine {
            name: name.to_string(),
            role,
            minutes,
            hours: minutes / 60.0,
            amount,
            pool_basis,
            method: kind,
            is_custom,
            is_ineligible: ineligible,
            reason,
            job_id: job.id.clone(),
            project: job.project.clone(),
            company: job.company.clone(),
            pl_number: job.pl_number.clone(),
            agent: job.agent_name.clone().unwrap_or_default(),
            pay_date,
            completed_on: job.completed_on(),
            invoice: job.invoice_amount,
            profit,
        })
    };

    let mut lines = Vec::with_capacity(team.worker_count() + 1);

    if let Some(leader) = team.leader.as_deref() {
        lines.extend(build(leader, Role::Leader, team.leader_minutes, pools.leader, pools.leader));
    }

    for worker in &team.workers {
        let share = worker_share(pools.worker, method.distribution, worker.minutes, team);
        lines.extend(build(&worker.name, Role::Worker, worker.minutes, share, pools.worker));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PoolMethod, WorkerEntry};
    use crate::team::resolve_team;

    fn job(log: &[(&str, f64)]) -> JobRecord {
        JobRecord {
            id: "job-1".into(),
            leader: Some("Lee".into()),
            worker_log: log.iter().map(|(n, m)| WorkerEntry::new(*n, *m)).collect(),
            ..JobRecord::default()
        }
    }

    fn lines_for(job: &JobRecord, pools: Pools, distribution: Distribution) -> Vec<AllocationLine> {
        let team = resolve_team(job, 10.0);
        let method = BonusCalcMethod::new(PoolMethod::StandardPercent, distribution);
        distribute_job(job, &team, pools, &method, 1000.0)
    }

    fn amount(lines: &[AllocationLine], name: &str) -> Option<f64> {
        lines.iter().find(|l| l.name == name).map(|l| l.amount)
    }

    #[test]
    fn hours_distribution_is_proportional() {
        let j = job(&[("Lee", 480.0), ("Ann", 300.0), ("Bob", 100.0)]);
        let lines = lines_for(&j, Pools { leader: 50.0, worker: 100.0 }, Distribution::Hours);
        assert_eq!(lines[0].role, Role::Leader);
        assert_eq!(amount(&lines, "Lee"), Some(50.0));
        assert_eq!(amount(&lines, "Ann"), Some(75.0));
        assert_eq!(amount(&lines, "Bob"), Some(25.0));
    }

    #[test]
    fn even_distribution_splits_by_head() {
        let j = job(&[("Lee", 480.0), ("Ann", 300.0), ("Bob", 100.0)]);
        let lines = lines_for(&j, Pools { leader: 50.0, worker: 100.0 }, Distribution::Even);
        assert_eq!(amount(&lines, "Ann"), Some(50.0));
        assert_eq!(amount(&lines, "Bob"), Some(50.0));
    }

    #[test]
    fn zero_minutes_gets_zero_share_and_is_dropped() {
        let j = job(&[("Lee", 480.0), ("Ann", 0.0), ("Bob", 0.0)]);
        let lines = lines_for(&j, Pools { leader: 50.0, worker: 100.0 }, Distribution::Hours);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].name, "Lee");
    }

    #[test]
    fn custom_override_wins_and_survives_zero() {
        let mut j = job(&[("Lee", 480.0), ("Ann", 300.0)]);
        j.custom_bonuses.insert("ann".into(), 12.5);
        j.custom_bonuses.insert("LEE".into(), 0.0);
        let lines = lines_for(&j, Pools { leader: 50.0, worker: 100.0 }, Distribution::Hours);

        let lee = lines.iter().find(|l| l.name == "Lee").unwrap();
        assert!(lee.is_custom);
        assert_eq!(lee.amount, 0.0);
        let ann = lines.iter().find(|l| l.name == "Ann").unwrap();
        assert!(ann.is_custom);
        assert_eq!(ann.amount, 12.5);
    }

    #[test]
    fn ineligible_job_emits_zero_lines_with_reason() {
        let mut j = job(&[("Lee", 480.0), ("Ann", 300.0)]);
        j.bonus_eligible = false;
        j.bonus_ineligible_reason = "damage claim".into();
        j.custom_bonuses.insert("Ann".into(), 20.0);
        let lines = lines_for(&j, Pools { leader: 50.0, worker: 100.0 }, Distribution::Hours);

        assert_eq!(lines.len(), 2);
        let lee = &lines[0];
        assert_eq!(lee.amount, 0.0);
        assert!(lee.is_ineligible);
        assert_eq!(lee.reason, "damage claim");
        // Override still wins on an ineligible job
        assert_eq!(amount(&lines, "Ann"), Some(20.0));
    }

    #[test]
    fn paid_job_ignores_ineligible_flag() {
        let mut j = job(&[("Lee", 480.0)]);
        j.bonus_eligible = false;
        j.bonus_paid = true;
        let lines = lines_for(&j, Pools { leader: 50.0, worker: 0.0 }, Distribution::Hours);
        assert_eq!(lines[0].amount, 50.0);
        assert!(!lines[0].is_ineligible);
    }

    #[test]
    fn override_reason_is_carried() {
        let mut j = job(&[("Lee", 480.0)]);
        j.custom_bonuses.insert("lee".into(), 80.0);
        j.custom_bonus_reasons.insert("lee".into(), "stayed late".into());
        let lines = lines_for(&j, Pools { leader: 50.0, worker: 0.0 }, Distribution::Hours);
        assert_eq!(lines[0].reason, "stayed late");
    }

    #[test]
    fn line_carries_job_metadata() {
        let mut j = job(&[("Lee", 90.0)]);
        j.project = "Warehouse".into();
        j.invoice_amount = 1500.0;
        let lines = lines_for(&j, Pools { leader: 10.0, worker: 0.0 }, Distribution::Hours);
        let l = &lines[0];
        assert_eq!(l.job_id, "job-1");
        assert_eq!(l.project, "Warehouse");
        assert_eq!(l.hours, 1.5);
        assert_eq!(l.invoice, 1500.0);
        assert_eq!(l.profit, 1000.0);
        assert_eq!(l.pool_basis, 10.0);
    }
}
