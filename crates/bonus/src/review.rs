//! Review actions on a job's bonus.
//!
//! Each action takes a job by reference and returns the updated copy for
//! the caller to persist. Actions that change someone's pay need a reason.

use chrono::NaiveDate;

use crate::config::FinanceConfig;
use crate::error::EngineError;
use crate::identity::sanitize;
use crate::model::{BonusCalcMethod, JobRecord};

fn require_reason(action: &'static str, job: &JobRecord, reason: &str) -> Result<String, EngineError> {
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(EngineError::MissingReason {
            action,
            job_id: job.id.clone(),
        });
    }
    Ok(reason.to_string())
}

/// Mark the job paid and freeze the config it was paid under, so later
/// runs reproduce this payout even after rates change.
pub fn mark_paid(
    job: &JobRecord,
    live: &FinanceConfig,
    pay_date: NaiveDate,
    amount: f64,
) -> Result<JobRecord, EngineError> {
    if job.bonus_paid {
        return Err(EngineError::AlreadyPaid { job_id: job.id.clone() });
    }
    if !amount.is_finite() {
        return Err(EngineError::InvalidAmount {
            job_id: job.id.clone(),
            value: amount,
        });
    }
    let mut paid = job.clone();
    paid.bonus_paid = true;
    paid.bonus_eligible = true;
    paid.final_bonus_paid = Some(amount);
    paid.pay_date = Some(pay_date);
    paid.historical_config = Some(live.snapshot());
    Ok(paid)
}

pub fn mark_ineligible(job: &JobRecord, reason: &str) -> Result<JobRecord, EngineError> {
    let reason = require_reason("marking ineligible", job, reason)?;
    let mut out = job.clone();
    out.bonus_eligible = false;
    out.bonus_ineligible_reason = reason;
    Ok(out)
}

/// Override one person's bonus on this job. Stored under the sanitized
/// name, replacing any earlier override for the same person.
pub fn set_custom_bonus(
    job: &JobRecord,
    name: &str,
    amount: f64,
    reason: &str,
) -> Result<JobRecord, EngineError> {
    let reason = require_reason("custom bonus", job, reason)?;
    if !amount.is_finite() {
        return Err(EngineError::InvalidAmount {
            job_id: job.id.clone(),
            value: amount,
        });
    }
    let key = sanitize(name);

    let mut out = job.clone();
    out.custom_bonuses.retain(|k, _| sanitize(k) != key);
    out.custom_bonus_reasons.retain(|k, _| sanitize(k) != key);
    out.custom_bonuses.insert(key.clone(), amount);
    out.custom_bonus_reasons.insert(key, reason);
    Ok(out)
}

pub fn set_bonus_method(job: &JobRecord, method: BonusCalcMethod) -> JobRecord {
    let mut out = job.clone();
    out.bonus_calc_method = Some(method);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::allocate_job;
    use crate::model::{Distribution, PoolMethod, WorkerEntry};

    fn job() -> JobRecord {
        JobRecord {
            id: "j1".into(),
            invoice_amount: 1000.0,
            leader: Some("Lee".into()),
            worker_log: vec![WorkerEntry::new("Lee", 480.0), WorkerEntry::new("Ann", 480.0)],
            ..JobRecord::default()
        }
    }

    fn live() -> FinanceConfig {
        FinanceConfig {
            leader_pool_percent: 5.0,
            worker_pool_percent: 10.0,
            ..FinanceConfig::default()
        }
    }

    #[test]
    fn paying_freezes_config() {
        let paid = mark_paid(&job(), &live(), NaiveDate::from_ymd_opt(2024, 3, 19).unwrap(), 150.0).unwrap();
        assert!(paid.bonus_paid);
        assert_eq!(paid.final_bonus_paid, Some(150.0));
        assert_eq!(paid.historical_config, Some(live()));

        let raised = FinanceConfig { leader_pool_percent: 50.0, ..live() };
        assert_eq!(allocate_job(&paid, &raised).lines, allocate_job(&paid, &live()).lines);
    }

    #[test]
    fn paying_twice_fails() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 19).unwrap();
        let paid = mark_paid(&job(), &live(), date, 1.0).unwrap();
        assert!(matches!(
            mark_paid(&paid, &live(), date, 1.0),
            Err(EngineError::AlreadyPaid { .. })
        ));
    }

    #[test]
    fn paying_clears_ineligibility() {
        let j = mark_ineligible(&job(), "late").unwrap();
        let paid = mark_paid(&j, &live(), NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), 0.0).unwrap();
        assert!(!paid.is_ineligible());
    }

    #[test]
    fn ineligible_needs_reason() {
        assert!(matches!(
            mark_ineligible(&job(), "   "),
            Err(EngineError::MissingReason { .. })
        ));
        let j = mark_ineligible(&job(), " damage ").unwrap();
        assert!(j.is_ineligible());
        assert_eq!(j.bonus_ineligible_reason, "damage");
    }

    #[test]
    fn custom_bonus_keyed_by_sanitized_name() {
        let mut j = job();
        j.custom_bonuses.insert("Ann".into(), 5.0);
        let j = set_custom_bonus(&j, "ANN!", 40.0, "extra load").unwrap();
        assert_eq!(j.custom_bonuses.len(), 1);
        assert_eq!(j.custom_bonuses.get("ann"), Some(&40.0));
        assert_eq!(j.custom_bonus_reasons.get("ann").map(String::as_str), Some("extra load"));

        let lines = allocate_job(&j, &live()).lines;
        let ann = lines.iter().find(|l| l.name == "Ann").unwrap();
        assert!(ann.is_custom);
        assert_eq!(ann.amount, 40.0);
        assert_eq!(ann.reason, "extra load");
    }

    #[test]
    fn custom_bonus_rejects_bad_input() {
        assert!(matches!(
            set_custom_bonus(&job(), "Ann", 10.0, ""),
            Err(EngineError::MissingReason { .. })
        ));
        assert!(matches!(
            set_custom_bonus(&job(), "Ann", f64::NAN, "x"),
            Err(EngineError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn method_replaced() {
        let m = BonusCalcMethod::new(PoolMethod::LeaderPercent { leader_pct: 3.0 }, Distribution::Even);
        let j = set_bonus_method(&job(), m.clone());
        assert_eq!(j.method(), m);
        assert!(job().bonus_calc_method.is_none());
    }
}
