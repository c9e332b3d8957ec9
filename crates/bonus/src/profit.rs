//! Job profit: invoice less labor cost and agent commission.

use serde::Serialize;

use crate::config::FinanceConfig;
use crate::model::JobRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ProfitBreakdown {
    pub labor_hours: f64,
    pub labor_cost: f64,
    pub commission: f64,
    /// May be negative; never clamped here.
    pub profit: f64,
}

/// Labor hours from the worker log when one exists, otherwise from the
/// scanned clock seconds. Never negative.
pub fn labor_hours(job: &JobRecord) -> f64 {
    let hours = if job.worker_log.is_empty() {
        (job.original_seconds - job.final_seconds) / 3600.0
    } else {
        job.worker_log.iter().map(|w| w.minutes).sum::<f64>() / 60.0
    };
    hours.max(0.0)
}

/// Commission owed to the job's agent. Zero without an agent or when the
/// agent is not in the config.
pub fn commission(job: &JobRecord, config: &FinanceConfig) -> f64 {
    let Some(agent) = job.agent_name.as_deref() else {
        return 0.0;
    };
    match config.agent_rate(agent) {
        Some(rate) => commission_basis(job) * rate / 100.0,
        None => {
            log::debug!("job '{}': agent '{agent}' not in config, no commission", job.id);
            0.0
        }
    }
}

/// Invoice amount the commission percentage applies to.
pub fn commission_basis(job: &JobRecord) -> f64 {
    (job.invoice_amount - job.commission_excluded).max(0.0)
}

pub fn compute_profit(job: &JobRecord, config: &FinanceConfig) -> ProfitBreakdown {
    let labor_hours = labor_hours(job);
    let labor_cost = labor_hours * config.cost_per_hour;
    let commission = commission(job, config);

    ProfitBreakdown {
        labor_hours,
        labor_cost,
        commission,
        profit: job.invoice_amount - labor_cost - commission,
    }
}
