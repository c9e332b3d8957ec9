//! Agent commission ledger.
//!
//! Groups every agent-booked job under its agent with the commission owed,
//! computed under the job's effective config. Amounts here are rounded to
//! cents for statements; profit keeps the unrounded figure.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::FinanceConfig;
use crate::model::JobRecord;
use crate::profit::commission_basis;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommissionLine {
    pub job_id: String,
    pub project: String,
    pub company: String,
    pub completed_on: Option<NaiveDate>,
    pub invoice: f64,
    pub excluded: f64,
    pub basis: f64,
    /// Zero when the agent is not in the config.
    pub rate: f64,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentCommissions {
    pub agent: String,
    pub total: f64,
    pub jobs: Vec<CommissionLine>,
}

/// Round half away from zero to cents.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn commission_ledger(jobs: &[JobRecord], live: &FinanceConfig) -> Vec<AgentCommissions> {
    let mut by_agent: BTreeMap<&str, Vec<CommissionLine>> = BTreeMap::new();

    for job in jobs {
        let Some(agent) = job.agent_name.as_deref().filter(|a| !a.trim().is_empty()) else {
            continue;
        };
        let (config, _) = job.effective_config(live);
        let rate = config.agent_rate(agent).unwrap_or(0.0);
        let basis = commission_basis(job);

        by_agent.entry(agent).or_default().push(CommissionLine {
            job_id: job.id.clone(),
            project: job.project.clone(),
            company: job.company.clone(),
            completed_on: job.completed_on(),
            invoice: job.invoice_amount,
            excluded: job.commission_excluded,
            basis,
            rate,
            amount: round_cents(basis * rate / 100.0),
        });
    }

    by_agent
        .into_iter()
        .map(|(agent, mut lines)| {
            lines.sort_by(|a, b| b.completed_on.cmp(&a.completed_on).then_with(|| a.job_id.cmp(&b.job_id)));
            AgentCommissions {
                agent: agent.to_string(),
                total: round_cents(lines.iter().map(|l| l.amount).sum()),
                jobs: lines,
            }
        })
        .collect()
}
