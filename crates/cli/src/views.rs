//! Read-only views: periods, roster, commissions, config validation.

use std::path::PathBuf;

use crewpay_bonus::commission::commission_ledger;
use crewpay_bonus::identity::roster;
use crewpay_bonus::paydate::work_weeks;
use serde::Serialize;

use crate::input::{emit_json, load_directory, load_finance, load_jobs};
use crate::CliError;

#[derive(Serialize)]
struct PeriodOut {
    start: chrono::NaiveDate,
    end: chrono::NaiveDate,
    label: String,
    jobs: usize,
}

pub fn cmd_periods(jobs: PathBuf, json: bool) -> Result<(), CliError> {
    let jobs = load_jobs(&jobs)?;
    let periods: Vec<PeriodOut> = work_weeks(&jobs)
        .into_iter()
        .map(|week| PeriodOut {
            start: week.start,
            end: week.end,
            label: week.label(),
            jobs: crewpay_bonus::paydate::jobs_in_week(&jobs, week.start).len(),
        })
        .collect();

    emit_json(&periods, json, None)?;
    if !json {
        for p in &periods {
            eprintln!("{}  ({} job(s))", p.label, p.jobs);
        }
    }
    eprintln!("{} work week(s)", periods.len());
    Ok(())
}

pub fn cmd_roster(jobs: PathBuf, directory: Option<PathBuf>, json: bool) -> Result<(), CliError> {
    let jobs = load_jobs(&jobs)?;
    let directory = load_directory(directory.as_deref())?;
    let r = roster(&jobs, &directory);

    emit_json(&r, json, None)?;
    if !json {
        for e in &r.active {
            eprintln!("  {}", e.name);
        }
        for e in &r.former {
            eprintln!("  {} (former)", e.name);
        }
    }
    eprintln!("{} active, {} former", r.active.len(), r.former.len());
    Ok(())
}

pub fn cmd_commissions(finance: PathBuf, jobs: PathBuf, json: bool) -> Result<(), CliError> {
    let config = load_finance(&finance)?;
    let jobs = load_jobs(&jobs)?;
    let ledger = commission_ledger(&jobs, &config);

    emit_json(&ledger, json, None)?;
    if !json {
        for agent in &ledger {
            eprintln!("  {:<24} ${:>10.2}  ({} job(s))", agent.agent, agent.total, agent.jobs.len());
        }
    }
    eprintln!(
        "{} agent(s), total ${:.2}",
        ledger.len(),
        ledger.iter().map(|a| a.total).sum::<f64>()
    );
    Ok(())
}

pub fn cmd_validate(config: PathBuf) -> Result<(), CliError> {
    let finance = load_finance(&config)?;
    let tiers = [
        finance.leader_pool_percent_3.or(finance.worker_pool_percent_3),
        finance.leader_pool_percent_2.or(finance.worker_pool_percent_2),
        finance.worker_pool_percent_1,
    ]
    .iter()
    .filter(|t| t.is_some())
    .count();
    eprintln!(
        "valid: ${:.2}/h labor, {}% leader / {}% worker, {} team tier(s), {} agent(s)",
        finance.cost_per_hour,
        finance.leader_pool_percent,
        finance.worker_pool_percent,
        tiers,
        finance.agents.len(),
    );
    Ok(())
}
