use chrono::NaiveDate;
use serde::Serialize;

use crate::aggregate::Ledger;
use crate::config::{FinanceConfig, TeamTier, TierPercents};
use crate::distribute::distribute_job;
use crate::fairness::{apply_fairness, FairnessAdjustment};
use crate::identity::{sanitize, EmployeeDirectory};
use crate::model::{AllocationLine, BonusCalcMethod, ConfigSource, EmployeeSummary, JobRecord};
use crate::paydate::jobs_in_week;
use crate::pool::{allocate_pools, Pools};
use crate::profit::{compute_profit, ProfitBreakdown};
use crate::team::{resolve_team, select_tier, TeamComposition};

/// Every intermediate value for one job, stages 1 through 5.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobAllocation {
    pub job_id: String,
    pub config_source: ConfigSource,
    pub profit: ProfitBreakdown,
    pub team: TeamComposition,
    pub tier: TeamTier,
    pub tier_percents: TierPercents,
    pub method: BonusCalcMethod,
    pub pools_before: Pools,
    pub pools: Pools,
    pub fairness: Option<FairnessAdjustment>,
    /// Lines under raw log names, before directory resolution.
    pub lines: Vec<AllocationLine>,
}

/// Run the full pipeline for a single job against its effective config.
pub fn allocate_job(job: &JobRecord, live: &FinanceConfig) -> JobAllocation {
    let (config, config_source) = job.effective_config(live);
    if config_source == ConfigSource::Historical {
        log::debug!("job '{}': using historical config snapshot", job.id);
    }

    let profit = compute_profit(job, config);
    let team = resolve_team(job, profit.labor_hours);
    let (tier, tier_percents) = select_tier(config, &team);
    let method = job.method();

    let pools_before = allocate_pools(profit.profit, &method.pool, tier_percents, team.worker_count());
    let (pools, fairness) = apply_fairness(
        pools_before,
        &method.pool,
        team.leader_minutes,
        team.max_worker_minutes,
    );
    if let Some(adj) = &fairness {
        log::debug!(
            "job '{}': fairness moved {:.2} to workers (ratio {:.3})",
            job.id,
            adj.moved,
            adj.ratio
        );
    }

    let lines = distribute_job(job, &team, pools, &method, profit.profit);

    JobAllocation {
        job_id: job.id.clone(),
        config_source,
        profit,
        team,
        tier,
        tier_percents,
        method,
        pools_before,
        pools,
        fairness,
        lines,
    }
}

/// Allocate every job and aggregate by resolved display name.
///
/// `filter_employee`, when given, keeps only lines whose sanitized display
/// name equals the sanitized filter.
pub fn compute_allocations(
    jobs: &[JobRecord],
    live: &FinanceConfig,
    directory: &EmployeeDirectory,
    filter_employee: Option<&str>,
) -> Vec<EmployeeSummary> {
    let jobs: Vec<&JobRecord> = jobs.iter().collect();
    ledger_for(&jobs, live, directory, filter_employee).into_summaries()
}

fn ledger_for(
    jobs: &[&JobRecord],
    live: &FinanceConfig,
    directory: &EmployeeDirectory,
    filter_employee: Option<&str>,
) -> Ledger {
    let filter = filter_employee.map(sanitize).filter(|f| !f.is_empty());

    jobs.iter()
        .flat_map(|job| allocate_job(job, live).lines)
        .map(|mut line| {
            line.name = directory.display_name(&line.name);
            line
        })
        .filter(|line| filter.as_deref().map_or(true, |f| sanitize(&line.name) == f))
        .collect()
}

// ---------------------------------------------------------------------------
// Run report
// ---------------------------------------------------------------------------

/// Inputs for one engine run.
#[derive(Debug, Clone, Copy)]
pub struct AllocationRequest<'a> {
    pub jobs: &'a [JobRecord],
    pub live: &'a FinanceConfig,
    pub directory: Option<&'a EmployeeDirectory>,
    pub filter_employee: Option<&'a str>,
    /// Restrict to jobs paid out for the work week starting on this Sunday.
    pub week_start: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportMeta {
    pub engine_version: String,
    pub run_at: String,
    pub job_count: usize,
    pub filter_employee: Option<String>,
    pub week_start: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportSummary {
    pub employee_count: usize,
    pub line_count: usize,
    pub total_payout: f64,
    pub custom_lines: usize,
    pub ineligible_lines: usize,
    /// Jobs replayed under their historical config snapshot.
    pub historical_jobs: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationReport {
    pub meta: ReportMeta,
    pub summary: ReportSummary,
    pub employees: Vec<EmployeeSummary>,
}

/// Apply the period filter, allocate, and wrap the result with run metadata.
pub fn run(request: &AllocationRequest<'_>) -> AllocationReport {
    let jobs: Vec<&JobRecord> = match request.week_start {
        Some(start) => jobs_in_week(request.jobs, start),
        None => request.jobs.iter().collect(),
    };

    let empty = EmployeeDirectory::default();
    let directory = request.directory.unwrap_or(&empty);
    let employees =
        ledger_for(&jobs, request.live, directory, request.filter_employee).into_summaries();

    let lines = employees.iter().flat_map(|e| e.items.iter());
    let summary = ReportSummary {
        employee_count: employees.len(),
        line_count: lines.clone().count(),
        total_payout: employees.iter().map(|e| e.total).sum(),
        custom_lines: lines.clone().filter(|l| l.is_custom).count(),
        ineligible_lines: lines.filter(|l| l.is_ineligible).count(),
        historical_jobs: jobs.iter().filter(|j| j.historical_config.is_some()).count(),
    };

    AllocationReport {
        meta: ReportMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            job_count: jobs.len(),
            filter_employee: request.filter_employee.map(str::to_string),
            week_start: request.week_start,
        },
        summary,
        employees,
    }
}
