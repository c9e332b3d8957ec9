//! `crewpay allocate` and `crewpay job`: bonus payouts.

use std::path::PathBuf;

use chrono::NaiveDate;
use crewpay_bonus::engine::{allocate_job, run, AllocationRequest};
use crewpay_bonus::export::payout_rows;
use crewpay_bonus::model::ConfigSource;

use crate::exit_codes::EXIT_JOB_NOT_FOUND;
use crate::input::{emit_json, load_directory, load_finance, load_jobs};
use crate::CliError;

pub struct AllocateArgs {
    pub finance: PathBuf,
    pub jobs: PathBuf,
    pub directory: Option<PathBuf>,
    pub employee: Option<String>,
    pub week: Option<NaiveDate>,
    pub json: bool,
    pub rows: bool,
    pub output: Option<PathBuf>,
}

pub fn cmd_allocate(args: AllocateArgs) -> Result<(), CliError> {
    if args.rows && !args.json && args.output.is_none() {
        return Err(CliError::args("--rows only changes JSON output")
            .with_hint("add --json or --output <file>"));
    }

    let config = load_finance(&args.finance)?;
    let jobs = load_jobs(&args.jobs)?;
    let directory = load_directory(args.directory.as_deref())?;

    let report = run(&AllocationRequest {
        jobs: &jobs,
        live: &config,
        directory: Some(&directory),
        filter_employee: args.employee.as_deref(),
        week_start: args.week,
    });

    if args.rows {
        emit_json(&payout_rows(&report.employees), args.json, args.output.as_deref())?;
    } else {
        emit_json(&report, args.json, args.output.as_deref())?;
    }

    // Human summary to stderr
    let s = &report.summary;
    eprintln!(
        "{} job(s): {} employee(s), {} line(s), total ${:.2} ({} custom, {} ineligible, {} historical)",
        report.meta.job_count,
        s.employee_count,
        s.line_count,
        s.total_payout,
        s.custom_lines,
        s.ineligible_lines,
        s.historical_jobs,
    );
    if !args.json {
        for employee in &report.employees {
            eprintln!(
                "  {:<24} ${:>10.2}  ({} job(s))",
                employee.name,
                employee.total,
                employee.items.len()
            );
        }
    }

    Ok(())
}

pub fn cmd_job(finance: PathBuf, jobs: PathBuf, id: String, json: bool) -> Result<(), CliError> {
    let config = load_finance(&finance)?;
    let jobs = load_jobs(&jobs)?;

    let job = jobs.iter().find(|j| j.id == id).ok_or_else(|| CliError {
        code: EXIT_JOB_NOT_FOUND,
        message: format!("no job with id '{id}'"),
        hint: Some(format!("{} job(s) loaded", jobs.len())),
    })?;

    let allocation = allocate_job(job, &config);
    emit_json(&allocation, json, None)?;

    let p = &allocation.profit;
    eprintln!(
        "job '{}': {} config, profit ${:.2} (invoice ${:.2} - labor ${:.2} - commission ${:.2})",
        allocation.job_id,
        match allocation.config_source {
            ConfigSource::Live => "live",
            ConfigSource::Historical => "historical",
        },
        p.profit,
        job.invoice_amount,
        p.labor_cost,
        p.commission,
    );
    eprintln!(
        "team of {} ({} tier), method {}, pools ${:.2} leader / ${:.2} worker",
        allocation.team.team_size,
        allocation.tier,
        allocation.method.pool.kind(),
        allocation.pools.leader,
        allocation.pools.worker,
    );
    if let Some(adj) = &allocation.fairness {
        eprintln!("30-minute rule: moved ${:.2} to workers (ratio {:.3})", adj.moved, adj.ratio);
    }
    if !json {
        for line in &allocation.lines {
            eprintln!(
                "  {:<24} {:<6} {:>6.2}h ${:>9.2}{}",
                line.name,
                line.role.to_string(),
                line.hours,
                line.amount,
                if line.is_custom { "  custom" } else { "" },
            );
        }
    }

    Ok(())
}
