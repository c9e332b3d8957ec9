//! Flat payout rows, one per employee per job, for tabular export.

use serde::Serialize;

use crate::model::EmployeeSummary;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayoutRow {
    pub employee: String,
    /// `YYYY-MM-DD`, or `N/A` when the job carries no date.
    pub pay_date: String,
    pub job_date: String,
    pub project: String,
    pub company: String,
    pub role: String,
    pub hours: f64,
    pub invoice: f64,
    pub method: String,
    pub pool_basis: f64,
    pub amount: f64,
    pub custom_override: bool,
    pub status: &'static str,
    pub reason: String,
}

fn date_or_na(date: Option<chrono::NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

/// Flatten summaries in their display order.
pub fn payout_rows(summaries: &[EmployeeSummary]) -> Vec<PayoutRow> {
    summaries
        .iter()
        .flat_map(|s| {
            s.items.iter().map(move |line| PayoutRow {
                employee: s.name.clone(),
                pay_date: date_or_na(line.pay_date),
                job_date: date_or_na(line.completed_on),
                project: line.project.clone(),
                company: line.company.clone(),
                role: line.role.to_string(),
                hours: line.hours,
                invoice: line.invoice,
                method: line.method.to_string(),
                pool_basis: line.pool_basis,
                amount: line.amount,
                custom_override: line.is_custom,
                status: if line.is_ineligible { "Ineligible" } else { "Eligible" },
                reason: line.reason.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FinanceConfig;
    use crate::engine::compute_allocations;
    use crate::identity::EmployeeDirectory;
    use crate::model::{JobRecord, WorkerEntry};

    #[test]
    fn rows_follow_summary_order() {
        let mut job = JobRecord {
            id: "j1".into(),
            project: "Dock".into(),
            invoice_amount: 1000.0,
            leader: Some("Zed".into()),
            worker_log: vec![WorkerEntry::new("Zed", 480.0), WorkerEntry::new("Amy", 480.0)],
            ..JobRecord::default()
        };
        job.bonus_eligible = false;
        job.bonus_ineligible_reason = "no-show".into();
        job.custom_bonuses.insert("amy".into(), 30.0);

        let config = FinanceConfig {
            leader_pool_percent: 5.0,
            worker_pool_percent: 10.0,
            ..FinanceConfig::default()
        };
        let summaries = compute_allocations(&[job], &config, &EmployeeDirectory::default(), None);
        let rows = payout_rows(&summaries);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].employee, "Amy");
        assert_eq!(rows[0].role, "Worker");
        assert_eq!(rows[0].amount, 30.0);
        assert!(rows[0].custom_override);
        assert_eq!(rows[0].method, "standard_percent");
        assert_eq!(rows[0].pay_date, "N/A");

        assert_eq!(rows[1].employee, "Zed");
        assert_eq!(rows[1].status, "Ineligible");
        assert_eq!(rows[1].reason, "no-show");
        assert_eq!(rows[1].amount, 0.0);
    }
}
