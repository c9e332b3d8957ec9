//! Cross-job aggregation into per-employee summaries.
//!
//! A [`Ledger`] accumulates lines keyed by sanitized employee name, so
//! spelling variants of one person land in one summary. The summary shows
//! whichever variant sorts first under [`compare_names`]. Ledgers built over
//! disjoint job sets can be merged in any order; display sorting happens
//! once in [`Ledger::into_summaries`].

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::identity::{compare_names, EmployeeKey};
use crate::model::{AllocationLine, EmployeeSummary};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    employees: BTreeMap<EmployeeKey, EmployeeSummary>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `line` to the employee whose sanitized name matches `line.name`.
    pub fn add_line(&mut self, line: AllocationLine) {
        let summary = self
            .employees
            .entry(EmployeeKey::new(&line.name))
            .or_insert_with(|| EmployeeSummary {
                name: line.name.clone(),
                total: 0.0,
                items: Vec::new(),
            });
        prefer_name(&mut summary.name, &line.name);
        summary.total += line.amount;
        summary.items.push(line);
    }

    /// Fold another ledger into this one: totals add, items concatenate.
    pub fn merge(&mut self, other: Ledger) {
        for (key, theirs) in other.employees {
            match self.employees.get_mut(&key) {
                Some(ours) => {
                    prefer_name(&mut ours.name, &theirs.name);
                    ours.total += theirs.total;
                    ours.items.extend(theirs.items);
                }
                None => {
                    self.employees.insert(key, theirs);
                }
            }
        }
    }

    /// Employees by name; each employee's items newest payout first.
    pub fn into_summaries(self) -> Vec<EmployeeSummary> {
        let mut summaries: Vec<EmployeeSummary> = self
            .employees
            .into_values()
            .map(|mut s| {
                s.items.sort_by(compare_items);
                s
            })
            .collect();
        summaries.sort_by(|a, b| compare_names(&a.name, &b.name));
        summaries
    }
}

impl FromIterator<AllocationLine> for Ledger {
    fn from_iter<I: IntoIterator<Item = AllocationLine>>(iter: I) -> Self {
        let mut ledger = Ledger::new();
        for line in iter {
            ledger.add_line(line);
        }
        ledger
    }
}

fn prefer_name(current: &mut String, candidate: &str) {
    if compare_names(candidate, current).is_lt() {
        *current = candidate.to_string();
    }
}

/// Pay date descending with undated lines last, then completion date
/// descending, then job id.
fn compare_items(a: &AllocationLine, b: &AllocationLine) -> Ordering {
    desc_some_first(a.pay_date, b.pay_date)
        .then_with(|| desc_some_first(a.completed_on, b.completed_on))
        .then_with(|| a.job_id.cmp(&b.job_id))
}

fn desc_some_first<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PoolMethodKind, Role};
    use chrono::NaiveDate;

    fn line(name: &str, job: &str, amount: f64, pay: Option<(i32, u32, u32)>) -> AllocationLine {
        AllocationLine {
            name: name.into(),
            role: Role::Worker,
            minutes: 60.0,
            hours: 1.0,
            amount,
            pool_basis: amount,
            method: PoolMethodKind::StandardPercent,
            is_custom: false,
            is_ineligible: false,
            reason: String::new(),
            job_id: job.into(),
            project: String::new(),
            company: String::new(),
            pl_number: String::new(),
            agent: String::new(),
            pay_date: pay.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            completed_on: None,
            invoice: 0.0,
            profit: 0.0,
        }
    }

    #[test]
    fn totals_sum_per_employee() {
        let ledger: Ledger = vec![
            line("Ann", "j1", 10.0, None),
            line("Bob", "j1", 5.0, None),
            line("Ann", "j2", 2.5, None),
        ]
        .into_iter()
        .collect();
        let out = ledger.into_summaries();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].name, "Ann");
        assert_eq!(out[0].total, 12.5);
        assert_eq!(out[0].items.len(), 2);
        assert_eq!(out[1].total, 5.0);
    }

    #[test]
    fn names_sort_case_insensitively() {
        let ledger: Ledger = ["bob", "Alice", "Carl"]
            .iter()
            .map(|n| line(n, "j", 1.0, None))
            .collect();
        let names: Vec<_> = ledger.into_summaries().into_iter().map(|s| s.name).collect();
        assert_eq!(names, ["Alice", "bob", "Carl"]);
    }

    #[test]
    fn items_newest_payout_first_undated_last() {
        let ledger: Ledger = vec![
            line("Ann", "old", 1.0, Some((2024, 1, 2))),
            line("Ann", "none", 1.0, None),
            line("Ann", "new", 1.0, Some((2024, 3, 5))),
        ]
        .into_iter()
        .collect();
        let jobs: Vec<_> = ledger.into_summaries()[0]
            .items
            .iter()
            .map(|l| l.job_id.clone())
            .collect();
        assert_eq!(jobs, ["new", "old", "none"]);
    }

    #[test]
    fn merge_order_does_not_matter() {
        let a = || -> Ledger { vec![line("Ann", "j1", 3.0, None), line("Bob", "j1", 1.0, None)].into_iter().collect() };
        let b = || -> Ledger { vec![line("Ann", "j2", 4.0, Some((2024, 2, 1)))].into_iter().collect() };

        let mut ab = a();
        ab.merge(b());
        let mut ba = b();
        ba.merge(a());

        assert_eq!(ab.into_summaries(), ba.into_summaries());
    }

    #[test]
    fn spelling_variants_share_one_entry() {
        let a: Ledger = vec![line("ann-smith", "j1", 3.0, None)].into_iter().collect();
        let b: Ledger = vec![line("Ann Smith", "j2", 4.0, None), line("ann smith", "j3", 1.0, None)]
            .into_iter()
            .collect();

        let mut ab = a.clone();
        ab.merge(b.clone());
        let mut ba = b;
        ba.merge(a);

        let out = ab.into_summaries();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "Ann Smith");
        assert_eq!(out[0].total, 8.0);
        assert_eq!(out[0].items.len(), 3);
        assert_eq!(out, ba.into_summaries());
    }
}
