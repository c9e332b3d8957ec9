//! `crewpay-bonus`: Bonus and commission allocation engine.
//!
//! Pure engine crate: receives pre-loaded job records and a finance config,
//! returns per-job allocations and per-employee payout summaries.
//! No CLI or IO dependencies.

pub mod aggregate;
pub mod commission;
pub mod config;
pub mod de;
pub mod distribute;
pub mod engine;
pub mod error;
pub mod export;
pub mod fairness;
pub mod identity;
pub mod model;
pub mod paydate;
pub mod pool;
pub mod profit;
pub mod review;
pub mod team;

pub use commission::{commission_ledger, AgentCommissions};
pub use config::FinanceConfig;
pub use engine::{allocate_job, compute_allocations, run, AllocationReport, AllocationRequest, JobAllocation};
pub use error::EngineError;
pub use identity::{sanitize, EmployeeDirectory, EmployeeKey};
pub use model::{load_jobs_json, AllocationLine, BonusCalcMethod, EmployeeSummary, JobRecord, PoolMethod};
pub use paydate::{pay_date_for, work_week_for, WorkWeek};
