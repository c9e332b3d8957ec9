use std::fmt;

#[derive(Debug)]
pub enum EngineError {
    /// TOML / JSON parse error for the finance config.
    ConfigParse(String),
    /// Config validation error (negative rate, duplicate agent, etc.).
    ConfigValidation(String),
    /// Job record list could not be deserialized.
    JobParse(String),
    /// Employee directory could not be deserialized.
    DirectoryParse(String),
    /// A review action that requires a reason was given a blank one.
    MissingReason { action: &'static str, job_id: String },
    /// Payment was requested for a job that is already paid.
    AlreadyPaid { job_id: String },
    /// Override amount is not a finite number.
    InvalidAmount { job_id: String, value: f64 },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "finance config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "finance config validation error: {msg}"),
            Self::JobParse(msg) => write!(f, "job records parse error: {msg}"),
            Self::DirectoryParse(msg) => write!(f, "employee directory parse error: {msg}"),
            Self::MissingReason { action, job_id } => {
                write!(f, "job '{job_id}': {action} requires a reason")
            }
            Self::AlreadyPaid { job_id } => write!(f, "job '{job_id}': bonus already paid"),
            Self::InvalidAmount { job_id, value } => {
                write!(f, "job '{job_id}': invalid bonus amount {value}")
            }
        }
    }
}

impl std::error::Error for EngineError {}
