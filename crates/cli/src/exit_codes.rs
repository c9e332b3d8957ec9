//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract: payroll scripts rely on them.
//!
//! | Code | Meaning                                            |
//! |------|----------------------------------------------------|
//! | 0    | Success                                            |
//! | 1    | General error (output could not be written)        |
//! | 2    | CLI usage error (bad args, bad `--week` date)      |
//! | 3    | Finance config failed to parse or validate         |
//! | 4    | Jobs or directory file unreadable or unparsable    |
//! | 5    | `--id` names no job in the jobs file               |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - output file or serialization failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
/// clap exits with this code on its own parse failures.
pub const EXIT_USAGE: u8 = 2;

/// Finance config could not be read, parsed, or failed validation.
pub const EXIT_INVALID_CONFIG: u8 = 3;

/// Jobs or employee directory could not be read or parsed.
pub const EXIT_INPUT: u8 = 4;

/// Requested job id is not in the jobs file.
pub const EXIT_JOB_NOT_FOUND: u8 = 5;
