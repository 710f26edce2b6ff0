//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! | Code | Meaning                                               |
//! |------|-------------------------------------------------------|
//! | 0    | Success (including "no duplicates found")             |
//! | 1    | General error (unspecified)                           |
//! | 2    | Usage error (bad args, unreadable profile file)       |
//! | 3    | No data: no input yielded any row                     |
//! | 4    | Selected field not present in the unified schema      |
//! | 5    | Report could not be written                           |
//! | 6    | Match profile failed to parse or validate             |
//! | 7    | One or more inputs could not be read (`--strict`)     |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into `CliError` construction in main.rs

use tabmatch_engine::EngineError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// None of the inputs produced a data row.
pub const EXIT_NO_DATA: u8 = 3;

/// A `--fields` / profile field is not in the unified schema.
pub const EXIT_INVALID_SELECTION: u8 = 4;

/// Export to `--output` failed (unsupported extension, write error).
pub const EXIT_EXPORT: u8 = 5;

/// Match profile TOML is malformed or fails validation.
pub const EXIT_PROFILE: u8 = 6;

/// Some inputs failed to read and `--strict` was given.
pub const EXIT_SOURCE_FAILED: u8 = 7;

/// Map an engine error to its exit code.
pub fn engine_exit_code(err: &EngineError) -> u8 {
    match err {
        EngineError::EmptyInput => EXIT_NO_DATA,
        EngineError::InvalidSelection { .. } => EXIT_INVALID_SELECTION,
        EngineError::ConfigParse(_) | EngineError::ConfigValidation(_) => EXIT_PROFILE,
    }
}
