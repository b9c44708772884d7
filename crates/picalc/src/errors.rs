//! Error handling and exit codes.

use picalc_core::calculator::PiError;
use picalc_core::constants::exit_codes;

/// Map a calculation error to the process exit code.
pub fn handle_error(err: &PiError) -> i32 {
    match err {
        PiError::InvalidInput(_) | PiError::Config(_) => exit_codes::ERROR_CONFIG,
        PiError::Cancelled => exit_codes::ERROR_CANCELED,
        PiError::Timeout(_) => exit_codes::ERROR_TIMEOUT,
        PiError::Overflow(_) | PiError::Calculation(_) => exit_codes::ERROR_GENERIC,
    }
}

/// Exit code for an application error, looking through its context chain.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<PiError>())
        .map_or(exit_codes::ERROR_GENERIC, handle_error)
}
