//! GitHub Actions workflow commands.
//!
//! A failed run is reported the way the Actions toolkit's `setFailed` does
//! it: an `::error::` command on stdout, then a non-zero exit (left to the
//! caller).

/// Escape a message for use as workflow command data.
pub fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

pub fn error_command(message: &str) -> String {
    format!("::error::{}", escape_data(message))
}

/// Print the `::error::` command for `message`.
pub fn set_failed(message: &str) {
    println!("{}", error_command(message));
}
