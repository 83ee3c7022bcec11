//! Input validation helpers

use validator::{Validate, ValidationErrors};

use crate::upload::UploadError;

/// Longest expiry window accepted, in days
pub const MAX_WINDOW_DAYS: i64 = 3650;

/// Only CSV uploads are accepted
pub fn validate_upload_file_name(file_name: &str) -> Result<(), UploadError> {
    let is_csv = std::path::Path::new(file_name.trim())
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);
    if is_csv {
        Ok(())
    } else {
        Err(UploadError::UnsupportedFileType(file_name.to_string()))
    }
}

/// Run the record's `validator` rules, reporting failures against its row number
pub fn validate_record<T: Validate>(row: usize, record: &T) -> Result<(), UploadError> {
    record.validate().map_err(|errors| UploadError::InvalidRow {
        row,
        message: describe(&errors),
    })
}

fn describe(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("{field} is invalid"),
            })
        })
        .collect();
    messages.sort();
    messages.join("; ")
}

/// Expiry windows must be between 0 and ten years
pub fn validate_window_days(days: i64) -> Result<i64, String> {
    if (0..=MAX_WINDOW_DAYS).contains(&days) {
        Ok(days)
    } else {
        Err(format!("days must be between 0 and {MAX_WINDOW_DAYS}, got {days}"))
    }
}
