// src/models/mod.rs

pub mod attempt;
pub mod question;
pub mod quiz;
pub mod user;

use validator::ValidationErrors;

use crate::utils::html::clean_html;

/// Rejects strings that are empty once surrounding whitespace is removed.
pub(crate) fn not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("blank")
            .with_message("must not be blank".into()));
    }
    Ok(())
}

/// Trims and sanitizes author-supplied text. Records a `blank` error under
/// `field` when nothing is left once markup has been stripped.
pub(crate) fn clean_text(field: &'static str, value: &str, errors: &mut ValidationErrors) -> String {
    let cleaned = clean_html(value.trim());
    if let Err(error) = not_blank(&cleaned) {
        errors.add(field, error);
    }
    cleaned
}
