use validator::ValidationError;

use crate::shared::constants::MAX_NAME_LENGTH;

/// Category name rule, measured on the trimmed value that gets stored
pub fn category_name(value: &str) -> Result<(), ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        let mut error = ValidationError::new("not_blank");
        error.message = Some("Category name is required".into());
        return Err(error);
    }
    if trimmed.chars().count() as u64 > MAX_NAME_LENGTH {
        let mut error = ValidationError::new("length");
        error.message = Some(
            format!(
                "Category name must not exceed {} characters",
                MAX_NAME_LENGTH
            )
            .into(),
        );
        return Err(error);
    }
    Ok(())
}
