use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::features::categories::error::{CategoryError, CategoryResult};
use crate::shared::constants::MAX_NAME_LENGTH;

pub type CategoryId = i64;

/// Database model for category
///
/// The hierarchy lives entirely in `parent_id`; children are found by key
/// lookup, never through embedded references.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Category {
    pub id: CategoryId,
    pub parent_id: Option<CategoryId>,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Fields supplied when creating a category
#[derive(Debug, Clone, Default)]
pub struct NewCategory {
    pub name: String,
    pub parent_id: Option<CategoryId>,
    pub description: Option<String>,
}

/// Partial update. `None` leaves a field untouched; for the nullable fields
/// `Some(None)` clears the value.
#[derive(Debug, Clone, Default)]
pub struct CategoryChanges {
    pub name: Option<String>,
    pub parent_id: Option<Option<CategoryId>>,
    pub description: Option<Option<String>>,
}

/// Trim a category name and reject it if nothing is left
pub fn normalize_name(name: &str) -> CategoryResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CategoryError::Validation(
            "Category name is required".to_string(),
        ));
    }
    if trimmed.chars().count() as u64 > MAX_NAME_LENGTH {
        return Err(CategoryError::Validation(format!(
            "Category name must not exceed {} characters",
            MAX_NAME_LENGTH
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name_trims() {
        assert_eq!(normalize_name("  Fruits ").unwrap(), "Fruits");
    }

    #[test]
    fn test_normalize_name_rejects_blank() {
        assert!(matches!(
            normalize_name("   "),
            Err(CategoryError::Validation(_))
        ));
        assert!(matches!(normalize_name(""), Err(CategoryError::Validation(_))));
    }

    #[test]
    fn test_normalize_name_rejects_too_long() {
        let name = "x".repeat(MAX_NAME_LENGTH as usize + 1);
        assert!(matches!(
            normalize_name(&name),
            Err(CategoryError::Validation(_))
        ));
    }
}
