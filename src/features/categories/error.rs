use thiserror::Error;

use crate::features::categories::models::CategoryId;

/// Why a parent assignment would close a loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CycleKind {
    #[error("Category cannot be its own parent")]
    SelfParent,

    #[error("Cannot set a descendant category as parent (circular reference)")]
    DescendantParent,
}

/// Outcome of a rejected category operation
#[derive(Debug, Error)]
pub enum CategoryError {
    #[error("{0}")]
    Validation(String),

    #[error("Category {0} not found")]
    NotFound(CategoryId),

    #[error("Parent category {0} does not exist")]
    ParentNotFound(CategoryId),

    #[error("{0}")]
    Cycle(#[from] CycleKind),

    #[error("Cannot delete category {0} because it has subcategories; remove its subcategories first")]
    HasChildren(CategoryId),

    #[error("Parent chain starting at category {0} does not terminate")]
    Consistency(CategoryId),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type CategoryResult<T> = std::result::Result<T, CategoryError>;
