//! Category persistence.
//!
//! Both backends run every mutation as one atomic unit: the hierarchy checks
//! read the state the mutation is applied to, so two concurrent writers can
//! never both pass a guard on stale data.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::features::categories::error::{CategoryError, CategoryResult};
use crate::features::categories::hierarchy::Forest;
use crate::features::categories::models::{
    category::normalize_name, Category, CategoryChanges, CategoryId, NewCategory,
};

pub use memory::MemoryCategoryStore;
pub use postgres::PgCategoryStore;

#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Every category, ordered by name then id
    async fn list_all(&self) -> CategoryResult<Vec<Category>>;

    async fn get(&self, id: CategoryId) -> CategoryResult<Category>;

    async fn create(&self, new: NewCategory) -> CategoryResult<Category>;

    async fn update(&self, id: CategoryId, changes: CategoryChanges) -> CategoryResult<Category>;

    /// Remove a category; refused while it still has children
    async fn delete(&self, id: CategoryId) -> CategoryResult<()>;

    async fn count_children(&self, id: CategoryId) -> CategoryResult<i64>;

    /// Read-only snapshot for path and tree resolution
    async fn snapshot(&self) -> CategoryResult<Forest> {
        Ok(Forest::new(self.list_all().await?))
    }
}

/// Validate a create against the current forest and return the normalized input
pub(crate) fn prepare_create(forest: &Forest, new: NewCategory) -> CategoryResult<NewCategory> {
    let name = normalize_name(&new.name)?;
    if let Some(parent_id) = new.parent_id {
        forest.check_parent(None, parent_id)?;
    }

    Ok(NewCategory {
        name,
        parent_id: new.parent_id,
        description: new.description,
    })
}

/// Validate an update against the current forest and return the record as it
/// will look once applied (timestamps untouched)
pub(crate) fn prepare_update(
    forest: &Forest,
    id: CategoryId,
    changes: CategoryChanges,
) -> CategoryResult<Category> {
    let mut updated = forest
        .get(id)
        .cloned()
        .ok_or(CategoryError::NotFound(id))?;

    if let Some(name) = changes.name {
        updated.name = normalize_name(&name)?;
    }
    if let Some(parent_id) = changes.parent_id {
        if let Some(new_parent) = parent_id {
            forest.check_parent(Some(id), new_parent)?;
        }
        updated.parent_id = parent_id;
    }
    if let Some(description) = changes.description {
        updated.description = description;
    }

    Ok(updated)
}
