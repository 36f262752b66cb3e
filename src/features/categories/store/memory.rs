use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::features::categories::error::{CategoryError, CategoryResult};
use crate::features::categories::hierarchy::{authorize_delete, Forest};
use crate::features::categories::models::{Category, CategoryChanges, CategoryId, NewCategory};
use crate::features::categories::store::{prepare_create, prepare_update, CategoryStore};

struct MemoryState {
    forest: Forest,
    next_id: CategoryId,
}

/// Process-local store; writers hold the write lock from validation to commit
pub struct MemoryCategoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryCategoryStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(MemoryState {
                forest: Forest::default(),
                next_id: 1,
            }),
        }
    }

    /// Build a store over existing rows, bypassing validation
    #[cfg(test)]
    pub fn with_rows(rows: Vec<Category>) -> Self {
        let next_id = rows.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        Self {
            state: RwLock::new(MemoryState {
                forest: Forest::new(rows),
                next_id,
            }),
        }
    }
}

impl Default for MemoryCategoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CategoryStore for MemoryCategoryStore {
    async fn list_all(&self) -> CategoryResult<Vec<Category>> {
        let state = self.state.read().await;
        Ok(state.forest.sorted().into_iter().cloned().collect())
    }

    async fn get(&self, id: CategoryId) -> CategoryResult<Category> {
        let state = self.state.read().await;
        state
            .forest
            .get(id)
            .cloned()
            .ok_or(CategoryError::NotFound(id))
    }

    async fn create(&self, new: NewCategory) -> CategoryResult<Category> {
        let mut state = self.state.write().await;
        let new = prepare_create(&state.forest, new)?;

        let now = Utc::now();
        let category = Category {
            id: state.next_id,
            parent_id: new.parent_id,
            name: new.name,
            description: new.description,
            created_at: now,
            updated_at: now,
        };
        state.next_id += 1;
        state.forest.insert(category.clone());

        Ok(category)
    }

    async fn update(&self, id: CategoryId, changes: CategoryChanges) -> CategoryResult<Category> {
        let mut state = self.state.write().await;
        let mut updated = prepare_update(&state.forest, id, changes)?;
        updated.updated_at = Utc::now();

        let slot = state
            .forest
            .get_mut(id)
            .ok_or(CategoryError::NotFound(id))?;
        *slot = updated.clone();

        Ok(updated)
    }

    async fn delete(&self, id: CategoryId) -> CategoryResult<()> {
        let mut state = self.state.write().await;
        if !state.forest.contains(id) {
            return Err(CategoryError::NotFound(id));
        }
        authorize_delete(id, state.forest.count_children(id) as i64)?;
        state.forest.remove(id);
        Ok(())
    }

    async fn count_children(&self, id: CategoryId) -> CategoryResult<i64> {
        let state = self.state.read().await;
        Ok(state.forest.count_children(id) as i64)
    }

    async fn snapshot(&self) -> CategoryResult<Forest> {
        let state = self.state.read().await;
        Ok(state.forest.clone())
    }
}
