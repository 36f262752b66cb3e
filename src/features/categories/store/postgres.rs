use std::borrow::Cow;

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};

use crate::features::categories::error::{CategoryError, CategoryResult};
use crate::features::categories::hierarchy::{authorize_delete, Forest};
use crate::features::categories::models::{Category, CategoryChanges, CategoryId, NewCategory};
use crate::features::categories::store::{prepare_create, prepare_update, CategoryStore};

const CATEGORY_COLUMNS: &str = "id, parent_id, name, description, created_at, updated_at";

/// Byte-wise name order, the same order `Forest::sorted` produces
const NAME_ORDER: &str = r#"name COLLATE "C" ASC, id ASC"#;

/// PostgreSQL-backed store.
///
/// Mutations take a `SHARE ROW EXCLUSIVE` lock on `categories` inside their
/// transaction. The mode conflicts with itself, so writers queue up, while
/// plain `SELECT`s keep running against their MVCC snapshot.
pub struct PgCategoryStore {
    pool: PgPool,
}

impl PgCategoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn lock_for_write(conn: &mut PgConnection) -> Result<(), sqlx::Error> {
    sqlx::query("LOCK TABLE categories IN SHARE ROW EXCLUSIVE MODE")
        .execute(&mut *conn)
        .await?;
    Ok(())
}

async fn load_forest(conn: &mut PgConnection) -> Result<Forest, sqlx::Error> {
    let query = format!("SELECT {} FROM categories", CATEGORY_COLUMNS);
    let rows = sqlx::query_as::<_, Category>(&query).fetch_all(&mut *conn).await?;
    Ok(Forest::new(rows))
}

/// Translate constraint violations into the category error taxonomy.
///
/// The in-transaction checks normally catch these first; the constraints are
/// the last line when someone writes to the table directly.
fn map_db_error(e: sqlx::Error, on_foreign_key: impl FnOnce() -> CategoryError) -> CategoryError {
    if let sqlx::Error::Database(db_err) = &e {
        // foreign_key_violation
        if db_err.code() == Some(Cow::Borrowed("23503")) {
            return on_foreign_key();
        }
        // check_violation
        if db_err.code() == Some(Cow::Borrowed("23514")) {
            let message = match db_err.constraint() {
                Some("categories_not_self_parent") => "Category cannot be its own parent",
                _ => "Category name is required",
            };
            return CategoryError::Validation(message.to_string());
        }
    }

    CategoryError::Database(e)
}

#[async_trait]
impl CategoryStore for PgCategoryStore {
    async fn list_all(&self) -> CategoryResult<Vec<Category>> {
        let query = format!(
            "SELECT {} FROM categories ORDER BY {}",
            CATEGORY_COLUMNS, NAME_ORDER
        );
        let categories = sqlx::query_as::<_, Category>(&query).fetch_all(&self.pool).await?;
        Ok(categories)
    }

    async fn get(&self, id: CategoryId) -> CategoryResult<Category> {
        let query = format!("SELECT {} FROM categories WHERE id = $1", CATEGORY_COLUMNS);
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(CategoryError::NotFound(id))
    }

    async fn create(&self, new: NewCategory) -> CategoryResult<Category> {
        let mut tx = self.pool.begin().await?;
        lock_for_write(&mut tx).await?;

        let forest = load_forest(&mut tx).await?;
        let new = prepare_create(&forest, new)?;
        let parent_id = new.parent_id;

        let query = format!(
            r#"
            INSERT INTO categories (name, description, parent_id)
            VALUES ($1, $2, $3)
            RETURNING {}
            "#,
            CATEGORY_COLUMNS
        );
        let category = sqlx::query_as::<_, Category>(&query)
            .bind(&new.name)
            .bind(&new.description)
            .bind(new.parent_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                map_db_error(e, || {
                    CategoryError::ParentNotFound(parent_id.unwrap_or_default())
                })
            })?;

        tx.commit().await?;
        Ok(category)
    }

    async fn update(&self, id: CategoryId, changes: CategoryChanges) -> CategoryResult<Category> {
        let mut tx = self.pool.begin().await?;
        lock_for_write(&mut tx).await?;

        let forest = load_forest(&mut tx).await?;
        let updated = prepare_update(&forest, id, changes)?;
        let parent_id = updated.parent_id;

        let query = format!(
            r#"
            UPDATE categories
            SET name = $1,
                description = $2,
                parent_id = $3,
                updated_at = NOW()
            WHERE id = $4
            RETURNING {}
            "#,
            CATEGORY_COLUMNS
        );
        let category = sqlx::query_as::<_, Category>(&query)
            .bind(&updated.name)
            .bind(&updated.description)
            .bind(updated.parent_id)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| {
                map_db_error(e, || {
                    CategoryError::ParentNotFound(parent_id.unwrap_or_default())
                })
            })?
            .ok_or(CategoryError::NotFound(id))?;

        tx.commit().await?;
        Ok(category)
    }

    async fn delete(&self, id: CategoryId) -> CategoryResult<()> {
        let mut tx = self.pool.begin().await?;
        lock_for_write(&mut tx).await?;

        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;
        if !exists {
            return Err(CategoryError::NotFound(id));
        }

        let child_count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM categories WHERE parent_id = $1")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;
        authorize_delete(id, child_count)?;

        sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_db_error(e, || CategoryError::HasChildren(id)))?;

        tx.commit().await?;
        Ok(())
    }

    async fn count_children(&self, id: CategoryId) -> CategoryResult<i64> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM categories WHERE parent_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_order_ignores_locale_collation() {
        assert_eq!(NAME_ORDER, r#"name COLLATE "C" ASC, id ASC"#);
    }
}
