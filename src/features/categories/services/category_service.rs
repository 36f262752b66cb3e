use std::sync::Arc;

use crate::core::error::Result;
use crate::features::categories::dtos::{
    CategoryPathDto, CategoryResponseDto, CategoryTreeDto, CreateCategoryDto, UpdateCategoryDto,
};
use crate::features::categories::error::CategoryError;
use crate::features::categories::hierarchy::Forest;
use crate::features::categories::models::CategoryId;
use crate::features::categories::seed::{insert_seed, SEED_CATEGORIES};
use crate::features::categories::store::CategoryStore;

/// Service for category operations
pub struct CategoryService {
    store: Arc<dyn CategoryStore>,
}

impl CategoryService {
    pub fn new(store: Arc<dyn CategoryStore>) -> Self {
        Self { store }
    }

    /// List all categories (flat list, ordered by name)
    pub async fn list(&self) -> Result<Vec<CategoryResponseDto>> {
        let categories = self.store.list_all().await?;
        Ok(categories.into_iter().map(CategoryResponseDto::from).collect())
    }

    /// List all categories as tree structure
    pub async fn list_tree(&self) -> Result<Vec<CategoryTreeDto>> {
        let forest = self.store.snapshot().await?;
        Ok(CategoryTreeDto::build_tree(&forest))
    }

    pub async fn get(&self, id: CategoryId) -> Result<CategoryResponseDto> {
        let category = self.store.get(id).await?;
        Ok(category.into())
    }

    /// Category with its breadcrumb and whether it has subcategories
    pub async fn get_path(&self, id: CategoryId) -> Result<CategoryPathDto> {
        let forest = self.store.snapshot().await?;
        let category = forest.get(id).ok_or(CategoryError::NotFound(id))?;
        let breadcrumb = forest.breadcrumb(id);

        Ok(CategoryPathDto {
            id: category.id,
            name: category.name.clone(),
            path: breadcrumb.to_string(),
            ancestors: breadcrumb.into_names(),
            has_children: forest.count_children(id) > 0,
        })
    }

    /// Direct children of a category
    pub async fn list_children(&self, id: CategoryId) -> Result<Vec<CategoryResponseDto>> {
        let forest = self.existing_snapshot(id).await?;
        Ok(forest
            .children(id)
            .into_iter()
            .map(CategoryResponseDto::from)
            .collect())
    }

    /// Every category below a category, breadth-first
    pub async fn list_descendants(&self, id: CategoryId) -> Result<Vec<CategoryResponseDto>> {
        let forest = self.existing_snapshot(id).await?;
        Ok(forest
            .descendants(id)
            .into_iter()
            .map(CategoryResponseDto::from)
            .collect())
    }

    pub async fn create(&self, dto: CreateCategoryDto) -> Result<CategoryResponseDto> {
        let category = self.store.create(dto.into()).await?;

        tracing::info!(
            "Category created: id={}, parent_id={:?}",
            category.id,
            category.parent_id
        );

        Ok(category.into())
    }

    pub async fn update(
        &self,
        id: CategoryId,
        dto: UpdateCategoryDto,
    ) -> Result<CategoryResponseDto> {
        let category = self.store.update(id, dto.into()).await?;

        tracing::info!(
            "Category updated: id={}, parent_id={:?}",
            category.id,
            category.parent_id
        );

        Ok(category.into())
    }

    pub async fn delete(&self, id: CategoryId) -> Result<()> {
        self.store.delete(id).await?;
        tracing::info!("Category deleted: id={}", id);
        Ok(())
    }

    /// Load the sample hierarchy if the store holds no categories yet
    pub async fn seed_if_empty(&self) -> Result<usize> {
        let existing = self.store.list_all().await?;
        if !existing.is_empty() {
            return Ok(0);
        }

        let created = insert_seed(self.store.as_ref(), SEED_CATEGORIES).await?;
        tracing::info!("Seeded {} initial categories", created);
        Ok(created)
    }

    async fn existing_snapshot(&self, id: CategoryId) -> Result<Forest> {
        let forest = self.store.snapshot().await?;
        if !forest.contains(id) {
            return Err(CategoryError::NotFound(id).into());
        }
        Ok(forest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::AppError;
    use crate::features::categories::store::MemoryCategoryStore;

    fn service() -> CategoryService {
        CategoryService::new(Arc::new(MemoryCategoryStore::new()))
    }

    fn create_dto(name: &str, parent_id: Option<CategoryId>) -> CreateCategoryDto {
        CreateCategoryDto {
            name: name.to_string(),
            parent_id,
            description: None,
        }
    }

    #[tokio::test]
    async fn test_get_path_root_and_nested() {
        let service = service();
        let a = service.create(create_dto("A", None)).await.unwrap();
        let b = service.create(create_dto("B", Some(a.id))).await.unwrap();
        let c = service.create(create_dto("C", Some(b.id))).await.unwrap();

        let root = service.get_path(a.id).await.unwrap();
        assert!(root.ancestors.is_empty());
        assert_eq!(root.path, "Top Level");
        assert!(root.has_children);

        let leaf = service.get_path(c.id).await.unwrap();
        assert_eq!(leaf.ancestors, vec!["A", "B"]);
        assert_eq!(leaf.path, "A / B");
        assert!(!leaf.has_children);
    }

    #[tokio::test]
    async fn test_get_path_missing() {
        let err = service().get_path(404).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_seed_only_when_empty() {
        let service = service();
        assert_eq!(service.seed_if_empty().await.unwrap(), 12);
        assert_eq!(service.seed_if_empty().await.unwrap(), 0);
        assert_eq!(service.list().await.unwrap().len(), 12);
    }

    #[tokio::test]
    async fn test_children_and_descendants() {
        let service = service();
        service.seed_if_empty().await.unwrap();
        let food = service
            .list()
            .await
            .unwrap()
            .into_iter()
            .find(|c| c.name == "Food Items")
            .unwrap();

        let children: Vec<String> = service
            .list_children(food.id)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(children, vec!["Dairy", "Fruits", "Vegetables"]);

        let descendants = service.list_descendants(food.id).await.unwrap();
        assert_eq!(descendants.len(), 5);

        let err = service.list_children(9999).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
