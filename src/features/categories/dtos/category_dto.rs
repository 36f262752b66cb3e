use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::categories::hierarchy::Forest;
use crate::features::categories::models::{Category, CategoryChanges, CategoryId, NewCategory};

/// Distinguish an absent field (`None`) from an explicit `null` (`Some(None)`)
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Response DTO for category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponseDto {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<i64>,
}

impl From<Category> for CategoryResponseDto {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
            description: c.description,
            parent_id: c.parent_id,
        }
    }
}

impl From<&Category> for CategoryResponseDto {
    fn from(c: &Category) -> Self {
        c.clone().into()
    }
}

/// Request DTO for creating a category
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryDto {
    #[validate(custom(function = "crate::shared::validation::category_name"))]
    pub name: String,

    pub parent_id: Option<i64>,

    pub description: Option<String>,
}

impl From<CreateCategoryDto> for NewCategory {
    fn from(dto: CreateCategoryDto) -> Self {
        Self {
            name: dto.name,
            parent_id: dto.parent_id,
            description: dto.description,
        }
    }
}

/// Request DTO for updating a category
///
/// `parentId` and `description` are optional: leaving one out keeps the
/// stored value, sending `null` clears it (a `null` parent makes the category
/// a root). The name is checked by the store once the category is known to
/// exist, so a missing id reports 404 before a bad name.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryDto {
    pub name: String,

    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<i64>)]
    pub parent_id: Option<Option<i64>>,

    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
}

impl From<UpdateCategoryDto> for CategoryChanges {
    fn from(dto: UpdateCategoryDto) -> Self {
        Self {
            name: Some(dto.name),
            parent_id: dto.parent_id,
            description: dto.description,
        }
    }
}

/// Category with its derived breadcrumb
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPathDto {
    pub id: i64,
    pub name: String,
    /// Ancestor names, root first, excluding this category
    pub ancestors: Vec<String>,
    /// Ancestors joined with " / ", or "Top Level" for a root
    pub path: String,
    pub has_children: bool,
}

/// Response DTO for category tree (hierarchical structure)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(no_recursion)]
pub struct CategoryTreeDto {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub children: Vec<CategoryTreeDto>,
}

impl CategoryTreeDto {
    /// Build the nested tree from a flat snapshot.
    ///
    /// Built bottom-up with an explicit stack so deep chains cannot exhaust
    /// the call stack. Categories that no root reaches (dangling or looping
    /// parent links) are left out.
    pub fn build_tree(forest: &Forest) -> Vec<CategoryTreeDto> {
        let index = forest.children_index();
        let roots = index.get(&None).cloned().unwrap_or_default();

        let mut built: HashMap<CategoryId, CategoryTreeDto> = HashMap::new();
        let mut stack: Vec<(&Category, bool)> = roots.iter().rev().map(|c| (*c, false)).collect();

        while let Some((category, expanded)) = stack.pop() {
            let children = index
                .get(&Some(category.id))
                .map(Vec::as_slice)
                .unwrap_or_default();

            if expanded {
                let nodes = children
                    .iter()
                    .filter_map(|child| built.remove(&child.id))
                    .collect();
                built.insert(category.id, Self::node(category, nodes));
            } else {
                stack.push((category, true));
                stack.extend(children.iter().rev().map(|c| (*c, false)));
            }
        }

        roots
            .iter()
            .filter_map(|root| built.remove(&root.id))
            .collect()
    }

    fn node(category: &Category, children: Vec<CategoryTreeDto>) -> CategoryTreeDto {
        CategoryTreeDto {
            id: category.id,
            name: category.name.clone(),
            description: category.description.clone(),
            children,
        }
    }
}
