//! Sample hierarchy loaded into an empty store on first start.

use crate::features::categories::error::CategoryResult;
use crate::features::categories::models::{CategoryId, NewCategory};
use crate::features::categories::store::CategoryStore;

pub struct SeedCategory {
    pub name: &'static str,
    pub description: &'static str,
    pub children: &'static [SeedCategory],
}

pub const SEED_CATEGORIES: &[SeedCategory] = &[
    SeedCategory {
        name: "Food Items",
        description: "All food-related categories",
        children: &[
            SeedCategory {
                name: "Fruits",
                description: "Fresh fruits from around the world",
                children: &[
                    SeedCategory {
                        name: "Apples",
                        description: "Various types of apples: Gala, Fuji, Granny Smith, and more",
                        children: &[],
                    },
                    SeedCategory {
                        name: "Bananas",
                        description: "Yellow, sweet, and nutritious",
                        children: &[],
                    },
                ],
            },
            SeedCategory {
                name: "Vegetables",
                description: "Fresh and nutritious vegetables",
                children: &[],
            },
            SeedCategory {
                name: "Dairy",
                description: "Milk, cheese, and other dairy products",
                children: &[],
            },
        ],
    },
    SeedCategory {
        name: "Electronics Items",
        description: "All electronics-related categories",
        children: &[
            SeedCategory {
                name: "Computers",
                description: "Desktops, laptops, and accessories",
                children: &[
                    SeedCategory {
                        name: "Laptops",
                        description: "Portable computers for work and play",
                        children: &[],
                    },
                    SeedCategory {
                        name: "Gaming PCs",
                        description: "High-performance computers for gaming enthusiasts",
                        children: &[],
                    },
                ],
            },
            SeedCategory {
                name: "Smartphones",
                description: "Mobile phones and accessories",
                children: &[],
            },
            SeedCategory {
                name: "Televisions",
                description: "Smart TVs, OLED, LCD, and more",
                children: &[],
            },
        ],
    },
];

/// Insert `seeds` through the store, parents before children.
///
/// Returns the number of categories created.
pub async fn insert_seed(
    store: &dyn CategoryStore,
    seeds: &'static [SeedCategory],
) -> CategoryResult<usize> {
    let mut pending: Vec<(&SeedCategory, Option<CategoryId>)> =
        seeds.iter().rev().map(|s| (s, None)).collect();
    let mut created = 0;

    while let Some((seed, parent_id)) = pending.pop() {
        let category = store
            .create(NewCategory {
                name: seed.name.to_string(),
                parent_id,
                description: Some(seed.description.to_string()),
            })
            .await?;
        created += 1;

        pending.extend(seed.children.iter().rev().map(|c| (c, Some(category.id))));
    }

    Ok(created)
}
