//! Hierarchical categories.
//!
//! Categories form a forest through a nullable `parent_id`. The feature
//! guards three invariants on every write: a parent must exist, no category
//! may become its own ancestor, and a category with subcategories cannot be
//! deleted.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/categories` | List all categories |
//! | POST | `/categories` | Create a category |
//! | GET | `/categories/tree` | Nested category tree |
//! | GET | `/categories/{id}` | Get category by id |
//! | PUT | `/categories/{id}` | Update a category |
//! | DELETE | `/categories/{id}` | Delete a category without subcategories |
//! | GET | `/categories/{id}/path` | Breadcrumb of a category |
//! | GET | `/categories/{id}/children` | Direct subcategories |
//! | GET | `/categories/{id}/descendants` | All subcategories, breadth-first |

pub mod dtos;
pub mod error;
pub mod handlers;
pub mod hierarchy;
pub mod models;
pub mod routes;
pub mod seed;
pub mod services;
pub mod store;

pub use error::{CategoryError, CycleKind};
pub use services::CategoryService;
pub use store::{CategoryStore, MemoryCategoryStore, PgCategoryStore};
