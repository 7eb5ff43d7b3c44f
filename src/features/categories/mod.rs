//! Hierarchical categories.
//!
//! Categories form a forest through an optional `parent_id`. Reads assemble
//! the flat table into a tree; deactivating a category deactivates its whole
//! subtree; deleting a category moves its children up to its former parent.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/categories?tree=bool` | Flat list or nested tree |
//! | POST | `/api/categories` | Create a category |
//! | GET | `/api/categories/{id}` | Get a category |
//! | PUT | `/api/categories/{id}` | Rename and/or change status |
//! | DELETE | `/api/categories/{id}` | Delete, reparenting children |
//! | GET | `/api/categories/{id}/descendants` | Descendant ids |

pub mod cascade;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod stores;
pub mod tree;

pub use services::CategoryService;
pub use stores::{CategoryStore, InMemoryCategoryStore, PgCategoryStore};
