//! Category reads.
//!
//! Categories are curated in the CMS itself; the admin console only reads
//! them.

use eventdesk_core::cache::{categories_by_ids_key, categories_list_key, category_key};
use eventdesk_core::content::{demo_categories, Category, ResourceKind};
use eventdesk_core::normalize::normalize_category;

use super::context::ServiceContext;
use crate::error::Result;

const KIND: ResourceKind = ResourceKind::Category;

const ORDER: &str = "fields.title";

#[derive(Debug, Clone)]
pub struct CategoryService {
    ctx: ServiceContext,
}

impl CategoryService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Lists every category sorted by title.
    pub async fn list(&self) -> Result<Vec<Category>> {
        let key = categories_list_key();
        let query = self.ctx.query(KIND).with_order(ORDER);
        let result = self.ctx.list(&key, query, normalize_category).await;
        self.ctx
            .recover(&key, result.map(|listing| listing.items), || {
                let mut categories = demo_categories();
                categories.sort_by(|a, b| a.title.cmp(&b.title));
                Some(categories)
            })
    }

    pub async fn get(&self, id: &str) -> Result<Category> {
        let result = self.ctx.record(KIND, id, normalize_category).await;
        self.ctx.recover(&category_key(id), result, || {
            demo_categories().into_iter().find(|c| c.id == id)
        })
    }

    /// Gets the categories with the given ids, sorted by title. Unknown ids
    /// are skipped.
    pub async fn by_ids(&self, ids: &[String]) -> Result<Vec<Category>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let key = categories_by_ids_key(ids);
        let query = self
            .ctx
            .query(KIND)
            .with_ids(ids.iter().cloned())
            .with_order(ORDER);
        let result = self.ctx.list(&key, query, normalize_category).await;
        self.ctx
            .recover(&key, result.map(|listing| listing.items), || {
                let mut categories: Vec<Category> = demo_categories()
                    .into_iter()
                    .filter(|c| ids.contains(&c.id))
                    .collect();
                categories.sort_by(|a, b| a.title.cmp(&b.title));
                Some(categories)
            })
    }
}
