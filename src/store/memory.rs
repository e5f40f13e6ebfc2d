//! In-memory store for tests and seeded development environments.

use super::{BlogPost, ContentStore, FaqEntry, HolidayPackage, TourProduct};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;

#[derive(Default)]
pub struct MemoryStore {
    packages: Vec<HolidayPackage>,
    products: HashMap<String, Vec<TourProduct>>,
    posts: Vec<BlogPost>,
    faqs: Vec<FaqEntry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_packages(mut self, packages: Vec<HolidayPackage>) -> Self {
        self.packages = packages;
        self
    }

    pub fn with_products(mut self, currency: &str, products: Vec<TourProduct>) -> Self {
        self.products.insert(currency.to_lowercase(), products);
        self
    }

    pub fn with_posts(mut self, posts: Vec<BlogPost>) -> Self {
        self.posts = posts;
        self
    }

    pub fn with_faqs(mut self, faqs: Vec<FaqEntry>) -> Self {
        self.faqs = faqs;
        self
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn cached_product(
        &self,
        id: &str,
        currency: &str,
    ) -> Result<Option<TourProduct>> {
        Ok(self
            .products
            .get(&currency.to_lowercase())
            .and_then(|snapshot| snapshot.iter().find(|p| p.id == id))
            .cloned())
    }

    async fn cached_products(&self, currency: &str) -> Result<Vec<TourProduct>> {
        Ok(self
            .products
            .get(&currency.to_lowercase())
            .cloned()
            .unwrap_or_default())
    }

    async fn all_packages(&self) -> Result<Vec<HolidayPackage>> {
        Ok(self.packages.clone())
    }

    async fn package_by_slug(&self, slug: &str) -> Result<Option<HolidayPackage>> {
        Ok(self.packages.iter().find(|p| p.slug == slug).cloned())
    }

    async fn published_posts(&self) -> Result<Vec<BlogPost>> {
        let mut posts: Vec<BlogPost> =
            self.posts.iter().filter(|p| p.published).cloned().collect();
        posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        Ok(posts)
    }

    async fn post_by_slug(&self, slug: &str) -> Result<Option<BlogPost>> {
        Ok(self.posts.iter().find(|p| p.slug == slug).cloned())
    }

    async fn published_faqs(&self) -> Result<Vec<FaqEntry>> {
        let mut faqs: Vec<FaqEntry> =
            self.faqs.iter().filter(|f| f.published).cloned().collect();
        faqs.sort_by_key(|f| f.display_order.unwrap_or(u32::MAX));
        Ok(faqs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_snapshots_are_isolated() {
        let store = MemoryStore::new().with_products(
            "GBP",
            vec![TourProduct {
                id: "T-7".to_string(),
                name: "Harbour Cruise".to_string(),
                ..Default::default()
            }],
        );
        tokio_test::block_on(async {
            assert!(store.cached_product("T-7", "gbp").await.unwrap().is_some());
            assert!(store.cached_product("T-7", "USD").await.unwrap().is_none());
            assert!(store.cached_products("USD").await.unwrap().is_empty());
        });
    }

    #[test]
    fn test_faqs_sorted_with_unordered_last() {
        let faq = |q: &str, order: Option<u32>| FaqEntry {
            question: q.to_string(),
            answer: "See details.".to_string(),
            display_order: order,
            published: true,
        };
        let store = MemoryStore::new().with_faqs(vec![
            faq("later", None),
            faq("second", Some(2)),
            faq("first", Some(1)),
        ]);
        tokio_test::block_on(async {
            let faqs = store.published_faqs().await.unwrap();
            let questions: Vec<&str> = faqs.iter().map(|f| f.question.as_str()).collect();
            assert_eq!(questions, ["first", "second", "later"]);
        });
    }
}
