//! Data types for the public products API.
//!
//! The API is treated as untrusted: every field is optional with a serde
//! default, and unknown fields are ignored, so that a page either decodes as
//! a whole or fails as a whole.

use serde::{Deserialize, Serialize};

/// One product as returned by `GET /api/products`.
///
/// Only the fields the sitemap cares about are decoded; the API returns many
/// more (name, price, variants) which serde skips.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRecord {
    /// URL slug of the product page. Products without a slug have no page
    /// to point a crawler at.
    #[serde(default)]
    pub slug: Option<String>,
    /// Whether the product is visible in the catalog. Absent means active.
    #[serde(default)]
    pub active: Option<bool>,
    /// Last modification timestamp, RFC 3339. Kept as a raw string and
    /// parsed leniently at render time.
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<String>,
}

impl ProductRecord {
    /// A record makes it into the sitemap iff it has a non-empty slug and is
    /// not explicitly deactivated.
    pub fn is_listable(&self) -> bool {
        self.slug.as_deref().is_some_and(|s| !s.is_empty()) && self.active != Some(false)
    }
}

/// One page of the paginated products listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductPage {
    /// Records on this page, in API order.
    #[serde(default)]
    pub content: Vec<ProductRecord>,
    /// Total page count as reported by the API.
    #[serde(rename = "totalPages", default)]
    pub total_pages: Option<u32>,
}

impl ProductPage {
    /// Page count to drive the fetch loop with. The API occasionally reports
    /// zero or omits the field; both count as a single page.
    pub fn effective_total_pages(&self) -> u32 {
        self.total_pages.filter(|&t| t > 0).unwrap_or(1)
    }
}
