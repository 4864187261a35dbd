//! Sitemap XML rendering.
//!
//! Pure functions from product records to sitemap-0.9 documents. The caller
//! supplies `now`, so output is fully determined by its inputs; the functions
//! never fail — an empty catalog renders as a document with zero entries.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::api::ProductRecord;

/// Namespace of the sitemaps.org 0.9 protocol.
pub const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

const PRODUCT_CHANGEFREQ: &str = "weekly";
const PRODUCT_PRIORITY: &str = "0.8";
const FALLBACK_CHANGEFREQ: &str = "daily";
const FALLBACK_PRIORITY: &str = "0.9";

/// Render the full product sitemap.
///
/// Records without a usable slug or explicitly deactivated are skipped.
/// `<lastmod>` is the date portion of the record's `updatedAt` when it parses
/// as RFC 3339, otherwise the date of `now`.
pub fn render_products(site_url: &str, products: &[ProductRecord], now: DateTime<Utc>) -> String {
    let today = now.format("%Y-%m-%d").to_string();

    let mut entries = String::new();
    let mut count = 0usize;
    for product in products.iter().filter(|p| p.is_listable()) {
        let slug = product.slug.as_deref().unwrap_or_default();
        let lastmod = last_modified(product, &today);
        entries.push_str("  <url>\n");
        entries.push_str(&format!(
            "    <loc>{}/products/{}</loc>\n",
            xml_escape(site_url),
            xml_escape(slug)
        ));
        entries.push_str(&format!("    <lastmod>{lastmod}</lastmod>\n"));
        entries.push_str(&format!(
            "    <changefreq>{PRODUCT_CHANGEFREQ}</changefreq>\n"
        ));
        entries.push_str(&format!("    <priority>{PRODUCT_PRIORITY}</priority>\n"));
        entries.push_str("  </url>\n");
        count += 1;
    }

    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str(&format!("<urlset xmlns=\"{SITEMAP_NS}\">\n"));
    out.push_str(&format!("  <!-- Generated: {} -->\n", timestamp(now)));
    out.push_str(&format!("  <!-- Products: {count} -->\n"));
    out.push_str(&entries);
    out.push_str("</urlset>\n");
    out
}

/// Render the minimal fallback sitemap: a single entry pointing at the
/// products listing page. Written whenever live data cannot be fetched.
pub fn render_fallback(site_url: &str, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str(&format!("<urlset xmlns=\"{SITEMAP_NS}\">\n"));
    out.push_str("  <!-- Fallback sitemap - API unavailable during build -->\n");
    out.push_str(&format!("  <!-- Generated: {} -->\n", timestamp(now)));
    out.push_str("  <url>\n");
    out.push_str(&format!(
        "    <loc>{}/products</loc>\n",
        xml_escape(site_url)
    ));
    out.push_str(&format!(
        "    <changefreq>{FALLBACK_CHANGEFREQ}</changefreq>\n"
    ));
    out.push_str(&format!("    <priority>{FALLBACK_PRIORITY}</priority>\n"));
    out.push_str("  </url>\n");
    out.push_str("</urlset>\n");
    out
}

fn last_modified(product: &ProductRecord, today: &str) -> String {
    product
        .updated_at
        .as_deref()
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|dt| dt.with_timezone(&Utc).format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| today.to_string())
}

fn timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn xml_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
