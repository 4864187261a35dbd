//! Orchestration of a sitemap generation run.
//!
//! Fetches the catalog page by page with a bounded retry budget, renders the
//! XML, and races the whole pipeline against a global wall-clock deadline.
//! Every failure mode short of a filesystem error resolves to the fallback
//! document, so the surrounding site build never breaks on API trouble.

use std::fs;

use anyhow::{Context, Result};
use chrono::Utc;
use tokio::time::sleep;

use crate::api::{ApiError, ProductPage, ProductRecord, ProductsClient};
use crate::config::SitemapConfig;
use crate::sitemap;
use crate::ui::GenerationProgress;

/// Drives one generation run end to end.
pub struct SitemapGenerator {
    config: SitemapConfig,
    client: ProductsClient,
    progress: GenerationProgress,
}

impl SitemapGenerator {
    pub fn new(config: SitemapConfig, verbose: bool) -> Self {
        let client = ProductsClient::new(config.api_base_url.clone(), config.request_timeout());
        let progress = GenerationProgress::start(&config.output_path, verbose);
        Self {
            config,
            client,
            progress,
        }
    }

    /// Produce the sitemap and write it to the configured path.
    ///
    /// The fetch+render pipeline races the global deadline; whichever settles
    /// first supplies the document, and the single write below the race is
    /// the only place the file is touched. Only a filesystem error escapes.
    pub async fn run(&self) -> Result<()> {
        let xml = tokio::select! {
            xml = self.generate() => xml,
            _ = sleep(self.config.deadline()) => {
                self.progress.fallback("global deadline reached");
                sitemap::render_fallback(&self.config.site_url, Utc::now())
            }
        };

        let bytes = xml.len();
        match self.write(&xml) {
            Ok(()) => {
                self.progress.written(&self.config.output_path, bytes);
                Ok(())
            }
            Err(err) => {
                self.progress.write_failed(&err);
                Err(err)
            }
        }
    }

    /// Resolve the document for this run. Never fails: an unusable fetch
    /// result of any kind answers with the fallback sitemap.
    async fn generate(&self) -> String {
        let now = Utc::now();
        match self.fetch_all_products().await {
            Ok(products) if !products.is_empty() => {
                sitemap::render_products(&self.config.site_url, &products, now)
            }
            // Zero products is read as an upstream problem, not an empty
            // catalog. See DESIGN.md before changing this.
            Ok(_) => {
                self.progress.fallback("no products returned");
                sitemap::render_fallback(&self.config.site_url, now)
            }
            Err(err) => {
                self.progress.fallback(&format!("API error: {err}"));
                sitemap::render_fallback(&self.config.site_url, now)
            }
        }
    }

    /// Fetch every page of the catalog, strictly sequentially.
    ///
    /// All-or-nothing: a page that exhausts its retry budget aborts the whole
    /// fetch. Stops at the API-reported page count or the hard cap, whichever
    /// comes first; hitting the cap is not an error.
    async fn fetch_all_products(&self) -> Result<Vec<ProductRecord>, ApiError> {
        let mut products = Vec::new();
        let mut page = 0u32;
        let mut total_pages = 1u32;

        while page < total_pages && page < self.config.max_pages {
            let data = self.fetch_page_with_retry(page).await?;
            total_pages = data.effective_total_pages();
            self.progress.page_done(page, data.content.len());
            products.extend(data.content);
            page += 1;
        }

        Ok(products)
    }

    /// One page, up to `max_retries` total attempts with a fixed delay
    /// between them. Returns the last error once the budget is spent.
    async fn fetch_page_with_retry(&self, page: u32) -> Result<ProductPage, ApiError> {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            self.progress.attempt(page, attempt);
            match self.client.fetch_page(page, self.config.page_size).await {
                Ok(data) => return Ok(data),
                Err(err) if attempt < self.config.max_retries => {
                    self.progress.retry(
                        attempt,
                        self.config.max_retries,
                        &err.to_string(),
                        self.config.retry_delay_ms,
                    );
                    sleep(self.config.retry_delay()).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn write(&self, xml: &str) -> Result<()> {
        if let Some(dir) = self.config.output_path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }
        fs::write(&self.config.output_path, xml).with_context(|| {
            format!("failed to write {}", self.config.output_path.display())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    use serde_json::json;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SITE: &str = "https://shop.example";

    fn test_config(api_base_url: String, output_path: PathBuf) -> SitemapConfig {
        SitemapConfig {
            api_base_url,
            site_url: SITE.to_string(),
            output_path,
            page_size: 100,
            max_pages: 10,
            max_retries: 2,
            retry_delay_ms: 10,
            timeout_ms: 500,
            deadline_ms: 5_000,
        }
    }

    fn generator(server: &MockServer, output: PathBuf) -> SitemapGenerator {
        SitemapGenerator::new(test_config(server.uri(), output), false)
    }

    fn page_body(slugs: &[&str], total_pages: u32) -> serde_json::Value {
        json!({
            "content": slugs.iter().map(|s| json!({"slug": s, "active": true})).collect::<Vec<_>>(),
            "totalPages": total_pages
        })
    }

    #[tokio::test]
    async fn run_writes_product_sitemap() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/products"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(page_body(&["espresso-cup", "mocha-pot"], 1)),
            )
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let output = dir.path().join("public").join("sitemap-products.xml");
        generator(&server, output.clone()).run().await.unwrap();

        let xml = fs::read_to_string(&output).unwrap();
        assert!(xml.contains("<loc>https://shop.example/products/espresso-cup</loc>"));
        assert!(xml.contains("<loc>https://shop.example/products/mocha-pot</loc>"));
        assert!(xml.contains(sitemap::SITEMAP_NS));
        assert_eq!(xml.matches("<url>").count(), 2);
        assert_eq!(xml.matches("</url>").count(), 2);
    }

    #[tokio::test]
    async fn fetch_collects_pages_in_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/products"))
            .and(query_param("page", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&["first"], 2)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/products"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&["second"], 2)))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let output = dir.path().join("sitemap.xml");
        generator(&server, output.clone()).run().await.unwrap();

        let xml = fs::read_to_string(&output).unwrap();
        let first = xml.find("/products/first").unwrap();
        let second = xml.find("/products/second").unwrap();
        assert!(first < second);
    }

    #[tokio::test]
    async fn transient_failure_is_retried_then_succeeds() {
        let server = MockServer::start().await;
        // First attempt fails, the retry lands on the catch-all success mock.
        Mock::given(method("GET"))
            .and(path("/api/products"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(1)
            .with_priority(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&["survivor"], 1)))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let output = dir.path().join("sitemap.xml");
        generator(&server, output.clone()).run().await.unwrap();

        let xml = fs::read_to_string(&output).unwrap();
        assert!(xml.contains("/products/survivor"));
    }

    #[tokio::test]
    async fn retry_exhaustion_falls_back() {
        let server = MockServer::start().await;
        let mock = Mock::given(method("GET"))
            .and(path("/api/products"))
            .respond_with(ResponseTemplate::new(500))
            // max_retries = 2 total attempts, then the fetch gives up.
            .expect(2);
        mock.mount(&server).await;

        let dir = TempDir::new().unwrap();
        let output = dir.path().join("sitemap.xml");
        generator(&server, output.clone()).run().await.unwrap();

        let xml = fs::read_to_string(&output).unwrap();
        assert!(xml.contains("Fallback sitemap"));
        assert!(xml.contains("<loc>https://shop.example/products</loc>"));
        assert!(xml.contains("<changefreq>daily</changefreq>"));
        assert_eq!(xml.matches("<url>").count(), 1);
    }

    #[tokio::test]
    async fn zero_products_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&[], 1)))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let output = dir.path().join("sitemap.xml");
        generator(&server, output.clone()).run().await.unwrap();

        let xml = fs::read_to_string(&output).unwrap();
        // An empty successful fetch is not trusted as a real empty catalog.
        assert!(xml.contains("Fallback sitemap"));
        assert!(!xml.contains("<!-- Products: 0 -->"));
    }

    #[tokio::test]
    async fn malformed_page_falls_back_after_retries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/products"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let output = dir.path().join("sitemap.xml");
        generator(&server, output.clone()).run().await.unwrap();

        let xml = fs::read_to_string(&output).unwrap();
        assert!(xml.contains("Fallback sitemap"));
    }

    #[tokio::test]
    async fn pagination_stops_at_hard_cap() {
        let server = MockServer::start().await;
        // The API claims 50 pages; the loop must stop at 10 and keep what it has.
        Mock::given(method("GET"))
            .and(path("/api/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&["item"], 50)))
            .expect(10)
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let output = dir.path().join("sitemap.xml");
        generator(&server, output.clone()).run().await.unwrap();

        let xml = fs::read_to_string(&output).unwrap();
        assert_eq!(xml.matches("<url>").count(), 10);
        assert!(xml.contains("<!-- Products: 10 -->"));
    }

    #[tokio::test]
    async fn deadline_beats_slow_api_and_still_exits_cleanly() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/products"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(page_body(&["too-late"], 1))
                    .set_delay(Duration::from_millis(400)),
            )
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let output = dir.path().join("sitemap.xml");
        let mut config = test_config(server.uri(), output.clone());
        config.deadline_ms = 100;
        SitemapGenerator::new(config, false).run().await.unwrap();

        let xml = fs::read_to_string(&output).unwrap();
        assert!(xml.contains("Fallback sitemap"));
        assert!(!xml.contains("too-late"));
    }

    #[tokio::test]
    async fn unreachable_api_falls_back() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("sitemap.xml");
        // Nothing listens here; every attempt is a connection error.
        let mut config = test_config("http://127.0.0.1:9".to_string(), output.clone());
        config.retry_delay_ms = 1;
        SitemapGenerator::new(config, false).run().await.unwrap();

        let xml = fs::read_to_string(&output).unwrap();
        assert!(xml.contains("Fallback sitemap"));
    }

    #[tokio::test]
    async fn write_failure_is_the_one_fatal_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&["a"], 1)))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        // A regular file where a parent directory should be.
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();
        let output = blocker.join("nested").join("sitemap.xml");

        let result = generator(&server, output).run().await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn output_parent_directories_are_created() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&["a"], 1)))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let output = dir.path().join("deep").join("public").join("sitemap.xml");
        generator(&server, output.clone()).run().await.unwrap();
        assert!(output.exists());
    }
}
