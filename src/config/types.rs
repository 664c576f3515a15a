use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Meli-Scout
///
/// Every section is optional in the TOML file; missing keys take the
/// defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub browser: BrowserConfig,
    pub crawl: CrawlConfig,
    pub output: OutputConfig,
    pub selectors: SelectorConfig,
}

/// Which page engine drives the crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    /// Headless Chromium over the DevTools protocol
    Chrome,
    /// Plain HTTP fetches of server-rendered HTML
    Http,
}

/// Browser launch and timing configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BrowserConfig {
    pub engine: Engine,

    /// Run Chromium without a visible window
    pub headless: bool,

    /// Pass `--no-sandbox` to Chromium (containers)
    pub no_sandbox: bool,

    pub user_agent: String,

    /// Maximum time to launch the browser (milliseconds)
    pub launch_timeout_ms: u64,

    /// Maximum time for a page navigation (milliseconds)
    pub navigation_timeout_ms: u64,

    /// Maximum time to wait for an optional element to become visible (milliseconds)
    pub selector_timeout_ms: u64,

    /// Maximum time to wait for the next listing page's products (milliseconds)
    pub next_page_timeout_ms: u64,

    /// Resource blocking applied to listing pages
    pub block_images: bool,
    pub block_media: bool,
    pub block_fonts: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            engine: Engine::Chrome,
            headless: true,
            no_sandbox: false,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            launch_timeout_ms: 15_000,
            navigation_timeout_ms: 15_000,
            selector_timeout_ms: 8_000,
            next_page_timeout_ms: 5_000,
            block_images: true,
            block_media: true,
            block_fonts: true,
        }
    }
}

impl BrowserConfig {
    pub fn launch_timeout(&self) -> Duration {
        Duration::from_millis(self.launch_timeout_ms)
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    pub fn selector_timeout(&self) -> Duration {
        Duration::from_millis(self.selector_timeout_ms)
    }

    pub fn next_page_timeout(&self) -> Duration {
        Duration::from_millis(self.next_page_timeout_ms)
    }
}

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/139.0.0.0 Safari/537.36";

/// Crawl budget, politeness and URL pattern configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlConfig {
    /// Maximum number of product links collected from listing pages
    pub max_items: usize,

    /// Lower bound of the randomized delay between listing pages (milliseconds)
    pub min_delay_ms: u64,

    /// Upper bound of the randomized delay between listing pages (milliseconds)
    pub max_delay_ms: u64,

    /// Link prefixes of ad-click and redirect-tracking intermediaries
    pub link_denylist: Vec<String>,

    /// URL prefixes identifying product pages
    pub product_url_prefixes: Vec<String>,

    /// URL prefixes identifying listing pages
    pub listing_url_prefixes: Vec<String>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_items: 10,
            min_delay_ms: 1_000,
            max_delay_ms: 3_000,
            link_denylist: vec!["https://click1".to_string()],
            product_url_prefixes: vec![
                "https://www.mercadolibre".to_string(),
                "https://articulo.mercadolibre".to_string(),
                "https://mercadolibre".to_string(),
            ],
            listing_url_prefixes: vec!["https://listado.mercadolibre".to_string()],
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Directory CSV exports are written to
    pub csv_dir: String,

    /// Print the written CSV back as a table
    pub print_table: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_dir: "csv_files".to_string(),
            print_table: true,
        }
    }
}

const PRICE_BOX: &str = "#price > div > div.ui-pdp-price__main-container > div.ui-pdp-price__second-line > span > span";

/// CSS selectors used by the link collector and the page extractor
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SelectorConfig {
    pub product_links: String,
    pub next_page: String,
    pub title: String,
    pub price_whole: String,
    pub price_cents: String,
    pub reviews_container: String,

    /// Relative to `reviews_container`
    pub review_rating: String,

    /// Relative to `reviews_container`
    pub review_count: String,

    pub sold_subtitle: String,
    pub store_name: String,
    pub store_url: String,
    pub store_logo: String,
    pub description: String,
    pub images: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            product_links: ".ui-search-main--only-products div.poly-card__content > h3 > a"
                .to_string(),
            next_page: "li.andes-pagination__button.andes-pagination__button--next > a"
                .to_string(),
            title: "h1.ui-pdp-title".to_string(),
            price_whole: format!("{} .andes-money-amount__fraction", PRICE_BOX),
            price_cents: format!("{} .andes-money-amount__cents", PRICE_BOX),
            reviews_container: "div.ui-pdp-header__info > a".to_string(),
            review_rating: "span.ui-pdp-review__rating".to_string(),
            review_count: "span.ui-pdp-review__amount".to_string(),
            sold_subtitle: "div.ui-pdp-header__subtitle > span.ui-pdp-subtitle".to_string(),
            store_name: "div.ui-seller-data-header__title-container > h2".to_string(),
            store_url: "div.ui-seller-data-footer__container > a".to_string(),
            store_logo: "div.ui-seller-data__logo-image img".to_string(),
            description: "div.ui-pdp-description p.ui-pdp-description__content".to_string(),
            images: ".ui-pdp-gallery__figure__image".to_string(),
        }
    }
}

impl SelectorConfig {
    /// All selectors with their configuration key
    pub fn entries(&self) -> [(&'static str, &str); 14] {
        [
            ("product-links", &self.product_links),
            ("next-page", &self.next_page),
            ("title", &self.title),
            ("price-whole", &self.price_whole),
            ("price-cents", &self.price_cents),
            ("reviews-container", &self.reviews_container),
            ("review-rating", &self.review_rating),
            ("review-count", &self.review_count),
            ("sold-subtitle", &self.sold_subtitle),
            ("store-name", &self.store_name),
            ("store-url", &self.store_url),
            ("store-logo", &self.store_logo),
            ("description", &self.description),
            ("images", &self.images),
        ]
    }

    /// Review rating selector scoped to the reviews container
    pub fn scoped_review_rating(&self) -> String {
        format!("{} {}", self.reviews_container, self.review_rating)
    }

    /// Review count selector scoped to the reviews container
    pub fn scoped_review_count(&self) -> String {
        format!("{} {}", self.reviews_container, self.review_count)
    }
}
