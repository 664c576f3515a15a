//! Integration tests for the scraper
//!
//! These tests use wiremock to serve a small marketplace and drive the full
//! listing → pagination → extraction → CSV cycle through the HTTP engine.

use meli_scout::browser::HttpSession;
use meli_scout::config::{Config, Engine};
use meli_scout::crawler::{Coordinator, StopReason};
use meli_scout::extract::ExtractError;
use meli_scout::output::{read_csv_rows, CsvExporter, RecordExporter, CSV_HEADERS};
use meli_scout::{CurrencyCode, ScoutError};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration for the HTTP engine with no politeness delay
fn create_test_config() -> Config {
    let mut config = Config::default();
    config.browser.engine = Engine::Http;
    config.browser.navigation_timeout_ms = 5_000;
    config.crawl.min_delay_ms = 0;
    config.crawl.max_delay_ms = 0;
    config
}

fn coordinator(config: Config) -> Coordinator<HttpSession> {
    let session = HttpSession::new(&config.browser).expect("Failed to build HTTP session");
    Coordinator::new(session, config)
}

fn listing_page(hrefs: &[&str], next: Option<&str>) -> String {
    let cards: String = hrefs
        .iter()
        .map(|href| {
            format!(
                r#"<li class="ui-search-layout__item"><div class="poly-card"><div class="poly-card__content"><h3><a href="{}">Producto</a></h3></div></div></li>"#,
                href
            )
        })
        .collect();
    let next = next
        .map(|href| {
            format!(
                r#"<ul class="andes-pagination"><li class="andes-pagination__button andes-pagination__button--next"><a href="{}">Siguiente</a></li></ul>"#,
                href
            )
        })
        .unwrap_or_default();
    format!(
        r#"<html><body><main class="ui-search-main--only-products"><ol>{}</ol>{}</main></body></html>"#,
        cards, next
    )
}

fn product_page(title: Option<&str>, whole: &str, cents: Option<&str>, reviews: bool) -> String {
    let title = title
        .map(|t| format!(r#"<h1 class="ui-pdp-title">{}</h1>"#, t))
        .unwrap_or_default();
    let cents = cents
        .map(|c| format!(r#"<span class="andes-money-amount__cents">{}</span>"#, c))
        .unwrap_or_default();
    let reviews = if reviews {
        r##"<div class="ui-pdp-header__info"><a href="#reviews"><span class="ui-pdp-review__rating">4.5</span><span class="ui-pdp-review__amount">(37)</span></a></div>"##
    } else {
        ""
    };
    format!(
        r#"<html><body>
        <div class="ui-pdp-header">
          <div class="ui-pdp-header__subtitle"><span class="ui-pdp-subtitle">Nuevo | +50 vendidos</span></div>
          {title}
          {reviews}
        </div>
        <div id="price"><div><div class="ui-pdp-price__main-container"><div class="ui-pdp-price__second-line"><span><span>
          <span class="andes-money-amount__fraction">{whole}</span>{cents}
        </span></span></div></div></div></div>
        <figure><img class="ui-pdp-gallery__figure__image" src="/img/1.webp"></figure>
        <figure><img class="ui-pdp-gallery__figure__image" src="/img/2.webp"></figure>
        <div class="ui-seller-data-header__title-container"><h2>Tienda Demo</h2></div>
        <div class="ui-seller-data-footer__container"><a href="https://tienda.mercadolibre.com.pe/demo?origin=pdp">Ver tienda</a></div>
        </body></html>"#,
        title = title,
        reviews = reviews,
        whole = whole,
        cents = cents
    )
}

async fn mount_html(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

async fn mount_first_listing_page(server: &MockServer) {
    mount_html(
        server,
        "/teclado",
        listing_page(
            &[
                "/MPE-1?tracking_id=abc",
                "https://click1.mercadolibre.com.pe/mclics/clicks/external/MPE/count?a=1",
                "/MPE-2#polycard",
                "/MPE-3",
            ],
            Some("/teclado_Desde_4"),
        ),
    )
    .await;
}

/// Product pages behind the listing; `/MPE-3` has no title
async fn mount_products(server: &MockServer) {
    mount_html(server, "/MPE-1", product_page(Some("Teclado Uno"), "1.299", Some("90"), true)).await;
    mount_html(server, "/MPE-2", product_page(Some("Teclado Dos"), "89", None, false)).await;
    mount_html(server, "/MPE-3", product_page(None, "100", None, true)).await;
    mount_html(server, "/MPE-4", product_page(Some("Teclado Cuatro"), "2,450", None, true)).await;
    mount_html(server, "/MPE-5", product_page(Some("Teclado Cinco"), "15", Some("50"), false)).await;
}

/// Mounts a two-page listing with seven product links (one duplicate, one ad)
/// and the product pages behind them
async fn mount_marketplace(server: &MockServer) {
    mount_first_listing_page(server).await;
    mount_html(
        server,
        "/teclado_Desde_4",
        listing_page(&["/MPE-4", "/MPE-1?pos=9", "/MPE-5"], None),
    )
    .await;
    mount_products(server).await;
}

#[tokio::test]
async fn test_listing_crawl_with_pagination() {
    let mock_server = MockServer::start().await;
    mount_marketplace(&mock_server).await;
    let listing_url = format!("{}/teclado", mock_server.uri());

    let coordinator = coordinator(create_test_config());
    let report = coordinator.scrape_listing(&listing_url, 10).await.unwrap();

    // 3 links on page 1 (ad skipped), 3 on page 2; /MPE-1 appears twice
    assert_eq!(report.stats.listing_pages, 2);
    assert_eq!(report.stats.links_collected, 6);
    assert_eq!(report.stats.unique_links, 5);
    assert_eq!(report.stats.stop_reason, StopReason::Exhausted);

    // /MPE-3 has no title and is skipped
    assert_eq!(report.stats.products_extracted, 4);
    assert_eq!(report.stats.products_failed, 1);

    let titles: Vec<&str> = report.records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["Teclado Uno", "Teclado Dos", "Teclado Cuatro", "Teclado Cinco"]
    );

    let first = &report.records[0];
    assert_eq!(first.url, format!("{}/MPE-1", mock_server.uri()));
    assert_eq!(first.price.amount_cents, 129_990);
    assert_eq!(first.price.currency, CurrencyCode::Unknown);
    assert_eq!(first.review_count, Some(37));
    assert_eq!(first.rating, Some(4.5));
    assert_eq!(first.sold_at_least, Some(50));
    assert_eq!(
        first.image_urls,
        vec![
            format!("{}/img/1.webp", mock_server.uri()),
            format!("{}/img/2.webp", mock_server.uri()),
        ]
    );
    assert_eq!(first.store.name, "Tienda Demo");
    assert_eq!(first.store.url, "https://tienda.mercadolibre.com.pe/demo");

    let second = &report.records[1];
    assert_eq!(second.price.amount_cents, 8_900);
    assert_eq!(second.review_count, None);
    assert_eq!(second.sold_at_least, None);

    assert_eq!(report.records[2].price.amount_cents, 245_000);

    coordinator.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_listing_crawl_stops_at_target() {
    let mock_server = MockServer::start().await;
    mount_first_listing_page(&mock_server).await;
    mount_products(&mock_server).await;

    // The second listing page must never be requested
    Mock::given(method("GET"))
        .and(path("/teclado_Desde_4"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .named("second listing page")
        .mount(&mock_server)
        .await;

    let listing_url = format!("{}/teclado", mock_server.uri());
    let coordinator = coordinator(create_test_config());
    let report = coordinator.scrape_listing(&listing_url, 2).await.unwrap();

    assert_eq!(report.stats.links_collected, 2);
    assert_eq!(report.stats.listing_pages, 1);
    assert_eq!(report.stats.stop_reason, StopReason::TargetReached);
    assert_eq!(report.records.len(), 2);
}

#[tokio::test]
async fn test_listing_to_csv() {
    let mock_server = MockServer::start().await;
    mount_marketplace(&mock_server).await;
    let listing_url = format!("{}/teclado", mock_server.uri());
    let output_dir = TempDir::new().unwrap();

    let coordinator = coordinator(create_test_config());
    let report = coordinator.scrape_listing(&listing_url, 10).await.unwrap();

    let exporter = CsvExporter::new(output_dir.path().join("csv_files"));
    let csv_path = exporter.export(&report.records, "teclado").unwrap();

    let rows = read_csv_rows(&csv_path).unwrap();
    assert_eq!(rows.len(), report.records.len() + 1);
    assert_eq!(rows[0], CSV_HEADERS.iter().map(|h| h.to_string()).collect::<Vec<_>>());

    // Teclado Dos has no reviews region
    let dos = rows.iter().find(|row| row[0] == "Teclado Dos").unwrap();
    assert_eq!(dos[1], "8900");
    assert_eq!(dos[4], "");
    assert_eq!(dos[5], "");
    assert_eq!(dos[7], "");
    assert_eq!(dos[9], "2");

    let uno = rows.iter().find(|row| row[0] == "Teclado Uno").unwrap();
    assert_eq!(uno[4], "37");
    assert_eq!(uno[5], "4.50");
    assert_eq!(uno[7], "50");
}

#[tokio::test]
async fn test_unavailable_listing_yields_no_records() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/teclado"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;
    let listing_url = format!("{}/teclado", mock_server.uri());

    let coordinator = coordinator(create_test_config());
    let report = coordinator.scrape_listing(&listing_url, 5).await.unwrap();

    assert!(report.records.is_empty());
    assert_eq!(report.stats.listing_pages, 0);
    assert!(matches!(
        report.stats.stop_reason,
        StopReason::ListingUnavailable(_)
    ));
}

#[tokio::test]
async fn test_single_product() {
    let mock_server = MockServer::start().await;
    mount_marketplace(&mock_server).await;

    let coordinator = coordinator(create_test_config());
    let record = coordinator
        .scrape_product(&format!("{}/MPE-5?matt_tool=1#reviews", mock_server.uri()))
        .await
        .unwrap();

    assert_eq!(record.title, "Teclado Cinco");
    assert_eq!(record.url, format!("{}/MPE-5", mock_server.uri()));
    assert_eq!(record.price.amount_cents, 1_550);
}

#[tokio::test]
async fn test_product_without_title_is_rejected() {
    let mock_server = MockServer::start().await;
    mount_marketplace(&mock_server).await;

    let coordinator = coordinator(create_test_config());
    let result = coordinator
        .scrape_product(&format!("{}/MPE-3", mock_server.uri()))
        .await;

    assert!(matches!(
        result,
        Err(ScoutError::Extract(ExtractError::MissingTitle(_)))
    ));
}

#[tokio::test]
async fn test_missing_product_page() {
    let mock_server = MockServer::start().await;

    let coordinator = coordinator(create_test_config());
    let result = coordinator
        .scrape_product(&format!("{}/MPE-404", mock_server.uri()))
        .await;

    assert!(matches!(
        result,
        Err(ScoutError::Extract(ExtractError::Navigation(_)))
    ));
}

#[tokio::test]
async fn test_product_images_only() {
    let mock_server = MockServer::start().await;
    mount_marketplace(&mock_server).await;

    let coordinator = coordinator(create_test_config());
    let images = coordinator
        .scrape_product_images(&format!("{}/MPE-2", mock_server.uri()))
        .await
        .unwrap();

    assert_eq!(
        images,
        vec![
            format!("{}/img/1.webp", mock_server.uri()),
            format!("{}/img/2.webp", mock_server.uri()),
        ]
    );
}
