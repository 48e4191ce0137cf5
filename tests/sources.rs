//! End-to-end adapter and aggregator tests against a local `wiremock`
//! server standing in for both sites.

use std::sync::Arc;
use std::time::Duration;

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mobile_search::{
    Aggregator, AppConfig, FilterCriteria, GsmArenaAdapter, Mobiles91Adapter, RateLimitedFetcher,
    Source, SourceAdapter,
};

fn shared_fetcher() -> Arc<RateLimitedFetcher> {
    Arc::new(RateLimitedFetcher::new("mobile-search-test/0.1", Duration::from_secs(5), Duration::ZERO).unwrap())
}

fn listing_91(server: &MockServer) -> String {
    format!(
        r#"<html><head><title>Search | 91mobiles</title></head><body>
        <div class="product-item">
          <a href="/oneplus-12-price-in-india"><img src="/img/op12.jpg"></a>
          <h3>OnePlus 12</h3><span class="price">₹64,999</span>
          <ul><li>Snapdragon 8 Gen 3</li><li>5400 mAh</li></ul>
        </div>
        <div class="product-item">
          <a href="{uri}/oneplus-12r-price-in-india"></a>
          <h3>OnePlus 12R</h3><span class="price">₹39,999</span>
        </div>
        <div class="product-item"><p>sponsored</p></div>
        </body></html>"#,
        uri = server.uri()
    )
}

const DETAIL_91: &str = r#"<html><body>
    <ul class="spec-list"><li>Display: 6.82 inch LTPO AMOLED</li><li>Weight: 220 g</li></ul>
    <div class="highlights"><p>Hasselblad tuned cameras</p><p>100W SUPERVOOC</p></div>
    <div class="summary">The OnePlus 12 is a flagship with a big battery.</div>
    </body></html>"#;

#[tokio::test]
async fn mobiles91_falls_through_templates_and_enriches_from_detail_pages() {
    let server = MockServer::start().await;

    // First template: hard 404.
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("stext", "OnePlus 12"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    // Second template: 200 but a not-found page.
    Mock::given(method("GET"))
        .and(path("/hub/mobiles/oneplus-12"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><title>Page Not Found</title></html>"))
        .expect(1)
        .mount(&server)
        .await;
    // Third template: real results.
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("search_text", "OnePlus 12"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_91(&server)))
        .expect(1)
        .mount(&server)
        .await;
    // Fourth template must never be reached.
    Mock::given(method("GET"))
        .and(path("/search/oneplus-12"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/oneplus-12-price-in-india"))
        .respond_with(ResponseTemplate::new(200).set_body_string(DETAIL_91))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/oneplus-12r-price-in-india"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let adapter = Mobiles91Adapter::new(shared_fetcher(), &server.uri(), 5).unwrap();
    let products = adapter.search("OnePlus 12").await.unwrap();

    assert_eq!(products.len(), 2, "nameless card must be dropped: {products:?}");

    let op12 = &products[0];
    assert_eq!(op12.name, "OnePlus 12");
    assert_eq!(op12.price, "₹64,999");
    assert_eq!(op12.source, Source::Mobiles91);
    assert_eq!(op12.image_url, Some(format!("{}/img/op12.jpg", server.uri())));
    assert_eq!(op12.specs, vec!["Snapdragon 8 Gen 3", "5400 mAh"]);
    assert_eq!(op12.detailed_specs, vec!["Display: 6.82 inch LTPO AMOLED", "Weight: 220 g"]);
    assert_eq!(op12.features, vec!["Hasselblad tuned cameras", "100W SUPERVOOC"]);
    assert_eq!(
        op12.summary.as_deref(),
        Some("The OnePlus 12 is a flagship with a big battery.")
    );

    let op12r = &products[1];
    assert_eq!(op12r.name, "OnePlus 12R");
    assert!(op12r.detailed_specs.is_empty());
    assert!(op12r.summary.is_none());
}

#[tokio::test]
async fn mobiles91_returns_empty_when_every_template_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(4)
        .mount(&server)
        .await;

    let adapter = Mobiles91Adapter::new(shared_fetcher(), &server.uri(), 5).unwrap();
    let products = adapter.search("nokia g42").await.unwrap();
    assert!(products.is_empty());
}

const RESULTS_GSM: &str = r#"<html><body><div class="makers"><ul>
    <li><a href="nokia_g42-12345.php"><img src="pics/g42.jpg"><strong><span>Nokia<br>G42</span></strong></a></li>
    <li><a href="oneplus_12-12725.php"><img src="pics/op12.jpg"><strong><span>OnePlus<br>12</span></strong></a></li>
    </ul></div></body></html>"#;

#[tokio::test]
async fn gsmarena_reads_quick_search_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/results.php3"))
        .and(query_param("sQuickSearch", "yes"))
        .and(query_param("sName", "nokia"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RESULTS_GSM))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/nokia_g42-12345.php"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<table><tr><td>OS</td><td>Android 13</td></tr></table>
               <meta name="description" content="Nokia G42 5G specs">"#,
        ))
        .mount(&server)
        .await;

    let adapter = GsmArenaAdapter::new(shared_fetcher(), &server.uri(), 1).unwrap();
    let products = adapter.search("nokia").await.unwrap();

    assert_eq!(products.len(), 1, "per-page cap is 1");
    let g42 = &products[0];
    assert_eq!(g42.name, "Nokia G42");
    assert_eq!(g42.price, "Check GSMArena for pricing");
    assert_eq!(g42.image_url, Some(format!("{}/pics/g42.jpg", server.uri())));
    assert_eq!(g42.specs, vec!["OS: Android 13"]);
    assert_eq!(g42.summary.as_deref(), Some("Nokia G42 5G specs"));
}

#[tokio::test]
async fn aggregator_merges_both_sites_and_survives_one_outage() {
    let site_91 = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&site_91)
        .await;

    let site_gsm = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/results.php3"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RESULTS_GSM))
        .mount(&site_gsm)
        .await;

    let mut config = AppConfig::default();
    config.request_delay_seconds = 0.0;
    config.request_timeout_seconds = 5;
    config.sources.mobiles91 = site_91.uri();
    config.sources.gsmarena = site_gsm.uri();

    let aggregator = Aggregator::from_config(&config).unwrap();

    let all = aggregator.aggregate("phone", None).await;
    let names: Vec<_> = all.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Nokia G42", "OnePlus 12"]);
    assert!(all.iter().all(|p| p.source == Source::GsmArena));

    let criteria = FilterCriteria::new().with_brand("oneplus");
    let filtered = aggregator.aggregate("phone", Some(&criteria)).await;
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].name, "OnePlus 12");
}
