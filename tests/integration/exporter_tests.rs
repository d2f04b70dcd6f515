//! Exporter integration tests
//!
//! Refresh against the in-memory platform, then scrape through the HTTP
//! routes the way Prometheus would.

#[cfg(test)]
mod tests {
    use crate::common::{ConfigFactory, FakePlatform};
    use actix_web::{App, test, web};
    use cf_applications_exporter::cf::PlatformApi;
    use cf_applications_exporter::server::{AppState, configure_routes};
    use cf_applications_exporter::{
        ApplicationsCollector, Exporter, Refresher, SnapshotStore,
    };
    use prometheus::{Encoder, Registry, TextEncoder};
    use std::sync::Arc;

    struct Harness {
        platform: Arc<FakePlatform>,
        refresher: Refresher,
        state: AppState,
    }

    fn harness(platform: FakePlatform) -> Harness {
        let config = ConfigFactory::with_api("https://api.sys.example.com");
        let platform = Arc::new(platform);
        let store = SnapshotStore::new();

        let registry = Registry::new();
        let collector =
            ApplicationsCollector::from_config(&config.exporter, store.clone()).unwrap();
        registry.register(Box::new(collector)).unwrap();

        let api: Arc<dyn PlatformApi> = platform.clone();
        let refresher = Refresher::from_config(api, store.clone(), &config.exporter);
        let state = AppState::new(config, registry, store);

        Harness {
            platform,
            refresher,
            state,
        }
    }

    async fn scrape(state: &AppState) -> String {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .configure(|cfg| configure_routes(cfg, "/metrics")),
        )
        .await;
        let req = test::TestRequest::get().uri("/metrics").to_request();
        let body = test::call_and_read_body(&app, req).await;
        String::from_utf8(body.to_vec()).unwrap()
    }

    /// Value of the single sample of `name` in an exposition
    fn value_of(exposition: &str, name: &str) -> f64 {
        exposition
            .lines()
            .find(|line| {
                line.starts_with(&format!("{}{{", name)) || line.starts_with(&format!("{} ", name))
            })
            .and_then(|line| line.rsplit_once(' '))
            .map(|(_, value)| value.parse().unwrap())
            .unwrap_or_else(|| panic!("{} not found", name))
    }

    fn series(exposition: &str, name: &str) -> Vec<String> {
        let mut found: Vec<String> = exposition
            .lines()
            .filter(|line| line.starts_with(&format!("{}{{", name)))
            .map(|line| line.to_string())
            .collect();
        found.sort();
        found
    }

    #[actix_web::test]
    async fn test_scrape_after_refresh() {
        let h = harness(FakePlatform::grid(2, 2, 3));
        h.refresher.refresh_once().await;

        let text = scrape(&h.state).await;

        assert_eq!(series(&text, "cf_application_info").len(), 12);
        assert_eq!(series(&text, "cf_application_instances").len(), 12);
        assert_eq!(series(&text, "cf_application_memory_mb").len(), 12);
        assert!(text.contains(r#"environment="test""#));
        assert!(text.contains(r#"deployment="cf-test""#));
        assert_eq!(value_of(&text, "cf_last_applications_scrape_error"), 0.0);
    }

    #[actix_web::test]
    async fn test_scrapes_never_reach_the_platform() {
        let h = harness(FakePlatform::grid(1, 1, 1));
        h.refresher.refresh_once().await;
        let calls = h.platform.summary_calls();

        scrape(&h.state).await;
        scrape(&h.state).await;

        assert_eq!(h.platform.summary_calls(), calls);
    }

    #[actix_web::test]
    async fn test_repeated_scrapes_of_one_snapshot() {
        let h = harness(FakePlatform::grid(1, 2, 2));
        h.refresher.refresh_once().await;

        let first = scrape(&h.state).await;
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        let second = scrape(&h.state).await;

        for name in [
            "cf_application_info",
            "cf_application_instances",
            "cf_application_instances_running",
            "cf_application_memory_mb",
            "cf_application_disk_quota_mb",
        ] {
            assert_eq!(series(&first, name), series(&second, name), "{}", name);
        }
        assert!(
            value_of(&second, "cf_applications_scrapes_total")
                > value_of(&first, "cf_applications_scrapes_total")
        );
        assert!(
            value_of(&second, "cf_last_applications_scrape_timestamp")
                > value_of(&first, "cf_last_applications_scrape_timestamp")
        );
    }

    #[actix_web::test]
    async fn test_removed_application_disappears() {
        let h = harness(FakePlatform::grid(1, 1, 2));
        h.refresher.refresh_once().await;
        assert!(scrape(&h.state).await.contains(r#"application_id="app-0-0-1""#));

        h.platform.remove_app("space-0-0", "app-0-0-1");
        h.refresher.refresh_once().await;

        let text = scrape(&h.state).await;
        assert!(!text.contains(r#"application_id="app-0-0-1""#));
        assert!(text.contains(r#"application_id="app-0-0-0""#));
    }

    #[actix_web::test]
    async fn test_refresh_error_shows_in_scrape() {
        let h = harness(FakePlatform::grid(1, 2, 1));
        h.platform.fail_summary("space-0-1");
        h.refresher.refresh_once().await;

        let first = scrape(&h.state).await;
        assert_eq!(value_of(&first, "cf_last_applications_scrape_error"), 1.0);
        assert_eq!(value_of(&first, "cf_applications_scrape_errors_total"), 1.0);
        assert_eq!(series(&first, "cf_application_info").len(), 1);

        h.platform.heal();
        h.refresher.refresh_once().await;

        let second = scrape(&h.state).await;
        assert_eq!(value_of(&second, "cf_last_applications_scrape_error"), 0.0);
        assert_eq!(value_of(&second, "cf_applications_scrape_errors_total"), 1.0);
        assert_eq!(series(&second, "cf_application_info").len(), 2);
    }

    #[actix_web::test]
    async fn test_health_follows_refresh() {
        let h = harness(FakePlatform::grid(1, 1, 4));
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(h.state.clone()))
                .configure(|cfg| configure_routes(cfg, "/metrics")),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "starting");

        h.refresher.refresh_once().await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["snapshot"]["applications"], 4);
    }

    #[::core::prelude::v1::test]
    fn test_exporter_assembles_registry() {
        let config = ConfigFactory::with_client("https://api.sys.example.com");
        let api: Arc<dyn PlatformApi> = Arc::new(FakePlatform::new());

        let exporter = Exporter::with_api(config, api).unwrap();
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&exporter.registry().gather(), &mut buffer)
            .unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert!(text.contains("# TYPE cf_applications_scrapes_total counter"));
        assert!(exporter.store().load().published_at().is_none());
        assert_eq!(exporter.config().exporter.namespace, "cf");
    }
}
