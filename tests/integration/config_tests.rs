//! Configuration loading tests
//!
//! File, environment and flag layers combined the way the binary does it.

#[cfg(test)]
mod tests {
    use cf_applications_exporter::cli::Cli;
    use cf_applications_exporter::config::{Config, LogFormat};
    use cf_applications_exporter::ExporterError;
    use std::collections::HashMap;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    const EXAMPLE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/config/cf-exporter.yaml.example");

    fn yaml_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn cli(config: Option<PathBuf>) -> Cli {
        Cli {
            config,
            listen: None,
            log_level: None,
            dump_config: false,
        }
    }

    fn config_error(result: cf_applications_exporter::Result<Config>) -> String {
        match result {
            Err(ExporterError::Config(message)) => message,
            Err(other) => panic!("expected config error, got {:?}", other),
            Ok(_) => panic!("expected config error, got a valid config"),
        }
    }

    #[tokio::test]
    async fn test_example_config_is_valid() {
        let config = Config::from_file(EXAMPLE).await.unwrap();
        config.validate().unwrap();

        assert_eq!(config.server.port, 9193);
        assert_eq!(config.exporter.refresh_interval_secs, 300);
        assert!(config.cf.has_client_credentials());
        assert_eq!(config.logging.format, LogFormat::Text);
    }

    #[tokio::test]
    async fn test_env_fills_in_secrets() {
        let file = yaml_file(
            r#"
cf:
  api_url: "https://api.sys.example.com"
  username: "admin"
"#,
        );
        let vars: HashMap<&str, &str> = [("CF_EXPORTER_CF_PASSWORD", "from-env")]
            .into_iter()
            .collect();

        let config = cli(Some(file.path().to_path_buf()))
            .resolve_config(|key| vars.get(key).map(|v| v.to_string()))
            .await
            .unwrap();

        assert_eq!(config.cf.password.as_deref(), Some("from-env"));
    }

    #[tokio::test]
    async fn test_env_only_configuration() {
        let vars: HashMap<&str, &str> = [
            ("CF_EXPORTER_CF_API_URL", "https://api.sys.example.com"),
            ("CF_EXPORTER_CF_CLIENT_ID", "exporter"),
            ("CF_EXPORTER_CF_CLIENT_SECRET", "secret"),
            ("CF_EXPORTER_NAMESPACE", "paas"),
            ("CF_EXPORTER_ORG_CONCURRENCY", "4"),
        ]
        .into_iter()
        .collect();

        let config = cli(None)
            .resolve_config(|key| vars.get(key).map(|v| v.to_string()))
            .await
            .unwrap();

        assert_eq!(config.exporter.namespace, "paas");
        assert_eq!(config.exporter.org_concurrency, 4);
        assert_eq!(config.exporter.space_concurrency, 10);
    }

    #[tokio::test]
    async fn test_rejects_empty_namespace() {
        let file = yaml_file(
            r#"
exporter:
  namespace: ""
cf:
  api_url: "https://api.sys.example.com"
  client_id: "exporter"
  client_secret: "secret"
"#,
        );

        let message = config_error(cli(Some(file.path().to_path_buf())).resolve_config(|_| None).await);
        assert!(message.starts_with("Exporter config error"));
    }

    #[tokio::test]
    async fn test_rejects_zero_interval() {
        let file = yaml_file(
            r#"
exporter:
  refresh_interval_secs: 0
cf:
  api_url: "https://api.sys.example.com"
  client_id: "exporter"
  client_secret: "secret"
"#,
        );

        let message = config_error(cli(Some(file.path().to_path_buf())).resolve_config(|_| None).await);
        assert!(message.contains("Refresh interval"));
    }

    #[tokio::test]
    async fn test_rejects_missing_credentials() {
        let file = yaml_file(
            r#"
cf:
  api_url: "https://api.sys.example.com"
  username: "admin"
"#,
        );

        let message = config_error(cli(Some(file.path().to_path_buf())).resolve_config(|_| None).await);
        assert!(message.starts_with("Cloud Foundry config error"));
    }

    #[tokio::test]
    async fn test_rejects_relative_metrics_path() {
        let file = yaml_file(
            r#"
server:
  metrics_path: "metrics"
cf:
  api_url: "https://api.sys.example.com"
  client_id: "exporter"
  client_secret: "secret"
"#,
        );

        let message = config_error(cli(Some(file.path().to_path_buf())).resolve_config(|_| None).await);
        assert!(message.starts_with("Server config error"));
    }

    #[tokio::test]
    async fn test_rejects_non_http_api_url() {
        let vars: HashMap<&str, &str> = [
            ("CF_EXPORTER_CF_API_URL", "ftp://api.sys.example.com"),
            ("CF_EXPORTER_CF_USERNAME", "admin"),
            ("CF_EXPORTER_CF_PASSWORD", "secret"),
        ]
        .into_iter()
        .collect();

        let message = config_error(
            cli(None)
                .resolve_config(|key| vars.get(key).map(|v| v.to_string()))
                .await,
        );
        assert!(message.contains("scheme"));
    }

    #[tokio::test]
    async fn test_malformed_yaml() {
        let file = yaml_file("server: [not, a, map");

        let result = cli(Some(file.path().to_path_buf())).resolve_config(|_| None).await;
        assert!(matches!(result, Err(ExporterError::Yaml(_))));
    }
}
