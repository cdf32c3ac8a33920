use pretty_assertions::assert_eq;
use sentiment_service::config::{self, DevicePreference};

const SAMPLE_CONFIG_YAML: &str = r#"
server:
  host: "127.0.0.1"
  port: 9000
  static_dir: "/srv/static"
  templates_dir: "/srv/templates"
  logs:
    level: "debug"

model:
  repo_id: "distilbert/distilbert-base-uncased-finetuned-sst-2-english"
  cache_dir: "/var/cache/sentiment"
  device: "cuda"
  cuda_ordinal: 1
  max_length: 256
"#;

const INVALID_CONFIG_YAML: &str = r#"
server:
  port: "not-a-number"
"#;

#[test]
fn test_full_config() {
    let config = config::parse(SAMPLE_CONFIG_YAML).unwrap();

    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 9000);
    assert_eq!(config.server.static_dir, "/srv/static");
    assert_eq!(config.server.templates_dir, "/srv/templates");
    assert_eq!(config.server.logs.level, "debug");
    assert_eq!(config.model.cache_dir, "/var/cache/sentiment");
    assert_eq!(config.model.device, DevicePreference::Cuda);
    assert_eq!(config.model.cuda_ordinal, 1);
    assert_eq!(config.model.max_length, 256);
}

#[test]
fn test_invalid_config() {
    assert!(config::parse(INVALID_CONFIG_YAML).is_err());
}

#[test]
fn test_example_config_matches_defaults() {
    let example = std::fs::read_to_string(
        std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("config.example.yaml"),
    )
    .unwrap();
    let parsed = config::parse(&example).unwrap();
    let defaults = config::Config::default();

    assert_eq!(parsed.server.host, defaults.server.host);
    assert_eq!(parsed.server.port, defaults.server.port);
    assert_eq!(parsed.model.repo_id, defaults.model.repo_id);
    assert_eq!(parsed.model.cache_dir, defaults.model.cache_dir);
    assert_eq!(parsed.model.device, defaults.model.device);
    assert_eq!(parsed.model.max_length, defaults.model.max_length);
}

#[tokio::test]
async fn test_explicit_missing_config_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("missing.yaml");

    let err = config::load_from(Some(path.to_string_lossy().to_string()))
        .await
        .unwrap_err();

    assert!(matches!(err, sentiment_service::Error::Config(_)));
    assert!(err.to_string().contains("missing.yaml"));
}

#[tokio::test]
async fn test_explicit_config_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("config.yaml");
    tokio::fs::write(&path, SAMPLE_CONFIG_YAML).await.unwrap();

    let config = config::load_from(Some(path.to_string_lossy().to_string()))
        .await
        .unwrap();

    assert_eq!(config.server.port, 9000);
    assert_eq!(config.model.device, DevicePreference::Cuda);
}
