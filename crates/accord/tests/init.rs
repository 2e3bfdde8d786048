use accord::config::AccordConfig;
use accord::kernel::config::load_config;
use accord::loader::ApplyMode;
use accord::registry::{AccountCredentials, AccountType, AccountTypes, SharedCredentials, StaticFallback};
use std::any::Any;
use std::fs;
use std::sync::Arc;
use tempfile::tempdir;

const CONFIG: &str = r#"
[loader]
parallel = true
max_concurrency = 4
interval_seconds = 15

[logging]
level = "debug"

[[prometheus.accounts]]
name = "prod"
endpoint = "https://prometheus.example.com"
username = "reader"
password = "secret"
supported_types = ["METRICS_STORE"]
"#;

#[derive(Debug)]
struct Provisioned;

impl AccountCredentials for Provisioned {
    fn name(&self) -> &str {
        "provisioned"
    }

    fn provider(&self) -> &str {
        "external"
    }

    fn supported_types(&self) -> AccountTypes {
        AccountTypes::OBJECT_STORE
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[test]
fn configuration_file_deserializes() {
    let tmp = tempdir().unwrap();
    let file = tmp.path().join("accord.toml");
    fs::write(&file, CONFIG).unwrap();

    let config: AccordConfig = load_config(Some(&file)).unwrap();

    assert!(config.loader.parallel);
    assert_eq!(config.loader.interval_seconds, 15);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.prometheus.accounts.len(), 1);
    assert!(config.prometheus.accounts[0].supported_types.contains_type(AccountType::MetricsStore));
}

#[tokio::test]
async fn init_wires_registry_loader_and_fallback() {
    let tmp = tempdir().unwrap();
    let file = tmp.path().join("accord.toml");
    fs::write(&file, CONFIG).unwrap();
    let config: AccordConfig = load_config(Some(&file)).unwrap();
    let fallback = Arc::new(StaticFallback::new([Arc::new(Provisioned) as SharedCredentials]));

    let mut accord = accord::init(Some(file), &config, fallback);
    assert_eq!(accord.loader.mode(), ApplyMode::Parallel { max_concurrency: 4 });

    let report = accord.loader.reconcile().await.unwrap();

    assert_eq!(report.added, ["prod"]);
    assert!(report.removed.is_empty());
    let prod = accord.registry.lookup_required_by_name_or_type(None, AccountType::MetricsStore).unwrap();
    assert_eq!(prod.provider(), accord::prometheus::PROVIDER);
    assert_eq!(accord.registry.lookup_one_of_type(AccountType::ObjectStore).unwrap().name(), "provisioned");
}
