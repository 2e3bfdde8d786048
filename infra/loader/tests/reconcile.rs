mod fixtures;

use accord_loader::{CredentialsLoader, LoaderBuilder, LoaderError, ReconcileReport};
use accord_registry::{CredentialsRegistry, SharedCredentials, StaticFallback};
use fixtures::{
    Behavior, CountingParser, MemorySource, TestCredentials, TestDefinition, def, def_with,
    version_of,
};
use std::sync::Arc;

type Loader = CredentialsLoader<Arc<MemorySource>, Arc<CountingParser>>;

fn loader(
    definitions: Vec<TestDefinition>,
) -> (Loader, Arc<MemorySource>, Arc<CountingParser>, CredentialsRegistry) {
    let source = MemorySource::new(definitions);
    let parser = CountingParser::new();
    let registry = CredentialsRegistry::new();
    let loader = LoaderBuilder::new()
        .source(Arc::clone(&source))
        .parser(Arc::clone(&parser))
        .registry(registry.clone())
        .build();
    (loader, source, parser, registry)
}

#[tokio::test]
async fn first_pass_adds_every_definition() {
    let (mut loader, _, parser, registry) = loader(vec![def("a", 1), def("b", 1)]);

    let report = loader.reconcile().await.unwrap();

    assert_eq!(report.added, ["a", "b"]);
    assert_eq!(report.parsed(), 2);
    assert_eq!(parser.calls(), 2);
    assert_eq!(registry.names(), ["a", "b"]);
    assert!(loader.is_loaded("a") && loader.is_loaded("b"));
}

#[tokio::test]
async fn unchanged_source_is_not_parsed_again() {
    let (mut loader, _, parser, registry) = loader(vec![def("a", 1), def("b", 1)]);
    loader.reconcile().await.unwrap();
    let before: Vec<_> = registry.enumerate_all();
    parser.reset();

    let report = loader.reconcile().await.unwrap();

    assert_eq!(parser.calls(), 0);
    assert!(report.is_noop());
    assert_eq!(report.unchanged, ["a", "b"]);
    let after = registry.enumerate_all();
    assert_eq!(after.len(), before.len());
    for credentials in &before {
        let current = registry.lookup_optional(credentials.name()).unwrap();
        assert!(Arc::ptr_eq(&current, credentials));
    }
}

#[tokio::test]
async fn orphans_are_deleted_and_forgotten() {
    let (mut loader, source, _, registry) = loader(vec![def("a", 1), def("b", 1)]);
    loader.reconcile().await.unwrap();

    source.set(vec![def("a", 1)]);
    let report = loader.reconcile().await.unwrap();

    assert_eq!(report.removed, ["b"]);
    assert!(registry.lookup_optional("b").is_none());
    assert!(!loader.is_loaded("b"));
    assert!(loader.is_loaded("a"));
}

#[tokio::test]
async fn changed_definition_is_reparsed_once() {
    let (mut loader, source, parser, registry) = loader(vec![def("a", 1), def("c", 1)]);
    loader.reconcile().await.unwrap();
    parser.reset();

    source.set(vec![def("a", 1), def("c", 2)]);
    let report = loader.reconcile().await.unwrap();

    assert_eq!(parser.calls_for("c"), 1);
    assert_eq!(parser.calls(), 1);
    assert_eq!(report.updated, ["c"]);
    assert_eq!(version_of(&registry.lookup_required("c").unwrap()), 2);
    assert_eq!(loader.loaded_definition("c"), Some(&def("c", 2)));
}

#[tokio::test]
async fn skipped_definition_is_retried_every_pass() {
    let (mut loader, source, parser, registry) = loader(vec![def_with("d", 1, Behavior::Skip)]);

    let report = loader.reconcile().await.unwrap();
    assert_eq!(report.skipped, ["d"]);
    assert!(registry.lookup_optional("d").is_none());
    assert!(!loader.is_loaded("d"));

    loader.reconcile().await.unwrap();
    assert_eq!(parser.calls_for("d"), 2);

    source.set(vec![def("d", 1)]);
    let report = loader.reconcile().await.unwrap();
    assert_eq!(report.added, ["d"]);
    assert!(loader.is_loaded("d"));
}

#[tokio::test]
async fn skipping_a_change_keeps_the_stale_credentials() {
    let (mut loader, source, parser, registry) = loader(vec![def("e", 1)]);
    loader.reconcile().await.unwrap();

    source.set(vec![def_with("e", 2, Behavior::Skip)]);
    let report = loader.reconcile().await.unwrap();

    assert_eq!(report.skipped, ["e"]);
    assert_eq!(version_of(&registry.lookup_required("e").unwrap()), 1);
    assert_eq!(loader.loaded_definition("e"), Some(&def("e", 1)));

    loader.reconcile().await.unwrap();
    assert_eq!(parser.calls_for("e"), 3);
}

#[tokio::test]
async fn parse_failure_is_confined_to_its_definition() {
    let (mut loader, _, _, registry) =
        loader(vec![def("ok", 1), def_with("broken", 1, Behavior::Fail)]);

    let report = loader.reconcile().await.unwrap();

    assert_eq!(report.added, ["ok"]);
    assert_eq!(report.failed, ["broken"]);
    assert!(registry.contains("ok"));
    assert!(!registry.contains("broken"));
    assert!(!loader.is_loaded("broken"));
}

#[tokio::test]
async fn panicking_parser_is_confined_to_its_definition() {
    let (mut loader, _, parser, registry) =
        loader(vec![def("ok", 1), def_with("boom", 1, Behavior::Panic)]);

    let report = loader.reconcile().await.unwrap();
    assert_eq!(report.failed, ["boom"]);
    assert_eq!(registry.names(), ["ok"]);

    loader.reconcile().await.unwrap();
    assert_eq!(parser.calls_for("boom"), 2);
}

#[tokio::test]
async fn credentials_under_another_name_are_rejected() {
    let (mut loader, _, _, registry) = loader(vec![def_with("alias", 1, Behavior::Rename)]);

    let report = loader.reconcile().await.unwrap();

    assert_eq!(report.failed, ["alias"]);
    assert!(registry.is_empty());
    assert!(!loader.is_loaded("alias"));
}

#[tokio::test]
async fn fetch_failure_leaves_everything_untouched() {
    let (mut loader, source, parser, registry) = loader(vec![def("a", 1), def("b", 1)]);
    loader.reconcile().await.unwrap();
    parser.reset();

    source.set(vec![def("a", 2)]);
    source.set_failing(true);
    let err = loader.reconcile().await.unwrap_err();

    assert!(matches!(err, LoaderError::Fetch { context: Some(_), .. }));
    assert_eq!(parser.calls(), 0);
    assert_eq!(registry.names(), ["a", "b"]);
    assert_eq!(version_of(&registry.lookup_required("a").unwrap()), 1);
    assert_eq!(loader.loaded_definition("a"), Some(&def("a", 1)));
    assert!(loader.is_loaded("b"));

    source.set_failing(false);
    let report = loader.reconcile().await.unwrap();
    assert_eq!(report.removed, ["b"]);
    assert_eq!(report.updated, ["a"]);
}

#[tokio::test]
async fn fallback_accounts_survive_reconciliation() {
    let fallback = Arc::new(StaticFallback::new([Arc::new(TestCredentials {
        name: "provided".to_owned(),
        version: 7,
    }) as SharedCredentials]));
    let registry = CredentialsRegistry::with_fallback(fallback);
    let source = MemorySource::new(vec![def("a", 1)]);
    let mut loader = LoaderBuilder::new()
        .source(Arc::clone(&source))
        .parser(CountingParser::new())
        .registry(registry.clone())
        .build();

    let report = loader.reconcile().await.unwrap();

    assert!(report.removed.is_empty());
    assert_eq!(version_of(&registry.lookup_required("provided").unwrap()), 7);
}

#[tokio::test]
async fn unknown_writable_entries_are_treated_as_orphans() {
    let (mut loader, _, _, registry) = loader(vec![def("a", 1)]);
    registry.save(
        "manual",
        Arc::new(TestCredentials { name: "manual".to_owned(), version: 1 }),
    );

    let report = loader.reconcile().await.unwrap();

    assert_eq!(report.removed, ["manual"]);
    assert_eq!(registry.names(), ["a"]);
}

#[tokio::test]
async fn duplicate_names_keep_the_first_definition() {
    let (mut loader, _, parser, registry) = loader(vec![def("a", 1), def("a", 2)]);

    let report = loader.reconcile().await.unwrap();

    assert_eq!(
        report,
        ReconcileReport { added: vec!["a".to_owned()], ..ReconcileReport::default() }
    );
    assert_eq!(parser.calls(), 1);
    assert_eq!(version_of(&registry.lookup_required("a").unwrap()), 1);
}

#[tokio::test]
async fn externally_deleted_credentials_are_not_reapplied_while_unchanged() {
    let (mut loader, _, parser, registry) = loader(vec![def("a", 1)]);
    loader.reconcile().await.unwrap();
    registry.delete("a");
    parser.reset();

    let report = loader.reconcile().await.unwrap();

    assert_eq!(report.unchanged, ["a"]);
    assert_eq!(parser.calls(), 0);
    assert!(registry.lookup_optional("a").is_none());
}
