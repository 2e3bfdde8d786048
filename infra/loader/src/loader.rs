use crate::definition::{CredentialsDefinition, DefinitionParser, DefinitionSource, Parsed};
use crate::error::{LoaderError, LoaderErrorExt, ParseError};
use crate::mode::ApplyMode;
use crate::report::ReconcileReport;
use accord_domain::config::LoaderConfig;
use accord_registry::{CredentialsRegistry, SharedCredentials};
use fxhash::{FxHashMap, FxHashSet};
use std::fmt;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tracing::{Instrument, debug, error, info, info_span, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Change {
    Added,
    Updated,
}

struct Pending<D> {
    change: Change,
    definition: D,
}

type Outcome = Result<Result<Parsed, ParseError>, JoinError>;

/// Placeholder for a builder part that has not been provided yet.
#[derive(Debug, Default, Clone, Copy)]
pub struct Missing;

/// Assembles a [`CredentialsLoader`]. `build` becomes available once the
/// source, the parser, and the registry are all set.
#[derive(Debug)]
pub struct LoaderBuilder<S = Missing, P = Missing, R = Missing> {
    source: S,
    parser: P,
    registry: R,
    mode: ApplyMode,
}

impl LoaderBuilder {
    #[must_use]
    pub const fn new() -> Self {
        Self { source: Missing, parser: Missing, registry: Missing, mode: ApplyMode::Sequential }
    }
}

impl Default for LoaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, P, R> LoaderBuilder<S, P, R> {
    pub fn source<S2: DefinitionSource>(self, source: S2) -> LoaderBuilder<S2, P, R> {
        LoaderBuilder { source, parser: self.parser, registry: self.registry, mode: self.mode }
    }

    pub fn parser<P2>(self, parser: P2) -> LoaderBuilder<S, P2, R> {
        LoaderBuilder { source: self.source, parser, registry: self.registry, mode: self.mode }
    }

    pub fn registry(self, registry: CredentialsRegistry) -> LoaderBuilder<S, P, CredentialsRegistry> {
        LoaderBuilder { source: self.source, parser: self.parser, registry, mode: self.mode }
    }

    #[must_use]
    pub fn apply_mode(mut self, mode: ApplyMode) -> Self {
        self.mode = mode;
        self
    }

    /// Takes the apply mode from the `[loader]` settings.
    #[must_use]
    pub fn config(self, config: &LoaderConfig) -> Self {
        self.apply_mode(ApplyMode::from(config))
    }
}

impl<S, P> LoaderBuilder<S, P, CredentialsRegistry>
where
    S: DefinitionSource,
    P: DefinitionParser<S::Definition>,
{
    #[must_use]
    pub fn build(self) -> CredentialsLoader<S, P> {
        CredentialsLoader {
            source: self.source,
            parser: Arc::new(self.parser),
            registry: self.registry,
            mode: self.mode,
            memory: FxHashMap::default(),
        }
    }
}

/// Keeps a [`CredentialsRegistry`] in step with a [`DefinitionSource`].
///
/// The loader remembers the last definition it successfully applied for each
/// name. A pass re-parses only definitions that are new or differ from that
/// memory, deletes registry entries whose names disappeared from the source,
/// and leaves everything else alone.
///
/// `reconcile` takes `&mut self`, so passes of one loader never overlap.
/// Registry readers are never blocked by a pass, though they may observe a
/// pass half way through.
pub struct CredentialsLoader<S: DefinitionSource, P> {
    source: S,
    parser: Arc<P>,
    registry: CredentialsRegistry,
    mode: ApplyMode,
    memory: FxHashMap<String, S::Definition>,
}

impl<S, P> CredentialsLoader<S, P>
where
    S: DefinitionSource,
    P: DefinitionParser<S::Definition>,
{
    /// Runs one reconciliation pass.
    ///
    /// # Errors
    /// [`LoaderError::Fetch`] if the source fails. In that case neither the
    /// registry nor the loader's memory has been modified.
    pub async fn reconcile(&mut self) -> Result<ReconcileReport, LoaderError> {
        let span = info_span!("reconcile", mode = %self.mode);
        self.reconcile_pass().instrument(span).await
    }

    async fn reconcile_pass(&mut self) -> Result<ReconcileReport, LoaderError> {
        let fetched = self.source.fetch_all().await.context("Fetching account definitions")?;
        let definitions = dedup_by_name(fetched);
        let names: FxHashSet<String> = definitions.iter().map(|d| d.name().to_owned()).collect();

        let mut report = ReconcileReport::default();
        self.remove_orphans(&names, &mut report);

        let mut pending = Vec::new();
        for definition in definitions {
            match self.memory.get(definition.name()) {
                Some(previous) if *previous == definition => {
                    report.unchanged.push(definition.name().to_owned());
                },
                Some(_) => pending.push(Pending { change: Change::Updated, definition }),
                None => pending.push(Pending { change: Change::Added, definition }),
            }
        }

        let outcomes = match self.mode {
            ApplyMode::Sequential => self.parse_sequential(pending).await,
            ApplyMode::Parallel { max_concurrency } => {
                self.parse_parallel(pending, max_concurrency).await
            },
        };

        let mut staged = Vec::new();
        for (pending, outcome) in outcomes {
            if let Some(credentials) = settle(&pending, outcome, &mut report) {
                self.memory.insert(pending.definition.name().to_owned(), pending.definition);
                staged.push((pending.change, credentials));
            }
        }

        for (change, credentials) in staged {
            let name = credentials.name().to_owned();
            self.registry.save(&name, credentials);
            match change {
                Change::Added => report.added.push(name),
                Change::Updated => report.updated.push(name),
            }
        }

        report.sort();
        info!(
            removed = report.removed.len(),
            added = report.added.len(),
            updated = report.updated.len(),
            unchanged = report.unchanged.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "Reconcile pass finished"
        );
        Ok(report)
    }

    /// Deletes every visible account whose name the source no longer lists.
    fn remove_orphans(&mut self, names: &FxHashSet<String>, report: &mut ReconcileReport) {
        for credentials in self.registry.enumerate_all() {
            let name = credentials.name();
            if names.contains(name) {
                continue;
            }
            self.memory.remove(name);
            if self.registry.delete(name).is_some() {
                debug!(account = name, "Removed orphaned account");
                report.removed.push(name.to_owned());
            }
        }
        // Also forget names whose credentials already left the registry some other way.
        self.memory.retain(|name, _| names.contains(name));
    }

    async fn parse_sequential(
        &self,
        pending: Vec<Pending<S::Definition>>,
    ) -> Vec<(Pending<S::Definition>, Outcome)> {
        let mut outcomes = Vec::with_capacity(pending.len());
        for item in pending {
            let task = parse_task(Arc::clone(&self.parser), item.definition.clone());
            let outcome = tokio::spawn(task).await;
            outcomes.push((item, outcome));
        }
        outcomes
    }

    async fn parse_parallel(
        &self,
        pending: Vec<Pending<S::Definition>>,
        max_concurrency: usize,
    ) -> Vec<(Pending<S::Definition>, Outcome)> {
        let semaphore = Arc::new(Semaphore::new(max_concurrency.max(1)));
        let mut tasks = JoinSet::new();
        let mut in_flight = FxHashMap::default();

        for item in pending {
            let semaphore = Arc::clone(&semaphore);
            let task = parse_task(Arc::clone(&self.parser), item.definition.clone());
            let handle = tasks.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return Err(ParseError::from("Worker pool closed"));
                };
                task.await
            });
            in_flight.insert(handle.id(), item);
        }

        let mut outcomes = Vec::with_capacity(in_flight.len());
        while let Some(joined) = tasks.join_next_with_id().await {
            let (id, outcome) = match joined {
                Ok((id, result)) => (id, Ok(result)),
                Err(e) => (e.id(), Err(e)),
            };
            if let Some(item) = in_flight.remove(&id) {
                outcomes.push((item, outcome));
            }
        }
        outcomes
    }

    /// Definitions applied so far, keyed by name.
    pub fn loaded(&self) -> impl Iterator<Item = &S::Definition> {
        self.memory.values()
    }

    #[must_use]
    pub fn is_loaded(&self, name: &str) -> bool {
        self.memory.contains_key(name)
    }

    #[must_use]
    pub fn loaded_definition(&self, name: &str) -> Option<&S::Definition> {
        self.memory.get(name)
    }

    #[must_use]
    pub const fn registry(&self) -> &CredentialsRegistry {
        &self.registry
    }

    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    #[must_use]
    pub const fn mode(&self) -> ApplyMode {
        self.mode
    }
}

impl<S: DefinitionSource, P> fmt::Debug for CredentialsLoader<S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut loaded: Vec<&str> = self.memory.keys().map(String::as_str).collect();
        loaded.sort_unstable();
        f.debug_struct("CredentialsLoader")
            .field("mode", &self.mode)
            .field("registry", &self.registry)
            .field("loaded", &loaded)
            .finish_non_exhaustive()
    }
}

fn parse_task<D, P>(
    parser: Arc<P>,
    definition: D,
) -> impl Future<Output = Result<Parsed, ParseError>> + Send + 'static
where
    D: CredentialsDefinition,
    P: DefinitionParser<D>,
{
    async move { parser.parse(&definition).await }
}

/// Logs the outcome of one parse and returns credentials ready to be saved.
fn settle<D: CredentialsDefinition>(
    pending: &Pending<D>,
    outcome: Outcome,
    report: &mut ReconcileReport,
) -> Option<SharedCredentials> {
    let name = pending.definition.name();
    match outcome {
        Ok(Ok(Parsed::Credentials(credentials))) if credentials.name() == name => {
            Some(credentials)
        },
        Ok(Ok(Parsed::Credentials(credentials))) => {
            warn!(
                account = name,
                produced = credentials.name(),
                "Parser produced credentials under another name; ignoring"
            );
            report.failed.push(name.to_owned());
            None
        },
        Ok(Ok(Parsed::Skip)) => {
            debug!(account = name, "Parser skipped definition");
            report.skipped.push(name.to_owned());
            None
        },
        Ok(Err(e)) => {
            warn!(account = name, error = %e, "Failed to parse account definition");
            report.failed.push(name.to_owned());
            None
        },
        Err(e) => {
            error!(account = name, error = %e, "Parse task did not complete");
            report.failed.push(name.to_owned());
            None
        },
    }
}

/// Keeps the first definition of each name.
fn dedup_by_name<D: CredentialsDefinition>(definitions: Vec<D>) -> Vec<D> {
    let mut seen = FxHashSet::default();
    let mut unique = Vec::with_capacity(definitions.len());
    for definition in definitions {
        if seen.insert(definition.name().to_owned()) {
            unique.push(definition);
        } else {
            warn!(account = definition.name(), "Duplicate definition name; keeping the first");
        }
    }
    unique
}
