#![allow(dead_code)]

use accord_loader::{
    CredentialsDefinition, DefinitionParser, DefinitionSource, ParseError, Parsed, SourceError,
};
use accord_registry::{AccountCredentials, AccountTypes, SharedCredentials};
use parking_lot::Mutex;
use std::any::Any;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

/// What the test parser does with a definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    Build,
    Skip,
    Fail,
    Panic,
    /// Builds credentials under a different name than the definition's.
    Rename,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestDefinition {
    pub name: String,
    pub version: u32,
    pub behavior: Behavior,
}

impl CredentialsDefinition for TestDefinition {
    fn name(&self) -> &str {
        &self.name
    }
}

pub fn def(name: &str, version: u32) -> TestDefinition {
    TestDefinition { name: name.to_owned(), version, behavior: Behavior::Build }
}

pub fn def_with(name: &str, version: u32, behavior: Behavior) -> TestDefinition {
    TestDefinition { name: name.to_owned(), version, behavior }
}

#[derive(Debug)]
pub struct TestCredentials {
    pub name: String,
    pub version: u32,
}

impl AccountCredentials for TestCredentials {
    fn name(&self) -> &str {
        &self.name
    }

    fn provider(&self) -> &str {
        "test"
    }

    fn supported_types(&self) -> AccountTypes {
        AccountTypes::METRICS_STORE
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub fn version_of(credentials: &SharedCredentials) -> u32 {
    credentials.as_any().downcast_ref::<TestCredentials>().map_or(0, |c| c.version)
}

#[derive(Debug, Default)]
pub struct MemorySource {
    definitions: Mutex<Vec<TestDefinition>>,
    failing: AtomicBool,
}

impl MemorySource {
    pub fn new(definitions: Vec<TestDefinition>) -> Arc<Self> {
        Arc::new(Self { definitions: Mutex::new(definitions), failing: AtomicBool::new(false) })
    }

    pub fn set(&self, definitions: Vec<TestDefinition>) {
        *self.definitions.lock() = definitions;
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl DefinitionSource for MemorySource {
    type Definition = TestDefinition;

    fn fetch_all(&self) -> impl Future<Output = Result<Vec<TestDefinition>, SourceError>> + Send {
        let result = if self.failing.load(Ordering::SeqCst) {
            Err(SourceError::from("source offline"))
        } else {
            Ok(self.definitions.lock().clone())
        };
        async move { result }
    }
}

/// Records every parse and tracks how many run at once.
#[derive(Debug, Default)]
pub struct CountingParser {
    calls: Mutex<Vec<String>>,
    delay: Duration,
    in_flight: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

impl CountingParser {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_delay(delay: Duration) -> Arc<Self> {
        Arc::new(Self { delay, ..Self::default() })
    }

    pub fn calls(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn calls_for(&self, name: &str) -> usize {
        self.calls.lock().iter().filter(|n| *n == name).count()
    }

    pub fn reset(&self) {
        self.calls.lock().clear();
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

impl DefinitionParser<TestDefinition> for CountingParser {
    fn parse(
        &self,
        definition: &TestDefinition,
    ) -> impl Future<Output = Result<Parsed, ParseError>> + Send {
        self.calls.lock().push(definition.name.clone());
        let definition = definition.clone();
        let delay = self.delay;
        let in_flight = Arc::clone(&self.in_flight);
        let peak = Arc::clone(&self.peak);

        async move {
            let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            peak.fetch_max(now, Ordering::SeqCst);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            in_flight.fetch_sub(1, Ordering::SeqCst);

            let name = match definition.behavior {
                Behavior::Build => definition.name,
                Behavior::Rename => format!("{}-renamed", definition.name),
                Behavior::Skip => return Ok(Parsed::Skip),
                Behavior::Fail => {
                    return Err(ParseError::Invalid {
                        message: format!("{} is broken", definition.name).into(),
                        context: None,
                    });
                },
                Behavior::Panic => panic!("parser exploded on {}", definition.name),
            };
            Ok(Parsed::Credentials(Arc::new(TestCredentials { name, version: definition.version })))
        }
    }
}
