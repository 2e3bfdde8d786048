#![allow(dead_code)]

use accord_registry::{AccountCredentials, AccountType, AccountTypes, SharedCredentials};
use std::any::Any;
use std::sync::Arc;

#[derive(Debug)]
pub struct TestAccount {
    pub name: String,
    pub types: AccountTypes,
}

impl AccountCredentials for TestAccount {
    fn name(&self) -> &str {
        &self.name
    }

    fn provider(&self) -> &str {
        "test"
    }

    fn supported_types(&self) -> AccountTypes {
        self.types
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub fn account(name: &str, types: &[AccountType]) -> SharedCredentials {
    Arc::new(TestAccount { name: name.to_owned(), types: types.iter().copied().collect() })
}

pub fn sorted_names(credentials: &[SharedCredentials]) -> Vec<String> {
    let mut names: Vec<String> = credentials.iter().map(|c| c.name().to_owned()).collect();
    names.sort();
    names
}
