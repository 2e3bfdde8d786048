use crate::constants::{CONFIGURATION_STORE, METRICS_STORE, OBJECT_STORE, REMOTE_JUDGE};
use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A capability tag: the kind of backend an account can reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    MetricsStore,
    ObjectStore,
    ConfigurationStore,
    RemoteJudge,
}

impl AccountType {
    pub const ALL: [Self; 4] =
        [Self::MetricsStore, Self::ObjectStore, Self::ConfigurationStore, Self::RemoteJudge];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MetricsStore => METRICS_STORE,
            Self::ObjectStore => OBJECT_STORE,
            Self::ConfigurationStore => CONFIGURATION_STORE,
            Self::RemoteJudge => REMOTE_JUDGE,
        }
    }

    /// Looks a tag up by its wire name (`METRICS_STORE`, ...).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags! {
    /// The set of capability tags an account supports.
    ///
    /// "Can this account do X" is a membership test, see [`AccountTypes::contains_type`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AccountTypes: u8 {
        const METRICS_STORE = 1 << 0;
        const OBJECT_STORE = 1 << 1;
        const CONFIGURATION_STORE = 1 << 2;
        const REMOTE_JUDGE = 1 << 3;
    }
}

impl AccountTypes {
    #[must_use]
    pub const fn contains_type(self, account_type: AccountType) -> bool {
        self.contains(Self::of(account_type))
    }

    #[must_use]
    pub const fn of(account_type: AccountType) -> Self {
        match account_type {
            AccountType::MetricsStore => Self::METRICS_STORE,
            AccountType::ObjectStore => Self::OBJECT_STORE,
            AccountType::ConfigurationStore => Self::CONFIGURATION_STORE,
            AccountType::RemoteJudge => Self::REMOTE_JUDGE,
        }
    }

    /// The tags in this set, in declaration order.
    pub fn types(self) -> impl Iterator<Item = AccountType> {
        AccountType::ALL.into_iter().filter(move |t| self.contains_type(*t))
    }
}

impl From<AccountType> for AccountTypes {
    fn from(account_type: AccountType) -> Self {
        Self::of(account_type)
    }
}

impl FromIterator<AccountType> for AccountTypes {
    fn from_iter<I: IntoIterator<Item = AccountType>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), |set, t| set | Self::of(t))
    }
}

impl<const N: usize> From<[AccountType; N]> for AccountTypes {
    fn from(types: [AccountType; N]) -> Self {
        types.into_iter().collect()
    }
}

impl Serialize for AccountTypes {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.types())
    }
}

impl<'de> Deserialize<'de> for AccountTypes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let types = Vec::<AccountType>::deserialize(deserializer)?;
        Ok(types.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn membership() {
        let set = AccountTypes::from([AccountType::MetricsStore, AccountType::ObjectStore]);
        assert!(set.contains_type(AccountType::MetricsStore));
        assert!(set.contains_type(AccountType::ObjectStore));
        assert!(!set.contains_type(AccountType::RemoteJudge));
        assert!(!AccountTypes::empty().contains_type(AccountType::MetricsStore));
    }

    #[test]
    fn names_round_through_lookup() {
        for t in AccountType::ALL {
            assert_eq!(AccountType::from_name(&t.to_string()), Some(t));
        }
        assert_eq!(AccountType::from_name("metrics_store"), None);
    }

    #[test]
    fn types_iterates_in_declaration_order() {
        let set = AccountTypes::REMOTE_JUDGE | AccountTypes::METRICS_STORE;
        let types: Vec<_> = set.types().collect();
        assert_eq!(types, vec![AccountType::MetricsStore, AccountType::RemoteJudge]);
    }
}
