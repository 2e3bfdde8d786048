use std::borrow::Cow;

/// Failures surfaced by the required lookups.
#[accord_derive::accord_error]
pub enum RegistryError {
    /// Neither the writable store nor the fallback produced a match.
    ///
    /// `message` names what was asked for: the account name, or `of type X`.
    #[error("Unable to resolve account {message}{}.", format_context(.context))]
    Unresolved { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl RegistryError {
    pub(crate) fn by_name(name: &str) -> Self {
        Self::Unresolved { message: name.to_owned().into(), context: None }
    }

    pub(crate) fn by_type(account_type: accord_domain::account::AccountType) -> Self {
        Self::Unresolved { message: format!("of type {account_type}").into(), context: None }
    }
}
