//! Account and owner field rules.

use tally_shared::types::AccountId;

use super::error::LedgerError;
use super::types::{AccountChanges, AccountKind, AccountRecord};

/// Exact length of an account suffix.
pub const SUFFIX_LEN: usize = 4;

/// Normalizes and validates an account display name.
///
/// # Errors
///
/// Returns `InvalidAccount` if the trimmed name is empty.
pub fn normalize_name(name: &str) -> Result<String, LedgerError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::InvalidAccount(
            "name must not be empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

/// Validates an optional account suffix.
///
/// # Errors
///
/// Returns `InvalidAccount` unless the suffix is exactly four characters.
pub fn validate_suffix(suffix: Option<&str>) -> Result<Option<String>, LedgerError> {
    match suffix {
        None => Ok(None),
        Some(s) if s.chars().count() == SUFFIX_LEN => Ok(Some(s.to_string())),
        Some(s) => Err(LedgerError::InvalidAccount(format!(
            "suffix must be exactly {SUFFIX_LEN} characters, got '{s}'"
        ))),
    }
}

/// Validates an owner email address. Only the basic shape is checked.
///
/// # Errors
///
/// Returns `InvalidOwner` if the address has no local part or domain.
pub fn normalize_email(email: &str) -> Result<String, LedgerError> {
    let trimmed = email.trim();
    match trimmed.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => {
            Ok(trimmed.to_lowercase())
        }
        _ => Err(LedgerError::InvalidOwner(format!(
            "'{trimmed}' is not a valid email"
        ))),
    }
}

/// Checks whether an account's kind may change.
///
/// # Errors
///
/// Returns `KindChangeNotAllowed` if the kind differs and the account has lines.
pub fn validate_kind_change(
    account_id: AccountId,
    current: AccountKind,
    requested: AccountKind,
    has_lines: bool,
) -> Result<(), LedgerError> {
    if current != requested && has_lines {
        return Err(LedgerError::KindChangeNotAllowed(account_id));
    }
    Ok(())
}

/// Validated account changes. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedAccountChanges {
    /// Normalized name, if renamed.
    pub name: Option<String>,
    /// New kind, if changed.
    pub kind: Option<AccountKind>,
    /// New suffix, if set.
    pub suffix: Option<String>,
}

impl ResolvedAccountChanges {
    /// Returns the renamed value only if it differs from the current name.
    #[must_use]
    pub fn rename_target<'a>(&'a self, account: &AccountRecord) -> Option<&'a str> {
        self.name.as_deref().filter(|name| *name != account.name)
    }
}

/// Validates a partial account update against the current record.
///
/// # Errors
///
/// Returns a validation error for a bad name or suffix, or for a kind change
/// on an account that already has lines.
pub fn resolve_changes(
    account: &AccountRecord,
    changes: &AccountChanges,
    has_lines: bool,
) -> Result<ResolvedAccountChanges, LedgerError> {
    let name = changes.name.as_deref().map(normalize_name).transpose()?;
    let suffix = validate_suffix(changes.suffix.as_deref())?;
    if let Some(kind) = changes.kind {
        validate_kind_change(account.id, account.kind, kind, has_lines)?;
    }
    Ok(ResolvedAccountChanges {
        name,
        kind: changes.kind,
        suffix,
    })
}
