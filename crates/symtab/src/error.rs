//! Error types for the scoped symbol table

/// Errors raised synchronously at the point of misuse
///
/// Lookups that find nothing return empty results, never an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SymbolTableError {
    /// `exit_scope` was called while positioned at the root scope
    ///
    /// Signals a caller bug: more exits than enters. The failed call does
    /// not mutate the table.
    #[error("already at the root scope")]
    AtRootScope,

    /// An insertion was rejected because an indistinguishable entry
    /// already exists under the same key in the target scope
    ///
    /// Recoverable: callers typically report a redeclaration diagnostic.
    /// The table never silently overwrites or merges entries.
    #[error("symbol `{key}` already found in desired scope")]
    DuplicateSymbol {
        /// Derived key of the rejected insertion
        key: String,
    },
}
