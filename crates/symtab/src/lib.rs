//! Scoped symbol table for language front-ends
//!
//! This crate provides the scoping/storage primitive that parsers, type
//! checkers and interpreters build on: it records named entities against
//! nested lexical scopes and resolves name references innermost-first.
//!
//! # Architecture
//!
//! - **Symbol contract**: any value implementing [`Symbol`] can be stored;
//!   the optional `ty`/`parent` capabilities exist only for equality-based
//!   disambiguation. [`AstSymbol`] is a stock implementation, and plain
//!   `String`s work too.
//! - **Scope chain**: [`SymbolTable`] is a cursor into an arena of scopes
//!   linked to their parents, so `enter_scope`/`exit_scope` are O(1) and
//!   ancestor bindings are shared, never copied.
//! - **Buckets**: each scope maps a derived string key to the
//!   insertion-ordered symbols sharing it; same-keyed symbols coexist when
//!   their `ty`/`parent` tell them apart.
//!
//! # Usage
//!
//! ```rust
//! use symtab::{AstSymbol, SymbolTable};
//!
//! let mut table: SymbolTable<AstSymbol<&str>> = SymbolTable::new();
//! table.add(AstSymbol::new("x").with_ty("var"))?;
//!
//! table.enter_scope();
//! table.add(AstSymbol::new("x").with_ty("func"))?;
//!
//! // The inner binding shadows the outer one entirely.
//! assert_eq!(table.lookup("x")[0].ty, Some("func"));
//!
//! table.exit_scope()?;
//! assert_eq!(table.lookup("x")[0].ty, Some("var"));
//! # Ok::<(), symtab::SymbolTableError>(())
//! ```

pub mod error;
pub mod symbol;
pub mod table;

pub use error::SymbolTableError;
pub use symbol::{AstSymbol, Symbol, SymbolId};
pub use table::{SymbolTable, VisibleSymbols};
