//! Scope chain and bucket maps
//!
//! Scopes live in an arena (`Vec` indexed by `ScopeId`) with parent links,
//! so entering and exiting a scope is O(1) and ancestor bindings are shared
//! rather than copied. The table itself is a cursor into that arena: exited
//! scopes stay allocated but become unreachable from the cursor.

use crate::error::SymbolTableError;
use crate::symbol::Symbol;
use rustc_hash::FxHashMap;
use std::collections::hash_map;
use std::fmt;
use std::iter::Flatten;

/// Index of a scope in the table's arena
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
struct ScopeId(u32);

/// The root (global) scope, created at construction
const ROOT: ScopeId = ScopeId(0);

/// One lexical scope: its bucket map and a link to the enclosing scope
#[derive(Debug)]
struct ScopeData<S> {
    /// Enclosing scope (None for the root)
    parent: Option<ScopeId>,
    /// Derived key to the insertion-ordered symbols sharing that key
    bindings: FxHashMap<String, Vec<S>>,
}

impl<S> ScopeData<S> {
    fn new(parent: Option<ScopeId>) -> Self {
        Self {
            parent,
            bindings: FxHashMap::default(),
        }
    }
}

/// A symbol table positioned at one scope in a chain of lexical scopes
///
/// Names are resolved innermost-first: a binding in the current scope
/// shadows same-keyed bindings in enclosing scopes entirely. The root
/// scope doubles as the global scope and is reachable for direct
/// insertion from any depth.
pub struct SymbolTable<S: Symbol> {
    scopes: Vec<ScopeData<S>>,
    current: ScopeId,
    key_fn: Box<dyn Fn(&S) -> String>,
    /// Whether two symbols with the same key may coexist in one scope
    /// when their `ty`/`parent` distinguish them (default: true)
    pub allow_duplicates: bool,
}

impl<S: Symbol> SymbolTable<S> {
    /// Create a table positioned at a fresh empty root scope, deriving
    /// keys from [`Symbol::identifier`]
    #[must_use]
    pub fn new() -> Self {
        Self::with_key_fn(|symbol: &S| symbol.identifier().to_owned())
    }

    /// Create a table with a custom key-derivation function
    ///
    /// The function closes over the concrete symbol shape and decides the
    /// string every symbol is indexed by (e.g. a composite key).
    #[must_use]
    pub fn with_key_fn(key_fn: impl Fn(&S) -> String + 'static) -> Self {
        Self {
            scopes: vec![ScopeData::new(None)],
            current: ROOT,
            key_fn: Box::new(key_fn),
            allow_duplicates: true,
        }
    }

    /// Derive the storage key for a symbol
    ///
    /// Useful for looking up by symbol rather than by string.
    pub fn key_of(&self, symbol: &S) -> String {
        (self.key_fn)(symbol)
    }

    /// Nesting depth of the current position (0 at the root)
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut scope = self.scope(self.current).parent;
        while let Some(id) = scope {
            depth += 1;
            scope = self.scope(id).parent;
        }
        depth
    }

    /// Push a new, empty, innermost scope
    ///
    /// All current bindings become parent-scope bindings: reachable via
    /// [`SymbolTable::lookup`] but no longer via
    /// [`SymbolTable::local_lookup`]. Never fails.
    pub fn enter_scope(&mut self) {
        let child = ScopeId(self.scopes.len() as u32);
        self.scopes.push(ScopeData::new(Some(self.current)));
        self.current = child;
    }

    /// Return to the enclosing scope, dropping the innermost one
    ///
    /// Symbols exclusive to the abandoned scope become unreachable from
    /// the cursor.
    ///
    /// # Errors
    ///
    /// Returns [`SymbolTableError::AtRootScope`] when already positioned
    /// at the root; the table is left untouched.
    pub fn exit_scope(&mut self) -> Result<(), SymbolTableError> {
        match self.scope(self.current).parent {
            Some(parent) => {
                self.current = parent;
                Ok(())
            }
            None => Err(SymbolTableError::AtRootScope),
        }
    }

    /// Insert a symbol into the current scope under its derived key
    ///
    /// # Errors
    ///
    /// Returns [`SymbolTableError::DuplicateSymbol`] per the duplicate
    /// policy: with `allow_duplicates` any existing entry with equal `ty`
    /// *and* equal `parent` conflicts; without it, any entry under the
    /// key conflicts.
    pub fn add(&mut self, symbol: S) -> Result<(), SymbolTableError> {
        let key = self.key_of(&symbol);
        self.insert(self.current, key, symbol)
    }

    /// Insert a symbol into the current scope under a literal key,
    /// bypassing key derivation
    ///
    /// # Errors
    ///
    /// Same duplicate policy as [`SymbolTable::add`].
    pub fn add_with_key(
        &mut self,
        key: impl Into<String>,
        symbol: S,
    ) -> Result<(), SymbolTableError> {
        self.insert(self.current, key.into(), symbol)
    }

    /// Insert a symbol directly into the root scope, regardless of the
    /// current position
    ///
    /// The binding is visible from every depth once inner scopes fail to
    /// match, as if defined at the root. Used for built-ins and hoisted
    /// top-level declarations.
    ///
    /// # Errors
    ///
    /// Same duplicate policy as [`SymbolTable::add`], checked against the
    /// root scope's bucket.
    pub fn add_to_global_scope(&mut self, symbol: S) -> Result<(), SymbolTableError> {
        let key = self.key_of(&symbol);
        self.insert(ROOT, key, symbol)
    }

    /// Insert a symbol into the root scope under a literal key
    ///
    /// # Errors
    ///
    /// Same duplicate policy as [`SymbolTable::add`], checked against the
    /// root scope's bucket.
    pub fn add_to_global_scope_with_key(
        &mut self,
        key: impl Into<String>,
        symbol: S,
    ) -> Result<(), SymbolTableError> {
        self.insert(ROOT, key.into(), symbol)
    }

    /// Look up a key in the current scope only, without walking the chain
    ///
    /// Returns the bucket's symbols in insertion order, empty when the
    /// key is unbound here.
    pub fn local_lookup(&self, key: &str) -> &[S] {
        self.bucket(self.current, key)
    }

    /// Look up a key in the current scope with disambiguation filters
    ///
    /// A `ty` filter keeps only symbols whose type discriminator compares
    /// equal; a `parent` filter likewise. `None` means unfiltered.
    pub fn local_lookup_where(
        &self,
        key: &str,
        ty: Option<&S::Ty>,
        parent: Option<&S::Parent>,
    ) -> Vec<&S> {
        Self::filter(self.bucket(self.current, key), ty, parent)
    }

    /// Look up a key, walking the scope chain innermost to outermost
    ///
    /// The first scope with a non-empty bucket for the key wins entirely;
    /// matches in enclosing scopes are shadowed, never merged in.
    pub fn lookup(&self, key: &str) -> &[S] {
        let mut scope = Some(self.current);
        while let Some(id) = scope {
            let bucket = self.bucket(id, key);
            if !bucket.is_empty() {
                return bucket;
            }
            scope = self.scope(id).parent;
        }
        &[]
    }

    /// Look up a key along the scope chain with disambiguation filters
    ///
    /// A scope whose bucket yields no post-filter match defers to its
    /// parent, even if the bucket itself is non-empty. The first scope
    /// producing any match shadows the rest of the chain entirely.
    pub fn lookup_where(
        &self,
        key: &str,
        ty: Option<&S::Ty>,
        parent: Option<&S::Parent>,
    ) -> Vec<&S> {
        let mut scope = Some(self.current);
        while let Some(id) = scope {
            let matches = Self::filter(self.bucket(id, key), ty, parent);
            if !matches.is_empty() {
                return matches;
            }
            scope = self.scope(id).parent;
        }
        Vec::new()
    }

    /// Lazily iterate every symbol visible from the current position
    ///
    /// Drains the current scope's buckets (bucket order unspecified,
    /// per-bucket insertion order preserved), then each enclosing scope
    /// in turn up to the root. Reflects live state; iterate again after a
    /// mutation to observe it.
    pub fn iter(&self) -> VisibleSymbols<'_, S> {
        let data = self.scope(self.current);
        VisibleSymbols {
            table: self,
            bucket_values: data.bindings.values().flatten(),
            next_scope: data.parent,
        }
    }

    fn scope(&self, id: ScopeId) -> &ScopeData<S> {
        &self.scopes[id.0 as usize]
    }

    fn bucket(&self, scope: ScopeId, key: &str) -> &[S] {
        match self.scope(scope).bindings.get(key) {
            Some(bucket) => bucket,
            None => &[],
        }
    }

    fn insert(
        &mut self,
        scope: ScopeId,
        key: String,
        symbol: S,
    ) -> Result<(), SymbolTableError> {
        let allow_duplicates = self.allow_duplicates;
        let data = &mut self.scopes[scope.0 as usize];

        if let Some(bucket) = data.bindings.get(&key) {
            if !allow_duplicates {
                return Err(SymbolTableError::DuplicateSymbol { key });
            }
            // Pairwise comparison: an entry conflicts only when both its
            // ty and its parent compare equal to the new symbol's.
            let indistinguishable = bucket
                .iter()
                .any(|existing| existing.ty() == symbol.ty() && existing.parent() == symbol.parent());
            if indistinguishable {
                return Err(SymbolTableError::DuplicateSymbol { key });
            }
        }

        data.bindings.entry(key).or_default().push(symbol);
        Ok(())
    }

    fn filter<'table>(
        bucket: &'table [S],
        ty: Option<&S::Ty>,
        parent: Option<&S::Parent>,
    ) -> Vec<&'table S> {
        bucket
            .iter()
            .filter(|symbol| ty.is_none_or(|want| symbol.ty() == Some(want)))
            .filter(|symbol| parent.is_none_or(|want| symbol.parent() == Some(want)))
            .collect()
    }
}

impl<S: Symbol> Default for SymbolTable<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Symbol + fmt::Debug> fmt::Debug for SymbolTable<S> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("SymbolTable")
            .field("scopes", &self.scopes)
            .field("current", &self.current)
            .field("allow_duplicates", &self.allow_duplicates)
            .finish_non_exhaustive()
    }
}

impl<'table, S: Symbol> IntoIterator for &'table SymbolTable<S> {
    type Item = &'table S;
    type IntoIter = VisibleSymbols<'table, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazy iterator over every symbol visible from a table's position
///
/// Yields the current scope's symbols, then delegates to each enclosing
/// scope up to the root. Nothing is materialized up front.
pub struct VisibleSymbols<'table, S: Symbol> {
    table: &'table SymbolTable<S>,
    bucket_values: Flatten<hash_map::Values<'table, String, Vec<S>>>,
    next_scope: Option<ScopeId>,
}

impl<'table, S: Symbol> Iterator for VisibleSymbols<'table, S> {
    type Item = &'table S;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(symbol) = self.bucket_values.next() {
                return Some(symbol);
            }
            let id = self.next_scope?;
            let data = self.table.scope(id);
            self.bucket_values = data.bindings.values().flatten();
            self.next_scope = data.parent;
        }
    }
}
