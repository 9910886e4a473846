//! Symbol identity contract
//!
//! The table stores any value that can name itself and, optionally, carry
//! a type discriminator and a parent handle. Both extras exist purely for
//! equality comparison during disambiguation; the table never interprets
//! or follows them.

/// Minimal capability set for values stored in a symbol table
///
/// Implement this for your front-end's symbol type. The associated types
/// are opaque to the table: they only need equality. The key-derivation
/// function configured on the table decides how a symbol is indexed; by
/// default it is [`Symbol::identifier`].
pub trait Symbol {
    /// Opaque type discriminator, compared during disambiguation
    type Ty: PartialEq;
    /// Opaque non-owning parent handle, compared during disambiguation
    type Parent: PartialEq;

    /// The name this symbol is known by
    fn identifier(&self) -> &str;

    /// Type discriminator, if any
    fn ty(&self) -> Option<&Self::Ty> {
        None
    }

    /// Parent handle, if any (e.g. "belongs to enclosing class X")
    fn parent(&self) -> Option<&Self::Parent> {
        None
    }
}

/// Plain strings work as symbols: the string is its own identifier, with
/// no type or parent to disambiguate by.
impl Symbol for String {
    type Ty = ();
    type Parent = ();

    fn identifier(&self) -> &str {
        self
    }
}

/// Opaque comparable token identifying a symbol
///
/// Used as the stock parent handle on [`AstSymbol`]: a non-owning
/// back-reference the caller assigns. The table only compares it for
/// equality, never dereferences it.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub struct SymbolId(pub u32);

/// Stock symbol type for front-ends that don't need their own
///
/// `T` is the caller-owned type discriminator, `E` an arbitrary
/// annotation slot the table never touches (e.g. a resolved type filled
/// in by a later pass).
#[derive(Debug, Clone, PartialEq)]
pub struct AstSymbol<T = String, E = ()> {
    /// The name used for lookup under the default key derivation
    pub identifier: String,
    /// Type discriminator, compared during disambiguation
    pub ty: Option<T>,
    /// Parent handle, compared during disambiguation
    pub parent: Option<SymbolId>,
    /// Caller-owned annotation, ignored by the table
    pub extra: Option<E>,
}

impl<T, E> AstSymbol<T, E> {
    /// Create a symbol with the given identifier and nothing else
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            ty: None,
            parent: None,
            extra: None,
        }
    }

    /// Set the type discriminator
    #[must_use]
    pub fn with_ty(mut self, ty: T) -> Self {
        self.ty = Some(ty);
        self
    }

    /// Set the parent handle
    #[must_use]
    pub fn with_parent(mut self, parent: SymbolId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Set the annotation slot
    #[must_use]
    pub fn with_extra(mut self, extra: E) -> Self {
        self.extra = Some(extra);
        self
    }
}

impl<T: PartialEq, E> Symbol for AstSymbol<T, E> {
    type Ty = T;
    type Parent = SymbolId;

    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn ty(&self) -> Option<&T> {
        self.ty.as_ref()
    }

    fn parent(&self) -> Option<&SymbolId> {
        self.parent.as_ref()
    }
}
