//! Signature-based selection among several implementations of one operation.
//!
//! An [`Overload`] is an ordered list of registrations, each pairing a list of
//! [`Hint`]s with an implementation. A call selects the first registration
//! that has exactly one hint per argument and whose hints all accept the
//! corresponding arguments. Listing general signatures after specific ones
//! therefore makes them fallbacks.

use super::model::{Name, Kind, Value};
use super::{Token, TypeId, Registry, Error, Result};

/// What a registration expects of one positional argument.
#[derive(Debug, Clone)]
pub enum Hint {
    /// Anything.
    Any,

    /// `undefined` or `null`.
    Absent,

    /// A value of exactly this [`Kind`].
    Kind(Kind),

    /// An object whose prototype chain contains the type's prototype.
    Instance(TypeId),

    /// An object that is, or inherits from, an object marked with the token.
    Marked(Token),
}

impl Hint {
    pub fn matches(&self, registry: &Registry, value: &Value) -> bool {
        match self {
            Self::Any => true,
            Self::Absent => value.is_absent(),
            Self::Kind(kind) => value.kind() == *kind,
            Self::Instance(ty) => registry.is_instance(value, *ty),
            Self::Marked(token) => value.as_object().map_or(false, |object| token.marks(object)),
        }
    }
}

impl From<Kind> for Hint {
    fn from(kind: Kind) -> Self { Self::Kind(kind) }
}

impl From<TypeId> for Hint {
    fn from(ty: TypeId) -> Self { Self::Instance(ty) }
}

impl From<Token> for Hint {
    fn from(token: Token) -> Self { Self::Marked(token) }
}

// ----------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct Candidate<F> {
    hints: Box<[Hint]>,
    method: F,
}

impl<F> Candidate<F> {
    fn accepts(&self, registry: &Registry, args: &[Value]) -> bool {
        self.hints.len() == args.len() &&
        self.hints.iter().zip(args).all(|(hint, arg)| hint.matches(registry, arg))
    }
}

/// A dispatch table of `F`s.
#[derive(Debug, Clone)]
pub struct Overload<F> {
    name: Name,
    candidates: Vec<Candidate<F>>,
}

impl<F> Overload<F> {
    pub fn new(name: impl Into<Name>) -> Self {
        Self {name: name.into(), candidates: Vec::new()}
    }

    pub fn name(&self) -> &Name { &self.name }

    pub fn len(&self) -> usize { self.candidates.len() }

    pub fn is_empty(&self) -> bool { self.candidates.is_empty() }

    /// Append a registration.
    pub fn case<H: Into<Hint>>(mut self, hints: impl IntoIterator<Item=H>, method: F) -> Self {
        let hints = hints.into_iter().map(Into::into).collect();
        self.candidates.push(Candidate {hints, method});
        self
    }

    /// Append a registration that accepts any `arity` arguments.
    pub fn untyped(self, arity: usize, method: F) -> Self {
        self.case(std::iter::repeat(Hint::Any).take(arity), method)
    }

    /// Select the first registration that accepts `args`.
    pub fn resolve(&self, registry: &Registry, args: &[Value]) -> Result<&F> {
        let found = self.candidates.iter().enumerate()
            .find(|(_, candidate)| candidate.accepts(registry, args));
        let Some((index, candidate)) = found else {
            return Err(Error::dispatch(self.name.clone(), args));
        };
        tracing::trace!(overload = %self.name, candidate = index, "dispatched");
        Ok(&candidate.method)
    }
}

// ----------------------------------------------------------------------------
