use std::{fmt};
use std::rc::{Rc};

use super::{Object, Token, TypeId, Registry, Result};

/// Represents a property name.
pub type Name = Rc<str>;

/// Represents a map from `Name` to `T`.
pub type Map<T> = std::collections::HashMap<Name, T>;

// ----------------------------------------------------------------------------

/// The runtime kind of a [`Value`], as tested by [`crate::Hint::Kind`].
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq)]
pub enum Kind {
    Undefined,
    Null,
    Boolean,
    Number,
    String,
    Token,

    /// A [`Mapping`] or an [`Object`].
    Object,

    /// A constructor or a [`Native`].
    Function,
}

impl Kind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Token => "token",
            Self::Object => "object",
            Self::Function => "function",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { f.write_str(self.as_str()) }
}

// ----------------------------------------------------------------------------

/// A property key: a plain name, or a [`Token`].
///
/// Either way the property lives in the slot named by [`Key::name()`]. Writes
/// through a `Token` key are concealed.
#[derive(Debug, Clone, PartialEq)]
pub enum Key {
    Name(Name),
    Token(Token),
}

impl Key {
    /// The name of the slot this key addresses.
    pub fn name(&self) -> Name {
        match self {
            Self::Name(name) => name.clone(),
            Self::Token(token) => token.name().clone(),
        }
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self { Self::Name(name.into()) }
}

impl From<Name> for Key {
    fn from(name: Name) -> Self { Self::Name(name) }
}

impl From<Token> for Key {
    fn from(token: Token) -> Self { Self::Token(token) }
}

impl From<&Token> for Key {
    fn from(token: &Token) -> Self { Self::Token(token.clone()) }
}

impl From<Key> for Value {
    fn from(key: Key) -> Self {
        match key {
            Key::Name(name) => Self::Str(name),
            Key::Token(token) => Self::Token(token),
        }
    }
}

// ----------------------------------------------------------------------------

/// An immutable, insertion-ordered list of `(Key, Value)` pairs.
///
/// Shared token sets and bulk `proto` and `constant` writes are `Mapping`s.
#[derive(Clone, Default)]
pub struct Mapping(Rc<[(Key, Value)]>);

impl Mapping {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item=&(Key, Value)> { self.0.iter() }

    pub fn keys(&self) -> impl Iterator<Item=&Key> { self.0.iter().map(|(key, _)| key) }

    pub fn get(&self, key: &Key) -> Option<&Value> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, value)| value)
    }

    pub fn contains_key(&self, key: &Key) -> bool { self.get(key).is_some() }

    /// Returns a new `Mapping` containing `self`'s entries followed by those
    /// entries of `other` whose keys `self` lacks.
    pub fn fill_missing(&self, other: &Mapping) -> Mapping {
        let missing = other.iter().filter(|(key, _)| !self.contains_key(key));
        let entries: Vec<(Key, Value)> = self.iter().chain(missing).cloned().collect();
        Mapping(entries.into())
    }
}

impl<K: Into<Key>, V: Into<Value>> FromIterator<(K, V)> for Mapping {
    /// A repeated key keeps its first position and takes its last value.
    fn from_iter<I: IntoIterator<Item=(K, V)>>(iter: I) -> Self {
        let mut entries: Vec<(Key, Value)> = Vec::new();
        for (key, value) in iter {
            let (key, value) = (key.into(), value.into());
            match entries.iter_mut().find(|(k, _)| *k == key) {
                Some(entry) => { entry.1 = value; },
                None => { entries.push((key, value)); },
            }
        }
        Mapping(entries.into())
    }
}

impl<K: Into<Key>, V: Into<Value>, const N: usize> From<[(K, V); N]> for Mapping {
    fn from(entries: [(K, V); N]) -> Self { entries.into_iter().collect() }
}

/// Two `Mapping`s are equal if they have the same keys with equal values,
/// in any order.
impl PartialEq for Mapping {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() &&
        self.iter().all(|(key, value)| other.get(key) == Some(value))
    }
}

impl fmt::Debug for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.iter().map(|(k, v)| (k, v))).finish()
    }
}

// ----------------------------------------------------------------------------

/// The signature of a [`Native`]. The first argument is the receiver.
pub type NativeFn = dyn Fn(&mut Registry, &[Value]) -> Result<Value>;

/// A named function implemented in Rust.
#[derive(Clone)]
pub struct Native {
    name: Name,
    f: Rc<NativeFn>,
}

impl Native {
    pub fn new(
        name: impl Into<Name>,
        f: impl Fn(&mut Registry, &[Value]) -> Result<Value> + 'static,
    ) -> Self {
        Self {name: name.into(), f: Rc::new(f)}
    }

    pub fn name(&self) -> &Name { &self.name }

    /// Call `self`, passing the receiver as `args[0]`.
    pub fn call(&self, registry: &mut Registry, args: &[Value]) -> Result<Value> {
        (self.f)(registry, args)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool { Rc::ptr_eq(&self.f, &other.f) }
}

impl fmt::Debug for Native {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<native {}>", self.name)
    }
}

// ----------------------------------------------------------------------------

/// A dynamically typed value.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Undefined,

    Null,

    Bool(bool),

    Number(f64),

    Str(Name),

    Token(Token),

    /// A plain key/value mapping.
    Map(Mapping),

    /// An instance, prototype or statics table.
    Object(Object),

    /// A constructor.
    Type(TypeId),

    Native(Native),
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Self::Undefined => Kind::Undefined,
            Self::Null => Kind::Null,
            Self::Bool(_) => Kind::Boolean,
            Self::Number(_) => Kind::Number,
            Self::Str(_) => Kind::String,
            Self::Token(_) => Kind::Token,
            Self::Map(_) | Self::Object(_) => Kind::Object,
            Self::Type(_) | Self::Native(_) => Kind::Function,
        }
    }

    /// `true` for `Undefined` and `Null`.
    pub fn is_absent(&self) -> bool { matches!(self, Self::Undefined | Self::Null) }

    pub fn as_object(&self) -> Option<&Object> {
        if let Self::Object(object) = self { Some(object) } else { None }
    }

    pub fn as_type(&self) -> Option<TypeId> {
        if let Self::Type(ty) = self { Some(*ty) } else { None }
    }

    pub fn as_number(&self) -> Option<f64> {
        if let Self::Number(n) = self { Some(*n) } else { None }
    }

    pub fn as_token(&self) -> Option<&Token> {
        if let Self::Token(token) = self { Some(token) } else { None }
    }

    /// The key/value pairs of a `Map`, or the own visible slots of an
    /// `Object`.
    pub fn entries(&self) -> Option<Mapping> {
        match self {
            Self::Map(mapping) => Some(mapping.clone()),
            Self::Object(object) => Some(object.entries()),
            _ => None,
        }
    }

    /// Interprets `self` as a [`Key`], if it is a string or a token.
    pub fn as_key(&self) -> Option<Key> {
        match self {
            Self::Str(name) => Some(Key::Name(name.clone())),
            Self::Token(token) => Some(Key::Token(token.clone())),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) => true,
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Token(a), Self::Token(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a.ptr_eq(b),
            (Self::Type(a), Self::Type(b)) => a == b,
            (Self::Native(a), Self::Native(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("undefined"),
            Self::Null => f.write_str("null"),
            Self::Bool(b) => fmt::Debug::fmt(b, f),
            Self::Number(n) => fmt::Debug::fmt(n, f),
            Self::Str(string) => fmt::Debug::fmt(string, f),
            Self::Token(token) => fmt::Debug::fmt(token, f),
            Self::Map(mapping) => fmt::Debug::fmt(mapping, f),
            Self::Object(object) => fmt::Debug::fmt(object, f),
            Self::Type(ty) => fmt::Debug::fmt(ty, f),
            Self::Native(native) => fmt::Debug::fmt(native, f),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self { Self::Bool(value) }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self { Self::Number(value) }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self { Self::Number(value.into()) }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self { Self::Str(value.into()) }
}

impl From<Name> for Value {
    fn from(value: Name) -> Self { Self::Str(value) }
}

impl From<Token> for Value {
    fn from(value: Token) -> Self { Self::Token(value) }
}

impl From<Mapping> for Value {
    fn from(value: Mapping) -> Self { Self::Map(value) }
}

impl From<Object> for Value {
    fn from(value: Object) -> Self { Self::Object(value) }
}

impl From<TypeId> for Value {
    fn from(value: TypeId) -> Self { Self::Type(value) }
}

impl From<Native> for Value {
    fn from(value: Native) -> Self { Self::Native(value) }
}

// ----------------------------------------------------------------------------
