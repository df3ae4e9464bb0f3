use thiserror::Error;

use super::model::{Name, Value};

/// Everything that can go wrong while defining or using types.
///
/// Looking up a constant that does not exist is not an error; see
/// [`crate::Registry::constant`].
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// No registration of an [`crate::Overload`] accepts the arguments.
    #[error("no overload of `{overload}` accepts ({kinds})")]
    Dispatch { overload: Name, kinds: String },

    #[error("`{receiver}` has no method `{name}`")]
    NoSuchMethod { receiver: Name, name: Name },

    #[error("`{receiver}.{name}` is a {kind}, not a function")]
    NotCallable { receiver: Name, name: Name, kind: &'static str },

    /// A value was passed where a constructor was expected.
    #[error("a {kind} is not a constructor")]
    NotConstructor { kind: &'static str },

    /// Linking would make a type its own ancestor.
    #[error("`{ty}` cannot descend from `{ancestor}`: cycle in the type hierarchy")]
    Cycle { ty: Name, ancestor: Name },

    #[error("`{ty}` already has an ancestor")]
    AlreadyLinked { ty: Name },

    /// Raised by a constructor body.
    #[error("constructing `{ty}` failed: {message}")]
    Body { ty: Name, message: String },
}

impl Error {
    /// Constructs an [`Error::Dispatch`] describing the kinds of `args`.
    pub fn dispatch(overload: impl Into<Name>, args: &[Value]) -> Self {
        let kinds: Vec<&str> = args.iter().map(|arg| arg.kind().as_str()).collect();
        Self::Dispatch { overload: overload.into(), kinds: kinds.join(", ") }
    }

    /// Constructs an [`Error::Body`].
    pub fn body(ty: impl Into<Name>, message: impl Into<String>) -> Self {
        Self::Body { ty: ty.into(), message: message.into() }
    }
}

/// A `T` or an [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

// ----------------------------------------------------------------------------
