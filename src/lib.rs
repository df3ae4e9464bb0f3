//! A small prototype-based object model with three additions: private
//! [`Token`]s, constants inherited along a single-parent type hierarchy, and
//! [`Overload`] dispatch on argument kinds.

pub mod model;
pub use model::{Name, Map, Kind, Key, Mapping, NativeFn, Native, Value};

mod object;
pub use object::{Object, Slot};

mod token;
pub use token::{Token, tokens};

mod overload;
pub use overload::{Hint, Overload};

mod registry;
pub use registry::{Registry, TypeId, State, Body, CONSTRUCTOR, ANONYMOUS};

mod built_in;

mod config;
pub use config::{Config, Concealment};

mod error;
pub use error::{Error, Result};
