use std::{fmt};
use std::rc::{Rc};

use super::model::{Name, Kind, Key, Value, Mapping, Native};
use super::{built_in, token, Config, Concealment, Object, Overload, Token, Error, Result};

/// The hidden prototype slot that refers back to the constructor.
pub const CONSTRUCTOR: &str = "constructor";

/// The name given to constructors created by `build(None)`.
pub const ANONYMOUS: &str = "anonymous";

/// Identifies a constructor within its [`Registry`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct TypeId(u32);

impl TypeId {
    pub const fn from_raw(raw: u32) -> Self { Self(raw) }

    pub const fn raw(self) -> u32 { self.0 }

    fn index(self) -> usize { self.0 as usize }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "TypeId({})", self.0) }
}

/// Where a constructor is in its lifecycle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum State {
    /// Defined, with no helpers.
    Plain,

    /// Has `proto`, `constant`, `shared` and `descend`.
    Built,

    /// Built, and has an ancestor.
    Linked,
}

/// A constructor body, run on a freshly allocated instance.
pub type Body = Rc<dyn Fn(&mut Registry, &Object, &[Value]) -> Result<()>>;

/// Everything known about one constructor.
struct TypeRecord {
    name: Name,
    body: Body,

    /// Shared by all instances. Has a hidden [`CONSTRUCTOR`] slot.
    prototype: Object,

    /// The constructor's own properties: helpers and constants.
    statics: Object,

    /// The prototype of the parent, if linked. Constants not found in
    /// `statics` are looked up in its constructor.
    ancestor: Option<Object>,

    /// Tokens passed on to descendants. Not reachable as a property.
    shared: Option<Mapping>,

    state: State,
}

// ----------------------------------------------------------------------------

/// Signature of the rules in [`Registry::define_value()`].
type Define = fn(Concealment, &Object, &Value, Value);

fn mark(concealment: Concealment, target: &Object, key: &Value, value: Value) {
    if let Value::Token(token) = key { token.mark_with(target, value, concealment); }
}

fn assign(_: Concealment, target: &Object, key: &Value, value: Value) {
    if let Value::Str(name) = key { target.set(name.clone(), value); }
}

fn compile_define() -> Overload<Define> {
    Overload::new("define")
        .case([Kind::Object, Kind::Token], mark as Define)
        .case([Kind::Object, Kind::String], assign as Define)
}

// ----------------------------------------------------------------------------

/// Owns every constructor of one type system.
///
/// Prototypes refer back to their constructors by [`TypeId`], so the graph
/// of `Rc`s is acyclic. Methods taking a `TypeId` panic if it was issued by
/// a different `Registry`.
pub struct Registry {
    config: Config,
    types: Vec<TypeRecord>,

    /// The static helpers installed by [`Registry::build()`].
    helpers: Box<[(Name, Native)]>,

    define_rules: Overload<Define>,
}

impl Default for Registry {
    fn default() -> Self { Self::with_config(Config::default()) }
}

impl Registry {
    pub fn new() -> Self { Self::default() }

    pub fn with_config(config: Config) -> Self {
        Self {config, types: Vec::new(), helpers: built_in::compile_helpers(), define_rules: compile_define()}
    }

    pub fn config(&self) -> &Config { &self.config }

    /// Passes `N` fresh tokens to `f`. See [`token::tokens()`].
    pub fn tokens<const N: usize, R>(f: impl FnOnce([Token; N]) -> R) -> R { token::tokens(f) }

    fn record(&self, ty: TypeId) -> &TypeRecord { &self.types[ty.index()] }

    fn record_mut(&mut self, ty: TypeId) -> &mut TypeRecord { &mut self.types[ty.index()] }

    fn insert(&mut self, name: Name, body: Body) -> TypeId {
        let ty = TypeId(self.types.len() as u32);
        let prototype = Object::new(None);
        prototype.define(CONSTRUCTOR, ty.into(), false);
        self.types.push(TypeRecord {
            name,
            body,
            prototype,
            statics: Object::new(None),
            ancestor: None,
            shared: None,
            state: State::Plain,
        });
        ty
    }

    /// Registers a plain constructor with no helpers and no ancestor.
    pub fn define(
        &mut self,
        name: impl Into<Name>,
        body: impl Fn(&mut Registry, &Object, &[Value]) -> Result<()> + 'static,
    ) -> TypeId {
        self.insert(name.into(), Rc::new(body))
    }

    pub fn len(&self) -> usize { self.types.len() }

    pub fn is_empty(&self) -> bool { self.types.is_empty() }

    pub fn name(&self, ty: TypeId) -> &Name { &self.record(ty).name }

    pub fn state(&self, ty: TypeId) -> State { self.record(ty).state }

    pub fn prototype(&self, ty: TypeId) -> &Object { &self.record(ty).prototype }

    pub fn statics(&self, ty: TypeId) -> &Object { &self.record(ty).statics }

    /// The parent's prototype, if `ty` has been linked.
    pub fn ancestor(&self, ty: TypeId) -> Option<&Object> { self.record(ty).ancestor.as_ref() }

    /// The parent constructor, if `ty` has been linked.
    pub fn parent(&self, ty: TypeId) -> Option<TypeId> {
        self.ancestor(ty)?.get(CONSTRUCTOR)?.as_type()
    }

    /// The tokens `ty` passes on to its descendants.
    pub fn shared_tokens(&self, ty: TypeId) -> Option<&Mapping> { self.record(ty).shared.as_ref() }

    /// Returns `true` if `value` is an object whose prototype chain contains
    /// the current prototype of `ty`.
    pub fn is_instance(&self, value: &Value, ty: TypeId) -> bool {
        let Some(object) = value.as_object() else { return false; };
        object.inherits_from(&self.record(ty).prototype)
    }

    /// The constructor of `object`, found through its prototype chain.
    pub fn constructor_of(&self, object: &Object) -> Option<TypeId> {
        object.get(CONSTRUCTOR)?.as_type()
    }

    // ------------------------------------------------------------------------

    /// Allocates an instance of `ty` and runs its body.
    pub fn construct(&mut self, ty: TypeId, args: &[Value]) -> Result<Object> {
        let this = Object::new(Some(self.record(ty).prototype.clone()));
        self.apply(ty, &this, args)?;
        Ok(this)
    }

    /// Runs the body of `ty` on an existing instance.
    pub fn apply(&mut self, ty: TypeId, this: &Object, args: &[Value]) -> Result<()> {
        let body = self.record(ty).body.clone();
        body(self, this, args)
    }

    /// Looks up `name` on `object` and checks it is a [`Native`].
    fn method(receiver: &Name, object: &Object, name: &str) -> Result<Native> {
        match object.get(name) {
            Some(Value::Native(native)) => Ok(native),
            Some(other) => Err(Error::NotCallable {
                receiver: receiver.clone(),
                name: name.into(),
                kind: other.kind().as_str(),
            }),
            None => Err(Error::NoSuchMethod {receiver: receiver.clone(), name: name.into()}),
        }
    }

    /// Calls the static `name` of `ty`, e.g. one of the installed helpers.
    pub fn call_static(&mut self, ty: TypeId, name: &str, args: &[Value]) -> Result<Value> {
        let record = self.record(ty);
        let native = Self::method(&record.name, &record.statics, name)?;
        let args: Vec<Value> = std::iter::once(ty.into()).chain(args.iter().cloned()).collect();
        native.call(self, &args)
    }

    /// Calls the method `name` of `this`, found through its prototype chain.
    pub fn call_method(&mut self, this: &Object, name: &str, args: &[Value]) -> Result<Value> {
        let receiver = match self.constructor_of(this) {
            Some(ty) => self.name(ty).clone(),
            None => Name::from("object"),
        };
        let native = Self::method(&receiver, this, name)?;
        let args: Vec<Value> = std::iter::once(this.clone().into()).chain(args.iter().cloned()).collect();
        native.call(self, &args)
    }

    // ------------------------------------------------------------------------

    /// Stores `value` in `target` under `key`, concealing token keys
    /// according to [`Config::concealment`].
    pub fn define_key(&self, target: &Object, key: &Key, value: Value) {
        match key {
            Key::Name(name) => target.set(name.clone(), value),
            Key::Token(token) => token.mark_with(target, value, self.config.concealment),
        }
    }

    /// Like [`Registry::define_key()`], for a `key` that must turn out to be
    /// a string or a token.
    pub fn define_value(&self, target: &Object, key: &Value, value: Value) -> Result<()> {
        let define = self.define_rules.resolve(self, &[target.clone().into(), key.clone()])?;
        define(self.config.concealment, target, key, value);
        Ok(())
    }

    /// Resolves the constant `key` of `ty`, looking in the ancestors if
    /// `ty` does not have it. `None` if no constructor in the chain has it.
    pub fn constant(&self, ty: TypeId, key: impl Into<Key>) -> Option<Value> {
        let name = key.into().name();
        let mut ty = ty;
        // A hand-written `constructor` slot could form a loop.
        for _ in 0..=self.types.len() {
            let record = self.record(ty);
            if let Some(value) = record.statics.get_own(&name) { return Some(value); }
            ty = record.ancestor.as_ref()?.get(CONSTRUCTOR)?.as_type()?;
        }
        None
    }

    /// Stores a constant on `ty` itself, never on an ancestor.
    pub fn set_constant(&mut self, ty: TypeId, key: impl Into<Key>, value: impl Into<Value>) {
        let statics = self.record(ty).statics.clone();
        self.define_key(&statics, &key.into(), value.into());
    }

    /// Stores every entry of `values` as a constant, in order.
    pub fn set_constants(&mut self, ty: TypeId, values: &Mapping) {
        for (key, value) in values.iter() {
            self.set_constant(ty, key.clone(), value.clone());
        }
    }

    /// Resolves a constant of the constructor of `object`.
    pub fn instance_constant(&self, object: &Object, key: impl Into<Key>) -> Option<Value> {
        self.constant(self.constructor_of(object)?, key)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Registry")
            .field("config", &self.config)
            .field("types", &self.types.iter().map(|record| &record.name).collect::<Vec<_>>())
            .finish()
    }
}

// ----------------------------------------------------------------------------

mod link;
mod ilk;

// ----------------------------------------------------------------------------
