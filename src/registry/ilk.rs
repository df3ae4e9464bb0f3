//! Turning plain constructors into full members of the type system.

use super::{Registry, TypeId, State, ANONYMOUS};
use crate::{built_in, Key, Value, Mapping, Result};

impl Registry {
    /// Installs `proto`, `constant`, `shared` and `descend` as statics of
    /// `ty`, and `constant` on its prototype. With `None`, first defines an
    /// empty parentless constructor.
    ///
    /// Returns `ty` itself. Building again reinstalls the same helpers.
    pub fn build(&mut self, ty: Option<TypeId>) -> TypeId {
        let ty = ty.unwrap_or_else(|| self.define(ANONYMOUS, |_, _, _| Ok(())));
        let record = self.record(ty);
        for (name, helper) in self.helpers.iter() {
            record.statics.set(name.clone(), helper.clone().into());
        }
        record.prototype.set("constant", built_in::instance_constant(ty).into());
        let record = self.record_mut(ty);
        record.state = record.state.max(State::Built);
        tracing::debug!(ty = %record.name, state = ?record.state, "built");
        ty
    }

    /// Stores a property on the prototype of `ty`, so that every instance
    /// sees it.
    pub fn set_proto(&mut self, ty: TypeId, key: impl Into<Key>, value: impl Into<Value>) {
        let prototype = self.record(ty).prototype.clone();
        self.define_key(&prototype, &key.into(), value.into());
    }

    /// Stores every entry of `values` on the prototype of `ty`, in order.
    pub fn set_protos(&mut self, ty: TypeId, values: &Mapping) {
        for (key, value) in values.iter() {
            self.set_proto(ty, key.clone(), value.clone());
        }
    }

    /// Sets the tokens that descendants of `ty` will inherit.
    pub fn shared(&mut self, ty: TypeId, tokens: Mapping) -> TypeId {
        self.record_mut(ty).shared = Some(tokens);
        ty
    }

    /// Derives a new type from `parent`.
    ///
    /// - `descendant` is the constructor to link. If `None`, a new one is
    ///   defined whose body passes its arguments to the body of `parent`.
    /// - `shared` becomes the descendant's shared tokens, gaining any entry of
    ///   the parent's shared tokens whose key it lacks. If `None`, the
    ///   descendant shares the parent's tokens.
    pub fn descend(
        &mut self,
        parent: TypeId,
        descendant: Option<TypeId>,
        shared: Option<Mapping>,
    ) -> Result<TypeId> {
        let descendant = descendant.unwrap_or_else(|| {
            let name = format!("{}'", self.record(parent).name);
            self.define(name, move |registry, this, args| registry.apply(parent, this, args))
        });
        let inherited = self.record(parent).shared.clone();
        let shared = match (shared, inherited) {
            (Some(own), Some(inherited)) => Some(own.fill_missing(&inherited)),
            (own, inherited) => own.or(inherited),
        };
        self.inherits(descendant, parent)?;
        if let Some(shared) = shared { self.shared(descendant, shared); }
        tracing::debug!(
            parent = %self.record(parent).name,
            descendant = %self.record(descendant).name,
            shared = self.record(descendant).shared.as_ref().map_or(0, Mapping::len),
            "descended"
        );
        Ok(descendant)
    }
}

// ----------------------------------------------------------------------------
