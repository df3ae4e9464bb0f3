//! Single-parent prototype linking.

use super::{Registry, TypeId, State, CONSTRUCTOR};
use crate::{Object, Value, Error, Result};

impl Registry {
    /// Refuses links that would make `ty` its own ancestor, or that would
    /// replace an ancestor `ty` already has.
    fn check_link(&self, ty: TypeId, super_ty: TypeId) -> Result<()> {
        let record = self.record(ty);
        if record.ancestor.is_some() {
            return Err(Error::AlreadyLinked {ty: record.name.clone()});
        }
        let is_below = ty == super_ty || self.record(super_ty).prototype.chain().any(|object| {
            object.ptr_eq(&record.prototype) || object.get_own(CONSTRUCTOR) == Some(Value::Type(ty))
        });
        if is_below {
            return Err(Error::Cycle {ty: record.name.clone(), ancestor: self.record(super_ty).name.clone()});
        }
        Ok(())
    }

    /// Gives `ty` a fresh prototype that inherits from the prototype of
    /// `super_ty`, so that instances of `ty` are instances of `super_ty`.
    ///
    /// Installs no helpers and records no ancestor, so constants are not
    /// inherited. Properties on the old prototype of `ty` are discarded.
    pub fn bond(&mut self, ty: TypeId, super_ty: TypeId) -> Result<TypeId> {
        self.check_link(ty, super_ty)?;
        let prototype = Object::new(Some(self.record(super_ty).prototype.clone()));
        prototype.define(CONSTRUCTOR, ty.into(), false);
        self.record_mut(ty).prototype = prototype;
        tracing::debug!(ty = %self.record(ty).name, super_ty = %self.record(super_ty).name, "bonded");
        Ok(ty)
    }

    /// [`Registry::bond()`]s `ty` to `super_ty`, records the ancestor used
    /// for constant lookup, and [`Registry::build()`]s `ty`.
    pub fn inherits(&mut self, ty: TypeId, super_ty: TypeId) -> Result<TypeId> {
        self.bond(ty, super_ty)?;
        let ancestor = self.record(super_ty).prototype.clone();
        let record = self.record_mut(ty);
        record.ancestor = Some(ancestor);
        record.state = State::Linked;
        self.build(Some(ty));
        Ok(ty)
    }
}

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(registry: &mut Registry, name: &str) -> TypeId {
        registry.define(name, |_, _, _| Ok(()))
    }

    #[test]
    fn bond_makes_instances_of_the_super_type() {
        let mut registry = Registry::new();
        let foo = plain(&mut registry, "Foo");
        let bar = plain(&mut registry, "Bar");
        assert_eq!(registry.bond(bar, foo).unwrap(), bar);

        let b = registry.construct(bar, &[]).unwrap();
        assert!(registry.is_instance(&b.clone().into(), foo));
        assert!(registry.is_instance(&b.clone().into(), bar));
        assert_eq!(registry.constructor_of(&b), Some(bar));
        assert!(registry.prototype(bar).keys().is_empty());
    }

    #[test]
    fn bond_installs_nothing() {
        let mut registry = Registry::new();
        let foo = plain(&mut registry, "Foo");
        let bar = plain(&mut registry, "Bar");
        registry.set_constant(foo, "K", 1);
        registry.bond(bar, foo).unwrap();
        assert_eq!(registry.state(bar), State::Plain);
        assert!(registry.ancestor(bar).is_none());
        assert!(registry.statics(bar).keys().is_empty());
        assert_eq!(registry.constant(bar, "K"), None);
    }

    #[test]
    fn inherits_links_and_builds() {
        let mut registry = Registry::new();
        let foo = plain(&mut registry, "Foo");
        let bar = plain(&mut registry, "Bar");
        registry.set_constant(foo, "K", 1);
        registry.inherits(bar, foo).unwrap();

        assert_eq!(registry.state(bar), State::Linked);
        assert_eq!(registry.parent(bar), Some(foo));
        assert!(registry.ancestor(bar).unwrap().ptr_eq(registry.prototype(foo)));
        for helper in ["proto", "constant", "shared", "descend"] {
            assert!(matches!(registry.statics(bar).get_own(helper), Some(Value::Native(_))));
        }
        assert_eq!(registry.constant(bar, "K"), Some(1.into()));

        let b = registry.construct(bar, &[]).unwrap();
        assert!(registry.is_instance(&b.into(), foo));
    }

    #[test]
    fn relinking_is_refused() {
        let mut registry = Registry::new();
        let foo = plain(&mut registry, "Foo");
        let bar = plain(&mut registry, "Bar");
        let baz = plain(&mut registry, "Baz");
        registry.inherits(bar, foo).unwrap();
        let err = registry.inherits(bar, baz).unwrap_err();
        assert!(matches!(err, Error::AlreadyLinked { .. }));
        assert!(matches!(registry.bond(bar, baz), Err(Error::AlreadyLinked { .. })));
        assert_eq!(registry.parent(bar), Some(foo));
    }

    #[test]
    fn cycles_are_refused() {
        let mut registry = Registry::new();
        let foo = plain(&mut registry, "Foo");
        let bar = plain(&mut registry, "Bar");
        assert!(matches!(registry.inherits(foo, foo), Err(Error::Cycle { .. })));

        registry.inherits(bar, foo).unwrap();
        let err = registry.inherits(foo, bar).unwrap_err();
        assert_eq!(err.to_string(), "`Foo` cannot descend from `Bar`: cycle in the type hierarchy");
        assert!(registry.ancestor(foo).is_none());
    }

    #[test]
    fn bond_may_be_repeated_before_linking() {
        let mut registry = Registry::new();
        let foo = plain(&mut registry, "Foo");
        let baz = plain(&mut registry, "Baz");
        let bar = plain(&mut registry, "Bar");
        registry.bond(bar, foo).unwrap();
        registry.bond(bar, baz).unwrap();
        let b = registry.construct(bar, &[]).unwrap();
        assert!(registry.is_instance(&b.clone().into(), baz));
        assert!(!registry.is_instance(&b.into(), foo));
    }
}
