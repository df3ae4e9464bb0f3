use std::{fmt};
use std::cell::{RefCell};
use std::rc::{Rc};

use super::model::{Name, Map, Key, Value, Mapping};

/// A property of an [`Object`].
#[derive(Debug, Clone)]
pub struct Slot {
    pub value: Value,

    /// `false` if the slot is hidden from [`Object::keys()`] and
    /// [`Object::entries()`].
    pub visible: bool,
}

#[derive(Default)]
struct Data {
    proto: Option<Object>,

    /// Maps a slot name to its position in `slots`.
    index: Map<usize>,

    /// The own slots, in the order they were first defined.
    slots: Vec<(Name, Slot)>,
}

/// A mutable table of named [`Slot`]s with an optional prototype.
///
/// Cloning an `Object` makes another reference to the same table. Lookups
/// that miss the own slots continue along the prototype chain.
#[derive(Clone, Default)]
pub struct Object(Rc<RefCell<Data>>);

impl Object {
    pub fn new(proto: Option<Object>) -> Self {
        Self(Rc::new(RefCell::new(Data {proto, ..Data::default()})))
    }

    pub fn proto(&self) -> Option<Object> { self.0.borrow().proto.clone() }

    pub fn ptr_eq(&self, other: &Self) -> bool { Rc::ptr_eq(&self.0, &other.0) }

    /// Assigns `value` to the own slot `name`. A new slot is visible; an
    /// existing slot keeps its visibility.
    pub fn set(&self, name: impl Into<Name>, value: Value) {
        let name = name.into();
        let mut data = self.0.borrow_mut();
        if let Some(&i) = data.index.get(&name) {
            data.slots[i].1.value = value;
        } else {
            data.insert(name, Slot {value, visible: true});
        }
    }

    /// Defines the own slot `name`, replacing both its value and visibility.
    pub fn define(&self, name: impl Into<Name>, value: Value, visible: bool) {
        let name = name.into();
        let mut data = self.0.borrow_mut();
        let slot = Slot {value, visible};
        if let Some(&i) = data.index.get(&name) {
            data.slots[i].1 = slot;
        } else {
            data.insert(name, slot);
        }
    }

    pub fn get_own_slot(&self, name: &str) -> Option<Slot> {
        let data = self.0.borrow();
        data.index.get(name).map(|&i| data.slots[i].1.clone())
    }

    pub fn get_own(&self, name: &str) -> Option<Value> {
        self.get_own_slot(name).map(|slot| slot.value)
    }

    pub fn has_own(&self, name: &str) -> bool { self.0.borrow().index.contains_key(name) }

    /// Looks up `name` in `self` and then along the prototype chain.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.chain().find_map(|object| object.get_own(name))
    }

    pub fn has(&self, name: &str) -> bool {
        self.chain().any(|object| object.has_own(name))
    }

    /// Returns `true` if `ancestor` is on the prototype chain of `self`,
    /// not counting `self`.
    pub fn inherits_from(&self, ancestor: &Object) -> bool {
        self.chain().skip(1).any(|object| object.ptr_eq(ancestor))
    }

    /// `self`, then its prototype, then its prototype's prototype, etc.
    pub fn chain(&self) -> impl Iterator<Item=Object> {
        std::iter::successors(Some(self.clone()), |object| object.proto())
    }

    /// The names of the own visible slots.
    pub fn keys(&self) -> Vec<Name> {
        let data = self.0.borrow();
        data.slots.iter().filter(|(_, slot)| slot.visible).map(|(name, _)| name.clone()).collect()
    }

    /// The own visible slots as a [`Mapping`].
    pub fn entries(&self) -> Mapping {
        let data = self.0.borrow();
        data.slots.iter()
            .filter(|(_, slot)| slot.visible)
            .map(|(name, slot)| (Key::Name(name.clone()), slot.value.clone()))
            .collect()
    }
}

impl Data {
    fn insert(&mut self, name: Name, slot: Slot) {
        self.index.insert(name.clone(), self.slots.len());
        self.slots.push((name, slot));
    }
}

impl fmt::Debug for Object {
    /// Shows only the own visible slots, so prototype chains do not recurse
    /// and concealed slots stay concealed.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let data = self.0.borrow();
        f.debug_map()
            .entries(data.slots.iter().filter(|(_, slot)| slot.visible).map(|(name, slot)| (name, &slot.value)))
            .finish()
    }
}

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_walks_the_prototype_chain() {
        let base = Object::new(None);
        base.set("a", 1.into());
        let derived = Object::new(Some(base.clone()));
        derived.set("b", 2.into());

        assert_eq!(derived.get("a"), Some(1.into()));
        assert_eq!(derived.get("b"), Some(2.into()));
        assert_eq!(derived.get_own("a"), None);
        assert!(derived.has("a"));
        assert!(!derived.has_own("a"));
        assert_eq!(base.get("b"), None);
    }

    #[test]
    fn own_slots_shadow_the_prototype() {
        let base = Object::new(None);
        base.set("a", 1.into());
        let derived = Object::new(Some(base.clone()));
        derived.set("a", 2.into());
        assert_eq!(derived.get("a"), Some(2.into()));
        assert_eq!(base.get("a"), Some(1.into()));
    }

    #[test]
    fn hidden_slots_are_not_enumerated() {
        let o = Object::new(None);
        o.set("shown", 1.into());
        o.define("hidden", 2.into(), false);
        assert_eq!(o.keys(), vec![Name::from("shown")]);
        assert_eq!(o.entries(), Mapping::from([("shown", 1)]));
        assert_eq!(o.get_own("hidden"), Some(2.into()));
    }

    #[test]
    fn assignment_keeps_visibility() {
        let o = Object::new(None);
        o.define("x", 1.into(), false);
        o.set("x", 2.into());
        let slot = o.get_own_slot("x").expect("slot");
        assert!(!slot.visible);
        assert_eq!(slot.value, 2.into());
    }

    #[test]
    fn keys_are_in_definition_order() {
        let o = Object::new(None);
        for name in ["c", "a", "b"] { o.set(name, Value::Undefined); }
        o.set("a", Value::Null);
        assert_eq!(o.keys(), vec![Name::from("c"), Name::from("a"), Name::from("b")]);
    }

    #[test]
    fn inherits_from_excludes_self() {
        let base = Object::new(None);
        let derived = Object::new(Some(base.clone()));
        assert!(derived.inherits_from(&base));
        assert!(!base.inherits_from(&base));
        assert!(!base.inherits_from(&derived));
    }
}
