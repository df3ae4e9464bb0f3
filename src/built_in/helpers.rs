use super::{Method, constructor, unpack};
use crate::model::{Kind, Value, Mapping};
use crate::{Hint, Overload, Registry, Error, Result};

/// The static helpers, in installation order.
pub(super) const HELPERS: [(&str, fn() -> Overload<Method>); 4] = [
    ("proto", compile_proto),
    ("constant", compile_constant),
    ("shared", compile_shared),
    ("descend", compile_descend),
];

const FUNCTION: Hint = Hint::Kind(Kind::Function);
const OBJECT: Hint = Hint::Kind(Kind::Object);

/// Returns the own visible entries of `values` or fails like a dispatch.
fn entries(name: &str, values: &Value, args: &[Value]) -> Result<Mapping> {
    values.entries().ok_or_else(|| Error::dispatch(name, args))
}

// ----------------------------------------------------------------------------

fn compile_proto() -> Overload<Method> {
    Overload::new("proto")
        .case([FUNCTION, OBJECT], write_protos as Method)
        .case([FUNCTION, Hint::Any, Hint::Any], write_proto)
}

fn write_protos(registry: &mut Registry, args: &[Value]) -> Result<Value> {
    let [c, values] = unpack::<2>("proto", args)?;
    let values = entries("proto", values, args)?;
    registry.set_protos(constructor(c)?, &values);
    Ok(c.clone())
}

fn write_proto(registry: &mut Registry, args: &[Value]) -> Result<Value> {
    let [c, key, value] = unpack::<3>("proto", args)?;
    let prototype = registry.prototype(constructor(c)?).clone();
    registry.define_value(&prototype, key, value.clone())?;
    Ok(c.clone())
}

// ----------------------------------------------------------------------------

fn compile_constant() -> Overload<Method> {
    Overload::new("constant")
        .case([FUNCTION, Hint::Kind(Kind::Token)], read_constant as Method)
        .case([FUNCTION, Hint::Kind(Kind::String)], read_constant)
        .case([FUNCTION, OBJECT], write_constants)
        .case([FUNCTION, Hint::Any, Hint::Any], write_constant)
}

/// Returns `undefined` if no constructor in the chain has the constant.
fn read_constant(registry: &mut Registry, args: &[Value]) -> Result<Value> {
    let [c, key] = unpack::<2>("constant", args)?;
    let key = key.as_key().ok_or_else(|| Error::dispatch("constant", args))?;
    Ok(registry.constant(constructor(c)?, key).unwrap_or_default())
}

fn write_constants(registry: &mut Registry, args: &[Value]) -> Result<Value> {
    let [c, values] = unpack::<2>("constant", args)?;
    let values = entries("constant", values, args)?;
    registry.set_constants(constructor(c)?, &values);
    Ok(c.clone())
}

fn write_constant(registry: &mut Registry, args: &[Value]) -> Result<Value> {
    let [c, key, value] = unpack::<3>("constant", args)?;
    let statics = registry.statics(constructor(c)?).clone();
    registry.define_value(&statics, key, value.clone())?;
    Ok(c.clone())
}

// ----------------------------------------------------------------------------

fn compile_shared() -> Overload<Method> {
    Overload::new("shared").case([FUNCTION, OBJECT], share as Method)
}

fn share(registry: &mut Registry, args: &[Value]) -> Result<Value> {
    let [c, tokens] = unpack::<2>("shared", args)?;
    let tokens = entries("shared", tokens, args)?;
    registry.shared(constructor(c)?, tokens);
    Ok(c.clone())
}

// ----------------------------------------------------------------------------

fn compile_descend() -> Overload<Method> {
    Overload::new("descend")
        .case([FUNCTION], descend_default as Method)
        .case([FUNCTION, FUNCTION], descend_from)
        .case([FUNCTION, OBJECT], descend_sharing)
        .case([FUNCTION, FUNCTION, OBJECT], descend_full)
        .case([FUNCTION, FUNCTION, Hint::Absent], descend_full)
        .case([FUNCTION, Hint::Absent, OBJECT], descend_full)
        .case([FUNCTION, Hint::Absent, Hint::Absent], descend_full)
}

/// `undefined` or `null` in place of `descendant` or `shared` means "none".
fn descend(registry: &mut Registry, c: &Value, descendant: &Value, shared: &Value) -> Result<Value> {
    let descendant = if descendant.is_absent() { None } else { Some(constructor(descendant)?) };
    let ty = registry.descend(constructor(c)?, descendant, shared.entries())?;
    Ok(ty.into())
}

fn descend_default(registry: &mut Registry, args: &[Value]) -> Result<Value> {
    let [c] = unpack::<1>("descend", args)?;
    descend(registry, c, &Value::Undefined, &Value::Undefined)
}

fn descend_from(registry: &mut Registry, args: &[Value]) -> Result<Value> {
    let [c, descendant] = unpack::<2>("descend", args)?;
    descend(registry, c, descendant, &Value::Undefined)
}

fn descend_sharing(registry: &mut Registry, args: &[Value]) -> Result<Value> {
    let [c, shared] = unpack::<2>("descend", args)?;
    descend(registry, c, &Value::Undefined, shared)
}

fn descend_full(registry: &mut Registry, args: &[Value]) -> Result<Value> {
    let [c, descendant, shared] = unpack::<3>("descend", args)?;
    descend(registry, c, descendant, shared)
}

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use crate::{Name, Mapping, Object, Token, Registry, State, Value, Error};

    #[test]
    fn constant_reads_and_writes() {
        let mut registry = Registry::new();
        let f = registry.build(None);
        let result = registry.call_static(f, "constant", &["X".into(), 42.into()]).unwrap();
        assert_eq!(result, f.into());
        assert_eq!(registry.call_static(f, "constant", &["X".into()]).unwrap(), 42.into());
        assert_eq!(registry.call_static(f, "constant", &["Y".into()]).unwrap(), Value::Undefined);
    }

    #[test]
    fn constant_accepts_a_mapping() {
        let mut registry = Registry::new();
        let f = registry.build(None);
        let values = Mapping::from([("a", 1), ("b", 2)]);
        registry.call_static(f, "constant", &[values.into()]).unwrap();
        assert_eq!(registry.constant(f, "a"), Some(1.into()));
        assert_eq!(registry.constant(f, "b"), Some(2.into()));
        assert_eq!(registry.statics(f).keys().len(), 6);
    }

    #[test]
    fn constant_accepts_an_object_as_mapping() {
        let mut registry = Registry::new();
        let f = registry.build(None);
        let values = Object::new(None);
        values.set("a", 1.into());
        values.define("hidden", 2.into(), false);
        registry.call_static(f, "constant", &[values.into()]).unwrap();
        assert_eq!(registry.constant(f, "a"), Some(1.into()));
        assert_eq!(registry.constant(f, "hidden"), None);
    }

    #[test]
    fn constant_token_keys_are_concealed() {
        let mut registry = Registry::new();
        let f = registry.build(None);
        let t = Token::create();
        registry.call_static(f, "constant", &[t.clone().into(), "v".into()]).unwrap();
        assert_eq!(registry.call_static(f, "constant", &[t.clone().into()]).unwrap(), "v".into());
        assert!(!registry.statics(f).keys().contains(t.name()));
    }

    #[test]
    fn constant_rejects_bad_keys() {
        let mut registry = Registry::new();
        let f = registry.build(None);
        let err = registry.call_static(f, "constant", &[1.into()]).unwrap_err();
        assert_eq!(err.to_string(), "no overload of `constant` accepts (function, number)");
        let err = registry.call_static(f, "constant", &[1.into(), 2.into()]).unwrap_err();
        assert_eq!(err.to_string(), "no overload of `define` accepts (object, number)");
    }

    #[test]
    fn instances_read_constants() {
        let mut registry = Registry::new();
        let f = registry.build(None);
        registry.set_constant(f, "X", 42);
        let i = registry.construct(f, &[]).unwrap();
        assert_eq!(registry.call_method(&i, "constant", &["X".into()]).unwrap(), 42.into());
        assert_eq!(registry.instance_constant(&i, "X"), Some(42.into()));
        assert!(registry.call_method(&i, "constant", &["X".into(), 1.into()]).is_err());
    }

    #[test]
    fn proto_single_and_bulk() {
        let mut registry = Registry::new();
        let f = registry.build(None);
        registry.call_static(f, "proto", &["p".into(), true.into()]).unwrap();
        registry.call_static(f, "proto", &[Mapping::from([("a", 1), ("b", 2)]).into()]).unwrap();
        let i = registry.construct(f, &[]).unwrap();
        assert_eq!(i.get("p"), Some(true.into()));
        assert_eq!(i.get("a"), Some(1.into()));
        assert_eq!(registry.prototype(f).keys(), ["constant", "p", "a", "b"].map(Name::from));
    }

    #[test]
    fn shared_stores_tokens() {
        let mut registry = Registry::new();
        let f = registry.build(None);
        let tokens = Mapping::from([("a", Token::create())]);
        let result = registry.call_static(f, "shared", &[tokens.clone().into()]).unwrap();
        assert_eq!(result, f.into());
        assert_eq!(registry.shared_tokens(f), Some(&tokens));
        assert!(registry.statics(f).get_own("a").is_none());
    }

    #[test]
    fn descend_forms() {
        let mut registry = Registry::new();
        let foo = registry.build(None);
        let tokens = Mapping::from([("a", Token::create())]);
        registry.shared(foo, tokens.clone());

        let bar = registry.call_static(foo, "descend", &[]).unwrap().as_type().unwrap();
        assert_eq!(registry.parent(bar), Some(foo));
        assert_eq!(registry.shared_tokens(bar), Some(&tokens));

        let plain = registry.define("Plain", |_, _, _| Ok(()));
        let result = registry.call_static(foo, "descend", &[plain.into()]).unwrap();
        assert_eq!(result, plain.into());
        assert_eq!(registry.state(plain), State::Linked);

        let own = Mapping::from([("b", 1)]);
        let baz = registry.call_static(foo, "descend", &[own.into()]).unwrap().as_type().unwrap();
        assert_eq!(registry.shared_tokens(baz).unwrap().len(), 2);

        let qux = registry.call_static(foo, "descend", &[Value::Null, Value::Undefined]).unwrap();
        assert_eq!(registry.parent(qux.as_type().unwrap()), Some(foo));

        let both = registry.define("Both", |_, _, _| Ok(()));
        let result = registry.call_static(foo, "descend", &[both.into(), Mapping::new().into()]).unwrap();
        assert_eq!(result, both.into());
        assert_eq!(registry.shared_tokens(both), Some(&tokens));
    }

    #[test]
    fn descend_rejects_non_constructors() {
        let mut registry = Registry::new();
        let foo = registry.build(None);
        let err = registry.call_static(foo, "descend", &[1.into()]).unwrap_err();
        assert!(matches!(err, Error::Dispatch { .. }));
        let native = registry.statics(foo).get_own("proto").unwrap();
        let err = registry.call_static(foo, "descend", &[native]).unwrap_err();
        assert_eq!(err.to_string(), "a function is not a constructor");
    }

    #[test]
    fn helpers_work_on_descendants() {
        let mut registry = Registry::new();
        let foo = registry.build(None);
        registry.call_static(foo, "constant", &["K".into(), 1.into()]).unwrap();
        let bar = registry.call_static(foo, "descend", &[]).unwrap().as_type().unwrap();
        assert_eq!(registry.call_static(bar, "constant", &["K".into()]).unwrap(), 1.into());
        registry.call_static(bar, "constant", &["K".into(), 2.into()]).unwrap();
        assert_eq!(registry.call_static(bar, "constant", &["K".into()]).unwrap(), 2.into());
        assert_eq!(registry.call_static(foo, "constant", &["K".into()]).unwrap(), 1.into());
    }
}
