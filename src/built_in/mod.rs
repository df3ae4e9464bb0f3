use super::model::{Name, Value, Native};
use super::{Overload, Registry, TypeId, Error, Result};

/// An implementation selected by an [`Overload`]. `args[0]` is the receiver.
type Method = fn(&mut Registry, &[Value]) -> Result<Value>;

/// Wraps `overload` in a [`Native`] that calls whichever [`Method`] accepts
/// its arguments.
fn dispatch(overload: Overload<Method>) -> Native {
    let name = overload.name().clone();
    Native::new(name, move |registry, args| {
        let method = *overload.resolve(registry, args)?;
        method(registry, args)
    })
}

/// Checks that `c` is a constructor.
fn constructor(c: &Value) -> Result<TypeId> {
    c.as_type().ok_or(Error::NotConstructor {kind: c.kind().as_str()})
}

/// Checks that `args` has length `N`.
fn unpack<'a, const N: usize>(name: &str, args: &'a [Value]) -> Result<&'a [Value; N]> {
    args.try_into().map_err(|_| Error::dispatch(name, args))
}

/// Constructs the `constant` method of instances of `ty`.
pub fn instance_constant(ty: TypeId) -> Native {
    Native::new("constant", move |registry, args| match args {
        [_, key] => registry.call_static(ty, "constant", std::slice::from_ref(key)),
        _ => Err(Error::dispatch("constant", args)),
    })
}

// ----------------------------------------------------------------------------

mod helpers;

/// Constructs the static helpers installed by [`Registry::build()`].
pub fn compile_helpers() -> Box<[(Name, Native)]> {
    helpers::HELPERS.iter().map(|(name, compile)| (Name::from(*name), dispatch(compile()))).collect()
}
