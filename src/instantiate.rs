//! Automatic constructor selection and invocation.

use tracing::trace;

use crate::inject::Constructor;
use crate::key::ServiceKey;
use crate::resolve::{required, Resolve, ResolveError};

/// Select the constructor used to build a type.
///
/// A single constructor is used unconditionally: missing parameters will surface when resolving them.
/// Otherwise the constructor with the most parameters among those whose parameters are all
/// registered wins. Ties keep the declaration order.
pub(crate) fn select<'c, T>(
    target: &'static str,
    constructors: &'c [Constructor<T>],
    is_registered: impl Fn(&ServiceKey) -> bool,
) -> Result<&'c Constructor<T>, ResolveError> {
    if let [single] = constructors {
        return Ok(single);
    }

    let mut feasible: Vec<&Constructor<T>> = constructors
        .iter()
        .filter(|c| {
            c.parameters()
                .iter()
                .all(|p| is_registered(&ServiceKey::Unnamed(*p)))
        })
        .collect();
    // stable sort
    feasible.sort_by(|a, b| b.arity().cmp(&a.arity()));

    feasible
        .into_iter()
        .next()
        .ok_or(ResolveError::NoSuitableConstructor(target))
}

/// Resolve all parameters of a constructor and call it.
pub(crate) fn invoke<R, T>(resolver: &R, constructor: &Constructor<T>) -> Result<T, ResolveError>
where
    R: Resolve + ?Sized,
    T: 'static,
{
    let arguments = constructor
        .parameters()
        .iter()
        .map(|p| required(resolver, ServiceKey::Unnamed(*p)))
        .collect::<Result<Vec<_>, _>>()?;
    constructor.call(arguments)
}

/// Select a constructor among the candidates and invoke it.
pub(crate) fn instantiate<R, T>(
    resolver: &R,
    target: &'static str,
    constructors: &[Constructor<T>],
) -> Result<T, ResolveError>
where
    R: Resolve + ?Sized,
    T: 'static,
{
    let constructor = select(target, constructors, |key| resolver.is_registered(key))?;
    trace!(target_type = target, arity = constructor.arity(), "selected constructor");
    invoke(resolver, constructor)
}
