//! Traits and errors supporting the resolution of services
//!
//! * The [Resolve] trait is the object-safe core of the resolution mechanism: it activates the
//!   registration matching a [ServiceKey] and returns the erased [Object].
//!   It is implemented by the service provider, its scopes, and the resolver handed to factories.
//! * The [ResolveExt] trait is implemented for all resolvers (including `dyn Resolve`) and
//!   provides the typed API: optional and required lookups, and automatic constructor injection.

use std::any::{type_name, Any};
use std::sync::Arc;

use thiserror::Error;
use tracing::warn;

use crate::inject::{Constructor, Injectable};
use crate::instantiate;
use crate::key::ServiceKey;

/// Type-erased service instance.
///
/// A registration for a contract type `C` always stores a value of type `C`.
pub type Object = Arc<dyn Any + Send + Sync>;

/// Errors triggered during registration and resolution
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),
    #[error("Duplicate registration for {0}")]
    DuplicateRegistration(ServiceKey),
    #[error("No registration found for {0}")]
    ServiceNotFound(ServiceKey),
    #[error("No constructor of {0} can be satisfied by the registered services")]
    NoSuitableConstructor(&'static str),
    #[error("Cyclic dependencies: {0} is already being activated")]
    CyclicResolution(ServiceKey),
    #[error("The service scope has been disposed")]
    ScopeDisposed,
    #[error("Unsupported operation: {0}")]
    Unsupported(String),
    #[error("Consistency error: expected an instance of {expected}")]
    TypeMismatch { expected: &'static str },
    #[error("Service construction failed: {0}")]
    Custom(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ResolveError {
    /// Wrap an error raised by a user-provided factory.
    pub fn custom(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        ResolveError::Custom(err.into())
    }
}

/// Activate registrations from their key.
pub trait Resolve {
    /// Activate the registration matching the key.
    ///
    /// Returns `Ok(None)` if nothing is registered under this key: absence is not an error.
    fn resolve_object(&self, key: &ServiceKey) -> Result<Option<Object>, ResolveError>;

    /// Check if a registration exists for the key, without activating it.
    fn is_registered(&self, key: &ServiceKey) -> bool;
}

/// Typed resolution API, available on every [Resolve] implementation.
pub trait ResolveExt: Resolve {
    /// Lookup primitive shared by the named and unnamed variants.
    fn get_keyed<T: Clone + 'static>(&self, key: &ServiceKey) -> Result<Option<T>, ResolveError> {
        self.resolve_object(key)?.map(|object| downcast(&object)).transpose()
    }

    /// Obtain an instance of the unnamed registration for `T`, if any.
    fn get<T: Clone + 'static>(&self) -> Result<Option<T>, ResolveError> {
        self.get_keyed(&ServiceKey::of::<T>())
    }

    /// Obtain an instance of the registration for `T` under the given name, if any.
    fn get_named<T: Clone + 'static>(&self, name: &str) -> Result<Option<T>, ResolveError> {
        self.get_keyed(&ServiceKey::named::<T>(name)?)
    }

    /// Obtain an instance of `T`, failing with [ResolveError::ServiceNotFound] if it is not registered.
    fn get_required<T: Clone + 'static>(&self) -> Result<T, ResolveError> {
        let key = ServiceKey::of::<T>();
        self.get_keyed(&key)?
            .ok_or(ResolveError::ServiceNotFound(key))
    }

    /// Named variant of [ResolveExt::get_required]
    fn get_required_named<T: Clone + 'static>(&self, name: &str) -> Result<T, ResolveError> {
        let key = ServiceKey::named::<T>(name)?;
        self.get_keyed(&key)?
            .ok_or(ResolveError::ServiceNotFound(key))
    }

    /// Obtain an instance of `T` if it can be activated.
    ///
    /// This never fails: activation errors are logged and reported as absence.
    fn try_get<T: Clone + 'static>(&self) -> Option<T> {
        try_keyed(self, &ServiceKey::of::<T>())
    }

    /// Named variant of [ResolveExt::try_get]
    fn try_get_named<T: Clone + 'static>(&self, name: &str) -> Option<T> {
        let key = ServiceKey::named::<T>(name).ok()?;
        try_keyed(self, &key)
    }

    /// Build a new instance of `T` by automatic constructor injection.
    ///
    /// A type with a single constructor always uses it. Otherwise, the constructor with
    /// the most parameters among those whose parameters are all registered is selected.
    fn instantiate<T: Injectable>(&self) -> Result<T, ResolveError> {
        instantiate::instantiate(self, type_name::<T>(), &T::constructors())
    }

    /// Build a new instance of `T` with an explicit constructor, resolving all its parameters.
    fn instantiate_with<T: 'static>(&self, constructor: &Constructor<T>) -> Result<T, ResolveError> {
        instantiate::invoke(self, constructor)
    }
}

impl<R: Resolve + ?Sized> ResolveExt for R {}

/// Activate a registration which must exist.
pub(crate) fn required<R: Resolve + ?Sized>(resolver: &R, key: ServiceKey) -> Result<Object, ResolveError> {
    match resolver.resolve_object(&key)? {
        Some(object) => Ok(object),
        None => Err(ResolveError::ServiceNotFound(key)),
    }
}

pub(crate) fn downcast<T: Clone + 'static>(object: &Object) -> Result<T, ResolveError> {
    object
        .downcast_ref::<T>()
        .cloned()
        .ok_or(ResolveError::TypeMismatch {
            expected: type_name::<T>(),
        })
}

fn try_keyed<R, T>(resolver: &R, key: &ServiceKey) -> Option<T>
where
    R: Resolve + ?Sized,
    T: Clone + 'static,
{
    match resolver.get_keyed(key) {
        Ok(found) => found,
        Err(err) => {
            warn!(service = %key, error = %err, "activation failed, reporting the service as absent");
            None
        }
    }
}
