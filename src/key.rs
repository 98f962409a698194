//! Keys identifying registrations in a service provider.

use std::any::{type_name, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::ResolveError;

/// Runtime identity of a Rust type.
///
/// Equality and hashing only consider the [TypeId], the name is kept for error messages and logs.
#[derive(Clone, Copy, Debug)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Lookup key of a registration.
///
/// Unnamed and named registrations share the same table: a named key is only
/// matched by a lookup carrying the same type and the same name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ServiceKey {
    Unnamed(TypeKey),
    Named(TypeKey, String),
}

impl ServiceKey {
    /// Key of the unnamed registration for `T`
    pub fn of<T: ?Sized + 'static>() -> Self {
        ServiceKey::Unnamed(TypeKey::of::<T>())
    }

    /// Key of the registration for `T` under the given name.
    ///
    /// Fails with [ResolveError::InvalidArgument] if the name is blank.
    pub fn named<T: ?Sized + 'static>(name: impl Into<String>) -> Result<Self, ResolveError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ResolveError::InvalidArgument("service name must not be blank"));
        }
        Ok(ServiceKey::Named(TypeKey::of::<T>(), name))
    }

    pub fn type_key(&self) -> TypeKey {
        match self {
            ServiceKey::Unnamed(t) | ServiceKey::Named(t, _) => *t,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            ServiceKey::Unnamed(_) => None,
            ServiceKey::Named(_, name) => Some(name),
        }
    }

    pub fn is_named(&self) -> bool {
        matches!(self, ServiceKey::Named(..))
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceKey::Unnamed(t) => write!(f, "{}", t),
            ServiceKey::Named(t, name) => write!(f, "{} named {:?}", t, name),
        }
    }
}
