use std::fmt;
use std::sync::Arc;

use crate::inject::{Blueprint, Injectable};
use crate::key::{ServiceKey, TypeKey};
use crate::resolve::{Object, Resolve, ResolveError};

/// Policy governing the reuse of instances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceLifetime {
    /// A single instance per provider, created on first use
    Singleton,
    /// A single instance per scope, released with the scope
    Scoped,
    /// A new instance for every request
    Transient,
}

pub(crate) type FactoryFn = Arc<dyn Fn(&dyn Resolve) -> Result<Object, ResolveError> + Send + Sync>;

pub(crate) type Finalizer = Arc<dyn Fn(&Object) + Send + Sync>;

/// How instances of a registration are produced
#[derive(Clone)]
pub(crate) enum Source {
    Instance(Object),
    Factory(FactoryFn),
    Implementation(Blueprint),
    /// No explicit source: the contract type builds itself
    Contract(Blueprint),
}

/// Immutable record of one registration.
///
/// A descriptor binds a contract type to a lifetime and to exactly one production source:
/// a pre-built instance, a factory, an implementation type, or the contract type itself.
#[derive(Clone)]
pub struct ServiceDescriptor {
    contract: TypeKey,
    lifetime: ServiceLifetime,
    name: Option<String>,
    source: Source,
    finalizer: Option<Finalizer>,
}

impl ServiceDescriptor {
    fn new(contract: TypeKey, lifetime: ServiceLifetime, source: Source) -> Self {
        Self {
            contract,
            lifetime,
            name: None,
            source,
            finalizer: None,
        }
    }

    /// Register a pre-built instance.
    ///
    /// The instance is never rebuilt: every activation returns (a clone of) this value,
    /// whatever the declared lifetime.
    pub fn instance<C: Send + Sync + 'static>(lifetime: ServiceLifetime, instance: C) -> Self {
        Self::new(
            TypeKey::of::<C>(),
            lifetime,
            Source::Instance(Arc::new(instance)),
        )
    }

    /// Register a factory function.
    ///
    /// The factory receives the current resolver and can use it to obtain further dependencies.
    pub fn factory<C, F>(lifetime: ServiceLifetime, factory: F) -> Self
    where
        C: Send + Sync + 'static,
        F: Fn(&dyn Resolve) -> Result<C, ResolveError> + Send + Sync + 'static,
    {
        let factory: FactoryFn = Arc::new(
            move |resolver: &dyn Resolve| -> Result<Object, ResolveError> {
                Ok(Arc::new(factory(resolver)?) as Object)
            },
        );
        Self::new(TypeKey::of::<C>(), lifetime, Source::Factory(factory))
    }

    /// Register an implementation type, built by constructor injection and converted to the contract.
    pub fn implementation<C, I>(lifetime: ServiceLifetime) -> Self
    where
        C: Send + Sync + 'static,
        I: Injectable + Into<C>,
    {
        Self::new(
            TypeKey::of::<C>(),
            lifetime,
            Source::Implementation(Blueprint::of::<C, I>()),
        )
    }

    /// Register a contract type which is built by constructor injection itself.
    pub fn contract<C: Injectable>(lifetime: ServiceLifetime) -> Self {
        Self::new(
            TypeKey::of::<C>(),
            lifetime,
            Source::Contract(Blueprint::of::<C, C>()),
        )
    }

    /// Turn this registration into a named one.
    ///
    /// Named registrations are only found by lookups carrying the same name.
    /// Singletons are always stored as unnamed registrations.
    pub fn with_name(mut self, name: impl Into<String>) -> Result<Self, ResolveError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ResolveError::InvalidArgument("service name must not be blank"));
        }
        self.name = Some(name);
        Ok(self)
    }

    /// Attach a teardown hook, called on scoped instances when their scope is disposed.
    ///
    /// The hook must accept the contract type of the registration.
    pub fn on_dispose<C: 'static>(
        mut self,
        hook: impl Fn(&C) + Send + Sync + 'static,
    ) -> Result<Self, ResolveError> {
        if TypeKey::of::<C>() != self.contract {
            return Err(ResolveError::InvalidArgument(
                "disposal hook must accept the contract type",
            ));
        }
        self.finalizer = Some(Arc::new(move |object: &Object| {
            if let Some(instance) = object.downcast_ref::<C>() {
                hook(instance);
            }
        }));
        Ok(self)
    }

    pub fn contract_type(&self) -> TypeKey {
        self.contract
    }

    pub fn lifetime(&self) -> ServiceLifetime {
        self.lifetime
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn implementation_type(&self) -> Option<TypeKey> {
        match &self.source {
            Source::Implementation(blueprint) => Some(blueprint.target()),
            _ => None,
        }
    }

    pub fn has_instance(&self) -> bool {
        matches!(self.source, Source::Instance(_))
    }

    pub fn has_factory(&self) -> bool {
        matches!(self.source, Source::Factory(_))
    }

    pub fn has_implementation_type(&self) -> bool {
        matches!(self.source, Source::Implementation(_))
    }

    pub fn is_named(&self) -> bool {
        self.name.is_some()
    }

    /// Key under which the provider stores this registration.
    pub fn service_key(&self) -> ServiceKey {
        match (&self.name, self.lifetime) {
            (Some(name), ServiceLifetime::Scoped | ServiceLifetime::Transient) => {
                ServiceKey::Named(self.contract, name.clone())
            }
            _ => ServiceKey::Unnamed(self.contract),
        }
    }

    pub(crate) fn source(&self) -> &Source {
        &self.source
    }

    pub(crate) fn finalizer(&self) -> Option<&Finalizer> {
        self.finalizer.as_ref()
    }

    pub(crate) fn blueprint(&self) -> Option<&Blueprint> {
        match &self.source {
            Source::Implementation(blueprint) | Source::Contract(blueprint) => Some(blueprint),
            _ => None,
        }
    }
}

impl fmt::Debug for ServiceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = match &self.source {
            Source::Instance(_) => "instance".to_string(),
            Source::Factory(_) => "factory".to_string(),
            Source::Implementation(blueprint) => blueprint.target().name().to_string(),
            Source::Contract(_) => "self".to_string(),
        };
        f.debug_struct("ServiceDescriptor")
            .field("contract", &self.contract.name())
            .field("lifetime", &self.lifetime)
            .field("name", &self.name)
            .field("source", &source)
            .finish()
    }
}
