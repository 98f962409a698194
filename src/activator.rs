use tracing::debug;

use crate::descriptor::{ServiceDescriptor, ServiceLifetime, Source};
use crate::instantiate;
use crate::key::ServiceKey;
use crate::provider::Context;
use crate::resolve::{Object, Resolve, ResolveError};

/// Realize the lifetime policy of a registration.
///
/// Each activator is bound to one descriptor when the provider is built.
pub(crate) enum Activator {
    Singleton(ServiceDescriptor),
    Transient(ServiceDescriptor),
    Scoped(ServiceDescriptor),
}

impl Activator {
    pub(crate) fn new(descriptor: ServiceDescriptor) -> Self {
        match descriptor.lifetime() {
            ServiceLifetime::Singleton => Activator::Singleton(descriptor),
            ServiceLifetime::Transient => Activator::Transient(descriptor),
            ServiceLifetime::Scoped => Activator::Scoped(descriptor),
        }
    }

    pub(crate) fn descriptor(&self) -> &ServiceDescriptor {
        match self {
            Activator::Singleton(d) | Activator::Transient(d) | Activator::Scoped(d) => d,
        }
    }

    /// Obtain an instance, reusing a cached one when the lifetime allows it.
    pub(crate) fn activate(&self, key: &ServiceKey, context: &Context<'_>) -> Result<Object, ResolveError> {
        match self {
            Activator::Singleton(descriptor) => {
                // singletons never see the scope they are requested from
                let root = context.root();
                context.singletons().get_or_try_init(key, || {
                    let instance = produce(descriptor, &root)?;
                    debug!(service = %key, "created singleton");
                    Ok(instance)
                })
            }
            Activator::Transient(descriptor) => produce(descriptor, context),
            Activator::Scoped(descriptor) => {
                let scope = context.scope_for(key)?;
                scope.get_or_create(key, descriptor.finalizer(), || produce(descriptor, context))
            }
        }
    }
}

/// Run the production source of a registration.
///
/// A pre-built instance always wins, then the factory, then constructor injection.
pub(crate) fn produce(descriptor: &ServiceDescriptor, resolver: &dyn Resolve) -> Result<Object, ResolveError> {
    match descriptor.source() {
        Source::Instance(instance) => Ok(instance.clone()),
        Source::Factory(factory) => factory(resolver),
        Source::Implementation(blueprint) | Source::Contract(blueprint) => {
            instantiate::instantiate(resolver, blueprint.target().name(), blueprint.constructors())
        }
    }
}
