//! The service provider: frozen registration table, singleton cache and resolution context.

use std::cell::RefCell;
use std::collections::hash_map::{Entry, HashMap};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, instrument, trace, warn};

use crate::activator::Activator;
use crate::cache::InstanceCache;
use crate::descriptor::{ServiceDescriptor, ServiceLifetime};
use crate::instantiate;
use crate::key::ServiceKey;
use crate::resolve::{Object, Resolve, ResolveError};
use crate::scope::{ScopeState, ServiceScope};

/// Options applied when building a [ServiceProvider]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderOptions {
    /// Refuse to activate scoped services outside of a scope.
    ///
    /// When disabled, the provider owns an implicit root scope and scoped services
    /// requested from the provider itself live as long as the provider.
    pub validate_scopes: bool,
    /// Check at build time that every registration built by constructor injection
    /// has a usable constructor with registered parameters, and with `validate_scopes`,
    /// that no singleton reaches a scoped service directly or through transient ones.
    pub validate_on_build: bool,
}

impl Default for ProviderOptions {
    fn default() -> Self {
        Self {
            validate_scopes: true,
            validate_on_build: false,
        }
    }
}

pub(crate) struct ProviderCore {
    services: HashMap<ServiceKey, Activator>,
    singletons: InstanceCache,
    root_scope: ScopeState,
    options: ProviderOptions,
}

/// Resolve services from a frozen set of registrations.
///
/// The provider is cheap to clone and can be shared between threads:
/// clones share the same registrations and singleton instances.
#[derive(Clone)]
pub struct ServiceProvider {
    core: Arc<ProviderCore>,
}

impl ServiceProvider {
    /// Build a provider from an ordered list of registrations.
    ///
    /// Fails with [ResolveError::DuplicateRegistration] if two registrations share the same key.
    #[instrument(skip_all, name = "provider_build")]
    pub fn build(
        descriptors: impl IntoIterator<Item = ServiceDescriptor>,
        options: ProviderOptions,
    ) -> Result<Self, ResolveError> {
        let mut services = HashMap::new();
        let mut order = Vec::new();
        for descriptor in descriptors {
            if descriptor.is_named() && descriptor.lifetime() == ServiceLifetime::Singleton {
                warn!(
                    service = %descriptor.contract_type(),
                    name = ?descriptor.name(),
                    "singletons are not named, registering as unnamed"
                );
            }
            match services.entry(descriptor.service_key()) {
                Entry::Occupied(o) => {
                    return Err(ResolveError::DuplicateRegistration(o.key().clone()));
                }
                Entry::Vacant(v) => {
                    trace!(service = %v.key(), lifetime = ?descriptor.lifetime(), "registered");
                    order.push(v.key().clone());
                    v.insert(Activator::new(descriptor));
                }
            }
        }

        if options.validate_on_build {
            validate(&services, &order, options)?;
        }

        debug!(services = services.len(), "service provider built");
        Ok(Self {
            core: Arc::new(ProviderCore {
                services,
                singletons: InstanceCache::default(),
                root_scope: ScopeState::default(),
                options,
            }),
        })
    }

    /// Open a new scope: scoped services resolved through it are shared until it is disposed.
    pub fn create_scope(&self) -> ServiceScope {
        ServiceScope::new(self.core.clone())
    }

    pub fn options(&self) -> ProviderOptions {
        self.core.options
    }

    /// Number of registrations
    pub fn service_count(&self) -> usize {
        self.core.services.len()
    }

    /// Number of singletons built so far
    pub fn singleton_count(&self) -> usize {
        self.core.singletons.len()
    }

    pub(crate) fn from_core(core: Arc<ProviderCore>) -> Self {
        Self { core }
    }

    fn context(&self) -> Context<'_> {
        Context {
            core: &self.core,
            scope: None,
        }
    }
}

impl Resolve for ServiceProvider {
    fn resolve_object(&self, key: &ServiceKey) -> Result<Option<Object>, ResolveError> {
        self.context().resolve_object(key)
    }

    fn is_registered(&self, key: &ServiceKey) -> bool {
        self.context().is_registered(key)
    }
}

impl fmt::Debug for ServiceProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceProvider")
            .field("services", &self.core.services.len())
            .field("singletons", &self.core.singletons.len())
            .field("options", &self.core.options)
            .finish()
    }
}

fn validate(
    services: &HashMap<ServiceKey, Activator>,
    order: &[ServiceKey],
    options: ProviderOptions,
) -> Result<(), ResolveError> {
    for (key, activator) in order.iter().filter_map(|k| services.get(k).map(|a| (k, a))) {
        dependencies(services, activator)?;
        if options.validate_scopes && matches!(activator, Activator::Singleton(_)) {
            if let Some(scoped) = captured_scope(services, activator, &mut HashSet::new())? {
                return Err(ResolveError::Unsupported(format!(
                    "singleton {} depends on scoped {}",
                    key, scoped
                )));
            }
        }
    }
    Ok(())
}

/// Parameters of the constructor selected for a registration.
///
/// Instances and factories are opaque and report no dependency.
fn dependencies(
    services: &HashMap<ServiceKey, Activator>,
    activator: &Activator,
) -> Result<Vec<ServiceKey>, ResolveError> {
    let Some(blueprint) = activator.descriptor().blueprint() else {
        return Ok(Vec::new());
    };
    let constructor = instantiate::select(
        blueprint.target().name(),
        blueprint.constructors(),
        |key| services.contains_key(key),
    )?;
    constructor
        .parameters()
        .iter()
        .map(|parameter| {
            let dependency = ServiceKey::Unnamed(*parameter);
            if services.contains_key(&dependency) {
                Ok(dependency)
            } else {
                Err(ResolveError::ServiceNotFound(dependency))
            }
        })
        .collect()
}

/// First scoped registration reached from the dependencies of an activator,
/// following transient registrations. Singletons are checked on their own.
fn captured_scope(
    services: &HashMap<ServiceKey, Activator>,
    activator: &Activator,
    visited: &mut HashSet<ServiceKey>,
) -> Result<Option<ServiceKey>, ResolveError> {
    for dependency in dependencies(services, activator)? {
        if !visited.insert(dependency.clone()) {
            continue;
        }
        match services.get(&dependency) {
            Some(Activator::Scoped(_)) => return Ok(Some(dependency)),
            Some(transient @ Activator::Transient(_)) => {
                if let Some(scoped) = captured_scope(services, transient, visited)? {
                    return Ok(Some(scoped));
                }
            }
            _ => {}
        }
    }
    Ok(None)
}

/// Resolution context: the provider, and the scope the request comes from, if any.
///
/// This is the resolver handed to factories and used for nested dependencies.
#[derive(Clone, Copy)]
pub(crate) struct Context<'a> {
    core: &'a ProviderCore,
    scope: Option<&'a ScopeState>,
}

impl<'a> Context<'a> {
    pub(crate) fn new(core: &'a ProviderCore, scope: &'a ScopeState) -> Self {
        Self {
            core,
            scope: Some(scope),
        }
    }

    /// Same provider, without the scope
    pub(crate) fn root(&self) -> Context<'a> {
        Context {
            core: self.core,
            scope: None,
        }
    }

    pub(crate) fn singletons(&self) -> &'a InstanceCache {
        &self.core.singletons
    }

    /// Scope holding the scoped instances for this request
    pub(crate) fn scope_for(&self, key: &ServiceKey) -> Result<&'a ScopeState, ResolveError> {
        match self.scope {
            Some(scope) => Ok(scope),
            None if !self.core.options.validate_scopes => Ok(&self.core.root_scope),
            None => Err(ResolveError::Unsupported(format!(
                "scoped service {} requested outside of a scope",
                key
            ))),
        }
    }
}

impl Resolve for Context<'_> {
    fn resolve_object(&self, key: &ServiceKey) -> Result<Option<Object>, ResolveError> {
        if self.scope.is_some_and(ScopeState::is_disposed) {
            return Err(ResolveError::ScopeDisposed);
        }
        let Some(activator) = self.core.services.get(key) else {
            return Ok(None);
        };
        let _guard = ResolutionGuard::enter(self.core, key)?;
        trace!(service = %key, "activating");
        activator.activate(key, self).map(Some)
    }

    fn is_registered(&self, key: &ServiceKey) -> bool {
        self.core.services.contains_key(key)
    }
}

thread_local! {
    /// Registrations being activated on this thread, with the address of their provider
    static RESOLVING: RefCell<Vec<(usize, ServiceKey)>> = RefCell::new(Vec::new());
}

/// Track an activation in progress on the current thread to detect cycles.
struct ResolutionGuard;

impl ResolutionGuard {
    fn enter(core: &ProviderCore, key: &ServiceKey) -> Result<Self, ResolveError> {
        let owner = core as *const ProviderCore as usize;
        RESOLVING.with(|stack| {
            let mut stack = stack.borrow_mut();
            if stack.iter().any(|(o, k)| *o == owner && k == key) {
                return Err(ResolveError::CyclicResolution(key.clone()));
            }
            stack.push((owner, key.clone()));
            Ok(ResolutionGuard)
        })
    }
}

impl Drop for ResolutionGuard {
    fn drop(&mut self) {
        RESOLVING.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}
