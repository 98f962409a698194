use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::cache::InstanceCache;
use crate::descriptor::Finalizer;
use crate::key::ServiceKey;
use crate::provider::{Context, ProviderCore, ServiceProvider};
use crate::resolve::{Object, Resolve, ResolveError};

/// Scoped instance awaiting disposal
struct Created {
    instance: Object,
    finalizer: Option<Finalizer>,
}

/// Instances owned by a scope.
#[derive(Default)]
pub(crate) struct ScopeState {
    instances: InstanceCache,
    created: Mutex<Vec<Created>>,
    disposed: AtomicBool,
}

impl ScopeState {
    pub(crate) fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    /// Obtain the instance of this scope for the key, creating it on first request.
    pub(crate) fn get_or_create(
        &self,
        key: &ServiceKey,
        finalizer: Option<&Finalizer>,
        create: impl FnOnce() -> Result<Object, ResolveError>,
    ) -> Result<Object, ResolveError> {
        if self.is_disposed() {
            return Err(ResolveError::ScopeDisposed);
        }
        self.instances.get_or_try_init(key, || {
            let instance = create()?;
            let mut created = self.created.lock();
            // disposed while the instance was being built: tear it down right away
            if self.is_disposed() {
                drop(created);
                if let Some(finalizer) = finalizer {
                    finalizer(&instance);
                }
                return Err(ResolveError::ScopeDisposed);
            }
            created.push(Created {
                instance: instance.clone(),
                finalizer: finalizer.cloned(),
            });
            Ok(instance)
        })
    }

    /// Release all instances, running disposal hooks in reverse creation order.
    ///
    /// Returns the number of released instances, zero if the scope was already disposed.
    fn release(&self) -> usize {
        let created = {
            let mut created = self.created.lock();
            if self.disposed.swap(true, Ordering::AcqRel) {
                return 0;
            }
            std::mem::take(&mut *created)
        };
        self.instances.clear();
        for entry in created.iter().rev() {
            if let Some(finalizer) = &entry.finalizer {
                finalizer(&entry.instance);
            }
        }
        created.len()
    }
}

impl Drop for ScopeState {
    fn drop(&mut self) {
        self.release();
    }
}

/// A bounded lifetime context for scoped services.
///
/// Scoped services resolved through a scope are created once and shared until the scope is disposed.
/// Singletons and transients behave as with the provider. Clones of a scope share the same instances,
/// and the scope is disposed when [ServiceScope::dispose] is called or when the last clone is dropped.
#[derive(Clone)]
pub struct ServiceScope {
    core: Arc<ProviderCore>,
    state: Arc<ScopeState>,
}

impl ServiceScope {
    pub(crate) fn new(core: Arc<ProviderCore>) -> Self {
        Self {
            core,
            state: Arc::default(),
        }
    }

    /// The provider this scope was created from
    pub fn provider(&self) -> ServiceProvider {
        ServiceProvider::from_core(self.core.clone())
    }

    /// Open a new, independent scope on the same provider
    pub fn create_scope(&self) -> ServiceScope {
        ServiceScope::new(self.core.clone())
    }

    /// End the scope and release its scoped instances.
    ///
    /// Further resolutions through this scope (or its clones) fail with [ResolveError::ScopeDisposed].
    pub fn dispose(&self) {
        let released = self.state.release();
        debug!(released, "scope disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.state.is_disposed()
    }

    /// Number of scoped instances currently held by the scope
    pub fn instance_count(&self) -> usize {
        self.state.instances.len()
    }

    fn context(&self) -> Context<'_> {
        Context::new(&self.core, &self.state)
    }
}

impl Resolve for ServiceScope {
    fn resolve_object(&self, key: &ServiceKey) -> Result<Option<Object>, ResolveError> {
        self.context().resolve_object(key)
    }

    fn is_registered(&self, key: &ServiceKey) -> bool {
        self.context().is_registered(key)
    }
}

impl fmt::Debug for ServiceScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceScope")
            .field("instances", &self.state.instances.len())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
