use crate::descriptor::{ServiceDescriptor, ServiceLifetime};
use crate::inject::Injectable;
use crate::key::ServiceKey;
use crate::provider::{ProviderOptions, ServiceProvider};
use crate::resolve::{Resolve, ResolveError};

/// Ordered list of registrations, frozen into a [ServiceProvider] by [ServiceCollection::build].
///
/// The order only matters to report duplicates: two registrations sharing a key make the build fail.
#[derive(Clone, Debug, Default)]
pub struct ServiceCollection {
    descriptors: Vec<ServiceDescriptor>,
}

impl ServiceCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ServiceDescriptor> {
        self.descriptors.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ServiceDescriptor> {
        self.descriptors.iter()
    }

    pub fn add(&mut self, descriptor: ServiceDescriptor) -> &mut Self {
        self.descriptors.push(descriptor);
        self
    }

    /// Insert a registration at the given position, shifting the following ones.
    ///
    /// Panics if `index > len`.
    pub fn insert(&mut self, index: usize, descriptor: ServiceDescriptor) {
        self.descriptors.insert(index, descriptor);
    }

    /// Remove the registration at the given position.
    ///
    /// Panics if `index >= len`.
    pub fn remove(&mut self, index: usize) -> ServiceDescriptor {
        self.descriptors.remove(index)
    }

    /// Check if a registration would be stored under this key
    pub fn contains(&self, key: &ServiceKey) -> bool {
        self.descriptors.iter().any(|d| &d.service_key() == key)
    }

    /// Add the registration unless another one uses the same key.
    ///
    /// Returns `true` if the registration was added.
    pub fn try_add(&mut self, descriptor: ServiceDescriptor) -> bool {
        if self.contains(&descriptor.service_key()) {
            return false;
        }
        self.descriptors.push(descriptor);
        true
    }

    pub fn add_singleton<C, I>(&mut self) -> &mut Self
    where
        C: Send + Sync + 'static,
        I: Injectable + Into<C>,
    {
        self.add(ServiceDescriptor::implementation::<C, I>(ServiceLifetime::Singleton))
    }

    pub fn add_singleton_with<C, F>(&mut self, factory: F) -> &mut Self
    where
        C: Send + Sync + 'static,
        F: Fn(&dyn Resolve) -> Result<C, ResolveError> + Send + Sync + 'static,
    {
        self.add(ServiceDescriptor::factory(ServiceLifetime::Singleton, factory))
    }

    pub fn add_singleton_instance<C: Send + Sync + 'static>(&mut self, instance: C) -> &mut Self {
        self.add(ServiceDescriptor::instance(ServiceLifetime::Singleton, instance))
    }

    pub fn add_scoped<C, I>(&mut self) -> &mut Self
    where
        C: Send + Sync + 'static,
        I: Injectable + Into<C>,
    {
        self.add(ServiceDescriptor::implementation::<C, I>(ServiceLifetime::Scoped))
    }

    pub fn add_scoped_with<C, F>(&mut self, factory: F) -> &mut Self
    where
        C: Send + Sync + 'static,
        F: Fn(&dyn Resolve) -> Result<C, ResolveError> + Send + Sync + 'static,
    {
        self.add(ServiceDescriptor::factory(ServiceLifetime::Scoped, factory))
    }

    pub fn add_transient<C, I>(&mut self) -> &mut Self
    where
        C: Send + Sync + 'static,
        I: Injectable + Into<C>,
    {
        self.add(ServiceDescriptor::implementation::<C, I>(ServiceLifetime::Transient))
    }

    pub fn add_transient_with<C, F>(&mut self, factory: F) -> &mut Self
    where
        C: Send + Sync + 'static,
        F: Fn(&dyn Resolve) -> Result<C, ResolveError> + Send + Sync + 'static,
    {
        self.add(ServiceDescriptor::factory(ServiceLifetime::Transient, factory))
    }

    pub fn add_named_scoped<C, I>(&mut self, name: &str) -> Result<&mut Self, ResolveError>
    where
        C: Send + Sync + 'static,
        I: Injectable + Into<C>,
    {
        let descriptor = ServiceDescriptor::implementation::<C, I>(ServiceLifetime::Scoped).with_name(name)?;
        Ok(self.add(descriptor))
    }

    pub fn add_named_scoped_with<C, F>(&mut self, name: &str, factory: F) -> Result<&mut Self, ResolveError>
    where
        C: Send + Sync + 'static,
        F: Fn(&dyn Resolve) -> Result<C, ResolveError> + Send + Sync + 'static,
    {
        let descriptor = ServiceDescriptor::factory(ServiceLifetime::Scoped, factory).with_name(name)?;
        Ok(self.add(descriptor))
    }

    pub fn add_named_transient<C, I>(&mut self, name: &str) -> Result<&mut Self, ResolveError>
    where
        C: Send + Sync + 'static,
        I: Injectable + Into<C>,
    {
        let descriptor = ServiceDescriptor::implementation::<C, I>(ServiceLifetime::Transient).with_name(name)?;
        Ok(self.add(descriptor))
    }

    pub fn add_named_transient_with<C, F>(&mut self, name: &str, factory: F) -> Result<&mut Self, ResolveError>
    where
        C: Send + Sync + 'static,
        F: Fn(&dyn Resolve) -> Result<C, ResolveError> + Send + Sync + 'static,
    {
        let descriptor = ServiceDescriptor::factory(ServiceLifetime::Transient, factory).with_name(name)?;
        Ok(self.add(descriptor))
    }

    /// Freeze the registrations into a provider with default options.
    pub fn build(self) -> Result<ServiceProvider, ResolveError> {
        self.build_with(ProviderOptions::default())
    }

    pub fn build_with(self, options: ProviderOptions) -> Result<ServiceProvider, ResolveError> {
        ServiceProvider::build(self.descriptors, options)
    }
}

impl FromIterator<ServiceDescriptor> for ServiceCollection {
    fn from_iter<T: IntoIterator<Item = ServiceDescriptor>>(iter: T) -> Self {
        Self {
            descriptors: iter.into_iter().collect(),
        }
    }
}

impl Extend<ServiceDescriptor> for ServiceCollection {
    fn extend<T: IntoIterator<Item = ServiceDescriptor>>(&mut self, iter: T) {
        self.descriptors.extend(iter);
    }
}

impl IntoIterator for ServiceCollection {
    type Item = ServiceDescriptor;
    type IntoIter = std::vec::IntoIter<ServiceDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.descriptors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ServiceCollection {
    type Item = &'a ServiceDescriptor;
    type IntoIter = std::slice::Iter<'a, ServiceDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.descriptors.iter()
    }
}
