//! Runtime dependency injection with lifetimes, named registrations and automatic constructor injection.
//!
//! # Simple use case
//!
//! ```
//! # use std::sync::Arc;
//! # use tsumiki::*;
//! // Define traits and implementors
//! trait Logger: Send + Sync {
//!     fn log(&self, content: &str);
//! }
//!
//! trait Repository: Send + Sync {
//!     fn logger(&self) -> Arc<dyn Logger>;
//! }
//!
//! #[derive(Default)]
//! struct ConsoleLogger;
//!
//! impl Logger for ConsoleLogger {
//!     fn log(&self, content: &str) {
//!         println!("{}", content);
//!     }
//! }
//!
//! struct SqlRepository {
//!     logger: Arc<dyn Logger>,
//! }
//!
//! impl SqlRepository {
//!     fn new(logger: Arc<dyn Logger>) -> Self {
//!         Self { logger }
//!     }
//! }
//!
//! impl Repository for SqlRepository {
//!     fn logger(&self) -> Arc<dyn Logger> {
//!         self.logger.clone()
//!     }
//! }
//!
//! // Describe the constructors and the implemented contracts
//! injectable!(ConsoleLogger => ConsoleLogger::default);
//! injectable!(SqlRepository => SqlRepository::new);
//! implements!(ConsoleLogger => dyn Logger);
//! implements!(SqlRepository => dyn Repository);
//!
//! # fn main() -> Result<(), ResolveError> {
//! // Register the services and build the provider
//! let mut services = ServiceCollection::new();
//! services
//!     .add_singleton::<Arc<dyn Logger>, ConsoleLogger>()
//!     .add_transient::<Arc<dyn Repository>, SqlRepository>();
//! let provider = services.build()?;
//!
//! // Two distinct repositories sharing the same logger
//! let r1: Arc<dyn Repository> = provider.get_required()?;
//! let r2: Arc<dyn Repository> = provider.get_required()?;
//! assert!(!Arc::ptr_eq(&r1, &r2));
//! assert!(Arc::ptr_eq(&r1.logger(), &r2.logger()));
//! r1.logger().log("Hello world");
//! # Ok(())
//! # }
//! ```
//!
//! # Mechanism
//!
//! Registrations are collected as [ServiceDescriptor]s in a [ServiceCollection]. Each descriptor binds a
//! contract type to a [ServiceLifetime] and to one production source: a pre-built instance, a factory,
//! an implementation type, or the contract type itself. Building the collection freezes it into a
//! [ServiceProvider], failing if two registrations share the same [ServiceKey].
//!
//! * Contracts are the types requested by consumers, usually ```Arc<dyn Trait>``` or ```Arc<Concrete>```.
//!   Resolved values are clones of the stored contract value, so shared instances are the same ```Arc```.
//! * The [Injectable] trait replaces runtime reflection: a type lists its [Constructor]s and the parameter
//!   types they need. When a type has several constructors, the one with the most parameters among those
//!   whose parameters are all registered is selected.
//! * The [Resolve] trait is the object-safe core implemented by the provider, its scopes and the resolver
//!   handed to factories. The [ResolveExt] trait provides the typed API on top of it.
//! * Singletons are cached by the provider, scoped instances by each [ServiceScope], and both are built
//!   at most once even under concurrent first requests.

mod activator;
mod cache;
mod collection;
mod descriptor;
mod helpers;
mod inject;
mod instantiate;
mod key;
mod provider;
mod resolve;
mod scope;

pub use collection::ServiceCollection;
pub use descriptor::{ServiceDescriptor, ServiceLifetime};
pub use inject::{Arguments, Constructor, ConstructorFn, Injectable};
pub use key::{ServiceKey, TypeKey};
pub use provider::{ProviderOptions, ServiceProvider};
pub use resolve::{Object, Resolve, ResolveError, ResolveExt};
pub use scope::ServiceScope;
