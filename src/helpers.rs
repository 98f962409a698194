/// Implement [Injectable](crate::Injectable) for a type from the list of its constructors.
///
/// Each constructor is a function (or closure with typed parameters) returning the type.
/// All its parameters are resolved from the provider when the constructor is selected.
///
/// ```
/// # use std::sync::Arc;
/// # use tsumiki::*;
/// #[derive(Default)]
/// struct Clock;
///
/// struct Scheduler {
///     clock: Option<Arc<Clock>>,
/// }
///
/// impl Scheduler {
///     fn new() -> Self {
///         Self { clock: None }
///     }
///
///     fn with_clock(clock: Arc<Clock>) -> Self {
///         Self { clock: Some(clock) }
///     }
/// }
///
/// injectable!(Clock => Clock::default);
/// injectable!(Scheduler => Scheduler::new, Scheduler::with_clock);
/// ```
#[macro_export]
macro_rules! injectable {
    ($Type:ty => $($constructor:expr),+ $(,)?) => {
        impl $crate::Injectable for $Type {
            fn constructors() -> ::std::vec::Vec<$crate::Constructor<Self>> {
                ::std::vec![$($crate::Constructor::new($constructor)),+]
            }
        }
    };
}

/// Declare that a concrete type satisfies trait-object contracts.
///
/// For each listed trait, this macro implements ```From<$Concrete>``` for ```Arc<dyn $Trait>```,
/// which lets the concrete type be registered as the implementation of this contract.
///
/// ```
/// # use std::sync::Arc;
/// # use tsumiki::*;
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// #[derive(Default)]
/// struct English;
///
/// impl Greeter for English {
///     fn greet(&self) -> String {
///         "hello".into()
///     }
/// }
///
/// injectable!(English => English::default);
/// implements!(English => dyn Greeter);
///
/// # fn main() -> Result<(), ResolveError> {
/// let mut services = ServiceCollection::new();
/// services.add_transient::<Arc<dyn Greeter>, English>();
/// let provider = services.build()?;
/// let greeter: Arc<dyn Greeter> = provider.get_required()?;
/// assert_eq!(greeter.greet(), "hello");
/// # Ok(())
/// # }
/// ```
#[macro_export]
macro_rules! implements {
    ($Concrete:ty => $($Contract:ty),+ $(,)?) => {
        $(
        impl ::std::convert::From<$Concrete> for ::std::sync::Arc<$Contract> {
            fn from(value: $Concrete) -> Self {
                ::std::sync::Arc::new(value)
            }
        }
        )+
    };
}
