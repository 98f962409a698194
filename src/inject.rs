use std::sync::Arc;

use crate::key::TypeKey;
use crate::resolve::{downcast, Object, ResolveError};

/// Mark a type as constructible by automatic injection.
///
/// Rust has no runtime reflection: injectable types describe their constructors explicitly,
/// in declaration order. The [injectable](crate::injectable) macro implements this trait
/// from a list of constructor functions.
pub trait Injectable: Sized + Send + Sync + 'static {
    fn constructors() -> Vec<Constructor<Self>>;
}

/// Shared instances are built with the constructors of the inner type
impl<T: Injectable> Injectable for Arc<T> {
    fn constructors() -> Vec<Constructor<Self>> {
        T::constructors()
            .into_iter()
            .map(|c| c.map(Arc::new))
            .collect()
    }
}

type InvokeFn<T> = Arc<dyn Fn(&mut Arguments) -> Result<T, ResolveError> + Send + Sync>;

/// A constructor: the ordered list of its parameter types and a function building
/// the target value once all parameters are resolved.
pub struct Constructor<T> {
    parameters: Vec<TypeKey>,
    invoke: InvokeFn<T>,
}

impl<T: 'static> Constructor<T> {
    /// Describe a constructor from a function taking up to 10 injected parameters.
    pub fn new<Args: 'static, F: ConstructorFn<Args, T>>(f: F) -> Self {
        Self {
            parameters: F::parameters(),
            invoke: Arc::new(move |args: &mut Arguments| f.construct(args)),
        }
    }

    /// Transform the constructed value, keeping the same parameters.
    pub fn map<U: 'static>(self, f: impl Fn(T) -> U + Send + Sync + 'static) -> Constructor<U> {
        let invoke = self.invoke;
        Constructor {
            parameters: self.parameters,
            invoke: Arc::new(move |args: &mut Arguments| invoke(args).map(&f)),
        }
    }

    /// Call the constructor with resolved arguments, in parameter order.
    pub(crate) fn call(&self, arguments: Vec<Object>) -> Result<T, ResolveError> {
        (self.invoke)(&mut Arguments(arguments.into_iter()))
    }
}

impl<T> Constructor<T> {
    pub fn parameters(&self) -> &[TypeKey] {
        &self.parameters
    }

    pub fn arity(&self) -> usize {
        self.parameters.len()
    }
}

impl<T> Clone for Constructor<T> {
    fn clone(&self) -> Self {
        Self {
            parameters: self.parameters.clone(),
            invoke: self.invoke.clone(),
        }
    }
}

/// Resolved arguments of a constructor call, consumed in parameter order.
pub struct Arguments(std::vec::IntoIter<Object>);

impl Arguments {
    pub fn take<P: Clone + 'static>(&mut self) -> Result<P, ResolveError> {
        match self.0.next() {
            Some(object) => downcast(&object),
            None => Err(ResolveError::TypeMismatch {
                expected: std::any::type_name::<P>(),
            }),
        }
    }
}

/// A function usable as a [Constructor].
///
/// This trait is implemented for all functions with up to 10 arguments, using a tuple to
/// wrap their parameter types in a single type.
pub trait ConstructorFn<Args, T>: Send + Sync + 'static {
    fn parameters() -> Vec<TypeKey>;
    fn construct(&self, args: &mut Arguments) -> Result<T, ResolveError>;
}

macro_rules! constructor_tuple ({ $($param:ident)* } => {
    impl<Func, T, $($param,)*> ConstructorFn<($($param,)*), T> for Func
    where
        Func: Fn($($param),*) -> T + Send + Sync + 'static,
        $($param: Clone + Send + Sync + 'static,)*
    {
        #[inline]
        fn parameters() -> Vec<TypeKey> {
            vec![$(TypeKey::of::<$param>()),*]
        }

        #[inline]
        #[allow(non_snake_case, unused_variables)]
        fn construct(&self, args: &mut Arguments) -> Result<T, ResolveError> {
            $(let $param = args.take::<$param>()?;)*
            Ok((self)($($param),*))
        }
    }
});

constructor_tuple! {}
constructor_tuple! { A }
constructor_tuple! { A B }
constructor_tuple! { A B C }
constructor_tuple! { A B C D }
constructor_tuple! { A B C D E }
constructor_tuple! { A B C D E F }
constructor_tuple! { A B C D E F G }
constructor_tuple! { A B C D E F G H }
constructor_tuple! { A B C D E F G H I }
constructor_tuple! { A B C D E F G H I J }

/// Erased constructors of an implementation type, producing instances of a contract type.
#[derive(Clone)]
pub(crate) struct Blueprint {
    target: TypeKey,
    constructors: Vec<Constructor<Object>>,
}

impl Blueprint {
    /// Build instances of `C` by constructing `I` and converting it.
    pub(crate) fn of<C, I>() -> Self
    where
        C: Send + Sync + 'static,
        I: Injectable + Into<C>,
    {
        let constructors = I::constructors()
            .into_iter()
            .map(|c| {
                c.map(|value: I| {
                    let contract: C = value.into();
                    Arc::new(contract) as Object
                })
            })
            .collect();
        Self {
            target: TypeKey::of::<I>(),
            constructors,
        }
    }

    pub(crate) fn target(&self) -> TypeKey {
        self.target
    }

    pub(crate) fn constructors(&self) -> &[Constructor<Object>] {
        &self.constructors
    }
}
