use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// A handler instance as handed out by a [`BeanProvider`]
pub type Bean = Arc<dyn Any + Send + Sync>;

/// Type descriptor of a handler-owning bean
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BeanType {
    id: TypeId,
    name: &'static str,
}

impl BeanType {
    #[must_use]
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    #[must_use]
    pub fn id(&self) -> TypeId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for BeanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BeanType({})", self.name)
    }
}

impl fmt::Display for BeanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Obtains handler instances for the method executor
///
/// The host's dependency container sits behind this trait. Implementations
/// must be safe to call from many requests at once.
pub trait BeanProvider: Send + Sync {
    /// Resolve an instance of `bean_type`
    ///
    /// # Errors
    ///
    /// Returns an error if no instance can be produced for the type
    fn resolve(&self, bean_type: &BeanType) -> anyhow::Result<Bean>;
}

type BeanFactory = Arc<dyn Fn() -> anyhow::Result<Bean> + Send + Sync>;

enum BeanEntry {
    Shared(Bean),
    Factory(BeanFactory),
}

/// Stock [`BeanProvider`] filled once at startup
///
/// Shared beans are handed out as the same instance to every request;
/// factories build a fresh instance per resolution.
///
/// # Example
///
/// ```rust
/// use viewroute::host::{BeanProvider, BeanRegistry, BeanType};
///
/// struct UserController;
///
/// let mut beans = BeanRegistry::new();
/// beans.insert(UserController);
/// let bean = beans.resolve(&BeanType::of::<UserController>()).unwrap();
/// assert!(bean.downcast_ref::<UserController>().is_some());
/// ```
#[derive(Default)]
pub struct BeanRegistry {
    entries: HashMap<TypeId, BeanEntry>,
}

impl BeanRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a shared instance
    pub fn insert<T: Any + Send + Sync>(&mut self, bean: T) -> &mut Self {
        self.put(BeanType::of::<T>(), BeanEntry::Shared(Arc::new(bean)));
        self
    }

    /// Register a factory that builds a new instance per resolution
    pub fn insert_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: Any + Send + Sync,
        F: Fn() -> anyhow::Result<T> + Send + Sync + 'static,
    {
        let factory: BeanFactory = Arc::new(move || Ok(Arc::new(factory()?) as Bean));
        self.put(BeanType::of::<T>(), BeanEntry::Factory(factory));
        self
    }

    #[must_use]
    pub fn contains(&self, bean_type: &BeanType) -> bool {
        self.entries.contains_key(&bean_type.id())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn put(&mut self, bean_type: BeanType, entry: BeanEntry) {
        if self.entries.insert(bean_type.id(), entry).is_some() {
            warn!(bean_type = %bean_type, "Replaced existing bean registration");
        } else {
            debug!(bean_type = %bean_type, "Bean registered");
        }
    }
}

impl BeanProvider for BeanRegistry {
    fn resolve(&self, bean_type: &BeanType) -> anyhow::Result<Bean> {
        match self.entries.get(&bean_type.id()) {
            Some(BeanEntry::Shared(bean)) => Ok(Arc::clone(bean)),
            Some(BeanEntry::Factory(factory)) => factory(),
            None => anyhow::bail!("no bean registered for type {}", bean_type),
        }
    }
}
