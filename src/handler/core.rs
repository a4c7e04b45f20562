use crate::binding::ParamBinding;
use crate::host::{Bean, BeanType};
use anyhow::anyhow;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Positional argument array handed to a handler method
///
/// Holds one JSON value per declared parameter, in declaration order.
/// Optional parameters that were absent arrive as `null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    values: Vec<Value>,
}

impl Arguments {
    #[must_use]
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Deserialize the argument at `index` into `T`
    ///
    /// Use `Option<T>` for optional parameters.
    ///
    /// # Errors
    ///
    /// Fails if there is no argument at `index` or it does not fit `T`
    pub fn get<T: DeserializeOwned>(&self, index: usize) -> anyhow::Result<T> {
        let value = self
            .values
            .get(index)
            .ok_or_else(|| anyhow!("no argument at position {index}"))?;
        serde_json::from_value(value.clone())
            .map_err(|e| anyhow!("argument {index} has unexpected shape: {e}"))
    }

    /// Like [`Arguments::get`], but an absent or `null` argument is `None`
    ///
    /// # Errors
    ///
    /// Fails if a present value does not fit `T`
    pub fn get_opt<T: DeserializeOwned>(&self, index: usize) -> anyhow::Result<Option<T>> {
        match self.values.get(index) {
            None | Some(Value::Null) => Ok(None),
            Some(_) => self.get(index).map(Some),
        }
    }

    #[must_use]
    pub fn raw(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<Value> {
        self.values
    }
}

impl From<Vec<Value>> for Arguments {
    fn from(values: Vec<Value>) -> Self {
        Self::new(values)
    }
}

/// What a handler method produced
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// A value for the response writers (REST) or the request attributes (action)
    Body(Value),
    /// Identifier of the next view to render
    View(String),
    /// Redirect the client; the response completes without rendering
    Redirect(String),
    /// Send an error status; the response completes without rendering
    Error { status: u16, message: String },
    /// Nothing to hand back
    Empty,
}

impl Reply {
    /// Serialize `value` into a [`Reply::Body`]
    ///
    /// # Errors
    ///
    /// Fails if `value` cannot be represented as JSON
    pub fn json<T: Serialize>(value: &T) -> anyhow::Result<Self> {
        Ok(Reply::Body(serde_json::to_value(value)?))
    }

    #[must_use]
    pub fn view(view_id: &str) -> Self {
        Reply::View(view_id.to_string())
    }

    #[must_use]
    pub fn redirect(location: &str) -> Self {
        Reply::Redirect(location.to_string())
    }

    #[must_use]
    pub fn error(status: u16, message: &str) -> Self {
        Reply::Error {
            status,
            message: message.to_string(),
        }
    }

    /// Value stored for the REST render phase
    ///
    /// Views become JSON strings and empty replies become `null`. The
    /// lifecycles complete the response for redirects and errors before
    /// storing anything; the `Redirect` and `Error` conversions serve custom
    /// [`crate::lifecycle::Lifecycle`] implementations that store every reply.
    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Reply::Body(value) => value,
            Reply::View(view_id) => Value::String(view_id),
            Reply::Redirect(location) => Value::String(location),
            Reply::Error { status, message } => {
                serde_json::json!({ "status": status, "error": message })
            }
            Reply::Empty => Value::Null,
        }
    }
}

impl From<Value> for Reply {
    fn from(value: Value) -> Self {
        Reply::Body(value)
    }
}

/// Invocation capability bound once at startup
pub type Invoker = Arc<dyn Fn(&Bean, Arguments) -> anyhow::Result<Reply> + Send + Sync>;

/// A handler method: owner type, parameter bindings and invoker
///
/// Built once during registration. The parameter list is what the method
/// executor walks, in order, to build the [`Arguments`].
///
/// # Example
///
/// ```rust
/// use viewroute::binding::{ParamBinding, ParamType};
/// use viewroute::handler::{HandlerMethod, Reply};
///
/// struct Users;
///
/// impl Users {
///     fn find(&self, id: i64) -> serde_json::Value {
///         serde_json::json!({ "id": id })
///     }
/// }
///
/// let method = HandlerMethod::new::<Users, _>(
///     "find_user",
///     vec![ParamBinding::path("id", ParamType::I64)],
///     |users, args| Ok(Reply::Body(users.find(args.get(0)?))),
/// );
/// assert_eq!(method.params().len(), 1);
/// ```
#[derive(Clone)]
pub struct HandlerMethod {
    name: String,
    bean_type: BeanType,
    params: Vec<ParamBinding>,
    invoker: Invoker,
}

impl HandlerMethod {
    /// Bind `f` as a method of bean type `T`
    pub fn new<T, F>(name: &str, params: Vec<ParamBinding>, f: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&T, Arguments) -> anyhow::Result<Reply> + Send + Sync + 'static,
    {
        let invoker: Invoker = Arc::new(move |bean: &Bean, args: Arguments| {
            let instance = bean.downcast_ref::<T>().ok_or_else(|| {
                anyhow!(
                    "resolved bean is not an instance of {}",
                    std::any::type_name::<T>()
                )
            })?;
            f(instance, args)
        });
        Self {
            name: name.to_string(),
            bean_type: BeanType::of::<T>(),
            params,
            invoker,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn bean_type(&self) -> &BeanType {
        &self.bean_type
    }

    #[must_use]
    pub fn params(&self) -> &[ParamBinding] {
        &self.params
    }

    /// Call the method on `bean`
    ///
    /// # Errors
    ///
    /// Propagates whatever the handler body returns, or a downcast failure
    pub fn invoke(&self, bean: &Bean, args: Arguments) -> anyhow::Result<Reply> {
        (self.invoker)(bean, args)
    }
}

impl fmt::Debug for HandlerMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerMethod")
            .field("name", &self.name)
            .field("bean_type", &self.bean_type)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}
