use crate::error::{ConfigError, LifecycleError};
use crate::host::RequestContext;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Id under which the host registers its own lifecycle
pub const DEFAULT_LIFECYCLE_ID: &str = "DEFAULT";
pub const ACTION_LIFECYCLE_ID: &str = "viewroute.action.ActionLifecycle";
pub const REST_LIFECYCLE_ID: &str = "viewroute.rest.RestLifecycle";

/// Phases of the host's request processing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseId {
    AnyPhase,
    RestoreView,
    ApplyRequestValues,
    ProcessValidations,
    UpdateModelValues,
    InvokeApplication,
    RenderResponse,
}

/// Observer of host phases
///
/// The dispatch lifecycles accept listeners but never call them.
pub trait PhaseListener: Send + Sync {
    fn phase_id(&self) -> PhaseId;

    fn before_phase(&self, _phase: PhaseId) {}

    fn after_phase(&self, _phase: PhaseId) {}
}

/// The host's two-phase per-request contract
pub trait Lifecycle: Send + Sync {
    /// Decide what happens to the request
    ///
    /// # Errors
    ///
    /// Dispatch and host failures are propagated untouched
    fn execute(&self, ctx: &mut dyn RequestContext) -> Result<(), LifecycleError>;

    /// Produce the response body, unless the response is already complete
    ///
    /// # Errors
    ///
    /// Writer, configuration and host failures are propagated untouched
    fn render(&self, ctx: &mut dyn RequestContext) -> Result<(), LifecycleError>;

    fn add_phase_listener(&self, listener: Arc<dyn PhaseListener>);

    fn remove_phase_listener(&self, listener: &Arc<dyn PhaseListener>);

    fn phase_listeners(&self) -> Vec<Arc<dyn PhaseListener>>;
}

/// Lifecycle id → lifecycle, built during startup composition
///
/// The host's own lifecycle lives under [`DEFAULT_LIFECYCLE_ID`].
#[derive(Clone, Default)]
pub struct LifecycleFactory {
    lifecycles: HashMap<String, Arc<dyn Lifecycle>>,
}

impl LifecycleFactory {
    /// An empty factory
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A factory holding `default_lifecycle` under [`DEFAULT_LIFECYCLE_ID`]
    #[must_use]
    pub fn with_default(default_lifecycle: Arc<dyn Lifecycle>) -> Self {
        let mut lifecycles = HashMap::new();
        lifecycles.insert(DEFAULT_LIFECYCLE_ID.to_string(), default_lifecycle);
        Self { lifecycles }
    }

    /// Register `lifecycle` under `id`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateLifecycle`] if `id` is taken
    pub fn add_lifecycle(
        &mut self,
        id: &str,
        lifecycle: Arc<dyn Lifecycle>,
    ) -> Result<(), ConfigError> {
        if self.lifecycles.contains_key(id) {
            return Err(ConfigError::DuplicateLifecycle { id: id.to_string() });
        }
        self.lifecycles.insert(id.to_string(), lifecycle);
        info!(lifecycle_id = id, "Lifecycle registered");
        Ok(())
    }

    #[must_use]
    pub fn get_lifecycle(&self, id: &str) -> Option<Arc<dyn Lifecycle>> {
        let found = self.lifecycles.get(id).map(Arc::clone);
        if found.is_none() {
            debug!(lifecycle_id = id, "Unknown lifecycle id");
        }
        found
    }

    #[must_use]
    pub fn default_lifecycle(&self) -> Option<Arc<dyn Lifecycle>> {
        self.get_lifecycle(DEFAULT_LIFECYCLE_ID)
    }

    /// Registered ids, sorted
    #[must_use]
    pub fn lifecycle_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.lifecycles.keys().cloned().collect();
        ids.sort_unstable();
        ids
    }
}

impl fmt::Debug for LifecycleFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleFactory")
            .field("lifecycle_ids", &self.lifecycle_ids())
            .finish()
    }
}
