use super::core::{Lifecycle, LifecycleFactory, PhaseListener};
use crate::config::DispatchConfig;
use crate::error::{ConfigError, LifecycleError};
use crate::executor::MethodExecutor;
use crate::handler::Reply;
use crate::host::RequestContext;
use crate::router::MappingRegistry;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Request attribute holding a `Reply::Body` returned by an action handler
pub const ACTION_RESULT_ATTRIBUTE: &str = "viewroute.action.ActionResult";

/// Page-oriented lifecycle: a handler picks the next view, the host renders it
pub struct ActionLifecycle {
    registry: Arc<MappingRegistry>,
    executor: Arc<dyn MethodExecutor>,
    default_lifecycle: Arc<dyn Lifecycle>,
    not_found_message: String,
}

impl ActionLifecycle {
    #[must_use]
    pub fn new(
        registry: Arc<MappingRegistry>,
        executor: Arc<dyn MethodExecutor>,
        default_lifecycle: Arc<dyn Lifecycle>,
    ) -> Self {
        Self {
            registry,
            executor,
            default_lifecycle,
            not_found_message: DispatchConfig::default().not_found_action_message,
        }
    }

    /// Compose with the default lifecycle registered in `factory`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingDefaultLifecycle`] if the factory has none
    pub fn from_factory(
        registry: Arc<MappingRegistry>,
        executor: Arc<dyn MethodExecutor>,
        factory: &LifecycleFactory,
    ) -> Result<Self, ConfigError> {
        let default_lifecycle = factory
            .default_lifecycle()
            .ok_or(ConfigError::MissingDefaultLifecycle)?;
        Ok(Self::new(registry, executor, default_lifecycle))
    }

    #[must_use]
    pub fn with_config(mut self, config: &DispatchConfig) -> Self {
        self.not_found_message.clone_from(&config.not_found_action_message);
        self
    }
}

impl Lifecycle for ActionLifecycle {
    fn execute(&self, ctx: &mut dyn RequestContext) -> Result<(), LifecycleError> {
        let Some(matched) = self.registry.match_request(&*ctx) else {
            info!(path = %ctx.path(), "No action mapping, sending 404");
            ctx.send_error(404, &self.not_found_message)?;
            ctx.mark_response_complete();
            return Ok(());
        };

        match self.executor.execute(&*ctx, &matched)? {
            Reply::View(view_id) => {
                debug!(view_id = %view_id, handler = matched.handler().name(), "Action selected view");
                ctx.set_view_id(&view_id);
            }
            Reply::Body(value) => ctx.set_attribute(ACTION_RESULT_ATTRIBUTE, value),
            Reply::Redirect(location) => {
                ctx.send_redirect(&location)?;
                ctx.mark_response_complete();
            }
            Reply::Error { status, message } => {
                ctx.send_error(status, &message)?;
                ctx.mark_response_complete();
            }
            Reply::Empty => {}
        }
        Ok(())
    }

    fn render(&self, ctx: &mut dyn RequestContext) -> Result<(), LifecycleError> {
        if ctx.response_complete() {
            debug!(path = %ctx.path(), "Response complete, skipping render");
            return Ok(());
        }
        self.default_lifecycle.render(ctx)
    }

    fn add_phase_listener(&self, _listener: Arc<dyn PhaseListener>) {}

    fn remove_phase_listener(&self, _listener: &Arc<dyn PhaseListener>) {}

    fn phase_listeners(&self) -> Vec<Arc<dyn PhaseListener>> {
        Vec::new()
    }
}

impl fmt::Debug for ActionLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionLifecycle")
            .field("mappings", &self.registry.len())
            .field("not_found_message", &self.not_found_message)
            .finish_non_exhaustive()
    }
}
