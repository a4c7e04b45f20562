use super::core::{Lifecycle, PhaseListener};
use crate::config::DispatchConfig;
use crate::error::LifecycleError;
use crate::executor::MethodExecutor;
use crate::handler::Reply;
use crate::host::RequestContext;
use crate::router::MappingRegistry;
use crate::writer::{WriterRegistry, REST_RESULT_ATTRIBUTE};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Resource-oriented lifecycle: the handler result is serialized by a
/// [`crate::writer::ResponseWriter`] chosen from the response content type
pub struct RestLifecycle {
    registry: Arc<MappingRegistry>,
    executor: Arc<dyn MethodExecutor>,
    writers: Arc<WriterRegistry>,
    default_content_type: String,
    not_found_message: String,
}

impl RestLifecycle {
    #[must_use]
    pub fn new(
        registry: Arc<MappingRegistry>,
        executor: Arc<dyn MethodExecutor>,
        writers: Arc<WriterRegistry>,
    ) -> Self {
        let defaults = DispatchConfig::default();
        Self {
            registry,
            executor,
            writers,
            default_content_type: defaults.default_content_type,
            not_found_message: defaults.not_found_rest_message,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: &DispatchConfig) -> Self {
        self.default_content_type.clone_from(&config.default_content_type);
        self.not_found_message.clone_from(&config.not_found_rest_message);
        self
    }
}

impl Lifecycle for RestLifecycle {
    fn execute(&self, ctx: &mut dyn RequestContext) -> Result<(), LifecycleError> {
        let Some(matched) = self.registry.match_request(&*ctx) else {
            info!(method = %ctx.method(), path = %ctx.path(), "No REST mapping, sending 404");
            ctx.send_error(404, &self.not_found_message)?;
            ctx.mark_response_complete();
            return Ok(());
        };

        match self.executor.execute(&*ctx, &matched)? {
            Reply::Redirect(location) => {
                ctx.send_redirect(&location)?;
                ctx.mark_response_complete();
            }
            Reply::Error { status, message } => {
                ctx.send_error(status, &message)?;
                ctx.mark_response_complete();
            }
            reply => ctx.set_attribute(REST_RESULT_ATTRIBUTE, reply.into_value()),
        }
        Ok(())
    }

    fn render(&self, ctx: &mut dyn RequestContext) -> Result<(), LifecycleError> {
        if ctx.response_complete() {
            debug!(path = %ctx.path(), "Response complete, skipping render");
            return Ok(());
        }
        let content_type = match ctx.response_content_type() {
            Some(content_type) => content_type.to_string(),
            None => {
                ctx.set_response_content_type(&self.default_content_type);
                self.default_content_type.clone()
            }
        };
        let writer = self.writers.select(&content_type)?;
        debug!(
            content_type = %content_type,
            writer = writer.content_type(),
            "Writing REST response"
        );
        writer.write_response(ctx)?;
        Ok(())
    }

    fn add_phase_listener(&self, _listener: Arc<dyn PhaseListener>) {}

    fn remove_phase_listener(&self, _listener: &Arc<dyn PhaseListener>) {}

    fn phase_listeners(&self) -> Vec<Arc<dyn PhaseListener>> {
        Vec::new()
    }
}

impl fmt::Debug for RestLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestLifecycle")
            .field("mappings", &self.registry.len())
            .field("writers", &self.writers)
            .field("default_content_type", &self.default_content_type)
            .finish_non_exhaustive()
    }
}
