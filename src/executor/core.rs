use crate::binding::ParameterProducer;
use crate::error::{DispatchError, DispatchStage};
use crate::handler::{Arguments, Reply};
use crate::host::{BeanProvider, RequestContext};
use crate::router::MappingMatch;
use anyhow::anyhow;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// Runs the handler of a matched mapping
pub trait MethodExecutor: Send + Sync {
    /// Resolve the bean, bind every argument and invoke the handler
    ///
    /// # Errors
    ///
    /// Any failure in those steps comes back as one [`DispatchError`]
    fn execute(
        &self,
        ctx: &dyn RequestContext,
        matched: &MappingMatch,
    ) -> Result<Reply, DispatchError>;
}

/// Stock executor: bean provider + parameter producer + invoker
///
/// Writes nothing to the response; either a complete [`Reply`] comes back or
/// a [`DispatchError`] does.
#[derive(Clone)]
pub struct DefaultMethodExecutor {
    producer: Arc<dyn ParameterProducer>,
    beans: Arc<dyn BeanProvider>,
}

impl DefaultMethodExecutor {
    #[must_use]
    pub fn new(producer: Arc<dyn ParameterProducer>, beans: Arc<dyn BeanProvider>) -> Self {
        Self { producer, beans }
    }

    fn run(&self, ctx: &dyn RequestContext, matched: &MappingMatch) -> Result<Reply, DispatchError> {
        let handler = matched.handler();
        let name = handler.name();

        // Step 1: handler instance
        let bean = self
            .beans
            .resolve(handler.bean_type())
            .map_err(|e| DispatchError::new(name, DispatchStage::Resolution, e))?;

        // Step 2: positional arguments, in declaration order
        let mut values = Vec::with_capacity(handler.params().len());
        for param in handler.params() {
            let value = self
                .producer
                .produce(ctx, matched, param)
                .map_err(|e| DispatchError::new(name, DispatchStage::Binding, e))?;
            values.push(value);
        }

        // Step 3: invoke; a panicking handler is an invocation failure too
        let invoked = catch_unwind(AssertUnwindSafe(|| {
            handler.invoke(&bean, Arguments::new(values))
        }));
        match invoked {
            Ok(Ok(reply)) => Ok(reply),
            Ok(Err(e)) => Err(DispatchError::new(name, DispatchStage::Invocation, e)),
            Err(panic) => {
                let details = panic
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "non-string panic payload".to_string());
                Err(DispatchError::new(
                    name,
                    DispatchStage::Invocation,
                    anyhow!("handler panicked: {details}"),
                ))
            }
        }
    }
}

impl MethodExecutor for DefaultMethodExecutor {
    fn execute(
        &self,
        ctx: &dyn RequestContext,
        matched: &MappingMatch,
    ) -> Result<Reply, DispatchError> {
        let start = Instant::now();
        let handler_name = matched.handler().name();
        debug!(
            handler_name,
            bean_type = %matched.handler().bean_type(),
            params = matched.handler().params().len(),
            "Executing handler"
        );

        let result = self.run(ctx, matched);
        let duration_us = start.elapsed().as_micros();
        match &result {
            Ok(_) => info!(handler_name, duration_us, "Handler completed"),
            Err(e) => error!(
                handler_name,
                stage = %e.stage,
                error = %e.cause,
                duration_us,
                "Handler dispatch failed"
            ),
        }
        result
    }
}
