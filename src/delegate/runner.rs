use std::future::Future;
use std::sync::Arc;

use tracing::warn;

use crate::errors::BoxError;
use crate::metrics::DELEGATE_FAILURES_METRIC;
use crate::DelegateFailure;
use crate::DelegateInvocationError;
use crate::DelegateRegistry;
use crate::PushDelegate;
use crate::Result;

/// Best-effort broadcast over every registered delegate.
///
/// Each delegate is invoked exactly once, in registration order, regardless
/// of earlier failures. Failures are logged and collected; if any occurred,
/// the aggregate error names every failing delegate. An empty registry is a
/// successful no-op.
pub async fn run_delegates<F, Fut>(
    registry: &DelegateRegistry,
    action: F,
) -> Result<()>
where
    F: Fn(Arc<dyn PushDelegate>) -> Fut,
    Fut: Future<Output = std::result::Result<(), BoxError>>,
{
    let mut failures = Vec::new();

    for delegate in registry.resolve() {
        let name = delegate.name().to_string();
        if let Err(source) = action(delegate).await {
            warn!(delegate = %name, error = %source, "Push delegate invocation failed");
            DELEGATE_FAILURES_METRIC.with_label_values(&[&name]).inc();
            failures.push(DelegateFailure {
                delegate: name,
                source,
            });
        }
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(DelegateInvocationError { failures }.into())
    }
}
