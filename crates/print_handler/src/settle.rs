//! Waiting for deferred in-page script to finish before reading page style.
//!
//! The fixed delay is a heuristic: it does not prove the page is done. When a
//! readiness expression is configured it is polled afterwards until it turns
//! truthy or the timeout expires; expiry only logs a warning.

use core::time::Duration;
use log::{debug, info, warn};
use print_engine::RenderEngine;
use serde_json::Value;
use tokio::time::{Instant, sleep};

use crate::config::PrintConfig;

/// JavaScript truthiness of an evaluation result.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|float| float != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Poll `expression` until it is truthy. Returns whether readiness was observed.
pub async fn wait_until_ready<E: RenderEngine>(
    engine: &mut E,
    expression: &str,
    poll: Duration,
    timeout: Duration,
) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        match engine.run_script(expression).await {
            Ok(value) if is_truthy(&value) => {
                debug!("Readiness expression {expression:?} satisfied");
                return true;
            }
            Ok(value) => debug!("Page not ready yet ({value})"),
            Err(err) => debug!("Readiness expression failed: {err:#}"),
        }
        if Instant::now() >= deadline {
            warn!("Page did not report ready within {timeout:?}; printing anyway");
            return false;
        }
        sleep(poll).await;
    }
}

/// Let a freshly loaded page settle: the fixed delay once, then the optional probe.
pub async fn settle<E: RenderEngine>(engine: &mut E, config: &PrintConfig) {
    let delay = config.settle_delay();
    debug!("Settling for {delay:?}");
    sleep(delay).await;
    if let Some(expression) = &config.ready_expression {
        info!("Waiting for {expression:?}");
        wait_until_ready(engine, expression, config.ready_poll(), config.ready_timeout()).await;
    }
}
