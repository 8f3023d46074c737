//! Application state management

use std::sync::Arc;
use std::time::Duration;

use crate::analysis::{AnalysisBackend, AzureBackend};
use crate::config::Config;

/// Shared application state
///
/// Cheap to clone; nothing in it is mutated after startup, so concurrent
/// requests are fully independent.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    analysis: Option<AnalysisContext>,
}

/// Analysis backend plus the settings the orchestrator needs
pub struct AnalysisContext {
    pub backend: Arc<dyn AnalysisBackend>,
    pub poll_interval: Duration,
}

impl AppState {
    /// Create application state, wiring up the Azure backend when
    /// credentials are configured.
    pub fn new(config: Config) -> Self {
        let analysis = config.analysis.as_ref().map(|cfg| AnalysisContext {
            backend: Arc::new(AzureBackend::new(cfg)) as Arc<dyn AnalysisBackend>,
            poll_interval: cfg.poll_interval,
        });

        Self {
            inner: Arc::new(AppStateInner { config, analysis }),
        }
    }

    /// State with an injected backend, for tests.
    pub fn with_backend(
        config: Config,
        backend: Arc<dyn AnalysisBackend>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                analysis: Some(AnalysisContext {
                    backend,
                    poll_interval,
                }),
            }),
        }
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Analysis context, present only when credentials are configured.
    pub fn analysis(&self) -> Option<&AnalysisContext> {
        self.inner.analysis.as_ref()
    }
}
