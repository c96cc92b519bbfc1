use crate::http::error::AppError;
use holdline_config::AppConfig;
use holdline_core::twiml::Greeting;
use holdline_core::PhoneNumberProcessor;
use holdline_store::error::StoreError;
use holdline_store::Store;
use std::sync::{Arc, Mutex};

/// Settings the handlers read on every request.
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub auth_token: Option<String>,
    pub public_url: Option<String>,
    pub greeting: Greeting,
    pub recent_calls: i64,
    pub active_window_secs: i64,
}

impl ServiceSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            auth_token: config.twilio.auth_token.clone(),
            public_url: config.server.public_url.clone(),
            greeting: config.greeting.clone(),
            recent_calls: config.analytics.recent_calls,
            active_window_secs: config.active_window_secs(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    store: Arc<Mutex<Store>>,
    pub processor: Arc<PhoneNumberProcessor>,
    pub settings: Arc<ServiceSettings>,
}

impl AppState {
    pub fn new(store: Store, processor: PhoneNumberProcessor, settings: ServiceSettings) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            processor: Arc::new(processor),
            settings: Arc::new(settings),
        }
    }

    /// Runs `f` against the store on the blocking pool.
    pub async fn with_store<F, T>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&Store) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || {
            let guard = store
                .lock()
                .map_err(|_| AppError::Internal("store lock poisoned".to_string()))?;
            f(&*guard).map_err(AppError::from)
        })
        .await
        .map_err(|err| AppError::Internal(format!("store task failed: {err}")))?
    }
}
