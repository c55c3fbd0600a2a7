use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum_test::TestServer;

use crate::features::generation::services::{GenerationDefaults, GenerationOrchestrator};
use crate::features::prompts::TemplateStore;
use crate::modules::storage::{InMemoryKeyValueStore, KeyValueStore, StorageError};
use crate::shared::constants::DEFAULT_PROMPT_STORE_KEY;
use crate::shared::llm::{BackendError, GenerationBackend, GenerationRequest};

/// Store whose reads and writes always fail
pub struct FailingKeyValueStore;

#[async_trait]
impl KeyValueStore for FailingKeyValueStore {
    async fn get(&self, _key: &str) -> Result<Option<serde_json::Value>, StorageError> {
        Err(StorageError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn put(&self, _key: &str, _value: serde_json::Value) -> Result<(), StorageError> {
        Err(StorageError::Database(sqlx::Error::PoolTimedOut))
    }
}

/// In-memory store whose next `get` calls fail on demand
#[derive(Default)]
pub struct FlakyKeyValueStore {
    inner: InMemoryKeyValueStore,
    failing_reads: AtomicUsize,
}

impl FlakyKeyValueStore {
    pub fn fail_next_reads(&self, count: usize) {
        self.failing_reads.store(count, Ordering::SeqCst);
    }
}

#[async_trait]
impl KeyValueStore for FlakyKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StorageError> {
        let failing = self
            .failing_reads
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(StorageError::Database(sqlx::Error::PoolTimedOut));
        }
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: serde_json::Value) -> Result<(), StorageError> {
        self.inner.put(key, value).await
    }
}

pub fn memory_template_store() -> Arc<TemplateStore> {
    Arc::new(TemplateStore::new(
        Arc::new(InMemoryKeyValueStore::new()),
        DEFAULT_PROMPT_STORE_KEY,
    ))
}

pub fn failing_template_store() -> Arc<TemplateStore> {
    Arc::new(TemplateStore::new(
        Arc::new(FailingKeyValueStore),
        DEFAULT_PROMPT_STORE_KEY,
    ))
}

enum Reply {
    Text(String),
    Echo,
    Http { status: u16, body: String },
    Network,
}

/// Scripted backend that records every request it receives
pub struct FakeBackend {
    reply: Reply,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl FakeBackend {
    fn with(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn replying(text: &str) -> Arc<Self> {
        Self::with(Reply::Text(text.to_string()))
    }

    /// Answers with the prompt it was sent
    pub fn echo() -> Arc<Self> {
        Self::with(Reply::Echo)
    }

    pub fn failing(status: u16, body: &str) -> Arc<Self> {
        Self::with(Reply::Http {
            status,
            body: body.to_string(),
        })
    }

    pub fn unreachable() -> Arc<Self> {
        Self::with(Reply::Network)
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Option<GenerationRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl GenerationBackend for FakeBackend {
    fn default_model(&self) -> &str {
        "fake-model"
    }

    async fn complete(&self, request: &GenerationRequest) -> Result<String, BackendError> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Echo => Ok(request.prompt.clone()),
            Reply::Http { status, body } => Err(BackendError::Http {
                status: *status,
                body: body.clone(),
            }),
            Reply::Network => Err(BackendError::Network("connection refused".to_string())),
        }
    }
}

/// In-process server over the full feature router
pub struct TestContext {
    pub server: TestServer,
}

impl TestContext {
    pub fn new(templates: Arc<TemplateStore>) -> Self {
        Self::with_backend(templates, FakeBackend::replying("generated text"))
    }

    pub fn with_backend(templates: Arc<TemplateStore>, backend: Arc<FakeBackend>) -> Self {
        let orchestrator = Arc::new(GenerationOrchestrator::new(
            templates.clone(),
            backend,
            GenerationDefaults::default(),
        ));
        let app = crate::features::routes(templates, orchestrator);
        let server = TestServer::new(app).unwrap();
        Self { server }
    }
}
