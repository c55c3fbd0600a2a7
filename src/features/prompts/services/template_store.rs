use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::features::prompts::models::{PromptTemplate, TemplateCategory};
use crate::features::prompts::registry::default_template;
use crate::modules::storage::{KeyValueStore, StorageError};
use crate::shared::prompts::placeholders;

/// Outcome of writing the override map back to the key-value store
pub type PersistenceResult = std::result::Result<(), StorageError>;

/// Caller-supplied content for an override
#[derive(Debug, Clone)]
pub struct TemplateDraft {
    pub name: Option<String>,
    pub description: Option<String>,
    pub template: String,
    pub variables: Option<Vec<String>>,
    pub is_active: bool,
}

/// Effective template for a category, as listed
#[derive(Debug, Clone)]
pub struct TemplateEntry {
    pub template: PromptTemplate,
    pub is_override: bool,
}

type Overrides = BTreeMap<TemplateCategory, PromptTemplate>;

/// Decoded form of the stored override document
#[derive(Debug, Default)]
struct StoredOverrides {
    overrides: Overrides,
    /// Entries that do not decode; written back untouched
    retained: Map<String, Value>,
}

#[derive(Debug, Default)]
struct OverrideState {
    overrides: Overrides,
    retained: Map<String, Value>,
    /// The stored document could not be read, so it must not be overwritten
    unread: bool,
    /// Categories changed in memory while `unread`
    touched: BTreeSet<TemplateCategory>,
}

impl OverrideState {
    /// Merge a freshly read document. Categories changed in memory since the
    /// failed read keep their in-memory state.
    fn absorb(&mut self, stored: StoredOverrides) {
        for (category, template) in stored.overrides {
            if !self.touched.contains(&category) {
                self.overrides.insert(category, template);
            }
        }
        for (key, value) in stored.retained {
            let touched = key
                .parse::<TemplateCategory>()
                .is_ok_and(|category| self.touched.contains(&category));
            if !touched {
                self.retained.entry(key).or_insert(value);
            }
        }
        self.unread = false;
        self.touched.clear();
    }

    fn touch(&mut self, category: TemplateCategory) {
        if self.unread {
            self.touched.insert(category);
        }
    }

    fn document(&self) -> Result<Value, serde_json::Error> {
        let mut document = self.retained.clone();
        for (category, template) in &self.overrides {
            document.insert(category.to_string(), serde_json::to_value(template)?);
        }
        Ok(Value::Object(document))
    }
}

/// Built-in templates plus persisted per-category overrides.
///
/// Reads are served from memory. Writes update memory first, then replace the
/// whole override document under `namespace`. Writers are serialized by
/// `write_gate`; the override lock is never held while talking to the store.
pub struct TemplateStore {
    store: Arc<dyn KeyValueStore>,
    namespace: String,
    state: RwLock<OverrideState>,
    write_gate: Mutex<()>,
    seeded_at: DateTime<Utc>,
}

impl std::fmt::Debug for TemplateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateStore")
            .field("namespace", &self.namespace)
            .field("seeded_at", &self.seeded_at)
            .finish()
    }
}

impl TemplateStore {
    /// Store with no overrides
    pub fn new(store: Arc<dyn KeyValueStore>, namespace: impl Into<String>) -> Self {
        Self {
            store,
            namespace: namespace.into(),
            state: RwLock::new(OverrideState::default()),
            write_gate: Mutex::new(()),
            seeded_at: Utc::now(),
        }
    }

    /// Read the override document once.
    ///
    /// A missing document means no overrides. An unreadable one leaves the
    /// defaults in place and blocks writes until a later read succeeds.
    pub async fn load(store: Arc<dyn KeyValueStore>, namespace: impl Into<String>) -> Self {
        let mut this = Self::new(store, namespace);
        let read = this.store.get(&this.namespace).await;

        match read {
            Ok(Some(document)) => {
                let stored = decode_document(&this.namespace, document);
                tracing::info!(
                    "Loaded {} template override(s) from '{}'",
                    stored.overrides.len(),
                    this.namespace
                );
                this.state.get_mut().absorb(stored);
            }
            Ok(None) => {
                tracing::info!(
                    "No template overrides under '{}', using defaults",
                    this.namespace
                );
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to read template overrides under '{}', using defaults until it can be read: {}",
                    this.namespace,
                    e
                );
                this.state.get_mut().unread = true;
            }
        }

        this
    }

    /// Active override if present, else the built-in default
    pub async fn get_template(&self, category: TemplateCategory) -> PromptTemplate {
        self.get_entry(category).await.template
    }

    pub async fn get_entry(&self, category: TemplateCategory) -> TemplateEntry {
        let state = self.state.read().await;
        self.effective(&state.overrides, category)
    }

    /// Effective template for every category, in declaration order
    pub async fn list_templates(&self) -> Vec<TemplateEntry> {
        let state = self.state.read().await;
        TemplateCategory::ALL
            .into_iter()
            .map(|category| self.effective(&state.overrides, category))
            .collect()
    }

    fn effective(&self, overrides: &Overrides, category: TemplateCategory) -> TemplateEntry {
        match overrides.get(&category) {
            Some(template) if template.is_active => TemplateEntry {
                template: template.clone(),
                is_override: true,
            },
            _ => TemplateEntry {
                template: default_template(category, self.seeded_at),
                is_override: false,
            },
        }
    }

    /// Replace the override for `category`.
    ///
    /// The override is live even when persisting fails.
    pub async fn set_template(
        &self,
        category: TemplateCategory,
        draft: TemplateDraft,
    ) -> (PromptTemplate, PersistenceResult) {
        let _writer = self.write_gate.lock().await;
        self.recover().await;

        let (template, document) = {
            let mut state = self.state.write().await;
            let now = Utc::now();

            let previous = state
                .overrides
                .get(&category)
                .cloned()
                .unwrap_or_else(|| default_template(category, self.seeded_at));

            let variables = draft
                .variables
                .unwrap_or_else(|| placeholders(&draft.template));

            let template = PromptTemplate {
                id: Uuid::now_v7().to_string(),
                name: draft.name.unwrap_or(previous.name),
                description: draft.description.unwrap_or(previous.description),
                template: draft.template,
                variables,
                category,
                is_active: draft.is_active,
                created_at: previous.created_at,
                updated_at: now,
            };

            state.overrides.insert(category, template.clone());
            state.touch(category);
            tracing::info!("Template override set for '{}' ({})", category, template.id);

            (template, self.snapshot(&state))
        };

        let persisted = self.persist(document).await;
        (template, persisted)
    }

    pub async fn reset_template(&self, category: TemplateCategory) -> PersistenceResult {
        let _writer = self.write_gate.lock().await;
        self.recover().await;

        let document = {
            let mut state = self.state.write().await;
            if state.overrides.remove(&category).is_some() {
                tracing::info!("Template override cleared for '{}'", category);
            }
            state.retained.remove(category.as_str());
            state.touch(category);
            self.snapshot(&state)
        };

        self.persist(document).await
    }

    pub async fn reset_all(&self) -> PersistenceResult {
        let _writer = self.write_gate.lock().await;
        self.recover().await;

        let document = {
            let mut state = self.state.write().await;
            let cleared = state.overrides.len();
            state.overrides.clear();
            state
                .retained
                .retain(|key, _| key.parse::<TemplateCategory>().is_err());
            for category in TemplateCategory::ALL {
                state.touch(category);
            }
            tracing::info!("Cleared {} template override(s)", cleared);
            self.snapshot(&state)
        };

        self.persist(document).await
    }

    /// Retry a read that failed at load. Called with `write_gate` held.
    async fn recover(&self) {
        if !self.state.read().await.unread {
            return;
        }

        match self.store.get(&self.namespace).await {
            Ok(document) => {
                let stored = document
                    .map(|document| decode_document(&self.namespace, document))
                    .unwrap_or_default();
                tracing::info!(
                    "Template overrides under '{}' are readable again ({} stored)",
                    self.namespace,
                    stored.overrides.len()
                );
                self.state.write().await.absorb(stored);
            }
            Err(e) => {
                tracing::warn!(
                    "Template overrides under '{}' are still unreadable: {}",
                    self.namespace,
                    e
                );
            }
        }
    }

    fn snapshot(&self, state: &OverrideState) -> Result<Value, StorageError> {
        if state.unread {
            return Err(StorageError::Unread(self.namespace.clone()));
        }
        Ok(state.document()?)
    }

    async fn persist(&self, document: Result<Value, StorageError>) -> PersistenceResult {
        let outcome = match document {
            Ok(document) => self.store.put(&self.namespace, document).await,
            Err(e) => Err(e),
        };
        outcome.inspect_err(|e| {
            tracing::error!(
                "Failed to persist template overrides under '{}': {}",
                self.namespace,
                e
            )
        })
    }
}

/// Split a stored document into decodable overrides and entries kept as-is
fn decode_document(namespace: &str, document: Value) -> StoredOverrides {
    let mut stored = StoredOverrides::default();
    let Value::Object(entries) = document else {
        tracing::warn!(
            "Stored template overrides under '{}' are not a map; they will be replaced on the next write",
            namespace
        );
        return stored;
    };

    for (key, value) in entries {
        let Ok(category) = key.parse::<TemplateCategory>() else {
            tracing::warn!("Keeping stored template under unknown category '{}'", key);
            stored.retained.insert(key, value);
            continue;
        };
        match serde_json::from_value::<PromptTemplate>(value.clone()) {
            Ok(mut template) => {
                template.category = category;
                stored.overrides.insert(category, template);
            }
            Err(e) => {
                tracing::warn!("Stored template for '{}' is malformed, using default: {}", key, e);
                stored.retained.insert(key, value);
            }
        }
    }

    stored
}
