use std::fmt::{Debug, Display};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, instrument, warn};

use crate::storage::{KeyValueStorage, StorageError};

// =============================================================================
// 1. THE ABSTRACTION (Entity trait with hooks)
// =============================================================================

/// Trait that any record kept by a [`ResourceActor`] must implement.
///
/// The actor keeps entities as an ordered list and persists the whole list as
/// one JSON array, hence the serde bounds.
pub trait Entity: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    type Id: PartialEq + Clone + Send + Sync + Display + Debug;
    type CreatePayload: Send + Sync + Debug;
    type Patch: Send + Sync + Debug;

    fn id(&self) -> &Self::Id;

    /// Build the full entity from a store-generated id and the payload.
    fn from_create(id: Self::Id, payload: Self::CreatePayload) -> Self;

    /// Overlay a patch. Must never change [`Entity::id`].
    fn on_update(&mut self, patch: Self::Patch);
}

#[derive(Debug, Error)]
pub enum FrameworkError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Persistence failed: {0}")]
    Persistence(#[from] StorageError),
    #[error("Persisted data is malformed: {0}")]
    MalformedData(String),
    #[error("Could not encode items: {0}")]
    Encode(String),
    #[error("Store already hydrated")]
    AlreadyHydrated,
    #[error("Store not hydrated yet")]
    NotHydrated,
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped")]
    ActorDropped,
}

// =============================================================================
// 2. THE GENERIC MESSAGES
// =============================================================================

pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

#[derive(Debug)]
pub enum ResourceRequest<T: Entity> {
    Hydrate {
        respond_to: Response<usize>,
    },
    Create {
        payload: T::CreatePayload,
        respond_to: Response<T>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    List {
        respond_to: Response<Vec<T>>,
    },
    Update {
        id: T::Id,
        patch: T::Patch,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

/// Owns an ordered list of entities and mirrors it to one storage key.
///
/// Requests are handled one at a time off the mailbox, so a mutation,
/// including its storage write, finishes before the next one starts. Each
/// mutation builds the next list, writes it in full, and only then replaces
/// the in-memory list: a failed write leaves memory untouched.
///
/// Mutations are rejected until the first `Hydrate` has been handled, since
/// writing before the stored list is loaded would overwrite it.
pub struct ResourceActor<T: Entity, S: KeyValueStorage> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    items: Vec<T>,
    storage: S,
    storage_key: String,
    hydrated: bool,
    next_id_fn: Box<dyn Fn() -> T::Id + Send + Sync>,
}

impl<T: Entity, S: KeyValueStorage> ResourceActor<T, S> {
    pub fn new(
        buffer_size: usize,
        storage: S,
        storage_key: impl Into<String>,
        next_id_fn: impl Fn() -> T::Id + Send + Sync + 'static,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            items: Vec::new(),
            storage,
            storage_key: storage_key.into(),
            hydrated: false,
            next_id_fn: Box::new(next_id_fn),
        };
        let client = ResourceClient::new(sender);
        (actor, client)
    }

    #[instrument(name = "resource_actor", skip(self), fields(key = %self.storage_key))]
    pub async fn run(mut self) {
        info!("Actor starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Hydrate { respond_to } => {
                    let result = self.handle_hydrate().await;
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Create { payload, respond_to } => {
                    let result = self.handle_create(payload).await;
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.items.iter().find(|item| item.id() == &id).cloned();
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::List { respond_to } => {
                    let _ = respond_to.send(Ok(self.items.clone()));
                }
                ResourceRequest::Update { id, patch, respond_to } => {
                    let result = self.handle_update(id, patch).await;
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Delete { id, respond_to } => {
                    let result = self.handle_delete(id).await;
                    let _ = respond_to.send(result);
                }
            }
        }
        info!("Actor stopped");
    }

    async fn handle_hydrate(&mut self) -> Result<usize, FrameworkError> {
        if self.hydrated {
            warn!("Hydrate requested twice");
            return Err(FrameworkError::AlreadyHydrated);
        }
        self.hydrated = true;

        let blob = match self.storage.get(&self.storage_key).await {
            Ok(Some(blob)) => blob,
            Ok(None) => {
                info!("Nothing persisted yet, starting empty");
                return Ok(0);
            }
            Err(e) => {
                error!(error = %e, "Failed to read persisted items");
                return Err(e.into());
            }
        };

        let items: Vec<T> = serde_json::from_slice(&blob).map_err(|e| {
            error!(error = %e, "Persisted items are malformed");
            FrameworkError::MalformedData(e.to_string())
        })?;

        info!(count = items.len(), "Items loaded");
        self.items = items;
        Ok(self.items.len())
    }

    async fn handle_create(&mut self, payload: T::CreatePayload) -> Result<T, FrameworkError> {
        self.ensure_hydrated()?;
        let id = (self.next_id_fn)();
        let item = T::from_create(id, payload);
        debug!(id = %item.id(), "Creating item");

        let mut next = self.items.clone();
        next.push(item.clone());
        self.commit(next).await?;
        Ok(item)
    }

    async fn handle_update(&mut self, id: T::Id, patch: T::Patch) -> Result<T, FrameworkError> {
        self.ensure_hydrated()?;
        let Some(index) = self.position(&id) else {
            warn!(%id, "Update target not found");
            return Err(FrameworkError::NotFound(id.to_string()));
        };

        let mut next = self.items.clone();
        next[index].on_update(patch);
        let updated = next[index].clone();
        self.commit(next).await?;
        Ok(updated)
    }

    async fn handle_delete(&mut self, id: T::Id) -> Result<(), FrameworkError> {
        self.ensure_hydrated()?;
        let Some(index) = self.position(&id) else {
            warn!(%id, "Delete target not found");
            return Err(FrameworkError::NotFound(id.to_string()));
        };

        let mut next = self.items.clone();
        next.remove(index);
        self.commit(next).await
    }

    fn ensure_hydrated(&self) -> Result<(), FrameworkError> {
        if self.hydrated {
            Ok(())
        } else {
            warn!("Mutation before hydrate rejected");
            Err(FrameworkError::NotHydrated)
        }
    }

    fn position(&self, id: &T::Id) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    /// Writes `next` in full, then makes it the current list.
    async fn commit(&mut self, next: Vec<T>) -> Result<(), FrameworkError> {
        let blob = serde_json::to_vec(&next).map_err(|e| FrameworkError::Encode(e.to_string()))?;
        if let Err(e) = self.storage.set(&self.storage_key, blob).await {
            error!(error = %e, "Failed to persist items, keeping previous list");
            return Err(e.into());
        }
        debug!(count = next.len(), "Items persisted");
        self.items = next;
        Ok(())
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

#[derive(Clone)]
pub struct ResourceClient<T: Entity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: Entity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        make: impl FnOnce(Response<R>) -> ResourceRequest<T>,
    ) -> Result<R, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(make(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn hydrate(&self) -> Result<usize, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Hydrate { respond_to }).await
    }

    pub async fn create(&self, payload: T::CreatePayload) -> Result<T, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Create { payload, respond_to }).await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Get { id, respond_to }).await
    }

    pub async fn list(&self) -> Result<Vec<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::List { respond_to }).await
    }

    pub async fn update(&self, id: T::Id, patch: T::Patch) -> Result<T, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Update { id, patch, respond_to }).await
    }

    pub async fn delete(&self, id: T::Id) -> Result<(), FrameworkError> {
        self.request(|respond_to| ResourceRequest::Delete { id, respond_to }).await
    }
}

// =============================================================================
// 5. EXAMPLE USAGE (Test)
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryStorage;
    use serde::Deserialize;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    // --- Domain Definition ---

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: String,
        text: String,
    }

    #[derive(Debug)]
    struct NoteCreate {
        text: String,
    }

    #[derive(Debug)]
    struct NotePatch {
        text: Option<String>,
    }

    impl Entity for Note {
        type Id = String;
        type CreatePayload = NoteCreate;
        type Patch = NotePatch;

        fn id(&self) -> &String {
            &self.id
        }

        fn from_create(id: String, payload: NoteCreate) -> Self {
            Self { id, text: payload.text }
        }

        fn on_update(&mut self, patch: NotePatch) {
            if let Some(text) = patch.text {
                self.text = text;
            }
        }
    }

    const KEY: &str = "@test:notes";

    fn start(storage: Arc<InMemoryStorage>) -> ResourceClient<Note> {
        let counter = Arc::new(AtomicU64::new(1));
        let next_id = move || format!("note_{}", counter.fetch_add(1, Ordering::SeqCst));
        let (actor, client) = ResourceActor::new(10, storage, KEY, next_id);
        tokio::spawn(actor.run());
        client
    }

    fn note(text: &str) -> NoteCreate {
        NoteCreate { text: text.into() }
    }

    // --- Tests ---

    #[tokio::test]
    async fn test_mutations_are_persisted_in_full() {
        let storage = Arc::new(InMemoryStorage::new());
        let client = start(storage.clone());
        client.hydrate().await.unwrap();

        let a = client.create(note("a")).await.unwrap();
        client.create(note("b")).await.unwrap();
        client
            .update(a.id.clone(), NotePatch { text: Some("a2".into()) })
            .await
            .unwrap();

        let stored: Vec<Note> = serde_json::from_slice(&storage.raw(KEY).unwrap()).unwrap();
        assert_eq!(stored, client.list().await.unwrap());
        assert_eq!(stored[0].text, "a2");
        assert_eq!(stored[1].text, "b");
    }

    #[tokio::test]
    async fn test_failed_write_leaves_memory_unchanged() {
        let storage = Arc::new(InMemoryStorage::new());
        let client = start(storage.clone());
        client.hydrate().await.unwrap();
        let kept = client.create(note("kept")).await.unwrap();

        storage.set_fail_writes(true);
        let err = client.create(note("lost")).await.unwrap_err();
        assert!(matches!(err, FrameworkError::Persistence(_)));
        let err = client.delete(kept.id.clone()).await.unwrap_err();
        assert!(matches!(err, FrameworkError::Persistence(_)));

        assert_eq!(client.list().await.unwrap(), vec![kept]);
    }

    #[tokio::test]
    async fn test_missing_id_is_not_found() {
        let client = start(Arc::new(InMemoryStorage::new()));
        client.hydrate().await.unwrap();

        let err = client.delete("nope".into()).await.unwrap_err();
        assert!(matches!(err, FrameworkError::NotFound(id) if id == "nope"));
        let err = client.update("nope".into(), NotePatch { text: None }).await.unwrap_err();
        assert!(matches!(err, FrameworkError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_hydrate_runs_once() {
        let storage = Arc::new(InMemoryStorage::new());
        storage.insert(KEY, r#"[{"id":"n1","text":"stored"}]"#);
        let client = start(storage);

        assert_eq!(client.hydrate().await.unwrap(), 1);
        assert!(matches!(client.hydrate().await, Err(FrameworkError::AlreadyHydrated)));
        assert_eq!(client.get("n1".into()).await.unwrap().unwrap().text, "stored");
    }

    #[tokio::test]
    async fn test_mutations_wait_for_hydrate() {
        let storage = Arc::new(InMemoryStorage::new());
        let seeded = r#"[{"id":"n1","text":"a"},{"id":"n2","text":"b"}]"#;
        storage.insert(KEY, seeded);
        let client = start(storage.clone());

        assert!(matches!(client.create(note("new")).await, Err(FrameworkError::NotHydrated)));
        assert!(matches!(
            client.update("n1".into(), NotePatch { text: None }).await,
            Err(FrameworkError::NotHydrated)
        ));
        assert!(matches!(client.delete("n1".into()).await, Err(FrameworkError::NotHydrated)));
        assert_eq!(storage.raw(KEY), Some(seeded.as_bytes().to_vec()));

        assert_eq!(client.hydrate().await.unwrap(), 2);
        client.create(note("new")).await.unwrap();
        let texts: Vec<String> = client.list().await.unwrap().into_iter().map(|n| n.text).collect();
        assert_eq!(texts, vec!["a", "b", "new"]);
    }

    #[tokio::test]
    async fn test_malformed_blob_leaves_list_empty() {
        let storage = Arc::new(InMemoryStorage::new());
        storage.insert(KEY, "not json");
        let client = start(storage);

        assert!(matches!(client.hydrate().await, Err(FrameworkError::MalformedData(_))));
        assert!(client.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_overlapping_mutations_are_all_applied() {
        let storage = Arc::new(InMemoryStorage::new());
        let client = start(storage.clone());
        client.hydrate().await.unwrap();

        let tasks: Vec<_> = (0..25)
            .map(|i| {
                let client = client.clone();
                tokio::spawn(async move { client.create(note(&i.to_string())).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(client.list().await.unwrap().len(), 25);
        let stored: Vec<Note> = serde_json::from_slice(&storage.raw(KEY).unwrap()).unwrap();
        assert_eq!(stored.len(), 25);
    }
}
