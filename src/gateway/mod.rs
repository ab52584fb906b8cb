//! Generative content gateway
//!
//! Every outbound request runs on a single queue worker, wrapped in the retry
//! policy. Callers get `Option`s back: any failure is logged and degrades to
//! an absent result.

mod backend;
mod cache;
mod error;
mod queue;
mod retry;

pub use backend::{GeminiClient, GenerativeBackend, ImageRef};
pub use cache::{ArtifactCache, CacheError, MemoryArtifactCache, NoCache, SqliteArtifactCache};
pub use error::GatewayError;
pub use queue::{RequestQueue, DEFAULT_COOLDOWN};
pub use retry::{RetryPolicy, DEFAULT_INITIAL_BACKOFF, DEFAULT_MAX_RETRIES};

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;

use crate::audio::PcmAudio;
use crate::config::GatewayConfig;

pub type Result<T> = std::result::Result<T, GatewayError>;

/// Prompt used for word illustrations
pub fn illustration_prompt(word: &str) -> String {
    format!(
        "Disney Pixar 3D style illustration of {}, bright colors, cute character, simple background.",
        word
    )
}

pub fn illustration_cache_key(word: &str) -> String {
    format!("illustration_{}", word)
}

pub fn icon_cache_key(character: &str) -> String {
    format!("icon_{}", character)
}

type BackendCall<T> =
    dyn Fn(Arc<dyn GenerativeBackend>) -> BoxFuture<'static, Result<Option<T>>> + Send + Sync;

pub struct ContentGateway {
    backend: Arc<dyn GenerativeBackend>,
    cache: Arc<dyn ArtifactCache>,
    queue: RequestQueue,
    retry: RetryPolicy,
}

impl ContentGateway {
    /// Create a gateway and start its worker. Must be called inside a tokio runtime.
    pub fn new(
        backend: Arc<dyn GenerativeBackend>,
        cache: Arc<dyn ArtifactCache>,
        retry: RetryPolicy,
        cooldown: Duration,
    ) -> Self {
        Self {
            backend,
            cache,
            queue: RequestQueue::start(cooldown),
            retry,
        }
    }

    /// Gemini-backed gateway with a SQLite cache at `cache_path`.
    ///
    /// An unusable cache is replaced by [`NoCache`]; a missing API key is an error.
    pub fn from_config(config: &GatewayConfig, cache_path: PathBuf) -> Result<Self> {
        let backend = GeminiClient::from_config(config)?;

        let cache: Arc<dyn ArtifactCache> = match SqliteArtifactCache::open(cache_path) {
            Ok(cache) => Arc::new(cache),
            Err(e) => {
                log::warn!("gateway: artifact cache unavailable, continuing without: {}", e);
                Arc::new(NoCache)
            }
        };

        Ok(Self::new(
            Arc::new(backend),
            cache,
            config.retry_policy(),
            config.cooldown(),
        ))
    }

    pub async fn generate_illustration(&self, word: &str) -> Option<ImageRef> {
        let prompt = illustration_prompt(word);
        self.dispatch::<ImageRef>(
            format!("illustration of {:?}", word),
            Box::new(move |backend: Arc<dyn GenerativeBackend>| {
                let prompt = prompt.clone();
                async move { backend.generate_image(&prompt).await }.boxed()
            }),
        )
        .await
    }

    pub async fn generate_icon(&self, prompt: &str) -> Option<ImageRef> {
        let prompt = prompt.to_string();
        self.dispatch::<ImageRef>(
            "character icon".to_string(),
            Box::new(move |backend: Arc<dyn GenerativeBackend>| {
                let prompt = prompt.clone();
                async move { backend.generate_image(&prompt).await }.boxed()
            }),
        )
        .await
    }

    pub async fn generate_pronunciation(&self, word: &str) -> Option<PcmAudio> {
        let word = word.to_string();
        self.dispatch::<PcmAudio>(
            format!("pronunciation of {:?}", word),
            Box::new(move |backend: Arc<dyn GenerativeBackend>| {
                let word = word.clone();
                async move { backend.generate_speech(&word).await }.boxed()
            }),
        )
        .await
    }

    /// Blocking cache read; async callers go through the blocking pool instead
    pub fn cached_artifact(&self, key: &str) -> Option<ImageRef> {
        self.cache.get(key).map(ImageRef::from_data_url)
    }

    pub fn put_cached_artifact(&self, key: &str, value: &ImageRef) {
        self.cache.put(key, value.as_str());
    }

    /// Cached illustration for `word`, generating and storing one on a miss
    pub async fn illustration_for(&self, word: &str) -> Option<ImageRef> {
        let key = illustration_cache_key(word);
        if let Some(hit) = self.lookup(&key).await {
            return Some(hit);
        }
        let image = self.generate_illustration(word).await?;
        self.store(key, image.clone()).await;
        Some(image)
    }

    /// Cached icon for a pack character, generating one from `prompt` on a miss
    pub async fn icon_for(&self, character: &str, prompt: &str) -> Option<ImageRef> {
        let key = icon_cache_key(character);
        if let Some(hit) = self.lookup(&key).await {
            return Some(hit);
        }
        let image = self.generate_icon(prompt).await?;
        self.store(key, image.clone()).await;
        Some(image)
    }

    /// Cache read on the blocking pool so SQLite I/O stays off the async workers
    async fn lookup(&self, key: &str) -> Option<ImageRef> {
        let cache = Arc::clone(&self.cache);
        let key = key.to_string();
        match tokio::task::spawn_blocking(move || cache.get(&key)).await {
            Ok(hit) => hit.map(ImageRef::from_data_url),
            Err(e) => {
                log::warn!("gateway: cache lookup task failed: {}", e);
                None
            }
        }
    }

    async fn store(&self, key: String, value: ImageRef) {
        let cache = Arc::clone(&self.cache);
        let result = tokio::task::spawn_blocking(move || cache.put(&key, value.as_str())).await;
        if let Err(e) = result {
            log::warn!("gateway: cache write task failed: {}", e);
        }
    }

    async fn dispatch<T>(&self, label: String, call: Box<BackendCall<T>>) -> Option<T>
    where
        T: Send + 'static,
    {
        let backend = Arc::clone(&self.backend);
        let retry = self.retry.clone();
        let task_label = label.clone();
        let task = async move {
            retry
                .run(&task_label, || call(Arc::clone(&backend)))
                .await
        };

        match self.queue.submit(&label, task).await.and_then(|r| r) {
            Ok(Some(value)) => Some(value),
            Ok(None) => {
                log::warn!("gateway: {} returned no content", label);
                None
            }
            Err(e) => {
                log::error!("gateway: {} failed: {}", label, e);
                None
            }
        }
    }
}
