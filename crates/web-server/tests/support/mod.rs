//! Shared harness: the production router on an ephemeral port, backed by
//! storage chosen per test.

#![allow(dead_code)]

use async_trait::async_trait;
use configuration::ServerSettings;
use core_types::{Comment, Enterprise, Event, Participant, Post, RequestContext};
use database::{DbError, InMemoryRepository, Storage};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{oneshot, Notify};
use tokio::task::JoinHandle;
use web_server::{build_router, serve, AppState, ServeError};

pub struct TestServer {
    pub base_url: String,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<Result<(), ServeError>>>,
}

impl TestServer {
    pub async fn spawn() -> Self {
        Self::spawn_with(
            Arc::new(InMemoryRepository::new()),
            Duration::from_secs(5),
            Duration::from_secs(10),
        )
        .await
    }

    pub async fn spawn_with(
        storage: Arc<dyn Storage>,
        request_timeout: Duration,
        drain_timeout: Duration,
    ) -> Self {
        let state = Arc::new(AppState::new(storage, request_timeout));
        let router = build_router(state, &server_settings()).expect("router builds");

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(serve(
            listener,
            router,
            async move {
                let _ = shutdown_rx.await;
            },
            drain_timeout,
        ));

        Self { base_url, shutdown: Some(shutdown_tx), handle: Some(handle) }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Equivalent of the termination signal.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }

    /// Waits for `serve` to return after [`TestServer::shutdown`].
    pub async fn stopped(mut self) -> Result<(), ServeError> {
        let handle = self.handle.take().expect("server already awaited");
        handle.await.expect("server task panicked")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

pub fn server_settings() -> ServerSettings {
    ServerSettings {
        address: "127.0.0.1:0".to_string(),
        timeout: 5,
        shutdown_timeout: 10,
        cors_origins: vec!["http://localhost:3000".to_string()],
        body_limit: 64 * 1024,
    }
}

/// Wraps an in-memory store and delays `list_enterprises`, announcing when a
/// call has started.
pub struct SlowStorage {
    inner: InMemoryRepository,
    delay: Duration,
    pub started: Arc<Notify>,
}

impl SlowStorage {
    pub fn new(delay: Duration) -> Self {
        Self { inner: InMemoryRepository::new(), delay, started: Arc::new(Notify::new()) }
    }
}

#[async_trait]
impl Storage for SlowStorage {
    async fn ping(&self, ctx: &RequestContext) -> Result<(), DbError> {
        self.inner.ping(ctx).await
    }

    async fn register_enterprise(&self, ctx: &RequestContext, name: &str) -> Result<i64, DbError> {
        self.inner.register_enterprise(ctx, name).await
    }

    async fn register_event(
        &self,
        ctx: &RequestContext,
        name: &str,
        description: &str,
        enterprise_id: i64,
    ) -> Result<i64, DbError> {
        self.inner.register_event(ctx, name, description, enterprise_id).await
    }

    async fn register_participant(
        &self,
        ctx: &RequestContext,
        event_id: i64,
        name: &str,
    ) -> Result<i64, DbError> {
        self.inner.register_participant(ctx, event_id, name).await
    }

    async fn create_post(
        &self,
        ctx: &RequestContext,
        content: &str,
        event_id: i64,
    ) -> Result<i64, DbError> {
        self.inner.create_post(ctx, content, event_id).await
    }

    async fn create_comment(
        &self,
        ctx: &RequestContext,
        post_id: i64,
        participant_id: i64,
        content: &str,
    ) -> Result<i64, DbError> {
        self.inner.create_comment(ctx, post_id, participant_id, content).await
    }

    async fn list_enterprises(&self, ctx: &RequestContext) -> Result<Vec<Enterprise>, DbError> {
        self.started.notify_one();
        tokio::time::sleep(self.delay).await;
        // Read without the deadline so only the handler's bound applies.
        let relaxed = RequestContext::new(ctx.request_id.clone(), Duration::from_secs(60));
        self.inner.list_enterprises(&relaxed).await
    }

    async fn list_events(&self, ctx: &RequestContext) -> Result<Vec<Event>, DbError> {
        self.inner.list_events(ctx).await
    }

    async fn list_participants(&self, ctx: &RequestContext) -> Result<Vec<Participant>, DbError> {
        self.inner.list_participants(ctx).await
    }

    async fn list_posts(&self, ctx: &RequestContext) -> Result<Vec<Post>, DbError> {
        self.inner.list_posts(ctx).await
    }

    async fn list_comments(&self, ctx: &RequestContext) -> Result<Vec<Comment>, DbError> {
        self.inner.list_comments(ctx).await
    }
}

/// Storage whose every call fails, as when the database is down.
pub struct FailingStorage;

fn unavailable() -> DbError {
    DbError::Unavailable("database is down".to_string())
}

#[async_trait]
impl Storage for FailingStorage {
    async fn ping(&self, _ctx: &RequestContext) -> Result<(), DbError> {
        Err(unavailable())
    }

    async fn register_enterprise(
        &self,
        _ctx: &RequestContext,
        _name: &str,
    ) -> Result<i64, DbError> {
        Err(unavailable())
    }

    async fn register_event(
        &self,
        _ctx: &RequestContext,
        _name: &str,
        _description: &str,
        _enterprise_id: i64,
    ) -> Result<i64, DbError> {
        Err(unavailable())
    }

    async fn register_participant(
        &self,
        _ctx: &RequestContext,
        _event_id: i64,
        _name: &str,
    ) -> Result<i64, DbError> {
        Err(unavailable())
    }

    async fn create_post(
        &self,
        _ctx: &RequestContext,
        _content: &str,
        _event_id: i64,
    ) -> Result<i64, DbError> {
        Err(unavailable())
    }

    async fn create_comment(
        &self,
        _ctx: &RequestContext,
        _post_id: i64,
        _participant_id: i64,
        _content: &str,
    ) -> Result<i64, DbError> {
        Err(unavailable())
    }

    async fn list_enterprises(&self, _ctx: &RequestContext) -> Result<Vec<Enterprise>, DbError> {
        Err(unavailable())
    }

    async fn list_events(&self, _ctx: &RequestContext) -> Result<Vec<Event>, DbError> {
        Err(unavailable())
    }

    async fn list_participants(&self, _ctx: &RequestContext) -> Result<Vec<Participant>, DbError> {
        Err(unavailable())
    }

    async fn list_posts(&self, _ctx: &RequestContext) -> Result<Vec<Post>, DbError> {
        Err(unavailable())
    }

    async fn list_comments(&self, _ctx: &RequestContext) -> Result<Vec<Comment>, DbError> {
        Err(unavailable())
    }
}
