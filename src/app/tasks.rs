//! Background API calls.
//!
//! Each call runs as a detached task on the tokio runtime and reports back
//! with exactly one [`AppEvent`] on an unbounded channel that the UI loop
//! drains. Nothing is cancelled or sequenced: completions are applied in
//! arrival order.

use std::future::Future;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::api::UserApi;
use crate::error::ApiError;
use crate::model::{NewUser, User, UserId};

/// Completion of a background API call.
#[derive(Debug)]
pub enum AppEvent {
    Fetched(Result<Vec<User>, ApiError>),
    Loaded {
        id: UserId,
        result: Result<User, ApiError>,
    },
    Created(Result<User, ApiError>),
    Updated {
        name: String,
        result: Result<User, ApiError>,
    },
    Deleted {
        id: UserId,
        name: String,
        result: Result<(), ApiError>,
    },
}

/// Spawns API calls and routes their results back to the UI loop.
pub struct Tasks<A> {
    handle: Handle,
    api: Arc<A>,
    tx: UnboundedSender<AppEvent>,
}

impl<A: UserApi + 'static> Tasks<A> {
    pub fn new(handle: Handle, api: Arc<A>) -> (Self, UnboundedReceiver<AppEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { handle, api, tx }, rx)
    }

    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = AppEvent> + Send + 'static,
    {
        let tx = self.tx.clone();
        self.handle.spawn(async move {
            let event = fut.await;
            if tx.send(event).is_err() {
                tracing::debug!("ui loop gone; dropping api result");
            }
        });
    }

    pub fn fetch_all(&self) {
        let api = Arc::clone(&self.api);
        self.spawn(async move { AppEvent::Fetched(api.fetch_all().await) });
    }

    pub fn fetch_one(&self, id: UserId) {
        let api = Arc::clone(&self.api);
        self.spawn(async move {
            let result = api.fetch_one(&id).await;
            AppEvent::Loaded { id, result }
        });
    }

    pub fn create(&self, user: NewUser) {
        let api = Arc::clone(&self.api);
        self.spawn(async move { AppEvent::Created(api.create(&user).await) });
    }

    pub fn update(&self, id: UserId, user: User) {
        let api = Arc::clone(&self.api);
        self.spawn(async move {
            let result = api.update(&id, &user).await;
            AppEvent::Updated {
                name: user.name,
                result,
            }
        });
    }

    pub fn delete(&self, id: UserId, name: String) {
        let api = Arc::clone(&self.api);
        self.spawn(async move {
            let result = api.delete(&id).await;
            AppEvent::Deleted { id, name, result }
        });
    }
}
