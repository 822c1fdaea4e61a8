//! This module handles the background thread that sends wishes to the wish service.
//!
//! Bevy's systems can't await anything, so the network call happens on its own thread with a
//! small `tokio` runtime. The frame loop sends wishes and polls for responses over channels.

use async_channel::{Receiver, Sender};
use bevy::prelude::Resource;
use hw_wish::{resolve_wish, GeminiWishService, WishResponse, WishService, WishServiceConfig};
use std::thread;
use tracing::{debug, info, instrument};
use tracing_unwrap::ResultExt;

/// The channels used to talk to the wish worker thread.
#[derive(Clone, Debug, Resource)]
pub struct WishChannels {
    /// Send a wish to be interpreted.
    pub request_tx: Sender<String>,

    /// Receive the interpreted wishes, in the order they were sent.
    pub response_rx: Receiver<WishResponse>,
}

/// Spawn the wish worker thread with a Gemini client and return the channels to talk to it.
///
/// The thread lives until the [`WishChannels`] get dropped.
pub fn spawn_wish_worker(config: WishServiceConfig) -> WishChannels {
    let (request_tx, request_rx) = async_channel::unbounded();
    let (response_tx, response_rx) = async_channel::unbounded();

    thread::Builder::new()
        .name("wish-worker".to_string())
        .spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect_or_log("Should be able to build a tokio runtime for the wish worker");

            runtime.block_on(run_wish_worker(
                GeminiWishService::new(config),
                request_rx,
                response_tx,
            ));
        })
        .expect_or_log("Should be able to spawn the wish worker thread");

    WishChannels {
        request_tx,
        response_rx,
    }
}

/// Resolve every wish from `requests` with the service and send the response back, until either
/// channel is closed.
///
/// Every wish gets exactly one response, falling back if the service fails.
#[instrument(skip_all)]
pub async fn run_wish_worker<S: WishService>(
    service: S,
    requests: Receiver<String>,
    responses: Sender<WishResponse>,
) {
    info!("Wish worker listening");

    while let Ok(wish) = requests.recv().await {
        debug!(?wish, "Received wish");
        let response = resolve_wish(&service, &wish).await;

        if responses.send(response).await.is_err() {
            break;
        }
    }

    info!("Wish worker shutting down");
}
