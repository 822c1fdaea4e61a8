//! This crate handles wishes: the [`WishResponse`] that themes the scene, the remote
//! [`WishService`] that produces it, and the [`WishFlow`] that tracks a submission.

mod flow;
mod response;
mod service;

pub use self::{
    flow::{resolve_wish, AppPhase, WishFlow},
    response::{OrnamentType, WishResponse, DEFAULT_GLOW_COLOUR},
    service::{
        parse_generate_content, GeminiWishService, WishError, WishService, WishServiceConfig,
    },
};
