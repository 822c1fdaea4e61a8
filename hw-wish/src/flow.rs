//! This module handles the state of a wish submission, from typing the wish to celebrating it.

use crate::{OrnamentType, WishResponse, WishService, DEFAULT_GLOW_COLOUR};
use tracing::{info, instrument, warn};

/// The observable phase of the app.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AppPhase {
    /// No wish has been answered yet, so the camera drifts around the tree.
    Idle,

    /// A wish is being processed by the remote service.
    Wishing,

    /// A wish has been answered and the scene is themed by it.
    Celebrating,
}

/// Ask the service to interpret the wish, using [`WishResponse::fallback`] if anything at all
/// goes wrong.
#[instrument(skip(service))]
pub async fn resolve_wish<S: WishService>(service: &S, wish: &str) -> WishResponse {
    match service.request_wish(wish).await {
        Ok(response) => {
            info!(?response, "Wish interpreted");
            response
        }
        Err(error) => {
            warn!(%error, "Wish processing failed, using fallback response");
            WishResponse::fallback()
        }
    }
}

/// The transient UI state of the wish flow.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WishFlow {
    /// Whether a submission is currently in flight.
    loading: bool,

    /// The response to the most recent wish, if there is one.
    response: Option<WishResponse>,
}

impl WishFlow {
    /// Create an idle flow with no response.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a submission as started and return true, unless one is already in flight, in which
    /// case nothing changes and this returns false.
    pub fn begin_submission(&mut self) -> bool {
        if self.loading {
            return false;
        }

        self.loading = true;
        true
    }

    /// Store the response of the in-flight submission and stop loading.
    pub fn finish_submission(&mut self, response: WishResponse) {
        if !self.loading {
            warn!("Finishing a wish submission that was never started");
        }

        self.response = Some(response);
        self.loading = false;
    }

    /// Submit the wish to the service and store whatever it resolves to.
    ///
    /// Returns false if a submission was already in flight and this one was refused.
    pub async fn submit<S: WishService>(&mut self, service: &S, wish: &str) -> bool {
        if !self.begin_submission() {
            return false;
        }

        let response = resolve_wish(service, wish).await;
        self.finish_submission(response);
        true
    }

    /// Clear the response and return to idle.
    pub fn reset(&mut self) {
        self.response = None;
    }

    /// Whether a submission is currently in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The response to the most recent wish.
    pub fn response(&self) -> Option<&WishResponse> {
        self.response.as_ref()
    }

    /// Whether there's a response to celebrate.
    pub fn is_celebrating(&self) -> bool {
        self.response.is_some()
    }

    /// Whether the camera should drift around the tree on its own.
    pub fn auto_rotate(&self) -> bool {
        !self.is_celebrating()
    }

    /// The current phase, with loading taking priority.
    pub fn phase(&self) -> AppPhase {
        if self.loading {
            AppPhase::Wishing
        } else if self.is_celebrating() {
            AppPhase::Celebrating
        } else {
            AppPhase::Idle
        }
    }

    /// The colour of the accent light.
    pub fn glow_colour(&self) -> &str {
        self.response
            .as_ref()
            .map_or(DEFAULT_GLOW_COLOUR, |response| &response.glow_colour)
    }

    /// The ornament decorating the tree.
    pub fn ornament_type(&self) -> OrnamentType {
        self.response
            .as_ref()
            .map_or_else(OrnamentType::default, |response| response.ornament_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WishError;
    use std::cell::Cell;

    /// A service that always fails, counting how often it's asked.
    #[derive(Default)]
    struct FailingService {
        calls: Cell<u32>,
    }

    impl WishService for FailingService {
        async fn request_wish(&self, _wish: &str) -> Result<WishResponse, WishError> {
            self.calls.set(self.calls.get() + 1);
            Err(WishError::Status {
                status: 500,
                body: "internal error".to_string(),
            })
        }
    }

    /// A service that answers every wish with the same response.
    struct FixedService(WishResponse);

    impl WishService for FixedService {
        async fn request_wish(&self, _wish: &str) -> Result<WishResponse, WishError> {
            Ok(self.0.clone())
        }
    }

    fn golden_response() -> WishResponse {
        WishResponse {
            sentiment: "Radiant".to_string(),
            glow_colour: "#ffd700".to_string(),
            message: "Your wish shines like a star on the highest bough.".to_string(),
            ornament_type: OrnamentType::Star,
        }
    }

    #[tokio::test]
    async fn failed_wish_uses_fallback_test() {
        let service = FailingService::default();
        let mut flow = WishFlow::new();

        assert!(flow.submit(&service, "peace").await);

        assert_eq!(service.calls.get(), 1);
        assert_eq!(flow.response(), Some(&WishResponse::fallback()));
        assert!(!flow.is_loading());
        assert_eq!(flow.phase(), AppPhase::Celebrating);
        assert_eq!(flow.glow_colour(), "#00f2ff");
        assert_eq!(flow.ornament_type(), OrnamentType::Crystal);
    }

    #[tokio::test]
    async fn successful_wish_test() {
        let service = FixedService(golden_response());
        let mut flow = WishFlow::new();

        assert!(flow.submit(&service, "a white christmas").await);

        assert_eq!(flow.response(), Some(&golden_response()));
        assert!(!flow.is_loading());
        assert!(!flow.auto_rotate());
        assert_eq!(flow.glow_colour(), "#ffd700");
        assert_eq!(flow.ornament_type(), OrnamentType::Star);
    }

    #[tokio::test]
    async fn resolve_wish_test() {
        assert_eq!(
            resolve_wish(&FailingService::default(), "peace").await,
            WishResponse::fallback()
        );
        assert_eq!(
            resolve_wish(&FixedService(golden_response()), "peace").await,
            golden_response()
        );
    }

    #[test]
    fn loading_blocks_new_submissions_test() {
        let mut flow = WishFlow::new();
        assert_eq!(flow.phase(), AppPhase::Idle);

        assert!(flow.begin_submission());
        assert!(flow.is_loading());
        assert_eq!(flow.phase(), AppPhase::Wishing);

        assert!(!flow.begin_submission());
        assert!(flow.is_loading());

        flow.finish_submission(WishResponse::fallback());
        assert!(!flow.is_loading());
        assert_eq!(flow.phase(), AppPhase::Celebrating);

        assert!(flow.begin_submission());
    }

    #[tokio::test]
    async fn refused_submission_does_not_call_service_test() {
        let service = FailingService::default();
        let mut flow = WishFlow::new();

        assert!(flow.begin_submission());
        assert!(!flow.submit(&service, "peace").await);
        assert_eq!(service.calls.get(), 0);
        assert!(flow.is_loading());
        assert_eq!(flow.response(), None);
    }

    #[tokio::test]
    async fn reset_test() {
        let mut flow = WishFlow::new();
        assert!(flow.auto_rotate());

        flow.submit(&FixedService(golden_response()), "snow").await;
        assert!(flow.is_celebrating());
        assert!(!flow.auto_rotate());

        flow.reset();
        assert_eq!(flow.response(), None);
        assert!(flow.auto_rotate());
        assert_eq!(flow.phase(), AppPhase::Idle);
        assert_eq!(flow.glow_colour(), DEFAULT_GLOW_COLOUR);
        assert_eq!(flow.ornament_type(), OrnamentType::Sphere);
    }
}
