//! This module handles the egui overlay, where wishes get made and answered.

use crate::wish_worker::WishChannels;
use async_channel::TryRecvError;
use bevy::prelude::*;
use bevy_egui::{
    egui::{self, Align2, Color32, RichText},
    EguiContext,
};
use hw_scene::{palette, Rgb};
use hw_wish::{WishFlow, WishResponse};
use tracing::{info, warn};

/// The state of the overlay.
#[derive(Clone, Debug, Default, Resource)]
pub struct WishState {
    /// Where the current wish is in its lifecycle.
    pub flow: WishFlow,

    /// The text in the wish entry.
    pub draft: String,
}

/// Convert a palette colour into an egui colour.
fn egui_colour(rgb: Rgb) -> Color32 {
    let [r, g, b] = rgb.0;
    Color32::from_rgb(r, g, b)
}

/// Send the drafted wish to the worker thread. Blank wishes are ignored, as is anything sent
/// while another wish is still in flight.
pub(super) fn submit_wish(state: &mut WishState, channels: &WishChannels) {
    let wish = state.draft.trim();
    if wish.is_empty() || !state.flow.begin_submission() {
        return;
    }

    info!(?wish, "Submitting wish");
    if let Err(error) = channels.request_tx.try_send(wish.to_string()) {
        warn!(%error, "Unable to reach the wish worker, using fallback response");
        state.flow.finish_submission(WishResponse::fallback());
    }
}

/// Store any responses that the worker thread has sent back. If the worker has gone away while
/// a wish is in flight, the fallback is stored instead.
pub(super) fn poll_wish_responses(channels: Res<WishChannels>, mut state: ResMut<WishState>) {
    loop {
        match channels.response_rx.try_recv() {
            Ok(response) => {
                info!(?response, "Received wish response");
                state.flow.finish_submission(response);
            }
            Err(TryRecvError::Empty) => break,
            Err(TryRecvError::Closed) => {
                if state.flow.is_loading() {
                    warn!("Wish worker stopped before answering, using fallback response");
                    state.flow.finish_submission(WishResponse::fallback());
                }
                break;
            }
        }
    }
}

/// Render the overlay.
pub(super) fn render_wish_ui(
    mut egui_context: ResMut<EguiContext>,
    mut state: ResMut<WishState>,
    channels: Res<WishChannels>,
) {
    let ctx = egui_context.ctx_mut();
    let ice = egui_colour(Rgb::palette(palette::ICE_GLOW));

    egui::Area::new("title")
        .anchor(Align2::CENTER_TOP, [0., 24.])
        .interactable(false)
        .show(ctx, |ui| {
            ui.label(RichText::new("Holiday Wishes").size(36.).color(ice));
        });

    match state.flow.response().cloned() {
        None => {
            egui::Window::new("Make a wish")
                .anchor(Align2::CENTER_BOTTOM, [0., -40.])
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label("Whisper your holiday wish to the frost.");

                    let enabled = !state.flow.is_loading();
                    let entry = ui.add_enabled(
                        enabled,
                        egui::TextEdit::singleline(&mut state.draft)
                            .hint_text("I wish for...")
                            .desired_width(320.),
                    );
                    let pressed_enter =
                        entry.lost_focus() && ui.input().key_pressed(egui::Key::Enter);

                    let can_send = enabled && !state.draft.trim().is_empty();
                    let clicked = ui
                        .add_enabled(can_send, egui::Button::new("Send wish"))
                        .clicked();

                    if pressed_enter || clicked {
                        submit_wish(&mut state, &channels);
                    }
                });
        }
        Some(response) => {
            let glow = egui_colour(Rgb::parse_or(
                &response.glow_colour,
                Rgb::palette(palette::ICE_GLOW),
            ));

            egui::Window::new("Your wish")
                .anchor(Align2::CENTER_BOTTOM, [0., -40.])
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(RichText::new(&response.sentiment).size(24.).color(glow));
                    ui.label(&response.message);
                    ui.label(format!(
                        "Your tree is now hung with {} ornaments.",
                        response.ornament_type.literal()
                    ));

                    if ui.button("Make another wish").clicked() {
                        state.flow.reset();
                        state.draft.clear();
                    }
                });
        }
    }

    if state.flow.is_loading() {
        let sapphire = egui_colour(Rgb::palette(palette::SAPPHIRE_LITE));

        egui::Area::new("loading-veil")
            .order(egui::Order::Foreground)
            .fixed_pos(egui::Pos2::ZERO)
            .show(ctx, |ui| {
                let screen = ui.ctx().input().screen_rect();
                ui.painter()
                    .rect_filled(screen, 0., Color32::from_black_alpha(204));

                ui.allocate_ui_at_rect(screen, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(screen.height() / 2. - 48.);
                        ui.add(egui::Spinner::new().size(48.));
                        ui.label(
                            RichText::new("CHANNELLING SAPPHIRE RADIANCE")
                                .italics()
                                .size(20.)
                                .color(sapphire),
                        );
                    });
                });
            });
    }
}
