//! This module handles the [`WishResponse`] type and the closed set of [`OrnamentType`]s.

use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoStaticStr};

/// The glow colour used when there's no wish response to theme the scene.
pub const DEFAULT_GLOW_COLOUR: &str = "#a5f3fc";

/// The type of ornament that should decorate the tree.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OrnamentType {
    Star,
    Heart,
    Crystal,
    #[default]
    Sphere,
}

impl OrnamentType {
    /// The literal used for this ornament type on the wire.
    pub fn literal(self) -> &'static str {
        self.into()
    }
}

/// The structured interpretation of a wish, as returned by the remote service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishResponse {
    /// A short label for the feeling of the wish.
    pub sentiment: String,

    /// The colour of the accent light, as a hex string like `#00f2ff`.
    #[serde(rename = "glowColor")]
    pub glow_colour: String,

    /// A free-text message to show to the user.
    pub message: String,

    /// The ornament used to decorate the tree.
    pub ornament_type: OrnamentType,
}

impl WishResponse {
    /// The fixed response used whenever a wish can't be processed, for whatever reason.
    pub fn fallback() -> Self {
        Self {
            sentiment: "Chilled".to_string(),
            glow_colour: "#00f2ff".to_string(),
            message: "Your wish sparkles with arctic brilliance.".to_string(),
            ornament_type: OrnamentType::Crystal,
        }
    }
}
