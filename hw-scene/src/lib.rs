//! This crate describes the holiday scene without depending on any renderer.
//!
//! The scene is made of static parts (camera, lights, gifts, floor) and themed parts (the accent
//! light and the tree's decorations), and [`compose`] puts them together for a given theme. The
//! other modules provide the geometry and motion that the renderer needs.

mod colour;
mod float;
mod orbit;
mod ornament;
mod scene;
mod tree;

pub use self::{
    colour::{palette, ColourError, Rgb},
    float::{FloatMotion, FloatPose},
    orbit::OrbitLimits,
    ornament::{extrude, ornament_geometry, ornament_outline, OrnamentGeometry, PrismMesh},
    scene::{
        compose, AmbientLightSpec, BloomSpec, CameraSpec, DecorationSpec, FloorSpec, GiftBoxSpec,
        PointLightSpec, SceneSpec, SnowLookSpec, SpotLightSpec,
    },
    tree::{Branch, TreeConfig, TreeLayout},
};
