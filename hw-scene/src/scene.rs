//! This module handles the declarative description of the whole scene.
//!
//! [`compose`] is the single place where the scene gets parameterised by the current theme, so
//! the renderer only has to turn a [`SceneSpec`] into entities.

use crate::{palette, FloatMotion, OrbitLimits, Rgb};
use glam::Vec3;
use hw_wish::OrnamentType;
use tracing::instrument;

/// The perspective camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraSpec {
    pub position: Vec3,
    pub target: Vec3,
    pub fov_degrees: f32,
}

/// A light that illuminates everything equally.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AmbientLightSpec {
    pub colour: Rgb,
    pub intensity: f32,
}

/// A cone of light pointing at the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpotLightSpec {
    pub position: Vec3,

    /// The angle of the outer edge of the cone, in radians.
    pub angle: f32,

    /// The fraction of the cone that fades out towards the edge, from 0 to 1.
    pub penumbra: f32,
    pub intensity: f32,
    pub colour: Rgb,
    pub casts_shadows: bool,
}

/// A light shining equally in all directions from a point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLightSpec {
    pub position: Vec3,
    pub intensity: f32,
    pub colour: Rgb,
}

/// A gift box with a ribbon tied around it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GiftBoxSpec {
    /// The position relative to the scene group.
    pub position: Vec3,

    /// The length of each side of the box.
    pub scale: f32,
    pub colour: Rgb,
    pub ribbon_colour: Rgb,
    pub motion: FloatMotion,
}

/// The reflective floor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FloorSpec {
    pub size: f32,
    pub height: f32,
    pub colour: Rgb,
    pub roughness: f32,
    pub metalness: f32,
}

/// The decorations on the tree, which follow the theme.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecorationSpec {
    /// The colour of the ornaments and the topper.
    pub glow: Rgb,

    /// The type of ornament hanging on the tree.
    pub ornament_type: OrnamentType,

    /// How brightly the ornaments glow.
    pub emissive_strength: f32,

    /// How fast the topper spins, in radians per second.
    pub topper_spin_speed: f32,
}

/// The bloom post-processing pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BloomSpec {
    pub intensity: f32,
    pub threshold: f32,
}

/// The falling snow's appearance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SnowLookSpec {
    pub colour: Rgb,
    pub opacity: f32,
}

/// The full description of the scene.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneSpec {
    pub background: Rgb,
    pub camera: CameraSpec,
    pub ambient: AmbientLightSpec,
    pub spot: SpotLightSpec,

    /// The accent light above the tree, coloured by the theme.
    pub accent: PointLightSpec,

    /// The offset of the group holding the tree, gifts, and floor.
    pub group_offset: Vec3,
    pub gifts: Vec<GiftBoxSpec>,
    pub floor: FloorSpec,
    pub decorations: DecorationSpec,
    pub orbit: OrbitLimits,
    pub bloom: BloomSpec,
    pub snow: SnowLookSpec,
}

/// Describe the scene for the given theme.
///
/// An invalid glow colour falls back to [`palette::ICE_GLOW`].
#[instrument]
pub fn compose(glow_colour: &str, ornament_type: OrnamentType, celebrating: bool) -> SceneSpec {
    let glow = Rgb::parse_or(glow_colour, Rgb::palette(palette::ICE_GLOW));
    let gold = Rgb::palette(palette::GOLD_METALLIC);
    let silver = Rgb::palette(palette::SILVER_METALLIC);
    let sapphire_deep = Rgb::palette(palette::SAPPHIRE_DEEP);
    let sapphire_lite = Rgb::palette(palette::SAPPHIRE_LITE);
    let platinum = Rgb::palette(palette::PLATINUM_BRIGHT);

    let gift = |position: [f32; 3], scale: f32, colour: Rgb, ribbon_colour: Rgb| GiftBoxSpec {
        position: Vec3::from(position),
        scale,
        colour,
        ribbon_colour,
        motion: FloatMotion::default(),
    };

    SceneSpec {
        background: Rgb::palette(palette::BACKGROUND),
        camera: CameraSpec {
            position: Vec3::new(0., 3., 11.),
            target: Vec3::ZERO,
            fov_degrees: 38.,
        },
        ambient: AmbientLightSpec {
            colour: Rgb::palette(palette::SNOW),
            intensity: 0.15,
        },
        spot: SpotLightSpec {
            position: Vec3::new(15., 20., 15.),
            angle: 0.25,
            penumbra: 1.,
            intensity: 5.,
            colour: Rgb::palette(palette::ARCTIC_BLUE),
            casts_shadows: true,
        },
        accent: PointLightSpec {
            position: Vec3::new(0., 3.5, 0.),
            intensity: 3.,
            colour: glow,
        },
        group_offset: Vec3::new(0., -2.5, 0.),
        gifts: vec![
            gift([-2.2, 0.2, 1.8], 0.45, sapphire_deep, silver),
            gift([2.1, 0.35, 1.5], 0.7, gold, platinum),
            gift([1.5, 0.25, 2.5], 0.5, silver, sapphire_lite),
            gift([-1.2, 0.2, 2.8], 0.4, gold, sapphire_deep),
            gift([0., 0.25, 3.2], 0.5, sapphire_lite, gold),
            gift([-2.5, 0.3, -0.5], 0.6, gold, silver),
        ],
        floor: FloorSpec {
            size: 100.,
            height: -0.01,
            colour: Rgb::palette(palette::BACKGROUND),
            roughness: 0.02,
            metalness: 0.95,
        },
        decorations: DecorationSpec {
            glow,
            ornament_type,
            emissive_strength: if celebrating { 4. } else { 1.5 },
            topper_spin_speed: if celebrating { 1.2 } else { 0. },
        },
        orbit: OrbitLimits {
            auto_rotate: !celebrating,
            ..OrbitLimits::default()
        },
        bloom: BloomSpec {
            intensity: 0.35,
            threshold: 0.6,
        },
        snow: SnowLookSpec {
            colour: Rgb::palette(palette::SNOW),
            opacity: 0.7,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hw_wish::{WishFlow, WishResponse};

    #[test]
    fn idle_scene_test() {
        let scene = compose(palette::ICE_GLOW, OrnamentType::Sphere, false);

        assert!(scene.orbit.auto_rotate);
        assert!(!scene.orbit.enable_pan);
        assert_eq!(scene.accent.colour, Rgb::palette(palette::ICE_GLOW));
        assert_eq!(scene.decorations.glow, scene.accent.colour);
        assert_eq!(scene.decorations.topper_spin_speed, 0.);
        assert_eq!(scene.gifts.len(), 6);
        assert_eq!(scene.camera.position, Vec3::new(0., 3., 11.));
        assert_eq!(scene.background, Rgb([0, 8, 16]));
    }

    #[test]
    fn celebrating_scene_test() {
        let idle = compose(palette::ICE_GLOW, OrnamentType::Sphere, false);
        let scene = compose("#ff4d6d", OrnamentType::Heart, true);

        assert!(!scene.orbit.auto_rotate);
        assert_eq!(scene.accent.colour, Rgb([255, 77, 109]));
        assert_eq!(scene.decorations.ornament_type, OrnamentType::Heart);
        assert!(scene.decorations.emissive_strength > idle.decorations.emissive_strength);
        assert!(scene.decorations.topper_spin_speed > 0.);

        // Only the themed parts change
        assert_eq!(scene.gifts, idle.gifts);
        assert_eq!(scene.spot, idle.spot);
        assert_eq!(scene.floor, idle.floor);
    }

    #[test]
    fn invalid_glow_colour_test() {
        let scene = compose("not a colour", OrnamentType::Star, true);
        assert_eq!(scene.accent.colour, Rgb::palette(palette::ICE_GLOW));
    }

    #[test]
    fn compose_from_flow_test() {
        let mut flow = WishFlow::new();
        assert!(flow.begin_submission());
        flow.finish_submission(WishResponse::fallback());

        let scene = compose(flow.glow_colour(), flow.ornament_type(), flow.is_celebrating());
        assert_eq!(scene.accent.colour, Rgb([0, 242, 255]));
        assert_eq!(scene.decorations.ornament_type, OrnamentType::Crystal);
        assert_eq!(scene.orbit.auto_rotate, flow.auto_rotate());

        flow.reset();
        let scene = compose(flow.glow_colour(), flow.ornament_type(), flow.is_celebrating());
        assert!(scene.orbit.auto_rotate);
    }
}
