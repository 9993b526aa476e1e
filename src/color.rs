//! Colors used by the overlay.
//!
//! Colors are plain `Vec3` RGB triples in the 0.0-1.0 range, the same
//! representation the renderer and the surfaces consume.

use glam::Vec3;

/// Signature phosphor green (`#00ff41`).
pub const NEON_GREEN: Vec3 = Vec3::new(0.0, 1.0, 65.0 / 255.0);

/// Plain white (`#ffffff`).
pub const WHITE: Vec3 = Vec3::ONE;

/// Red glitch layer (`#ff0000`).
pub const GLITCH_RED: Vec3 = Vec3::new(1.0, 0.0, 0.0);

/// Blue glitch layer (`#0080ff`).
pub const GLITCH_BLUE: Vec3 = Vec3::new(0.0, 128.0 / 255.0, 1.0);

/// Convert a packed `0xRRGGBB` value to an RGB triple.
pub fn hex(rgb: u32) -> Vec3 {
    Vec3::new(
        ((rgb >> 16) & 0xff) as f32 / 255.0,
        ((rgb >> 8) & 0xff) as f32 / 255.0,
        (rgb & 0xff) as f32 / 255.0,
    )
}

/// Convert HSL to RGB.
///
/// `hue` is in degrees (any value, wrapped into 0-360), `saturation` and
/// `lightness` are percentages (0-100).
pub fn hsl(hue: f32, saturation: f32, lightness: f32) -> Vec3 {
    let h = hue.rem_euclid(360.0) / 360.0;
    let s = (saturation / 100.0).clamp(0.0, 1.0);
    let l = (lightness / 100.0).clamp(0.0, 1.0);

    if s == 0.0 {
        return Vec3::splat(l);
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    Vec3::new(
        hue_to_channel(p, q, h + 1.0 / 3.0),
        hue_to_channel(p, q, h),
        hue_to_channel(p, q, h - 1.0 / 3.0),
    )
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}
