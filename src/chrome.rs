//! Host-side rendering of the retained element state.
//!
//! The simulation only records where the headline, cursor glyph and trail
//! marks are and how they are styled. This module turns that state into
//! draw calls on a third "chrome" surface that sits above the particle
//! layer. Text uses a built-in 5x7 dot font drawn as glowing dots.

use glam::{Vec2, Vec3};

use crate::color;
use crate::headline::Headline;
use crate::surface::{GlowCircle, Surface};
use crate::timer::Millis;
use crate::trail::TrailLayer;
use crate::viewport::Viewport;

const GLYPH_WIDTH: usize = 5;
const GLYPH_HEIGHT: usize = 7;
/// Glyph advance in cells, including one column of spacing.
const GLYPH_ADVANCE: usize = GLYPH_WIDTH + 1;

const CURSOR_RADIUS: f32 = 10.0;
const CURSOR_BLUR: f32 = 20.0;
const CURSOR_ALPHA: f32 = 0.8;

const TRAIL_RADIUS: f32 = 4.0;
const TRAIL_BLUR: f32 = 8.0;
const TRAIL_ALPHA: f32 = 0.6;

/// Opacity of each text-shadow layer.
const SHADOW_ALPHA: f32 = 0.35;

/// Everything the chrome layer needs for one frame.
#[derive(Debug, Clone, Copy)]
pub struct ChromeFrame<'a> {
    pub viewport: Viewport,
    pub headline: &'a Headline,
    pub cursor: Vec2,
    pub trails: &'a TrailLayer,
    pub trail_ttl: Millis,
    pub now: Millis,
}

/// Clear `surface` and draw trails, headline and cursor, back to front.
pub fn render<S: Surface + ?Sized>(surface: &mut S, frame: &ChromeFrame<'_>) {
    surface.clear();
    draw_trails(surface, frame.trails, frame.now, frame.trail_ttl);
    draw_headline(surface, frame.headline, &frame.viewport);
    draw_cursor(surface, frame.cursor);
}

pub fn draw_cursor<S: Surface + ?Sized>(surface: &mut S, position: Vec2) {
    surface.fill_circle(&GlowCircle {
        center: position,
        radius: CURSOR_RADIUS,
        color: color::NEON_GREEN,
        alpha: CURSOR_ALPHA,
        blur: CURSOR_BLUR,
    });
}

/// Draw each live mark, shrinking and fading toward the end of its life.
pub fn draw_trails<S: Surface + ?Sized>(
    surface: &mut S,
    trails: &TrailLayer,
    now: Millis,
    ttl: Millis,
) {
    for mark in trails.iter() {
        let fade = mark.fade(now, ttl);
        if fade <= 0.0 {
            continue;
        }
        surface.fill_circle(&GlowCircle {
            center: mark.position,
            radius: TRAIL_RADIUS * fade,
            color: color::NEON_GREEN,
            alpha: TRAIL_ALPHA * fade,
            blur: TRAIL_BLUR,
        });
    }
}

/// Draw the headline centered in the viewport, shifted by its translation,
/// shadow layers first (widest glow at the back), then the filtered text.
pub fn draw_headline<S: Surface + ?Sized>(surface: &mut S, headline: &Headline, viewport: &Viewport) {
    let dots = glyph_dots(&headline.text);
    if dots.is_empty() || viewport.is_empty() {
        return;
    }

    let cell = cell_size(&headline.text, viewport);
    let columns = headline.text.chars().count() * GLYPH_ADVANCE - 1;
    let extent = Vec2::new(columns as f32, GLYPH_HEIGHT as f32) * cell;
    let origin = viewport.center() + headline.translation - extent * 0.5;
    let dot_radius = cell * 0.45;

    let mut layers = headline.shadow.layers();
    layers.sort_by(|a, b| b.blur.total_cmp(&a.blur));
    for layer in layers {
        let color = headline.filter.apply(layer.color);
        draw_dots(surface, &dots, origin + layer.offset, cell, dot_radius, color, SHADOW_ALPHA, layer.blur * 0.5);
    }

    let text_color = headline.filter.apply(color::NEON_GREEN);
    draw_dots(surface, &dots, origin, cell, dot_radius, text_color, 1.0, 0.0);
}

#[allow(clippy::too_many_arguments)]
fn draw_dots<S: Surface + ?Sized>(
    surface: &mut S,
    dots: &[(usize, usize)],
    origin: Vec2,
    cell: f32,
    radius: f32,
    color: Vec3,
    alpha: f32,
    blur: f32,
) {
    for &(col, row) in dots {
        let center = origin + (Vec2::new(col as f32, row as f32) + 0.5) * cell;
        surface.fill_circle(&GlowCircle {
            center,
            radius,
            color,
            alpha,
            blur,
        });
    }
}

/// Dot size so the headline spans roughly 60% of the viewport width,
/// within readable limits.
fn cell_size(text: &str, viewport: &Viewport) -> f32 {
    let columns = (text.chars().count() * GLYPH_ADVANCE).max(1) as f32;
    (viewport.width() * 0.6 / columns).clamp(3.0, 14.0)
}

/// Lit `(column, row)` cells for `text`, columns counted across the string.
pub fn glyph_dots(text: &str) -> Vec<(usize, usize)> {
    let mut dots = Vec::new();
    for (index, ch) in text.chars().enumerate() {
        let rows = glyph(ch);
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if bits & (1 << (GLYPH_WIDTH - 1 - col)) != 0 {
                    dots.push((index * GLYPH_ADVANCE + col, row));
                }
            }
        }
    }
    dots
}

/// 5x7 bitmap for `ch`; unknown characters render blank.
fn glyph(ch: char) -> [u8; GLYPH_HEIGHT] {
    match ch.to_ascii_uppercase() {
        'A' => [0x0e, 0x11, 0x11, 0x1f, 0x11, 0x11, 0x11],
        'B' => [0x1e, 0x11, 0x11, 0x1e, 0x11, 0x11, 0x1e],
        'C' => [0x0e, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0e],
        'D' => [0x1e, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1e],
        'E' => [0x1f, 0x10, 0x10, 0x1e, 0x10, 0x10, 0x1f],
        'F' => [0x1f, 0x10, 0x10, 0x1e, 0x10, 0x10, 0x10],
        'G' => [0x0e, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0f],
        'H' => [0x11, 0x11, 0x11, 0x1f, 0x11, 0x11, 0x11],
        'I' => [0x0e, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0e],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0c],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1f],
        'M' => [0x11, 0x1b, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11],
        'O' => [0x0e, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0e],
        'P' => [0x1e, 0x11, 0x11, 0x1e, 0x10, 0x10, 0x10],
        'Q' => [0x0e, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0d],
        'R' => [0x1e, 0x11, 0x11, 0x1e, 0x14, 0x12, 0x11],
        'S' => [0x0f, 0x10, 0x10, 0x0e, 0x01, 0x01, 0x1e],
        'T' => [0x1f, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0e],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0a, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0a],
        'X' => [0x11, 0x11, 0x0a, 0x04, 0x0a, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x11, 0x0a, 0x04, 0x04, 0x04],
        'Z' => [0x1f, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1f],
        '0' => [0x0e, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0e],
        '1' => [0x04, 0x0c, 0x04, 0x04, 0x04, 0x04, 0x0e],
        '2' => [0x0e, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1f],
        '3' => [0x1f, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0e],
        '4' => [0x02, 0x06, 0x0a, 0x12, 0x1f, 0x02, 0x02],
        '5' => [0x1f, 0x10, 0x1e, 0x01, 0x01, 0x11, 0x0e],
        '6' => [0x06, 0x08, 0x10, 0x1e, 0x11, 0x11, 0x0e],
        '7' => [0x1f, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0e, 0x11, 0x11, 0x0e, 0x11, 0x11, 0x0e],
        '9' => [0x0e, 0x11, 0x11, 0x0f, 0x01, 0x02, 0x0c],
        '!' => [0x04, 0x04, 0x04, 0x04, 0x04, 0x00, 0x04],
        '?' => [0x0e, 0x11, 0x01, 0x02, 0x04, 0x00, 0x04],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0c, 0x0c],
        ',' => [0x00, 0x00, 0x00, 0x00, 0x0c, 0x04, 0x08],
        '-' => [0x00, 0x00, 0x00, 0x1f, 0x00, 0x00, 0x00],
        ':' => [0x00, 0x0c, 0x0c, 0x00, 0x0c, 0x0c, 0x00],
        _ => [0; GLYPH_HEIGHT],
    }
}
