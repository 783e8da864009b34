//! Software rasterizer for PNG frame output.

use glam::DVec2;
use image::{Rgba, RgbaImage};

use crate::params::WaveConfig;
use crate::session::Frame;

const BACKGROUND: Rgba<u8> = Rgba([0, 0, 0, 255]);
const FALLBACK_COLOR: [u8; 3] = [255, 255, 255];

/// Parse `#rrggbb` (or `rrggbb`) into RGB bytes
pub fn parse_hex_color(text: &str) -> Option<[u8; 3]> {
    let hex = text.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

/// Fill every ribbon of the frame over a black background
///
/// Polygons use the even-odd rule, sampled at pixel centres. Layers are
/// composited in draw order with straight alpha blending.
pub fn rasterize(frame: &Frame, width: u32, height: u32, wave: &WaveConfig) -> RgbaImage {
    let mut img = RgbaImage::from_pixel(width, height, BACKGROUND);

    for ribbon in &frame.ribbons {
        let rgb = wave
            .colors
            .get(ribbon.layer)
            .and_then(|c| parse_hex_color(c))
            .unwrap_or(FALLBACK_COLOR);
        let alpha = wave
            .opacity
            .get(ribbon.layer)
            .copied()
            .unwrap_or(1.0)
            .clamp(0.0, 1.0);

        fill_polygon(&mut img, &ribbon.points(), rgb, alpha);
    }

    img
}

fn fill_polygon(img: &mut RgbaImage, points: &[DVec2], rgb: [u8; 3], alpha: f32) {
    if points.len() < 3 || alpha <= 0.0 {
        return;
    }
    let (width, height) = img.dimensions();
    let mut crossings: Vec<f64> = Vec::new();

    for row in 0..height {
        let y = row as f64 + 0.5;

        crossings.clear();
        for (i, a) in points.iter().enumerate() {
            let b = points[(i + 1) % points.len()];
            // Half-open test so shared vertices are counted once
            if (a.y <= y) != (b.y <= y) {
                let t = (y - a.y) / (b.y - a.y);
                crossings.push(a.x + t * (b.x - a.x));
            }
        }
        crossings.sort_by(|a, b| a.total_cmp(b));

        for span in crossings.chunks_exact(2) {
            // Pixel centres inside [x0, x1)
            let start = (span[0] - 0.5).ceil().max(0.0);
            let end = (span[1] - 0.5).ceil().min(width as f64);
            let (start, end) = (start as u32, end.max(0.0) as u32);
            for col in start..end {
                blend(img.get_pixel_mut(col, row), rgb, alpha);
            }
        }
    }
}

fn blend(dst: &mut Rgba<u8>, rgb: [u8; 3], alpha: f32) {
    let [r, g, b, a] = &mut dst.0;
    for (channel, src) in [r, g, b].into_iter().zip(rgb) {
        let mixed = src as f32 * alpha + *channel as f32 * (1.0 - alpha);
        *channel = mixed.round().clamp(0.0, 255.0) as u8;
    }
    *a = 255;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::FrequencyBands;
    use crate::ribbon::RibbonGeometry;

    fn frame(ribbons: Vec<RibbonGeometry>) -> Frame {
        Frame {
            time: 0.0,
            bands: FrequencyBands::default(),
            beat_intensity: 0.0,
            scope_intensity: 0.0,
            amplitude: 0.0,
            ribbons,
        }
    }

    fn band(layer: usize, y0: f64, y1: f64) -> RibbonGeometry {
        RibbonGeometry {
            layer,
            top: vec![DVec2::new(0.0, y0), DVec2::new(20.0, y0)],
            bottom: vec![DVec2::new(20.0, y1), DVec2::new(0.0, y1)],
        }
    }

    fn opaque() -> WaveConfig {
        WaveConfig {
            opacity: [1.0, 1.0, 1.0],
            ..WaveConfig::default()
        }
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#ff2e88"), Some([255, 46, 136]));
        assert_eq!(parse_hex_color("22d3ee"), Some([34, 211, 238]));
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("#gg0000"), None);
    }

    #[test]
    fn test_fills_inside_only() {
        let img = rasterize(&frame(vec![band(0, 4.0, 8.0)]), 20, 12, &opaque());

        assert_eq!(img.get_pixel(10, 5), &Rgba([255, 46, 136, 255]));
        assert_eq!(img.get_pixel(0, 4), &Rgba([255, 46, 136, 255]));
        assert_eq!(img.get_pixel(10, 3), &BACKGROUND);
        assert_eq!(img.get_pixel(10, 8), &BACKGROUND);
    }

    #[test]
    fn test_alpha_blends_over_background() {
        let mut wave = opaque();
        wave.colors[1] = "#ffffff".to_string();
        wave.opacity[1] = 0.5;

        let img = rasterize(&frame(vec![band(1, 0.0, 10.0)]), 20, 10, &wave);
        assert_eq!(img.get_pixel(3, 3), &Rgba([128, 128, 128, 255]));
    }

    #[test]
    fn test_later_layers_draw_on_top() {
        let img = rasterize(
            &frame(vec![band(0, 0.0, 10.0), band(2, 0.0, 10.0)]),
            20,
            10,
            &opaque(),
        );
        assert_eq!(img.get_pixel(5, 5), &Rgba([34, 211, 238, 255]));
    }

    #[test]
    fn test_empty_viewport() {
        let img = rasterize(&frame(vec![band(0, 0.0, 10.0)]), 0, 0, &opaque());
        assert_eq!(img.dimensions(), (0, 0));
    }
}
