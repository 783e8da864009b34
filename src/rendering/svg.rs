//! SVG path and document output.

use std::fmt::Write;

use crate::params::WaveConfig;
use crate::ribbon::RibbonGeometry;
use crate::session::Frame;

/// Closed path `M x y L x y ... Z` through the ribbon outline
pub fn path_data(ribbon: &RibbonGeometry) -> String {
    let mut d = String::with_capacity(ribbon.len() * 16);
    for (i, p) in ribbon.outline().enumerate() {
        let cmd = if i == 0 { 'M' } else { 'L' };
        // Writing into a String cannot fail
        let _ = write!(d, "{}{:.2} {:.2} ", cmd, p.x, p.y);
    }
    if !d.is_empty() {
        d.push('Z');
    }
    d
}

/// Full SVG document for one frame, one `<path>` per layer
///
/// Styling is looked up by layer id so a layer keeps its colour across
/// frames regardless of draw order.
pub fn document(frame: &Frame, width: u32, height: u32, wave: &WaveConfig) -> String {
    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = width,
        h = height
    );
    let _ = writeln!(svg, r#"  <rect width="100%" height="100%" fill="black"/>"#);

    for ribbon in &frame.ribbons {
        let color = wave
            .colors
            .get(ribbon.layer)
            .map(String::as_str)
            .unwrap_or("white");
        let opacity = wave.opacity.get(ribbon.layer).copied().unwrap_or(1.0);
        let _ = writeln!(
            svg,
            r#"  <path id="layer-{}" d="{}" fill="{}" fill-opacity="{:.3}" style="mix-blend-mode:{}"/>"#,
            ribbon.layer,
            path_data(ribbon),
            color,
            opacity,
            wave.blend_mode
        );
    }

    svg.push_str("</svg>\n");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::FrequencyBands;
    use glam::DVec2;

    fn square(layer: usize) -> RibbonGeometry {
        RibbonGeometry {
            layer,
            top: vec![DVec2::new(0.0, 1.0), DVec2::new(10.0, 1.0)],
            bottom: vec![DVec2::new(10.0, 3.5), DVec2::new(0.0, 3.5)],
        }
    }

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

    #[test]
    fn test_path_data() {
        assert_eq!(
            path_data(&square(0)),
            "M0.00 1.00 L10.00 1.00 L10.00 3.50 L0.00 3.50 Z"
        );

        let empty = RibbonGeometry {
            layer: 0,
            top: Vec::new(),
            bottom: Vec::new(),
        };
        assert_eq!(path_data(&empty), "");
    }

    #[test]
    fn test_document_styles_by_layer_id() {
        let wave = WaveConfig::default();
        // Draw order reversed; colours must follow the layer id
        let svg = document(&frame(vec![square(2), square(0)]), 320, 200, &wave);

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"viewBox="0 0 320 200""#));
        assert!(svg.contains(r#"id="layer-2" d="M0.00"#));
        assert!(svg.contains(&format!(r#"fill="{}" fill-opacity="0.600""#, wave.colors[2])));
        assert!(svg.contains(&format!(r#"fill="{}" fill-opacity="0.850""#, wave.colors[0])));
        assert_eq!(svg.matches("<path").count(), 2);
        assert!(svg.contains("mix-blend-mode:screen"));
    }

    #[test]
    fn test_empty_frame_document() {
        let svg = document(&frame(Vec::new()), 0, 0, &WaveConfig::default());
        assert_eq!(svg.matches("<path").count(), 0);
        assert!(svg.trim_end().ends_with("</svg>"));
    }
}
