//! SVG rasterization using resvg
//!
//! CPU rasterization through resvg and tiny-skia. Output is straight
//! (non-premultiplied) RGBA, ready to be written out as an image.

use tiny_skia::{Pixmap, Transform};
use usvg::{Options, Tree};

use crate::error::SvgError;

/// Rasterized SVG image data
pub struct RasterizedSvg {
    /// RGBA pixel data (straight alpha)
    pub pixels: Vec<u8>,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// Parse SVG markup into a usvg tree
///
/// System fonts are loaded so that text elements are converted to outlines.
pub fn parse_tree(data: &[u8]) -> Result<Tree, SvgError> {
    let mut options = Options::default();
    options.fontdb_mut().load_system_fonts();
    Tree::from_data(data, &options).map_err(|e| SvgError::Parse(e.to_string()))
}

impl RasterizedSvg {
    /// Rasterize an SVG string to the specified size
    ///
    /// The SVG will be scaled to fit within the given dimensions while
    /// maintaining aspect ratio, centered within the bounds.
    pub fn from_str(svg_str: &str, width: u32, height: u32) -> Result<Self, SvgError> {
        Self::from_data(svg_str.as_bytes(), width, height)
    }

    /// Rasterize SVG data to the specified size
    pub fn from_data(data: &[u8], width: u32, height: u32) -> Result<Self, SvgError> {
        if width == 0 || height == 0 {
            return Err(SvgError::Parse(
                "Invalid dimensions: width and height must be > 0".into(),
            ));
        }
        let tree = parse_tree(data)?;
        Self::from_tree(&tree, width, height)
    }

    /// Rasterize a parsed usvg Tree to the specified size
    pub fn from_tree(tree: &Tree, width: u32, height: u32) -> Result<Self, SvgError> {
        if width == 0 || height == 0 {
            return Err(SvgError::Parse(
                "Invalid dimensions: width and height must be > 0".into(),
            ));
        }

        let mut pixmap = Pixmap::new(width, height)
            .ok_or_else(|| SvgError::Parse("Failed to create pixmap".into()))?;

        // Fit inside the bounds, keeping the aspect ratio
        let svg_size = tree.size();
        let scale_x = width as f32 / svg_size.width();
        let scale_y = height as f32 / svg_size.height();
        let scale = scale_x.min(scale_y);

        let offset_x = (width as f32 - svg_size.width() * scale) / 2.0;
        let offset_y = (height as f32 - svg_size.height() * scale) / 2.0;

        let transform = Transform::from_scale(scale, scale).post_translate(offset_x, offset_y);

        resvg::render(tree, transform, &mut pixmap.as_mut());

        Ok(Self {
            pixels: unpremultiply_alpha(pixmap.data()),
            width,
            height,
        })
    }

    /// Get the pixel data as a slice
    pub fn data(&self) -> &[u8] {
        &self.pixels
    }

    /// Get the dimensions
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// RGBA of one pixel
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        let px = self.pixels.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Consume into the raw pixel buffer
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }
}

/// Convert premultiplied alpha to straight alpha
///
/// tiny-skia outputs premultiplied alpha; image encoders expect straight
/// alpha.
fn unpremultiply_alpha(data: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(data.len());

    for chunk in data.chunks_exact(4) {
        let a = chunk[3] as f32 / 255.0;
        if a > 0.0 {
            let r = ((chunk[0] as f32 / a).min(255.0)) as u8;
            let g = ((chunk[1] as f32 / a).min(255.0)) as u8;
            let b = ((chunk[2] as f32 / a).min(255.0)) as u8;
            result.extend_from_slice(&[r, g, b, chunk[3]]);
        } else {
            result.extend_from_slice(&[0, 0, 0, 0]);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rasterize_simple_svg() {
        let svg = r#"
            <svg xmlns="http://www.w3.org/2000/svg" width="24" height="24">
                <circle cx="12" cy="12" r="10" fill="red"/>
            </svg>
        "#;

        let rasterized = RasterizedSvg::from_str(svg, 48, 48).unwrap();
        assert_eq!(rasterized.dimensions(), (48, 48));
        assert_eq!(rasterized.pixels.len(), 48 * 48 * 4);
        assert_eq!(rasterized.pixel(24, 24), Some([255, 0, 0, 255]));
        assert_eq!(rasterized.pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(rasterized.pixel(48, 0), None);
    }

    #[test]
    fn test_aspect_ratio_is_kept() {
        // 2:1 artwork in a square target is letterboxed vertically
        let svg = r#"
            <svg xmlns="http://www.w3.org/2000/svg" width="20" height="10">
                <rect width="20" height="10" fill="blue"/>
            </svg>
        "#;
        let rasterized = RasterizedSvg::from_str(svg, 40, 40).unwrap();
        assert_eq!(rasterized.pixel(20, 2).map(|p| p[3]), Some(0));
        assert_eq!(rasterized.pixel(20, 20), Some([0, 0, 255, 255]));
    }

    #[test]
    fn test_zero_dimensions_error() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24"></svg>"#;
        assert!(RasterizedSvg::from_str(svg, 0, 24).is_err());
        assert!(RasterizedSvg::from_str(svg, 24, 0).is_err());
    }

    #[test]
    fn test_invalid_markup_error() {
        assert!(matches!(
            RasterizedSvg::from_str("<svg", 10, 10),
            Err(SvgError::Parse(_))
        ));
    }
}
