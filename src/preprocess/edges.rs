//! Edge Detection and Coordinate Extraction
//!
//! Canny itself comes from `imageproc`; this module only loads images
//! as 8-bit luma and turns the binary edge map into pixel coordinates.

use std::path::Path;

use image::GrayImage;
use imageproc::edges::canny;

use crate::error::{Error, Result};

/// Open an image file and convert it to grayscale
pub fn load_grayscale(path: impl AsRef<Path>) -> Result<GrayImage> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|source| Error::ImageRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(img.to_luma8())
}

/// Decode an in-memory image and convert it to grayscale
pub fn decode_grayscale(bytes: &[u8]) -> Result<GrayImage> {
    if bytes.is_empty() {
        return Err(Error::EmptyInput);
    }
    let img = image::load_from_memory(bytes).map_err(Error::ImageDecode)?;
    Ok(img.to_luma8())
}

/// Canny edge map: edge pixels are 255, everything else 0
pub fn detect_edges(gray: &GrayImage, low: f32, high: f32) -> GrayImage {
    canny(gray, low, high)
}

/// (row, col) of every non-zero pixel, in row-major order
pub fn edge_coordinates(edges: &GrayImage) -> Vec<[f64; 2]> {
    edges
        .enumerate_pixels()
        .filter(|(_, _, px)| px.0[0] > 0)
        .map(|(x, y, _)| [y as f64, x as f64])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    /// Dark image with a bright filled square in the middle
    fn square_image(size: u32, lo: u32, hi: u32) -> GrayImage {
        GrayImage::from_fn(size, size, |x, y| {
            if (lo..hi).contains(&x) && (lo..hi).contains(&y) {
                Luma([255])
            } else {
                Luma([0])
            }
        })
    }

    #[test]
    fn test_coordinates_are_row_major() {
        let mut edges = GrayImage::new(4, 3);
        edges.put_pixel(3, 0, Luma([255]));
        edges.put_pixel(1, 2, Luma([255]));

        let coords = edge_coordinates(&edges);
        assert_eq!(coords, vec![[0.0, 3.0], [2.0, 1.0]]);
    }

    #[test]
    fn test_uniform_image_has_no_edges() {
        let gray = GrayImage::from_pixel(32, 32, Luma([128]));
        let edges = detect_edges(&gray, 100.0, 200.0);
        assert!(edge_coordinates(&edges).is_empty());
    }

    #[test]
    fn test_square_outline_is_detected() {
        let gray = square_image(64, 16, 48);
        let edges = detect_edges(&gray, 100.0, 200.0);
        let coords = edge_coordinates(&edges);

        assert!(!coords.is_empty());
        // Every edge pixel hugs the square boundary
        for [r, c] in coords {
            let near = |v: f64| (v - 16.0).abs() <= 2.0 || (v - 47.0).abs() <= 2.0;
            assert!(near(r) || near(c), "stray edge pixel at ({r}, {c})");
        }
    }

    #[test]
    fn test_decode_rejects_empty_and_garbage() {
        assert!(matches!(decode_grayscale(&[]), Err(Error::EmptyInput)));
        assert!(matches!(
            decode_grayscale(b"definitely not an image"),
            Err(Error::ImageDecode(_))
        ));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = load_grayscale("/nonexistent/chair.png").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/chair.png"));
    }
}
