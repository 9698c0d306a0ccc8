//! Deterministic image preprocessing for OCR.
//!
//! Fixed filter sequence: grayscale → Otsu threshold → 3×3 median filter.
//! The same input image always produces the same output bytes, which is
//! what makes `TextExtractor` deterministic end to end.
//!
//! Thresholding and the median filter are written against plain `image`
//! buffers; page-photo-grade filtering is not needed for screen text.

use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use std::io::Cursor;

/// Run the full preprocessing sequence on a decoded image.
pub fn binarize(image: &DynamicImage) -> GrayImage {
    let gray = image.to_luma8();
    let level = otsu_level(&gray);
    let binary = threshold(&gray, level);
    median3(&binary)
}

/// Encode a preprocessed buffer back to PNG for the OCR engine.
pub fn to_png(gray: &GrayImage) -> Result<Vec<u8>, String> {
    let mut bytes: Vec<u8> = Vec::new();
    gray.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| e.to_string())?;
    Ok(bytes)
}

/// Otsu's method: pick the threshold that maximizes between-class variance
/// of the grayscale histogram.
pub fn otsu_level(gray: &GrayImage) -> u8 {
    let mut histogram = [0u64; 256];
    for pixel in gray.pixels() {
        histogram[pixel[0] as usize] += 1;
    }

    let total = u64::from(gray.width()) * u64::from(gray.height());
    if total == 0 {
        return 0;
    }

    let weighted_sum: f64 = histogram
        .iter()
        .enumerate()
        .map(|(value, &count)| value as f64 * count as f64)
        .sum();

    let mut background_sum = 0.0;
    let mut background_count = 0u64;
    let mut best_level = 0u8;
    let mut best_variance = -1.0;

    for level in 0..256usize {
        background_count += histogram[level];
        if background_count == 0 {
            continue;
        }
        let foreground_count = total - background_count;
        if foreground_count == 0 {
            break;
        }

        background_sum += level as f64 * histogram[level] as f64;
        let background_mean = background_sum / background_count as f64;
        let foreground_mean = (weighted_sum - background_sum) / foreground_count as f64;

        let variance = background_count as f64
            * foreground_count as f64
            * (background_mean - foreground_mean).powi(2);
        if variance > best_variance {
            best_variance = variance;
            best_level = level as u8;
        }
    }

    best_level
}

/// Binarize: pixels above the level become white, the rest black.
pub fn threshold(gray: &GrayImage, level: u8) -> GrayImage {
    let (width, height) = gray.dimensions();
    let mut out = GrayImage::new(width, height);
    for (x, y, pixel) in gray.enumerate_pixels() {
        let value = if pixel[0] > level { 255 } else { 0 };
        out.put_pixel(x, y, Luma([value]));
    }
    out
}

/// 3×3 median filter — knocks out salt-and-pepper noise the thresholding
/// step leaves behind. Borders are handled by clamping coordinates.
pub fn median3(gray: &GrayImage) -> GrayImage {
    let (width, height) = gray.dimensions();
    let mut out = GrayImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let mut neighborhood = [0u8; 9];
            let mut i = 0;
            for dy in -1i64..=1 {
                for dx in -1i64..=1 {
                    let nx = (i64::from(x) + dx).clamp(0, i64::from(width) - 1) as u32;
                    let ny = (i64::from(y) + dy).clamp(0, i64::from(height) - 1) as u32;
                    neighborhood[i] = gray.get_pixel(nx, ny)[0];
                    i += 1;
                }
            }
            neighborhood.sort_unstable();
            out.put_pixel(x, y, Luma([neighborhood[4]]));
        }
    }
    out
}
