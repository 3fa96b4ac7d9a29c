use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_circle_mut};
use tracing::{debug, warn};

use crate::analysis::region::{IntensityWindow, Region};

const MASK_FILL: u8 = u8::MAX;
const BOUNDARY_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

/// Outcome of one pass over an image.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    /// Share of region pixels whose intensity is inside the window, in percent.
    /// `None` when the region has no pixels on the canvas.
    pub percentage: Option<f64>,
    pub in_range: u64,
    pub total_in_region: u64,
    pub raw: RgbImage,
    pub annotated: RgbImage,
}

/// How a circle sits relative to the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Overlap {
    Disjoint,
    Covers,
    /// Crosses the canvas with a center and radius small enough to rasterize.
    Partial { center: (i32, i32), radius: i32 },
    /// Crosses the canvas, but is too large to rasterize point by point.
    Sweeping,
}

/// Counts the pixels inside `region` whose grayscale value lies in `window`
/// and renders the highlighted copy.
///
/// The window is evaluated on the region-masked grayscale image, so pixels
/// outside the circle take the value 0 and never pass the strict lower bound.
pub fn analyze(image: &RgbImage, region: &Region, window: &IntensityWindow) -> Analysis {
    let (width, height) = image.dimensions();
    let overlap = overlap(width, height, region);

    let mask = region_mask(width, height, region, overlap);
    let total_in_region = mask.pixels().filter(|p| p[0] == MASK_FILL).count() as u64;

    let masked = apply_mask(&to_grayscale(image), &mask);
    let hits: Vec<bool> = masked.pixels().map(|p| window.contains(p[0])).collect();
    let in_range = hits.iter().filter(|hit| **hit).count() as u64;

    let percentage = if total_in_region == 0 {
        warn!(
            "Region at ({}, {}) with radius {} has no pixels on a {}x{} image",
            region.center_x, region.center_y, region.radius, width, height
        );
        None
    } else {
        Some(100.0 * in_range as f64 / total_in_region as f64)
    };

    let mut annotated = image.clone();
    for (pixel, hit) in annotated.pixels_mut().zip(&hits) {
        if *hit {
            pixel[0] = u8::MAX;
        }
    }
    match overlap {
        Overlap::Partial { center, radius } => {
            draw_hollow_circle_mut(&mut annotated, center, radius, BOUNDARY_COLOR);
        }
        Overlap::Sweeping => draw_distance_outline(&mut annotated, region),
        Overlap::Disjoint | Overlap::Covers => {}
    }

    debug!(
        "Analyzed region {:?} with window {:?}: {}/{} pixels in range",
        region, window, in_range, total_in_region
    );

    Analysis {
        percentage,
        in_range,
        total_in_region,
        raw: image.clone(),
        annotated,
    }
}

/// Rec.601 luma in 14-bit fixed point, rounded to nearest.
pub fn to_grayscale(image: &RgbImage) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let Rgb([r, g, b]) = *image.get_pixel(x, y);
        Luma([luma(r, g, b)])
    })
}

fn luma(r: u8, g: u8, b: u8) -> u8 {
    let weighted = r as u32 * 4899 + g as u32 * 9617 + b as u32 * 1868;
    ((weighted + (1 << 13)) >> 14) as u8
}

fn region_mask(width: u32, height: u32, region: &Region, overlap: Overlap) -> GrayImage {
    match overlap {
        Overlap::Disjoint => GrayImage::new(width, height),
        Overlap::Covers => GrayImage::from_pixel(width, height, Luma([MASK_FILL])),
        Overlap::Partial { center, radius } => {
            let mut mask = GrayImage::new(width, height);
            draw_filled_circle_mut(&mut mask, center, radius, Luma([MASK_FILL]));
            mask
        }
        Overlap::Sweeping => GrayImage::from_fn(width, height, |x, y| {
            if distance(region, x, y) <= region.radius as f64 {
                Luma([MASK_FILL])
            } else {
                Luma([0])
            }
        }),
    }
}

fn draw_distance_outline(annotated: &mut RgbImage, region: &Region) {
    let radius = region.radius as f64;
    for (x, y, pixel) in annotated.enumerate_pixels_mut() {
        if (distance(region, x, y) - radius).abs() < 0.5 {
            *pixel = BOUNDARY_COLOR;
        }
    }
}

fn distance(region: &Region, x: u32, y: u32) -> f64 {
    (x as f64 - region.center_x as f64).hypot(y as f64 - region.center_y as f64)
}

fn apply_mask(grayscale: &GrayImage, mask: &GrayImage) -> GrayImage {
    GrayImage::from_fn(grayscale.width(), grayscale.height(), |x, y| {
        if mask.get_pixel(x, y)[0] == MASK_FILL {
            *grayscale.get_pixel(x, y)
        } else {
            Luma([0])
        }
    })
}

// Only circles whose rasterization stays inside i32 and scales with the
// canvas are handed to the drawing primitives; anything larger is measured
// per pixel.
fn overlap(width: u32, height: u32, region: &Region) -> Overlap {
    if width == 0 || height == 0 {
        return Overlap::Disjoint;
    }
    let cx = region.center_x as f64;
    let cy = region.center_y as f64;
    let max_x = (width - 1) as f64;
    let max_y = (height - 1) as f64;
    let radius = region.radius as f64;

    let near_dx = (cx - max_x).max(0.0);
    let near_dy = (cy - max_y).max(0.0);
    if near_dx.hypot(near_dy) > radius + 1.0 {
        return Overlap::Disjoint;
    }

    let far_dx = cx.max(max_x - cx);
    let far_dy = cy.max(max_y - cy);
    if far_dx.hypot(far_dy) + 1.0 < radius {
        return Overlap::Covers;
    }

    match raster_geometry(width, height, region) {
        Some((center, radius)) => Overlap::Partial { center, radius },
        None => Overlap::Sweeping,
    }
}

fn raster_geometry(width: u32, height: u32, region: &Region) -> Option<((i32, i32), i32)> {
    let radius = region.radius as u64;
    if radius > 2 * (width as u64 + height as u64) {
        return None;
    }
    let fits = |center: u32| center as u64 + radius <= i32::MAX as u64;
    if !fits(region.center_x) || !fits(region.center_y) {
        return None;
    }
    Some((
        (region.center_x as i32, region.center_y as i32),
        region.radius as i32,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::ImageBuffer;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    fn gray_fixture(width: u32, height: u32, value: u8) -> RgbImage {
        ImageBuffer::from_pixel(width, height, Rgb([value, value, value]))
    }

    fn noise_fixture(width: u32, height: u32, seed: u64) -> RgbImage {
        let mut rng = StdRng::seed_from_u64(seed);
        ImageBuffer::from_fn(width, height, |_, _| {
            Rgb([rng.random(), rng.random(), rng.random()])
        })
    }

    #[test]
    fn test_luma_matches_rec601_weights() {
        assert_eq!(luma(0, 0, 0), 0);
        assert_eq!(luma(255, 255, 255), 255);
        assert_eq!(luma(128, 128, 128), 128);
        assert_eq!(luma(255, 0, 0), 76);
        assert_eq!(luma(0, 255, 0), 150);
        assert_eq!(luma(0, 0, 255), 29);
    }

    #[test]
    fn test_mid_gray_inside_default_window() {
        let image = gray_fixture(300, 300, 128);
        let analysis = analyze(
            &image,
            &Region::new(150, 150, 50),
            &IntensityWindow::new(0, 140),
        );
        assert!(analysis.total_in_region > 0);
        assert_eq!(analysis.in_range, analysis.total_in_region);
        assert_eq!(analysis.percentage, Some(100.0));
    }

    #[test]
    fn test_mid_gray_full_window() {
        let image = gray_fixture(300, 300, 128);
        let analysis = analyze(
            &image,
            &Region::new(150, 150, 50),
            &IntensityWindow::new(0, 255),
        );
        assert_eq!(analysis.percentage, Some(100.0));
    }

    #[test]
    fn test_mid_gray_outside_window() {
        let image = gray_fixture(300, 300, 128);
        let analysis = analyze(
            &image,
            &Region::new(150, 150, 50),
            &IntensityWindow::new(0, 128),
        );
        assert_eq!(analysis.in_range, 0);
        assert_eq!(analysis.percentage, Some(0.0));
    }

    #[test]
    fn test_degenerate_window_yields_zero() {
        let image = noise_fixture(64, 64, 3);
        let analysis = analyze(
            &image,
            &Region::new(32, 32, 20),
            &IntensityWindow::new(90, 90),
        );
        assert_eq!(analysis.in_range, 0);
        assert_eq!(analysis.percentage, Some(0.0));
    }

    #[test]
    fn test_region_pixel_count_is_close_to_circle_area() {
        let image = gray_fixture(300, 300, 10);
        let analysis = analyze(
            &image,
            &Region::new(150, 150, 50),
            &IntensityWindow::new(0, 255),
        );
        let area = std::f64::consts::PI * 50.0 * 50.0;
        let total = analysis.total_in_region as f64;
        assert!((total - area).abs() / area < 0.05, "total {total}");
    }

    #[test]
    fn test_radius_beyond_diagonal_covers_whole_image() {
        let image = gray_fixture(300, 200, 128);
        let analysis = analyze(
            &image,
            &Region::new(150, 100, 400),
            &IntensityWindow::new(0, 140),
        );
        assert_eq!(analysis.total_in_region, 300 * 200);
        assert_eq!(analysis.percentage, Some(100.0));
    }

    #[test]
    fn test_circle_clipped_at_canvas_edge() {
        let image = gray_fixture(100, 100, 128);
        let analysis = analyze(
            &image,
            &Region::new(0, 0, 20),
            &IntensityWindow::new(0, 255),
        );
        let full = std::f64::consts::PI * 20.0 * 20.0;
        assert!(analysis.total_in_region > 0);
        assert!((analysis.total_in_region as f64) < full / 2.0);
    }

    #[test]
    fn test_off_canvas_region_is_undefined() {
        let image = gray_fixture(100, 100, 128);
        let analysis = analyze(
            &image,
            &Region::new(1000, 1000, 10),
            &IntensityWindow::new(0, 255),
        );
        assert_eq!(analysis.total_in_region, 0);
        assert_eq!(analysis.percentage, None);
        assert_eq!(analysis.annotated, image);
    }

    #[test]
    fn test_extreme_geometry_is_resolved_without_drawing() {
        let image = gray_fixture(40, 30, 128);
        let covering = analyze(
            &image,
            &Region::new(20, 15, u32::MAX),
            &IntensityWindow::new(0, 255),
        );
        assert_eq!(covering.total_in_region, 40 * 30);

        let distant = analyze(
            &image,
            &Region::new(u32::MAX, u32::MAX, 10),
            &IntensityWindow::new(0, 255),
        );
        assert_eq!(distant.total_in_region, 0);
    }

    #[test]
    fn test_distant_center_reaching_into_canvas_is_measured_per_pixel() {
        let image = gray_fixture(10, 10, 128);
        let window = IntensityWindow::new(0, 255);

        // Only columns 5..10 lie within the radius of the far-right center.
        let beyond_i32 = analyze(
            &image,
            &Region::new(2_000_000_000, 5, 1_999_999_995),
            &window,
        );
        assert_eq!(beyond_i32.total_in_region, 50);
        assert_eq!(beyond_i32.percentage, Some(100.0));
        assert_eq!(*beyond_i32.annotated.get_pixel(5, 0), BOUNDARY_COLOR);
        assert_eq!(*beyond_i32.annotated.get_pixel(4, 0), Rgb([128, 128, 128]));

        let within_i32 = analyze(
            &image,
            &Region::new(1_000_000_000, 5, 999_999_995),
            &window,
        );
        assert_eq!(within_i32.total_in_region, 50);
    }

    #[test]
    fn test_raster_geometry_bounds() {
        assert_eq!(
            raster_geometry(100, 80, &Region::new(50, 40, 30)),
            Some(((50, 40), 30))
        );
        assert_eq!(raster_geometry(100, 80, &Region::new(50, 40, 361)), None);
        assert_eq!(
            raster_geometry(100, 80, &Region::new(i32::MAX as u32, 40, 10)),
            None
        );
    }

    #[test]
    fn test_annotation_boosts_red_inside_region_only() {
        let image = gray_fixture(300, 300, 128);
        let analysis = analyze(
            &image,
            &Region::new(150, 150, 50),
            &IntensityWindow::new(0, 140),
        );
        assert_eq!(analysis.raw, image);
        assert_eq!(*analysis.annotated.get_pixel(150, 150), Rgb([255, 128, 128]));
        assert_eq!(*analysis.annotated.get_pixel(10, 10), Rgb([128, 128, 128]));
        // boundary outline
        assert_eq!(*analysis.annotated.get_pixel(200, 150), BOUNDARY_COLOR);
        assert_eq!(analysis.annotated.dimensions(), image.dimensions());
    }

    #[test]
    fn test_input_is_not_mutated() {
        let image = noise_fixture(50, 50, 11);
        let before = image.clone();
        let _ = analyze(&image, &Region::new(25, 25, 10), &IntensityWindow::new(0, 200));
        assert_eq!(image, before);
    }

    #[test]
    fn test_analysis_is_deterministic() {
        let image = noise_fixture(80, 60, 5);
        let region = Region::new(40, 30, 25);
        let window = IntensityWindow::new(30, 180);
        assert_eq!(
            analyze(&image, &region, &window),
            analyze(&image, &region, &window)
        );
    }

    #[test]
    fn test_percentage_stays_in_bounds() {
        let image = noise_fixture(64, 48, 17);
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..50 {
            let region = Region::new(
                rng.random_range(0..64),
                rng.random_range(0..48),
                rng.random_range(1..40),
            );
            let window = IntensityWindow::new(rng.random(), rng.random());
            let analysis = analyze(&image, &region, &window);
            let percentage = analysis.percentage.unwrap();
            assert!((0.0..=100.0).contains(&percentage));
        }
    }

    #[test]
    fn test_widening_window_never_decreases_count() {
        let image = noise_fixture(64, 64, 23);
        let region = Region::new(30, 34, 22);
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let lower: u8 = rng.random();
            let upper: u8 = rng.random_range(lower..=u8::MAX);
            let wider_lower = rng.random_range(0..=lower);
            let wider_upper = rng.random_range(upper..=u8::MAX);

            let narrow = analyze(&image, &region, &IntensityWindow::new(lower, upper));
            let wide = analyze(
                &image,
                &region,
                &IntensityWindow::new(wider_lower, wider_upper),
            );
            assert!(wide.in_range >= narrow.in_range);
            assert_eq!(wide.total_in_region, narrow.total_in_region);
        }
    }
}
