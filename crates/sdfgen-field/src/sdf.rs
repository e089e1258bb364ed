use sdfgen_image::{ImageSize, PixelClass, PixelSink, PixelSource};

use crate::error::SdfError;
use crate::parallel::{self, ExecutionStrategy};

/// Compute the boundary search radius for a source/output resolution pair.
///
/// The radius is `ratio * max(srcW, srcH) / corresponding_output_dimension`:
/// width-driven when the source is wider than tall, height-driven otherwise.
/// Tying the radius to the downsampling factor keeps the field meaningful
/// regardless of how aggressively the output is shrunk.
///
/// # Examples
///
/// ```
/// use sdfgen_image::ImageSize;
/// use sdfgen_field::sdf::compute_max_radius;
///
/// let src = ImageSize { width: 256, height: 128 };
/// let out = ImageSize { width: 64, height: 32 };
/// assert_eq!(compute_max_radius(src, out, 1.0), 4.0);
/// assert_eq!(compute_max_radius(src, out, 2.0), 8.0);
/// ```
pub fn compute_max_radius(src_size: ImageSize, out_size: ImageSize, ratio: f32) -> f32 {
    if src_size.width > src_size.height {
        ratio * src_size.width as f32 / out_size.width as f32
    } else {
        ratio * src_size.height as f32 / out_size.height as f32
    }
}

/// Signed distance from `(x, y)` to the nearest opposite-classification pixel.
///
/// The search expands in square rings around the query pixel, keeping the
/// minimum squared euclidean distance over every opposite cell it scans, and
/// stops once the ring radius itself can no longer beat the current best.
/// Rings never extend past `max_radius`; when no boundary is found within
/// range the result saturates slightly beyond `max_radius`.
///
/// The sign is negative if and only if the query pixel is background, so
/// background regions read as negative distance and foreground regions as
/// positive distance.
///
/// # Arguments
///
/// * `source` - The classified pixel grid to search.
/// * `x` - The query column, must be within bounds.
/// * `y` - The query row, must be within bounds.
/// * `max_radius` - The search bound in pixels, must be positive.
///
/// # Returns
///
/// The signed distance in source-pixel units.
pub fn sample_distance<S>(source: &S, x: usize, y: usize, max_radius: f32) -> f32
where
    S: PixelSource,
{
    let width = source.width();
    let height = source.height();
    let class = source.classify(x, y);

    let eps = 1.0 / max_radius;
    let mut best = max_radius * max_radius + eps;

    let mut radius = 1usize;
    while (radius as f32) < max_radius && ((radius * radius) as f32) < best + eps {
        let min_x = x.saturating_sub(radius);
        let max_x = (x + radius).min(width - 1);
        let min_y = y.saturating_sub(radius);
        let max_y = (y + radius).min(height - 1);

        // Each ring edge is scanned half-open along its own axis: rows cover
        // [min_x, max_x), columns cover [min_y, max_y). One corner of every
        // ring is left to the neighboring edge and one is skipped outright;
        // the quantized output depends on this exact tie-break.
        if y + radius < height {
            for cx in min_x..max_x {
                probe(source, class, x, y, cx, y + radius, &mut best);
            }
        }
        if y > radius {
            for cx in min_x..max_x {
                probe(source, class, x, y, cx, y - radius, &mut best);
            }
        }
        if x + radius < width {
            for cy in min_y..max_y {
                probe(source, class, x, y, x + radius, cy, &mut best);
            }
        }
        if x > radius {
            for cy in min_y..max_y {
                probe(source, class, x, y, x - radius, cy, &mut best);
            }
        }

        radius += 1;
    }

    let distance = best.sqrt();
    match class {
        PixelClass::Background => -distance,
        PixelClass::Foreground => distance,
    }
}

#[inline]
fn probe<S>(source: &S, class: PixelClass, x: usize, y: usize, cx: usize, cy: usize, best: &mut f32)
where
    S: PixelSource,
{
    if source.classify(cx, cy) != class {
        let dx = cx as f32 - x as f32;
        let dy = cy as f32 - y as f32;
        let d2 = dx * dx + dy * dy;
        if d2 < *best {
            *best = d2;
        }
    }
}

// maps a signed distance into [0, 255] with 0 centered between 127 and 128
fn quantize(distance: f32, max_radius: f32) -> u8 {
    (127.5 + 127.5 * distance / max_radius).clamp(0.0, 255.0) as u8
}

// floor-division mapping from an output coordinate into source space
fn source_coord(out_coord: usize, src_dim: usize, out_dim: usize) -> usize {
    out_coord * (src_dim - 1) / (out_dim - 1)
}

/// Populate a grayscale sink with the quantized signed distance field of a
/// binary source image.
///
/// Every output pixel is mapped proportionally into source space, the signed
/// distance to the nearest classification boundary is sampled there, and the
/// result is remapped linearly from `[-max_radius, +max_radius]` to
/// `[0, 255]`. A pixel exactly on a boundary lands on the mid gray values;
/// pixels farther than the search radius from any boundary saturate to 255
/// (foreground) or 0 (background).
///
/// Uses the default (row-parallel) execution strategy; see
/// [`distance_field_with`] to choose another one. The result is byte-for-byte
/// identical for every strategy.
///
/// # Arguments
///
/// * `src` - The classified source grid.
/// * `dst` - The grayscale sink to populate, no larger than `src` in either
///   axis and at least 2x2.
/// * `ratio` - The search radius as a fraction of the source resolution,
///   scaled by the downsampling factor (see [`compute_max_radius`]).
///
/// # Examples
///
/// ```
/// use sdfgen_image::{Image, ImageSize};
/// use sdfgen_field::sdf::distance_field;
///
/// let size = ImageSize { width: 4, height: 4 };
/// let mut data = vec![0u8; 4 * 4];
/// data[3 * 4 + 3] = 255; // lone foreground pixel at (3, 3)
/// let src = Image::<u8, 1>::new(size, data).unwrap();
///
/// let mut out = Image::<u8, 3>::from_size_val(size, 0u8).unwrap();
/// distance_field(&src, &mut out, 2.0).unwrap();
///
/// // background far from any boundary saturates to 0
/// assert_eq!(out.get(0, 0), Some([0, 0, 0].as_slice()));
/// ```
pub fn distance_field<S, D>(src: &S, dst: &mut D, ratio: f32) -> Result<(), SdfError>
where
    S: PixelSource + Sync,
    D: PixelSink,
{
    distance_field_with(src, dst, ratio, ExecutionStrategy::default())
}

/// Same as [`distance_field`] with an explicit [`ExecutionStrategy`].
pub fn distance_field_with<S, D>(
    src: &S,
    dst: &mut D,
    ratio: f32,
    strategy: ExecutionStrategy,
) -> Result<(), SdfError>
where
    S: PixelSource + Sync,
    D: PixelSink,
{
    let (src_w, src_h) = (src.width(), src.height());
    let (out_w, out_h) = (dst.width(), dst.height());

    if out_w > src_w || out_h > src_h {
        return Err(SdfError::OutputExceedsSource(out_w, out_h, src_w, src_h));
    }
    if out_w < 2 || out_h < 2 {
        return Err(SdfError::DegenerateOutputSize(out_w, out_h));
    }
    if !ratio.is_finite() || ratio <= 0.0 {
        return Err(SdfError::InvalidRatio(ratio));
    }

    let max_radius = compute_max_radius(
        ImageSize {
            width: src_w,
            height: src_h,
        },
        ImageSize {
            width: out_w,
            height: out_h,
        },
        ratio,
    );

    let values = parallel::map_rows(out_w, out_h, strategy, |ox, oy| {
        let sx = source_coord(ox, src_w, out_w);
        let sy = source_coord(oy, src_h, out_h);
        quantize(sample_distance(src, sx, sy, max_radius), max_radius)
    })?;

    for (i, value) in values.into_iter().enumerate() {
        dst.set_gray(i % out_w, i / out_w, value)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdfgen_image::Image;

    fn size(width: usize, height: usize) -> ImageSize {
        ImageSize { width, height }
    }

    /// Single channel source where `fg` lists the foreground pixels.
    fn source_with_foreground(sz: ImageSize, fg: &[(usize, usize)]) -> Image<u8, 1> {
        let mut data = vec![0u8; sz.width * sz.height];
        for &(x, y) in fg {
            data[y * sz.width + x] = 255;
        }
        Image::new(sz, data).unwrap()
    }

    #[test]
    fn max_radius_scales_linearly_with_ratio() {
        let src = size(100, 50);
        let out = size(50, 25);
        let r1 = compute_max_radius(src, out, 1.0);
        let r2 = compute_max_radius(src, out, 2.0);
        assert_eq!(r1, 2.0);
        assert_eq!(r2, 4.0);
    }

    #[test]
    fn max_radius_scales_inversely_with_output_resolution() {
        let src = size(100, 50);
        let r1 = compute_max_radius(src, size(25, 25), 1.0);
        let r2 = compute_max_radius(src, size(50, 25), 1.0);
        assert_eq!(r1, 4.0);
        assert_eq!(r2, 2.0);
    }

    #[test]
    fn max_radius_axis_selection() {
        // wider than tall: width-driven
        assert_eq!(compute_max_radius(size(200, 100), size(50, 50), 1.0), 4.0);
        // taller than wide, and the square tie: height-driven
        assert_eq!(compute_max_radius(size(100, 200), size(50, 50), 1.0), 4.0);
        assert_eq!(compute_max_radius(size(100, 100), size(50, 25), 1.0), 4.0);
    }

    #[test]
    fn source_coord_downsampling_reuse() {
        // srcW=10, outW=3 maps the three output columns to 0, 4 and 9
        assert_eq!(source_coord(0, 10, 3), 0);
        assert_eq!(source_coord(1, 10, 3), 4);
        assert_eq!(source_coord(2, 10, 3), 9);
        // identity when the resolutions match
        for o in 0..7 {
            assert_eq!(source_coord(o, 7, 7), o);
        }
    }

    #[test]
    fn quantize_centers_and_saturates() {
        assert_eq!(quantize(0.0, 4.0), 127);
        assert_eq!(quantize(4.0, 4.0), 255);
        assert_eq!(quantize(-4.0, 4.0), 0);
        assert_eq!(quantize(2.0, 4.0), 191);
        assert_eq!(quantize(100.0, 4.0), 255);
        assert_eq!(quantize(-100.0, 4.0), 0);
    }

    #[test]
    fn sample_distance_adjacent_boundary() {
        // center pixel of a 3x3 grid is foreground, direct neighbors are
        // background at distance exactly 1
        let src = source_with_foreground(size(3, 3), &[(1, 1)]);
        assert_eq!(sample_distance(&src, 1, 1, 4.0), 1.0);
    }

    #[test]
    fn sample_distance_diagonal_is_not_scanned() {
        // (1, 1) sits on the unscanned ring corner of (0, 0), so the lone
        // diagonal foreground pixel is never found and the sample saturates
        // to the sentinel value
        let src = source_with_foreground(size(3, 3), &[(1, 1)]);
        let max_radius = 4.0f32;
        let sentinel = -(max_radius * max_radius + 1.0 / max_radius).sqrt();
        assert_eq!(sample_distance(&src, 0, 0, max_radius), sentinel);
    }

    #[test]
    fn lone_foreground_pixel_scenario() -> Result<(), SdfError> {
        // 4x4 background image with a single foreground pixel at (3, 3),
        // ratio 2.0, same-size output. max_radius = 2.0 * 4 / 4 = 2.0, so
        // only the radius-1 ring is ever scanned: the foreground pixel is
        // visible from nobody (it sits on excluded edge cells of all its
        // neighbors) and every background pixel saturates to 0. The pixel
        // itself finds background at squared distance 2 and quantizes to
        // 127.5 + 127.5 * sqrt(2) / 2 = 217.
        let src = source_with_foreground(size(4, 4), &[(3, 3)]);
        let mut out = Image::<u8, 3>::from_size_val(size(4, 4), 0u8)?;
        distance_field(&src, &mut out, 2.0)?;

        for y in 0..4 {
            for x in 0..4 {
                let expected = if (x, y) == (3, 3) { 217 } else { 0 };
                assert_eq!(
                    out.get(x, y),
                    Some([expected, expected, expected].as_slice()),
                    "pixel ({x}, {y})"
                );
            }
        }
        Ok(())
    }

    #[test]
    fn saturation_on_uniform_images() -> Result<(), SdfError> {
        let bg = source_with_foreground(size(8, 8), &[]);
        let mut out = Image::<u8, 3>::from_size_val(size(8, 8), 1u8)?;
        distance_field(&bg, &mut out, 2.0)?;
        assert!(out.as_slice().iter().all(|v| *v == 0));

        let fg_data = vec![255u8; 8 * 8];
        let fg = Image::<u8, 1>::new(size(8, 8), fg_data).unwrap();
        distance_field(&fg, &mut out, 2.0)?;
        assert!(out.as_slice().iter().all(|v| *v == 255));
        Ok(())
    }

    #[test]
    fn vertical_boundary_symmetry() -> Result<(), SdfError> {
        // left half background, right half foreground; ratio 128 with a
        // same-size output gives max_radius = 128, wide enough that the
        // quantized ramp moves one gray level per source pixel
        let sz = size(512, 16);
        let mut data = vec![0u8; sz.width * sz.height];
        for y in 0..sz.height {
            for x in 256..sz.width {
                data[y * sz.width + x] = 255;
            }
        }
        let src = Image::<u8, 1>::new(sz, data).unwrap();
        let mut out = Image::<u8, 3>::from_size_val(sz, 0u8)?;
        distance_field(&src, &mut out, 128.0)?;

        let value = |x: usize| out.get(x, 8).unwrap()[0];

        // first foreground column quantizes to the zero-distance midpoint
        assert_eq!(value(256), 128);
        assert_eq!(value(255), 126);

        // strict ramp on both sides of the boundary
        for x in 130..=255 {
            assert!(value(x) > value(x - 1), "background ramp at x={x}");
        }
        for x in 257..=383 {
            assert!(value(x) > value(x - 1), "foreground ramp at x={x}");
        }

        // saturation past max_radius on both sides
        assert_eq!(value(383), 255);
        for x in 384..sz.width {
            assert_eq!(value(x), 255);
        }
        for x in 0..=128 {
            assert_eq!(value(x), 0);
        }
        Ok(())
    }

    #[test]
    fn deterministic_across_strategies() -> Result<(), SdfError> {
        // disc of radius 8 centered in a 32x32 grid
        let sz = size(32, 32);
        let mut data = vec![0u8; sz.width * sz.height];
        for y in 0..sz.height {
            for x in 0..sz.width {
                let (dx, dy) = (x as i32 - 16, y as i32 - 16);
                if dx * dx + dy * dy < 64 {
                    data[y * sz.width + x] = 255;
                }
            }
        }
        let src = Image::<u8, 1>::new(sz, data).unwrap();

        let strategies = [
            ExecutionStrategy::Serial,
            ExecutionStrategy::ParallelRows,
            ExecutionStrategy::Fixed(3),
        ];

        let mut outputs = Vec::new();
        for strategy in strategies {
            let mut out = Image::<u8, 3>::from_size_val(size(16, 16), 0u8)?;
            distance_field_with(&src, &mut out, 2.0, strategy)?;
            outputs.push(out.into_vec());
        }
        assert_eq!(outputs[0], outputs[1]);
        assert_eq!(outputs[0], outputs[2]);

        // repeated invocation is byte-identical
        let mut again = Image::<u8, 3>::from_size_val(size(16, 16), 0u8)?;
        distance_field(&src, &mut again, 2.0)?;
        assert_eq!(outputs[1], again.into_vec());
        Ok(())
    }

    #[test]
    fn rejects_output_larger_than_source() {
        let src = source_with_foreground(size(8, 8), &[]);
        let mut out = Image::<u8, 3>::from_size_val(size(16, 8), 0u8).unwrap();
        let res = distance_field(&src, &mut out, 1.0);
        assert_eq!(res.err(), Some(SdfError::OutputExceedsSource(16, 8, 8, 8)));
    }

    #[test]
    fn rejects_one_pixel_output_axis() {
        let src = source_with_foreground(size(8, 8), &[]);
        let mut out = Image::<u8, 3>::from_size_val(size(1, 8), 0u8).unwrap();
        let res = distance_field(&src, &mut out, 1.0);
        assert_eq!(res.err(), Some(SdfError::DegenerateOutputSize(1, 8)));
    }

    #[test]
    fn rejects_non_positive_ratio() {
        let src = source_with_foreground(size(8, 8), &[]);
        let mut out = Image::<u8, 3>::from_size_val(size(8, 8), 0u8).unwrap();
        assert_eq!(
            distance_field(&src, &mut out, 0.0).err(),
            Some(SdfError::InvalidRatio(0.0))
        );
        assert_eq!(
            distance_field(&src, &mut out, -1.5).err(),
            Some(SdfError::InvalidRatio(-1.5))
        );
    }
}
