//! Scan decoder: `sensor_msgs/LaserScan` → colored Cartesian points.

use crate::ros::sensor_msgs::LaserScan;

/// Renderer-ready point set decoded from a scan. Positions and colors are
/// index-aligned and always the same length; a skipped reading contributes
/// to neither.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedPoints {
    /// Cartesian positions in the scanner frame, z fixed at 0.
    pub positions: Vec<[f32; 3]>,

    /// Per-point RGB colors in `[0, 1]`.
    pub colors: Vec<[f32; 3]>,
}

impl DecodedPoints {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Convert polar readings to Cartesian points.
///
/// Readings that are not finite or fall outside `[range_min, range_max]`
/// are skipped. Color is a red→yellow gradient keyed by the normalized
/// range: near readings red, far readings yellow. A degenerate scan with
/// `range_max == range_min` would normalize to NaN, so the gradient stays
/// flat red instead.
pub fn decode_scan(scan: &LaserScan) -> DecodedPoints {
    let span = scan.range_max - scan.range_min;
    let mut points = DecodedPoints {
        positions: Vec::with_capacity(scan.ranges.len()),
        colors: Vec::with_capacity(scan.ranges.len()),
    };

    for (i, &range) in scan.ranges.iter().enumerate() {
        // Skip invalid ranges
        if range < scan.range_min || range > scan.range_max || !range.is_finite() {
            continue;
        }

        let angle = scan.angle_min + (i as f32) * scan.angle_increment;
        points
            .positions
            .push([range * angle.cos(), range * angle.sin(), 0.0]);

        let normalized = if span > 0.0 {
            (range - scan.range_min) / span
        } else {
            0.0
        };
        points.colors.push([1.0, normalized, 0.0]);
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(ranges: Vec<f32>, range_min: f32, range_max: f32) -> LaserScan {
        LaserScan {
            header: Default::default(),
            angle_min: 0.0,
            angle_max: std::f32::consts::PI,
            angle_increment: 0.1,
            time_increment: 0.0,
            scan_time: 0.0,
            range_min,
            range_max,
            ranges,
            intensities: Vec::new(),
        }
    }

    #[test]
    fn test_out_of_range_and_nan_readings_skipped() {
        let decoded = decode_scan(&scan(
            vec![0.05, 1.0, 12.0, f32::NAN, 2.0, f32::INFINITY],
            0.1,
            10.0,
        ));
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded.positions.len(), decoded.colors.len());
    }

    #[test]
    fn test_boundary_readings_retained() {
        let decoded = decode_scan(&scan(vec![0.1, 10.0], 0.1, 10.0));
        assert_eq!(decoded.len(), 2);
    }

    #[test]
    fn test_points_preserve_range_as_distance() {
        let ranges = vec![0.5, 1.0, 2.5, 7.0];
        let decoded = decode_scan(&scan(ranges.clone(), 0.1, 10.0));
        for (pos, range) in decoded.positions.iter().zip(&ranges) {
            let distance = (pos[0] * pos[0] + pos[1] * pos[1]).sqrt();
            assert!((distance - range).abs() < 1e-4, "{distance} != {range}");
            assert_eq!(pos[2], 0.0);
        }
    }

    #[test]
    fn test_angle_follows_index() {
        let decoded = decode_scan(&scan(vec![1.0, 1.0], 0.1, 10.0));
        // Index 0 at angle_min = 0: along +x.
        assert!((decoded.positions[0][0] - 1.0).abs() < 1e-6);
        assert!(decoded.positions[0][1].abs() < 1e-6);
        // Index 1 at angle 0.1 rad.
        assert!((decoded.positions[1][1] - 0.1f32.sin()).abs() < 1e-6);
    }

    #[test]
    fn test_gradient_green_monotonic_in_range() {
        let decoded = decode_scan(&scan(vec![0.5, 2.0, 5.0, 9.5], 0.1, 10.0));
        let greens: Vec<f32> = decoded.colors.iter().map(|c| c[1]).collect();
        assert!(greens.windows(2).all(|w| w[0] <= w[1]), "{greens:?}");
        // Red constant at maximum, blue zero.
        assert!(decoded.colors.iter().all(|c| c[0] == 1.0 && c[2] == 0.0));
    }

    #[test]
    fn test_degenerate_span_stays_red() {
        let decoded = decode_scan(&scan(vec![2.0, 2.0], 2.0, 2.0));
        assert_eq!(decoded.len(), 2);
        for color in &decoded.colors {
            assert_eq!(*color, [1.0, 0.0, 0.0]);
        }
    }
}
