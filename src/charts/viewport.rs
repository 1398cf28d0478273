//! Map view geometry: zoom-level spans and data extents, in degrees.

/// Pixel width of one web-map tile.
const TILE_SIZE: f64 = 256.0;

/// Smallest span (degrees) a fitted extent may have.
const MIN_EXTENT: f64 = 0.5;

/// Visible area of the map, as longitude (x) and latitude (y) bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapViewport {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl MapViewport {
    /// Center the view on `(lat, lon)` at a web-map zoom level.
    ///
    /// Longitude span is `360 / 2^zoom` degrees per tile of plot width; the
    /// latitude span follows the plot's aspect ratio, shrunk by `cos(lat)`
    /// so a degree of latitude keeps its ground distance.
    pub fn centered(center: (f64, f64), zoom: u8, width_px: f32, height_px: f32) -> Self {
        let (lat, lon) = center;
        let width = if width_px > 0.0 { width_px as f64 } else { TILE_SIZE };
        let height = if height_px > 0.0 { height_px as f64 } else { width };

        let lon_span = 360.0 / 2f64.powi(zoom as i32) * (width / TILE_SIZE);
        let lat_span = lon_span * (height / width) * lat.to_radians().cos().abs().max(0.01);

        Self {
            min: [lon - lon_span / 2.0, lat - lat_span / 2.0],
            max: [lon + lon_span / 2.0, lat + lat_span / 2.0],
        }
    }

    /// Smallest padded box containing every `(lat, lon)` point.
    pub fn fit(points: impl IntoIterator<Item = (f64, f64)>) -> Option<Self> {
        let mut min = [f64::INFINITY; 2];
        let mut max = [f64::NEG_INFINITY; 2];
        let mut any = false;

        for (lat, lon) in points {
            any = true;
            min = [min[0].min(lon), min[1].min(lat)];
            max = [max[0].max(lon), max[1].max(lat)];
        }
        if !any {
            return None;
        }

        let pad = |lo: f64, hi: f64| {
            let span = (hi - lo).max(MIN_EXTENT);
            let mid = (lo + hi) / 2.0;
            (mid - span * 0.55, mid + span * 0.55)
        };
        let (x0, x1) = pad(min[0], max[0]);
        let (y0, y1) = pad(min[1], max[1]);

        Some(Self {
            min: [x0, y0],
            max: [x1, y1],
        })
    }

    pub fn lon_span(&self) -> f64 {
        self.max[0] - self.min[0]
    }

    pub fn lat_span(&self) -> f64 {
        self.max[1] - self.min[1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_six_spans_a_tile_worth_of_degrees() {
        let view = MapViewport::centered((0.0, 80.0), 6, 256.0, 256.0);
        assert!((view.lon_span() - 5.625).abs() < 1e-9);
        assert!((view.lat_span() - 5.625).abs() < 1e-9);
        assert!((view.min[0] + view.max[0] - 160.0).abs() < 1e-9);
    }

    #[test]
    fn each_zoom_level_halves_the_span() {
        let wide = MapViewport::centered((19.0, 73.0), 5, 800.0, 600.0);
        let near = MapViewport::centered((19.0, 73.0), 6, 800.0, 600.0);
        assert!((wide.lon_span() / near.lon_span() - 2.0).abs() < 1e-9);
        assert!((wide.lat_span() / near.lat_span() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn latitude_span_shrinks_away_from_equator() {
        let equator = MapViewport::centered((0.0, 0.0), 6, 512.0, 512.0);
        let north = MapViewport::centered((60.0, 0.0), 6, 512.0, 512.0);
        assert!((north.lat_span() - equator.lat_span() * 0.5).abs() < 1e-9);
    }

    #[test]
    fn fit_contains_all_points() {
        let view = MapViewport::fit([(19.0, 72.8), (18.5, 73.0), (19.2, 72.9)]).unwrap();
        assert!(view.min[0] < 72.8 && view.max[0] > 73.0);
        assert!(view.min[1] < 18.5 && view.max[1] > 19.2);
    }

    #[test]
    fn fit_of_single_point_has_minimum_extent() {
        let view = MapViewport::fit([(10.0, 20.0)]).unwrap();
        assert!(view.lon_span() >= MIN_EXTENT);
        assert!(view.lat_span() >= MIN_EXTENT);
        assert_eq!(MapViewport::fit(std::iter::empty()), None);
    }
}
