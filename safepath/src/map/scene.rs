//! In-memory map widget.
//!
//! [`SceneWidget`] keeps the overlay set in a retained scene and performs
//! viewport math itself, so the adapter can run headless (CLI, tests) and the
//! result can be handed to any renderer as GeoJSON.

use std::collections::BTreeMap;
use std::f64::consts::{LN_2, PI};

use serde_json::{json, Value};

use super::types::{CircleStyle, LineStyle, MapContainer, MarkerStyle, OverlayId, MAX_ZOOM};
use super::widget::MapWidget;
use crate::coord::{Coordinate, LatLngBounds};

/// Web Mercator world width in pixels at zoom 0.
const WORLD_PX: f64 = 256.0;

/// Pixels kept clear around fitted bounds on each side.
const FIT_PADDING_PX: f64 = 16.0;

/// One drawn overlay.
#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    Marker {
        position: Coordinate,
        style: MarkerStyle,
    },
    Circle {
        center: Coordinate,
        radius_meters: f64,
        style: CircleStyle,
    },
    Polyline {
        path: Vec<Coordinate>,
        style: LineStyle,
    },
}

/// Retained-mode widget backed by an overlay table.
#[derive(Debug, Clone)]
pub struct SceneWidget {
    container: MapContainer,
    center: Coordinate,
    zoom: u8,
    next_id: u64,
    overlays: BTreeMap<OverlayId, Overlay>,
}

impl SceneWidget {
    pub fn new(container: MapContainer, center: Coordinate, zoom: u8) -> Self {
        Self {
            container,
            center,
            zoom: zoom.min(MAX_ZOOM),
            next_id: 1,
            overlays: BTreeMap::new(),
        }
    }

    pub fn container(&self) -> &MapContainer {
        &self.container
    }

    /// Overlays in creation order.
    pub fn overlays(&self) -> impl Iterator<Item = (&OverlayId, &Overlay)> {
        self.overlays.iter()
    }

    pub fn overlay(&self, id: OverlayId) -> Option<&Overlay> {
        self.overlays.get(&id)
    }

    pub fn marker_count(&self) -> usize {
        self.count(|o| matches!(o, Overlay::Marker { .. }))
    }

    pub fn circle_count(&self) -> usize {
        self.count(|o| matches!(o, Overlay::Circle { .. }))
    }

    pub fn polyline_count(&self) -> usize {
        self.count(|o| matches!(o, Overlay::Polyline { .. }))
    }

    fn count(&self, predicate: impl Fn(&Overlay) -> bool) -> usize {
        self.overlays.values().filter(|o| predicate(o)).count()
    }

    fn insert(&mut self, overlay: Overlay) -> OverlayId {
        let id = OverlayId(self.next_id);
        self.next_id += 1;
        self.overlays.insert(id, overlay);
        id
    }

    /// Exports viewport and overlays as a GeoJSON FeatureCollection.
    ///
    /// Circles become points with a `radius_meters` property; the viewport
    /// is carried in the collection's `properties`.
    pub fn to_geojson(&self) -> Value {
        let features: Vec<Value> = self
            .overlays
            .iter()
            .map(|(id, overlay)| match overlay {
                Overlay::Marker { position, style } => json!({
                    "type": "Feature",
                    "id": id.0,
                    "geometry": point(position),
                    "properties": {
                        "overlay": "marker",
                        "kind": format!("{:?}", style.kind).to_lowercase(),
                        "title": style.title,
                        "fill": style.fill_color,
                    }
                }),
                Overlay::Circle {
                    center,
                    radius_meters,
                    style,
                } => json!({
                    "type": "Feature",
                    "id": id.0,
                    "geometry": point(center),
                    "properties": {
                        "overlay": "circle",
                        "radius_meters": radius_meters,
                        "stroke": style.stroke_color,
                        "fill": style.fill_color,
                        "fill-opacity": style.fill_opacity,
                    }
                }),
                Overlay::Polyline { path, style } => json!({
                    "type": "Feature",
                    "id": id.0,
                    "geometry": {
                        "type": "LineString",
                        "coordinates": path.iter().map(position).collect::<Vec<_>>(),
                    },
                    "properties": {
                        "overlay": "polyline",
                        "stroke": style.stroke_color,
                        "stroke-width": style.stroke_weight,
                    }
                }),
            })
            .collect();

        json!({
            "type": "FeatureCollection",
            "properties": {
                "center": position(&self.center),
                "zoom": self.zoom,
                "container": self.container.element_id,
            },
            "features": features,
        })
    }
}

/// GeoJSON position: `[lon, lat]`.
fn position(coord: &Coordinate) -> Value {
    json!([coord.longitude(), coord.latitude()])
}

fn point(coord: &Coordinate) -> Value {
    json!({ "type": "Point", "coordinates": position(coord) })
}

impl MapWidget for SceneWidget {
    fn add_marker(&mut self, position: Coordinate, style: &MarkerStyle) -> OverlayId {
        self.insert(Overlay::Marker {
            position,
            style: style.clone(),
        })
    }

    fn add_circle(
        &mut self,
        center: Coordinate,
        radius_meters: f64,
        style: &CircleStyle,
    ) -> OverlayId {
        self.insert(Overlay::Circle {
            center,
            radius_meters,
            style: style.clone(),
        })
    }

    fn add_polyline(&mut self, path: &[Coordinate], style: &LineStyle) -> OverlayId {
        self.insert(Overlay::Polyline {
            path: path.to_vec(),
            style: style.clone(),
        })
    }

    fn move_overlay(&mut self, id: OverlayId, to: Coordinate) {
        match self.overlays.get_mut(&id) {
            Some(Overlay::Marker { position, .. }) => *position = to,
            Some(Overlay::Circle { center, .. }) => *center = to,
            Some(Overlay::Polyline { .. }) => {
                tracing::debug!(overlay = %id, "Ignoring move of polyline overlay");
            }
            None => {}
        }
    }

    fn remove_overlay(&mut self, id: OverlayId) {
        self.overlays.remove(&id);
    }

    fn fit_bounds(&mut self, bounds: &LatLngBounds) {
        self.center = bounds.center();
        self.zoom = zoom_for_bounds(bounds, self.container.width_px, self.container.height_px);
    }

    fn center(&self) -> Coordinate {
        self.center
    }

    fn zoom(&self) -> u8 {
        self.zoom
    }
}

/// Deepest zoom at which `bounds` fits in a `width_px` x `height_px` viewport.
///
/// Degenerate (single point) bounds fit at [`MAX_ZOOM`].
pub fn zoom_for_bounds(bounds: &LatLngBounds, width_px: u32, height_px: u32) -> u8 {
    let ne = bounds.north_east;
    let sw = bounds.south_west;

    let lat_fraction = (mercator_y(ne.latitude()) - mercator_y(sw.latitude())) / PI;
    let lon_diff = ne.longitude() - sw.longitude();
    let lon_fraction = if lon_diff < 0.0 { lon_diff + 360.0 } else { lon_diff } / 360.0;

    let usable = |px: u32| (f64::from(px) - 2.0 * FIT_PADDING_PX).max(1.0);
    let lat_zoom = fit_zoom(usable(height_px), lat_fraction);
    let lon_zoom = fit_zoom(usable(width_px), lon_fraction);

    lat_zoom.min(lon_zoom).clamp(0.0, f64::from(MAX_ZOOM)) as u8
}

/// Projected (unscaled) Mercator y for a latitude, clamped to the world edge.
fn mercator_y(latitude: f64) -> f64 {
    let sin = latitude.to_radians().sin();
    let y = ((1.0 + sin) / (1.0 - sin)).ln() / 2.0;
    y.clamp(-PI, PI) / 2.0
}

fn fit_zoom(map_px: f64, fraction: f64) -> f64 {
    if fraction <= 0.0 {
        return f64::from(MAX_ZOOM);
    }
    (map_px / WORLD_PX / fraction).ln().div_euclid(LN_2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    fn widget() -> SceneWidget {
        SceneWidget::new(MapContainer::default(), Coordinate::NEW_DELHI, 14)
    }

    #[test]
    fn test_overlay_lifecycle() {
        let mut w = widget();

        let marker = w.add_marker(Coordinate::NEW_DELHI, &MarkerStyle::live());
        let circle = w.add_circle(Coordinate::NEW_DELHI, 50.0, &CircleStyle::accuracy());
        assert_ne!(marker, circle);
        assert_eq!(w.marker_count(), 1);
        assert_eq!(w.circle_count(), 1);

        let moved = coord(28.62, 77.21);
        w.move_overlay(marker, moved);
        w.move_overlay(circle, moved);
        assert!(matches!(w.overlay(marker), Some(Overlay::Marker { position, .. }) if *position == moved));
        assert!(matches!(w.overlay(circle), Some(Overlay::Circle { center, .. }) if *center == moved));

        w.remove_overlay(marker);
        w.remove_overlay(marker); // unknown handles are ignored
        assert_eq!(w.marker_count(), 0);
        assert_eq!(w.circle_count(), 1);
    }

    #[test]
    fn test_ids_are_never_reused() {
        let mut w = widget();
        let first = w.add_marker(Coordinate::NEW_DELHI, &MarkerStyle::live());
        w.remove_overlay(first);
        let second = w.add_marker(Coordinate::NEW_DELHI, &MarkerStyle::live());
        assert!(second > first);
    }

    #[test]
    fn test_fit_bounds_city_scale() {
        let mut w = widget();
        // Connaught Place to India Gate, ~2.5 km
        let bounds =
            LatLngBounds::from_points([&coord(28.6315, 77.2167), &coord(28.6129, 77.2295)]).unwrap();

        w.fit_bounds(&bounds);

        assert_eq!(w.center(), bounds.center());
        assert!(
            (13..=15).contains(&w.zoom()),
            "unexpected zoom {}",
            w.zoom()
        );
    }

    #[test]
    fn test_fit_bounds_intercity_zooms_out() {
        let delhi_agra =
            LatLngBounds::from_points([&Coordinate::NEW_DELHI, &coord(27.1767, 78.0081)]).unwrap();
        let zoom = zoom_for_bounds(&delhi_agra, 800, 600);
        assert!((7..=9).contains(&zoom), "unexpected zoom {}", zoom);
    }

    #[test]
    fn test_fit_single_point_uses_max_zoom() {
        let bounds = LatLngBounds::from_point(Coordinate::NEW_DELHI);
        assert_eq!(zoom_for_bounds(&bounds, 800, 600), MAX_ZOOM);
    }

    #[test]
    fn test_geojson_export() {
        let mut w = widget();
        w.add_marker(Coordinate::NEW_DELHI, &MarkerStyle::live());
        w.add_polyline(
            &[Coordinate::NEW_DELHI, coord(28.62, 77.22)],
            &LineStyle::route(),
        );

        let geojson = w.to_geojson();
        assert_eq!(geojson["type"], "FeatureCollection");
        assert_eq!(geojson["properties"]["zoom"], 14);

        let features = geojson["features"].as_array().unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0]["geometry"]["type"], "Point");
        assert_eq!(features[0]["geometry"]["coordinates"][0], 77.2090);
        assert_eq!(features[0]["properties"]["kind"], "live");
        assert_eq!(features[1]["geometry"]["type"], "LineString");
        assert_eq!(
            features[1]["geometry"]["coordinates"].as_array().unwrap().len(),
            2
        );
    }
}
