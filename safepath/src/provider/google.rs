//! Google Maps Platform capability.
//!
//! Requires a Google Cloud project with billing enabled and an API key with
//! the Places, Directions and Geocoding APIs enabled. The key is the user's
//! own credential; it is sent to Google only.
//!
//! # Endpoints
//!
//! - Place search: `/maps/api/place/findplacefromtext/json`
//! - Routing: `/maps/api/directions/json`
//! - Credential check: `/maps/api/geocode/json` (one reverse-geocode check)

use serde::Deserialize;

use super::http::AsyncHttpClient;
use super::types::ProviderError;
use crate::coord::{decode_polyline, Coordinate};
use crate::map::{MapContainer, MapError, MapLoader, SceneWidget};
use crate::route::{
    CapabilityError, PathResponse, PlaceCandidate, PlaceSearch, RoutePath, RoutePlanner,
};

const BASE_URL: &str = "https://maps.googleapis.com/maps/api";

/// Placeholder shipped in sample configuration files.
pub const PLACEHOLDER_API_KEY: &str = "YOUR_API_KEY_HERE";

/// Returns true if `key` is empty or still the sample placeholder.
pub fn is_placeholder_key(key: &str) -> bool {
    let key = key.trim();
    key.is_empty() || key == PLACEHOLDER_API_KEY
}

/// Place search and routing through Google Maps web services.
#[derive(Clone)]
pub struct GoogleMapsClient<C: AsyncHttpClient> {
    http_client: C,
    api_key: String,
    base_url: String,
    language: Option<String>,
    region: Option<String>,
    location_bias: Option<(Coordinate, u32)>,
}

impl<C: AsyncHttpClient> GoogleMapsClient<C> {
    pub fn new(http_client: C, api_key: impl Into<String>) -> Self {
        Self {
            http_client,
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
            language: None,
            region: None,
            location_bias: None,
        }
    }

    /// Result language (e.g. `en`, `hi`).
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Region code (ccTLD, e.g. `in`) used to bias routing.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Prefer place results within `radius_meters` of `center`.
    pub fn with_location_bias(mut self, center: Coordinate, radius_meters: u32) -> Self {
        self.location_bias = Some((center, radius_meters));
        self
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    fn build_url(&self, endpoint: &str, params: &[(&str, String)]) -> Result<String, CapabilityError> {
        let mut all: Vec<(&str, &str)> = params.iter().map(|(k, v)| (*k, v.as_str())).collect();
        if let Some(language) = &self.language {
            all.push(("language", language.as_str()));
        }
        all.push(("key", self.api_key.as_str()));

        reqwest::Url::parse_with_params(&format!("{}/{}", self.base_url, endpoint), &all)
            .map(String::from)
            .map_err(|e| CapabilityError::Provider(format!("Invalid request URL: {}", e)))
    }

    async fn fetch<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T, CapabilityError> {
        let body = self.http_client.get(url).await?;
        serde_json::from_slice(&body)
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()).into())
    }
}

/// Maps a web-service status that is neither success nor "no results".
fn status_error(status: &str, message: Option<String>) -> CapabilityError {
    let detail = match message {
        Some(message) => format!("{}: {}", status, message),
        None => status.to_string(),
    };
    match status {
        "REQUEST_DENIED" | "INVALID_REQUEST" => CapabilityError::Denied(detail),
        _ => CapabilityError::Provider(detail),
    }
}

fn coordinate_param(coord: &Coordinate) -> String {
    format!("{},{}", coord.latitude(), coord.longitude())
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

impl LatLng {
    fn to_coordinate(&self) -> Result<Coordinate, CapabilityError> {
        Coordinate::new(self.lat, self.lng)
            .map_err(|e| CapabilityError::InvalidResponse(e.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct FindPlaceResponse {
    status: String,
    #[serde(default)]
    candidates: Vec<PlaceResult>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaceResult {
    #[serde(default)]
    name: String,
    formatted_address: Option<String>,
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

impl<C: AsyncHttpClient> PlaceSearch for GoogleMapsClient<C> {
    async fn search(&self, query: &str) -> Result<Vec<PlaceCandidate>, CapabilityError> {
        let mut params = vec![
            ("input", query.to_string()),
            ("inputtype", "textquery".to_string()),
            ("fields", "name,formatted_address,geometry".to_string()),
        ];
        if let Some((center, radius)) = &self.location_bias {
            params.push((
                "locationbias",
                format!("circle:{}@{}", radius, coordinate_param(center)),
            ));
        }
        let url = self.build_url("place/findplacefromtext/json", &params)?;

        let response: FindPlaceResponse = self.fetch(&url).await?;
        match response.status.as_str() {
            "OK" => {}
            "ZERO_RESULTS" | "NOT_FOUND" => return Ok(Vec::new()),
            other => return Err(status_error(other, response.error_message)),
        }

        // Candidates without a usable location cannot be routed to; skip them.
        let candidates = response
            .candidates
            .into_iter()
            .filter_map(|place| {
                let geometry = place.geometry?;
                match geometry.location.to_coordinate() {
                    Ok(location) => Some(PlaceCandidate {
                        name: place.name,
                        formatted_address: place.formatted_address,
                        location,
                    }),
                    Err(e) => {
                        tracing::debug!(place = %place.name, error = %e, "Skipping place candidate");
                        None
                    }
                }
            })
            .collect();
        Ok(candidates)
    }
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    status: String,
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DirectionsRoute {
    summary: Option<String>,
    overview_polyline: EncodedPolyline,
    #[serde(default)]
    legs: Vec<DirectionsLeg>,
}

#[derive(Debug, Deserialize)]
struct EncodedPolyline {
    points: String,
}

#[derive(Debug, Deserialize)]
struct DirectionsLeg {
    distance: Option<TextValue>,
    duration: Option<TextValue>,
}

#[derive(Debug, Deserialize)]
struct TextValue {
    value: f64,
}

impl<C: AsyncHttpClient> RoutePlanner for GoogleMapsClient<C> {
    async fn plan(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<PathResponse, CapabilityError> {
        let mut params = vec![
            ("origin", coordinate_param(&origin)),
            ("destination", coordinate_param(&destination)),
            ("mode", "driving".to_string()),
        ];
        if let Some(region) = &self.region {
            params.push(("region", region.clone()));
        }
        let url = self.build_url("directions/json", &params)?;

        let response: DirectionsResponse = self.fetch(&url).await?;
        match response.status.as_str() {
            "OK" => {}
            "ZERO_RESULTS" | "NOT_FOUND" => return Ok(PathResponse::NoPath),
            other => return Err(status_error(other, response.error_message)),
        }

        let Some(route) = response.routes.into_iter().next() else {
            return Ok(PathResponse::NoPath);
        };
        let points = decode_polyline(&route.overview_polyline.points)
            .map_err(|e| CapabilityError::InvalidResponse(e.to_string()))?;
        let leg = route.legs.first();

        Ok(PathResponse::Found(RoutePath {
            points,
            distance_meters: leg.and_then(|l| l.distance.as_ref()).map(|d| d.value),
            duration_secs: leg
                .and_then(|l| l.duration.as_ref())
                .map(|d| d.value.max(0.0) as u64),
            summary: route.summary.filter(|s| !s.is_empty()),
        }))
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    error_message: Option<String>,
}

/// Loads the Google mapping capability.
///
/// The key is validated once with a reverse-geocode request at the initial
/// center; a rejected key or unreachable service fails the load.
pub struct GoogleMapsLoader<C: AsyncHttpClient> {
    client: GoogleMapsClient<C>,
}

impl<C: AsyncHttpClient> GoogleMapsLoader<C> {
    pub fn new(http_client: C, api_key: impl Into<String>) -> Self {
        Self {
            client: GoogleMapsClient::new(http_client, api_key),
        }
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: &str) -> Self {
        self.client = self.client.with_base_url(base_url);
        self
    }

    async fn verify_key(&self, center: Coordinate) -> Result<(), MapError> {
        let url = self
            .client
            .build_url("geocode/json", &[("latlng", coordinate_param(&center))])
            .map_err(|e| MapError::CapabilityLoad(e.to_string()))?;

        let response: GeocodeResponse = self
            .client
            .fetch(&url)
            .await
            .map_err(|e| MapError::CapabilityLoad(e.to_string()))?;

        match response.status.as_str() {
            "OK" | "ZERO_RESULTS" => Ok(()),
            other => Err(MapError::CapabilityLoad(
                status_error(other, response.error_message).to_string(),
            )),
        }
    }
}

impl<C: AsyncHttpClient> MapLoader for GoogleMapsLoader<C> {
    type Widget = SceneWidget;

    async fn load(
        &self,
        container: &MapContainer,
        center: Coordinate,
        zoom: u8,
    ) -> Result<SceneWidget, MapError> {
        if is_placeholder_key(&self.client.api_key) {
            return Err(MapError::CapabilityLoad(
                "Google Maps API key is not configured".to_string(),
            ));
        }

        self.verify_key(center).await?;
        tracing::debug!(container = %container.element_id, "Google Maps key accepted");
        Ok(SceneWidget::new(container.clone(), center, zoom))
    }
}
