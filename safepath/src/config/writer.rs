//! INI serialization logic for converting `ConfigFile` → INI string.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let api_key = config.maps.api_key.as_deref().unwrap_or("");
    let region = config.maps.region.as_deref().unwrap_or("");
    let language = config.maps.language.as_deref().unwrap_or("");
    let fallback = format!(
        "{}, {}",
        config.location.fallback.latitude(),
        config.location.fallback.longitude()
    );
    let zones_file = config
        .zones
        .file
        .as_ref()
        .map(|p| path_to_string(p))
        .unwrap_or_default();

    format!(
        r#"[maps]
; Google Maps Platform API key (Places, Directions and Geocoding APIs enabled)
; Stored only in this file. GOOGLE_MAPS_API_KEY overrides it when set.
api_key = {}
; Two-letter region code used to bias routing (e.g. in, us, gb)
region = {}
; Result language (e.g. en, hi); empty uses the provider default
language = {}
; Initial zoom level (0-21)
default_zoom = {}

[location]
; Position used when location is unavailable or denied (lat, lon)
fallback = {}
; Seconds to wait for the first position fix
fix_timeout_secs = {}

[zones]
; JSON file with advisory zones; empty shows none
file = {}

[logging]
file = {}
"#,
        api_key,
        region,
        language,
        config.maps.default_zoom,
        fallback,
        config.location.fix_timeout_secs,
        zones_file,
        path_to_string(&config.logging.file),
    )
}

fn path_to_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
