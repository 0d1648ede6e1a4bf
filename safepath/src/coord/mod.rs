//! Geographic coordinate module
//!
//! Provides the validated [`Coordinate`] type shared by every other module,
//! bounding boxes for viewport fitting, and decoding of provider route paths.

mod polyline;
mod types;

pub use polyline::decode_polyline;
pub use types::{
    CoordError, Coordinate, LatLngBounds, EARTH_RADIUS_METERS, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_delhi_constant_is_valid() {
        let delhi = Coordinate::new(28.6139, 77.2090).unwrap();
        assert_eq!(delhi, Coordinate::NEW_DELHI);
    }

    #[test]
    fn test_invalid_latitude() {
        let result = Coordinate::new(90.5, 0.0);
        assert!(matches!(result, Err(CoordError::InvalidLatitude(_))));
    }

    #[test]
    fn test_invalid_longitude() {
        let result = Coordinate::new(0.0, -180.01);
        assert!(matches!(result, Err(CoordError::InvalidLongitude(_))));
    }

    #[test]
    fn test_nan_is_rejected() {
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::NAN).is_err());
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        assert!(Coordinate::new(MAX_LAT, MAX_LON).is_ok());
        assert!(Coordinate::new(MIN_LAT, MIN_LON).is_ok());
    }

    #[test]
    fn test_parse_lat_lon_text() {
        let coord: Coordinate = " 27.1751 , 78.0421 ".parse().unwrap();
        assert_eq!(coord.latitude(), 27.1751);
        assert_eq!(coord.longitude(), 78.0421);

        assert!(matches!(
            "Taj Mahal".parse::<Coordinate>(),
            Err(CoordError::Parse(_))
        ));
        assert!(matches!(
            "95.0,10.0".parse::<Coordinate>(),
            Err(CoordError::InvalidLatitude(_))
        ));
    }

    #[test]
    fn test_distance_delhi_to_agra() {
        let agra = Coordinate::new(27.1767, 78.0081).unwrap();
        let distance = Coordinate::NEW_DELHI.distance_to(&agra);

        // Roughly 178 km as the crow flies
        assert!(
            (170_000.0..186_000.0).contains(&distance),
            "unexpected distance {}",
            distance
        );
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        assert_eq!(Coordinate::NEW_DELHI.distance_to(&Coordinate::NEW_DELHI), 0.0);
    }

    #[test]
    fn test_bounds_from_points() {
        let a = Coordinate::new(28.0, 77.0).unwrap();
        let b = Coordinate::new(27.0, 78.5).unwrap();
        let bounds = LatLngBounds::from_points([&a, &b]).unwrap();

        assert_eq!(bounds.south_west, Coordinate::new(27.0, 77.0).unwrap());
        assert_eq!(bounds.north_east, Coordinate::new(28.0, 78.5).unwrap());
        assert_eq!(bounds.center(), Coordinate::new(27.5, 77.75).unwrap());
        assert!(bounds.contains(&Coordinate::new(27.5, 78.0).unwrap()));
        assert!(!bounds.contains(&Coordinate::new(26.9, 78.0).unwrap()));
    }

    #[test]
    fn test_bounds_from_no_points() {
        let empty: [&Coordinate; 0] = [];
        assert!(LatLngBounds::from_points(empty).is_none());
    }

    #[test]
    fn test_serde_validates_range() {
        let json = r#"{"latitude": 28.6139, "longitude": 77.209}"#;
        let coord: Coordinate = serde_json::from_str(json).unwrap();
        assert_eq!(coord, Coordinate::NEW_DELHI);

        let bad = r#"{"latitude": 128.0, "longitude": 77.209}"#;
        assert!(serde_json::from_str::<Coordinate>(bad).is_err());
    }
}
