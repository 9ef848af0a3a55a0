use crate::model::Airport;

const EARTH_RADIUS_MILES: f64 = 3_958.8;
const EARTH_RADIUS_KILOMETERS: f64 = 6_371.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Units {
    Miles,
    Kilometers,
}

/// Great-circle distance between two airports, by the haversine formula.
pub fn distance(from: &Airport, to: &Airport, units: Units) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let delta_lat = (to.latitude - from.latitude).to_radians();
    let delta_lon = (to.longitude - from.longitude).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    match units {
        Units::Miles => EARTH_RADIUS_MILES * c,
        Units::Kilometers => EARTH_RADIUS_KILOMETERS * c,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn airport(latitude: f64, longitude: f64) -> Airport {
        Airport {
            latitude,
            longitude,
            ..Airport::default()
        }
    }

    #[test]
    fn same_place_is_zero() {
        let jfk = airport(40.63975, -73.77893);
        assert_eq!(distance(&jfk, &jfk, Units::Miles), 0.0);
    }

    #[test]
    fn jfk_to_lax() {
        let jfk = airport(40.63975, -73.77893);
        let lax = airport(33.94254, -118.40807);
        let miles = distance(&jfk, &lax, Units::Miles);
        let km = distance(&lax, &jfk, Units::Kilometers);
        // Published great-circle distance is 2,475 statute miles.
        assert!((miles - 2475.0).abs() < 10.0, "{}", miles);
        assert!((km - miles * 1.609344).abs() < 10.0, "{}", km);
    }
}
