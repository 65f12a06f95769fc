use color_eyre::eyre::{self, bail, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::model::{
    address::{AdminLevel, AdminLevels, Bounds, Coordinates, Country},
    opencage::OpenCageAddress,
    Address,
};

pub const PROVIDER_NAME: &str = "opencage";

#[derive(Serialize, Deserialize, Debug)]
pub struct OpenCageResponse {
    pub status: Status,
    #[serde(default)]
    pub total_results: u64,
    #[serde(default)]
    pub results: Vec<OpenCageResult>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct Status {
    pub code: u16,
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct OpenCageResult {
    pub geometry: LatLng,
    pub bounds: Option<ResultBounds>,
    pub components: Components,
    pub formatted: Option<String>,
    pub confidence: Option<u8>,
    #[serde(default)]
    pub annotations: Annotations,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ResultBounds {
    pub northeast: LatLng,
    pub southwest: LatLng,
}

/// Address components, only the ones we map are listed
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct Components {
    #[serde(rename = "_type")]
    pub place_type: Option<String>,
    #[serde(rename = "ISO_3166-1_alpha-2")]
    pub iso_alpha2: Option<String>,
    pub country: Option<String>,
    pub country_code: Option<String>,
    pub state: Option<String>,
    pub state_code: Option<String>,
    pub county: Option<String>,
    pub county_code: Option<String>,
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub hamlet: Option<String>,
    pub suburb: Option<String>,
    pub city_district: Option<String>,
    pub neighbourhood: Option<String>,
    pub postcode: Option<String>,
    pub house_number: Option<String>,
    pub road: Option<String>,
    pub footway: Option<String>,
    pub street: Option<String>,
    pub street_name: Option<String>,
    pub residential: Option<String>,
    pub path: Option<String>,
    pub pedestrian: Option<String>,
    pub road_reference: Option<String>,
    pub road_reference_intl: Option<String>,
}

impl Components {
    fn locality(&self) -> Option<String> {
        first_of([&self.city, &self.town, &self.village, &self.hamlet])
    }

    fn sub_locality(&self) -> Option<String> {
        first_of([&self.suburb, &self.city_district, &self.neighbourhood])
    }

    fn street_name(&self) -> Option<String> {
        first_of([
            &self.road,
            &self.footway,
            &self.street,
            &self.street_name,
            &self.residential,
            &self.path,
            &self.pedestrian,
            &self.road_reference,
            &self.road_reference_intl,
        ])
    }

    fn admin_levels(&self) -> Result<AdminLevels> {
        let levels = [
            (&self.state, &self.state_code),
            (&self.county, &self.county_code),
        ]
        .into_iter()
        .zip(1..)
        .filter_map(|((name, code), level)| {
            name.as_ref()
                .map(|name| AdminLevel::new(level, name.as_str(), code.clone()))
        })
        .collect();
        AdminLevels::new(levels)
    }

    fn country(&self) -> Result<Option<Country>> {
        let code = self.country_code.as_ref().or(self.iso_alpha2.as_ref());
        match (&self.country, code) {
            (None, None) => Ok(None),
            (name, code) => Ok(Some(Country::new(name.clone(), code.cloned())?)),
        }
    }
}

fn first_of<const N: usize>(candidates: [&Option<String>; N]) -> Option<String> {
    candidates.into_iter().flatten().next().cloned()
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct Annotations {
    #[serde(rename = "MGRS")]
    pub mgrs: Option<String>,
    #[serde(rename = "Maidenhead")]
    pub maidenhead: Option<String>,
    pub geohash: Option<String>,
    pub what3words: Option<What3words>,
    pub timezone: Option<Timezone>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct What3words {
    pub words: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct Timezone {
    pub name: String,
}

/// For converting a single OpenCage result into an address
impl TryFrom<OpenCageResult> for OpenCageAddress {
    type Error = eyre::Error;

    fn try_from(result: OpenCageResult) -> Result<Self, Self::Error> {
        let components = result.components;
        let annotations = result.annotations;
        let bounds = result
            .bounds
            .map(|b| Bounds::new(b.southwest.lat, b.southwest.lng, b.northeast.lat, b.northeast.lng))
            .transpose()?;

        let address = Address::builder()
            .provided_by(PROVIDER_NAME)
            .coordinates(Coordinates::new(result.geometry.lat, result.geometry.lng)?)
            .maybe_bounds(bounds)
            .maybe_street_number(components.house_number.clone())
            .maybe_street_name(components.street_name())
            .maybe_postal_code(components.postcode.clone())
            .maybe_locality(components.locality())
            .maybe_sub_locality(components.sub_locality())
            .admin_levels(components.admin_levels()?)
            .maybe_country(components.country()?)
            .maybe_timezone(annotations.timezone.map(|t| t.name))
            .build();

        Ok(OpenCageAddress::new(address)
            .with_mgrs(annotations.mgrs)
            .with_maidenhead(annotations.maidenhead)
            .with_geohash(annotations.geohash)
            .with_what3words(annotations.what3words.map(|w| w.words))
            .with_formatted_address(result.formatted)
            .with_place_type(components.place_type))
    }
}

impl OpenCageResponse {
    /// Check the response status and map every result
    pub fn into_addresses(self) -> Result<Vec<OpenCageAddress>> {
        let Status { code, message } = self.status;
        match code {
            200 => {}
            400 => bail!("Invalid request to OpenCage: {message}"),
            401 | 403 => bail!("Invalid OpenCage credentials: {message}"),
            402 | 429 => bail!("OpenCage quota exceeded: {message}"),
            _ => bail!("OpenCage error {code}: {message}"),
        }
        debug!(
            "total results: {}, returned: {}",
            self.total_results,
            self.results.len()
        );
        self.results
            .into_iter()
            .map(OpenCageAddress::try_from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::types::model::Flatten;

    fn paris_response() -> serde_json::Value {
        json!({
            "documentation": "https://opencagedata.com/api",
            "status": { "code": 200, "message": "OK" },
            "total_results": 1,
            "results": [{
                "annotations": {
                    "MGRS": "31UDQ5248411718",
                    "Maidenhead": "JN18eu47xk",
                    "geohash": "u09tvqxnnuph",
                    "what3words": { "words": "chins.pictures.passes" },
                    "timezone": { "name": "Europe/Paris", "offset_sec": 7200 }
                },
                "bounds": {
                    "northeast": { "lat": 48.8575, "lng": 2.3533 },
                    "southwest": { "lat": 48.8556, "lng": 2.3511 }
                },
                "components": {
                    "ISO_3166-1_alpha-2": "FR",
                    "_category": "building",
                    "_type": "building",
                    "city": "Paris",
                    "city_district": "Paris",
                    "country": "France",
                    "country_code": "fr",
                    "county": "Paris",
                    "house_number": "29",
                    "postcode": "75004",
                    "road": "Rue de Rivoli",
                    "state": "Île-de-France",
                    "state_code": "IDF",
                    "suburb": "Quartier Saint-Merri"
                },
                "confidence": 10,
                "formatted": "29 Rue de Rivoli, 75004 Paris, France",
                "geometry": { "lat": 48.8566, "lng": 2.3522 }
            }]
        })
    }

    #[test]
    fn maps_result_into_address() {
        let response: OpenCageResponse = serde_json::from_value(paris_response()).unwrap();
        let addresses = response.into_addresses().unwrap();
        assert_eq!(addresses.len(), 1);

        let paris = &addresses[0];
        let address = paris.address();
        assert_eq!(address.provided_by(), "opencage");
        assert_eq!(address.street_number(), Some("29"));
        assert_eq!(address.street_name(), Some("Rue de Rivoli"));
        assert_eq!(address.postal_code(), Some("75004"));
        assert_eq!(address.locality(), Some("Paris"));
        assert_eq!(address.sub_locality(), Some("Quartier Saint-Merri"));
        assert_eq!(address.timezone(), Some("Europe/Paris"));
        assert_eq!(address.admin_levels().len(), 2);
        assert_eq!(
            address.admin_levels().get(1).and_then(AdminLevel::code),
            Some("IDF")
        );
        assert_eq!(
            address.admin_levels().get(2).map(AdminLevel::name),
            Some("Paris")
        );
        assert_eq!(address.bounds().map(Bounds::north), Some(48.8575));

        assert_eq!(paris.mgrs(), Some("31UDQ5248411718"));
        assert_eq!(paris.maidenhead(), Some("JN18eu47xk"));
        assert_eq!(paris.geohash(), Some("u09tvqxnnuph"));
        assert_eq!(paris.what3words(), Some("chins.pictures.passes"));
        assert_eq!(
            paris.formatted_address(),
            Some("29 Rue de Rivoli, 75004 Paris, France")
        );
        assert_eq!(paris.place_type(), Some("building"));

        let flat = paris.flatten();
        assert_eq!(flat["country"], json!({ "name": "France", "code": "FR" }));
        assert_eq!(
            flat["coordinates"],
            json!({ "latitude": 48.8566, "longitude": 2.3522 })
        );
    }

    #[test]
    fn minimal_result_leaves_fields_absent() {
        let response: OpenCageResponse = serde_json::from_value(json!({
            "status": { "code": 200, "message": "OK" },
            "total_results": 1,
            "results": [{
                "components": { "_type": "body_of_water", "body_of_water": "Atlantic Ocean" },
                "geometry": { "lat": 30.0, "lng": -40.0 }
            }]
        }))
        .unwrap();
        let addresses = response.into_addresses().unwrap();

        let ocean = &addresses[0];
        assert_eq!(ocean.place_type(), Some("body_of_water"));
        assert_eq!(ocean.country(), None);
        assert_eq!(ocean.mgrs(), None);
        assert_eq!(ocean.address().bounds(), None);
        assert!(ocean.address().admin_levels().is_empty());
    }

    #[test]
    fn locality_and_street_fall_back() {
        let components: Components = serde_json::from_value(json!({
            "village": "Giverny",
            "hamlet": "Le Colombier",
            "neighbourhood": "Centre",
            "footway": "Chemin du Roy",
            "ISO_3166-1_alpha-2": "FR"
        }))
        .unwrap();

        assert_eq!(components.locality().as_deref(), Some("Giverny"));
        assert_eq!(components.sub_locality().as_deref(), Some("Centre"));
        assert_eq!(components.street_name().as_deref(), Some("Chemin du Roy"));
        let country = components.country().unwrap().unwrap();
        assert_eq!(country.code(), Some("FR"));
        assert_eq!(country.name(), None);
    }

    #[test]
    fn county_without_state_is_level_two() {
        let components: Components =
            serde_json::from_value(json!({ "county": "Eure" })).unwrap();
        let levels = components.admin_levels().unwrap();

        assert_eq!(levels.len(), 1);
        assert_eq!(levels.first().map(AdminLevel::level), Some(2));
    }

    #[test]
    fn empty_results_map_to_empty_vec() {
        let response: OpenCageResponse = serde_json::from_value(json!({
            "status": { "code": 200, "message": "OK" },
            "total_results": 0,
            "results": []
        }))
        .unwrap();

        assert!(response.into_addresses().unwrap().is_empty());
    }

    #[test]
    fn error_statuses_are_classified() {
        let cases = [
            (400, "Invalid request"),
            (401, "Invalid OpenCage credentials"),
            (403, "Invalid OpenCage credentials"),
            (402, "quota exceeded"),
            (429, "quota exceeded"),
            (503, "OpenCage error 503"),
        ];
        for (code, expected) in cases {
            let response: OpenCageResponse = serde_json::from_value(json!({
                "status": { "code": code, "message": "nope" }
            }))
            .unwrap();
            let error = response.into_addresses().unwrap_err().to_string();
            assert!(error.contains(expected), "{code}: {error}");
        }
    }

    #[test]
    fn out_of_range_geometry_is_rejected() {
        let response: OpenCageResponse = serde_json::from_value(json!({
            "status": { "code": 200, "message": "OK" },
            "results": [{
                "components": {},
                "geometry": { "lat": 123.0, "lng": 0.0 }
            }]
        }))
        .unwrap();

        assert!(response.into_addresses().is_err());
    }
}
