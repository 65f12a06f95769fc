use serde::{Serialize, Serializer};
use serde_json::json;

use super::address::{Address, Coordinates, Country, Flatten, JsonObject};

/// An address resolved by OpenCage, with the annotations it attaches to each result.
///
/// Values are immutable: every `with_*` method returns a modified copy and leaves
/// the receiver untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenCageAddress {
    address: Address,
    /// https://en.wikipedia.org/wiki/Military_Grid_Reference_System
    mgrs: Option<String>,
    /// https://en.wikipedia.org/wiki/Maidenhead_Locator_System
    maidenhead: Option<String>,
    /// https://en.wikipedia.org/wiki/Geohash
    geohash: Option<String>,
    /// https://what3words.com/
    what3words: Option<String>,
    formatted_address: Option<String>,
    place_type: Option<String>,
}

impl From<Address> for OpenCageAddress {
    fn from(address: Address) -> Self {
        Self::new(address)
    }
}

impl OpenCageAddress {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            mgrs: None,
            maidenhead: None,
            geohash: None,
            what3words: None,
            formatted_address: None,
            place_type: None,
        }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn coordinates(&self) -> Option<&Coordinates> {
        self.address.coordinates()
    }

    pub fn country(&self) -> Option<&Country> {
        self.address.country()
    }

    pub fn with_mgrs(&self, mgrs: Option<String>) -> Self {
        Self {
            mgrs,
            ..self.clone()
        }
    }

    pub fn mgrs(&self) -> Option<&str> {
        self.mgrs.as_deref()
    }

    pub fn with_maidenhead(&self, maidenhead: Option<String>) -> Self {
        Self {
            maidenhead,
            ..self.clone()
        }
    }

    pub fn maidenhead(&self) -> Option<&str> {
        self.maidenhead.as_deref()
    }

    pub fn with_geohash(&self, geohash: Option<String>) -> Self {
        Self {
            geohash,
            ..self.clone()
        }
    }

    pub fn geohash(&self) -> Option<&str> {
        self.geohash.as_deref()
    }

    pub fn with_what3words(&self, what3words: Option<String>) -> Self {
        Self {
            what3words,
            ..self.clone()
        }
    }

    pub fn what3words(&self) -> Option<&str> {
        self.what3words.as_deref()
    }

    pub fn with_formatted_address(&self, formatted_address: Option<String>) -> Self {
        Self {
            formatted_address,
            ..self.clone()
        }
    }

    pub fn formatted_address(&self) -> Option<&str> {
        self.formatted_address.as_deref()
    }

    /// Kind of place OpenCage matched, e.g. "city" or "building"
    pub fn with_place_type(&self, place_type: Option<String>) -> Self {
        Self {
            place_type,
            ..self.clone()
        }
    }

    pub fn place_type(&self) -> Option<&str> {
        self.place_type.as_deref()
    }
}

/// Coordinates and country are nested objects here rather than the flat
/// `latitude`, `longitude`, `country` and `countryCode` keys of a plain [`Address`].
impl Flatten for OpenCageAddress {
    fn flatten(&self) -> JsonObject {
        let mut flat = self.address.flatten();

        flat.insert("mGRS".into(), json!(self.mgrs));
        flat.insert("maidenhead".into(), json!(self.maidenhead));
        flat.insert("geohash".into(), json!(self.geohash));
        flat.insert("what3words".into(), json!(self.what3words));
        flat.insert("formattedAddress".into(), json!(self.formatted_address));
        flat.insert("type".into(), json!(self.place_type));

        for key in ["country", "countryCode", "latitude", "longitude"] {
            flat.shift_remove(key);
        }

        let country = self.country();
        flat.insert(
            "country".into(),
            json!({
                "name": country.and_then(Country::name),
                "code": country.and_then(Country::code)
            }),
        );
        let coordinates = self.coordinates();
        flat.insert(
            "coordinates".into(),
            json!({
                "latitude": coordinates.map(Coordinates::latitude),
                "longitude": coordinates.map(Coordinates::longitude)
            }),
        );
        flat
    }
}

impl Serialize for OpenCageAddress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.flatten().serialize(serializer)
    }
}
