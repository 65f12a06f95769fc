use bon::Builder;
use color_eyre::eyre::{bail, ensure, Result};
use geo_types::{coord, Point, Rect};
use serde_json::{json, Value};

/// Ordered json object, the flattened form of an address
pub type JsonObject = serde_json::Map<String, Value>;

/// Anything that can be exported as a flat, ordered json object
pub trait Flatten {
    fn flatten(&self) -> JsonObject;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        check_latitude(latitude)?;
        check_longitude(longitude)?;
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl From<Coordinates> for Point {
    fn from(value: Coordinates) -> Self {
        Point::new(value.longitude, value.latitude)
    }
}

/// Bounding box of a result, in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    south: f64,
    west: f64,
    north: f64,
    east: f64,
}

impl Bounds {
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Result<Self> {
        check_latitude(south)?;
        check_latitude(north)?;
        check_longitude(west)?;
        check_longitude(east)?;
        Ok(Self {
            south,
            west,
            north,
            east,
        })
    }

    pub fn south(&self) -> f64 {
        self.south
    }

    pub fn west(&self) -> f64 {
        self.west
    }

    pub fn north(&self) -> f64 {
        self.north
    }

    pub fn east(&self) -> f64 {
        self.east
    }
}

impl From<Bounds> for Rect {
    fn from(value: Bounds) -> Self {
        Rect::new(
            coord! { x: value.west, y: value.south },
            coord! { x: value.east, y: value.north },
        )
    }
}

fn check_latitude(latitude: f64) -> Result<()> {
    ensure!(
        latitude.is_finite() && (-90.0..=90.0).contains(&latitude),
        "Latitude {latitude} is out of range"
    );
    Ok(())
}

fn check_longitude(longitude: f64) -> Result<()> {
    ensure!(
        longitude.is_finite() && (-180.0..=180.0).contains(&longitude),
        "Longitude {longitude} is out of range"
    );
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Country {
    name: Option<String>,
    code: Option<String>,
}

impl Country {
    /// Country codes are stored upper-cased. At least one of name and code is required.
    pub fn new(name: Option<String>, code: Option<String>) -> Result<Self> {
        if name.is_none() && code.is_none() {
            bail!("A country needs a name or a code");
        }
        Ok(Self {
            name,
            code: code.map(|c| c.to_uppercase()),
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminLevel {
    level: u8,
    name: String,
    code: Option<String>,
}

impl AdminLevel {
    pub fn new(level: u8, name: impl Into<String>, code: Option<String>) -> Self {
        Self {
            level,
            name: name.into(),
            code,
        }
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }
}

pub const MAX_ADMIN_LEVEL: u8 = 5;

/// Administrative divisions of an address (state, county...), at most one per level
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminLevels(Vec<AdminLevel>);

impl AdminLevels {
    pub fn new(levels: Vec<AdminLevel>) -> Result<Self> {
        for (i, admin_level) in levels.iter().enumerate() {
            ensure!(
                (1..=MAX_ADMIN_LEVEL).contains(&admin_level.level),
                "Administrative level should be between 1 and {MAX_ADMIN_LEVEL}, got {}",
                admin_level.level
            );
            ensure!(
                levels[..i].iter().all(|l| l.level != admin_level.level),
                "Administrative level {} is defined twice",
                admin_level.level
            );
        }
        Ok(Self(levels))
    }

    pub fn get(&self, level: u8) -> Option<&AdminLevel> {
        self.0.iter().find(|l| l.level == level)
    }

    pub fn first(&self) -> Option<&AdminLevel> {
        self.0.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AdminLevel> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A geocoded address, independent of the provider that resolved it
#[derive(Builder, Debug, Clone, PartialEq)]
pub struct Address {
    #[builder(into)]
    provided_by: String,
    coordinates: Option<Coordinates>,
    bounds: Option<Bounds>,
    #[builder(into)]
    street_number: Option<String>,
    #[builder(into)]
    street_name: Option<String>,
    #[builder(into)]
    postal_code: Option<String>,
    #[builder(into)]
    locality: Option<String>,
    #[builder(into)]
    sub_locality: Option<String>,
    #[builder(default)]
    admin_levels: AdminLevels,
    country: Option<Country>,
    #[builder(into)]
    timezone: Option<String>,
}

impl Address {
    pub fn provided_by(&self) -> &str {
        &self.provided_by
    }

    pub fn coordinates(&self) -> Option<&Coordinates> {
        self.coordinates.as_ref()
    }

    pub fn bounds(&self) -> Option<&Bounds> {
        self.bounds.as_ref()
    }

    pub fn street_number(&self) -> Option<&str> {
        self.street_number.as_deref()
    }

    pub fn street_name(&self) -> Option<&str> {
        self.street_name.as_deref()
    }

    pub fn postal_code(&self) -> Option<&str> {
        self.postal_code.as_deref()
    }

    pub fn locality(&self) -> Option<&str> {
        self.locality.as_deref()
    }

    pub fn sub_locality(&self) -> Option<&str> {
        self.sub_locality.as_deref()
    }

    pub fn admin_levels(&self) -> &AdminLevels {
        &self.admin_levels
    }

    pub fn country(&self) -> Option<&Country> {
        self.country.as_ref()
    }

    pub fn timezone(&self) -> Option<&str> {
        self.timezone.as_deref()
    }
}

impl Flatten for Address {
    fn flatten(&self) -> JsonObject {
        let admin_levels: JsonObject = self
            .admin_levels
            .iter()
            .map(|l| {
                (
                    l.level.to_string(),
                    json!({ "name": l.name, "code": l.code, "level": l.level }),
                )
            })
            .collect();
        let bounds = self.bounds.map_or(
            json!({ "south": null, "west": null, "north": null, "east": null }),
            |b| json!({ "south": b.south, "west": b.west, "north": b.north, "east": b.east }),
        );

        let mut flat = JsonObject::new();
        flat.insert("providedBy".into(), json!(self.provided_by));
        flat.insert(
            "latitude".into(),
            json!(self.coordinates.map(|c| c.latitude)),
        );
        flat.insert(
            "longitude".into(),
            json!(self.coordinates.map(|c| c.longitude)),
        );
        flat.insert("bounds".into(), bounds);
        flat.insert("streetNumber".into(), json!(self.street_number));
        flat.insert("streetName".into(), json!(self.street_name));
        flat.insert("postalCode".into(), json!(self.postal_code));
        flat.insert("locality".into(), json!(self.locality));
        flat.insert("subLocality".into(), json!(self.sub_locality));
        flat.insert("adminLevels".into(), Value::Object(admin_levels));
        flat.insert("country".into(), json!(self.country().and_then(Country::name)));
        flat.insert(
            "countryCode".into(),
            json!(self.country().and_then(Country::code)),
        );
        flat.insert("timezone".into(), json!(self.timezone));
        flat
    }
}
