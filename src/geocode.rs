use color_eyre::eyre::{ensure, Result, WrapErr};
use tracing::{info, instrument};

use crate::{
    clients::{get_opencage_api_key, get_opencage_url, get_reqwest_client},
    types::{
        dto::opencage::OpenCageResponse,
        model::{address::Bounds, address::Coordinates, OpenCageAddress},
    },
};

pub const DEFAULT_LIMIT: u32 = 5;

/// A forward geocoding request
#[derive(Debug, Clone)]
pub struct GeocodeQuery {
    pub text: String,
    pub limit: u32,
    pub language: Option<String>,
    pub country_code: Option<String>,
    pub bounds: Option<Bounds>,
}

impl GeocodeQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            limit: DEFAULT_LIMIT,
            language: None,
            country_code: None,
            bounds: None,
        }
    }

    /// Query string parameters, without the api key
    pub fn params(&self) -> Result<Vec<(&'static str, String)>> {
        ensure!(!self.text.trim().is_empty(), "Geocode query is empty");
        let mut params = vec![
            ("q", self.text.clone()),
            ("limit", self.limit.to_string()),
            ("no_annotations", "0".to_string()),
        ];
        if let Some(language) = &self.language {
            params.push(("language", language.clone()));
        }
        if let Some(country_code) = &self.country_code {
            params.push(("countrycode", country_code.to_lowercase()));
        }
        if let Some(bounds) = &self.bounds {
            params.push((
                "bounds",
                format!(
                    "{},{},{},{}",
                    bounds.west(),
                    bounds.south(),
                    bounds.east(),
                    bounds.north()
                ),
            ));
        }
        Ok(params)
    }
}

/// A reverse geocoding request, always limited to the best match
pub fn reverse_params(
    coordinates: &Coordinates,
    language: Option<&str>,
) -> Vec<(&'static str, String)> {
    let mut params = vec![
        (
            "q",
            format!("{},{}", coordinates.latitude(), coordinates.longitude()),
        ),
        ("limit", "1".to_string()),
        ("no_annotations", "0".to_string()),
    ];
    if let Some(language) = language {
        params.push(("language", language.to_string()));
    }
    params
}

#[instrument]
pub async fn geocode(query: &GeocodeQuery) -> Result<Vec<OpenCageAddress>> {
    let addresses = fetch(query.params()?).await?;
    info!("number of results for {:?}: {}", query.text, addresses.len());
    Ok(addresses)
}

#[instrument]
pub async fn reverse_geocode(
    coordinates: &Coordinates,
    language: Option<&str>,
) -> Result<Vec<OpenCageAddress>> {
    let addresses = fetch(reverse_params(coordinates, language)).await?;
    info!("number of results: {}", addresses.len());
    Ok(addresses)
}

async fn fetch(mut params: Vec<(&'static str, String)>) -> Result<Vec<OpenCageAddress>> {
    params.push(("key", get_opencage_api_key()?.clone()));
    // OpenCage reports errors in the json body as well as the http status
    let response = get_reqwest_client()?
        .get(get_opencage_url()?)
        .query(&params)
        .send()
        .await
        .wrap_err("Failed to reach OpenCage")?
        .json::<OpenCageResponse>()
        .await
        .wrap_err("Failed to decode OpenCage response")?;
    response.into_addresses()
}
