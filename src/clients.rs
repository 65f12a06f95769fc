use std::sync::OnceLock;

use color_eyre::eyre::{eyre, Result};

pub const DEFAULT_OPENCAGE_URL: &str = "https://api.opencagedata.com/geocode/v1/json";

pub static REQWEST: OnceLock<reqwest::Client> = OnceLock::new();
pub static OPENCAGE_URL: OnceLock<String> = OnceLock::new();
pub static OPENCAGE_API_KEY: OnceLock<String> = OnceLock::new();

pub fn get_reqwest_client() -> Result<&'static reqwest::Client> {
    REQWEST.get().ok_or(eyre!("Failed to get reqwest client"))
}

pub fn get_opencage_url() -> Result<&'static String> {
    OPENCAGE_URL
        .get()
        .ok_or(eyre!("Failed to get opencage url"))
}

pub fn get_opencage_api_key() -> Result<&'static String> {
    OPENCAGE_API_KEY
        .get()
        .ok_or(eyre!("Failed to get opencage api key"))
}

/// Set up the shared http client and OpenCage settings. Only the first call has any effect.
pub fn init(base_url: String, api_key: String) -> Result<()> {
    let client = reqwest::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;
    let _ = REQWEST.set(client);
    let _ = OPENCAGE_URL.set(base_url);
    let _ = OPENCAGE_API_KEY.set(api_key);
    Ok(())
}
