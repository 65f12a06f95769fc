mod cli;

use clap::Parser;
use opencage_geocoder::{
    clients,
    geocode::{geocode, reverse_geocode, GeocodeQuery},
    types::model::address::Coordinates,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    // logs go to stderr so stdout only carries the json results
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    clients::init(cli.base_url, cli.api_key)?;

    let addresses = match cli.command {
        Command::Geocode {
            query,
            limit,
            language,
            country_code,
        } => {
            info!("Geocoding {query:?}");
            let query = GeocodeQuery {
                limit,
                language,
                country_code,
                ..GeocodeQuery::new(query)
            };
            geocode(&query).await?
        }
        Command::Reverse {
            latitude,
            longitude,
            language,
        } => {
            info!("Reverse geocoding {latitude},{longitude}");
            let coordinates = Coordinates::new(latitude, longitude)?;
            reverse_geocode(&coordinates, language.as_deref()).await?
        }
    };

    println!("{}", serde_json::to_string_pretty(&addresses)?);
    Ok(())
}
