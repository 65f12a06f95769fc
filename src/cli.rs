use clap::{Parser, Subcommand};
use opencage_geocoder::{clients::DEFAULT_OPENCAGE_URL, geocode::DEFAULT_LIMIT};

#[derive(Parser)]
#[command(author, version, about, long_about = None, propagate_version = true)]
pub struct Cli {
    #[clap(long, env = "OPENCAGE_API_KEY", hide_env_values = true)]
    pub api_key: String,

    #[clap(long, env = "OPENCAGE_URL", default_value = DEFAULT_OPENCAGE_URL)]
    pub base_url: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Look up addresses matching a free-form query.
    Geocode {
        /// Address or place name.
        query: String,

        /// Maximum number of results.
        #[clap(long, default_value_t = DEFAULT_LIMIT)]
        limit: u32,

        /// Preferred language of the results, as an IETF tag.
        #[clap(long)]
        language: Option<String>,

        /// Restrict results to a country, as an ISO 3166-1 alpha-2 code.
        #[clap(long)]
        country_code: Option<String>,
    },

    /// Look up the address at a point.
    #[clap(alias = "rev")]
    Reverse {
        #[clap(allow_negative_numbers = true)]
        latitude: f64,

        #[clap(allow_negative_numbers = true)]
        longitude: f64,

        /// Preferred language of the results, as an IETF tag.
        #[clap(long)]
        language: Option<String>,
    },
}
