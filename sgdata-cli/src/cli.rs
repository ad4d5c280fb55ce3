use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use inquire::{CustomType, Text};
use sgdata_core::{Config, SgDataClient};

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "sgdata", version, about = "data.gov.sg real-time API client")]
pub struct Cli {
    /// Override the configured API base URL.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Override the configured request timeout, in seconds.
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

/// Point-in-time selectors shared by the dataset commands.
#[derive(Debug, Args)]
pub struct When {
    /// Readings at this local time, e.g. 2024-01-15T12:00:00.
    #[arg(long, conflicts_with = "date")]
    pub date_time: Option<String>,

    /// All readings for this day, e.g. 2024-01-15.
    #[arg(long)]
    pub date: Option<String>,
}

impl When {
    fn params(&self) -> Vec<(&str, &str)> {
        let mut params = Vec::new();
        if let Some(dt) = &self.date_time {
            params.push(("date_time", dt.as_str()));
        }
        if let Some(d) = &self.date {
            params.push(("date", d.as_str()));
        }
        params
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively set base URL and timeout.
    Configure,

    #[command(flatten)]
    Query(Query),
}

/// Commands that talk to the API.
#[derive(Debug, Subcommand)]
pub enum Query {
    /// Show Pollutant Standards Index readings per region.
    Psi {
        #[command(flatten)]
        when: When,
    },

    /// Show the 2-hour weather forecast per area.
    Forecast {
        #[command(flatten)]
        when: When,

        /// Only show areas whose name contains this text.
        #[arg(long)]
        area: Option<String>,
    },

    /// Show carpark lot availability.
    Carparks {
        /// Availability at this local time, e.g. 2024-01-15T12:00:00.
        #[arg(long)]
        date_time: Option<String>,

        /// Only show these carpark numbers.
        #[arg(long = "carpark")]
        carparks: Vec<String>,
    },

    /// GET an arbitrary path and print the raw JSON.
    Get {
        /// Path relative to the base URL, e.g. /v1/environment/psi.
        path: String,

        /// Query parameter, repeatable.
        #[arg(long = "param", value_parser = parse_key_val)]
        params: Vec<(String, String)>,
    },
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) =
        s.split_once('=').ok_or_else(|| format!("expected key=value, got '{s}'"))?;
    if key.is_empty() {
        return Err(format!("empty key in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let mut config = Config::load()?;
        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }
        tracing::debug!(base_url = %config.base_url, timeout_secs = config.timeout_secs, "using configuration");

        match self.command {
            Command::Configure => configure(config),
            Command::Query(query) => {
                let mut client =
                    SgDataClient::from_config(config).context("Failed to create API client")?;
                let result = run_query(&client, query).await;
                client.close();
                result
            }
        }
    }
}

async fn run_query(client: &SgDataClient, query: Query) -> Result<()> {
    match query {
        Query::Psi { when } => {
            let psi = client.psi(&when.params()).await.context("Failed to fetch PSI readings")?;
            print!("{}", output::render_psi(&psi)?);
        }
        Query::Forecast { when, area } => {
            let forecast = client
                .two_hour_forecast(&when.params())
                .await
                .context("Failed to fetch 2-hour forecast")?;
            print!("{}", output::render_forecast(&forecast, area.as_deref())?);
        }
        Query::Carparks { date_time, carparks } => {
            let params: Vec<(&str, &str)> =
                date_time.as_deref().map(|dt| ("date_time", dt)).into_iter().collect();
            let availability = client
                .carpark_availability(&params)
                .await
                .context("Failed to fetch carpark availability")?;
            print!("{}", output::render_carparks(&availability, &carparks)?);
        }
        Query::Get { path, params } => {
            let params: Vec<(&str, &str)> =
                params.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
            let value = client
                .fetch(&path, &params)
                .await
                .with_context(|| format!("Failed to fetch {path}"))?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }

    Ok(())
}

fn configure(mut config: Config) -> Result<()> {
    config.base_url = Text::new("API base URL:")
        .with_default(&config.base_url)
        .prompt()
        .context("Failed to read base URL")?;

    config.timeout_secs = CustomType::<u64>::new("Request timeout (seconds):")
        .with_default(config.timeout_secs)
        .with_help_message("0 disables the timeout")
        .with_error_message("Please enter a whole number of seconds")
        .prompt()
        .context("Failed to read timeout")?;

    // Reject an unusable base URL before it is persisted.
    SgDataClient::from_config(config.clone()).context("Invalid configuration")?;

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}
