use std::time::Duration;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use inquire::{CustomType, Text};
use osm_core::{
    Context, DEFAULT_LOCALE, DEFAULT_USER_AGENT, Geocoder, Nominatim, OptFn, OsmType, with_locale,
    with_user_agent,
};
use serde_json::Value;
use tracing::debug;

use crate::config::Config;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "osm", version, about = "Query the Nominatim geocoding API")]
pub struct Cli {
    /// Response language (Accept-Language), e.g. "de" or "fr,en".
    #[arg(long, global = true)]
    pub locale: Option<String>,

    /// User-Agent header sent with every request.
    #[arg(long, global = true)]
    pub user_agent: Option<String>,

    /// Give up after this many seconds.
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Nominatim deployment to query instead of the public instance.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Store default locale, user agent, server and timeout.
    Configure,

    /// Address for a coordinate pair.
    Reverse {
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        #[arg(allow_negative_numbers = true)]
        lon: f64,
    },

    /// Details of an OSM object.
    Details {
        /// N (node), W (way) or R (relation).
        osm_type: OsmType,
        osm_id: i64,
    },

    /// Details of a place by its Nominatim place id.
    Place { place_id: i64 },

    /// Free-text search.
    Search { query: String },

    /// Look up an OSM object.
    Lookup {
        /// N (node), W (way) or R (relation).
        osm_type: OsmType,
        osm_id: i64,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;

        if let Command::Configure = self.command {
            return configure(config);
        }

        let geocoder = self.geocoder(&config)?;
        let (ctx, cancel) = match self.timeout(&config) {
            Some(timeout) => Context::background().with_timeout(timeout),
            None => Context::background(),
        }
        .with_cancel();

        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        });

        let value = execute(geocoder.as_ref(), &ctx, &self.command, self.opts(&config)).await?;
        println!("{}", serde_json::to_string_pretty(&value)?);

        Ok(())
    }

    /// Stored defaults first, then flags, so flags win.
    pub fn opts(&self, config: &Config) -> Vec<OptFn> {
        let mut opts = config.opts();
        if let Some(locale) = &self.locale {
            opts.push(with_locale(locale.clone()));
        }
        if let Some(user_agent) = &self.user_agent {
            opts.push(with_user_agent(user_agent.clone()));
        }
        opts
    }

    pub fn timeout(&self, config: &Config) -> Option<Duration> {
        self.timeout.map(Duration::from_secs).or_else(|| config.timeout())
    }

    /// Construct the geocoder for the configured deployment.
    pub fn geocoder(&self, config: &Config) -> anyhow::Result<Box<dyn Geocoder>> {
        let base_url = self.base_url.as_ref().or(config.base_url.as_ref());

        let geocoder = match base_url {
            Some(url) => Nominatim::with_base_url(url)
                .with_context(|| format!("Invalid Nominatim base URL '{url}'"))?,
            None => Nominatim::new(),
        };
        debug!(base_url = geocoder.base_url(), "using Nominatim deployment");

        Ok(Box::new(geocoder))
    }
}

/// Run one lookup command and return its payload as JSON.
pub async fn execute(
    geocoder: &dyn Geocoder,
    ctx: &Context,
    command: &Command,
    opts: Vec<OptFn>,
) -> anyhow::Result<Value> {
    let value = match *command {
        Command::Configure => anyhow::bail!("`configure` does not query the server"),
        Command::Reverse { lat, lon } => {
            serde_json::to_value(geocoder.reverse(ctx, lat, lon, opts).await?)?
        }
        Command::Details { osm_type, osm_id } => {
            serde_json::to_value(geocoder.details(ctx, osm_type, osm_id, opts).await?)?
        }
        Command::Place { place_id } => {
            serde_json::to_value(geocoder.details_with_place_id(ctx, place_id, opts).await?)?
        }
        Command::Search { ref query } => {
            serde_json::to_value(geocoder.search(ctx, query, opts).await?)?
        }
        Command::Lookup { osm_type, osm_id } => {
            serde_json::to_value(geocoder.lookup(ctx, osm_type, osm_id, opts).await?)?
        }
    };

    Ok(value)
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let locale = Text::new("Default locale (Accept-Language):")
        .with_default(config.locale.as_deref().unwrap_or(DEFAULT_LOCALE))
        .prompt()?;

    let user_agent = Text::new("User-Agent:")
        .with_default(config.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT))
        .with_help_message("Nominatim asks clients to identify themselves")
        .prompt()?;

    let base_url = Text::new("Nominatim base URL (empty for the public instance):")
        .with_default(config.base_url.as_deref().unwrap_or(""))
        .prompt()?;

    let timeout_secs = CustomType::<u64>::new("Timeout in seconds (0 for none):")
        .with_default(config.timeout_secs.unwrap_or(0))
        .prompt()?;

    if !base_url.trim().is_empty() {
        Nominatim::with_base_url(base_url.trim())
            .with_context(|| format!("Invalid Nominatim base URL '{base_url}'"))?;
    }

    config.locale = non_empty(locale);
    config.user_agent = non_empty(user_agent);
    config.base_url = non_empty(base_url);
    config.timeout_secs = Some(timeout_secs).filter(|secs| *secs > 0);

    let path = config.save()?;
    println!("Saved configuration to {}", path.display());

    Ok(())
}

fn non_empty(value: String) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
