//! Client library for the Nominatim geocoding API.
//!
//! This crate provides:
//! - The five operations: reverse, details (by OSM reference or place id), search, lookup
//! - Per-call options (`Accept-Language`, `User-Agent`) with documented defaults
//! - A cancellable [`Context`] bounding each call
//! - Typed result payloads and a structured error for service-side failures
//!
//! The crate-level functions talk to the public instance through one shared
//! HTTP transport. Use [`Nominatim::with_base_url`] for another deployment.
//!
//! ```no_run
//! # async fn demo() -> osm_core::Result<()> {
//! use osm_core::{Context, with_locale};
//!
//! let ctx = Context::background().with_timeout(std::time::Duration::from_secs(10));
//! let place = osm_core::reverse(&ctx, 40.748817, -73.985428, [with_locale("de")]).await?;
//! println!("{}", place.display_name);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod context;
pub mod error;
pub mod model;
pub mod options;
mod request;

pub use client::{DEFAULT_BASE_URL, Geocoder, Nominatim, OsmType};
pub use context::{CancelHandle, Context};
pub use error::{ApiError, Error, Result};
pub use model::{
    DetailsResult, Geometry, LookupAddress, LookupResult, ReverseAddress, ReverseResult,
    SearchAddress, SearchResult,
};
pub use options::{
    DEFAULT_LOCALE, DEFAULT_USER_AGENT, OptFn, Opts, merge_opts, with_locale, with_user_agent,
};

/// Reverse geocode a coordinate pair on the public instance.
pub async fn reverse(
    ctx: &Context,
    lat: f64,
    lon: f64,
    opts: impl IntoIterator<Item = OptFn>,
) -> Result<ReverseResult> {
    let opts = opts.into_iter().collect();
    Nominatim::shared().reverse(ctx, lat, lon, opts).await
}

/// Details of an OSM object on the public instance.
pub async fn details(
    ctx: &Context,
    osm_type: OsmType,
    osm_id: i64,
    opts: impl IntoIterator<Item = OptFn>,
) -> Result<DetailsResult> {
    let opts = opts.into_iter().collect();
    Nominatim::shared().details(ctx, osm_type, osm_id, opts).await
}

/// Details of a place by its Nominatim place id on the public instance.
pub async fn details_with_place_id(
    ctx: &Context,
    place_id: i64,
    opts: impl IntoIterator<Item = OptFn>,
) -> Result<DetailsResult> {
    let opts = opts.into_iter().collect();
    Nominatim::shared().details_with_place_id(ctx, place_id, opts).await
}

/// Free-text search on the public instance.
pub async fn search(
    ctx: &Context,
    query: &str,
    opts: impl IntoIterator<Item = OptFn>,
) -> Result<Vec<SearchResult>> {
    let opts = opts.into_iter().collect();
    Nominatim::shared().search(ctx, query, opts).await
}

/// Lookup of an OSM object on the public instance.
pub async fn lookup(
    ctx: &Context,
    osm_type: OsmType,
    osm_id: i64,
    opts: impl IntoIterator<Item = OptFn>,
) -> Result<Vec<LookupResult>> {
    let opts = opts.into_iter().collect();
    Nominatim::shared().lookup(ctx, osm_type, osm_id, opts).await
}
