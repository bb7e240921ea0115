use std::{fmt, sync::LazyLock};

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::{
    Context, DetailsResult, Error, LookupResult, OptFn, Result, ReverseResult, SearchResult,
    options::merge_opts, request,
};

/// Public Nominatim instance.
pub const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org/";

/// Kind of an OpenStreetMap entity, sent as its one-letter code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OsmType {
    Node,
    Way,
    Relation,
}

impl OsmType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OsmType::Node => "N",
            OsmType::Way => "W",
            OsmType::Relation => "R",
        }
    }

    pub const fn all() -> &'static [OsmType] {
        &[OsmType::Node, OsmType::Way, OsmType::Relation]
    }
}

impl fmt::Display for OsmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for OsmType {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "n" | "node" => Ok(OsmType::Node),
            "w" | "way" => Ok(OsmType::Way),
            "r" | "relation" => Ok(OsmType::Relation),
            _ => Err(Error::InvalidOsmType(value.to_string())),
        }
    }
}

impl std::str::FromStr for OsmType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        OsmType::try_from(s)
    }
}

/// The geocoding operations, one HTTP round trip each.
#[async_trait]
pub trait Geocoder: Send + Sync + fmt::Debug {
    /// Address closest to a coordinate pair.
    async fn reverse(
        &self,
        ctx: &Context,
        lat: f64,
        lon: f64,
        opts: Vec<OptFn>,
    ) -> Result<ReverseResult>;

    /// Details of an object identified by its OSM type and id.
    async fn details(
        &self,
        ctx: &Context,
        osm_type: OsmType,
        osm_id: i64,
        opts: Vec<OptFn>,
    ) -> Result<DetailsResult>;

    /// Details of an object identified by its Nominatim place id.
    async fn details_with_place_id(
        &self,
        ctx: &Context,
        place_id: i64,
        opts: Vec<OptFn>,
    ) -> Result<DetailsResult>;

    /// Free-text search. No match is an empty list.
    async fn search(
        &self,
        ctx: &Context,
        query: &str,
        opts: Vec<OptFn>,
    ) -> Result<Vec<SearchResult>>;

    /// Objects for an OSM type and id. No match is an empty list.
    async fn lookup(
        &self,
        ctx: &Context,
        osm_type: OsmType,
        osm_id: i64,
        opts: Vec<OptFn>,
    ) -> Result<Vec<LookupResult>>;
}

/// Handle on a Nominatim deployment.
///
/// Every handle shares the process-wide HTTP transport; creating one is cheap.
#[derive(Debug, Clone)]
pub struct Nominatim {
    http: Client,
    base_url: String,
}

static SHARED: LazyLock<Nominatim> = LazyLock::new(Nominatim::new);

impl Nominatim {
    pub fn new() -> Self {
        Self {
            http: request::shared_http(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Target another deployment, e.g. a self-hosted instance.
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let mut base_url = Url::parse(base_url)?.to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Ok(Self {
            http: request::shared_http(),
            base_url,
        })
    }

    /// Handle on the public instance, used by the crate-level functions.
    pub fn shared() -> &'static Nominatim {
        &SHARED
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for `path` with `params` percent-encoded, then `format=json`.
    pub(crate) fn endpoint(&self, path: &str, params: &[(&str, String)]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)?.join(path)?;
        url.query_pairs_mut()
            .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())))
            .append_pair("format", "json");
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        ctx: &Context,
        path: &str,
        params: &[(&str, String)],
        opts: Vec<OptFn>,
    ) -> Result<T> {
        let opts = merge_opts(opts);
        let url = self.endpoint(path, params)?;
        request::run_request(&self.http, ctx, url, &opts).await
    }
}

impl Default for Nominatim {
    fn default() -> Self {
        Self::new()
    }
}

/// Coordinates with six decimals, as `%f` would print them.
fn reverse_params(lat: f64, lon: f64) -> [(&'static str, String); 2] {
    [("lat", format!("{lat:.6}")), ("lon", format!("{lon:.6}"))]
}

fn details_params(osm_type: OsmType, osm_id: i64) -> [(&'static str, String); 2] {
    [("osmtype", osm_type.as_str().to_string()), ("osmid", osm_id.to_string())]
}

#[async_trait]
impl Geocoder for Nominatim {
    #[instrument(skip(self, ctx, opts))]
    async fn reverse(
        &self,
        ctx: &Context,
        lat: f64,
        lon: f64,
        opts: Vec<OptFn>,
    ) -> Result<ReverseResult> {
        self.get(ctx, "reverse", &reverse_params(lat, lon), opts).await
    }

    #[instrument(skip(self, ctx, opts))]
    async fn details(
        &self,
        ctx: &Context,
        osm_type: OsmType,
        osm_id: i64,
        opts: Vec<OptFn>,
    ) -> Result<DetailsResult> {
        self.get(ctx, "details", &details_params(osm_type, osm_id), opts).await
    }

    #[instrument(skip(self, ctx, opts))]
    async fn details_with_place_id(
        &self,
        ctx: &Context,
        place_id: i64,
        opts: Vec<OptFn>,
    ) -> Result<DetailsResult> {
        let params = [("place_id", place_id.to_string())];
        self.get(ctx, "details", &params, opts).await
    }

    #[instrument(skip(self, ctx, opts))]
    async fn search(
        &self,
        ctx: &Context,
        query: &str,
        opts: Vec<OptFn>,
    ) -> Result<Vec<SearchResult>> {
        let params = [("q", query.to_string())];
        let res: Option<Vec<SearchResult>> = self.get(ctx, "search", &params, opts).await?;
        Ok(res.unwrap_or_default())
    }

    #[instrument(skip(self, ctx, opts))]
    async fn lookup(
        &self,
        ctx: &Context,
        osm_type: OsmType,
        osm_id: i64,
        opts: Vec<OptFn>,
    ) -> Result<Vec<LookupResult>> {
        let params = [
            ("osm_type", osm_type.as_str().to_string()),
            ("osm_id", osm_id.to_string()),
        ];
        let res: Option<Vec<LookupResult>> = self.get(ctx, "lookup", &params, opts).await?;
        Ok(res.unwrap_or_default())
    }
}
