use std::sync::LazyLock;

use reqwest::{
    Client, StatusCode, Url,
    header::{ACCEPT_LANGUAGE, USER_AGENT},
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{Context, Error, Opts, Result, error::ErrorResult};

/// Process-wide transport. `Client` is reference counted, so clones share
/// one connection pool.
static HTTP: LazyLock<Client> = LazyLock::new(Client::new);

pub(crate) fn shared_http() -> Client {
    HTTP.clone()
}

/// Perform one GET against `url` and decode the body as `T`.
///
/// The round trip races `ctx`: if the context finishes first, the in-flight
/// request is dropped and the context error is returned.
pub(crate) async fn run_request<T: DeserializeOwned>(
    http: &Client,
    ctx: &Context,
    url: Url,
    opts: &Opts,
) -> Result<T> {
    if let Some(err) = ctx.err() {
        return Err(err);
    }

    tokio::select! {
        biased;
        err = ctx.done() => {
            debug!(%err, "request abandoned");
            Err(err)
        }
        res = execute(http, url, opts) => res,
    }
}

async fn execute<T: DeserializeOwned>(http: &Client, url: Url, opts: &Opts) -> Result<T> {
    debug!(%url, locale = %opts.locale, "sending request");

    let res = http
        .get(url)
        .header(ACCEPT_LANGUAGE, opts.locale.as_str())
        .header(USER_AGENT, opts.user_agent.as_str())
        .send()
        .await?;

    let status = res.status();
    if status != StatusCode::OK {
        debug!(%status, "received error response");
        return Err(status_error(status, res.bytes().await));
    }

    let body = res.bytes().await?;
    debug!(%status, len = body.len(), "received response");

    Ok(serde_json::from_slice(&body)?)
}

/// Error for a non-200 response: the structured body when it decodes, the
/// bare status otherwise (including when the body cannot be read).
fn status_error<B: AsRef<[u8]>, E>(status: StatusCode, body: Result<B, E>) -> Error {
    match body.ok().and_then(|b| serde_json::from_slice::<ErrorResult>(b.as_ref()).ok()) {
        Some(handled) => Error::Api(handled.error),
        None => Error::UnexpectedStatus(status),
    }
}
