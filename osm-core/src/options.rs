/// Default `Accept-Language` value.
pub const DEFAULT_LOCALE: &str = "en";

/// Default `User-Agent` value.
pub const DEFAULT_USER_AGENT: &str = "Chrome";

/// Per-request options, resolved from a list of [`OptFn`] mutations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Opts {
    /// Language preference, sent as the `Accept-Language` header.
    pub locale: String,
    /// Client identifier, sent as the `User-Agent` header.
    pub user_agent: String,
}

/// A single option mutation passed to any operation.
pub type OptFn = Box<dyn FnOnce(&mut Opts) + Send>;

/// Sets the response language, e.g. `"de"` or `"fr,en;q=0.8"`.
pub fn with_locale(locale: impl Into<String>) -> OptFn {
    let locale = locale.into();
    Box::new(move |o: &mut Opts| o.locale = locale)
}

/// Sets the `User-Agent` header.
pub fn with_user_agent(user_agent: impl Into<String>) -> OptFn {
    let user_agent = user_agent.into();
    Box::new(move |o: &mut Opts| o.user_agent = user_agent)
}

/// Apply mutations in order over an empty `Opts`, then fill whatever is still
/// empty with the defaults.
pub fn merge_opts(opts: impl IntoIterator<Item = OptFn>) -> Opts {
    let mut o = Opts::default();
    for opt in opts {
        opt(&mut o);
    }

    if o.locale.is_empty() {
        o.locale = DEFAULT_LOCALE.to_string();
    }
    if o.user_agent.is_empty() {
        o.user_agent = DEFAULT_USER_AGENT.to_string();
    }

    o
}
