use crate::cli::{
    actions::{server::Args, Action},
    commands::{auth, ARG_DSN, ARG_PORT},
};
use anyhow::{Context, Result};

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or the DSN is not a URL.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080);

    let dsn = matches
        .get_one::<String>(ARG_DSN)
        .cloned()
        .context("missing required argument: --dsn")?;

    url::Url::parse(&dsn).context("invalid database connection string")?;

    let auth = auth::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        dsn,
        jwt_secret: auth.jwt_secret,
        token_ttl: auth.token_ttl,
        bcrypt_cost: auth.bcrypt_cost,
    }))
}
