use anyhow::Result;
use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;
use std::time::Duration;

pub const ARG_JWT_SECRET: &str = "jwt-secret";
pub const ARG_TOKEN_TTL_MINUTES: &str = "token-ttl-minutes";
pub const ARG_BCRYPT_COST: &str = "bcrypt-cost";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_JWT_SECRET)
                .long(ARG_JWT_SECRET)
                .help("Secret used to sign bearer tokens")
                .long_help(
                    "Secret used to sign bearer tokens. When unset a random secret is generated at startup and tokens are invalidated on every restart.",
                )
                .env("LGD_JWT_SECRET")
                .hide_env_values(true),
        )
        .arg(
            Arg::new(ARG_TOKEN_TTL_MINUTES)
                .long(ARG_TOKEN_TTL_MINUTES)
                .help("Bearer token TTL in minutes")
                .env("LGD_TOKEN_TTL_MINUTES")
                .default_value("60")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new(ARG_BCRYPT_COST)
                .long(ARG_BCRYPT_COST)
                .help("bcrypt work factor used when hashing passwords")
                .env("LGD_BCRYPT_COST")
                .default_value("12")
                .value_parser(clap::value_parser!(u32).range(4..=31)),
        )
}

pub struct Options {
    pub jwt_secret: Option<SecretString>,
    pub token_ttl: Duration,
    pub bcrypt_cost: u32,
}

impl Options {
    /// Collect the auth arguments.
    ///
    /// # Errors
    /// Returns an error if a defaulted argument is unexpectedly missing.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        let jwt_secret = matches
            .get_one::<String>(ARG_JWT_SECRET)
            .map(|secret| SecretString::from(secret.clone()));

        let ttl_minutes = matches
            .get_one::<u64>(ARG_TOKEN_TTL_MINUTES)
            .copied()
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --{ARG_TOKEN_TTL_MINUTES}"))?;

        let bcrypt_cost = matches
            .get_one::<u32>(ARG_BCRYPT_COST)
            .copied()
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --{ARG_BCRYPT_COST}"))?;

        Ok(Self {
            jwt_secret,
            token_ttl: Duration::from_secs(ttl_minutes.saturating_mul(60)),
            bcrypt_cost,
        })
    }
}

impl std::fmt::Debug for Options {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Options")
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "***"))
            .field("token_ttl", &self.token_ttl)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}
