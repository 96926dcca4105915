use std::net::SocketAddr;

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;

#[cfg(feature = "logging")]
use tracing_subscriber::filter::LevelFilter;

/// Database configuration.
#[derive(Deserialize)]
pub struct Database {
    /// Database URL string.
    pub url: String,
}

/// HTTP server configuration.
#[derive(Deserialize)]
pub struct Server {
    /// Address, that HTTP server will listen on.
    pub address: SocketAddr,
}

/// Implementation of [`serde`]'s deserializer for [`FromStr`] types.
///
/// [`FromStr`]: std::str::FromStr
#[cfg(feature = "logging")]
fn deserialize_from_str<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: std::str::FromStr,
    T::Err: std::error::Error,
    D: serde::de::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    std::str::FromStr::from_str(&s).map_err(serde::de::Error::custom)
}

/// Logging configuration.
#[cfg(feature = "logging")]
#[derive(Deserialize)]
pub struct Logging {
    /// Log level.
    #[serde(deserialize_with = "deserialize_from_str")]
    pub level: LevelFilter,
}

#[cfg(feature = "logging")]
impl Default for Logging {
    fn default() -> Self {
        Self {
            level: LevelFilter::WARN,
        }
    }
}

/// User authentication configuration.
#[derive(Deserialize)]
pub struct Auth {
    /// Cost factor used when hashing user passwords with bcrypt.
    #[serde(default = "default_password_cost")]
    pub password_cost: u32,
}

impl Default for Auth {
    fn default() -> Self {
        Self {
            password_cost: default_password_cost(),
        }
    }
}

fn default_password_cost() -> u32 {
    10
}

/// Policy applied when a user books a class they have previously cancelled.
///
/// Reservations are never deleted, so a cancelled reservation row remains
/// in place for every `(user, class)` pair that was ever confirmed.
#[derive(Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RebookingPolicy {
    /// Any existing reservation, cancelled or not, rejects a new booking.
    #[default]
    Forbid,

    /// A cancelled reservation is reused for a new booking.
    Reactivate,
}

/// Class booking configuration.
#[derive(Deserialize, Default)]
pub struct Booking {
    /// Rebooking policy for previously cancelled reservations.
    #[serde(default)]
    pub rebooking: RebookingPolicy,
}

/// General configuration.
#[derive(Deserialize)]
pub struct Config {
    /// General database configuration.
    pub database: Database,

    /// HTTP server configuration.
    #[serde(default)]
    pub server: Option<Server>,

    /// Logging configuration.
    #[cfg(feature = "logging")]
    #[serde(default)]
    pub logging: Logging,

    /// Authentication configuration.
    #[serde(default)]
    pub auth: Auth,

    /// Class booking configuration.
    #[serde(default)]
    pub booking: Booking,
}

impl Config {
    /// Create new config using default configuration file or environment variables.
    ///
    /// Nested keys are separated with a double underscore in environment variables,
    /// e.g. `CONFIG_DATABASE__URL` or `CONFIG_AUTH__PASSWORD_COST`.
    ///
    /// See [`Env`] for more details on how to use environment variables configuration.
    ///
    /// [`Env`]: figment::providers::Env
    pub fn new() -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Toml::file("Config.toml"))
            .merge(Env::prefixed("CONFIG_").split("__"))
            .extract()
    }

    /// Create new config suitable for running unit tests.
    #[cfg(feature = "test-utils")]
    pub fn for_tests() -> Self {
        Self {
            database: Database {
                url: String::from("sqlite::memory:"),
            },
            server: Some(Server {
                address: SocketAddr::from(([127, 0, 0, 1], 3000)),
            }),
            #[cfg(feature = "logging")]
            logging: Logging::default(),
            auth: Auth {
                // Lowest cost accepted by bcrypt.
                password_cost: 4,
            },
            booking: Booking::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use figment::Jail;

    use super::{Config, RebookingPolicy};

    #[test]
    fn defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "Config.toml",
                r#"
                [database]
                url = "postgres://localhost/classes"
                "#,
            )?;

            let config = Config::new()?;

            assert_eq!(config.database.url, "postgres://localhost/classes");
            assert!(config.server.is_none());
            assert_eq!(config.auth.password_cost, 10);
            assert_eq!(config.booking.rebooking, RebookingPolicy::Forbid);

            Ok(())
        });
    }

    #[test]
    fn environment_overrides() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "Config.toml",
                r#"
                [database]
                url = "postgres://localhost/classes"

                [server]
                address = "0.0.0.0:3000"
                "#,
            )?;

            jail.set_env("CONFIG_BOOKING__REBOOKING", "reactivate");
            jail.set_env("CONFIG_AUTH__PASSWORD_COST", "12");

            let config = Config::new()?;

            assert_eq!(config.booking.rebooking, RebookingPolicy::Reactivate);
            assert_eq!(config.auth.password_cost, 12);
            assert_eq!(
                config.server.map(|server| server.address.port()),
                Some(3000)
            );

            Ok(())
        });
    }
}
