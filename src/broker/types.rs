//! Value types shared by every brokerage session

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Environment variable holding the brokerage username
pub const USERNAME_ENV: &str = "ROBINHOOD_USERNAME";
/// Environment variable holding the brokerage password
pub const PASSWORD_ENV: &str = "ROBINHOOD_PASSWORD";

/// Login credentials for a brokerage session.
///
/// Fields are private and there are no setters: once built, a value is
/// never mutated. Nothing is validated here, an empty username is handed
/// to the session exactly like any other.
pub struct Credentials {
    username: String,
    password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// Read credentials from `ROBINHOOD_USERNAME` / `ROBINHOOD_PASSWORD`.
    ///
    /// Unset variables become empty strings.
    pub fn from_env() -> Self {
        Self::new(
            env_value(USERNAME_ENV).unwrap_or_default(),
            env_value(PASSWORD_ENV).unwrap_or_default(),
        )
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        self.password.expose_secret()
    }
}

/// Value of an environment variable if it is set.
///
/// Bytes that are not UTF-8 are replaced rather than dropping the value.
pub(crate) fn env_value(name: &str) -> Option<String> {
    let raw = std::env::var_os(name)?;
    Some(raw.into_string().unwrap_or_else(|raw| {
        warn!("{} is not valid UTF-8; invalid bytes replaced", name);
        raw.to_string_lossy().into_owned()
    }))
}

impl Clone for Credentials {
    fn clone(&self) -> Self {
        Self::new(self.username.clone(), self.password().to_string())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// How long an order stays working
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeInForce {
    /// Good for day
    Gfd,
    /// Good till cancelled
    Gtc,
}

impl TimeInForce {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeInForce::Gfd => "gfd",
            TimeInForce::Gtc => "gtc",
        }
    }
}

impl fmt::Display for TimeInForce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeInForce {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gfd" => Ok(TimeInForce::Gfd),
            "gtc" => Ok(TimeInForce::Gtc),
            other => Err(format!("Unknown time in force: {}", other)),
        }
    }
}

/// Option contract side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionType::Call => "call",
            OptionType::Put => "put",
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "call" => Ok(OptionType::Call),
            "put" => Ok(OptionType::Put),
            other => Err(format!("Unknown option type: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ENV_LOCK;

    #[test]
    fn test_credentials_debug_hides_password() {
        let creds = Credentials::new("trader", "hunter2");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("trader"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_credentials_clone_keeps_values() {
        let creds = Credentials::new("trader", "hunter2").clone();
        assert_eq!(creds.username(), "trader");
        assert_eq!(creds.password(), "hunter2");
    }

    #[test]
    fn test_empty_credentials_accepted() {
        let creds = Credentials::new("", "");
        assert_eq!(creds.username(), "");
        assert_eq!(creds.password(), "");
    }

    #[test]
    fn test_time_in_force_parse() {
        assert_eq!("GFD".parse::<TimeInForce>().unwrap(), TimeInForce::Gfd);
        assert_eq!("gtc".parse::<TimeInForce>().unwrap(), TimeInForce::Gtc);
        assert!("ioc".parse::<TimeInForce>().is_err());
    }

    #[test]
    fn test_time_in_force_wire_format() {
        let json = serde_json::to_string(&TimeInForce::Gtc).unwrap();
        assert_eq!(json, "\"gtc\"");
    }

    #[test]
    fn test_option_type_parse() {
        assert_eq!("Put".parse::<OptionType>().unwrap(), OptionType::Put);
        assert_eq!(OptionType::Call.to_string(), "call");
        assert!("straddle".parse::<OptionType>().is_err());
    }

    #[test]
    fn test_from_env_unset_is_empty() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        std::env::remove_var(USERNAME_ENV);
        std::env::remove_var(PASSWORD_ENV);

        let creds = Credentials::from_env();
        assert_eq!(creds.username(), "");
        assert_eq!(creds.password(), "");
    }

    #[cfg(unix)]
    #[test]
    fn test_from_env_keeps_non_utf8_value() {
        use std::ffi::OsString;
        use std::os::unix::ffi::OsStringExt;

        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        std::env::set_var(USERNAME_ENV, OsString::from_vec(vec![b't', 0xff, b'r']));
        std::env::set_var(PASSWORD_ENV, "hunter2");

        let creds = Credentials::from_env();
        std::env::remove_var(USERNAME_ENV);
        std::env::remove_var(PASSWORD_ENV);

        assert_eq!(creds.username(), "t\u{FFFD}r");
        assert_eq!(creds.password(), "hunter2");
    }
}
