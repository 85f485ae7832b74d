/// Configuration management for the RTE core.
///
/// This module loads configuration from environment variables and provides
/// type-safe configuration structs for each component.
///
/// # Environment Variables
///
/// - `RTE_TASK_TIMEOUT_SECS`: heartbeat threshold for in-flight tasks, in
///   seconds (default: 30).
/// - `RTE_PORT`: port a transport layer would bind to; documented only,
///   not used by anything in this workspace (default: 7878).
/// - `RTE_REFRESH_TIME_SECS`: worker/client poll period, in seconds
///   (default: 1).
///
/// # Example
///
/// ```no_run
/// use rte_shared::config::ServerConfig;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = ServerConfig::from_env()?;
/// println!("task_timeout = {:?}", config.task_timeout);
/// # Ok(())
/// # }
/// ```
use std::env;
use std::time::Duration;

/// Server-side configuration: the heartbeat threshold for in-flight tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    pub task_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            task_timeout: Duration::from_secs(30),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from environment variables, falling back to
    /// defaults for anything unset.
    ///
    /// # Errors
    ///
    /// Returns an error if `RTE_TASK_TIMEOUT_SECS` is set but not a valid
    /// positive integer.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let task_timeout_secs = match env::var("RTE_TASK_TIMEOUT_SECS") {
            Ok(v) => v.parse::<u64>()?,
            Err(_) => 30,
        };

        if task_timeout_secs == 0 {
            anyhow::bail!("RTE_TASK_TIMEOUT_SECS must be greater than zero");
        }

        Ok(ServerConfig {
            task_timeout: Duration::from_secs(task_timeout_secs),
        })
    }
}

/// Transport-side configuration. Documented for a future wire-protocol
/// crate; nothing in this workspace binds a listener to `port`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportConfig {
    pub port: u16,
}

impl Default for TransportConfig {
    fn default() -> Self {
        TransportConfig { port: 7878 }
    }
}

impl TransportConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let port = match env::var("RTE_PORT") {
            Ok(v) => v.parse::<u16>()?,
            Err(_) => 7878,
        };

        Ok(TransportConfig { port })
    }
}

/// Shared client/worker driver configuration: how often to poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverConfig {
    pub refresh_time: Duration,
}

impl Default for DriverConfig {
    fn default() -> Self {
        DriverConfig {
            refresh_time: Duration::from_secs(1),
        }
    }
}

impl DriverConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `RTE_REFRESH_TIME_SECS` is set but not a valid
    /// positive integer.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let refresh_time_secs = match env::var("RTE_REFRESH_TIME_SECS") {
            Ok(v) => v.parse::<u64>()?,
            Err(_) => 1,
        };

        if refresh_time_secs == 0 {
            anyhow::bail!("RTE_REFRESH_TIME_SECS must be greater than zero");
        }

        Ok(DriverConfig {
            refresh_time: Duration::from_secs(refresh_time_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_config_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.task_timeout, Duration::from_secs(30));
    }

    #[test]
    fn driver_config_defaults() {
        let config = DriverConfig::default();
        assert_eq!(config.refresh_time, Duration::from_secs(1));
    }

    #[test]
    fn transport_config_defaults() {
        let config = TransportConfig::default();
        assert_eq!(config.port, 7878);
    }
}
