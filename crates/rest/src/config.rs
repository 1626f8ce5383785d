//! Server configuration.
//!
//! Configuration can come from command line arguments, environment
//! variables, or be built programmatically.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `GELATO_SERVER_PORT` | 8080 | Server port |
//! | `GELATO_SERVER_HOST` | 127.0.0.1 | Host to bind |
//! | `GELATO_LOG_LEVEL` | info | Log level |
//! | `GELATO_REQUEST_TIMEOUT` | 30 | Request timeout (seconds) |
//! | `GELATO_ENABLE_CORS` | true | Enable CORS |
//! | `GELATO_CORS_ORIGINS` | * | Allowed origins |
//! | `GELATO_EXPAND_PARAM` | expand | Expansion query parameter name |

use clap::Parser;

/// Server configuration for the gelato REST API.
///
/// Construct from the command line / environment with [`ServerConfig::parse`]
/// or programmatically with struct update syntax over
/// [`ServerConfig::default`].
#[derive(Debug, Clone, Parser)]
#[command(name = "gelato-server")]
#[command(about = "JSON REST API server with expandable fields")]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(short, long, env = "GELATO_SERVER_PORT", default_value = "8080")]
    pub port: u16,

    /// Host address to bind to.
    #[arg(long, env = "GELATO_SERVER_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "GELATO_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Request timeout in seconds.
    #[arg(long, env = "GELATO_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// Enable CORS.
    #[arg(long, env = "GELATO_ENABLE_CORS", default_value = "true")]
    pub enable_cors: bool,

    /// Allowed CORS origins (comma-separated, or * for all).
    #[arg(long, env = "GELATO_CORS_ORIGINS", default_value = "*")]
    pub cors_origins: String,

    /// Name of the query parameter selecting field expansions.
    #[arg(long, env = "GELATO_EXPAND_PARAM", default_value = "expand")]
    pub expand_param: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            log_level: "info".to_string(),
            request_timeout: 30,
            enable_cors: true,
            cors_origins: "*".to_string(),
            expand_param: "expand".to_string(),
        }
    }
}

impl ServerConfig {
    /// Configuration suitable for tests: no CORS, short timeout.
    pub fn for_testing() -> Self {
        Self {
            enable_cors: false,
            request_timeout: 5,
            ..Self::default()
        }
    }

    /// The socket address string to bind to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
