use crate::constants::network::{
    DEFAULT_HTTP_CONNECT_TIMEOUT_SECS, DEFAULT_HTTP_READ_TIMEOUT_SECS,
};
use crate::errors::LookupError;
use crate::services::validation::Validation;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailureMode {
    #[default]
    Fatal,
    Graceful,
}

impl FailureMode {
    fn from_option(value: Option<&str>) -> Self {
        match value {
            Some("graceful") => FailureMode::Graceful,
            _ => FailureMode::Fatal,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LookupOptions {
    pub host: String,
    pub port: u16,
    pub uri: String,
    pub use_ssl: bool,
    pub ssl_verify: bool,
    pub ssl_cert: Option<PathBuf>,
    pub ssl_ca_cert: Option<PathBuf>,
    pub http_read_timeout: Duration,
    pub http_connect_timeout: Duration,
    pub token: Option<String>,
    pub failure: FailureMode,
}

impl LookupOptions {
    pub fn new(host: impl Into<String>, port: u16, uri: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            uri: uri.into(),
            use_ssl: false,
            ssl_verify: true,
            ssl_cert: None,
            ssl_ca_cert: None,
            http_read_timeout: Duration::from_secs(DEFAULT_HTTP_READ_TIMEOUT_SECS),
            http_connect_timeout: Duration::from_secs(DEFAULT_HTTP_CONNECT_TIMEOUT_SECS),
            token: None,
            failure: FailureMode::Fatal,
        }
    }

    pub fn from_value(options: &Value, validation: &Validation) -> Result<Self, LookupError> {
        let map = options
            .as_object()
            .ok_or_else(|| LookupError::configuration("Lookup options must be an object"))?;

        let host = validation.ensure_host(map.get("host"))?;
        let port = validation.ensure_port(map.get("port"))?;
        let uri = validation.ensure_uri(map.get("uri"))?;
        let use_ssl = validation.ensure_bool(map.get("use_ssl"), "'use_ssl'", false)?;
        let ssl_verify = validation.ensure_bool(map.get("ssl_verify"), "'ssl_verify'", true)?;
        let ssl_cert = validation
            .ensure_optional_string(map.get("ssl_cert"), "'ssl_cert'")?
            .map(PathBuf::from);
        let ssl_ca_cert = validation
            .ensure_optional_string(map.get("ssl_ca_cert"), "'ssl_ca_cert'")?
            .map(PathBuf::from);
        let http_read_timeout = validation.ensure_timeout_secs(
            map.get("http_read_timeout"),
            "'http_read_timeout'",
            DEFAULT_HTTP_READ_TIMEOUT_SECS,
        )?;
        let http_connect_timeout = validation.ensure_timeout_secs(
            map.get("http_connect_timeout"),
            "'http_connect_timeout'",
            DEFAULT_HTTP_CONNECT_TIMEOUT_SECS,
        )?;
        let token = validation.ensure_optional_string(map.get("token"), "'token'")?;
        let failure = FailureMode::from_option(
            validation
                .ensure_optional_string(map.get("failure"), "'failure'")?
                .as_deref(),
        );

        Ok(Self {
            host,
            port,
            uri,
            use_ssl,
            ssl_verify,
            ssl_cert,
            ssl_ca_cert,
            http_read_timeout: Duration::from_secs(http_read_timeout),
            http_connect_timeout: Duration::from_secs(http_connect_timeout),
            token,
            failure,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{FailureMode, LookupOptions};
    use crate::errors::LookupErrorKind;
    use crate::services::validation::Validation;
    use serde_json::json;
    use std::time::Duration;

    #[test]
    fn from_value_applies_defaults() {
        let options = LookupOptions::from_value(
            &json!({"host": "consul.local", "port": 8500, "uri": "/v1/kv/configuration"}),
            &Validation::new(),
        )
        .unwrap();
        assert_eq!(options.host, "consul.local");
        assert_eq!(options.port, 8500);
        assert!(!options.use_ssl);
        assert!(options.ssl_verify);
        assert_eq!(options.http_read_timeout, Duration::from_secs(10));
        assert_eq!(options.http_connect_timeout, Duration::from_secs(10));
        assert_eq!(options.failure, FailureMode::Fatal);
        assert!(options.token.is_none());
    }

    #[test]
    fn from_value_requires_host_and_port() {
        let validation = Validation::new();
        let missing_host =
            LookupOptions::from_value(&json!({"port": 8500, "uri": "/v1/kv/a"}), &validation)
                .unwrap_err();
        assert_eq!(missing_host.kind, LookupErrorKind::Configuration);

        let missing_port =
            LookupOptions::from_value(&json!({"host": "consul", "uri": "/v1/kv/a"}), &validation)
                .unwrap_err();
        assert_eq!(missing_port.kind, LookupErrorKind::Configuration);
    }

    #[test]
    fn from_value_reads_failure_mode() {
        let validation = Validation::new();
        let graceful = LookupOptions::from_value(
            &json!({"host": "consul", "port": 8500, "uri": "/v1/kv/a", "failure": "graceful"}),
            &validation,
        )
        .unwrap();
        assert_eq!(graceful.failure, FailureMode::Graceful);

        let unknown = LookupOptions::from_value(
            &json!({"host": "consul", "port": 8500, "uri": "/v1/kv/a", "failure": "retry"}),
            &validation,
        )
        .unwrap();
        assert_eq!(unknown.failure, FailureMode::Fatal);
    }

    #[test]
    fn from_value_reads_tls_and_token_fields() {
        let options = LookupOptions::from_value(
            &json!({
                "host": "consul",
                "port": "8501",
                "uri": "/v1/kv/secure",
                "use_ssl": true,
                "ssl_verify": false,
                "ssl_cert": "/etc/consul/client.pem",
                "ssl_ca_cert": "/etc/consul/ca.pem",
                "http_read_timeout": 3,
                "token": "sekrit",
            }),
            &Validation::new(),
        )
        .unwrap();
        assert!(options.use_ssl);
        assert!(!options.ssl_verify);
        assert_eq!(
            options.ssl_cert.as_deref(),
            Some(std::path::Path::new("/etc/consul/client.pem"))
        );
        assert_eq!(options.http_read_timeout, Duration::from_secs(3));
        assert_eq!(options.token.as_deref(), Some("sekrit"));
    }
}
