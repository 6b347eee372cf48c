use crate::errors::LookupError;
use crate::services::context::LookupValue;
use crate::services::logger::Logger;
use crate::services::options::LookupOptions;
use base64::Engine;
use reqwest::{Certificate, Client, Identity};
use serde_json::Value;
use url::Url;

pub struct ConsulClient {
    logger: Logger,
    client: Client,
    base_url: String,
}

impl ConsulClient {
    pub fn from_options(logger: &Logger, options: &LookupOptions) -> Result<Self, LookupError> {
        let mut builder = Client::builder()
            .timeout(options.http_read_timeout)
            .connect_timeout(options.http_connect_timeout);

        if options.use_ssl {
            if !options.ssl_verify {
                builder = builder.danger_accept_invalid_certs(true);
            }
            if let Some(cert_path) = &options.ssl_cert {
                let ca_path = options.ssl_ca_cert.as_ref().ok_or_else(|| {
                    LookupError::configuration(
                        "'ssl_ca_cert' must be declared when 'ssl_cert' is used",
                    )
                })?;
                let ca_pem = std::fs::read(ca_path).map_err(|err| {
                    LookupError::configuration(format!(
                        "Failed to read CA certificate {}: {}",
                        ca_path.display(),
                        err
                    ))
                })?;
                let ca = Certificate::from_pem(&ca_pem).map_err(|err| {
                    LookupError::configuration(format!(
                        "Failed to parse CA certificate {}: {}",
                        ca_path.display(),
                        err
                    ))
                })?;
                let identity_pem = std::fs::read(cert_path).map_err(|err| {
                    LookupError::configuration(format!(
                        "Failed to read client certificate {}: {}",
                        cert_path.display(),
                        err
                    ))
                })?;
                let identity = Identity::from_pem(&identity_pem).map_err(|err| {
                    LookupError::configuration(format!(
                        "Failed to parse client certificate {}: {}",
                        cert_path.display(),
                        err
                    ))
                })?;
                builder = builder
                    .tls_built_in_root_certs(false)
                    .add_root_certificate(ca)
                    .identity(identity);
            }
        }

        let client = builder
            .build()
            .map_err(|err| LookupError::internal(format!("Failed to build HTTP client: {}", err)))?;

        let scheme = if options.use_ssl { "https" } else { "http" };
        let base_url = normalize_base_url(scheme, &options.host, options.port)?;

        Ok(Self {
            logger: logger.child("http"),
            client,
            base_url,
        })
    }

    pub async fn fetch(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> Result<Option<LookupValue>, LookupError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.get(&url);
        if let Some(token) = token {
            request = request.query(&[("token", token)]);
        }

        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        if !status.is_success() {
            self.logger.debug(
                "Consul answered with a non-success status",
                Some(&serde_json::json!({"status": status.as_u16(), "path": path})),
            );
            return Ok(None);
        }

        let body = response.text().await.map_err(map_transport_error)?;
        self.logger.debug(
            "Consul answered",
            Some(&serde_json::json!({"path": path, "bytes": body.len()})),
        );
        self.parse_body(&body)
    }

    fn parse_body(&self, body: &str) -> Result<Option<LookupValue>, LookupError> {
        // Consul renders an absent key as the literal text "null" in some
        // code paths; it is not valid lookup data.
        if body == "null" {
            self.logger.debug("Skipping literal null answer", None);
            return Ok(None);
        }

        let parsed: Value = serde_json::from_str(body).map_err(|err| {
            LookupError::protocol(format!("Failed to parse Consul answer: {}", err))
        })?;
        // Consul always returns an array, for both catalog and kv queries.
        let records = match parsed {
            Value::Array(records) => records,
            other => {
                return Err(LookupError::protocol("Consul answer was not an array")
                    .with_details(serde_json::json!({"answer": other})));
            }
        };
        if records.is_empty() {
            self.logger.debug("Skipping empty answer array", None);
            return Ok(None);
        }

        match records[0].get("Value") {
            // An explicit null Value is "no value"; it must not reach the decoder.
            Some(Value::Null) => Ok(None),
            Some(encoded) => {
                let encoded = encoded.as_str().ok_or_else(|| {
                    LookupError::protocol("Consul 'Value' field was not a string")
                })?;
                let decoded = base64::engine::general_purpose::STANDARD
                    .decode(encoded)
                    .map_err(|err| {
                        LookupError::protocol(format!("Failed to decode Consul value: {}", err))
                    })?;
                Ok(Some(match String::from_utf8(decoded) {
                    Ok(text) => LookupValue::Text(text),
                    Err(err) => LookupValue::Bytes(err.into_bytes()),
                }))
            }
            None => Ok(Some(LookupValue::Records(records))),
        }
    }
}

fn normalize_base_url(scheme: &str, host: &str, port: u16) -> Result<String, LookupError> {
    let raw = format!("{}://{}:{}", scheme, host, port);
    let url = Url::parse(&raw).map_err(|_| {
        LookupError::configuration("Invalid Consul address")
            .with_details(serde_json::json!({"address": raw}))
    })?;
    Ok(url
        .origin()
        .ascii_serialization()
        .trim_end_matches('/')
        .to_string())
}

pub(crate) fn map_transport_error(err: reqwest::Error) -> LookupError {
    if err.is_timeout() {
        return LookupError::timeout("Consul request timed out");
    }
    LookupError::transport(format!("Could not connect to Consul: {}", err))
}
