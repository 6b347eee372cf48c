use crate::errors::LookupError;
use crate::services::consul::ConsulClient;
use crate::services::context::{LookupContext, LookupValue};
use crate::services::logger::Logger;
use crate::services::options::{FailureMode, LookupOptions};
use crate::services::validation::Validation;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

pub const NODE_SENTINEL_PREFIX: &str = "::consul_node::";

static SUPPORTED_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/v\d/(catalog|kv)/").expect("supported path pattern"));
static KV_PATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^/v\d/kv/").expect("kv path pattern"));

#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    Found(LookupValue),
    NotFound,
}

impl LookupOutcome {
    pub fn found(&self) -> Option<&LookupValue> {
        match self {
            LookupOutcome::Found(value) => Some(value),
            LookupOutcome::NotFound => None,
        }
    }
}

pub struct ConsulLookup {
    logger: Logger,
    validation: Validation,
}

impl ConsulLookup {
    pub fn new(logger: Logger) -> Self {
        Self {
            logger: logger.child("consul"),
            validation: Validation::new(),
        }
    }

    pub async fn lookup(
        &self,
        key: &str,
        options: &Value,
        context: &dyn LookupContext,
    ) -> Result<LookupOutcome, LookupError> {
        // Cache presence is checked before option validation.
        if let Some(cached) = self.cached(key, context) {
            return Ok(LookupOutcome::Found(cached));
        }
        let options = LookupOptions::from_value(options, &self.validation)?;
        self.lookup_with(key, &options, context).await
    }

    pub async fn lookup_with(
        &self,
        key: &str,
        options: &LookupOptions,
        context: &dyn LookupContext,
    ) -> Result<LookupOutcome, LookupError> {
        if let Some(cached) = self.cached(key, context) {
            return Ok(LookupOutcome::Found(cached));
        }

        if options.uri.starts_with(NODE_SENTINEL_PREFIX) {
            return Ok(LookupOutcome::Found(LookupValue::Text(options.uri.clone())));
        }

        let path = format!("{}/{}", options.uri, key);
        self.logger.debug(
            "Looking up path",
            Some(&serde_json::json!({
                "path": path,
                "host": options.host,
                "port": options.port,
            })),
        );

        // A doubled separator would poison subsequent lookups on the
        // resolver side, so it never reaches the wire.
        if path.contains("//") {
            self.logger.debug(
                "Skipping malformed path",
                Some(&serde_json::json!({"path": path})),
            );
            return Ok(LookupOutcome::NotFound);
        }
        if !SUPPORTED_PATH.is_match(&path) {
            self.logger.debug(
                "Skipping unsupported path; only catalog and kv queries are supported",
                Some(&serde_json::json!({"path": path})),
            );
            return Ok(LookupOutcome::NotFound);
        }

        let client = ConsulClient::from_options(&self.logger, options)?;
        // The token is passed only when querying the kv store.
        let token = if KV_PATH.is_match(&path) {
            options.token.as_deref()
        } else {
            None
        };

        let answer = match client.fetch(&path, token).await {
            Ok(answer) => answer,
            Err(err) if err.is_transport() => {
                self.logger.warn(
                    "Could not connect to Consul",
                    Some(&serde_json::json!({"error": err.to_string()})),
                );
                if options.failure == FailureMode::Graceful {
                    return Ok(LookupOutcome::NotFound);
                }
                return Err(err);
            }
            Err(err) => return Err(err),
        };

        match answer {
            Some(value) => Ok(LookupOutcome::Found(context.cache(key, value))),
            None => Ok(LookupOutcome::NotFound),
        }
    }

    fn cached(&self, key: &str, context: &dyn LookupContext) -> Option<LookupValue> {
        if !context.has_cached(key) {
            return None;
        }
        let value = context.cached_value(key)?;
        self.logger.debug(
            "Returning cached value",
            Some(&serde_json::json!({"key": key})),
        );
        Some(value)
    }
}
