use crate::constants::limits::{MAX_PORT, MIN_PORT};
use crate::errors::LookupError;
use serde_json::Value;

#[derive(Clone)]
pub struct Validation;

impl Validation {
    pub fn new() -> Self {
        Self
    }

    pub fn ensure_host(&self, value: Option<&Value>) -> Result<String, LookupError> {
        let Some(value) = value else {
            return Err(LookupError::configuration(
                "'host' must be declared in the lookup options",
            ));
        };
        self.ensure_string(value, "'host'", true)
    }

    pub fn ensure_port(&self, value: Option<&Value>) -> Result<u16, LookupError> {
        let Some(value) = value else {
            return Err(LookupError::configuration(
                "'port' must be declared in the lookup options",
            ));
        };
        let numeric = value
            .as_i64()
            .or_else(|| value.as_str().and_then(|s| s.trim().parse::<i64>().ok()))
            .ok_or_else(|| {
                LookupError::configuration(format!(
                    "'port' must be an integer between {} and {}",
                    MIN_PORT, MAX_PORT
                ))
            })?;
        if numeric < MIN_PORT as i64 || numeric > MAX_PORT as i64 {
            return Err(LookupError::configuration(format!(
                "'port' must be an integer between {} and {}",
                MIN_PORT, MAX_PORT
            )));
        }
        Ok(numeric as u16)
    }

    pub fn ensure_uri(&self, value: Option<&Value>) -> Result<String, LookupError> {
        let Some(value) = value else {
            return Err(LookupError::configuration(
                "'uri' must be declared in the lookup options",
            ));
        };
        value
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| LookupError::configuration("'uri' must be a string"))
    }

    pub fn ensure_string(
        &self,
        value: &Value,
        label: &str,
        trim: bool,
    ) -> Result<String, LookupError> {
        let text = value.as_str().ok_or_else(|| {
            LookupError::configuration(format!("{} must be a non-empty string", label))
        })?;
        let normalized = text.trim();
        if normalized.is_empty() {
            return Err(LookupError::configuration(format!(
                "{} must be a non-empty string",
                label
            )));
        }
        Ok(if trim {
            normalized.to_string()
        } else {
            text.to_string()
        })
    }

    pub fn ensure_optional_string(
        &self,
        value: Option<&Value>,
        label: &str,
    ) -> Result<Option<String>, LookupError> {
        match value {
            None => Ok(None),
            Some(val) if val.is_null() => Ok(None),
            Some(val) => self.ensure_string(val, label, true).map(Some),
        }
    }

    pub fn ensure_bool(
        &self,
        value: Option<&Value>,
        label: &str,
        fallback: bool,
    ) -> Result<bool, LookupError> {
        let Some(value) = value else {
            return Ok(fallback);
        };
        if value.is_null() {
            return Ok(fallback);
        }
        if let Some(flag) = value.as_bool() {
            return Ok(flag);
        }
        if let Some(text) = value.as_str() {
            match text.trim().to_lowercase().as_str() {
                "true" | "1" | "yes" => return Ok(true),
                "false" | "0" | "no" => return Ok(false),
                _ => {}
            }
        }
        Err(LookupError::configuration(format!(
            "{} must be a boolean",
            label
        )))
    }

    pub fn ensure_timeout_secs(
        &self,
        value: Option<&Value>,
        label: &str,
        fallback: u64,
    ) -> Result<u64, LookupError> {
        let Some(value) = value else {
            return Ok(fallback);
        };
        if value.is_null() {
            return Ok(fallback);
        }
        let numeric = value
            .as_u64()
            .or_else(|| value.as_str().and_then(|s| s.trim().parse::<u64>().ok()))
            .filter(|v| *v > 0)
            .ok_or_else(|| {
                LookupError::configuration(format!("{} must be a positive number of seconds", label))
            })?;
        Ok(numeric)
    }
}

impl Default for Validation {
    fn default() -> Self {
        Self::new()
    }
}
