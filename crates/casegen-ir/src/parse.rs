use crate::config::Configuration;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn parse_configuration(json: &str) -> Result<Configuration, ParseError> {
    Ok(serde_json::from_str(json)?)
}

/// Parse a JSON array of configurations, one per field.
pub fn parse_configurations(json: &str) -> Result<Vec<Configuration>, ParseError> {
    Ok(serde_json::from_str(json)?)
}
