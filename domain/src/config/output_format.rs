//! Output format value object

use serde::{Deserialize, Serialize};

/// How a finished council run is rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Only the chairman's verdict
    #[default]
    Verdict,
    /// Answers, rankings, aggregate and verdict
    Full,
    /// The whole report as one JSON document
    Json,
    /// Every progress event as a JSON line, as it happens
    Events,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "verdict" => Ok(Self::Verdict),
            "full" => Ok(Self::Full),
            "json" => Ok(Self::Json),
            "events" => Ok(Self::Events),
            other => Err(format!(
                "unknown output format '{other}' (expected verdict, full, json or events)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_verdict() {
        assert_eq!(OutputFormat::default(), OutputFormat::Verdict);
    }

    #[test]
    fn test_serialize_lowercase() {
        let json = serde_json::to_string(&OutputFormat::Events).unwrap();
        assert_eq!(json, "\"events\"");
    }

    #[test]
    fn test_from_str() {
        assert_eq!("Full".parse::<OutputFormat>(), Ok(OutputFormat::Full));
        assert!("table".parse::<OutputFormat>().is_err());
    }
}
