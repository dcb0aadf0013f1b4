//! Model value object naming a hosted generation model

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Generation model used for every agent call (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Model {
    Gemini25Pro,
    Gemini25Flash,
    Gemini25FlashLite,
    Gemini20Flash,
    Custom(String),
}

impl Model {
    /// Get the string identifier sent to the service
    pub fn as_str(&self) -> &str {
        match self {
            Model::Gemini25Pro => "gemini-2.5-pro",
            Model::Gemini25Flash => "gemini-2.5-flash",
            Model::Gemini25FlashLite => "gemini-2.5-flash-lite",
            Model::Gemini20Flash => "gemini-2.0-flash",
            Model::Custom(s) => s,
        }
    }

    /// Named Gemini models; any other name parses as `Custom`
    pub fn known() -> Vec<Model> {
        vec![
            Model::Gemini25Pro,
            Model::Gemini25Flash,
            Model::Gemini25FlashLite,
            Model::Gemini20Flash,
        ]
    }
}

impl Default for Model {
    fn default() -> Self {
        Model::Gemini25Flash
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "gemini-2.5-pro" => Model::Gemini25Pro,
            "gemini-2.5-flash" => Model::Gemini25Flash,
            "gemini-2.5-flash-lite" => Model::Gemini25FlashLite,
            "gemini-2.0-flash" => Model::Gemini20Flash,
            other => Model::Custom(other.to_string()),
        })
    }
}

impl From<&str> for Model {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(model) => model,
            Err(never) => match never {},
        }
    }
}

impl Serialize for Model {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Model::from(s.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_roundtrip() {
        for model in Model::known() {
            assert_eq!(Model::from(model.to_string().as_str()), model);
        }
    }

    #[test]
    fn test_custom_model() {
        let model = Model::from("gemini-exp-1206");
        assert_eq!(model, Model::Custom("gemini-exp-1206".to_string()));
        assert_eq!(model.to_string(), "gemini-exp-1206");
    }

    #[test]
    fn test_model_default() {
        assert_eq!(Model::default().as_str(), "gemini-2.5-flash");
    }

    #[test]
    fn test_model_serde_as_string() {
        let json = serde_json::to_string(&Model::Gemini25Pro).unwrap();
        assert_eq!(json, "\"gemini-2.5-pro\"");
        let parsed: Model = serde_json::from_str("\"my-tuned-model\"").unwrap();
        assert_eq!(parsed, Model::Custom("my-tuned-model".to_string()));
    }
}
