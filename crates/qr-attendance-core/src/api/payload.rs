use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Body of the POST endpoints.
#[derive(Debug, Serialize)]
pub(crate) struct UserIdBody<'a> {
    pub(crate) user_id: &'a str,
}

/// Error payload returned with non-success statuses.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub(crate) error: Option<String>,
}

/// Key holding a success body that was not a JSON object.
pub const RAW_VALUE_KEY: &str = "value";

/// Success payload of the POST endpoints.
///
/// The backend's fields vary per endpoint; `message` is surfaced when present
/// and everything else is kept as-is. Any JSON value is accepted: a bare
/// string, number or array lands under [`RAW_VALUE_KEY`] and `null` is empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ApiResponse {
    /// Human-readable confirmation, if the backend sent one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Remaining fields of the response object.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl From<Value> for ApiResponse {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(mut fields) => {
                let message = match fields.remove("message") {
                    Some(Value::String(message)) => Some(message),
                    Some(other) => {
                        fields.insert("message".to_string(), other);
                        None
                    }
                    None => None,
                };

                Self { message, fields }
            }
            Value::Null => Self::default(),
            other => {
                let mut fields = Map::new();
                fields.insert(RAW_VALUE_KEY.to_string(), other);

                Self {
                    message: None,
                    fields,
                }
            }
        }
    }
}

impl<'de> Deserialize<'de> for ApiResponse {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from)
    }
}
