use nst_core::errors::{ErrorInfo, NsError};

use crate::run::NestedRun;

/// Serializes a run to a JSON string.
pub fn run_to_json(run: &NestedRun) -> Result<String, NsError> {
    serde_json::to_string_pretty(run)
        .map_err(|err| NsError::Serde(ErrorInfo::new("serde.serialize-json", err.to_string())))
}

/// Restores a run from a JSON string.
///
/// Missing mandatory members and unexpected members are rejected; the shape
/// and thread checks still have to be run on the result.
pub fn run_from_json(json: &str) -> Result<NestedRun, NsError> {
    serde_json::from_str(json)
        .map_err(|err| NsError::Serde(ErrorInfo::new("serde.deserialize-json", err.to_string())))
}

/// JSON has no infinities, so contours are written as numbers when finite and
/// as `"-inf"`, `"inf"` or `"nan"` otherwise.
pub(crate) mod contour {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        let repr = if value.is_finite() {
            Repr::Number(*value)
        } else if value.is_nan() {
            Repr::Text("nan".to_string())
        } else if *value > 0.0 {
            Repr::Text("inf".to_string())
        } else {
            Repr::Text("-inf".to_string())
        };
        repr.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(value) => Ok(value),
            Repr::Text(text) => match text.as_str() {
                "-inf" => Ok(f64::NEG_INFINITY),
                "inf" => Ok(f64::INFINITY),
                "nan" => Ok(f64::NAN),
                other => Err(serde::de::Error::custom(format!(
                    "unrecognised contour value {other:?}"
                ))),
            },
        }
    }
}
