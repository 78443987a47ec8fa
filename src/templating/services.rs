//! Service-binding catalog used by the `svcprop` template function.
//!
//! The platform injects bound services as a JSON object keyed by service type,
//! each holding an ordered list of bindings:
//!
//! ```json
//! {
//!   "p-mysql": [
//!     { "name": "mydb", "uri": "mysql://...", "credentials": { "user": "app" } }
//!   ]
//! }
//! ```
//!
//! Binding properties are decoded into [`PropertyValue`], an explicit schema of
//! scalars and one-level nested maps. A lookup either produces text or a typed
//! [`ServiceLookupError`]; nothing falls back to an empty string.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;
use strsim::levenshtein;
use thiserror::Error;

/// Maximum edit distance, as a percentage of the requested name's length, for
/// a binding name to be offered as a suggestion.
const SIMILARITY_THRESHOLD_PERCENT: usize = 50;

/// Failure to answer a `svcprop` lookup.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceLookupError {
    /// The service-binding JSON could not be decoded.
    #[error("Service bindings are not valid JSON of the expected shape: {reason}")]
    MalformedCatalog {
        /// Decoder message
        reason: String,
    },

    /// No bindings exist for the requested service type.
    #[error("No services of type '{service_type}' are bound (bound types: {})", display_list(.available))]
    UnknownServiceType {
        /// Requested service type
        service_type: String,
        /// Service types present in the catalog
        available: Vec<String>,
    },

    /// No binding of the service type carries the requested name.
    #[error("No '{service_type}' service named '{name}' is bound{}", suggestion_suffix(.suggestion))]
    UnknownBinding {
        /// Requested service type
        service_type: String,
        /// Requested binding name
        name: String,
        /// Closest bound name, when one is similar enough
        suggestion: Option<String>,
    },

    /// The binding has no property at the requested path.
    #[error("Service '{binding}' has no property '{path}'")]
    MissingProperty {
        /// Binding name
        binding: String,
        /// `key` or `key.subkey`
        path: String,
    },

    /// The property exists but is not of the shape the call requires.
    #[error("Property '{path}' of service '{binding}' is {found}, expected {expected}")]
    ShapeMismatch {
        /// Binding name
        binding: String,
        /// `key` or `key.subkey`
        path: String,
        /// What the call needed
        expected: &'static str,
        /// What the catalog holds
        found: &'static str,
    },
}

fn display_list(items: &[String]) -> String {
    if items.is_empty() { "none".to_string() } else { items.join(", ") }
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    suggestion.as_ref().map(|s| format!(" (did you mean '{s}'?)")).unwrap_or_default()
}

/// A binding property value.
///
/// Strings, numbers and booleans are scalars and render as their text. Objects
/// become [`PropertyValue::Nested`], one level deep: anything below that level
/// that is not a scalar is kept as [`PropertyValue::Unsupported`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    /// Text value
    Scalar(String),
    /// Map of sub-properties
    Nested(BTreeMap<String, PropertyValue>),
    /// A JSON value `svcprop` cannot render; holds its kind for diagnostics
    Unsupported(&'static str),
}

impl PropertyValue {
    fn from_json(value: Value, nested: bool) -> Self {
        match value {
            Value::String(s) => Self::Scalar(s),
            Value::Number(n) => Self::Scalar(n.to_string()),
            Value::Bool(b) => Self::Scalar(b.to_string()),
            Value::Object(map) if !nested => Self::Nested(
                map.into_iter().map(|(k, v)| (k, Self::from_json(v, true))).collect(),
            ),
            Value::Object(_) => Self::Unsupported("an object"),
            Value::Array(_) => Self::Unsupported("an array"),
            Value::Null => Self::Unsupported("null"),
        }
    }

    /// Human-readable kind for error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "a scalar",
            Self::Nested(_) => "an object",
            Self::Unsupported(kind) => *kind,
        }
    }
}

impl From<Value> for PropertyValue {
    fn from(value: Value) -> Self {
        Self::from_json(value, false)
    }
}

impl<'de> Deserialize<'de> for PropertyValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from)
    }
}

/// One bound service instance.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceBinding {
    /// Instance name chosen when the service was bound
    pub name: String,
    /// Every other field of the binding
    #[serde(flatten)]
    pub properties: BTreeMap<String, PropertyValue>,
}

/// Bound services keyed by service type, bindings in platform order.
///
/// Each service type is decoded on its own: a type whose bindings do not fit
/// the schema (a binding without `name`, say) is kept as its decode error, and
/// only lookups on that type fail.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceBindingCatalog {
    services: BTreeMap<String, Result<Vec<ServiceBinding>, String>>,
}

impl ServiceBindingCatalog {
    /// Decode the platform's JSON. A blank document is an empty catalog.
    ///
    /// # Errors
    ///
    /// [`ServiceLookupError::MalformedCatalog`] when the document is not a JSON
    /// object keyed by service type. Bad bindings under a single type are not
    /// an error here; they surface from lookups on that type.
    pub fn parse(json: &str) -> Result<Self, ServiceLookupError> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        let raw: BTreeMap<String, Value> =
            serde_json::from_str(json).map_err(|e| ServiceLookupError::MalformedCatalog {
                reason: e.to_string(),
            })?;

        let services = raw
            .into_iter()
            .map(|(service_type, bindings)| {
                let decoded = serde_json::from_value::<Vec<ServiceBinding>>(bindings)
                    .map_err(|e| format!("'{service_type}' bindings: {e}"));
                if let Err(reason) = &decoded {
                    tracing::debug!("Ignoring malformed service bindings: {reason}");
                }
                (service_type, decoded)
            })
            .collect();
        Ok(Self {
            services,
        })
    }

    /// Bindings of `service_type`, in catalog order.
    ///
    /// # Errors
    ///
    /// [`ServiceLookupError::UnknownServiceType`] when nothing of that type is
    /// bound, [`ServiceLookupError::MalformedCatalog`] when its bindings could
    /// not be decoded.
    pub fn bindings(&self, service_type: &str) -> Result<&[ServiceBinding], ServiceLookupError> {
        match self.services.get(service_type) {
            Some(Ok(bindings)) => Ok(bindings.as_slice()),
            Some(Err(reason)) => Err(ServiceLookupError::MalformedCatalog {
                reason: reason.clone(),
            }),
            None => Err(ServiceLookupError::UnknownServiceType {
                service_type: service_type.to_string(),
                available: self.services.keys().cloned().collect(),
            }),
        }
    }

    /// Find the first binding of `service_type` named `name`.
    pub fn binding(
        &self,
        service_type: &str,
        name: &str,
    ) -> Result<&ServiceBinding, ServiceLookupError> {
        let bindings = self.bindings(service_type)?;

        bindings.iter().find(|binding| binding.name == name).ok_or_else(|| {
            ServiceLookupError::UnknownBinding {
                service_type: service_type.to_string(),
                name: name.to_string(),
                suggestion: closest_name(name, bindings.iter().map(|b| b.name.as_str())),
            }
        })
    }

    /// Text of `key` (or `key.subkey`) on the binding `name` of `service_type`.
    ///
    /// # Errors
    ///
    /// Every miss is an error: unknown service type, unknown binding, missing
    /// property or sub-property, and a value of the wrong shape.
    pub fn property(
        &self,
        service_type: &str,
        name: &str,
        key: &str,
        subkey: Option<&str>,
    ) -> Result<String, ServiceLookupError> {
        let binding = self.binding(service_type, name)?;
        let missing = |path: String| ServiceLookupError::MissingProperty {
            binding: binding.name.clone(),
            path,
        };
        let mismatch = |path: String, expected: &'static str, found: &'static str| {
            ServiceLookupError::ShapeMismatch {
                binding: binding.name.clone(),
                path,
                expected,
                found,
            }
        };

        let value = binding.properties.get(key).ok_or_else(|| missing(key.to_string()))?;

        match (value, subkey) {
            (PropertyValue::Scalar(text), None) => Ok(text.clone()),
            (other, None) => Err(mismatch(key.to_string(), "a scalar", other.kind())),
            (PropertyValue::Nested(map), Some(subkey)) => {
                let path = format!("{key}.{subkey}");
                match map.get(subkey) {
                    Some(PropertyValue::Scalar(text)) => Ok(text.clone()),
                    Some(other) => Err(mismatch(path, "a scalar", other.kind())),
                    None => Err(missing(path)),
                }
            }
            (other, Some(_)) => Err(mismatch(key.to_string(), "an object", other.kind())),
        }
    }
}

fn closest_name<'a>(target: &str, candidates: impl Iterator<Item = &'a str>) -> Option<String> {
    let max_distance = (target.len() * SIMILARITY_THRESHOLD_PERCENT / 100).max(1);
    candidates
        .map(|candidate| (levenshtein(target, candidate), candidate))
        .filter(|(distance, _)| *distance <= max_distance)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, candidate)| candidate.to_string())
}
