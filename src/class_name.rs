use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Styling classes handed through to the renderer untouched.
///
/// The conditional form maps a class name to whether it applies; `null` leaves the decision to
/// the renderer's defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ClassName {
    Text(String),
    List(Vec<ClassName>),
    Conditional(BTreeMap<String, Option<bool>>),
}

impl From<&str> for ClassName {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for ClassName {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<ClassName>> From<Vec<T>> for ClassName {
    fn from(value: Vec<T>) -> Self {
        Self::List(value.into_iter().map(Into::into).collect())
    }
}
