use crate::domain::{Command, MessageId};

/// Body handed to the parser when every attempt came back empty.
pub const PLACEHOLDER_RESPONSE: &str = ",";

/// Response body split into its delimiter-separated fields.
///
/// Accessors are total: a missing field reads as empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseFields(Vec<String>);

impl ResponseFields {
    /// Split `raw` on the delimiter selected for this request.
    ///
    /// `query` is the percent-encoded parameter string of the request that produced `raw`.
    pub fn parse(command: Command, query: &str, raw: &str) -> Self {
        let delimiter = delimiter_for(command, query);
        let body = raw.trim_end_matches(['\r', '\n']);
        let fields = body
            .split(delimiter)
            .map(|field| match delimiter {
                '\n' => field.trim_end_matches('\r').to_owned(),
                _ => field.to_owned(),
            })
            .collect();
        Self(fields)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, idx: usize) -> &str {
        self.0.get(idx).map(String::as_str).unwrap_or_default()
    }

    /// Field `idx` as an integer; `None` when missing or not numeric.
    pub fn int(&self, idx: usize) -> Option<i32> {
        self.get(idx).trim().parse().ok()
    }

    /// Field `idx`, or `None` when it is missing or empty.
    pub fn non_empty(&self, idx: usize) -> Option<String> {
        let value = self.get(idx);
        (!value.is_empty()).then(|| value.to_owned())
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

/// Comma, except for `status` requests addressing several ids: the gateway then answers one
/// message per line.
pub fn delimiter_for(command: Command, query: &str) -> char {
    if command != Command::Status {
        return ',';
    }

    let batch = query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .any(|(key, value)| key == MessageId::FIELD && value.to_ascii_lowercase().contains("%2c"));

    if batch { '\n' } else { ',' }
}
