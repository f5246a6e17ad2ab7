//! Captured traffic records
//!
//! A [`TrafficRecord`] is one observed request or response. Records are owned
//! by the caller and only ever read by the analysis engine.

use chrono::{DateTime, Utc};
use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Which side of a transaction a record captures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Request,
    Response,
}

/// Ordered header list with case-insensitive lookup
///
/// Deserializes from either a JSON object or a list of `[name, value]` pairs,
/// keeping the order headers were captured in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a header, keeping any earlier value with the same name
    pub fn append<K: Into<String>, V: Into<String>>(&mut self, name: K, value: V) {
        self.0.push((name.into(), value.into()));
    }

    /// First value for `name`, compared case-insensitively
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.iter().find(|(key, _)| key.eq_ignore_ascii_case(name)).map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl Serialize for Headers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Header values are usually strings; numbers and booleans are stringified
fn header_value_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

struct HeadersVisitor;

impl<'de> Visitor<'de> for HeadersVisitor {
    type Value = Headers;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a header object or a list of [name, value] pairs")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Headers, A::Error> {
        let mut headers = Headers::new();
        while let Some((name, value)) = access.next_entry::<String, Value>()? {
            headers.append(name, header_value_to_string(value));
        }
        Ok(headers)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<Headers, A::Error> {
        let mut headers = Headers::new();
        while let Some((name, value)) = access.next_element::<(String, Value)>()? {
            headers.append(name, header_value_to_string(value));
        }
        Ok(headers)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Headers, E> {
        Ok(Headers::new())
    }
}

impl<'de> Deserialize<'de> for Headers {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(HeadersVisitor)
    }
}

/// One observed request or response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficRecord {
    /// Correlation id shared by a request and its response
    pub id: String,
    pub direction: Direction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_text: Option<String>,
    #[serde(default, skip_serializing_if = "Headers::is_empty")]
    pub headers: Headers,
    /// Decoded body, or the raw body text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    /// Protocol label (http, websocket, sse, grpc, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl TrafficRecord {
    /// A request record
    pub fn request<I: Into<String>, M: Into<String>, U: Into<String>>(
        id: I,
        method: M,
        url: U,
    ) -> Self {
        Self {
            id: id.into(),
            direction: Direction::Request,
            method: Some(method.into()),
            url: Some(url.into()),
            status: None,
            status_text: None,
            headers: Headers::new(),
            body: None,
            protocol: None,
            timestamp: None,
        }
    }

    /// A response record
    pub fn response<I: Into<String>>(id: I, status: u16) -> Self {
        Self {
            id: id.into(),
            direction: Direction::Response,
            method: None,
            url: None,
            status: Some(status),
            status_text: None,
            headers: Headers::new(),
            body: None,
            protocol: None,
            timestamp: None,
        }
    }

    pub fn with_header<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_status_text<S: Into<String>>(mut self, text: S) -> Self {
        self.status_text = Some(text.into());
        self
    }

    pub fn with_protocol<S: Into<String>>(mut self, protocol: S) -> Self {
        self.protocol = Some(protocol.into());
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn is_request(&self) -> bool {
        self.direction == Direction::Request
    }

    pub fn is_response(&self) -> bool {
        self.direction == Direction::Response
    }
}

/// The request and response observed for one correlation id
///
/// Either side may be missing. Pairs borrow from the caller's records and
/// live only for one analysis run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransactionPair<'a> {
    pub id: &'a str,
    pub request: Option<&'a TrafficRecord>,
    pub response: Option<&'a TrafficRecord>,
}

impl<'a> TransactionPair<'a> {
    pub fn new(id: &'a str) -> Self {
        Self { id, request: None, response: None }
    }

    pub fn is_complete(&self) -> bool {
        self.request.is_some() && self.response.is_some()
    }
}
