// src/ticket.rs
//
// Wire shape of one GitHub issue, as returned by the REST listing endpoint.
// Only the fields the shop reads are modelled; everything is kept in the
// remote shape so a snapshot can be written back out and re-read verbatim.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTicket {
    pub id: u64,
    pub number: u64,
    #[serde(rename = "html_url", default)]
    pub url: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub labels: Vec<Label>,
    /// Present only on pull requests, which share the issues listing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_request: Option<serde_json::Value>,
}

/// The API returns label objects; older snapshots may hold bare names.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    Name(String),
    Object {
        #[serde(default)]
        name: Option<String>,
    },
}

impl Label {
    pub fn name(&self) -> Option<&str> {
        let name = match self {
            Label::Name(n) => Some(n.as_str()),
            Label::Object { name } => name.as_deref(),
        };
        name.filter(|n| !n.is_empty())
    }
}

impl From<&str> for Label {
    fn from(name: &str) -> Self {
        Label::Object { name: Some(s!(name)) }
    }
}

impl RawTicket {
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.as_ref().is_some_and(|v| !v.is_null())
    }

    pub fn body(&self) -> &str {
        self.body.as_deref().unwrap_or("")
    }

    /// Label names in the order given, blanks dropped.
    pub fn label_names(&self) -> Vec<String> {
        self.labels.iter().filter_map(Label::name).map(String::from).collect()
    }
}

/// Decode a listing entry by entry. Entries that don't fit [`RawTicket`]
/// are logged and skipped so one bad issue can't take the page with it.
pub fn decode_tickets(values: Vec<Value>) -> Vec<RawTicket> {
    let total = values.len();
    let mut out = Vec::with_capacity(total);
    for (i, v) in values.into_iter().enumerate() {
        let number = v.get("number").and_then(Value::as_u64);
        match serde_json::from_value::<RawTicket>(v) {
            Ok(t) => out.push(t),
            Err(e) => warn!(index = i, ?number, error = %e, "skipping malformed ticket"),
        }
    }
    if out.len() < total {
        warn!(kept = out.len(), total, "some tickets could not be decoded");
    }
    out
}

/// `deserialize_with` helper: a JSON array of tickets, decoded leniently.
pub(crate) fn lenient_tickets<'de, D>(d: D) -> Result<Vec<RawTicket>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<Value>::deserialize(d)?;
    Ok(decode_tickets(values))
}
