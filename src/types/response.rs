//! Response type definitions
//!
//! The dashboard's JSON endpoints wrap their real payload in an envelope
//! object whose `datos` field holds the data. A response without `datos`
//! means "no data", never an error.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Result of one dispatched call: opaque text in raw mode, or the
/// envelope-decoded payload otherwise.
#[derive(Debug, Clone)]
pub enum Payload {
    /// Undecoded response body (HTML pages and marker probing)
    Raw(String),
    /// `datos` field of the decoded envelope, when present
    Data(Option<Value>),
}

impl Payload {
    /// The raw text, if this payload was fetched in raw mode
    pub fn into_text(self) -> Option<String> {
        match self {
            Payload::Raw(text) => Some(text),
            Payload::Data(_) => None,
        }
    }

    /// The envelope data, if this payload was fetched in decoded mode
    pub fn into_data(self) -> Option<Value> {
        match self {
            Payload::Raw(_) => None,
            Payload::Data(data) => data,
        }
    }
}

/// Decode a response body through the `datos` envelope convention.
///
/// Unparseable bodies and envelopes without `datos` both map to `None`;
/// the dashboard signals "nothing found" either way.
pub fn decode_envelope(body: &str) -> Option<Value> {
    #[derive(Deserialize)]
    struct Envelope {
        datos: Option<Value>,
    }

    match serde_json::from_str::<Envelope>(body) {
        Ok(envelope) => envelope.datos,
        Err(e) => {
            tracing::debug!("response body is not an envelope: {}", e);
            None
        }
    }
}

/// Company record attached to the authenticated user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    /// Company identifier used in several endpoint paths
    pub id: i64,
    /// Tax identity of the company
    pub identidad_empresa: Option<Value>,
    /// Remaining dashboard fields, carried through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Transaction created by assigning a client to a sale
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction identifier, numeric or string depending on endpoint
    pub id_transaccion: Value,
    /// Client snapshot echoed back by the dashboard
    pub cliente: TransactionClient,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Client fields echoed inside a transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionClient {
    pub email: Option<String>,
    pub nombre: Option<String>,
    pub apellido: Option<String>,
    pub id_empresa: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Transaction {
    /// Transaction id rendered for use in an endpoint path
    pub fn id_as_string(&self) -> String {
        match &self.id_transaccion {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}
