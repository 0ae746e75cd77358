//! Reply envelopes and the publication side-channel.
//!
//! The status envelope answers the request; rendered bodies (tables,
//! charts) travel separately as mime-keyed bundles, matching how notebook
//! protocols split `execute_reply` from `execute_result`. The host owns the
//! transport and receives both through the [`Publisher`] trait.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

pub const TEXT_PLAIN: &str = "text/plain";
pub const TEXT_HTML: &str = "text/html";
pub const VEGALITE_MIME: &str = "application/vnd.vegalite.v3+json";

/// One rendered result, keyed by mimetype.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MimeBundle(BTreeMap<String, Value>);

impl MimeBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, mime: &str, data: Value) {
        self.0.insert(mime.to_string(), data);
    }

    pub fn get(&self, mime: &str) -> Option<&Value> {
        self.0.get(mime)
    }

    pub fn mimetypes(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// A `text/plain` acknowledgement.
    pub fn text_plain(text: impl Into<String>) -> Self {
        let mut bundle = Self::new();
        bundle.insert(TEXT_PLAIN, Value::String(text.into()));
        bundle
    }

    /// The two synchronized table renderings of one result set.
    pub fn table(plain: String, html: String) -> Self {
        let mut bundle = Self::new();
        bundle.insert(TEXT_PLAIN, Value::String(plain));
        bundle.insert(TEXT_HTML, Value::String(html));
        bundle
    }

    /// A chart document.
    pub fn vegalite(spec: Value) -> Self {
        let mut bundle = Self::new();
        bundle.insert(VEGALITE_MIME, spec);
        bundle
    }
}

/// The status envelope returned for every executed cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ExecuteReply {
    Ok {
        payload: Vec<Value>,
        user_expressions: Value,
    },
    Error {
        ename: String,
        evalue: String,
    },
}

impl ExecuteReply {
    pub fn ok() -> Self {
        ExecuteReply::Ok {
            payload: Vec::new(),
            user_expressions: Value::Object(Default::default()),
        }
    }

    pub fn error(evalue: impl Into<String>) -> Self {
        ExecuteReply::Error {
            ename: "Error".to_string(),
            evalue: evalue.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, ExecuteReply::Ok { .. })
    }
}

/// Host-implemented sink for rendered results and error events.
pub trait Publisher {
    fn publish_result(&mut self, bundle: MimeBundle);
    fn publish_error(&mut self, ename: &str, evalue: &str, traceback: &[String]);
}

/// Everything a [`Publisher`] can receive, as plain data.
#[derive(Debug, Clone, PartialEq)]
pub enum Publication {
    Result(MimeBundle),
    Error {
        ename: String,
        evalue: String,
        traceback: Vec<String>,
    },
}

/// A publisher that records publications in order; used by tests and the CLI.
#[derive(Debug, Default)]
pub struct CollectingPublisher {
    pub published: Vec<Publication>,
}

impl CollectingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn results(&self) -> impl Iterator<Item = &MimeBundle> {
        self.published.iter().filter_map(|p| match p {
            Publication::Result(bundle) => Some(bundle),
            Publication::Error { .. } => None,
        })
    }

    pub fn errors(&self) -> impl Iterator<Item = (&str, &str, &[String])> {
        self.published.iter().filter_map(|p| match p {
            Publication::Error { ename, evalue, traceback } => {
                Some((ename.as_str(), evalue.as_str(), traceback.as_slice()))
            }
            Publication::Result(_) => None,
        })
    }
}

impl Publisher for CollectingPublisher {
    fn publish_result(&mut self, bundle: MimeBundle) {
        self.published.push(Publication::Result(bundle));
    }

    fn publish_error(&mut self, ename: &str, evalue: &str, traceback: &[String]) {
        self.published.push(Publication::Error {
            ename: ename.to_string(),
            evalue: evalue.to_string(),
            traceback: traceback.to_vec(),
        });
    }
}
