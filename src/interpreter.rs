//! The interpreter: session ownership, command routing, reply building.
//!
//! One `Interpreter` serves one host, one cell at a time. It owns the only
//! database session (`%LOAD` replaces it) and the chart-spec registry, and
//! turns every executed cell into exactly one [`ExecuteReply`] plus zero or
//! more publications on the host's [`Publisher`]. Errors never escape
//! [`Interpreter::execute`]: any failure becomes an error reply and one
//! published error event.

use serde_json::{Map, Value};
use tracing::debug;

use crate::format;
use crate::magic::{classify, Command, SqlKind};
use crate::reader::{self, Session};
use crate::reply::{ExecuteReply, MimeBundle, Publisher};
use crate::specs::SpecStore;
use crate::writer::{vegalite, ChartRenderer, VegaLiteRenderer};
use crate::{Result, SquillError};

pub struct Interpreter {
    session: Option<Box<dyn Session>>,
    specs: SpecStore,
    renderer: Box<dyn ChartRenderer>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// An interpreter with the built-in Vega-Lite chart renderer.
    pub fn new() -> Self {
        Self::with_renderer(Box::new(VegaLiteRenderer::new()))
    }

    /// An interpreter rendering charts through a host-provided renderer.
    pub fn with_renderer(renderer: Box<dyn ChartRenderer>) -> Self {
        Self { session: None, specs: SpecStore::new(), renderer }
    }

    /// Attach a session directly, bypassing the `%LOAD` driver registry.
    ///
    /// For hosts embedding their own engine; replaces any open session just
    /// as `%LOAD` does.
    pub fn attach_session(&mut self, session: Box<dyn Session>) {
        if self.session.replace(session).is_some() {
            debug!("replaced previously open session");
        }
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    /// The chart-spec registry, populated by `%VEGA_LITE SET`.
    pub fn specs(&self) -> &SpecStore {
        &self.specs
    }

    /// Execute one cell.
    ///
    /// Returns the status envelope; rendered bodies and error events go to
    /// `publisher`. A blank cell succeeds without publishing anything.
    pub fn execute(&mut self, code: &str, publisher: &mut dyn Publisher) -> ExecuteReply {
        match self.execute_inner(code, publisher) {
            Ok(()) => ExecuteReply::ok(),
            Err(err) => {
                let evalue = err.to_string();
                let traceback = vec![format!("Error: {evalue}")];
                publisher.publish_error("Error", &evalue, &traceback);
                ExecuteReply::error(evalue)
            }
        }
    }

    fn execute_inner(&mut self, code: &str, publisher: &mut dyn Publisher) -> Result<()> {
        let Some(command) = classify(code)? else {
            return Ok(());
        };
        match command {
            Command::Load { driver, conn } => {
                debug!(driver = %driver, "opening session");
                let session = reader::open(&driver, &conn)?;
                if self.session.replace(session).is_some() {
                    debug!("replaced previously open session");
                }
                Ok(())
            }
            Command::Plot { directives, sql } => {
                let session = self.require_session()?;
                let output = format::run_query(session, &sql)?;
                let chart = self.renderer.render(&directives, &output.frame)?;
                publisher.publish_result(MimeBundle::vegalite(chart));
                Ok(())
            }
            Command::SpecSet { name, json_text } => {
                let spec = parse_spec(&json_text)?;
                self.specs.set(&name, Value::Object(spec));
                publisher.publish_result(MimeBundle::text_plain(format!("SET {name} success.")));
                Ok(())
            }
            Command::SpecRender { name_or_path, sql } => {
                let mut spec = self.resolve_spec(&name_or_path)?;
                if let Some(sql) = sql {
                    let session = self.require_session()?;
                    let output = format::run_query(session, &sql)?;
                    if output.frame.is_empty() {
                        return Err(SquillError::EmptyChartResult);
                    }
                    vegalite::attach_data(&mut spec, &output.frame);
                }
                publisher.publish_result(MimeBundle::vegalite(Value::Object(spec)));
                Ok(())
            }
            Command::Sql { text, kind } => {
                let session = self.require_session()?;
                match kind {
                    SqlKind::Tabular => {
                        let output = format::run_query(session, &text)?;
                        publisher.publish_result(MimeBundle::table(output.plain, output.html));
                    }
                    SqlKind::NonTabular => session.execute(&text)?,
                }
                Ok(())
            }
        }
    }

    fn require_session(&mut self) -> Result<&mut dyn Session> {
        match self.session.as_deref_mut() {
            Some(session) => Ok(session),
            None => Err(SquillError::SessionNotLoaded),
        }
    }

    /// Registry first, then the filesystem.
    fn resolve_spec(&self, name_or_path: &str) -> Result<Map<String, Value>> {
        if let Some(spec) = self.specs.get(name_or_path) {
            return match spec {
                Value::Object(map) => Ok(map.clone()),
                // the store only ever holds objects; keep the invariant local
                _ => Err(SquillError::SpecJson("stored spec is not an object".to_string())),
            };
        }
        let text = std::fs::read_to_string(name_or_path)
            .map_err(|_| SquillError::SpecNotFound(name_or_path.to_string()))?;
        parse_spec(&text)
    }
}

fn parse_spec(text: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str(text).map_err(|e| SquillError::SpecJson(e.to_string()))? {
        Value::Object(map) => Ok(map),
        _ => Err(SquillError::SpecJson("spec must be a json object".to_string())),
    }
}
