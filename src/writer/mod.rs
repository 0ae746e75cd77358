//! Chart rendering seam.
//!
//! The interpreter hands chart directives and a result [`Frame`] to a
//! [`ChartRenderer`] and publishes whatever document comes back. The
//! built-in [`VegaLiteRenderer`] covers the common case; hosts with their
//! own charting stack implement the trait and inject it.

use serde_json::Value;

use crate::frame::Frame;
use crate::Result;

pub mod vegalite;

pub use vegalite::VegaLiteRenderer;

pub trait ChartRenderer {
    /// Turn `%PLOT` directives plus a frame into a chart document.
    fn render(&self, directives: &[String], frame: &Frame) -> Result<Value>;
}
