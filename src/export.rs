//! Bundled sink implementations.
//!
//! The engine only depends on the [`DrawingSink`](crate::sink::DrawingSink)
//! capability; this module provides the SVG rendition of it.

pub mod svg;
