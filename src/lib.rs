//! Entity-relationship diagrams from live database metadata.
//!
//! [`introspect`] reads catalog metadata through a [`metadata::MetadataSource`]
//! into a [`schema::Model`]; [`graph`] and [`report`] turn a model into text.

pub mod config;
pub mod error;
pub mod graph;
pub mod introspect;
pub mod metadata;
pub mod report;
pub mod schema;

pub use error::{DbvizError, IntrospectWarning};
