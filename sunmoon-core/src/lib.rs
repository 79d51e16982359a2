//! Core library for the `sunmoon` CLI.
//!
//! This crate defines:
//! - Metric and annotation catalogs
//! - Query payload resolution and target classification
//! - Time series synthesis over an astronomical evaluator
//! - Datasource settings and health checks
//!
//! It is used by `sunmoon-cli`, but can also be embedded by other binaries or services.

pub mod catalog;
pub mod civil;
pub mod classify;
pub mod config;
pub mod datasource;
pub mod error;
pub mod evaluator;
pub mod frame;
pub mod model;
pub mod resolve;
pub mod response;
pub mod series;

pub use catalog::{AnnotationDefinition, AnnotationId, Catalog, MetricDefinition, MetricId};
pub use civil::CivilZone;
pub use classify::{Classified, TargetClassifier};
pub use config::{HealthReport, HealthStatus, Settings};
pub use datasource::{Datasource, QueryPlan};
pub use error::{Axis, QueryError, QueryResult};
pub use evaluator::{Evaluator, SunCalc};
pub use frame::{AnnotationFrame, Frame, MetricFrame};
pub use model::{DataQuery, DefaultLocation, QueryRequest, ResolvedLocation, TimeRange};
pub use resolve::QuerySpecResolver;
pub use response::{DataResponse, Response, ResponseAssembler};
pub use series::{AnnotationSeriesBuilder, MetricSeriesBuilder};
