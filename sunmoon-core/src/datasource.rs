//! Request-level entry point.
//!
//! A request is answered in two passes. Planning resolves the location and
//! classifies the targets of every query; any failure there rejects the
//! request before a single frame is built. Building then walks the plans in
//! request order, metrics before annotations.

use std::sync::Arc;

use chrono::TimeDelta;
use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::civil::CivilZone;
use crate::classify::{Classified, TargetClassifier};
use crate::config::Settings;
use crate::error::QueryResult;
use crate::evaluator::{Evaluator, SunCalc};
use crate::model::{DataQuery, DefaultLocation, QueryRequest, ResolvedLocation, TimeRange};
use crate::resolve::QuerySpecResolver;
use crate::response::{Response, ResponseAssembler};
use crate::series::{AnnotationSeriesBuilder, MetricSeriesBuilder};

/// Everything needed to build the frames of one query.
#[derive(Debug, Clone)]
pub struct QueryPlan<'a> {
    pub ref_id: &'a str,
    pub range: TimeRange,
    pub interval: TimeDelta,
    pub location: ResolvedLocation,
    pub targets: Classified<'a>,
}

#[derive(Debug, Clone)]
pub struct Datasource {
    default_location: DefaultLocation,
    zone: CivilZone,
    catalog: Arc<Catalog>,
    evaluator: Arc<dyn Evaluator>,
}

impl Datasource {
    /// Datasource with the built-in catalog and evaluator.
    pub fn new(default_location: DefaultLocation, zone: CivilZone) -> Self {
        Self {
            default_location,
            zone,
            catalog: Arc::new(Catalog::builtin()),
            evaluator: Arc::new(SunCalc::new()),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.default_location(), settings.civil_zone)
    }

    pub fn with_catalog(mut self, catalog: Arc<Catalog>) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_evaluator(mut self, evaluator: Arc<dyn Evaluator>) -> Self {
        self.evaluator = evaluator;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn civil_zone(&self) -> CivilZone {
        self.zone
    }

    /// Resolve and classify one query without building anything.
    ///
    /// A query without targets produces no frames, so it yields `None`
    /// without resolving its location.
    pub fn plan<'a>(&'a self, query: &'a DataQuery) -> QueryResult<Option<QueryPlan<'a>>> {
        let resolver = QuerySpecResolver::new(self.default_location);
        let spec = resolver.parse(&query.payload)?;
        if spec.targets.is_empty() {
            debug!(ref_id = %query.ref_id, "query has no targets");
            return Ok(None);
        }

        let location = resolver.resolve_location(&spec)?;
        let targets = TargetClassifier::new(&self.catalog).classify(&spec.targets)?;

        debug!(
            ref_id = %query.ref_id,
            latitude = location.latitude,
            longitude = location.longitude,
            metrics = targets.metrics.len(),
            annotations = targets.annotations.len(),
            "planned query"
        );

        Ok(Some(QueryPlan {
            ref_id: &query.ref_id,
            range: query.time_range,
            interval: query.interval(),
            location,
            targets,
        }))
    }

    /// Answer every query in `request`, or fail as a whole.
    pub fn query_data(&self, request: &QueryRequest) -> QueryResult<Response> {
        let plans = request
            .queries
            .iter()
            .filter_map(|query| self.plan(query).transpose())
            .collect::<QueryResult<Vec<_>>>()
            .inspect_err(|err| warn!(error = %err, "rejected query request"))?;

        let metrics = MetricSeriesBuilder::new(self.evaluator.as_ref(), self.zone);
        let annotations = AnnotationSeriesBuilder::new(self.evaluator.as_ref(), self.zone);
        let mut assembler = ResponseAssembler::new();

        for plan in &plans {
            for def in &plan.targets.metrics {
                let frame = metrics.build(def, &plan.location, &plan.range, plan.interval);
                assembler.append(plan.ref_id, frame);
            }
            for def in &plan.targets.annotations {
                let frame = annotations.build(def, &plan.location, &plan.range);
                assembler.append(plan.ref_id, frame);
            }
        }

        Ok(assembler.finish())
    }
}
