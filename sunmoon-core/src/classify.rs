use crate::catalog::{AnnotationDefinition, Catalog, MetricDefinition};
use crate::error::{QueryError, QueryResult};

/// Targets split into metrics and annotations, each in request order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classified<'a> {
    pub metrics: Vec<&'a MetricDefinition>,
    pub annotations: Vec<&'a AnnotationDefinition>,
}

impl Classified<'_> {
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty() && self.annotations.is_empty()
    }
}

/// Partitions requested targets using the catalog.
#[derive(Debug, Clone, Copy)]
pub struct TargetClassifier<'a> {
    catalog: &'a Catalog,
}

impl<'a> TargetClassifier<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Metric catalog first, then annotations. Any unknown target fails the
    /// whole list, whatever came before it.
    pub fn classify<S: AsRef<str>>(&self, targets: &[S]) -> QueryResult<Classified<'a>> {
        let mut classified = Classified::default();

        for target in targets {
            let target = target.as_ref();

            if let Some(def) = self.catalog.metric(target) {
                classified.metrics.push(def);
            } else if let Some(def) = self.catalog.annotation(target) {
                classified.annotations.push(def);
            } else {
                return Err(QueryError::UnknownTarget(target.to_string()));
            }
        }

        Ok(classified)
    }
}
