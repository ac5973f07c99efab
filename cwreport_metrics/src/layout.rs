use crate::aggregator::SampleAggregator;
use crate::collector::DatapointSeries;
use cwreport_config::ReportConfig;
use cwreport_core::{Category, LayoutKind, ReportError, Resource, Result, Statistic};
use serde::{Serialize, Serializer};
use std::fmt;

/// One cell of a report row.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Flag(bool),
    Count(u64),
    Number(f64),
}

impl Cell {
    /// Reduced, rounded value of one metric. Sample counts stay integral.
    pub fn metric(samples: &[f64], statistic: &Statistic) -> Self {
        match statistic {
            Statistic::Other(_) => Cell::Count(samples.len() as u64),
            _ => Cell::Number(SampleAggregator::reduce_rounded(samples, statistic)),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(text) => f.write_str(text),
            Cell::Flag(true) => f.write_str("True"),
            Cell::Flag(false) => f.write_str("False"),
            Cell::Count(n) => write!(f, "{}", n),
            // whole numbers keep one decimal: 15.0, 0.0
            Cell::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{:.1}", n)
            }
            Cell::Number(n) => write!(f, "{}", n),
        }
    }
}

impl Serialize for Cell {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Cell::Text(text) => serializer.serialize_str(text),
            Cell::Flag(flag) => serializer.serialize_bool(*flag),
            Cell::Count(n) => serializer.serialize_u64(*n),
            Cell::Number(n) => serializer.serialize_f64(*n),
        }
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Cell::Text(text.to_string())
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ReportRow {
    pub cells: Vec<Cell>,
}

impl ReportRow {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn to_strings(&self) -> Vec<String> {
        self.cells.iter().map(Cell::to_string).collect()
    }
}

/// Row assembly strategy for a category, chosen once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowLayout {
    kind: LayoutKind,
}

impl RowLayout {
    pub fn for_category(category: Category) -> Self {
        Self {
            kind: category.layout_kind(),
        }
    }

    pub fn kind(&self) -> LayoutKind {
        self.kind
    }

    pub fn column_count(&self, metric_count: usize) -> usize {
        self.kind.identity_headers().len() + metric_count
    }

    fn identity_cells(&self, resource: &Resource) -> Result<Vec<Cell>> {
        match (self.kind, resource) {
            (LayoutKind::Instance, Resource::Instance(instance)) => Ok(vec![
                Cell::Text(instance.name.clone().unwrap_or_default()),
                Cell::Text(instance.instance_id.clone()),
                Cell::Text(instance.instance_type.clone()),
                Cell::Text(instance.hypervisor.clone()),
                Cell::Text(instance.virtualization_type.clone()),
                Cell::Text(instance.architecture.clone()),
                Cell::Flag(instance.ebs_optimized),
            ]),
            (LayoutKind::Attachment, Resource::Attachment(attachment)) => Ok(vec![
                Cell::Text(
                    attachment
                        .name
                        .clone()
                        .unwrap_or_else(|| attachment.attachment_id.clone()),
                ),
                Cell::Text(attachment.transit_gateway_id.clone()),
                Cell::Text(attachment.resource_type.clone()),
                Cell::Text(attachment.resource_id.clone()),
            ]),
            (LayoutKind::Generic, resource) => {
                Ok(vec![Cell::Text(resource.id().primary().to_string())])
            }
            (kind, resource) => Err(ReportError::InvalidLayout(format!(
                "{:?} layout cannot describe resource {}",
                kind,
                resource.id()
            ))),
        }
    }

    /// Identity columns followed by one reduced, rounded value per configured
    /// metric in configured order.
    pub fn assemble_row(
        &self,
        category: Category,
        resource: &Resource,
        series: &DatapointSeries,
        config: &ReportConfig,
    ) -> Result<ReportRow> {
        let metrics = config.metrics_for(category)?;
        let mut cells = self.identity_cells(resource)?;

        for metric in metrics {
            let samples = series.get(&metric.name).ok_or_else(|| {
                ReportError::InvalidLayout(format!(
                    "no samples collected for metric '{}'",
                    metric.name
                ))
            })?;
            cells.push(Cell::metric(samples, config.statistic_for(metric)));
        }

        debug_assert_eq!(cells.len(), self.column_count(metrics.len()));
        Ok(ReportRow { cells })
    }
}
