//! Resolves geo criterion ids on geo_performance records to readable regions.

use std::collections::{BTreeSet, HashMap};

use adsync_core::lookup::us_state_code;
use adsync_core::GeoPerformanceRecord;
use tracing::{debug, info};

use crate::queries::geo_target_query;
use crate::{AdapterError, ReportSource};

/// Max ids per `geo_target_constant` lookup.
pub const GEO_LOOKUP_CHUNK_SIZE: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoTarget {
    pub id: String,
    pub name: String,
    pub canonical_name: String,
    pub target_type: String,
    pub country_code: String,
}

impl GeoTarget {
    fn is_us_state(&self) -> bool {
        self.country_code == "US" && matches!(self.target_type.as_str(), "State" | "Province")
    }
}

pub struct GeoEnricher<'a> {
    source: &'a dyn ReportSource,
    chunk_size: usize,
}

impl<'a> GeoEnricher<'a> {
    pub fn new(source: &'a dyn ReportSource) -> Self {
        Self::with_chunk_size(source, GEO_LOOKUP_CHUNK_SIZE)
    }

    pub fn with_chunk_size(source: &'a dyn ReportSource, chunk_size: usize) -> Self {
        Self {
            source,
            chunk_size: chunk_size.max(1),
        }
    }

    /// Looks up `ids` in chunks; ids Google does not return are simply absent.
    pub async fn resolve(&self, ids: &[String]) -> Result<HashMap<String, GeoTarget>, AdapterError> {
        let mut targets = HashMap::with_capacity(ids.len());
        for chunk in ids.chunks(self.chunk_size) {
            debug!(ids = chunk.len(), "geo target lookup");
            let rows = self.source.search(&geo_target_query(chunk)).await?;
            for row in rows {
                let constant = row.geo_target_constant;
                if constant.id.is_empty() {
                    continue;
                }
                targets.insert(
                    constant.id.clone(),
                    GeoTarget {
                        id: constant.id,
                        name: constant.name,
                        canonical_name: constant.canonical_name,
                        target_type: constant.target_type,
                        country_code: constant.country_code,
                    },
                );
            }
        }
        Ok(targets)
    }

    pub async fn enrich(&self, records: &mut [GeoPerformanceRecord]) -> Result<(), AdapterError> {
        let pending = pending_criterion_ids(records);
        if pending.is_empty() {
            return Ok(());
        }
        let targets = self.resolve(&pending).await?;
        info!(
            requested = pending.len(),
            resolved = targets.len(),
            "geo targets resolved"
        );
        apply_geo_targets(records, &targets);
        Ok(())
    }
}

/// Distinct, sorted placeholder ids still awaiting resolution.
pub fn pending_criterion_ids(records: &[GeoPerformanceRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.state_code.as_str())
        .filter(|code| !code.is_empty() && code.bytes().all(|b| b.is_ascii_digit()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

pub fn apply_geo_targets(records: &mut [GeoPerformanceRecord], targets: &HashMap<String, GeoTarget>) {
    for record in records.iter_mut() {
        let Some(target) = targets.get(&record.state_code) else {
            continue;
        };
        if target.is_us_state() {
            record.state = target.name.clone();
            if let Some(code) = us_state_code(&target.name) {
                record.state_code = code.to_string();
            }
        } else if target.canonical_name.is_empty() {
            record.state = target.name.clone();
        } else {
            record.state = target.canonical_name.clone();
        }
        record.dma = target.target_type.clone();
    }
}
