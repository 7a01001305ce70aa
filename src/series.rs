//! Series classifier — first-fit grouping of one batch of search results.
//!
//! Two independent groupings are built per batch: records that are the same
//! CKAN package, and same-site records whose titles differ only by era,
//! year or bracketed annotations.

use std::collections::HashMap;

use tracing::debug;

use crate::config::SeriesConfig;
use crate::distance::within_threshold;
use crate::error::Result;
use crate::record::Dataset;
use crate::segment::Segments;

/// A record prepared for comparison: hostname and segmented title are
/// computed once per batch.
#[derive(Debug, Clone)]
pub struct Candidate<'a> {
    pub record: &'a Dataset,
    pub host: Option<String>,
    pub segments: Segments,
}

impl<'a> Candidate<'a> {
    pub fn new(record: &'a Dataset, config: &SeriesConfig) -> Result<Self> {
        Ok(Self {
            record,
            host: record.site_hostname(),
            segments: config.rules.segment(&record.xckan_title)?,
        })
    }
}

/// Accumulator of one group; the first entry is the representative.
pub trait DatasetSeries<'a> {
    /// Add `candidate` to the series if it belongs to it.
    fn accept(&mut self, candidate: &Candidate<'a>) -> bool;

    fn entries(&self) -> &[&'a Dataset];

    fn into_entries(self) -> Vec<&'a Dataset>;
}

/// Records with the same non-empty package id and name.
#[derive(Debug, Clone)]
pub struct SameSeries<'a> {
    entries: Vec<&'a Dataset>,
}

impl<'a> SameSeries<'a> {
    pub fn new(candidate: &Candidate<'a>) -> Self {
        Self {
            entries: vec![candidate.record],
        }
    }
}

impl<'a> DatasetSeries<'a> for SameSeries<'a> {
    fn accept(&mut self, candidate: &Candidate<'a>) -> bool {
        let ok = match (self.entries[0].package_key(), candidate.record.package_key()) {
            (Some(rep), Some(other)) => rep == other,
            _ => false,
        };
        if ok {
            self.entries.push(candidate.record);
        }
        ok
    }

    fn entries(&self) -> &[&'a Dataset] {
        &self.entries
    }

    fn into_entries(self) -> Vec<&'a Dataset> {
        self.entries
    }
}

/// Same-host records whose titles are within the similarity threshold of
/// the representative's title.
#[derive(Debug, Clone)]
pub struct SimilarSeries<'a> {
    host: Option<String>,
    segments: Segments,
    threshold: usize,
    entries: Vec<&'a Dataset>,
}

impl<'a> SimilarSeries<'a> {
    pub fn new(candidate: &Candidate<'a>, threshold: usize) -> Self {
        Self {
            host: candidate.host.clone(),
            segments: candidate.segments.clone(),
            threshold,
            entries: vec![candidate.record],
        }
    }
}

impl<'a> DatasetSeries<'a> for SimilarSeries<'a> {
    fn accept(&mut self, candidate: &Candidate<'a>) -> bool {
        // Records without a parsable site URL only ever form their own series.
        let same_host = matches!((&self.host, &candidate.host), (Some(h), Some(o)) if h == o);
        if !same_host {
            return false;
        }
        let ok = within_threshold(&self.segments, &candidate.segments, self.threshold).within;
        if ok {
            self.entries.push(candidate.record);
        }
        ok
    }

    fn entries(&self) -> &[&'a Dataset] {
        &self.entries
    }

    fn into_entries(self) -> Vec<&'a Dataset> {
        self.entries
    }
}

/// Add `candidate` to the first series that accepts it, or open a new one.
fn place<'a, S, F>(series: &mut Vec<S>, candidate: &Candidate<'a>, open: F)
where
    S: DatasetSeries<'a>,
    F: FnOnce(&Candidate<'a>) -> S,
{
    if !series.iter_mut().any(|s| s.accept(candidate)) {
        series.push(open(candidate));
    }
}

/// Groupings of one search result batch.
#[derive(Debug, Clone, Default)]
pub struct SeriesBatch<'a> {
    /// Groups of the same package, in first-seen order.
    pub same_series: Vec<Vec<&'a Dataset>>,
    /// Groups of similar titles from one site, in first-seen order.
    pub similar_series: Vec<Vec<&'a Dataset>>,
    by_id: HashMap<&'a str, &'a Dataset>,
}

impl<'a> SeriesBatch<'a> {
    /// Record of the batch with the given `xckan_id`.
    pub fn get(&self, xckan_id: &str) -> Option<&'a Dataset> {
        self.by_id.get(xckan_id).copied()
    }
}

/// Group `records` into same-package and similar-title series.
///
/// Both passes are first-fit in creation order: a record joins the first
/// series that accepts it even if a later one would match more closely.
pub fn classify<'a>(records: &'a [Dataset], config: &SeriesConfig) -> Result<SeriesBatch<'a>> {
    let mut by_id = HashMap::with_capacity(records.len());
    let mut same: Vec<SameSeries<'a>> = Vec::new();
    let mut similar: Vec<SimilarSeries<'a>> = Vec::new();

    for record in records {
        by_id.insert(record.xckan_id.as_str(), record);

        let candidate = Candidate::new(record, config)?;
        place(&mut same, &candidate, SameSeries::new);
        place(&mut similar, &candidate, |c| {
            SimilarSeries::new(c, config.similarity_threshold)
        });
    }

    debug!(
        records = records.len(),
        same_series = same.len(),
        similar_series = similar.len(),
        "classified search results"
    );

    Ok(SeriesBatch {
        same_series: same.into_iter().map(|s| s.into_entries()).collect(),
        similar_series: similar.into_iter().map(|s| s.into_entries()).collect(),
        by_id,
    })
}
