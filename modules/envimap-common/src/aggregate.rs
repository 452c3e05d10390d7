//! The aggregation pipeline: raw features in, buckets, GeoJSON and pie chart out.
//!
//! Runs in two phases so the caller can ask the model for annotations between
//! them:
//!
//! 1. [`bucket_features`] classifies every feature with a coordinate and groups
//!    the resulting records by category.
//! 2. [`render_area`] maps each record to its super-category, counts it,
//!    resolves its pollutants against the annotations and emits a point feature
//!    after the boundary.
//!
//! [`aggregate`] runs both back to back.

use tracing::debug;

use crate::annotation::{resolve_pollutants, AnnotationRequest, Annotations};
use crate::classify::classify;
use crate::geojson::{Boundary, Feature, FeatureCollection, PoiProperties};
use crate::lexicon::concerns_for;
use crate::super_category::{super_category_of, PieSlice, SuperCategoryCounts};
use crate::types::{CategoryBuckets, PoiRecord, RawFeature};

/// Classify features and group them by category, preserving discovery order.
///
/// Features without a coordinate or matching no rule are dropped.
pub fn bucket_features(features: &[RawFeature]) -> CategoryBuckets {
    let mut buckets = CategoryBuckets::new();
    let mut missing_coordinate = 0usize;
    let mut unclassified = 0usize;

    for feature in features {
        let Some(coordinate) = feature.coordinate else {
            missing_coordinate += 1;
            continue;
        };
        let Some(category) = classify(&feature.tags) else {
            unclassified += 1;
            continue;
        };
        let record = PoiRecord::from_feature(feature, coordinate, &category);
        buckets.push(category, record);
    }

    debug!(
        features = features.len(),
        classified = buckets.total(),
        categories = buckets.categories().len(),
        missing_coordinate,
        unclassified,
        "Bucketed features"
    );

    buckets
}

impl CategoryBuckets {
    /// Every record as an annotation request, bucket by bucket.
    pub fn annotation_requests(&self) -> Vec<AnnotationRequest> {
        self.records()
            .map(|(category, record)| AnnotationRequest::new(category, record))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedArea {
    pub geojson: FeatureCollection,
    pub counts: SuperCategoryCounts,
    pub pie_chart: Vec<PieSlice>,
}

/// Build the boundary, the point features and the super-category tallies.
pub fn render_area(
    buckets: &CategoryBuckets,
    annotations: &Annotations,
    boundary: &Boundary,
) -> RenderedArea {
    let mut counts = SuperCategoryCounts::new();
    let mut features = Vec::with_capacity(buckets.total() + 1);
    features.push(boundary.feature());

    for (category, record) in buckets.records() {
        let sc = super_category_of(category.as_str());
        counts.increment(sc);

        let name = if record.raw_name.is_empty() {
            category.as_str().to_string()
        } else {
            record.raw_name.clone()
        };

        let properties = PoiProperties {
            category: category.as_str().to_string(),
            super_category: sc.key().to_string(),
            super_category_name: sc.display_name().to_string(),
            name,
            display_name: record.display_name.clone(),
            color: sc.color().to_string(),
            pollutants: resolve_pollutants(&record.coordinate, category.as_str(), annotations),
            primary_concerns: concerns_for(category.as_str()),
            address: record.address.clone(),
            operator: record.operator.clone(),
            description: record.description.clone(),
            tags: record.raw_tags.clone(),
        };
        features.push(Feature::point(&record.coordinate, properties));
    }

    RenderedArea {
        geojson: FeatureCollection::new(features),
        pie_chart: counts.pie_chart(),
        counts,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AreaAggregate {
    pub buckets: CategoryBuckets,
    pub geojson: FeatureCollection,
    pub counts: SuperCategoryCounts,
    pub pie_chart: Vec<PieSlice>,
}

/// Full pipeline over an already-known set of annotations.
pub fn aggregate(
    features: &[RawFeature],
    annotations: &Annotations,
    boundary: &Boundary,
) -> AreaAggregate {
    let buckets = bucket_features(features);
    let RenderedArea {
        geojson,
        counts,
        pie_chart,
    } = render_area(&buckets, annotations, boundary);

    AreaAggregate {
        buckets,
        geojson,
        counts,
        pie_chart,
    }
}
