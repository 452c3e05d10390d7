pub mod aggregate;
pub mod annotation;
pub mod classify;
pub mod config;
pub mod error;
pub mod geojson;
pub mod lexicon;
pub mod super_category;
pub mod types;

pub use aggregate::{aggregate, bucket_features, render_area, AreaAggregate, RenderedArea};
pub use annotation::{
    resolve_pollutants, AnnotatedPollutants, AnnotationRequest, Annotations,
    ANNOTATION_BATCH_LIMIT,
};
pub use classify::{classify, matching_rule, Rule, RULES};
pub use config::Config;
pub use error::EnviMapError;
pub use geojson::{
    Boundary, Feature, FeatureCollection, FeatureProperties, Geometry, PoiProperties,
};
pub use lexicon::{concerns_for, pollutants_for};
pub use super_category::{
    display_table, super_category_of, PieSlice, SuperCategory, SuperCategoryCounts,
    SuperCategoryInfo,
};
pub use types::*;
