//! Overpass QL for the emission-source tag filters.

use std::fmt::Write;

use envimap_common::Coordinate;

/// Tag filters queried around the area center, grouped the way the
/// classifier groups them. `None` matches any value of the key.
pub const EMISSION_SOURCE_FILTERS: &[(&str, Option<&str>)] = &[
    // Industrial & manufacturing
    ("industrial", Some("oil")),
    ("industrial", Some("gas")),
    ("industrial", Some("gas_plant")),
    ("industrial", Some("refinery")),
    ("man_made", Some("works")),
    ("man_made", Some("chimney")),
    // Power generation
    ("power", Some("plant")),
    ("plant:source", None),
    ("power", Some("substation")),
    // Fossil fuel extraction & storage
    ("man_made", Some("oil_well")),
    ("man_made", Some("gas_well")),
    ("man_made", Some("storage_tank")),
    ("landuse", Some("quarry")),
    ("landuse", Some("mine")),
    // Transportation
    ("aeroway", Some("aerodrome")),
    ("railway", Some("yard")),
    ("amenity", Some("bus_station")),
    ("amenity", Some("fuel")),
    // Waste
    ("landuse", Some("landfill")),
    ("man_made", Some("wastewater_plant")),
    ("man_made", Some("waste_transfer_station")),
    ("amenity", Some("recycling")),
];

pub const DEFAULT_RADIUS_M: u32 = 5000;
pub const DEFAULT_TIMEOUT_S: u32 = 300;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureQuery {
    pub center: Coordinate,
    pub radius_m: u32,
    pub timeout_s: u32,
}

impl FeatureQuery {
    pub fn around(center: Coordinate) -> Self {
        Self {
            center,
            radius_m: DEFAULT_RADIUS_M,
            timeout_s: DEFAULT_TIMEOUT_S,
        }
    }

    pub fn radius_m(mut self, radius_m: u32) -> Self {
        self.radius_m = radius_m;
        self
    }

    /// Render as an Overpass QL union returning way/relation centers.
    pub fn to_ql(&self) -> String {
        let around = format!(
            "(around:{},{},{})",
            self.radius_m, self.center.lat, self.center.lon
        );

        let mut ql = format!("[out:json][timeout:{}];\n(\n", self.timeout_s);
        for (key, value) in EMISSION_SOURCE_FILTERS {
            let _ = match value {
                Some(value) => writeln!(ql, "  nwr[\"{key}\"=\"{value}\"]{around};"),
                None => writeln!(ql, "  nwr[\"{key}\"]{around};"),
            };
        }
        ql.push_str(");\nout center;\n");
        ql
    }
}
