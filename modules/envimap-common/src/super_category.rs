//! Coarse display groupings for emission-source categories.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuperCategory {
    Industrial,
    Power,
    FossilFuel,
    FuelStation,
    Transportation,
    Waste,
    Other,
}

impl SuperCategory {
    /// Declaration order. Mapping and pie-chart output both follow it.
    pub const ALL: [SuperCategory; 7] = [
        SuperCategory::Industrial,
        SuperCategory::Power,
        SuperCategory::FossilFuel,
        SuperCategory::FuelStation,
        SuperCategory::Transportation,
        SuperCategory::Waste,
        SuperCategory::Other,
    ];

    pub fn key(self) -> &'static str {
        match self {
            SuperCategory::Industrial => "industrial",
            SuperCategory::Power => "power",
            SuperCategory::FossilFuel => "fossil_fuel",
            SuperCategory::FuelStation => "fuel_station",
            SuperCategory::Transportation => "transportation",
            SuperCategory::Waste => "waste",
            SuperCategory::Other => "other",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            SuperCategory::Industrial => "Industrial & Manufacturing",
            SuperCategory::Power => "Power Generation",
            SuperCategory::FossilFuel => "Fossil Fuel Extraction & Storage",
            SuperCategory::FuelStation => "Fuel Stations",
            SuperCategory::Transportation => "Transportation & Vehicle Emissions",
            SuperCategory::Waste => "Waste Processing & Landfills",
            SuperCategory::Other => "Other Emission Sources",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            SuperCategory::Industrial => "#FF4136",
            SuperCategory::Power => "#FFDC00",
            SuperCategory::FossilFuel => "#0074D9",
            SuperCategory::FuelStation => "#FB8C00",
            SuperCategory::Transportation => "#2ECC40",
            SuperCategory::Waste => "#B10DC9",
            SuperCategory::Other => "#111111",
        }
    }

    /// Substrings that place a category in this group. `Other` has none.
    pub fn patterns(self) -> &'static [&'static str] {
        match self {
            SuperCategory::Industrial => &[
                "industrial_",
                "landuse=industrial",
                "man_made=works",
                "man_made=chimney",
            ],
            SuperCategory::Power => &["power_"],
            SuperCategory::FossilFuel => &["fossil_fuel_", "extraction_"],
            SuperCategory::FuelStation => &["transport_fuel"],
            SuperCategory::Transportation => &["transport_"],
            SuperCategory::Waste => &["waste_"],
            SuperCategory::Other => &[],
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// First super-category with a pattern contained in `category`, else `Other`.
pub fn super_category_of(category: &str) -> SuperCategory {
    let lower = category.to_lowercase();
    SuperCategory::ALL
        .into_iter()
        .find(|sc| sc.patterns().iter().any(|pattern| lower.contains(pattern)))
        .unwrap_or(SuperCategory::Other)
}

/// Display metadata for one super-category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuperCategoryInfo {
    pub key: SuperCategory,
    pub display_name: &'static str,
    pub color: &'static str,
}

impl From<SuperCategory> for SuperCategoryInfo {
    fn from(sc: SuperCategory) -> Self {
        Self {
            key: sc,
            display_name: sc.display_name(),
            color: sc.color(),
        }
    }
}

/// The full display table in declaration order.
pub fn display_table() -> Vec<SuperCategoryInfo> {
    SuperCategory::ALL.into_iter().map(Into::into).collect()
}

// =============================================================================
// Counts & pie chart
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieSlice {
    pub name: String,
    pub value: usize,
    pub color: String,
}

/// Per-super-category POI counts, all starting at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SuperCategoryCounts([usize; SuperCategory::ALL.len()]);

impl SuperCategoryCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, sc: SuperCategory) {
        self.0[sc.index()] += 1;
    }

    pub fn get(&self, sc: SuperCategory) -> usize {
        self.0[sc.index()]
    }

    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }

    /// Non-zero counts in declaration order.
    pub fn pie_chart(&self) -> Vec<PieSlice> {
        SuperCategory::ALL
            .into_iter()
            .filter(|sc| self.get(*sc) > 0)
            .map(|sc| PieSlice {
                name: sc.display_name().to_string(),
                value: self.get(sc),
                color: sc.color().to_string(),
            })
            .collect()
    }
}

impl Serialize for SuperCategoryCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(SuperCategory::ALL.len()))?;
        for sc in SuperCategory::ALL {
            map.serialize_entry(sc.key(), &self.get(sc))?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_by_leading_pattern() {
        assert_eq!(super_category_of("industrial_oil"), SuperCategory::Industrial);
        assert_eq!(super_category_of("industrial_chimney"), SuperCategory::Industrial);
        assert_eq!(super_category_of("industrial_area"), SuperCategory::Industrial);
        assert_eq!(super_category_of("power_substation"), SuperCategory::Power);
        assert_eq!(super_category_of("power_plant_solar"), SuperCategory::Power);
        assert_eq!(super_category_of("fossil_fuel_oil_well"), SuperCategory::FossilFuel);
        assert_eq!(super_category_of("extraction_quarry"), SuperCategory::FossilFuel);
        assert_eq!(super_category_of("transport_aerodrome"), SuperCategory::Transportation);
        assert_eq!(super_category_of("waste_recycling"), SuperCategory::Waste);
    }

    #[test]
    fn fuel_station_is_checked_before_transportation() {
        assert_eq!(super_category_of("transport_fuel"), SuperCategory::FuelStation);
        assert_eq!(super_category_of("transport_bus_station"), SuperCategory::Transportation);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(super_category_of("Industrial_Oil"), SuperCategory::Industrial);
        assert_eq!(super_category_of("WASTE_LANDFILL"), SuperCategory::Waste);
    }

    #[test]
    fn unmatched_categories_fall_to_other() {
        assert_eq!(super_category_of(""), SuperCategory::Other);
        assert_eq!(super_category_of("bakery"), SuperCategory::Other);
        assert_eq!(super_category_of("powerhouse"), SuperCategory::Other);
    }

    #[test]
    fn counts_start_at_zero_and_serialize_every_key() {
        let counts = SuperCategoryCounts::new();
        assert_eq!(counts.total(), 0);
        let value = serde_json::to_value(counts).unwrap();
        assert_eq!(value.as_object().unwrap().len(), 7);
        assert_eq!(value["fuel_station"], 0);
    }

    #[test]
    fn pie_chart_skips_empty_slices_in_declared_order() {
        let mut counts = SuperCategoryCounts::new();
        counts.increment(SuperCategory::Waste);
        counts.increment(SuperCategory::Industrial);
        counts.increment(SuperCategory::Waste);

        let pie = counts.pie_chart();
        assert_eq!(pie.len(), 2);
        assert_eq!(pie[0].name, "Industrial & Manufacturing");
        assert_eq!(pie[0].value, 1);
        assert_eq!(pie[0].color, "#FF4136");
        assert_eq!(pie[1].name, "Waste Processing & Landfills");
        assert_eq!(pie[1].value, 2);
        assert_eq!(pie.iter().map(|s| s.value).sum::<usize>(), counts.total());
    }

    #[test]
    fn display_table_follows_declaration_order() {
        let table = display_table();
        let keys: Vec<&str> = table.iter().map(|info| info.key.key()).collect();
        assert_eq!(
            keys,
            vec!["industrial", "power", "fossil_fuel", "fuel_station", "transportation", "waste", "other"]
        );
    }
}
