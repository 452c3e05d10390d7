//! Emission-source classification of raw tagged features.
//!
//! The rule table is evaluated top to bottom and the first matching rule wins.
//! Its order is the tie-break for features carrying several recognized tags
//! (an `industrial` tag beats a `power` tag, and so on), so entries must not be
//! reordered.

use tracing::debug;

use crate::types::{Category, Tags};

/// Condition a rule checks against a feature's tags.
#[derive(Debug, Clone, Copy)]
pub enum Predicate {
    /// The key is present, whatever its value.
    HasKey(&'static str),
    /// The key is present and its value is one of the listed values.
    KeyIn(&'static str, &'static [&'static str]),
}

impl Predicate {
    fn matches(&self, tags: &Tags) -> bool {
        match self {
            Predicate::HasKey(key) => tags.contains_key(*key),
            Predicate::KeyIn(key, values) => tags
                .get(*key)
                .is_some_and(|value| values.contains(&value.as_str())),
        }
    }
}

/// How a matching rule names the category.
#[derive(Debug, Clone, Copy)]
pub enum CategoryBuilder {
    /// `<prefix><value of key>`.
    Prefixed {
        prefix: &'static str,
        key: &'static str,
    },
    Fixed(&'static str),
}

impl CategoryBuilder {
    fn build(&self, tags: &Tags) -> Category {
        match self {
            CategoryBuilder::Prefixed { prefix, key } => {
                let value = tags.get(*key).map(String::as_str).unwrap_or_default();
                Category::new(format!("{prefix}{value}"))
            }
            CategoryBuilder::Fixed(category) => Category::new(*category),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub when: Predicate,
    pub then: CategoryBuilder,
}

impl Rule {
    pub fn apply(&self, tags: &Tags) -> Option<Category> {
        self.when.matches(tags).then(|| self.then.build(tags))
    }
}

const fn prefixed(prefix: &'static str, key: &'static str) -> CategoryBuilder {
    CategoryBuilder::Prefixed { prefix, key }
}

pub static RULES: &[Rule] = &[
    // Industrial & manufacturing
    Rule {
        name: "industrial",
        when: Predicate::HasKey("industrial"),
        then: prefixed("industrial_", "industrial"),
    },
    Rule {
        name: "industrial_landuse",
        when: Predicate::KeyIn("landuse", &["industrial"]),
        then: CategoryBuilder::Fixed("industrial_area"),
    },
    Rule {
        name: "industrial_man_made",
        when: Predicate::KeyIn("man_made", &["works", "chimney"]),
        then: prefixed("industrial_", "man_made"),
    },
    // Power generation
    Rule {
        name: "power",
        when: Predicate::HasKey("power"),
        then: prefixed("power_", "power"),
    },
    Rule {
        name: "plant_source",
        when: Predicate::HasKey("plant:source"),
        then: prefixed("power_plant_", "plant:source"),
    },
    // Fossil fuel extraction & storage
    Rule {
        name: "fossil_fuel_man_made",
        when: Predicate::KeyIn("man_made", &["oil_well", "gas_well", "storage_tank"]),
        then: prefixed("fossil_fuel_", "man_made"),
    },
    Rule {
        name: "extraction_landuse",
        when: Predicate::KeyIn("landuse", &["quarry", "mine"]),
        then: prefixed("extraction_", "landuse"),
    },
    // Transportation
    Rule {
        name: "aeroway",
        when: Predicate::HasKey("aeroway"),
        then: prefixed("transport_", "aeroway"),
    },
    Rule {
        name: "railway_yard",
        when: Predicate::KeyIn("railway", &["yard"]),
        then: CategoryBuilder::Fixed("transport_railway_yard"),
    },
    Rule {
        name: "transport_amenity",
        when: Predicate::KeyIn("amenity", &["bus_station", "parking"]),
        then: prefixed("transport_", "amenity"),
    },
    Rule {
        name: "fuel_station",
        when: Predicate::KeyIn("amenity", &["fuel"]),
        then: CategoryBuilder::Fixed("transport_fuel"),
    },
    // Waste
    Rule {
        name: "landfill",
        when: Predicate::KeyIn("landuse", &["landfill"]),
        then: CategoryBuilder::Fixed("waste_landfill"),
    },
    Rule {
        name: "waste_man_made",
        when: Predicate::KeyIn("man_made", &["wastewater_plant", "waste_transfer_station"]),
        then: prefixed("waste_", "man_made"),
    },
    Rule {
        name: "recycling",
        when: Predicate::KeyIn("amenity", &["recycling"]),
        then: CategoryBuilder::Fixed("waste_recycling"),
    },
];

/// First rule in [`RULES`] whose predicate matches `tags`.
pub fn matching_rule(tags: &Tags) -> Option<&'static Rule> {
    RULES.iter().find(|rule| rule.when.matches(tags))
}

/// Emission-source category for a feature, or `None` when it is irrelevant.
pub fn classify(tags: &Tags) -> Option<Category> {
    let rule = matching_rule(tags)?;
    let category = rule.then.build(tags);
    debug!(rule = rule.name, category = %category, "Classified feature");
    Some(category)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(pairs: &[(&str, &str)]) -> Tags {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn category(pairs: &[(&str, &str)]) -> Option<String> {
        classify(&tags(pairs)).map(|c| c.as_str().to_string())
    }

    #[test]
    fn empty_tags_are_unclassified() {
        assert_eq!(category(&[]), None);
    }

    #[test]
    fn unrecognized_tags_are_unclassified() {
        assert_eq!(category(&[("shop", "bakery")]), None);
        assert_eq!(category(&[("name", "Corner Cafe"), ("amenity", "cafe")]), None);
        assert_eq!(category(&[("landuse", "residential")]), None);
        assert_eq!(category(&[("man_made", "tower")]), None);
        assert_eq!(category(&[("railway", "station")]), None);
    }

    #[test]
    fn interpolates_tag_values() {
        assert_eq!(category(&[("industrial", "oil")]).as_deref(), Some("industrial_oil"));
        assert_eq!(category(&[("industrial", "chimney")]).as_deref(), Some("industrial_chimney"));
        assert_eq!(category(&[("power", "plant")]).as_deref(), Some("power_plant"));
        assert_eq!(
            category(&[("plant:source", "coal")]).as_deref(),
            Some("power_plant_coal")
        );
        assert_eq!(category(&[("aeroway", "aerodrome")]).as_deref(), Some("transport_aerodrome"));
    }

    #[test]
    fn fixed_categories() {
        assert_eq!(category(&[("landuse", "industrial")]).as_deref(), Some("industrial_area"));
        assert_eq!(category(&[("railway", "yard")]).as_deref(), Some("transport_railway_yard"));
        assert_eq!(category(&[("amenity", "fuel")]).as_deref(), Some("transport_fuel"));
        assert_eq!(category(&[("landuse", "landfill")]).as_deref(), Some("waste_landfill"));
        assert_eq!(category(&[("amenity", "recycling")]).as_deref(), Some("waste_recycling"));
    }

    #[test]
    fn man_made_routes_by_value() {
        assert_eq!(category(&[("man_made", "works")]).as_deref(), Some("industrial_works"));
        assert_eq!(
            category(&[("man_made", "storage_tank")]).as_deref(),
            Some("fossil_fuel_storage_tank")
        );
        assert_eq!(
            category(&[("man_made", "wastewater_plant")]).as_deref(),
            Some("waste_wastewater_plant")
        );
    }

    #[test]
    fn industrial_tag_beats_power_tag() {
        assert_eq!(
            category(&[("power", "plant"), ("industrial", "gas")]).as_deref(),
            Some("industrial_gas")
        );
    }

    #[test]
    fn industrial_landuse_beats_power() {
        assert_eq!(
            category(&[("power", "substation"), ("landuse", "industrial")]).as_deref(),
            Some("industrial_area")
        );
    }

    #[test]
    fn power_beats_plant_source() {
        assert_eq!(
            category(&[("plant:source", "gas"), ("power", "plant")]).as_deref(),
            Some("power_plant")
        );
    }

    #[test]
    fn aeroway_beats_fuel_amenity() {
        assert_eq!(
            category(&[("amenity", "fuel"), ("aeroway", "fuel")]).as_deref(),
            Some("transport_fuel")
        );
        assert_eq!(matching_rule(&tags(&[("amenity", "fuel"), ("aeroway", "apron")])).unwrap().name, "aeroway");
    }

    #[test]
    fn present_but_empty_key_still_matches() {
        assert_eq!(category(&[("industrial", "")]).as_deref(), Some("industrial_"));
    }

    #[test]
    fn rule_names_are_unique() {
        let mut names: Vec<&str> = RULES.iter().map(|r| r.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), RULES.len());
    }

    #[test]
    fn apply_agrees_with_classify() {
        let t = tags(&[("landuse", "quarry")]);
        let rule = matching_rule(&t).unwrap();
        assert_eq!(rule.apply(&t), classify(&t));
    }
}
