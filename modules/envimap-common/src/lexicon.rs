//! Default pollutant and concern profiles per emission-source category.
//!
//! Used whenever the model cannot supply a per-point annotation.

struct LexiconRule {
    keywords: &'static [&'static str],
    pollutants: &'static [&'static str],
    concerns: &'static [&'static str],
}

static LEXICON: &[LexiconRule] = &[
    LexiconRule {
        keywords: &["industrial", "factory", "works"],
        pollutants: &["PM2.5", "NOx", "SO2"],
        concerns: &["Air pollution", "Chemical exposure", "Soil contamination"],
    },
    LexiconRule {
        keywords: &["power", "plant", "generator"],
        pollutants: &["CO2", "NOx", "SO2"],
        concerns: &[
            "Greenhouse gas emissions",
            "Air quality impact",
            "Resource depletion",
        ],
    },
    LexiconRule {
        keywords: &["oil", "gas", "petroleum", "mine", "quarry"],
        pollutants: &["VOCs", "Methane", "Benzene"],
        concerns: &["Air toxics", "Groundwater contamination", "Soil pollution"],
    },
    LexiconRule {
        keywords: &["waste", "landfill", "sewage"],
        pollutants: &["Methane", "H2S", "VOCs"],
        concerns: &["Odor issues", "Groundwater leaching", "Methane emissions"],
    },
    LexiconRule {
        keywords: &["transport", "bus", "railway", "aeroway", "fuel"],
        pollutants: &["NOx", "PM10", "CO"],
        concerns: &["Air pollution", "Noise pollution", "Fuel consumption"],
    },
];

static DEFAULT_RULE: LexiconRule = LexiconRule {
    keywords: &[],
    pollutants: &["CO2", "PM2.5"],
    concerns: &[
        "Environmental impact",
        "Resource consumption",
        "Waste generation",
    ],
};

fn rule_for(category: &str) -> &'static LexiconRule {
    let lower = category.to_lowercase();
    LEXICON
        .iter()
        .find(|rule| rule.keywords.iter().any(|kw| lower.contains(kw)))
        .unwrap_or(&DEFAULT_RULE)
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Likely pollutants for a category. Never empty.
pub fn pollutants_for(category: &str) -> Vec<String> {
    owned(rule_for(category).pollutants)
}

/// Likely environmental concerns for a category. Never empty.
pub fn concerns_for(category: &str) -> Vec<String> {
    owned(rule_for(category).concerns)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn industrial_profile() {
        assert_eq!(pollutants_for("industrial_oil"), vec!["PM2.5", "NOx", "SO2"]);
        assert_eq!(pollutants_for("industrial_works"), vec!["PM2.5", "NOx", "SO2"]);
    }

    #[test]
    fn power_profile() {
        assert_eq!(pollutants_for("power_substation"), vec!["CO2", "NOx", "SO2"]);
        assert_eq!(
            concerns_for("power_plant"),
            vec!["Greenhouse gas emissions", "Air quality impact", "Resource depletion"]
        );
    }

    #[test]
    fn earlier_rules_win_on_overlap() {
        // "power_plant_gas" holds both "power" and "gas".
        assert_eq!(pollutants_for("power_plant_gas"), vec!["CO2", "NOx", "SO2"]);
        // "waste_wastewater_plant" holds "plant" before reaching the waste rule.
        assert_eq!(pollutants_for("waste_wastewater_plant"), vec!["CO2", "NOx", "SO2"]);
    }

    #[test]
    fn fossil_fuel_profile() {
        assert_eq!(pollutants_for("fossil_fuel_oil_well"), vec!["VOCs", "Methane", "Benzene"]);
        assert_eq!(pollutants_for("extraction_quarry"), vec!["VOCs", "Methane", "Benzene"]);
    }

    #[test]
    fn waste_profile() {
        assert_eq!(pollutants_for("waste_landfill"), vec!["Methane", "H2S", "VOCs"]);
        assert_eq!(
            concerns_for("waste_recycling"),
            vec!["Odor issues", "Groundwater leaching", "Methane emissions"]
        );
    }

    #[test]
    fn transport_profile() {
        assert_eq!(pollutants_for("transport_fuel"), vec!["NOx", "PM10", "CO"]);
        assert_eq!(pollutants_for("transport_railway_yard"), vec!["NOx", "PM10", "CO"]);
    }

    #[test]
    fn default_profile() {
        assert_eq!(pollutants_for("bakery"), vec!["CO2", "PM2.5"]);
        assert_eq!(pollutants_for(""), vec!["CO2", "PM2.5"]);
        assert_eq!(
            concerns_for("bakery"),
            vec!["Environmental impact", "Resource consumption", "Waste generation"]
        );
    }

    #[test]
    fn case_insensitive_and_deterministic() {
        assert_eq!(pollutants_for("INDUSTRIAL_OIL"), pollutants_for("industrial_oil"));
        assert_eq!(pollutants_for("transport_fuel"), pollutants_for("transport_fuel"));
    }
}
