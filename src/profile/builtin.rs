use crate::profile::profile_model::{ApplyStrategy, ProfileSpec, RuleSpec};

/// Address of the one known form.
pub const REMODEL_ESTIMATE_URL_PATTERN: &str = r"form\.jotform\.com/51527382823962";

/// Rules for the remodeling estimate JotForm. Speak things like:
///
/// ```text
/// Date: Nov 2, 2025
/// Full Name: Jane Homeowner
/// Address: 123 Main St, Irvine, CA 92618, United States
/// Phone1: 714-555-0123; Phone2: 949-555-9876; E-mail: jane@example.com
/// Electrical budget included by A Plus: Up to $5,000
/// Demolition: Cabinets, Back splash
/// ```
pub fn remodel_estimate_profile() -> ProfileSpec {
    use ApplyStrategy::*;

    let rules = [
        // Contact info
        (r"^(date|form date)$", "Date", Date),
        (r"^full\s*name$", "Full Name", FullName),
        (r"^address$", "Address", Address),
        (r"^phone\s*1$", "Phone1", Phone),
        (r"^phone\s*2$", "Phone2", Phone),
        (r"^(email|e-?mail)$", "E-mail", Text),
        // Description / year built
        (r"^general description", "GENERAL DESCRIPTION OF PROJECT", Text),
        (r"(year\s*home\s*was\s*built|year built)", "Year Home was Built", Text),
        // Electrical
        (r"^electrical budget", "Electrical budget included by A Plus", Choice),
        (r"^electrical details?", "Electrical Details", Text),
        // Demolition & appliances
        (r"^demolition$", "Demolition:", MultiChoice),
        (r"^appliances to keep$", "Appliances to keep", MultiChoice),
        // Prep, rentals, dumpsters
        (r"^prep work$", "Prep Work:", MultiChoice),
        (r"^rental equipment$", "RENTAL EQUIPMENT", MultiChoice),
        (r"^other rental equipment$", "Other Rental Equipment", Text),
        (r"^initial dumpster$", "INITIAL DUMPSTER", Text),
        (r"^dumpster cont'?d$", "Dumpster Cont'd", Choice),
    ];

    ProfileSpec {
        name: "remodel-estimate".to_string(),
        url_pattern: REMODEL_ESTIMATE_URL_PATTERN.to_string(),
        rules: rules
            .into_iter()
            .map(|(key_pattern, label_contains, strategy)| RuleSpec {
                key_pattern: key_pattern.to_string(),
                label_contains: label_contains.to_string(),
                strategy,
            })
            .collect(),
    }
}
