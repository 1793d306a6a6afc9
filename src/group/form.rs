//! Parsing of submitted form values

/// Keys understood by [super::GroupEditState::apply_form]
pub const FIELDS: &[&str] = &[
    "enabled",
    "color",
    "alpha",
    "darkness",
    "vision",
    "animation.type",
    "animation.speed",
    "animation.intensity",
    "animation.reverse",
];

/// Parse a number, NaN if the value is not a number
pub fn parse_number(value: &str) -> f64 {
    value.trim().parse().unwrap_or(f64::NAN)
}

/// Parse a checkbox value
pub fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "on" | "1" | "yes"
    )
}
