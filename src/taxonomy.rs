//! Static theme/subtheme taxonomy.
//!
//! Five fixed themes, each with an ordered list of subtheme labels. The
//! inverse subtheme → theme map is derived once; subthemes that appear under
//! several themes (the plain `"General"` entry) resolve to the last theme in
//! table order, which is fixed here so the mapping stays deterministic.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::text::is_meaningful;

/// Catch-all theme for subtheme labels missing from the table.
pub const DEFAULT_THEME: &str = "User Experience & Sentiment";

/// Theme names with their ordered subtheme labels.
pub const TAXONOMY: &[(&str, &[&str])] = &[
    (
        "User Experience & Sentiment",
        &[
            "Ease of Use",
            "Navigation",
            "UI Clarity",
            "Onboarding",
            "Overall Satisfaction",
            "Accessibility",
            "Help & Guidance",
            "General",
            "General_UX",
        ],
    ),
    (
        "Technical Performance",
        &[
            "App Speed",
            "Loading Time",
            "Crashes / Freezes",
            "Errors / Bugs",
            "Connectivity / Network",
            "Stability",
            "General",
            "General_Technical",
        ],
    ),
    (
        "Content & Services",
        &[
            "Appointment Booking",
            "Results Delivery",
            "Reports / Documents",
            "Prescriptions",
            "Records / Vaccination",
            "Teleconsultation",
            "General",
            "General_Content",
        ],
    ),
    (
        "Security & Support",
        &[
            "Login / OTP",
            "Password Reset",
            "Account Verification",
            "Privacy / Permissions",
            "Support Responsiveness",
            "Account Access Issues",
            "General",
            "General_Security",
        ],
    ),
    (
        "Suggestions & UI Design",
        &[
            "Feature Request – Dark Mode",
            "Notifications & Reminders",
            "Layout Improvements",
            "Customization",
            "Language Options",
            "Accessibility Enhancements",
            "General",
            "General_Suggestions",
        ],
    ),
];

fn subtheme_to_theme() -> &'static HashMap<&'static str, &'static str> {
    static MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    MAP.get_or_init(|| {
        let mut map = HashMap::new();
        for (theme, subthemes) in TAXONOMY {
            for subtheme in *subthemes {
                map.insert(*subtheme, *theme);
            }
        }
        map
    })
}

/// Look up the theme for a subtheme label.
///
/// Returns `None` when the label is not meaningful text. Labels missing from
/// the taxonomy map to [`DEFAULT_THEME`] rather than an error, so upstream
/// model drift never aborts a run.
pub fn derive_theme(subtheme: &str) -> Option<&'static str> {
    if !is_meaningful(subtheme) {
        return None;
    }
    Some(
        subtheme_to_theme()
            .get(subtheme.trim())
            .copied()
            .unwrap_or(DEFAULT_THEME),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_subthemes() {
        assert_eq!(derive_theme("Login / OTP"), Some("Security & Support"));
        assert_eq!(derive_theme("App Speed"), Some("Technical Performance"));
        assert_eq!(derive_theme("  Navigation  "), Some("User Experience & Sentiment"));
    }

    #[test]
    fn unknown_subthemes_use_default_theme() {
        assert_eq!(derive_theme("Totally Novel Label"), Some(DEFAULT_THEME));
    }

    #[test]
    fn meaningless_labels_have_no_theme() {
        assert_eq!(derive_theme(""), None);
        assert_eq!(derive_theme("   "), None);
        assert_eq!(derive_theme("nan"), None);
    }

    #[test]
    fn general_resolves_to_last_theme_in_table_order() {
        assert_eq!(derive_theme("General"), Some("Suggestions & UI Design"));
        assert_eq!(derive_theme("General_Security"), Some("Security & Support"));
    }

    #[test]
    fn every_theme_has_its_suffixed_general_entry() {
        for (theme, subthemes) in TAXONOMY {
            assert!(subthemes.iter().any(|s| s.starts_with("General_")));
            assert!(subthemes.contains(&"General"));
            let suffixed = subthemes.iter().find(|s| s.starts_with("General_")).unwrap();
            assert_eq!(derive_theme(suffixed), Some(*theme));
        }
    }
}
