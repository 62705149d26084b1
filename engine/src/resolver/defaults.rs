use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Returned for sections the table does not know at all.
pub const GLOBAL_FALLBACK_COLOR: &str = "#1f2937";

static DEFAULT_COLOR_TABLE: Lazy<DefaultColorTable> = Lazy::new(DefaultColorTable::build);

// (section, section fallback, [(element, color)])
type SectionDefaults = (&'static str, &'static str, &'static [(&'static str, &'static str)]);

const SECTIONS: &[SectionDefaults] = &[
    (
        "global",
        "#1f2937",
        &[
            ("primaryButton", "#2563eb"),
            ("primaryButtonText", "#ffffff"),
            ("secondaryButton", "#e5e7eb"),
            ("secondaryButtonText", "#111827"),
            ("dangerButton", "#dc2626"),
            ("background", "#f9fafb"),
            ("surface", "#ffffff"),
            ("text", "#111827"),
            ("mutedText", "#6b7280"),
            ("border", "#d1d5db"),
            ("link", "#2563eb"),
            ("focusRing", "#93c5fd"),
        ],
    ),
    (
        "header",
        "#111827",
        &[
            ("background", "#111827"),
            ("text", "#f9fafb"),
            ("activeItem", "#3b82f6"),
            ("border", "#1f2937"),
        ],
    ),
    (
        "sidebar",
        "#1e293b",
        &[
            ("background", "#1e293b"),
            ("text", "#cbd5e1"),
            ("activeItemBackground", "#334155"),
            ("activeItemText", "#ffffff"),
            ("hoverBackground", "#273449"),
            ("icon", "#94a3b8"),
        ],
    ),
    (
        "dashboard",
        "#374151",
        &[
            ("background", "#f3f4f6"),
            ("cardBackground", "#ffffff"),
            ("cardBorder", "#e5e7eb"),
            ("cardTitle", "#111827"),
            ("statValue", "#1d4ed8"),
            ("chartPrimary", "#3b82f6"),
            ("chartSecondary", "#10b981"),
            ("chartTertiary", "#f59e0b"),
        ],
    ),
    (
        "clients",
        "#374151",
        &[
            ("listBackground", "#ffffff"),
            ("rowHover", "#f3f4f6"),
            ("avatarBackground", "#dbeafe"),
            ("avatarText", "#1e40af"),
        ],
    ),
    (
        "projects",
        "#374151",
        &[
            ("statusActive", "#16a34a"),
            ("statusPaused", "#d97706"),
            ("statusCompleted", "#6b7280"),
            ("progressBar", "#2563eb"),
            ("progressTrack", "#e5e7eb"),
        ],
    ),
    (
        "timeTracking",
        "#374151",
        &[
            ("timerRunning", "#16a34a"),
            ("timerStopped", "#6b7280"),
            ("billableTag", "#059669"),
            ("nonBillableTag", "#9ca3af"),
            ("entryBackground", "#ffffff"),
        ],
    ),
    (
        "table",
        "#374151",
        &[
            ("headerBackground", "#f9fafb"),
            ("headerText", "#374151"),
            ("rowBackground", "#ffffff"),
            ("rowAlternate", "#f9fafb"),
            ("rowSelected", "#eff6ff"),
            ("border", "#e5e7eb"),
        ],
    ),
    (
        "form",
        "#374151",
        &[
            ("inputBackground", "#ffffff"),
            ("inputBorder", "#d1d5db"),
            ("inputText", "#111827"),
            ("label", "#374151"),
            ("placeholder", "#9ca3af"),
            ("error", "#dc2626"),
        ],
    ),
    (
        "status",
        "#2563eb",
        &[
            ("success", "#16a34a"),
            ("warning", "#d97706"),
            ("error", "#dc2626"),
            ("info", "#2563eb"),
        ],
    ),
];

/// Process-wide `(section, element) → color` table used when no active theme
/// can answer. Read-only; lookups never fail.
#[derive(Debug)]
pub struct DefaultColorTable {
    sections: HashMap<&'static str, SectionColors>,
}

#[derive(Debug)]
struct SectionColors {
    fallback: &'static str,
    elements: HashMap<&'static str, &'static str>,
}

impl DefaultColorTable {
    pub fn global() -> &'static DefaultColorTable {
        &DEFAULT_COLOR_TABLE
    }

    fn build() -> Self {
        let sections = SECTIONS
            .iter()
            .map(|(section, fallback, elements)| {
                let colors = SectionColors {
                    fallback: *fallback,
                    elements: elements.iter().copied().collect(),
                };
                (*section, colors)
            })
            .collect();
        Self { sections }
    }

    /// Exact entry, else the section's fallback, else [`GLOBAL_FALLBACK_COLOR`].
    pub fn lookup(&self, section: &str, element: &str) -> &'static str {
        match self.sections.get(section) {
            Some(colors) => colors.elements.get(element).copied().unwrap_or(colors.fallback),
            None => GLOBAL_FALLBACK_COLOR,
        }
    }

    /// Exact entries only, sorted by section then element.
    pub fn entries(&self) -> Vec<(&'static str, &'static str, &'static str)> {
        let mut entries: Vec<_> = self
            .sections
            .iter()
            .flat_map(|(section, colors)| {
                colors
                    .elements
                    .iter()
                    .map(move |(element, color)| (*section, *element, *color))
            })
            .collect();
        entries.sort_unstable();
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_lookup() {
        let table = DefaultColorTable::global();
        assert_eq!(table.lookup("global", "primaryButton"), "#2563eb");
        assert_eq!(table.lookup("dashboard", "cardBackground"), "#ffffff");
    }

    #[test]
    fn test_unknown_element_uses_section_fallback() {
        let table = DefaultColorTable::global();
        assert_eq!(table.lookup("sidebar", "somethingNew"), "#1e293b");
    }

    #[test]
    fn test_unknown_section_uses_global_fallback() {
        let table = DefaultColorTable::global();
        assert_eq!(table.lookup("reports", "chart"), GLOBAL_FALLBACK_COLOR);
        assert_eq!(table.lookup("", ""), GLOBAL_FALLBACK_COLOR);
    }

    #[test]
    fn test_every_entry_is_valid_hex() {
        for (section, element, color) in DefaultColorTable::global().entries() {
            assert!(
                crate::model::parse_hex_color(color).is_ok(),
                "{section}.{element} has invalid default {color}"
            );
        }
    }
}
