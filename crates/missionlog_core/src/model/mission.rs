//! Daily mission catalog.
//!
//! A mission is a short visual theme the user is asked to photograph.

use serde::Serialize;

/// Prompt the user is asked to fulfill with a capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Mission {
    pub title: &'static str,
    /// Asset name of the mission illustration.
    pub image_name: &'static str,
}

/// Used when the caller does not pick a mission.
pub const DEFAULT_MISSION: Mission = Mission {
    title: "Default",
    image_name: "imagesearch-rectangle",
};

const CATALOG: &[Mission] = &[
    Mission {
        title: "Square",
        image_name: "imagesearch-rectangle",
    },
    Mission {
        title: "Triangle",
        image_name: "imagesearch-triangle",
    },
    Mission {
        title: "Blue & Green",
        image_name: "imagesearch-bicolor",
    },
    Mission {
        title: "A smily shape",
        image_name: "imagesearch-smile",
    },
];

impl Mission {
    /// Headline shown on the mission card and capture sheet.
    pub fn prompt(&self) -> String {
        format!("Capture something {} today!", self.title)
    }
}

/// Returns today's selectable missions in display order.
pub fn mission_catalog() -> &'static [Mission] {
    CATALOG
}
