use serde::{Serialize, Serializer};
use std::fmt;

/// Technique category of a logged event.
///
/// Unknown labels are kept verbatim in `Other`, the vocabulary is never closed
/// at the data layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Submission,
    Sweep,
    Takedown,
    Pass,
    Escape,
    Other(String),
}

impl Category {
    pub fn as_str(&self) -> &str {
        match self {
            Category::Submission => "submission",
            Category::Sweep => "sweep",
            Category::Takedown => "takedown",
            Category::Pass => "pass",
            Category::Escape => "escape",
            Category::Other(label) => label.as_str(),
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "submission" | "sub" => Category::Submission,
            "sweep" => Category::Sweep,
            "takedown" | "td" => Category::Takedown,
            "pass" => Category::Pass,
            "escape" => Category::Escape,
            "" => Category::Other("other".into()),
            other => Category::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
