use serde::Serialize;

pub const MAX_STRIPES: i64 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Belt {
    White,
    Blue,
    Purple,
    Brown,
    Black,
}

impl Belt {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Belt::White => "white",
            Belt::Blue => "blue",
            Belt::Purple => "purple",
            Belt::Brown => "brown",
            Belt::Black => "black",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "white" => Some(Belt::White),
            "blue" => Some(Belt::Blue),
            "purple" => Some(Belt::Purple),
            "brown" => Some(Belt::Brown),
            "black" => Some(Belt::Black),
            _ => None,
        }
    }

    /// Next rank on promotion day, `None` once black is reached.
    pub fn next(&self) -> Option<Belt> {
        match self {
            Belt::White => Some(Belt::Blue),
            Belt::Blue => Some(Belt::Purple),
            Belt::Purple => Some(Belt::Brown),
            Belt::Brown => Some(Belt::Black),
            Belt::Black => None,
        }
    }
}
