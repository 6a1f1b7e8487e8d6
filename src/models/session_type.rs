use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionType {
    Gi,
    NoGi,
    OpenMat,
}

impl SessionType {
    pub const ALL: [SessionType; 3] = [SessionType::Gi, SessionType::NoGi, SessionType::OpenMat];

    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            SessionType::Gi => "gi",
            SessionType::NoGi => "nogi",
            SessionType::OpenMat => "open_mat",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "gi" => Some(SessionType::Gi),
            "nogi" => Some(SessionType::NoGi),
            "open_mat" => Some(SessionType::OpenMat),
            _ => None,
        }
    }

    /// Helper: lenient parsing of CLI input ("no-gi", "OPEN-MAT", ...)
    pub fn from_code(code: &str) -> Option<Self> {
        let norm = code.trim().to_lowercase().replace(['-', ' '], "_");
        match norm.as_str() {
            "gi" => Some(SessionType::Gi),
            "nogi" | "no_gi" => Some(SessionType::NoGi),
            "open_mat" | "openmat" | "open" => Some(SessionType::OpenMat),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SessionType::Gi => "Gi",
            SessionType::NoGi => "No-Gi",
            SessionType::OpenMat => "Open mat",
        }
    }
}
