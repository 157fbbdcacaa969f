use serde::{Deserialize, Serialize};

use super::ModelError;

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// The wire form (serde) is the same literal as `as_str`.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ModelError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(PatientStatus {
    Waiting => "waiting",
    InProgress => "in-progress",
    Done => "done",
});

impl Default for PatientStatus {
    fn default() -> Self {
        Self::Waiting
    }
}

str_enum!(DiseaseType {
    HeartDisease => "heart-disease",
    LiverDisease => "liver-disease",
    KidneyDisease => "kidney-disease",
    Diabetes => "diabetes",
});

impl DiseaseType {
    pub const ALL: [DiseaseType; 4] = [
        DiseaseType::HeartDisease,
        DiseaseType::LiverDisease,
        DiseaseType::KidneyDisease,
        DiseaseType::Diabetes,
    ];
}

// Variant order is the severity order: LOW < MEDIUM < HIGH < CRITICAL.
str_enum!(RiskCategory {
    Low => "LOW",
    Medium => "MEDIUM",
    High => "HIGH",
    Critical => "CRITICAL",
});
