//! Congress taxonomies: topics, submission statuses, document types, sponsor
//! tiers and visibility levels.
//!
//! Every enum is stored as its upper-case code in a `TEXT` column and
//! serialized the same way over the wire. Labels are French display strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;

/// `{ value, label }` pair used by the "options" endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CodeOption {
    pub value: &'static str,
    pub label: &'static str,
}

macro_rules! define_code_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => ($code:literal, $label:literal) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every variant in declaration order.
            pub const ALL: &'static [$name] = &[ $( $name::$variant ),+ ];

            /// The stored / wire code.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $code ),+
                }
            }

            /// French display label.
            pub fn label(self) -> &'static str {
                match self {
                    $( $name::$variant => $label ),+
                }
            }

            /// Parse an optional query-string filter. Empty or unknown
            /// values mean "no filter".
            pub fn parse_filter(value: Option<&str>) -> Option<Self> {
                value
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .and_then(|v| v.parse().ok())
            }

            /// Label of a stored code, falling back to the code itself.
            pub fn label_of(code: &str) -> String {
                code.parse::<Self>()
                    .map(|v| v.label().to_string())
                    .unwrap_or_else(|_| code.to_string())
            }

            pub fn options() -> Vec<CodeOption> {
                Self::ALL
                    .iter()
                    .map(|v| CodeOption { value: v.as_str(), label: v.label() })
                    .collect()
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $( $code => Ok($name::$variant), )+
                    other => Err(CoreError::Validation(format!(
                        concat!("Invalid ", stringify!($name), " '{}'"),
                        other
                    ))),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(|e: CoreError| serde::de::Error::custom(e.to_string()))
            }
        }
    };
}

define_code_enum! {
    /// Scientific topic of a submission.
    Rubrique {
        HepatoBiliaire => ("CHIRURGIE_HEPATO_BILIAIRE", "Chirurgie hépato-biliaire"),
        Pancreatique => ("CHIRURGIE_PANCREATIQUE", "Chirurgie pancréatique"),
        Colorectale => ("CHIRURGIE_COLORECTALE", "Chirurgie colorectale"),
        OesoGastrique => ("CHIRURGIE_OESO_GASTRIQUE", "Chirurgie œso-gastrique"),
        Bariatrique => ("CHIRURGIE_BARIATRIQUE", "Chirurgie bariatrique"),
        Robotique => ("CHIRURGIE_ROBOTIQUE", "Chirurgie robotique"),
        Parietale => ("CHIRURGIE_PARIETALE", "Chirurgie pariétale"),
        Endocrinienne => ("CHIRURGIE_ENDOCRINIENNE", "Chirurgie endocrinienne"),
        UrgencesViscerales => ("URGENCES_VISCERALES", "Urgences viscérales et digestives"),
        Proctologique => ("CHIRURGIE_PROCTOLOGIQUE", "Chirurgie proctologique"),
    }
}

define_code_enum! {
    /// Review status of an abstract.
    StatutSoumission {
        EnAttente => ("EN_ATTENTE", "En attente de révision"),
        EnRevision => ("EN_REVISION", "En cours de révision"),
        Accepte => ("ACCEPTE", "Accepté"),
        Refuse => ("REFUSE", "Refusé"),
    }
}

define_code_enum! {
    /// Presentation format requested by an abstract's author.
    TypeCommunication {
        EPoster => ("EPOSTER", "E-Poster"),
        CommunicationOrale => ("COMMUNICATION_ORALE", "Communication orale"),
        PresentationVideo => ("PRESENTATION_VIDEO", "Présentation vidéo"),
    }
}

define_code_enum! {
    /// Moderation status shared by e-posters and communication videos.
    StatutModeration {
        EnAttente => ("EN_ATTENTE", "En attente de validation"),
        Approuve => ("APPROUVE", "Approuvé"),
        Rejete => ("REJETE", "Rejeté"),
    }
}

define_code_enum! {
    TypeDocument {
        Programme => ("PROGRAMME", "Programme du congrès"),
        Brochure => ("BROCHURE", "Brochure"),
        LivreResumes => ("LIVRE_RESUMES", "Livre des résumés"),
        Formulaire => ("FORMULAIRE", "Formulaire"),
        Reglement => ("REGLEMENT", "Règlement intérieur"),
        Certificat => ("CERTIFICAT", "Certificat"),
        Rapport => ("RAPPORT", "Rapport"),
        Autre => ("AUTRE", "Autre"),
    }
}

define_code_enum! {
    VisibiliteDocument {
        Public => ("PUBLIC", "Accessible à tous"),
        Inscrits => ("INSCRITS", "Réservé aux inscrits"),
        Admin => ("ADMIN", "Réservé aux admins"),
    }
}

define_code_enum! {
    VisibiliteVideo {
        Public => ("PUBLIC", "Accessible à tous"),
        Inscrits => ("INSCRITS", "Réservé aux participants inscrits"),
        Premium => ("PREMIUM", "Réservé aux membres premium"),
    }
}

impl VisibiliteVideo {
    /// Badge color used by the front-end.
    pub fn color(self) -> &'static str {
        match self {
            VisibiliteVideo::Public => "green",
            VisibiliteVideo::Inscrits => "blue",
            VisibiliteVideo::Premium => "gold",
        }
    }
}

define_code_enum! {
    /// Sponsorship tier. Declaration order is display priority.
    NiveauSponsor {
        Platine => ("PLATINE", "Platine"),
        Or => ("OR", "Or"),
        Argent => ("ARGENT", "Argent"),
        Bronze => ("BRONZE", "Bronze"),
        Partenaire => ("PARTENAIRE", "Partenaire"),
    }
}

impl NiveauSponsor {
    pub fn color(self) -> &'static str {
        match self {
            NiveauSponsor::Platine => "#E5E4E2",
            NiveauSponsor::Or => "#FFD700",
            NiveauSponsor::Argent => "#C0C0C0",
            NiveauSponsor::Bronze => "#CD7F32",
            NiveauSponsor::Partenaire => "#4A90E2",
        }
    }

    /// 1 is the most prominent tier.
    pub fn priority(self) -> i32 {
        match self {
            NiveauSponsor::Platine => 1,
            NiveauSponsor::Or => 2,
            NiveauSponsor::Argent => 3,
            NiveauSponsor::Bronze => 4,
            NiveauSponsor::Partenaire => 5,
        }
    }
}
