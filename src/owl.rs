//! OWL 2 vocabulary consumed by profile rules.
//!
//! Datatypes, constraining facets and reserved labels are closed sets here:
//! rules match on the enum variants, never on label strings.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Logical profiles known to the validation engine.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
pub enum OwlProfile {
    #[strum(to_string = "OWL 2", serialize = "owl2")]
    #[serde(rename = "owl2")]
    Owl2,
    #[strum(to_string = "OWL 2 QL", serialize = "owl2ql")]
    #[serde(rename = "owl2ql")]
    Owl2Ql,
}

/// Datatypes of the OWL 2 datatype map.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
pub enum Datatype {
    #[strum(serialize = "xsd:anyURI")]
    AnyURI,
    #[strum(serialize = "xsd:base64Binary")]
    Base64Binary,
    #[strum(serialize = "xsd:boolean")]
    Boolean,
    #[strum(serialize = "xsd:byte")]
    Byte,
    #[strum(serialize = "xsd:dateTime")]
    DateTime,
    #[strum(serialize = "xsd:dateTimeStamp")]
    DateTimeStamp,
    #[strum(serialize = "xsd:decimal")]
    Decimal,
    #[strum(serialize = "xsd:double")]
    Double,
    #[strum(serialize = "xsd:float")]
    Float,
    #[strum(serialize = "xsd:hexBinary")]
    HexBinary,
    #[strum(serialize = "xsd:int")]
    Int,
    #[strum(serialize = "xsd:integer")]
    Integer,
    #[strum(serialize = "xsd:language")]
    Language,
    #[strum(serialize = "rdfs:Literal")]
    Literal,
    #[strum(serialize = "xsd:long")]
    Long,
    #[strum(serialize = "xsd:Name")]
    Name,
    #[strum(serialize = "xsd:NCName")]
    NCName,
    #[strum(serialize = "xsd:negativeInteger")]
    NegativeInteger,
    #[strum(serialize = "xsd:NMTOKEN")]
    NMToken,
    #[strum(serialize = "xsd:nonNegativeInteger")]
    NonNegativeInteger,
    #[strum(serialize = "xsd:nonPositiveInteger")]
    NonPositiveInteger,
    #[strum(serialize = "xsd:normalizedString")]
    NormalizedString,
    #[strum(serialize = "rdf:PlainLiteral")]
    PlainLiteral,
    #[strum(serialize = "xsd:positiveInteger")]
    PositiveInteger,
    #[strum(serialize = "owl:rational")]
    Rational,
    #[strum(serialize = "owl:real")]
    Real,
    #[strum(serialize = "xsd:short")]
    Short,
    #[strum(serialize = "xsd:string")]
    String,
    #[strum(serialize = "xsd:token")]
    Token,
    #[strum(serialize = "xsd:unsignedByte")]
    UnsignedByte,
    #[strum(serialize = "xsd:unsignedInt")]
    UnsignedInt,
    #[strum(serialize = "xsd:unsignedLong")]
    UnsignedLong,
    #[strum(serialize = "xsd:unsignedShort")]
    UnsignedShort,
    #[strum(serialize = "rdf:XMLLiteral")]
    XMLLiteral,
}

/// Datatypes outside the OWL 2 QL datatype map.
const QL_EXCLUDED: &[Datatype] = &[
    Datatype::Boolean,
    Datatype::Byte,
    Datatype::Double,
    Datatype::Float,
    Datatype::Int,
    Datatype::Language,
    Datatype::Long,
    Datatype::NegativeInteger,
    Datatype::NonPositiveInteger,
    Datatype::PositiveInteger,
    Datatype::Short,
    Datatype::UnsignedByte,
    Datatype::UnsignedInt,
    Datatype::UnsignedLong,
    Datatype::UnsignedShort,
];

impl Datatype {
    /// Returns every datatype admitted by the given profile, in declaration order.
    pub fn for_profile(profile: OwlProfile) -> Vec<Datatype> {
        match profile {
            OwlProfile::Owl2 => Datatype::iter().collect(),
            OwlProfile::Owl2Ql => Datatype::iter()
                .filter(|datatype| !QL_EXCLUDED.contains(datatype))
                .collect(),
        }
    }

    /// Returns true if the datatype belongs to the given profile's datatype map.
    pub fn is_supported_by(self, profile: OwlProfile) -> bool {
        match profile {
            OwlProfile::Owl2 => true,
            OwlProfile::Owl2Ql => !QL_EXCLUDED.contains(&self),
        }
    }
}

/// Constraining facets usable in datatype restrictions.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
pub enum Facet {
    #[strum(serialize = "xsd:length")]
    Length,
    #[strum(serialize = "xsd:minLength")]
    MinLength,
    #[strum(serialize = "xsd:maxLength")]
    MaxLength,
    #[strum(serialize = "xsd:pattern")]
    Pattern,
    #[strum(serialize = "xsd:minInclusive")]
    MinInclusive,
    #[strum(serialize = "xsd:minExclusive")]
    MinExclusive,
    #[strum(serialize = "xsd:maxInclusive")]
    MaxInclusive,
    #[strum(serialize = "xsd:maxExclusive")]
    MaxExclusive,
    #[strum(serialize = "xsd:totalDigits")]
    TotalDigits,
    #[strum(serialize = "xsd:fractionDigits")]
    FractionDigits,
    #[strum(serialize = "rdf:langRange")]
    LangRange,
}

const BOUNDS: &[Facet] = &[
    Facet::MinInclusive,
    Facet::MinExclusive,
    Facet::MaxInclusive,
    Facet::MaxExclusive,
];

const DIGITS: &[Facet] = &[
    Facet::MinInclusive,
    Facet::MinExclusive,
    Facet::MaxInclusive,
    Facet::MaxExclusive,
    Facet::TotalDigits,
    Facet::FractionDigits,
];

const LENGTHS: &[Facet] = &[Facet::Length, Facet::MinLength, Facet::MaxLength];

const STRINGS: &[Facet] = &[
    Facet::Length,
    Facet::MinLength,
    Facet::MaxLength,
    Facet::Pattern,
];

const PLAIN_LITERAL: &[Facet] = &[
    Facet::Length,
    Facet::MinLength,
    Facet::MaxLength,
    Facet::Pattern,
    Facet::LangRange,
];

static FACETS_BY_DATATYPE: Lazy<HashMap<Datatype, &'static [Facet]>> = Lazy::new(|| {
    Datatype::iter()
        .map(|datatype| {
            let facets: &'static [Facet] = match datatype {
                Datatype::Real | Datatype::Rational | Datatype::Double | Datatype::Float => BOUNDS,
                Datatype::DateTime | Datatype::DateTimeStamp => BOUNDS,
                Datatype::Decimal
                | Datatype::Integer
                | Datatype::NonNegativeInteger
                | Datatype::NonPositiveInteger
                | Datatype::PositiveInteger
                | Datatype::NegativeInteger
                | Datatype::Long
                | Datatype::Int
                | Datatype::Short
                | Datatype::Byte
                | Datatype::UnsignedLong
                | Datatype::UnsignedInt
                | Datatype::UnsignedShort
                | Datatype::UnsignedByte => DIGITS,
                Datatype::String
                | Datatype::NormalizedString
                | Datatype::Token
                | Datatype::Language
                | Datatype::Name
                | Datatype::NCName
                | Datatype::NMToken
                | Datatype::AnyURI => STRINGS,
                Datatype::HexBinary | Datatype::Base64Binary => LENGTHS,
                Datatype::PlainLiteral => PLAIN_LITERAL,
                Datatype::Boolean | Datatype::Literal | Datatype::XMLLiteral => &[],
            };
            (datatype, facets)
        })
        .collect()
});

impl Facet {
    /// Returns the facets that can constrain the given datatype.
    pub fn for_datatype(datatype: Datatype) -> &'static [Facet] {
        FACETS_BY_DATATYPE.get(&datatype).copied().unwrap_or(&[])
    }

    /// Returns true if this facet can constrain the given datatype.
    pub fn constrains(self, datatype: Datatype) -> bool {
        Facet::for_datatype(datatype).contains(&self)
    }
}

/// Reserved labels with a fixed meaning (top and bottom entities).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
pub enum Special {
    #[strum(serialize = "TOP")]
    Top,
    #[strum(serialize = "BOTTOM")]
    Bottom,
    #[strum(serialize = "owl:Thing")]
    TopConcept,
    #[strum(serialize = "owl:Nothing")]
    BottomConcept,
    #[strum(serialize = "owl:topObjectProperty")]
    TopRole,
    #[strum(serialize = "owl:bottomObjectProperty")]
    BottomRole,
    #[strum(serialize = "owl:topDataProperty")]
    TopAttribute,
    #[strum(serialize = "owl:bottomDataProperty")]
    BottomAttribute,
}

impl Special {
    /// Classifies a node label, ignoring surrounding whitespace.
    pub fn from_label(label: &str) -> Option<Special> {
        label.trim().parse().ok()
    }

    pub fn is_top(self) -> bool {
        matches!(
            self,
            Special::Top | Special::TopConcept | Special::TopRole | Special::TopAttribute
        )
    }

    pub fn is_bottom(self) -> bool {
        !self.is_top()
    }
}

/// Restriction carried by domain and range restriction nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Restriction {
    Exists,
    Forall,
    #[serde(rename = "self")]
    SelfRestriction,
    Cardinality { min: Option<u32>, max: Option<u32> },
}

impl Default for Restriction {
    fn default() -> Self {
        Restriction::Exists
    }
}

impl std::fmt::Display for Restriction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Restriction::Exists => write!(f, "exists"),
            Restriction::Forall => write!(f, "forall"),
            Restriction::SelfRestriction => write!(f, "self"),
            Restriction::Cardinality { min, max } => {
                let min = min.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string());
                let max = max.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string());
                write!(f, "({},{})", min, max)
            }
        }
    }
}
