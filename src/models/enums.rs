//! Enumerations shared by the type descriptors

use serde::{Deserialize, Serialize};

/// The resource kind a declared type is registered as.
///
/// This is the descriptor-level replacement for the `@Asset`, `@Participant`,
/// `@Transaction`, `@Concept` and `@Event` markers of the Composer model.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// An asset, identified by a primary key
    Asset,
    /// A participant, identified by a primary key
    Participant,
    /// A transaction, identified by the runtime-assigned transaction id
    Transaction,
    /// A concept, always embedded and without identity
    Concept,
    /// An event, always embedded; never emitted into schema files
    Event,
}

impl ResourceKind {
    /// Kinds walked by the schema reflector, in walk order.
    pub const MODEL_KINDS: [ResourceKind; 4] = [
        ResourceKind::Asset,
        ResourceKind::Participant,
        ResourceKind::Transaction,
        ResourceKind::Concept,
    ];

    /// Lower-case keyword used in the `.cto` grammar
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Participant => "participant",
            Self::Transaction => "transaction",
            Self::Concept => "concept",
            Self::Event => "event",
        }
    }

    /// Whether instances of this kind are always serialized inline
    pub fn is_always_embedded(&self) -> bool {
        matches!(self, Self::Concept | Self::Event)
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::Asset => write!(f, "Asset"),
            ResourceKind::Participant => write!(f, "Participant"),
            ResourceKind::Transaction => write!(f, "Transaction"),
            ResourceKind::Concept => write!(f, "Concept"),
            ResourceKind::Event => write!(f, "Event"),
        }
    }
}

/// Scalar types with a direct schema and JSON mapping
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    /// A UTF8 encoded string
    String,
    /// A 64 bit signed whole number
    Long,
    /// A 32 bit signed whole number
    Integer,
    /// A double precision 64 bit numeric value
    Double,
    /// An ISO-8601 compatible time instance
    DateTime,
    /// Either true or false
    Boolean,
}

impl PrimitiveType {
    pub const ALL: [PrimitiveType; 6] = [
        PrimitiveType::String,
        PrimitiveType::Long,
        PrimitiveType::Integer,
        PrimitiveType::Double,
        PrimitiveType::DateTime,
        PrimitiveType::Boolean,
    ];

    /// Schema label of the primitive
    pub fn label(&self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Long => "Long",
            Self::Integer => "Integer",
            Self::Double => "Double",
            Self::DateTime => "DateTime",
            Self::Boolean => "Boolean",
        }
    }

    /// Resolve a schema label back to the primitive
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.label() == label)
    }
}

impl std::fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Shape of a collection-typed field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CollectionKind {
    /// Ordered collection, defaults to a list
    List,
    /// Unordered collection of distinct values
    Set,
    /// Any other abstract collection interface, e.g. `Queue`
    Other(String),
}

impl CollectionKind {
    pub fn name(&self) -> &str {
        match self {
            Self::List => "List",
            Self::Set => "Set",
            Self::Other(name) => name,
        }
    }
}

impl std::fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
