//! Concrete syntax tree produced by the parser, before any name resolution.

use crate::lexer::Pos;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub constants: Vec<Constant>,
    pub applications: Vec<ApplicationDecl>,
    pub deployments: Vec<DeploymentDecl>,
    pub entities: Vec<EntityDecl>,
    pub enums: Vec<EnumDecl>,
    pub relationships: Vec<RelationshipBlock>,
    pub options: Vec<OptionDecl>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Constant {
    pub name: String,
    pub value: String,
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntityDecl {
    pub name: String,
    pub table_name: Option<String>,
    pub doc: Option<String>,
    /// `None` when the entity was declared without braces.
    pub body: Option<Vec<FieldDecl>>,
    pub pos: Pos,
}

impl EntityDecl {
    pub fn fields(&self) -> &[FieldDecl] {
        self.body.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub name: String,
    pub typ: String,
    pub validations: Vec<ValidationDecl>,
    pub doc: Option<String>,
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationDecl {
    pub name: String,
    pub arg: Option<ValidationArg>,
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationArg {
    Num(String),
    /// Reference to a top-level constant.
    Constant(String),
    Pattern(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    pub name: String,
    pub values: Vec<EnumValueDecl>,
    pub doc: Option<String>,
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumValueDecl {
    pub name: String,
    pub custom: Option<String>,
    pub doc: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationshipKind {
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
}

impl RelationshipKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "OneToOne" => Some(Self::OneToOne),
            "OneToMany" => Some(Self::OneToMany),
            "ManyToOne" => Some(Self::ManyToOne),
            "ManyToMany" => Some(Self::ManyToMany),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneToOne => "OneToOne",
            Self::OneToMany => "OneToMany",
            Self::ManyToOne => "ManyToOne",
            Self::ManyToMany => "ManyToMany",
        }
    }
}

/// One `relationship Kind { ... }` statement; it may group several bodies.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipBlock {
    pub kind: RelationshipKind,
    pub bodies: Vec<RelationshipBody>,
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipBody {
    pub from: RelationshipSide,
    pub to: RelationshipSide,
    pub jpa_derived_identifier: bool,
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RelationshipSide {
    pub entity: String,
    pub injected_field: Option<String>,
    pub display_field: Option<String>,
    pub required: bool,
    pub doc: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EntityList {
    /// `*` or `all`
    All,
    Names(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptionDecl {
    pub name: String,
    /// `None` for unary options.
    pub value: Option<String>,
    pub targets: EntityList,
    pub excluded: Vec<String>,
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationDecl {
    pub config: Vec<ConfigEntry>,
    pub entities: Option<EntitySelection>,
    pub options: Vec<OptionDecl>,
    pub pos: Pos,
}

impl ApplicationDecl {
    pub fn config_value(&self, key: &str) -> Option<&ConfigValue> {
        self.config.iter().find(|e| e.key == key).map(|e| &e.value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntitySelection {
    pub targets: EntityList,
    pub excluded: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeploymentDecl {
    pub entries: Vec<ConfigEntry>,
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfigEntry {
    pub key: String,
    pub value: ConfigValue,
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Ident(String),
    Str(String),
    Num(String),
    Bool(bool),
    List(Vec<String>),
}

impl ConfigValue {
    /// Scalar text of the value; lists are comma-joined.
    pub fn as_text(&self) -> String {
        match self {
            ConfigValue::Ident(s) | ConfigValue::Str(s) | ConfigValue::Num(s) => s.clone(),
            ConfigValue::Bool(b) => b.to_string(),
            ConfigValue::List(items) => items.join(","),
        }
    }
}
