use std::fmt;

/// Built-in field types. Enum-typed fields are not represented here: their
/// type is the name of a declared enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    String,
    Integer,
    Long,
    BigDecimal,
    Float,
    Double,
    Boolean,
    LocalDate,
    ZonedDateTime,
    Instant,
    Duration,
    Uuid,
    Blob,
    AnyBlob,
    ImageBlob,
    TextBlob,
}

impl FieldType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "String" => Some(Self::String),
            "Integer" => Some(Self::Integer),
            "Long" => Some(Self::Long),
            "BigDecimal" => Some(Self::BigDecimal),
            "Float" => Some(Self::Float),
            "Double" => Some(Self::Double),
            "Boolean" => Some(Self::Boolean),
            "LocalDate" => Some(Self::LocalDate),
            "ZonedDateTime" => Some(Self::ZonedDateTime),
            "Instant" => Some(Self::Instant),
            "Duration" => Some(Self::Duration),
            "UUID" => Some(Self::Uuid),
            "Blob" => Some(Self::Blob),
            "AnyBlob" => Some(Self::AnyBlob),
            "ImageBlob" => Some(Self::ImageBlob),
            "TextBlob" => Some(Self::TextBlob),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Integer => "Integer",
            Self::Long => "Long",
            Self::BigDecimal => "BigDecimal",
            Self::Float => "Float",
            Self::Double => "Double",
            Self::Boolean => "Boolean",
            Self::LocalDate => "LocalDate",
            Self::ZonedDateTime => "ZonedDateTime",
            Self::Instant => "Instant",
            Self::Duration => "Duration",
            Self::Uuid => "UUID",
            Self::Blob => "Blob",
            Self::AnyBlob => "AnyBlob",
            Self::ImageBlob => "ImageBlob",
            Self::TextBlob => "TextBlob",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Integer | Self::Long | Self::BigDecimal | Self::Float | Self::Double
        )
    }

    /// Blob flavour written as `fieldTypeBlobContent`.
    pub fn blob_content(&self) -> Option<&'static str> {
        match self {
            Self::Blob | Self::AnyBlob => Some("any"),
            Self::ImageBlob => Some("image"),
            Self::TextBlob => Some("text"),
            _ => None,
        }
    }

    /// Validations applicable to a field of this type.
    pub fn supports(&self, kind: ValidationKind) -> bool {
        use ValidationKind::*;
        match kind {
            Required | Unique => true,
            MinLength | MaxLength | Pattern => *self == Self::String,
            Min | Max => self.is_numeric(),
            MinBytes | MaxBytes => matches!(self, Self::Blob | Self::AnyBlob | Self::ImageBlob),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationKind {
    Required,
    Unique,
    Min,
    Max,
    MinLength,
    MaxLength,
    Pattern,
    MinBytes,
    MaxBytes,
}

impl ValidationKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "required" => Some(Self::Required),
            "unique" => Some(Self::Unique),
            "min" => Some(Self::Min),
            "max" => Some(Self::Max),
            "minlength" => Some(Self::MinLength),
            "maxlength" => Some(Self::MaxLength),
            "pattern" => Some(Self::Pattern),
            "minbytes" => Some(Self::MinBytes),
            "maxbytes" => Some(Self::MaxBytes),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Unique => "unique",
            Self::Min => "min",
            Self::Max => "max",
            Self::MinLength => "minlength",
            Self::MaxLength => "maxlength",
            Self::Pattern => "pattern",
            Self::MinBytes => "minbytes",
            Self::MaxBytes => "maxbytes",
        }
    }

    pub fn needs_value(&self) -> bool {
        !matches!(self, Self::Required | Self::Unique)
    }

    pub fn needs_numeric_value(&self) -> bool {
        self.needs_value() && *self != Self::Pattern
    }

    /// Suffix of the `fieldValidateRules<Suffix>` JSON key holding the value.
    pub fn json_suffix(&self) -> &'static str {
        match self {
            Self::Required => "Required",
            Self::Unique => "Unique",
            Self::Min => "Min",
            Self::Max => "Max",
            Self::MinLength => "Minlength",
            Self::MaxLength => "Maxlength",
            Self::Pattern => "Pattern",
            Self::MinBytes => "Minbytes",
            Self::MaxBytes => "Maxbytes",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JdlValidation {
    pub name: String,
    pub value: Option<String>,
}

impl JdlValidation {
    pub fn new(name: impl Into<String>, value: Option<String>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    pub fn kind(&self) -> Option<ValidationKind> {
        ValidationKind::from_str(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JdlField {
    pub name: String,
    /// Built-in type name or the name of a declared enum.
    pub type_name: String,
    pub validations: Vec<JdlValidation>,
    pub comment: Option<String>,
}

impl JdlField {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            validations: Vec::new(),
            comment: None,
        }
    }

    pub fn with_validation(mut self, name: &str, value: Option<&str>) -> Self {
        self.validations
            .push(JdlValidation::new(name, value.map(str::to_string)));
        self
    }

    pub fn builtin_type(&self) -> Option<FieldType> {
        FieldType::from_str(&self.type_name)
    }

    pub fn has_validation(&self, kind: ValidationKind) -> bool {
        self.validations.iter().any(|v| v.kind() == Some(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_support() {
        assert!(FieldType::String.supports(ValidationKind::Pattern));
        assert!(!FieldType::Long.supports(ValidationKind::Pattern));
        assert!(FieldType::Long.supports(ValidationKind::Max));
        assert!(!FieldType::TextBlob.supports(ValidationKind::MaxBytes));
        assert!(FieldType::ImageBlob.supports(ValidationKind::MinBytes));
        assert!(FieldType::Instant.supports(ValidationKind::Required));
    }

    #[test]
    fn test_blob_content() {
        assert_eq!(FieldType::Blob.blob_content(), Some("any"));
        assert_eq!(FieldType::TextBlob.blob_content(), Some("text"));
        assert_eq!(FieldType::String.blob_content(), None);
    }

    #[test]
    fn test_field_builder() {
        let field = JdlField::new("name", "String")
            .with_validation("required", None)
            .with_validation("maxlength", Some("20"));
        assert!(field.has_validation(ValidationKind::Required));
        assert!(field.has_validation(ValidationKind::MaxLength));
        assert!(!field.has_validation(ValidationKind::Unique));
        assert_eq!(field.builtin_type(), Some(FieldType::String));
    }
}
