#[derive(Debug, Clone, PartialEq)]
pub struct JdlEnumValue {
    pub name: String,
    pub custom: Option<String>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JdlEnum {
    pub name: String,
    pub values: Vec<JdlEnumValue>,
    pub comment: Option<String>,
}

impl JdlEnum {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
            comment: None,
        }
    }

    pub fn with_value(mut self, name: impl Into<String>, custom: Option<&str>) -> Self {
        self.values.push(JdlEnumValue {
            name: name.into(),
            custom: custom.map(str::to_string),
            comment: None,
        });
        self
    }

    /// `FRENCH (french),ENGLISH` as written in `fieldValues`.
    pub fn field_values(&self) -> String {
        self.values
            .iter()
            .map(|v| match &v.custom {
                Some(custom) => format!("{} ({})", v.name, custom),
                None => v.name.clone(),
            })
            .collect::<Vec<_>>()
            .join(",")
    }
}
