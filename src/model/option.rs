//! Unary (toggle) and binary (key = value) options scoped to entity names.

use indexmap::IndexSet;

pub const UNARY_OPTIONS: &[&str] = &[
    "skipClient",
    "skipServer",
    "noFluentMethod",
    "filter",
    "readOnly",
    "embedded",
];

/// (JDL keyword, option name) for binary options.
pub const BINARY_OPTION_KEYWORDS: &[(&str, &str)] = &[
    ("dto", "dto"),
    ("service", "service"),
    ("paginate", "pagination"),
    ("search", "search"),
    ("microservice", "microservice"),
    ("angularSuffix", "angularSuffix"),
    ("clientRootFolder", "clientRootFolder"),
];

pub const WILDCARD: &str = "*";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionValues {
    Fixed(&'static [&'static str]),
    /// Free-form value such as a folder or a microservice name.
    Custom,
}

/// Accepted values of a binary option, `None` if the option doesn't exist.
pub fn binary_option_values(name: &str) -> Option<OptionValues> {
    match name {
        "dto" => Some(OptionValues::Fixed(&["mapstruct", "no"])),
        "service" => Some(OptionValues::Fixed(&["serviceClass", "serviceImpl", "no"])),
        "pagination" => Some(OptionValues::Fixed(&[
            "pagination",
            "infinite-scroll",
            "pager",
            "no",
        ])),
        "search" => Some(OptionValues::Fixed(&["elasticsearch", "couchbase", "no"])),
        "microservice" | "angularSuffix" | "clientRootFolder" => Some(OptionValues::Custom),
        _ => None,
    }
}

pub fn is_unary_option(name: &str) -> bool {
    UNARY_OPTIONS.contains(&name)
}

#[derive(Debug, Clone, PartialEq)]
pub struct JdlOption {
    pub name: String,
    /// `None` for unary options.
    pub value: Option<String>,
    /// Targeted entity names; a lone `*` targets every entity.
    pub entity_names: IndexSet<String>,
    pub excluded_names: IndexSet<String>,
}

impl JdlOption {
    pub fn unary<I, S>(name: impl Into<String>, entities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            value: None,
            entity_names: entities.into_iter().map(Into::into).collect(),
            excluded_names: IndexSet::new(),
        }
    }

    pub fn binary<I, S>(name: impl Into<String>, value: impl Into<String>, entities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            value: Some(value.into()),
            ..Self::unary(name, entities)
        }
    }

    pub fn excluding<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_names.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn is_unary(&self) -> bool {
        self.value.is_none()
    }

    pub fn is_wildcard(&self) -> bool {
        self.entity_names.contains(WILDCARD)
    }

    pub fn is_excluded(&self, entity: &str) -> bool {
        self.excluded_names.contains(entity)
    }

    pub fn applies_to(&self, entity: &str) -> bool {
        !self.is_excluded(entity) && (self.is_wildcard() || self.entity_names.contains(entity))
    }

    /// Explicitly named entities, targets and exclusions alike.
    pub fn referenced_names(&self) -> impl Iterator<Item = &str> {
        self.entity_names
            .iter()
            .chain(self.excluded_names.iter())
            .map(String::as_str)
            .filter(|name| *name != WILDCARD)
    }

    /// An entity stays excluded only if no merged side targets it.
    fn merge(&mut self, other: JdlOption) {
        let (self_wildcard, other_wildcard) = (self.is_wildcard(), other.is_wildcard());
        let excluded: IndexSet<String> = match (self_wildcard, other_wildcard) {
            (true, true) => self
                .excluded_names
                .intersection(&other.excluded_names)
                .cloned()
                .collect(),
            (true, false) => std::mem::take(&mut self.excluded_names),
            (false, true) => other.excluded_names,
            (false, false) => {
                let mut both = std::mem::take(&mut self.excluded_names);
                both.extend(other.excluded_names);
                both
            }
        };

        if self_wildcard || other_wildcard {
            self.entity_names.extend(other.entity_names);
            self.excluded_names = excluded
                .into_iter()
                .filter(|name| !self.entity_names.contains(name))
                .collect();
            self.entity_names = IndexSet::from([WILDCARD.to_string()]);
        } else {
            self.entity_names.extend(other.entity_names);
            self.excluded_names = excluded;
        }
    }
}

impl std::fmt::Display for JdlOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{} = {}", self.name, value),
            None => f.write_str(&self.name),
        }
    }
}

/// Option set; options with the same name and value are merged.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JdlOptions {
    options: Vec<JdlOption>,
}

impl JdlOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, option: JdlOption) {
        match self
            .options
            .iter_mut()
            .find(|o| o.name == option.name && o.value == option.value)
        {
            Some(existing) => existing.merge(option),
            None => self.options.push(option),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &JdlOption> {
        self.options.iter()
    }

    pub fn named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a JdlOption> + 'a {
        self.options.iter().filter(move |o| o.name == name)
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

impl<'a> IntoIterator for &'a JdlOptions {
    type Item = &'a JdlOption;
    type IntoIter = std::slice::Iter<'a, JdlOption>;

    fn into_iter(self) -> Self::IntoIter {
        self.options.iter()
    }
}
