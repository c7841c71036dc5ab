//! Builds the [`JdlObject`] out of a parsed [`Document`].
//!
//! Names are not resolved here: a relationship toward an undeclared entity,
//! or an option naming one, is kept as written and left to the validator.

use std::collections::HashMap;

use serde_json::{Map, Number, Value};
use tracing::debug;

use crate::ast::{
    ApplicationDecl, ConfigEntry, ConfigValue, Document, EntityDecl, EntityList, EnumDecl,
    OptionDecl, RelationshipSide, ValidationArg,
};
use crate::config::ImportConfig;
use crate::logger::Logger;
use crate::model::entity::{is_built_in_entity, lower_first};
use crate::model::enums::JdlEnumValue;
use crate::model::option::WILDCARD;
use crate::model::{
    JdlApplication, JdlDeployment, JdlEntity, JdlEnum, JdlField, JdlObject, JdlOption,
    JdlRelationship, JdlValidation, RelationshipEnd, RelationshipKind,
};

struct Converter<'a> {
    config: &'a ImportConfig,
    logger: &'a dyn Logger,
    constants: HashMap<&'a str, &'a str>,
    object: JdlObject,
}

/// Converts a parsed document into the object model.
pub fn convert(document: &Document, config: &ImportConfig, logger: &dyn Logger) -> JdlObject {
    let mut converter = Converter {
        config,
        logger,
        constants: document
            .constants
            .iter()
            .map(|c| (c.name.as_str(), c.value.as_str()))
            .collect(),
        object: JdlObject::new(),
    };

    for app in &document.applications {
        converter.add_application(app, document);
    }
    for deployment in &document.deployments {
        converter
            .object
            .add_deployment(JdlDeployment::new(config_map(&deployment.entries)));
    }
    for jdl_enum in &document.enums {
        converter.object.add_enum(enum_of(jdl_enum));
    }
    for entity in &document.entities {
        converter.add_entity(entity);
    }
    for block in &document.relationships {
        for body in &block.bodies {
            let mut relationship =
                JdlRelationship::new(block.kind, end_of(&body.from), end_of(&body.to));
            relationship.jpa_derived_identifier = body.jpa_derived_identifier;
            converter.add_relationship(relationship);
        }
    }
    for option in &document.options {
        converter.object.add_option(option_of(option));
    }

    debug!(
        entities = converter.object.entities.len(),
        relationships = converter.object.relationship_count(),
        options = converter.object.options.len(),
        "converted JDL document"
    );
    converter.object
}

impl Converter<'_> {
    fn add_application(&mut self, decl: &ApplicationDecl, document: &Document) {
        let mut config = config_map(&decl.config);
        if let Some(version) = &self.config.generator_version {
            config
                .entry("jhipsterVersion")
                .or_insert_with(|| Value::String(version.clone()));
        }

        let names: Vec<String> = match &decl.entities {
            None => Vec::new(),
            Some(selection) => {
                let targets = match &selection.targets {
                    EntityList::All => document.entities.iter().map(|e| e.name.clone()).collect(),
                    EntityList::Names(names) => names.clone(),
                };
                targets
                    .into_iter()
                    .filter(|name| !selection.excluded.contains(name))
                    .collect()
            }
        };

        let mut app = JdlApplication::new(config).with_entities(names);
        for option in &decl.options {
            app.options.add(option_of(option));
        }
        self.object.add_application(app);
    }

    fn add_entity(&mut self, decl: &EntityDecl) {
        if is_built_in_entity(&decl.name) && !self.skips_user_management(&decl.name) {
            self.logger.warn(&format!(
                "An entity named '{}' was declared, but '{}' is created by the generator. \
                 Relationships toward it are kept, its fields and relationships are disregarded.",
                decl.name, decl.name
            ));
            return;
        }

        let mut entity = JdlEntity::new(&decl.name);
        if let Some(table_name) = &decl.table_name {
            entity = entity.with_table_name(table_name);
        }
        entity.comment = decl.doc.clone();

        for field in decl.fields() {
            let mut jdl_field = JdlField::new(&field.name, &field.typ);
            jdl_field.comment = field.doc.clone();
            jdl_field.validations = field
                .validations
                .iter()
                .map(|v| {
                    let value = v.arg.as_ref().map(|arg| match arg {
                        ValidationArg::Num(n) | ValidationArg::Pattern(n) => n.clone(),
                        ValidationArg::Constant(name) => self
                            .constants
                            .get(name.as_str())
                            .map_or_else(|| name.clone(), |value| value.to_string()),
                    });
                    JdlValidation::new(&v.name, value)
                })
                .collect();
            entity.add_field(jdl_field);
        }
        self.object.add_entity(entity);
    }

    fn add_relationship(&mut self, mut relationship: JdlRelationship) {
        let from = relationship.from.entity.clone();
        if is_built_in_entity(&from) && !self.skips_user_management(&from) {
            self.logger.warn(&format!(
                "The {} is disregarded, relationships from '{}' can't be declared.",
                relationship, from
            ));
            return;
        }

        if relationship.from.injected_field.is_none() && relationship.to.injected_field.is_none() {
            relationship.from.injected_field = Some(lower_first(&relationship.to.entity));
        }
        // the many-to-one counterpart of a one-to-many needs a name
        if relationship.kind == RelationshipKind::OneToMany
            && relationship.to.injected_field.is_none()
        {
            relationship.to.injected_field = Some(lower_first(&relationship.from.entity));
        }
        self.object.add_relationship(relationship);
    }

    fn skips_user_management(&self, entity: &str) -> bool {
        self.object
            .skips_user_management(entity, self.config.skip_user_management)
    }
}

fn enum_of(decl: &EnumDecl) -> JdlEnum {
    let mut jdl_enum = JdlEnum::new(&decl.name);
    jdl_enum.comment = decl.doc.clone();
    jdl_enum.values = decl
        .values
        .iter()
        .map(|v| JdlEnumValue {
            name: v.name.clone(),
            custom: v.custom.clone(),
            comment: v.doc.clone(),
        })
        .collect();
    jdl_enum
}

fn end_of(side: &RelationshipSide) -> RelationshipEnd {
    RelationshipEnd {
        entity: side.entity.clone(),
        injected_field: side.injected_field.clone(),
        display_field: side.display_field.clone(),
        required: side.required,
        comment: side.doc.clone(),
    }
}

fn option_of(decl: &OptionDecl) -> JdlOption {
    let targets: Vec<String> = match &decl.targets {
        EntityList::All => vec![WILDCARD.to_string()],
        EntityList::Names(names) => names.clone(),
    };
    let option = match &decl.value {
        Some(value) => JdlOption::binary(&decl.name, value, targets),
        None => JdlOption::unary(&decl.name, targets),
    };
    option.excluding(decl.excluded.iter().cloned())
}

fn config_map(entries: &[ConfigEntry]) -> Map<String, Value> {
    entries
        .iter()
        .map(|entry| (entry.key.clone(), config_value(&entry.value)))
        .collect()
}

fn config_value(value: &ConfigValue) -> Value {
    match value {
        ConfigValue::Ident(s) | ConfigValue::Str(s) => Value::String(s.clone()),
        ConfigValue::Bool(b) => Value::Bool(*b),
        ConfigValue::Num(n) => number(n),
        ConfigValue::List(items) => {
            Value::Array(items.iter().cloned().map(Value::String).collect())
        }
    }
}

/// Numeric text as a JSON number when it is one (`8080`), else kept as text
/// (`6.0.0`).
pub(crate) fn number(text: &str) -> Value {
    if let Ok(i) = text.parse::<i64>() {
        return Value::Number(i.into());
    }
    text.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map_or_else(|| Value::String(text.to_string()), Value::Number)
}
