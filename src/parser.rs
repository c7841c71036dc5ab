use crate::ast::*;
use crate::lexer::{LexError, Lexer, Pos, Spanned, Token};
use crate::model::option::{BINARY_OPTION_KEYWORDS, UNARY_OPTIONS};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("{0}")]
    Lex(#[from] LexError),
    #[error("Unexpected {found} at {pos}, expected {expected}")]
    Unexpected {
        found: Token,
        expected: String,
        pos: Pos,
    },
}

impl ParseError {
    pub fn pos(&self) -> Pos {
        match self {
            ParseError::Lex(e) => e.pos(),
            ParseError::Unexpected { pos, .. } => *pos,
        }
    }

    /// Message without the position.
    pub fn detail(&self) -> String {
        match self {
            ParseError::Lex(e) => e.detail(),
            ParseError::Unexpected {
                found, expected, ..
            } => format!("unexpected {}, expected {}", found, expected),
        }
    }

    fn unexpected(spanned: &Spanned, expected: impl Into<String>) -> Self {
        ParseError::Unexpected {
            found: spanned.token.clone(),
            expected: expected.into(),
            pos: spanned.pos,
        }
    }
}

const TOP_LEVEL: &str = "entity, enum, relationship, application, deployment, an option or a constant";

const VALIDATIONS_WITH_ARG: &[&str] = &["min", "max", "minlength", "maxlength", "minbytes", "maxbytes"];

static EOF: Spanned = Spanned {
    token: Token::Eof,
    pos: Pos { line: 0, column: 0 },
};

pub struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
}

impl Parser {
    pub fn new(input: &str) -> Result<Self, ParseError> {
        let tokens = Lexer::new(input).tokenize()?;
        Ok(Self { tokens, pos: 0 })
    }

    fn current(&self) -> &Spanned {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .unwrap_or(&EOF)
    }

    fn peek(&self) -> &Token {
        &self.current().token
    }

    fn peek_at(&self, offset: usize) -> &Token {
        self.tokens
            .get(self.pos + offset)
            .map(|s| &s.token)
            .unwrap_or(&EOF.token)
    }

    /// `unique Boolean`: a flag validation name followed on its line by a type.
    fn starts_field(&self) -> bool {
        let line = self.here().line;
        match self.tokens.get(self.pos + 1) {
            Some(Spanned {
                token: Token::Ident(next),
                pos,
            }) => {
                pos.line == line
                    && next != "required"
                    && next != "unique"
                    && next != "pattern"
                    && !VALIDATIONS_WITH_ARG.contains(&next.as_str())
            }
            _ => false,
        }
    }

    fn here(&self) -> Pos {
        self.current().pos
    }

    fn advance(&mut self) -> Spanned {
        let tok = self.current().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn expect_ident(&mut self) -> Result<String, ParseError> {
        let spanned = self.advance();
        match spanned.token {
            Token::Ident(s) => Ok(s),
            _ => Err(ParseError::unexpected(&spanned, "identifier")),
        }
    }

    fn expect(&mut self, expected: Token) -> Result<(), ParseError> {
        let spanned = self.advance();
        if spanned.token == expected {
            Ok(())
        } else {
            Err(ParseError::unexpected(&spanned, expected.to_string()))
        }
    }

    fn check_ident(&self, name: &str) -> bool {
        matches!(self.peek(), Token::Ident(s) if s == name)
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek() == token {
            self.advance();
            true
        } else {
            false
        }
    }

    fn take_doc(&mut self) -> Option<String> {
        let mut doc = None;
        while let Token::Doc(text) = self.peek() {
            doc = Some(text.clone());
            self.advance();
        }
        doc
    }

    pub fn parse(&mut self) -> Result<Document, ParseError> {
        let mut doc = Document::default();

        loop {
            let comment = self.take_doc();
            let pos = self.here();
            let keyword = match self.peek() {
                Token::Eof => break,
                Token::Ident(s) => s.clone(),
                _ => return Err(ParseError::unexpected(self.current(), TOP_LEVEL)),
            };

            match keyword.as_str() {
                "entity" => {
                    self.advance();
                    doc.entities.push(self.parse_entity(comment, pos)?);
                }
                "enum" => {
                    self.advance();
                    doc.enums.push(self.parse_enum(comment, pos)?);
                }
                "relationship" => {
                    self.advance();
                    doc.relationships.push(self.parse_relationship_block(pos)?);
                }
                "application" => {
                    self.advance();
                    doc.applications.push(self.parse_application(pos)?);
                }
                "deployment" => {
                    self.advance();
                    doc.deployments.push(DeploymentDecl {
                        entries: self.parse_config_block()?,
                        pos,
                    });
                }
                _ if *self.peek_at(1) == Token::Eq => {
                    doc.constants.push(self.parse_constant()?);
                }
                name if is_option_keyword(name) => {
                    doc.options.push(self.parse_option()?);
                }
                _ => return Err(ParseError::unexpected(self.current(), TOP_LEVEL)),
            }
        }

        Ok(doc)
    }

    fn parse_constant(&mut self) -> Result<Constant, ParseError> {
        let pos = self.here();
        let name = self.expect_ident()?;
        self.expect(Token::Eq)?;
        let spanned = self.advance();
        let value = match spanned.token {
            Token::Num(n) => n,
            _ => return Err(ParseError::unexpected(&spanned, "a number")),
        };
        Ok(Constant { name, value, pos })
    }

    fn parse_entity(&mut self, doc: Option<String>, pos: Pos) -> Result<EntityDecl, ParseError> {
        let name = self.expect_ident()?;

        let mut table_name = None;
        if self.eat(&Token::LParen) {
            table_name = Some(self.expect_ident()?);
            self.expect(Token::RParen)?;
        }

        let mut body = None;
        if self.eat(&Token::LBrace) {
            let mut fields = Vec::new();
            loop {
                let field_doc = self.take_doc();
                if self.eat(&Token::RBrace) {
                    break;
                }
                fields.push(self.parse_field(field_doc)?);
                self.eat(&Token::Comma);
            }
            body = Some(fields);
        }

        Ok(EntityDecl {
            name,
            table_name,
            doc,
            body,
            pos,
        })
    }

    fn parse_field(&mut self, doc: Option<String>) -> Result<FieldDecl, ParseError> {
        let pos = self.here();
        let name = self.expect_ident()?;
        let typ = self.expect_ident()?;
        let mut validations = Vec::new();

        loop {
            let vpos = self.here();
            let vname = match self.peek() {
                Token::Ident(s) => s.clone(),
                _ => break,
            };
            if vname == "required" || vname == "unique" {
                if self.starts_field() {
                    break;
                }
                self.advance();
                validations.push(ValidationDecl {
                    name: vname,
                    arg: None,
                    pos: vpos,
                });
            } else if VALIDATIONS_WITH_ARG.contains(&vname.as_str()) || vname == "pattern" {
                // a field named like a validation is followed by its type, not '('
                if *self.peek_at(1) != Token::LParen {
                    break;
                }
                self.advance();
                self.expect(Token::LParen)?;
                let spanned = self.advance();
                let arg = match spanned.token {
                    Token::Regex(r) if vname == "pattern" => ValidationArg::Pattern(r),
                    Token::Str(r) if vname == "pattern" => ValidationArg::Pattern(r),
                    Token::Num(n) if vname != "pattern" => ValidationArg::Num(n),
                    Token::Ident(c) if vname != "pattern" => ValidationArg::Constant(c),
                    _ => {
                        let expected = if vname == "pattern" {
                            "a /pattern/"
                        } else {
                            "a number or a constant"
                        };
                        return Err(ParseError::unexpected(&spanned, expected));
                    }
                };
                self.expect(Token::RParen)?;
                validations.push(ValidationDecl {
                    name: vname,
                    arg: Some(arg),
                    pos: vpos,
                });
            } else {
                break;
            }
        }

        Ok(FieldDecl {
            name,
            typ,
            validations,
            doc,
            pos,
        })
    }

    fn parse_enum(&mut self, doc: Option<String>, pos: Pos) -> Result<EnumDecl, ParseError> {
        let name = self.expect_ident()?;
        self.expect(Token::LBrace)?;

        let mut values = Vec::new();
        loop {
            let value_doc = self.take_doc();
            if self.eat(&Token::RBrace) {
                break;
            }
            let value = self.expect_ident()?;
            let mut custom = None;
            if self.eat(&Token::LParen) {
                let spanned = self.advance();
                custom = Some(match spanned.token {
                    Token::Ident(s) | Token::Str(s) | Token::Num(s) => s,
                    _ => return Err(ParseError::unexpected(&spanned, "enum custom value")),
                });
                self.expect(Token::RParen)?;
            }
            values.push(EnumValueDecl {
                name: value,
                custom,
                doc: value_doc,
            });
            self.eat(&Token::Comma);
        }

        Ok(EnumDecl {
            name,
            values,
            doc,
            pos,
        })
    }

    fn parse_relationship_block(&mut self, pos: Pos) -> Result<RelationshipBlock, ParseError> {
        let spanned = self.advance();
        let kind = match &spanned.token {
            Token::Ident(s) => RelationshipKind::from_str(s),
            _ => None,
        }
        .ok_or_else(|| {
            ParseError::unexpected(&spanned, "OneToOne, OneToMany, ManyToOne or ManyToMany")
        })?;

        self.expect(Token::LBrace)?;
        let mut bodies = Vec::new();
        loop {
            let from_doc = self.take_doc();
            if self.eat(&Token::RBrace) {
                break;
            }
            let body_pos = self.here();
            let mut from = self.parse_relationship_side()?;
            from.doc = from_doc;
            if !self.check_ident("to") {
                return Err(ParseError::unexpected(self.current(), "'to'"));
            }
            self.advance();
            let to_doc = self.take_doc();
            let mut to = self.parse_relationship_side()?;
            to.doc = to_doc;

            let mut jpa_derived_identifier = false;
            if self.check_ident("with") {
                self.advance();
                if !self.check_ident("jpaDerivedIdentifier") {
                    return Err(ParseError::unexpected(self.current(), "'jpaDerivedIdentifier'"));
                }
                self.advance();
                jpa_derived_identifier = true;
            }

            bodies.push(RelationshipBody {
                from,
                to,
                jpa_derived_identifier,
                pos: body_pos,
            });
            self.eat(&Token::Comma);
        }

        Ok(RelationshipBlock { kind, bodies, pos })
    }

    fn parse_relationship_side(&mut self) -> Result<RelationshipSide, ParseError> {
        let entity = self.expect_ident()?;
        let mut side = RelationshipSide {
            entity,
            ..Default::default()
        };

        if self.eat(&Token::LBrace) {
            if !self.check_ident("required") || *self.peek_at(1) == Token::LParen {
                side.injected_field = Some(self.expect_ident()?);
                if self.eat(&Token::LParen) {
                    side.display_field = Some(self.expect_ident()?);
                    self.expect(Token::RParen)?;
                }
            }
            if self.check_ident("required") {
                self.advance();
                side.required = true;
            }
            self.expect(Token::RBrace)?;
        }

        Ok(side)
    }

    fn parse_entity_list(&mut self) -> Result<EntityList, ParseError> {
        if self.eat(&Token::Star) {
            return Ok(EntityList::All);
        }
        if self.check_ident("all") {
            self.advance();
            return Ok(EntityList::All);
        }
        Ok(EntityList::Names(self.parse_ident_list()?))
    }

    fn parse_exclusions(&mut self) -> Result<Vec<String>, ParseError> {
        if self.check_ident("except") {
            self.advance();
            return self.parse_ident_list();
        }
        Ok(Vec::new())
    }

    fn parse_option(&mut self) -> Result<OptionDecl, ParseError> {
        let pos = self.here();
        let keyword = self.expect_ident()?;

        if UNARY_OPTIONS.contains(&keyword.as_str()) {
            if self.check_ident("for") {
                self.advance();
            }
            let targets = self.parse_entity_list()?;
            let excluded = self.parse_exclusions()?;
            return Ok(OptionDecl {
                name: keyword,
                value: None,
                targets,
                excluded,
                pos,
            });
        }

        let name = BINARY_OPTION_KEYWORDS
            .iter()
            .find(|(kw, _)| *kw == keyword)
            .map(|(_, name)| name.to_string())
            .unwrap_or(keyword);

        let targets = self.parse_entity_list()?;
        let mut excluded = self.parse_exclusions()?;
        if !self.check_ident("with") {
            return Err(ParseError::unexpected(self.current(), "'with'"));
        }
        self.advance();
        let spanned = self.advance();
        let value = match spanned.token {
            Token::Ident(s) | Token::Str(s) => s,
            _ => return Err(ParseError::unexpected(&spanned, "option value")),
        };
        if excluded.is_empty() {
            excluded = self.parse_exclusions()?;
        }

        Ok(OptionDecl {
            name,
            value: Some(value),
            targets,
            excluded,
            pos,
        })
    }

    fn parse_application(&mut self, pos: Pos) -> Result<ApplicationDecl, ParseError> {
        self.expect(Token::LBrace)?;
        let mut config = Vec::new();
        let mut entities = None;
        let mut options = Vec::new();

        loop {
            self.take_doc();
            if self.eat(&Token::RBrace) {
                break;
            }
            if self.check_ident("config") {
                self.advance();
                config.extend(self.parse_config_block()?);
            } else if self.check_ident("entities") {
                self.advance();
                let targets = self.parse_entity_list()?;
                let excluded = self.parse_exclusions()?;
                entities = Some(EntitySelection { targets, excluded });
            } else if matches!(self.peek(), Token::Ident(s) if is_option_keyword(s)) {
                options.push(self.parse_option()?);
            } else {
                return Err(ParseError::unexpected(
                    self.current(),
                    "config, entities or an option",
                ));
            }
        }

        Ok(ApplicationDecl {
            config,
            entities,
            options,
            pos,
        })
    }

    fn parse_config_block(&mut self) -> Result<Vec<ConfigEntry>, ParseError> {
        self.expect(Token::LBrace)?;
        let mut entries = Vec::new();

        loop {
            self.take_doc();
            if self.eat(&Token::RBrace) {
                break;
            }
            let pos = self.here();
            let key = self.expect_ident()?;
            let value = self.parse_config_value()?;
            entries.push(ConfigEntry { key, value, pos });
            self.eat(&Token::Comma);
        }

        Ok(entries)
    }

    fn parse_config_value(&mut self) -> Result<ConfigValue, ParseError> {
        let spanned = self.advance();
        match spanned.token {
            Token::Ident(s) if s == "true" => Ok(ConfigValue::Bool(true)),
            Token::Ident(s) if s == "false" => Ok(ConfigValue::Bool(false)),
            Token::Ident(mut s) => {
                while *self.peek() == Token::Dot {
                    self.advance();
                    s.push('.');
                    s.push_str(&self.expect_ident()?);
                }
                Ok(ConfigValue::Ident(s))
            }
            Token::Str(s) => Ok(ConfigValue::Str(s)),
            Token::Num(n) => Ok(ConfigValue::Num(n)),
            Token::LBracket => {
                let mut items = Vec::new();
                while !self.eat(&Token::RBracket) {
                    let item = self.advance();
                    match item.token {
                        Token::Ident(s) | Token::Str(s) | Token::Num(s) => items.push(s),
                        _ => return Err(ParseError::unexpected(&item, "list item or ']'")),
                    }
                    self.eat(&Token::Comma);
                }
                Ok(ConfigValue::List(items))
            }
            _ => Err(ParseError::unexpected(&spanned, "configuration value")),
        }
    }

    fn parse_ident_list(&mut self) -> Result<Vec<String>, ParseError> {
        let mut list = vec![self.expect_ident()?];
        while *self.peek() == Token::Comma {
            self.advance();
            list.push(self.expect_ident()?);
        }
        Ok(list)
    }
}

fn is_option_keyword(name: &str) -> bool {
    UNARY_OPTIONS.contains(&name) || BINARY_OPTION_KEYWORDS.iter().any(|(kw, _)| *kw == name)
}

/// Parses JDL text into its concrete syntax tree.
pub fn parse(input: &str) -> Result<Document, ParseError> {
    Parser::new(input)?.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_entity() {
        let input = r#"
            /** A book */
            entity Book (book_table) {
                /** The title */
                title String required minlength(2) maxlength(MAX),
                isbn String pattern(/^[0-9-]+$/)
                price BigDecimal min(0)
            }
            MAX = 120
        "#;
        let doc = parse(input).unwrap();
        assert_eq!(doc.entities.len(), 1);
        let book = &doc.entities[0];
        assert_eq!(book.name, "Book");
        assert_eq!(book.table_name.as_deref(), Some("book_table"));
        assert_eq!(book.doc.as_deref(), Some("A book"));
        assert_eq!(book.fields().len(), 3);
        assert_eq!(book.fields()[0].doc.as_deref(), Some("The title"));
        assert_eq!(book.fields()[0].validations.len(), 3);
        assert_eq!(
            book.fields()[0].validations[2].arg,
            Some(ValidationArg::Constant("MAX".into()))
        );
        assert_eq!(
            book.fields()[1].validations[0].arg,
            Some(ValidationArg::Pattern("^[0-9-]+$".into()))
        );
        assert_eq!(doc.constants[0].name, "MAX");
        assert_eq!(doc.constants[0].value, "120");
    }

    #[test]
    fn test_fields_named_like_flag_validations() {
        let doc = parse("entity A {\n title String required unique\n unique Boolean\n required Integer min(1)\n}")
            .unwrap();
        let fields = doc.entities[0].fields();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0].validations.len(), 2);
        assert_eq!(fields[1].name, "unique");
        assert_eq!(fields[1].typ, "Boolean");
        assert!(fields[1].validations.is_empty());
        assert_eq!(fields[2].name, "required");
        assert_eq!(fields[2].validations[0].name, "min");
    }

    #[test]
    fn test_parse_entity_without_body() {
        let doc = parse("entity A\nentity B {}").unwrap();
        assert_eq!(doc.entities[0].body, None);
        assert_eq!(doc.entities[1].body, Some(vec![]));
    }

    #[test]
    fn test_parse_enum() {
        let doc = parse("enum Language { FRENCH (french), ENGLISH, SPANISH }").unwrap();
        let e = &doc.enums[0];
        assert_eq!(e.values.len(), 3);
        assert_eq!(e.values[0].custom.as_deref(), Some("french"));
        assert_eq!(e.values[1].custom, None);
    }

    #[test]
    fn test_parse_relationships() {
        let input = r#"
            relationship OneToMany {
                A{bs(name) required} to B{a},
                C to D
            }
            relationship OneToOne {
                E{f} to F with jpaDerivedIdentifier
            }
        "#;
        let doc = parse(input).unwrap();
        assert_eq!(doc.relationships.len(), 2);
        let block = &doc.relationships[0];
        assert_eq!(block.kind, RelationshipKind::OneToMany);
        assert_eq!(block.bodies.len(), 2);
        assert_eq!(block.bodies[0].from.injected_field.as_deref(), Some("bs"));
        assert_eq!(block.bodies[0].from.display_field.as_deref(), Some("name"));
        assert!(block.bodies[0].from.required);
        assert_eq!(block.bodies[0].to.injected_field.as_deref(), Some("a"));
        assert_eq!(block.bodies[1].from.injected_field, None);
        assert!(doc.relationships[1].bodies[0].jpa_derived_identifier);
    }

    #[test]
    fn test_parse_required_only_side() {
        let doc = parse("relationship ManyToOne { A{required} to B }").unwrap();
        let side = &doc.relationships[0].bodies[0].from;
        assert_eq!(side.injected_field, None);
        assert!(side.required);
    }

    #[test]
    fn test_parse_options() {
        let input = r#"
            dto * with mapstruct except A, B
            service all except C with serviceImpl
            paginate A, B with infinite-scroll
            skipClient for A
            filter *
        "#;
        let doc = parse(input).unwrap();
        assert_eq!(doc.options.len(), 5);
        assert_eq!(doc.options[0].name, "dto");
        assert_eq!(doc.options[0].targets, EntityList::All);
        assert_eq!(doc.options[0].excluded, vec!["A", "B"]);
        assert_eq!(doc.options[1].excluded, vec!["C"]);
        assert_eq!(doc.options[1].value.as_deref(), Some("serviceImpl"));
        assert_eq!(doc.options[2].name, "pagination");
        assert_eq!(doc.options[2].value.as_deref(), Some("infinite-scroll"));
        assert_eq!(doc.options[3].value, None);
        assert_eq!(doc.options[3].targets, EntityList::Names(vec!["A".into()]));
    }

    #[test]
    fn test_parse_application() {
        let input = r#"
            application {
                config {
                    baseName store
                    applicationType microservice
                    packageName com.mycompany.store
                    serverPort 8081
                    languages [en, fr]
                    enableTranslation true
                }
                entities * except Audit
                dto * with mapstruct
            }
        "#;
        let doc = parse(input).unwrap();
        let app = &doc.applications[0];
        assert_eq!(app.config.len(), 6);
        assert_eq!(
            app.config_value("packageName"),
            Some(&ConfigValue::Ident("com.mycompany.store".into()))
        );
        assert_eq!(
            app.config_value("languages"),
            Some(&ConfigValue::List(vec!["en".into(), "fr".into()]))
        );
        assert_eq!(app.config_value("enableTranslation"), Some(&ConfigValue::Bool(true)));
        let selection = app.entities.as_ref().unwrap();
        assert_eq!(selection.targets, EntityList::All);
        assert_eq!(selection.excluded, vec!["Audit"]);
        assert_eq!(app.options.len(), 1);
    }

    #[test]
    fn test_parse_deployment() {
        let input = r#"
            deployment {
                deploymentType kubernetes
                appsFolders [store, invoice]
                dockerRepositoryName "registry.example.com"
            }
        "#;
        let doc = parse(input).unwrap();
        assert_eq!(doc.deployments[0].entries.len(), 3);
    }

    #[test]
    fn test_misspelled_keyword() {
        let err = parse("enity A").unwrap_err();
        assert_eq!(err.pos(), Pos::new(1, 1));
        let msg = err.to_string();
        assert!(msg.contains("'enity'"), "{}", msg);
        assert!(msg.contains("line 1, column 1"), "{}", msg);
    }

    #[test]
    fn test_missing_to() {
        let err = parse("relationship OneToOne { A B }").unwrap_err();
        assert!(err.to_string().contains("expected 'to'"));
    }
}
