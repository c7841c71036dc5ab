//! Identifier patterns and reserved words.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::database::DatabaseType;

pub static ENTITY_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][A-Za-z0-9]*$").unwrap());
pub static FIELD_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9]*$").unwrap());
pub static ENUM_VALUE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][A-Za-z0-9_]*$").unwrap());
pub static BASE_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9]*$").unwrap());
pub static PACKAGE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z_][a-z0-9_]*(\.[a-z_][a-z0-9_]*)*$").unwrap());

const JAVA_KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "final", "finally", "float",
    "for", "goto", "if", "implements", "import", "instanceof", "int", "interface", "long",
    "native", "new", "package", "private", "protected", "public", "return", "short", "static",
    "strictfp", "super", "switch", "synchronized", "this", "throw", "throws", "transient", "try",
    "void", "volatile", "while", "true", "false", "null",
];

/// Class names the generated application already uses.
const RESERVED_CLASS_NAMES: &[&str] = &[
    "Account", "Activate", "Audit", "AuditEvent", "Configuration", "Date",
    "DateTime", "Entity", "Error", "Health", "Home", "Instant", "Logs", "Metrics",
    "Object", "Password", "Principal", "Register", "Reset", "Session", "Settings", "String",
    "Tracker", "UserManagement",
];

/// Names that break the generated client or server when used for fields.
const RESERVED_FIELD_NAMES: &[&str] = &[
    "id", "class", "constructor", "entity", "function", "key", "length", "prototype", "type",
    "window",
];

const SQL_RESERVED: &[&str] = &[
    "ALL", "ALTER", "AND", "ANY", "AS", "ASC", "BETWEEN", "BY", "CASE", "CHECK", "COLUMN",
    "CONSTRAINT", "CREATE", "CROSS", "CURRENT", "DATABASE", "DEFAULT", "DELETE", "DESC",
    "DISTINCT", "DROP", "ELSE", "END", "EXISTS", "FOREIGN", "FROM", "FULL", "GRANT", "GROUP",
    "HAVING", "IN", "INDEX", "INNER", "INSERT", "INTERVAL", "INTO", "IS", "JOIN", "KEY", "LEFT",
    "LIKE", "LIMIT", "NOT", "NULL", "OFFSET", "ON", "OR", "ORDER", "OUTER", "PRIMARY",
    "REFERENCES", "RIGHT", "ROW", "ROWS", "SELECT", "SESSION", "SET", "TABLE", "THEN", "TO",
    "UNION", "UNIQUE", "UPDATE", "USER", "USING", "VALUES", "VIEW", "WHEN", "WHERE", "WITH",
];

const CASSANDRA_RESERVED: &[&str] = &[
    "ADD", "ALLOW", "ALTER", "AND", "APPLY", "ASC", "AUTHORIZE", "BATCH", "BEGIN", "BY",
    "COLUMNFAMILY", "CREATE", "DELETE", "DESC", "DESCRIBE", "DROP", "ENTRIES", "EXECUTE", "FROM",
    "FULL", "GRANT", "IF", "IN", "INDEX", "INFINITY", "INSERT", "INTO", "KEYSPACE", "LIMIT",
    "MODIFY", "NAN", "NORECURSIVE", "NOT", "NULL", "OF", "ON", "OR", "ORDER", "PRIMARY",
    "RENAME", "REPLACE", "REVOKE", "SCHEMA", "SELECT", "SET", "TABLE", "TO", "TOKEN",
    "TRUNCATE", "UNLOGGED", "UPDATE", "USE", "USING", "WHERE", "WITH",
];

const MONGODB_RESERVED: &[&str] = &["SYSTEM", "ADMIN", "LOCAL", "CONFIG"];

const NEO4J_RESERVED: &[&str] = &[
    "CALL", "CREATE", "DELETE", "DETACH", "MATCH", "MERGE", "NODE", "OPTIONAL", "REMOVE",
    "RETURN", "SET", "UNION", "UNWIND", "WHERE", "WITH",
];

pub fn is_java_keyword(name: &str) -> bool {
    JAVA_KEYWORDS.contains(&name.to_lowercase().as_str())
}

/// Java keyword or class name reserved by the generated code.
pub fn is_reserved_keyword(name: &str) -> bool {
    is_java_keyword(name) || RESERVED_CLASS_NAMES.contains(&name)
}

pub fn is_reserved_field_name(name: &str) -> bool {
    JAVA_KEYWORDS.contains(&name) || RESERVED_FIELD_NAMES.contains(&name)
}

/// Reserved by the database engine, case insensitive.
pub fn is_reserved_table_name(name: &str, database: DatabaseType) -> bool {
    let upper = name.to_uppercase();
    let reserved = match database {
        DatabaseType::Sql => SQL_RESERVED,
        DatabaseType::Cassandra => CASSANDRA_RESERVED,
        DatabaseType::MongoDb | DatabaseType::Couchbase => MONGODB_RESERVED,
        DatabaseType::Neo4j => NEO4J_RESERVED,
        DatabaseType::No => return false,
    };
    reserved.contains(&upper.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns() {
        assert!(ENTITY_NAME.is_match("BookAuthor2"));
        assert!(!ENTITY_NAME.is_match("bookAuthor"));
        assert!(!ENTITY_NAME.is_match("Book_Author"));
        assert!(FIELD_NAME.is_match("isbn13"));
        assert!(!FIELD_NAME.is_match("_isbn"));
        assert!(ENUM_VALUE.is_match("NOT_STARTED"));
        assert!(!ENUM_VALUE.is_match("notStarted"));
        assert!(PACKAGE_NAME.is_match("com.mycompany.my_app"));
        assert!(!PACKAGE_NAME.is_match("com.MyCompany"));
    }

    #[test]
    fn test_reserved_words() {
        assert!(is_reserved_keyword("Class"));
        assert!(is_reserved_keyword("Account"));
        assert!(!is_reserved_keyword("Book"));
        assert!(!is_reserved_keyword("Language"));
        assert!(is_java_keyword("Enum"));
        assert!(!is_java_keyword("Account"));
        assert!(is_reserved_field_name("class"));
        assert!(!is_reserved_field_name("title"));
        assert!(is_reserved_table_name("order", DatabaseType::Sql));
        assert!(is_reserved_table_name("batch", DatabaseType::Cassandra));
        assert!(!is_reserved_table_name("batch", DatabaseType::No));
    }
}
