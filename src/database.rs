//! Database kinds and the field types each of them can store.

use crate::model::field::FieldType;

/// Database type of an application (or of the whole import when no
/// application is declared).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DatabaseType {
    #[default]
    Sql,
    MongoDb,
    Cassandra,
    Couchbase,
    Neo4j,
    /// No database at all
    No,
}

impl DatabaseType {
    pub const ALL: [DatabaseType; 6] = [
        Self::Sql,
        Self::MongoDb,
        Self::Cassandra,
        Self::Couchbase,
        Self::Neo4j,
        Self::No,
    ];

    /// Parse database type from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sql" => Some(Self::Sql),
            "mongodb" => Some(Self::MongoDb),
            "cassandra" => Some(Self::Cassandra),
            "couchbase" => Some(Self::Couchbase),
            "neo4j" => Some(Self::Neo4j),
            "no" => Some(Self::No),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sql => "sql",
            Self::MongoDb => "mongodb",
            Self::Cassandra => "cassandra",
            Self::Couchbase => "couchbase",
            Self::Neo4j => "neo4j",
            Self::No => "no",
        }
    }

    pub fn is_sql(&self) -> bool {
        *self == Self::Sql
    }

    /// Type-checking predicate for fields of entities stored in this database.
    pub fn supports(&self, typ: FieldType) -> bool {
        match self {
            Self::Sql | Self::No => true,
            Self::MongoDb | Self::Couchbase | Self::Neo4j => typ != FieldType::Uuid,
            Self::Cassandra => typ != FieldType::Duration,
        }
    }

    /// Same as [`supports`](Self::supports) but from the raw type name.
    pub fn is_type(&self, type_name: &str) -> bool {
        FieldType::from_str(type_name).is_some_and(|t| self.supports(t))
    }

    /// Legal `prodDatabaseType` values.
    pub fn prod_database_types(&self) -> &'static [&'static str] {
        match self {
            Self::Sql => &["mysql", "postgresql", "mariadb", "oracle", "mssql"],
            Self::MongoDb => &["mongodb"],
            Self::Cassandra => &["cassandra"],
            Self::Couchbase => &["couchbase"],
            Self::Neo4j => &["neo4j"],
            Self::No => &["no"],
        }
    }

    /// Legal `devDatabaseType` values.
    pub fn dev_database_types(&self) -> Vec<&'static str> {
        let mut types = Vec::new();
        if self.is_sql() {
            types.extend(["h2Disk", "h2Memory"]);
        }
        types.extend(self.prod_database_types());
        types
    }

    /// Default `prodDatabaseType`.
    pub fn default_prod_database(&self) -> &'static str {
        self.prod_database_types()[0]
    }

    /// Default `devDatabaseType`.
    pub fn default_dev_database(&self) -> &'static str {
        if self.is_sql() {
            "h2Disk"
        } else {
            self.default_prod_database()
        }
    }
}

impl std::fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
