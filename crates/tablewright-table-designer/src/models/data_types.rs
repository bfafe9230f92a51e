//! Data type information
//!
//! The MySQL types the editor offers. The list is advisory: types missing
//! from it are accepted and passed through unchanged.

use serde::Serialize;

/// Information about a data type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DataTypeInfo {
    /// Type name as used in SQL
    pub name: &'static str,
    /// Category for grouping
    pub category: DataTypeCategory,
    /// Whether this type takes a `(length)` / `(precision,scale)` / value list
    pub supports_length: bool,
    /// Whether `unsigned` / `zerofill` apply
    pub supports_unsigned: bool,
    /// Whether `CHARACTER SET` / `COLLATE` apply
    pub supports_charset: bool,
    pub supports_auto_increment: bool,
}

/// Category of data type for grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DataTypeCategory {
    Integer,
    Float,
    Decimal,
    String,
    Binary,
    DateTime,
    Boolean,
    Json,
    Spatial,
    Other,
}

impl DataTypeCategory {
    /// Get display name for the category
    pub fn display_name(&self) -> &'static str {
        match self {
            DataTypeCategory::Integer => "Integer",
            DataTypeCategory::Float => "Floating Point",
            DataTypeCategory::Decimal => "Decimal",
            DataTypeCategory::String => "Text",
            DataTypeCategory::Binary => "Binary",
            DataTypeCategory::DateTime => "Date/Time",
            DataTypeCategory::Boolean => "Boolean",
            DataTypeCategory::Json => "JSON",
            DataTypeCategory::Spatial => "Spatial",
            DataTypeCategory::Other => "Other",
        }
    }

    /// Whether values of this category are numbers
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            DataTypeCategory::Integer
                | DataTypeCategory::Float
                | DataTypeCategory::Decimal
                | DataTypeCategory::Boolean
        )
    }
}

const fn integer(name: &'static str) -> DataTypeInfo {
    DataTypeInfo {
        name,
        category: DataTypeCategory::Integer,
        supports_length: true,
        supports_unsigned: true,
        supports_charset: false,
        supports_auto_increment: true,
    }
}

const fn float(name: &'static str, category: DataTypeCategory) -> DataTypeInfo {
    DataTypeInfo {
        name,
        category,
        supports_length: true,
        supports_unsigned: true,
        supports_charset: false,
        supports_auto_increment: matches!(category, DataTypeCategory::Float),
    }
}

const fn text(name: &'static str, supports_length: bool) -> DataTypeInfo {
    DataTypeInfo {
        name,
        category: DataTypeCategory::String,
        supports_length,
        supports_unsigned: false,
        supports_charset: true,
        supports_auto_increment: false,
    }
}

const fn plain(name: &'static str, category: DataTypeCategory, supports_length: bool) -> DataTypeInfo {
    DataTypeInfo {
        name,
        category,
        supports_length,
        supports_unsigned: false,
        supports_charset: false,
        supports_auto_increment: false,
    }
}

static MYSQL_DATA_TYPES: &[DataTypeInfo] = &[
    integer("tinyint"),
    integer("smallint"),
    integer("mediumint"),
    integer("int"),
    integer("integer"),
    integer("bigint"),
    plain("bit", DataTypeCategory::Integer, true),
    DataTypeInfo {
        name: "bool",
        category: DataTypeCategory::Boolean,
        supports_length: false,
        supports_unsigned: false,
        supports_charset: false,
        supports_auto_increment: false,
    },
    float("float", DataTypeCategory::Float),
    float("double", DataTypeCategory::Float),
    float("decimal", DataTypeCategory::Decimal),
    float("numeric", DataTypeCategory::Decimal),
    text("char", true),
    text("varchar", true),
    text("tinytext", false),
    text("text", false),
    text("mediumtext", false),
    text("longtext", false),
    text("enum", true),
    text("set", true),
    plain("binary", DataTypeCategory::Binary, true),
    plain("varbinary", DataTypeCategory::Binary, true),
    plain("tinyblob", DataTypeCategory::Binary, false),
    plain("blob", DataTypeCategory::Binary, false),
    plain("mediumblob", DataTypeCategory::Binary, false),
    plain("longblob", DataTypeCategory::Binary, false),
    plain("date", DataTypeCategory::DateTime, false),
    plain("time", DataTypeCategory::DateTime, true),
    plain("datetime", DataTypeCategory::DateTime, true),
    plain("timestamp", DataTypeCategory::DateTime, true),
    plain("year", DataTypeCategory::DateTime, false),
    plain("json", DataTypeCategory::Json, false),
    plain("geometry", DataTypeCategory::Spatial, false),
    plain("point", DataTypeCategory::Spatial, false),
    plain("linestring", DataTypeCategory::Spatial, false),
    plain("polygon", DataTypeCategory::Spatial, false),
    plain("multipoint", DataTypeCategory::Spatial, false),
    plain("multilinestring", DataTypeCategory::Spatial, false),
    plain("multipolygon", DataTypeCategory::Spatial, false),
    plain("geometrycollection", DataTypeCategory::Spatial, false),
];

/// Get the data types offered for MySQL columns
pub fn get_data_types() -> Vec<DataTypeInfo> {
    MYSQL_DATA_TYPES.to_vec()
}

/// Look up a type by name, ignoring case
pub fn lookup_data_type(name: &str) -> Option<&'static DataTypeInfo> {
    let name = name.trim();
    MYSQL_DATA_TYPES
        .iter()
        .find(|info| info.name.eq_ignore_ascii_case(name))
}
