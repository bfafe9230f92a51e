//! Column design model

use serde::{Deserialize, Serialize};
use tablewright_core::ColumnInfo;

use super::TypeDescriptor;

/// Key role reported for a column (`COLUMN_KEY`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKey {
    #[default]
    None,
    Primary,
    Unique,
    Index,
}

impl ColumnKey {
    /// Parse the `PRI` / `UNI` / `MUL` codes
    pub fn from_mysql(code: &str) -> Self {
        match code.trim().to_uppercase().as_str() {
            "PRI" => ColumnKey::Primary,
            "UNI" => ColumnKey::Unique,
            "MUL" => ColumnKey::Index,
            _ => ColumnKey::None,
        }
    }
}

/// Column default value
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum DefaultValue {
    /// No default; nullable columns render `DEFAULT NULL`
    #[default]
    None,
    /// Explicit `DEFAULT NULL`
    Null,
    /// `CURRENT_TIMESTAMP` with optional fractional-second precision
    CurrentTimestamp { precision: Option<u8> },
    /// Expression default, rendered in parentheses
    Expression(String),
    /// String literal, always rendered quoted
    Literal(String),
}

impl DefaultValue {
    /// Interpret `COLUMN_DEFAULT` together with the column's `EXTRA`
    pub fn from_catalog(value: Option<&str>, extra: &str) -> Self {
        let Some(value) = value else {
            return DefaultValue::None;
        };
        if let Some(precision) = parse_current_timestamp(value) {
            return DefaultValue::CurrentTimestamp { precision };
        }
        if extra.to_ascii_uppercase().contains("DEFAULT_GENERATED") {
            return DefaultValue::Expression(value.to_string());
        }
        DefaultValue::Literal(value.to_string())
    }

    /// Interpret a value typed into the editor.
    ///
    /// Empty means no default, the bare words `NULL` and `CURRENT_TIMESTAMP`
    /// are keywords in any case, a parenthesised value is an expression.
    pub fn from_input(input: &str) -> Self {
        if input.is_empty() {
            return DefaultValue::None;
        }
        if input.trim().eq_ignore_ascii_case("NULL") {
            return DefaultValue::Null;
        }
        if let Some(precision) = parse_current_timestamp(input) {
            return DefaultValue::CurrentTimestamp { precision };
        }
        let trimmed = input.trim();
        if trimmed.len() >= 2 && trimmed.starts_with('(') && trimmed.ends_with(')') {
            return DefaultValue::Expression(trimmed[1..trimmed.len() - 1].trim().to_string());
        }
        DefaultValue::Literal(input.to_string())
    }

    pub fn is_none(&self) -> bool {
        matches!(self, DefaultValue::None)
    }
}

/// Generated column definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedColumn {
    pub expression: String,
    /// `STORED` when true, `VIRTUAL` otherwise
    #[serde(default)]
    pub stored: bool,
}

/// Flags from MySQL's `EXTRA` column
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnExtra {
    pub auto_increment: bool,
    pub on_update_current_timestamp: bool,
    /// Precision of `on update CURRENT_TIMESTAMP(p)`
    pub on_update_precision: Option<u8>,
    pub invisible: bool,
    pub generated: Option<GeneratedColumn>,
    /// Informational only; the server sets it for expression defaults
    pub default_generated: bool,
}

impl ColumnExtra {
    /// Parse `EXTRA` (e.g. `DEFAULT_GENERATED on update CURRENT_TIMESTAMP(3)`)
    pub fn parse(extra: &str, generation_expression: Option<&str>) -> Self {
        let upper = extra.to_ascii_uppercase();
        let mut parsed = ColumnExtra {
            auto_increment: upper.contains("AUTO_INCREMENT"),
            invisible: upper.contains("INVISIBLE"),
            default_generated: upper.contains("DEFAULT_GENERATED"),
            ..ColumnExtra::default()
        };

        if let Some(pos) = upper.find("ON UPDATE") {
            let rest = extra[pos + "ON UPDATE".len()..].trim_start();
            let word = rest.split_whitespace().next().unwrap_or_default();
            if let Some(precision) = parse_current_timestamp(word) {
                parsed.on_update_current_timestamp = true;
                parsed.on_update_precision = precision;
            }
        }

        let stored = upper.contains("STORED GENERATED");
        if stored || upper.contains("VIRTUAL GENERATED") {
            parsed.generated = Some(GeneratedColumn {
                expression: generation_expression.unwrap_or_default().to_string(),
                stored,
            });
        }

        parsed
    }
}

/// Column design model for the table editor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDesign {
    /// Column name
    pub name: String,
    /// Name at load time; `None` for columns created in this session
    #[serde(default)]
    pub original_name: Option<String>,
    /// Created in this session, has no backing column
    #[serde(default)]
    pub is_new: bool,
    /// Parsed column type, written as the raw string in design files
    #[serde(rename = "type", with = "raw_type")]
    pub data_type: TypeDescriptor,
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    #[serde(default)]
    pub key: ColumnKey,
    #[serde(default)]
    pub default: DefaultValue,
    #[serde(default)]
    pub extra: ColumnExtra,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub charset: Option<String>,
    #[serde(default)]
    pub collation: Option<String>,
}

fn default_nullable() -> bool {
    true
}

impl ColumnDesign {
    /// Create a column that does not exist in the database yet
    pub fn new(name: impl Into<String>, raw_type: &str) -> Self {
        Self {
            name: name.into(),
            original_name: None,
            is_new: true,
            data_type: TypeDescriptor::parse(raw_type),
            nullable: true,
            key: ColumnKey::None,
            default: DefaultValue::None,
            extra: ColumnExtra::default(),
            comment: String::new(),
            charset: None,
            collation: None,
        }
    }

    /// Create from existing column info
    pub fn from_column_info(info: &ColumnInfo) -> Self {
        let extra = ColumnExtra::parse(&info.extra, info.generation_expression.as_deref());
        let default = if extra.generated.is_some() {
            DefaultValue::None
        } else {
            DefaultValue::from_catalog(info.default_value.as_deref(), &info.extra)
        };

        Self {
            name: info.name.clone(),
            original_name: Some(info.name.clone()),
            is_new: false,
            data_type: TypeDescriptor::parse(&info.column_type),
            nullable: info.nullable,
            key: ColumnKey::from_mysql(&info.column_key),
            default,
            extra,
            comment: info.comment.clone(),
            charset: info.character_set.clone(),
            collation: info.collation.clone(),
        }
    }

    /// Builder: mark as an already-existing column loaded under its current name
    pub fn existing(mut self) -> Self {
        self.is_new = false;
        self.original_name = Some(self.name.clone());
        self
    }

    /// Builder: set as not null
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Builder: set as primary key
    pub fn primary_key(mut self) -> Self {
        self.key = ColumnKey::Primary;
        self.nullable = false;
        self
    }

    /// Builder: set key role
    pub fn key(mut self, key: ColumnKey) -> Self {
        self.key = key;
        self
    }

    /// Builder: set as auto increment
    pub fn auto_increment(mut self) -> Self {
        self.extra.auto_increment = true;
        self
    }

    /// Builder: set default value
    pub fn default_value(mut self, value: DefaultValue) -> Self {
        self.default = value;
        self
    }

    /// Builder: set comment
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Builder: set character set and collation
    pub fn charset(mut self, charset: impl Into<String>, collation: impl Into<String>) -> Self {
        self.charset = Some(charset.into());
        self.collation = Some(collation.into());
        self
    }

    /// Builder: make this a generated column
    pub fn generated(mut self, expression: impl Into<String>, stored: bool) -> Self {
        self.extra.generated = Some(GeneratedColumn {
            expression: expression.into(),
            stored,
        });
        self
    }

    /// Raw column type (e.g. `int(10) unsigned`)
    pub fn raw_type(&self) -> String {
        self.data_type.compose()
    }

    /// Whether the name differs from the one loaded
    pub fn is_renamed(&self) -> bool {
        self.original_name
            .as_deref()
            .is_some_and(|original| original != self.name)
    }
}

mod raw_type {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::models::TypeDescriptor;

    pub fn serialize<S: Serializer>(value: &TypeDescriptor, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.compose())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<TypeDescriptor, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(TypeDescriptor::parse(&raw))
    }
}

/// Match `CURRENT_TIMESTAMP`, `current_timestamp()` or `CURRENT_TIMESTAMP(3)`.
///
/// Returns the optional precision on a match.
fn parse_current_timestamp(value: &str) -> Option<Option<u8>> {
    let value = value.trim();
    let head = value.get(..17)?;
    if !head.eq_ignore_ascii_case("CURRENT_TIMESTAMP") {
        return None;
    }
    let rest = value[17..].trim();
    if rest.is_empty() {
        return Some(None);
    }
    let inner = rest.strip_prefix('(')?.strip_suffix(')')?.trim();
    if inner.is_empty() {
        return Some(None);
    }
    inner.parse::<u8>().ok().map(Some)
}
