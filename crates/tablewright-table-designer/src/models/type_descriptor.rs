//! Column type descriptor
//!
//! Splits a raw MySQL column type such as `decimal(10,2) unsigned zerofill`
//! into its parts and composes them back. Composition emits the parts in the
//! order the server reports them, so load, edit, save and reload converge.

use serde::{Deserialize, Serialize};

/// Structured form of a raw column type
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Type name as written (e.g. `int`, `varchar`, `enum`)
    pub base_type: String,
    /// Text between the parentheses, empty when absent (e.g. `10,2`, `'a','b'`)
    #[serde(default)]
    pub length: String,
    #[serde(default)]
    pub unsigned: bool,
    #[serde(default)]
    pub zerofill: bool,
}

impl TypeDescriptor {
    /// Create a descriptor for a bare type name
    pub fn new(base_type: impl Into<String>) -> Self {
        Self {
            base_type: base_type.into(),
            ..Self::default()
        }
    }

    /// Builder: set the length/precision spec
    pub fn with_length(mut self, length: impl Into<String>) -> Self {
        self.length = length.into();
        self
    }

    /// Builder: mark unsigned
    pub fn unsigned(mut self) -> Self {
        self.unsigned = true;
        self
    }

    /// Builder: mark zerofill
    pub fn zerofill(mut self) -> Self {
        self.zerofill = true;
        self
    }

    /// Parse `NAME[(LENGTH_OR_PRECISION)][ SUFFIX_WORDS]`.
    ///
    /// `unsigned` and `zerofill` are recognised in either order and any case.
    /// Unknown type names pass through untouched.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let mut descriptor = TypeDescriptor::default();

        let suffix = match raw.find('(').and_then(|open| {
            closing_paren(raw, open).map(|close| (open, close))
        }) {
            Some((open, close)) => {
                descriptor.base_type = raw[..open].trim().to_string();
                descriptor.length = raw[open + 1..close].to_string();
                &raw[close + 1..]
            }
            None => raw,
        };

        let has_parens = !descriptor.length.is_empty() || !descriptor.base_type.is_empty();
        let mut base_words: Vec<&str> = Vec::new();
        for word in suffix.split_whitespace() {
            if word.eq_ignore_ascii_case("unsigned") {
                descriptor.unsigned = true;
            } else if word.eq_ignore_ascii_case("zerofill") {
                descriptor.zerofill = true;
            } else if !has_parens && !descriptor.unsigned && !descriptor.zerofill {
                // Multi-word names such as `double precision`
                base_words.push(word);
            } else {
                tracing::warn!(raw_type = %raw, word = %word, "ignoring unrecognised type suffix");
            }
        }

        if !has_parens {
            descriptor.base_type = base_words.join(" ");
        }

        descriptor
    }

    /// Compose the raw type: `base[(length)][ unsigned][ zerofill]`
    pub fn compose(&self) -> String {
        let mut raw = self.sql_type();
        if self.unsigned {
            raw.push_str(" unsigned");
        }
        if self.zerofill {
            raw.push_str(" zerofill");
        }
        raw
    }

    /// Type name with its length spec only, as used in column definitions
    pub fn sql_type(&self) -> String {
        if self.length.is_empty() {
            self.base_type.clone()
        } else {
            format!("{}({})", self.base_type, self.length)
        }
    }
}

impl std::fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.compose())
    }
}

/// Parse a raw type string into its parts
pub fn parse_type(raw: &str) -> TypeDescriptor {
    TypeDescriptor::parse(raw)
}

/// Compose a raw type string from its parts
pub fn compose_type(base_type: &str, length: &str, unsigned: bool, zerofill: bool) -> String {
    TypeDescriptor {
        base_type: base_type.to_string(),
        length: length.to_string(),
        unsigned,
        zerofill,
    }
    .compose()
}

/// Find the parenthesis closing the one at `open`, skipping quoted enum/set values.
fn closing_paren(raw: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (offset, ch) in raw[open..].char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == q {
                // A doubled quote re-enters the literal on the next char
                quote = None;
            }
            continue;
        }
        match ch {
            '\'' | '"' => quote = Some(ch),
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(open + offset);
                }
            }
            _ => {}
        }
    }
    None
}
