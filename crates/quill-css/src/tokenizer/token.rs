//! CSS token types per [§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization).
//!
//! Tokens are plain values: once the tokenizer hands one out it is never
//! touched again. The selector builder and the rule parser both consume
//! them one at a time.

use core::fmt;

/// [§ 4.2 Definitions](https://www.w3.org/TR/css-syntax-3/#typedef-hash-token)
///
/// Whether a `<hash-token>` could also be read as an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashType {
    /// The value is a valid identifier (`#main`).
    Id,
    /// Anything else (`#1a2b3c`).
    Unrestricted,
}

/// [§ 4.2 Definitions](https://www.w3.org/TR/css-syntax-3/#typedef-number-token)
///
/// Type flag of numeric tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericType {
    /// Digits only, with an optional sign.
    Integer,
    /// Has a fraction or an exponent.
    Number,
}

/// A token produced by [`crate::tokenizer::CSSTokenizer`].
#[derive(Debug, Clone, PartialEq)]
pub enum CSSToken {
    /// `<ident-token>`
    Ident(String),
    /// `<function-token>`: the name, the `(` is implied.
    Function(String),
    /// `<at-keyword-token>`: the name without `@`.
    AtKeyword(String),
    /// `<hash-token>`
    Hash {
        /// Code points after the `#`.
        value: String,
        /// Type flag.
        hash_type: HashType,
    },
    /// `<string-token>` with quotes removed and escapes resolved.
    String(String),
    /// `<bad-string-token>`: a string broken by a newline.
    BadString,
    /// `<url-token>` from an unquoted `url(...)`.
    Url(String),
    /// `<bad-url-token>`
    BadUrl,
    /// `<delim-token>`: any single code point with no token of its own.
    Delim(char),
    /// `<number-token>`
    Number {
        /// Numeric value.
        value: f64,
        /// Exact value when the type flag is integer and it fits.
        int_value: Option<i64>,
        /// Type flag.
        numeric_type: NumericType,
    },
    /// `<percentage-token>`
    Percentage {
        /// Numeric value (without the `%`).
        value: f64,
        /// Exact value when the type flag is integer and it fits.
        int_value: Option<i64>,
        /// Type flag.
        numeric_type: NumericType,
    },
    /// `<dimension-token>`
    Dimension {
        /// Numeric value.
        value: f64,
        /// Exact value when the type flag is integer and it fits.
        int_value: Option<i64>,
        /// Type flag.
        numeric_type: NumericType,
        /// Unit identifier, as written.
        unit: String,
    },
    /// `<whitespace-token>`: one or more whitespace code points.
    Whitespace,
    /// `<CDO-token>` (`<!--`)
    CDO,
    /// `<CDC-token>` (`-->`)
    CDC,
    /// `<colon-token>`
    Colon,
    /// `<semicolon-token>`
    Semicolon,
    /// `<comma-token>`
    Comma,
    /// `<[-token>`
    LeftBracket,
    /// `<]-token>`
    RightBracket,
    /// `<(-token>`
    LeftParen,
    /// `<)-token>`
    RightParen,
    /// `<{-token>`
    LeftBrace,
    /// `<}-token>`
    RightBrace,
    /// End of input. Returned forever once reached.
    EOF,
}

impl CSSToken {
    /// Create an ident token.
    #[must_use]
    pub fn ident(value: impl Into<String>) -> Self {
        Self::Ident(value.into())
    }

    /// Create a string token.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    /// Create an integer number token.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn integer(value: i64) -> Self {
        Self::Number {
            value: value as f64,
            int_value: Some(value),
            numeric_type: NumericType::Integer,
        }
    }

    /// Returns true if this is an EOF token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self, Self::EOF)
    }

    /// Returns true if this is a whitespace token.
    #[must_use]
    pub const fn is_whitespace(&self) -> bool {
        matches!(self, Self::Whitespace)
    }

    /// Source text for this token, suitable for re-tokenizing.
    ///
    /// Strings come back double-quoted with `"` and `\` escaped; numbers use
    /// their integer form when they have one.
    #[must_use]
    pub fn to_css(&self) -> String {
        match self {
            Self::Ident(v) => v.clone(),
            Self::Function(v) => format!("{v}("),
            Self::AtKeyword(v) => format!("@{v}"),
            Self::Hash { value, .. } => format!("#{value}"),
            Self::String(v) => quote_string(v),
            Self::BadString | Self::BadUrl => String::new(),
            Self::Url(v) => format!("url({v})"),
            Self::Delim(c) => c.to_string(),
            Self::Number {
                value, int_value, ..
            } => format_number(*value, *int_value),
            Self::Percentage {
                value, int_value, ..
            } => format!("{}%", format_number(*value, *int_value)),
            Self::Dimension {
                value,
                int_value,
                unit,
                ..
            } => format!("{}{unit}", format_number(*value, *int_value)),
            Self::Whitespace => " ".to_string(),
            Self::CDO => "<!--".to_string(),
            Self::CDC => "-->".to_string(),
            Self::Colon => ":".to_string(),
            Self::Semicolon => ";".to_string(),
            Self::Comma => ",".to_string(),
            Self::LeftBracket => "[".to_string(),
            Self::RightBracket => "]".to_string(),
            Self::LeftParen => "(".to_string(),
            Self::RightParen => ")".to_string(),
            Self::LeftBrace => "{".to_string(),
            Self::RightBrace => "}".to_string(),
            Self::EOF => String::new(),
        }
    }
}

/// Integer form when present, shortest float form otherwise.
#[must_use]
pub fn format_number(value: f64, int_value: Option<i64>) -> String {
    int_value.map_or_else(|| value.to_string(), |i| i.to_string())
}

/// [CSSOM § 2.1 serialize a string](https://drafts.csswg.org/cssom/#serialize-a-string)
#[must_use]
pub fn quote_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push_str("\\a "),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

impl fmt::Display for CSSToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ident(v) => write!(f, "<ident:{v}>"),
            Self::Function(v) => write!(f, "<function:{v}(>"),
            Self::AtKeyword(v) => write!(f, "<at-keyword:@{v}>"),
            Self::Hash { value, hash_type } => {
                let t = match hash_type {
                    HashType::Id => "id",
                    HashType::Unrestricted => "unrestricted",
                };
                write!(f, "<hash:#{value} ({t})>")
            }
            Self::String(v) => write!(f, "<string:{}>", quote_string(v)),
            Self::BadString => write!(f, "<bad-string>"),
            Self::Url(v) => write!(f, "<url:{v}>"),
            Self::BadUrl => write!(f, "<bad-url>"),
            Self::Delim(c) => write!(f, "<delim:{c}>"),
            Self::Number { .. } => write!(f, "<number:{}>", self.to_css()),
            Self::Percentage { .. } => write!(f, "<percentage:{}>", self.to_css()),
            Self::Dimension { .. } => write!(f, "<dimension:{}>", self.to_css()),
            Self::Whitespace => write!(f, "<whitespace>"),
            Self::EOF => write!(f, "<EOF>"),
            punct => write!(f, "<{}>", punct.to_css()),
        }
    }
}
