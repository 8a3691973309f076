use super::token::{CSSToken, HashType, NumericType};

/// [§ 4.3 Tokenizer Algorithms](https://www.w3.org/TR/css-syntax-3/#tokenizer-algorithms)
///
/// Pull-based CSS tokenizer. Each [`CSSTokenizer::next_token`] call consumes
/// exactly one token; once the input is exhausted every further call
/// returns [`CSSToken::EOF`].
pub struct CSSTokenizer {
    /// Preprocessed input code points
    input: Vec<char>,
    /// Index of the next code point to consume
    position: usize,
    /// Tokens collected by [`CSSTokenizer::run`]
    tokens: Vec<CSSToken>,
}

impl CSSTokenizer {
    /// Create a tokenizer over `input`, applying the input preprocessing
    /// step up front.
    pub fn new(input: impl AsRef<str>) -> Self {
        Self {
            input: preprocess(input.as_ref()),
            position: 0,
            tokens: Vec::new(),
        }
    }

    /// Tokenize the whole input into the internal buffer, ending with a
    /// single EOF token.
    pub fn run(&mut self) {
        loop {
            let token = self.next_token();
            let is_eof = token.is_eof();
            self.tokens.push(token);
            if is_eof {
                break;
            }
        }
    }

    /// Return the tokens collected by [`CSSTokenizer::run`].
    #[must_use]
    pub fn into_tokens(self) -> Vec<CSSToken> {
        self.tokens
    }

    /// [§ 4.3.1 Consume a token](https://www.w3.org/TR/css-syntax-3/#consume-token)
    ///
    /// Comments are consumed first and never surface as tokens.
    pub fn next_token(&mut self) -> CSSToken {
        self.consume_comments();

        let Some(c) = self.consume() else {
            return CSSToken::EOF;
        };

        match c {
            c if is_whitespace(c) => {
                self.consume_whitespace();
                CSSToken::Whitespace
            }
            '"' | '\'' => self.consume_string_token(c),
            '#' => {
                if self.peek(0).is_some_and(is_ident_code_point)
                    || is_valid_escape(self.peek(0), self.peek(1))
                {
                    // "If the next 3 input code points would start an ident
                    // sequence, set the <hash-token>'s type flag to 'id'."
                    let hash_type = if starts_ident(self.peek(0), self.peek(1), self.peek(2)) {
                        HashType::Id
                    } else {
                        HashType::Unrestricted
                    };
                    let value = self.consume_ident_sequence();
                    CSSToken::Hash { value, hash_type }
                } else {
                    CSSToken::Delim('#')
                }
            }
            '(' => CSSToken::LeftParen,
            ')' => CSSToken::RightParen,
            '+' | '.' => {
                if starts_number(Some(c), self.peek(0), self.peek(1)) {
                    self.reconsume();
                    self.consume_numeric_token()
                } else {
                    CSSToken::Delim(c)
                }
            }
            ',' => CSSToken::Comma,
            '-' => {
                if starts_number(Some('-'), self.peek(0), self.peek(1)) {
                    self.reconsume();
                    self.consume_numeric_token()
                } else if self.peek(0) == Some('-') && self.peek(1) == Some('>') {
                    self.position += 2;
                    CSSToken::CDC
                } else if starts_ident(Some('-'), self.peek(0), self.peek(1)) {
                    self.reconsume();
                    self.consume_ident_like_token()
                } else {
                    CSSToken::Delim('-')
                }
            }
            ':' => CSSToken::Colon,
            ';' => CSSToken::Semicolon,
            '<' => {
                if self.peek(0) == Some('!')
                    && self.peek(1) == Some('-')
                    && self.peek(2) == Some('-')
                {
                    self.position += 3;
                    CSSToken::CDO
                } else {
                    CSSToken::Delim('<')
                }
            }
            '@' => {
                if starts_ident(self.peek(0), self.peek(1), self.peek(2)) {
                    CSSToken::AtKeyword(self.consume_ident_sequence())
                } else {
                    CSSToken::Delim('@')
                }
            }
            '[' => CSSToken::LeftBracket,
            '\\' => {
                if is_valid_escape(Some('\\'), self.peek(0)) {
                    self.reconsume();
                    self.consume_ident_like_token()
                } else {
                    // Parse error: a backslash before a newline.
                    CSSToken::Delim('\\')
                }
            }
            ']' => CSSToken::RightBracket,
            '{' => CSSToken::LeftBrace,
            '}' => CSSToken::RightBrace,
            c if c.is_ascii_digit() => {
                self.reconsume();
                self.consume_numeric_token()
            }
            c if is_ident_start_code_point(c) => {
                self.reconsume();
                self.consume_ident_like_token()
            }
            c => CSSToken::Delim(c),
        }
    }

    /// [§ 4.3.2 Consume comments](https://www.w3.org/TR/css-syntax-3/#consume-comment)
    ///
    /// An unterminated comment runs to the end of input.
    fn consume_comments(&mut self) {
        while self.peek(0) == Some('/') && self.peek(1) == Some('*') {
            self.position += 2;
            loop {
                match self.consume() {
                    Some('*') if self.peek(0) == Some('/') => {
                        self.position += 1;
                        break;
                    }
                    Some(_) => {}
                    None => return,
                }
            }
        }
    }

    fn consume_whitespace(&mut self) {
        while self.peek(0).is_some_and(is_whitespace) {
            self.position += 1;
        }
    }

    /// [§ 4.3.5 Consume a string token](https://www.w3.org/TR/css-syntax-3/#consume-string-token)
    fn consume_string_token(&mut self, ending: char) -> CSSToken {
        let mut value = String::new();
        loop {
            match self.consume() {
                // EOF inside a string is a parse error but still yields the string.
                None => return CSSToken::String(value),
                Some(c) if c == ending => return CSSToken::String(value),
                Some('\n') => {
                    self.reconsume();
                    return CSSToken::BadString;
                }
                Some('\\') => match self.peek(0) {
                    None => {}
                    Some('\n') => self.position += 1,
                    Some(_) => value.push(self.consume_escaped_code_point()),
                },
                Some(c) => value.push(c),
            }
        }
    }

    /// [§ 4.3.3 Consume a numeric token](https://www.w3.org/TR/css-syntax-3/#consume-numeric-token)
    fn consume_numeric_token(&mut self) -> CSSToken {
        let (value, int_value, numeric_type) = self.consume_number();

        if starts_ident(self.peek(0), self.peek(1), self.peek(2)) {
            let unit = self.consume_ident_sequence();
            CSSToken::Dimension {
                value,
                int_value,
                numeric_type,
                unit,
            }
        } else if self.peek(0) == Some('%') {
            self.position += 1;
            CSSToken::Percentage {
                value,
                int_value,
                numeric_type,
            }
        } else {
            CSSToken::Number {
                value,
                int_value,
                numeric_type,
            }
        }
    }

    /// [§ 4.3.4 Consume an ident-like token](https://www.w3.org/TR/css-syntax-3/#consume-ident-like-token)
    fn consume_ident_like_token(&mut self) -> CSSToken {
        let string = self.consume_ident_sequence();

        if self.peek(0) != Some('(') {
            return CSSToken::Ident(string);
        }
        self.position += 1;

        if !string.eq_ignore_ascii_case("url") {
            return CSSToken::Function(string);
        }

        // `url(` followed by a quote is an ordinary function call.
        self.consume_whitespace();
        if matches!(self.peek(0), Some('"' | '\'')) {
            CSSToken::Function(string)
        } else {
            self.consume_url_token()
        }
    }

    /// [§ 4.3.6 Consume a url token](https://www.w3.org/TR/css-syntax-3/#consume-url-token)
    fn consume_url_token(&mut self) -> CSSToken {
        let mut value = String::new();
        self.consume_whitespace();

        loop {
            match self.consume() {
                Some(')') | None => return CSSToken::Url(value),
                Some(c) if is_whitespace(c) => {
                    self.consume_whitespace();
                    return match self.consume() {
                        Some(')') | None => CSSToken::Url(value),
                        Some(_) => {
                            self.consume_bad_url_remnants();
                            CSSToken::BadUrl
                        }
                    };
                }
                Some('"' | '\'' | '(') => {
                    self.consume_bad_url_remnants();
                    return CSSToken::BadUrl;
                }
                Some(c) if is_non_printable(c) => {
                    self.consume_bad_url_remnants();
                    return CSSToken::BadUrl;
                }
                Some('\\') => {
                    if is_valid_escape(Some('\\'), self.peek(0)) {
                        value.push(self.consume_escaped_code_point());
                    } else {
                        self.consume_bad_url_remnants();
                        return CSSToken::BadUrl;
                    }
                }
                Some(c) => value.push(c),
            }
        }
    }

    /// [§ 4.3.14 Consume the remnants of a bad url](https://www.w3.org/TR/css-syntax-3/#consume-remnants-of-bad-url)
    fn consume_bad_url_remnants(&mut self) {
        loop {
            match self.consume() {
                Some(')') | None => return,
                Some('\\') if is_valid_escape(Some('\\'), self.peek(0)) => {
                    let _ = self.consume_escaped_code_point();
                }
                Some(_) => {}
            }
        }
    }

    /// [§ 4.3.11 Consume an ident sequence](https://www.w3.org/TR/css-syntax-3/#consume-name)
    fn consume_ident_sequence(&mut self) -> String {
        let mut result = String::new();
        loop {
            match self.peek(0) {
                Some(c) if is_ident_code_point(c) => {
                    result.push(c);
                    self.position += 1;
                }
                Some('\\') if is_valid_escape(Some('\\'), self.peek(1)) => {
                    self.position += 1;
                    result.push(self.consume_escaped_code_point());
                }
                _ => return result,
            }
        }
    }

    /// [§ 4.3.12 Consume a number](https://www.w3.org/TR/css-syntax-3/#consume-number)
    fn consume_number(&mut self) -> (f64, Option<i64>, NumericType) {
        let mut numeric_type = NumericType::Integer;
        let mut repr = String::new();

        if let Some(sign) = self.consume_if(|c| c == '+' || c == '-') {
            repr.push(sign);
        }
        self.consume_digits(&mut repr);

        if self.peek(0) == Some('.') && self.peek(1).is_some_and(|c| c.is_ascii_digit()) {
            repr.push('.');
            self.position += 1;
            self.consume_digits(&mut repr);
            numeric_type = NumericType::Number;
        }

        if matches!(self.peek(0), Some('e' | 'E')) {
            let signed = matches!(self.peek(1), Some('+' | '-'));
            let digit_at = if signed { 2 } else { 1 };
            if self.peek(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                repr.push('e');
                self.position += 1;
                if let Some(sign) = self.consume_if(|c| c == '+' || c == '-') {
                    repr.push(sign);
                }
                self.consume_digits(&mut repr);
                numeric_type = NumericType::Number;
            }
        }

        let value = repr.parse().unwrap_or(0.0);
        let int_value = match numeric_type {
            NumericType::Integer => repr.trim_start_matches('+').parse().ok(),
            NumericType::Number => None,
        };
        (value, int_value, numeric_type)
    }

    fn consume_digits(&mut self, repr: &mut String) {
        while let Some(digit) = self.consume_if(|c| c.is_ascii_digit()) {
            repr.push(digit);
        }
    }

    /// [§ 4.3.7 Consume an escaped code point](https://www.w3.org/TR/css-syntax-3/#consume-escaped-code-point)
    ///
    /// Called with the backslash already consumed.
    fn consume_escaped_code_point(&mut self) -> char {
        match self.consume() {
            Some(c) if c.is_ascii_hexdigit() => {
                let mut hex = String::from(c);
                for _ in 0..5 {
                    match self.consume_if(|c| c.is_ascii_hexdigit()) {
                        Some(digit) => hex.push(digit),
                        None => break,
                    }
                }
                let _ = self.consume_if(is_whitespace);
                // Zero, surrogates and out-of-range values all map to U+FFFD.
                u32::from_str_radix(&hex, 16)
                    .ok()
                    .filter(|&cp| cp != 0)
                    .and_then(char::from_u32)
                    .unwrap_or('\u{FFFD}')
            }
            None => '\u{FFFD}',
            Some(c) => c,
        }
    }

    fn consume(&mut self) -> Option<char> {
        let c = self.input.get(self.position).copied()?;
        self.position += 1;
        Some(c)
    }

    fn consume_if(&mut self, pred: impl Fn(char) -> bool) -> Option<char> {
        let c = self.peek(0).filter(|&c| pred(c))?;
        self.position += 1;
        Some(c)
    }

    const fn reconsume(&mut self) {
        self.position = self.position.saturating_sub(1);
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }
}

/// [§ 3.3 Preprocessing the input stream](https://www.w3.org/TR/css-syntax-3/#input-preprocessing)
///
/// CRLF, CR and FF become LF; NUL and surrogates become U+FFFD.
fn preprocess(input: &str) -> Vec<char> {
    let mut out = Vec::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                let _ = chars.next_if_eq(&'\n');
                out.push('\n');
            }
            '\x0C' => out.push('\n'),
            '\0' => out.push('\u{FFFD}'),
            c => out.push(c),
        }
    }
    out
}

/// [§ 4.3.8 Check if two code points are a valid escape](https://www.w3.org/TR/css-syntax-3/#starts-with-a-valid-escape)
fn is_valid_escape(first: Option<char>, second: Option<char>) -> bool {
    first == Some('\\') && second != Some('\n')
}

/// [§ 4.3.9 Check if three code points would start an ident sequence](https://www.w3.org/TR/css-syntax-3/#would-start-an-identifier)
fn starts_ident(first: Option<char>, second: Option<char>, third: Option<char>) -> bool {
    match first {
        Some('-') => {
            second.is_some_and(|c| is_ident_start_code_point(c) || c == '-')
                || is_valid_escape(second, third)
        }
        Some('\\') => is_valid_escape(first, second),
        Some(c) => is_ident_start_code_point(c),
        None => false,
    }
}

/// [§ 4.3.10 Check if three code points would start a number](https://www.w3.org/TR/css-syntax-3/#starts-with-a-number)
fn starts_number(first: Option<char>, second: Option<char>, third: Option<char>) -> bool {
    let is_digit = |c: Option<char>| c.is_some_and(|c| c.is_ascii_digit());
    match first {
        Some('+' | '-') => is_digit(second) || (second == Some('.') && is_digit(third)),
        Some('.') => is_digit(second),
        c => is_digit(c),
    }
}

/// Newline, tab or space (CR and FF are gone after preprocessing).
const fn is_whitespace(c: char) -> bool {
    matches!(c, '\n' | '\t' | ' ')
}

/// [§ 4.2 ident-start code point](https://www.w3.org/TR/css-syntax-3/#ident-start-code-point)
const fn is_ident_start_code_point(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

/// [§ 4.2 ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
const fn is_ident_code_point(c: char) -> bool {
    is_ident_start_code_point(c) || c.is_ascii_digit() || c == '-'
}

/// [§ 4.2 non-printable code point](https://www.w3.org/TR/css-syntax-3/#non-printable-code-point)
const fn is_non_printable(c: char) -> bool {
    matches!(c, '\0'..='\x08' | '\x0B' | '\x0E'..='\x1F' | '\x7F')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preprocess_newlines_and_nul() {
        assert_eq!(
            preprocess("a\r\nb\rc\x0Cd\0").into_iter().collect::<String>(),
            "a\nb\nc\nd\u{FFFD}"
        );
    }

    #[test]
    fn test_three_code_point_checks() {
        assert!(starts_ident(Some('-'), Some('-'), None));
        assert!(starts_ident(Some('-'), Some('a'), None));
        assert!(!starts_ident(Some('-'), Some('1'), None));
        assert!(starts_number(Some('-'), Some('.'), Some('5')));
        assert!(!starts_number(Some('+'), Some('.'), Some('a')));
        assert!(!starts_number(Some('.'), None, None));
    }
}
