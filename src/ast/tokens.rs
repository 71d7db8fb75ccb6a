/// Lexical tokens of the query language.
///
/// Keywords are matched case-insensitively by the lexer; the original
/// spelling is still available through the token's [`Span`].
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    /// Integer
    ///
    /// # Examples
    /// ```text
    /// 42
    /// 0
    /// ```
    Integer(i64),

    /// Floating-point number
    ///
    /// # Examples
    /// ```text
    /// 3.14
    /// 0.5
    /// ```
    Float(f64),

    /// String literal enclosed in single or double quotes
    ///
    /// # Examples
    /// ```text
    /// 'East'
    /// "A%"
    /// 'it''s'
    /// ```
    String(String),

    /// Column name, table name, alias or function name
    ///
    /// Starts with a letter or underscore, followed by letters, digits or
    /// underscores.
    Identifier(String),

    // Clause keywords
    Select,
    From,
    Where,
    /// `GROUP`, only a clause keyword when followed by `BY`
    Group,
    /// `ORDER`, only a clause keyword when followed by `BY`
    Order,
    By,
    Limit,
    /// `JOIN` is recognised only so it can be rejected
    Join,

    // Other keywords
    And,
    Or,
    Like,
    As,
    Asc,
    Desc,

    // Comparison
    /// `=`
    Eq,
    /// `!=`
    NotEq,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    LtEq,
    /// `>=`
    GtEq,

    // Arithmetic, only meaningful inside select expressions
    Plus,
    Minus,
    Star,
    Slash,
    Percent,

    // Delimiters
    LParen,
    RParen,
    Comma,
    Dot,

    /// Any other printable character, e.g. `@` or `:`
    ///
    /// Only meaningful inside an unquoted comparison value such as
    /// `email = a@b.com`.
    Symbol(char),

    /// End of input
    Eof,
}

impl Token {
    /// Maps a bare word to its keyword token, or an identifier.
    pub fn from_word(word: &str) -> Token {
        match word.to_ascii_uppercase().as_str() {
            "SELECT" => Token::Select,
            "FROM" => Token::From,
            "WHERE" => Token::Where,
            "GROUP" => Token::Group,
            "ORDER" => Token::Order,
            "BY" => Token::By,
            "LIMIT" => Token::Limit,
            "JOIN" => Token::Join,
            "AND" => Token::And,
            "OR" => Token::Or,
            "LIKE" => Token::Like,
            "AS" => Token::As,
            "ASC" => Token::Asc,
            "DESC" => Token::Desc,
            _ => Token::Identifier(word.to_string()),
        }
    }

    /// Words that may still name a column where an identifier is expected.
    pub fn is_soft_keyword(&self) -> bool {
        matches!(
            self,
            Token::Group | Token::Order | Token::By | Token::Asc | Token::Desc
        )
    }
}

/// Byte range of a token within the normalized query text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// A token together with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub span: Span,
}
