//! Console text splitting
//!
//! Grammar:
//! - statements end at `;` outside double quotes, or at a newline
//! - tokens are separated by whitespace; a double quoted token may contain
//!   whitespace and `;`, has its quotes removed and has no escapes
//! - a quote left open runs to the end of the statement
//! - `//` outside quotes comments out the rest of the line

/// A tokenized statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedStatement {
    pub name: String,
    pub arguments: Vec<String>,
    /// Statement text after the name, comment removed and trimmed
    pub args_text: String,
}

/// Split off the first statement
///
/// Returns the statement and the remaining text, if any separator was found.
pub fn split_first_statement(text: &str) -> (&str, Option<&str>) {
    let bytes = text.as_bytes();
    let mut in_quotes = false;
    let mut in_comment = false;
    let mut index = 0;

    while index < bytes.len() {
        match bytes[index] {
            b'\n' => return (&text[..index], Some(&text[index + 1..])),
            _ if in_comment => {}
            b'"' => in_quotes = !in_quotes,
            b';' if !in_quotes => return (&text[..index], Some(&text[index + 1..])),
            b'/' if !in_quotes && bytes.get(index + 1) == Some(&b'/') => in_comment = true,
            _ => {}
        }
        index += 1;
    }

    (text, None)
}

/// Split text into statements
pub fn split_statements(text: &str) -> Vec<&str> {
    let mut statements = Vec::new();
    let mut rest = Some(text);
    while let Some(current) = rest {
        let (statement, remainder) = split_first_statement(current);
        statements.push(statement);
        rest = remainder;
    }
    statements
}

/// Tokenize one statement
///
/// Returns `None` when the statement holds no tokens.
pub fn tokenize(statement: &str) -> Option<ParsedStatement> {
    let mut tokens: Vec<String> = Vec::new();
    let mut name_end = 0;
    let mut text_end = statement.len();
    let mut chars = statement.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        if c == '/' && statement[start..].starts_with("//") {
            text_end = start;
            break;
        }

        let mut token = String::new();
        let mut end = start;
        if c == '"' {
            chars.next();
            end = statement.len();
            for (index, c) in chars.by_ref() {
                if c == '"' {
                    end = index + 1;
                    break;
                }
                token.push(c);
            }
        } else {
            while let Some(&(index, c)) = chars.peek() {
                if c.is_whitespace() || c == '"' || statement[index..].starts_with("//") {
                    break;
                }
                token.push(c);
                end = index + c.len_utf8();
                chars.next();
            }
        }

        if tokens.is_empty() {
            name_end = end;
        }
        tokens.push(token);
    }

    let mut tokens = tokens.into_iter();
    let name = tokens.next()?;
    let args_text = statement
        .get(name_end..text_end.max(name_end))
        .unwrap_or_default()
        .trim()
        .to_string();

    Some(ParsedStatement {
        name,
        arguments: tokens.collect(),
        args_text,
    })
}
