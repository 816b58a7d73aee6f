//! Model text import
//!
//! The external format is executable in its home engine; here it is
//! parsed by a recursive-descent parser restricted to the export
//! grammar and evaluated against the implicit loop over every grid
//! cell. Else-if chaining makes every block first-match-wins, so a
//! duplicate row or column block, or the overlapped tail of a span, is
//! dead code and must not override an earlier match.

use std::collections::{HashMap, HashSet};

use crate::core::error::Error;
use crate::core::types::{IVec3, Result};
use crate::grid::FlatIndex;
use crate::grid::coords::flat_from_discrete;
use crate::grid::footprint::GRID_HEIGHT;
use crate::voxel::palette::Palette;
use super::script::{ColumnBlock, ModelScript, RowBlock, SpanRule, EMPTY_MODEL_TEXT};

/// Result of evaluating a model script against the grid and palette
#[derive(Clone, Debug, Default)]
pub struct ImportOutcome {
    /// Valid voxels: flat index -> palette index
    pub voxels: HashMap<FlatIndex, u8>,
    /// Entries kept (equals `voxels.len()`)
    pub accepted: usize,
    /// Entries dropped for an unknown or unusable color value
    pub rejected: usize,
}

/// Parse and evaluate a model script. The empty-build placeholder and
/// blank input yield an empty outcome; text outside the grammar is
/// `Error::MalformedScript`.
pub fn import_model(text: &str, palette: &Palette) -> Result<ImportOutcome> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed == EMPTY_MODEL_TEXT {
        return Ok(ImportOutcome::default());
    }
    let script = parse_script(text)?;
    let outcome = evaluate(&script, palette);
    log::info!(
        "imported model: {} voxels accepted, {} rejected",
        outcome.accepted,
        outcome.rejected
    );
    Ok(outcome)
}

// ------------------------------ evaluation

fn evaluate(script: &ModelScript, palette: &Palette) -> ImportOutcome {
    let mut outcome = ImportOutcome::default();
    let mut seen_rows: HashSet<i64> = HashSet::new();
    for row in &script.rows {
        if !seen_rows.insert(row.row) {
            continue;
        }
        let Ok(z) = i32::try_from(row.row) else { continue };
        let mut seen_columns: HashSet<i64> = HashSet::new();
        for column in &row.columns {
            if !seen_columns.insert(column.column) {
                continue;
            }
            let Ok(x) = i32::try_from(column.column) else { continue };
            evaluate_column(script, palette, x, z, &column.spans, &mut outcome);
        }
    }
    outcome.accepted = outcome.voxels.len();
    outcome
}

fn evaluate_column(
    script: &ModelScript,
    palette: &Palette,
    x: i32,
    z: i32,
    spans: &[SpanRule],
    outcome: &mut ImportOutcome,
) {
    let mut taken: HashSet<i32> = HashSet::new();
    for span in spans {
        // the binding is known to resolve; the parser checked
        let value = script.bindings.get(&span.binding).copied().unwrap_or(0);
        // the implicit loop only visits layers that exist
        let from = span.from.clamp(0, GRID_HEIGHT as i64) as i32;
        let to = span.to.clamp(-1, GRID_HEIGHT as i64 - 1) as i32;
        for y in from..=to {
            if !taken.insert(y) {
                continue;
            }
            if value == 0 {
                continue; // explicit "empty" assignment
            }
            let Some(index) = flat_from_discrete(IVec3::new(x, y, z)) else {
                continue; // off the footprint: the loop never visits it
            };
            let usable = u8::try_from(value).ok().filter(|&v| palette.contains(v));
            match usable {
                Some(color_index) => {
                    outcome.voxels.insert(index, color_index);
                }
                None => outcome.rejected += 1,
            }
        }
    }
}

// ------------------------------ lexing

#[derive(Clone, Debug, PartialEq, Eq)]
enum Token {
    Ident(String),
    Number(i64),
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Assign,
    Eq,
    Ge,
    Le,
    AndAnd,
    Semi,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Ident(name) => write!(f, "'{name}'"),
            Token::Number(value) => write!(f, "'{value}'"),
            Token::LParen => write!(f, "'('"),
            Token::RParen => write!(f, "')'"),
            Token::LBrace => write!(f, "'{{'"),
            Token::RBrace => write!(f, "'}}'"),
            Token::LBracket => write!(f, "'['"),
            Token::RBracket => write!(f, "']'"),
            Token::Assign => write!(f, "'='"),
            Token::Eq => write!(f, "'=='"),
            Token::Ge => write!(f, "'>='"),
            Token::Le => write!(f, "'<='"),
            Token::AndAnd => write!(f, "'&&'"),
            Token::Semi => write!(f, "';'"),
        }
    }
}

fn tokenize(text: &str) -> Result<Vec<(Token, u32)>> {
    let mut tokens = Vec::new();
    let mut line = 1u32;
    let mut chars = text.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            '\n' => {
                line += 1;
                chars.next();
            }
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => { chars.next(); tokens.push((Token::LParen, line)); }
            ')' => { chars.next(); tokens.push((Token::RParen, line)); }
            '{' => { chars.next(); tokens.push((Token::LBrace, line)); }
            '}' => { chars.next(); tokens.push((Token::RBrace, line)); }
            '[' => { chars.next(); tokens.push((Token::LBracket, line)); }
            ']' => { chars.next(); tokens.push((Token::RBracket, line)); }
            ';' => { chars.next(); tokens.push((Token::Semi, line)); }
            '=' => {
                chars.next();
                let mut count = 1;
                while chars.peek() == Some(&'=') {
                    chars.next();
                    count += 1;
                }
                match count {
                    1 => tokens.push((Token::Assign, line)),
                    // the home engine writes ===; both mean equality here
                    2 | 3 => tokens.push((Token::Eq, line)),
                    _ => return Err(syntax(line, "too many '='")),
                }
            }
            '>' => {
                chars.next();
                if chars.peek() == Some(&'=') {
                    chars.next();
                    tokens.push((Token::Ge, line));
                } else {
                    return Err(syntax(line, "expected '>='"));
                }
            }
            '<' => {
                chars.next();
                if chars.peek() == Some(&'=') {
                    chars.next();
                    tokens.push((Token::Le, line));
                } else {
                    return Err(syntax(line, "expected '<='"));
                }
            }
            '&' => {
                chars.next();
                if chars.peek() == Some(&'&') {
                    chars.next();
                    tokens.push((Token::AndAnd, line));
                } else {
                    return Err(syntax(line, "expected '&&'"));
                }
            }
            '-' => {
                chars.next();
                if !chars.peek().is_some_and(|c| c.is_ascii_digit()) {
                    return Err(syntax(line, "expected digits after '-'"));
                }
                let value = lex_number(&mut chars, line)?;
                tokens.push((Token::Number(-value), line));
            }
            c if c.is_ascii_digit() => {
                let value = lex_number(&mut chars, line)?;
                tokens.push((Token::Number(value), line));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut name = String::new();
                while chars
                    .peek()
                    .is_some_and(|&c| c.is_ascii_alphanumeric() || c == '_')
                {
                    name.push(chars.next().unwrap_or_default());
                }
                tokens.push((Token::Ident(name), line));
            }
            other => return Err(syntax(line, &format!("unexpected character '{other}'"))),
        }
    }
    Ok(tokens)
}

fn lex_number(chars: &mut std::iter::Peekable<std::str::Chars<'_>>, line: u32) -> Result<i64> {
    let mut digits = String::new();
    while chars.peek().is_some_and(|c| c.is_ascii_digit()) {
        digits.push(chars.next().unwrap_or_default());
    }
    digits
        .parse()
        .map_err(|_| syntax(line, &format!("number '{digits}' out of range")))
}

fn syntax(line: u32, message: &str) -> Error {
    Error::MalformedScript(format!("line {line}: {message}"))
}

// ------------------------------ parsing

struct Parser {
    tokens: Vec<(Token, u32)>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(token, _)| token)
    }

    fn line(&self) -> u32 {
        self.tokens
            .get(self.pos.min(self.tokens.len().saturating_sub(1)))
            .map(|&(_, line)| line)
            .unwrap_or(1)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|(token, _)| token.clone());
        self.pos += 1;
        token
    }

    fn expect(&mut self, expected: Token) -> Result<()> {
        let line = self.line();
        match self.advance() {
            Some(token) if token == expected => Ok(()),
            Some(token) => Err(syntax(line, &format!("expected {expected}, found {token}"))),
            None => Err(syntax(line, &format!("expected {expected}, found end of input"))),
        }
    }

    fn expect_ident(&mut self, name: &str) -> Result<()> {
        let line = self.line();
        match self.advance() {
            Some(Token::Ident(found)) if found == name => Ok(()),
            Some(token) => Err(syntax(line, &format!("expected '{name}', found {token}"))),
            None => Err(syntax(line, &format!("expected '{name}', found end of input"))),
        }
    }

    fn expect_number(&mut self) -> Result<i64> {
        let line = self.line();
        match self.advance() {
            Some(Token::Number(value)) => Ok(value),
            Some(token) => Err(syntax(line, &format!("expected a number, found {token}"))),
            None => Err(syntax(line, "expected a number, found end of input")),
        }
    }

    /// True when the next tokens open another else-if arm
    fn eat_else_if(&mut self) -> Result<bool> {
        match self.peek() {
            Some(Token::Ident(name)) if name == "else" => {
                self.advance();
                self.expect_ident("if")?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

fn parse_script(text: &str) -> Result<ModelScript> {
    let mut parser = Parser { tokens: tokenize(text)?, pos: 0 };
    let mut script = ModelScript::default();

    parse_bindings(&mut parser, &mut script)?;

    parser.expect_ident("if")?;
    script.rows.push(parse_row_block(&mut parser)?);
    while parser.eat_else_if()? {
        script.rows.push(parse_row_block(&mut parser)?);
    }
    if let Some(token) = parser.peek() {
        return Err(syntax(parser.line(), &format!("trailing {token} after program")));
    }

    // every referenced color must have been declared
    for row in &script.rows {
        for column in &row.columns {
            for span in &column.spans {
                if !script.bindings.contains_key(&span.binding) {
                    return Err(Error::MalformedScript(format!(
                        "undeclared color '{}'",
                        span.binding
                    )));
                }
            }
        }
    }
    Ok(script)
}

/// `["let"] colorN = N [";"]` repeated; `let` and `;` are how the home
/// engine writes declarations
fn parse_bindings(parser: &mut Parser, script: &mut ModelScript) -> Result<()> {
    loop {
        let name = match parser.peek() {
            Some(Token::Ident(name)) if name == "let" => {
                parser.advance();
                let line = parser.line();
                match parser.advance() {
                    Some(Token::Ident(name)) => name,
                    _ => return Err(syntax(line, "expected a color name after 'let'")),
                }
            }
            Some(Token::Ident(name)) if is_color_name(name) => {
                let name = name.clone();
                parser.advance();
                name
            }
            _ => return Ok(()),
        };
        if !is_color_name(&name) {
            return Err(syntax(parser.line(), &format!("'{name}' is not a color name")));
        }
        parser.expect(Token::Assign)?;
        let value = parser.expect_number()?;
        if parser.peek() == Some(&Token::Semi) {
            parser.advance();
        }
        if script.bindings.insert(name.clone(), value).is_some() {
            return Err(syntax(parser.line(), &format!("color '{name}' declared twice")));
        }
    }
}

fn is_color_name(name: &str) -> bool {
    name.strip_prefix("color")
        .is_some_and(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
}

fn parse_row_block(parser: &mut Parser) -> Result<RowBlock> {
    parser.expect(Token::LParen)?;
    parser.expect_ident("y")?;
    parser.expect(Token::Eq)?;
    let row = parser.expect_number()?;
    parser.expect(Token::RParen)?;
    parser.expect(Token::LBrace)?;

    let mut columns = Vec::new();
    if matches!(parser.peek(), Some(Token::Ident(name)) if name == "if") {
        parser.advance();
        columns.push(parse_column_block(parser)?);
        while parser.eat_else_if()? {
            columns.push(parse_column_block(parser)?);
        }
    }
    parser.expect(Token::RBrace)?;
    Ok(RowBlock { row, columns })
}

fn parse_column_block(parser: &mut Parser) -> Result<ColumnBlock> {
    parser.expect(Token::LParen)?;
    parser.expect_ident("x")?;
    parser.expect(Token::Eq)?;
    let column = parser.expect_number()?;
    parser.expect(Token::RParen)?;
    parser.expect(Token::LBrace)?;

    let mut spans = Vec::new();
    if matches!(parser.peek(), Some(Token::Ident(name)) if name == "if") {
        parser.advance();
        spans.push(parse_span_rule(parser)?);
        while parser.eat_else_if()? {
            spans.push(parse_span_rule(parser)?);
        }
    }
    parser.expect(Token::RBrace)?;
    Ok(ColumnBlock { column, spans })
}

fn parse_span_rule(parser: &mut Parser) -> Result<SpanRule> {
    parser.expect(Token::LParen)?;
    parser.expect_ident("z")?;
    let line = parser.line();
    let (from, to) = match parser.advance() {
        Some(Token::Eq) => {
            let value = parser.expect_number()?;
            (value, value)
        }
        Some(Token::Ge) => {
            let from = parser.expect_number()?;
            parser.expect(Token::AndAnd)?;
            parser.expect_ident("z")?;
            parser.expect(Token::Le)?;
            let to = parser.expect_number()?;
            (from, to)
        }
        Some(token) => return Err(syntax(line, &format!("expected '==' or '>=', found {token}"))),
        None => return Err(syntax(line, "expected '==' or '>=', found end of input")),
    };
    parser.expect(Token::RParen)?;
    parser.expect(Token::LBrace)?;
    parser.expect_ident("result")?;
    parser.expect(Token::LBracket)?;
    parser.expect_ident("i")?;
    parser.expect(Token::RBracket)?;
    parser.expect(Token::Assign)?;
    let line = parser.line();
    let binding = match parser.advance() {
        Some(Token::Ident(name)) if is_color_name(&name) => name,
        Some(token) => return Err(syntax(line, &format!("expected a color name, found {token}"))),
        None => return Err(syntax(line, "expected a color name, found end of input")),
    };
    parser.expect(Token::Semi)?;
    parser.expect(Token::RBrace)?;
    Ok(SpanRule { from, to, binding })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::IVec3;
    use crate::io::export::export_model;

    fn index_at(x: i32, y: i32, z: i32) -> FlatIndex {
        flat_from_discrete(IVec3::new(x, y, z)).unwrap()
    }

    #[test]
    fn test_placeholder_and_blank_import_empty() {
        let palette = Palette::builtin();
        for text in [EMPTY_MODEL_TEXT, "", "   \n  "] {
            let outcome = import_model(text, &palette).unwrap();
            assert!(outcome.voxels.is_empty());
            assert_eq!(outcome.accepted, 0);
            assert_eq!(outcome.rejected, 0);
        }
    }

    #[test]
    fn test_single_voxel_import() {
        let palette = Palette::builtin();
        let text = "color3 = 3\nif (y == -4){\nif (x == 2){\nif (z == 5){ result[i] = color3; }\n}\n}\n";
        let outcome = import_model(text, &palette).unwrap();
        assert_eq!(outcome.accepted, 1);
        assert_eq!(outcome.voxels[&index_at(2, 5, -4)], 3);
    }

    #[test]
    fn test_range_span_import() {
        let palette = Palette::builtin();
        let text = "color2 = 2\nif (y == 0){\nif (x == 0){\nif (z >= 3 && z <= 6){ result[i] = color2; }\n}\n}\n";
        let outcome = import_model(text, &palette).unwrap();
        assert_eq!(outcome.accepted, 4);
        for y in 3..=6 {
            assert_eq!(outcome.voxels[&index_at(0, y, 0)], 2);
        }
    }

    #[test]
    fn test_whitespace_and_js_surface_variance() {
        let palette = Palette::builtin();
        let text = "let color3 = 3;\n\nif ( y === 0 ) {\n  if ( x === 0 ) {\n    if ( z === 0 ) { result[i] = color3; }\n  }\n}";
        let outcome = import_model(text, &palette).unwrap();
        assert_eq!(outcome.accepted, 1);
        assert_eq!(outcome.voxels[&index_at(0, 0, 0)], 3);
    }

    #[test]
    fn test_export_import_roundtrip() {
        let palette = Palette::builtin();
        let mut map = HashMap::new();
        // seed at flat index 0 plus a same-colored neighbor above it
        map.insert(0u32, 3u8);
        map.insert(index_at(0, 1, -66), 3u8);
        // a second color and a detached run
        map.insert(index_at(0, 10, 0), 7u8);
        for y in 20..=24 {
            map.insert(index_at(-3, y, 4), 5u8);
        }

        let outcome = import_model(&export_model(&map), &palette).unwrap();
        assert_eq!(outcome.voxels, map);
        assert_eq!(outcome.rejected, 0);
    }

    #[test]
    fn test_first_matching_row_wins() {
        let palette = Palette::builtin();
        let text = "color2 = 2\ncolor5 = 5\n\
                    if (y == 0){\nif (x == 0){\nif (z == 0){ result[i] = color2; }\n}\n}\n\
                    else if (y == 0){\nif (x == 1){\nif (z == 0){ result[i] = color5; }\n}\n}\n";
        let outcome = import_model(text, &palette).unwrap();
        // the duplicate row block is a dead else-if branch
        assert_eq!(outcome.accepted, 1);
        assert_eq!(outcome.voxels[&index_at(0, 0, 0)], 2);
        assert!(!outcome.voxels.contains_key(&index_at(1, 0, 0)));
    }

    #[test]
    fn test_overlapping_spans_keep_first_match() {
        let palette = Palette::builtin();
        let text = "color2 = 2\ncolor5 = 5\n\
                    if (y == 0){\nif (x == 0){\n\
                    if (z >= 0 && z <= 4){ result[i] = color2; }\n\
                    else if (z >= 2 && z <= 6){ result[i] = color5; }\n\
                    }\n}\n";
        let outcome = import_model(text, &palette).unwrap();
        for y in 0..=4 {
            assert_eq!(outcome.voxels[&index_at(0, y, 0)], 2);
        }
        for y in 5..=6 {
            assert_eq!(outcome.voxels[&index_at(0, y, 0)], 5);
        }
    }

    #[test]
    fn test_zero_color_clears_nothing() {
        let palette = Palette::builtin();
        let text = "color0 = 0\nif (y == 0){\nif (x == 0){\nif (z == 0){ result[i] = color0; }\n}\n}\n";
        let outcome = import_model(text, &palette).unwrap();
        assert_eq!(outcome.accepted, 0);
        assert_eq!(outcome.rejected, 0);
    }

    #[test]
    fn test_unknown_palette_value_is_rejected() {
        let palette = Palette::builtin();
        let text = "color200 = 200\nif (y == 0){\nif (x == 0){\nif (z >= 0 && z <= 2){ result[i] = color200; }\n}\n}\n";
        let outcome = import_model(text, &palette).unwrap();
        assert_eq!(outcome.accepted, 0);
        assert_eq!(outcome.rejected, 3);
    }

    #[test]
    fn test_off_footprint_blocks_are_dead() {
        let palette = Palette::builtin();
        // row 99 does not exist; neither does x = 60 on row 0
        let text = "color2 = 2\n\
                    if (y == 99){\nif (x == 0){\nif (z == 0){ result[i] = color2; }\n}\n}\n\
                    else if (y == 0){\nif (x == 60){\nif (z == 0){ result[i] = color2; }\n}\n}\n";
        let outcome = import_model(text, &palette).unwrap();
        assert_eq!(outcome.accepted, 0);
        assert_eq!(outcome.rejected, 0);
    }

    #[test]
    fn test_span_above_grid_is_clipped() {
        let palette = Palette::builtin();
        let text = "color2 = 2\nif (y == 0){\nif (x == 0){\nif (z >= 126 && z <= 1000){ result[i] = color2; }\n}\n}\n";
        let outcome = import_model(text, &palette).unwrap();
        assert_eq!(outcome.accepted, 2); // layers 126 and 127
    }

    #[test]
    fn test_malformed_inputs_error() {
        let palette = Palette::builtin();
        let cases = [
            "hello world",
            "if (y == 0){",                                          // unbalanced
            "if (q == 0){\nif (x == 0){\n}\n}",                      // wrong axis
            "if (y == 0){\nif (z == 0){\n}\n}",                      // axes out of order
            "if (y == 0){\nif (x == 0){\nif (z == 0){ result[i] = color9; }\n}\n}", // undeclared
            "color1 = 1\ncolor1 = 2\nif (y == 0){\n}",               // double declaration
            "while (y == 0){ }",                                     // not in the grammar
            "color1 = 1\nif (y == 0){\nif (x == 0){\nif (z == 0){ result[j] = color1; }\n}\n}",
        ];
        for text in cases {
            assert!(import_model(text, &palette).is_err(), "accepted: {text}");
        }
    }

    #[test]
    fn test_empty_row_and_column_blocks_parse() {
        let palette = Palette::builtin();
        let text = "if (y == 0){\n}\nelse if (y == 1){\nif (x == 0){\n}\n}\n";
        let outcome = import_model(text, &palette).unwrap();
        assert_eq!(outcome.accepted, 0);
    }
}
