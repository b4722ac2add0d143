//! Single-pass declaration extraction.
//!
//! The extractor is a recognizer, not a parser: it walks the token
//! stream once and records the declarations it is confident about,
//! skipping anything it does not understand. Unparseable input never
//! fails extraction; it simply contributes nothing.

use crate::arena::{Arena, ArenaError};
use crate::extract::types::{
    Field, FileDeclarations, FunctionDecl, MacroDecl, StructDecl, StructKind,
};
use crate::syntax::{Lexer, Token, TokenKind};

/// Extract every recognizable top-level declaration from one source file.
///
/// Declared names are copied into `arena`; the returned handles resolve
/// against it. The only failure mode is arena exhaustion.
pub fn extract_declarations(
    source: &str,
    arena: &mut Arena,
) -> Result<FileDeclarations, ArenaError> {
    let mut out = FileDeclarations::default();
    let mut lexer = Lexer::new(source);

    loop {
        let token = lexer.next_token();
        match token.kind {
            TokenKind::EndOfStream => break,
            TokenKind::Preprocessor if token.equals("#define") => {
                let name = lexer.next_token();
                if name.is(TokenKind::Identifier) {
                    out.macros.push(MacroDecl {
                        line: name.line,
                        name: arena.store_str(name.text)?,
                    });
                }
            }
            TokenKind::Identifier => match token.text {
                "typedef" => skip_to_semicolon(&mut lexer),
                "enum" => extract_enum(&mut lexer, arena, &mut out)?,
                "struct" => extract_aggregate(source, &mut lexer, StructKind::Struct, arena, &mut out)?,
                "union" => extract_aggregate(source, &mut lexer, StructKind::Union, arena, &mut out)?,
                "extern" => {
                    if let Some(type_token) = consume_extern(&mut lexer) {
                        extract_function(source, &mut lexer, type_token, arena, &mut out)?;
                    }
                }
                "inline" | "internal" | "static" => {
                    // Linkage markers stack; the first token after them is
                    // the return type.
                    let mut type_token = lexer.next_token();
                    while matches!(type_token.text, "inline" | "internal" | "static") {
                        type_token = lexer.next_token();
                    }
                    if type_token.is(TokenKind::Identifier) {
                        extract_function(source, &mut lexer, type_token, arena, &mut out)?;
                    }
                }
                // Any other identifier may be the return type of a
                // definition with no linkage marker; the probe inside
                // rejects everything else.
                _ => extract_function(source, &mut lexer, token, arena, &mut out)?,
            },
            _ => {}
        }
    }

    Ok(out)
}

// ── functions ──────────────────────────────────────────────────────────────

/// `extern` introduces a function candidate only as `extern "C" <type>`;
/// an `extern "C" {` block falls back to the main loop and anything
/// else is a variable or forward declaration. Returns the candidate's
/// return-type token.
fn consume_extern<'a>(lexer: &mut Lexer<'a>) -> Option<Token<'a>> {
    let linkage = lexer.next_token();
    if !linkage.is(TokenKind::Str) || !linkage.equals("C") {
        skip_to_semicolon(lexer);
        return None;
    }
    let token = lexer.next_token();
    if token.is(TokenKind::Identifier) {
        Some(token)
    } else {
        None
    }
}

/// Called with the candidate's return-type token already consumed.
/// Records the declaration only if a parameter list and a body follow;
/// forward declarations, variables, and plain statements are skipped.
fn extract_function<'a>(
    source: &'a str,
    lexer: &mut Lexer<'a>,
    type_token: Token<'a>,
    arena: &mut Arena,
    out: &mut FileDeclarations,
) -> Result<(), ArenaError> {
    // There must be a parameter list before the statement ends, and a
    // brace-delimited body right after it. A trailing `;` is a forward
    // declaration; anything else is an expression or something this
    // extractor does not understand.
    let mut probe = lexer.clone();
    loop {
        match probe.next_token().kind {
            TokenKind::OpenParen => break,
            TokenKind::Semicolon | TokenKind::EndOfStream => {
                skip_to_semicolon(lexer);
                return Ok(());
            }
            _ => {}
        }
    }
    let mut depth = 1u32;
    loop {
        match probe.next_token().kind {
            TokenKind::OpenParen => depth += 1,
            TokenKind::CloseParen => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            TokenKind::EndOfStream => return Ok(()),
            _ => {}
        }
    }
    // Trailing specifiers (`noexcept`, `const`) may sit between the
    // parameter list and the body.
    let mut after = probe.next_token();
    while after.is(TokenKind::Identifier) {
        after = probe.next_token();
    }
    if !after.is(TokenKind::OpenBrace) {
        skip_to_semicolon(lexer);
        return Ok(());
    }

    let mut name = lexer.next_token();
    let return_type = if name.is(TokenKind::Asterisk) {
        let span = &source[type_token.start..name.end()];
        name = lexer.next_token();
        span
    } else {
        type_token.text
    };
    if !name.is(TokenKind::Identifier) {
        return Ok(());
    }
    if !lexer.next_token().is(TokenKind::OpenParen) {
        return Ok(());
    }

    // Size the parameter vector with a counting pass before filling it.
    let mut count_probe = lexer.clone();
    let mut count = 0usize;
    let mut t = count_probe.next_token();
    while !matches!(t.kind, TokenKind::CloseParen | TokenKind::EndOfStream) {
        count += 1;
        while !matches!(
            t.kind,
            TokenKind::Comma | TokenKind::CloseParen | TokenKind::EndOfStream
        ) {
            t = count_probe.next_token();
        }
        if t.is(TokenKind::Comma) {
            t = count_probe.next_token();
        }
    }

    let mut parameters = Vec::with_capacity(count);
    loop {
        let ptype = lexer.next_token();
        if matches!(ptype.kind, TokenKind::CloseParen | TokenKind::EndOfStream) {
            break;
        }
        let mut pname = lexer.next_token();
        let type_text = if pname.is(TokenKind::Asterisk) {
            let span = &source[ptype.start..pname.end()];
            pname = lexer.next_token();
            span
        } else {
            ptype.text
        };
        if pname.is(TokenKind::Identifier) {
            parameters.push(Field {
                type_name: Some(arena.store_str(type_text)?),
                name: arena.store_str(pname.text)?,
            });
        }
        // Ignore array suffixes and default arguments up to the separator.
        let mut t = pname;
        while !matches!(
            t.kind,
            TokenKind::Comma | TokenKind::CloseParen | TokenKind::EndOfStream
        ) {
            t = lexer.next_token();
        }
        if !t.is(TokenKind::Comma) {
            break;
        }
    }

    out.functions.push(FunctionDecl {
        line: name.line,
        name: arena.store_str(name.text)?,
        return_type: arena.store_str(return_type)?,
        parameters,
    });
    Ok(())
}

// ── enums ──────────────────────────────────────────────────────────────────

fn extract_enum(
    lexer: &mut Lexer,
    arena: &mut Arena,
    out: &mut FileDeclarations,
) -> Result<(), ArenaError> {
    let mut name = lexer.next_token();
    if name.is(TokenKind::OpenBrace) {
        // Anonymous enum; the constants have no declaration to hang off.
        skip_to_semicolon(lexer);
        return Ok(());
    }
    if name.equals("class") {
        name = lexer.next_token();
    }
    if !name.is(TokenKind::Identifier) {
        return Ok(());
    }

    let mut t = lexer.next_token();
    if t.is(TokenKind::Semicolon) {
        return Ok(()); // forward declaration
    }
    // Tolerate an underlying-type suffix (`enum Flags : u8 {`).
    while !t.is(TokenKind::OpenBrace) {
        if matches!(t.kind, TokenKind::Semicolon | TokenKind::EndOfStream) {
            return Ok(());
        }
        t = lexer.next_token();
    }

    let mut fields = Vec::new();
    loop {
        let t = lexer.next_token();
        match t.kind {
            TokenKind::CloseBrace | TokenKind::EndOfStream => break,
            TokenKind::Identifier => {
                fields.push(Field {
                    type_name: None,
                    name: arena.store_str(t.text)?,
                });
                // Skip an initializer expression if present.
                let mut next = lexer.next_token();
                while !matches!(
                    next.kind,
                    TokenKind::Comma | TokenKind::CloseBrace | TokenKind::EndOfStream
                ) {
                    next = lexer.next_token();
                }
                if !next.is(TokenKind::Comma) {
                    break;
                }
            }
            _ => {}
        }
    }

    out.structs.push(StructDecl {
        line: name.line,
        name: arena.store_str(name.text)?,
        kind: StructKind::Enum,
        fields,
    });
    Ok(())
}

// ── structs and unions ─────────────────────────────────────────────────────

fn extract_aggregate<'a>(
    source: &'a str,
    lexer: &mut Lexer<'a>,
    kind: StructKind,
    arena: &mut Arena,
    out: &mut FileDeclarations,
) -> Result<(), ArenaError> {
    let name = lexer.next_token();
    if !name.is(TokenKind::Identifier) {
        return Ok(()); // anonymous aggregate
    }
    let mut t = lexer.next_token();
    if t.is(TokenKind::Semicolon) {
        return Ok(()); // forward declaration
    }
    // Tolerate a base list between the name and the body.
    while !t.is(TokenKind::OpenBrace) {
        if matches!(t.kind, TokenKind::Semicolon | TokenKind::EndOfStream) {
            return Ok(());
        }
        t = lexer.next_token();
    }

    let mut fields = Vec::new();
    let mut depth = 1u32;
    loop {
        let t = lexer.next_token();
        match t.kind {
            TokenKind::OpenBrace => depth += 1,
            TokenKind::CloseBrace => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            TokenKind::EndOfStream => break,
            // Conditional compilation inside a body would otherwise be
            // read as member tokens.
            TokenKind::Preprocessor => lexer.skip_to_line_end(),
            TokenKind::Identifier => match t.text {
                // Keyword prefixes of a nested definition or an
                // elaborated member type; the tokens after them stand
                // on their own.
                "struct" | "union" => {}
                "public" | "private" | "protected" => {
                    lexer.next_token(); // the colon
                }
                _ => parse_member(source, lexer, t, arena, &mut fields)?,
            },
            _ => {}
        }
    }

    out.structs.push(StructDecl {
        line: name.line,
        name: arena.store_str(name.text)?,
        kind,
        fields,
    });
    Ok(())
}

/// Consume one member statement starting at `first` and record it as a
/// field when it looks like data.
///
/// The member's name is the last identifier before the terminator; every
/// other token joins into the type text, with a space only between two
/// adjacent identifiers (`volatile u32 count` keeps its spaces,
/// `u32 values[16]` becomes `u32[16]`).
fn parse_member<'a>(
    source: &'a str,
    lexer: &mut Lexer<'a>,
    first: Token<'a>,
    arena: &mut Arena,
    fields: &mut Vec<Field>,
) -> Result<(), ArenaError> {
    let mut pieces: Vec<Token<'a>> = Vec::new();
    let mut token = first;
    loop {
        let next = lexer.next_token();
        match next.kind {
            TokenKind::Asterisk => {
                // Fold trailing pointers into the current piece.
                token = Token {
                    kind: token.kind,
                    text: &source[token.start..next.end()],
                    start: token.start,
                    line: token.line,
                };
            }
            TokenKind::OpenParen => {
                // Member function: skip the parameter list and any body.
                skip_member_function(lexer);
                return Ok(());
            }
            TokenKind::OpenBrace => {
                // A named nested definition (`struct Inner { ... } m;`).
                // Its members belong to the inner type; skip the body and
                // let the caller discard the lone tail identifier.
                skip_braced_block(lexer);
                return Ok(());
            }
            TokenKind::Semicolon | TokenKind::EndOfStream => {
                pieces.push(token);
                break;
            }
            TokenKind::Equals => {
                pieces.push(token);
                skip_to_semicolon(lexer);
                break;
            }
            _ => {
                pieces.push(token);
                token = next;
            }
        }
    }

    let Some(name_idx) = pieces.iter().rposition(|t| t.is(TokenKind::Identifier)) else {
        return Ok(());
    };
    let name_token = pieces.remove(name_idx);
    if pieces.is_empty() {
        // A lone identifier is the tail of a nested definition
        // (`} inner;`), not a member of this aggregate.
        return Ok(());
    }

    let mut type_text = String::new();
    let mut prev_was_identifier = false;
    for piece in &pieces {
        if prev_was_identifier && piece.is(TokenKind::Identifier) {
            type_text.push(' ');
        }
        type_text.push_str(piece.text);
        prev_was_identifier = piece.is(TokenKind::Identifier);
    }

    fields.push(Field {
        type_name: Some(arena.store_str(&type_text)?),
        name: arena.store_str(name_token.text)?,
    });
    Ok(())
}

/// Positioned just past a member function's `(`: skip to the matching
/// `)` and then past either a terminating `;` or a brace-balanced body.
fn skip_member_function(lexer: &mut Lexer) {
    let mut depth = 1u32;
    loop {
        match lexer.next_token().kind {
            TokenKind::OpenParen => depth += 1,
            TokenKind::CloseParen => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            TokenKind::EndOfStream => return,
            _ => {}
        }
    }
    loop {
        match lexer.next_token().kind {
            TokenKind::Semicolon | TokenKind::EndOfStream => return,
            TokenKind::OpenBrace => return skip_braced_block(lexer),
            _ => {}
        }
    }
}

/// Positioned just past an `{`: consume tokens through the matching `}`.
fn skip_braced_block(lexer: &mut Lexer) {
    let mut depth = 1u32;
    loop {
        match lexer.next_token().kind {
            TokenKind::OpenBrace => depth += 1,
            TokenKind::CloseBrace => {
                depth -= 1;
                if depth == 0 {
                    return;
                }
            }
            TokenKind::EndOfStream => return,
            _ => {}
        }
    }
}

fn skip_to_semicolon(lexer: &mut Lexer) {
    loop {
        if matches!(
            lexer.next_token().kind,
            TokenKind::Semicolon | TokenKind::EndOfStream
        ) {
            break;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src/extract/declarations_tests.rs"]
mod tests;
