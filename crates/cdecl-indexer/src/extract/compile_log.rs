//! Compile-log scanning.
//!
//! Build tools write lines shaped like
//! `main.cpp(12,5): error C2065: 'x': undeclared identifier`; the scanner
//! keys on the colon before the severity word and splits each matching
//! line into a location head and a diagnostic tail. Lines without a
//! recognizable severity are ignored.

use crate::extract::types::{LogMessage, Severity};
use crate::syntax::{Lexer, TokenKind};

/// Recover structured diagnostics from a captured build log.
///
/// Linker diagnostics carry no source file; they are attributed to
/// `driver_name` (the build command) so a client can still jump
/// somewhere meaningful.
pub fn parse_compile_log(log: &str, driver_name: &str) -> Vec<LogMessage> {
    let mut messages = Vec::new();
    let mut lexer = Lexer::new(log);

    loop {
        let token = lexer.next_token();
        match token.kind {
            TokenKind::EndOfStream => break,
            TokenKind::Colon => {
                let mut probe = lexer.clone();
                let word = probe.next_token();
                if !(word.is(TokenKind::Identifier)
                    && (word.equals("error") || word.equals("warning") || word.equals("fatal")))
                {
                    continue;
                }
                let line_start = log[..token.start].rfind('\n').map_or(0, |i| i + 1);
                let line_end = log[token.start..]
                    .find('\n')
                    .map_or(log.len(), |i| token.start + i);
                let line = &log[line_start..line_end];
                messages.push(parse_log_line(line, token.start - line_start, driver_name));
                lexer.seek(line_end);
            }
            _ => {}
        }
    }

    messages
}

/// Split one diagnostic line at the severity colon and pick it apart.
fn parse_log_line(line: &str, colon_off: usize, driver_name: &str) -> LogMessage {
    let head = &line[..colon_off];
    let tail = &line[colon_off + 1..];

    // Head: `file(lnum,col)`, bare `file`, or the linker's `LINK`.
    let mut filename = String::new();
    let mut lnum = 1u32;
    let mut col = 1u32;

    let mut head_lexer = Lexer::new(head);
    let first = head_lexer.next_token();
    if first.is(TokenKind::Identifier) && first.equals("LINK") {
        filename.push_str("LINK");
    } else {
        let mut t = first;
        while !matches!(t.kind, TokenKind::OpenParen | TokenKind::EndOfStream) {
            t = head_lexer.next_token();
        }
        if t.is(TokenKind::OpenParen) {
            filename.push_str(head[..t.start].trim());
            let number = head_lexer.next_token();
            if number.is(TokenKind::Number) {
                lnum = number.text.parse().unwrap_or(1);
            }
            if head_lexer.next_token().is(TokenKind::Comma) {
                let number = head_lexer.next_token();
                if number.is(TokenKind::Number) {
                    col = number.text.parse().unwrap_or(1);
                }
            }
        } else {
            filename.push_str(head.trim());
        }
    }

    // Tail: `error C2065: message`, with `fatal error` folded into one
    // severity.
    let mut tail_lexer = Lexer::new(tail);
    let mut word = tail_lexer.next_token();
    if word.equals("fatal") {
        word = tail_lexer.next_token();
    }
    let severity = if word.equals("warning") {
        Severity::Warning
    } else {
        Severity::Error
    };

    let mut code = String::new();
    let mut text = String::new();
    let after_sev = tail_lexer.next_token();
    if after_sev.is(TokenKind::Colon) {
        // No code between severity and message (`error: message`).
        text.push_str(tail[after_sev.end()..].trim());
    } else {
        code.push_str(after_sev.text);
        let sep = tail_lexer.next_token();
        if sep.is(TokenKind::Colon) {
            text.push_str(tail[sep.end()..].trim());
        } else {
            text.push_str(tail[after_sev.end()..].trim());
        }
    }

    // The linker reports no source file; point at the build driver.
    if filename == "LINK" || code.starts_with("LNK") {
        filename.clear();
        filename.push_str(driver_name);
    }

    LogMessage {
        lnum,
        col,
        code,
        severity,
        filename,
        text,
    }
}

#[cfg(test)]
#[path = "../../tests/src/extract/compile_log_tests.rs"]
mod tests;
