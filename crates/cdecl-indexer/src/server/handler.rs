//! Request decoding and response encoding.
//!
//! Requests arrive as `[0, msgid, method, params]`; every response is
//! `[1, msgid, nil, result]`. A malformed envelope or an unknown method
//! ends the session, since the client is out of sync and nothing
//! meaningful can be replied.

use thiserror::Error;
use tracing::info;

use crate::codec::{CodecError, Decoder, Encoder};
use crate::config::ServerConfig;
use crate::index::DeclarationIndex;
use crate::server::build::{BuildMessages, BuildRunner};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("protocol violation: {0}")]
    Protocol(String),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// What the session loop should do after sending the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Exit,
}

/// Everything a session mutates across requests.
pub struct ServerState {
    pub config: ServerConfig,
    pub index: DeclarationIndex,
}

impl ServerState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            index: DeclarationIndex::new(),
        }
    }
}

/// Handle one request buffer and produce the response to write back.
pub async fn dispatch(
    state: &mut ServerState,
    request: &[u8],
) -> Result<(Vec<u8>, Control), SessionError> {
    let mut decoder = Decoder::new(request);
    let envelope_len = decoder.read_array_len()?;
    if envelope_len != 4 {
        return Err(SessionError::Protocol(format!(
            "expected a 4-element request envelope, got {envelope_len}"
        )));
    }
    let kind = decoder.read_uint()?;
    if kind != 0 {
        return Err(SessionError::Protocol(format!(
            "expected request kind 0, got {kind}"
        )));
    }
    let msgid = decoder.read_uint()?;
    let method = decoder.read_str()?;
    decoder.read_array_len()?; // params, unused by every method

    info!(msgid, method, "handling request");

    let mut encoder = Encoder::with_capacity(64);
    encoder.encode_array_len(4);
    encoder.encode_uint(1);
    encoder.encode_uint(msgid);
    encoder.encode_nil();

    let control = match method {
        "Exit" => {
            encoder.encode_uint(0);
            Control::Exit
        }
        "Compile" => {
            handle_compile(state, &mut encoder).await;
            Control::Continue
        }
        "GetDeclarations" => {
            handle_get_declarations(state, &mut encoder);
            Control::Continue
        }
        other => {
            return Err(SessionError::Protocol(format!("unknown method {other:?}")));
        }
    };

    Ok((encoder.into_bytes(), control))
}

/// Result map: `{started: bool, messages: [...]}`. Structured
/// diagnostics when the build ran and its log was readable, otherwise a
/// single plain-text explanation.
async fn handle_compile(state: &mut ServerState, encoder: &mut Encoder) {
    let report = BuildRunner::from_config(&state.config).run().await;

    encoder.encode_map_len(2);
    encoder.encode_str("started");
    encoder.encode_bool(report.started);
    encoder.encode_str("messages");
    match report.messages {
        BuildMessages::Diagnostics(messages) => {
            encoder.encode_array_len(messages.len());
            for message in &messages {
                encoder.encode_map_len(6);
                encoder.encode_str("lnum");
                encoder.encode_uint(message.lnum);
                encoder.encode_str("col");
                encoder.encode_uint(message.col);
                encoder.encode_str("nr");
                encoder.encode_str(&message.code);
                encoder.encode_str("type");
                encoder.encode_str(message.severity.as_wire());
                encoder.encode_str("filename");
                encoder.encode_str(&message.filename);
                encoder.encode_str("text");
                encoder.encode_str(&message.text);
            }
        }
        BuildMessages::Plain(text) => {
            encoder.encode_array_len(1);
            encoder.encode_str(&text);
        }
    }
}

/// Result: `{updated: false}` when nothing changed since the last call,
/// otherwise `[true, {filename: {functions, structs, macros}}]` with
/// every indexed file, not just the changed ones.
fn handle_get_declarations(state: &mut ServerState, encoder: &mut Encoder) {
    let changed = state
        .index
        .scan_tree(&state.config.root, &state.config.extensions);
    if !changed {
        encoder.encode_map_len(1);
        encoder.encode_str("updated");
        encoder.encode_bool(false);
        return;
    }

    encoder.encode_array_len(2);
    encoder.encode_bool(true);
    encoder.encode_map_len(state.index.file_count());
    for entry in state.index.files() {
        let arena = &entry.arena;
        encoder.encode_str(&entry.path);
        encoder.encode_map_len(3);

        encoder.encode_str("functions");
        encoder.encode_array_len(entry.functions.len());
        for function in &entry.functions {
            encoder.encode_map_len(4);
            encoder.encode_str("line");
            encoder.encode_uint(function.line);
            encoder.encode_str("name");
            encoder.encode_str(arena.text(function.name));
            encoder.encode_str("return_type");
            encoder.encode_str(arena.text(function.return_type));
            encoder.encode_str("arguments");
            encoder.encode_array_len(function.parameters.len());
            for parameter in &function.parameters {
                encoder.encode_map_len(2);
                encoder.encode_str("type");
                match parameter.type_name {
                    Some(type_name) => encoder.encode_str(arena.text(type_name)),
                    None => encoder.encode_nil(),
                }
                encoder.encode_str("name");
                encoder.encode_str(arena.text(parameter.name));
            }
        }

        encoder.encode_str("structs");
        encoder.encode_array_len(entry.structs.len());
        for record in &entry.structs {
            encoder.encode_map_len(4);
            encoder.encode_str("line");
            encoder.encode_uint(record.line);
            encoder.encode_str("name");
            encoder.encode_str(arena.text(record.name));
            encoder.encode_str("type");
            encoder.encode_str(record.kind.as_wire());
            encoder.encode_str("fields");
            encoder.encode_array_len(record.fields.len());
            for field in &record.fields {
                encoder.encode_map_len(2);
                encoder.encode_str("type");
                match field.type_name {
                    Some(type_name) => encoder.encode_str(arena.text(type_name)),
                    None => encoder.encode_nil(),
                }
                encoder.encode_str("name");
                encoder.encode_str(arena.text(field.name));
            }
        }

        encoder.encode_str("macros");
        encoder.encode_array_len(entry.macros.len());
        for record in &entry.macros {
            encoder.encode_map_len(2);
            encoder.encode_str("line");
            encoder.encode_uint(record.line);
            encoder.encode_str("name");
            encoder.encode_str(arena.text(record.name));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src/server/handler_tests.rs"]
mod tests;
