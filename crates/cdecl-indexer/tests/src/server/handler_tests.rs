use super::*;

fn request(msgid: u32, method: &str) -> Vec<u8> {
    let mut encoder = Encoder::new();
    encoder.encode_array_len(4);
    encoder.encode_uint(0);
    encoder.encode_uint(msgid);
    encoder.encode_str(method);
    encoder.encode_array_len(0);
    encoder.into_bytes()
}

fn state_rooted_at(root: &std::path::Path) -> ServerState {
    let mut config = ServerConfig::default();
    config.root = root.to_path_buf();
    ServerState::new(config)
}

fn temp_tree(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "cdecl-indexer-{name}-test-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::SystemTime::UNIX_EPOCH)
            .expect("clock drift")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Reads the `[1, msgid, nil, ...]` preamble and leaves the decoder at
/// the result.
fn read_preamble(decoder: &mut Decoder, msgid: u32) {
    assert_eq!(decoder.read_array_len().unwrap(), 4);
    assert_eq!(decoder.read_uint().unwrap(), 1);
    assert_eq!(decoder.read_uint().unwrap(), msgid);
    decoder.read_nil().unwrap();
}

#[tokio::test]
async fn exit_echoes_the_message_id_and_ends_the_session() {
    let dir = temp_tree("exit");
    let mut state = state_rooted_at(&dir);

    let (response, control) = dispatch(&mut state, &request(7, "Exit")).await.unwrap();
    assert_eq!(control, Control::Exit);

    let mut decoder = Decoder::new(&response);
    read_preamble(&mut decoder, 7);
    assert_eq!(decoder.read_uint().unwrap(), 0);
    assert_eq!(decoder.remaining(), 0);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn unknown_method_is_a_protocol_violation() {
    let dir = temp_tree("unknown");
    let mut state = state_rooted_at(&dir);

    let result = dispatch(&mut state, &request(1, "Reticulate")).await;
    assert!(matches!(result, Err(SessionError::Protocol(_))));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn malformed_envelope_is_a_protocol_violation() {
    let dir = temp_tree("envelope");
    let mut state = state_rooted_at(&dir);

    // Three-element array instead of four.
    let mut encoder = Encoder::new();
    encoder.encode_array_len(3);
    encoder.encode_uint(0);
    encoder.encode_uint(1);
    encoder.encode_str("Exit");
    let result = dispatch(&mut state, &encoder.into_bytes()).await;
    assert!(matches!(result, Err(SessionError::Protocol(_))));

    // Response kind where a request kind belongs.
    let mut encoder = Encoder::new();
    encoder.encode_array_len(4);
    encoder.encode_uint(1);
    encoder.encode_uint(1);
    encoder.encode_str("Exit");
    encoder.encode_array_len(0);
    let result = dispatch(&mut state, &encoder.into_bytes()).await;
    assert!(matches!(result, Err(SessionError::Protocol(_))));

    // Not even an envelope.
    let result = dispatch(&mut state, &[0xc0]).await;
    assert!(matches!(result, Err(SessionError::Codec(_))));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn get_declarations_on_an_empty_tree_reports_no_update_every_time() {
    let dir = temp_tree("empty-tree");
    let mut state = state_rooted_at(&dir);

    for msgid in [1u32, 2] {
        let (response, control) = dispatch(&mut state, &request(msgid, "GetDeclarations"))
            .await
            .unwrap();
        assert_eq!(control, Control::Continue);

        let mut decoder = Decoder::new(&response);
        read_preamble(&mut decoder, msgid);
        assert_eq!(decoder.read_map_len().unwrap(), 1);
        assert_eq!(decoder.read_str().unwrap(), "updated");
        assert!(!decoder.read_bool().unwrap());
        assert_eq!(decoder.remaining(), 0);
    }

    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn get_declarations_serializes_the_whole_index() {
    let dir = temp_tree("decls");
    std::fs::write(
        dir.join("api.h"),
        "#define VERSION 3\nstruct Point { float x; float y; };\nint add(int a, int b) { return a + b; }\n",
    )
    .unwrap();
    let mut state = state_rooted_at(&dir);

    let (response, _) = dispatch(&mut state, &request(5, "GetDeclarations"))
        .await
        .unwrap();

    let mut decoder = Decoder::new(&response);
    read_preamble(&mut decoder, 5);
    assert_eq!(decoder.read_array_len().unwrap(), 2);
    assert!(decoder.read_bool().unwrap());
    assert_eq!(decoder.read_map_len().unwrap(), 1);
    assert!(decoder.read_str().unwrap().ends_with("api.h"));

    assert_eq!(decoder.read_map_len().unwrap(), 3);

    assert_eq!(decoder.read_str().unwrap(), "functions");
    assert_eq!(decoder.read_array_len().unwrap(), 1);
    assert_eq!(decoder.read_map_len().unwrap(), 4);
    assert_eq!(decoder.read_str().unwrap(), "line");
    assert_eq!(decoder.read_uint().unwrap(), 3);
    assert_eq!(decoder.read_str().unwrap(), "name");
    assert_eq!(decoder.read_str().unwrap(), "add");
    assert_eq!(decoder.read_str().unwrap(), "return_type");
    assert_eq!(decoder.read_str().unwrap(), "int");
    assert_eq!(decoder.read_str().unwrap(), "arguments");
    assert_eq!(decoder.read_array_len().unwrap(), 2);
    for expected in ["a", "b"] {
        assert_eq!(decoder.read_map_len().unwrap(), 2);
        assert_eq!(decoder.read_str().unwrap(), "type");
        assert_eq!(decoder.read_str().unwrap(), "int");
        assert_eq!(decoder.read_str().unwrap(), "name");
        assert_eq!(decoder.read_str().unwrap(), expected);
    }

    assert_eq!(decoder.read_str().unwrap(), "structs");
    assert_eq!(decoder.read_array_len().unwrap(), 1);
    assert_eq!(decoder.read_map_len().unwrap(), 4);
    assert_eq!(decoder.read_str().unwrap(), "line");
    assert_eq!(decoder.read_uint().unwrap(), 2);
    assert_eq!(decoder.read_str().unwrap(), "name");
    assert_eq!(decoder.read_str().unwrap(), "Point");
    assert_eq!(decoder.read_str().unwrap(), "type");
    assert_eq!(decoder.read_str().unwrap(), "struct");
    assert_eq!(decoder.read_str().unwrap(), "fields");
    assert_eq!(decoder.read_array_len().unwrap(), 2);
    for expected in ["x", "y"] {
        assert_eq!(decoder.read_map_len().unwrap(), 2);
        assert_eq!(decoder.read_str().unwrap(), "type");
        assert_eq!(decoder.read_str().unwrap(), "float");
        assert_eq!(decoder.read_str().unwrap(), "name");
        assert_eq!(decoder.read_str().unwrap(), expected);
    }

    assert_eq!(decoder.read_str().unwrap(), "macros");
    assert_eq!(decoder.read_array_len().unwrap(), 1);
    assert_eq!(decoder.read_map_len().unwrap(), 2);
    assert_eq!(decoder.read_str().unwrap(), "line");
    assert_eq!(decoder.read_uint().unwrap(), 1);
    assert_eq!(decoder.read_str().unwrap(), "name");
    assert_eq!(decoder.read_str().unwrap(), "VERSION");
    assert_eq!(decoder.remaining(), 0);

    // The tree has not changed; the follow-up reports no update.
    let (response, _) = dispatch(&mut state, &request(6, "GetDeclarations"))
        .await
        .unwrap();
    let mut decoder = Decoder::new(&response);
    read_preamble(&mut decoder, 6);
    assert_eq!(decoder.read_map_len().unwrap(), 1);
    assert_eq!(decoder.read_str().unwrap(), "updated");
    assert!(!decoder.read_bool().unwrap());

    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn compile_reports_a_launch_failure_in_band() {
    let dir = temp_tree("compile-fail");
    let mut config = ServerConfig::default();
    config.root = dir.clone();
    config.build_command = "./definitely-not-a-real-build-script".to_owned();
    let mut state = ServerState::new(config);

    let (response, control) = dispatch(&mut state, &request(9, "Compile")).await.unwrap();
    assert_eq!(control, Control::Continue);

    let mut decoder = Decoder::new(&response);
    read_preamble(&mut decoder, 9);
    assert_eq!(decoder.read_map_len().unwrap(), 2);
    assert_eq!(decoder.read_str().unwrap(), "started");
    assert!(!decoder.read_bool().unwrap());
    assert_eq!(decoder.read_str().unwrap(), "messages");
    assert_eq!(decoder.read_array_len().unwrap(), 1);
    assert!(!decoder.read_str().unwrap().is_empty());
    assert_eq!(decoder.remaining(), 0);

    std::fs::remove_dir_all(&dir).unwrap();
}
