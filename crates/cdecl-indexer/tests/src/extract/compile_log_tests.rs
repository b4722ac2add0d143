use super::*;

const DRIVER: &str = "build.bat";

#[test]
fn msvc_error_line() {
    let log = "main.cpp(12,5): error C2065: 'x': undeclared identifier";
    let messages = parse_compile_log(log, DRIVER);

    assert_eq!(messages.len(), 1);
    let m = &messages[0];
    assert_eq!(m.filename, "main.cpp");
    assert_eq!(m.lnum, 12);
    assert_eq!(m.col, 5);
    assert_eq!(m.code, "C2065");
    assert_eq!(m.severity, Severity::Error);
    assert_eq!(m.severity.as_wire(), "E");
    assert_eq!(m.text, "'x': undeclared identifier");
}

#[test]
fn warning_without_a_column() {
    let log = "src\\util.h(33): warning C4100: 'param': unreferenced formal parameter";
    let messages = parse_compile_log(log, DRIVER);

    assert_eq!(messages.len(), 1);
    let m = &messages[0];
    assert_eq!(m.filename, "src\\util.h");
    assert_eq!(m.lnum, 33);
    assert_eq!(m.col, 1);
    assert_eq!(m.severity, Severity::Warning);
    assert_eq!(m.severity.as_wire(), "W");
}

#[test]
fn linker_diagnostics_point_at_the_build_driver() {
    let log = "LINK : fatal error LNK1120: 1 unresolved externals";
    let messages = parse_compile_log(log, DRIVER);

    assert_eq!(messages.len(), 1);
    let m = &messages[0];
    assert_eq!(m.filename, DRIVER);
    assert_eq!(m.code, "LNK1120");
    assert_eq!(m.severity, Severity::Error);
    assert_eq!(m.text, "1 unresolved externals");
}

#[test]
fn lnk_code_is_normalized_even_with_a_filename() {
    let log = "main.obj : error LNK2019: unresolved external symbol _foo";
    let messages = parse_compile_log(log, DRIVER);

    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].filename, DRIVER);
    assert_eq!(messages[0].code, "LNK2019");
}

#[test]
fn noise_lines_are_ignored() {
    let log = "\
Compiling...\n\
main.cpp\n\
main.cpp(4): error C2143: syntax error: missing ';' before '}'\n\
Generating code\n\
1 error(s)\n";
    let messages = parse_compile_log(log, DRIVER);

    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].lnum, 4);
    assert_eq!(messages[0].code, "C2143");
    assert_eq!(messages[0].text, "syntax error: missing ';' before '}'");
}

#[test]
fn multiple_diagnostics_keep_log_order() {
    let log = "\
a.cpp(1): error C2065: 'x': undeclared identifier\n\
b.cpp(2): warning C4100: 'y': unreferenced formal parameter\n\
a.cpp(9,3): error C2143: syntax error: missing ';' before '}'\n";
    let messages = parse_compile_log(log, DRIVER);

    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0].filename, "a.cpp");
    assert_eq!(messages[1].severity, Severity::Warning);
    assert_eq!(messages[2].lnum, 9);
    assert_eq!(messages[2].col, 3);
}

#[test]
fn severity_word_without_code() {
    let log = "file.c:12:5: error: something went wrong";
    let messages = parse_compile_log(log, DRIVER);

    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].severity, Severity::Error);
    assert_eq!(messages[0].code, "");
    assert_eq!(messages[0].text, "something went wrong");
}

#[test]
fn empty_log_yields_nothing() {
    assert!(parse_compile_log("", DRIVER).is_empty());
    assert!(parse_compile_log("Build succeeded.\n", DRIVER).is_empty());
}
