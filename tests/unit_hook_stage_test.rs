use openbatch::qmgr::hooks::{decode_base64_stream, dump_file, emit_base64};
use openbatch::qmgr::parser::HOOKSTR_BASE64;
use std::fs;

#[test]
fn test_import_export_byte_identity() {
    // The print-hook pathway: raw content -> base64 stream with blank-line
    // terminator -> decoded content must be byte-identical.
    let dir = tempfile::tempdir().unwrap();
    let original = dir.path().join("hook.py");
    let content = b"import pbs\n\ndef handler(e):\n    e.accept()\n";
    fs::write(&original, content).unwrap();

    let mut stream = Vec::new();
    emit_base64(&original, &mut stream).unwrap();
    let text = String::from_utf8(stream).unwrap();

    let decoded = decode_base64_stream(&text).unwrap();
    assert_eq!(decoded, content);
}

#[test]
fn test_b64_file_round_trip_through_staging() {
    let dir = tempfile::tempdir().unwrap();
    let data_b64 = dir.path().join("data.b64");
    let staged = dir.path().join("qmgr_hook1234abc");
    let out_b64 = dir.path().join("out.b64");

    fs::write(&data_b64, "aW1wb3J0IHBicwo=\n").unwrap();

    // Import side: copy the base64 file into the staging area.
    dump_file(Some(&data_b64), Some(&staged), HOOKSTR_BASE64).unwrap();
    // Export side: copy it back out.
    dump_file(Some(&staged), Some(&out_b64), HOOKSTR_BASE64).unwrap();

    assert_eq!(
        fs::read(&data_b64).unwrap(),
        fs::read(&out_b64).unwrap()
    );
}

#[test]
fn test_blank_line_ends_base64_stream_only() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src");
    fs::write(&src, "QQ==\n\nGARBAGE AFTER TERMINATOR\n").unwrap();

    let dst = dir.path().join("dst");
    dump_file(Some(&src), Some(&dst), HOOKSTR_BASE64).unwrap();
    assert_eq!(fs::read_to_string(&dst).unwrap(), "QQ==\n");

    // Default encoding copies everything, blank lines included.
    let dst2 = dir.path().join("dst2");
    dump_file(Some(&src), Some(&dst2), "default").unwrap();
    assert_eq!(
        fs::read_to_string(&dst2).unwrap(),
        "QQ==\n\nGARBAGE AFTER TERMINATOR\n"
    );
}

#[test]
fn test_missing_input_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.py");
    let dst = dir.path().join("dst");
    let err = dump_file(Some(&missing), Some(&dst), "default").unwrap_err();
    assert!(err.contains("nope.py"));
}
