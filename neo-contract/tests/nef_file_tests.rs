use neo_contract::{ContractError, MethodToken, NefFile, MAX_NEF_SIZE, NEF_MAGIC};
use neo_io::Serializable;
use neo_primitives::UInt160;
use neo_vm::{CallFlags, OpCode, ScriptBuilder};
use std::io::Write;

fn script() -> Vec<u8> {
    let mut builder = ScriptBuilder::new();
    builder
        .emit_push_int(42)
        .emit_syscall("System.Runtime.Notify")
        .unwrap()
        .emit_opcode(OpCode::RET);
    builder.into_bytes()
}

#[test]
fn built_container_has_valid_magic_and_checksum() {
    let nef = NefFile::new("test-compiler-1.0", "", vec![], script()).unwrap();
    assert_eq!(nef.magic(), NEF_MAGIC);
    assert!(nef.has_valid_magic());
    assert!(nef.verify_checksum());
}

#[test]
fn changing_the_script_invalidates_the_checksum() {
    let mut nef = NefFile::new("test-compiler-1.0", "", vec![], script()).unwrap();
    let original = nef.checksum();

    nef.set_script(vec![OpCode::NOP as u8, OpCode::RET as u8]).unwrap();
    assert!(!nef.verify_checksum());

    nef.update_checksum().unwrap();
    assert!(nef.verify_checksum());
    assert_ne!(nef.checksum(), original);
}

fn gas_transfer_token() -> MethodToken {
    MethodToken::new(
        UInt160::parse("0xd2a4cff31913016155e38e474a2c06d08be276cf").unwrap(),
        "transfer",
        4,
        true,
        CallFlags::ALL,
    )
    .unwrap()
}

#[test]
fn changing_the_source_invalidates_the_checksum() {
    let mut nef = NefFile::new("test-compiler-1.0", "", vec![], script()).unwrap();
    nef.set_source("https://github.com/neo-project/example").unwrap();
    assert!(!nef.verify_checksum());

    nef.update_checksum().unwrap();
    assert!(nef.verify_checksum());
}

#[test]
fn changing_any_field_under_an_old_checksum_is_detected() {
    let token = gas_transfer_token();
    let base = NefFile::new("test-compiler-1.0", "src", vec![token.clone()], script()).unwrap();
    let checksum = base.checksum();

    let mut fewer_params = token.clone();
    fewer_params.parameters_count = 3;
    let mut no_return = token.clone();
    no_return.has_return_value = false;
    let mut read_only = token.clone();
    read_only.call_flags = CallFlags::READ_ONLY;

    let variants = vec![
        ("test-compiler-2.0", "src", vec![token.clone()]),
        ("test-compiler-1.0", "src2", vec![token.clone()]),
        ("test-compiler-1.0", "src", vec![]),
        ("test-compiler-1.0", "src", vec![token.clone(), token.clone()]),
        ("test-compiler-1.0", "src", vec![fewer_params]),
        ("test-compiler-1.0", "src", vec![no_return]),
        ("test-compiler-1.0", "src", vec![read_only]),
    ];
    for (compiler, source, tokens) in variants {
        let mut nef =
            NefFile::from_parts(NEF_MAGIC, compiler, source, tokens, script(), checksum).unwrap();
        assert!(!nef.verify_checksum(), "{compiler} {source} kept its checksum");

        nef.update_checksum().unwrap();
        assert!(nef.verify_checksum());
        assert_ne!(nef.checksum(), checksum);
    }

    let same =
        NefFile::from_parts(NEF_MAGIC, "test-compiler-1.0", "src", vec![token], script(), checksum)
            .unwrap();
    assert!(same.verify_checksum());
}

#[test]
fn loads_from_file() {
    let nef = NefFile::new(
        "test-compiler-1.0",
        "git://repo",
        vec![gas_transfer_token()],
        script(),
    )
    .unwrap();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&nef.to_array().unwrap()).unwrap();
    file.flush().unwrap();

    let loaded = NefFile::from_file(file.path()).unwrap();
    assert_eq!(loaded, nef);
    assert_eq!(loaded.tokens()[0].method, "transfer");
}

#[test]
fn file_errors_are_reported() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.nef");
    assert!(matches!(
        NefFile::from_file(&missing),
        Err(ContractError::File { .. })
    ));

    let big = dir.path().join("big.nef");
    std::fs::write(&big, vec![0u8; MAX_NEF_SIZE + 1]).unwrap();
    assert!(matches!(
        NefFile::from_file(&big),
        Err(ContractError::RecordTooLarge { .. })
    ));
}

#[test]
fn corrupted_file_reports_checksum_mismatch() {
    let nef = NefFile::new("test-compiler-1.0", "", vec![], script()).unwrap();
    let mut bytes = nef.to_array().unwrap();
    // Swap the trailing RET for NOP so the record stays well formed.
    let script_end = bytes.len() - 4 - 1;
    bytes[script_end] = OpCode::NOP as u8;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contract.nef");
    std::fs::write(&path, &bytes).unwrap();
    assert!(matches!(
        NefFile::from_file(&path),
        Err(ContractError::ChecksumMismatch { stored, .. }) if stored == nef.checksum()
    ));
}
