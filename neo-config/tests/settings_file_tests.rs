use neo_config::{AssemblerSettings, ConfigError, NetworkType};
use std::io::Write;

#[test]
fn loads_settings_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[protocol]\nnetwork = 894710606\nmax_valid_until_block_increment = 100\n\n[policy]\nexec_fee_factor = 1"
    )
    .unwrap();

    let settings = AssemblerSettings::load(file.path()).unwrap();
    assert_eq!(settings.protocol.network_type(), NetworkType::TestNet);
    assert_eq!(settings.protocol.max_valid_until_block_increment, 100);
    assert_eq!(settings.protocol.max_transaction_size, 102_400);
    assert_eq!(settings.policy.exec_fee_factor, 1);
}

#[test]
fn missing_file_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = AssemblerSettings::load(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn serialized_settings_load_back() {
    let settings = AssemblerSettings::testnet();
    let text = toml::to_string(&settings).unwrap();
    assert_eq!(AssemblerSettings::from_toml_str(&text).unwrap(), settings);
}
