use std::collections::HashMap;

use super::*;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| vars.get(key).cloned()
}

const IDENTITY_VARS: [(&str, &str); 4] = [
    ("LAWME_IDENTITY_API_KEY", "key"),
    ("LAWME_IDENTITY_AUTH_DOMAIN", "lawme.example.com"),
    ("LAWME_IDENTITY_PROJECT_ID", "lawme"),
    ("LAWME_IDENTITY_APP_ID", "1:2:web:3"),
];

#[test]
fn defaults_without_environment() {
    let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
    assert_eq!(config.port, DEFAULT_PORT);
    assert_eq!(config.identity, None);
}

#[test]
fn port_override() {
    let config = ServerConfig::from_lookup(lookup(&[("PORT", " 8080 ")])).unwrap();
    assert_eq!(config.port, 8080);
}

#[test]
fn invalid_port_is_fatal() {
    let err = ServerConfig::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
    assert_eq!(err, ConfigError::Invalid { var: "PORT", value: "eighty".to_owned() });
}

#[test]
fn identity_config_from_required_vars() {
    let identity = ServerConfig::from_lookup(lookup(&IDENTITY_VARS)).unwrap().identity.unwrap();
    assert_eq!(identity.api_key, "key");
    assert_eq!(identity.auth_domain, "lawme.example.com");
    assert_eq!(identity.project_id, "lawme");
    assert_eq!(identity.app_id, "1:2:web:3");
    assert_eq!(identity.measurement_id, None);
}

#[test]
fn identity_config_reads_optionals() {
    let mut vars = IDENTITY_VARS.to_vec();
    vars.push(("LAWME_IDENTITY_MEASUREMENT_ID", "G-1"));
    vars.push(("LAWME_IDENTITY_STORAGE_BUCKET", "   "));
    let identity = ServerConfig::from_lookup(lookup(&vars)).unwrap().identity.unwrap();
    assert_eq!(identity.measurement_id.as_deref(), Some("G-1"));
    assert_eq!(identity.storage_bucket, None);
}

#[test]
fn missing_identity_var_disables_identity() {
    let vars: Vec<_> = IDENTITY_VARS.iter().copied().filter(|(k, _)| *k != "LAWME_IDENTITY_APP_ID").collect();
    assert_eq!(
        identity_from_lookup(&lookup(&vars)),
        Err(ConfigError::Missing { var: "LAWME_IDENTITY_APP_ID" })
    );
    assert_eq!(ServerConfig::from_lookup(lookup(&vars)).unwrap().identity, None);
}
