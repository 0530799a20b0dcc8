use jobcraft::presentation::Environment;

#[test]
fn given_known_names_when_parsing_environment_then_case_insensitive() {
    assert_eq!(
        Environment::try_from("LOCAL".to_string()),
        Ok(Environment::Local)
    );
    assert_eq!(
        Environment::try_from("test".to_string()),
        Ok(Environment::Test)
    );
    assert_eq!(
        Environment::try_from("production".to_string()),
        Ok(Environment::Prod)
    );
}

#[test]
fn given_unknown_name_when_parsing_environment_then_error() {
    assert!(Environment::try_from("staging".to_string()).is_err());
}
