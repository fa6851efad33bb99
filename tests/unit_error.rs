use dz::error::{exit_codes, Error, JsonError};

#[test]
fn exit_codes_map_correctly() {
    let user = Error::Validation("title is required".to_string());
    assert_eq!(user.exit_code(), exit_codes::USER_ERROR);

    let not_found = Error::NotFound("abc".to_string());
    assert_eq!(not_found.exit_code(), exit_codes::USER_ERROR);

    let category = Error::InvalidCategory("Backlog".to_string());
    assert_eq!(category.exit_code(), exit_codes::USER_ERROR);

    let op = Error::Persistence("backend down".to_string());
    assert_eq!(op.exit_code(), exit_codes::OPERATION_FAILED);
}

#[test]
fn json_error_includes_code() {
    let err = Error::NotFound("abc".to_string());
    let json = JsonError::from(&err);
    assert_eq!(json.code, exit_codes::USER_ERROR);
    assert!(json.error.contains("Task not found"));
}

#[test]
fn category_error_names_the_valid_set() {
    let err = Error::InvalidCategory("Backlog".to_string());
    let message = err.to_string();
    assert!(message.contains("To-Do"));
    assert!(message.contains("In Progress"));
    assert!(message.contains("Done"));
}
