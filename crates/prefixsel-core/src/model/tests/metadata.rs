use super::support::{bounded_constraint, unit_variable};
use super::*;

#[test]
fn test_variable_name_lifecycle() {
    let mut model = Model::new();
    let var = model.add_variable(unit_variable()).unwrap();
    assert!(model.get_variable_name(var).is_none());
    model.set_variable_name(var, "row_0".to_string()).unwrap();
    assert_eq!(model.get_variable_name(var), Some("row_0"));
}

#[test]
fn test_variable_metadata() {
    let mut model = Model::new();
    let var = model.add_variable(unit_variable()).unwrap();
    let meta = serde_json::json!({"row": 0});
    model.set_variable_metadata(var, meta.clone()).unwrap();
    assert_eq!(model.get_variable_metadata(var), Some(&meta));
}

#[test]
fn test_metadata_on_missing_variable_fails() {
    let mut model = Model::new();
    let missing = VariableId::new(3);
    assert_eq!(
        model.set_variable_metadata(missing, serde_json::json!({})),
        Err(ModelError::InvalidVariableId(missing))
    );
}

#[test]
fn test_constraint_name_family_lookup() {
    let mut model = Model::new();
    let a = model.add_constraint(bounded_constraint(0.0, 1.0)).unwrap();
    let b = model.add_constraint(bounded_constraint(0.0, 1.0)).unwrap();
    let c = model.add_constraint(bounded_constraint(0.0, 1.0)).unwrap();
    model.set_constraint_name(a, "increment_rows".to_string()).unwrap();
    model.set_constraint_name(b, "target".to_string()).unwrap();
    model.set_constraint_name(c, "increment_rows".to_string()).unwrap();

    assert_eq!(model.constraints_named("increment_rows"), vec![a, c]);
    assert_eq!(model.constraints_named("target"), vec![b]);
    assert!(model.constraints_named("missing").is_empty());
    assert_eq!(model.get_constraint_name(b), Some("target"));
}
