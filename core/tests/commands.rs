use seedsample_core::{
    command::{execute, CommandReply, ContractCommand},
    config::ContractSettings,
    contract::RandomContract,
    error::ContractError,
    store::ContractStore,
};

fn build_contract() -> RandomContract {
    let store = ContractStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    RandomContract::build(&ContractSettings::default_test(), store)
}

fn parse(json: &str) -> ContractCommand {
    serde_json::from_str(json).expect("command json")
}

#[test]
fn scripted_session() {
    let mut contract = build_contract();

    let reply = execute(
        &mut contract,
        parse(r#"{"cmd":"initialize","caller":"deployer","height":1,"max_value":10000,"max_count":100}"#),
    )
    .unwrap();
    assert_eq!(reply, CommandReply::Done);
    assert_eq!(
        execute(&mut contract, parse(r#"{"cmd":"get_max_value"}"#)).unwrap(),
        CommandReply::Bound(10_000)
    );
    assert_eq!(
        execute(&mut contract, parse(r#"{"cmd":"is_initialized"}"#)).unwrap(),
        CommandReply::Flag(true)
    );

    contract.finalize_randomness(2);
    let generate = parse(
        r#"{"cmd":"generate","caller":"deployer","height":2,"key":"Test","max_value":1000,"count":5}"#,
    );
    let CommandReply::Values(values) = execute(&mut contract, generate.clone()).unwrap() else {
        panic!("generate should reply with values");
    };
    assert_eq!(values.len(), 5);

    assert_eq!(
        execute(&mut contract, parse(r#"{"cmd":"get_sample","key":"Test"}"#)).unwrap(),
        CommandReply::Sample(Some(values))
    );
    assert_eq!(
        execute(&mut contract, parse(r#"{"cmd":"verify_sample","key":"Test"}"#)).unwrap(),
        CommandReply::Flag(true)
    );

    let err = execute(&mut contract, generate).unwrap_err();
    assert_eq!(err.kind(), "duplicate_key");
}

#[test]
fn errors_surface_with_stable_kinds() {
    let mut contract = build_contract();

    let err = execute(
        &mut contract,
        parse(r#"{"cmd":"set_max_count","caller":"deployer","height":1,"max_count":3}"#),
    )
    .unwrap_err();
    assert!(matches!(err, ContractError::PermissionDenied { .. }));
    assert_eq!(err.kind(), "permission_denied");

    let err = execute(
        &mut contract,
        parse(r#"{"cmd":"generate","caller":"deployer","height":1,"key":"x","max_value":10,"count":1}"#),
    )
    .unwrap_err();
    assert_eq!(err.kind(), "invalid_range");

    assert_eq!(
        execute(&mut contract, parse(r#"{"cmd":"get_admin"}"#)).unwrap(),
        CommandReply::Admin(None)
    );
    assert_eq!(
        execute(&mut contract, parse(r#"{"cmd":"get_sample","key":"x"}"#)).unwrap(),
        CommandReply::Sample(None)
    );
}
