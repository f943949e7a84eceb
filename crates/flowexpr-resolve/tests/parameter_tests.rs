mod common;

use common::*;
use flowexpr_resolve::*;

fn literal(value: i32) -> Receiver {
    Receiver::ValueLiteral { ty: Type::int(), value: LiteralValue::Int(value) }
}

#[test]
fn test_each_index_yields_its_argument() {
    let fx = fixture();
    for n in 1..=5 {
        let arguments: Vec<Receiver> = (0..n).map(literal).collect();
        let ctx = ResolutionContext::for_method_use(Receiver::this(account()), arguments.clone());
        for i in 1..=n {
            let resolved = resolve(&fx, &format!("#{}", i), &ctx, fx.account_scope).unwrap();
            assert_eq!(resolved, arguments[(i - 1) as usize]);
        }
    }
}

#[test]
fn test_declared_parameters() {
    let fx = fixture();
    let ctx = deposit_context(&fx);
    let deposit = deposit_method(&fx.table);

    let first = resolve(&fx, "#1", &ctx, fx.deposit_scope).unwrap();
    assert_eq!(first, Receiver::local(deposit.parameters[0].clone()));
    assert_eq!(first.ty(), Some(&long()));

    // A parameter named in the method body is the same receiver as its marker.
    let by_name = resolve(&fx, "memo", &ctx, fx.deposit_scope).unwrap();
    assert_eq!(by_name, resolve(&fx, "#2", &ctx, fx.deposit_scope).unwrap());
}

#[test]
fn test_index_zero_always_fails() {
    let fx = fixture();
    let contexts = vec![
        deposit_context(&fx),
        ResolutionContext::for_class_declaration(account()),
        ResolutionContext::new(Some(Receiver::this(account())), None),
        ResolutionContext::new(None, None),
    ];
    for ctx in &contexts {
        let err = resolve(&fx, "#0", ctx, fx.account_scope).unwrap_err();
        expect_test::expect![[r##"Invalid '#0' because one should use "this" for the receiver or "#1" for the first formal parameter"##]]
            .assert_eq(&err.to_string());
        assert!(err.is_flow_parse_error());
    }
}

#[test]
fn test_index_too_big() {
    let fx = fixture();
    let ctx = deposit_context(&fx);
    let err = resolve(&fx, "#3", &ctx, fx.deposit_scope).unwrap_err();
    assert_eq!(err, FlowExprError::IndexTooBig { index: 3, count: 2 });
    assert_eq!(err.message_key(), "flowexpr.parse.index.too.big");
    assert_eq!(err.args(), vec!["3".to_string()]);

    let ctx = ResolutionContext::for_class_declaration(account());
    let err = resolve(&fx, "#1", &ctx, fx.account_scope).unwrap_err();
    assert_eq!(err, FlowExprError::IndexTooBig { index: 1, count: 0 });
}

#[test]
fn test_index_past_usize_is_too_big() {
    let fx = fixture();
    let ctx = deposit_context(&fx);
    let err = resolve(&fx, "#99999999999999999999999", &ctx, fx.deposit_scope).unwrap_err();
    assert!(matches!(err, FlowExprError::IndexTooBig { count: 2, .. }), "got {:?}", err);
    assert_eq!(err.message_key(), "flowexpr.parse.index.too.big");
}

#[test]
fn test_no_parameters_available() {
    let fx = fixture();
    let ctx = ResolutionContext::new(Some(Receiver::this(account())), None);
    let err = resolve(&fx, "#1", &ctx, fx.account_scope).unwrap_err();
    expect_test::expect!["Invalid '#1' because no parameter found"].assert_eq(&err.to_string());
}

#[test]
fn test_leading_zero_marker_is_rejected() {
    let fx = fixture();
    let ctx = deposit_context(&fx);
    let err = resolve(&fx, "#01", &ctx, fx.deposit_scope).unwrap_err();
    expect_test::expect!["Invalid '#01' because is not a valid parameter reference"]
        .assert_eq(&err.to_string());
}

#[test]
fn test_markers_inside_expressions() {
    let fx = fixture();
    let ctx = deposit_context(&fx);
    let receiver = resolve(&fx, "history[#1]", &ctx, fx.deposit_scope).unwrap();
    match receiver {
        Receiver::ArrayAccess { index, .. } => {
            assert_eq!(*index, Receiver::local(deposit_method(&fx.table).parameters[0].clone()))
        }
        other => panic!("expected an array access, got {:?}", other),
    }
    assert_eq!(parameter_indices("history[#1] == #2 + #1"), vec![1, 2, 1]);
}

#[test]
fn test_marker_is_not_a_member() {
    let fx = fixture();
    let ctx = deposit_context(&fx);
    // After a dot the rewritten marker is an ordinary member name.
    let err = resolve(&fx, "this.#1", &ctx, fx.deposit_scope).unwrap_err();
    expect_test::expect!["Invalid '_param_1' because identifier not found"].assert_eq(&err.to_string());
}
