//! Resolution against a minimal lookup service that relies on the default
//! [`TypeOracle`] methods and can be told to fail.

use flowexpr_resolve::*;

#[derive(Default)]
struct FakeResolver {
    failure: Option<LookupError>,
    methods: Vec<MethodSymbol>,
}

impl TypeOracle for FakeResolver {
    fn direct_supertypes(&self, _ty: &Type) -> Vec<Type> {
        Vec::new()
    }

    fn is_interface(&self, _ty: &DeclaredType) -> bool {
        false
    }

    fn enclosing_class(&self, _ty: &DeclaredType) -> Type {
        Type::NoType
    }
}

impl SymbolResolver for FakeResolver {
    type Scope = ();

    fn find_local_variable_or_parameter_or_field(&self, _name: &str, _scope: &()) -> LookupResult<Option<VariableElement>> {
        Ok(None)
    }

    fn find_field(&self, _name: &str, _ty: &Type, _scope: &()) -> LookupResult<Option<FieldSymbol>> {
        Ok(None)
    }

    fn find_class(&self, _name: &str, _scope: &()) -> LookupResult<Option<ClassSymbol>> {
        Ok(None)
    }

    fn find_method(
        &self,
        name: &str,
        _ty: &Type,
        _scope: &(),
        argument_types: &[Type],
    ) -> LookupResult<Option<MethodSymbol>> {
        if let Some(failure) = &self.failure {
            return Err(failure.clone());
        }
        Ok(self
            .methods
            .iter()
            .find(|m| m.name == name && m.parameters.len() == argument_types.len())
            .cloned())
    }

    fn find_package(&self, _name: &str, _scope: &()) -> LookupResult<Option<PackageSymbol>> {
        Ok(None)
    }

    fn find_class_in_package(
        &self,
        _name: &str,
        _package: &PackageSymbol,
        _scope: &(),
    ) -> LookupResult<Option<ClassSymbol>> {
        Ok(None)
    }

    fn enclosing_method_parameters(&self, _scope: &()) -> Option<Vec<String>> {
        None
    }
}

fn widget() -> Type {
    Type::declared("shop.Widget")
}

fn widget_context(arguments: Vec<Receiver>) -> ResolutionContext {
    ResolutionContext::for_method_use(Receiver::this(widget()), arguments)
}

#[test]
fn test_lookup_failure_with_message() {
    let resolver = FakeResolver {
        failure: Some(LookupError::new("broken classpath")),
        ..Default::default()
    };
    let err = parse_receiver("size()", &widget_context(vec![]), &resolver, &(), true).unwrap_err();
    expect_test::expect!["Invalid 'size()' because broken classpath"].assert_eq(&err.to_string());
    assert!(err.is_flow_parse_error());
    assert!(!err.is_fatal());
}

#[test]
fn test_lookup_failure_without_message_is_fatal() {
    let resolver = FakeResolver {
        failure: Some(LookupError::without_message()),
        ..Default::default()
    };
    let err = parse_receiver("size()", &widget_context(vec![]), &resolver, &(), true).unwrap_err();
    expect_test::expect!["Internal error: no detail message in lookup failure while resolving 'size()'"]
        .assert_eq(&err.to_string());
    assert!(err.is_fatal());
    assert_eq!(err.message_key(), "flowexpr.internal.error");
}

#[test]
fn test_constructor_is_not_a_method() {
    let mut constructor = MethodSymbol::new("Widget", widget(), vec![], Type::Void, false);
    constructor.kind = ExecutableKind::Constructor;
    let resolver = FakeResolver { methods: vec![constructor], ..Default::default() };
    let err = parse_receiver("Widget()", &widget_context(vec![]), &resolver, &(), true).unwrap_err();
    expect_test::expect!["Invalid 'Widget()' because Widget resolves to a Constructor, not a method"]
        .assert_eq(&err.to_string());
}

#[test]
fn test_default_value_of_boxes_primitive_arguments() {
    let integer = Type::declared("java.lang.Integer");
    let take = MethodSymbol::new(
        "take",
        widget(),
        vec![VariableSymbol::parameter("n", integer.clone(), 1)],
        Type::Void,
        false,
    );
    let resolver = FakeResolver { methods: vec![take], ..Default::default() };
    let receiver = parse_receiver("take(7)", &widget_context(vec![]), &resolver, &(), true).unwrap();
    expect_test::expect!["this.take(java.lang.Integer.valueOf(7))"].assert_eq(&receiver.to_string());

    match receiver {
        Receiver::MethodCall { arguments, .. } => match &arguments[0] {
            Receiver::MethodCall { method, ty, .. } => {
                assert_eq!(*ty, integer);
                assert_eq!(method.owner, integer);
                assert_eq!(method.parameter_types(), vec![Type::int()]);
                assert!(method.is_static);
            }
            other => panic!("expected a boxing call, got {:?}", other),
        },
        other => panic!("expected a method call, got {:?}", other),
    }
}

#[test]
fn test_array_length_without_a_length_field() {
    let resolver = FakeResolver::default();
    let values = VariableSymbol::parameter("values", Type::array_of(Type::int()), 1);
    let ctx = widget_context(vec![Receiver::local(values.clone())]);

    let receiver = parse_receiver("#1.length", &ctx, &resolver, &(), true).unwrap();
    assert_eq!(
        receiver,
        Receiver::FieldAccess {
            receiver: Box::new(Receiver::local(values)),
            ty: Type::int(),
            field: FieldSymbol::array_length(&Type::array_of(Type::int())),
        }
    );

    let err = parse_receiver("#1.size", &ctx, &resolver, &(), true).unwrap_err();
    expect_test::expect!["Invalid 'size' because identifier not found"].assert_eq(&err.to_string());
}

#[test]
fn test_super_without_superclass() {
    let resolver = FakeResolver::default();
    let err = parse_receiver("super", &widget_context(vec![]), &resolver, &(), true).unwrap_err();
    expect_test::expect!["Invalid 'super' because super class not found"].assert_eq(&err.to_string());
}
