//! A small banking program shared by the integration tests.
#![allow(dead_code)]

use flowexpr_resolve::*;

pub struct Fixture {
    pub table: SymbolTable,
    pub account_scope: ScopeId,
    pub deposit_scope: ScopeId,
    pub deposit_block: ScopeId,
    pub audit_scope: ScopeId,
    pub savings_scope: ScopeId,
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn account() -> Type {
    Type::declared("bank.Account")
}

pub fn person() -> Type {
    Type::declared("bank.Person")
}

pub fn long() -> Type {
    Type::Primitive(PrimitiveType::Long)
}

pub fn list_of(arg: Type) -> Type {
    Type::Declared(DeclaredType::with_args("java.util.List", vec![arg]))
}

pub fn fixture() -> Fixture {
    init_logger();
    let mut table = SymbolTable::new();
    let boolean = Type::Primitive(PrimitiveType::Boolean);

    table
        .class("java.util", "List")
        .type_params(&["E"])
        .interface()
        .method("get", &[("index", Type::int())], Type::TypeVar("E".to_string()))
        .method("size", &[], Type::int())
        .build();

    table
        .class("bank", "Person")
        .field("name", Type::string())
        .field("accounts", Type::array_of(account()))
        .method("age", &[], Type::int())
        .method("account", &[("index", Type::int())], account())
        .build();

    table
        .class("bank", "Account")
        .field("balance", Type::int())
        .field("amount", long())
        .field("owner", person())
        .field("history", Type::array_of(Type::int()))
        .field("entries", list_of(Type::string()))
        .static_field("count", Type::int())
        .method("get", &[("values", Type::array_of(Type::int()))], Type::array_of(Type::int()))
        .method("deposit", &[("amount", long()), ("memo", Type::string())], Type::Void)
        .method("lookup", &[("key", Type::declared("java.lang.Integer"))], person())
        .static_method("create", &[("seed", Type::int())], account())
        .constructor(&[("seed", Type::int())])
        .build();

    table
        .member_class("bank.Account", "Audit")
        .field("auditor", person())
        .method("check", &[], boolean)
        .build();

    table
        .class("bank", "Savings")
        .extends(account())
        .field("rate", Type::Primitive(PrimitiveType::Double))
        .build();

    let root = table.root_scope();
    let account_scope = table.push_class_scope(root, "bank.Account");
    let deposit = deposit_method(&table);
    let deposit_scope = table.push_method_scope(account_scope, &deposit);
    let deposit_block = table.push_block_scope(deposit_scope);
    table.declare_local(deposit_block, "tmp", person());
    let audit_scope = table.push_class_scope(account_scope, "bank.Account.Audit");
    let savings_scope = table.push_class_scope(root, "bank.Savings");

    Fixture {
        table,
        account_scope,
        deposit_scope,
        deposit_block,
        audit_scope,
        savings_scope,
    }
}

pub fn deposit_method(table: &SymbolTable) -> MethodSymbol {
    table
        .declared_method("bank.Account", "deposit")
        .cloned()
        .expect("deposit is declared")
}

/// The context inside `Account.deposit(long amount, String memo)`.
pub fn deposit_context(fx: &Fixture) -> ResolutionContext {
    ResolutionContext::for_method_declaration(&deposit_method(&fx.table), account())
}

pub fn resolve(fx: &Fixture, expression: &str, context: &ResolutionContext, scope: ScopeId) -> FlowExprResult<Receiver> {
    parse_receiver(expression, context, &fx.table, &scope, true)
}

pub fn resolve_without_locals(
    fx: &Fixture,
    expression: &str,
    context: &ResolutionContext,
    scope: ScopeId,
) -> FlowExprResult<Receiver> {
    parse_receiver(expression, context, &fx.table, &scope, false)
}

pub fn this_field(fx: &Fixture, name: &str) -> Receiver {
    let field = fx
        .table
        .declared_field("bank.Account", name)
        .cloned()
        .expect("field is declared");
    Receiver::FieldAccess {
        receiver: Box::new(Receiver::this(account())),
        ty: field.ty.clone(),
        field,
    }
}
