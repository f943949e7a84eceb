//! Entry points: from an expression string to a [`Receiver`].

use crate::context::{implicit_receiver, ResolutionContext};
use crate::error::{FlowExprError, FlowExprResult};
use crate::lookup::SymbolResolver;
use crate::receiver::Receiver;
use crate::resolve_expr::ExpressionResolver;
use crate::symbol::VariableElement;
use flowexpr_syntax::{parse_expression, preprocess};

/// Resolves `expression` in `context`, looking names up from `scope`.
///
/// `use_local_scope` overrides the context's flag: when false, bare names
/// never resolve to locals or parameters.
pub fn parse_receiver<R: SymbolResolver + ?Sized>(
    expression: &str,
    context: &ResolutionContext,
    resolver: &R,
    scope: &R::Scope,
    use_local_scope: bool,
) -> FlowExprResult<Receiver> {
    let context = context.with_use_local_scope(use_local_scope);
    let preprocessed = preprocess(expression);
    log::debug!(
        "parsing `{}` (parameters {:?}, local scope: {})",
        expression,
        preprocessed.indices,
        use_local_scope
    );

    let expr = parse_expression(&preprocessed.text).map_err(|err| {
        log::debug!("`{}` does not parse: {}", expression, err);
        FlowExprError::parse_error(expression, "is an invalid expression")
    })?;

    let receiver = ExpressionResolver::new(resolver, scope)
        .resolve(&expr, &context)
        .map_err(|err| {
            log::debug!("`{}` does not resolve: {}", expression, err);
            err
        })?;

    if receiver.is_class_name() && !expression.ends_with("class") {
        return Err(FlowExprError::parse_error(
            expression,
            "a class name cannot terminate a flow expression string",
        ));
    }
    Ok(receiver)
}

/// The receiver denoting a declared variable.
///
/// Locals and parameters map to [`Receiver::LocalVariable`]. A field is
/// resolved by name from its implicit receiver, so a static field comes
/// back rooted at its class and an instance field at `this`.
pub fn internal_repr_of_variable<R: SymbolResolver + ?Sized>(
    variable: &VariableElement,
    resolver: &R,
    scope: &R::Scope,
) -> FlowExprResult<Receiver> {
    match variable {
        VariableElement::Variable(local) => Ok(Receiver::local(local.clone())),
        VariableElement::Field(field) => {
            let receiver = implicit_receiver(field.owner.clone(), field.is_static);
            let context = ResolutionContext::new(Some(receiver), None);
            parse_receiver(&field.name, &context, resolver, scope, false)
        }
    }
}
