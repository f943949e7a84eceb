//! Resolution of expression trees into receivers.

use crate::context::ResolutionContext;
use crate::error::{FlowExprError, FlowExprResult};
use crate::lookup::{LookupResult, SymbolResolver};
use crate::receiver::{LiteralValue, Receiver};
use crate::symbol::{FieldSymbol, MethodSymbol, VariableElement};
use crate::types::{PrimitiveType, Type};
use flowexpr_syntax::{parameter_digits, Expr, ExprKind, Literal, TypeName};

/// Resolves expressions against one lexical scope of one [`SymbolResolver`].
pub struct ExpressionResolver<'a, R: SymbolResolver + ?Sized> {
    resolver: &'a R,
    scope: &'a R::Scope,
}

impl<'a, R: SymbolResolver + ?Sized> ExpressionResolver<'a, R> {
    pub fn new(resolver: &'a R, scope: &'a R::Scope) -> Self {
        Self { resolver, scope }
    }

    pub fn resolve(&self, expr: &Expr, context: &ResolutionContext) -> FlowExprResult<Receiver> {
        log::trace!("resolving `{}` (parsing member: {})", expr, context.parsing_member());
        match &expr.kind {
            ExprKind::Literal(literal) => self.resolve_literal(expr, literal, context),
            ExprKind::This => Ok(self.resolve_this(context)),
            ExprKind::Super => self.resolve_super(context),
            ExprKind::Enclosed(inner) => self.resolve(inner, context),
            ExprKind::ArrayAccess { array, index } => self.resolve_array_access(expr, array, index, context),
            ExprKind::Name(name) => self.resolve_name(name, context),
            ExprKind::FieldAccess { scope, name } => self.resolve_field_access(expr, scope, name, context),
            ExprKind::MethodCall { scope: Some(scope), name, arguments } => {
                let receiver = self.resolve(scope, context)?;
                self.resolve_method_call(name, arguments, &context.as_member_of(receiver))
            }
            ExprKind::MethodCall { scope: None, name, arguments } => {
                self.resolve_method_call(name, arguments, context)
            }
            ExprKind::ClassLiteral(ty) => self.resolve_class_literal(expr, ty, context),
            ExprKind::Unary { .. } | ExprKind::Binary { .. } => Err(unrecognized(expr, context)),
        }
    }

    fn resolve_literal(
        &self,
        expr: &Expr,
        literal: &Literal,
        context: &ResolutionContext,
    ) -> FlowExprResult<Receiver> {
        let (ty, value) = match literal {
            Literal::Null => (Type::Null, LiteralValue::Null),
            Literal::Int(v) => (Type::int(), LiteralValue::Int(*v)),
            Literal::Long(v) => (Type::Primitive(PrimitiveType::Long), LiteralValue::Long(*v)),
            Literal::Double(v) => (Type::Primitive(PrimitiveType::Double), LiteralValue::Double(*v)),
            Literal::Char(c) => (Type::Primitive(PrimitiveType::Char), LiteralValue::Char(*c)),
            Literal::String(s) => (Type::string(), LiteralValue::String(s.clone())),
            Literal::Boolean(_) => return Err(unrecognized(expr, context)),
        };
        Ok(Receiver::ValueLiteral { ty, value })
    }

    fn resolve_this(&self, context: &ResolutionContext) -> Receiver {
        match context.receiver() {
            Some(receiver) if !receiver.contains_unknown() => receiver.clone(),
            receiver => Receiver::ThisReference {
                ty: receiver.and_then(Receiver::ty).cloned(),
            },
        }
    }

    fn resolve_super(&self, context: &ResolutionContext) -> FlowExprResult<Receiver> {
        if let Some(ty) = receiver_type(context) {
            for supertype in self.resolver.direct_supertypes(&ty) {
                if let Type::Declared(declared) = &supertype {
                    if !self.resolver.is_interface(declared) {
                        return Ok(Receiver::this(supertype));
                    }
                }
            }
        }
        Err(FlowExprError::parse_error("super", "super class not found"))
    }

    fn resolve_array_access(
        &self,
        expr: &Expr,
        array: &Expr,
        index: &Expr,
        context: &ResolutionContext,
    ) -> FlowExprResult<Receiver> {
        let array = self.resolve(array, context)?;
        let index = self.resolve(index, &context.to_outer_receiver())?;
        match array.ty() {
            Some(Type::Array(component)) => Ok(Receiver::ArrayAccess {
                ty: (**component).clone(),
                array: Box::new(array),
                index: Box::new(index),
            }),
            ty => {
                let ty = ty.map_or_else(|| "none".to_string(), |t| t.to_string());
                Err(FlowExprError::parse_error(
                    expr.to_string(),
                    format!("receiver not an array: {} : {}", array, ty),
                ))
            }
        }
    }

    fn resolve_name(&self, name: &str, context: &ResolutionContext) -> FlowExprResult<Receiver> {
        if !context.parsing_member() {
            if let Some(digits) = parameter_digits(name) {
                return self.resolve_parameter(digits, context);
            }
        }

        if !context.parsing_member() && context.use_local_scope() {
            let found = self.lookup(name, self.resolver.find_local_variable_or_parameter_or_field(name, self.scope))?;
            match found {
                Some(VariableElement::Field(field)) => {
                    let original_receiver = context.receiver().map_or(false, Receiver::is_this);
                    return self.field_receiver(name, context, original_receiver, field);
                }
                Some(VariableElement::Variable(variable)) => return Ok(Receiver::local(variable)),
                None => {}
            }
        }

        // Without local scope a parameter name would silently bind to a
        // same-named field; point the user at `#N` instead. Only on the
        // method itself: at a call site the parameters in scope are the caller's.
        if !context.parsing_member() && !context.use_local_scope() && self.written_on_enclosing_method(context) {
            if let Some(index) = self.shadowed_parameter_index(name) {
                return Err(FlowExprError::FormalParameterName { name: name.to_string(), index });
            }
        }

        if let Some((field, original_receiver)) = self.find_field_in_enclosing_classes(name, context)? {
            return self.field_receiver(name, context, original_receiver, field);
        }

        if let Some(class) = self.lookup(name, self.resolver.find_class(name, self.scope))? {
            return Ok(Receiver::class_name(class.as_type()));
        }

        if let Some(index) = self.shadowed_parameter_index(name) {
            return Err(FlowExprError::FormalParameterName { name: name.to_string(), index });
        }

        Err(FlowExprError::parse_error(name, "identifier not found"))
    }

    fn resolve_parameter(&self, digits: &str, context: &ResolutionContext) -> FlowExprResult<Receiver> {
        let marker = format!("#{}", digits);
        if digits.len() > 1 && digits.starts_with('0') {
            return Err(FlowExprError::parse_error(marker, "is not a valid parameter reference"));
        }
        // All digits, so parsing only fails past usize::MAX: beyond any argument list.
        let index = digits.parse::<usize>().unwrap_or(usize::MAX);
        context.argument(index).cloned()
    }

    /// Searches the receiver's type, then each enclosing class in turn.
    /// The flag is false once the search has left the receiver's own type.
    fn find_field_in_enclosing_classes(
        &self,
        name: &str,
        context: &ResolutionContext,
    ) -> FlowExprResult<Option<(FieldSymbol, bool)>> {
        let mut search_type = receiver_type(context).unwrap_or(Type::NoType);

        if search_type.is_array() {
            if name != "length" {
                return Ok(None);
            }
            let field = self.lookup(name, self.resolver.find_field(name, &search_type, self.scope))?;
            let field = field.unwrap_or_else(|| FieldSymbol::array_length(&search_type));
            return Ok(Some((field, true)));
        }

        let mut original_receiver = true;
        while let Type::Declared(declared) = &search_type {
            if let Some(field) = self.lookup(name, self.resolver.find_field(name, &search_type, self.scope))? {
                return Ok(Some((field, original_receiver)));
            }
            let enclosing = self.resolver.enclosing_class(declared);
            log::trace!("field `{}` not in `{}`, trying `{}`", name, declared, enclosing);
            search_type = enclosing;
            original_receiver = false;
        }

        Ok(None)
    }

    /// Builds the access of `field`, rooted at the context receiver when
    /// `original_receiver` holds and at an implicit `this` of the field's
    /// class otherwise.
    fn field_receiver(
        &self,
        name: &str,
        context: &ResolutionContext,
        original_receiver: bool,
        field: FieldSymbol,
    ) -> FlowExprResult<Receiver> {
        if field.is_static {
            return Ok(Receiver::FieldAccess {
                receiver: Box::new(Receiver::class_name(field.owner.clone())),
                ty: field.ty.clone(),
                field,
            });
        }

        let location = match context.receiver() {
            Some(receiver) if original_receiver => receiver.clone(),
            _ => Receiver::this(field.owner.clone()),
        };
        if location.is_class_name() {
            return Err(FlowExprError::parse_error(
                name,
                "a non-static field cannot have a class name as a receiver.",
            ));
        }
        Ok(Receiver::FieldAccess {
            receiver: Box::new(location),
            ty: field.ty.clone(),
            field,
        })
    }

    /// Whether the outer receiver is the implicit `this` of the class that
    /// declares the method enclosing the scope.
    fn written_on_enclosing_method(&self, context: &ResolutionContext) -> bool {
        match (context.outer_receiver(), self.resolver.enclosing_method_owner(self.scope)) {
            (Some(Receiver::ThisReference { ty: Some(ty) }), Some(owner)) => ty.erasure() == owner.erasure(),
            _ => false,
        }
    }

    fn shadowed_parameter_index(&self, name: &str) -> Option<usize> {
        self.resolver
            .enclosing_method_parameters(self.scope)?
            .iter()
            .position(|parameter| parameter == name)
            .map(|position| position + 1)
    }

    fn resolve_field_access(
        &self,
        expr: &Expr,
        scope: &Expr,
        name: &str,
        context: &ResolutionContext,
    ) -> FlowExprResult<Receiver> {
        if let Some(prefix) = scope.as_dotted_name() {
            let text = expr.to_string();
            if let Some(package) = self.lookup(&text, self.resolver.find_package(&prefix, self.scope))? {
                let class = self.lookup(&text, self.resolver.find_class_in_package(name, &package, self.scope))?;
                return match class {
                    Some(class) => Ok(Receiver::class_name(class.as_type())),
                    None => Err(FlowExprError::parse_error(
                        text,
                        format!("could not find class {} inside {}", name, prefix),
                    )),
                };
            }
        }

        let receiver = self.resolve(scope, context)?;
        self.resolve_name(name, &context.as_member_of(receiver))
    }

    fn resolve_method_call(
        &self,
        name: &str,
        arguments: &[Expr],
        context: &ResolutionContext,
    ) -> FlowExprResult<Receiver> {
        let text = call_text(name, arguments);

        let argument_context = context.to_outer_receiver();
        let mut actuals = arguments
            .iter()
            .map(|argument| self.resolve(argument, &argument_context))
            .collect::<FlowExprResult<Vec<_>>>()?;
        let argument_types: Vec<Type> = actuals
            .iter()
            .map(|actual| actual.ty().cloned().unwrap_or(Type::NoType))
            .collect();

        let receiver_type = receiver_type(context).unwrap_or(Type::NoType);
        let method = self.find_method_in_enclosing_classes(&text, name, &receiver_type, &argument_types)?;

        for (formal, actual) in method.parameters.iter().zip(actuals.iter_mut()) {
            let needs_boxing = formal.ty.is_boxed_primitive()
                && actual.ty().map_or(false, |ty| ty.as_primitive().is_some());
            if !needs_boxing {
                continue;
            }
            let value_of = self.resolver.value_of_method(&formal.ty).ok_or_else(|| {
                FlowExprError::parse_error(&text, format!("no valueOf method for {}", formal.ty))
            })?;
            let unboxed = std::mem::replace(actual, Receiver::ThisReference { ty: None });
            *actual = Receiver::MethodCall {
                ty: formal.ty.clone(),
                method: value_of,
                receiver: Box::new(Receiver::class_name(formal.ty.clone())),
                arguments: vec![unboxed],
            };
        }

        if method.is_static {
            return Ok(Receiver::MethodCall {
                ty: method.return_type.clone(),
                receiver: Box::new(Receiver::class_name(method.owner.clone())),
                method,
                arguments: actuals,
            });
        }

        let receiver = context
            .receiver()
            .cloned()
            .unwrap_or(Receiver::ThisReference { ty: None });
        if receiver.is_class_name() {
            return Err(FlowExprError::parse_error(
                text,
                "a non-static method call cannot have a class name as a receiver",
            ));
        }
        let ty = self.resolver.substitute_return_type(&method, &receiver_type);
        Ok(Receiver::MethodCall {
            ty,
            method,
            receiver: Box::new(receiver),
            arguments: actuals,
        })
    }

    /// Looks for an applicable method on an array receiver, or on a declared
    /// receiver type and then each of its enclosing classes.
    fn find_method_in_enclosing_classes(
        &self,
        text: &str,
        name: &str,
        receiver_type: &Type,
        argument_types: &[Type],
    ) -> FlowExprResult<MethodSymbol> {
        let mut found = None;
        let mut search_type = receiver_type.clone();

        if search_type.is_array() {
            found = self.lookup(text, self.resolver.find_method(name, &search_type, self.scope, argument_types))?;
        }

        while let Type::Declared(declared) = &search_type {
            found = self.lookup(text, self.resolver.find_method(name, &search_type, self.scope, argument_types))?;
            if found.as_ref().map_or(false, MethodSymbol::is_method) {
                break;
            }
            let enclosing = self.resolver.enclosing_class(declared);
            log::trace!("method `{}` not in `{}`, trying `{}`", name, declared, enclosing);
            search_type = enclosing;
        }

        match found {
            Some(method) if method.is_method() => Ok(method),
            Some(method) => Err(FlowExprError::parse_error(
                text,
                format!("{} resolves to a {:?}, not a method", method.name, method.kind),
            )),
            None => {
                let types: Vec<String> = argument_types.iter().map(|t| t.to_string()).collect();
                Err(FlowExprError::parse_error(
                    text,
                    format!("no method {}({}) found in {}", name, types.join(", "), receiver_type),
                ))
            }
        }
    }

    fn resolve_class_literal(
        &self,
        expr: &Expr,
        ty: &TypeName,
        context: &ResolutionContext,
    ) -> FlowExprResult<Receiver> {
        let primitive = match ty.segments.as_slice() {
            [single] => PrimitiveType::from_name(single),
            _ => None,
        };
        let base = match primitive {
            Some(primitive) => Receiver::class_name(Type::Primitive(primitive)),
            None => {
                let name = ty
                    .to_expr()
                    .ok_or_else(|| FlowExprError::parse_error(expr.to_string(), "is missing a type name"))?;
                self.resolve(&name, context)?
            }
        };

        if ty.dimensions == 0 {
            return Ok(base);
        }
        match base {
            Receiver::ClassName { ty: mut class_type } => {
                for _ in 0..ty.dimensions {
                    class_type = Type::array_of(class_type);
                }
                Ok(Receiver::class_name(class_type))
            }
            other => Err(FlowExprError::parse_error(
                expr.to_string(),
                format!("{} is not a class name", other),
            )),
        }
    }

    fn lookup<T>(&self, expression: &str, result: LookupResult<T>) -> FlowExprResult<T> {
        result.map_err(|error| {
            log::debug!("lookup failed while resolving `{}`: {}", expression, error);
            FlowExprError::from_lookup(expression, error)
        })
    }
}

fn receiver_type(context: &ResolutionContext) -> Option<Type> {
    context.receiver().and_then(Receiver::ty).cloned()
}

fn unrecognized(expr: &Expr, context: &ResolutionContext) -> FlowExprError {
    let mut explanation = "is an unrecognized expression".to_string();
    if context.parsing_member() {
        explanation.push_str(" in a context with parsingMember=true");
    }
    FlowExprError::parse_error(expr.to_string(), explanation)
}

/// The call as written without its receiver, e.g. `get(_param_1)`.
fn call_text(name: &str, arguments: &[Expr]) -> String {
    let arguments: Vec<String> = arguments.iter().map(|a| a.to_string()).collect();
    format!("{}({})", name, arguments.join(", "))
}
