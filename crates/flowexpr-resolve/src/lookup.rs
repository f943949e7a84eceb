//! The name-lookup services the resolver depends on.
//!
//! Expression resolution only decides *which* kind of lookup to make and in
//! which order. Visibility, inheritance and overload selection belong to
//! the implementor of [`SymbolResolver`]. [`SymbolTable`](crate::SymbolTable)
//! is an in-memory implementation.

use crate::symbol::{ClassSymbol, FieldSymbol, MethodSymbol, PackageSymbol, VariableElement, VariableSymbol};
use crate::types::{DeclaredType, Type};
use thiserror::Error;

/// A lookup that failed for a reason other than "not found".
///
/// A failure with a message is reported to the user against the expression
/// being resolved. A failure without one is treated as a bug in the lookup
/// service and surfaces as a fatal error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{}", .message.as_deref().unwrap_or("lookup failed"))]
pub struct LookupError {
    pub message: Option<String>,
}

impl LookupError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: Some(message.into()) }
    }

    pub fn without_message() -> Self {
        Self { message: None }
    }
}

pub type LookupResult<T> = Result<T, LookupError>;

/// Structural queries over types.
pub trait TypeOracle {
    fn direct_supertypes(&self, ty: &Type) -> Vec<Type>;

    fn is_interface(&self, ty: &DeclaredType) -> bool;

    /// The innermost class lexically enclosing the class of `ty`, or
    /// [`Type::NoType`] for a top-level class.
    fn enclosing_class(&self, ty: &DeclaredType) -> Type;

    /// The static `valueOf` factory of a boxed primitive class.
    fn value_of_method(&self, boxed: &Type) -> Option<MethodSymbol> {
        let primitive = boxed.unboxed()?;
        Some(MethodSymbol::new(
            "valueOf",
            boxed.clone(),
            vec![VariableSymbol::parameter("value", Type::Primitive(primitive), 0)],
            boxed.clone(),
            true,
        ))
    }

    /// The return type of `method` as seen from a receiver of type `receiver`.
    fn substitute_return_type(&self, method: &MethodSymbol, _receiver: &Type) -> Type {
        method.return_type.clone()
    }
}

/// Name lookup relative to a lexical scope.
///
/// Every lookup answers `Ok(None)` when nothing matches.
pub trait SymbolResolver: TypeOracle {
    type Scope: ?Sized;

    fn find_local_variable_or_parameter_or_field(
        &self,
        name: &str,
        scope: &Self::Scope,
    ) -> LookupResult<Option<VariableElement>>;

    fn find_field(&self, name: &str, ty: &Type, scope: &Self::Scope) -> LookupResult<Option<FieldSymbol>>;

    fn find_class(&self, name: &str, scope: &Self::Scope) -> LookupResult<Option<ClassSymbol>>;

    fn find_method(
        &self,
        name: &str,
        ty: &Type,
        scope: &Self::Scope,
        argument_types: &[Type],
    ) -> LookupResult<Option<MethodSymbol>>;

    fn find_package(&self, name: &str, scope: &Self::Scope) -> LookupResult<Option<PackageSymbol>>;

    fn find_class_in_package(
        &self,
        name: &str,
        package: &PackageSymbol,
        scope: &Self::Scope,
    ) -> LookupResult<Option<ClassSymbol>>;

    /// Parameter names of the innermost method enclosing `scope`, in declaration order.
    fn enclosing_method_parameters(&self, scope: &Self::Scope) -> Option<Vec<String>>;

    /// The class declaring the innermost method enclosing `scope`.
    fn enclosing_method_owner(&self, _scope: &Self::Scope) -> Option<Type> {
        None
    }
}
