//! Declaration symbols handed out by a [`SymbolResolver`](crate::SymbolResolver).

use crate::types::{DeclaredType, PrimitiveType, Type};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableKind {
    Local,
    Parameter,
    ExceptionParameter,
    Resource,
}

/// A local variable or formal parameter.
///
/// `id` tells apart two declarations that share a name, e.g. a local in
/// one block and a parameter of a lambda nested elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VariableSymbol {
    pub name: String,
    pub ty: Type,
    pub kind: VariableKind,
    pub id: usize,
}

impl VariableSymbol {
    pub fn new(name: impl Into<String>, ty: Type, kind: VariableKind, id: usize) -> Self {
        Self { name: name.into(), ty, kind, id }
    }

    pub fn parameter(name: impl Into<String>, ty: Type, id: usize) -> Self {
        Self::new(name, ty, VariableKind::Parameter, id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldSymbol {
    pub name: String,
    pub ty: Type,
    /// The declaring class, or the array type for `length`.
    pub owner: Type,
    pub is_static: bool,
    pub is_final: bool,
}

impl FieldSymbol {
    pub fn new(name: impl Into<String>, ty: Type, owner: Type, is_static: bool) -> Self {
        Self { name: name.into(), ty, owner, is_static, is_final: false }
    }

    /// The `length` pseudo-field every array type carries.
    pub fn array_length(array_type: &Type) -> Self {
        Self {
            name: "length".to_string(),
            ty: Type::Primitive(PrimitiveType::Int),
            owner: array_type.clone(),
            is_static: false,
            is_final: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecutableKind {
    Method,
    Constructor,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodSymbol {
    pub name: String,
    pub owner: Type,
    pub parameters: Vec<VariableSymbol>,
    pub return_type: Type,
    pub is_static: bool,
    pub is_varargs: bool,
    pub kind: ExecutableKind,
}

impl MethodSymbol {
    pub fn new(
        name: impl Into<String>,
        owner: Type,
        parameters: Vec<VariableSymbol>,
        return_type: Type,
        is_static: bool,
    ) -> Self {
        Self {
            name: name.into(),
            owner,
            parameters,
            return_type,
            is_static,
            is_varargs: false,
            kind: ExecutableKind::Method,
        }
    }

    pub fn parameter_types(&self) -> Vec<Type> {
        self.parameters.iter().map(|p| p.ty.clone()).collect()
    }

    pub fn is_method(&self) -> bool {
        self.kind == ExecutableKind::Method
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassSymbol {
    pub qualified_name: String,
    pub simple_name: String,
    /// The generic self type, e.g. `java.util.List<E>`.
    pub ty: DeclaredType,
    pub is_interface: bool,
}

impl ClassSymbol {
    pub fn new(qualified_name: impl Into<String>, type_params: &[String], is_interface: bool) -> Self {
        let qualified_name = qualified_name.into();
        let ty = DeclaredType::with_args(
            qualified_name.clone(),
            type_params.iter().map(|p| Type::TypeVar(p.clone())).collect(),
        );
        let simple_name = ty.simple_name().to_string();
        Self { qualified_name, simple_name, ty, is_interface }
    }

    pub fn as_type(&self) -> Type {
        Type::Declared(self.ty.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageSymbol {
    pub name: String,
}

/// What a bare identifier can name in a lexical scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariableElement {
    Variable(VariableSymbol),
    Field(FieldSymbol),
}

impl VariableElement {
    pub fn name(&self) -> &str {
        match self {
            VariableElement::Variable(v) => &v.name,
            VariableElement::Field(f) => &f.name,
        }
    }

    pub fn ty(&self) -> &Type {
        match self {
            VariableElement::Variable(v) => &v.ty,
            VariableElement::Field(f) => &f.ty,
        }
    }
}
