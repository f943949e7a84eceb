#![doc = include_str!("../README.md")]

pub mod context;
pub mod core;
pub mod error;
pub mod lookup;
pub mod receiver;
pub mod resolve_expr;
pub mod symbol;
pub mod symbol_table;
pub mod types;

pub use crate::core::{internal_repr_of_variable, parse_receiver};
pub use context::{implicit_receiver, ResolutionContext};
pub use error::{FlowExprError, FlowExprResult};
pub use flowexpr_syntax::parameter_indices;
pub use lookup::{LookupError, LookupResult, SymbolResolver, TypeOracle};
pub use receiver::{LiteralValue, Receiver};
pub use resolve_expr::ExpressionResolver;
pub use symbol::{
    ClassSymbol, ExecutableKind, FieldSymbol, MethodSymbol, PackageSymbol, VariableElement,
    VariableKind, VariableSymbol,
};
pub use symbol_table::{ClassBuilder, ClassInfo, ScopeId, ScopeKind, SymbolTable};
pub use types::{DeclaredType, PrimitiveType, Type};
