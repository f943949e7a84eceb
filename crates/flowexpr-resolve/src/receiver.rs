use crate::symbol::{FieldSymbol, MethodSymbol, VariableSymbol};
use crate::types::Type;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Null,
    Int(i32),
    Long(i64),
    Double(f64),
    Char(char),
    String(String),
}

/// The resolved meaning of an expression string.
#[derive(Debug, Clone, PartialEq)]
pub enum Receiver {
    ValueLiteral {
        ty: Type,
        value: LiteralValue,
    },
    /// `this`. The type is absent when there is no enclosing receiver.
    ThisReference {
        ty: Option<Type>,
    },
    /// A class used as the receiver of a static member, or a class literal.
    ClassName {
        ty: Type,
    },
    LocalVariable {
        variable: VariableSymbol,
    },
    FieldAccess {
        receiver: Box<Receiver>,
        ty: Type,
        field: FieldSymbol,
    },
    ArrayAccess {
        ty: Type,
        array: Box<Receiver>,
        index: Box<Receiver>,
    },
    MethodCall {
        ty: Type,
        method: MethodSymbol,
        receiver: Box<Receiver>,
        arguments: Vec<Receiver>,
    },
    /// A value with no usable representation, e.g. a freshly constructed object.
    Unknown {
        ty: Type,
    },
}

impl Receiver {
    pub fn this(ty: Type) -> Self {
        Receiver::ThisReference { ty: Some(ty) }
    }

    pub fn class_name(ty: Type) -> Self {
        Receiver::ClassName { ty }
    }

    pub fn local(variable: VariableSymbol) -> Self {
        Receiver::LocalVariable { variable }
    }

    pub fn ty(&self) -> Option<&Type> {
        match self {
            Receiver::ThisReference { ty } => ty.as_ref(),
            Receiver::ValueLiteral { ty, .. }
            | Receiver::ClassName { ty }
            | Receiver::FieldAccess { ty, .. }
            | Receiver::ArrayAccess { ty, .. }
            | Receiver::MethodCall { ty, .. }
            | Receiver::Unknown { ty } => Some(ty),
            Receiver::LocalVariable { variable } => Some(&variable.ty),
        }
    }

    /// Whether an [`Unknown`](Receiver::Unknown) occurs anywhere in this receiver.
    pub fn contains_unknown(&self) -> bool {
        match self {
            Receiver::Unknown { .. } => true,
            Receiver::FieldAccess { receiver, .. } => receiver.contains_unknown(),
            Receiver::ArrayAccess { array, index, .. } => {
                array.contains_unknown() || index.contains_unknown()
            }
            Receiver::MethodCall { receiver, arguments, .. } => {
                receiver.contains_unknown() || arguments.iter().any(Receiver::contains_unknown)
            }
            Receiver::ValueLiteral { .. }
            | Receiver::ThisReference { .. }
            | Receiver::ClassName { .. }
            | Receiver::LocalVariable { .. } => false,
        }
    }

    pub fn is_class_name(&self) -> bool {
        matches!(self, Receiver::ClassName { .. })
    }

    pub fn is_this(&self) -> bool {
        matches!(self, Receiver::ThisReference { .. })
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Receiver::ValueLiteral { .. } => "ValueLiteral",
            Receiver::ThisReference { .. } => "ThisReference",
            Receiver::ClassName { .. } => "ClassName",
            Receiver::LocalVariable { .. } => "LocalVariable",
            Receiver::FieldAccess { .. } => "FieldAccess",
            Receiver::ArrayAccess { .. } => "ArrayAccess",
            Receiver::MethodCall { .. } => "MethodCall",
            Receiver::Unknown { .. } => "Unknown",
        }
    }
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Null => write!(f, "null"),
            LiteralValue::Int(v) => write!(f, "{}", v),
            LiteralValue::Long(v) => write!(f, "{}L", v),
            LiteralValue::Double(v) => write!(f, "{:?}", v),
            LiteralValue::Char(c) => write!(f, "'{}'", c.escape_default()),
            LiteralValue::String(s) => write!(f, "\"{}\"", s.escape_default()),
        }
    }
}

impl fmt::Display for Receiver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Receiver::ValueLiteral { value, .. } => write!(f, "{}", value),
            Receiver::ThisReference { .. } => write!(f, "this"),
            Receiver::ClassName { ty } => write!(f, "{}", ty),
            Receiver::LocalVariable { variable } => write!(f, "{}", variable.name),
            Receiver::FieldAccess { receiver, field, .. } => write!(f, "{}.{}", receiver, field.name),
            Receiver::ArrayAccess { array, index, .. } => write!(f, "{}[{}]", array, index),
            Receiver::MethodCall { method, receiver, arguments, .. } => {
                write!(f, "{}.{}(", receiver, method.name)?;
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", argument)?;
                }
                write!(f, ")")
            }
            Receiver::Unknown { ty } => write!(f, "?{}", ty),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::VariableSymbol;

    fn account() -> Type {
        Type::declared("bank.Account")
    }

    #[test]
    fn test_receiver_types() {
        assert_eq!(Receiver::ThisReference { ty: None }.ty(), None);
        assert_eq!(Receiver::this(account()).ty(), Some(&account()));
        let local = Receiver::local(VariableSymbol::parameter("amount", Type::int(), 0));
        assert_eq!(local.ty(), Some(&Type::int()));
    }

    #[test]
    fn test_contains_unknown() {
        let unknown = Receiver::Unknown { ty: account() };
        let access = Receiver::FieldAccess {
            receiver: Box::new(unknown.clone()),
            ty: Type::int(),
            field: FieldSymbol::new("balance", Type::int(), account(), false),
        };
        assert!(access.contains_unknown());
        assert!(!Receiver::this(account()).contains_unknown());

        let call = Receiver::MethodCall {
            ty: Type::int(),
            method: MethodSymbol::new("id", account(), vec![], Type::int(), true),
            receiver: Box::new(Receiver::class_name(account())),
            arguments: vec![unknown],
        };
        assert!(call.contains_unknown());
    }

    #[test]
    fn test_display() {
        let array = Receiver::local(VariableSymbol::parameter(
            "values",
            Type::array_of(Type::int()),
            1,
        ));
        let index = Receiver::ValueLiteral { ty: Type::int(), value: LiteralValue::Int(0) };
        let access = Receiver::ArrayAccess {
            ty: Type::int(),
            array: Box::new(array),
            index: Box::new(index),
        };
        expect_test::expect!["values[0]"].assert_eq(&access.to_string());

        let text = Receiver::ValueLiteral {
            ty: Type::string(),
            value: LiteralValue::String("a\"b".to_string()),
        };
        expect_test::expect![[r#""a\"b""#]].assert_eq(&text.to_string());
    }
}
