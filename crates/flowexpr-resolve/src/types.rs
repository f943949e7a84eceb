use fxhash::FxHashMap;
use std::fmt;

pub const OBJECT: &str = "java.lang.Object";
pub const STRING: &str = "java.lang.String";

/// The eight primitive types of the host language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveType {
    pub const ALL: [PrimitiveType; 8] = [
        PrimitiveType::Boolean,
        PrimitiveType::Byte,
        PrimitiveType::Short,
        PrimitiveType::Char,
        PrimitiveType::Int,
        PrimitiveType::Long,
        PrimitiveType::Float,
        PrimitiveType::Double,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Short => "short",
            PrimitiveType::Char => "char",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.name() == name)
    }

    /// Qualified name of the class that boxes this primitive.
    pub fn boxed_class_name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "java.lang.Boolean",
            PrimitiveType::Byte => "java.lang.Byte",
            PrimitiveType::Short => "java.lang.Short",
            PrimitiveType::Char => "java.lang.Character",
            PrimitiveType::Int => "java.lang.Integer",
            PrimitiveType::Long => "java.lang.Long",
            PrimitiveType::Float => "java.lang.Float",
            PrimitiveType::Double => "java.lang.Double",
        }
    }

    pub fn from_boxed_class_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.boxed_class_name() == name)
    }

    /// Identity or widening primitive conversion from `self` to `target`.
    pub fn widens_to(self, target: PrimitiveType) -> bool {
        use PrimitiveType::*;
        if self == target {
            return true;
        }
        match self {
            Byte => matches!(target, Short | Int | Long | Float | Double),
            Short | Char => matches!(target, Int | Long | Float | Double),
            Int => matches!(target, Long | Float | Double),
            Long => matches!(target, Float | Double),
            Float => matches!(target, Double),
            Boolean | Double => false,
        }
    }
}

/// A class or interface type, possibly parameterized.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeclaredType {
    /// Fully qualified name, with `.` between a member class and its enclosing class.
    pub name: String,
    pub type_args: Vec<Type>,
}

impl DeclaredType {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), type_args: Vec::new() }
    }

    pub fn with_args(name: impl Into<String>, type_args: Vec<Type>) -> Self {
        Self { name: name.into(), type_args }
    }

    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Primitive(PrimitiveType),
    Declared(DeclaredType),
    Array(Box<Type>),
    TypeVar(String),
    /// The type of the `null` literal.
    Null,
    Void,
    /// Absence of a type, e.g. past the outermost class of an enclosing-class chain.
    NoType,
}

impl Type {
    pub fn declared(name: impl Into<String>) -> Self {
        Type::Declared(DeclaredType::new(name))
    }

    pub fn array_of(component: Type) -> Self {
        Type::Array(Box::new(component))
    }

    pub fn int() -> Self {
        Type::Primitive(PrimitiveType::Int)
    }

    pub fn string() -> Self {
        Type::declared(STRING)
    }

    pub fn object() -> Self {
        Type::declared(OBJECT)
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Type::Array(_))
    }

    pub fn is_declared(&self) -> bool {
        matches!(self, Type::Declared(_))
    }

    pub fn component_type(&self) -> Option<&Type> {
        match self {
            Type::Array(component) => Some(component),
            _ => None,
        }
    }

    pub fn as_declared(&self) -> Option<&DeclaredType> {
        match self {
            Type::Declared(declared) => Some(declared),
            _ => None,
        }
    }

    pub fn as_primitive(&self) -> Option<PrimitiveType> {
        match self {
            Type::Primitive(p) => Some(*p),
            _ => None,
        }
    }

    /// The primitive this type boxes, if it is one of the boxed primitive classes.
    pub fn unboxed(&self) -> Option<PrimitiveType> {
        self.as_declared()
            .and_then(|declared| PrimitiveType::from_boxed_class_name(&declared.name))
    }

    pub fn is_boxed_primitive(&self) -> bool {
        self.unboxed().is_some()
    }

    /// The boxed class type for a primitive type.
    pub fn boxed(&self) -> Option<Type> {
        self.as_primitive().map(|p| Type::declared(p.boxed_class_name()))
    }

    /// Drops type arguments everywhere, leaving raw class names.
    pub fn erasure(&self) -> Type {
        match self {
            Type::Declared(declared) => Type::declared(declared.name.clone()),
            Type::Array(component) => Type::array_of(component.erasure()),
            Type::TypeVar(_) => Type::object(),
            other => other.clone(),
        }
    }

    /// Replaces type variables bound in `bindings`. Unbound variables stay as they are.
    pub fn substitute(&self, bindings: &FxHashMap<String, Type>) -> Type {
        match self {
            Type::TypeVar(name) => bindings.get(name).cloned().unwrap_or_else(|| self.clone()),
            Type::Declared(declared) => Type::Declared(DeclaredType {
                name: declared.name.clone(),
                type_args: declared.type_args.iter().map(|arg| arg.substitute(bindings)).collect(),
            }),
            Type::Array(component) => Type::array_of(component.substitute(bindings)),
            other => other.clone(),
        }
    }

    /// Parses a type written in host-language syntax: `int`, `java.lang.String`,
    /// `int[][]`, `java.util.Map<K, java.lang.String>`. Names listed in
    /// `type_params` become type variables. Other names are taken as
    /// already-qualified class names.
    pub fn parse(text: &str, type_params: &[String]) -> Option<Type> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        if let Some(component) = text.strip_suffix("[]") {
            return Type::parse(component, type_params).map(Type::array_of);
        }
        if let Some(open) = text.find('<') {
            let inner = text.strip_suffix('>')?.get(open + 1..)?;
            let name = text[..open].trim();
            if !is_qualified_name(name) {
                return None;
            }
            let type_args = split_type_args(inner)?
                .into_iter()
                .map(|arg| Type::parse(arg, type_params))
                .collect::<Option<Vec<_>>>()?;
            return Some(Type::Declared(DeclaredType::with_args(name, type_args)));
        }
        if !is_qualified_name(text) {
            return None;
        }
        if let Some(p) = PrimitiveType::from_name(text) {
            return Some(Type::Primitive(p));
        }
        if text == "void" {
            return Some(Type::Void);
        }
        if type_params.iter().any(|param| param == text) {
            return Some(Type::TypeVar(text.to_string()));
        }
        Some(Type::declared(text))
    }
}

fn is_qualified_name(text: &str) -> bool {
    text.split('.').all(|segment| {
        let mut chars = segment.chars();
        matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_' || c == '$')
            && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
    })
}

/// Splits `A, B<C, D>, E` at top-level commas.
fn split_type_args(text: &str) -> Option<Vec<&str>> {
    let mut args = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.checked_sub(1)?,
            ',' if depth == 0 => {
                args.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return None;
    }
    args.push(&text[start..]);
    Some(args)
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.type_args.is_empty() {
            let args: Vec<String> = self.type_args.iter().map(|arg| arg.to_string()).collect();
            write!(f, "<{}>", args.join(", "))?;
        }
        Ok(())
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Primitive(p) => write!(f, "{}", p),
            Type::Declared(declared) => write!(f, "{}", declared),
            Type::Array(component) => write!(f, "{}[]", component),
            Type::TypeVar(name) => write!(f, "{}", name),
            Type::Null => write!(f, "null"),
            Type::Void => write!(f, "void"),
            Type::NoType => write!(f, "none"),
        }
    }
}
