//! An in-memory program model implementing [`SymbolResolver`].
//!
//! Classes are registered through [`ClassBuilder`]; lexical structure is a
//! tree of scopes (class, method, block) addressed by [`ScopeId`]. The
//! lookups follow the host language's rules closely enough for annotation
//! expressions: inherited members, member classes, same-package and
//! imported classes, and three-phase overload selection.

use crate::lookup::{LookupError, LookupResult, SymbolResolver, TypeOracle};
use crate::symbol::{
    ClassSymbol, ExecutableKind, FieldSymbol, MethodSymbol, PackageSymbol, VariableElement,
    VariableKind, VariableSymbol,
};
use crate::types::{DeclaredType, PrimitiveType, Type, OBJECT, STRING};
use fxhash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;

/// A unique identifier for a scope in the symbol table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(pub usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeKind {
    /// The outermost scope; sees only top-level classes.
    Root,
    /// The body of a class, by qualified name.
    Class(String),
    Method { name: String, parameters: Vec<String> },
    Block,
}

#[derive(Debug, Clone)]
struct Scope {
    parent: Option<ScopeId>,
    kind: ScopeKind,
    variables: FxHashMap<String, VariableSymbol>,
}

/// Everything the table knows about one class.
#[derive(Debug, Clone)]
pub struct ClassInfo {
    pub symbol: ClassSymbol,
    pub package: String,
    /// Qualified name of the lexically enclosing class, for member classes.
    pub enclosing: Option<String>,
    /// Written in terms of this class's own type parameters.
    pub superclass: Option<Type>,
    pub interfaces: Vec<Type>,
    pub type_params: Vec<String>,
    pub fields: Vec<FieldSymbol>,
    pub methods: Vec<MethodSymbol>,
}

/// The symbol table for expression resolution.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    classes: FxHashMap<String, ClassInfo>,
    packages: FxHashSet<String>,
    imports: Vec<String>,
    scopes: FxHashMap<ScopeId, Scope>,
    root_scope: ScopeId,
    next_scope_id: usize,
    next_variable_id: usize,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    /// A table holding `java.lang.Object`, `java.lang.String` and the boxed primitives.
    pub fn new() -> Self {
        let root_scope = ScopeId(0);
        let mut scopes = FxHashMap::default();
        scopes.insert(
            root_scope,
            Scope {
                parent: None,
                kind: ScopeKind::Root,
                variables: FxHashMap::default(),
            },
        );

        let mut table = SymbolTable {
            classes: FxHashMap::default(),
            packages: FxHashSet::default(),
            imports: Vec::new(),
            scopes,
            root_scope,
            next_scope_id: 1,
            next_variable_id: 0,
        };
        table.add_builtins();
        table
    }

    fn add_builtins(&mut self) {
        let object = Type::object();
        let string = Type::string();
        let boolean = Type::Primitive(PrimitiveType::Boolean);

        self.class("java.lang", "Object")
            .method("toString", &[], string.clone())
            .method("hashCode", &[], Type::int())
            .method("equals", &[("obj", object.clone())], boolean.clone())
            .method("getClass", &[], Type::declared("java.lang.Class"))
            .build();
        self.class("java.lang", "Class").type_params(&["T"]).build();
        self.class("java.lang", "String")
            .method("length", &[], Type::int())
            .method("isEmpty", &[], boolean)
            .method("charAt", &[("index", Type::int())], Type::Primitive(PrimitiveType::Char))
            .build();

        for primitive in PrimitiveType::ALL {
            let boxed = Type::declared(primitive.boxed_class_name());
            let simple = primitive.boxed_class_name().trim_start_matches("java.lang.");
            self.class("java.lang", simple)
                .static_method("valueOf", &[("value", Type::Primitive(primitive))], boxed)
                .method(&format!("{}Value", primitive.name()), &[], Type::Primitive(primitive))
                .build();
        }
    }

    pub fn root_scope(&self) -> ScopeId {
        self.root_scope
    }

    /// Starts a top-level class `package.simple_name`. Nothing is
    /// registered until [`ClassBuilder::build`].
    pub fn class(&mut self, package: &str, simple_name: &str) -> ClassBuilder<'_> {
        let qualified = if package.is_empty() {
            simple_name.to_string()
        } else {
            format!("{}.{}", package, simple_name)
        };
        ClassBuilder::new(self, qualified, package.to_string(), None)
    }

    /// Starts a member class of `enclosing`.
    pub fn member_class(&mut self, enclosing: &str, simple_name: &str) -> ClassBuilder<'_> {
        let package = self
            .classes
            .get(enclosing)
            .map(|info| info.package.clone())
            .unwrap_or_default();
        let qualified = format!("{}.{}", enclosing, simple_name);
        ClassBuilder::new(self, qualified, package, Some(enclosing.to_string()))
    }

    /// Adds a single-type import, e.g. `java.util.List`.
    pub fn import(&mut self, qualified_name: &str) {
        self.imports.push(qualified_name.to_string());
    }

    pub fn class_info(&self, qualified_name: &str) -> Option<&ClassInfo> {
        self.classes.get(qualified_name)
    }

    /// The first method named `name` declared directly in `class`.
    pub fn declared_method(&self, class: &str, name: &str) -> Option<&MethodSymbol> {
        self.classes.get(class)?.methods.iter().find(|m| m.name == name)
    }

    pub fn declared_field(&self, class: &str, name: &str) -> Option<&FieldSymbol> {
        self.classes.get(class)?.fields.iter().find(|f| f.name == name)
    }

    fn push_scope(&mut self, parent: ScopeId, kind: ScopeKind) -> ScopeId {
        let id = ScopeId(self.next_scope_id);
        self.next_scope_id += 1;
        self.scopes.insert(
            id,
            Scope {
                parent: Some(parent),
                kind,
                variables: FxHashMap::default(),
            },
        );
        id
    }

    pub fn push_class_scope(&mut self, parent: ScopeId, class: &str) -> ScopeId {
        self.push_scope(parent, ScopeKind::Class(class.to_string()))
    }

    /// A method body scope with the method's parameters declared in it.
    pub fn push_method_scope(&mut self, parent: ScopeId, method: &MethodSymbol) -> ScopeId {
        let kind = ScopeKind::Method {
            name: method.name.clone(),
            parameters: method.parameters.iter().map(|p| p.name.clone()).collect(),
        };
        let id = self.push_scope(parent, kind);
        for parameter in &method.parameters {
            self.declare_variable(id, parameter.clone());
        }
        id
    }

    pub fn push_block_scope(&mut self, parent: ScopeId) -> ScopeId {
        self.push_scope(parent, ScopeKind::Block)
    }

    pub fn scope_kind(&self, scope: ScopeId) -> Option<&ScopeKind> {
        self.scopes.get(&scope).map(|s| &s.kind)
    }

    /// Declares a local variable with a fresh identity.
    pub fn declare_local(&mut self, scope: ScopeId, name: &str, ty: Type) -> VariableSymbol {
        let variable = VariableSymbol::new(name, ty, VariableKind::Local, self.fresh_variable_id());
        self.declare_variable(scope, variable.clone());
        variable
    }

    pub fn declare_variable(&mut self, scope: ScopeId, variable: VariableSymbol) {
        if let Some(scope) = self.scopes.get_mut(&scope) {
            scope.variables.insert(variable.name.clone(), variable);
        }
    }

    fn fresh_variable_id(&mut self) -> usize {
        self.next_variable_id += 1;
        self.next_variable_id
    }

    /// Iterates from `scope` outwards to the root.
    fn scope_chain(&self, scope: ScopeId) -> impl Iterator<Item = &Scope> + '_ {
        let mut current = self.scopes.get(&scope);
        std::iter::from_fn(move || {
            let scope = current?;
            current = scope.parent.and_then(|parent| self.scopes.get(&parent));
            Some(scope)
        })
    }

    fn register_package(&mut self, package: &str) {
        let mut prefix = String::new();
        for segment in package.split('.').filter(|s| !s.is_empty()) {
            if !prefix.is_empty() {
                prefix.push('.');
            }
            prefix.push_str(segment);
            self.packages.insert(prefix.clone());
        }
    }

    //--------------------------------------------------------------------------
    // Type hierarchy
    //--------------------------------------------------------------------------

    fn bindings(&self, declared: &DeclaredType) -> FxHashMap<String, Type> {
        let mut bindings = FxHashMap::default();
        if let Some(info) = self.classes.get(&declared.name) {
            if info.type_params.len() == declared.type_args.len() {
                for (param, arg) in info.type_params.iter().zip(&declared.type_args) {
                    bindings.insert(param.clone(), arg.clone());
                }
            }
        }
        bindings
    }

    fn declared_supertypes(&self, declared: &DeclaredType) -> Vec<DeclaredType> {
        let info = match self.classes.get(&declared.name) {
            Some(info) => info,
            None if declared.name != OBJECT => return vec![DeclaredType::new(OBJECT)],
            None => return Vec::new(),
        };
        let bindings = self.bindings(declared);
        let mut supertypes = Vec::new();
        match &info.superclass {
            Some(superclass) => supertypes.extend(superclass.substitute(&bindings).as_declared().cloned()),
            None if declared.name != OBJECT && !info.symbol.is_interface => {
                supertypes.push(DeclaredType::new(OBJECT))
            }
            None => {}
        }
        for interface in &info.interfaces {
            supertypes.extend(interface.substitute(&bindings).as_declared().cloned());
        }
        supertypes
    }

    /// `declared` followed by all of its supertypes, breadth first, each
    /// with type arguments substituted along the way. Always ends up
    /// including `java.lang.Object`.
    fn hierarchy(&self, declared: &DeclaredType) -> Vec<DeclaredType> {
        let mut seen = FxHashSet::default();
        let mut order = Vec::new();
        let mut queue = VecDeque::from([declared.clone()]);
        while let Some(next) = queue.pop_front() {
            if !seen.insert(next.name.clone()) {
                continue;
            }
            queue.extend(self.declared_supertypes(&next));
            order.push(next);
        }
        if !seen.contains(OBJECT) {
            order.push(DeclaredType::new(OBJECT));
        }
        order
    }

    /// Subtyping with generics compared by erasure.
    pub fn is_subtype(&self, sub: &Type, sup: &Type) -> bool {
        if sub == sup {
            return true;
        }
        match (sub, sup) {
            (Type::Primitive(a), Type::Primitive(b)) => a.widens_to(*b),
            (Type::Primitive(_), _) | (_, Type::Primitive(_)) => false,
            (Type::Null, _) => true,
            (_, Type::TypeVar(_)) => true,
            (_, Type::Declared(d)) if d.name == OBJECT => true,
            (Type::Declared(s), Type::Declared(t)) => self.hierarchy(s).iter().any(|h| h.name == t.name),
            (Type::Array(a), Type::Array(b)) => match (a.as_ref(), b.as_ref()) {
                (Type::Primitive(_), _) | (_, Type::Primitive(_)) => a == b,
                _ => self.is_subtype(a, b),
            },
            (Type::Array(_), Type::Declared(d)) => {
                d.name == "java.lang.Cloneable" || d.name == "java.io.Serializable"
            }
            _ => false,
        }
    }

    /// Assignment allowing boxing and unboxing.
    fn is_loosely_assignable(&self, actual: &Type, formal: &Type) -> bool {
        if self.is_subtype(actual, formal) {
            return true;
        }
        if let Some(boxed) = actual.boxed() {
            return self.is_subtype(&boxed, formal);
        }
        match (actual.unboxed(), formal.as_primitive()) {
            (Some(unboxed), Some(target)) => unboxed.widens_to(target),
            _ => false,
        }
    }

    //--------------------------------------------------------------------------
    // Member lookup
    //--------------------------------------------------------------------------

    fn field_in_hierarchy(&self, declared: &DeclaredType, name: &str) -> Option<FieldSymbol> {
        for ty in self.hierarchy(declared) {
            let info = match self.classes.get(&ty.name) {
                Some(info) => info,
                None => continue,
            };
            if let Some(field) = info.fields.iter().find(|f| f.name == name) {
                let bindings = self.bindings(&ty);
                let mut field = field.clone();
                field.ty = field.ty.substitute(&bindings);
                return Some(field);
            }
        }
        None
    }

    /// Candidate methods named `name` visible on `ty`, paired with their
    /// parameter types as seen from `ty`. Overridden methods are dropped.
    fn method_candidates(&self, ty: &Type, name: &str) -> Vec<(MethodSymbol, Vec<Type>)> {
        let mut candidates: Vec<(MethodSymbol, Vec<Type>)> = Vec::new();

        let declared = match ty {
            Type::Declared(declared) => declared.clone(),
            Type::Array(_) => {
                if name == "clone" {
                    candidates.push((
                        MethodSymbol::new("clone", ty.clone(), Vec::new(), ty.clone(), false),
                        Vec::new(),
                    ));
                }
                DeclaredType::new(OBJECT)
            }
            Type::TypeVar(_) => DeclaredType::new(OBJECT),
            _ => return candidates,
        };

        for owner in self.hierarchy(&declared) {
            let info = match self.classes.get(&owner.name) {
                Some(info) => info,
                None => continue,
            };
            let bindings = self.bindings(&owner);
            for method in info.methods.iter().filter(|m| m.name == name && m.is_method()) {
                let parameter_types: Vec<Type> =
                    method.parameters.iter().map(|p| p.ty.substitute(&bindings)).collect();
                let erased: Vec<Type> = parameter_types.iter().map(Type::erasure).collect();
                let overridden = candidates
                    .iter()
                    .any(|(_, types)| types.iter().map(Type::erasure).collect::<Vec<_>>() == erased);
                if !overridden {
                    candidates.push((method.clone(), parameter_types));
                }
            }
        }
        candidates
    }

    fn applicable(&self, formals: &[Type], is_varargs: bool, actuals: &[Type], phase: Phase) -> bool {
        match phase {
            Phase::Strict => {
                formals.len() == actuals.len()
                    && actuals.iter().zip(formals).all(|(a, f)| self.is_subtype(a, f))
            }
            Phase::Loose => {
                formals.len() == actuals.len()
                    && actuals.iter().zip(formals).all(|(a, f)| self.is_loosely_assignable(a, f))
            }
            Phase::Varargs => {
                let (last, fixed) = match formals.split_last() {
                    Some(split) if is_varargs => split,
                    _ => return false,
                };
                let component = match last.component_type() {
                    Some(component) => component,
                    None => return false,
                };
                actuals.len() >= fixed.len()
                    && actuals.iter().zip(fixed).all(|(a, f)| self.is_loosely_assignable(a, f))
                    && actuals[fixed.len()..]
                        .iter()
                        .all(|a| self.is_loosely_assignable(a, component))
            }
        }
    }

    fn more_specific(&self, a: &[Type], b: &[Type]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| self.is_subtype(x, y))
    }

    fn select_method(&self, ty: &Type, name: &str, actuals: &[Type]) -> LookupResult<Option<MethodSymbol>> {
        let candidates = self.method_candidates(ty, name);
        for phase in [Phase::Strict, Phase::Loose, Phase::Varargs] {
            let applicable: Vec<&(MethodSymbol, Vec<Type>)> = candidates
                .iter()
                .filter(|(method, formals)| self.applicable(formals, method.is_varargs, actuals, phase))
                .collect();
            if applicable.is_empty() {
                continue;
            }
            let most_specific: Vec<&&(MethodSymbol, Vec<Type>)> = applicable
                .iter()
                .filter(|(_, formals)| {
                    applicable.iter().all(|(_, other)| self.more_specific(formals, other))
                })
                .collect();
            return match most_specific.as_slice() {
                [(method, _)] => {
                    log::trace!("selected {}.{} in {:?} phase", method.owner, method.name, phase);
                    Ok(Some(method.clone()))
                }
                _ => Err(LookupError::new(format!(
                    "reference to {} is ambiguous: {} candidates apply",
                    name,
                    applicable.len()
                ))),
            };
        }
        Ok(None)
    }

    //--------------------------------------------------------------------------
    // Class lookup
    //--------------------------------------------------------------------------

    fn member_class_in_hierarchy(&self, class: &str, name: &str) -> Option<&ClassInfo> {
        let declared = self.classes.get(class)?.symbol.ty.clone();
        self.hierarchy(&declared)
            .iter()
            .find_map(|ty| self.classes.get(&format!("{}.{}", ty.name, name)))
    }

    fn scope_package(&self, scope: ScopeId) -> Option<&str> {
        self.scope_chain(scope)
            .filter_map(|s| match &s.kind {
                ScopeKind::Class(class) => self.classes.get(class),
                _ => None,
            })
            .last()
            .map(|info| info.package.as_str())
    }

    fn lookup_class(&self, name: &str, scope: ScopeId) -> Option<&ClassInfo> {
        if name.contains('.') {
            return self.classes.get(name);
        }

        for s in self.scope_chain(scope) {
            if let ScopeKind::Class(class) = &s.kind {
                if let Some(info) = self.member_class_in_hierarchy(class, name) {
                    return Some(info);
                }
                if let Some(info) = self.classes.get(class).filter(|info| info.symbol.simple_name == name) {
                    return Some(info);
                }
            }
        }

        let package = self.scope_package(scope).unwrap_or("");
        let same_package = if package.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", package, name)
        };
        if let Some(info) = self.classes.get(&same_package) {
            return Some(info);
        }

        let imported = self
            .imports
            .iter()
            .filter(|import| import.rsplit('.').next() == Some(name))
            .find_map(|import| self.classes.get(import));
        if imported.is_some() {
            return imported;
        }

        self.classes
            .get(&format!("java.lang.{}", name))
            .or_else(|| self.classes.get(name))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Strict,
    Loose,
    Varargs,
}

impl TypeOracle for SymbolTable {
    fn direct_supertypes(&self, ty: &Type) -> Vec<Type> {
        match ty {
            Type::Declared(declared) => self
                .declared_supertypes(declared)
                .into_iter()
                .map(Type::Declared)
                .collect(),
            Type::Array(_) => vec![Type::object()],
            _ => Vec::new(),
        }
    }

    fn is_interface(&self, ty: &DeclaredType) -> bool {
        self.classes.get(&ty.name).map_or(false, |info| info.symbol.is_interface)
    }

    fn enclosing_class(&self, ty: &DeclaredType) -> Type {
        self.classes
            .get(&ty.name)
            .and_then(|info| info.enclosing.as_ref())
            .and_then(|enclosing| self.classes.get(enclosing))
            .map_or(Type::NoType, |info| info.symbol.as_type())
    }

    fn value_of_method(&self, boxed: &Type) -> Option<MethodSymbol> {
        let primitive = Type::Primitive(boxed.unboxed()?);
        self.classes
            .get(&boxed.as_declared()?.name)?
            .methods
            .iter()
            .find(|m| m.name == "valueOf" && m.is_static && m.parameter_types() == [primitive.clone()])
            .cloned()
    }

    fn substitute_return_type(&self, method: &MethodSymbol, receiver: &Type) -> Type {
        let (receiver, owner) = match (receiver, &method.owner) {
            (Type::Declared(receiver), Type::Declared(owner)) => (receiver, owner),
            _ => return method.return_type.clone(),
        };
        self.hierarchy(receiver)
            .iter()
            .find(|ty| ty.name == owner.name)
            .map(|ty| method.return_type.substitute(&self.bindings(ty)))
            .unwrap_or_else(|| method.return_type.clone())
    }
}

impl SymbolResolver for SymbolTable {
    type Scope = ScopeId;

    fn find_local_variable_or_parameter_or_field(
        &self,
        name: &str,
        scope: &ScopeId,
    ) -> LookupResult<Option<VariableElement>> {
        for s in self.scope_chain(*scope) {
            if let Some(variable) = s.variables.get(name) {
                return Ok(Some(VariableElement::Variable(variable.clone())));
            }
            if let ScopeKind::Class(class) = &s.kind {
                let field = self
                    .classes
                    .get(class)
                    .and_then(|info| self.field_in_hierarchy(&info.symbol.ty, name));
                if let Some(field) = field {
                    return Ok(Some(VariableElement::Field(field)));
                }
            }
        }
        Ok(None)
    }

    fn find_field(&self, name: &str, ty: &Type, _scope: &ScopeId) -> LookupResult<Option<FieldSymbol>> {
        Ok(match ty {
            Type::Array(_) if name == "length" => Some(FieldSymbol::array_length(ty)),
            Type::Declared(declared) => self.field_in_hierarchy(declared, name),
            _ => None,
        })
    }

    fn find_class(&self, name: &str, scope: &ScopeId) -> LookupResult<Option<ClassSymbol>> {
        Ok(self.lookup_class(name, *scope).map(|info| info.symbol.clone()))
    }

    fn find_method(
        &self,
        name: &str,
        ty: &Type,
        _scope: &ScopeId,
        argument_types: &[Type],
    ) -> LookupResult<Option<MethodSymbol>> {
        self.select_method(ty, name, argument_types)
    }

    fn find_package(&self, name: &str, _scope: &ScopeId) -> LookupResult<Option<PackageSymbol>> {
        Ok(self
            .packages
            .get(name)
            .map(|name| PackageSymbol { name: name.clone() }))
    }

    fn find_class_in_package(
        &self,
        name: &str,
        package: &PackageSymbol,
        _scope: &ScopeId,
    ) -> LookupResult<Option<ClassSymbol>> {
        Ok(self
            .classes
            .get(&format!("{}.{}", package.name, name))
            .filter(|info| info.enclosing.is_none())
            .map(|info| info.symbol.clone()))
    }

    fn enclosing_method_parameters(&self, scope: &ScopeId) -> Option<Vec<String>> {
        self.scope_chain(*scope).find_map(|s| match &s.kind {
            ScopeKind::Method { parameters, .. } => Some(parameters.clone()),
            _ => None,
        })
    }

    fn enclosing_method_owner(&self, scope: &ScopeId) -> Option<Type> {
        self.scope_chain(*scope)
            .skip_while(|s| !matches!(s.kind, ScopeKind::Method { .. }))
            .find_map(|s| match &s.kind {
                ScopeKind::Class(class) => self.classes.get(class).map(|info| info.symbol.as_type()),
                _ => None,
            })
    }
}

/// Accumulates one class declaration before it enters the table.
#[must_use = "a class is only registered by `build`"]
pub struct ClassBuilder<'a> {
    table: &'a mut SymbolTable,
    info: ClassInfo,
}

impl<'a> ClassBuilder<'a> {
    fn new(table: &'a mut SymbolTable, qualified: String, package: String, enclosing: Option<String>) -> Self {
        let info = ClassInfo {
            symbol: ClassSymbol::new(qualified, &[], false),
            package,
            enclosing,
            superclass: None,
            interfaces: Vec::new(),
            type_params: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
        };
        Self { table, info }
    }

    fn self_type(&self) -> Type {
        self.info.symbol.as_type()
    }

    pub fn type_params(mut self, params: &[&str]) -> Self {
        let params: Vec<String> = params.iter().map(|p| p.to_string()).collect();
        self.info.symbol = ClassSymbol::new(
            self.info.symbol.qualified_name.clone(),
            &params,
            self.info.symbol.is_interface,
        );
        self.info.type_params = params;
        self
    }

    pub fn interface(mut self) -> Self {
        self.info.symbol.is_interface = true;
        self
    }

    pub fn extends(mut self, superclass: Type) -> Self {
        self.info.superclass = Some(superclass);
        self
    }

    pub fn implements(mut self, interface: Type) -> Self {
        self.info.interfaces.push(interface);
        self
    }

    pub fn field(self, name: &str, ty: Type) -> Self {
        self.add_field(name, ty, false, false)
    }

    pub fn static_field(self, name: &str, ty: Type) -> Self {
        self.add_field(name, ty, true, false)
    }

    pub fn add_field(mut self, name: &str, ty: Type, is_static: bool, is_final: bool) -> Self {
        let mut field = FieldSymbol::new(name, ty, self.self_type(), is_static);
        field.is_final = is_final;
        self.info.fields.push(field);
        self
    }

    pub fn method(self, name: &str, params: &[(&str, Type)], return_type: Type) -> Self {
        self.add_method(name, params, return_type, false, false)
    }

    pub fn static_method(self, name: &str, params: &[(&str, Type)], return_type: Type) -> Self {
        self.add_method(name, params, return_type, true, false)
    }

    /// Adds a method. For a varargs method the last parameter must be an array type.
    pub fn add_method(
        mut self,
        name: &str,
        params: &[(&str, Type)],
        return_type: Type,
        is_static: bool,
        is_varargs: bool,
    ) -> Self {
        let parameters = self.parameters(params);
        let mut method = MethodSymbol::new(name, self.self_type(), parameters, return_type, is_static);
        method.is_varargs = is_varargs;
        self.info.methods.push(method);
        self
    }

    pub fn constructor(mut self, params: &[(&str, Type)]) -> Self {
        let parameters = self.parameters(params);
        let mut constructor = MethodSymbol::new("<init>", self.self_type(), parameters, Type::Void, false);
        constructor.kind = ExecutableKind::Constructor;
        self.info.methods.push(constructor);
        self
    }

    fn parameters(&mut self, params: &[(&str, Type)]) -> Vec<VariableSymbol> {
        params
            .iter()
            .map(|(name, ty)| VariableSymbol::parameter(*name, ty.clone(), self.table.fresh_variable_id()))
            .collect()
    }

    /// Registers the class and its package, returning its symbol.
    pub fn build(self) -> ClassSymbol {
        let ClassBuilder { table, info } = self;
        let symbol = info.symbol.clone();
        table.register_package(&info.package);
        log::trace!("registered class {}", symbol.qualified_name);
        table.classes.insert(symbol.qualified_name.clone(), info);
        symbol
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_of(arg: Type) -> Type {
        Type::Declared(DeclaredType::with_args("java.util.List", vec![arg]))
    }

    fn table() -> SymbolTable {
        let mut table = SymbolTable::new();
        let e = Type::TypeVar("E".to_string());
        table
            .class("java.util", "List")
            .type_params(&["E"])
            .interface()
            .method("get", &[("index", Type::int())], e.clone())
            .method("size", &[], Type::int())
            .build();
        table
            .class("java.util", "ArrayList")
            .type_params(&["E"])
            .implements(list_of(e))
            .build();
        table
            .class("demo", "Base")
            .field("id", Type::int())
            .method("score", &[("x", Type::Primitive(PrimitiveType::Long))], Type::int())
            .method("score", &[("x", Type::declared("java.lang.Integer"))], Type::int())
            .add_method(
                "sum",
                &[("xs", Type::array_of(Type::int()))],
                Type::int(),
                true,
                true,
            )
            .build();
        table
            .class("demo", "Derived")
            .extends(Type::declared("demo.Base"))
            .method("pick", &[("a", Type::declared("java.lang.Integer")), ("b", Type::object())], Type::int())
            .method("pick", &[("a", Type::object()), ("b", Type::declared("java.lang.Integer"))], Type::int())
            .build();
        table
            .member_class("demo.Derived", "Inner")
            .field("depth", Type::int())
            .build();
        table
    }

    #[test]
    fn test_builtins_registered() {
        let table = SymbolTable::new();
        assert!(table.class_info("java.lang.Object").is_some());
        let value_of = table.value_of_method(&Type::declared("java.lang.Integer")).unwrap();
        assert!(value_of.is_static);
        assert_eq!(value_of.parameter_types(), vec![Type::int()]);
        assert_eq!(value_of.return_type, Type::declared("java.lang.Integer"));
    }

    #[test]
    fn test_packages_include_prefixes() {
        let table = table();
        let root = table.root_scope();
        assert!(table.find_package("java", &root).unwrap().is_some());
        assert!(table.find_package("java.util", &root).unwrap().is_some());
        assert!(table.find_package("java.util.List", &root).unwrap().is_none());
    }

    #[test]
    fn test_inherited_field() {
        let table = table();
        let root = table.root_scope();
        let field = table
            .find_field("id", &Type::declared("demo.Derived"), &root)
            .unwrap()
            .unwrap();
        assert_eq!(field.owner, Type::declared("demo.Base"));
    }

    #[test]
    fn test_array_members() {
        let table = table();
        let root = table.root_scope();
        let ints = Type::array_of(Type::int());
        let length = table.find_field("length", &ints, &root).unwrap().unwrap();
        assert_eq!(length.ty, Type::int());
        let clone = table.find_method("clone", &ints, &root, &[]).unwrap().unwrap();
        assert_eq!(clone.return_type, ints);
        assert!(table.find_method("hashCode", &ints, &root, &[]).unwrap().is_some());
    }

    #[test]
    fn test_strict_phase_preferred_over_boxing() {
        let table = table();
        let root = table.root_scope();
        // int widens to long in the strict phase before boxing to Integer is considered.
        let method = table
            .find_method("score", &Type::declared("demo.Base"), &root, &[Type::int()])
            .unwrap()
            .unwrap();
        assert_eq!(method.parameter_types(), vec![Type::Primitive(PrimitiveType::Long)]);

        let method = table
            .find_method("score", &Type::declared("demo.Base"), &root, &[Type::declared("java.lang.Integer")])
            .unwrap()
            .unwrap();
        assert_eq!(method.parameter_types(), vec![Type::declared("java.lang.Integer")]);
    }

    #[test]
    fn test_varargs_phase() {
        let table = table();
        let root = table.root_scope();
        let base = Type::declared("demo.Base");
        let args = vec![Type::int(), Type::int(), Type::int()];
        assert!(table.find_method("sum", &base, &root, &args).unwrap().is_some());
        assert!(table.find_method("sum", &base, &root, &[]).unwrap().is_some());
        assert!(table.find_method("sum", &base, &root, &[Type::string()]).unwrap().is_none());
    }

    #[test]
    fn test_ambiguous_call_is_a_lookup_error() {
        let table = table();
        let root = table.root_scope();
        let integer = Type::declared("java.lang.Integer");
        let err = table
            .find_method("pick", &Type::declared("demo.Derived"), &root, &[integer.clone(), integer])
            .unwrap_err();
        assert!(err.message.unwrap().contains("ambiguous"));
    }

    #[test]
    fn test_generic_return_substitution() {
        let table = table();
        let root = table.root_scope();
        let receiver = Type::Declared(DeclaredType::with_args("java.util.ArrayList", vec![Type::string()]));
        let get = table.find_method("get", &receiver, &root, &[Type::int()]).unwrap().unwrap();
        assert_eq!(table.substitute_return_type(&get, &receiver), Type::string());
        assert!(table.is_subtype(&receiver, &list_of(Type::string())));
    }

    #[test]
    fn test_class_lookup_order() {
        let mut table = table();
        table.import("java.util.List");
        let derived = table.push_class_scope(table.root_scope(), "demo.Derived");
        let find = |name: &str| {
            table
                .find_class(name, &derived)
                .unwrap()
                .map(|c| c.qualified_name)
        };
        assert_eq!(find("Inner").as_deref(), Some("demo.Derived.Inner"));
        assert_eq!(find("Base").as_deref(), Some("demo.Base"));
        assert_eq!(find("List").as_deref(), Some("java.util.List"));
        assert_eq!(find("Integer").as_deref(), Some("java.lang.Integer"));
        assert_eq!(find("ArrayList"), None);
        assert_eq!(find("java.util.ArrayList").as_deref(), Some("java.util.ArrayList"));
    }

    #[test]
    fn test_enclosing_class_and_supertypes() {
        let table = table();
        let inner = DeclaredType::new("demo.Derived.Inner");
        assert_eq!(table.enclosing_class(&inner), Type::declared("demo.Derived"));
        assert_eq!(table.enclosing_class(&DeclaredType::new("demo.Derived")), Type::NoType);
        assert_eq!(
            table.direct_supertypes(&Type::declared("demo.Derived")),
            vec![Type::declared("demo.Base")]
        );
        assert!(table.is_interface(&DeclaredType::new("java.util.List")));
    }

    #[test]
    fn test_scopes() {
        let mut table = table();
        let class_scope = table.push_class_scope(table.root_scope(), "demo.Derived");
        let method = table.declared_method("demo.Derived", "pick").unwrap().clone();
        let method_scope = table.push_method_scope(class_scope, &method);
        let block = table.push_block_scope(method_scope);
        let local = table.declare_local(block, "tmp", Type::string());

        match table.find_local_variable_or_parameter_or_field("tmp", &block).unwrap() {
            Some(VariableElement::Variable(v)) => assert_eq!(v, local),
            other => panic!("expected a local, got {:?}", other),
        }
        match table.find_local_variable_or_parameter_or_field("a", &block).unwrap() {
            Some(VariableElement::Variable(v)) => assert_eq!(v, method.parameters[0]),
            other => panic!("expected a parameter, got {:?}", other),
        }
        match table.find_local_variable_or_parameter_or_field("id", &block).unwrap() {
            Some(VariableElement::Field(f)) => assert_eq!(f.owner, Type::declared("demo.Base")),
            other => panic!("expected a field, got {:?}", other),
        }
        assert!(table.find_local_variable_or_parameter_or_field("tmp", &method_scope).unwrap().is_none());
        assert_eq!(
            table.enclosing_method_parameters(&block),
            Some(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(table.enclosing_method_parameters(&class_scope), None);
        assert_eq!(table.enclosing_method_owner(&block), Some(Type::declared("demo.Derived")));
        assert_eq!(table.enclosing_method_owner(&class_scope), None);
    }
}
