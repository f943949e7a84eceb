use std::path::{Path, PathBuf};

use flowexpr_resolve::{ResolutionContext, ScopeId, SymbolTable, Type};
use serde::{Deserialize, Serialize};

use crate::error::CliError;
use crate::io::read_file;

/// A program description: the classes an expression may refer to.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProgramConfig {
    /// Single-type imports visible from every class
    #[serde(default)]
    pub imports: Vec<String>,

    /// Classes in declaration order. A member class must come after its enclosing class.
    #[serde(default)]
    pub classes: Vec<ClassConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ClassConfig {
    /// Package of a top-level class; ignored for member classes
    #[serde(default)]
    pub package: String,

    /// Simple name of the class
    pub name: String,

    /// Qualified name of the enclosing class, for member classes
    #[serde(default)]
    pub enclosing: Option<String>,

    #[serde(default)]
    pub interface: bool,

    #[serde(default)]
    pub type_params: Vec<String>,

    #[serde(default)]
    pub superclass: Option<String>,

    #[serde(default)]
    pub interfaces: Vec<String>,

    #[serde(default)]
    pub fields: Vec<FieldConfig>,

    #[serde(default)]
    pub methods: Vec<MethodConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldConfig {
    pub name: String,

    #[serde(rename = "type")]
    pub ty: String,

    #[serde(rename = "static", default)]
    pub is_static: bool,

    #[serde(rename = "final", default)]
    pub is_final: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodConfig {
    pub name: String,

    #[serde(default)]
    pub params: Vec<ParamConfig>,

    #[serde(default = "default_return_type")]
    pub returns: String,

    #[serde(rename = "static", default)]
    pub is_static: bool,

    #[serde(default)]
    pub varargs: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamConfig {
    pub name: String,

    #[serde(rename = "type")]
    pub ty: String,
}

pub fn default_return_type() -> String {
    "void".to_string()
}

impl ProgramConfig {
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let contents = read_file(path.to_path_buf())?;
        Self::parse(&contents, path)
    }

    pub fn parse(contents: &str, path: &Path) -> Result<Self, CliError> {
        toml::from_str(contents).map_err(|source| CliError::ConfigError {
            path: PathBuf::from(path),
            source,
        })
    }
}

impl ClassConfig {
    fn qualified_name(&self) -> String {
        match &self.enclosing {
            Some(enclosing) => format!("{}.{}", enclosing, self.name),
            None if self.package.is_empty() => self.name.clone(),
            None => format!("{}.{}", self.package, self.name),
        }
    }

    fn parse_type(&self, text: &str) -> Result<Type, CliError> {
        Type::parse(text, &self.type_params).ok_or_else(|| CliError::InvalidType {
            ty: text.to_string(),
            class: self.qualified_name(),
        })
    }

    fn parse_params(&self, params: &[ParamConfig]) -> Result<Vec<(String, Type)>, CliError> {
        params
            .iter()
            .map(|param| Ok((param.name.clone(), self.parse_type(&param.ty)?)))
            .collect()
    }
}

/// The symbol table built from a [`ProgramConfig`].
pub struct Program {
    pub table: SymbolTable,
}

impl Program {
    pub fn load(path: &Path) -> Result<Self, CliError> {
        Self::from_config(&ProgramConfig::load(path)?)
    }

    pub fn from_config(config: &ProgramConfig) -> Result<Self, CliError> {
        let mut table = SymbolTable::new();
        for import in &config.imports {
            table.import(import);
        }
        for class in &config.classes {
            add_class(&mut table, class)?;
        }
        Ok(Self { table })
    }

    /// The context and scope for an expression written on `class`, or on
    /// `method` of `class` when given.
    pub fn context(&mut self, class: &str, method: Option<&str>) -> Result<(ResolutionContext, ScopeId), CliError> {
        let info = self
            .table
            .class_info(class)
            .ok_or_else(|| CliError::UnknownClass { name: class.to_string() })?;
        let class_type = info.symbol.as_type();

        // Outermost first, so member classes see their enclosing classes' scopes.
        let mut chain = vec![class.to_string()];
        let mut enclosing = info.enclosing.clone();
        while let Some(name) = enclosing {
            enclosing = self.table.class_info(&name).and_then(|info| info.enclosing.clone());
            chain.push(name);
        }
        let mut scope = self.table.root_scope();
        for name in chain.iter().rev() {
            scope = self.table.push_class_scope(scope, name);
        }

        let method_name = match method {
            Some(name) => name,
            None => return Ok((ResolutionContext::for_class_declaration(class_type), scope)),
        };
        let method = self
            .table
            .declared_method(class, method_name)
            .cloned()
            .ok_or_else(|| CliError::UnknownMethod {
                class: class.to_string(),
                method: method_name.to_string(),
            })?;
        let scope = self.table.push_method_scope(scope, &method);
        Ok((ResolutionContext::for_method_declaration(&method, class_type), scope))
    }
}

fn add_class(table: &mut SymbolTable, class: &ClassConfig) -> Result<(), CliError> {
    let superclass = class.superclass.as_deref().map(|ty| class.parse_type(ty)).transpose()?;
    let interfaces = class
        .interfaces
        .iter()
        .map(|ty| class.parse_type(ty))
        .collect::<Result<Vec<_>, _>>()?;
    let fields = class
        .fields
        .iter()
        .map(|field| Ok((field, class.parse_type(&field.ty)?)))
        .collect::<Result<Vec<_>, CliError>>()?;
    let methods = class
        .methods
        .iter()
        .map(|method| Ok((method, class.parse_params(&method.params)?, class.parse_type(&method.returns)?)))
        .collect::<Result<Vec<_>, CliError>>()?;

    let mut builder = match &class.enclosing {
        Some(enclosing) if table.class_info(enclosing).is_none() => {
            return Err(CliError::UnknownEnclosing {
                class: class.qualified_name(),
                enclosing: enclosing.clone(),
            })
        }
        Some(enclosing) => table.member_class(enclosing, &class.name),
        None => table.class(&class.package, &class.name),
    };

    let type_params: Vec<&str> = class.type_params.iter().map(String::as_str).collect();
    builder = builder.type_params(&type_params);
    if class.interface {
        builder = builder.interface();
    }
    if let Some(superclass) = superclass {
        builder = builder.extends(superclass);
    }
    for interface in interfaces {
        builder = builder.implements(interface);
    }
    for (field, ty) in fields {
        builder = builder.add_field(&field.name, ty, field.is_static, field.is_final);
    }
    for (method, params, returns) in methods {
        let params: Vec<(&str, Type)> = params.iter().map(|(name, ty)| (name.as_str(), ty.clone())).collect();
        builder = builder.add_method(&method.name, &params, returns, method.is_static, method.varargs);
    }
    let symbol = builder.build();
    log::debug!("loaded class {}", symbol.qualified_name);
    Ok(())
}
