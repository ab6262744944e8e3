//! Syntax tree for generated PHP.
//!
//! Only the shapes the generators emit are modelled. Nodes are plain values:
//! generators build them, the merge engine copies them, nothing mutates them
//! in place. Class names are kept fully qualified and shortened at print time.

use crate::naming::short_class_name;

/// A fully qualified class name, stored without the leading backslash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassName(String);

impl ClassName {
    pub fn new(fqcn: impl AsRef<str>) -> Self {
        Self(fqcn.as_ref().trim_start_matches('\\').to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `Term` for `Drupal\taxonomy\Entity\Term`.
    pub fn short_name(&self) -> &str {
        short_class_name(&self.0)
    }

    /// `Drupal\taxonomy\Entity` for `Drupal\taxonomy\Entity\Term`; empty for global classes.
    pub fn namespace(&self) -> &str {
        self.0.rsplit_once('\\').map(|(ns, _)| ns).unwrap_or("")
    }
}

/// A PHP type, usable both as a native declaration and in doc comments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PhpType {
    String,
    Int,
    Float,
    Bool,
    Array,
    Class(ClassName),
    /// `?T` natively, `T|null` in doc comments.
    Nullable(Box<PhpType>),
    /// `array` natively, `T[]` in doc comments.
    ListOf(Box<PhpType>),
}

impl PhpType {
    pub fn class(fqcn: &str) -> Self {
        PhpType::Class(ClassName::new(fqcn))
    }

    pub fn nullable(inner: PhpType) -> Self {
        PhpType::Nullable(Box::new(inner))
    }

    pub fn list_of(inner: PhpType) -> Self {
        PhpType::ListOf(Box::new(inner))
    }

    /// Class names mentioned anywhere in the type.
    pub fn classes(&self) -> Vec<&ClassName> {
        match self {
            PhpType::Class(name) => vec![name],
            PhpType::Nullable(inner) | PhpType::ListOf(inner) => inner.classes(),
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
}

impl Visibility {
    pub fn keyword(self) -> &'static str {
        match self {
            Visibility::Public => "public",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastType {
    Int,
    Float,
    Bool,
}

impl CastType {
    pub fn keyword(self) -> &'static str {
        match self {
            CastType::Int => "int",
            CastType::Float => "float",
            CastType::Bool => "bool",
        }
    }
}

/// A function or method parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Param {
    pub ty: Option<PhpType>,
    /// Variable name without the `$`.
    pub name: String,
}

impl Param {
    pub fn typed(ty: PhpType, name: impl Into<String>) -> Self {
        Self {
            ty: Some(ty),
            name: name.into(),
        }
    }
}

/// An entry of an array literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArrayItem {
    pub key: Option<Expr>,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    This,
    Null,
    /// Variable name without the `$`.
    Var(String),
    Str(String),
    Int(i64),
    PropertyFetch {
        target: Box<Expr>,
        property: String,
        nullsafe: bool,
    },
    MethodCall {
        target: Box<Expr>,
        method: String,
        args: Vec<Expr>,
        nullsafe: bool,
    },
    FuncCall {
        name: String,
        args: Vec<Expr>,
    },
    New {
        class: ClassName,
        args: Vec<Expr>,
    },
    Cast {
        to: CastType,
        expr: Box<Expr>,
    },
    Ternary {
        condition: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
    Closure {
        params: Vec<Param>,
        body: Vec<Stmt>,
    },
    ArrowFn {
        params: Vec<Param>,
        body: Box<Expr>,
    },
    Array(Vec<ArrayItem>),
}

impl Expr {
    pub fn var(name: impl Into<String>) -> Self {
        Expr::Var(name.into())
    }

    pub fn str(value: impl Into<String>) -> Self {
        Expr::Str(value.into())
    }

    /// `$this->get('<field>')`
    pub fn field_list(field: &str) -> Self {
        Expr::This.call("get", vec![Expr::str(field)])
    }

    pub fn prop(self, property: impl Into<String>) -> Self {
        Expr::PropertyFetch {
            target: Box::new(self),
            property: property.into(),
            nullsafe: false,
        }
    }

    pub fn nullsafe_prop(self, property: impl Into<String>) -> Self {
        Expr::PropertyFetch {
            target: Box::new(self),
            property: property.into(),
            nullsafe: true,
        }
    }

    pub fn call(self, method: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::MethodCall {
            target: Box::new(self),
            method: method.into(),
            args,
            nullsafe: false,
        }
    }

    pub fn func(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::FuncCall {
            name: name.into(),
            args,
        }
    }

    pub fn cast(self, to: CastType) -> Self {
        Expr::Cast {
            to,
            expr: Box::new(self),
        }
    }

    pub fn ternary(condition: Expr, then: Expr, otherwise: Expr) -> Self {
        Expr::Ternary {
            condition: Box::new(condition),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        }
    }

    /// Class names referenced by this expression (`new`, parameter types).
    pub fn classes(&self) -> Vec<&ClassName> {
        let mut out = Vec::new();
        self.collect_classes(&mut out);
        out
    }

    fn collect_classes<'a>(&'a self, out: &mut Vec<&'a ClassName>) {
        match self {
            Expr::This | Expr::Null | Expr::Var(_) | Expr::Str(_) | Expr::Int(_) => {}
            Expr::PropertyFetch { target, .. } => target.collect_classes(out),
            Expr::MethodCall { target, args, .. } => {
                target.collect_classes(out);
                args.iter().for_each(|a| a.collect_classes(out));
            }
            Expr::FuncCall { args, .. } => args.iter().for_each(|a| a.collect_classes(out)),
            Expr::New { class, args } => {
                out.push(class);
                args.iter().for_each(|a| a.collect_classes(out));
            }
            Expr::Cast { expr, .. } => expr.collect_classes(out),
            Expr::Ternary {
                condition,
                then,
                otherwise,
            } => {
                condition.collect_classes(out);
                then.collect_classes(out);
                otherwise.collect_classes(out);
            }
            Expr::Closure { params, body } => {
                params.iter().filter_map(|p| p.ty.as_ref()).for_each(|t| out.extend(t.classes()));
                body.iter().for_each(|s| s.collect_classes(out));
            }
            Expr::ArrowFn { params, body } => {
                params.iter().filter_map(|p| p.ty.as_ref()).for_each(|t| out.extend(t.classes()));
                body.collect_classes(out);
            }
            Expr::Array(items) => {
                for item in items {
                    if let Some(key) = &item.key {
                        key.collect_classes(out);
                    }
                    item.value.collect_classes(out);
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Stmt {
    Return(Option<Expr>),
}

impl Stmt {
    fn collect_classes<'a>(&'a self, out: &mut Vec<&'a ClassName>) {
        match self {
            Stmt::Return(Some(expr)) => expr.collect_classes(out),
            Stmt::Return(None) => {}
        }
    }
}

/// A method of a generated class.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodDeclaration {
    pub name: String,
    pub visibility: Visibility,
    pub params: Vec<Param>,
    /// Native return type declaration.
    pub return_type: Option<PhpType>,
    /// `@return` type, for types the native declaration cannot express.
    pub doc_return: Option<PhpType>,
    pub body: Vec<Stmt>,
}

impl MethodDeclaration {
    pub fn public(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            params: Vec::new(),
            return_type: None,
            doc_return: None,
            body: Vec::new(),
        }
    }

    /// Every class the method mentions, in order of first appearance.
    pub fn referenced_classes(&self) -> Vec<ClassName> {
        let mut out: Vec<&ClassName> = Vec::new();
        for param in &self.params {
            if let Some(ty) = &param.ty {
                out.extend(ty.classes());
            }
        }
        if let Some(ty) = &self.return_type {
            out.extend(ty.classes());
        }
        if let Some(ty) = &self.doc_return {
            out.extend(ty.classes());
        }
        for stmt in &self.body {
            stmt.collect_classes(&mut out);
        }

        let mut unique: Vec<ClassName> = Vec::new();
        for class in out {
            if !unique.contains(class) {
                unique.push(class.clone());
            }
        }
        unique
    }
}
