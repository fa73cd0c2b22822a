//! Option schema types
//!
//! The reconstructed form of one `opt.<Method>(...)` configuration call.

use std::fmt;

use serde::Serialize;

use crate::source::render::quote;

/// Fixed cardinality bounds recorded for collection-valued options
pub const COLLECTION_MIN: u32 = 1;
pub const COLLECTION_MAX: u32 = 99;

/// Kind of command-line option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OptionKind {
    Flag,
    String,
    StringOptional,
    Int,
    IntOptional,
    Counter,
    Float,
    FloatOptional,
    StringList,
    StringMap,
    IntList,
    FloatList,
}

/// How the option value is returned by the configuration call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// `opt.String("name", "default")` returns a pointer
    Plain,
    /// `opt.StringVar(&x, "name", "default")` writes through argument 0
    Var,
}

impl Binding {
    /// Index of the name argument
    pub fn offset(self) -> usize {
        match self {
            Binding::Plain => 0,
            Binding::Var => 1,
        }
    }
}

impl OptionKind {
    /// Classify a configuration-handle method name
    pub fn from_method(method: &str) -> Option<(OptionKind, Binding)> {
        let classified = match method {
            "Bool" => (OptionKind::Flag, Binding::Plain),
            "BoolVar" => (OptionKind::Flag, Binding::Var),
            "String" => (OptionKind::String, Binding::Plain),
            "StringVar" => (OptionKind::String, Binding::Var),
            "StringOptional" => (OptionKind::StringOptional, Binding::Plain),
            "StringVarOptional" => (OptionKind::StringOptional, Binding::Var),
            "Int" => (OptionKind::Int, Binding::Plain),
            "IntVar" => (OptionKind::Int, Binding::Var),
            "IntOptional" => (OptionKind::IntOptional, Binding::Plain),
            "IntVarOptional" => (OptionKind::IntOptional, Binding::Var),
            "Increment" => (OptionKind::Counter, Binding::Plain),
            "IncrementVar" => (OptionKind::Counter, Binding::Var),
            "Float64" => (OptionKind::Float, Binding::Plain),
            "Float64Var" => (OptionKind::Float, Binding::Var),
            "Float64Optional" => (OptionKind::FloatOptional, Binding::Plain),
            "Float64VarOptional" => (OptionKind::FloatOptional, Binding::Var),
            "StringSlice" => (OptionKind::StringList, Binding::Plain),
            "StringSliceVar" => (OptionKind::StringList, Binding::Var),
            "StringMap" => (OptionKind::StringMap, Binding::Plain),
            "StringMapVar" => (OptionKind::StringMap, Binding::Var),
            "IntSlice" => (OptionKind::IntList, Binding::Plain),
            "IntSliceVar" => (OptionKind::IntList, Binding::Var),
            "Float64Slice" => (OptionKind::FloatList, Binding::Plain),
            "Float64SliceVar" => (OptionKind::FloatList, Binding::Var),
            _ => return None,
        };
        Some(classified)
    }

    /// Non-Var getoptions method that declares this kind
    pub fn go_method(self) -> &'static str {
        match self {
            OptionKind::Flag => "Bool",
            OptionKind::String => "String",
            OptionKind::StringOptional => "StringOptional",
            OptionKind::Int => "Int",
            OptionKind::IntOptional => "IntOptional",
            OptionKind::Counter => "Increment",
            OptionKind::Float => "Float64",
            OptionKind::FloatOptional => "Float64Optional",
            OptionKind::StringList => "StringSlice",
            OptionKind::StringMap => "StringMap",
            OptionKind::IntList => "IntSlice",
            OptionKind::FloatList => "Float64Slice",
        }
    }

    /// Collection kinds take `min, max` instead of a default value
    pub fn is_collection(self) -> bool {
        matches!(
            self,
            OptionKind::StringList | OptionKind::StringMap | OptionKind::IntList | OptionKind::FloatList
        )
    }

    /// Placeholder shown for the option argument in listings
    fn value_label(self) -> Option<&'static str> {
        match self {
            OptionKind::Flag | OptionKind::Counter => None,
            OptionKind::String | OptionKind::StringOptional => Some("string"),
            OptionKind::Int | OptionKind::IntOptional => Some("int"),
            OptionKind::Float | OptionKind::FloatOptional => Some("float"),
            OptionKind::StringList => Some("string..."),
            OptionKind::StringMap => Some("key=value..."),
            OptionKind::IntList => Some("int..."),
            OptionKind::FloatList => Some("float..."),
        }
    }
}

/// Kind of secondary option property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModifierKind {
    Alias,
    ArgName,
    Description,
    Required,
    EnvBinding,
    AllowedValues,
    SuggestedValues,
}

impl ModifierKind {
    /// Classify a modifier method name
    pub fn from_method(method: &str) -> Option<ModifierKind> {
        match method {
            "Alias" => Some(ModifierKind::Alias),
            "ArgName" => Some(ModifierKind::ArgName),
            "Description" => Some(ModifierKind::Description),
            "Required" => Some(ModifierKind::Required),
            "GetEnv" => Some(ModifierKind::EnvBinding),
            "ValidValues" => Some(ModifierKind::AllowedValues),
            "SuggestedValues" => Some(ModifierKind::SuggestedValues),
            _ => None,
        }
    }

    /// getoptions method for this modifier
    pub fn go_method(self) -> &'static str {
        match self {
            ModifierKind::Alias => "Alias",
            ModifierKind::ArgName => "ArgName",
            ModifierKind::Description => "Description",
            ModifierKind::Required => "Required",
            ModifierKind::EnvBinding => "GetEnv",
            ModifierKind::AllowedValues => "ValidValues",
            ModifierKind::SuggestedValues => "SuggestedValues",
        }
    }

    /// Modifiers that only use their first value
    pub fn is_single_valued(self) -> bool {
        matches!(
            self,
            ModifierKind::ArgName | ModifierKind::Description | ModifierKind::EnvBinding
        )
    }
}

/// A secondary property attached to an option
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Modifier {
    pub kind: ModifierKind,
    pub values: Vec<String>,
}

/// Typed default value of an option
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "kebab-case")]
pub enum OptionDefault {
    Flag(bool),
    Text(String),
    Integer(i64),
    Float(f64),
    Bounds { min: u32, max: u32 },
}

impl OptionDefault {
    /// Coerce a default literal for the given kind
    ///
    /// Unparsable numbers fall back to zero.
    pub fn coerce(kind: OptionKind, literal: &str) -> OptionDefault {
        match kind {
            OptionKind::Flag => OptionDefault::Flag(literal == "true"),
            OptionKind::String | OptionKind::StringOptional => {
                OptionDefault::Text(literal.to_string())
            }
            OptionKind::Int | OptionKind::IntOptional | OptionKind::Counter => {
                OptionDefault::Integer(literal.parse().unwrap_or(0))
            }
            OptionKind::Float | OptionKind::FloatOptional => {
                OptionDefault::Float(literal.parse().unwrap_or(0.0))
            }
            OptionKind::StringList
            | OptionKind::StringMap
            | OptionKind::IntList
            | OptionKind::FloatList => OptionDefault::Bounds {
                min: COLLECTION_MIN,
                max: COLLECTION_MAX,
            },
        }
    }

    /// Go expression for the default argument(s)
    fn go_args(&self) -> String {
        match self {
            OptionDefault::Flag(value) => value.to_string(),
            OptionDefault::Text(value) => quote(value),
            OptionDefault::Integer(value) => value.to_string(),
            OptionDefault::Float(value) => format!("{:?}", value),
            OptionDefault::Bounds { min, max } => format!("{}, {}", min, max),
        }
    }
}

/// One reconstructed command-line option
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionSpec {
    pub kind: OptionKind,
    pub name: String,
    /// Default argument as written in the source (unquoted)
    pub default_literal: String,
    pub default: OptionDefault,
    pub modifiers: Vec<Modifier>,
}

impl OptionSpec {
    pub fn new(
        kind: OptionKind,
        name: impl Into<String>,
        default_literal: impl Into<String>,
        modifiers: Vec<Modifier>,
    ) -> Self {
        let default_literal = default_literal.into();
        Self {
            kind,
            name: name.into(),
            default: OptionDefault::coerce(kind, &default_literal),
            default_literal,
            modifiers,
        }
    }

    /// All values of one modifier kind
    pub fn modifier_values(&self, kind: ModifierKind) -> Vec<&str> {
        self.modifiers
            .iter()
            .filter(|m| m.kind == kind)
            .flat_map(|m| m.values.iter().map(String::as_str))
            .collect()
    }

    fn has_modifier(&self, kind: ModifierKind) -> bool {
        self.modifiers.iter().any(|m| m.kind == kind)
    }

    /// The getoptions call that declares this option on `receiver`
    pub fn go_call(&self, receiver: &str) -> String {
        let mut call = format!(
            "{}.{}({}, {}",
            receiver,
            self.kind.go_method(),
            quote(&self.name),
            self.default.go_args()
        );
        for modifier in &self.modifiers {
            let values: Vec<String> = modifier.values.iter().map(|v| quote(v)).collect();
            call.push_str(&format!(
                ", {}.{}({})",
                receiver,
                modifier.kind.go_method(),
                values.join(", ")
            ));
        }
        call.push(')');
        call
    }
}

impl fmt::Display for OptionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "--{}", self.name)?;
        for alias in self.modifier_values(ModifierKind::Alias) {
            if alias.chars().count() == 1 {
                write!(f, ", -{}", alias)?;
            } else {
                write!(f, ", --{}", alias)?;
            }
        }

        if let Some(label) = self.kind.value_label() {
            let arg_name = self.modifier_values(ModifierKind::ArgName);
            write!(f, " <{}>", arg_name.first().copied().unwrap_or(label))?;
        }

        match &self.default {
            OptionDefault::Text(value) if !value.is_empty() => write!(f, " (default: {})", value)?,
            OptionDefault::Integer(value) if *value != 0 => write!(f, " (default: {})", value)?,
            OptionDefault::Float(value) if *value != 0.0 => write!(f, " (default: {})", value)?,
            OptionDefault::Flag(true) => write!(f, " (default: true)")?,
            _ => {}
        }

        if self.has_modifier(ModifierKind::Required) {
            write!(f, " [required]")?;
        }
        if let Some(env) = self.modifier_values(ModifierKind::EnvBinding).first() {
            write!(f, " [env: {}]", env)?;
        }
        let allowed = self.modifier_values(ModifierKind::AllowedValues);
        if !allowed.is_empty() {
            write!(f, " [valid: {}]", allowed.join(", "))?;
        }
        let suggested = self.modifier_values(ModifierKind::SuggestedValues);
        if !suggested.is_empty() {
            write!(f, " [suggested: {}]", suggested.join(", "))?;
        }
        if let Some(description) = self.modifier_values(ModifierKind::Description).first() {
            write!(f, " - {}", description)?;
        }
        Ok(())
    }
}
