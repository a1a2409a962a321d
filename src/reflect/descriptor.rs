//! Structured method signatures and the adapter for JVM-style descriptor strings.
//!
//! A descriptor such as `(ILapp/dao/ConfigMapper;[J)Lapp/model/ConfigModel;`
//! parses into a [`MethodSignature`] whose parameters are
//! `int, app.dao.ConfigMapper, long[]` and whose return type is
//! `app.model.ConfigModel`. Internal slash-separated names become dotted
//! qualified names, and [`std::fmt::Display`] renders the descriptor form back.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::MapperError;

/// One parameter or return type in a method signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeDescriptor {
    /// Primitive type, stored as its descriptor letter (`I`, `J`, `Z`, ...).
    Primitive(char),
    /// Reference type by dotted qualified name.
    Object(String),
    Array(Box<TypeDescriptor>),
    Void,
}

const PRIMITIVE_CODES: &[char] = &['B', 'C', 'D', 'F', 'I', 'J', 'S', 'Z'];

impl TypeDescriptor {
    /// Reference type from a dotted or slash-separated qualified name.
    pub fn object(name: impl AsRef<str>) -> Self {
        TypeDescriptor::Object(name.as_ref().replace('/', "."))
    }

    pub fn array(element: TypeDescriptor) -> Self {
        TypeDescriptor::Array(Box::new(element))
    }

    /// Qualified name when this is a plain reference type.
    #[must_use]
    pub fn reference_name(&self) -> Option<&str> {
        match self {
            TypeDescriptor::Object(name) => Some(name),
            _ => None,
        }
    }

    /// Parses one field type starting at `pos`, returning it and the next offset.
    fn parse_at(signature: &str, pos: usize) -> Result<(Self, usize), MapperError> {
        let bytes = signature.as_bytes();
        let Some(&code) = bytes.get(pos) else {
            return Err(MapperError::invalid_signature(
                signature,
                "unexpected end of descriptor",
            ));
        };

        match code as char {
            'L' => {
                let rest = &signature[pos + 1..];
                let Some(end) = rest.find(';') else {
                    return Err(MapperError::invalid_signature(
                        signature,
                        format!("unterminated reference type at offset {pos}"),
                    ));
                };
                let internal = &rest[..end];
                if internal.is_empty() || internal.contains(['(', ')', '[', '.']) {
                    return Err(MapperError::invalid_signature(
                        signature,
                        format!("malformed reference type {internal:?}"),
                    ));
                }
                Ok((TypeDescriptor::object(internal), pos + 1 + end + 1))
            }
            '[' => {
                let (element, next) = Self::parse_at(signature, pos + 1)?;
                if element == TypeDescriptor::Void {
                    return Err(MapperError::invalid_signature(signature, "array of void"));
                }
                Ok((TypeDescriptor::array(element), next))
            }
            'V' => Ok((TypeDescriptor::Void, pos + 1)),
            c if PRIMITIVE_CODES.contains(&c) => Ok((TypeDescriptor::Primitive(c), pos + 1)),
            other => Err(MapperError::invalid_signature(
                signature,
                format!("unknown type code {other:?} at offset {pos}"),
            )),
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Primitive(code) => write!(f, "{code}"),
            TypeDescriptor::Object(name) => write!(f, "L{};", name.replace('.', "/")),
            TypeDescriptor::Array(element) => write!(f, "[{element}"),
            TypeDescriptor::Void => f.write_str("V"),
        }
    }
}

/// Ordered parameter types plus the return type of a method.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodSignature {
    parameters: Vec<TypeDescriptor>,
    return_type: TypeDescriptor,
}

impl MethodSignature {
    pub fn new(parameters: Vec<TypeDescriptor>, return_type: TypeDescriptor) -> Self {
        Self {
            parameters,
            return_type,
        }
    }

    #[must_use]
    pub fn parameters(&self) -> &[TypeDescriptor] {
        &self.parameters
    }

    #[must_use]
    pub fn return_type(&self) -> &TypeDescriptor {
        &self.return_type
    }

    /// Qualified names of the reference-typed parameters, in declaration order.
    pub fn reference_parameters(&self) -> impl Iterator<Item = &str> {
        self.parameters
            .iter()
            .filter_map(TypeDescriptor::reference_name)
    }
}

impl FromStr for MethodSignature {
    type Err = MapperError;

    fn from_str(signature: &str) -> Result<Self, Self::Err> {
        if signature.trim().is_empty() {
            return Err(MapperError::invalid_signature(
                signature,
                "signature cannot be empty",
            ));
        }
        if !signature.starts_with('(') {
            return Err(MapperError::invalid_signature(
                signature,
                "signature must start with '('",
            ));
        }

        let mut parameters = Vec::new();
        let mut pos = 1;
        loop {
            match signature.as_bytes().get(pos) {
                Some(b')') => break,
                Some(_) => {
                    let (param, next) = TypeDescriptor::parse_at(signature, pos)?;
                    if param == TypeDescriptor::Void {
                        return Err(MapperError::invalid_signature(
                            signature,
                            "void is only valid as a return type",
                        ));
                    }
                    parameters.push(param);
                    pos = next;
                }
                None => {
                    return Err(MapperError::invalid_signature(
                        signature,
                        "missing ')' after parameters",
                    ));
                }
            }
        }

        let (return_type, end) = TypeDescriptor::parse_at(signature, pos + 1)?;
        if end != signature.len() {
            return Err(MapperError::invalid_signature(
                signature,
                format!("trailing characters after return type: {:?}", &signature[end..]),
            ));
        }

        Ok(Self {
            parameters,
            return_type,
        })
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for param in &self.parameters {
            write!(f, "{param}")?;
        }
        write!(f, "){}", self.return_type)
    }
}
