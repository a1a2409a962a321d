//! Helpers for generic type strings such as `Mapper<Map<String,List<Integer>>, Foo>`.

use serde::{Deserialize, Serialize};

/// Raw interface names and their flattened type arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericTypeInfo {
    pub raw_types: Vec<String>,
    pub type_arguments: Vec<String>,
}

/// Byte range of the first top-level `<...>` span, matched by depth.
///
/// Returns `Ok(None)` for a non-generic name and `Err(())` when the brackets
/// do not balance.
fn generic_span(type_name: &str) -> Result<Option<(usize, usize)>, ()> {
    let Some(open) = type_name.find('<') else {
        return if type_name.contains('>') {
            Err(())
        } else {
            Ok(None)
        };
    };

    let mut depth = 0usize;
    for (idx, ch) in type_name.char_indices().skip_while(|(i, _)| *i < open) {
        match ch {
            '<' => depth += 1,
            '>' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(Some((open, idx)));
                }
            }
            _ => {}
        }
    }
    Err(())
}

/// Strips the generic parameter suffix, leaving the raw type name.
///
/// Brackets are matched by depth, so `Mapper<Map<String,List<Integer>>, Foo>`
/// reduces to `Mapper`. Returns `None` when the brackets are unbalanced or
/// anything other than whitespace follows the closing bracket.
#[must_use]
pub fn strip_generic_suffix(type_name: &str) -> Option<&str> {
    match generic_span(type_name) {
        Ok(None) => Some(type_name.trim()),
        Ok(Some((open, close))) => {
            if type_name[close + 1..].trim().is_empty() {
                Some(type_name[..open].trim())
            } else {
                None
            }
        }
        Err(()) => None,
    }
}

/// Splits the top-level type arguments of a generic type string.
///
/// `Mapper<Map<String,List<Integer>>, Foo>` yields
/// `["Map<String,List<Integer>>", "Foo"]`. A non-generic name yields an empty
/// list; unbalanced brackets yield `None`.
#[must_use]
pub fn split_type_arguments(type_name: &str) -> Option<Vec<&str>> {
    let (open, close) = match generic_span(type_name) {
        Ok(Some(span)) => span,
        Ok(None) => return Some(Vec::new()),
        Err(()) => return None,
    };

    let inner = &type_name[open + 1..close];
    let mut args = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (idx, ch) in inner.char_indices() {
        match ch {
            '<' => depth += 1,
            '>' => depth -= 1,
            ',' if depth == 0 => {
                args.push(inner[start..idx].trim());
                start = idx + 1;
            }
            _ => {}
        }
    }
    let last = inner[start..].trim();
    if !last.is_empty() {
        args.push(last);
    }
    Some(args)
}

/// Collects raw names and type arguments from a list of declared interfaces.
#[must_use]
pub fn generic_type_information<'a, I>(interfaces: I) -> GenericTypeInfo
where
    I: IntoIterator<Item = &'a str>,
{
    let mut info = GenericTypeInfo::default();
    for interface in interfaces {
        let Some(raw) = strip_generic_suffix(interface) else {
            continue;
        };
        info.raw_types.push(raw.to_string());
        if let Some(args) = split_type_arguments(interface) {
            info.type_arguments
                .extend(args.into_iter().map(ToString::to_string));
        }
    }
    info
}
