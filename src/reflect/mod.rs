//! Provenance extraction and mapper resolution.
//!
//! - `origin`: turns a self-describing callable into a [`CallableDescriptor`]
//! - `matcher`: resolves a descriptor to a [`ResolvedMapperClass`]
//! - `registry`: the declarations the matcher can look up
//! - `descriptor` / `generics`: signature and generic-type string handling

pub mod descriptor;
pub mod generics;
pub mod matcher;
pub mod origin;
pub mod registry;

pub use descriptor::{MethodSignature, TypeDescriptor};
pub use matcher::{ResolutionStage, ResolvedMapperClass, resolve};
pub use origin::{CallableDescriptor, CallableKind, Provenance, SelfDescribing, extract};
pub use registry::{Declaration, DeclarationKind, TypeRegistry};
