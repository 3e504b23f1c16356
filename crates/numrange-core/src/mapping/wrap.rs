use crate::{filter::Filter, mapping::FieldMapping};

///
/// MappingWrapper
///
/// Final wrapping step applied to a built (and possibly cached) filter,
/// driven by how the field name resolved.
///

pub trait MappingWrapper {
    fn wrap(&self, filter: Filter, mapping: &FieldMapping) -> Filter;
}

///
/// IdentityWrapper
///

#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityWrapper;

impl MappingWrapper for IdentityWrapper {
    fn wrap(&self, filter: Filter, _: &FieldMapping) -> Filter {
        filter
    }
}

///
/// SmartNameWrapper
/// Scopes the filter to a document type when the name resolved as `type.field`.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct SmartNameWrapper;

impl MappingWrapper for SmartNameWrapper {
    fn wrap(&self, filter: Filter, mapping: &FieldMapping) -> Filter {
        match &mapping.doc_type {
            Some(doc_type) => Filter::TypeScoped {
                doc_type: doc_type.clone(),
                inner: Box::new(filter),
            },
            None => filter,
        }
    }
}
