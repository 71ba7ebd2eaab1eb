use crate::error::{MangoError, Result};
use crate::metadata::raw::RawBranch;
use crate::metadata::triple::MetadataTriple;
use crate::metadata::unflatten::unflatten_into;

/// Unpack one triple into the raw tree, attaching its unit when present.
pub fn unpack_into(tree: &mut RawBranch, triple: &MetadataTriple) -> Result<()> {
    if triple.name.is_empty() {
        return Err(MangoError::invalid(format!(
            "metadata triple with value '{}' has an empty name",
            triple.value
        )));
    }

    unflatten_into(tree, &triple.name, &triple.value, true, triple.unit());
    Ok(())
}
