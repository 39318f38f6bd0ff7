//! CSS rule-body patchers.
//!
//! Each function here locates its rule with [`crate::locator::css_block`],
//! plans [`crate::edit::Edit`]s and applies them, returning a
//! [`Patched`] document.

pub mod comment;
pub mod properties;

pub use comment::plan_comment;
pub use properties::{plan_background, plan_rewrite, PropertyEdit, PropertyKind, RewritePlan};

use crate::document::{Document, Patched};
use crate::edit::Edit;
use crate::errors::StructureError;
use crate::locator::css_block;

/// Rewrite custom properties inside the first `:root` block.
///
/// The block is mandatory. Returns the patched document and the names of
/// variables whose value changed.
pub fn patch_root_variables(
    doc: &Document,
    values: &[PropertyEdit],
) -> Result<(Patched, Vec<String>), StructureError> {
    let block = css_block(doc, ":root")?.ok_or_else(|| StructureError::missing(":root block"))?;
    let plan = plan_rewrite(doc, &block, PropertyKind::Custom, values)?;
    let patched = Edit::apply_batch(doc, plan.edits)?;
    Ok((patched, plan.changed))
}

/// Ensure `/* comment */` sits directly above `--property` in `:root`.
///
/// A missing `:root` block or property is a no-op here; callers that need
/// the block check for it through [`patch_root_variables`].
pub fn ensure_root_comment(
    doc: &Document,
    property: &str,
    comment: &str,
) -> Result<Patched, StructureError> {
    let Some(block) = css_block(doc, ":root")? else {
        return Ok(Patched::unchanged(doc));
    };
    match plan_comment(doc, &block, property, comment)? {
        Some(edit) => Ok(edit.apply(doc)?),
        None => Ok(Patched::unchanged(doc)),
    }
}

/// Ensure plain declarations inside the first `selector { ... }` block.
///
/// An absent selector is not an error and reports unchanged.
pub fn ensure_selector_properties(
    doc: &Document,
    selector: &str,
    properties: &[PropertyEdit],
) -> Result<Patched, StructureError> {
    let Some(block) = css_block(doc, selector)? else {
        log::warn!("selector `{selector}` not found; skipped");
        return Ok(Patched::unchanged(doc));
    };
    let plan = plan_rewrite(doc, &block, PropertyKind::Plain, properties)?;
    Ok(Edit::apply_batch(doc, plan.edits)?)
}

/// Normalize the first `background: rgb(...)` line in the `body` rule.
pub fn normalize_body_background(doc: &Document, value: &str) -> Result<Patched, StructureError> {
    let Some(block) = css_block(doc, "body")? else {
        return Ok(Patched::unchanged(doc));
    };
    match plan_background(doc, &block, value) {
        Some(edit) => Ok(edit.apply(doc)?),
        None => Ok(Patched::unchanged(doc)),
    }
}
