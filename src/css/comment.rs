use crate::document::Document;
use crate::edit::Edit;
use crate::errors::StructureError;
use crate::locator::{compile, CssBlock};

/// Plan a `/* comment */` line directly above the first `--property:` line
/// of `block`, indented like that line.
///
/// Returns `None` when the property is absent or when the nearest preceding
/// non-blank line inside the block already contains `comment`.
pub fn plan_comment(
    doc: &Document,
    block: &CssBlock,
    property: &str,
    comment: &str,
) -> Result<Option<Edit>, StructureError> {
    let pattern = format!(r"(?m)^([ \t]*)--{}[ \t]*:", regex::escape(property));
    let re = compile(&pattern)?;
    let interior = doc.slice(block.interior);

    let Some(caps) = re.captures(interior) else {
        return Ok(None);
    };
    let (Some(line), Some(indent)) = (caps.get(0), caps.get(1)) else {
        return Ok(None);
    };

    let preceding = interior[..line.start()]
        .lines()
        .rev()
        .find(|l| !l.trim().is_empty());
    if preceding.is_some_and(|l| l.contains(comment)) {
        return Ok(None);
    }

    let text = format!("{}/* {} */{}", indent.as_str(), comment, doc.newline());
    Ok(Some(Edit::insert(block.interior.start + line.start(), text)))
}
