//! Image reference lookup and tag rewriting.

use tracing::debug;

use crate::error::ManifestError;

use super::document::{ManifestDocument, Node};

/// Key under which container images are declared.
const IMAGE_KEY: &str = "image";

/// Result of rewriting an image tag in manifest text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRewrite {
    pub previous_tag: String,
    pub content: String,
}

/// Find the tag of the first `image:` entry whose value mentions `image_name`.
///
/// The tag is everything after the last `:` in the value. Entries are visited
/// depth-first in document order; values without any `:`, or with nothing
/// after the last one, carry no tag and are skipped.
pub fn find_current_tag(doc: &ManifestDocument, image_name: &str) -> Result<String, ManifestError> {
    doc.root()
        .find_entry(&mut |key: &Node, value: &Node| {
            if key.as_str() != Some(IMAGE_KEY) {
                return None;
            }
            let reference = value.as_str()?;
            if !reference.contains(image_name) {
                return None;
            }
            reference
                .rsplit_once(':')
                .filter(|(_, tag)| !tag.is_empty())
                .map(|(_, tag)| tag.to_string())
        })
        .ok_or_else(|| ManifestError::ImageNotFoundInManifest {
            image: image_name.to_string(),
        })
}

/// Replace every `image_name:current_tag` in `text` with `image_name:new_tag`.
///
/// This is a plain textual substitution on the original text, so formatting
/// and comments survive, and any repeated occurrence (including in comments)
/// is replaced as well.
pub fn replace_tag(text: &str, image_name: &str, current_tag: &str, new_tag: &str) -> String {
    text.replace(
        &format!("{image_name}:{current_tag}"),
        &format!("{image_name}:{new_tag}"),
    )
}

/// Parse `text`, locate the current tag of `image_name` and rewrite it to `new_tag`.
pub fn rewrite_image_tag(
    text: &str,
    image_name: &str,
    new_tag: &str,
) -> Result<TagRewrite, ManifestError> {
    let doc = ManifestDocument::parse(text)?;
    let previous_tag = find_current_tag(&doc, image_name)?;
    debug!("Found {}:{} in manifest", image_name, previous_tag);

    Ok(TagRewrite {
        content: replace_tag(text, image_name, &previous_tag, new_tag),
        previous_tag,
    })
}
