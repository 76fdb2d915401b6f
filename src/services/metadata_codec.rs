//! Metadata codec.
//!
//! Reads and writes the linkage block carried at the very start of a GitHub
//! issue/comment body (and of incident descriptions):
//!
//! ```text
//! <!-- {"isSnowIntegratorMetaData":"true","incident_number":"INC0010016",...} -->\r\n
//! owner-authored content, preserved byte for byte
//! ```
//!
//! The codec never deduplicates: callers strip an existing block with
//! [`split_body`] or [`extract_metadata`] before calling [`embed_metadata`].

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::LinkageMetadata;

/// Opening delimiter of the block.
pub const OPEN_DELIMITER: &str = "<!--";
/// Closing delimiter of the block.
pub const CLOSE_DELIMITER: &str = "-->";
/// Separator written between the block and the content.
pub const LINE_BREAK: &str = "\r\n";

/// True iff `body` starts with a metadata block opener (`<!--` followed by a JSON object).
pub fn has_metadata(body: &str) -> bool {
    body.strip_prefix(OPEN_DELIMITER)
        .is_some_and(|rest| rest.trim_start().starts_with('{'))
}

/// Parse the leading metadata block and return it with the remaining content.
///
/// The content is everything after the closing delimiter, minus the single
/// line break [`embed_metadata`] writes there.
pub fn extract_metadata(body: &str) -> DomainResult<(LinkageMetadata, &str)> {
    if !has_metadata(body) {
        return Err(DomainError::MalformedMetadata(
            "body does not start with a metadata block".to_string(),
        ));
    }

    let rest = &body[OPEN_DELIMITER.len()..];
    let close = rest.find(CLOSE_DELIMITER).ok_or_else(|| {
        DomainError::MalformedMetadata(format!("missing closing delimiter '{CLOSE_DELIMITER}'"))
    })?;

    let metadata: LinkageMetadata = serde_json::from_str(rest[..close].trim())
        .map_err(|e| DomainError::MalformedMetadata(format!("invalid JSON: {e}")))?;

    let after = &rest[close + CLOSE_DELIMITER.len()..];
    let content = after
        .strip_prefix(LINE_BREAK)
        .or_else(|| after.strip_prefix('\n'))
        .unwrap_or(after);

    Ok((metadata, content))
}

/// Prepend the serialized metadata block to `body`.
pub fn embed_metadata(metadata: &LinkageMetadata, body: &str) -> DomainResult<String> {
    // JSON only contains '>' inside strings, so escaping it keeps the
    // closing delimiter out of the payload.
    let json = serde_json::to_string(metadata)?.replace('>', "\\u003e");
    Ok(format!(
        "{OPEN_DELIMITER} {json} {CLOSE_DELIMITER}{LINE_BREAK}{body}"
    ))
}

/// Linkage state of a body, with the owner-authored content split off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyLinkage<'a> {
    /// No metadata block.
    Unlinked { content: &'a str },
    /// Valid metadata block.
    Linked {
        metadata: LinkageMetadata,
        content: &'a str,
    },
    /// A block is present but unreadable; the whole body counts as content.
    Malformed { reason: String, content: &'a str },
}

impl<'a> BodyLinkage<'a> {
    /// Owner-authored content.
    pub const fn content(&self) -> &'a str {
        match self {
            Self::Unlinked { content }
            | Self::Linked { content, .. }
            | Self::Malformed { content, .. } => content,
        }
    }

    pub const fn is_linked(&self) -> bool {
        matches!(self, Self::Linked { .. })
    }

    pub const fn metadata(&self) -> Option<&LinkageMetadata> {
        match self {
            Self::Linked { metadata, .. } => Some(metadata),
            _ => None,
        }
    }
}

/// Classify a body without failing.
///
/// Malformed blocks degrade to "unlinked"; the reason is returned so the
/// caller can report it. A well-formed JSON comment that this bridge did not
/// write (no marker, or no linkage field) is owner content and stays in place.
pub fn split_body(body: &str) -> BodyLinkage<'_> {
    if !has_metadata(body) {
        return BodyLinkage::Unlinked { content: body };
    }
    match extract_metadata(body) {
        Ok((metadata, content)) if metadata.is_bridge_block() => {
            BodyLinkage::Linked { metadata, content }
        }
        Ok(_) => BodyLinkage::Unlinked { content: body },
        Err(err) => BodyLinkage::Malformed {
            reason: err.to_string(),
            content: body,
        },
    }
}
