//! Anchor-based text patching
//!
//! Generated code is inserted next to a literal marker line that stays in place, so the
//! same anchor can receive further insertions later. Nothing is de-duplicated: applying
//! the same patch twice inserts the block twice.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Before,
    After,
}

#[derive(Debug, Clone)]
pub struct AnchorPatch<'a> {
    pub path: &'a Path,
    pub anchor: &'a str,
    pub block: &'a str,
    pub placement: Placement,
}

/// A validated patch whose new content is computed but not yet written.
#[derive(Debug, Clone)]
pub struct PreparedPatch {
    pub path: PathBuf,
    pub content: String,
}

impl PreparedPatch {
    pub async fn commit(self) -> Result<PathBuf, AppError> {
        tokio::fs::write(&self.path, self.content.as_bytes())
            .await
            .map_err(|err| AppError::io(format!("failed to write {}", self.path.display()), err))?;

        debug!(path = %self.path.display(), bytes = self.content.len(), "anchor patch written");
        Ok(self.path)
    }
}

/// Line ending of the line holding `position`, falling back to the previous line when it
/// is the last one.
fn line_ending_at(content: &str, position: usize) -> &'static str {
    let crlf = match content[position..].find('\n') {
        Some(offset) => content[..position + offset].ends_with('\r'),
        None => content[..position].ends_with("\r\n"),
    };
    if crlf {
        "\r\n"
    } else {
        "\n"
    }
}

/// Inserts `block` at the first occurrence of `anchor`; `None` when the anchor is absent.
/// The block takes on the line ending of the anchor's line.
pub fn splice(content: &str, anchor: &str, block: &str, placement: Placement) -> Option<String> {
    let start = content.find(anchor)?;
    let end = start + anchor.len();

    let newline = line_ending_at(content, start);
    let block = block.replace("\r\n", "\n");
    let block = if newline == "\n" {
        block
    } else {
        block.replace('\n', newline)
    };

    let mut patched = String::with_capacity(content.len() + block.len() + newline.len());
    match placement {
        Placement::Before => {
            patched.push_str(&content[..start]);
            patched.push_str(&block);
            if !block.ends_with('\n') {
                patched.push_str(newline);
            }
            patched.push_str(&content[start..]);
        }
        Placement::After => {
            patched.push_str(&content[..end]);
            patched.push_str(newline);
            patched.push_str(block.strip_suffix(newline).unwrap_or(&block));
            patched.push_str(&content[end..]);
        }
    }

    Some(patched)
}

pub async fn prepare_patch(patch: &AnchorPatch<'_>) -> Result<PreparedPatch, AppError> {
    let content = match tokio::fs::read_to_string(patch.path).await {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(AppError::precondition(
                "file_not_found",
                format!("target file does not exist: {}", patch.path.display()),
            ))
        }
        Err(err) => {
            return Err(AppError::io(
                format!("failed to read {}", patch.path.display()),
                err,
            ))
        }
    };

    let patched = splice(&content, patch.anchor, patch.block, patch.placement).ok_or_else(|| {
        AppError::precondition(
            "anchor_not_found",
            format!(
                "anchor '{}' not found in {}",
                patch.anchor.trim(),
                patch.path.display()
            ),
        )
    })?;

    Ok(PreparedPatch {
        path: patch.path.to_path_buf(),
        content: patched,
    })
}

pub async fn apply_patch(patch: &AnchorPatch<'_>) -> Result<PathBuf, AppError> {
    prepare_patch(patch).await?.commit().await
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANCHOR: &str = "---@Anchor";

    #[test]
    fn splice_before_keeps_anchor_last() {
        let patched = splice("a\n---@Anchor\nb\n", ANCHOR, "x()\n", Placement::Before)
            .expect("anchor present");
        assert_eq!(patched, "a\nx()\n---@Anchor\nb\n");
    }

    #[test]
    fn splice_after_inserts_on_following_line() {
        let patched = splice("a\n---@Anchor\nb\n", ANCHOR, "x()\n", Placement::After)
            .expect("anchor present");
        assert_eq!(patched, "a\n---@Anchor\nx()\nb\n");
    }

    #[test]
    fn splice_only_touches_first_occurrence() {
        let patched = splice("---@Anchor\n---@Anchor\n", ANCHOR, "x", Placement::Before)
            .expect("anchor present");
        assert_eq!(patched, "x\n---@Anchor\n---@Anchor\n");
    }

    #[test]
    fn splice_after_keeps_crlf_line_endings() {
        let content = "a\r\n---@Anchor\r\nb\r\n";
        let patched =
            splice(content, ANCHOR, "x()\ny()\n", Placement::After).expect("anchor present");
        assert_eq!(patched, "a\r\n---@Anchor\r\nx()\r\ny()\r\nb\r\n");
    }

    #[test]
    fn splice_before_keeps_crlf_line_endings() {
        let content = "a\r\n---@Anchor\r\nb\r\n";
        let patched =
            splice(content, ANCHOR, "x()\ny()\n", Placement::Before).expect("anchor present");
        assert_eq!(patched, "a\r\nx()\r\ny()\r\n---@Anchor\r\nb\r\n");
    }

    #[test]
    fn splice_crlf_anchor_on_last_line() {
        let patched = splice("a\r\n---@Anchor", ANCHOR, "x()", Placement::After)
            .expect("anchor present");
        assert_eq!(patched, "a\r\n---@Anchor\r\nx()");
    }

    #[test]
    fn splice_without_anchor_is_none() {
        assert_eq!(splice("nothing here", ANCHOR, "x", Placement::After), None);
    }

    #[tokio::test]
    async fn repeated_patches_duplicate_the_block() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.lua");
        std::fs::write(&path, "head\n---@Anchor\ntail\n").expect("seed file");

        let patch = AnchorPatch {
            path: &path,
            anchor: ANCHOR,
            block: "entry()\n",
            placement: Placement::After,
        };

        apply_patch(&patch).await.expect("first patch");
        let first = std::fs::read_to_string(&path).expect("read");
        apply_patch(&patch).await.expect("second patch");
        let second = std::fs::read_to_string(&path).expect("read");

        assert_eq!(first.matches(ANCHOR).count(), 1);
        assert_eq!(second.matches(ANCHOR).count(), 1);
        assert_eq!(second.matches("entry()").count(), 2);
        assert_eq!(second.len(), first.len() + "entry()\n".len());
    }

    #[tokio::test]
    async fn missing_anchor_leaves_file_untouched() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.lua");
        std::fs::write(&path, "no marker\n").expect("seed file");

        let err = apply_patch(&AnchorPatch {
            path: &path,
            anchor: ANCHOR,
            block: "entry()\n",
            placement: Placement::Before,
        })
        .await
        .expect_err("anchor missing");

        assert_eq!(err.code(), "anchor_not_found");
        assert_eq!(std::fs::read(&path).expect("read"), b"no marker\n");
    }

    #[tokio::test]
    async fn missing_file_is_a_precondition_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("absent.lua");

        let err = prepare_patch(&AnchorPatch {
            path: &path,
            anchor: ANCHOR,
            block: "entry()\n",
            placement: Placement::Before,
        })
        .await
        .expect_err("file missing");

        assert_eq!(err.code(), "file_not_found");
        assert!(!path.exists());
    }
}
