//! Offline issues directory generator.
//!
//! Consumes a JSON file of issue objects (as fetched from
//! `/repos/:owner/:repo/issues`) and produces a browsable directory tree:
//!
//! ```text
//! all/<number>                       pretty-printed issue JSON
//! state/<state>/<slug>            -> ../../all/<number>
//! labels/<label>/<slug>           -> ../../all/<number>
//! assignee/<login>/<slug>         -> ../../all/<number>
//! ```
//!
//! The only coupling to the core is the [`Element`] navigation surface:
//! any parsed issue object can be walked without a per-endpoint schema.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use hubwire_core::{parse_element, Element};

/// Index directories rebuilt on each run (unless `--no-init`).
const INDEX_DIRS: [&str; 3] = ["state", "labels", "assignee"];

/// Read `issues_path` and generate the directory listing under `outdir`.
///
/// With `init`, stale symlink indexes are removed first; the `all/` tree is
/// always kept and overwritten in place.
pub fn generate(issues_path: &Path, outdir: &Path, init: bool) -> Result<()> {
    let contents = fs::read_to_string(issues_path)
        .with_context(|| format!("failed to read {}", issues_path.display()))?;
    let issues = parse_element(serde_json::from_str(&contents)?);
    let issues = issues
        .as_array()
        .context("expected a JSON array of issues")?;

    if init {
        for dir in INDEX_DIRS {
            let path = outdir.join(dir);
            if path.exists() {
                fs::remove_dir_all(&path)
                    .with_context(|| format!("failed to clear index {}", path.display()))?;
            }
        }
    }

    for issue in issues {
        write_issue(issue, outdir)?;
    }

    debug!(count = issues.len(), outdir = %outdir.display(), "generated issue listing");
    Ok(())
}

fn write_issue(issue: &Element, outdir: &Path) -> Result<()> {
    let number = issue["number"]
        .as_u64()
        .context("issue object has no number")?;
    let slug = slugify(issue["title"].as_str().unwrap_or_default());

    let path = outdir.join("all").join(number.to_string());
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, serde_json::to_string_pretty(issue)?)
        .with_context(|| format!("failed to write {}", path.display()))?;

    let target = format!("../../all/{number}");

    if let Some(state) = issue["state"].as_str() {
        link_into(&outdir.join("state").join(state).join(&slug), &target)?;
    }

    for label in issue["labels"].as_array().unwrap_or(&[]) {
        if let Some(name) = label["name"].as_str() {
            link_into(&outdir.join("labels").join(name).join(&slug), &target)?;
        }
    }

    if let Some(login) = issue["assignee"]["login"].as_str() {
        link_into(&outdir.join("assignee").join(login).join(&slug), &target)?;
    }

    Ok(())
}

/// Create a relative symlink at `link`, leaving an existing entry alone.
fn link_into(link: &Path, target: &str) -> Result<()> {
    if link.exists() {
        return Ok(());
    }
    if let Some(parent) = link.parent() {
        fs::create_dir_all(parent)?;
    }

    #[cfg(unix)]
    std::os::unix::fs::symlink(target, link)
        .with_context(|| format!("failed to link {}", link.display()))?;

    #[cfg(not(unix))]
    {
        let _ = target;
        tracing::warn!(link = %link.display(), "symlinks unsupported here, skipping index entry");
    }

    Ok(())
}

/// Lowercase the title, drop non-alphanumerics, and collapse
/// whitespace/hyphen runs into single hyphens.
fn slugify(value: &str) -> String {
    let cleaned: String = value
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '-' || *c == '_')
        .collect::<String>()
        .trim()
        .to_lowercase();

    let mut slug = String::with_capacity(cleaned.len());
    let mut pending_gap = false;
    for c in cleaned.chars() {
        if c.is_whitespace() || c == '-' {
            pending_gap = !slug.is_empty();
        } else {
            if pending_gap {
                slug.push('-');
                pending_gap = false;
            }
            slug.push(c);
        }
    }
    slug
}

// =============================================================================
// Tests
// =============================================================================
