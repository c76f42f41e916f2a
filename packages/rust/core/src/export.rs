//! Markdown export of the final blog post.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument};

use blogsquad_shared::{BlogSquadError, Result};

/// File name for a topic's blog: spaces become underscores, anything that is
/// awkward in a path becomes `_` too. Letters in any script are kept.
pub fn export_file_name(topic: &str) -> String {
    static UNSAFE_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"[^\w\-.]").expect("valid regex")
    });

    let stem = UNSAFE_RE.replace_all(topic.trim(), "_");
    let stem = stem.trim_matches('.');
    if stem.is_empty() {
        "blog.md".to_string()
    } else {
        format!("{stem}_blog.md")
    }
}

/// Render the document: a `Blog: {topic}` heading followed by the post.
pub fn render_markdown(topic: &str, body: &str) -> String {
    format!("# Blog: {}\n\n{}\n", topic.trim(), body.trim_end())
}

/// Write the rendered blog into `dir`, creating it if needed.
/// Returns the path of the written file.
#[instrument(skip_all, fields(dir = %dir.display(), topic = %topic))]
pub fn write_markdown(dir: &Path, topic: &str, body: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| BlogSquadError::io(dir, e))?;

    let file_name = export_file_name(topic);
    let target = dir.join(&file_name);
    let temp = dir.join(format!(".{file_name}.tmp"));
    let content = render_markdown(topic, body);

    std::fs::write(&temp, &content).map_err(|e| BlogSquadError::io(&temp, e))?;
    std::fs::rename(&temp, &target).map_err(|e| BlogSquadError::io(&target, e))?;

    debug!(file = %target.display(), size = content.len(), "wrote blog");
    Ok(target)
}
