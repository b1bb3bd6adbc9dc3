/// Site build pipeline: static asset copying and page generation
use crate::ConvertError;
use crate::config::SiteConfig;
use crate::markdown_to_html;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("required directory not found: {0}")]
    MissingDirectory(PathBuf),
    #[error("no title in {0}")]
    MissingTitle(PathBuf),
    #[error("failed to convert {path}: {source}")]
    Convert { path: PathBuf, source: ConvertError },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

const PAGE_TEMPLATE: &str = r#"
<!doctype html>
<html>
  <head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>{title}</title>
    <link href="/index.css" rel="stylesheet" />
  </head>
  <body>
    <article>{content}</article>
  </body>
</html>
"#;

/// Counts reported after a successful build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildSummary {
    pub pages: usize,
    pub assets: usize,
}

/// Build the whole site under `root`: verify the source directories, reset
/// the output directory, copy static assets into it, and render every
/// markdown file in the content directory to a mirrored HTML page.
pub fn build_site(root: &Path, config: &SiteConfig) -> Result<BuildSummary, BuildError> {
    let content_dir = root.join(&config.content_dir);
    let static_dir = root.join(&config.static_dir);
    let output_dir = root.join(&config.output_dir);

    for dir in [&content_dir, &static_dir] {
        if !dir.is_dir() {
            return Err(BuildError::MissingDirectory(dir.clone()));
        }
    }

    if output_dir.exists() {
        fs::remove_dir_all(&output_dir)?;
    }
    fs::create_dir_all(&output_dir)?;

    let assets = copy_dir_recursive(&static_dir, &output_dir)?;
    let pages = generate_content_dir(&content_dir, &output_dir)?;

    Ok(BuildSummary { pages, assets })
}

/// Render one markdown file into a full HTML page.
pub fn generate_page(src: &Path, dst: &Path) -> Result<(), BuildError> {
    let markdown = fs::read_to_string(src)?;
    let title =
        extract_title(&markdown).ok_or_else(|| BuildError::MissingTitle(src.to_path_buf()))?;
    let content = markdown_to_html(&markdown).map_err(|source| BuildError::Convert {
        path: src.to_path_buf(),
        source,
    })?;

    let page = fill_template(
        PAGE_TEMPLATE,
        &[("{title}", &title), ("{content}", &content)],
    );

    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(dst, page)?;
    Ok(())
}

/// Page title: the first line with leading heading markers and surrounding
/// whitespace removed. `None` when that leaves nothing.
pub fn extract_title(markdown: &str) -> Option<String> {
    let first_line = markdown.lines().next()?;
    let title = first_line.trim_start_matches('#').trim();
    if title.is_empty() {
        None
    } else {
        Some(title.to_string())
    }
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<usize, BuildError> {
    fs::create_dir_all(dst)?;
    let mut copied = 0;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let path = entry.path();
        let target = dst.join(entry.file_name());
        if path.is_dir() {
            copied += copy_dir_recursive(&path, &target)?;
        } else {
            fs::copy(&path, &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

fn generate_content_dir(src: &Path, dst: &Path) -> Result<usize, BuildError> {
    let mut pages = 0;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            pages += generate_content_dir(&path, &dst.join(entry.file_name()))?;
        } else if let Some(ext) = path.extension()
            && ext == "md"
        {
            let out = dst.join(entry.file_name()).with_extension("html");
            generate_page(&path, &out)?;
            pages += 1;
        }
    }
    Ok(pages)
}

/// Substitute `(placeholder, value)` pairs in one left-to-right pass over the
/// template. Values are spliced in verbatim and never rescanned; pairs must
/// be listed in template order.
fn fill_template(template: &str, fields: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    for &(placeholder, value) in fields {
        if let Some((before, after)) = rest.split_once(placeholder) {
            out.push_str(before);
            out.push_str(value);
            rest = after;
        }
    }
    out.push_str(rest);
    out
}
