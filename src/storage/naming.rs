//! Object names for generated images

use rand::Rng;
use regex::Regex;
use std::sync::LazyLock;

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\-]").expect("valid regex"));
static UNDERSCORE_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_+").expect("valid regex"));

/// Replace anything but word characters and hyphens with `_`, collapse runs,
/// and trim underscores from both ends. Empty results become `general`.
pub fn sanitize_category(text: &str) -> String {
    let replaced = UNSAFE_CHARS.replace_all(text, "_");
    let collapsed = UNDERSCORE_RUNS.replace_all(&replaced, "_");
    let trimmed = collapsed.trim_matches('_');

    if trimmed.is_empty() {
        "general".to_string()
    } else {
        trimmed.to_string()
    }
}

/// `{workspace}_{category}_{8 hex}.png`
pub fn image_filename(workspace_id: &str, category: &str) -> String {
    let suffix: u32 = rand::thread_rng().gen();
    format!("{}_{}_{:08x}.png", workspace_id, sanitize_category(category), suffix)
}

/// Plain file names only: no separators, no parent references
pub fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && !name.contains("..")
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains('\0')
}
