//! Resolves the label's font family list to a font file on disk.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::LabelConfig;

/// CSS generic families; these fall through to the renderer's built-in font.
const GENERIC_FAMILIES: [&str; 5] = ["serif", "sans-serif", "monospace", "cursive", "fantasy"];

const MAX_DEPTH: usize = 4;

pub fn system_font_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        dirs.push(home.join(".local/share/fonts"));
        dirs.push(home.join(".fonts"));
        dirs.push(home.join("Library/Fonts"));
    }
    dirs.extend(
        [
            "/usr/share/fonts",
            "/usr/local/share/fonts",
            "/Library/Fonts",
            "/System/Library/Fonts",
        ]
        .map(PathBuf::from),
    );
    if let Some(windir) = std::env::var_os("WINDIR") {
        dirs.push(PathBuf::from(windir).join("Fonts"));
    }
    dirs
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Named families from a comma-separated list, normalized, generics dropped.
pub fn family_names(family: &str) -> Vec<String> {
    family
        .split(',')
        .map(|name| name.trim().trim_matches(|c| c == '"' || c == '\''))
        .filter(|name| !name.is_empty())
        .filter(|name| !GENERIC_FAMILIES.iter().any(|g| g.eq_ignore_ascii_case(name)))
        .map(normalize)
        .collect()
}

fn is_font_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("ttf") || e.eq_ignore_ascii_case("otf"))
}

fn find_in(dir: &Path, name: &str, depth: usize) -> Option<PathBuf> {
    let entries = fs::read_dir(dir).ok()?;
    let mut subdirs = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            subdirs.push(path);
        } else if is_font_file(&path)
            && path
                .file_stem()
                .is_some_and(|stem| normalize(&stem.to_string_lossy()) == name)
        {
            return Some(path);
        }
    }
    if depth >= MAX_DEPTH {
        return None;
    }
    subdirs.iter().find_map(|sub| find_in(sub, name, depth + 1))
}

/// First font file matching a family in `family`, in list order.
pub fn find_family(family: &str, dirs: &[PathBuf]) -> Option<PathBuf> {
    family_names(family)
        .iter()
        .find_map(|name| dirs.iter().find_map(|dir| find_in(dir, name, 0)))
}

/// The file the label should render with: an explicit font file wins over
/// the family list.
pub fn label_font_path(label: &LabelConfig, dirs: &[PathBuf]) -> Option<PathBuf> {
    if let Some(path) = &label.font_file {
        return Some(path.clone());
    }
    let found = find_family(&label.font, dirs);
    match &found {
        Some(path) => log::debug!("font family {:?} -> {}", label.font, path.display()),
        None => log::debug!("no file for font family {:?}, using default", label.font),
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn font_tree(test: &str, files: &[&str]) -> PathBuf {
        let root = std::env::temp_dir().join(format!(
            "reel_visualizer_{test}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&root);
        for file in files {
            let path = root.join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, b"").unwrap();
        }
        root
    }

    #[test]
    fn generic_families_are_dropped() {
        assert_eq!(family_names("Arial, sans-serif"), vec!["arial"]);
        assert_eq!(
            family_names("'Fira Code', \"DejaVu Sans\", monospace"),
            vec!["firacode", "dejavusans"]
        );
        assert!(family_names("serif").is_empty());
    }

    #[test]
    fn finds_family_in_nested_dirs() {
        let root = font_tree(
            "nested",
            &["truetype/msttcorefonts/Arial.ttf", "truetype/dejavu/DejaVuSans.TTF"],
        );
        let dirs = vec![root.clone()];

        let arial = find_family("Arial, sans-serif", &dirs).unwrap();
        assert!(arial.ends_with("truetype/msttcorefonts/Arial.ttf"));

        let dejavu = find_family("Missing, DejaVu Sans", &dirs).unwrap();
        assert!(dejavu.ends_with("DejaVuSans.TTF"));

        assert_eq!(find_family("sans-serif", &dirs), None);
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn explicit_file_wins_over_family() {
        let root = font_tree("explicit", &["Arial.ttf", "notes.txt"]);
        let dirs = vec![root.clone()];
        let mut label = LabelConfig::default();
        assert_eq!(label_font_path(&label, &dirs), Some(root.join("Arial.ttf")));

        label.font_file = Some(PathBuf::from("/fonts/Custom.otf"));
        assert_eq!(
            label_font_path(&label, &dirs),
            Some(PathBuf::from("/fonts/Custom.otf"))
        );

        label.font_file = None;
        label.font = "notes".into();
        assert_eq!(label_font_path(&label, &dirs), None);
        let _ = fs::remove_dir_all(root);
    }
}
