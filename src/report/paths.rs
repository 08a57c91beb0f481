//! Where the report files go.

use std::path::{Path, PathBuf};

use crate::config::Config;

/// Where the two report files go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub text: PathBuf,
    pub json: PathBuf,
}

impl ReportPaths {
    /// Resolve report locations.
    ///
    /// An explicit `output` wins (relative paths are taken from
    /// `fallback_dir`) and the JSON report goes next to it. Otherwise the
    /// configured paths under `root` are used when the tools directory
    /// exists, and bare file names in `fallback_dir` when it does not.
    pub fn resolve(
        root: &Path,
        config: &Config,
        output: Option<&Path>,
        fallback_dir: &Path,
    ) -> Self {
        if let Some(output) = output {
            let text = fallback_dir.join(output);
            let json = sibling_json(&text);
            return Self { text, json };
        }

        if root.join(&config.tools_dir).is_dir() {
            return Self {
                text: root.join(&config.output_path),
                json: root.join(&config.json_output_path),
            };
        }

        tracing::warn!(
            "tools directory {} does not exist, writing reports to {}",
            root.join(&config.tools_dir).display(),
            fallback_dir.display()
        );
        Self {
            text: fallback_dir.join(file_name_of(&config.output_path, "netmsg_report.txt")),
            json: fallback_dir.join(file_name_of(&config.json_output_path, "netmsg_report.json")),
        }
    }
}

fn sibling_json(text: &Path) -> PathBuf {
    let json = text.with_extension("json");
    if json != text {
        return json;
    }
    let mut name = text.as_os_str().to_owned();
    name.push(".json");
    PathBuf::from(name)
}

fn file_name_of(configured: &str, default: &str) -> PathBuf {
    Path::new(configured)
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_uses_tools_dir_when_present() {
        let temp = TempDir::new().unwrap();
        let config = Config::default();
        std::fs::create_dir_all(temp.path().join(&config.tools_dir)).unwrap();

        let paths = ReportPaths::resolve(temp.path(), &config, None, Path::new("/elsewhere"));
        assert_eq!(paths.text, temp.path().join(&config.output_path));
        assert_eq!(paths.json, temp.path().join(&config.json_output_path));
    }

    #[test]
    fn test_resolve_falls_back_without_tools_dir() {
        let temp = TempDir::new().unwrap();
        let fallback = TempDir::new().unwrap();
        let config = Config::default();

        let paths = ReportPaths::resolve(temp.path(), &config, None, fallback.path());
        assert_eq!(paths.text, fallback.path().join("netmsg_report.txt"));
        assert_eq!(paths.json, fallback.path().join("netmsg_report.json"));
    }

    #[test]
    fn test_resolve_output_override() {
        let config = Config::default();
        let cwd = Path::new("/work");

        let paths = ReportPaths::resolve(Path::new("/p"), &config, Some(Path::new("out/ids.txt")), cwd);
        assert_eq!(paths.text, PathBuf::from("/work/out/ids.txt"));
        assert_eq!(paths.json, PathBuf::from("/work/out/ids.json"));

        let paths = ReportPaths::resolve(Path::new("/p"), &config, Some(Path::new("/tmp/r.json")), cwd);
        assert_eq!(paths.text, PathBuf::from("/tmp/r.json"));
        assert_eq!(paths.json, PathBuf::from("/tmp/r.json.json"));
    }
}
