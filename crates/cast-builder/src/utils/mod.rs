use crate::errors::CliError;
use camino::Utf8Path;
use cast_pipeline::PipelineConfig;
use miette::Result;
use regex::Regex;

/// Optional per-project settings file, next to the `Content` folder.
pub const CONFIG_FILE_NAME: &str = "cast.toml";

#[macro_export]
macro_rules! println_pad {
    ($($arg:tt)*) => {{
        let __s = format!($($arg)*);
        for __line in __s.lines() {
            println!("    {}", __line);
        }
    }};
}

pub fn is_valid_slug(name: impl AsRef<str>) -> bool {
    Regex::new(r"^[[:word:]-]+$")
        .unwrap()
        .is_match(name.as_ref())
}

pub fn validate_project_name(name: impl AsRef<str>) -> Result<()> {
    let name_str = name.as_ref();
    if !is_valid_slug(name_str) {
        return Err(CliError::invalid_project_name(name_str.to_string(), None).into());
    }

    Ok(())
}

/// Read `cast.toml` from the project root, falling back to defaults when absent.
pub fn load_pipeline_config(project_root: &Utf8Path) -> Result<PipelineConfig> {
    let path = project_root.join(CONFIG_FILE_NAME);
    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No {} found, using default settings", CONFIG_FILE_NAME);
            return Ok(PipelineConfig::default());
        }
        Err(err) => return Err(CliError::from(err).into()),
    };

    let config = toml::from_str(&contents).map_err(|e| CliError::config_parse_error(path, e))?;
    Ok(config)
}

/// Human readable byte count.
pub fn format_size(bytes: usize) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = KIB * 1024.0;

    let bytes_f = bytes as f64;
    if bytes_f >= MIB {
        format!("{:.1} MiB", bytes_f / MIB)
    } else if bytes_f >= KIB {
        format!("{:.1} KiB", bytes_f / KIB)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;

    fn temp_root() -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        (dir, root)
    }

    #[test]
    fn validate_slug_valid() {
        assert!(is_valid_slug("test"));
        assert!(is_valid_slug("test-123"));
        assert!(is_valid_slug("my_game"));
        assert!(!is_valid_slug("test 123"));
        assert!(!is_valid_slug("test!123"));
        assert!(!is_valid_slug("Nice game: ([test])@"));
    }

    #[test]
    fn config_defaults_when_missing() {
        let (_dir, root) = temp_root();

        let config = load_pipeline_config(&root).unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn config_partial_file() {
        let (_dir, root) = temp_root();
        std::fs::write(root.join(CONFIG_FILE_NAME), "compression_level = 9\n").unwrap();

        let config = load_pipeline_config(&root).unwrap();
        assert_eq!(config.compression_level, 9);
        assert_eq!(
            config.asset_extensions,
            PipelineConfig::default().asset_extensions
        );
    }

    #[test]
    fn config_malformed_file() {
        let (_dir, root) = temp_root();
        std::fs::write(root.join(CONFIG_FILE_NAME), "compression_level = \"high\"\n").unwrap();

        let err = load_pipeline_config(&root).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::ConfigParseError { .. })
        ));
    }

    #[test]
    fn format_size_units() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KiB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MiB");
    }
}
