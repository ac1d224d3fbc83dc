//! File configuration. Every field has a default, so a config file only
//! needs the keys it wants to change.

use std::path::{Path, PathBuf};

use demos::DemoKind;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GpuBackend {
    #[default]
    Auto,
    #[value(alias = "vk")]
    Vulkan,
    #[value(alias = "d3d12")]
    Dx12,
    #[value(alias = "mtl")]
    Metal,
    #[value(alias = "opengl", alias = "gles")]
    Gl,
}

impl GpuBackend {
    pub fn backends(self) -> wgpu::Backends {
        match self {
            GpuBackend::Auto => wgpu::Backends::all(),
            GpuBackend::Vulkan => wgpu::Backends::VULKAN,
            GpuBackend::Dx12 => wgpu::Backends::DX12,
            GpuBackend::Metal => wgpu::Backends::METAL,
            GpuBackend::Gl => wgpu::Backends::GL,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub demo: DemoKind,
    pub gpu_backend: GpuBackend,
    pub show_fps: bool,
    pub width: u32,
    pub height: u32,
    pub textures: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            demo: DemoKind::default(),
            gpu_backend: GpuBackend::Auto,
            show_fps: false,
            width: 1280,
            height: 720,
            textures: PathBuf::from("textures"),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error in {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("Unsupported config format: {0} (expected .toml or .ron)")]
    UnsupportedFormat(PathBuf),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Toml,
    Ron,
}

impl Format {
    fn of(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Format::Toml),
            Some(ext) if ext.eq_ignore_ascii_case("ron") => Ok(Format::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

impl AppConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = Format::of(path)?;
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents, format).map_err(|reason| ConfigError::Parse {
            path: path.to_path_buf(),
            reason,
        })
    }

    fn parse(contents: &str, format: Format) -> Result<Self, String> {
        match format {
            Format::Toml => toml::from_str(contents).map_err(|e| e.to_string()),
            Format::Ron => ron::from_str(contents).map_err(|e| e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_overrides_only_given_keys() {
        let config = AppConfig::parse(
            "demo = \"bump\"\nshow_fps = true\ngpu_backend = \"vulkan\"\n",
            Format::Toml,
        )
        .unwrap();
        assert_eq!(config.demo, DemoKind::Bump);
        assert!(config.show_fps);
        assert_eq!(config.gpu_backend, GpuBackend::Vulkan);
        assert_eq!((config.width, config.height), (1280, 720));
        assert_eq!(config.textures, PathBuf::from("textures"));
    }

    #[test]
    fn ron_config_parses() {
        let config = AppConfig::parse(
            "(demo: gradient, width: 800, height: 600, textures: \"assets/tex\")",
            Format::Ron,
        )
        .unwrap();
        assert_eq!(config.demo, DemoKind::Gradient);
        assert_eq!((config.width, config.height), (800, 600));
        assert_eq!(config.textures, PathBuf::from("assets/tex"));
    }

    #[test]
    fn unknown_demo_is_a_parse_error() {
        assert!(AppConfig::parse("demo = \"specular\"", Format::Toml).is_err());
    }

    #[test]
    fn format_comes_from_extension() {
        assert_eq!(Format::of(Path::new("a/b.TOML")).unwrap(), Format::Toml);
        assert_eq!(Format::of(Path::new("cfg.ron")).unwrap(), Format::Ron);
        assert!(matches!(
            AppConfig::load_from_file("config.yaml"),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn load_from_file_reads_toml() {
        let path = std::env::temp_dir().join(format!("texmaps-config-{}.toml", std::process::id()));
        std::fs::write(&path, "demo = \"alpha\"\nwidth = 640\n").unwrap();
        let config = AppConfig::load_from_file(&path).unwrap();
        assert_eq!(config.demo, DemoKind::Alpha);
        assert_eq!(config.width, 640);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            AppConfig::load_from_file("/definitely/not/here.toml"),
            Err(ConfigError::Io(_))
        ));
    }
}
