//! Entry point for the texture-map demos.
//! Logging + CLI/config resolution, then hand over to the platform loop.

mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use demos::DemoKind;
use platform::PlatformConfig;

use crate::config::{AppConfig, GpuBackend};

#[derive(Debug, Parser)]
#[command(name = "texmaps", version, about = "Interactive texture-map demos")]
struct Cli {
    /// Demo to start with: color, bump, normal, displacement, alpha, emissive, gradient
    #[arg(long)]
    demo: Option<DemoKind>,

    #[arg(long, value_enum)]
    gpu_backend: Option<GpuBackend>,

    /// Show the frame rate in the control panel
    #[arg(long)]
    show_fps: bool,

    /// Window size as WIDTHxHEIGHT
    #[arg(long, value_parser = parse_size)]
    size: Option<(u32, u32)>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    /// Directory holding the demo textures
    #[arg(long)]
    textures: Option<PathBuf>,

    /// TOML or RON file with default settings; flags take precedence
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Cli {
    /// Layer the flags that were given over `config`.
    fn apply(&self, mut config: AppConfig) -> AppConfig {
        if let Some(demo) = self.demo {
            config.demo = demo;
        }
        if let Some(backend) = self.gpu_backend {
            config.gpu_backend = backend;
        }
        if self.show_fps {
            config.show_fps = true;
        }
        if let Some((w, h)) = self.size {
            config.width = w;
            config.height = h;
        }
        if let Some(w) = self.width {
            config.width = w;
        }
        if let Some(h) = self.height {
            config.height = h;
        }
        if let Some(textures) = &self.textures {
            config.textures = textures.clone();
        }
        config.width = config.width.max(1);
        config.height = config.height.max(1);
        config
    }
}

fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let w = w.trim().parse::<u32>().map_err(|e| format!("bad width: {e}"))?;
    let h = h.trim().parse::<u32>().map_err(|e| format!("bad height: {e}"))?;
    Ok((w, h))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let base = match &cli.config {
        Some(path) => AppConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AppConfig::default(),
    };
    let config = cli.apply(base);

    log::info!(
        "Starting texmaps. Demo: {}, backend: {:?}, show_fps={}, window_size={}x{}",
        config.demo,
        config.gpu_backend,
        config.show_fps,
        config.width,
        config.height
    );

    platform::run(PlatformConfig {
        demo: config.demo,
        backends: config.gpu_backend.backends(),
        show_fps: config.show_fps,
        width: config.width,
        height: config.height,
        texture_root: config.textures,
    })?;

    log::info!("Graceful shutdown. Bye!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_parsing() {
        assert_eq!(parse_size("800x600"), Ok((800, 600)));
        assert_eq!(parse_size("1920X1080"), Ok((1920, 1080)));
        assert!(parse_size("800").is_err());
        assert!(parse_size("axb").is_err());
    }

    #[test]
    fn defaults_without_flags() {
        let cli = Cli::try_parse_from(["texmaps"]).unwrap();
        let config = cli.apply(AppConfig::default());
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.demo, DemoKind::Emissive);
    }

    #[test]
    fn flags_override_config_file_values() {
        let file = AppConfig {
            demo: DemoKind::Bump,
            width: 640,
            height: 480,
            ..AppConfig::default()
        };
        let cli = Cli::try_parse_from([
            "texmaps",
            "--demo",
            "toon",
            "--size",
            "1024x768",
            "--height",
            "700",
            "--gpu-backend",
            "vk",
        ])
        .unwrap();
        let config = cli.apply(file);
        assert_eq!(config.demo, DemoKind::Gradient);
        assert_eq!((config.width, config.height), (1024, 700));
        assert_eq!(config.gpu_backend, GpuBackend::Vulkan);
        assert_eq!(config.gpu_backend.backends(), wgpu::Backends::VULKAN);
    }

    #[test]
    fn unknown_demo_is_rejected() {
        assert!(Cli::try_parse_from(["texmaps", "--demo", "specular"]).is_err());
    }
}
