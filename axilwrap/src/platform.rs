//! Build platform that collects the Verilog sources of wrapped IP.

use std::env;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Environment variable overriding the RTL directory.
pub const RTL_DIR_ENV: &str = "AXILWRAP_RTL_DIR";

/// Receives the source files a design depends on.
pub trait Platform {
    /// Directory holding the wrapped IP's RTL.
    fn rtl_dir(&self) -> &Path;

    /// Registers a source file.
    fn add_source(&mut self, path: PathBuf);

    /// Registered source files, in registration order.
    fn sources(&self) -> Vec<PathBuf>;
}

/// RTL directory taken from [`RTL_DIR_ENV`], or `verilog/rtl` at the workspace root.
pub fn default_rtl_dir() -> PathBuf {
    match env::var_os(RTL_DIR_ENV) {
        Some(dir) => PathBuf::from(dir),
        None => Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("verilog").join("rtl"),
    }
}

/// Platform that records sources once each, in registration order.
#[derive(Debug, Clone)]
pub struct SourceRegistry {
    rtl_dir: PathBuf,
    sources: Vec<PathBuf>,
}

impl SourceRegistry {
    /// Creates a registry reading RTL from `rtl_dir`.
    pub fn new<P: Into<PathBuf>>(rtl_dir: P) -> Self { Self { rtl_dir: rtl_dir.into(), sources: Vec::new() } }

    /// Registered sources that do not exist on disk.
    pub fn missing_sources(&self) -> Vec<&Path> {
        self.sources.iter().filter(|path| !path.is_file()).map(PathBuf::as_path).collect()
    }
}

impl Default for SourceRegistry {
    fn default() -> Self { Self::new(default_rtl_dir()) }
}

impl Platform for SourceRegistry {
    fn rtl_dir(&self) -> &Path { &self.rtl_dir }

    fn add_source(&mut self, path: PathBuf) {
        if self.sources.contains(&path) {
            debug!("Source {} already registered.", path.display());
            return;
        }
        debug!("Adding source {}.", path.display());
        self.sources.push(path);
    }

    fn sources(&self) -> Vec<PathBuf> { self.sources.clone() }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn registers_once_in_order() {
        let mut platform = SourceRegistry::new("rtl");
        platform.add_source(PathBuf::from("rtl/b.v"));
        platform.add_source(PathBuf::from("rtl/a.v"));
        platform.add_source(PathBuf::from("rtl/b.v"));

        assert_eq!(platform.sources(), vec![PathBuf::from("rtl/b.v"), PathBuf::from("rtl/a.v")]);
        assert_eq!(platform.rtl_dir(), Path::new("rtl"));
    }

    #[test]
    fn reports_missing_sources() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("present.v");
        fs::write(&present, "module present; endmodule\n").unwrap();

        let mut platform = SourceRegistry::new(dir.path());
        platform.add_source(present);
        platform.add_source(dir.path().join("absent.v"));

        assert_eq!(platform.missing_sources(), vec![dir.path().join("absent.v").as_path()]);
    }
}
