//! JSON description of a package.
//!
//! ```json
//! {
//!   "rtl_dir": "verilog/rtl",
//!   "registers": [
//!     {
//!       "name": "cpu_slice",
//!       "slave":  { "name": "cpu", "address_width": 32, "data_width": 32 },
//!       "master": { "name": "periph", "address_width": 32, "data_width": 32 },
//!       "aw_reg": "skid_buffer", "b_reg": 0
//!     }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::interface::AxiLiteInterface;
use crate::platform::{default_rtl_dir, SourceRegistry};
use crate::register::RegisterConfig;
use crate::{Package, PackageError};

/// One register slice.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterDecl {
    /// Name of the generated wrapper module.
    pub name: String,

    /// Instance name override.
    #[serde(default)]
    pub inst_name: Option<String>,

    /// Slave-side interface.
    pub slave: AxiLiteInterface,

    /// Master-side interface.
    pub master: AxiLiteInterface,

    /// Register modes; missing channels use a simple buffer.
    #[serde(flatten)]
    pub config: RegisterConfig,

    /// Keys not understood above, e.g. a misspelled `aw_rg`.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl RegisterDecl {
    /// Keys of the declaration that were not recognized.
    pub fn unknown_keys(&self) -> impl Iterator<Item = &str> + '_ { self.extra.keys().map(String::as_str) }
}

/// Package description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PackageConfig {
    /// RTL directory of the wrapped IP.
    #[serde(default)]
    pub rtl_dir: Option<PathBuf>,

    /// Register slices.
    #[serde(default)]
    pub registers: Vec<RegisterDecl>,
}

impl FromStr for PackageConfig {
    type Err = PackageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> { serde_json::from_str(s).map_err(|error| PackageError::Config { error }) }
}

impl PackageConfig {
    /// Reads a description from a file. A relative `rtl_dir` is resolved against the file's directory.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, PackageError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|error| PackageError::Fs { error })?;
        let mut config: Self =
            serde_json::from_reader(BufReader::new(file)).map_err(|error| PackageError::Config { error })?;

        if let (Some(rtl_dir), Some(base)) = (&config.rtl_dir, path.parent()) {
            if rtl_dir.is_relative() {
                config.rtl_dir = Some(base.join(rtl_dir));
            }
        }
        debug!("Loaded {} register slice(s) from {}.", config.registers.len(), path.display());

        Ok(config)
    }

    /// Builds the package. `rtl_dir` takes precedence over the described one, which takes precedence over
    /// [`default_rtl_dir`].
    pub fn build(&self, rtl_dir: Option<PathBuf>) -> Result<Package, PackageError> {
        let rtl_dir = rtl_dir.or_else(|| self.rtl_dir.clone()).unwrap_or_else(default_rtl_dir);
        let mut package = Package::new(SourceRegistry::new(rtl_dir));

        for decl in &self.registers {
            for key in decl.unknown_keys() {
                warn!("Ignoring unknown key {:?} of register slice {}.", key, decl.name);
            }
            let _ = package.add_register(decl.name.clone(), &decl.slave, &decl.master, decl.config)?;
            if let Some(inst_name) = &decl.inst_name {
                let register = some_or!(package.get_mut(&decl.name), continue);
                *register = register.clone().with_inst_name(inst_name.clone());
            }
        }

        Ok(package)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::interface::ClockDomain;
    use crate::platform::Platform;
    use crate::register::RegisterType;
    use crate::AxiError;

    const CONFIG: &str = r#"{
        "rtl_dir": "ip",
        "registers": [
            {
                "name": "cpu_slice",
                "inst_name": "slice0",
                "slave":  { "name": "cpu", "address_width": 32, "data_width": 32 },
                "master": { "name": "periph", "address_width": 32, "data_width": 32, "clock_domain": "sys" },
                "aw_reg": "skid_buffer",
                "b_reg": 0
            }
        ]
    }"#;

    #[test]
    fn parses_description() {
        let config: PackageConfig = CONFIG.parse().unwrap();
        let decl = &config.registers[0];

        assert_eq!(config.rtl_dir, Some(PathBuf::from("ip")));
        assert_eq!(decl.inst_name.as_deref(), Some("slice0"));
        assert_eq!(decl.master.clock_domain, ClockDomain::default());
        assert_eq!(decl.config, RegisterConfig::default().with_aw(RegisterType::SkidBuffer).with_b(RegisterType::Bypass));
    }

    #[test]
    fn collects_unknown_keys() {
        let typo = CONFIG.replace("\"b_reg\": 0", "\"b_reg\": 0, \"aw_rg\": \"bypass\"");
        let config: PackageConfig = typo.parse().unwrap();
        let decl = &config.registers[0];

        assert_eq!(decl.unknown_keys().collect::<Vec<_>>(), ["aw_rg"]);
        assert_eq!(decl.config.aw, RegisterType::SkidBuffer);
        assert_eq!(decl.config.b, RegisterType::Bypass);
        assert!(config.build(None).is_ok());

        let config: PackageConfig = CONFIG.parse().unwrap();
        assert_eq!(config.registers[0].unknown_keys().count(), 0);
    }

    #[test]
    fn rejects_malformed_description() {
        assert!(matches!("{ \"registers\": 3 }".parse::<PackageConfig>(), Err(PackageError::Config { .. })));
    }

    #[test]
    fn builds_package() {
        let config: PackageConfig = CONFIG.parse().unwrap();
        let package = config.build(None).unwrap();
        let (name, register) = package.modules().next().unwrap();

        assert_eq!(name, "cpu_slice");
        assert_eq!(register.instance().inst_name(), "slice0");
        assert_eq!(register.instance().param("AW_REG_TYPE"), Some(2));
        assert_eq!(package.platform().rtl_dir(), Path::new("ip"));

        let package = config.build(Some(PathBuf::from("override"))).unwrap();
        assert_eq!(package.platform().rtl_dir(), Path::new("override"));
    }

    #[test]
    fn build_fails_on_mismatch() {
        let config: PackageConfig = CONFIG.replace("\"clock_domain\": \"sys\"", "\"clock_domain\": \"eth\"").parse().unwrap();
        let err = config.build(None).unwrap_err();

        assert!(matches!(err, PackageError::Axi { error: AxiError::ClockDomainMismatch { .. } }));
    }

    #[test]
    fn resolves_rtl_dir_against_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slices.json");
        fs::write(&path, CONFIG).unwrap();

        let config = PackageConfig::from_path(&path).unwrap();
        assert_eq!(config.rtl_dir, Some(dir.path().join("ip")));
    }

    #[test]
    fn missing_file_is_fs_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(PackageConfig::from_path(dir.path().join("none.json")), Err(PackageError::Fs { .. })));
    }
}
