use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use itertools::Itertools;
use linked_hash_map::LinkedHashMap;
use thiserror::Error;
use tracing::{error, info};

use crate::axil_register::{AxiError, AxiLiteRegister, SOURCES};
use crate::interface::AxiLiteInterface;
use crate::platform::{Platform, SourceRegistry};
use crate::register::RegisterConfig;
use crate::utils::is_verilog_ident;

/// Name of the generated source list.
pub const SOURCE_LIST: &str = "sources.f";

#[allow(missing_docs)]
#[allow(variant_size_differences)]
#[derive(Debug, Error)]
pub enum PackageError {
    #[error("file system error: {error:?}")]
    Fs { error: io::Error },

    #[error("AXI-Lite error: {error}")]
    Axi { error: AxiError },

    #[error("configuration error: {error}")]
    Config { error: serde_json::Error },

    #[error("module {name} is added to the package twice")]
    DuplicateModule { name: String },

    #[error("module name `{name}` is not a valid Verilog identifier")]
    InvalidModuleName { name: String },

    #[error("module name `{name}` clashes with a module of the wrapped IP")]
    ModuleNameClash { name: String },
}

impl From<AxiError> for PackageError {
    fn from(error: AxiError) -> Self { Self::Axi { error } }
}

/// Package of register slices sharing one platform.
#[derive(Debug)]
pub struct Package<P: Platform = SourceRegistry> {
    platform: P,
    /// Register slices, keyed by the name of their wrapper module.
    modules: LinkedHashMap<String, AxiLiteRegister>,
}

impl Default for Package {
    fn default() -> Self { Self::new(SourceRegistry::default()) }
}

impl<P: Platform> Package<P> {
    /// Creates an empty package on the given platform.
    pub fn new(platform: P) -> Self { Self { platform, modules: LinkedHashMap::new() } }

    /// Platform.
    pub fn platform(&self) -> &P { &self.platform }

    /// Checks that `name` can name a new wrapper module.
    fn check_name(&self, name: String) -> Result<String, PackageError> {
        if !is_verilog_ident(&name) {
            error!("Module name {:?} is not a valid Verilog identifier.", name);
            return Err(PackageError::InvalidModuleName { name });
        }
        if SOURCES.iter().any(|source| source.strip_suffix(".v") == Some(name.as_str())) {
            error!("Module name {} clashes with the wrapped IP.", name);
            return Err(PackageError::ModuleNameClash { name });
        }
        if self.modules.contains_key(&name) {
            return Err(PackageError::DuplicateModule { name });
        }
        Ok(name)
    }

    /// Adds a register slice whose wrapper module is called `name`.
    pub fn add<S: Into<String>>(&mut self, name: S, register: AxiLiteRegister) -> Result<(), PackageError> {
        let name = self.check_name(name.into())?;
        let _ = self.modules.insert(name, register);
        Ok(())
    }

    /// Builds a register slice on the package's platform and adds it.
    pub fn add_register<S: Into<String>>(
        &mut self, name: S, s_axil: &AxiLiteInterface, m_axil: &AxiLiteInterface, config: RegisterConfig,
    ) -> Result<&AxiLiteRegister, PackageError> {
        let name = self.check_name(name.into())?;
        let register = AxiLiteRegister::new(&mut self.platform, s_axil, m_axil, config)?;
        Ok(self.modules.entry(name).or_insert(register))
    }

    /// Register slices, in insertion order.
    pub fn modules(&self) -> impl Iterator<Item = (&str, &AxiLiteRegister)> + '_ {
        self.modules.iter().map(|(name, register)| (name.as_str(), register))
    }

    /// Mutable access to a register slice.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut AxiLiteRegister> { self.modules.get_mut(name) }

    /// Generates Verilog code at the given directory path.
    ///
    /// Writes one `<name>.v` per register slice and a [`SOURCE_LIST`] naming the IP sources followed by the
    /// generated files. Returns the written paths.
    pub fn gen_vir<Q: AsRef<Path>>(&self, path_dir: Q) -> Result<Vec<PathBuf>, PackageError> {
        let path_dir = path_dir.as_ref();
        fs::create_dir_all(path_dir).map_err(|error| PackageError::Fs { error })?;

        let mut generated = Vec::new();
        for (name, register) in self.modules.iter() {
            let path = path_dir.join(format!("{}.v", name));
            let module = register.wrapper_module(name);
            fs::write(&path, format!("{}\n", module.to_string())).map_err(|error| PackageError::Fs { error })?;
            info!("Generated {}.", path.display());
            generated.push(path);
        }

        let sources = self.platform.sources();
        let source_list = path_dir.join(SOURCE_LIST);
        let content = sources.iter().chain(generated.iter()).map(|path| path.display()).join("\n");
        fs::write(&source_list, format!("{}\n", content)).map_err(|error| PackageError::Fs { error })?;
        generated.push(source_list);

        Ok(generated)
    }
}
