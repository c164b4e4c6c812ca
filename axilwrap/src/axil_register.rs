//! AXI-Lite register slice.
//!
//! Wraps `axil_register` from the verilog-axi library. The slice sits between a slave-side interface (`s_axil`)
//! and a master-side interface (`m_axil`) of the same clock domain and widths, and inserts one configurable
//! register stage into each of the five channels.

use std::fmt;

use thiserror::Error;
use tracing::{error, info};

use crate::instance::*;
use crate::interface::*;
use crate::platform::Platform;
use crate::register::RegisterConfig;
use crate::utils::{is_verilog_ident, join_options};
use crate::vir::{self, PortDeclaration};

/// Name of the wrapped module.
pub const MODULE_NAME: &str = "axil_register";

/// Sources of the wrapped module, in compilation order.
pub const SOURCES: [&str; 3] = ["axil_register_wr.v", "axil_register_rd.v", "axil_register.v"];

#[allow(missing_docs)]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AxiError {
    #[error("different clock domain on AXI-Lite interfaces (slave: {slave} / master: {master}), should be the same")]
    ClockDomainMismatch { slave: ClockDomain, master: ClockDomain },

    #[error("different address width on AXI-Lite interfaces (slave: {slave} / master: {master}), should be the same")]
    AddressWidthMismatch { slave: usize, master: usize },

    #[error("different data width on AXI-Lite interfaces (slave: {slave} / master: {master}), should be the same")]
    DataWidthMismatch { slave: usize, master: usize },

    #[error("AXI-Lite data width {data_width} is not a non-zero multiple of 8")]
    DataWidthGranularity { data_width: usize },

    #[error("AXI-Lite address width must be non-zero")]
    ZeroAddressWidth,

    #[error("slave and master AXI-Lite interfaces are both named `{name}`")]
    SameInterface { name: String },

    #[error("{what} name `{name}` does not yield valid Verilog identifiers")]
    InvalidName { what: &'static str, name: String },

    #[error("instance error: {error}")]
    Instance { error: InstanceError },
}

impl From<InstanceError> for AxiError {
    fn from(error: InstanceError) -> Self { Self::Instance { error } }
}

/// Returns `slave` if both sides agree, logging the outcome.
fn check_same<T, F>(what: &str, slave: &T, master: &T, mismatch: F) -> Result<T, AxiError>
where
    T: PartialEq + Clone + fmt::Display,
    F: FnOnce(T, T) -> AxiError,
{
    if slave != master {
        error!("Different {} on AXI-Lite interfaces (Slave: {} / Master: {}), should be the same.", what, slave, master);
        return Err(mismatch(slave.clone(), master.clone()));
    }
    info!("{}: {}", what, slave);
    Ok(slave.clone())
}

/// Checks that the nets derived from a name are Verilog identifiers.
fn check_name(what: &'static str, name: &str, net: &str) -> Result<(), AxiError> {
    if !is_verilog_ident(net) {
        error!("{} name {:?} yields the invalid Verilog identifier {:?}.", what, name, net);
        return Err(AxiError::InvalidName { what, name: name.to_string() });
    }
    Ok(())
}

/// Binds one side of the slice. `prefix` is the port prefix of the wrapped module.
fn bind_side(inst: &mut Instance, prefix: &str, axil: &AxiLiteInterface, role: Role) -> Result<(), InstanceError> {
    for channel in axil.channels() {
        for signal in channel.signals() {
            let name = format!("{}_{}{}", prefix, channel.name, signal.field);
            let connection = Connection::net(axil.net(channel.name, signal.field));
            inst.add_port(PortBinding {
                name,
                direction: channel.direction(role, &signal),
                width: signal.width,
                connection,
            })?;

            // `prot` follows `addr`. The slave side has no protection info to forward; the master side drops it.
            if signal.field == "addr" {
                let name = format!("{}_{}prot", prefix, channel.name);
                let prot = match role {
                    Role::Slave => {
                        PortBinding::input(name, PROT_WIDTH, Connection::Const { width: PROT_WIDTH, value: 0 })
                    }
                    Role::Master => PortBinding::output(name, PROT_WIDTH, Connection::Open),
                };
                inst.add_port(prot)?;
            }
        }
    }
    Ok(())
}

/// AXI-Lite register slice between two interfaces.
#[derive(Debug, Clone)]
pub struct AxiLiteRegister {
    s_axil: AxiLiteInterface,
    m_axil: AxiLiteInterface,
    config: RegisterConfig,
    instance: Instance,
}

impl AxiLiteRegister {
    /// Validates the interfaces, binds `axil_register` between them and registers its sources with `platform`.
    ///
    /// # Errors
    ///
    /// Fails if the interfaces differ in clock domain, address width or data width, if the data width is not
    /// byte-granular, if both interfaces carry the same name, or if an interface or clock domain name does not
    /// yield valid Verilog identifiers. Nothing is registered on failure.
    pub fn new<P: Platform + ?Sized>(
        platform: &mut P, s_axil: &AxiLiteInterface, m_axil: &AxiLiteInterface, config: RegisterConfig,
    ) -> Result<Self, AxiError> {
        let clock_domain = check_same("Clock Domain", &s_axil.clock_domain, &m_axil.clock_domain, |slave, master| {
            AxiError::ClockDomainMismatch { slave, master }
        })?;
        let address_width =
            check_same("Address Width", &s_axil.address_width, &m_axil.address_width, |slave, master| {
                AxiError::AddressWidthMismatch { slave, master }
            })?;
        let data_width = check_same("Data Width", &s_axil.data_width, &m_axil.data_width, |slave, master| {
            AxiError::DataWidthMismatch { slave, master }
        })?;

        if data_width == 0 || data_width % 8 != 0 {
            error!("AXI-Lite Data Width {} requires byte (8-bit) granularity.", data_width);
            return Err(AxiError::DataWidthGranularity { data_width });
        }
        if address_width == 0 {
            error!("AXI-Lite Address Width must be non-zero.");
            return Err(AxiError::ZeroAddressWidth);
        }
        if s_axil.name == m_axil.name {
            error!("Slave and Master AXI-Lite interfaces are both named {}.", s_axil.name);
            return Err(AxiError::SameInterface { name: s_axil.name.clone() });
        }
        check_name("Clock domain", clock_domain.name(), &clock_domain.clk())?;
        check_name("Slave interface", &s_axil.name, &s_axil.net("aw", "addr"))?;
        check_name("Master interface", &m_axil.name, &m_axil.net("aw", "addr"))?;

        for (channel, typ) in config.channels() {
            info!("{:>2} Reg: {}.", channel.to_uppercase(), typ);
        }

        let inst_name = join_options("_", [
            Some(MODULE_NAME.to_string()),
            Some(s_axil.name.clone()).filter(|name| !name.is_empty()),
            Some(m_axil.name.clone()).filter(|name| !name.is_empty()),
        ])
        .unwrap_or_else(|| MODULE_NAME.to_string());
        let mut instance = Instance::new(MODULE_NAME, inst_name);

        instance.add_param("DATA_WIDTH", data_width)?;
        instance.add_param("ADDR_WIDTH", address_width)?;
        for (channel, typ) in config.channels() {
            instance.add_param(format!("{}_REG_TYPE", channel.to_uppercase()), typ.value())?;
        }

        instance.add_port(PortBinding::input("clk", 1, Connection::net(clock_domain.clk())))?;
        instance.add_port(PortBinding::input("rst", 1, Connection::net(clock_domain.rst())))?;
        bind_side(&mut instance, "s_axil", s_axil, Role::Slave)?;
        bind_side(&mut instance, "m_axil", m_axil, Role::Master)?;

        Self::add_sources(platform);

        Ok(Self { s_axil: s_axil.clone(), m_axil: m_axil.clone(), config, instance })
    }

    /// Registers the sources of `axil_register` with `platform`.
    pub fn add_sources<P: Platform + ?Sized>(platform: &mut P) {
        for source in SOURCES {
            let path = platform.rtl_dir().join(source);
            platform.add_source(path);
        }
    }

    /// Renames the instance.
    #[must_use]
    pub fn with_inst_name<S: Into<String>>(mut self, inst_name: S) -> Self {
        self.instance.set_inst_name(inst_name);
        self
    }

    /// Instance binding.
    pub fn instance(&self) -> &Instance { &self.instance }

    /// Bound parameters.
    pub fn params(&self) -> impl Iterator<Item = (&str, usize)> + '_ { self.instance.params() }

    /// Binding of the given port.
    pub fn port(&self, name: &str) -> Option<&PortBinding> { self.instance.port(name) }

    /// Slave-side interface.
    pub fn s_axil(&self) -> &AxiLiteInterface { &self.s_axil }

    /// Master-side interface.
    pub fn m_axil(&self) -> &AxiLiteInterface { &self.m_axil }

    /// Register modes.
    pub fn config(&self) -> &RegisterConfig { &self.config }

    /// Shared clock domain.
    pub fn clock_domain(&self) -> &ClockDomain { &self.s_axil.clock_domain }

    /// Standalone module named `name` exposing both interfaces and instantiating the slice.
    pub fn wrapper_module(&self, name: &str) -> vir::Module {
        let clock_domain = self.clock_domain();
        let port_decls = [
            vec![PortDeclaration::input(1, clock_domain.clk()), PortDeclaration::input(1, clock_domain.rst())],
            self.s_axil.port_decls(Role::Slave),
            self.m_axil.port_decls(Role::Master),
        ]
        .concat();

        let comment = format!(
            "AXI-Lite register slice ({} -> {}).\nAW: {}, W: {}, B: {}, AR: {}, R: {}",
            self.s_axil.name,
            self.m_axil.name,
            self.config.aw,
            self.config.w,
            self.config.b,
            self.config.ar,
            self.config.r,
        );

        vir::Module {
            name: name.to_string(),
            port_decls,
            module_items: vec![vir::ModuleItem::Commented(comment, None, vec![vir::ModuleItem::ModuleInstantiation(
                (&self.instance).into(),
            )])],
        }
    }
}
