//! AXI-Lite interface descriptors.

use std::fmt;

use serde::Deserialize;

use crate::instance::Direction;
use crate::vir::PortDeclaration;

/// Width of the `bresp` and `rresp` fields.
pub const RESP_WIDTH: usize = 2;

/// Width of the `awprot` and `arprot` fields.
pub const PROT_WIDTH: usize = 3;

/// Clock domain of an interface.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct ClockDomain(String);

impl ClockDomain {
    /// Creates a clock domain.
    pub fn new<S: Into<String>>(name: S) -> Self { Self(name.into()) }

    /// Domain name.
    pub fn name(&self) -> &str { &self.0 }

    /// Clock net.
    pub fn clk(&self) -> String { format!("{}_clk", self.0) }

    /// Reset net.
    pub fn rst(&self) -> String { format!("{}_rst", self.0) }
}

impl Default for ClockDomain {
    fn default() -> Self { Self::new("sys") }
}

impl fmt::Display for ClockDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

/// Side of the bus an interface sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Receives requests, issues responses.
    Slave,

    /// Issues requests, receives responses.
    Master,
}

/// Which way a channel's payload travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Master to slave (aw, w, ar).
    Request,

    /// Slave to master (b, r).
    Response,
}

/// Signal of a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSignal {
    /// Field name, e.g. `addr` or `valid`.
    pub field: &'static str,
    /// Width in bits.
    pub width: usize,
    /// `true` for `ready`, which runs against the payload.
    pub backward: bool,
}

/// One of the five AXI-Lite channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    /// Channel name, e.g. `aw`.
    pub name: &'static str,
    /// Payload direction.
    pub flow: Flow,
    /// Payload fields as `(field, width)`.
    pub payload: Vec<(&'static str, usize)>,
}

impl Channel {
    /// Payload fields followed by `valid` and `ready`.
    pub fn signals(&self) -> Vec<ChannelSignal> {
        self.payload
            .iter()
            .map(|&(field, width)| ChannelSignal { field, width, backward: false })
            .chain([
                ChannelSignal { field: "valid", width: 1, backward: false },
                ChannelSignal { field: "ready", width: 1, backward: true },
            ])
            .collect()
    }

    /// Direction of `signal` on a port of the given role.
    pub fn direction(&self, role: Role, signal: &ChannelSignal) -> Direction {
        let receives = matches!((role, self.flow), (Role::Slave, Flow::Request) | (Role::Master, Flow::Response));
        let dir = if receives { Direction::Input } else { Direction::Output };
        if signal.backward {
            dir.flip()
        } else {
            dir
        }
    }
}

/// AXI-Lite interface descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AxiLiteInterface {
    /// Signal prefix in the enclosing design.
    pub name: String,

    /// Address width in bits.
    pub address_width: usize,

    /// Data width in bits.
    pub data_width: usize,

    /// Clock domain.
    #[serde(default)]
    pub clock_domain: ClockDomain,
}

impl AxiLiteInterface {
    /// Creates a descriptor in the default clock domain.
    pub fn new<S: Into<String>>(name: S, address_width: usize, data_width: usize) -> Self {
        Self { name: name.into(), address_width, data_width, clock_domain: ClockDomain::default() }
    }

    /// Moves the interface into the given clock domain.
    #[must_use]
    pub fn with_clock_domain(self, clock_domain: ClockDomain) -> Self { Self { clock_domain, ..self } }

    /// Width of `wstrb`.
    pub fn strb_width(&self) -> usize { self.data_width / 8 }

    /// Write address channel.
    pub fn aw(&self) -> Channel { Channel { name: "aw", flow: Flow::Request, payload: vec![("addr", self.address_width)] } }

    /// Write data channel.
    pub fn w(&self) -> Channel {
        Channel { name: "w", flow: Flow::Request, payload: vec![("data", self.data_width), ("strb", self.strb_width())] }
    }

    /// Write response channel.
    pub fn b(&self) -> Channel { Channel { name: "b", flow: Flow::Response, payload: vec![("resp", RESP_WIDTH)] } }

    /// Read address channel.
    pub fn ar(&self) -> Channel { Channel { name: "ar", flow: Flow::Request, payload: vec![("addr", self.address_width)] } }

    /// Read data channel.
    pub fn r(&self) -> Channel {
        Channel { name: "r", flow: Flow::Response, payload: vec![("data", self.data_width), ("resp", RESP_WIDTH)] }
    }

    /// All channels in `aw, w, b, ar, r` order.
    pub fn channels(&self) -> [Channel; 5] { [self.aw(), self.w(), self.b(), self.ar(), self.r()] }

    /// Net name of a channel field, e.g. `cpu_awaddr`.
    pub fn net(&self, channel: &str, field: &str) -> String { format!("{}_{}{}", self.name, channel, field) }

    /// Port declarations exposing this interface on a module of the given role.
    pub fn port_decls(&self, role: Role) -> Vec<PortDeclaration> {
        self.channels()
            .iter()
            .flat_map(|channel| {
                channel.signals().into_iter().map(move |signal| {
                    let ident = self.net(channel.name, signal.field);
                    match channel.direction(role, &signal) {
                        Direction::Input => PortDeclaration::input(signal.width, ident),
                        Direction::Output => PortDeclaration::output(signal.width, ident),
                    }
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_domain_nets() {
        let cd = ClockDomain::default();
        assert_eq!(cd.name(), "sys");
        assert_eq!((cd.clk(), cd.rst()), ("sys_clk".to_string(), "sys_rst".to_string()));
    }

    #[test]
    fn channel_layout() {
        let axil = AxiLiteInterface::new("cpu", 20, 64);
        assert_eq!(axil.strb_width(), 8);
        assert_eq!(axil.aw().payload, vec![("addr", 20)]);
        assert_eq!(axil.w().payload, vec![("data", 64), ("strb", 8)]);
        assert_eq!(axil.r().payload, vec![("data", 64), ("resp", 2)]);
        assert_eq!(axil.channels().map(|c| c.name), ["aw", "w", "b", "ar", "r"]);
        assert_eq!(axil.net("aw", "addr"), "cpu_awaddr");
    }

    #[test]
    fn directions_follow_role() {
        let axil = AxiLiteInterface::new("bus", 32, 32);
        let aw = axil.aw();
        let b = axil.b();
        let signals = aw.signals();
        let (addr, ready) = (&signals[0], &signals[2]);

        assert_eq!(aw.direction(Role::Slave, addr), Direction::Input);
        assert_eq!(aw.direction(Role::Slave, ready), Direction::Output);
        assert_eq!(aw.direction(Role::Master, addr), Direction::Output);
        assert_eq!(b.direction(Role::Slave, &b.signals()[0]), Direction::Output);
        assert_eq!(b.direction(Role::Master, &b.signals()[2]), Direction::Output);
    }

    #[test]
    fn slave_port_decls() {
        let decls = AxiLiteInterface::new("s", 16, 32).port_decls(Role::Slave);
        assert_eq!(decls.len(), 17);
        assert_eq!(decls[0], PortDeclaration::input(16, "s_awaddr".into()));
        assert_eq!(decls[2], PortDeclaration::output(1, "s_awready".into()));
        assert_eq!(decls[4], PortDeclaration::input(4, "s_wstrb".into()));
        assert_eq!(decls[16], PortDeclaration::input(1, "s_rready".into()));
    }

    #[test]
    fn deserialize_defaults_clock_domain() {
        let axil: AxiLiteInterface =
            serde_json::from_str(r#"{ "name": "cpu", "address_width": 32, "data_width": 32 }"#).unwrap();
        assert_eq!(axil, AxiLiteInterface::new("cpu", 32, 32));

        let axil: AxiLiteInterface = serde_json::from_str(
            r#"{ "name": "cpu", "address_width": 32, "data_width": 32, "clock_domain": "pcie" }"#,
        )
        .unwrap();
        assert_eq!(axil.clock_domain, ClockDomain::new("pcie"));
    }
}
