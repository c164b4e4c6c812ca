//! Hardware-instance binding of an external Verilog module.

use linked_hash_map::LinkedHashMap;
use thiserror::Error;

use crate::utils::bin_literal;
use crate::vir;

#[allow(missing_docs)]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InstanceError {
    #[error("parameter `{name}` is bound twice on instance `{inst_name}`")]
    DuplicateParam { inst_name: String, name: String },

    #[error("port `{name}` is bound twice on instance `{inst_name}`")]
    DuplicatePort { inst_name: String, name: String },

    #[error("port `{name}` is {width} bits wide but is tied to a {const_width}-bit constant")]
    ConstWidth { name: String, width: usize, const_width: usize },

    #[error("input port `{name}` cannot be left open")]
    OpenInput { name: String },
}

/// Port direction, seen from the instantiated module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Input.
    Input,

    /// Output.
    Output,
}

impl Direction {
    /// Returns the opposite direction.
    #[must_use]
    pub const fn flip(self) -> Self {
        match self {
            Self::Input => Self::Output,
            Self::Output => Self::Input,
        }
    }
}

/// What a port is connected to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Connection {
    /// A net of the enclosing design.
    Net(String),

    /// A constant.
    Const {
        /// Width in bits.
        width: usize,
        /// Value.
        value: u64,
    },

    /// Unconnected.
    Open,
}

impl Connection {
    /// Net connection.
    pub fn net<S: Into<String>>(name: S) -> Self { Self::Net(name.into()) }

    fn to_expr(&self) -> Option<vir::Expression> {
        match self {
            Self::Net(name) => Some(vir::Expression::ident(name.clone())),
            Self::Const { width, value } => Some(vir::Expression::number(bin_literal(*width, *value))),
            Self::Open => None,
        }
    }
}

/// Binding of one port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortBinding {
    /// Port name.
    pub name: String,
    /// Direction.
    pub direction: Direction,
    /// Width in bits.
    pub width: usize,
    /// Connection.
    pub connection: Connection,
}

impl PortBinding {
    /// Input port.
    pub fn input<S: Into<String>>(name: S, width: usize, connection: Connection) -> Self {
        Self { name: name.into(), direction: Direction::Input, width, connection }
    }

    /// Output port.
    pub fn output<S: Into<String>>(name: S, width: usize, connection: Connection) -> Self {
        Self { name: name.into(), direction: Direction::Output, width, connection }
    }
}

/// Instance of an external module with named parameters and ports.
///
/// Parameters and ports are emitted in insertion order.
#[derive(Debug, Clone)]
pub struct Instance {
    module_name: String,
    inst_name: String,
    params: LinkedHashMap<String, usize>,
    ports: LinkedHashMap<String, PortBinding>,
}

impl Instance {
    /// Creates an instance with no bindings.
    pub fn new<S: Into<String>, T: Into<String>>(module_name: S, inst_name: T) -> Self {
        Self {
            module_name: module_name.into(),
            inst_name: inst_name.into(),
            params: LinkedHashMap::new(),
            ports: LinkedHashMap::new(),
        }
    }

    /// Module name.
    pub fn module_name(&self) -> &str { &self.module_name }

    /// Instance name.
    pub fn inst_name(&self) -> &str { &self.inst_name }

    /// Renames the instance.
    pub fn set_inst_name<S: Into<String>>(&mut self, inst_name: S) { self.inst_name = inst_name.into(); }

    /// Binds a parameter.
    pub fn add_param<S: Into<String>>(&mut self, name: S, value: usize) -> Result<(), InstanceError> {
        let name = name.into();
        if self.params.contains_key(&name) {
            return Err(InstanceError::DuplicateParam { inst_name: self.inst_name.clone(), name });
        }
        let _ = self.params.insert(name, value);
        Ok(())
    }

    /// Binds a port.
    pub fn add_port(&mut self, port: PortBinding) -> Result<(), InstanceError> {
        if self.ports.contains_key(&port.name) {
            return Err(InstanceError::DuplicatePort { inst_name: self.inst_name.clone(), name: port.name });
        }
        match port.connection {
            Connection::Const { width, .. } if width != port.width => {
                return Err(InstanceError::ConstWidth { name: port.name, width: port.width, const_width: width });
            }
            Connection::Open if port.direction == Direction::Input => {
                return Err(InstanceError::OpenInput { name: port.name });
            }
            _ => {}
        }
        let _ = self.ports.insert(port.name.clone(), port);
        Ok(())
    }

    /// Parameters, in binding order.
    pub fn params(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.params.iter().map(|(name, value)| (name.as_str(), *value))
    }

    /// Value of the given parameter.
    pub fn param(&self, name: &str) -> Option<usize> { self.params.get(name).copied() }

    /// Ports, in binding order.
    pub fn ports(&self) -> impl Iterator<Item = &PortBinding> + '_ { self.ports.values() }

    /// Binding of the given port.
    pub fn port(&self, name: &str) -> Option<&PortBinding> { self.ports.get(name) }
}

impl From<&Instance> for vir::ModuleInstantiation {
    fn from(inst: &Instance) -> Self {
        vir::ModuleInstantiation::new(
            inst.module_name.clone(),
            inst.inst_name.clone(),
            inst.params.iter().map(|(name, value)| (name.clone(), *value)).collect(),
            inst.ports.values().map(|port| (port.name.clone(), port.connection.to_expr())).collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inst() -> Instance {
        let mut inst = Instance::new("foo", "foo_inst");
        inst.add_param("WIDTH", 8).unwrap();
        inst.add_port(PortBinding::input("a", 8, Connection::net("x"))).unwrap();
        inst.add_port(PortBinding::input("b", 3, Connection::Const { width: 3, value: 5 })).unwrap();
        inst.add_port(PortBinding::output("c", 1, Connection::Open)).unwrap();
        inst
    }

    #[test]
    fn keeps_binding_order() {
        let inst = inst();
        assert_eq!(inst.ports().map(|port| port.name.as_str()).collect::<Vec<_>>(), ["a", "b", "c"]);
        assert_eq!(inst.params().collect::<Vec<_>>(), [("WIDTH", 8)]);
        assert_eq!(inst.port("b").map(|port| port.direction), Some(Direction::Input));
    }

    #[test]
    fn rejects_duplicates() {
        let mut inst = inst();
        assert_eq!(
            inst.add_param("WIDTH", 16),
            Err(InstanceError::DuplicateParam { inst_name: "foo_inst".into(), name: "WIDTH".into() })
        );
        assert_eq!(
            inst.add_port(PortBinding::output("a", 8, Connection::net("y"))),
            Err(InstanceError::DuplicatePort { inst_name: "foo_inst".into(), name: "a".into() })
        );
        assert_eq!(inst.param("WIDTH"), Some(8));
    }

    #[test]
    fn rejects_bad_connections() {
        let mut inst = Instance::new("foo", "foo_inst");
        assert_eq!(
            inst.add_port(PortBinding::input("p", 3, Connection::Const { width: 2, value: 0 })),
            Err(InstanceError::ConstWidth { name: "p".into(), width: 3, const_width: 2 })
        );
        assert_eq!(
            inst.add_port(PortBinding::input("q", 1, Connection::Open)),
            Err(InstanceError::OpenInput { name: "q".into() })
        );
    }

    #[test]
    fn lowers_to_verilog() {
        let vir: vir::ModuleInstantiation = (&inst()).into();
        assert_eq!(vir.port_connections, vec![
            ("a".to_string(), Some(vir::Expression::ident("x".into()))),
            ("b".to_string(), Some(vir::Expression::number("3'b101".into()))),
            ("c".to_string(), None),
        ]);
        assert_eq!(vir.params, vec![("WIDTH".to_string(), 8)]);
    }
}
