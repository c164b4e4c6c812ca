//! Verilog IR.

use crate::utils::indent;

const INDENT: usize = 4;

/// Module.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Module {
    /// Module name.
    pub name: String,

    /// Port declarations.
    pub port_decls: Vec<PortDeclaration>,

    /// Module items.
    pub module_items: Vec<ModuleItem>,
}

impl ToString for Module {
    fn to_string(&self) -> String {
        format!(
            "`resetall\n`timescale 1ns / 1ps\n`default_nettype none\n\nmodule {}\n(\n{}\n);\n\n{}\n\nendmodule\n\n`resetall",
            self.name,
            indent(
                self.port_decls.iter().map(|port_decl| port_decl.to_string()).collect::<Vec<_>>().join(",\n"),
                INDENT
            ),
            gen_verilog_module(&self.module_items)
        )
    }
}

/// Module item.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ModuleItem {
    /// Module instantiation.
    ModuleInstantiation(ModuleInstantiation),

    /// Comment. (Comment before modules, comment after modules, modules)
    Commented(String, Option<String>, Vec<ModuleItem>),
}

impl ToString for ModuleItem {
    fn to_string(&self) -> String {
        match self {
            ModuleItem::ModuleInstantiation(module_inst) => module_inst.to_string(),
            ModuleItem::Commented(comment_before, comment_after, items) => {
                format!(
                    "/*\n{}\n*/\n{}{}",
                    indent(comment_before.clone(), INDENT),
                    items.iter().map(|item| item.to_string()).collect::<Vec<_>>().join("\n\n"),
                    comment_after.as_ref().map_or("".to_string(), |c| format!("\n/* {} */", c))
                )
            }
        }
    }
}

/// Generates Verilog code for module items.
pub fn gen_verilog_module(module: &[ModuleItem]) -> String {
    module.iter().map(|item| item.to_string()).collect::<Vec<_>>().join("\n\n")
}

/// Port declaration.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum PortDeclaration {
    /// Input declaration.
    Input(usize, String),

    /// Output declaration.
    Output(usize, String),
}

impl ToString for PortDeclaration {
    fn to_string(&self) -> String {
        let (dir, width, ident) = match self {
            Self::Input(width, ident) => ("input ", width, ident),
            Self::Output(width, ident) => ("output", width, ident),
        };
        if *width > 1 {
            format!("{} wire [{}-1:0] {}", dir, width, ident)
        } else {
            format!("{} wire {}", dir, ident)
        }
    }
}

impl PortDeclaration {
    /// Creates new input port declaration.
    pub fn input(width: usize, ident: String) -> Self { Self::Input(width, ident) }

    /// Creates new output port declaration.
    pub fn output(width: usize, ident: String) -> Self { Self::Output(width, ident) }

    /// Returns the declared identifier.
    pub fn ident(&self) -> &str {
        match self {
            Self::Input(_, ident) | Self::Output(_, ident) => ident,
        }
    }
}

/// Module instantiation.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ModuleInstantiation {
    /// Module name.
    pub module_name: String,

    /// Inst name.
    pub inst_name: String,

    /// Params.
    pub params: Vec<(String, usize)>,

    /// Port connections. `None` leaves the port unconnected.
    pub port_connections: Vec<(String, Option<Expression>)>,
}

impl ToString for ModuleInstantiation {
    fn to_string(&self) -> String {
        let params = if self.params.is_empty() {
            " ".to_string()
        } else {
            format!(
                " #(\n{}\n)\n",
                self.params
                    .iter()
                    .map(|(name, value)| format!("    .{}({})", name, value))
                    .collect::<Vec<_>>()
                    .join(",\n")
            )
        };

        format!(
            "{}{}{} (\n{}\n);",
            self.module_name,
            params,
            self.inst_name,
            self.port_connections
                .iter()
                .map(|(port_name, expr)| {
                    format!("    .{}({})", port_name, expr.as_ref().map_or("".to_string(), |e| e.to_string()))
                })
                .collect::<Vec<_>>()
                .join(",\n")
        )
    }
}

impl ModuleInstantiation {
    /// Creates new module instantiation.
    pub fn new(
        module_name: String, inst_name: String, params: Vec<(String, usize)>,
        port_connections: Vec<(String, Option<Expression>)>,
    ) -> Self {
        Self { module_name, inst_name, params, port_connections }
    }
}

/// Expression.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum Expression {
    /// Number.
    Number(String),

    /// Identifier.
    Identifier(String),
}

impl ToString for Expression {
    fn to_string(&self) -> String {
        match self {
            Self::Number(num) => num.clone(),
            Self::Identifier(ident) => ident.clone(),
        }
    }
}

impl From<String> for Expression {
    fn from(ident: String) -> Self { Expression::ident(ident) }
}

impl Expression {
    /// Number.
    pub fn number(num: String) -> Self { Self::Number(num) }

    /// Identifier.
    pub fn ident(ident: String) -> Self { Self::Identifier(ident) }
}
