//! axilwrap: validated instantiation of the verilog-axi AXI-Lite register slice.

// # Tries to deny all lints (`rustc -W help`).
#![deny(absolute_paths_not_starting_with_crate)]
#![deny(anonymous_parameters)]
#![deny(explicit_outlives_requirements)]
#![deny(keyword_idents)]
#![deny(macro_use_extern_crate)]
#![deny(missing_debug_implementations)]
#![deny(non_ascii_idents)]
#![deny(rust_2018_idioms)]
#![deny(trivial_numeric_casts)]
#![deny(unsafe_op_in_unsafe_fn)]
#![deny(unused_extern_crates)]
#![deny(unused_import_braces)]
#![deny(unused_qualifications)]
//
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::missing_crate_level_docs)]
#![deny(rustdoc::invalid_codeblock_attributes)]
#![deny(rustdoc::invalid_html_tags)]
#![deny(rustdoc::bare_urls)]
#![deny(unreachable_pub)]

#[macro_use]
pub mod utils;
pub mod axil_register;
pub mod config;
pub mod instance;
pub mod interface;
mod package;
pub mod platform;
pub mod register;
pub mod vir;

pub use axil_register::{AxiError, AxiLiteRegister};
pub use config::PackageConfig;
pub use instance::{Connection, Direction, Instance, PortBinding};
pub use interface::{AxiLiteInterface, ClockDomain, Role};
pub use package::*;
pub use platform::{Platform, SourceRegistry};
pub use register::{RegisterConfig, RegisterType};
