//! Utilities.

use std::iter::IntoIterator;

/// Combines all elements into one String, separated by `sep`. Returns `None` if all elements are `None`.
pub fn join_options<I>(sep: &str, iterable: I) -> Option<String>
where I: IntoIterator<Item = Option<String>> {
    let iterable = iterable.into_iter().flatten().collect::<Vec<_>>();
    if iterable.is_empty() {
        None
    } else {
        Some(iterable.join(sep))
    }
}

/// Indents every line in the string.
pub fn indent(str: String, indent: usize) -> String {
    str.lines().map(|l| format!("{}{}", " ".repeat(indent), l)).collect::<Vec<_>>().join("\n")
}

/// Returns the sized binary literal of `value`, e.g. `3'b000`.
///
/// Bits of `value` above `width` are dropped.
pub fn bin_literal(width: usize, value: u64) -> String {
    let bits = (0..width).rev().map(|i| if i < 64 && (value >> i) & 1 == 1 { '1' } else { '0' }).collect::<String>();
    format!("{}'b{}", width, bits)
}

/// Verilog keywords that cannot name a module, instance or net.
const VERILOG_KEYWORDS: [&str; 24] = [
    "always", "assign", "begin", "case", "default", "else", "end", "endcase", "endmodule", "for", "function",
    "generate", "genvar", "if", "initial", "inout", "input", "integer", "localparam", "module", "output",
    "parameter", "reg", "wire",
];

/// Returns `true` if `ident` is a simple Verilog identifier: `[A-Za-z_][A-Za-z0-9_$]*`, not a keyword.
pub fn is_verilog_ident(ident: &str) -> bool {
    let mut chars = ident.chars();
    let head = match chars.next() {
        Some(head) => head,
        None => return false,
    };
    (head.is_ascii_alphabetic() || head == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        && !VERILOG_KEYWORDS.contains(&ident)
}

/// Some or executing the given expression.
#[macro_export]
macro_rules! some_or {
    ($e:expr, $err:expr) => {{
        match $e {
            Some(r) => r,
            None => $err,
        }
    }};
}
