//! Terminal output for tree reports
//!
//! Colors follow NO_COLOR, CLICOLOR and CLICOLOR_FORCE through `colored`.

use std::fmt::Display;

use colored::Colorize;

use crate::arena::NodeId;

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print a tree statistic, `label: value` with a green label
pub fn stat(label: &str, value: &(impl Display + ?Sized)) {
    println!("{}: {}", label.green(), value);
}

/// Print report header (cyan bold)
pub fn header(msg: &(impl Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// One line per reported node: its handle, then the size of its subtree.
pub fn node(id: NodeId, subtree_size: usize) {
    println!("  {} {}", id.to_string().bold(), format!("({subtree_size} nodes)").dimmed());
}

/// A detached subtree root (red -)
pub fn pruned(id: NodeId, subtree_size: usize) {
    println!("  {} {} {}", "-".red(), id, format!("({subtree_size} nodes)").dimmed());
}

/// Print plain output (no color, for rendered trees and payload lists)
pub fn info(msg: &(impl Display + ?Sized)) {
    println!("{}", msg);
}
