//! Process exit codes for the `smithtree` binary, taken from BSD sysexits.h.
//!
//! Only the codes a command can actually produce are listed; success exits 0.

/// Bad flag combination, e.g. a zero payload modulo or an empty tree request.
pub const USAGE: i32 = 64;

/// A config file was read but its contents did not parse.
pub const DATAERR: i32 = 65;

/// A tree invariant was violated while building or editing the tree.
pub const SOFTWARE: i32 = 70;

/// A config file named on the command line could not be read.
pub const IOERR: i32 = 74;

/// Layering the config sources failed or the result could not be written out.
pub const CONFIG: i32 = 78;
