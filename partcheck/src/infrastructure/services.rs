// /////////////////////////////////////////////////////////////////////////////
// partcheck
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Concrete implementations of the domain's service ports.

pub mod filesystem_part_checker;

pub use filesystem_part_checker::FilesystemPartChecker;
