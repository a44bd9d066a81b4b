// /////////////////////////////////////////////////////////////////////////////
// partcheck
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Application layer: use cases orchestrating the domain's Resize and
//! PartChecker services against concrete infrastructure adapters.

pub mod commands;
pub mod use_cases;
