// /////////////////////////////////////////////////////////////////////////////
// partcheck
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Domain services: the Resize scheduling algorithms and the `PartChecker`
//! port, both free of any actual I/O.

mod part_checker;
mod resize;

pub use part_checker::{CancellationToken, CheckRequest, MarkFileExtension, PartChecker};
pub use resize::{EventDrivenResize, StatelessResize, Verdict};
