// /////////////////////////////////////////////////////////////////////////////
// partcheck
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Runtime wiring for the Resize dataflow operator: the concrete
//! single-slot channel implementing the domain's port traits.

pub mod channel_port;
