// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One module per `mr` subcommand, mirroring how a driver program's run
//! function is threaded through each.

pub mod master;
pub mod run;
pub mod worker;
