// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Write-path operations.
//!
//! Every function takes a `&mut SqliteConnection` and performs a single
//! logical mutation. Multi-table fan-outs (application acceptance,
//! payment recording) run inside a transaction.

pub mod applications;
pub mod bookings;
pub mod packages;
pub mod payments;
pub mod sessions;
pub mod stories;
pub mod users;
