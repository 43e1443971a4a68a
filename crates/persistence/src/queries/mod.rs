// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-path operations.
//!
//! Every function takes a `&mut SqliteConnection`, selects with
//! `as_select()` row structs, and converts to domain types before
//! returning. Single-record lookups return `Ok(None)` for a missing
//! row rather than an error.

pub mod applications;
pub mod bookings;
pub mod packages;
pub mod payments;
pub mod sessions;
pub mod stories;
pub mod tour_guides;
pub mod users;
