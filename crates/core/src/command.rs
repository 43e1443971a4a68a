// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use wayfare_domain::{BookingStatus, Email};

/// A guide's decision on an in-review booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The guide accepts the booking.
    Accepted,
    /// The guide rejects the booking.
    Rejected,
}

impl Decision {
    /// Returns the booking status this decision resolves to.
    #[must_use]
    pub const fn resolved_status(&self) -> BookingStatus {
        match self {
            Self::Accepted => BookingStatus::Accepted,
            Self::Rejected => BookingStatus::Rejected,
        }
    }
}

/// The identity attempting to cancel a booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancellationCaller {
    /// A tourist; must own the booking and may only cancel while pending.
    Tourist(Email),
    /// An admin; may cancel at any state.
    Admin,
}

/// A command represents intent to advance a booking's lifecycle as data only.
///
/// Commands are the only way to request booking state changes; the generic
/// "PATCH any status onto any booking" of the original system does not
/// exist here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingCommand {
    /// A payment settled for this booking; advance `Pending` → `InReview`.
    RecordPayment {
        /// The gateway transaction id to attach to the booking.
        transaction_id: String,
    },
    /// The assigned guide decides an in-review booking.
    Decide {
        /// The guide record id of the caller.
        guide_id: i64,
        /// The decision.
        decision: Decision,
    },
    /// Cancel (delete) the booking.
    Cancel {
        /// Who is cancelling.
        caller: CancellationCaller,
    },
}
