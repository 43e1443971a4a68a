// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use wayfare_domain::{GuideApplication, Role, TourGuide, User};

/// The three writes an application acceptance performs, as data.
///
/// Acceptance is a fan-out: promote the applicant's user record, insert
/// the tour-guide profile, delete the application. The persistence layer
/// executes all three inside a single transaction so partial failure
/// cannot leave a promoted user with a lingering application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptancePlan {
    /// The user to promote.
    pub user_id: i64,
    /// The role to write onto the user record.
    pub new_role: Role,
    /// The tour-guide profile to insert, keyed by `user_id`.
    pub guide_record: TourGuide,
    /// The application to delete.
    pub application_id: i64,
}

/// Builds the acceptance plan for a guide application.
///
/// # Arguments
///
/// * `application` - The pending application
/// * `applicant` - The applicant's current user record, resolved by email
///
/// # Returns
///
/// * `Ok(AcceptancePlan)` describing the transactional fan-out
/// * `Err(CoreError)` if the inputs are inconsistent
///
/// # Errors
///
/// Returns an error if:
/// - The application or user has not been persisted (no id)
/// - The user's email does not match the application's applicant email
pub fn plan_acceptance(
    application: &GuideApplication,
    applicant: &User,
) -> Result<AcceptancePlan, CoreError> {
    let application_id: i64 = application
        .application_id
        .ok_or(CoreError::UnpersistedEntity {
            entity: "Guide application",
        })?;
    let user_id: i64 = applicant.user_id.ok_or(CoreError::UnpersistedEntity {
        entity: "User",
    })?;

    if applicant.email != application.applicant_email {
        return Err(CoreError::ApplicantMismatch {
            application_email: application.applicant_email.clone(),
            user_email: applicant.email.clone(),
        });
    }

    let guide_record: TourGuide = TourGuide {
        guide_id: None,
        user_id,
        email: application.applicant_email.clone(),
        name: application.applicant_name.clone(),
        photo: application.applicant_photo.clone(),
        experience: application.experience.clone(),
        specialty: application.specialty.clone(),
        languages: application.languages.clone(),
    };

    Ok(AcceptancePlan {
        user_id,
        new_role: Role::TourGuide,
        guide_record,
        application_id,
    })
}
