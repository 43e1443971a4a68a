// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use tracing::{debug, info};

use wayfare::AcceptancePlan;
use wayfare_domain::{GuideApplication, TourGuide};

use crate::data_models::{TourGuideRow, encode_string_list};
use crate::diesel_schema::{guide_applications, tour_guides, users};
use crate::error::PersistenceError;
use crate::sqlite::get_last_insert_rowid;

/// Inserts a new guide application.
///
/// # Returns
///
/// The generated application id.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn create_application(
    conn: &mut SqliteConnection,
    application: &GuideApplication,
) -> Result<i64, PersistenceError> {
    debug!(
        "Creating guide application for: {}",
        application.applicant_email
    );

    let languages_json: String = encode_string_list(&application.languages)?;
    diesel::insert_into(guide_applications::table)
        .values((
            guide_applications::applicant_email.eq(application.applicant_email.value()),
            guide_applications::applicant_name.eq(&application.applicant_name),
            guide_applications::applicant_photo.eq(application.applicant_photo.as_deref()),
            guide_applications::motivation.eq(&application.motivation),
            guide_applications::experience.eq(&application.experience),
            guide_applications::specialty.eq(&application.specialty),
            guide_applications::languages_json.eq(&languages_json),
            guide_applications::cv_link.eq(&application.cv_link),
            guide_applications::submitted_at.eq(&application.submitted_at),
        ))
        .execute(conn)?;
    get_last_insert_rowid(conn)
}

/// Deletes a guide application.
///
/// Deletion doubles as rejection: applications carry no stored terminal
/// state.
///
/// # Errors
///
/// Returns `NotFound` if no application with the given id exists.
pub fn delete_application(
    conn: &mut SqliteConnection,
    application_id: i64,
) -> Result<(), PersistenceError> {
    let deleted: usize = diesel::delete(
        guide_applications::table.filter(guide_applications::application_id.eq(application_id)),
    )
    .execute(conn)?;
    if deleted == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Application {application_id} not found"
        )));
    }
    Ok(())
}

/// Applies an acceptance plan atomically.
///
/// In one transaction: promotes the user's role, creates the guide
/// record (or reuses one already keyed to the user), and removes the
/// application. Either every effect lands or none does.
///
/// # Returns
///
/// The persisted guide record.
///
/// # Errors
///
/// Returns an error if any step fails; the transaction is rolled back.
pub fn accept_application(
    conn: &mut SqliteConnection,
    plan: &AcceptancePlan,
) -> Result<TourGuide, PersistenceError> {
    conn.transaction::<TourGuide, PersistenceError, _>(|conn| {
        let promoted: usize =
            diesel::update(users::table.filter(users::user_id.eq(plan.user_id)))
                .set(users::role.eq(plan.new_role.as_str()))
                .execute(conn)?;
        if promoted == 0 {
            return Err(PersistenceError::NotFound(format!(
                "User {} not found",
                plan.user_id
            )));
        }

        // user_id is unique on tour_guides, so a retried acceptance
        // reuses the existing record instead of duplicating it
        let existing: Option<TourGuideRow> = match tour_guides::table
            .filter(tour_guides::user_id.eq(plan.user_id))
            .select(TourGuideRow::as_select())
            .first(conn)
        {
            Ok(row) => Some(row),
            Err(diesel::result::Error::NotFound) => None,
            Err(e) => return Err(e.into()),
        };

        let guide: TourGuide = match existing {
            Some(row) => row.into_tour_guide()?,
            None => {
                let languages_json: String = encode_string_list(&plan.guide_record.languages)?;
                diesel::insert_into(tour_guides::table)
                    .values((
                        tour_guides::user_id.eq(plan.guide_record.user_id),
                        tour_guides::email.eq(plan.guide_record.email.value()),
                        tour_guides::name.eq(&plan.guide_record.name),
                        tour_guides::photo.eq(plan.guide_record.photo.as_deref()),
                        tour_guides::experience.eq(&plan.guide_record.experience),
                        tour_guides::specialty.eq(&plan.guide_record.specialty),
                        tour_guides::languages_json.eq(&languages_json),
                    ))
                    .execute(conn)?;
                let guide_id: i64 = get_last_insert_rowid(conn)?;
                let mut record: TourGuide = plan.guide_record.clone();
                record.guide_id = Some(guide_id);
                record
            }
        };

        diesel::delete(
            guide_applications::table
                .filter(guide_applications::application_id.eq(plan.application_id)),
        )
        .execute(conn)?;

        info!(
            user_id = plan.user_id,
            application_id = plan.application_id,
            "Application accepted and user promoted"
        );
        Ok(guide)
    })
}
