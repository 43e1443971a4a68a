// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;

use wayfare_domain::Story;

use crate::data_models::encode_string_list;
use crate::diesel_schema::stories;
use crate::error::PersistenceError;
use crate::sqlite::get_last_insert_rowid;

/// Inserts a new story.
///
/// # Returns
///
/// The generated story id.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn create_story(conn: &mut SqliteConnection, story: &Story) -> Result<i64, PersistenceError> {
    let images_json: String = encode_string_list(&story.images)?;
    diesel::insert_into(stories::table)
        .values((
            stories::title.eq(&story.title),
            stories::body.eq(&story.body),
            stories::images_json.eq(&images_json),
            stories::author_email.eq(story.author_email.value()),
            stories::author_name.eq(&story.author_name),
            stories::author_photo.eq(story.author_photo.as_deref()),
        ))
        .execute(conn)?;
    get_last_insert_rowid(conn)
}

/// Updates a story's content fields.
///
/// Author identity fields are immutable after creation.
///
/// # Errors
///
/// Returns `NotFound` if no story with the given id exists.
pub fn update_story(
    conn: &mut SqliteConnection,
    story_id: i64,
    story: &Story,
) -> Result<(), PersistenceError> {
    let images_json: String = encode_string_list(&story.images)?;
    let updated: usize = diesel::update(stories::table.filter(stories::story_id.eq(story_id)))
        .set((
            stories::title.eq(&story.title),
            stories::body.eq(&story.body),
            stories::images_json.eq(&images_json),
        ))
        .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Story {story_id} not found"
        )));
    }
    Ok(())
}

/// Deletes a story.
///
/// # Errors
///
/// Returns `NotFound` if no story with the given id exists.
pub fn delete_story(conn: &mut SqliteConnection, story_id: i64) -> Result<(), PersistenceError> {
    let deleted: usize =
        diesel::delete(stories::table.filter(stories::story_id.eq(story_id))).execute(conn)?;
    if deleted == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Story {story_id} not found"
        )));
    }
    Ok(())
}
