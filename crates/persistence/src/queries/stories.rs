// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;

use wayfare_domain::Story;

use crate::data_models::StoryRow;
use crate::diesel_schema::stories;
use crate::error::PersistenceError;

/// Retrieves a story by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_story(
    conn: &mut SqliteConnection,
    story_id: i64,
) -> Result<Option<Story>, PersistenceError> {
    match stories::table
        .filter(stories::story_id.eq(story_id))
        .select(StoryRow::as_select())
        .first(conn)
    {
        Ok(row) => Ok(Some(row.into_story()?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Lists all stories, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_stories(conn: &mut SqliteConnection) -> Result<Vec<Story>, PersistenceError> {
    let rows: Vec<StoryRow> = stories::table
        .order(stories::story_id.desc())
        .select(StoryRow::as_select())
        .load(conn)?;
    rows.into_iter().map(StoryRow::into_story).collect()
}
