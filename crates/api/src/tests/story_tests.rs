// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use wayfare_persistence::Persistence;

use crate::error::ApiError;
use crate::handlers;
use crate::request_response::{RemoveStoryImageRequest, StoryRequest};
use crate::tests::{create_test_persistence, sign_in, test_story_request};

#[test]
fn test_story_author_comes_from_session() {
    let mut persistence: Persistence = create_test_persistence();
    let (_token, author) = sign_in(&mut persistence, "fiona@example.com", "Fiona");

    let story = handlers::create_story(&mut persistence, &author, test_story_request())
        .expect("Publish failed");
    assert_eq!(story.author_email, "fiona@example.com");
    assert_eq!(story.author_name, "Fiona");
    assert_eq!(story.images.len(), 2);
}

#[test]
fn test_stories_list_newest_first() {
    let mut persistence: Persistence = create_test_persistence();
    let (_token, author) = sign_in(&mut persistence, "fiona@example.com", "Fiona");

    let mut first = test_story_request();
    first.title = String::from("First light");
    handlers::create_story(&mut persistence, &author, first).expect("Publish failed");
    let mut second = test_story_request();
    second.title = String::from("Second wind");
    handlers::create_story(&mut persistence, &author, second).expect("Publish failed");

    let stories = handlers::list_stories(&mut persistence)
        .expect("Listing failed")
        .stories;
    assert_eq!(stories.len(), 2);
    assert_eq!(stories[0].title, "Second wind");
    assert_eq!(stories[1].title, "First light");
}

#[test]
fn test_story_rejects_empty_body() {
    let mut persistence: Persistence = create_test_persistence();
    let (_token, author) = sign_in(&mut persistence, "fiona@example.com", "Fiona");

    let result = handlers::create_story(
        &mut persistence,
        &author,
        StoryRequest {
            title: String::from("Untitled"),
            body: String::from("  "),
            images: vec![],
        },
    );
    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { field, .. }) if field == "body"
    ));
}

#[test]
fn test_only_author_may_mutate_story() {
    let mut persistence: Persistence = create_test_persistence();
    let (_token, author) = sign_in(&mut persistence, "fiona@example.com", "Fiona");
    let (_other_token, other) = sign_in(&mut persistence, "hamish@example.com", "Hamish");
    let story = handlers::create_story(&mut persistence, &author, test_story_request())
        .expect("Publish failed");

    let update = handlers::update_story(
        &mut persistence,
        &other,
        story.story_id,
        test_story_request(),
    );
    assert!(matches!(
        update,
        Err(ApiError::Unauthorized { required_role, .. }) if required_role == "story author"
    ));

    let delete = handlers::delete_story(&mut persistence, &other, story.story_id);
    assert!(matches!(delete, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_update_story_keeps_author_identity() {
    let mut persistence: Persistence = create_test_persistence();
    let (_token, author) = sign_in(&mut persistence, "fiona@example.com", "Fiona");
    let story = handlers::create_story(&mut persistence, &author, test_story_request())
        .expect("Publish failed");

    let mut request = test_story_request();
    request.title = String::from("Mist over Glencoe, revisited");
    let updated = handlers::update_story(&mut persistence, &author, story.story_id, request)
        .expect("Update failed");
    assert_eq!(updated.title, "Mist over Glencoe, revisited");
    assert_eq!(updated.author_email, "fiona@example.com");
}

#[test]
fn test_remove_story_image() {
    let mut persistence: Persistence = create_test_persistence();
    let (_token, author) = sign_in(&mut persistence, "fiona@example.com", "Fiona");
    let story = handlers::create_story(&mut persistence, &author, test_story_request())
        .expect("Publish failed");

    let updated = handlers::remove_story_image(
        &mut persistence,
        &author,
        story.story_id,
        RemoveStoryImageRequest {
            image: String::from("https://example.com/mist1.jpg"),
        },
    )
    .expect("Image removal failed");
    assert_eq!(updated.images, vec![String::from("https://example.com/mist2.jpg")]);

    let missing = handlers::remove_story_image(
        &mut persistence,
        &author,
        story.story_id,
        RemoveStoryImageRequest {
            image: String::from("https://example.com/mist1.jpg"),
        },
    );
    assert!(matches!(
        missing,
        Err(ApiError::ResourceNotFound { resource_type, .. }) if resource_type == "Image"
    ));
}

#[test]
fn test_delete_story() {
    let mut persistence: Persistence = create_test_persistence();
    let (_token, author) = sign_in(&mut persistence, "fiona@example.com", "Fiona");
    let story = handlers::create_story(&mut persistence, &author, test_story_request())
        .expect("Publish failed");

    handlers::delete_story(&mut persistence, &author, story.story_id).expect("Delete failed");

    let result = handlers::get_story(&mut persistence, story.story_id);
    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}
