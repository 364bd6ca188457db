// Photo cards: featured placement, rebuilds on growth, image states.

use tree_core::constants::FEATURED_CARD_POSITION;
use tree_core::photos::*;
use tree_core::Mode;

fn defaults() -> Vec<String> {
    (1..=7).map(|i| format!("/photos/{i}.jpg")).collect()
}

#[test]
fn featured_card_holds_its_spot_in_both_modes() {
    let mut photos = defaults();
    photos.push(uploaded_ref("holiday.png"));
    let mut cards = PhotoCards::new(&photos);
    let featured = &cards.cards()[7];
    assert!(featured.featured);
    assert_eq!(featured.entity.formed, FEATURED_CARD_POSITION);
    assert_eq!(featured.entity.chaos, FEATURED_CARD_POSITION);

    for mode in [Mode::Chaos, Mode::Formed] {
        for _ in 0..60 {
            cards.tick(mode);
        }
        assert_eq!(cards.cards()[7].entity.current, FEATURED_CARD_POSITION);
    }
    assert_eq!(cards.cards().iter().filter(|c| c.featured).count(), 1);
}

#[test]
fn no_card_is_featured_without_an_upload() {
    let cards = PhotoCards::new(&defaults());
    assert!(cards.cards().iter().all(|c| !c.featured));
}

#[test]
fn featured_card_moves_faster_than_the_rest() {
    let mut photos = defaults();
    photos.push(uploaded_ref("x"));
    let cards = PhotoCards::new(&photos);
    assert!(cards.cards()[7].rate() > cards.cards()[0].rate());
}

#[test]
fn sync_rebuilds_only_when_the_list_grows() {
    let mut photos = defaults();
    let mut cards = PhotoCards::new(&photos);
    assert!(!cards.sync(&photos));
    photos.push(uploaded_ref("new"));
    assert!(cards.sync(&photos));
    assert_eq!(cards.cards().len(), 8);
    assert!(cards.cards()[7].featured);
    assert!(!cards.sync(&photos));
}

#[test]
fn image_state_survives_a_rebuild() {
    let mut photos = defaults();
    let mut cards = PhotoCards::new(&photos);
    cards.set_image_state("/photos/2.jpg", CardImage::Ready);
    cards.set_image_state("/photos/3.jpg", CardImage::Failed);
    photos.push(uploaded_ref("later"));
    cards.sync(&photos);
    assert_eq!(cards.cards()[1].image, CardImage::Ready);
    assert_eq!(cards.cards()[2].image, CardImage::Failed);
    assert_eq!(cards.cards()[7].image, CardImage::Pending);
}

#[test]
fn failed_image_keeps_the_card_drawn() {
    let photos = defaults();
    let mut cards = PhotoCards::new(&photos);
    cards.set_image_state("/photos/1.jpg", CardImage::Failed);
    cards.tick(Mode::Formed);
    assert_eq!(cards.frames().len(), 7);
    assert_eq!(cards.panels().len(), 7);
}

#[test]
fn frames_follow_card_positions() {
    let photos = defaults();
    let mut cards = PhotoCards::new(&photos);
    for _ in 0..10 {
        cards.tick(Mode::Chaos);
    }
    for (card, frame) in cards.cards().iter().zip(cards.frames()) {
        assert!(frame.position().distance(card.entity.current) < 0.05);
    }
}

#[test]
fn uploaded_refs_are_recognised() {
    assert_eq!(uploaded_ref("a.png"), "blob:a.png");
    assert_eq!(uploaded_ref("blob:a.png"), "blob:a.png");
    assert!(is_uploaded("blob:x"));
    assert!(!is_uploaded("/photos/1.jpg"));
    assert_eq!(featured_index(&[]), None);
    assert_eq!(featured_index(&["blob:z".to_string()]), Some(0));
}

#[test]
fn ready_image_replaces_the_placeholder_panel() {
    let photos = defaults();
    let mut cards = PhotoCards::new(&photos);
    let placeholder = cards.panels()[0].color;
    assert_ne!(placeholder, [1.0, 1.0, 1.0, 1.0]);

    cards.set_image_state("/photos/1.jpg", CardImage::Ready);
    cards.tick(Mode::Formed);
    assert_eq!(cards.panels()[0].color, [1.0, 1.0, 1.0, 1.0]);
    // other cards keep their placeholder until the host reports them
    assert_ne!(cards.panels()[1].color, [1.0, 1.0, 1.0, 1.0]);

    cards.set_image_state("/photos/1.jpg", CardImage::Failed);
    cards.tick(Mode::Formed);
    assert_eq!(cards.panels()[0].color, placeholder);
}
