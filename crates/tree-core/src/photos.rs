//! Photo cards distributed over the tree, with the latest upload pinned in front.

use crate::config::Material;
use crate::constants::*;
use crate::entity::{Decoration, Entity};
use crate::instance::InstanceRaw;
use crate::math::{centered_jitter, chaos_position, formed_position, ConeOptions};
use crate::state::Mode;
use fnv::FnvHasher;
use glam::{Mat4, Quat, Vec3};
use std::hash::{Hash, Hasher};

/// References produced by the upload collaborator start with this prefix.
pub const UPLOADED_PREFIX: &str = "blob:";

#[inline]
pub fn is_uploaded(url: &str) -> bool {
    url.starts_with(UPLOADED_PREFIX)
}

/// Build a reference that is recognised as a fresh upload.
pub fn uploaded_ref(name: &str) -> String {
    if is_uploaded(name) {
        name.to_string()
    } else {
        format!("{UPLOADED_PREFIX}{name}")
    }
}

/// Index of the featured card: the last photo, if it was uploaded.
pub fn featured_index(photos: &[String]) -> Option<usize> {
    let last = photos.len().checked_sub(1)?;
    is_uploaded(&photos[last]).then_some(last)
}

/// Load state of a card's image; anything but `Ready` draws the placeholder.
///
/// Images are fetched and decoded by the host, not by this crate. The host
/// reports the outcome through [`PhotoCards::set_image_state`]; until it
/// does, every card stays `Pending` and shows its placeholder tint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CardImage {
    #[default]
    Pending,
    Ready,
    Failed,
}

#[derive(Clone, Debug)]
pub struct PhotoCard {
    pub url: String,
    pub featured: bool,
    pub image: CardImage,
    pub entity: Entity,
}

impl PhotoCard {
    pub fn rate(&self) -> f32 {
        if self.featured {
            FEATURED_CARD_RATE
        } else {
            CARD_RATE
        }
    }
}

const FRAME_MATERIAL: Material = Material {
    color: [1.0, 1.0, 1.0],
    metalness: 0.0,
    roughness: 1.0,
    emissive: [0.0; 3],
    emissive_intensity: 0.0,
    opacity: 1.0,
};

const PLACEHOLDER_MATERIAL: Material = Material {
    color: [0.5, 0.5, 0.5],
    ..FRAME_MATERIAL
};

pub struct PhotoCards {
    cards: Vec<PhotoCard>,
    /// Length of the photo list the cards were built from.
    version: usize,
    frames: Vec<InstanceRaw>,
    panels: Vec<InstanceRaw>,
}

impl PhotoCards {
    pub fn new(photos: &[String]) -> Self {
        let cards = build_cards(photos);
        let mut this = Self {
            version: photos.len(),
            frames: Vec::with_capacity(cards.len()),
            panels: Vec::with_capacity(cards.len()),
            cards,
        };
        this.write_instances();
        this
    }

    /// Rebuild when the photo list grew. Returns `true` on rebuild.
    ///
    /// Image states of cards whose URL survived at the same slot are kept.
    pub fn sync(&mut self, photos: &[String]) -> bool {
        if photos.len() == self.version {
            return false;
        }
        let previous = std::mem::take(&mut self.cards);
        self.cards = build_cards(photos);
        for (card, old) in self.cards.iter_mut().zip(previous.iter()) {
            if card.url == old.url {
                card.image = old.image;
            }
        }
        self.version = photos.len();
        log::info!(
            "[photos] rebuilt {} cards (featured: {:?})",
            self.cards.len(),
            featured_index(photos)
        );
        self.write_instances();
        true
    }

    pub fn tick(&mut self, mode: Mode) {
        for card in &mut self.cards {
            let dest = card.entity.destination(mode);
            let rate = card.rate();
            card.entity.step(dest, rate);
        }
        self.write_instances();
    }

    /// Record the host loader's result for every card showing `url`.
    pub fn set_image_state(&mut self, url: &str, image: CardImage) {
        for card in self.cards.iter_mut().filter(|c| c.url == url) {
            if image == CardImage::Failed && card.image != CardImage::Failed {
                log::warn!("[photos] image unavailable, using placeholder: {}", url);
            }
            card.image = image;
        }
    }

    pub fn cards(&self) -> &[PhotoCard] {
        &self.cards
    }

    pub fn cards_mut(&mut self) -> &mut [PhotoCard] {
        &mut self.cards
    }

    /// White backing quads, one per card.
    pub fn frames(&self) -> &[InstanceRaw] {
        &self.frames
    }

    /// Image panels, drawn slightly in front of the frames.
    pub fn panels(&self) -> &[InstanceRaw] {
        &self.panels
    }

    fn write_instances(&mut self) {
        self.frames.clear();
        self.panels.clear();
        for card in &self.cards {
            let roll = if card.featured {
                0.0
            } else {
                card.entity.decoration.tilt
            };
            let base =
                Mat4::from_rotation_translation(Quat::from_rotation_z(roll), card.entity.current);
            let frame = base
                * Mat4::from_translation(Vec3::new(0.0, 0.0, -0.01))
                * Mat4::from_scale(Vec3::new(CARD_FRAME_SIZE.x, CARD_FRAME_SIZE.y, 1.0));
            let panel = base * Mat4::from_translation(Vec3::new(0.0, CARD_IMAGE_OFFSET_Y, 0.01));
            let panel_material = match card.image {
                CardImage::Ready => FRAME_MATERIAL,
                CardImage::Pending | CardImage::Failed => Material {
                    color: placeholder_tint(&card.url),
                    ..PLACEHOLDER_MATERIAL
                },
            };
            self.frames
                .push(InstanceRaw::from_model(frame, &FRAME_MATERIAL, true));
            self.panels
                .push(InstanceRaw::from_model(panel, &panel_material, true));
        }
    }
}

fn build_cards(photos: &[String]) -> Vec<PhotoCard> {
    let count = photos.len();
    let featured = featured_index(photos);
    let cone = ConeOptions::layered(CARD_LAYERS, CARD_LAYER_GAP, CARD_JITTER);
    photos
        .iter()
        .enumerate()
        .map(|(i, url)| {
            let seed = i as f64;
            let is_featured = featured == Some(i);
            let (formed, chaos) = if is_featured {
                (FEATURED_CARD_POSITION, FEATURED_CARD_POSITION)
            } else {
                (
                    formed_position(i, count, CARD_RADIUS, CARD_HEIGHT, &cone),
                    chaos_position(CARD_CHAOS_RADIUS, Some(seed * 1.91 + 4.0)),
                )
            };
            let decoration = Decoration {
                scale: 1.0,
                rotation: Vec3::ZERO,
                tilt: centered_jitter(seed * 2.73 + 7.0, CARD_TILT_SPAN),
            };
            PhotoCard {
                url: url.clone(),
                featured: is_featured,
                image: CardImage::Pending,
                entity: Entity::new(i, count, formed, chaos).with_decoration(decoration),
            }
        })
        .collect()
}

/// Stable grey-ish tint per URL so placeholders are distinguishable.
fn placeholder_tint(url: &str) -> [f32; 3] {
    let mut hasher = FnvHasher::default();
    url.hash(&mut hasher);
    let h = hasher.finish();
    let channel = |shift: u32| 0.45 + ((h >> shift) & 0xff) as f32 / 255.0 * 0.2;
    [channel(0), channel(8), channel(16)]
}
