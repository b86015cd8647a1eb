use crate::dataset::{Dataset, ProgramRecord};
use crate::geo::LatLng;

/// Everything the detail page shows for one program. Optional sections are
/// `None` or empty when the record lacks them.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramDetail<'a> {
    pub record: &'a ProgramRecord,
    pub hero_image: Option<&'a str>,
    pub gallery: &'a [String],
    pub maps_url: String,
    pub video_url: Option<&'a str>,
    pub details_url: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailView<'a> {
    Found(ProgramDetail<'a>),
    NotFound { requested_id: String },
}

impl DetailView<'_> {
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

pub fn maps_search_url(position: LatLng) -> String {
    format!(
        "https://www.google.com/maps/search/?api=1&query={},{}",
        position.lat, position.lng
    )
}

pub fn resolve_detail<'a>(dataset: &'a Dataset, id: &str) -> DetailView<'a> {
    let Some(record) = dataset.get(id) else {
        tracing::debug!(id, "detail requested for unknown program");
        return DetailView::NotFound {
            requested_id: id.to_string(),
        };
    };

    let gallery: &[String] = if record.images.len() > 1 {
        &record.images[1..]
    } else {
        &[]
    };

    DetailView::Found(ProgramDetail {
        record,
        hero_image: record.hero_image(),
        gallery,
        maps_url: maps_search_url(record.position()),
        video_url: record.video_url.as_deref().filter(|url| !url.is_empty()),
        details_url: record.details_url.as_deref().filter(|url| !url.is_empty()),
    })
}
