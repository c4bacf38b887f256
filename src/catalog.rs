//! Template definitions and the read-only catalog that holds them.
//!
//! A catalog is built once and handed by reference to the resolver and
//! scorer. Tests and embedders can build their own with [`Catalog::new`];
//! [`Catalog::builtin`] is the stock set.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::constraint::{DEFAULT_TOLERANCE, Orientation, TemplateConstraint};

/// Id of the built-in smart pseudo-template.
pub const SMART_TEMPLATE_ID: &str = "smart-auto";

/// One placement cell within a slotted template.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TemplateSlot {
    /// Unique within its template.
    pub id: String,
    /// Target width / height, > 0.
    pub aspect_ratio: f64,
    /// Grid hint for previews; ignored by matching.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub col_span: Option<u32>,
    /// Grid hint for previews; ignored by matching.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub row_span: Option<u32>,
}

impl TemplateSlot {
    pub fn new(id: impl Into<String>, aspect_ratio: f64) -> Self {
        Self {
            id: id.into(),
            aspect_ratio,
            col_span: None,
            row_span: None,
        }
    }

    pub fn col_span(mut self, span: u32) -> Self {
        self.col_span = Some(span);
        self
    }

    pub fn row_span(mut self, span: u32) -> Self {
        self.row_span = Some(span);
        self
    }
}

/// How a template arranges its images.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum LayoutKind {
    /// Fixed slots, fixed slot count.
    FixedGrid,
    /// One synthesized slot per image, left to right at a common height.
    HorizontalStrip,
    /// One synthesized slot per image, top to bottom at a common width.
    VerticalStrip,
    /// Variable-height column packing.
    Masonry,
    /// Never rendered; always resolves to another template.
    Smart,
}

impl LayoutKind {
    pub fn is_strip(self) -> bool {
        matches!(self, Self::HorizontalStrip | Self::VerticalStrip)
    }

    /// Dynamic kinds delegate to the scorer instead of being rendered.
    pub fn is_dynamic(self) -> bool {
        self == Self::Smart
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::FixedGrid => "fixed-grid",
            Self::HorizontalStrip => "horizontal-strip",
            Self::VerticalStrip => "vertical-strip",
            Self::Masonry => "masonry",
            Self::Smart => "smart",
        }
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A layout template. Immutable once placed in a [`Catalog`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TemplateDefinition {
    pub id: String,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    /// Suggested image count; 0 means any.
    #[cfg_attr(feature = "serde", serde(default))]
    pub recommended_images: usize,
    /// Sizing fallback and scoring target, width / height.
    pub stage_aspect_ratio: f64,
    /// Ordered slots; empty for strips.
    #[cfg_attr(feature = "serde", serde(default))]
    pub slots: Vec<TemplateSlot>,
    pub layout: LayoutKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub constraints: Vec<TemplateConstraint>,
    /// Opaque icon reference for front ends.
    #[cfg_attr(feature = "serde", serde(default))]
    pub icon: String,
}

impl TemplateDefinition {
    /// A template with no slots or constraints. The name defaults to the id.
    pub fn new(id: impl Into<String>, layout: LayoutKind, stage_aspect_ratio: f64) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            description: String::new(),
            recommended_images: 0,
            stage_aspect_ratio,
            slots: Vec::new(),
            layout,
            constraints: Vec::new(),
            icon: String::new(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn recommended_images(mut self, count: usize) -> Self {
        self.recommended_images = count;
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn slot(mut self, slot: TemplateSlot) -> Self {
        self.slots.push(slot);
        self
    }

    pub fn constraint(mut self, constraint: TemplateConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn is_dynamic(&self) -> bool {
        self.layout.is_dynamic()
    }
}

/// Catalog construction error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogError {
    /// Two templates share an id.
    DuplicateId(String),
    /// Two slots of one template share an id.
    DuplicateSlotId { template: String, slot: String },
    /// A slot's aspect ratio is not a finite positive number.
    InvalidSlotRatio { template: String, slot: String },
    /// A template's stage aspect ratio is not a finite positive number.
    InvalidStageRatio(String),
    /// Only smart templates were given; nothing could ever be rendered.
    NoRenderableTemplate,
    /// Catalog JSON could not be parsed.
    #[cfg(feature = "serde")]
    Json(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateId(id) => write!(f, "duplicate template id {id:?}"),
            Self::DuplicateSlotId { template, slot } => {
                write!(f, "template {template:?} has duplicate slot id {slot:?}")
            }
            Self::InvalidSlotRatio { template, slot } => write!(
                f,
                "slot {slot:?} of template {template:?} needs a positive aspect ratio"
            ),
            Self::InvalidStageRatio(id) => {
                write!(f, "template {id:?} needs a positive stage aspect ratio")
            }
            Self::NoRenderableTemplate => f.write_str("catalog has no renderable template"),
            #[cfg(feature = "serde")]
            Self::Json(reason) => write!(f, "invalid catalog JSON: {reason}"),
        }
    }
}

impl core::error::Error for CatalogError {}

/// Read-only registry of templates in declaration order.
#[derive(Clone, Debug, PartialEq)]
pub struct Catalog {
    templates: Vec<TemplateDefinition>,
    /// Index of the safe-default template.
    fallback: usize,
}

impl Catalog {
    /// Validate and wrap a template list.
    pub fn new(templates: Vec<TemplateDefinition>) -> Result<Self, CatalogError> {
        for (i, t) in templates.iter().enumerate() {
            if templates[..i].iter().any(|other| other.id == t.id) {
                return Err(CatalogError::DuplicateId(t.id.clone()));
            }
            if !is_positive_ratio(t.stage_aspect_ratio) {
                return Err(CatalogError::InvalidStageRatio(t.id.clone()));
            }
            for (j, slot) in t.slots.iter().enumerate() {
                if !is_positive_ratio(slot.aspect_ratio) {
                    return Err(CatalogError::InvalidSlotRatio {
                        template: t.id.clone(),
                        slot: slot.id.clone(),
                    });
                }
                if t.slots[..j].iter().any(|other| other.id == slot.id) {
                    return Err(CatalogError::DuplicateSlotId {
                        template: t.id.clone(),
                        slot: slot.id.clone(),
                    });
                }
            }
        }
        let fallback = fallback_index(&templates).ok_or(CatalogError::NoRenderableTemplate)?;
        Ok(Self {
            templates,
            fallback,
        })
    }

    /// The stock catalog: smart, masonry, horizontal strip, vertical strip.
    pub fn builtin() -> Self {
        let templates = builtin_templates();
        // masonry-wide; covered by `builtin_passes_validation`.
        let fallback = fallback_index(&templates).unwrap_or_default();
        Self {
            templates,
            fallback,
        }
    }

    /// Load and validate a JSON array of template definitions.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let templates: Vec<TemplateDefinition> =
            serde_json::from_str(json).map_err(|e| CatalogError::Json(alloc::format!("{e}")))?;
        Self::new(templates)
    }

    /// Every template, smart ones included, in declaration order.
    pub fn templates(&self) -> &[TemplateDefinition] {
        &self.templates
    }

    pub fn get(&self, id: &str) -> Option<&TemplateDefinition> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// Templates that can actually be rendered, in declaration order.
    pub fn renderable(&self) -> impl Iterator<Item = &TemplateDefinition> {
        self.templates.iter().filter(|t| !t.is_dynamic())
    }

    /// Look up a renderable template by id.
    pub fn find_renderable(&self, id: &str) -> Option<&TemplateDefinition> {
        self.renderable().find(|t| t.id == id)
    }

    /// The first smart pseudo-template, if the catalog declares one.
    pub fn smart(&self) -> Option<&TemplateDefinition> {
        self.templates.iter().find(|t| t.is_dynamic())
    }

    /// Whether selecting `id` asks for smart resolution.
    pub fn is_smart_id(&self, id: &str) -> bool {
        id == SMART_TEMPLATE_ID || self.get(id).is_some_and(TemplateDefinition::is_dynamic)
    }

    /// The safe default: first renderable template that is not a strip,
    /// else the first renderable template.
    pub fn fallback(&self) -> &TemplateDefinition {
        &self.templates[self.fallback]
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn is_positive_ratio(ratio: f64) -> bool {
    ratio.is_finite() && ratio > 0.0
}

fn fallback_index(templates: &[TemplateDefinition]) -> Option<usize> {
    let renderable = || {
        templates
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.is_dynamic())
    };
    renderable()
        .find(|(_, t)| !t.layout.is_strip())
        .or_else(|| renderable().next())
        .map(|(i, _)| i)
}

fn builtin_templates() -> Vec<TemplateDefinition> {
    let strip_constraints = |what: &str, orientation: Orientation, axis: &str| {
        [
            TemplateConstraint::min_count(2, alloc::format!("{what} needs at least 2 images.")),
            TemplateConstraint::orientation(
                orientation,
                alloc::format!("{what} only works when every image's long edge is {axis}."),
            ),
            TemplateConstraint::uniform_dimensions(
                DEFAULT_TOLERANCE,
                alloc::format!("{what} needs every image to have the same dimensions."),
            ),
        ]
    };

    let mut horizontal =
        TemplateDefinition::new("horizontal-strip", LayoutKind::HorizontalStrip, 16.0 / 9.0)
            .name("Horizontal strip")
            .description("Full-width side-by-side join")
            .icon("/icons/templates/horizontal-strip.svg");
    horizontal.constraints.extend(strip_constraints(
        "A horizontal strip",
        Orientation::Landscape,
        "horizontal",
    ));

    let mut vertical =
        TemplateDefinition::new("vertical-strip", LayoutKind::VerticalStrip, 9.0 / 16.0)
            .name("Vertical strip")
            .description("Full-height stacked join")
            .icon("/icons/templates/vertical-strip.svg");
    vertical.constraints.extend(strip_constraints(
        "A vertical strip",
        Orientation::Portrait,
        "vertical",
    ));

    alloc::vec![
        TemplateDefinition::new(SMART_TEMPLATE_ID, LayoutKind::Smart, 1.0)
            .name("Smart")
            .description("Pick the best-fitting layout automatically")
            .icon("/icons/templates/smart.svg"),
        TemplateDefinition::new("masonry-wide", LayoutKind::Masonry, 4.0 / 5.0)
            .name("Masonry")
            .description("Three columns, adaptive heights")
            .recommended_images(6)
            .icon("/icons/templates/masonry.svg")
            .slot(TemplateSlot::new("a", 4.0 / 5.0).row_span(2))
            .slot(TemplateSlot::new("b", 3.0 / 4.0))
            .slot(TemplateSlot::new("c", 1.0))
            .slot(TemplateSlot::new("d", 3.0 / 2.0).row_span(2))
            .slot(TemplateSlot::new("e", 4.0 / 3.0))
            .slot(TemplateSlot::new("f", 9.0 / 16.0).row_span(2)),
        horizontal,
        vertical,
    ]
}
