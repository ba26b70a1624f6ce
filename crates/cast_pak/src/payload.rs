use serde::{Deserialize, Serialize};

/// Number of glyph slots in a bitmap font.
pub const GLYPH_COUNT: usize = 255;

/// A glyph's rectangle inside the font's glyph sheet, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct GlyphBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// A decoded image, RGBA8, row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct PixmapPayload {
    pub id: String,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct FontPayload {
    pub id: String,
    pub glyph_sheet: PixmapPayload,

    /// Always [`GLYPH_COUNT`] entries, indexed by character code.
    pub glyph_boxes: Vec<GlyphBox>,
    pub pre_spacing: Vec<i32>,
    pub post_spacing: Vec<i32>,
}

impl FontPayload {
    /// A font with every glyph slot zeroed.
    pub fn empty(id: impl Into<String>, glyph_sheet: PixmapPayload) -> Self {
        Self {
            id: id.into(),
            glyph_sheet,
            glyph_boxes: vec![GlyphBox::default(); GLYPH_COUNT],
            pre_spacing: vec![0; GLYPH_COUNT],
            post_spacing: vec![0; GLYPH_COUNT],
        }
    }
}

/// A texture sampler declared by a fragment shader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct ShaderSampler {
    pub name: String,
    pub index: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct ShaderPayload {
    pub id: String,
    pub vertex_bytecode: Vec<u8>,
    pub fragment_bytecode: Vec<u8>,
    pub samplers: Vec<ShaderSampler>,
    pub params: Vec<String>,
}

/// A text file, blank lines dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct TextPayload {
    pub id: String,
    pub lines: Vec<String>,
}

/// A compiled resource, as stored inside a [`Pak`](crate::Pak).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub enum ResourcePayload {
    Pixmap(PixmapPayload),
    Font(FontPayload),
    Shader(ShaderPayload),
    Text(TextPayload),
}

impl ResourcePayload {
    pub fn id(&self) -> &str {
        match self {
            ResourcePayload::Pixmap(p) => &p.id,
            ResourcePayload::Font(p) => &p.id,
            ResourcePayload::Shader(p) => &p.id,
            ResourcePayload::Text(p) => &p.id,
        }
    }

    /// Returns the same payload under a different id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        let id = id.into();
        match &mut self {
            ResourcePayload::Pixmap(p) => p.id = id,
            ResourcePayload::Font(p) => p.id = id,
            ResourcePayload::Shader(p) => p.id = id,
            ResourcePayload::Text(p) => p.id = id,
        }
        self
    }

    /// Short name of the payload type, for listings.
    pub fn type_name(&self) -> &'static str {
        match self {
            ResourcePayload::Pixmap(_) => "pixmap",
            ResourcePayload::Font(_) => "font",
            ResourcePayload::Shader(_) => "shader",
            ResourcePayload::Text(_) => "text",
        }
    }

    /// Approximate in-memory size of the payload's data.
    pub fn data_size(&self) -> usize {
        match self {
            ResourcePayload::Pixmap(p) => p.pixels.len(),
            ResourcePayload::Font(p) => p.glyph_sheet.pixels.len(),
            ResourcePayload::Shader(p) => p.vertex_bytecode.len() + p.fragment_bytecode.len(),
            ResourcePayload::Text(p) => p.lines.iter().map(String::len).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_id() {
        let payload = ResourcePayload::Text(TextPayload {
            id: "intro".to_string(),
            lines: vec!["hello".to_string()],
        });

        let renamed = payload.clone().with_id("outro");
        assert_eq!(renamed.id(), "outro");

        let ResourcePayload::Text(text) = renamed else {
            panic!("expected a text payload");
        };
        assert_eq!(text.lines, vec!["hello".to_string()]);
        assert_eq!(payload.id(), "intro");
    }

    #[test]
    fn test_empty_font_has_every_slot() {
        let sheet = PixmapPayload {
            id: "sheet".to_string(),
            width: 0,
            height: 0,
            pixels: vec![],
        };
        let font = FontPayload::empty("ui", sheet);

        assert_eq!(font.glyph_boxes.len(), GLYPH_COUNT);
        assert_eq!(font.pre_spacing.len(), GLYPH_COUNT);
        assert_eq!(font.post_spacing.len(), GLYPH_COUNT);
    }
}
