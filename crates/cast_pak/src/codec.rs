//! Source file decoders.
//!
//! Every function here is a pure transform from one or more source files to a
//! [`ResourcePayload`](crate::ResourcePayload) variant. The payload id is the file
//! stem of the (first) source path.

use camino::Utf8Path;
use regex::Regex;
use std::sync::LazyLock;

use crate::{
    error::CodecError,
    payload::{
        FontPayload, GlyphBox, PixmapPayload, ShaderPayload, ShaderSampler, TextPayload,
        GLYPH_COUNT,
    },
};

/// First meaningful line of a bitmap font description.
pub const FONT_HEADER: &str = "[BTFONT]";

const FONT_CHAR_PREFIX: &str = "Char=";
const FONT_CHAR_FIELDS: usize = 7;

static SAMPLER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"SAMPLER2D\s*\(\s*(?<sampler>\w+)\s*,\s*(?<index>\d+)\s*\)\s*;")
        .expect("sampler pattern is valid")
});

static PARAM_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"uniform\s+vec4\s+(?<param>\w+)\s*;").expect("param pattern is valid")
});

/// Decode a PNG into an RGBA8 pixmap.
pub fn build_image(path: &Utf8Path) -> Result<PixmapPayload, CodecError> {
    let id = resource_id(path)?;
    let bytes = read_source(path)?;

    let img = image::load_from_memory(&bytes)
        .map_err(|e| CodecError::format(path, format!("Failed to decode image: {}", e)))?
        .to_rgba8();

    Ok(PixmapPayload {
        id,
        width: img.width(),
        height: img.height(),
        pixels: img.into_raw(),
    })
}

/// Parse a `[BTFONT]` description and decode its glyph sheet.
///
/// ```text
/// [BTFONT]
/// Char=65,0,0,8,12,0,1
/// ```
///
/// `Char=` lines carry `index,x,y,width,height,pre,post`. Glyphs that are never
/// declared keep a zero box and zero spacing.
pub fn build_font(desc_path: &Utf8Path, image_path: &Utf8Path) -> Result<FontPayload, CodecError> {
    let id = resource_id(desc_path)?;
    let description = read_source_text(desc_path)?;
    let glyph_sheet = build_image(image_path)?;

    let mut font = FontPayload::empty(id, glyph_sheet);
    let mut lines = description.lines().map(str::trim).filter(|l| !l.is_empty());

    match lines.next() {
        Some(FONT_HEADER) => {}
        Some(other) => {
            return Err(CodecError::format(
                desc_path,
                format!("expected '{}' header, found '{}'", FONT_HEADER, other),
            ))
        }
        None => return Err(CodecError::format(desc_path, "font description is empty")),
    }

    for line in lines {
        let Some(fields) = line.strip_prefix(FONT_CHAR_PREFIX) else {
            continue;
        };

        let values = fields
            .split(',')
            .map(|f| f.trim().parse::<i32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| CodecError::format(desc_path, format!("invalid glyph line '{}': {}", line, e)))?;

        if values.len() != FONT_CHAR_FIELDS {
            return Err(CodecError::format(
                desc_path,
                format!(
                    "glyph line '{}' has {} fields, expected {}",
                    line,
                    values.len(),
                    FONT_CHAR_FIELDS
                ),
            ));
        }

        let index = usize::try_from(values[0])
            .ok()
            .filter(|i| *i < GLYPH_COUNT)
            .ok_or_else(|| {
                CodecError::format(desc_path, format!("glyph index {} is out of range", values[0]))
            })?;

        font.glyph_boxes[index] = GlyphBox {
            x: values[1],
            y: values[2],
            width: values[3],
            height: values[4],
        };
        font.pre_spacing[index] = values[5];
        font.post_spacing[index] = values[6];
    }

    Ok(font)
}

/// "Compile" a shader pair.
///
/// The bytecode is the validated source text. Samplers and `vec4` params are
/// reflected from the fragment stage in source order.
pub fn build_shader(vs_path: &Utf8Path, fs_path: &Utf8Path) -> Result<ShaderPayload, CodecError> {
    let id = resource_id(vs_path)?;
    let vertex = read_shader_stage(vs_path)?;
    let fragment = read_shader_stage(fs_path)?;

    let mut samplers = Vec::new();
    let mut params = Vec::new();

    for line in fragment.lines() {
        if SAMPLER_PATTERN.is_match(line) {
            for caps in SAMPLER_PATTERN.captures_iter(line) {
                let index = caps["index"].parse::<u32>().map_err(|e| {
                    CodecError::format(fs_path, format!("invalid sampler index: {}", e))
                })?;
                samplers.push(ShaderSampler {
                    name: caps["sampler"].to_string(),
                    index,
                });
            }
            continue;
        }

        for caps in PARAM_PATTERN.captures_iter(line) {
            params.push(caps["param"].to_string());
        }
    }

    Ok(ShaderPayload {
        id,
        vertex_bytecode: vertex.into_bytes(),
        fragment_bytecode: fragment.into_bytes(),
        samplers,
        params,
    })
}

pub fn build_text_file(path: &Utf8Path) -> Result<TextPayload, CodecError> {
    let id = resource_id(path)?;
    let text = read_source_text(path)?;

    let lines = text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(str::to_string)
        .collect();

    Ok(TextPayload { id, lines })
}

/// The id a source file produces: its file stem.
pub fn resource_id(path: &Utf8Path) -> Result<String, CodecError> {
    path.file_stem()
        .filter(|stem| !stem.is_empty())
        .map(str::to_string)
        .ok_or_else(|| CodecError::format(path, "source path has no file name"))
}

fn read_source(path: &Utf8Path) -> Result<Vec<u8>, CodecError> {
    std::fs::read(path.as_std_path()).map_err(|source| CodecError::SourceRead {
        path: path.to_path_buf(),
        source,
    })
}

fn read_source_text(path: &Utf8Path) -> Result<String, CodecError> {
    String::from_utf8(read_source(path)?)
        .map_err(|_| CodecError::format(path, "source file is not valid UTF-8"))
}

fn read_shader_stage(path: &Utf8Path) -> Result<String, CodecError> {
    let source = read_source_text(path)?;
    if source.trim().is_empty() {
        return Err(CodecError::format(path, "shader source is empty"));
    }
    Ok(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use image::{Rgba, RgbaImage};

    fn temp_dir() -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        (dir, path)
    }

    fn write_png(path: &Utf8Path, width: u32, height: u32) {
        RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255]))
            .save(path.as_std_path())
            .unwrap();
    }

    #[test]
    fn test_build_image() {
        let (_guard, dir) = temp_dir();
        let path = dir.join("logo.png");
        write_png(&path, 3, 2);

        let pixmap = build_image(&path).unwrap();
        assert_eq!(pixmap.id, "logo");
        assert_eq!((pixmap.width, pixmap.height), (3, 2));
        assert_eq!(pixmap.pixels.len(), 3 * 2 * 4);
        assert_eq!(&pixmap.pixels[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn test_build_image_missing() {
        let (_guard, dir) = temp_dir();
        let err = build_image(&dir.join("missing.png")).unwrap_err();
        assert!(matches!(err, CodecError::SourceRead { .. }));
    }

    #[test]
    fn test_build_image_corrupt() {
        let (_guard, dir) = temp_dir();
        let path = dir.join("broken.png");
        std::fs::write(&path, b"not a png").unwrap();

        assert!(matches!(build_image(&path), Err(CodecError::Format { .. })));
    }

    #[test]
    fn test_build_font() {
        let (_guard, dir) = temp_dir();
        let desc = dir.join("ui.fnt");
        let sheet = dir.join("ui.png");
        write_png(&sheet, 16, 16);
        std::fs::write(
            &desc,
            "\n[BTFONT]\nName=ui\n\nChar=65, 1, 2, 8, 12, -1, 2\nChar=66,9,2,7,12,0,1\n",
        )
        .unwrap();

        let font = build_font(&desc, &sheet).unwrap();
        assert_eq!(font.id, "ui");
        assert_eq!(font.glyph_sheet.width, 16);
        assert_eq!(
            font.glyph_boxes[65],
            GlyphBox {
                x: 1,
                y: 2,
                width: 8,
                height: 12
            }
        );
        assert_eq!(font.pre_spacing[65], -1);
        assert_eq!(font.post_spacing[66], 1);
        assert_eq!(font.glyph_boxes[67], GlyphBox::default());
    }

    #[test]
    fn test_build_font_rejects_bad_input() {
        let (_guard, dir) = temp_dir();
        let sheet = dir.join("ui.png");
        write_png(&sheet, 4, 4);
        let desc = dir.join("ui.fnt");

        for contents in [
            "",
            "[FONT]\nChar=65,0,0,1,1,0,0",
            "[BTFONT]\nChar=65,0,0,1,1,0",
            "[BTFONT]\nChar=255,0,0,1,1,0,0",
            "[BTFONT]\nChar=-1,0,0,1,1,0,0",
            "[BTFONT]\nChar=a,0,0,1,1,0,0",
        ] {
            std::fs::write(&desc, contents).unwrap();
            assert!(
                matches!(build_font(&desc, &sheet), Err(CodecError::Format { .. })),
                "expected a format error for {contents:?}"
            );
        }
    }

    #[test]
    fn test_build_shader_reflection() {
        let (_guard, dir) = temp_dir();
        let vs = dir.join("sprite.vs");
        let fs = dir.join("sprite.fs");
        std::fs::write(&vs, "void main() {}\n").unwrap();
        std::fs::write(
            &fs,
            "SAMPLER2D(s_albedo, 0);\n\
             SAMPLER2D ( s_mask , 1 ) ;\n\
             uniform vec4 u_tint;\n\
             uniform vec4 u_params ;\n\
             uniform vec3 u_ignored;\n\
             void main() {}\n",
        )
        .unwrap();

        let shader = build_shader(&vs, &fs).unwrap();
        assert_eq!(shader.id, "sprite");
        assert_eq!(shader.vertex_bytecode, b"void main() {}\n");
        assert_eq!(
            shader.samplers,
            vec![
                ShaderSampler {
                    name: "s_albedo".to_string(),
                    index: 0
                },
                ShaderSampler {
                    name: "s_mask".to_string(),
                    index: 1
                },
            ]
        );
        assert_eq!(shader.params, vec!["u_tint", "u_params"]);
    }

    #[test]
    fn test_build_shader_empty_stage() {
        let (_guard, dir) = temp_dir();
        let vs = dir.join("sprite.vs");
        let fs = dir.join("sprite.fs");
        std::fs::write(&vs, "void main() {}").unwrap();
        std::fs::write(&fs, "  \n").unwrap();

        assert!(matches!(build_shader(&vs, &fs), Err(CodecError::Format { .. })));
    }

    #[test]
    fn test_build_text_file() {
        let (_guard, dir) = temp_dir();
        let path = dir.join("credits.txt");
        std::fs::write(&path, "Design\r\n\r\n   \nCode\n  indented\n").unwrap();

        let text = build_text_file(&path).unwrap();
        assert_eq!(text.id, "credits");
        assert_eq!(text.lines, vec!["Design", "Code", "  indented"]);
    }

    #[test]
    fn test_text_file_not_utf8() {
        let (_guard, dir) = temp_dir();
        let path = dir.join("bad.txt");
        std::fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

        assert!(matches!(build_text_file(&path), Err(CodecError::Format { .. })));
    }
}
