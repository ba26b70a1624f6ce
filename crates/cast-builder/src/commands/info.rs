use camino::Utf8PathBuf;
use cast_pak::{Pak, ResourcePayload};
use colored::Colorize;

use crate::errors::CliError;
use crate::println_pad;
use crate::utils::format_size;

#[derive(Debug, Clone)]
pub struct InfoPakArgs {
    pub file_path: String,
}

pub fn info_pak(args: InfoPakArgs) -> miette::Result<()> {
    let path = Utf8PathBuf::from(args.file_path);
    let pak = Pak::read_from_path(&path).map_err(|e| CliError::pak_read_failed(path.clone(), e))?;

    println_pad!(
        "{} {}",
        "📦 Pak:".bright_yellow().bold(),
        pak.name.bright_cyan().bold()
    );
    println_pad!(
        "{} {}",
        "Resources:".bright_yellow(),
        pak.len().to_string().bright_white()
    );

    for id in pak.ids() {
        let Some(payload) = pak.get(id) else {
            continue;
        };
        println_pad!(
            "  {} {} {} {}",
            "•".bright_cyan(),
            id.bright_white(),
            format!("[{}]", payload.type_name()).bright_blue(),
            format!("{}, {}", describe(payload), format_size(payload.data_size())).dimmed()
        );
    }

    Ok(())
}

/// One-line summary of what a payload holds.
fn describe(payload: &ResourcePayload) -> String {
    match payload {
        ResourcePayload::Pixmap(p) => format!("{}x{}", p.width, p.height),
        ResourcePayload::Font(f) => format!(
            "{}x{} sheet",
            f.glyph_sheet.width, f.glyph_sheet.height
        ),
        ResourcePayload::Shader(s) => format!(
            "{} samplers, {} params",
            s.samplers.len(),
            s.params.len()
        ),
        ResourcePayload::Text(t) => format!("{} lines", t.lines.len()),
    }
}
