use std::{env, fs, process::ExitCode};

use anyhow::Context;

use fontres::{
    bitmap::BitmapFont,
    sfnt::{table::FontTable, FontContainer},
};

fn main() -> ExitCode {
    env_logger::init();

    let mut args = env::args().skip(1);
    let path = match args.next() {
        Some(path) => path,
        None => {
            eprintln!("usage: fontres <font file> [--roundtrip <out file>]");
            return ExitCode::FAILURE;
        }
    };

    let roundtrip = match (args.next().as_deref(), args.next()) {
        (Some("--roundtrip"), Some(out)) => Some(out),
        (None, _) => None,
        _ => {
            eprintln!("usage: fontres <font file> [--roundtrip <out file>]");
            return ExitCode::FAILURE;
        }
    };

    match inspect(&path, roundtrip.as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {:#}", error);
            ExitCode::FAILURE
        }
    }
}

fn inspect(path: &str, roundtrip: Option<&str>) -> anyhow::Result<()> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path))?;

    match FontContainer::decode(&bytes) {
        Ok(container) => {
            print_container(&container);

            if let Some(out) = roundtrip {
                let encoded = container
                    .encode()
                    .context("failed to re-encode container")?;
                fs::write(out, &encoded).with_context(|| format!("failed to write {}", out))?;
                println!("\nre-encoded {} bytes to {}", encoded.len(), out);
            }

            Ok(())
        }
        // not an sfnt container; try the bitmap font resource format
        Err(container_error) => match BitmapFont::new(bytes) {
            Ok(font) => {
                print_bitmap_font(&font);
                Ok(())
            }
            Err(_) => Err(container_error).with_context(|| format!("failed to decode {}", path)),
        },
    }
}

fn print_container(container: &FontContainer) {
    println!("sfnt container, format {:#010x}", container.format);

    for (tag, table) in container.tables() {
        let kind = match table {
            FontTable::Head(_) => "font header",
            FontTable::Hhea(_) => "horizontal header",
            FontTable::Hmtx(_) => "horizontal metrics",
            FontTable::Maxp(_) => "maximum profile",
            FontTable::Name(_) => "naming table",
            FontTable::Os2(_) => "OS/2 metrics",
            FontTable::Gasp(_) => "grid-fitting behavior",
            FontTable::Cvt(_) => "control values",
            FontTable::Post(_) => "PostScript names",
            FontTable::Opaque(bytes) => {
                println!("{:>6}  opaque bytes ({} bytes)", tag.to_string(), bytes.len());
                continue;
            }
        };

        println!("{:>6}  {}", tag.to_string(), kind);
    }

    if let Some(head) = container.head() {
        println!(
            "\n{} units per em, revision {}",
            head.units_per_em,
            head.revision.to_f32()
        );
    }

    if let Some(name) = container.name() {
        if let Some(family) = name.find(fontres::sfnt::table::name_id::FAMILY) {
            println!("family: {}", family.to_string_lossy());
        }
    }

    for advisory in container.advisories() {
        println!(
            "warning: `{}` checksum recorded as {:#010x} but bytes sum to {:#010x}",
            advisory.tag, advisory.stored, advisory.computed
        );
    }
}

fn print_bitmap_font(font: &BitmapFont) {
    let record = font.record();

    println!(
        "bitmap font: codes {}..={}, {}x{} max glyph, {} px line height",
        record.first_char,
        record.last_char,
        record.rect_width,
        record.rect_height,
        font.line_height()
    );

    let present = font.glyphs().iter().filter(|glyph| !glyph.is_missing()).count();
    println!(
        "{} of {} glyph slots populated",
        present,
        record.glyph_count()
    );
}
