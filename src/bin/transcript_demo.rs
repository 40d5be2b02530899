use std::env;
use std::path::{Path, PathBuf};

use transcript_grid::config::load_config;
use transcript_grid::glyph::{binarize_cell, segment_glyphs, GlyphParams};
use transcript_grid::image::io::{load_rgb_image, save_gray, save_rgb, write_json_file};
use transcript_grid::{Transcript, TranscriptDetector};

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    env_logger::init();
    let mut args = env::args();
    let program = args
        .next()
        .unwrap_or_else(|| "transcript_demo".to_string());
    let config_path = args
        .next()
        .map(PathBuf::from)
        .ok_or_else(|| format!("Usage: {program} <config.json>"))?;
    let config = load_config(&config_path)?;

    let page = load_rgb_image(&config.input_path)?;
    let detector = TranscriptDetector::new(config.params.clone());
    let transcript = detector
        .process(&page)
        .map_err(|e| format!("Detection failed on {}: {e}", config.input_path.display()))?;

    print_text_summary(&transcript);

    if let Some(path) = &config.output.json_out {
        write_json_file(path, &transcript)?;
        println!("\nJSON report written to {}", path.display());
    }

    if let Some(dir) = &config.output.debug_dir {
        save_debug_artifacts(dir, &transcript, &config.params.glyph)?;
        println!("Debug artifacts written to {}", dir.display());
    }

    Ok(())
}

fn print_text_summary(transcript: &Transcript) {
    println!("Transcript summary");
    println!(
        "  input: {}x{}",
        transcript.input.width, transcript.input.height
    );
    println!(
        "  rotation_deg: {:.3} (run {}..={}, {} horizontal lines)",
        transcript.skew.rotation_deg,
        transcript.skew.reference.run.start,
        transcript.skew.reference.run.end,
        transcript.skew.horizontal_lines
    );
    let table = &transcript.table;
    println!(
        "  table: x={} y={} w={} h={} rows={} columns={} pitch={:.1}",
        table.bounds.x,
        table.bounds.y,
        table.bounds.w,
        table.bounds.h,
        table.rows.len(),
        table.columns.len(),
        table.trace.pitch
    );
    println!("  form: {:?}", transcript.form);
    for subject in &transcript.subjects {
        let [s1, s2, avg] = &subject.cells;
        println!(
            "  {:>2} {:<20} s1=({},{} {}x{}) s2=({},{} {}x{}) avg=({},{} {}x{})",
            subject.row,
            subject.name,
            s1.x,
            s1.y,
            s1.w,
            s1.h,
            s2.x,
            s2.y,
            s2.w,
            s2.h,
            avg.x,
            avg.y,
            avg.w,
            avg.h
        );
    }
    let stages: Vec<String> = transcript
        .timings
        .stages
        .iter()
        .map(|s| format!("{}={:.3}", s.label, s.elapsed_ms))
        .collect();
    println!(
        "\nTimings (ms): {} total={:.3}",
        stages.join(" "),
        transcript.timings.total_ms
    );
}

fn save_debug_artifacts(dir: &Path, transcript: &Transcript, glyph: &GlyphParams) -> Result<(), String> {
    save_rgb(&transcript.page, &dir.join("deskewed.png"))?;
    save_gray(&transcript.preview, &dir.join("deskewed_binary.png"))?;
    save_gray(&transcript.table.image, &dir.join("table.png"))?;
    for subject in &transcript.subjects {
        let cells = [
            ("s1", &subject.semester1),
            ("s2", &subject.semester2),
            ("avg", &subject.yearly),
        ];
        for (label, cell) in cells {
            let stem = format!("{}_{}", subject.name, label);
            save_gray(cell, &dir.join("cells").join(format!("{stem}.png")))?;
            let binary = binarize_cell(cell, glyph);
            for (i, g) in segment_glyphs(&binary, glyph).iter().enumerate() {
                save_gray(&g.image, &dir.join("glyphs").join(format!("{stem}_{i}.png")))?;
            }
        }
    }
    Ok(())
}
