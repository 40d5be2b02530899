use std::env;
use std::path::PathBuf;

use transcript_grid::image::io::{load_rgb_image, save_gray, save_rgb};
use transcript_grid::skew::{correct_skew, SkewParams};

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    env_logger::init();
    let mut args = env::args().skip(1);
    let (input, out_dir) = match (args.next(), args.next()) {
        (Some(input), Some(out)) => (PathBuf::from(input), PathBuf::from(out)),
        _ => return Err("Usage: skew_demo <image> <out_dir>".to_string()),
    };

    let page = load_rgb_image(&input)?;
    let corrected = correct_skew(&page, &SkewParams::default())
        .map_err(|e| format!("Deskew failed on {}: {e}", input.display()))?;
    let estimate = &corrected.estimate;
    println!(
        "rotation_deg={:.3} segments={} vertical={} horizontal={} run={}..={} pitch={:.1} elapsed_ms={:.3}",
        estimate.rotation_deg,
        estimate.segment_count,
        estimate.vertical_lines,
        estimate.horizontal_lines,
        estimate.reference.run.start,
        estimate.reference.run.end,
        estimate.reference.run.pitch,
        estimate.elapsed_ms
    );

    save_rgb(&corrected.image, &out_dir.join("deskewed.png"))?;
    save_gray(&corrected.gray, &out_dir.join("deskewed_gray.png"))?;
    save_gray(&corrected.binary, &out_dir.join("deskewed_binary.png"))?;
    println!("Outputs written to {}", out_dir.display());
    Ok(())
}
